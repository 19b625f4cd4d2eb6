//! Quest transitions for a character.
//!
//! A quest is NotStarted, Active or Completed depending on which of the
//! character's quest lists holds its id. `accept_quest`, `complete_quest` and
//! `abandon_quest` are the only operations that move ids between lists.

use crate::character::progression::{add_gold, gain_experience, gold_after};
use crate::character::types::Character;
use crate::core::error::{CharacterError, QuestError, QuestResult};

use super::types::{Quest, QuestCatalog, QuestReward, QuestStatus};

pub fn is_quest_active(character: &Character, quest_id: &str) -> bool {
    character.active_quests.iter().any(|id| id == quest_id)
}

pub fn is_quest_completed(character: &Character, quest_id: &str) -> bool {
    character.completed_quests.iter().any(|id| id == quest_id)
}

pub fn quest_status(character: &Character, quest_id: &str) -> QuestStatus {
    if is_quest_completed(character, quest_id) {
        QuestStatus::Completed
    } else if is_quest_active(character, quest_id) {
        QuestStatus::Active
    } else {
        QuestStatus::NotStarted
    }
}

/// Every reason `character` may not accept `quest_id`, checked in order:
/// unknown quest, level, prerequisite, already completed, already active.
fn check_can_accept<'c>(
    character: &Character,
    quest_id: &str,
    catalog: &'c QuestCatalog,
) -> QuestResult<&'c Quest> {
    let quest = catalog.lookup(quest_id)?;

    if character.level < quest.required_level {
        return Err(CharacterError::InsufficientLevel {
            required: quest.required_level,
            current: character.level,
        }
        .into());
    }

    if let Some(prerequisite) = &quest.prerequisite {
        if !is_quest_completed(character, prerequisite) {
            return Err(QuestError::RequirementsNotMet(format!(
                "prerequisite quest '{}' not completed",
                prerequisite
            )));
        }
    }

    if is_quest_completed(character, quest_id) {
        return Err(QuestError::AlreadyCompleted(quest_id.to_string()));
    }

    if is_quest_active(character, quest_id) {
        return Err(QuestError::RequirementsNotMet(format!(
            "quest '{}' is already active",
            quest_id
        )));
    }

    Ok(quest)
}

pub fn can_accept_quest(character: &Character, quest_id: &str, catalog: &QuestCatalog) -> bool {
    check_can_accept(character, quest_id, catalog).is_ok()
}

pub fn accept_quest(
    character: &mut Character,
    quest_id: &str,
    catalog: &QuestCatalog,
) -> QuestResult<()> {
    let quest = check_can_accept(character, quest_id, catalog)?;
    character.active_quests.push(quest.quest_id.clone());

    tracing::debug!(quest = %quest_id, "quest accepted");
    Ok(())
}

/// Completes an active quest and pays out its rewards.
pub fn complete_quest(
    character: &mut Character,
    quest_id: &str,
    catalog: &QuestCatalog,
) -> QuestResult<QuestReward> {
    let quest = catalog.lookup(quest_id)?;
    if !is_quest_active(character, quest_id) {
        return Err(QuestError::NotActive(quest_id.to_string()));
    }
    character.ensure_alive()?;
    gold_after(character, i64::from(quest.reward_gold))?;

    character.active_quests.retain(|id| id != quest_id);
    character.completed_quests.push(quest.quest_id.clone());

    gain_experience(character, quest.reward_xp)?;
    add_gold(character, i64::from(quest.reward_gold))?;

    tracing::info!(
        quest = %quest_id,
        xp = quest.reward_xp,
        gold = quest.reward_gold,
        "quest completed"
    );
    Ok(QuestReward {
        xp: quest.reward_xp,
        gold: quest.reward_gold,
    })
}

/// Drops an active quest. There is no penalty.
pub fn abandon_quest(character: &mut Character, quest_id: &str) -> QuestResult<()> {
    if !is_quest_active(character, quest_id) {
        return Err(QuestError::NotActive(quest_id.to_string()));
    }
    character.active_quests.retain(|id| id != quest_id);

    tracing::debug!(quest = %quest_id, "quest abandoned");
    Ok(())
}

pub fn get_active_quests<'c>(character: &Character, catalog: &'c QuestCatalog) -> Vec<&'c Quest> {
    character
        .active_quests
        .iter()
        .filter_map(|id| catalog.get(id))
        .collect()
}

pub fn get_completed_quests<'c>(
    character: &Character,
    catalog: &'c QuestCatalog,
) -> Vec<&'c Quest> {
    character
        .completed_quests
        .iter()
        .filter_map(|id| catalog.get(id))
        .collect()
}

/// Quests the character could accept right now.
pub fn get_available_quests<'c>(
    character: &Character,
    catalog: &'c QuestCatalog,
) -> Vec<&'c Quest> {
    catalog
        .iter()
        .filter(|quest| can_accept_quest(character, &quest.quest_id, catalog))
        .collect()
}

pub fn quest_completion_percentage(character: &Character, catalog: &QuestCatalog) -> f64 {
    if catalog.is_empty() {
        return 0.0;
    }
    let completed = get_completed_quests(character, catalog).len();
    completed as f64 / catalog.len() as f64 * 100.0
}

/// Sum of the rewards of every completed quest still in the catalog.
pub fn total_quest_rewards_earned(character: &Character, catalog: &QuestCatalog) -> QuestReward {
    get_completed_quests(character, catalog)
        .into_iter()
        .fold(QuestReward::default(), |total, quest| QuestReward {
            xp: total.xp.saturating_add(quest.reward_xp),
            gold: total.gold.saturating_add(quest.reward_gold),
        })
}

pub fn quest_info_text(quest: &Quest) -> String {
    format!(
        "=== {} ===\n{}\nRequired Level: {}\nRewards: {} XP, {} gold\nPrerequisite: {}",
        quest.title,
        quest.description,
        quest.required_level,
        quest.reward_xp,
        quest.reward_gold,
        quest.prerequisite.as_deref().unwrap_or("None")
    )
}

pub fn quest_progress_text(character: &Character, catalog: &QuestCatalog) -> String {
    let totals = total_quest_rewards_earned(character, catalog);
    format!(
        "Active quests: {}\nCompleted quests: {}\nCompletion: {:.1}%\nTotal rewards earned: {} XP, {} gold",
        character.active_quests.len(),
        character.completed_quests.len(),
        quest_completion_percentage(character, catalog),
        totals.xp,
        totals.gold
    )
}
