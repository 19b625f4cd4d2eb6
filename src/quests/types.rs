use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::core::error::{QuestError, QuestResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub quest_id: String,
    pub title: String,
    pub description: String,
    pub reward_xp: u32,
    pub reward_gold: u32,
    pub required_level: u32,
    /// The single quest that must be completed first, if any.
    pub prerequisite: Option<String>,
}

/// Where a character stands on one quest. Derived from the character's quest
/// lists, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestStatus {
    NotStarted,
    Active,
    Completed,
}

/// XP and gold granted on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuestReward {
    pub xp: u32,
    pub gold: u32,
}

/// All quests known to the game, keyed by id. Read-only after load.
#[derive(Debug, Clone, Default)]
pub struct QuestCatalog {
    quests: BTreeMap<String, Quest>,
}

impl QuestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_quests(quests: impl IntoIterator<Item = Quest>) -> Self {
        Self {
            quests: quests
                .into_iter()
                .map(|quest| (quest.quest_id.clone(), quest))
                .collect(),
        }
    }

    pub fn get(&self, quest_id: &str) -> Option<&Quest> {
        self.quests.get(quest_id)
    }

    /// Like `get`, but a missing quest is an error.
    pub fn lookup(&self, quest_id: &str) -> QuestResult<&Quest> {
        self.get(quest_id)
            .ok_or_else(|| QuestError::NotFound(quest_id.to_string()))
    }

    pub fn contains(&self, quest_id: &str) -> bool {
        self.quests.contains_key(quest_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.quests.values()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    /// Follows prerequisite links from `quest_id` back to the root quest.
    ///
    /// Returns the ids root-first, ending with `quest_id`. Fails if a link
    /// names a quest outside the catalog or if the chain revisits a quest.
    pub fn prerequisite_chain(&self, quest_id: &str) -> QuestResult<Vec<String>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.lookup(quest_id)?;

        loop {
            if !seen.insert(current.quest_id.as_str()) {
                return Err(QuestError::PrerequisiteCycle(quest_id.to_string()));
            }
            chain.push(current.quest_id.clone());

            match &current.prerequisite {
                Some(prerequisite) => current = self.lookup(prerequisite)?,
                None => break,
            }
        }

        chain.reverse();
        Ok(chain)
    }

    /// Checks that every prerequisite exists and that no chain loops.
    pub fn validate_prerequisites(&self) -> QuestResult<()> {
        for quest in self.iter() {
            if let Some(prerequisite) = &quest.prerequisite {
                if !self.contains(prerequisite) {
                    return Err(QuestError::NotFound(format!(
                        "{} (prerequisite of {})",
                        prerequisite, quest.quest_id
                    )));
                }
            }
            self.prerequisite_chain(&quest.quest_id)?;
        }
        Ok(())
    }

    /// Quests whose required level falls within `min_level..=max_level`.
    pub fn quests_by_level(&self, min_level: u32, max_level: u32) -> Vec<&Quest> {
        self.iter()
            .filter(|quest| (min_level..=max_level).contains(&quest.required_level))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest(id: &str, level: u32, prerequisite: Option<&str>) -> Quest {
        Quest {
            quest_id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            reward_xp: 10,
            reward_gold: 5,
            required_level: level,
            prerequisite: prerequisite.map(str::to_string),
        }
    }

    #[test]
    fn test_prerequisite_chain_root_first() {
        let catalog = QuestCatalog::from_quests(vec![
            quest("q3", 3, Some("q2")),
            quest("q1", 1, None),
            quest("q2", 2, Some("q1")),
        ]);
        assert_eq!(
            catalog.prerequisite_chain("q3").unwrap(),
            vec!["q1", "q2", "q3"]
        );
        assert_eq!(catalog.prerequisite_chain("q1").unwrap(), vec!["q1"]);
    }

    #[test]
    fn test_prerequisite_chain_missing_link() {
        let catalog = QuestCatalog::from_quests(vec![quest("q2", 1, Some("ghost"))]);
        assert_eq!(
            catalog.prerequisite_chain("q2"),
            Err(QuestError::NotFound("ghost".to_string()))
        );
        assert_eq!(
            catalog.prerequisite_chain("nope"),
            Err(QuestError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_prerequisite_chain_detects_cycle() {
        let catalog = QuestCatalog::from_quests(vec![
            quest("a", 1, Some("b")),
            quest("b", 1, Some("c")),
            quest("c", 1, Some("a")),
        ]);
        assert_eq!(
            catalog.prerequisite_chain("a"),
            Err(QuestError::PrerequisiteCycle("a".to_string()))
        );
        assert!(catalog.validate_prerequisites().is_err());
    }

    #[test]
    fn test_self_prerequisite_is_a_cycle() {
        let catalog = QuestCatalog::from_quests(vec![quest("loop", 1, Some("loop"))]);
        assert!(matches!(
            catalog.prerequisite_chain("loop"),
            Err(QuestError::PrerequisiteCycle(_))
        ));
    }

    #[test]
    fn test_validate_prerequisites_ok() {
        let catalog =
            QuestCatalog::from_quests(vec![quest("q1", 1, None), quest("q2", 2, Some("q1"))]);
        assert!(catalog.validate_prerequisites().is_ok());
    }

    #[test]
    fn test_validate_prerequisites_missing() {
        let catalog = QuestCatalog::from_quests(vec![quest("q2", 2, Some("q1"))]);
        assert!(matches!(
            catalog.validate_prerequisites(),
            Err(QuestError::NotFound(_))
        ));
    }

    #[test]
    fn test_quests_by_level() {
        let catalog = QuestCatalog::from_quests(vec![
            quest("q1", 1, None),
            quest("q2", 3, None),
            quest("q3", 6, None),
        ]);
        let ids: Vec<_> = catalog
            .quests_by_level(2, 6)
            .into_iter()
            .map(|q| q.quest_id.as_str())
            .collect();
        assert_eq!(ids, vec!["q2", "q3"]);
    }
}
