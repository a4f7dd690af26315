//! Skill categories and skill entries.

use serde::{Deserialize, Serialize};

/// Upper bound of a skill level (percent).
pub const MAX_SKILL_LEVEL: u8 = 100;

/// One skill with a proficiency level in `0..=100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: u8,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// Named, ordered group of skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCategory {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl SkillCategory {
    pub fn new(category: impl Into<String>, skills: Vec<Skill>) -> Self {
        Self {
            category: category.into(),
            skills,
        }
    }

    /// Case-insensitive skill lookup.
    pub fn find_skill(&self, name: &str) -> Option<&Skill> {
        let needle = name.to_lowercase();
        self.skills
            .iter()
            .find(|skill| skill.name.to_lowercase() == needle)
    }

    pub fn has_skill(&self, name: &str) -> bool {
        self.find_skill(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
