//! Learner profile types.
//!
//! A profile is submitted from the Profile tab and replaced wholesale on every
//! resubmission. Only `age` and `goals` are free text that may be left blank;
//! the three bucketed fields always carry a value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Self-reported knowledge level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeLevel {
    #[default]
    #[serde(alias = "Beginner")]
    Beginner,
    #[serde(alias = "Intermediate")]
    Intermediate,
    #[serde(alias = "Advanced")]
    Advanced,
    #[serde(alias = "Expert")]
    Expert,
}

impl KnowledgeLevel {
    pub const ALL: [KnowledgeLevel; 4] = [
        KnowledgeLevel::Beginner,
        KnowledgeLevel::Intermediate,
        KnowledgeLevel::Advanced,
        KnowledgeLevel::Expert,
    ];

    /// Display label, as shown in the level dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            KnowledgeLevel::Beginner => "Beginner",
            KnowledgeLevel::Intermediate => "Intermediate",
            KnowledgeLevel::Advanced => "Advanced",
            KnowledgeLevel::Expert => "Expert",
        }
    }
}

impl fmt::Display for KnowledgeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for KnowledgeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown knowledge level '{s}' (expected Beginner, Intermediate, Advanced or Expert)")
            })
    }
}

/// How much time per day the learner can study.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyTime {
    LessThanOneHour,
    #[default]
    OneToThreeHours,
    ThreeToFiveHours,
    MoreThanFiveHours,
}

impl StudyTime {
    pub fn label(&self) -> &'static str {
        match self {
            StudyTime::LessThanOneHour => "Less than 1 hour",
            StudyTime::OneToThreeHours => "1-3 hours",
            StudyTime::ThreeToFiveHours => "3-5 hours",
            StudyTime::MoreThanFiveHours => "More than 5 hours",
        }
    }
}

impl fmt::Display for StudyTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Preferred way of learning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningStyle {
    Visual,
    Reading,
    HandsOn,
    #[default]
    Mixed,
}

impl LearningStyle {
    pub fn label(&self) -> &'static str {
        match self {
            LearningStyle::Visual => "Visual (diagrams, videos)",
            LearningStyle::Reading => "Reading (articles, books)",
            LearningStyle::HandsOn => "Hands-on (projects, exercises)",
            LearningStyle::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A learner profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub age: String,

    #[serde(default)]
    pub goals: String,

    #[serde(default)]
    pub knowledge_level: KnowledgeLevel,

    #[serde(default)]
    pub interests: String,

    #[serde(default)]
    pub study_time: StudyTime,

    #[serde(default)]
    pub learning_style: LearningStyle,
}

impl Profile {
    /// Whether the profile carries enough to tailor responses.
    pub fn is_complete(&self) -> bool {
        !self.age.trim().is_empty() && !self.goals.trim().is_empty()
    }
}
