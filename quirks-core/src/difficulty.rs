//! Difficulty tiers and the prompt each one sends to the model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidDifficulty;

/// Response contract shared by every tier
const RESPONSE_SCHEMA: &str = r##"You are an API. Respond ONLY in raw JSON using this exact schema:
{
  "role": string,
  "quirk1": string,
  "quirk2": string,
  "schema": {
    "@context": "https://schema.org",
    "@type": "Person",
    "@id": "#character",
    "name": string,
    "description": string
  }
}"##;

/// One of the fixed prompt profiles a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    VeryEasy,
    Medium,
    Hard,
    VeryHard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::VeryEasy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::VeryHard,
    ];

    /// Numeric selector used on the wire (1-4)
    pub fn level(self) -> u8 {
        match self {
            Difficulty::VeryEasy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
            Difficulty::VeryHard => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Very Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::VeryHard => "Very Hard",
        }
    }

    fn rules(self) -> &'static [&'static str] {
        match self {
            Difficulty::VeryEasy => &[
                "Role: one plain everyday noun (e.g. baker, teacher, plumber). No adjectives.",
                "Quirks: short, grounded, simple. Max 5 words.",
                "Ban all fantasy/sci-fi words like whimsical, magical, enchanted, alien, superhero, cosmic.",
            ],
            Difficulty::Medium => &[
                "Role: one everyday noun with no modifiers. Do NOT add adjectives (e.g. not \"quiet librarian\").",
                "Quirks: slightly quirky or specific, max 5 words.",
                "All descriptors like \"anxious\" or \"pessimistic\" must go in a quirk — not in the role.",
                "Ban whimsical, magical, cosmic, fantasy, sci-fi, enchanted language.",
            ],
            Difficulty::Hard => &[
                "Role: must be ONE clean noun. NO adjectives or descriptions.",
                "Quirks: can include emotional/psychological traits (e.g. \"always nervous around people\").",
                "Quirks must be grounded. ≤ 6 words.",
                "Never include magical, fantasy, whimsical, cosmic, superhero, or sci-fi language.",
            ],
            Difficulty::VeryHard => &[
                "Role: must be ONE grounded noun (e.g. janitor, florist, therapist). NO adjectives.",
                "Quirks: oddly specific or ironic, emotional, but realistic. ≤ 6 words each.",
                "Use personality words (e.g. anxious, obsessive, pessimistic) as quirks only — never in the role.",
                "Strictly ban all fantasy, magical, whimsical, enchanted, cosmic, sci-fi descriptors.",
            ],
        }
    }

    /// Full system prompt for this tier
    pub fn prompt(self) -> String {
        let mut prompt = String::from(RESPONSE_SCHEMA);
        prompt.push_str("\nRules:");
        for rule in self.rules() {
            prompt.push_str("\n• ");
            prompt.push_str(rule);
        }
        prompt
    }

    pub fn info(self) -> DifficultyInfo {
        DifficultyInfo {
            level: self.level(),
            label: self.label().to_string(),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.level(), self.label())
    }
}

impl TryFrom<u64> for Difficulty {
    type Error = InvalidDifficulty;

    fn try_from(level: u64) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Difficulty::VeryEasy),
            2 => Ok(Difficulty::Medium),
            3 => Ok(Difficulty::Hard),
            4 => Ok(Difficulty::VeryHard),
            other => Err(InvalidDifficulty(other.to_string())),
        }
    }
}

impl FromStr for Difficulty {
    type Err = InvalidDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map_err(|_| InvalidDifficulty(s.to_string()))
            .and_then(Difficulty::try_from)
    }
}

/// Accepts `1` as well as `"1"`; anything else is rejected
impl TryFrom<&serde_json::Value> for Difficulty {
    type Error = InvalidDifficulty;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| InvalidDifficulty(n.to_string()))
                .and_then(Difficulty::try_from),
            serde_json::Value::String(s) => s.parse(),
            other => Err(InvalidDifficulty(other.to_string())),
        }
    }
}

/// Public description of a tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyInfo {
    pub level: u8,
    pub label: String,
}
