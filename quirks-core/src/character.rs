//! Character records produced by the generation collaborator

use serde::{Deserialize, Serialize};

/// A generated character: a plain role and two quirks
///
/// `schema` carries the schema.org `Person` object the model is asked to
/// include. It is passed through to the caller untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCharacter {
    pub role: String,
    pub quirk1: String,
    pub quirk2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
}

impl GeneratedCharacter {
    /// Create a character without passthrough metadata
    pub fn new(
        role: impl Into<String>,
        quirk1: impl Into<String>,
        quirk2: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            quirk1: quirk1.into(),
            quirk2: quirk2.into(),
            schema: None,
        }
    }

    /// Attach schema.org metadata
    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// The three text fields used for novelty comparison
    pub fn traits(&self) -> CharacterTraits {
        CharacterTraits {
            role: self.role.clone(),
            quirk1: self.quirk1.clone(),
            quirk2: self.quirk2.clone(),
        }
    }

    /// Clearly-labelled stand-in returned when generation fails
    pub fn placeholder() -> Self {
        Self::new("Unavailable", "Generation failed", "Please try again")
    }
}

/// The text fields of the most recently accepted character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterTraits {
    pub role: String,
    pub quirk1: String,
    pub quirk2: String,
}

impl CharacterTraits {
    pub fn new(
        role: impl Into<String>,
        quirk1: impl Into<String>,
        quirk2: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            quirk1: quirk1.into(),
            quirk2: quirk2.into(),
        }
    }

    /// All three fields joined, for whole-record comparison
    pub fn combined(&self) -> String {
        format!("{} {} {}", self.role, self.quirk1, self.quirk2)
    }
}
