//! quirks-core: decision logic for the quirks character service
//!
//! - **Rate gate** - [`RateGate`] admits each client at most once per
//!   cooldown window
//! - **Novelty selection** - [`NoveltySelector`] retries the generator
//!   until the result differs from the last accepted character, within a
//!   fixed attempt budget
//! - **Generation** - [`CharacterGenerator`] and [`ProviderGenerator`]
//!   turn a [`Difficulty`] prompt into a [`GeneratedCharacter`]
//! - **Extraction** - [`extract_character`] pulls the JSON payload out of
//!   noisy model output
//!
//! # Request flow
//!
//! ```text
//! request ──► RateGate::admit ──► Denied ──► 429
//!                  │ Allowed
//!                  ▼
//!          NoveltySelector::select ◄──┐
//!                  │                  │ too similar, attempts left
//!                  ▼                  │
//!          CharacterGenerator ────────┘
//!                  │
//!                  ▼
//!          last accepted updated, character returned
//! ```

pub mod character;
pub mod client;
pub mod difficulty;
pub mod error;
pub mod extract;
pub mod generator;
pub mod novelty;
pub mod rate;

pub use character::{CharacterTraits, GeneratedCharacter};
pub use client::ClientKey;
pub use difficulty::{Difficulty, DifficultyInfo};
pub use error::{GenerationError, InvalidDifficulty};
pub use extract::{extract_character, extract_json_object};
pub use generator::{CharacterGenerator, GenerationSettings, MockGenerator, ProviderGenerator};
pub use novelty::{
    NoveltyScope, NoveltySelector, Selection, SelectionConfig, SimilarityPolicy, select_novel,
};
pub use rate::{Admission, Clock, ManualClock, MonotonicClock, RateGate, RateGateConfig};
