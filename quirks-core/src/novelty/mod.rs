//! Repeat-avoidance around the generation collaborator
//!
//! [`select_novel`] calls the generator until it produces a candidate that
//! is not too similar to the previously accepted character, or until the
//! attempt budget runs out. In the latter case the last candidate is
//! accepted anyway: novelty is best-effort, not guaranteed. Generator
//! failures are never retried.

mod similarity;
mod store;

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use crate::character::{CharacterTraits, GeneratedCharacter};
use crate::client::ClientKey;
use crate::difficulty::Difficulty;
use crate::error::GenerationError;
use crate::generator::CharacterGenerator;

pub use similarity::{
    DEFAULT_SIMILARITY_THRESHOLD, SimilarityPolicy, core_noun, dice_coefficient,
    is_valid_threshold,
};
pub use store::{LastAcceptedStore, NoveltyScope};

/// Default number of generator calls per selection
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default per-call limit on the generation collaborator
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Novelty selector settings
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    pub max_attempts: u32,
    pub policy: SimilarityPolicy,
    pub scope: NoveltyScope,
    /// Clients remembered in per-client scope before eviction
    pub capacity: usize,
    /// Limit on each generator call; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            policy: SimilarityPolicy::default(),
            scope: NoveltyScope::default(),
            capacity: crate::rate::DEFAULT_CAPACITY,
            timeout: Some(DEFAULT_GENERATION_TIMEOUT),
        }
    }
}

/// The accepted candidate and how it was reached
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub character: GeneratedCharacter,
    /// Generator calls made, in `1..=max_attempts`
    pub attempts: u32,
    /// False when the budget ran out on a candidate still judged similar
    pub novel: bool,
}

/// Run the bounded retry loop
///
/// `generate` is called at least once and at most `max_attempts` times
/// (a budget of 0 is treated as 1). The first error ends the selection.
pub async fn select_novel<F, Fut>(
    mut generate: F,
    last_accepted: Option<&CharacterTraits>,
    policy: &SimilarityPolicy,
    max_attempts: u32,
    timeout: Option<Duration>,
) -> Result<Selection, GenerationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<GeneratedCharacter, GenerationError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;

        let candidate = match timeout {
            Some(limit) => tokio::time::timeout(limit, generate())
                .await
                .map_err(|_| GenerationError::Timeout(limit))??,
            None => generate().await?,
        };

        let too_similar =
            last_accepted.is_some_and(|last| policy.too_similar(&candidate.traits(), last));

        if !too_similar || attempts >= max_attempts {
            return Ok(Selection {
                character: candidate,
                attempts,
                novel: !too_similar,
            });
        }

        debug!(
            attempt = attempts,
            role = %candidate.role,
            policy = policy.name(),
            "candidate too similar to previous character, retrying"
        );
    }
}

/// Novelty selection with remembered state
pub struct NoveltySelector {
    policy: SimilarityPolicy,
    max_attempts: u32,
    timeout: Option<Duration>,
    store: LastAcceptedStore,
}

impl NoveltySelector {
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            policy: config.policy,
            max_attempts: config.max_attempts,
            timeout: config.timeout,
            store: LastAcceptedStore::new(config.scope, config.capacity),
        }
    }

    pub fn policy(&self) -> &SimilarityPolicy {
        &self.policy
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn scope(&self) -> NoveltyScope {
        self.store.scope()
    }

    /// Last accepted traits visible to `key`
    pub fn last_accepted(&self, key: &ClientKey) -> Option<CharacterTraits> {
        self.store.get(key)
    }

    /// Overwrite the last accepted traits for `key`'s scope
    pub fn remember(&self, key: &ClientKey, traits: CharacterTraits) {
        self.store.set(key, traits);
    }

    /// Select a character for `key` and record it as last accepted
    pub async fn select(
        &self,
        key: &ClientKey,
        generator: &dyn CharacterGenerator,
        difficulty: Difficulty,
    ) -> Result<Selection, GenerationError> {
        let last = self.store.get(key);

        let selection = select_novel(
            || generator.generate(difficulty),
            last.as_ref(),
            &self.policy,
            self.max_attempts,
            self.timeout,
        )
        .await?;

        self.store.set(key, selection.character.traits());

        info!(
            client = %key,
            difficulty = difficulty.level(),
            role = %selection.character.role,
            attempts = selection.attempts,
            novel = selection.novel,
            "character selected"
        );

        Ok(selection)
    }
}

impl Default for NoveltySelector {
    fn default() -> Self {
        Self::new(SelectionConfig::default())
    }
}
