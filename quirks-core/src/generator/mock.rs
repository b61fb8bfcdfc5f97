//! Scripted generator for tests
//!
//! Queue results with `queue_character()` / `queue_error()`; each call to
//! `generate()` consumes one. A repeating generator answers every call
//! with the same character once the queue is empty.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::CharacterGenerator;
use crate::character::GeneratedCharacter;
use crate::difficulty::Difficulty;
use crate::error::GenerationError;

/// Scripted [`CharacterGenerator`] that counts its calls
#[derive(Default)]
pub struct MockGenerator {
    responses: Mutex<VecDeque<Result<GeneratedCharacter, GenerationError>>>,
    fallback: Option<GeneratedCharacter>,
    delay: Option<Duration>,
    calls: AtomicU32,
    requested: Mutex<Vec<Difficulty>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator that returns `character` whenever the queue is empty
    pub fn repeating(character: GeneratedCharacter) -> Self {
        Self {
            fallback: Some(character),
            ..Self::default()
        }
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_character(&self, character: GeneratedCharacter) {
        lock(&self.responses).push_back(Ok(character));
    }

    pub fn queue_error(&self, error: GenerationError) {
        lock(&self.responses).push_back(Err(error));
    }

    /// Number of `generate()` calls made so far
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Difficulties passed to `generate()`, in call order
    pub fn requested(&self) -> Vec<Difficulty> {
        lock(&self.requested).clone()
    }
}

#[async_trait]
impl CharacterGenerator for MockGenerator {
    async fn generate(&self, difficulty: Difficulty) -> Result<GeneratedCharacter, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.requested).push(difficulty);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = lock(&self.responses).pop_front();
        match next {
            Some(result) => result,
            None => self.fallback.clone().ok_or_else(|| {
                GenerationError::Malformed("no queued response in MockGenerator".to_string())
            }),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn consumes_queue_in_order() {
        let generator = MockGenerator::new();
        generator.queue_character(GeneratedCharacter::new("baker", "a", "b"));
        generator.queue_error(GenerationError::Malformed("bad".to_string()));

        let first = generator.generate(Difficulty::VeryEasy).await.unwrap();
        assert_eq!(first.role, "baker");
        assert!(generator.generate(Difficulty::Medium).await.is_err());
        assert_eq!(generator.calls(), 2);
        assert_eq!(
            generator.requested(),
            vec![Difficulty::VeryEasy, Difficulty::Medium]
        );
    }

    #[tokio::test]
    async fn empty_queue_without_fallback_errors() {
        let generator = MockGenerator::new();
        let err = generator.generate(Difficulty::Hard).await.unwrap_err();
        assert!(err.to_string().contains("no queued response"));
    }

    #[tokio::test]
    async fn repeating_falls_back_after_queue() {
        let generator = MockGenerator::repeating(GeneratedCharacter::new("baker", "a", "b"));
        generator.queue_character(GeneratedCharacter::new("plumber", "c", "d"));

        assert_eq!(generator.generate(Difficulty::Hard).await.unwrap().role, "plumber");
        assert_eq!(generator.generate(Difficulty::Hard).await.unwrap().role, "baker");
        assert_eq!(generator.generate(Difficulty::Hard).await.unwrap().role, "baker");
    }
}
