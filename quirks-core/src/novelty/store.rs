//! Storage for the last accepted character per continuity scope

use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;

use crate::character::CharacterTraits;
use crate::client::ClientKey;

/// Who shares a "last accepted" slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoveltyScope {
    /// One slot for the whole process; every client sees the others' output
    Global,
    /// One slot per client key
    #[default]
    PerClient,
}

impl NoveltyScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoveltyScope::Global => "global",
            NoveltyScope::PerClient => "per_client",
        }
    }
}

impl FromStr for NoveltyScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(NoveltyScope::Global),
            "per_client" | "per-client" => Ok(NoveltyScope::PerClient),
            other => Err(format!("unknown novelty scope: {}", other)),
        }
    }
}

enum Slots {
    Global(Option<CharacterTraits>),
    PerClient(LruCache<ClientKey, CharacterTraits>),
}

/// Last accepted traits, held either globally or per client
///
/// Reads return a snapshot; nothing is held while a generation call is in
/// flight, so two requests in the same scope may compare against the same
/// snapshot and the later write wins.
pub struct LastAcceptedStore {
    slots: Mutex<Slots>,
}

impl LastAcceptedStore {
    pub fn new(scope: NoveltyScope, capacity: usize) -> Self {
        let slots = match scope {
            NoveltyScope::Global => Slots::Global(None),
            NoveltyScope::PerClient => {
                let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
                Slots::PerClient(LruCache::new(capacity))
            }
        };
        Self {
            slots: Mutex::new(slots),
        }
    }

    pub fn scope(&self) -> NoveltyScope {
        match &*self.lock() {
            Slots::Global(_) => NoveltyScope::Global,
            Slots::PerClient(_) => NoveltyScope::PerClient,
        }
    }

    pub fn get(&self, key: &ClientKey) -> Option<CharacterTraits> {
        match &mut *self.lock() {
            Slots::Global(slot) => slot.clone(),
            Slots::PerClient(cache) => cache.get(key).cloned(),
        }
    }

    pub fn set(&self, key: &ClientKey, traits: CharacterTraits) {
        match &mut *self.lock() {
            Slots::Global(slot) => *slot = Some(traits),
            Slots::PerClient(cache) => {
                cache.put(key.clone(), traits);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baker() -> CharacterTraits {
        CharacterTraits::new("baker", "hums", "early riser")
    }

    #[test]
    fn starts_empty() {
        let store = LastAcceptedStore::new(NoveltyScope::PerClient, 10);
        assert!(store.get(&ClientKey::from("a")).is_none());

        let store = LastAcceptedStore::new(NoveltyScope::Global, 10);
        assert!(store.get(&ClientKey::from("a")).is_none());
    }

    #[test]
    fn global_scope_is_shared_between_clients() {
        let store = LastAcceptedStore::new(NoveltyScope::Global, 10);
        store.set(&ClientKey::from("a"), baker());
        assert_eq!(store.get(&ClientKey::from("b")), Some(baker()));
        assert_eq!(store.scope(), NoveltyScope::Global);
    }

    #[test]
    fn per_client_scope_isolates_clients() {
        let store = LastAcceptedStore::new(NoveltyScope::PerClient, 10);
        store.set(&ClientKey::from("a"), baker());
        assert_eq!(store.get(&ClientKey::from("a")), Some(baker()));
        assert!(store.get(&ClientKey::from("b")).is_none());
        assert_eq!(store.scope(), NoveltyScope::PerClient);
    }

    #[test]
    fn per_client_scope_is_bounded() {
        let store = LastAcceptedStore::new(NoveltyScope::PerClient, 1);
        store.set(&ClientKey::from("a"), baker());
        store.set(&ClientKey::from("b"), baker());
        assert!(store.get(&ClientKey::from("a")).is_none());
        assert!(store.get(&ClientKey::from("b")).is_some());
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = LastAcceptedStore::new(NoveltyScope::Global, 1);
        let key = ClientKey::from("a");
        store.set(&key, baker());
        let plumber = CharacterTraits::new("plumber", "x", "y");
        store.set(&key, plumber.clone());
        assert_eq!(store.get(&key), Some(plumber));
    }

    #[test]
    fn scope_parses_from_config_names() {
        assert_eq!("global".parse::<NoveltyScope>(), Ok(NoveltyScope::Global));
        assert_eq!(
            "per-client".parse::<NoveltyScope>(),
            Ok(NoveltyScope::PerClient)
        );
        assert!("session".parse::<NoveltyScope>().is_err());
        assert_eq!(NoveltyScope::default().as_str(), "per_client");
    }
}
