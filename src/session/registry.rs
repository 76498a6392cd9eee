//! Keyed store of live sessions.
//!
//! Sessions live in an arena of slots addressed through a key index, with a
//! free list for reuse. The registry lock is held only for bookkeeping; each
//! session has its own lock, which serializes moves for that key.

use super::types::{GameSession, SessionKey};
use crate::core::GameError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub type SessionHandle = Arc<Mutex<GameSession>>;

struct Slot {
    id: Uuid,
    key: SessionKey,
    session: SessionHandle,
}

#[derive(Default)]
struct Arena {
    slots: Vec<Option<Slot>>,
    index: HashMap<SessionKey, usize>,
    free: Vec<usize>,
}

impl Arena {
    fn release(&mut self, idx: usize) -> Option<Slot> {
        let slot = self.slots.get_mut(idx)?.take()?;
        self.index.remove(&slot.key);
        self.free.push(idx);
        Some(slot)
    }
}

#[derive(Default)]
pub struct Registry {
    arena: Mutex<Arena>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new session. Fails if its key already has a live session.
    pub fn insert(&self, session: GameSession) -> Result<SessionHandle, GameError> {
        let mut arena = self.arena.lock();
        if arena.index.contains_key(&session.key) {
            return Err(GameError::SessionAlreadyActive {
                variant: session.key.variant,
            });
        }

        let id = session.id;
        let key = session.key.clone();
        let handle = Arc::new(Mutex::new(session));
        let slot = Slot {
            id,
            key: key.clone(),
            session: Arc::clone(&handle),
        };
        let idx = match arena.free.pop() {
            Some(idx) => {
                arena.slots[idx] = Some(slot);
                idx
            }
            None => {
                arena.slots.push(Some(slot));
                arena.slots.len() - 1
            }
        };
        arena.index.insert(key, idx);
        Ok(handle)
    }

    pub fn contains(&self, key: &SessionKey) -> bool {
        self.arena.lock().index.contains_key(key)
    }

    /// Check out a session handle and its id.
    pub fn get(&self, key: &SessionKey) -> Option<(Uuid, SessionHandle)> {
        let arena = self.arena.lock();
        let idx = *arena.index.get(key)?;
        arena.slots[idx]
            .as_ref()
            .map(|slot| (slot.id, Arc::clone(&slot.session)))
    }

    /// True while `key` still maps to the session `id`.
    pub fn is_current(&self, key: &SessionKey, id: Uuid) -> bool {
        let arena = self.arena.lock();
        arena
            .index
            .get(key)
            .and_then(|&idx| arena.slots[idx].as_ref())
            .is_some_and(|slot| slot.id == id)
    }

    /// Remove the session `id` under `key`. Removing twice is a no-op.
    pub fn remove(&self, key: &SessionKey, id: Uuid) -> bool {
        let mut arena = self.arena.lock();
        let idx = match arena.index.get(key) {
            Some(&idx) => idx,
            None => return false,
        };
        if arena.slots[idx].as_ref().map(|slot| slot.id) != Some(id) {
            return false;
        }
        arena.release(idx).is_some()
    }

    /// Remove whatever session `key` maps to.
    pub fn remove_key(&self, key: &SessionKey) -> Option<Uuid> {
        let mut arena = self.arena.lock();
        let idx = *arena.index.get(key)?;
        arena.release(idx).map(|slot| slot.id)
    }

    /// Remove every session idle for at least `timeout`.
    ///
    /// Sessions locked by an in-flight move are skipped. Boards are never touched.
    pub fn sweep(&self, now: DateTime<Utc>, timeout: chrono::Duration) -> Vec<SessionKey> {
        let mut arena = self.arena.lock();
        let expired: Vec<usize> = arena
            .slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let slot = slot.as_ref()?;
                let session = slot.session.try_lock()?;
                session.is_idle(now, timeout).then_some(idx)
            })
            .collect();

        expired
            .into_iter()
            .filter_map(|idx| arena.release(idx).map(|slot| slot.key))
            .collect()
    }

    /// Number of live sessions.
    pub fn count(&self) -> usize {
        self.arena.lock().index.len()
    }
}
