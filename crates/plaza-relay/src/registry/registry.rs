//! Session registry
//!
//! Maps session IDs to their state and outbound queue. The registry itself
//! is not synchronized; `SessionRelay` owns it behind a lock and is the only
//! code that touches it.

use crate::protocol::GatewayMessage;
use crate::session::{ClientSession, PlayerState, SessionId};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::mpsc;

/// Sending half of a connection's outbound queue
pub type Outbound = mpsc::Sender<GatewayMessage>;

/// One registered session and the queue used to reach it
#[derive(Debug)]
pub(crate) struct RegistryEntry {
    pub(crate) session: ClientSession,
    pub(crate) outbound: Outbound,
}

/// All currently connected sessions
#[derive(Debug, Default)]
pub struct Registry {
    sessions: HashMap<SessionId, RegistryEntry>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick an ID not currently in use
    pub fn allocate_id(&self) -> SessionId {
        loop {
            let id = SessionId::generate();
            if !self.sessions.contains_key(&id) {
                return id;
            }
        }
    }

    /// Register a session with its outbound queue
    ///
    /// Returns `false` (and leaves the registry untouched) if the ID is taken.
    pub fn insert(&mut self, session: ClientSession, outbound: Outbound) -> bool {
        if self.sessions.contains_key(&session.id) {
            return false;
        }
        self.sessions
            .insert(session.id.clone(), RegistryEntry { session, outbound });
        true
    }

    /// Overwrite a session's state
    ///
    /// Returns `false` if the session is not registered.
    pub fn update(&mut self, id: &SessionId, state: PlayerState) -> bool {
        match self.sessions.get_mut(id) {
            Some(entry) => {
                entry.session.apply(state);
                true
            }
            None => false,
        }
    }

    /// Remove a session, dropping its outbound queue handle
    pub fn remove(&mut self, id: &SessionId) -> Option<ClientSession> {
        self.sessions.remove(id).map(|entry| entry.session)
    }

    /// State of every session except `exclude`
    #[must_use]
    pub fn snapshot_except(&self, exclude: &SessionId) -> BTreeMap<SessionId, PlayerState> {
        self.sessions
            .values()
            .filter(|entry| &entry.session.id != exclude)
            .map(|entry| (entry.session.id.clone(), entry.session.state()))
            .collect()
    }

    /// Copy of one session
    #[must_use]
    pub fn get(&self, id: &SessionId) -> Option<ClientSession> {
        self.sessions.get(id).map(|entry| entry.session.clone())
    }

    /// Copy of every session
    #[must_use]
    pub fn sessions(&self) -> Vec<ClientSession> {
        self.sessions.values().map(|entry| entry.session.clone()).collect()
    }

    /// Check if a session is registered
    #[must_use]
    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Outbound queue of one session
    pub(crate) fn outbound(&self, id: &SessionId) -> Option<&Outbound> {
        self.sessions.get(id).map(|entry| &entry.outbound)
    }

    /// Iterate over every registered entry
    pub(crate) fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.sessions.values()
    }

    /// Number of registered sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if no sessions are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Remove every session, returning how many were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.sessions.len();
        self.sessions.clear();
        count
    }
}
