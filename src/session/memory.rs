use super::{SearchSession, SessionError, SessionSlots, SessionStore};

/// In-memory slot, used by headless flows and tests.
///
/// Goes through the same slot encoding as the file store so both behave alike.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slots: Option<SessionSlots>,
    writes: usize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<SearchSession> {
        self.slots.as_ref()?.decode()
    }

    fn save(&mut self, session: &SearchSession) -> Result<(), SessionError> {
        self.slots = Some(SessionSlots::encode(session)?);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.slots = None;
        Ok(())
    }
}
