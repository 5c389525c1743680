//! # Session Context
//!
//! The signed-in user is loaded once at startup from a [`SessionStore`] and
//! handed to whoever needs it as an explicit [`SessionContext`]. Nothing else
//! reads the store directly.
//!
//! The context is invalidated when the backend answers 401, which clears the
//! persisted copy as well.

use std::sync::{Mutex, RwLock};

use tracing::{info, warn};

use crate::{
    errors::{MeetError, MeetResult},
    models::session::{Role, Session},
};

/// Persistent backing for the signed-in session.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> MeetResult<Option<Session>>;
    fn save(&self, session: &Session) -> MeetResult<()>;
    fn clear(&self) -> MeetResult<()>;
}

/// Keeps the session in process memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> MeetResult<Option<Session>> {
        let guard = self
            .session
            .lock()
            .map_err(|_| MeetError::Internal(eyre::eyre!("session store lock poisoned")))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> MeetResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| MeetError::Internal(eyre::eyre!("session store lock poisoned")))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> MeetResult<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| MeetError::Internal(eyre::eyre!("session store lock poisoned")))?;
        *guard = None;
        Ok(())
    }
}

pub struct SessionContext {
    store: Box<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl SessionContext {
    /// Reads the store once. Later reads go through the context.
    pub fn load(store: impl SessionStore + 'static) -> MeetResult<Self> {
        let current = store.load()?;
        if let Some(session) = &current {
            info!(email = %session.email, role = %session.role, "Restored session");
        }
        Ok(Self {
            store: Box::new(store),
            current: RwLock::new(current),
        })
    }

    pub fn current(&self) -> Option<Session> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.current().map(|session| session.token)
    }

    /// The current session, or an authentication error asking the user to log in.
    pub fn require(&self) -> MeetResult<Session> {
        self.current()
            .ok_or_else(|| MeetError::Authentication("Please log in to continue".into()))
    }

    pub fn require_role(&self, role: Role) -> MeetResult<Session> {
        let session = self.require()?;
        if session.role != role {
            return Err(MeetError::Authorization(format!(
                "This action requires the {} role",
                role
            )));
        }
        Ok(session)
    }

    pub fn establish(&self, session: Session) -> MeetResult<()> {
        self.store.save(&session)?;
        info!(email = %session.email, role = %session.role, "Session established");
        self.replace(Some(session));
        Ok(())
    }

    /// Forgets the session both in memory and in the store.
    pub fn invalidate(&self) -> MeetResult<()> {
        if self.is_authenticated() {
            warn!("Invalidating session");
        }
        self.replace(None);
        self.store.clear()
    }

    fn replace(&self, session: Option<Session>) {
        match self.current.write() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }
}
