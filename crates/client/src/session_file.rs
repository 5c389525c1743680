//! JSON file backing for the signed-in session, so a CLI invocation can pick
//! up where the last `login` left off.

use std::{fs, io::ErrorKind, path::PathBuf};

use eyre::WrapErr;
use medimeet_core::{
    errors::{MeetError, MeetResult},
    models::session::Session,
    session::SessionStore,
};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    /// A missing or unreadable file means nobody is signed in.
    fn load(&self) -> MeetResult<Option<Session>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(MeetError::Internal(
                    eyre::Report::new(err)
                        .wrap_err(format!("Failed to read session file {}", self.path.display())),
                ));
            }
        };

        match serde_json::from_str::<Session>(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Ignoring corrupt session file");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> MeetResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(session).wrap_err("Failed to encode session")?;
        fs::write(&self.path, json)
            .wrap_err_with(|| format!("Failed to write session file {}", self.path.display()))?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> MeetResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(MeetError::Internal(
                eyre::Report::new(err)
                    .wrap_err(format!("Failed to remove session file {}", self.path.display())),
            )),
        }
    }
}
