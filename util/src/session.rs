//! Session management
//!
//! A session is one run of an executable. Each session gets its own directory
//! under the software root holding the log file and the module archives, and
//! fixes the epoch that log timestamps are measured from.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal imports
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Timestamp appended to session directory names, see
/// https://docs.rs/chrono/0.4.11/chrono/format/strftime/index.html
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the archive directory inside a session.
const ARCH_DIR_NAME: &str = "arch";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Directories and files belonging to the current session
#[derive(Clone, Debug)]
pub struct Session {
    /// The root directory for this session
    pub session_root: PathBuf,

    /// The root directory for this session's archives
    pub arch_root: PathBuf,

    /// The path to the session's log file
    pub log_file_path: PathBuf,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors associated with the session module.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (ORION_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error(
        "A session has already been started in this process (conquer_once error: {0})"
    )]
    CannotInitEpoch(conquer_once::TryInitError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start the session for this process.
    ///
    /// Sets the session epoch and creates
    /// `$ORION_SW_ROOT/{sessions_dir}/{exec_name}_{timestamp}`. Can only be
    /// called once per process.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let epoch = Utc::now();
        SESSION_EPOCH
            .try_init_once(|| epoch)
            .map_err(SessionError::CannotInitEpoch)?;

        let mut sessions_root = crate::host::get_sw_root()
            .map_err(|_| SessionError::SwRootNotSet)?;
        sessions_root.push(sessions_dir);

        let dir_name = format!("{}_{}", exec_name, epoch.format(TIMESTAMP_FORMAT));

        Self::create(&sessions_root, &dir_name, exec_name)
    }

    /// Create the session directory structure `{parent}/{dir_name}` without
    /// touching the session epoch.
    pub fn create(parent: &Path, dir_name: &str, exec_name: &str) -> Result<Self, SessionError> {
        let session_root = parent.join(dir_name);
        let arch_root = session_root.join(ARCH_DIR_NAME);

        // Creating the archive dir creates the session root with it
        fs::create_dir_all(&arch_root).map_err(SessionError::CannotCreateDir)?;

        Ok(Session {
            log_file_path: session_root.join(format!("{}.log", exec_name)),
            session_root,
            arch_root,
        })
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the number of seconds elapsed since the start of the session, or NaN
/// if the elapsed time overflows.
///
/// # Panics
/// - If no session has been started with [`Session::new`].
pub fn get_elapsed_seconds() -> f64 {
    let elapsed = Utc::now() - *get_epoch();

    time::duration_to_seconds(elapsed).unwrap_or(std::f64::NAN)
}

/// Return a reference to the session's epoch.
///
/// # Panics
/// - If no session has been started with [`Session::new`].
pub fn get_epoch() -> &'static DateTime<Utc> {
    match SESSION_EPOCH.get() {
        Some(e) => e,
        None => panic!("Cannot get the session epoch!"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_create_session_dirs() {
        let parent = std::env::temp_dir().join(format!("orion_session_test_{}", std::process::id()));

        let session = Session::create(&parent, "quad_exec_test", "quad_exec").unwrap();

        assert!(session.session_root.is_dir());
        assert!(session.arch_root.is_dir());
        assert_eq!(session.arch_root, parent.join("quad_exec_test").join("arch"));
        assert_eq!(session.log_file_path.file_name().unwrap(), "quad_exec.log");

        // Re-creating an existing session is harmless
        assert!(Session::create(&parent, "quad_exec_test", "quad_exec").is_ok());

        fs::remove_dir_all(parent).ok();
    }
}
