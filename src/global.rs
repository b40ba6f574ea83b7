//! A process-wide default [`Session`] behind free functions.
//!
//! The functions here lock one shared session, so they suit test runners that
//! call them one test at a time. Tests running on several threads should each
//! own a [`Session`] instead.

use crate::{
    session::{Session, SessionError},
    tree::{CopyOptions, CopySpec, Tree},
};
use std::{
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError, TryLockError},
};

lazy_static::lazy_static! {
    static ref DEFAULT_SESSION: Mutex<Session> = Mutex::new(Session::new());

    static ref SHUTDOWN_HOOK_REGISTERED: bool = {
        // SAFETY: `cleanup_on_exit` is a plain `extern "C" fn()` that never unwinds.
        unsafe { libc::atexit(cleanup_on_exit) == 0 }
    };
}

fn default_session() -> MutexGuard<'static, Session> {
    DEFAULT_SESSION
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

extern "C" fn cleanup_on_exit() {
    // never block process exit on a lock held by another thread
    let mut session = match DEFAULT_SESSION.try_lock() {
        Ok(guard) => guard,
        Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        Err(TryLockError::WouldBlock) => return,
    };

    session.reset();
}

/// Materializes `tree` with the default session, tearing down its previous root.
///
/// # Errors
///
/// See [`Session::materialize`].
pub fn materialize(tree: &Tree) -> Result<PathBuf, SessionError> {
    default_session().materialize(tree)
}

/// Removes the root created by the last [`materialize`] call, if any.
pub fn reset() {
    default_session().reset();
}

#[doc(hidden)]
pub fn restore() {
    reset();
}

/// Root currently held by the default session.
pub fn root() -> Option<PathBuf> {
    default_session().root().map(|root| root.to_path_buf())
}

/// Builds a [`CopySpec`] that copies `source` recursively. Performs no I/O.
pub fn copy<P: Into<PathBuf>>(source: P) -> CopySpec {
    CopySpec::new(source)
}

pub fn copy_with<P: Into<PathBuf>>(source: P, options: CopyOptions) -> CopySpec {
    CopySpec::with_options(source, options)
}

#[doc(hidden)]
pub fn load<P: Into<PathBuf>>(source: P) -> CopySpec {
    copy(source)
}

#[doc(hidden)]
pub fn load_with<P: Into<PathBuf>>(source: P, options: CopyOptions) -> CopySpec {
    copy_with(source, options)
}

/// Arranges for [`reset`] to run once when the process exits normally.
///
/// Call it once at startup; later calls are no-ops. Only the default session is
/// covered, owned [`Session`]s clean up when dropped.
///
/// # Errors
///
/// Returns [`SessionError::ShutdownHook`] if the exit hook could not be installed.
pub fn register_cleanup_on_shutdown() -> Result<(), SessionError> {
    if *SHUTDOWN_HOOK_REGISTERED {
        log::debug!("...cleanup on shutdown registered");
        Ok(())
    } else {
        Err(SessionError::ShutdownHook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_copy_and_load_build_the_same_spec() {
        assert_eq!(copy("some/dir"), load("some/dir"));
        assert!(copy("some/dir").options().recursive);

        let flat = CopyOptions { recursive: false };
        assert_eq!(copy_with("f", flat), load_with("f", flat));
        assert_eq!(copy_with("f", flat).source(), Path::new("f"));
        assert!(!load_with("f", flat).options().recursive);
    }
}
