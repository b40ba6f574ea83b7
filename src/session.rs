use crate::{
    errors::{FileOperation, IoError},
    transactions::{Active, RollbackOperation, Transaction},
    tree::Tree,
    writer::write_tree,
};
use miette::Diagnostic;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

const DEFAULT_PREFIX: &str = "tmptree-";

#[derive(Debug, Error, Diagnostic)]
pub enum SessionError {
    #[error("Specify one or more files in the tree to write to tmp")]
    #[diagnostic(
        code(tmptree::session::missing_tree),
        help("Add at least one file, directory or copy to the tree")
    )]
    MissingTree,

    #[error("I/O error within session domain")]
    #[diagnostic(code(tmptree::session::io))]
    Io(#[from] IoError),

    #[error("Unable to register cleanup on process shutdown")]
    #[diagnostic(
        code(tmptree::session::shutdown_hook),
        help("Call `reset()` yourself once the test run is over")
    )]
    ShutdownHook,
}

/// Owns at most one materialized root at a time.
///
/// Every [`Session::materialize`] call first tears down the previous root, so
/// a session never leaves more than one directory on disk. Dropping the
/// session removes whatever it still holds.
#[derive(Debug)]
pub struct Session {
    root: Option<PathBuf>,
    prefix: String,
    base: Option<PathBuf>,
}
impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
impl Session {
    /// A session creating `tmptree-*` directories in the system temp directory.
    pub fn new() -> Self {
        Self {
            root: None,
            prefix: DEFAULT_PREFIX.to_string(),
            base: None,
        }
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Creates roots below `base` instead of the system temp directory.
    pub fn in_dir<P: Into<PathBuf>>(mut self, base: P) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Path of the currently materialized root, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Writes `tree` into a fresh, uniquely named directory and returns its path.
    ///
    /// The previous root, if any, is removed first. If writing fails part way,
    /// the new directory is removed again and the session is left empty.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if:
    ///
    /// - `tree` has no entries.
    /// - The root cannot be created.
    /// - A file, directory or copy inside the tree cannot be written.
    pub fn materialize(&mut self, tree: &Tree) -> Result<PathBuf, SessionError> {
        self.reset();

        if tree.is_empty() {
            return Err(SessionError::MissingTree);
        }

        let base = self.base.clone().unwrap_or_else(std::env::temp_dir);

        let root = tempfile::Builder::new()
            .prefix(&self.prefix)
            .tempdir_in(&base)
            .map_err(|error| IoError::new(FileOperation::Mkdir, base.clone(), error))?
            .keep();

        log::debug!("...materializing tree into: {}", root.display());

        let mut trx = Transaction::<Active>::new();
        trx.add_operation(RollbackOperation::RemoveDir(root.clone()));

        write_tree(&root, tree)?;

        trx.commit();

        self.root = Some(root.clone());

        Ok(root)
    }

    /// Removes the current root and everything below it.
    ///
    /// Calling this with nothing materialized, or twice in a row, is a no-op.
    /// Removal failures are logged and otherwise ignored.
    pub fn reset(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };

        match fs::remove_dir_all(&root) {
            Ok(()) => log::debug!("...removed root: {}", root.display()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                log::debug!("...root already gone: {}", root.display());
            }
            Err(error) => {
                // a plain file left where the root used to be
                if fs::remove_file(&root).is_err() {
                    log::warn!("unable to remove root '{}': {}", root.display(), error);
                }
            }
        }
    }

    #[doc(hidden)]
    pub fn restore(&mut self) {
        self.reset();
    }

    /// Detaches the current root so that neither [`Session::reset`] nor drop
    /// removes it, and returns its path.
    pub fn keep(&mut self) -> Option<PathBuf> {
        let root = self.root.take();

        if let Some(root) = &root {
            log::debug!("...keeping root: {}", root.display());
        }

        root
    }
}
impl Drop for Session {
    fn drop(&mut self) {
        self.reset();
    }
}
