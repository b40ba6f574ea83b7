use crate::{
    fixture::{self, Fixture},
    preview::preview_as_tree,
    session::{self, Session},
    vfs::VirtualFS,
};
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::Command,
};

/// Environment variable pointing commands started by [`run_fixture`] at their root.
pub const ROOT_ENV_VAR: &str = "TMPTREE_ROOT";

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TmpTreeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Session(#[from] session::SessionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Fixture(#[from] fixture::FixtureError),

    #[error("unable to run '{program}': {source}")]
    #[diagnostic(
        code(tmptree::api::spawn),
        help("Make sure the program exists and is on PATH")
    )]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

fn fixture_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Prints the tree a fixture would create, without touching the disk.
///
/// # Errors
///
/// Returns a [`TmpTreeError`] if the fixture cannot be read or is malformed.
pub fn preview_fixture(path: &Path) -> Result<(), TmpTreeError> {
    let fixture = Fixture::from_file(path)?;

    preview_as_tree(&VirtualFS::from_tree(fixture.tree()), &fixture_name(path));

    Ok(())
}

/// Materializes a fixture and leaves the directory in place, returning its path.
///
/// # Errors
///
/// Returns a [`TmpTreeError`] if:
///
/// - The fixture cannot be read or is malformed.
/// - The fixture describes no files.
/// - A directory, file or copy cannot be written.
pub fn apply_fixture(path: &Path) -> Result<PathBuf, TmpTreeError> {
    let fixture = Fixture::from_file(path)?;

    log::debug!("Attempting to apply fixture: {}", path.display());

    let mut session = Session::new();
    let root = session.materialize(fixture.tree())?;

    Ok(session.keep().unwrap_or(root))
}

/// Materializes a fixture, runs `program` inside it, then removes it again.
///
/// The program runs with the root as working directory and [`ROOT_ENV_VAR`]
/// set. Returns the program's exit code, `1` if it was killed by a signal.
///
/// # Errors
///
/// Returns a [`TmpTreeError`] if the fixture cannot be materialized or the
/// program cannot be started.
pub fn run_fixture(path: &Path, program: &OsStr, args: &[OsString]) -> Result<i32, TmpTreeError> {
    let fixture = Fixture::from_file(path)?;

    let mut session = Session::new();
    let root = session.materialize(fixture.tree())?;

    log::debug!(
        "running '{}' in {}",
        program.to_string_lossy(),
        root.display()
    );

    let status = Command::new(program)
        .args(args)
        .current_dir(&root)
        .env(ROOT_ENV_VAR, &root)
        .status()
        .map_err(|error| TmpTreeError::Spawn {
            program: program.to_string_lossy().to_string(),
            source: error,
        })?;

    session.reset();

    Ok(status.code().unwrap_or(1))
}
