use crate::{
    errors::{FileOperation, IoError},
    tree::{CopySpec, Node, Tree},
    utils::normalize_key,
};
use std::{fs, io, path::Path};
use walkdir::WalkDir;

/// Writes every entry of `tree` below `directory`, depth first, in insertion order.
pub fn write_tree(directory: &Path, tree: &Tree) -> Result<(), IoError> {
    for (key, node) in tree {
        let destination = directory.join(normalize_key(key));

        match node {
            Node::Copy(spec) => copy_path(spec, &destination)?,
            Node::Content(content) => {
                if let Some(parent) = destination.parent() {
                    create_directory(parent)?;
                }

                write_file(&destination, content)?;
            }
            Node::Subtree(subtree) => {
                create_directory(&destination)?;

                write_tree(&destination, subtree)?;
            }
        }
    }

    Ok(())
}
/// Copies the source of a [`CopySpec`] to `destination`.
///
/// A file source is copied as a single file. A directory source is reproduced
/// entry by entry when the spec is recursive and rejected otherwise. Existing
/// directories at the destination are merged into, existing files overwritten.
///
/// # Errors
///
/// Returns an [`IoError`] carrying the untouched [`io::Error`] when the source
/// is missing or unreadable, or when anything cannot be created or copied.
pub fn copy_path(spec: &CopySpec, destination: &Path) -> Result<(), IoError> {
    let source = spec.source();

    let metadata = fs::metadata(source)
        .map_err(|error| IoError::new(FileOperation::Read, source.to_path_buf(), error))?;

    if let Some(parent) = destination.parent() {
        create_directory(parent)?;
    }

    if !metadata.is_dir() {
        return copy_file(source, destination);
    }

    if !spec.options().recursive {
        return Err(IoError::new(
            FileOperation::Copy,
            source.to_path_buf(),
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "source is a directory; copy it with `recursive` enabled",
            ),
        ));
    }

    log::debug!(
        "...copying tree: {} -> {}",
        source.display(),
        destination.display()
    );

    for entry in WalkDir::new(source) {
        let entry = match entry {
            Ok(e) => e,
            Err(error) => {
                let path = error.path().unwrap_or(source).to_path_buf();

                Err(IoError::new(FileOperation::Read, path, error.into()))?
            }
        };

        // walkdir only yields paths below `source`
        let relative = entry.path().strip_prefix(source).unwrap_or(Path::new(""));
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            create_directory(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }

    Ok(())
}
/// Creates all directories in the specified path if they do not exist.
fn create_directory(path: &Path) -> Result<(), IoError> {
    fs::create_dir_all(path)
        .map_err(|error| IoError::new(FileOperation::Mkdir, path.into(), error))?;

    log::debug!("...created dir: {}", path.display());

    Ok(())
}
/// Writes `contents` to `path`, replacing whatever was there.
fn write_file(path: &Path, contents: &[u8]) -> Result<(), IoError> {
    fs::write(path, contents)
        .map_err(|error| IoError::new(FileOperation::Write, path.into(), error))?;

    log::debug!("...wrote file: {} ({} bytes)", path.display(), contents.len());

    Ok(())
}
fn copy_file(source: &Path, destination: &Path) -> Result<(), IoError> {
    fs::copy(source, destination)
        .map_err(|error| IoError::new(FileOperation::Copy, source.into(), error))?;

    log::debug!(
        "...copied file: {} -> {}",
        source.display(),
        destination.display()
    );

    Ok(())
}
