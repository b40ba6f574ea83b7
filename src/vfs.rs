use crate::{
    tree::{Node, Tree},
    utils::normalize_key,
};
use std::path::{Path, PathBuf};

/// What a [`VirtualEntry`] will turn into once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A file holding `len` bytes.
    File { len: usize },
    /// A directory, possibly empty.
    Dir,
    /// An external path copied into place.
    Copy { source: PathBuf, recursive: bool },
}
/// Represents a planned file, directory or copy, relative to the materialized root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEntry {
    /// Relative destination with separators normalized for the host.
    pub destination: PathBuf,
    pub kind: EntryKind,
}
/// A [`Tree`] flattened into the entries it would create, parents before children.
#[derive(Debug, Clone, Default)]
pub struct VirtualFS {
    pub entries: Vec<VirtualEntry>,
}
impl VirtualFS {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_tree(tree: &Tree) -> Self {
        let mut vfs = Self::new();
        vfs.push_tree(Path::new(""), tree);
        vfs
    }

    fn push_tree(&mut self, parent: &Path, tree: &Tree) {
        for (key, node) in tree {
            let destination = parent.join(normalize_key(key));

            match node {
                Node::Content(content) => self.entries.push(VirtualEntry {
                    destination,
                    kind: EntryKind::File { len: content.len() },
                }),
                Node::Copy(spec) => self.entries.push(VirtualEntry {
                    destination,
                    kind: EntryKind::Copy {
                        source: spec.source().to_path_buf(),
                        recursive: spec.options().recursive,
                    },
                }),
                Node::Subtree(subtree) => {
                    self.entries.push(VirtualEntry {
                        destination: destination.clone(),
                        kind: EntryKind::Dir,
                    });
                    self.push_tree(&destination, subtree);
                }
            }
        }
    }
}
