use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Options recognised by a [`CopySpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    /// Copy directory sources together with everything below them.
    pub recursive: bool,
}
impl Default for CopyOptions {
    fn default() -> Self {
        Self { recursive: true }
    }
}

/// Instructs the materializer to copy an existing file or directory instead of
/// writing literal content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySpec {
    source: PathBuf,
    options: CopyOptions,
}
impl CopySpec {
    pub fn new<P: Into<PathBuf>>(source: P) -> Self {
        Self::with_options(source, CopyOptions::default())
    }

    pub fn with_options<P: Into<PathBuf>>(source: P, options: CopyOptions) -> Self {
        Self {
            source: source.into(),
            options,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.options.recursive = recursive;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn options(&self) -> CopyOptions {
        self.options
    }
}

/// One value in a [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Bytes written verbatim to a file.
    Content(Vec<u8>),
    /// A directory; an empty tree is an empty directory.
    Subtree(Tree),
    /// An external path copied into place.
    Copy(CopySpec),
}
impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Content(value.as_bytes().to_vec())
    }
}
impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Content(value.into_bytes())
    }
}
impl From<&[u8]> for Node {
    fn from(value: &[u8]) -> Self {
        Self::Content(value.to_vec())
    }
}
impl<const N: usize> From<&[u8; N]> for Node {
    fn from(value: &[u8; N]) -> Self {
        Self::Content(value.to_vec())
    }
}
impl From<Vec<u8>> for Node {
    fn from(value: Vec<u8>) -> Self {
        Self::Content(value)
    }
}
impl From<Tree> for Node {
    fn from(value: Tree) -> Self {
        Self::Subtree(value)
    }
}
impl From<CopySpec> for Node {
    fn from(value: CopySpec) -> Self {
        Self::Copy(value)
    }
}

/// Declarative description of files and directories, keyed by relative path.
///
/// Keys may span several segments (`"foo/bar/baz.txt"`) and may use either
/// slash style. Entries are written in insertion order.
///
/// # Example
///
/// ```rust
/// use tmptree::{Tree, copy};
///
/// let tree = Tree::new()
///     .file("a.txt", "hi")
///     .dir("sub", Tree::new().file("b.txt", b"yo"))
///     .dir("empty", Tree::new())
///     .copy("vendored", copy("/some/existing/dir"));
///
/// assert_eq!(tree.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree(IndexMap<String, Node>);
impl Tree {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Adds any node under `key`, replacing an existing entry with the same key.
    pub fn with<K: Into<String>, N: Into<Node>>(mut self, key: K, node: N) -> Self {
        self.insert(key, node);
        self
    }

    pub fn file<K: Into<String>, C: Into<Node>>(self, key: K, content: C) -> Self {
        self.with(key, content)
    }

    pub fn dir<K: Into<String>>(self, key: K, tree: Tree) -> Self {
        self.with(key, Node::Subtree(tree))
    }

    pub fn copy<K: Into<String>>(self, key: K, spec: CopySpec) -> Self {
        self.with(key, Node::Copy(spec))
    }

    pub fn insert<K: Into<String>, N: Into<Node>>(&mut self, key: K, node: N) -> Option<Node> {
        self.0.insert(key.into(), node.into())
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Node> {
        self.0.iter()
    }
}
impl<K: Into<String>, N: Into<Node>> FromIterator<(K, N)> for Tree {
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        for (key, node) in iter {
            tree.insert(key, node);
        }
        tree
    }
}
impl<K: Into<String>, N: Into<Node>, const M: usize> From<[(K, N); M]> for Tree {
    fn from(entries: [(K, N); M]) -> Self {
        entries.into_iter().collect()
    }
}
impl<'a> IntoIterator for &'a Tree {
    type Item = (&'a String, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
