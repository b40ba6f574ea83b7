use crate::{
    errors::{FileOperation, IoError, ParseError},
    tree::{CopyOptions, CopySpec, Node, Tree},
};
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FixtureError {
    #[error("I/O error within fixture domain")]
    #[diagnostic(code(tmptree::fixture::io))]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("Specify one or more files in a [files] table, found {found}")]
    #[diagnostic(
        code(tmptree::fixture::not_a_tree),
        help("`files` must be a table mapping relative paths to contents or nested tables")
    )]
    NotATree { found: String },

    #[error("Files must be a string or buffer, or a nested table: found {found} at '{key}'")]
    #[diagnostic(
        code(tmptree::fixture::bad_node_type),
        help("Use a string for file contents, a table for a directory, or a [[copy]] entry")
    )]
    BadNodeType { key: String, found: String },
}

fn default_recursive() -> bool {
    CopyOptions::default().recursive
}

/// A `[[copy]]` entry: copy `from` into the tree at `to`.
#[derive(Debug, Deserialize, Clone)]
pub struct CopyEntry {
    pub to: String,
    pub from: PathBuf,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    files: Option<toml::Value>,
    #[serde(default)]
    copy: Vec<CopyEntry>,
}

/// A [`Tree`] loaded from a TOML fixture file.
///
/// ```toml
/// [files]
/// "a.txt" = "hi"
///
/// [files.sub]
/// "b.txt" = "yo"
///
/// [[copy]]
/// to = "vendored"
/// from = "../data"
/// ```
///
/// Relative `from` paths are resolved against the directory holding the fixture.
#[derive(Debug, Clone)]
pub struct Fixture {
    tree: Tree,
}
impl Fixture {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FixtureError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

        Self::parse(&content, path, base_dir)
    }

    /// Parses fixture text; relative copy sources are joined onto `base_dir`.
    pub fn from_toml_str<P: AsRef<Path>>(content: &str, base_dir: P) -> Result<Self, FixtureError> {
        Self::parse(content, Path::new("<inline>"), base_dir.as_ref())
    }

    fn parse(content: &str, path: &Path, base_dir: &Path) -> Result<Self, FixtureError> {
        let parsed: FixtureFile = toml::from_str(content)
            .map_err(|error| ParseError::new(path.to_path_buf(), error))?;

        let mut tree = match parsed.files {
            None => Tree::new(),
            Some(toml::Value::Table(table)) => tree_from_table(&table, "")?,
            Some(other) => {
                return Err(FixtureError::NotATree {
                    found: other.type_str().to_string(),
                })
            }
        };

        for entry in parsed.copy {
            let source = base_dir.join(&entry.from);
            let spec = CopySpec::new(source).recursive(entry.recursive);

            if tree.insert(entry.to.clone(), spec).is_some() {
                log::warn!("copy entry '{}' replaces a [files] entry", entry.to);
            }
        }

        log::debug!("...loaded fixture: {} ({} entries)", path.display(), tree.len());

        Ok(Self { tree })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }
}

/// Converts a TOML table into a [`Tree`]: strings are file contents, tables are
/// directories. `parent` is only used to report where a bad value sits.
fn tree_from_table(table: &toml::Table, parent: &str) -> Result<Tree, FixtureError> {
    let mut tree = Tree::new();

    for (key, value) in table {
        let node = match value {
            toml::Value::String(content) => Node::from(content.as_str()),
            toml::Value::Table(nested) => {
                Node::Subtree(tree_from_table(nested, &format!("{parent}{key}/"))?)
            }
            other => {
                return Err(FixtureError::BadNodeType {
                    key: format!("{parent}{key}"),
                    found: other.type_str().to_string(),
                })
            }
        };

        tree.insert(key.clone(), node);
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_strings_and_tables() {
        let fixture = Fixture::from_toml_str(
            r#"
            [files]
            "a.txt" = "hi"
            "foo/bar/baz.txt" = "deep"

            [files.sub]
            "b.txt" = "yo"

            [files.empty]
            "#,
            "",
        )
        .unwrap();

        let tree = fixture.tree();
        assert_eq!(tree.get("a.txt"), Some(&Node::from("hi")));
        assert_eq!(tree.get("foo/bar/baz.txt"), Some(&Node::from("deep")));
        assert_eq!(
            tree.get("sub"),
            Some(&Node::Subtree(Tree::new().file("b.txt", "yo")))
        );
        assert_eq!(tree.get("empty"), Some(&Node::Subtree(Tree::new())));
    }

    #[test]
    fn test_fixture_keeps_file_order() {
        let fixture = Fixture::from_toml_str("[files]\n\"z.txt\" = \"1\"\n\"a.txt\" = \"2\"\n", "")
            .unwrap();

        let keys: Vec<&String> = fixture.tree().iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["z.txt", "a.txt"]);
    }

    #[test]
    fn test_fixture_later_key_wins_on_disk() {
        let base = tempfile::tempdir().unwrap();
        let fixture = Fixture::from_toml_str(
            r#"
            [files]
            "a\\b.txt" = "first"
            "a/b.txt" = "second"
            "#,
            "",
        )
        .unwrap();

        let mut session = crate::session::Session::new().in_dir(base.path());
        let root = session.materialize(fixture.tree()).unwrap();

        assert_eq!(
            fs::read_to_string(root.join("a").join("b.txt")).unwrap(),
            "second"
        );
    }

    #[test]
    fn test_fixture_copy_entries_resolve_against_base_dir() {
        let fixture = Fixture::from_toml_str(
            r#"
            [files]
            "a.txt" = "hi"

            [[copy]]
            to = "vendored"
            from = "data"

            [[copy]]
            to = "single"
            from = "data/one.txt"
            recursive = false
            "#,
            "/fixtures",
        )
        .unwrap();

        let tree = fixture.into_tree();
        assert_eq!(
            tree.get("vendored"),
            Some(&Node::Copy(CopySpec::new(Path::new("/fixtures").join("data"))))
        );
        assert_eq!(
            tree.get("single"),
            Some(&Node::Copy(
                CopySpec::new(Path::new("/fixtures").join("data/one.txt")).recursive(false)
            ))
        );
    }

    #[test]
    fn test_fixture_copy_only_has_no_files_table() {
        let fixture = Fixture::from_toml_str(
            r#"
            [[copy]]
            to = "vendored"
            from = "data"
            "#,
            "",
        )
        .unwrap();

        assert_eq!(fixture.tree().len(), 1);
    }

    #[test]
    fn test_fixture_empty_document_is_an_empty_tree() {
        let fixture = Fixture::from_toml_str("", "").unwrap();

        assert!(fixture.tree().is_empty());
    }

    #[test]
    fn test_fixture_rejects_numbers() {
        let error = Fixture::from_toml_str("[files]\n\"x.txt\" = 123\n", "").unwrap_err();

        match &error {
            FixtureError::BadNodeType { key, found } => {
                assert_eq!(key, "x.txt");
                assert_eq!(found, "integer");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(error
            .to_string()
            .to_lowercase()
            .contains("must be a string or buffer"));
    }

    #[test]
    fn test_fixture_rejects_nested_arrays() {
        let error = Fixture::from_toml_str(
            r#"
            [files.sub]
            "hello.txt" = ["yo"]
            "#,
            "",
        )
        .unwrap_err();

        match error {
            FixtureError::BadNodeType { key, found } => {
                assert_eq!(key, "sub/hello.txt");
                assert_eq!(found, "array");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_fixture_files_must_be_a_table() {
        for text in ["files = \"hi\"", "files = [\"hi\", \"there\"]"] {
            let error = Fixture::from_toml_str(text, "").unwrap_err();

            assert!(matches!(error, FixtureError::NotATree { .. }));
            assert!(error
                .to_string()
                .to_lowercase()
                .contains("specify one or more files"));
        }
    }

    #[test]
    fn test_fixture_invalid_toml() {
        let error = Fixture::from_toml_str("[files\n", "").unwrap_err();

        assert!(matches!(error, FixtureError::Parse(_)));
    }

    #[test]
    fn test_fixture_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let error = Fixture::from_file(dir.path().join("missing.toml")).unwrap_err();

        match error {
            FixtureError::Io(io_error) => {
                assert_eq!(io_error.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
