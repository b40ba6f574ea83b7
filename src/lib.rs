//! Write a declarative tree of files and directories into a throwaway temp
//! directory, and remove it again when the test is done.
//!
//! ```rust
//! use std::fs;
//! use tmptree::{Session, Tree};
//!
//! let mut session = Session::new();
//! let root = session
//!     .materialize(
//!         &Tree::new()
//!             .file("a.txt", "hi")
//!             .dir("sub", Tree::new().file("b.txt", "yo")),
//!     )
//!     .unwrap();
//!
//! assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "hi");
//! assert_eq!(fs::read_to_string(root.join("sub").join("b.txt")).unwrap(), "yo");
//!
//! session.reset();
//! assert!(!root.exists());
//! ```
pub mod api;
pub mod errors;
pub mod fixture;
pub mod global;
pub mod preview;
pub mod session;
mod transactions;
pub mod tree;
pub mod utils;
pub mod vfs;
mod writer;

pub use errors::{FileOperation, IoError};
pub use fixture::{Fixture, FixtureError};
#[doc(hidden)]
pub use global::{load, load_with, restore};
pub use global::{copy, copy_with, materialize, register_cleanup_on_shutdown, reset, root};
pub use session::{Session, SessionError};
pub use tree::{CopyOptions, CopySpec, Node, Tree};
