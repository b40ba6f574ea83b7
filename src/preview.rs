use crate::vfs::{EntryKind, VirtualFS};
use colored::Colorize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeStyle {
    Dir,
    File,
    Copy,
}

/// Represents a node in the tree (file, directory or copy).
#[derive(Debug)]
struct TreeNode {
    name: String,
    children: Vec<Rc<RefCell<TreeNode>>>,
    style: NodeStyle,
}
impl TreeNode {
    fn new(name: String, style: NodeStyle) -> Self {
        Self {
            name,
            children: Vec::new(),
            style,
        }
    }
}

fn style_of(kind: &EntryKind) -> NodeStyle {
    match kind {
        EntryKind::File { .. } => NodeStyle::File,
        EntryKind::Dir => NodeStyle::Dir,
        EntryKind::Copy { .. } => NodeStyle::Copy,
    }
}

fn label_of(name: &str, kind: &EntryKind) -> String {
    match kind {
        EntryKind::Copy { source, recursive } => {
            let mode = if *recursive { "" } else { ", flat" };
            format!("{} <- {}{}", name, source.display(), mode)
        }
        _ => name.to_string(),
    }
}

/// Returns the node for `path`, creating any directory nodes on the way that
/// were only implied by multi-segment keys.
fn node_for(
    path: &Path,
    lookup: &mut HashMap<PathBuf, Rc<RefCell<TreeNode>>>,
) -> Rc<RefCell<TreeNode>> {
    if let Some(node) = lookup.get(path) {
        return Rc::clone(node);
    }

    let parent = node_for(path.parent().unwrap_or(Path::new("")), lookup);
    let name = path
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let node = Rc::new(RefCell::new(TreeNode::new(name, NodeStyle::Dir)));

    parent.borrow_mut().children.push(Rc::clone(&node));
    lookup.insert(path.to_path_buf(), Rc::clone(&node));

    node
}

/// Build the directory tree from the VFS entries, returning the root node.
fn build_tree(vfs: &VirtualFS, root_name: &str) -> Rc<RefCell<TreeNode>> {
    let root = Rc::new(RefCell::new(TreeNode::new(
        root_name.to_string(),
        NodeStyle::Dir,
    )));

    // map relative path to node, the root lives at the empty path
    let mut lookup: HashMap<PathBuf, Rc<RefCell<TreeNode>>> = HashMap::new();
    lookup.insert(PathBuf::new(), Rc::clone(&root));

    for entry in &vfs.entries {
        let Some(file_name) = entry.destination.file_name() else {
            log::debug!("skipping entry without a name: {:?}", entry.destination);
            continue;
        };
        let name = file_name.to_string_lossy().to_string();

        // later keys may point at a directory already implied by an earlier one
        if let Some(existing) = lookup.get(&entry.destination) {
            let mut existing = existing.borrow_mut();
            existing.style = style_of(&entry.kind);
            existing.name = label_of(&name, &entry.kind);
            continue;
        }

        let parent = node_for(
            entry.destination.parent().unwrap_or(Path::new("")),
            &mut lookup,
        );

        let new_child = Rc::new(RefCell::new(TreeNode::new(
            label_of(&name, &entry.kind),
            style_of(&entry.kind),
        )));

        parent.borrow_mut().children.push(Rc::clone(&new_child));

        lookup.insert(entry.destination.clone(), new_child);
    }

    root
}

/// Write the tree with a nice ASCII style.
fn write_node(out: &mut String, node: &Rc<RefCell<TreeNode>>, prefix: &str, is_last: bool) {
    let node_borrow = node.borrow();

    let connector = if is_last {
        "└── ".yellow()
    } else {
        "├── ".yellow()
    };
    let name = match node_borrow.style {
        NodeStyle::Dir => node_borrow.name.blue(),
        NodeStyle::File => node_borrow.name.green(),
        NodeStyle::Copy => node_borrow.name.cyan(),
    };
    let _ = writeln!(out, "{}{}{}", prefix.yellow(), connector, name);

    let child_prefix = if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let len = node_borrow.children.len();
    for (i, child) in node_borrow.children.iter().enumerate() {
        let last = i == len - 1;
        write_node(out, child, &child_prefix, last);
    }
}

/// Renders the planned entries below a root called `root_name`.
pub fn render_tree(vfs: &VirtualFS, root_name: &str) -> String {
    let tree_root = build_tree(vfs, root_name);

    let mut out = String::new();
    write_node(&mut out, &tree_root, "", true);

    out
}

pub fn preview_as_tree(vfs: &VirtualFS, root_name: &str) {
    println!(
        "Legend: {} = (directory), {} = (file), {} = (copy)",
        "blue".blue(),
        "green".green(),
        "cyan".cyan()
    );

    let fancy_prompt = format!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Preview".bold().bright_blue(),
    );

    println!("{}", fancy_prompt);

    print!("{}", render_tree(vfs, root_name));
}
