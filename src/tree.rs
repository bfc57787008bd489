//! In-memory directory tree used to preview a dry run.
//!
//! Planned destinations are added one path at a time; the tree can then be
//! rendered with box-drawing prefixes. Children are kept sorted by name so the
//! rendered text is identical for identical input.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// A file or directory in a [`DirectoryTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    name: String,
    children: BTreeMap<String, DirectoryNode>,
    is_file: bool,
}

impl DirectoryNode {
    fn directory(name: String) -> Self {
        Self {
            name,
            children: BTreeMap::new(),
            is_file: false,
        }
    }

    fn file(name: String) -> Self {
        Self {
            is_file: true,
            ..Self::directory(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    /// Looks up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&DirectoryNode> {
        self.children.get(name)
    }

    /// Direct children in name order.
    pub fn children(&self) -> impl Iterator<Item = &DirectoryNode> {
        self.children.values()
    }

    fn label(&self) -> String {
        if self.is_file {
            self.name.clone()
        } else {
            format!("{}/", self.name)
        }
    }

    fn file_count(&self) -> usize {
        let own = usize::from(self.is_file);
        own + self.children.values().map(Self::file_count).sum::<usize>()
    }
}

/// Simulated directory layout rooted at a base path.
///
/// # Examples
///
/// ```
/// use tidydir::DirectoryTree;
///
/// let mut tree = DirectoryTree::new("/home/me/Downloads");
/// tree.add_file("/home/me/Downloads/audio/song.mp3");
/// tree.add_file("/home/me/Downloads/image/cat.jpg");
///
/// assert_eq!(
///     tree.render("/home/me/Downloads").unwrap(),
///     "Downloads/\n├── audio/\n│   └── song.mp3\n└── image/\n    └── cat.jpg\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryTree {
    root_path: PathBuf,
    root: DirectoryNode,
}

impl DirectoryTree {
    /// Creates an empty tree. The root is labelled with the last component of `root_path`.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        let root_path = root_path.into();
        let name = root_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root_path.display().to_string());
        Self {
            root_path,
            root: DirectoryNode::directory(name),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn root(&self) -> &DirectoryNode {
        &self.root
    }

    /// Splits `path` into segments below the root.
    ///
    /// Paths under the root are made relative to it and other relative paths
    /// are taken as they are. Absolute paths outside the root yield `None`.
    /// Only normal components are kept.
    fn segments(&self, path: &Path) -> Option<Vec<String>> {
        let relative = match path.strip_prefix(&self.root_path) {
            Ok(rest) => rest,
            Err(_) if path.is_absolute() => return None,
            Err(_) => path,
        };
        Some(
            relative
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect(),
        )
    }

    /// Records a file at `path`, creating intermediate directories.
    ///
    /// Adding the same path again leaves the tree unchanged. Absolute paths
    /// outside the root are ignored.
    pub fn add_file(&mut self, path: impl AsRef<Path>) {
        let Some(segments) = self.segments(path.as_ref()) else {
            return;
        };
        let Some((leaf, dirs)) = segments.split_last() else {
            return;
        };

        let mut current = &mut self.root;
        for dir in dirs {
            current = current
                .children
                .entry(dir.clone())
                .or_insert_with(|| DirectoryNode::directory(dir.clone()));
            // something recorded as a file earlier now has children
            current.is_file = false;
        }

        current
            .children
            .entry(leaf.clone())
            .or_insert_with(|| DirectoryNode::file(leaf.clone()));
    }

    /// Finds the node at `path`, or `None` if any segment is missing or the
    /// path lies outside the root.
    ///
    /// The root path itself resolves to the root node.
    pub fn find_node(&self, path: impl AsRef<Path>) -> Option<&DirectoryNode> {
        self.segments(path.as_ref())?
            .iter()
            .try_fold(&self.root, |node, segment| node.children.get(segment))
    }

    /// Renders the subtree at `path` as indented text, one entry per line.
    ///
    /// Returns `None` when no node exists at `path`.
    pub fn render(&self, path: impl AsRef<Path>) -> Option<String> {
        let node = self.find_node(path)?;
        let mut out = String::new();
        out.push_str(&node.label());
        out.push('\n');
        Self::render_children(node, "", &mut out);
        Some(out)
    }

    fn render_children(node: &DirectoryNode, prefix: &str, out: &mut String) {
        let count = node.children.len();
        for (i, child) in node.children.values().enumerate() {
            let last = i + 1 == count;
            let (branch, continuation) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };

            out.push_str(prefix);
            out.push_str(branch);
            out.push_str(&child.label());
            out.push('\n');

            if !child.children.is_empty() {
                Self::render_children(child, &format!("{}{}", prefix, continuation), out);
            }
        }
    }

    /// True when nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Number of file leaves in the tree.
    pub fn file_count(&self) -> usize {
        self.root.file_count()
    }
}
