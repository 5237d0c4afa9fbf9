use std::collections::HashMap;

use savesync_api::snapshots::FileNode;

pub use savesync_lib::formatting::format_size;

/// expand/collapse flags for a mounted file tree, keyed by node path.
///
/// only paths that were toggled are stored, everything else falls back to
/// the default of root expanded and the rest collapsed. flags are kept when
/// the tree is refetched since paths are stable between fetches.
#[derive(Debug, Clone, Default)]
pub struct ExpandState {
    root: String,
    flags: HashMap<String, bool>,
}

impl ExpandState {
    pub fn new<R>(root: R) -> Self
    where
        R: Into<String>
    {
        ExpandState {
            root: root.into(),
            flags: HashMap::new(),
        }
    }

    pub fn for_tree(root: &FileNode) -> Self {
        ExpandState::new(root.path.clone())
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.flags.get(path)
            .copied()
            .unwrap_or(path == self.root)
    }

    /// flips the flag for a node. files and empty directories are left
    /// alone and false is returned.
    pub fn toggle(&mut self, node: &FileNode) -> bool {
        if !node.is_expandable() {
            return false;
        }

        let next = !self.is_expanded(&node.path);

        self.flags.insert(node.path.clone(), next);

        true
    }

    pub fn set_expanded(&mut self, node: &FileNode, expanded: bool) -> bool {
        if !node.is_expandable() {
            return false;
        }

        self.flags.insert(node.path.clone(), expanded);

        true
    }

    pub fn expand_all(&mut self, root: &FileNode) {
        if root.is_expandable() {
            self.flags.insert(root.path.clone(), true);

            for child in root.children() {
                self.expand_all(child);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub depth: usize,
    pub node: &'a FileNode,
    pub expanded: bool,
    pub expandable: bool,
}

/// flattens the visible part of the tree in display order
pub fn visible_rows<'a>(root: &'a FileNode, state: &ExpandState) -> Vec<Row<'a>> {
    let mut rows = Vec::new();
    let mut stack = vec![(0usize, root)];

    while let Some((depth, node)) = stack.pop() {
        let expandable = node.is_expandable();
        let expanded = expandable && state.is_expanded(&node.path);

        rows.push(Row {
            depth,
            node,
            expanded,
            expandable,
        });

        if expanded {
            for child in node.children().iter().rev() {
                stack.push((depth + 1, child));
            }
        }
    }

    rows
}

pub fn find_node<'a>(root: &'a FileNode, path: &str) -> Option<&'a FileNode> {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if node.path == path {
            return Some(node);
        }

        stack.extend(node.children());
    }

    None
}
