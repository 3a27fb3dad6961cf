//! Rooted phylogenetic trees.
//!
//! Trees are stored as an arena of [`Node`]s addressed by [`NodeId`]. Every
//! node keeps its parent link and its children in declaration order, so
//! traversals never need recursion. Trees are immutable input to the
//! simulator; they are built once, either programmatically with
//! [`Tree::add_root`] / [`Tree::add_child`] or from newick text with
//! [`Tree::from_newick`].

mod newick;

use crate::errors::{NewickError, SimulationError};
use std::collections::HashSet;
use std::fmt;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single tree node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    name: Option<String>,
    branch_length: Option<f64>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Node label, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Branch length as written, if any.
    pub fn branch_length(&self) -> Option<f64> {
        self.branch_length
    }

    /// Elapsed time since the parent; a missing branch length reads as 0.
    pub fn length(&self) -> f64 {
        self.branch_length.unwrap_or(0.0)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in declaration order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena-backed rooted tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Tree {
    /// Create an empty tree with no root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a newick tree description, e.g. `((A:0.5,B:0.5)D:0.5,C:1)E;`.
    ///
    /// # Errors
    /// Returns a [`NewickError`] pointing at the offending position.
    pub fn from_newick(text: &str) -> Result<Self, NewickError> {
        newick::parse(text)
    }

    /// Add the root node, replacing any existing root link.
    pub fn add_root(&mut self, name: impl Into<String>, branch_length: Option<f64>) -> NodeId {
        let id = self.push_node(None, Some(name.into()), branch_length);
        self.root = Some(id);
        id
    }

    /// Append a child under `parent`.
    ///
    /// # Panics
    /// Panics if `parent` does not belong to this tree.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        branch_length: f64,
    ) -> NodeId {
        self.push_node(Some(parent), Some(name.into()), Some(branch_length))
    }

    pub(crate) fn push_node(
        &mut self,
        parent: Option<NodeId>,
        name: Option<String>,
        branch_length: Option<f64>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name,
            branch_length,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    pub(crate) fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    pub(crate) fn set_label(&mut self, id: NodeId, name: Option<String>, length: Option<f64>) {
        let node = &mut self.nodes[id.0];
        node.name = name;
        node.branch_length = length;
    }

    /// Root of the tree, if one has been set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Node by id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Find the first node labelled `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, n)| n.name() == Some(name))
            .map(|(id, _)| id)
    }

    /// Ids of all leaves in arena order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, n)| n.is_leaf())
            .map(|(id, _)| id)
            .collect()
    }

    /// Check that the tree can be simulated on and return its root.
    ///
    /// The root must exist and be named, every node must carry a unique name,
    /// and every branch length must be finite and non-negative.
    ///
    /// # Errors
    /// Returns `SimulationError::InvalidTree` describing the first problem found.
    pub fn validate(&self) -> Result<NodeId, SimulationError> {
        let root = self
            .root
            .ok_or_else(|| SimulationError::InvalidTree("tree has no root".into()))?;
        if self.node(root).name().is_none() {
            return Err(SimulationError::InvalidTree("root node has no name".into()));
        }

        let mut seen = HashSet::with_capacity(self.nodes.len());
        for (id, node) in self.iter() {
            let name = node
                .name()
                .ok_or_else(|| SimulationError::InvalidTree(format!("node {id} has no name")))?;
            if !seen.insert(name) {
                return Err(SimulationError::InvalidTree(format!(
                    "duplicate node name '{name}'"
                )));
            }
            if id != root {
                if node.parent().is_none() {
                    return Err(SimulationError::InvalidTree(format!(
                        "node '{name}' is not connected to the root"
                    )));
                }
                let length = node.length();
                if !(length.is_finite() && length >= 0.0) {
                    return Err(SimulationError::InvalidTree(format!(
                        "node '{name}' has invalid branch length {length}"
                    )));
                }
            }
        }

        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Tree {
        let mut tree = Tree::new();
        let e = tree.add_root("E", None);
        let d = tree.add_child(e, "D", 0.5);
        tree.add_child(d, "A", 0.5);
        tree.add_child(d, "B", 0.5);
        tree.add_child(e, "C", 1.0);
        tree
    }

    #[test]
    fn test_tree_builder_links() {
        let tree = example();
        assert_eq!(tree.len(), 5);
        let root = tree.root().unwrap();
        let root_node = tree.node(root);
        assert!(root_node.is_root());
        assert_eq!(root_node.name(), Some("E"));
        assert_eq!(root_node.children().len(), 2);

        let d = tree.find("D").unwrap();
        assert_eq!(tree.node(d).parent(), Some(root));
        assert_eq!(tree.node(d).length(), 0.5);
        let names: Vec<_> = tree
            .node(d)
            .children()
            .iter()
            .map(|&c| tree.node(c).name().unwrap())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_tree_leaves() {
        let tree = example();
        let leaves: Vec<_> = tree
            .leaves()
            .into_iter()
            .map(|id| tree.node(id).name().unwrap())
            .collect();
        assert_eq!(leaves, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_validate_ok() {
        let tree = example();
        assert_eq!(tree.validate().unwrap(), tree.root().unwrap());
    }

    #[test]
    fn test_validate_empty_tree() {
        assert!(matches!(
            Tree::new().validate(),
            Err(SimulationError::InvalidTree(_))
        ));
    }

    #[test]
    fn test_validate_unnamed_root() {
        let mut tree = Tree::new();
        let root = tree.push_node(None, None, None);
        tree.set_root(root);
        tree.add_child(root, "A", 1.0);
        let err = tree.validate().unwrap_err();
        assert!(err.to_string().contains("root"));
    }

    #[test]
    fn test_validate_duplicate_names() {
        let mut tree = Tree::new();
        let root = tree.add_root("R", None);
        tree.add_child(root, "A", 1.0);
        tree.add_child(root, "A", 2.0);
        let err = tree.validate().unwrap_err();
        assert_eq!(
            err,
            SimulationError::InvalidTree("duplicate node name 'A'".into())
        );
    }

    #[test]
    fn test_validate_negative_length() {
        let mut tree = Tree::new();
        let root = tree.add_root("R", None);
        tree.add_child(root, "A", -0.1);
        assert!(matches!(
            tree.validate(),
            Err(SimulationError::InvalidTree(_))
        ));
    }

    #[test]
    fn test_validate_detached_node() {
        let mut tree = Tree::new();
        tree.add_root("old", None);
        let root = tree.add_root("new", None);
        tree.add_child(root, "A", 1.0);
        let err = tree.validate().unwrap_err();
        assert!(err.to_string().contains("'old'"));
    }

    #[test]
    fn test_missing_length_reads_as_zero() {
        let mut tree = Tree::new();
        let root = tree.add_root("R", None);
        let child = tree.push_node(Some(root), Some("A".into()), None);
        assert_eq!(tree.node(child).branch_length(), None);
        assert_eq!(tree.node(child).length(), 0.0);
    }
}
