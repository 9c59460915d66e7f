// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, aggregation, queries.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::TreeError;
use crate::types::{NodeId, Rgb};

/// What a node slot holds: either the canonical placeholder or real data.
///
/// Placeholders have no label, no children, and size 0. They stand in for a
/// removed item so sibling order never has to be repacked by hosts; both leaf
/// enumeration and layout treat them as contributing nothing.
#[derive(Clone, Debug)]
enum NodeData {
    Empty,
    Populated { label: String, size: u64, color: Rgb },
}

impl NodeData {
    fn size(&self) -> u64 {
        match self {
            Self::Empty => 0,
            Self::Populated { size, .. } => *size,
        }
    }

    fn label(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Populated { label, .. } => Some(label),
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

impl Node {
    fn new(generation: u32, data: NodeData) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
        }
    }
}

/// An arena of weighted nodes forming one or more trees.
///
/// Nodes are built bottom-up: leaves first with an explicit size, then
/// branches over already-built children. [`Tree::insert_branch`] computes the
/// branch aggregate and wires each child's parent back-reference; that wiring
/// happens exactly once, so a node can only ever be given to one branch.
///
/// The per-node invariant is: a branch's size equals the sum of its direct
/// children's sizes, transitively up to the root. Construction establishes
/// it; after any leaf edit via [`Tree::set_leaf_size`], the caller restores
/// it with [`Tree::update_aggregate_size`]. The tree never re-derives
/// aggregates lazily, and queries on an unpropagated tree are unspecified.
///
/// Structural removal is limited to [`Tree::compact_trailing_zero`]; hosts
/// "delete" an item by zeroing its leaf and propagating, which keeps sibling
/// indices stable while layout and leaf enumeration skip it.
///
/// ## Example
///
/// ```rust
/// use tessera_tree::{Rgb, Tree};
///
/// let mut tree = Tree::new();
/// let gif = tree.insert_leaf("cat.gif", 840, Rgb::new(220, 180, 60));
/// let txt = tree.insert_leaf("notes.txt", 120, Rgb::new(60, 180, 220));
/// let home = tree.insert_branch("home", &[gif, txt], Rgb::new(90, 90, 90));
///
/// assert_eq!(tree.size(home), Some(960));
/// assert_eq!(tree.parent_of(gif), Some(home));
/// assert_eq!(tree.leaves(home), vec![gif, txt]);
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    separator: String,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("separator", &self.separator)
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create an empty arena with the default `/` path separator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_separator("/")
    }

    /// Create an empty arena with a custom path separator.
    ///
    /// The separator is a presentation detail of the data domain: a
    /// filesystem tree wants its platform's path separator, a region /
    /// country hierarchy typically wants `/`. It only affects
    /// [`Tree::path_label`].
    #[must_use]
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            separator: separator.into(),
        }
    }

    /// The separator used by [`Tree::path_label`].
    pub fn separator(&self) -> &str {
        &self.separator
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            NodeId::new(idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            NodeId::new((self.nodes.len() - 1) as u32, generation)
        }
    }

    /// Insert the canonical empty placeholder: no label, no children, size 0.
    pub fn insert_empty(&mut self) -> NodeId {
        self.alloc(NodeData::Empty)
    }

    /// Insert a leaf with an authoritative size.
    ///
    /// The color is assigned here, once; the tree carries it opaquely and
    /// never recomputes it.
    pub fn insert_leaf(&mut self, label: impl Into<String>, size: u64, color: Rgb) -> NodeId {
        self.alloc(NodeData::Populated {
            label: label.into(),
            size,
            color,
        })
    }

    /// Insert a branch over already-built children.
    ///
    /// The branch's size is the sum of the children's sizes (0 for an empty
    /// slice), and each child's parent back-reference is wired to the new
    /// node. Children must be live and parentless: a node is wired to a
    /// parent exactly once, and violating that is a programming error.
    ///
    /// Child order is preserved and significant; it determines partition
    /// order in the layout engine and the order of [`Tree::leaves`].
    ///
    /// # Panics
    ///
    /// Panics if any child handle is stale or already has a parent.
    pub fn insert_branch(
        &mut self,
        label: impl Into<String>,
        children: &[NodeId],
        color: Rgb,
    ) -> NodeId {
        let mut size = 0_u64;
        for &child in children {
            let node = self.node_opt(child).expect("stale child NodeId");
            assert!(
                node.parent.is_none(),
                "child already has a parent; nodes are wired to a parent exactly once"
            );
            size = size.saturating_add(node.data.size());
        }
        let id = self.alloc(NodeData::Populated {
            label: label.into(),
            size,
            color,
        });
        for &child in children {
            self.node_mut(child).parent = Some(id);
        }
        self.node_mut(id).children = children.to_vec();
        id
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation
    /// matches the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Returns true iff `id` is a live empty placeholder.
    pub fn is_empty(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| matches!(n.data, NodeData::Empty))
    }

    /// Returns true iff `id` is live, populated, and has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.children.is_empty() && matches!(n.data, NodeData::Populated { .. }))
    }

    /// The aggregate size of a live node (0 for placeholders), or `None` for
    /// stale handles.
    pub fn size(&self, id: NodeId) -> Option<u64> {
        self.node_opt(id).map(|n| n.data.size())
    }

    /// The label of a live populated node. Placeholders and stale handles
    /// yield `None`.
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node_opt(id).and_then(|n| n.data.label())
    }

    /// The display color assigned at construction. Placeholders and stale
    /// handles yield `None`.
    pub fn color(&self, id: NodeId) -> Option<Rgb> {
        self.node_opt(id).and_then(|n| match n.data {
            NodeData::Empty => None,
            NodeData::Populated { color, .. } => Some(color),
        })
    }

    /// The parent of a node if live, or `None` for roots and stale handles.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// The children of a node, in order, or an empty slice for stale handles.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Enumerate the positive-size leaves of the subtree at `id`, left to
    /// right.
    ///
    /// Any node with children is recursed into regardless of its own size;
    /// childless nodes with size 0 (including placeholders) are excluded.
    /// For a given tree at a given instant, the i-th entry corresponds to
    /// the i-th rectangle the layout engine emits for the same subtree;
    /// callers may pair the two sequences positionally.
    #[must_use]
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_leaves(id, &mut out);
        out
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.node_opt(id) else { return };
        if node.children.is_empty() {
            if node.data.size() > 0 {
                out.push(id);
            }
            return;
        }
        for &child in &node.children {
            self.collect_leaves(child, out);
        }
    }

    /// Set the authoritative size of a leaf.
    ///
    /// This is the mutation boundary for interactive edits ("zero out this
    /// file", "grow this country"). It does **not** propagate: after one or
    /// more edits, call [`Tree::update_aggregate_size`] on each edited leaf
    /// so ancestor aggregates are restored before the next layout or leaf
    /// enumeration.
    pub fn set_leaf_size(&mut self, id: NodeId, size: u64) -> Result<(), TreeError> {
        let node = self.node_opt_mut(id).ok_or(TreeError::Stale)?;
        if !node.children.is_empty() {
            return Err(TreeError::NotLeaf);
        }
        match &mut node.data {
            NodeData::Empty => Err(TreeError::Placeholder),
            NodeData::Populated { size: slot, .. } => {
                *slot = size;
                Ok(())
            }
        }
    }

    /// Recompute the aggregate of every strict ancestor of `id`.
    ///
    /// Walks upward through parent back-references; at each ancestor the
    /// size is recomputed as the sum of that ancestor's direct children,
    /// then the walk continues to its parent and stops at the root. This is
    /// O(depth × branching), not a full-tree re-scan. No-op for stale
    /// handles and for nodes without a parent.
    pub fn update_aggregate_size(&mut self, id: NodeId) {
        let Some(node) = self.node_opt(id) else { return };
        let mut current = node.parent;
        while let Some(ancestor) = current {
            let total = self
                .node(ancestor)
                .children
                .iter()
                .map(|&c| self.node(c).data.size())
                .fold(0_u64, u64::saturating_add);
            let ancestor_node = self.node_mut(ancestor);
            // Placeholders never have children, so an ancestor is always populated.
            if let NodeData::Populated { size, .. } = &mut ancestor_node.data {
                *size = total;
            }
            current = ancestor_node.parent;
        }
    }

    /// The separator-joined label path from the root down to `id`, root
    /// first.
    ///
    /// Placeholders have no label and yield `None`, as do stale handles.
    #[must_use]
    pub fn path_label(&self, id: NodeId) -> Option<String> {
        let node = self.node_opt(id)?;
        let mut segments: Vec<&str> = alloc::vec![node.data.label()?];
        let mut current = node.parent;
        while let Some(ancestor) = current {
            let ancestor_node = self.node(ancestor);
            segments.push(
                ancestor_node
                    .data
                    .label()
                    .expect("ancestors are always populated"),
            );
            current = ancestor_node.parent;
        }
        segments.reverse();
        Some(segments.join(self.separator.as_str()))
    }

    /// Remove the last child of `parent` if its size is 0.
    ///
    /// At most one child is removed per call, and only a *trailing* one;
    /// zero-size children elsewhere in the list are left alone (layout and
    /// leaf enumeration already skip them). The removed subtree's slots are
    /// freed, so its handles go stale. Returns the removed child's id, or
    /// `None` if nothing was removed.
    ///
    /// The layout engine calls this before partitioning a branch, which is
    /// why generating a layout takes the tree mutably.
    pub fn compact_trailing_zero(&mut self, parent: NodeId) -> Option<NodeId> {
        let node = self.node_opt(parent)?;
        let &last = node.children.last()?;
        if self.node(last).data.size() != 0 {
            return None;
        }
        self.node_mut(parent).children.pop();
        self.node_mut(last).parent = None;
        self.free_subtree(last);
        Some(last)
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = self.node(id).children.clone();
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }
}
