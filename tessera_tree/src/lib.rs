// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessera Tree: an arena-backed weighted hierarchy for treemap visualisation.
//!
//! Tessera Tree models hierarchical "size" data (directory trees,
//! region/country population tables, any nesting of weighted items) as a
//! tree of labeled, colored nodes.
//!
//! - Leaves carry an authoritative, externally settable size.
//! - Branches derive their size from their children; it is never stored
//!   independently and never set directly.
//! - Every node keeps a back-reference to its parent, so an edit to a single
//!   leaf can be propagated upward without re-scanning the whole tree.
//!
//! ## Where this fits
//!
//! This crate is the data half of a treemap stack. The geometry half
//! (`tessera_treemap`) turns a tree into a list of rectangles; rendering,
//! input handling, and tree construction from real data sources (a filesystem
//! walk, a parsed population table) are expected to live in host code. The
//! host builds a tree bottom-up, hands it to the layout crate for rectangles,
//! and calls back into this crate when the user edits a leaf.
//!
//! ## API overview
//!
//! - [`Tree`]: container managing node slots and per-tree presentation state.
//! - [`NodeId`]: generational handle of a node.
//! - [`Rgb`]: a display color carried opaquely on every populated node.
//! - [`TreeError`]: rejection reasons at the size-mutation boundary.
//!
//! Key operations:
//! - [`Tree::insert_leaf`] / [`Tree::insert_branch`] / [`Tree::insert_empty`]
//!   build a tree bottom-up; branch construction computes the aggregate size
//!   and wires each child's parent back-reference exactly once.
//! - [`Tree::leaves`] enumerates positive-size leaves left to right, in the
//!   same order the layout engine emits rectangles.
//! - [`Tree::set_leaf_size`] + [`Tree::update_aggregate_size`] edit a leaf
//!   and recompute every strict ancestor's aggregate.
//! - [`Tree::path_label`] renders the root-to-node label path with the
//!   tree's separator.
//! - [`Tree::compact_trailing_zero`] removes a trailing zero-size child;
//!   the layout engine calls this while partitioning.
//!
//! ## Example
//!
//! ```rust
//! use tessera_tree::{Rgb, Tree};
//!
//! let mut tree = Tree::new();
//! let a = tree.insert_leaf("a.txt", 30, Rgb::new(200, 40, 40));
//! let b = tree.insert_leaf("b.txt", 70, Rgb::new(40, 200, 40));
//! let root = tree.insert_branch("docs", &[a, b], Rgb::new(40, 40, 200));
//!
//! assert_eq!(tree.size(root), Some(100));
//! assert_eq!(tree.path_label(b).as_deref(), Some("docs/b.txt"));
//!
//! // Zero out a leaf and propagate: the branch aggregate follows.
//! tree.set_leaf_size(a, 0).unwrap();
//! tree.update_aggregate_size(a);
//! assert_eq!(tree.size(root), Some(70));
//! assert_eq!(tree.leaves(root), vec![b]);
//! ```
//!
//! Aggregates are deliberately not maintained lazily: after mutating a leaf,
//! calling [`Tree::update_aggregate_size`] is the caller's responsibility,
//! and querying an unpropagated tree is unspecified.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod tree;
mod types;

pub use error::TreeError;
pub use tree::Tree;
pub use types::{NodeId, Rgb};
