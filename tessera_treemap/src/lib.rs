// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tessera Treemap: recursive proportional partitioning for weighted trees.
//!
//! This crate turns a [`tessera_tree::Tree`] into a space-filling rectangular
//! partition: one rectangle per positive-size leaf, each leaf's area
//! proportional to its share of the total weight. Rendering is left entirely
//! to host code; the output is plain `(Rect, NodeId)` pairs.
//!
//! The partition is depth-first and left-to-right stable. At every branch the
//! split axis is chosen from the rectangle being subdivided (wider than tall
//! splits along x, otherwise along y), so nesting alternates direction with
//! the geometry and tiles stay reasonably square.
//!
//! ## Exact tiling
//!
//! Coordinates are integer-valued `f64`. Each child except the last gets
//! `floor(extent × size / total)` along the split axis; the last child
//! absorbs the remainder. Children therefore tile their parent rectangle
//! with no gap or overlap, and the areas of all emitted rectangles sum to
//! the area of the input rectangle whenever the tree's total size is
//! positive.
//!
//! ## Side effect
//!
//! [`generate_layout`] is **not** a pure read: before partitioning a branch
//! it calls [`Tree::compact_trailing_zero`], dropping at most one trailing
//! zero-size child per branch per call. That is why it takes the tree
//! mutably. Handles into a compacted subtree go stale.
//!
//! ## Pairing with leaf enumeration
//!
//! For a given tree at a given instant, the i-th rectangle emitted here
//! corresponds to the i-th entry of [`Tree::leaves`] on the same subtree.
//! Hosts that keep separate per-leaf state may rely on that positional
//! correspondence.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use tessera_tree::{Rgb, Tree};
//! use tessera_treemap::{generate_layout, leaf_at};
//!
//! let mut tree = Tree::new();
//! let a = tree.insert_leaf("a", 30, Rgb::new(200, 40, 40));
//! let b = tree.insert_leaf("b", 70, Rgb::new(40, 200, 40));
//! let root = tree.insert_branch("root", &[a, b], Rgb::new(40, 40, 200));
//!
//! let layout = generate_layout(&mut tree, root, Rect::new(0.0, 0.0, 100.0, 50.0));
//! assert_eq!(layout[0], (Rect::new(0.0, 0.0, 30.0, 50.0), a));
//! assert_eq!(layout[1], (Rect::new(30.0, 0.0, 100.0, 50.0), b));
//!
//! // Point lookup for selection: first rectangle containing the point wins.
//! assert_eq!(leaf_at(&layout, Point::new(65.0, 10.0)), Some(b));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};

use tessera_tree::{NodeId, Tree};

/// Partition `rect` among the positive-size leaves of the subtree at `node`.
///
/// Returns one `(rect, leaf)` pair per positive-size leaf, in depth-first
/// left-to-right order. A zero-size subtree (including the empty placeholder
/// and stale handles) yields nothing; a single positive leaf occupies the
/// whole input rectangle.
///
/// `rect` is origin-top-left with non-negative extents, in whatever unit the
/// host renders in; coordinates should be integer-valued so the truncating
/// partition stays exact.
///
/// Mutates the tree: each branch visited has at most one trailing zero-size
/// child removed via [`Tree::compact_trailing_zero`].
pub fn generate_layout(tree: &mut Tree, node: NodeId, rect: Rect) -> Vec<(Rect, NodeId)> {
    let Some(total) = tree.size(node) else {
        return Vec::new();
    };
    if total == 0 {
        return Vec::new();
    }
    if tree.children_of(node).is_empty() {
        return vec![(rect, node)];
    }

    tree.compact_trailing_zero(node);

    let (x0, y0) = (rect.x0, rect.y0);
    let (width, height) = (rect.width(), rect.height());
    let horizontal = width > height;

    let children = tree.children_of(node).to_vec();
    let mut out = Vec::new();
    let mut consumed = 0.0;
    for (i, &child) in children.iter().enumerate() {
        let full = if horizontal { width } else { height };
        let step = if i + 1 == children.len() {
            // The last child absorbs the truncation remainder so the
            // children tile the parent exactly.
            full - consumed
        } else {
            let ratio = tree.size(child).unwrap_or(0) as f64 / total as f64;
            (full * ratio).floor()
        };
        let sub = if horizontal {
            Rect::new(x0 + consumed, y0, x0 + consumed + step, y0 + height)
        } else {
            Rect::new(x0, y0 + consumed, x0 + width, y0 + consumed + step)
        };
        consumed += step;
        out.extend(generate_layout(tree, child, sub));
    }
    out
}

/// Find the leaf whose rectangle contains `point` in an already-generated
/// layout.
///
/// Containment includes all four edges; where rectangles share an edge, the
/// earlier entry in emission order wins. Returns `None` if no rectangle
/// contains the point.
#[must_use]
pub fn leaf_at(layout: &[(Rect, NodeId)], point: Point) -> Option<NodeId> {
    layout
        .iter()
        .find(|(rect, _)| {
            rect.x0 <= point.x && point.x <= rect.x1 && rect.y0 <= point.y && point.y <= rect.y1
        })
        .map(|&(_, id)| id)
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::{Point, Rect};
    use tessera_tree::{Rgb, Tree};

    use super::{generate_layout, leaf_at};

    fn gray() -> Rgb {
        Rgb::new(128, 128, 128)
    }

    #[test]
    fn wide_rect_splits_horizontally() {
        let mut tree = Tree::new();
        let a = tree.insert_leaf("a", 30, gray());
        let b = tree.insert_leaf("b", 70, gray());
        let root = tree.insert_branch("root", &[a, b], gray());

        let layout = generate_layout(&mut tree, root, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(
            layout,
            [
                (Rect::new(0.0, 0.0, 30.0, 50.0), a),
                (Rect::new(30.0, 0.0, 100.0, 50.0), b),
            ]
        );
    }

    #[test]
    fn tall_rect_splits_vertically() {
        let mut tree = Tree::new();
        let a = tree.insert_leaf("a", 30, gray());
        let b = tree.insert_leaf("b", 70, gray());
        let root = tree.insert_branch("root", &[a, b], gray());

        let layout = generate_layout(&mut tree, root, Rect::new(0.0, 0.0, 50.0, 100.0));
        assert_eq!(
            layout,
            [
                (Rect::new(0.0, 0.0, 50.0, 30.0), a),
                (Rect::new(0.0, 30.0, 50.0, 100.0), b),
            ]
        );
    }

    #[test]
    fn square_rect_splits_vertically() {
        // Ties go to the vertical split; only strictly-wider rectangles
        // split along x.
        let mut tree = Tree::new();
        let a = tree.insert_leaf("a", 1, gray());
        let b = tree.insert_leaf("b", 1, gray());
        let root = tree.insert_branch("root", &[a, b], gray());

        let layout = generate_layout(&mut tree, root, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(layout[0].0, Rect::new(0.0, 0.0, 10.0, 5.0));
    }

    #[test]
    fn single_leaf_fills_the_rect() {
        let mut tree = Tree::new();
        let leaf = tree.insert_leaf("leaf", 123, gray());
        let rect = Rect::new(7.0, 11.0, 20.0, 30.0);
        assert_eq!(generate_layout(&mut tree, leaf, rect), [(rect, leaf)]);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let mut tree = Tree::new();
        let hole = tree.insert_empty();
        assert!(tree.is_empty(hole));
        let layout = generate_layout(&mut tree, hole, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(layout.is_empty());
        assert!(tree.leaves(hole).is_empty());
    }

    #[test]
    fn zero_total_yields_nothing_even_when_nested() {
        let mut tree = Tree::new();
        let z1 = tree.insert_leaf("z1", 0, gray());
        let z2 = tree.insert_leaf("z2", 0, gray());
        let inner = tree.insert_branch("inner", &[z1, z2], gray());
        let root = tree.insert_branch("root", &[inner], gray());

        let layout = generate_layout(&mut tree, root, Rect::new(0.0, 0.0, 64.0, 64.0));
        assert!(layout.is_empty());
    }

    #[test]
    fn trailing_zero_child_is_pruned_from_the_tree() {
        let mut tree = Tree::new();
        let a = tree.insert_leaf("a", 10, gray());
        let z = tree.insert_leaf("z", 0, gray());
        let root = tree.insert_branch("root", &[a, z], gray());

        let rect = Rect::new(0.0, 0.0, 80.0, 60.0);
        let layout = generate_layout(&mut tree, root, rect);

        // One rectangle, the full input, attributed to the surviving child.
        assert_eq!(layout, [(rect, a)]);
        // The pruning is structural, not layout-local.
        assert_eq!(tree.children_of(root), &[a]);
        assert!(!tree.is_alive(z));
    }

    #[test]
    fn non_trailing_zero_children_are_skipped_but_kept() {
        let mut tree = Tree::new();
        let z = tree.insert_leaf("z", 0, gray());
        let a = tree.insert_leaf("a", 5, gray());
        let root = tree.insert_branch("root", &[z, a], gray());

        let rect = Rect::new(0.0, 0.0, 40.0, 20.0);
        let layout = generate_layout(&mut tree, root, rect);

        assert_eq!(layout, [(rect, a)], "zero child gets a zero-width strip");
        assert_eq!(tree.children_of(root), &[z, a], "only trailing zeros are pruned");
    }

    #[test]
    fn remainder_goes_to_the_last_child() {
        let mut tree = Tree::new();
        let a = tree.insert_leaf("a", 1, gray());
        let b = tree.insert_leaf("b", 1, gray());
        let c = tree.insert_leaf("c", 1, gray());
        let root = tree.insert_branch("root", &[a, b, c], gray());

        let layout = generate_layout(&mut tree, root, Rect::new(0.0, 0.0, 100.0, 10.0));
        assert_eq!(
            layout,
            [
                (Rect::new(0.0, 0.0, 33.0, 10.0), a),
                (Rect::new(33.0, 0.0, 66.0, 10.0), b),
                (Rect::new(66.0, 0.0, 100.0, 10.0), c),
            ]
        );
    }

    #[test]
    fn nested_split_axis_follows_each_rect() {
        let mut tree = Tree::new();
        let a = tree.insert_leaf("a", 20, gray());
        let b = tree.insert_leaf("b", 20, gray());
        let inner = tree.insert_branch("inner", &[a, b], gray());
        let c = tree.insert_leaf("c", 60, gray());
        let root = tree.insert_branch("root", &[inner, c], gray());

        // Root rect is wide, so the first cut is horizontal; `inner` gets a
        // 40x50 strip, which is tall, so its own cut is vertical.
        let layout = generate_layout(&mut tree, root, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(
            layout,
            [
                (Rect::new(0.0, 0.0, 40.0, 25.0), a),
                (Rect::new(0.0, 25.0, 40.0, 50.0), b),
                (Rect::new(40.0, 0.0, 100.0, 50.0), c),
            ]
        );
    }

    #[test]
    fn area_is_conserved_exactly() {
        let mut tree = Tree::new();
        let a = tree.insert_leaf("a", 2, gray());
        let b = tree.insert_leaf("b", 3, gray());
        let inner = tree.insert_branch("inner", &[a, b], gray());
        let c = tree.insert_leaf("c", 5, gray());
        let root = tree.insert_branch("root", &[inner, c], gray());

        let rect = Rect::new(0.0, 0.0, 97.0, 13.0);
        let layout = generate_layout(&mut tree, root, rect);

        let total: f64 = layout.iter().map(|(r, _)| r.width() * r.height()).sum();
        assert_eq!(total, rect.width() * rect.height());
    }

    #[test]
    fn layout_matches_leaves_positionally() {
        let mut tree = Tree::new();
        let a = tree.insert_leaf("a", 7, gray());
        let z = tree.insert_leaf("z", 0, gray());
        let b = tree.insert_leaf("b", 2, gray());
        let inner = tree.insert_branch("inner", &[a, z, b], gray());
        let c = tree.insert_leaf("c", 11, gray());
        let root = tree.insert_branch("root", &[inner, c], gray());

        let layout = generate_layout(&mut tree, root, Rect::new(0.0, 0.0, 200.0, 120.0));
        let leaves = tree.leaves(root);

        assert_eq!(layout.len(), leaves.len());
        let emitted: Vec<_> = layout.iter().map(|&(_, id)| id).collect();
        assert_eq!(emitted, leaves);
    }

    #[test]
    fn relayout_after_zeroing_excludes_the_leaf() {
        let mut tree = Tree::new();
        let a = tree.insert_leaf("a", 40, gray());
        let b = tree.insert_leaf("b", 60, gray());
        let root = tree.insert_branch("root", &[a, b], gray());
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);

        assert_eq!(generate_layout(&mut tree, root, rect).len(), 2);

        tree.set_leaf_size(a, 0).unwrap();
        tree.update_aggregate_size(a);

        let layout = generate_layout(&mut tree, root, rect);
        assert_eq!(layout, [(rect, b)]);
    }

    #[test]
    fn leaf_at_is_edge_inclusive_and_first_match_wins() {
        let mut tree = Tree::new();
        let a = tree.insert_leaf("a", 1, gray());
        let b = tree.insert_leaf("b", 1, gray());
        let root = tree.insert_branch("root", &[a, b], gray());

        let layout = generate_layout(&mut tree, root, Rect::new(0.0, 0.0, 100.0, 10.0));

        assert_eq!(leaf_at(&layout, Point::new(10.0, 5.0)), Some(a));
        assert_eq!(leaf_at(&layout, Point::new(75.0, 5.0)), Some(b));
        // The shared edge belongs to the earlier rectangle.
        assert_eq!(leaf_at(&layout, Point::new(50.0, 5.0)), Some(a));
        assert_eq!(leaf_at(&layout, Point::new(100.0, 10.0)), Some(b));
        assert_eq!(leaf_at(&layout, Point::new(101.0, 5.0)), None);
    }
}
