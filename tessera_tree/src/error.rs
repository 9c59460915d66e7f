// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for the size-mutation boundary.

use thiserror::Error;

/// Why a size mutation was rejected.
///
/// Only [`Tree::set_leaf_size`][crate::Tree::set_leaf_size] returns this;
/// construction-contract violations (double-parenting, stale children) are
/// programming errors and panic instead.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum TreeError {
    /// The handle does not refer to a live node.
    #[error("stale node handle")]
    Stale,
    /// The node is an empty placeholder; placeholders have no settable size.
    #[error("empty placeholder has no settable size")]
    Placeholder,
    /// The node has children; branch sizes are derived from children, never
    /// set directly.
    #[error("node has children; aggregate sizes are derived, not set")]
    NotLeaf,
}
