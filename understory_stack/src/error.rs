// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by the structural API.

use thiserror::Error;

use crate::ItemId;

/// Rejected input at the structural API boundary.
///
/// A rejected call leaves every piece of stack state untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    /// The handle does not refer to a live item.
    #[error("item {0:?} is not in the stack")]
    StaleItem(ItemId),

    /// A child index past the end of the collection.
    #[error("index {index} is out of range for {len} items")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of children.
        len: usize,
    },

    /// Animation durations cannot be negative.
    #[error("animation duration must be non-negative, got {0} ms")]
    InvalidDuration(i64),
}

/// Result alias for [`StackError`].
pub type Result<T> = core::result::Result<T, StackError>;
