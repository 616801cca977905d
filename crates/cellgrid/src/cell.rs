#![forbid(unsafe_code)]

//! Cell-packing data model: size requests, container constraints, placements.
//!
//! Everything here is a small immutable value type. Requests describe what a
//! cell would like (optional pixel bounds), constraints describe the container
//! the packer must fit, and placements are what the solver hands back.
//!
//! # Invariants
//!
//! 1. A request with both bounds set satisfies `min_width <= max_width`
//!    (enforced by [`CellRequest::validate`], not by construction).
//! 2. Bounds are positive: `Some(0)` on either side is rejected.
//! 3. `GridConstraints::max_columns`, when set, is at least 1.
//! 4. [`CellRequest::resolved_min_width`] is a pure derivation; the request
//!    itself is never mutated by the packer.
//!
//! # Failure Modes
//!
//! All violations surface as [`GridError`] before any packing work starts.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Validation failure for a packing call.
///
/// These indicate malformed input from the caller, not a solver condition;
/// retrying with the same input fails identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// A request carries a zero `min_width` or `max_width`.
    ZeroCellBound {
        index: usize,
        bound: &'static str,
    },
    /// A request has both bounds set with `min_width > max_width`.
    InvertedCellBounds {
        index: usize,
        min: u32,
        max: u32,
    },
    /// `max_columns` was set to 0.
    ZeroColumnCap,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCellBound { index, bound } => {
                write!(f, "cell request {index} has zero {bound}")
            }
            Self::InvertedCellBounds { index, min, max } => write!(
                f,
                "cell request {index} has min_width {min} above max_width {max}"
            ),
            Self::ZeroColumnCap => write!(f, "max_columns must be at least 1"),
        }
    }
}

impl std::error::Error for GridError {}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// One layout unit's acceptable pixel width range.
///
/// Both bounds are optional. A missing `min_width` means "fill whatever the
/// container offers"; a missing `max_width` means unbounded growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellRequest {
    /// Lower width bound in pixels, if any.
    pub min_width: Option<u32>,
    /// Upper width bound in pixels, if any.
    pub max_width: Option<u32>,
}

impl CellRequest {
    /// A cell with no bounds: claims a full container width before growth.
    #[inline]
    #[must_use]
    pub const fn flexible() -> Self {
        Self {
            min_width: None,
            max_width: None,
        }
    }

    /// A cell pinned to an exact width.
    #[inline]
    #[must_use]
    pub const fn fixed(width: u32) -> Self {
        Self {
            min_width: Some(width),
            max_width: Some(width),
        }
    }

    /// A cell bounded on both sides.
    #[inline]
    #[must_use]
    pub const fn bounded(min_width: u32, max_width: u32) -> Self {
        Self {
            min_width: Some(min_width),
            max_width: Some(max_width),
        }
    }

    /// A cell with a floor but unbounded growth.
    #[inline]
    #[must_use]
    pub const fn at_least(min_width: u32) -> Self {
        Self {
            min_width: Some(min_width),
            max_width: None,
        }
    }

    /// A cell with a ceiling but no explicit floor.
    #[inline]
    #[must_use]
    pub const fn at_most(max_width: u32) -> Self {
        Self {
            min_width: None,
            max_width: Some(max_width),
        }
    }

    /// Validate the request bounds for the cell at `index`.
    pub fn validate(self, index: usize) -> Result<(), GridError> {
        if self.min_width == Some(0) {
            return Err(GridError::ZeroCellBound {
                index,
                bound: "min_width",
            });
        }
        if self.max_width == Some(0) {
            return Err(GridError::ZeroCellBound {
                index,
                bound: "max_width",
            });
        }
        if let (Some(min), Some(max)) = (self.min_width, self.max_width)
            && min > max
        {
            return Err(GridError::InvertedCellBounds { index, min, max });
        }
        Ok(())
    }

    /// The concrete lower-bound width used for row breaking and as the
    /// proportional-growth weight.
    ///
    /// An absent `min_width` resolves to the container width, clamped to
    /// `max_width` when one is set. An unbounded flexible cell therefore
    /// claims a full row before any growth happens.
    #[inline]
    #[must_use]
    pub fn resolved_min_width(self, parent_width: u32) -> u32 {
        match self.min_width {
            Some(min) => min,
            None => self.max_width.unwrap_or(parent_width).min(parent_width),
        }
    }
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

/// The container the packer must fit cells into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConstraints {
    /// Available horizontal space in pixels. Zero is legal (every cell
    /// collapses onto its own zero-width row).
    pub parent_width: u32,
    /// Cap on cells per row. `None` means width alone decides row breaks.
    pub max_columns: Option<usize>,
}

impl GridConstraints {
    /// Constraints for a container of the given width, with no column cap.
    #[inline]
    #[must_use]
    pub const fn new(parent_width: u32) -> Self {
        Self {
            parent_width,
            max_columns: None,
        }
    }

    /// Set the per-row cell cap (builder pattern).
    #[inline]
    #[must_use]
    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = Some(max_columns);
        self
    }

    /// Validate the constraint values.
    pub fn validate(self) -> Result<(), GridError> {
        if self.max_columns == Some(0) {
            return Err(GridError::ZeroColumnCap);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Placements
// ---------------------------------------------------------------------------

/// Final output for one cell: its position in the original request slice
/// plus the pixel width the solver settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPlacement {
    /// Index into the original, unnormalized request slice. Lets the caller
    /// correlate a placement back to per-cell payload data the packer never
    /// sees.
    pub index: usize,
    /// Resolved pixel width.
    pub width: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
