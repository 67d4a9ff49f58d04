//! Inset geometry: the pixel quads the system reports and the padding
//! computed from them.
//!
//! Everything here is pure and platform-free. Android hands insets over as
//! plain ints in physical pixels; no density conversion happens anywhere in
//! this crate.

/// A quad of non-negative inset values, in physical pixels.
///
/// Field order matches `View.setPadding(left, top, right, bottom)`. The quad
/// also crosses the C ABI (see `sg_android_get_safe_area`), hence `repr(C)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Insets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Insets {
    /// The all-zero quad.
    pub const ZERO: Insets = Insets { left: 0, top: 0, right: 0, bottom: 0 };

    /// Builds a quad, clamping negative components to zero. Insets are
    /// non-negative by contract; a negative value from a platform query is
    /// treated as zero rather than propagated.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Insets {
            left: left.max(0),
            top: top.max(0),
            right: right.max(0),
            bottom: bottom.max(0),
        }
    }

    /// Element-wise maximum of two quads. This is the only combination rule
    /// in the crate: an edge is padded far enough to clear every source that
    /// obscures it.
    pub fn max(self, other: Insets) -> Insets {
        Insets {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn is_zero(self) -> bool {
        self == Insets::ZERO
    }
}

/// The window's inset state at the moment an inset event fired.
///
/// Queries that fail, or that run before the view hierarchy is attached,
/// produce the default all-zero snapshot, which pads nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsetsSnapshot {
    /// Status bar, navigation bar and caption bar.
    pub system_bars: Insets,
    /// Areas obscured by a display cutout (notch, punch hole).
    pub display_cutout: Insets,
}

impl InsetsSnapshot {
    pub fn new(system_bars: Insets, display_cutout: Insets) -> Self {
        InsetsSnapshot {
            system_bars,
            display_cutout,
        }
    }

    /// The padding that keeps content clear of both system bars and the
    /// display cutout: the per-edge maximum of the two quads. Pure function
    /// of the snapshot alone.
    pub fn safe_area(&self) -> Insets {
        self.system_bars.max(self.display_cutout)
    }
}
