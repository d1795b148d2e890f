//! Turns a [`Snapshot`] into something a renderer can draw directly.

use serde::Serialize;

use crate::observer::Snapshot;

/// Width of the drawing area the bar width is fitted to, in pixels.
pub const CANVAS_WIDTH: f64 = 800.0;

/// Role of one bar in the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarColor {
    Unsorted,
    Comparing,
    Swapping,
    Sorted,
}

impl BarColor {
    /// Reference colour as `0xRRGGBB` components.
    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Unsorted => (0x34, 0x98, 0xdb),
            Self::Comparing => (0xFF, 0xC3, 0x00),
            Self::Swapping => (0xFF, 0x57, 0x33),
            Self::Sorted => (0x4C, 0xAF, 0x50),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bar {
    /// Height of the bar.
    pub value: u32,
    pub color: BarColor,
    /// Set on bars taking part in an exchange or write.
    pub emphasized: bool,
}

/// One bar per value.
///
/// A completed snapshot paints every bar as sorted. Otherwise the swapping pair wins over the
/// comparing pair, and everything else is unsorted.
///
/// # Example
/// ```
/// use sortscope_core::projection::{project, BarColor};
/// use sortscope_core::Snapshot;
///
/// let snapshot = Snapshot {
///     values: vec![3, 1, 2],
///     comparing: Some((1, 2)),
///     swapping: Some((0, 1)),
///     completed: false,
/// };
/// let colors: Vec<_> = project(&snapshot).iter().map(|bar| bar.color).collect();
/// assert_eq!(colors, [BarColor::Swapping, BarColor::Swapping, BarColor::Comparing]);
/// ```
#[must_use]
pub fn project(snapshot: &Snapshot) -> Vec<Bar> {
    let in_pair = |pair: Option<(usize, usize)>, i: usize| pair.is_some_and(|(a, b)| a == i || b == i);

    snapshot
        .values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let color = if snapshot.completed {
                BarColor::Sorted
            } else if in_pair(snapshot.swapping, i) {
                BarColor::Swapping
            } else if in_pair(snapshot.comparing, i) {
                BarColor::Comparing
            } else {
                BarColor::Unsorted
            };
            Bar {
                value,
                color,
                emphasized: color == BarColor::Swapping,
            }
        })
        .collect()
}

/// Pixel width of one bar for an array of `size` values, between 2 and 20.
///
/// Fractional widths are kept; rounding is up to the renderer.
#[must_use]
pub fn bar_width(size: usize) -> f64 {
    if size == 0 {
        return 20.0;
    }
    (CANVAS_WIDTH / size as f64 - 2.0).clamp(2.0, 20.0)
}
