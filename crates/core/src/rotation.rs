//! Rotation engine
//!
//! Rotation is a pure transform of the mask. Whether the rotated piece still
//! fits on the grid is decided by the caller.

use crate::shapes::Mask;

/// Rotate a mask 90° clockwise.
///
/// An R×C mask becomes C×R; source cell (r, c) lands at (c, R-1-r).
///
/// ```
/// use blockfall_core::rotation::rotate_clockwise;
/// use blockfall_core::shapes::Mask;
///
/// let i = Mask::from_rows(&[[1, 1, 1, 1]]);
/// let vertical = rotate_clockwise(&i);
/// assert_eq!((vertical.rows(), vertical.cols()), (4, 1));
/// ```
pub fn rotate_clockwise(mask: &Mask) -> Mask {
    let src_rows = mask.rows();
    let mut out = Mask::blank(mask.cols(), src_rows);
    for r in 0..src_rows {
        for c in 0..mask.cols() {
            out.set(c, src_rows - 1 - r, mask.get(r, c));
        }
    }
    out
}
