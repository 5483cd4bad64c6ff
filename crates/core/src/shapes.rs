//! Shape catalog - piece masks, colors, and random draws
//!
//! Masks are small rectangular boolean matrices with their local origin at
//! the top-left cell. They are stored inline (at most 4x4) so pieces stay
//! `Copy` and snapshots never allocate for them.

use arrayvec::ArrayVec;

use crate::rng::SimpleRng;
use crate::rotation::rotate_clockwise;
use crate::types::{PieceKind, Rgb};

/// Largest mask side length
pub const MASK_MAX: usize = 4;

/// Offset of one occupied mask cell from the mask origin, as (row, col)
pub type CellOffset = (i8, i8);

/// Rectangular occupancy matrix of a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mask {
    rows: u8,
    cols: u8,
    cells: [[bool; MASK_MAX]; MASK_MAX],
}

impl Mask {
    /// An all-empty mask of the given dimensions
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or larger than [`MASK_MAX`].
    pub fn blank(rows: usize, cols: usize) -> Self {
        assert!(
            (1..=MASK_MAX).contains(&rows) && (1..=MASK_MAX).contains(&cols),
            "mask dimensions {rows}x{cols} out of range"
        );
        Self {
            rows: rows as u8,
            cols: cols as u8,
            cells: [[false; MASK_MAX]; MASK_MAX],
        }
    }

    /// Build a mask from rows of 0/1 values
    ///
    /// ```
    /// use blockfall_core::shapes::Mask;
    ///
    /// let t = Mask::from_rows(&[[1, 1, 1], [0, 1, 0]]);
    /// assert_eq!((t.rows(), t.cols()), (2, 3));
    /// assert!(t.get(1, 1));
    /// assert!(!t.get(1, 0));
    /// ```
    pub fn from_rows<const C: usize>(rows: &[[u8; C]]) -> Self {
        let mut mask = Self::blank(rows.len(), C);
        for (r, row) in rows.iter().enumerate() {
            for (c, &bit) in row.iter().enumerate() {
                mask.cells[r][c] = bit != 0;
            }
        }
        mask
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Cell at (row, col); false outside the mask
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && self.cells[row][col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: bool) {
        self.cells[row][col] = value;
    }

    /// Offsets of every occupied cell, row-major
    pub fn occupied(&self) -> ArrayVec<CellOffset, { MASK_MAX * MASK_MAX }> {
        let mut out = ArrayVec::new();
        for r in 0..self.rows() {
            for c in 0..self.cols() {
                if self.cells[r][c] {
                    out.push((r as i8, c as i8));
                }
            }
        }
        out
    }
}

/// A piece: kind, mask, and display color. Rotation yields a new piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    mask: Mask,
    color: Rgb,
}

impl Piece {
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Same piece with its mask turned 90° clockwise
    pub fn rotated(&self) -> Self {
        Self {
            mask: rotate_clockwise(&self.mask),
            ..*self
        }
    }
}

/// Canonical spawn mask for a piece kind
pub fn piece_mask(kind: PieceKind) -> Mask {
    match kind {
        PieceKind::I => Mask::from_rows(&[[1, 1, 1, 1]]),
        PieceKind::O => Mask::from_rows(&[[1, 1], [1, 1]]),
        PieceKind::T => Mask::from_rows(&[[1, 1, 1], [0, 1, 0]]),
        PieceKind::S => Mask::from_rows(&[[0, 1, 1], [1, 1, 0]]),
        PieceKind::Z => Mask::from_rows(&[[1, 1, 0], [0, 1, 1]]),
        PieceKind::J => Mask::from_rows(&[[1, 1, 1], [0, 0, 1]]),
        PieceKind::L => Mask::from_rows(&[[1, 1, 1], [1, 0, 0]]),
    }
}

/// Display color for a piece kind
pub fn color_of(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    }
}

/// Uniform, independent draw over the seven kinds (no bag)
pub fn random_kind(rng: &mut SimpleRng) -> PieceKind {
    PieceKind::ALL[rng.next_range(PieceKind::ALL.len() as u32) as usize]
}

pub fn create_piece(kind: PieceKind) -> Piece {
    Piece {
        kind,
        mask: piece_mask(kind),
        color: color_of(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_four_cells() {
        for kind in PieceKind::ALL {
            assert_eq!(piece_mask(kind).occupied().len(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn masks_have_no_empty_border_rows() {
        for kind in PieceKind::ALL {
            let mask = piece_mask(kind);
            for r in 0..mask.rows() {
                assert!((0..mask.cols()).any(|c| mask.get(r, c)), "{:?} row {}", kind, r);
            }
        }
    }

    #[test]
    fn colors_are_distinct() {
        for a in PieceKind::ALL {
            for b in PieceKind::ALL {
                if a != b {
                    assert_ne!(color_of(a), color_of(b));
                }
            }
        }
    }

    #[test]
    fn create_piece_composes_catalog() {
        let piece = create_piece(PieceKind::L);
        assert_eq!(piece.kind(), PieceKind::L);
        assert_eq!(*piece.mask(), piece_mask(PieceKind::L));
        assert_eq!(piece.color(), color_of(PieceKind::L));
    }

    #[test]
    fn random_kind_covers_catalog() {
        let mut rng = SimpleRng::new(7);
        let mut seen = Vec::new();
        for _ in 0..500 {
            let kind = random_kind(&mut rng);
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn occupied_is_row_major() {
        let s = piece_mask(PieceKind::S);
        assert_eq!(s.occupied().as_slice(), &[(0, 1), (0, 2), (1, 0), (1, 1)]);
    }

    #[test]
    #[should_panic]
    fn blank_rejects_oversized_mask() {
        let _ = Mask::blank(5, 1);
    }
}
