//! Grid engine - occupancy and color layers
//!
//! Both layers are the same row-major flat grid type, so they always share
//! dimensions and row compaction can run the same code over each.
//! Coordinates: (row, col) where row 0 is the top and col 0 the left edge.
//!
//! Every operation here returns a new grid; the game state machine relies on
//! that to keep its snapshots immutable.

use crate::shapes::{Mask, Piece};
use crate::types::{ColorCell, Position};

/// Fixed-size grid stored as a flat row-major vector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    height: u8,
    width: u8,
    cells: Vec<T>,
}

/// Per-cell color of locked pieces, aligned with the occupancy grid
pub type ColorLayer = Grid<ColorCell>;

impl<T: Copy + Default> Grid<T> {
    /// A grid with every cell at `T::default()` (false / no color)
    pub fn empty(height: u8, width: u8) -> Self {
        Self {
            height,
            width,
            cells: vec![T::default(); height as usize * width as usize],
        }
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    #[inline(always)]
    fn index(&self, row: i8, col: i8) -> Option<usize> {
        if row < 0 || col < 0 || row as u8 >= self.height || col as u8 >= self.width {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    /// Cell at (row, col); `None` when out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<T> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col). Returns false if out of bounds.
    pub fn set(&mut self, row: i8, col: i8, value: T) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// One row as a slice
    ///
    /// # Panics
    ///
    /// Panics if `row >= height`.
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Remove every row flagged in `drop`, shift the survivors down keeping
    /// their order, and refill the top with default rows.
    fn compact(&self, drop: &[bool]) -> Self {
        let mut out = self.clone();
        let width = self.width as usize;
        let mut write_y = self.height as usize;

        // Scan from bottom to top
        for read_y in (0..self.height as usize).rev() {
            if drop[read_y] {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                out.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
        }

        // Clear the remaining rows at the top
        for cell in &mut out.cells[..write_y * width] {
            *cell = T::default();
        }

        out
    }
}

impl Grid<bool> {
    /// Bounds check for a mask anchored at `anchor`; does not look at the stack.
    ///
    /// The top guard rejects `anchor.row <= 0`, so a piece can only reach
    /// row 0 by spawning there.
    pub fn is_position_valid(&self, anchor: Position, mask: &Mask) -> bool {
        let max_row = anchor.row as i16 + mask.rows() as i16 - 1;
        let max_col = anchor.col as i16 + mask.cols() as i16 - 1;

        !(anchor.row <= 0
            || max_row > self.height as i16
            || anchor.col < 0
            || max_col >= self.width as i16)
    }

    /// True if any occupied mask cell lands below the last row or on a
    /// locked cell.
    pub fn check_collision(&self, anchor: Position, mask: &Mask) -> bool {
        mask.occupied().iter().any(|&(dr, dc)| {
            let row = anchor.row as i16 + dr as i16;
            let col = anchor.col as i16 + dc as i16;
            row >= self.height as i16 || self.is_occupied(row, col)
        })
    }

    /// True if every occupied mask cell is inside the grid and on an empty cell
    pub fn fits(&self, anchor: Position, mask: &Mask) -> bool {
        mask.occupied().iter().all(|&(dr, dc)| {
            let row = anchor.row as i16 + dr as i16;
            let col = anchor.col as i16 + dc as i16;
            row >= 0
                && col >= 0
                && row < self.height as i16
                && col < self.width as i16
                && !self.is_occupied(row, col)
        })
    }

    fn is_occupied(&self, row: i16, col: i16) -> bool {
        match (i8::try_from(row), i8::try_from(col)) {
            (Ok(row), Ok(col)) => self.get(row, col).unwrap_or(false),
            _ => false,
        }
    }

    /// Union of the grid and the translated mask. Never clears a cell;
    /// mask cells outside the grid are ignored.
    pub fn place_shape(&self, anchor: Position, mask: &Mask) -> Self {
        let mut out = self.clone();
        for &(dr, dc) in mask.occupied().iter() {
            out.set(anchor.row + dr, anchor.col + dc, true);
        }
        out
    }

    /// Any locked cell in the top row ends the game
    pub fn is_terminal(&self) -> bool {
        self.height > 0 && self.row(0).iter().any(|&cell| cell)
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }
}

impl ColorLayer {
    /// Paint the translated mask with the piece's color. Cells that already
    /// carry a color keep it.
    pub fn place_colors(&self, anchor: Position, piece: &Piece) -> Self {
        let mut out = self.clone();
        for &(dr, dc) in piece.mask().occupied().iter() {
            let (row, col) = (anchor.row + dr, anchor.col + dc);
            if let Some(None) = out.get(row, col) {
                out.set(row, col, Some(piece.color()));
            }
        }
        out
    }

    /// Occupancy implied by this layer (colored = occupied)
    pub fn occupancy(&self) -> Grid<bool> {
        Grid {
            height: self.height,
            width: self.width,
            cells: self.cells.iter().map(Option::is_some).collect(),
        }
    }
}

/// True iff every cell in the row is occupied
pub fn row_is_filled(row: &[bool]) -> bool {
    row.iter().all(|&cell| cell)
}

/// Result of [`clear_filled_rows`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cleared {
    pub grid: Grid<bool>,
    pub colors: ColorLayer,
    pub score: u32,
    /// Number of rows removed
    pub rows: u32,
}

/// Remove all filled rows at once, compact both layers, and score the clear.
///
/// Retained rows keep their relative order; `rows` fresh empty rows are
/// prepended at the top so the height is unchanged.
pub fn clear_filled_rows(grid: &Grid<bool>, colors: &ColorLayer, score: u32) -> Cleared {
    debug_assert_eq!(
        (grid.height, grid.width),
        (colors.height, colors.width),
        "occupancy and color layers must share dimensions"
    );

    let filled: Vec<bool> = grid.rows().map(row_is_filled).collect();
    let rows = filled.iter().filter(|&&f| f).count() as u32;

    if rows == 0 {
        return Cleared {
            grid: grid.clone(),
            colors: colors.clone(),
            score,
            rows,
        };
    }

    Cleared {
        grid: grid.compact(&filled),
        colors: colors.compact(&filled),
        score: score.saturating_add(crate::scoring::line_clear_score(rows)),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{create_piece, piece_mask};
    use crate::types::{PieceKind, Rgb};

    fn fill_row(grid: &mut Grid<bool>, row: i8) {
        for col in 0..grid.width() as i8 {
            grid.set(row, col, true);
        }
    }

    #[test]
    fn test_empty_grid_dimensions() {
        let grid: Grid<bool> = Grid::empty(20, 10);
        assert_eq!(grid.height(), 20);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(grid.rows().count(), 20);

        let colors: ColorLayer = Grid::empty(20, 10);
        assert!(colors.rows().all(|row| row.iter().all(Option::is_none)));
    }

    #[test]
    fn test_rows_do_not_alias() {
        let mut grid: Grid<bool> = Grid::empty(4, 3);
        grid.set(1, 1, true);
        assert!(!grid.row(0)[1]);
        assert!(grid.row(1)[1]);
        assert!(!grid.row(2)[1]);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid: Grid<bool> = Grid::empty(20, 10);
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(0, -1), None);
        assert_eq!(grid.get(20, 0), None);
        assert_eq!(grid.get(0, 10), None);
        assert_eq!(grid.get(19, 9), Some(false));
    }

    #[test]
    fn test_position_valid_top_guard() {
        let grid: Grid<bool> = Grid::empty(20, 10);
        let o = piece_mask(PieceKind::O);
        assert!(!grid.is_position_valid(Position::new(0, 4), &o));
        assert!(!grid.is_position_valid(Position::new(-1, 4), &o));
        assert!(grid.is_position_valid(Position::new(1, 4), &o));
    }

    #[test]
    fn test_position_valid_side_and_bottom_bounds() {
        let grid: Grid<bool> = Grid::empty(20, 10);
        let o = piece_mask(PieceKind::O);
        assert!(grid.is_position_valid(Position::new(5, 0), &o));
        assert!(!grid.is_position_valid(Position::new(5, -1), &o));
        assert!(grid.is_position_valid(Position::new(5, 8), &o));
        assert!(!grid.is_position_valid(Position::new(5, 9), &o));
        // The lowest mask row may sit one past the last row; collision then
        // reports the landing.
        assert!(grid.is_position_valid(Position::new(19, 4), &o));
        assert!(!grid.is_position_valid(Position::new(20, 4), &o));
    }

    #[test]
    fn test_position_valid_ignores_stack() {
        let mut grid: Grid<bool> = Grid::empty(20, 10);
        fill_row(&mut grid, 10);
        let o = piece_mask(PieceKind::O);
        assert!(grid.is_position_valid(Position::new(9, 4), &o));
    }

    #[test]
    fn test_collision_with_floor() {
        let grid: Grid<bool> = Grid::empty(20, 10);
        let o = piece_mask(PieceKind::O);
        assert!(!grid.check_collision(Position::new(18, 4), &o));
        assert!(grid.check_collision(Position::new(19, 4), &o));
    }

    #[test]
    fn test_collision_with_stack() {
        let mut grid: Grid<bool> = Grid::empty(20, 10);
        grid.set(15, 5, true);
        let o = piece_mask(PieceKind::O);
        assert!(grid.check_collision(Position::new(14, 4), &o));
        assert!(!grid.check_collision(Position::new(13, 4), &o));
        assert!(!grid.check_collision(Position::new(14, 6), &o));
    }

    #[test]
    fn test_collision_only_counts_occupied_mask_cells() {
        let mut grid: Grid<bool> = Grid::empty(20, 10);
        // T's bottom-left mask cell is empty
        grid.set(11, 3, true);
        let t = piece_mask(PieceKind::T);
        assert!(!grid.check_collision(Position::new(10, 3), &t));
        grid.set(11, 4, true);
        assert!(grid.check_collision(Position::new(10, 3), &t));
    }

    #[test]
    fn test_fits() {
        let mut grid: Grid<bool> = Grid::empty(20, 10);
        let i = piece_mask(PieceKind::I);
        assert!(grid.fits(Position::new(0, 6), &i));
        assert!(!grid.fits(Position::new(0, 7), &i));
        assert!(!grid.fits(Position::new(-1, 0), &i));
        grid.set(3, 2, true);
        assert!(!grid.fits(Position::new(3, 0), &i));
    }

    #[test]
    fn test_place_shape_is_union() {
        let mut grid: Grid<bool> = Grid::empty(20, 10);
        grid.set(19, 0, true);
        let placed = grid.place_shape(Position::new(18, 4), &piece_mask(PieceKind::O));

        assert_eq!(placed.occupied_count(), 5);
        assert_eq!(placed.get(19, 0), Some(true));
        assert_eq!(placed.get(18, 4), Some(true));
        assert_eq!(placed.get(19, 5), Some(true));
        // Input untouched
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_place_colors_first_write_wins() {
        let mut colors: ColorLayer = Grid::empty(20, 10);
        let existing = Rgb::new(1, 2, 3);
        colors.set(19, 4, Some(existing));

        let o = create_piece(PieceKind::O);
        let painted = colors.place_colors(Position::new(18, 4), &o);
        assert_eq!(painted.get(19, 4), Some(Some(existing)));
        assert_eq!(painted.get(18, 4), Some(Some(o.color())));
        assert_eq!(painted.get(18, 5), Some(Some(o.color())));
        assert_eq!(painted.get(19, 5), Some(Some(o.color())));
    }

    #[test]
    fn test_row_is_filled() {
        assert!(row_is_filled(&[true; 10]));
        let mut row = [true; 10];
        row[3] = false;
        assert!(!row_is_filled(&row));
    }

    #[test]
    fn test_is_terminal() {
        let mut grid: Grid<bool> = Grid::empty(20, 10);
        assert!(!grid.is_terminal());
        grid.set(1, 0, true);
        assert!(!grid.is_terminal());
        grid.set(0, 9, true);
        assert!(grid.is_terminal());
    }

    #[test]
    fn test_clear_no_rows() {
        let mut grid: Grid<bool> = Grid::empty(20, 10);
        grid.set(19, 0, true);
        let colors: ColorLayer = Grid::empty(20, 10);
        let cleared = clear_filled_rows(&grid, &colors, 40);
        assert_eq!(cleared.rows, 0);
        assert_eq!(cleared.score, 40);
        assert_eq!(cleared.grid, grid);
    }

    #[test]
    fn test_clear_non_contiguous_rows_at_once() {
        let mut grid: Grid<bool> = Grid::empty(6, 3);
        let mut colors: ColorLayer = Grid::empty(6, 3);
        let red = Some(Rgb::new(255, 0, 0));
        let blue = Some(Rgb::new(0, 0, 255));

        fill_row(&mut grid, 5);
        fill_row(&mut grid, 3);
        for col in 0..3 {
            colors.set(5, col, red);
            colors.set(3, col, red);
        }
        // Markers on the retained rows
        grid.set(4, 0, true);
        colors.set(4, 0, blue);
        grid.set(2, 2, true);
        colors.set(2, 2, blue);

        let cleared = clear_filled_rows(&grid, &colors, 0);
        assert_eq!(cleared.rows, 2);
        assert_eq!(cleared.score, 200);

        // Two empty rows on top, then the old rows 0..=2, then old row 4
        assert_eq!(cleared.grid.height(), 6);
        assert!(cleared.grid.row(0).iter().all(|&c| !c));
        assert!(cleared.grid.row(1).iter().all(|&c| !c));
        assert_eq!(cleared.grid.row(4), &[false, false, true]);
        assert_eq!(cleared.grid.row(5), &[true, false, false]);
        assert_eq!(cleared.colors.get(4, 2), Some(blue));
        assert_eq!(cleared.colors.get(5, 0), Some(blue));
        assert_eq!(cleared.colors.get(5, 1), Some(None));
        assert_eq!(cleared.colors.occupancy(), cleared.grid);
    }

    #[test]
    fn test_clear_every_row() {
        let mut grid: Grid<bool> = Grid::empty(4, 2);
        for row in 0..4 {
            fill_row(&mut grid, row);
        }
        let colors: ColorLayer = Grid::empty(4, 2);
        let cleared = clear_filled_rows(&grid, &colors, 0);
        assert_eq!(cleared.rows, 4);
        assert_eq!(cleared.grid.occupied_count(), 0);
    }
}
