use crate::cell::Cell;
use crate::error::{Error, Result};

/// Rectangular grid of cells with row-major storage.
///
/// The shape comes from the owning layer; `cells.len() == width * height`
/// always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Create a new grid filled with empty cells.
    pub fn new(width: u32, height: u32) -> Self {
        let cells = vec![Cell::EMPTY; width as usize * height as usize];
        Self {
            width,
            height,
            cells,
        }
    }

    /// Create a grid from row-major cells, or `None` unless `cells` holds
    /// exactly `width * height` entries.
    pub fn from_cells(width: u32, height: u32, cells: Vec<Cell>) -> Option<Self> {
        let expected = (width as usize).checked_mul(height as usize)?;
        (cells.len() == expected).then_some(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Row `y`, exactly `width` cells long.
    pub fn row(&self, y: u32) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks_exact panics on zero, and a zero-width grid has no rows anyway
        self.cells.chunks_exact(self.width.max(1) as usize)
    }

    /// Bounds-checked cell lookup.
    ///
    /// `x` is checked against the width and `y` against the height before the
    /// storage is touched; the error names the failing coordinate.
    pub fn get(&self, x: i32, y: i32) -> Result<Cell> {
        if x < 0 || x as i64 >= self.width as i64 {
            return Err(Error::OutOfRange {
                axis: 'x',
                value: x as i64,
                bound: "width",
                limit: self.width,
            });
        }
        if y < 0 || y as i64 >= self.height as i64 {
            return Err(Error::OutOfRange {
                axis: 'y',
                value: y as i64,
                bound: "height",
                limit: self.height,
            });
        }
        Ok(self.cells[y as usize * self.width as usize + x as usize])
    }

    #[inline]
    pub(crate) fn set(&mut self, x: u32, y: u32, cell: Cell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    pub fn tile_index(&self, x: i32, y: i32) -> Result<u32> {
        self.get(x, y).map(Cell::tile_index)
    }

    pub fn flip_horizontal(&self, x: i32, y: i32) -> Result<bool> {
        self.get(x, y).map(Cell::flip_horizontal)
    }

    pub fn flip_vertical(&self, x: i32, y: i32) -> Result<bool> {
        self.get(x, y).map(Cell::flip_vertical)
    }

    pub fn flip_diagonal(&self, x: i32, y: i32) -> Result<bool> {
        self.get(x, y).map(Cell::flip_diagonal)
    }

    pub fn rotate_hex_120(&self, x: i32, y: i32) -> Result<bool> {
        self.get(x, y).map(Cell::rotate_hex_120)
    }
}
