/// Bit 31: the tile is mirrored left-to-right.
pub const FLIPPED_HORIZONTALLY: u32 = 0x8000_0000;
/// Bit 30: the tile is mirrored top-to-bottom.
pub const FLIPPED_VERTICALLY: u32 = 0x4000_0000;
/// Bit 29: the tile is mirrored across its top-left/bottom-right diagonal.
pub const FLIPPED_DIAGONALLY: u32 = 0x2000_0000;
/// Bit 28: hexagonal maps rotate the tile by 120 degrees.
pub const ROTATED_HEXAGONAL_120: u32 = 0x1000_0000;

/// All four transform bits.
pub const FLAG_MASK: u32 =
    FLIPPED_HORIZONTALLY | FLIPPED_VERTICALLY | FLIPPED_DIAGONALLY | ROTATED_HEXAGONAL_120;

/// One raw tile layer entry: a global tile index in the low 28 bits and four
/// independent transform flags in the high bits.
///
/// A tile index of 0 means the cell is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cell(pub u32);

impl Cell {
    pub const EMPTY: Cell = Cell(0);

    /// The value exactly as stored in the layer data.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Global tile index with every flag bit cleared.
    #[inline]
    pub fn tile_index(self) -> u32 {
        self.0 & !FLAG_MASK
    }

    #[inline]
    pub fn flip_horizontal(self) -> bool {
        self.0 & FLIPPED_HORIZONTALLY != 0
    }

    #[inline]
    pub fn flip_vertical(self) -> bool {
        self.0 & FLIPPED_VERTICALLY != 0
    }

    #[inline]
    pub fn flip_diagonal(self) -> bool {
        self.0 & FLIPPED_DIAGONALLY != 0
    }

    #[inline]
    pub fn rotate_hex_120(self) -> bool {
        self.0 & ROTATED_HEXAGONAL_120 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.tile_index() == 0
    }
}

impl From<u32> for Cell {
    fn from(raw: u32) -> Self {
        Cell(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAGS: [u32; 4] = [
        FLIPPED_HORIZONTALLY,
        FLIPPED_VERTICALLY,
        FLIPPED_DIAGONALLY,
        ROTATED_HEXAGONAL_120,
    ];

    #[test]
    fn horizontal_flip_on_tile_three() {
        let cell = Cell(0x8000_0003);
        assert_eq!(cell.tile_index(), 3);
        assert!(cell.flip_horizontal());
        assert!(!cell.flip_vertical());
        assert!(!cell.flip_diagonal());
        assert!(!cell.rotate_hex_120());
    }

    #[test]
    fn every_flag_combination_is_independent() {
        for index in [0u32, 1, 3, 0x0fff_ffff, 0x0123_4567] {
            for combo in 0..16u32 {
                let mut raw = index;
                for (bit, flag) in FLAGS.iter().enumerate() {
                    if combo & (1 << bit) != 0 {
                        raw |= flag;
                    }
                }
                let cell = Cell(raw);
                assert_eq!(cell.tile_index(), raw & 0x0fff_ffff);
                assert_eq!(cell.tile_index(), index);
                assert_eq!(cell.flip_horizontal(), combo & 1 != 0);
                assert_eq!(cell.flip_vertical(), combo & 2 != 0);
                assert_eq!(cell.flip_diagonal(), combo & 4 != 0);
                assert_eq!(cell.rotate_hex_120(), combo & 8 != 0);
            }
        }
    }

    #[test]
    fn flagged_empty_cell_is_still_empty() {
        assert!(Cell::EMPTY.is_empty());
        assert!(Cell(FLAG_MASK).is_empty());
        assert!(!Cell(FLIPPED_VERTICALLY | 1).is_empty());
    }
}
