use std::ops::Range;

/// Rectangular block of canvas pixels, half-open in both dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub rows: Range<u32>,
    pub cols: Range<u32>,
}

impl Tile {
    pub fn new(rows: Range<u32>, cols: Range<u32>) -> Self {
        Self { rows, cols }
    }

    pub fn height(&self) -> u32 {
        self.rows.end - self.rows.start
    }

    pub fn width(&self) -> u32 {
        self.cols.end - self.cols.start
    }

    pub fn len(&self) -> usize {
        self.height() as usize * self.width() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pixel coordinates as `(row, col)`, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.rows
            .clone()
            .flat_map(move |row| self.cols.clone().map(move |col| (row, col)))
    }
}

/// Partition of a `height` x `width` grid into tiles no larger than
/// `grain` along either axis. Tiles on the bottom and right edges are
/// smaller when the grain does not divide the grid.
#[derive(Clone, Debug)]
pub struct TileGrid {
    height: u32,
    width: u32,
    grain: u32,
}

impl TileGrid {
    pub fn new(height: u32, width: u32, grain: u32) -> Self {
        Self {
            height,
            width,
            grain: grain.max(1),
        }
    }

    pub fn grain(&self) -> u32 {
        self.grain
    }

    pub fn rows(&self) -> u32 {
        self.height.div_ceil(self.grain)
    }

    pub fn cols(&self) -> u32 {
        self.width.div_ceil(self.grain)
    }

    pub fn len(&self) -> usize {
        self.rows() as usize * self.cols() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> TileGridIter {
        TileGridIter {
            grid: self.clone(),
            row: 0,
            col: 0,
        }
    }
}

impl IntoIterator for &TileGrid {
    type Item = Tile;
    type IntoIter = TileGridIter;
    fn into_iter(self) -> TileGridIter {
        self.iter()
    }
}

pub struct TileGridIter {
    grid: TileGrid,
    row: u32,
    col: u32,
}

impl Iterator for TileGridIter {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        let TileGrid {
            height,
            width,
            grain,
        } = self.grid;
        if self.row >= height || width == 0 {
            return None;
        }
        let tile = Tile::new(
            self.row..(self.row + grain).min(height),
            self.col..(self.col + grain).min(width),
        );
        self.col = tile.cols.end;
        if self.col >= width {
            self.col = 0;
            self.row = tile.rows.end;
        }
        Some(tile)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_exact_cover(height: u32, width: u32, grain: u32) {
        let grid = TileGrid::new(height, width, grain);
        let mut hits = vec![0u8; height as usize * width as usize];
        let mut count = 0;
        for tile in &grid {
            assert!(!tile.is_empty());
            assert!(tile.height() <= grid.grain());
            assert!(tile.width() <= grid.grain());
            for (row, col) in tile.pixels() {
                hits[(row * width + col) as usize] += 1;
            }
            count += 1;
        }
        assert_eq!(count, grid.len());
        assert!(
            hits.iter().all(|&h| h == 1),
            "grid {}x{} grain {} not covered exactly once",
            height,
            width,
            grain
        );
    }

    #[test]
    fn test_exact_cover() {
        for grain in [1, 2, 3, 7, 19, 20, 40, 64, 100, 101] {
            assert_exact_cover(100, 100, grain);
            assert_exact_cover(37, 53, grain);
        }
        assert_exact_cover(1, 1, 1);
        assert_exact_cover(800, 800, 800);
    }

    #[test]
    fn test_tile_counts() {
        assert_eq!(TileGrid::new(800, 800, 1).len(), 640_000);
        assert_eq!(TileGrid::new(800, 800, 19).len(), 43 * 43);
        assert_eq!(TileGrid::new(800, 800, 800).len(), 1);
        assert_eq!(TileGrid::new(10, 30, 20).len(), 2);
    }

    #[test]
    fn test_edge_tiles_are_trimmed() {
        let tiles: Vec<Tile> = TileGrid::new(5, 7, 3).iter().collect();
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[0], Tile::new(0..3, 0..3));
        assert_eq!(tiles[2], Tile::new(0..3, 6..7));
        assert_eq!(tiles[5], Tile::new(3..5, 6..7));
    }

    #[test]
    fn test_zero_grain_behaves_as_one() {
        assert_eq!(TileGrid::new(4, 4, 0).len(), 16);
        assert_exact_cover(4, 4, 0);
    }

    #[test]
    fn test_empty_grid() {
        assert!(TileGrid::new(0, 10, 4).iter().next().is_none());
        assert!(TileGrid::new(10, 0, 4).iter().next().is_none());
        assert!(TileGrid::new(10, 0, 4).is_empty());
    }
}
