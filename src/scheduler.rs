use image::{Rgb, RgbImage};
use log::trace;

use crate::config::RenderConfig;
use crate::painter::{Painter, RedBands};
use crate::solver::escape_time;
use crate::threads::{Distribution, PoolError, WorkerPool};
use crate::tile::{Tile, TileGrid};

/// Colors of one tile, row-major.
#[derive(Clone, Debug)]
pub struct RenderedTile {
    pub tile: Tile,
    pub pixels: Vec<Rgb<u8>>,
}

impl RenderedTile {
    /// Copy the tile's pixels into its region of `canvas`.
    pub fn blit(&self, canvas: &mut RgbImage) {
        for ((row, col), color) in self.tile.pixels().zip(&self.pixels) {
            canvas.put_pixel(col, row, *color);
        }
    }
}

pub fn render_tile(config: &RenderConfig, tile: Tile) -> RenderedTile {
    let map = config.pixel_map();
    let painter = RedBands::new(config.max_iter);
    let pixels = tile
        .pixels()
        .map(|(row, col)| painter.color(escape_time(map.point(row, col), config.max_iter)))
        .collect();
    RenderedTile { tile, pixels }
}

/// Render the whole canvas on the calling thread.
pub fn render_sequential(config: &RenderConfig) -> RgbImage {
    let mut canvas = RgbImage::new(config.width, config.height);
    let whole = Tile::new(0..config.height, 0..config.width);
    render_tile(config, whole).blit(&mut canvas);
    canvas
}

/// Renders canvases by splitting them into grain-sized tiles and running
/// the tiles on a worker pool.
pub struct TileScheduler {
    config: RenderConfig,
    distribution: Distribution,
    pool: WorkerPool<Tile, RenderedTile>,
}

impl TileScheduler {
    pub fn new(
        config: RenderConfig,
        threads: usize,
        distribution: Distribution,
    ) -> Result<Self, PoolError> {
        let pool = WorkerPool::with(threads, || move |tile: Tile| render_tile(&config, tile))?;
        Ok(Self {
            config,
            distribution,
            pool,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn threads(&self) -> usize {
        self.pool.threads()
    }

    pub fn new_canvas(&self) -> RgbImage {
        RgbImage::new(self.config.width, self.config.height)
    }

    /// Overwrite every pixel of `canvas`, using tiles of at most `grain`
    /// pixels per side. Returns once all tiles are written.
    pub fn render(&self, canvas: &mut RgbImage, grain: u32) -> Result<(), PoolError> {
        assert_eq!(
            canvas.dimensions(),
            (self.config.width, self.config.height),
            "canvas size does not match render config"
        );
        let grid = TileGrid::new(self.config.height, self.config.width, grain);
        let tiles: Vec<Tile> = grid.iter().collect();
        trace!("grain {}: {} tiles", grid.grain(), tiles.len());

        let mut written = 0;
        self.pool.run(tiles, self.distribution, |rendered| {
            written += rendered.pixels.len();
            rendered.blit(canvas);
        })?;
        debug_assert_eq!(written, self.config.pixels());
        Ok(())
    }
}
