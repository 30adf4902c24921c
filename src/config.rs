use crate::coord::{PixelMap, PlaneWindow};
use crate::solver::MAX_ITER;

pub const DISPLAY_WIDTH: u32 = 800;
pub const DISPLAY_HEIGHT: u32 = DISPLAY_WIDTH;

/// Immutable render parameters shared by the scheduler and its workers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub window: PlaneWindow,
    pub max_iter: u32,
}

impl RenderConfig {
    pub fn new(width: u32, height: u32, window: PlaneWindow, max_iter: u32) -> Self {
        Self {
            width,
            height,
            window,
            max_iter,
        }
    }

    /// Canvas of `width` x `height` with the default window and iteration limit.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self::new(width, height, PlaneWindow::default(), MAX_ITER)
    }

    pub fn pixel_map(&self) -> PixelMap {
        PixelMap::new(&self.window, self.width, self.height)
    }

    pub fn pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::with_size(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}
