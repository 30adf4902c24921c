use crate::complex::{c, C};

/// Rectangular region of the complex plane sampled by the canvas.
///
/// Screen rows grow downward while the imaginary part shrinks, so
/// `bottom_right.im` is usually below `top_left.im`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneWindow {
    pub top_left: C<f64>,
    pub bottom_right: C<f64>,
}

impl PlaneWindow {
    pub fn new(top_left: C<f64>, bottom_right: C<f64>) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    pub fn diff(&self) -> C<f64> {
        self.bottom_right - self.top_left
    }

    /// Plane distance between two horizontally adjacent pixels.
    pub fn delta_x(&self, width: u32) -> f64 {
        self.diff().re / width as f64
    }

    /// Plane distance between two vertically adjacent pixels.
    pub fn delta_y(&self, height: u32) -> f64 {
        self.diff().im / height as f64
    }
}

impl Default for PlaneWindow {
    fn default() -> Self {
        Self::new(c(-2.2, 1.5), c(0.8, -1.5))
    }
}

/// Affine pixel -> plane mapping for a fixed canvas size.
#[derive(Copy, Clone, Debug)]
pub struct PixelMap {
    origin: C<f64>,
    delta_x: f64,
    delta_y: f64,
}

impl PixelMap {
    pub fn new(window: &PlaneWindow, width: u32, height: u32) -> Self {
        Self {
            origin: window.top_left,
            delta_x: window.delta_x(width),
            delta_y: window.delta_y(height),
        }
    }

    pub fn point(&self, row: u32, col: u32) -> C<f64> {
        self.origin + c(self.delta_x * col as f64, self.delta_y * row as f64)
    }
}
