//! Mandelbrot rendering over a tiled worker pool, and a sweep timing how
//! the tile grain size affects render time.

mod complex;
pub mod config;
pub mod coord;
pub mod painter;
pub mod report;
pub mod scheduler;
pub mod solver;
pub mod sweep;
pub mod threads;
pub mod tile;

pub use complex::{c, C};
