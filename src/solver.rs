use crate::complex::C;

pub const MAX_ITER: u32 = 256;

/// Squared escape radius; `|z| >= 2` without the square root.
const ESCAPE_NORM_SQR: f64 = 4.0;

/// Number of iterations of `z -> z^2 + c`, starting from `z = c`, before
/// `|z|^2 >= 4`. Points that never escape return `max_iter`.
pub fn escape_time(c: C<f64>, max_iter: u32) -> u32 {
    let mut i = 0;
    let mut z = c;
    while i != max_iter && z.norm_sqr() < ESCAPE_NORM_SQR {
        z = z * z + c;
        i += 1;
    }
    i
}
