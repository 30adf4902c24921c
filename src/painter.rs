use image::Rgb;

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

pub trait Painter {
    fn color(&self, i_value: u32) -> Rgb<u8>;
}

/// Red banding palette: interior points are black, escaped points get a
/// red channel of `10 * k` wrapped modulo 256.
#[derive(Copy, Clone, Debug)]
pub struct RedBands {
    max_iter: u32,
}

impl RedBands {
    pub fn new(max_iter: u32) -> Self {
        Self { max_iter }
    }
}

impl Painter for RedBands {
    fn color(&self, i_value: u32) -> Rgb<u8> {
        if i_value >= self.max_iter {
            return BLACK;
        }
        let red = (10 * u64::from(i_value)) % 256;
        Rgb([red as u8, 0, 0])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solver::MAX_ITER;

    #[test]
    fn test_red_bands() {
        let painter = RedBands::new(MAX_ITER);
        assert_eq!(painter.color(0), BLACK);
        assert_eq!(painter.color(1), Rgb([10, 0, 0]));
        assert_eq!(painter.color(25), Rgb([250, 0, 0]));
        assert_eq!(painter.color(255), Rgb([246, 0, 0]));
    }

    #[test]
    fn test_red_channel_wraps() {
        let painter = RedBands::new(MAX_ITER);
        assert_eq!(painter.color(26), Rgb([4, 0, 0]));
        assert_eq!(painter.color(52), Rgb([8, 0, 0]));
    }

    #[test]
    fn test_interior_is_black() {
        let painter = RedBands::new(MAX_ITER);
        assert_eq!(painter.color(MAX_ITER), BLACK);
        assert_eq!(RedBands::new(30).color(30), BLACK);
        assert_eq!(RedBands::new(30).color(29), Rgb([34, 0, 0]));
    }
}
