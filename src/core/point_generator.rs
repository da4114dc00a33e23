use rayon::prelude::*;

use crate::shared::constants;

/// A centered pixel coordinate. `z` is always zero for frame points.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

pub struct PointGenerator {
    pub width: usize,
    pub height: usize,
}

impl PointGenerator {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Turn a frame buffer into one point per non-white pixel, row-major.
    ///
    /// `None` means no frame has been loaded yet and yields an empty set.
    pub fn generate(&self, frame: Option<&[u8]>) -> Vec<Point> {
        let Some(pixel_data) = frame else {
            crate::utils::logger::debug("point generator: frame data not initialized");
            return Vec::new();
        };

        let w = self.width;
        let center_x = (w / 2) as i32;
        let center_y = (self.height / 2) as i32;
        let stride = constants::CHANNEL_STRIDE;

        // Only rows fully present in the buffer are scanned
        let rows = self.height.min(pixel_data.len() / (w * stride).max(1));

        (0..rows)
            .into_par_iter()
            .flat_map_iter(|y| {
                let row = &pixel_data[y * w * stride..(y + 1) * w * stride];
                row.chunks_exact(stride)
                    .enumerate()
                    .filter(|(_, px)| px[0] != constants::WHITE)
                    .map(move |(x, _)| Point::new(x as i32 - center_x, y as i32 - center_y, 0))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_white_frame_is_empty() {
        let generator = PointGenerator::new(48, 36);
        let frame = vec![255u8; 48 * 36 * 3];
        assert!(generator.generate(Some(&frame)).is_empty());
    }

    #[test]
    fn test_all_black_frame_fills_every_pixel() {
        let (w, h) = (6usize, 4usize);
        let generator = PointGenerator::new(w, h);
        let frame = vec![0u8; w * h * 3];

        let points = generator.generate(Some(&frame));
        assert_eq!(points.len(), w * h);

        let mut i = 0;
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                assert_eq!(points[i], Point::new(x - 3, y - 2, 0));
                i += 1;
            }
        }
    }

    #[test]
    fn test_single_dark_pixel_at_origin_corner() {
        let generator = PointGenerator::new(4, 4);
        let mut frame = vec![255u8; 4 * 4 * 3];
        frame[0] = 0;
        frame[1] = 0;
        frame[2] = 0;

        assert_eq!(generator.generate(Some(&frame)), vec![Point::new(-2, -2, 0)]);
    }

    #[test]
    fn test_gray_counts_as_on() {
        let generator = PointGenerator::new(2, 1);
        let frame = [254u8, 254, 254, 255, 255, 255];
        assert_eq!(generator.generate(Some(&frame)), vec![Point::new(-1, 0, 0)]);
    }

    #[test]
    fn test_odd_size_uses_floor_centering() {
        let generator = PointGenerator::new(3, 3);
        let mut frame = vec![255u8; 3 * 3 * 3];
        // (2, 2): last pixel
        frame[24] = 0;
        assert_eq!(generator.generate(Some(&frame)), vec![Point::new(1, 1, 0)]);
    }

    #[test]
    fn test_no_frame_loaded_is_empty() {
        let generator = PointGenerator::new(4, 4);
        assert!(generator.generate(None).is_empty());
    }

    #[test]
    fn test_short_buffer_scans_complete_rows_only() {
        let generator = PointGenerator::new(2, 2);
        // One full row plus a partial second row
        let frame = vec![0u8; 2 * 3 + 2];
        assert_eq!(
            generator.generate(Some(&frame)),
            vec![Point::new(-1, -1, 0), Point::new(0, -1, 0)]
        );
    }
}
