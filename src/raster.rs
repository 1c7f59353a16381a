//! Endpoints marked on a boolean hit mask, painted through a
//! two-color palette into an RGB buffer.

use image::{Rgb, RgbImage};
use ndarray::Array2;

use crate::coord::{Grid, Point, Resolution};

/// Two-entry palette; defaults are Nord colors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb<u8>,
    pub foreground: Rgb<u8>,
}

impl Palette {
    pub fn new(background: Rgb<u8>, foreground: Rgb<u8>) -> Self {
        Self {
            background,
            foreground,
        }
    }

    pub fn class_color(&self, hit: bool) -> Rgb<u8> {
        if hit {
            self.foreground
        } else {
            self.background
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Rgb([0x2e, 0x34, 0x40]), Rgb([0xeb, 0xcb, 0x8b]))
    }
}

/// Marks points on a hit mask sized to the grid's resolution.
/// Out-of-range pixel indices are dropped; the mapping pushes
/// window-edge points one past the buffer.
pub struct Rasterizer {
    grid: Grid,
}

impl Rasterizer {
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn hits(&self, points: &[Point]) -> Array2<bool> {
        let res = self.grid.resolution();
        let mut hits = Array2::from_elem((res.height, res.width), false);
        for &p in points {
            let (col, row) = self.grid.get_pixel(p);
            if col >= 0 && (col as usize) < res.width && row >= 0 && (row as usize) < res.height {
                hits[[row as usize, col as usize]] = true;
            }
        }
        hits
    }
}

pub fn blank_mask(resolution: Resolution) -> Array2<bool> {
    Array2::from_elem((resolution.height, resolution.width), false)
}

pub trait Painter {
    fn class_color(&self, hit: bool) -> Rgb<u8>;

    fn paint(&self, hits: &Array2<bool>) -> RgbImage {
        let width: u32 = hits.ncols().try_into().unwrap();
        let height: u32 = hits.nrows().try_into().unwrap();

        let mut img = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let color = self.class_color(hits[[y as usize, x as usize]]);
                img.put_pixel(x, y, color);
            }
        }
        img
    }
}

pub struct PalettePainter {
    palette: Palette,
}

impl PalettePainter {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }
}

impl Painter for PalettePainter {
    fn class_color(&self, hit: bool) -> Rgb<u8> {
        self.palette.class_color(hit)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coord::Window;

    fn grid_10x5() -> Grid {
        Grid::new(
            Window::new(0.0, 10.0, 0.0, 5.0),
            Resolution::new(10, 5).unwrap(),
        )
    }

    #[test]
    fn test_no_points_no_hits() {
        let hits = Rasterizer::new(grid_10x5()).hits(&[]);
        assert_eq!(hits.dim(), (5, 10));
        assert!(!hits.iter().any(|&h| h));
    }

    #[test]
    fn test_hits_are_idempotent() {
        let r = Rasterizer::new(grid_10x5());
        let p = Point::new(2.5, 2.5);
        let once = r.hits(&[p]);
        let thrice = r.hits(&[p, p, p]);
        assert_eq!(once, thrice);
        assert_eq!(once.iter().filter(|&&h| h).count(), 1);
    }

    #[test]
    fn test_out_of_range_points_dropped() {
        let r = Rasterizer::new(grid_10x5());
        // far outside, on the lower edge (row == height), and past
        // the right edge: none of these may write or panic
        let hits = r.hits(&[
            Point::new(-100.0, 2.0),
            Point::new(3.0, 0.0),
            Point::new(10.0, 2.0),
            Point::new(5.0, 500.0),
        ]);
        assert!(!hits.iter().any(|&h| h));
    }

    #[test]
    fn test_interior_point_lands_in_bounds() {
        let r = Rasterizer::new(grid_10x5());
        let hits = r.hits(&[Point::new(0.5, 4.5)]);
        assert!(hits[[1, 0]]);
        assert_eq!(hits.iter().filter(|&&h| h).count(), 1);
    }

    #[test]
    fn test_paint_background_only() {
        let palette = Palette::default();
        let img = PalettePainter::new(palette).paint(&blank_mask(Resolution::new(4, 3).unwrap()));
        assert_eq!(img.dimensions(), (4, 3));
        for p in img.pixels() {
            assert_eq!(*p, palette.background);
        }
    }

    #[test]
    fn test_paint_foreground_hit() {
        let palette = Palette::new(Rgb([0, 0, 0]), Rgb([255, 255, 255]));
        let mut hits = blank_mask(Resolution::new(3, 3).unwrap());
        hits[[2, 1]] = true;
        let img = PalettePainter::new(palette).paint(&hits);
        assert_eq!(*img.get_pixel(1, 2), palette.foreground);
        assert_eq!(*img.get_pixel(0, 0), palette.background);
    }
}
