//! Plane geometry for the renderer: points, the growable bounding
//! window of the attractor, and the pixel grid derived from a fitted
//! window and a target resolution.

use crate::error::{RenderError, Result};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

impl Resolution {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn scaled(&self, factor: usize) -> Self {
        let factor = factor.max(1);
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Axis-aligned rectangle of the plane being rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct Window {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Window {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Inverted sentinel; the first included point makes it valid.
    pub fn empty() -> Self {
        Self::new(
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width() / self.height()
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
    }

    pub fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn merge(&mut self, other: &Window) {
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn contains(&self, p: Point) -> bool {
        self.min_x <= p.x && p.x <= self.max_x && self.min_y <= p.y && p.y <= self.max_y
    }

    pub fn pad(&mut self, x_factor: f64, y_factor: f64) {
        let width = self.width();
        let height = self.height();
        self.min_x -= width * x_factor / 2.0;
        self.max_x += width * x_factor / 2.0;
        self.min_y -= height * y_factor / 2.0;
        self.max_y += height * y_factor / 2.0;
    }

    /// Expand any axis narrower than `min` symmetrically to `min`.
    pub fn ensure_min_extent(&mut self, min: f64) {
        if self.width() < min {
            let cx = (self.min_x + self.max_x) / 2.0;
            self.min_x = cx - min / 2.0;
            self.max_x = cx + min / 2.0;
        }
        if self.height() < min {
            let cy = (self.min_y + self.max_y) / 2.0;
            self.min_y = cy - min / 2.0;
            self.max_y = cy + min / 2.0;
        }
    }

    /// Grow one axis so the proportions match the resolution; ties
    /// grow the width.
    pub fn match_aspect_ratio(&mut self, resolution: Resolution) {
        let rx = resolution.width as f64;
        let ry = resolution.height as f64;
        let d_x = self.width() / rx;
        let d_y = self.height() / ry;
        if d_x <= d_y {
            let d_width = (self.height() * rx / ry - self.width()) / 2.0;
            self.min_x -= d_width;
            self.max_x += d_width;
        } else {
            let d_height = (self.width() * ry / rx - self.height()) / 2.0;
            self.min_y -= d_height;
            self.max_y += d_height;
        }
    }
}

/// Pixel-index mapping for a fitted window and resolution.
#[derive(Clone, Debug)]
pub struct Grid {
    window: Window,
    resolution: Resolution,
}

impl Grid {
    pub fn new(window: Window, resolution: Resolution) -> Self {
        Self { window, resolution }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn x_step(&self) -> f64 {
        self.window.width() / self.resolution.width as f64
    }

    pub fn y_step(&self) -> f64 {
        self.window.height() / self.resolution.height as f64
    }

    /// Signed (column, row), row 0 at the top. Points on or past the
    /// window edges land outside [0,W)x[0,H); callers drop those.
    pub fn get_pixel(&self, p: Point) -> (i64, i64) {
        let i = ((p.x - self.window.min_x) / self.x_step()).floor() as i64;
        let j = ((p.y - self.window.min_y) / self.y_step()).floor() as i64;
        (i, self.resolution.height as i64 - j)
    }
}
