#![allow(clippy::new_without_default)]

//! Chaos-game renderer for iterated function system attractors.
//!
//! An IFS is a small set of contraction maps; repeatedly applying
//! randomly chosen maps to any starting point traces out the system's
//! attractor. The pipeline samples trajectory endpoints while growing
//! a bounding window around them, fits the window to the target
//! resolution, rasterizes the endpoints onto a two-color buffer, and
//! hands the buffer to the image encoder.

use image::RgbImage;

use crate::coord::{Grid, Resolution, Window};
use crate::error::{RenderError, Result};
use crate::fractal::Ifs;
use crate::raster::{blank_mask, Painter, Palette, PalettePainter, Rasterizer};
use crate::sampler::{ChaosGameSampler, SeedArea, DEFAULT_ITERATIONS, DEFAULT_SAMPLES};

pub mod coord;
pub mod error;
pub mod fractal;
pub mod raster;
pub mod sampler;
pub mod threads;

/// Smallest window extent substituted for a degenerate axis.
pub const MIN_WINDOW_EXTENT: f64 = 1e-6;

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub resolution: Resolution,
    /// Linear supersampling factor; the caller downscales afterwards.
    pub supersample: usize,
    /// Relative margin added around the sampled extent on each axis.
    pub padding: f64,
    /// Map applications per sample.
    pub iterations: usize,
    /// Trajectory endpoints to sample.
    pub samples: usize,
    pub palette: Palette,
    pub seed_area: SeedArea,
    /// Fixed seed and thread count give byte-identical renders.
    pub seed: u64,
    pub threads: usize,
    /// Window the attractor is known to occupy, unioned with the
    /// sampled extent before fitting.
    pub min_window: Option<Window>,
}

impl RenderConfig {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            supersample: 3,
            padding: 0.0,
            iterations: DEFAULT_ITERATIONS,
            samples: DEFAULT_SAMPLES,
            palette: Palette::default(),
            seed_area: SeedArea::default(),
            seed: 0,
            threads: num_cpus::get_physical(),
            min_window: None,
        }
    }

    pub fn render_resolution(&self) -> Resolution {
        self.resolution.scaled(self.supersample)
    }
}

/// Pad, repair and aspect-fit the sampled window for a resolution.
/// Fails if the window never saw a finite point.
pub fn fit_window(
    mut window: Window,
    padding: f64,
    resolution: Resolution,
    min_window: Option<&Window>,
) -> Result<Window> {
    if let Some(m) = min_window {
        window.merge(m);
    }
    if !window.is_finite() {
        return Err(RenderError::DegenerateWindow);
    }
    window.pad(padding, padding);
    window.ensure_min_extent(MIN_WINDOW_EXTENT);
    window.match_aspect_ratio(resolution);
    Ok(window)
}

/// Sample endpoints, fit the window, rasterize, paint.
pub fn render(ifs: &Ifs, config: &RenderConfig) -> Result<RgbImage> {
    let resolution = config.render_resolution();
    let painter = PalettePainter::new(config.palette);

    let sampler = ChaosGameSampler::new(ifs.clone(), config.iterations, config.seed_area);
    let set = sampler.run(config.samples, config.seed, config.threads)?;
    if set.is_empty() && config.min_window.is_none() {
        return Ok(painter.paint(&blank_mask(resolution)));
    }

    let window = fit_window(
        set.window().clone(),
        config.padding,
        resolution,
        config.min_window.as_ref(),
    )?;
    let grid = Grid::new(window, resolution);
    let hits = Rasterizer::new(grid).hits(set.points());
    Ok(painter.paint(&hits))
}
