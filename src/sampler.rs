//! Chaos-game sampling: each sample draws a seed point from a uniform
//! box, applies K randomly chosen maps, and keeps the endpoint.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coord::{Point, Window};
use crate::error::{RenderError, Result};
use crate::fractal::Ifs;
use crate::threads::{Call, Join, Split, WorkerPool};

pub const DEFAULT_ITERATIONS: usize = 50;
pub const DEFAULT_SAMPLES: usize = 500_000;

/// Uniform seed distribution over an axis-aligned box.
#[derive(Copy, Clone, Debug)]
pub struct SeedArea {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl SeedArea {
    /// Bounds are normalized, so an inverted pair is the same box.
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            max_x: min_x.max(max_x),
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
        }
    }

    pub fn draw<R: Rng>(&self, rng: &mut R) -> Point {
        Point::new(
            rng.gen_range(self.min_x..=self.max_x),
            rng.gen_range(self.min_y..=self.max_y),
        )
    }
}

impl Default for SeedArea {
    fn default() -> Self {
        Self::new(-10.0, 10.0, -10.0, 10.0)
    }
}

/// A sampling work order: a sample budget and a deterministic random
/// stream. Splitting gives every part its own stream index.
#[derive(Copy, Clone, Debug)]
pub struct SampleBatch {
    pub samples: usize,
    pub seed: u64,
    pub stream: u64,
}

impl SampleBatch {
    pub fn new(samples: usize, seed: u64) -> Self {
        Self {
            samples,
            seed,
            stream: 0,
        }
    }

    fn stream_seed(&self) -> u64 {
        self.seed.wrapping_add(self.stream)
    }
}

impl Split for SampleBatch {
    fn split_parts(self, n: usize) -> Vec<Self> {
        let size = self.samples / n;
        let xtra = self.samples % n;
        (0..n)
            .map(|i| Self {
                samples: if i < xtra { size + 1 } else { size },
                seed: self.seed,
                stream: self.stream + i as u64,
            })
            .collect()
    }
}

/// Endpoints plus the window grown around them.
#[derive(Clone, Debug)]
pub struct SampleSet {
    points: Vec<Point>,
    window: Window,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            window: Window::empty(),
        }
    }

    pub fn push(&mut self, p: Point) {
        self.window.include(p);
        self.points.push(p);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Join for SampleSet {
    fn join_parts(parts: Vec<Self>) -> Self {
        let mut joined = Self::with_capacity(parts.iter().map(|p| p.len()).sum());
        for part in parts {
            joined.window.merge(&part.window);
            joined.points.extend_from_slice(&part.points);
        }
        joined
    }
}

#[derive(Clone, Debug)]
pub struct ChaosGameSampler {
    ifs: Ifs,
    iterations: usize,
    seed_area: SeedArea,
}

impl ChaosGameSampler {
    pub fn new(ifs: Ifs, iterations: usize, seed_area: SeedArea) -> Self {
        Self {
            ifs,
            iterations,
            seed_area,
        }
    }

    pub fn project<R: Rng>(&self, mut p: Point, rng: &mut R) -> Point {
        for _ in 0..self.iterations {
            let map = &self.ifs.maps()[rng.gen_range(0..self.ifs.len())];
            p = map.apply(p);
        }
        p
    }

    /// Fails on the first non-finite endpoint, before it reaches the
    /// window.
    pub fn sample_batch(&self, batch: SampleBatch) -> Result<SampleSet> {
        let mut rng = StdRng::seed_from_u64(batch.stream_seed());
        let mut set = SampleSet::with_capacity(batch.samples);
        for _ in 0..batch.samples {
            let seed = self.seed_area.draw(&mut rng);
            let end = self.project(seed, &mut rng);
            if !end.is_finite() {
                return Err(RenderError::NumericalInstability { x: end.x, y: end.y });
            }
            set.push(end);
        }
        Ok(set)
    }

    pub fn pool(&self, threads: usize) -> WorkerPool<SampleBatch, Result<SampleSet>> {
        WorkerPool::with(threads, || {
            let sampler = self.clone();
            move |batch| sampler.sample_batch(batch)
        })
    }

    pub fn run(&self, samples: usize, seed: u64, threads: usize) -> Result<SampleSet> {
        let batch = SampleBatch::new(samples, seed);
        if threads <= 1 {
            self.sample_batch(batch)
        } else {
            self.pool(threads).call(batch)
        }
    }
}
