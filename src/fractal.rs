//! Iterated function systems: the map descriptors the sampler draws
//! from, and the built-in fractal definitions selectable by name.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use lazy_static::lazy_static;
use num::Complex;

use crate::coord::{Point, Window};
use crate::error::{RenderError, Result};

/// One contraction map of an IFS. Affine maps fold rotation, scale
/// and translation into four precomputed coefficients.
#[derive(Copy, Clone, Debug)]
pub enum Map {
    Affine { cos: f64, sin: f64, dx: f64, dy: f64 },
    Generic(fn(Point) -> Point),
}

impl Map {
    pub fn affine(rotation: f64, scale: f64, translation: (f64, f64)) -> Self {
        Self::Affine {
            cos: scale * rotation.cos(),
            sin: scale * rotation.sin(),
            dx: translation.0,
            dy: translation.1,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        match *self {
            Self::Affine { cos, sin, dx, dy } => {
                Point::new(cos * p.x - sin * p.y + dx, sin * p.x + cos * p.y + dy)
            }
            Self::Generic(f) => f(p),
        }
    }
}

/// Non-empty ordered list of maps.
#[derive(Clone, Debug)]
pub struct Ifs {
    maps: Vec<Map>,
}

impl Ifs {
    pub fn new(maps: Vec<Map>) -> Result<Self> {
        if maps.is_empty() {
            return Err(RenderError::EmptyMapSet);
        }
        Ok(Self { maps })
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Never empty; construction rejects zero maps.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn maps(&self) -> &[Map] {
        &self.maps
    }
}

/// An IFS plus the smallest window known to contain its attractor,
/// when the definition suggests one.
#[derive(Clone, Debug)]
pub struct Fractal {
    pub ifs: Ifs,
    pub min_window: Option<Window>,
}

/// Golden Dragon curve.
/// https://larryriddle.agnesscott.org/ifs/heighway/goldenDragon.htm
pub fn golden_dragon() -> Fractal {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let r = (1.0 / phi).powf(1.0 / phi);
    let r2 = r * r;
    let r4 = r2 * r2;
    let f1 = Map::affine(((1.0 + r2 - r4) / (2.0 * r)).acos(), r, (0.0, 0.0));
    let f2 = Map::affine(PI - ((1.0 + r4 - r2) / (2.0 * r2)).acos(), r2, (1.0, 0.0));
    Fractal {
        ifs: Ifs::new(vec![f1, f2]).unwrap(),
        min_window: Some(Window::new(-0.35, 1.15, -0.55, 0.95)),
    }
}

fn levy_f1(p: Point) -> Point {
    let z = Complex::new(p.x, p.y);
    let out = Complex::new(1.0, -1.0) * z / 2.0;
    Point::new(out.re, out.im)
}

fn levy_f2(p: Point) -> Point {
    let z = Complex::new(p.x, p.y);
    let out = Complex::new(1.0, 1.0) * (z - 1.0) / 2.0 + 1.0;
    Point::new(out.re, out.im)
}

/// Lévy C curve.
/// https://en.wikipedia.org/wiki/L%C3%A9vy_C_curve
pub fn levy_c_curve() -> Fractal {
    Fractal {
        ifs: Ifs::new(vec![Map::Generic(levy_f1), Map::Generic(levy_f2)]).unwrap(),
        min_window: Some(Window::new(-0.525, 1.525, -1.025, 0.275)),
    }
}

lazy_static! {
    static ref REGISTRY: BTreeMap<&'static str, fn() -> Fractal> = {
        let mut m: BTreeMap<&'static str, fn() -> Fractal> = BTreeMap::new();
        m.insert("golden-dragon", golden_dragon);
        m.insert("levy-c-curve", levy_c_curve);
        m
    };
}

pub fn by_name(name: &str) -> Result<Fractal> {
    match REGISTRY.get(name) {
        Some(make) => Ok(make()),
        None => Err(RenderError::UnknownFractal {
            name: name.to_string(),
            known: Some(format!("known fractals: {}", names().join(", "))),
        }),
    }
}

pub fn names() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn dist(a: Point, b: Point) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    #[test]
    fn test_empty_ifs_rejected() {
        assert!(matches!(Ifs::new(vec![]), Err(RenderError::EmptyMapSet)));
    }

    #[test]
    fn test_affine_identity() {
        let id = Map::affine(0.0, 1.0, (0.0, 0.0));
        let p = Point::new(1.25, -3.5);
        assert_eq!(id.apply(p), p);
    }

    #[test]
    fn test_affine_rotation_and_translation() {
        let m = Map::affine(PI / 2.0, 2.0, (1.0, 0.0));
        let p = m.apply(Point::new(1.0, 0.0));
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_golden_dragon_maps_are_contractions() {
        let f = golden_dragon();
        let a = Point::new(0.3, 0.1);
        let b = Point::new(-0.2, 0.7);
        for map in f.ifs.maps() {
            let ratio = dist(map.apply(a), map.apply(b)) / dist(a, b);
            assert!(ratio < 1.0, "map expands distances: ratio {}", ratio);
        }
    }

    #[test]
    fn test_levy_maps_are_contractions() {
        let f = levy_c_curve();
        let a = Point::new(0.5, -0.3);
        let b = Point::new(1.5, 0.2);
        for map in f.ifs.maps() {
            let ratio = dist(map.apply(a), map.apply(b)) / dist(a, b);
            assert!((ratio - 1.0 / 2.0_f64.sqrt()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_levy_fixed_points() {
        // f1 fixes the origin, f2 fixes (1, 0)
        let f = levy_c_curve();
        let p0 = f.ifs.maps()[0].apply(Point::new(0.0, 0.0));
        assert_eq!(p0, Point::new(0.0, 0.0));
        let p1 = f.ifs.maps()[1].apply(Point::new(1.0, 0.0));
        assert!((p1.x - 1.0).abs() < 1e-12 && p1.y.abs() < 1e-12);
    }

    #[test]
    fn test_registry_lookup() {
        assert!(by_name("golden-dragon").is_ok());
        assert!(by_name("levy-c-curve").is_ok());
        assert!(matches!(
            by_name("sierpinski"),
            Err(RenderError::UnknownFractal { .. })
        ));
        assert_eq!(names(), vec!["golden-dragon", "levy-c-curve"]);
    }
}
