use std::path::PathBuf;

use image::imageops::{self, FilterType};
use image::Rgb;
use miette::{miette, IntoDiagnostic, Result};
use structopt::StructOpt;

use ifsgen::coord::Resolution;
use ifsgen::fractal;
use ifsgen::raster::Palette;
use ifsgen::sampler::SeedArea;
use ifsgen::{render, RenderConfig};

#[derive(StructOpt, Debug)]
#[structopt(
    name = "ifsgen-imagegen",
    about = "Render an IFS attractor with the chaos game"
)]
struct Opt {
    /// Fractal to render (see --list)
    #[structopt(short, long, default_value = "golden-dragon")]
    fractal: String,

    /// List the known fractals and exit
    #[structopt(long)]
    list: bool,

    /// Output image width in pixels
    #[structopt(short = "W", long, default_value = "1440")]
    width: usize,

    /// Output image height in pixels
    #[structopt(short = "H", long, default_value = "720")]
    height: usize,

    /// Linear supersampling factor
    #[structopt(short = "z", long, default_value = "3")]
    zoom: usize,

    /// Relative padding added around the attractor on each axis
    #[structopt(short, long, default_value = "0")]
    padding: f64,

    /// Map applications per sample
    #[structopt(short = "k", long, default_value = "50")]
    iterations: usize,

    /// Number of trajectory endpoints to sample
    #[structopt(short = "n", long, default_value = "500000")]
    samples: usize,

    /// Background color as an RRGGBB hex string
    #[structopt(long, default_value = "2e3440")]
    background: String,

    /// Foreground color as an RRGGBB hex string
    #[structopt(long, default_value = "ebcb8b")]
    foreground: String,

    /// Half-extent of the square the seed points are drawn from
    #[structopt(long, default_value = "10")]
    seed_extent: f64,

    /// Random seed
    #[structopt(short, long, default_value = "0")]
    seed: u64,

    /// Sampling threads (0 = physical CPU count)
    #[structopt(short, long, default_value = "0")]
    threads: usize,

    /// Output file
    #[structopt(short, long, default_value = "output.png")]
    output: PathBuf,
}

fn parse_hex_color(s: &str) -> Result<Rgb<u8>> {
    let s = s.trim_start_matches('#');
    // byte length and ASCII together make the fixed-offset slices safe
    if s.len() != 6 || !s.is_ascii() {
        return Err(miette!("expected an RRGGBB hex color, got {:?}", s));
    }
    let component = |range| {
        u8::from_str_radix(&s[range], 16)
            .map_err(|_| miette!("expected an RRGGBB hex color, got {:?}", s))
    };
    Ok(Rgb([component(0..2)?, component(2..4)?, component(4..6)?]))
}

fn main() -> Result<()> {
    let opt = Opt::from_args();

    if opt.list {
        for name in fractal::names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let resolution = Resolution::new(opt.width, opt.height)?;
    let fractal = fractal::by_name(&opt.fractal)?;
    let e = opt.seed_extent;

    let mut config = RenderConfig::new(resolution);
    config.supersample = opt.zoom;
    config.padding = opt.padding;
    config.iterations = opt.iterations;
    config.samples = opt.samples;
    config.palette = Palette::new(
        parse_hex_color(&opt.background)?,
        parse_hex_color(&opt.foreground)?,
    );
    config.seed_area = SeedArea::new(-e, e, -e, e);
    config.seed = opt.seed;
    if opt.threads > 0 {
        config.threads = opt.threads;
    }
    config.min_window = fractal.min_window;

    let img = render(&fractal.ifs, &config)?;
    let img = if config.supersample > 1 {
        imageops::resize(
            &img,
            resolution.width as u32,
            resolution.height as u32,
            FilterType::Triangle,
        )
    } else {
        img
    };
    img.save(&opt.output).into_diagnostic()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("2e3440").unwrap(), Rgb([0x2e, 0x34, 0x40]));
        assert_eq!(parse_hex_color("#ebcb8b").unwrap(), Rgb([0xeb, 0xcb, 0x8b]));
        assert_eq!(parse_hex_color("FFFFFF").unwrap(), Rgb([255, 255, 255]));
        assert!(parse_hex_color("xyzxyz").is_err());
        assert!(parse_hex_color("fff").is_err());
    }

    #[test]
    fn test_parse_hex_color_multibyte_is_error() {
        // six bytes but not six chars; must error, not slice mid-char
        assert!(parse_hex_color("aééa").is_err());
        assert!(parse_hex_color("ééé").is_err());
    }
}
