use miette::Diagnostic;
use thiserror::Error;

/// Error type for the rendering pipeline.
#[derive(Error, Diagnostic, Debug)]
pub enum RenderError {
    #[error("iterated function system has no maps")]
    #[diagnostic(code(ifsgen::empty_map_set))]
    EmptyMapSet,

    #[error("invalid resolution {width}x{height}: both dimensions must be nonzero")]
    #[diagnostic(code(ifsgen::invalid_resolution))]
    InvalidResolution { width: usize, height: usize },

    #[error("sampled window has no usable extent")]
    #[diagnostic(code(ifsgen::degenerate_window))]
    DegenerateWindow,

    #[error("trajectory produced a non-finite point ({x}, {y})")]
    #[diagnostic(
        code(ifsgen::numerical_instability),
        help("the map parameters are probably not contractions")
    )]
    NumericalInstability { x: f64, y: f64 },

    #[error("unknown fractal {name:?}")]
    #[diagnostic(code(ifsgen::unknown_fractal))]
    UnknownFractal {
        name: String,
        #[help]
        known: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;
