pub mod interpolate;

pub use interpolate::{
    DEFAULT_MORPH_FPS,
    MIN_MORPH_DURATION_SECS,
    MorphState,
};
