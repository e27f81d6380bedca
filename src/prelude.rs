pub use crate::canvas::ColorBlend;
pub use crate::chord::ChordCanvas;
pub use crate::color::{ColorMap, ColorSpec, Gradient, Rgba};
pub use crate::config::ChordConfig;
pub use crate::error::{ChordError, Result};
