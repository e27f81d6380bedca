//! Chord diagrams in the terminal.
//!
//! A [`ChordCanvas`] owns a square Braille [`Surface`] with a reference
//! circle. Each curve joins two angles on the circle through a quadratic
//! Bezier bowed toward the centre and is colored along its length by a
//! [`Gradient`].

pub mod canvas;
pub mod chord;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod prelude;
pub mod surface;

pub use canvas::{BrailleCanvas, ColorBlend};
pub use chord::ChordCanvas;
pub use color::{parse_color, ColorMap, ColorSpec, Gradient, Rgba};
pub use config::ChordConfig;
pub use error::{ChordError, Result};
pub use surface::{Artifact, Surface};
