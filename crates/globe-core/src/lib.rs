//! Geo-projection and interactive-marker core for the population globe.
//!
//! Everything here is platform-neutral: the web frontend feeds pointer
//! positions and frame deltas in, and reads marker transforms, opacities and
//! tooltip content back out.

pub mod camera;
pub mod config;
pub mod error;
pub mod feed;
pub mod frame;
pub mod geo;
pub mod marker;
pub mod mesh;
pub mod picking;
pub mod pointer;
pub mod pulse;
pub mod registry;
pub mod rotation;
pub mod tween;

pub use camera::*;
pub use config::*;
pub use error::*;
pub use feed::*;
pub use frame::*;
pub use geo::*;
pub use marker::*;
pub use picking::*;
pub use pointer::*;
pub use pulse::*;
pub use registry::*;
pub use rotation::*;
pub use tween::*;
