//! Scene graph, transform algebra and animation drivers shared by the rendering backends.

pub mod animation;
pub mod error;
pub mod geometry;
pub mod renderer;
pub mod scene;

pub use error::{Result, SceneError};
