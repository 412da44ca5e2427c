pub mod camera;
pub mod clipping;
pub mod components;
pub mod entity;
pub mod surface;
pub mod world;

pub use camera::*;
pub use clipping::*;
pub use entity::*;
pub use surface::*;
pub use world::*;
