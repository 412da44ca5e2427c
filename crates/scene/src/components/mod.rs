pub mod polygon;
pub mod visibility;

pub use polygon::*;
pub use visibility::*;
