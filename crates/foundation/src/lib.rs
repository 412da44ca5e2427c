pub mod bounds;
pub mod extent;
pub mod handles;
pub mod math;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use extent::*;
pub use handles::*;
