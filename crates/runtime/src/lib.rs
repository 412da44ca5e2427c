pub mod coalesce;
pub mod frame;
pub mod journal;

pub use coalesce::*;
pub use frame::*;
pub use journal::*;
