//! Device-flow authentication and local token storage.

mod device;
mod error;
mod store;

pub use device::*;
pub use error::*;
pub use store::*;
