//! Session registry

mod registry;

pub use registry::{Outbound, Registry};
