//! Miscellaneous common structs used throughout the library.

mod element;
mod slab;
mod stats;
mod topology;

pub use element::*;
pub(crate) use slab::*;
pub use stats::*;
pub(crate) use topology::*;
