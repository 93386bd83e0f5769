#![doc = include_str!("../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]
//!

// Public modules
mod common;

pub mod comparator;
mod config;
mod cursor;
mod dictionary;
mod error;
mod registry;

pub use crate::common::{DictionaryStats, Element, ElementRef, STATS_KIND};
pub use comparator::Comparator;
pub use config::{Config, DictionaryBuilder, DEFAULT_NAME};
pub use cursor::{Cursor, Iter};
pub use dictionary::Dictionary;
pub use error::{Error, Result};
pub use registry::Registry;
