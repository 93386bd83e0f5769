//! Main Crate Error

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// splay-dict crate error enum.
///
/// Lookups that miss are not errors, they return `None`. The variants here are
/// all broken caller preconditions that the library reports instead of aborting.
pub enum Error {
    /// [crate::Dictionary::try_add] was called with a key that is already present.
    #[error("Duplicate key inserted into dictionary {0:?}")]
    DuplicateKey(String),

    /// A [crate::Cursor] was advanced after it had already walked past the tail.
    #[error("Cursor advanced after iteration finished on dictionary {0:?}")]
    CursorExhausted(String),

    /// An [crate::ElementRef] refers to an element that was already removed.
    #[error("Stale element reference: slot {index} generation {generation}")]
    StaleElement {
        /// Slab slot the reference points at.
        index: usize,
        /// Generation the reference was issued with.
        generation: u32,
    },
}

/// Alias for `Result<T, splay_dict::Error>`.
pub type Result<T, E = Error> = core::result::Result<T, E>;
