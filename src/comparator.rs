//! Key orderings for dictionaries.
//!
//! A [Comparator] must be a strict total order: irreflexive, transitive, and
//! returning [Ordering::Equal] only for keys the dictionary should treat as the
//! same entry. Name registries usually want one of the case-folding orders.

use std::cmp::Ordering;

/// Three-way comparison used to order a dictionary's keys.
pub type Comparator<K> = fn(&K, &K) -> Ordering;

/// The key type's own [Ord] implementation.
pub fn natural<K: Ord>(a: &K, b: &K) -> Ordering {
    a.cmp(b)
}

/// The reverse of [natural], for dictionaries that iterate largest first.
pub fn reverse<K: Ord>(a: &K, b: &K) -> Ordering {
    b.cmp(a)
}

/// Byte-wise comparison after ASCII lowercasing.
pub fn ascii_case_insensitive<K: AsRef<str>>(a: &K, b: &K) -> Ordering {
    fold_cmp(a.as_ref(), b.as_ref(), |c| c.to_ascii_lowercase())
}

/// Byte-wise comparison after RFC 1459 case folding.
///
/// On top of ASCII letters, `[`, `]`, `\` and `~` are the upper case forms of
/// `{`, `}`, `|` and `^`, so nicknames like `Foo[away]` and `foo{AWAY}` collide.
pub fn rfc1459_case_insensitive<K: AsRef<str>>(a: &K, b: &K) -> Ordering {
    fold_cmp(a.as_ref(), b.as_ref(), rfc1459_lower)
}

fn rfc1459_lower(c: u8) -> u8 {
    match c {
        b'[' => b'{',
        b']' => b'}',
        b'\\' => b'|',
        b'~' => b'^',
        _ => c.to_ascii_lowercase(),
    }
}

fn fold_cmp(a: &str, b: &str, fold: fn(u8) -> u8) -> Ordering {
    a.bytes().map(fold).cmp(b.bytes().map(fold))
}
