use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::hash::{BuildHasher, Hash};

use crate::Parsable;

// -----------------------------------------------------------------------------
// DictKey

/// A dictionary key that can be written as, and read back from, a mapping key.
///
/// Implemented for `String` and the primitive integer, `bool` and `char` types.
pub trait DictKey: Sized {
    /// Returns the mapping key for this value.
    fn encode_key(&self) -> String;

    /// Reads a key back, returning `None` if `key` is not a valid value.
    fn decode_key(key: &str) -> Option<Self>;
}

impl DictKey for String {
    #[inline]
    fn encode_key(&self) -> String {
        self.clone()
    }

    #[inline]
    fn decode_key(key: &str) -> Option<Self> {
        Some(String::from(key))
    }
}

macro_rules! impl_dict_key_from_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl DictKey for $ty {
                #[inline]
                fn encode_key(&self) -> String {
                    self.to_string()
                }

                #[inline]
                fn decode_key(key: &str) -> Option<Self> {
                    key.parse().ok()
                }
            }
        )+
    };
}

impl_dict_key_from_str!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize,
);

// -----------------------------------------------------------------------------
// ParsableDict

/// A map from keys to nested [`Parsable`] objects, usable as a
/// dictionary attribute.
///
/// Implemented for [`BTreeMap`], [`hashbrown::HashMap`] and, with the `std`
/// feature, `std::collections::HashMap`.
pub trait ParsableDict: Default + 'static {
    type Key: DictKey;
    type Item: Parsable;

    /// Iterates over all entries. The iteration order is the output order.
    fn entries(&self) -> impl Iterator<Item = (&Self::Key, &Self::Item)>;

    /// Inserts an entry, replacing any previous value under the same key.
    fn insert_entry(&mut self, key: Self::Key, item: Self::Item);
}

impl<K, P> ParsableDict for BTreeMap<K, P>
where
    K: DictKey + Ord + 'static,
    P: Parsable,
{
    type Key = K;
    type Item = P;

    #[inline]
    fn entries(&self) -> impl Iterator<Item = (&K, &P)> {
        self.iter()
    }

    #[inline]
    fn insert_entry(&mut self, key: K, item: P) {
        self.insert(key, item);
    }
}

impl<K, P, S> ParsableDict for hashbrown::HashMap<K, P, S>
where
    K: DictKey + Eq + Hash + 'static,
    P: Parsable,
    S: BuildHasher + Default + 'static,
{
    type Key = K;
    type Item = P;

    #[inline]
    fn entries(&self) -> impl Iterator<Item = (&K, &P)> {
        self.iter()
    }

    #[inline]
    fn insert_entry(&mut self, key: K, item: P) {
        self.insert(key, item);
    }
}

#[cfg(feature = "std")]
impl<K, P, S> ParsableDict for std::collections::HashMap<K, P, S>
where
    K: DictKey + Eq + Hash + 'static,
    P: Parsable,
    S: BuildHasher + Default + 'static,
{
    type Key = K;
    type Item = P;

    #[inline]
    fn entries(&self) -> impl Iterator<Item = (&K, &P)> {
        self.iter()
    }

    #[inline]
    fn insert_entry(&mut self, key: K, item: P) {
        self.insert(key, item);
    }
}
