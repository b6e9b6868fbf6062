//! Hash containers used by the registry and offered for dictionary attributes.
//!
//! Re-exports *hashbrown* and *foldhash*. Maps are seeded with a fixed
//! foldhash state, so hash results depend only on the inserted keys.

use core::hash::BuildHasher;

pub use foldhash;
pub use hashbrown;

use foldhash::fast::{FixedState, FoldHasher};

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x3C6E_F372_FE94_F82B);

/// A hasher whose results depend only on its input.
pub type FixedHasher = FoldHasher<'static>;

/// A zero-sized [`BuildHasher`] producing [`FixedHasher`]s.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use vc_parsable::hash::FixedHashState;
///
/// assert_eq!(
///     FixedHashState.hash_one("origin"),
///     FixedHashState.hash_one("origin"),
/// );
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
///
/// Any `HashMap<K, P>` whose values are [`Parsable`](crate::Parsable) can be
/// registered as a dictionary attribute.
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;
