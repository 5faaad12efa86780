use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

// =============================================================================
// CORE OPTIMIZED TYPES
// =============================================================================

/// Hash map with the non-cryptographic Fx hasher.
///
/// Keys in this crate are small integer ids, which Fx hashes in a couple of instructions.
///
/// # Examples
///
/// ```rust
/// use trimesh::core::collections::FastHashMap;
///
/// let mut positions: FastHashMap<usize, usize> = FastHashMap::default();
/// positions.insert(17, 0);
/// assert_eq!(positions.get(&17), Some(&0));
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Hash set with the Fx hasher.
pub type FastHashSet<T> = FxHashSet<T>;

/// Stack-first vector that spills to the heap past `N` elements.
///
/// # Examples
///
/// ```rust
/// use trimesh::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<usize, 4> = SmallBuffer::new();
/// buffer.push(3);
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Creates a [`FastHashMap`] with room for `capacity` entries.
#[must_use]
pub fn fast_hash_map_with_capacity<K, V>(capacity: usize) -> FastHashMap<K, V> {
    FastHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

/// Creates a [`FastHashSet`] with room for `capacity` entries.
#[must_use]
pub fn fast_hash_set_with_capacity<T>(capacity: usize) -> FastHashSet<T> {
    FastHashSet::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}
