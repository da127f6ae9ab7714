use {crate::RingPosition, xxhash_rust::xxh3::xxh3_64_with_seed};

/// A keyspace partitioning strategy.
///
/// Partitioner is responsible for mapping raw key bytes to positions on the
/// ring i.e. it knows how to partition the keyspace. Implementations must be
/// deterministic across process runs, since node placement depends on it.
pub trait Partitioner {
    /// Returns ring position for a given key.
    fn position(&self, key: &[u8]) -> RingPosition;
}

/// A partitioner that uses the CRC-32 (IEEE polynomial) checksum.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32Partitioner;

impl Crc32Partitioner {
    pub fn new() -> Self {
        Self
    }
}

impl Partitioner for Crc32Partitioner {
    fn position(&self, key: &[u8]) -> RingPosition {
        crc32fast::hash(key)
    }
}

/// Seed used by [`Xxh3Partitioner::new`].
pub const DEFAULT_XXH3_SEED: u64 = 12345;

/// A partitioner that uses XXH3, folding the 64-bit digest into 32 bits.
#[derive(Clone, Copy, Debug)]
pub struct Xxh3Partitioner {
    seed: u64,
}

impl Default for Xxh3Partitioner {
    fn default() -> Self {
        Self {
            seed: DEFAULT_XXH3_SEED,
        }
    }
}

impl Xxh3Partitioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a partitioner with a custom seed.
    ///
    /// Rings that must agree on placement must use the same seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl Partitioner for Xxh3Partitioner {
    fn position(&self, key: &[u8]) -> RingPosition {
        let digest = xxh3_64_with_seed(key, self.seed);
        ((digest >> 32) ^ digest) as RingPosition
    }
}

/// Default partitioner.
pub type DefaultPartitioner = Crc32Partitioner;

/// Hashes `key` with the default partitioner.
///
/// ```
/// assert_eq!(crcring::hash("123456789"), 0xCBF43926);
/// ```
pub fn hash<K: AsRef<[u8]> + ?Sized>(key: &K) -> RingPosition {
    DefaultPartitioner::new().position(key.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc32_check_value() {
        let partitioner = Crc32Partitioner::new();
        assert_eq!(partitioner.position(b"123456789"), 0xCBF43926);
        assert_eq!(partitioner.position(b""), 0);
    }

    #[test]
    fn xxh3_seed_changes_position() {
        let a = Xxh3Partitioner::with_seed(1);
        let b = Xxh3Partitioner::with_seed(2);
        assert_eq!(a.position(b"node-a"), a.position(b"node-a"));
        assert_ne!(a.position(b"node-a"), b.position(b"node-a"));
    }
}
