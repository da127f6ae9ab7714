use {
    crcring::{hash, Crc32Partitioner, DefaultPartitioner, HashRing, Partitioner, Xxh3Partitioner},
    proptest::prelude::*,
};

#[test]
fn default_partitioner() {
    let partitioner = DefaultPartitioner::new();
    assert_eq!(partitioner.position(b"123456789"), 0xcbf43926);
    assert_eq!(partitioner.position(b"a"), 0xe8b7be43);
    assert_eq!(partitioner.position(b"abc"), 0x352441c2);
}

#[test]
fn position() {
    let partitioner = Crc32Partitioner::new();
    assert_eq!(partitioner.position(b""), 0);
    assert_eq!(
        partitioner.position(b"The quick brown fox jumps over the lazy dog"),
        0x414fa339
    );
    assert_eq!(partitioner.position(b"10.0.0.1:8080"), 0x29d2e7ee);
}

#[test]
fn utf8_bytes_are_hashed() {
    assert_eq!(hash("ключ"), 0x0caf961a);
    assert_eq!(hash("ключ"), hash("ключ".as_bytes()));
    assert_eq!(hash("ключ"), hash(&"ключ".to_string()));
}

#[test]
fn ring_uses_its_partitioner() {
    let crc: HashRing = HashRing::new();
    assert_eq!(crc.position("node-a"), hash("node-a"));

    let partitioner = Xxh3Partitioner::with_seed(7);
    let xxh3 = HashRing::<String, _>::with_partitioner(partitioner);
    assert_eq!(xxh3.position("node-a"), partitioner.position(b"node-a"));

    let token = xxh3.try_add("node-a").unwrap();
    assert_eq!(token.position(), partitioner.position(b"node-a"));
}

proptest! {
    #[test]
    fn hash_is_deterministic(key in ".*") {
        prop_assert_eq!(hash(&key), hash(&key));
        prop_assert_eq!(hash(&key), crc32fast::hash(key.as_bytes()));
    }

    #[test]
    fn xxh3_is_deterministic(key in prop::collection::vec(any::<u8>(), 0..256), seed in any::<u64>()) {
        let partitioner = Xxh3Partitioner::with_seed(seed);
        prop_assert_eq!(partitioner.position(&key), Xxh3Partitioner::with_seed(seed).position(&key));
    }
}
