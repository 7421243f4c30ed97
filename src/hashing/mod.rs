use blake3::Hasher;

/// Hashes free text to a full 32-byte BLAKE3 digest.
///
/// Used as the key for the embedding cache: the full digest makes accidental
/// key collisions computationally infeasible, so a cache hit is always the
/// right vector for the text.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from
/// 256 bits.
///
/// 64 bits is enough for point ids and dedup keys at realistic candidate
/// counts (millions of profiles put the birthday-bound collision probability
/// well below one in a million), and a collision degrades to an overwritten
/// index entry, never corrupted scores.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Derives a stable vector-store point id for an entity + chunk pair.
///
/// The same entity re-embedded under the same chunk type overwrites its
/// previous point instead of accumulating duplicates.
#[inline]
pub fn entity_point_id(entity_id: &str, chunk_type: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(entity_id.as_bytes());
    hasher.update(b"|");
    hasher.update(chunk_type.as_bytes());

    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}
