use blake3::Hasher;

/// First 8 bytes of the BLAKE3 hash of `data`, little endian.
///
/// Used for vector-store point ids and stub-encoder buckets. Collisions are tolerable in
/// both: a colliding point id overwrites an index entry, a colliding bucket blurs two words.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Stable vector-store point id for a candidate id.
#[inline]
pub fn point_id(candidate_id: &str) -> u64 {
    hash_to_u64(candidate_id.as_bytes())
}

/// Bucket and sign for one token in a hashed feature vector of width `dim`.
#[inline]
pub fn token_bucket(token: &str, dim: usize) -> (usize, f32) {
    let mut hasher = Hasher::new();
    hasher.update(b"token|");
    hasher.update(token.as_bytes());
    let hash = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    let value = u64::from_le_bytes(bytes);

    let bucket = (value % dim.max(1) as u64) as usize;
    let sign = if value >> 63 == 0 { 1.0 } else { -1.0 };
    (bucket, sign)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_to_u64_determinism() {
        let data = b"3f0c7a2e-candidate";
        assert_eq!(hash_to_u64(data), hash_to_u64(data));
    }

    #[test]
    fn test_hash_to_u64_uniqueness() {
        let inputs = [
            b"candidate-001".as_slice(),
            b"candidate-002".as_slice(),
            b"CANDIDATE-001".as_slice(),
            b"candidate-001 ".as_slice(),
        ];

        let hashes: HashSet<_> = inputs.iter().map(|i| hash_to_u64(i)).collect();
        assert_eq!(hashes.len(), inputs.len());
    }

    #[test]
    fn test_point_id_matches_hash() {
        let id = "5d1c2b8e-0000-4000-8000-000000000000";
        assert_eq!(point_id(id), hash_to_u64(id.as_bytes()));
    }

    #[test]
    fn test_token_bucket_in_range() {
        for token in ["rust", "tokio", "kubernetes", "a", ""] {
            let (bucket, sign) = token_bucket(token, 384);
            assert!(bucket < 384);
            assert!(sign == 1.0 || sign == -1.0);
            assert_eq!(token_bucket(token, 384), (bucket, sign));
        }
    }

    #[test]
    fn test_token_bucket_zero_dim() {
        assert_eq!(token_bucket("rust", 0).0, 0);
    }
}
