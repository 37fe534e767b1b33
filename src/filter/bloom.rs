use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Fixed-size Bloom filter over 64-bit URL identities
///
/// Answers "definitely absent" or "possibly present" with a bounded
/// false-positive rate and zero false negatives. Sizing follows the
/// standard formulas: `m = -n·ln(p)/ln(2)²` bits and `k = m/n·ln(2)`
/// hash functions.
#[derive(Debug, Clone)]
pub struct BloomFilter {
    bits: Vec<u8>,
    num_bits: usize,
    num_hashes: usize,
}

impl BloomFilter {
    /// Creates a filter sized for `capacity` items at the given
    /// false-positive rate
    pub fn new(capacity: usize, false_positive_rate: f64) -> Self {
        let m = (-(capacity as f64) * false_positive_rate.ln() / (2.0_f64.ln().powi(2))).ceil()
            as usize;
        let num_bits = m.max(8);
        let num_bytes = (num_bits + 7) / 8;

        let k = ((num_bits as f64 / capacity as f64) * 2.0_f64.ln()).round() as usize;
        let num_hashes = k.clamp(1, 16);

        Self {
            bits: vec![0u8; num_bytes],
            num_bits,
            num_hashes,
        }
    }

    /// Inserts an identity into the filter
    pub fn insert(&mut self, identity: u64) {
        let bytes = identity.to_le_bytes();
        for seed in 0..self.num_hashes {
            let bit = xxh3_64_with_seed(&bytes, seed as u64) as usize % self.num_bits;
            self.bits[bit / 8] |= 1 << (bit % 8);
        }
    }

    /// Returns false if the identity is definitely absent, true if it is
    /// possibly present
    pub fn contains(&self, identity: u64) -> bool {
        let bytes = identity.to_le_bytes();
        for seed in 0..self.num_hashes {
            let bit = xxh3_64_with_seed(&bytes, seed as u64) as usize % self.num_bits;
            if self.bits[bit / 8] & (1 << (bit % 8)) == 0 {
                return false;
            }
        }
        true
    }

    /// Size of the bit array in bytes
    pub fn size_bytes(&self) -> usize {
        self.bits.len()
    }
}
