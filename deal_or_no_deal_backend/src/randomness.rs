use ic_cdk::management_canister::raw_rand;
use sha2::{Digest, Sha256};

// =============================================================================
// VRF SEED
// =============================================================================

/// Fetch a fresh 32-byte session seed from the IC VRF.
///
/// Called once per stake; the seed drives the whole case shuffle so nothing is
/// re-drawn mid-session.
pub async fn fetch_seed() -> Result<[u8; 32], String> {
    let random_bytes = raw_rand()
        .await
        .map_err(|e| format!("raw_rand failed: {:?}", e))?;

    validate_randomness(&random_bytes)?;
    Ok(hash_seed(&random_bytes))
}

pub fn hash_seed(random_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(random_bytes);
    hasher.finalize().into()
}

/// Reject degenerate VRF output (all zeros or all ones).
pub fn validate_randomness(bytes: &[u8]) -> Result<(), String> {
    if bytes.len() < 32 {
        return Err(format!("Insufficient randomness: {} bytes", bytes.len()));
    }
    if bytes.iter().all(|&b| b == 0) {
        return Err("Degenerate randomness detected: all zeros".to_string());
    }
    if bytes.iter().all(|&b| b == 0xFF) {
        return Err("Degenerate randomness detected: all ones".to_string());
    }
    Ok(())
}

/// SHA-256 of the seed, published so players can audit the shuffle afterwards.
pub fn randomness_hash(seed: &[u8; 32]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hex::encode(hasher.finalize())
}

// =============================================================================
// SEED STREAM
// =============================================================================

/// Deterministic expansion of a seed: block `n` is SHA256(seed || n).
pub struct SeedStream {
    seed: [u8; 32],
    counter: u64,
    block: [u8; 32],
    offset: usize,
}

impl SeedStream {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            seed,
            counter: 0,
            block: [0u8; 32],
            offset: 32,
        }
    }

    fn refill(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(self.seed);
        hasher.update(self.counter.to_be_bytes());
        self.block = hasher.finalize().into();
        self.counter += 1;
        self.offset = 0;
    }

    pub fn next_u32(&mut self) -> u32 {
        if self.offset + 4 > self.block.len() {
            self.refill();
        }
        let b = &self.block[self.offset..self.offset + 4];
        self.offset += 4;
        u32::from_be_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Uniform draw from `[0, bound)` using rejection sampling (no modulo bias).
    pub fn below(&mut self, bound: u32) -> u32 {
        assert!(bound > 0, "bound must be positive");
        let bound = bound as u64;
        let zone = ((1u64 << 32) / bound) * bound;
        loop {
            let x = self.next_u32() as u64;
            if x < zone {
                return (x % bound) as u32;
            }
        }
    }
}
