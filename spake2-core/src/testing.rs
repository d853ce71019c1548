//! Deterministic entropy stream for reproducible test vectors.
//!
//! Gated behind `test-utils` so downstream ciphersuite crates can depend on
//! it from their own `dev-dependencies` without pulling it into a release
//! build of this crate.

use sha2::{Digest, Sha256};

use crate::entropy::EntropySource;

/// A byte stream built from `SHA256("prng-{counter}-{seed}")` blocks, one
/// byte consumed at a time, counter incrementing on exhaustion, the same
/// construction the upstream reference implementation's test suite uses so
/// golden vectors are reproducible across implementations.
pub struct PrgEntropy {
    seed: Vec<u8>,
    counter: u64,
    block: [u8; 32],
    block_pos: usize,
}

impl PrgEntropy {
    pub fn new(seed: impl Into<Vec<u8>>) -> Self {
        let mut prg = PrgEntropy {
            seed: seed.into(),
            counter: 0,
            block: [0u8; 32],
            block_pos: 32,
        };
        prg.refill();
        prg
    }

    fn refill(&mut self) {
        let mut input = format!("prng-{}-", self.counter).into_bytes();
        input.extend_from_slice(&self.seed);
        self.block = Sha256::digest(&input).into();
        self.block_pos = 0;
        self.counter += 1;
    }

    fn next_byte(&mut self) -> u8 {
        if self.block_pos == self.block.len() {
            self.refill();
        }
        let byte = self.block[self.block_pos];
        self.block_pos += 1;
        byte
    }
}

impl EntropySource for PrgEntropy {
    fn fill(&mut self, n: usize) -> Vec<u8> {
        (0..n).map(|_| self.next_byte()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pinned against the upstream reference implementation's `PRG(b"A")`
    /// construction: the first 16 bytes drawn from seed `b"A"` are
    /// `c1d59d78903e9d7874d9064e12d36c58`.
    #[test]
    fn prg_matches_reference_vector_seed_a() {
        let mut prg = PrgEntropy::new(*b"A");
        let data = prg.fill(16);
        assert_eq!(hex::encode(data), "c1d59d78903e9d7874d9064e12d36c58");
    }

    /// Pinned against the upstream reference implementation's `PRG(b"B")`
    /// construction.
    #[test]
    fn prg_matches_reference_vector_seed_b() {
        let mut prg = PrgEntropy::new(*b"B");
        let data = prg.fill(16);
        assert_eq!(hex::encode(data), "2af6d4b843a9e6cd1d185eb5de870f77");
    }

    #[test]
    fn prg_is_deterministic_across_instances() {
        let mut a = PrgEntropy::new(*b"same-seed");
        let mut b = PrgEntropy::new(*b"same-seed");
        assert_eq!(a.fill(40), b.fill(40));
    }

    #[test]
    fn prg_crosses_block_boundary_without_repeating() {
        let mut prg = PrgEntropy::new(*b"boundary");
        let first = prg.fill(32);
        let second = prg.fill(32);
        assert_ne!(first, second);
    }
}
