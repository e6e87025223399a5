//! Cosmetic "DNA" hash shown under the status card
//!
//! Not security relevant. SHA-256 of the input, each byte rendered as four
//! bases from the A/C/G/T alphabet.

use super::DnaHasher;
use sha2::{Digest, Sha256};

const BASES: [char; 4] = ['A', 'C', 'G', 'T'];

/// Number of digest bytes rendered; each byte yields four bases
const DIGEST_BYTES: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256DnaHasher;

impl DnaHasher for Sha256DnaHasher {
    fn generate_dna_hash(&self, input: &str) -> String {
        let digest = Sha256::digest(input.as_bytes());

        let mut out = String::with_capacity(DIGEST_BYTES * 5);
        for (i, byte) in digest.iter().take(DIGEST_BYTES).enumerate() {
            if i > 0 {
                out.push('-');
            }
            for shift in [6u8, 4, 2, 0] {
                out.push(BASES[((byte >> shift) & 0b11) as usize]);
            }
        }
        out
    }
}
