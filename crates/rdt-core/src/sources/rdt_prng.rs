//! RDT PRNG, v1.
//!
//! 256-bit state where every lane is replaced by itself XOR the core mix of
//! its neighbour. Seeded from a single 64-bit word. Inter-draw diffusion is
//! measurably weaker than v2's.

use crate::mix::{GOLDEN_GAMMA, core_mix};
use crate::seed::Seed256;
use crate::source::{SourceInfo, StreamSource};

const KEY: [u64; 4] = [
    0xA3B1_C6E5_D487_9F12,
    0xC1D2_E3F4_A596_B708,
    0x9A7B_6C5D_4E3F_2A19,
    0x1234_5678_9ABC_DEF0,
];

const LANE1_CONSTANT: u64 = 0xC2B2_AE3D_27D4_EB4F;

static INFO: SourceInfo = SourceInfo {
    name: "rdt-v1",
    description: "RDT PRNG v1 over the core mixer (64-bit seed)",
    state_bits: 256,
};

pub struct RdtPrng {
    state: [u64; 4],
}

impl RdtPrng {
    /// Seed from the first big-endian word of `seed`; the other 192 bits are
    /// ignored.
    pub fn new(seed: &Seed256) -> Self {
        Self::from_u64(seed.words()[0])
    }

    pub fn from_u64(seed: u64) -> Self {
        Self {
            state: [
                seed ^ GOLDEN_GAMMA,
                (seed << 1) ^ LANE1_CONSTANT,
                !seed,
                seed ^ (seed >> 1),
            ],
        }
    }
}

impl StreamSource for RdtPrng {
    fn info(&self) -> &SourceInfo {
        &INFO
    }

    fn next_word(&mut self) -> u64 {
        let s = &mut self.state;
        let t0 = core_mix(s[1], &KEY);
        let t1 = core_mix(s[2], &KEY);
        let t2 = core_mix(s[3], &KEY);
        let t3 = core_mix(s[0], &KEY);

        s[0] ^= t0;
        s[1] ^= t1;
        s[2] ^= t2;
        s[3] ^= t3;

        s[0]
    }
}
