//! RDT deterministic random bit generator.
//!
//! Each output mixes every state lane under its key lane, then evolves the
//! key from the new state so earlier outputs cannot be recomputed from a
//! captured key. The generator reseeds itself from its own state every
//! [`RESEED_INTERVAL`] outputs. All mixing goes through the core mixer
//! [`core_mix`].

use crate::mix::core_mix;
use crate::seed::Seed256;
use crate::source::{SourceInfo, StreamSource};

/// Outputs between automatic self-reseeds.
pub const RESEED_INTERVAL: u64 = 1 << 20;

const KEY_CONSTANTS: [u64; 4] = [
    0x3BD3_9E10_CB0E_F593,
    0xC1D1_F0A3_379B_2E6A,
    0x5F7A_13C9_240B_ADF1,
    0x9A2C_5F01_37E6_0C4E,
];

static INFO: SourceInfo = SourceInfo {
    name: "drbg",
    description: "RDT DRBG with forward key evolution and periodic self-reseed",
    state_bits: 512,
};

pub struct RdtDrbg {
    key: [u64; 4],
    state: [u64; 4],
    reseed_counter: u64,
}

impl RdtDrbg {
    pub fn new(seed: &Seed256) -> Self {
        let words = seed.words();
        let mut key = [0u64; 4];
        let mut state = [0u64; 4];
        for i in 0..4 {
            key[i] = words[i] ^ KEY_CONSTANTS[i];
            state[i] = words[i] ^ !KEY_CONSTANTS[i];
        }
        Self {
            key,
            state,
            reseed_counter: 1,
        }
    }

    /// Fold fresh seed material into key and state.
    pub fn reseed(&mut self, material: &[u64; 4]) {
        for (i, &m) in material.iter().enumerate() {
            self.key[i] ^= m;
            self.state[i] ^= core_mix(m, &self.key);
        }
        self.reseed_counter = 1;
    }

    /// Outputs produced since the last (re)seed, starting at 1.
    pub fn reseed_counter(&self) -> u64 {
        self.reseed_counter
    }
}

impl StreamSource for RdtDrbg {
    fn info(&self) -> &SourceInfo {
        &INFO
    }

    fn next_word(&mut self) -> u64 {
        for i in 0..4 {
            self.state[i] = core_mix(self.state[i] ^ self.key[i], &self.key);
        }
        for i in 0..4 {
            self.key[i] ^= core_mix(self.state[i], &self.key);
        }

        self.reseed_counter += 1;
        if self.reseed_counter >= RESEED_INTERVAL {
            log::debug!("drbg self-reseed after {RESEED_INTERVAL} outputs");
            let material = self.state;
            self.reseed(&material);
        }
        self.state[0]
    }
}
