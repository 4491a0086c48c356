//! Reference stream backed by `rand`'s `StdRng`.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::seed::Seed256;
use crate::source::{SourceInfo, StreamSource};

static INFO: SourceInfo = SourceInfo {
    name: "std",
    description: "rand StdRng (ChaCha12), reference generator",
    state_bits: 256,
};

pub struct StdRngStream {
    rng: StdRng,
}

impl StdRngStream {
    pub fn new(seed: &Seed256) -> Self {
        Self {
            rng: StdRng::from_seed(*seed.as_bytes()),
        }
    }
}

impl StreamSource for StdRngStream {
    fn info(&self) -> &SourceInfo {
        &INFO
    }

    fn next_word(&mut self) -> u64 {
        self.rng.next_u64()
    }
}
