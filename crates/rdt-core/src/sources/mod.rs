//! Stream source implementations.

mod drbg;
mod rdt_prng;
mod rdt_stream;
mod std_rng;

pub use drbg::{RESEED_INTERVAL, RdtDrbg};
pub use rdt_prng::RdtPrng;
pub use rdt_stream::RdtStreamV2;
pub use std_rng::StdRngStream;
