//! # rdt-core
//!
//! Stream generators and seed material for the RDT suite.
//!
//! `rdt-core` produces the deterministic, fixed-width integer streams that the
//! `rdt-tests` battery consumes, and handles the 256-bit seed material those
//! streams are initialised from.
//!
//! ## Quick Start
//!
//! ```
//! use rdt_core::{Seed256, SourceKind, generate};
//!
//! // Every source is built from an explicit seed: no global state.
//! let mut source = SourceKind::RdtStreamV2.build(&Seed256::DEFAULT);
//!
//! // 1000 values, 64 bits wide.
//! let stream = generate(source.as_mut(), 1000, 64).unwrap();
//! assert_eq!(stream.byte_len(), 8000);
//! ```
//!
//! ## Architecture
//!
//! Seed material → Stream source → Sample stream
//!
//! Seed material comes from a [`SeedSource`]:
//! - [`ExtractorProcess`]: runs the external `rdt_seed_extractor` binary.
//! - [`DigestSeedSource`]: SHA-256 over the input files, in process.
//! - [`FixtureSeedSource`]: a fixed seed, for tests and reproductions.
//!
//! Every generator implements the [`StreamSource`] trait and is selected with
//! [`SourceKind`].

pub mod error;
pub mod extractor;
pub mod mix;
pub mod seed;
pub mod source;
pub mod sources;
pub mod stream;

pub use error::{SeedError, StreamError};
pub use extractor::{EXTRACTOR_BINARY, ExtractorProcess};
pub use seed::{
    DigestSeedSource, FixtureSeedSource, SEED_WORDS, Seed256, SeedFormat, SeedOutput, SeedSource,
    decode_output, parse_source_array, parse_word_listing,
};
pub use source::{SourceInfo, SourceKind, StreamSource};
pub use sources::{RdtDrbg, RdtPrng, RdtStreamV2, StdRngStream};
pub use stream::{
    DEFAULT_COUNT, DEFAULT_WIDTH, SampleStream, bytes_per_value, generate, width_mask,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
