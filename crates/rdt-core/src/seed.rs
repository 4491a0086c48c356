//! 256-bit seed material and the [`SeedSource`] capability.
//!
//! Seed material reaches the suite through a [`SeedSource`]: a single
//! operation taking input file paths and a [`SeedFormat`] and returning the
//! encoded seed or a typed [`SeedError`]. Callers do not care whether the
//! seed came from the external extractor process
//! ([`ExtractorProcess`](crate::extractor::ExtractorProcess)), an in-process
//! digest ([`DigestSeedSource`]) or a fixed fixture ([`FixtureSeedSource`]).
//!
//! # Formats
//!
//! | Format        | Encoding                                             |
//! |---------------|------------------------------------------------------|
//! | `Hex`         | 64 lowercase hex digits                              |
//! | `RawBytes`    | the 32 seed bytes                                    |
//! | `SourceArray` | `uint64_t seed[4] = { 0x…ULL, … };` source text      |
//! | `U64Tuple`    | four 64-bit words                                    |
//!
//! Words are the big-endian 8-byte groups of the seed, so the four words
//! printed as 16 hex digits each, in order, reproduce the `Hex` encoding.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::error::SeedError;

/// Number of words in the `U64Tuple` format.
pub const SEED_WORDS: usize = 4;

/// Separator appended after each input file before digesting.
const RECORD_SEPARATOR: u8 = 0x1E;

// ---------------------------------------------------------------------------
// Seed256
// ---------------------------------------------------------------------------

/// 256 bits of seed material.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed256([u8; 32]);

impl Seed256 {
    /// Default stream seed (taken from sensor-entropy validation runs).
    pub const DEFAULT: Seed256 = Seed256::from_words([
        0xe607_dabd_fc95_38b5,
        0x0050_f786_6258_289c,
        0xedc2_d97a_03b3_12ad,
        0xcaed_bc21_5ece_9a31,
    ]);

    /// Default seed for the avalanche prober's independent source.
    pub const DEFAULT_AVALANCHE: Seed256 = Seed256::from_words([
        0x243f_6a88_85a3_08d3,
        0x1319_8a2e_0370_7344,
        0xa409_3822_299f_31d0,
        0x082e_fa98_ec4e_6c89,
    ]);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build from four big-endian words.
    pub const fn from_words(words: [u64; 4]) -> Self {
        let mut out = [0u8; 32];
        let mut i = 0;
        while i < 4 {
            let bytes = words[i].to_be_bytes();
            let mut j = 0;
            while j < 8 {
                out[i * 8 + j] = bytes[j];
                j += 1;
            }
            i += 1;
        }
        Self(out)
    }

    /// Build from exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SeedError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| SeedError::FormatMismatch {
            format: SeedFormat::RawBytes,
            expected: 32,
            got: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Parse 64 hex digits, optionally prefixed with `0x`.
    pub fn from_hex(text: &str) -> Result<Self, SeedError> {
        let text = text.trim();
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        if digits.len() != 64 {
            return Err(SeedError::InvalidEncoding {
                format: SeedFormat::Hex,
                reason: format!("expected 64 hex digits, got {}", digits.len()),
            });
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(SeedError::InvalidEncoding {
                format: SeedFormat::Hex,
                reason: format!("invalid hex digit '{bad}'"),
            });
        }
        let mut out = [0u8; 32];
        for (i, slot) in out.iter_mut().enumerate() {
            let pair = &digits[i * 2..i * 2 + 2];
            *slot = u8::from_str_radix(pair, 16).map_err(|e| SeedError::InvalidEncoding {
                format: SeedFormat::Hex,
                reason: format!("'{pair}': {e}"),
            })?;
        }
        Ok(Self(out))
    }

    /// Draw a fresh seed from the operating system.
    ///
    /// The only non-deterministic constructor; print the result if the run
    /// must be reproducible.
    pub fn from_os() -> Result<Self, SeedError> {
        let mut out = [0u8; 32];
        getrandom::fill(&mut out).map_err(|e| SeedError::Entropy(e.to_string()))?;
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Seed as four big-endian words.
    pub fn words(&self) -> [u64; 4] {
        let mut words = [0u64; 4];
        for (word, chunk) in words.iter_mut().zip(self.0.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *word = u64::from_be_bytes(buf);
        }
        words
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Seed rendered as C source text.
    pub fn to_source_array(&self) -> String {
        let words = self.words();
        let mut out = String::from("uint64_t seed[4] = {\n");
        for (i, w) in words.iter().enumerate() {
            let comma = if i + 1 < words.len() { "," } else { "" };
            out.push_str(&format!("    0x{w:016x}ULL{comma}\n"));
        }
        out.push_str("};\n");
        out
    }

    /// Encode in the requested format.
    pub fn encode(&self, format: SeedFormat) -> SeedOutput {
        match format {
            SeedFormat::Hex => SeedOutput::Hex(self.to_hex()),
            SeedFormat::RawBytes => SeedOutput::Bytes(self.0.to_vec()),
            SeedFormat::SourceArray => SeedOutput::SourceArray(self.to_source_array()),
            SeedFormat::U64Tuple => SeedOutput::Words(self.words()),
        }
    }
}

impl std::fmt::Display for Seed256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::fmt::Debug for Seed256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seed256({})", self.to_hex())
    }
}

impl FromStr for Seed256 {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// ---------------------------------------------------------------------------
// Formats and outputs
// ---------------------------------------------------------------------------

/// Output encoding requested from a [`SeedSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeedFormat {
    #[default]
    Hex,
    RawBytes,
    SourceArray,
    U64Tuple,
}

impl SeedFormat {
    /// Command-line flag selecting this format on the extractor binary.
    /// Hex is the extractor's default and needs no flag.
    pub fn extractor_flag(self) -> Option<&'static str> {
        match self {
            Self::Hex => None,
            Self::RawBytes => Some("-b"),
            Self::SourceArray => Some("-c"),
            Self::U64Tuple => Some("-u"),
        }
    }
}

impl std::fmt::Display for SeedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hex => write!(f, "hex"),
            Self::RawBytes => write!(f, "bytes"),
            Self::SourceArray => write!(f, "c"),
            Self::U64Tuple => write!(f, "u64"),
        }
    }
}

impl FromStr for SeedFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hex" => Ok(Self::Hex),
            "bytes" | "raw" => Ok(Self::RawBytes),
            "c" | "array" => Ok(Self::SourceArray),
            "u64" | "tuple" => Ok(Self::U64Tuple),
            other => Err(format!(
                "unknown seed format '{other}' (expected hex, bytes, c or u64)"
            )),
        }
    }
}

/// A seed in one of the [`SeedFormat`] encodings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutput {
    Hex(String),
    Bytes(Vec<u8>),
    SourceArray(String),
    Words([u64; 4]),
}

impl SeedOutput {
    pub fn format(&self) -> SeedFormat {
        match self {
            Self::Hex(_) => SeedFormat::Hex,
            Self::Bytes(_) => SeedFormat::RawBytes,
            Self::SourceArray(_) => SeedFormat::SourceArray,
            Self::Words(_) => SeedFormat::U64Tuple,
        }
    }

    /// Decode back into a [`Seed256`].
    pub fn to_seed(&self) -> Result<Seed256, SeedError> {
        match self {
            Self::Hex(text) => Seed256::from_hex(text),
            Self::Bytes(bytes) => Seed256::from_slice(bytes),
            Self::SourceArray(text) => parse_source_array(text).map(Seed256::from_words),
            Self::Words(words) => Ok(Seed256::from_words(*words)),
        }
    }
}

/// Decode an extractor's stdout for `format`.
pub fn decode_output(format: SeedFormat, stdout: Vec<u8>) -> Result<SeedOutput, SeedError> {
    match format {
        SeedFormat::RawBytes => {
            Seed256::from_slice(&stdout)?;
            Ok(SeedOutput::Bytes(stdout))
        }
        SeedFormat::Hex => {
            let hex = utf8_text(format, stdout)?.trim().to_string();
            Seed256::from_hex(&hex)?;
            Ok(SeedOutput::Hex(hex))
        }
        SeedFormat::SourceArray => {
            let text = utf8_text(format, stdout)?;
            parse_source_array(&text)?;
            Ok(SeedOutput::SourceArray(text))
        }
        SeedFormat::U64Tuple => {
            parse_word_listing(&utf8_text(format, stdout)?).map(SeedOutput::Words)
        }
    }
}

fn utf8_text(format: SeedFormat, bytes: Vec<u8>) -> Result<String, SeedError> {
    String::from_utf8(bytes).map_err(|e| SeedError::InvalidEncoding {
        format,
        reason: e.to_string(),
    })
}

/// Parse the extractor's `[i] 0x…` word listing. Exactly four words required.
pub fn parse_word_listing(text: &str) -> Result<[u64; 4], SeedError> {
    let format = SeedFormat::U64Tuple;
    let words = text
        .lines()
        .filter_map(|line| line.split_once("] 0x").map(|(_, hex)| hex.trim()))
        .map(|hex| parse_hex_word(hex, format))
        .collect::<Result<Vec<u64>, SeedError>>()?;
    into_words(words, format)
}

/// Parse `0x…ULL` literals out of C source text. Exactly four required.
pub fn parse_source_array(text: &str) -> Result<[u64; 4], SeedError> {
    let format = SeedFormat::SourceArray;
    let words = text
        .split(|c: char| c.is_whitespace() || c == ',' || c == '{' || c == '}' || c == ';')
        .filter_map(|token| token.strip_prefix("0x"))
        .map(|hex| parse_hex_word(hex.trim_end_matches("ULL"), format))
        .collect::<Result<Vec<u64>, SeedError>>()?;
    into_words(words, format)
}

fn parse_hex_word(hex: &str, format: SeedFormat) -> Result<u64, SeedError> {
    u64::from_str_radix(hex, 16).map_err(|e| SeedError::InvalidEncoding {
        format,
        reason: format!("'{hex}': {e}"),
    })
}

fn into_words(words: Vec<u64>, format: SeedFormat) -> Result<[u64; 4], SeedError> {
    let got = words.len();
    words.try_into().map_err(|_| SeedError::FormatMismatch {
        format,
        expected: SEED_WORDS,
        got,
    })
}

// ---------------------------------------------------------------------------
// SeedSource capability
// ---------------------------------------------------------------------------

/// Anything that can turn input files into 256-bit seed material.
pub trait SeedSource {
    fn extract(&self, inputs: &[PathBuf], format: SeedFormat) -> Result<SeedOutput, SeedError>;
}

/// Fail with [`SeedError::NoInputs`] or [`SeedError::InputNotFound`].
pub fn check_inputs(inputs: &[PathBuf]) -> Result<(), SeedError> {
    if inputs.is_empty() {
        return Err(SeedError::NoInputs);
    }
    match inputs.iter().find(|p| !p.exists()) {
        Some(missing) => Err(SeedError::InputNotFound {
            path: missing.clone(),
        }),
        None => Ok(()),
    }
}

/// Always returns the same seed, regardless of inputs.
#[derive(Debug, Clone)]
pub struct FixtureSeedSource {
    seed: Seed256,
}

impl FixtureSeedSource {
    pub fn new(seed: Seed256) -> Self {
        Self { seed }
    }

    /// Load a fixture file holding the seed as hex text.
    pub fn from_hex_file(path: &Path) -> Result<Self, SeedError> {
        if !path.exists() {
            return Err(SeedError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(Seed256::from_hex(&text)?))
    }
}

impl SeedSource for FixtureSeedSource {
    fn extract(&self, _inputs: &[PathBuf], format: SeedFormat) -> Result<SeedOutput, SeedError> {
        Ok(self.seed.encode(format))
    }
}

/// In-process seed derivation: SHA-256 over every input file, each followed
/// by a record separator byte.
#[derive(Debug, Clone, Default)]
pub struct DigestSeedSource;

impl DigestSeedSource {
    pub fn digest(&self, inputs: &[PathBuf]) -> Result<Seed256, SeedError> {
        check_inputs(inputs)?;
        let mut hasher = Sha256::new();
        for path in inputs {
            let n = std::io::copy(&mut std::fs::File::open(path)?, &mut hasher)?;
            log::debug!("digesting {} ({n} bytes)", path.display());
            hasher.update([RECORD_SEPARATOR]);
        }
        Ok(Seed256::from_bytes(hasher.finalize().into()))
    }
}

impl SeedSource for DigestSeedSource {
    fn extract(&self, inputs: &[PathBuf], format: SeedFormat) -> Result<SeedOutput, SeedError> {
        Ok(self.digest(inputs)?.encode(format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_concatenate_to_hex() {
        let seed = Seed256::DEFAULT;
        let SeedOutput::Words(words) = seed.encode(SeedFormat::U64Tuple) else {
            panic!("expected words");
        };
        let SeedOutput::Hex(hex) = seed.encode(SeedFormat::Hex) else {
            panic!("expected hex");
        };
        let joined: String = words.iter().map(|w| format!("{w:016x}")).collect();
        assert_eq!(joined, hex);
        assert_eq!(
            hex,
            "e607dabdfc9538b50050f7866258289cedc2d97a03b312adcaedbc215ece9a31"
        );
    }

    #[test]
    fn test_hex_parse() {
        let seed = Seed256::from_hex(&Seed256::DEFAULT.to_hex()).unwrap();
        assert_eq!(seed, Seed256::DEFAULT);
        let prefixed = format!("0x{}\n", Seed256::DEFAULT.to_hex().to_uppercase());
        assert_eq!(Seed256::from_hex(&prefixed).unwrap(), Seed256::DEFAULT);
    }

    #[test]
    fn test_hex_parse_rejects_bad_input() {
        assert!(matches!(
            Seed256::from_hex("abcd"),
            Err(SeedError::InvalidEncoding { .. })
        ));
        let bad = "zz".repeat(32);
        assert!(matches!(
            Seed256::from_hex(&bad),
            Err(SeedError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn test_from_slice_length() {
        assert!(Seed256::from_slice(&[0u8; 32]).is_ok());
        assert!(matches!(
            Seed256::from_slice(&[0u8; 31]),
            Err(SeedError::FormatMismatch {
                expected: 32,
                got: 31,
                ..
            })
        ));
    }

    #[test]
    fn test_every_format_decodes_to_same_seed() {
        let seed = Seed256::DEFAULT_AVALANCHE;
        for format in [
            SeedFormat::Hex,
            SeedFormat::RawBytes,
            SeedFormat::SourceArray,
            SeedFormat::U64Tuple,
        ] {
            let out = seed.encode(format);
            assert_eq!(out.format(), format);
            assert_eq!(out.to_seed().unwrap(), seed);
        }
    }

    #[test]
    fn test_parse_word_listing() {
        let text = "[0] 0xe607dabdfc9538b5\n[1] 0x0050f7866258289c\n\
                    [2] 0xedc2d97a03b312ad\n[3] 0xcaedbc215ece9a31\n";
        let words = parse_word_listing(text).unwrap();
        assert_eq!(Seed256::from_words(words), Seed256::DEFAULT);
    }

    #[test]
    fn test_parse_word_listing_count_mismatch() {
        let text = "[0] 0x01\n[1] 0x02\n[2] 0x03\n";
        match parse_word_listing(text) {
            Err(SeedError::FormatMismatch {
                format,
                expected,
                got,
            }) => {
                assert_eq!(format, SeedFormat::U64Tuple);
                assert_eq!(expected, 4);
                assert_eq!(got, 3);
            }
            other => panic!("expected FormatMismatch, got {other:?}"),
        }
        let five = "[0] 0x1\n[1] 0x2\n[2] 0x3\n[3] 0x4\n[4] 0x5\n";
        assert!(matches!(
            parse_word_listing(five),
            Err(SeedError::FormatMismatch { got: 5, .. })
        ));
    }

    #[test]
    fn test_parse_source_array() {
        let text = Seed256::DEFAULT.to_source_array();
        assert!(text.starts_with("uint64_t seed[4] = {"));
        assert!(text.contains("0xe607dabdfc9538b5ULL,"));
        assert_eq!(
            Seed256::from_words(parse_source_array(&text).unwrap()),
            Seed256::DEFAULT
        );
    }

    #[test]
    fn test_decode_output_hex_trims() {
        let out = decode_output(
            SeedFormat::Hex,
            format!("{}\n", Seed256::DEFAULT.to_hex()).into_bytes(),
        )
        .unwrap();
        assert_eq!(out, SeedOutput::Hex(Seed256::DEFAULT.to_hex()));
    }

    #[test]
    fn test_decode_output_raw_length() {
        assert!(matches!(
            decode_output(SeedFormat::RawBytes, vec![0u8; 16]),
            Err(SeedError::FormatMismatch { got: 16, .. })
        ));
    }

    #[test]
    fn test_seed_format_parse() {
        assert_eq!("hex".parse::<SeedFormat>(), Ok(SeedFormat::Hex));
        assert_eq!("bytes".parse::<SeedFormat>(), Ok(SeedFormat::RawBytes));
        assert_eq!("c".parse::<SeedFormat>(), Ok(SeedFormat::SourceArray));
        assert_eq!("u64".parse::<SeedFormat>(), Ok(SeedFormat::U64Tuple));
        assert!("base64".parse::<SeedFormat>().is_err());
        for format in [
            SeedFormat::Hex,
            SeedFormat::RawBytes,
            SeedFormat::SourceArray,
            SeedFormat::U64Tuple,
        ] {
            assert_eq!(format.to_string().parse::<SeedFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_extractor_flags() {
        assert_eq!(SeedFormat::Hex.extractor_flag(), None);
        assert_eq!(SeedFormat::RawBytes.extractor_flag(), Some("-b"));
        assert_eq!(SeedFormat::SourceArray.extractor_flag(), Some("-c"));
        assert_eq!(SeedFormat::U64Tuple.extractor_flag(), Some("-u"));
    }

    #[test]
    fn test_check_inputs() {
        assert!(matches!(check_inputs(&[]), Err(SeedError::NoInputs)));
        let missing = PathBuf::from("/definitely/not/here.csv");
        match check_inputs(&[missing.clone()]) {
            Err(SeedError::InputNotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected InputNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_digest_streams_large_files() {
        let dir = tempfile::tempdir().unwrap();
        let big: Vec<u8> = (0..100_000u32).map(|i| (i * 7 + i / 256) as u8).collect();
        let small = b"t,x\n0,1\n".to_vec();
        let big_path = dir.path().join("big.bin");
        let small_path = dir.path().join("small.csv");
        std::fs::write(&big_path, &big).unwrap();
        std::fs::write(&small_path, &small).unwrap();

        let mut hasher = Sha256::new();
        hasher.update(&big);
        hasher.update([RECORD_SEPARATOR]);
        hasher.update(&small);
        hasher.update([RECORD_SEPARATOR]);
        let expected = Seed256::from_bytes(hasher.finalize().into());

        let seed = DigestSeedSource.digest(&[big_path, small_path]).unwrap();
        assert_eq!(seed, expected);
    }

    #[test]
    fn test_fixture_ignores_inputs() {
        let source = FixtureSeedSource::new(Seed256::DEFAULT);
        let out = source.extract(&[], SeedFormat::U64Tuple).unwrap();
        assert_eq!(out.to_seed().unwrap(), Seed256::DEFAULT);
    }

    #[test]
    fn test_os_seeds_differ() {
        let a = Seed256::from_os().unwrap();
        let b = Seed256::from_os().unwrap();
        assert_ne!(a, b);
    }
}
