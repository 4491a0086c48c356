//! Lightweight randomness smoke-test battery for fixed-width integer streams.
//!
//! A [`SampleStream`](rdt_core::SampleStream) is decomposed once into a byte
//! view and a bit view; seven estimators run over those views (entropy,
//! monobit frequency, runs, chi-square, serial chi-square, multi-lag
//! autocorrelation, avalanche) and their results are aggregated into a
//! [`Report`].
//!
//! This is a smoke test, not a certified statistical test suite: estimators
//! report raw statistics and never pass or fail a stream.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::erf::erfc;

mod avalanche;
mod battery;
mod config;
mod error;
mod report;

pub use avalanche::{AvalancheOutcome, avalanche};
pub use battery::{run_battery, run_seeded};
pub use config::{BatteryConfig, ConfigError, DEFAULT_AVALANCHE_TRIALS, DEFAULT_LAGS};
pub use error::BatteryError;
pub use report::{
    AVALANCHE_SECTION, Outcome, REPORT_TITLE, Report, STATISTICAL_SECTION, Section, TestResult,
    aggregate,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Views
// ═══════════════════════════════════════════════════════════════════════════════

/// Bytes of every value, little-endian, `width / 8` bytes per value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteView(Vec<u8>);

/// The byte view unpacked MSB first, one `0`/`1` per element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitView(Vec<u8>);

impl ByteView {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl BitView {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Unpack a byte slice into individual bits (MSB first per byte).
fn to_bits(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Split `values` into the byte and bit views the estimators run over.
///
/// Only the low `width / 8` bytes of each value are kept.
pub fn decompose(values: &[u64], width: u32) -> Result<(ByteView, BitView), BatteryError> {
    let per_value =
        rdt_core::bytes_per_value(width).map_err(|_| BatteryError::InvalidWidth { width })?;
    let mut bytes = Vec::with_capacity(values.len() * per_value);
    for v in values {
        bytes.extend_from_slice(&v.to_le_bytes()[..per_value]);
    }
    let bits = to_bits(&bytes);
    Ok((ByteView(bytes), BitView(bits)))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Byte estimators
// ═══════════════════════════════════════════════════════════════════════════════

fn byte_histogram(data: &[u8]) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for &b in data {
        hist[b as usize] += 1;
    }
    hist
}

/// Shannon entropy in bits per byte, in `[0, 8]`.
pub fn shannon_entropy(data: &[u8]) -> Result<f64, BatteryError> {
    let n = data.len();
    if n == 0 {
        return Err(BatteryError::degenerate("entropy", "empty byte view"));
    }
    let mut h = 0.0;
    for &c in &byte_histogram(data) {
        if c > 0 {
            let p = c as f64 / n as f64;
            h -= p * p.log2();
        }
    }
    // -0.0 for a single repeated byte.
    Ok(h.max(0.0))
}

/// Pearson chi-square statistic against a uniform histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChiSquareOutcome {
    pub statistic: f64,
    pub degrees_of_freedom: u32,
    /// Survival function of the chi-square distribution at `statistic`.
    pub p_value: Option<f64>,
}

fn chi_square_from_counts(
    counts: &[u64],
    total: u64,
    test: &'static str,
) -> Result<ChiSquareOutcome, BatteryError> {
    let expected = total as f64 / counts.len() as f64;
    if expected == 0.0 {
        return Err(BatteryError::degenerate(test, "expected bin count is zero"));
    }
    let statistic: f64 = counts
        .iter()
        .map(|&o| {
            let d = o as f64 - expected;
            d * d / expected
        })
        .sum();
    let degrees_of_freedom = (counts.len() - 1) as u32;
    let p_value = ChiSquared::new(degrees_of_freedom as f64)
        .ok()
        .map(|dist| dist.sf(statistic));
    Ok(ChiSquareOutcome {
        statistic,
        degrees_of_freedom,
        p_value,
    })
}

/// Chi-square over the 256-bin byte histogram.
pub fn chi_square(data: &[u8]) -> Result<ChiSquareOutcome, BatteryError> {
    chi_square_from_counts(&byte_histogram(data), data.len() as u64, "chi-square")
}

/// Chi-square over the 65536 bins of overlapping byte pairs
/// `(byte[i] << 8) | byte[i + 1]`.
pub fn serial_chi_square(data: &[u8]) -> Result<ChiSquareOutcome, BatteryError> {
    let pairs = data.len().saturating_sub(1) as u64;
    chi_square_from_counts(&pair_histogram(data), pairs, "serial chi-square")
}

/// Counts of overlapping byte pairs, indexed by `(first << 8) | second`.
fn pair_histogram(data: &[u8]) -> Vec<u64> {
    let mut counts = vec![0u64; 1 << 16];
    for pair in data.windows(2) {
        counts[(usize::from(pair[0]) << 8) | usize::from(pair[1])] += 1;
    }
    counts
}

// ═══════════════════════════════════════════════════════════════════════════════
// Bit estimators
// ═══════════════════════════════════════════════════════════════════════════════

/// Proportion of ones in the bit view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonobitOutcome {
    pub proportion: f64,
    /// `erfc(|S| / sqrt(2n))` where `S` is the ±1 sum.
    pub p_value: f64,
}

pub fn monobit_frequency(bits: &[u8]) -> Result<MonobitOutcome, BatteryError> {
    let n = bits.len();
    if n == 0 {
        return Err(BatteryError::degenerate("monobit frequency", "empty bit view"));
    }
    let ones = bits.iter().filter(|&&b| b == 1).count();
    let s = 2 * ones as i64 - n as i64;
    let s_obs = (s as f64).abs() / (n as f64).sqrt();
    Ok(MonobitOutcome {
        proportion: ones as f64 / n as f64,
        p_value: erfc(s_obs / 2.0_f64.sqrt()),
    })
}

/// Observed number of runs and the count expected for the observed bias.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunsOutcome {
    pub observed: u64,
    /// `2 n p (1 - p)`.
    pub expected: f64,
}

pub fn runs_test(bits: &[u8]) -> Result<RunsOutcome, BatteryError> {
    let n = bits.len();
    if n == 0 {
        return Err(BatteryError::degenerate("runs test", "empty bit view"));
    }
    let transitions = bits.windows(2).filter(|w| w[0] != w[1]).count() as u64;
    let p = bits.iter().filter(|&&b| b == 1).count() as f64 / n as f64;
    Ok(RunsOutcome {
        observed: transitions + 1,
        expected: 2.0 * n as f64 * p * (1.0 - p),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Value estimators
// ═══════════════════════════════════════════════════════════════════════════════

/// Pearson correlation between `values[..N - lag]` and `values[lag..]`.
pub fn autocorrelation(values: &[u64], lag: usize) -> Result<f64, BatteryError> {
    let n = values.len();
    if lag == 0 || lag >= n {
        return Err(BatteryError::InvalidLag { lag, len: n });
    }
    let x = &values[..n - lag];
    let y = &values[lag..];
    let len = x.len() as f64;
    let mean_x = x.iter().map(|&v| v as f64).sum::<f64>() / len;
    let mean_y = y.iter().map(|&v| v as f64).sum::<f64>() / len;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let dx = a as f64 - mean_x;
        let dy = b as f64 - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return Err(BatteryError::degenerate(
            "autocorrelation",
            format!("zero variance at lag {lag}"),
        ));
    }
    Ok((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate pseudo-random data for testing (splitmix64).
    fn pseudo_random(n: usize) -> Vec<u64> {
        let mut out = Vec::with_capacity(n);
        let mut state: u64 = 0xDEAD_BEEF_CAFE_BABE;
        for _ in 0..n {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            out.push(z ^ (z >> 31));
        }
        out
    }

    #[test]
    fn test_to_bits() {
        let data = [0b10110001u8];
        let bits = to_bits(&data);
        assert_eq!(bits, vec![1, 0, 1, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_decompose_little_endian() {
        let (bytes, bits) = decompose(&[0x0102], 16).unwrap();
        assert_eq!(bytes.as_slice(), &[0x02, 0x01]);
        assert_eq!(&bits.as_slice()[..8], &[0, 0, 0, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_decompose_lengths() {
        let values = pseudo_random(100);
        let (bytes, bits) = decompose(&values, 64).unwrap();
        assert_eq!(bytes.len(), 8 * 100);
        assert_eq!(bits.len(), 64 * 100);

        let (bytes, bits) = decompose(&values, 24).unwrap();
        assert_eq!(bytes.len(), 3 * 100);
        assert_eq!(bits.len(), 8 * bytes.len());
    }

    #[test]
    fn test_decompose_invalid_width() {
        for width in [0, 7, 12, 72] {
            assert_eq!(
                decompose(&[1], width),
                Err(BatteryError::InvalidWidth { width })
            );
        }
    }

    #[test]
    fn test_entropy_uniform_is_eight() {
        let data: Vec<u8> = (0..=255u8).cycle().take(256 * 4).collect();
        let h = shannon_entropy(&data).unwrap();
        assert!((h - 8.0).abs() < 1e-12, "entropy {h}");
    }

    #[test]
    fn test_entropy_constant_is_zero() {
        assert_eq!(shannon_entropy(&[7u8; 100]).unwrap(), 0.0);
    }

    #[test]
    fn test_entropy_empty() {
        assert!(matches!(
            shannon_entropy(&[]),
            Err(BatteryError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_chi_square_perfect_histogram() {
        let data: Vec<u8> = (0..=255u8).cycle().take(256 * 10).collect();
        let outcome = chi_square(&data).unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert_eq!(outcome.degrees_of_freedom, 255);
        let p = outcome.p_value.unwrap();
        assert!((p - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_chi_square_constant_is_large() {
        let outcome = chi_square(&[0u8; 2560]).unwrap();
        // All mass in one bin: (2560 - 10)^2 / 10 + 255 * 10.
        assert!((outcome.statistic - 652_800.0).abs() < 1e-6);
        assert!(outcome.p_value.unwrap() < 1e-6);
    }

    #[test]
    fn test_chi_square_empty() {
        assert!(matches!(
            chi_square(&[]),
            Err(BatteryError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_serial_chi_square() {
        assert!(matches!(
            serial_chi_square(&[1]),
            Err(BatteryError::DegenerateInput { .. })
        ));

        let values = pseudo_random(20_000);
        let (bytes, _) = decompose(&values, 64).unwrap();
        let outcome = serial_chi_square(bytes.as_slice()).unwrap();
        assert_eq!(outcome.degrees_of_freedom, 65_535);
        assert!(outcome.statistic > 0.0);
    }

    #[test]
    fn test_pair_histogram_first_byte_high() {
        let counts = pair_histogram(&[0x12, 0x34]);
        assert_eq!(counts[0x1234], 1);
        assert_eq!(counts[0x3412], 0);
        assert_eq!(counts.iter().sum::<u64>(), 1);

        let counts = pair_histogram(&[0x00, 0x01, 0x00]);
        assert_eq!(counts[0x0001], 1);
        assert_eq!(counts[0x0100], 1);
        assert_eq!(counts.iter().sum::<u64>(), 2);
    }

    #[test]
    fn test_serial_chi_square_exact_small_input() {
        // Two pairs over 65536 bins: two bins hold 1, the rest hold 0.
        let e: f64 = 2.0 / 65_536.0;
        let expected = 2.0 * (1.0 - e).powi(2) / e + 65_534.0 * e;
        let outcome = serial_chi_square(&[0x00, 0x01, 0x00]).unwrap();
        assert!(
            (outcome.statistic - expected).abs() < 1e-9 * expected,
            "{} vs {expected}",
            outcome.statistic
        );
        assert_eq!(outcome.degrees_of_freedom, 65_535);
    }

    #[test]
    fn test_serial_chi_square_every_pair_once() {
        // Cyclic de Bruijn sequence over bytes: every ordered pair occurs once.
        let mut data = Vec::with_capacity(65_537);
        for a in 0..256usize {
            data.push(a as u8);
            for b in a + 1..256 {
                data.extend([a as u8, b as u8]);
            }
        }
        data.push(data[0]);
        assert_eq!(data.len(), 65_537);
        assert!(pair_histogram(&data).iter().all(|&c| c == 1));

        let outcome = serial_chi_square(&data).unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert!((outcome.p_value.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_monobit() {
        let outcome = monobit_frequency(&[1, 0, 1, 0]).unwrap();
        assert_eq!(outcome.proportion, 0.5);
        assert!((outcome.p_value - 1.0).abs() < 1e-12);

        let outcome = monobit_frequency(&[1; 100]).unwrap();
        assert_eq!(outcome.proportion, 1.0);
        assert!(outcome.p_value < 1e-6);

        assert!(monobit_frequency(&[]).is_err());
    }

    #[test]
    fn test_runs_known_sequence() {
        let outcome = runs_test(&[1, 1, 0, 0, 1]).unwrap();
        assert_eq!(outcome.observed, 3);
        assert!((outcome.expected - 2.4).abs() < 1e-12);
    }

    #[test]
    fn test_runs_single_bit() {
        let outcome = runs_test(&[1]).unwrap();
        assert_eq!(outcome.observed, 1);
        assert_eq!(outcome.expected, 0.0);
        assert!(runs_test(&[]).is_err());
    }

    #[test]
    fn test_autocorrelation_alternating() {
        let values: Vec<u64> = (0..1000).map(|i| i % 2).collect();
        let r = autocorrelation(&values, 1).unwrap();
        assert!((r + 1.0).abs() < 1e-12, "r = {r}");
        let r = autocorrelation(&values, 2).unwrap();
        assert!((r - 1.0).abs() < 1e-12, "r = {r}");
    }

    #[test]
    fn test_autocorrelation_random_near_zero() {
        let values = pseudo_random(10_000);
        for lag in [1, 2, 8, 64] {
            let r = autocorrelation(&values, lag).unwrap();
            assert!(r.abs() < 0.05, "lag {lag}: r = {r}");
        }
    }

    #[test]
    fn test_autocorrelation_invalid_lag() {
        let values = [1u64, 2, 3, 4];
        assert_eq!(
            autocorrelation(&values, 0),
            Err(BatteryError::InvalidLag { lag: 0, len: 4 })
        );
        assert_eq!(
            autocorrelation(&values, 4),
            Err(BatteryError::InvalidLag { lag: 4, len: 4 })
        );
        assert!(autocorrelation(&values, 3).is_err());
    }

    #[test]
    fn test_autocorrelation_constant() {
        assert!(matches!(
            autocorrelation(&[5u64; 10], 1),
            Err(BatteryError::DegenerateInput { .. })
        ));
    }
}
