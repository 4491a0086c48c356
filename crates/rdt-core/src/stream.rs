//! Fixed-width sample streams.
//!
//! A [`SampleStream`] is the immutable input to the test battery: N unsigned
//! integers of a byte-aligned width W, produced by [`generate`].

use crate::error::StreamError;
use crate::source::StreamSource;

/// Default number of values per stream.
pub const DEFAULT_COUNT: usize = 500_000;

/// Default value width in bits.
pub const DEFAULT_WIDTH: u32 = 64;

/// Bytes per value for `width`, or [`StreamError::InvalidWidth`] when the
/// width is not a multiple of 8 in `8..=64`.
pub fn bytes_per_value(width: u32) -> Result<usize, StreamError> {
    if width == 0 || width % 8 != 0 || width > 64 {
        return Err(StreamError::InvalidWidth { width });
    }
    Ok(width as usize / 8)
}

/// Mask selecting the low `width` bits. Caller validates `width`.
pub fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Ordered sequence of `width`-bit unsigned integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleStream {
    values: Vec<u64>,
    width: u32,
}

impl SampleStream {
    /// Wrap existing values, checking the width and that every value fits.
    pub fn new(values: Vec<u64>, width: u32) -> Result<Self, StreamError> {
        bytes_per_value(width)?;
        let mask = width_mask(width);
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| **v & !mask != 0) {
            return Err(StreamError::ValueOutOfRange {
                index,
                value,
                width,
            });
        }
        Ok(Self { values, width })
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Total size of the stream in bytes (`N * W / 8`).
    pub fn byte_len(&self) -> usize {
        self.values.len() * (self.width as usize / 8)
    }
}

/// Draw `count` values of `width` bits from `source`.
///
/// Each value is one source word truncated to its low `width` bits.
pub fn generate(
    source: &mut dyn StreamSource,
    count: usize,
    width: u32,
) -> Result<SampleStream, StreamError> {
    bytes_per_value(width)?;
    let mask = width_mask(width);
    log::debug!("generating {count} x {width}-bit values from {}", source.name());
    let values = (0..count).map(|_| source.next_word() & mask).collect();
    Ok(SampleStream { values, width })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed256;
    use crate::source::SourceKind;

    #[test]
    fn test_bytes_per_value() {
        assert_eq!(bytes_per_value(8), Ok(1));
        assert_eq!(bytes_per_value(32), Ok(4));
        assert_eq!(bytes_per_value(64), Ok(8));
        for width in [0, 7, 12, 65, 72] {
            assert_eq!(
                bytes_per_value(width),
                Err(StreamError::InvalidWidth { width })
            );
        }
    }

    #[test]
    fn test_width_mask() {
        assert_eq!(width_mask(8), 0xFF);
        assert_eq!(width_mask(32), 0xFFFF_FFFF);
        assert_eq!(width_mask(64), u64::MAX);
    }

    #[test]
    fn test_new_rejects_oversized_value() {
        let err = SampleStream::new(vec![1, 2, 0x1FF], 8).unwrap_err();
        assert_eq!(
            err,
            StreamError::ValueOutOfRange {
                index: 2,
                value: 0x1FF,
                width: 8
            }
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        let mut a = SourceKind::RdtStreamV2.build(&Seed256::DEFAULT);
        let mut b = SourceKind::RdtStreamV2.build(&Seed256::DEFAULT);
        let sa = generate(a.as_mut(), 100, 64).unwrap();
        let sb = generate(b.as_mut(), 100, 64).unwrap();
        assert_eq!(sa, sb);
    }

    #[test]
    fn test_generate_masks_to_width() {
        let mut src = SourceKind::RdtStreamV2.build(&Seed256::DEFAULT);
        let stream = generate(src.as_mut(), 1000, 16).unwrap();
        assert_eq!(stream.len(), 1000);
        assert_eq!(stream.byte_len(), 2000);
        assert!(stream.values().iter().all(|&v| v <= 0xFFFF));
    }

    #[test]
    fn test_generate_rejects_bad_width() {
        let mut src = SourceKind::StdRng.build(&Seed256::DEFAULT);
        assert_eq!(
            generate(src.as_mut(), 10, 12),
            Err(StreamError::InvalidWidth { width: 12 })
        );
    }
}
