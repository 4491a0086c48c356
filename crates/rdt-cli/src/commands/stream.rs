use std::io::Write;

use rdt_core::{Seed256, StreamSource};

use super::{fail, parse_seed, parse_source};

const CHUNK_SIZE: usize = 4096;

/// Copy `n_bytes` of generator output to `out` (0 = until the writer fails).
///
/// Returns the number of bytes written. A write error such as a closed pipe
/// ends the stream.
fn pump(source: &mut dyn StreamSource, out: &mut impl Write, n_bytes: usize) -> usize {
    let mut buf = [0u8; CHUNK_SIZE];
    let mut total = 0usize;

    loop {
        if n_bytes > 0 && total >= n_bytes {
            break;
        }
        let want = if n_bytes == 0 {
            CHUNK_SIZE
        } else {
            CHUNK_SIZE.min(n_bytes - total)
        };

        source.fill_bytes(&mut buf[..want]);
        if out.write_all(&buf[..want]).is_err() {
            break; // Broken pipe
        }
        total += want;
    }
    let _ = out.flush();
    total
}

pub fn run(seed: Option<&str>, source_name: &str, n_bytes: usize) {
    let kind = parse_source(source_name).unwrap_or_else(|e| fail(e));
    let seed = parse_seed(seed, Seed256::DEFAULT).unwrap_or_else(|e| fail(e));
    let mut source = kind.build(&seed);
    log::info!("streaming {kind} output ({n_bytes} bytes, 0 = unbounded)");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    pump(source.as_mut(), &mut out, n_bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdt_core::SourceKind;

    #[test]
    fn test_pump_exact_length() {
        let mut source = SourceKind::RdtStreamV2.build(&Seed256::DEFAULT);
        let mut out = Vec::new();
        assert_eq!(pump(source.as_mut(), &mut out, 10_000), 10_000);
        assert_eq!(out.len(), 10_000);
    }

    #[test]
    fn test_pump_little_endian_words() {
        let mut reference = SourceKind::RdtDrbg.build(&Seed256::DEFAULT);
        let first = reference.next_word();

        let mut source = SourceKind::RdtDrbg.build(&Seed256::DEFAULT);
        let mut out = Vec::new();
        pump(source.as_mut(), &mut out, 8);
        assert_eq!(out, first.to_le_bytes());
    }

    /// Accepts a fixed number of bytes, then fails like a closed pipe.
    struct ClosingPipe {
        remaining: usize,
    }

    impl Write for ClosingPipe {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.remaining == 0 {
                return Err(std::io::ErrorKind::BrokenPipe.into());
            }
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_pump_unbounded_stops_on_broken_pipe() {
        let mut source = SourceKind::StdRng.build(&Seed256::DEFAULT);
        let mut pipe = ClosingPipe { remaining: 3 * CHUNK_SIZE };
        assert_eq!(pump(source.as_mut(), &mut pipe, 0), 3 * CHUNK_SIZE);
    }
}
