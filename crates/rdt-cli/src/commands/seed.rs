use std::io::Write;
use std::path::{Path, PathBuf};

use rdt_core::{DigestSeedSource, ExtractorProcess, SeedFormat, SeedOutput, SeedSource};

use super::fail;

/// Text printed for a seed. Raw bytes have no text form.
fn render(output: &SeedOutput) -> Option<String> {
    match output {
        SeedOutput::Hex(hex) => Some(hex.clone()),
        SeedOutput::SourceArray(text) => Some(text.clone()),
        SeedOutput::Words(words) => Some(
            words
                .iter()
                .enumerate()
                .map(|(i, w)| format!("[{i}] 0x{w:016x}"))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        SeedOutput::Bytes(_) => None,
    }
}

pub fn run(inputs: &[PathBuf], format: &str, extractor: Option<&Path>, digest: bool) {
    let format: SeedFormat = format.parse().unwrap_or_else(|e: String| fail(e));

    let source: Box<dyn SeedSource> = if digest {
        Box::new(DigestSeedSource)
    } else {
        let process = match extractor {
            Some(path) => ExtractorProcess::new(path),
            None => ExtractorProcess::discover(&ExtractorProcess::default_search_dirs()),
        };
        Box::new(process.unwrap_or_else(|e| fail(e)))
    };

    let output = source
        .extract(inputs, format)
        .unwrap_or_else(|e| fail(e));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = match (&output, render(&output)) {
        (SeedOutput::Bytes(bytes), _) => out.write_all(bytes),
        (_, Some(text)) => writeln!(out, "{text}"),
        (_, None) => Ok(()),
    };
    if let Err(e) = written.and_then(|_| out.flush()) {
        fail(e);
    }
}
