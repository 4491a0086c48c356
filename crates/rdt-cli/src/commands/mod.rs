pub mod run;
pub mod seed;
pub mod stream;

use rdt_core::{Seed256, SourceKind};

/// Print `Error: <msg>` and exit with status 1.
pub fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

/// Resolve a `--seed` style argument.
///
/// `None` selects `default`; `"os"` draws a fresh seed and reports it on
/// stderr so the run can be reproduced; anything else must be 64 hex digits.
pub fn parse_seed(arg: Option<&str>, default: Seed256) -> Result<Seed256, String> {
    match arg {
        None => Ok(default),
        Some("os") => {
            let seed = Seed256::from_os().map_err(|e| e.to_string())?;
            eprintln!("Seed: {seed}");
            Ok(seed)
        }
        Some(hex) => Seed256::from_hex(hex).map_err(|e| e.to_string()),
    }
}

pub fn parse_source(s: &str) -> Result<SourceKind, String> {
    s.parse::<SourceKind>().map_err(|e| e.to_string())
}

/// Parse a comma-separated lag list such as `"1,2,8,64"`.
pub fn parse_lags(s: &str) -> Result<Vec<usize>, String> {
    let lags = s
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<usize>()
                .map_err(|_| format!("invalid lag '{t}'"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if lags.is_empty() {
        return Err("no lags given".to_string());
    }
    Ok(lags)
}
