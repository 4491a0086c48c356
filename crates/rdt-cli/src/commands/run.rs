use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use rdt_core::{Seed256, generate};
use rdt_tests::{BatteryConfig, run_battery};

use super::{fail, parse_lags, parse_seed, parse_source};

pub struct RunCommandConfig<'a> {
    pub seed: Option<&'a str>,
    pub avalanche_seed: Option<&'a str>,
    pub source: &'a str,
    pub config_path: Option<&'a Path>,
    pub count: Option<usize>,
    pub width: Option<u32>,
    pub lags: Option<&'a str>,
    pub trials: Option<usize>,
    pub output_path: &'a Path,
    pub json_path: Option<&'a Path>,
}

/// Merge the config file (if any) with flag overrides.
fn battery_config(cfg: &RunCommandConfig<'_>) -> Result<BatteryConfig, String> {
    let mut config = match cfg.config_path {
        Some(path) => BatteryConfig::from_json_path(path).map_err(|e| e.to_string())?,
        None => BatteryConfig::default(),
    };
    if let Some(count) = cfg.count {
        config.count = count;
    }
    if let Some(width) = cfg.width {
        config.width = width;
    }
    if let Some(lags) = cfg.lags {
        config.lags = parse_lags(lags)?;
    }
    if let Some(trials) = cfg.trials {
        config.avalanche_trials = trials;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Write the rendered report as-is; it already ends in a newline.
fn emit_report(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

pub fn run(cfg: RunCommandConfig<'_>) {
    let config = battery_config(&cfg).unwrap_or_else(|e| fail(e));
    let kind = parse_source(cfg.source).unwrap_or_else(|e| fail(e));
    let seed = parse_seed(cfg.seed, Seed256::DEFAULT).unwrap_or_else(|e| fail(e));
    let avalanche_seed =
        parse_seed(cfg.avalanche_seed, Seed256::DEFAULT_AVALANCHE).unwrap_or_else(|e| fail(e));

    eprintln!(
        "Generating {} x {}-bit values from {kind}...",
        config.count, config.width
    );
    let t0 = Instant::now();
    let mut source = kind.build(&seed);
    let stream =
        generate(source.as_mut(), config.count, config.width).unwrap_or_else(|e| fail(e));
    let mut avalanche_source = kind.build(&avalanche_seed);

    let report = run_battery(&stream, avalanche_source.as_mut(), &config);
    eprintln!("Battery finished in {:.1}s", t0.elapsed().as_secs_f64());

    let text = report.render();
    if let Err(e) = emit_report(&mut io::stdout().lock(), &text) {
        fail(format!("failed to write report to stdout: {e}"));
    }

    if let Err(e) = std::fs::write(cfg.output_path, &text) {
        fail(format!(
            "failed to write report to {}: {e}",
            cfg.output_path.display()
        ));
    }
    eprintln!("Results saved to {}", cfg.output_path.display());

    if let Some(path) = cfg.json_path {
        let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| fail(e));
        if let Err(e) = std::fs::write(path, json) {
            fail(format!("failed to write JSON report to {}: {e}", path.display()));
        }
        eprintln!("JSON report saved to {}", path.display());
    }
}
