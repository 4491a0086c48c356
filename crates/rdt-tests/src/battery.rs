//! Battery orchestration.
//!
//! The stream is decomposed once; every estimator then runs on its own scoped
//! thread over the shared read-only views. Avalanche draws stay sequential on
//! a single thread because stream sources are stateful.

use std::thread::{Scope, ScopedJoinHandle};
use std::time::Instant;

use rdt_core::{SampleStream, Seed256, SourceKind, StreamError, StreamSource, generate};

use crate::avalanche::avalanche;
use crate::config::BatteryConfig;
use crate::error::BatteryError;
use crate::report::{
    AVALANCHE_SECTION, REPORT_TITLE, Report, STATISTICAL_SECTION, TestResult, aggregate,
};
use crate::{
    autocorrelation, chi_square, decompose, monobit_frequency, runs_test, serial_chi_square,
    shannon_entropy,
};

/// A spawned estimator and the labels it reports under.
struct Job<'scope> {
    section: &'static str,
    labels: Vec<String>,
    handle: ScopedJoinHandle<'scope, Vec<TestResult>>,
}

fn spawn<'scope, 'env, F>(
    s: &'scope Scope<'scope, 'env>,
    section: &'static str,
    labels: Vec<String>,
    f: F,
) -> Job<'scope>
where
    F: FnOnce() -> Vec<TestResult> + Send + 'scope,
{
    let name = labels.join(", ");
    let handle = s.spawn(move || {
        let started = Instant::now();
        let results = f();
        log::debug!("{name} finished in {:?}", started.elapsed());
        results
    });
    Job {
        section,
        labels,
        handle,
    }
}

/// Run every estimator over `stream` and the avalanche prober over
/// `avalanche_source`.
///
/// Never fails as a whole: an estimator that errors or panics becomes a
/// failed entry for its own label(s) only. The stream's own width is used
/// throughout; `config.count` and `config.width` only matter to whoever
/// generated the stream.
pub fn run_battery(
    stream: &SampleStream,
    avalanche_source: &mut dyn StreamSource,
    config: &BatteryConfig,
) -> Report {
    let width = stream.width();
    log::info!(
        "running battery on {} x {width}-bit values ({} lags, {} avalanche trials)",
        stream.len(),
        config.lags.len(),
        config.avalanche_trials
    );
    let started = Instant::now();

    let views = decompose(stream.values(), width);
    let bytes: Result<&[u8], BatteryError> = views
        .as_ref()
        .map(|(b, _)| b.as_slice())
        .map_err(Clone::clone);
    let bits: Result<&[u8], BatteryError> = views
        .as_ref()
        .map(|(_, b)| b.as_slice())
        .map_err(Clone::clone);
    let values = stream.values();

    let entries: Vec<(&'static str, TestResult)> = std::thread::scope(|s| {
        let mut jobs = Vec::new();

        let label = "Entropy (bytes)";
        let input = bytes.clone();
        jobs.push(spawn(s, STATISTICAL_SECTION, vec![label.into()], move || {
            vec![match input.and_then(shannon_entropy) {
                Ok(h) => TestResult::measured(label, h),
                Err(e) => TestResult::failed(label, e),
            }]
        }));

        let label = "Monobit frequency";
        let input = bits.clone();
        jobs.push(spawn(s, STATISTICAL_SECTION, vec![label.into()], move || {
            vec![match input.and_then(monobit_frequency) {
                Ok(m) => TestResult::measured(label, m.proportion).with_p_value(Some(m.p_value)),
                Err(e) => TestResult::failed(label, e),
            }]
        }));

        let label = "Runs test";
        let input = bits.clone();
        jobs.push(spawn(s, STATISTICAL_SECTION, vec![label.into()], move || {
            vec![match input.and_then(runs_test) {
                Ok(r) => TestResult::measured(label, r.observed as f64).with_expected(r.expected),
                Err(e) => TestResult::failed(label, e),
            }]
        }));

        let label = "Chi-square";
        let input = bytes.clone();
        jobs.push(spawn(s, STATISTICAL_SECTION, vec![label.into()], move || {
            vec![match input.and_then(chi_square) {
                Ok(c) => TestResult::measured(label, c.statistic).with_p_value(c.p_value),
                Err(e) => TestResult::failed(label, e),
            }]
        }));

        let label = "Serial chi-square";
        let input = bytes.clone();
        jobs.push(spawn(s, STATISTICAL_SECTION, vec![label.into()], move || {
            vec![match input.and_then(serial_chi_square) {
                Ok(c) => TestResult::measured(label, c.statistic).with_p_value(c.p_value),
                Err(e) => TestResult::failed(label, e),
            }]
        }));

        for &lag in &config.lags {
            let label = format!("Autocorrelation lag {lag}");
            jobs.push(spawn(s, STATISTICAL_SECTION, vec![label.clone()], move || {
                vec![match autocorrelation(values, lag) {
                    Ok(r) => TestResult::measured(label, r),
                    Err(e) => TestResult::failed(label, e),
                }]
            }));
        }

        let labels = ["Avalanche mean", "Avalanche min", "Avalanche max"];
        let trials = config.avalanche_trials;
        jobs.push(spawn(
            s,
            AVALANCHE_SECTION,
            labels.iter().map(|l| l.to_string()).collect(),
            move || match avalanche(avalanche_source, trials, width) {
                Ok(a) => vec![
                    TestResult::measured(labels[0], a.mean).with_expected(width as f64 / 2.0),
                    TestResult::measured(labels[1], a.min as f64),
                    TestResult::measured(labels[2], a.max as f64),
                ],
                Err(e) => labels
                    .iter()
                    .map(|l| TestResult::failed(*l, e.clone()))
                    .collect(),
            },
        ));

        let mut entries = Vec::new();
        for job in jobs {
            let results = match job.handle.join() {
                Ok(results) => results,
                Err(_) => job
                    .labels
                    .iter()
                    .map(|l| {
                        TestResult::failed(l.clone(), BatteryError::Panicked { test: l.clone() })
                    })
                    .collect(),
            };
            entries.extend(results.into_iter().map(|r| (job.section, r)));
        }
        entries
    });

    for (_, result) in entries.iter().filter(|(_, r)| r.is_failed()) {
        log::warn!("{result}");
    }

    let report = aggregate(REPORT_TITLE, entries);
    log::info!(
        "battery finished in {:?} ({} failed)",
        started.elapsed(),
        report.failures()
    );
    report
}

/// Generate a stream from `kind` seeded with `seed` and run the battery on
/// it, probing avalanche with a second source seeded with `avalanche_seed`.
pub fn run_seeded(
    kind: SourceKind,
    seed: &Seed256,
    avalanche_seed: &Seed256,
    config: &BatteryConfig,
) -> Result<Report, StreamError> {
    let mut source = kind.build(seed);
    let stream = generate(source.as_mut(), config.count, config.width)?;
    let mut avalanche_source = kind.build(avalanche_seed);
    Ok(run_battery(&stream, avalanche_source.as_mut(), config))
}
