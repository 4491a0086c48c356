//! Test results and the rendered report.
//!
//! Rendering is a pure function of the [`Report`]: the same report always
//! produces the same text.

use std::fmt;

use serde::Serialize;

use crate::error::BatteryError;

/// Title of the battery report.
pub const REPORT_TITLE: &str = "RDT SUITE RESULTS";

/// Section holding the byte/bit estimators and autocorrelation.
pub const STATISTICAL_SECTION: &str = "Statistical Tests";

/// Section holding the avalanche statistics.
pub const AVALANCHE_SECTION: &str = "Avalanche Tests";

/// What a single estimator produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Measured {
        values: Vec<f64>,
        expected: Option<f64>,
    },
    Failed {
        error: BatteryError,
    },
}

/// One labelled line of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub label: String,
    pub outcome: Outcome,
    /// Only carried in structured output, never rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
}

impl TestResult {
    pub fn measured(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            outcome: Outcome::Measured {
                values: vec![value],
                expected: None,
            },
            p_value: None,
        }
    }

    pub fn failed(label: impl Into<String>, error: BatteryError) -> Self {
        Self {
            label: label.into(),
            outcome: Outcome::Failed { error },
            p_value: None,
        }
    }

    /// Attach an expected value. No effect on a failed result.
    pub fn with_expected(mut self, e: f64) -> Self {
        if let Outcome::Measured { expected, .. } = &mut self.outcome {
            *expected = Some(e);
        }
        self
    }

    pub fn with_p_value(mut self, p: Option<f64>) -> Self {
        self.p_value = p;
        self
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }

    /// First measured value, if any.
    pub fn value(&self) -> Option<f64> {
        match &self.outcome {
            Outcome::Measured { values, .. } => values.first().copied(),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn expected(&self) -> Option<f64> {
        match &self.outcome {
            Outcome::Measured { expected, .. } => *expected,
            Outcome::Failed { .. } => None,
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Measured { values, expected } => {
                write!(f, "{}: ", self.label)?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                if let Some(e) = expected {
                    write!(f, " (expected {e})")?;
                }
                Ok(())
            }
            Outcome::Failed { error } => write!(f, "{}: FAILED ({error})", self.label),
        }
    }
}

/// Named, ordered group of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    pub results: Vec<TestResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Report {
    /// Plain-text rendering, newline terminated.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Every result across all sections, in report order.
    pub fn results(&self) -> impl Iterator<Item = &TestResult> {
        self.sections.iter().flat_map(|s| s.results.iter())
    }

    pub fn find(&self, label: &str) -> Option<&TestResult> {
        self.results().find(|r| r.label == label)
    }

    pub fn failures(&self) -> usize {
        self.results().filter(|r| r.is_failed()).count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "=== {} ===", section.name)?;
            for result in &section.results {
                writeln!(f, "{result}")?;
            }
        }
        Ok(())
    }
}

/// Group `(section, result)` entries by section.
///
/// Sections appear in the order their first entry appears; results keep
/// their entry order within a section.
pub fn aggregate<S, I>(title: &str, entries: I) -> Report
where
    S: Into<String>,
    I: IntoIterator<Item = (S, TestResult)>,
{
    let mut sections: Vec<Section> = Vec::new();
    for (name, result) in entries {
        let name = name.into();
        match sections.iter_mut().find(|s| s.name == name) {
            Some(section) => section.results.push(result),
            None => sections.push(Section {
                name,
                results: vec![result],
            }),
        }
    }
    Report {
        title: title.to_string(),
        sections,
    }
}
