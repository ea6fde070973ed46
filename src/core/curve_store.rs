use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::primitives::parse_invariant_decimal;
use crate::core::types::CurveSample;
use crate::error::{RigError, RigResult};

const FIELD_SEPARATOR: char = '|';

/// Where a material's raw curve comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveSource {
    Text(String),
    Path(std::path::PathBuf),
}

impl CurveSource {
    pub fn load(&self) -> RigResult<Curve> {
        match self {
            Self::Text(text) => Curve::parse(text),
            Self::Path(path) => Curve::from_path(path),
        }
    }
}

/// Raw stress-strain curve in file order.
///
/// Samples are not guaranteed to be monotonic in strain. A constructed curve
/// always holds at least two samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    samples: Vec<CurveSample>,
    raw_max_strain: f64,
    raw_max_stress: f64,
}

impl Curve {
    /// Parses `stress|strain` lines. Blank lines are skipped; any malformed
    /// line aborts the whole load.
    pub fn parse(text: &str) -> RigResult<Self> {
        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        if lines.len() < 2 {
            return Err(RigError::Parse {
                line: 0,
                reason: format!("expected at least 2 non-empty lines, found {}", lines.len()),
            });
        }

        let mut samples = Vec::with_capacity(lines.len());
        for (line_number, line) in lines {
            samples.push(parse_line(line_number, line)?);
        }

        Self::from_samples(samples)
    }

    pub fn from_path(path: impl AsRef<Path>) -> RigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RigError::Parse {
            line: 0,
            reason: format!("failed to read curve file `{}`: {e}", path.display()),
        })?;
        debug!(path = %path.display(), bytes = text.len(), "read curve file");
        Self::parse(&text)
    }

    pub fn from_samples(samples: Vec<CurveSample>) -> RigResult<Self> {
        if samples.len() < 2 {
            return Err(RigError::DegenerateCurve {
                samples: samples.len(),
            });
        }

        let mut raw_max_strain = f64::NEG_INFINITY;
        let mut raw_max_stress = f64::NEG_INFINITY;
        for sample in &samples {
            raw_max_strain = raw_max_strain.max(sample.strain_percent);
            raw_max_stress = raw_max_stress.max(sample.stress_mpa);
        }

        debug!(
            samples = samples.len(),
            raw_max_strain, raw_max_stress, "curve loaded"
        );
        Ok(Self {
            samples,
            raw_max_strain,
            raw_max_stress,
        })
    }

    #[must_use]
    pub fn samples(&self) -> &[CurveSample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn raw_max_strain(&self) -> f64 {
        self.raw_max_strain
    }

    #[must_use]
    pub fn raw_max_stress(&self) -> f64 {
        self.raw_max_stress
    }
}

fn parse_line(line_number: usize, line: &str) -> RigResult<CurveSample> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != 2 {
        return Err(RigError::Parse {
            line: line_number,
            reason: format!("expected `stress|strain`, found {} field(s)", fields.len()),
        });
    }

    let stress_mpa = parse_invariant_decimal(fields[0], "stress")
        .map_err(|reason| RigError::Parse {
            line: line_number,
            reason,
        })?;
    let strain_percent = parse_invariant_decimal(fields[1], "strain")
        .map_err(|reason| RigError::Parse {
            line: line_number,
            reason,
        })?;
    if strain_percent < 0.0 {
        return Err(RigError::Parse {
            line: line_number,
            reason: format!("strain must be >= 0, found {strain_percent}"),
        });
    }

    Ok(CurveSample::new(strain_percent, stress_mpa))
}
