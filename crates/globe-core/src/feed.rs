//! Country records as they arrive from the data feed.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RecordError};
use crate::geo::GeoCoordinate;

/// Population is published either as a JSON number or as a numeral string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Population {
    Number(f64),
    Text(String),
}

/// One raw feed entry: `{ "name", "latlng": [lat, lng], "population" }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    #[serde(default)]
    pub latlng: Option<Vec<f64>>,
    pub population: Population,
}

/// A validated record, ready for the marker factory.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerRecord {
    pub coordinate: GeoCoordinate,
    pub label: String,
    /// Nonnegative and finite.
    pub metric: f64,
}

impl MarkerRecord {
    pub fn new(label: impl Into<String>, coordinate: GeoCoordinate, metric: f64) -> Self {
        Self {
            coordinate,
            label: label.into(),
            metric,
        }
    }
}

pub fn parse_feed(json: &str) -> Result<Vec<CountryRecord>, ConfigError> {
    serde_json::from_str(json).map_err(ConfigError::ParseFeed)
}

impl CountryRecord {
    /// Check coordinate and population; `index` is the record's feed position.
    pub fn validate(&self, index: usize) -> Result<MarkerRecord, RecordError> {
        let name = || self.name.clone();
        let latlng = self
            .latlng
            .as_deref()
            .ok_or_else(|| RecordError::MissingCoordinate {
                index,
                name: name(),
            })?;
        let &[lat, lng] = latlng else {
            return Err(RecordError::CoordinateArity {
                index,
                name: name(),
                len: latlng.len(),
            });
        };
        if !lat.is_finite() || !lng.is_finite() {
            return Err(RecordError::NonFiniteCoordinate {
                index,
                name: name(),
            });
        }
        let metric = match &self.population {
            Population::Number(v) => *v,
            Population::Text(text) => {
                parse_numeral(text).ok_or_else(|| RecordError::UnparseablePopulation {
                    index,
                    name: name(),
                    text: text.clone(),
                })?
            }
        };
        let metric = check_metric(metric, index, &self.name)?;
        Ok(MarkerRecord {
            coordinate: GeoCoordinate::new(lat as f32, lng as f32),
            label: self.name.clone(),
            metric,
        })
    }
}

/// Reject metrics that cannot size a marker.
pub fn check_metric(value: f64, index: usize, name: &str) -> Result<f64, RecordError> {
    if !value.is_finite() {
        return Err(RecordError::NonFinitePopulation {
            index,
            name: name.to_string(),
            value,
        });
    }
    if value < 0.0 {
        return Err(RecordError::NegativePopulation {
            index,
            name: name.to_string(),
            value,
        });
    }
    Ok(value)
}

/// Parse a numeral-like string: digits with optional `,`/`_` thousands
/// grouping, an optional fraction and a leading sign, surrounded by optional
/// whitespace.
///
/// The sign is accepted here so that "-5" reports as negative rather than
/// unparseable.
pub fn parse_numeral(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let (sign, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };
    if !is_grouped_integer(int_part) {
        return None;
    }
    let mut digits: String = int_part.chars().filter(char::is_ascii_digit).collect();
    if let Some(frac) = frac_part {
        if frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.push('.');
        digits.push_str(frac);
    }
    digits.parse::<f64>().ok().map(|v| sign * v)
}

/// Digits, optionally split by `,` or `_` into thousands groups: a leading
/// group of one to three digits, then groups of exactly three.
fn is_grouped_integer(text: &str) -> bool {
    let mut groups = text.split([',', '_']);
    let Some(first) = groups.next() else {
        return false;
    };
    let all_digits = |g: &str| !g.is_empty() && g.chars().all(|c| c.is_ascii_digit());
    if !all_digits(first) {
        return false;
    }
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 || !all_digits(group) {
            return false;
        }
        grouped = true;
    }
    !grouped || first.len() <= 3
}

/// Render a metric for display with thousands grouping, e.g. `1,234,567`.
///
/// Fractions are rounded to the nearest whole number.
pub fn format_population(metric: f64) -> String {
    if !metric.is_finite() {
        return String::from("-");
    }
    let whole = metric.abs().round() as u64;
    let raw = whole.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3 + 1);
    if metric < 0.0 && whole > 0 {
        out.push('-');
    }
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
