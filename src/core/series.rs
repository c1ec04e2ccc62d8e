use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Unit code meaning "dimensionless".
pub const UNITLESS_CODE: &str = "1";

/// Metric instrument kind as reported by the metrics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    #[default]
    Gauge,
    Sum,
    Histogram,
    Summary,
    #[serde(rename = "exphistogram")]
    ExponentialHistogram,
}

/// UCUM-style unit descriptor; `code` may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitDescriptor {
    #[serde(default)]
    pub code: Option<String>,
}

impl UnitDescriptor {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
        }
    }

    /// Unit code unless it is missing, empty or the unitless `"1"`.
    #[must_use]
    pub fn meaningful_code(&self) -> Option<&str> {
        self.code
            .as_deref()
            .filter(|code| !code.is_empty() && *code != UNITLESS_CODE)
    }
}

/// Metric metadata, optionally carrying a host-provided display label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub suggested_label: Option<String>,
    #[serde(default)]
    pub unit: UnitDescriptor,
    #[serde(default, rename = "type")]
    pub kind: MetricKind,
    #[serde(default)]
    pub label: Option<String>,
}

impl MetricMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_unit(mut self, code: impl Into<String>) -> Self {
        self.unit = UnitDescriptor::new(code);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_suggested_label(mut self, label: impl Into<String>) -> Self {
        self.suggested_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: MetricKind) -> Self {
        self.kind = kind;
        self
    }

    /// Label shown to users: explicit label, then suggested label, then name.
    #[must_use]
    pub fn display_name(&self, disable_suggested_label: bool) -> &str {
        let suggested = if disable_suggested_label {
            None
        } else {
            self.suggested_label.as_deref()
        };
        self.label
            .as_deref()
            .filter(|label| !label.is_empty())
            .or(suggested.filter(|label| !label.is_empty()))
            .unwrap_or(self.name.as_str())
    }
}

/// Metadata lookup keyed by metric name.
pub type MetadataMap = IndexMap<String, MetricMetadata>;

/// One plotted series: a metric plus the attribute tags that identify it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub metric: String,
    #[serde(default)]
    pub attributes: Option<IndexMap<String, String>>,
    pub values: Vec<Option<f64>>,
    #[serde(default)]
    pub query_index: usize,
    #[serde(default)]
    pub is_empty: bool,
}

impl Series {
    #[must_use]
    pub fn new(metric: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            metric: metric.into(),
            values,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_query_index(mut self, query_index: usize) -> Self {
        self.query_index = query_index;
        self
    }

    #[must_use]
    pub fn has_attributes(&self) -> bool {
        self.attributes.as_ref().is_some_and(|attrs| !attrs.is_empty())
    }
}

/// Column-major chart data: a shared time axis plus value columns aligned to it.
///
/// Value column `k` holds series `k` of the chart input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignedData {
    pub times: Vec<f64>,
    pub columns: Vec<Vec<Option<f64>>>,
}

impl AlignedData {
    /// Aligns series values to `times`.
    ///
    /// Series flagged `is_empty` may carry no values; they are padded with
    /// absent samples. Any other length mismatch is an error.
    pub fn from_series(times: Vec<f64>, series: &[Series]) -> ChartResult<Self> {
        let expected = times.len();
        let mut columns = Vec::with_capacity(series.len());
        for (series_index, item) in series.iter().enumerate() {
            if item.values.len() == expected {
                columns.push(item.values.clone());
            } else if item.is_empty && item.values.is_empty() {
                columns.push(vec![None; expected]);
            } else {
                return Err(ChartError::MisalignedSeries {
                    series_index,
                    expected,
                    actual: item.values.len(),
                });
            }
        }
        Ok(Self { times, columns })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Value of value column `column` at sample `index`; out-of-range reads are absent.
    #[must_use]
    pub fn value(&self, column: usize, index: usize) -> Option<f64> {
        self.columns.get(column)?.get(index).copied().flatten()
    }

    /// Minimum and maximum over the given value columns, ignoring absent samples.
    #[must_use]
    pub fn value_extent(&self, columns: std::ops::Range<usize>) -> Option<(f64, f64)> {
        self.columns
            .get(columns)?
            .iter()
            .flatten()
            .flatten()
            .copied()
            .filter(|value| value.is_finite())
            .fold(None, |acc, value| match acc {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            })
    }
}
