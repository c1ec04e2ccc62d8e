use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{MetadataMap, Series, UNITLESS_CODE};

/// Formatted value split into its number text and unit suffix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormattedValue {
    pub text: String,
    #[serde(default)]
    pub suffix: String,
}

impl FormattedValue {
    #[must_use]
    pub fn new(text: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            suffix: suffix.into(),
        }
    }

    /// Text with the suffix appended as-is.
    #[must_use]
    pub fn joined(&self) -> String {
        format!("{}{}", self.text, self.suffix)
    }
}

const BYTE_UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
const SHORT_UNITS: &[&str] = &["", "K", "Mil", "Bil", "Tri"];

/// Host-provided unit formatter.
pub type ValueFormatterFn = Arc<dyn Fn(f64) -> FormattedValue + Send + Sync + 'static>;

/// Maps metric unit codes onto formatter unit ids.
///
/// `"By"` becomes `"bytes"` and annotation units such as `{cpu}` become
/// `"short"`; everything else passes through.
#[must_use]
pub fn normalize_unit(unit: &str) -> String {
    let lowered = unit.trim().to_ascii_lowercase();
    if lowered == "by" {
        return "bytes".to_owned();
    }
    if lowered.starts_with('{') && lowered.ends_with('}') {
        return "short".to_owned();
    }
    unit.to_owned()
}

/// Unit shared by every plotted series.
///
/// An explicit `config_unit` wins. Otherwise units come from metadata:
/// unitless (`"1"`) and missing codes are ignored. Codes are compared in
/// series order: a code that differs from the running unit clears it, and the
/// next code seen after that becomes the running unit again.
#[must_use]
pub fn resolve_unit(
    config_unit: Option<&str>,
    series: &[Series],
    metadata: &MetadataMap,
) -> Option<String> {
    if let Some(unit) = config_unit {
        return Some(unit.to_owned());
    }

    let mut resolved: Option<&str> = None;
    for serie in series {
        let Some(code) = metadata
            .get(&serie.metric)
            .and_then(|meta| meta.unit.meaningful_code())
        else {
            continue;
        };
        match resolved {
            None => resolved = Some(code),
            Some(current) if current == code => {}
            Some(current) => {
                debug!(previous = current, next = code, "series units disagree");
                resolved = None;
            }
        }
    }
    resolved.map(str::to_owned)
}

/// Formatter used when the host does not inject one.
///
/// Handles `percent`, `percentunit`, `bytes` and `short`; unknown units fall
/// back to plain numbers.
#[must_use]
pub fn default_value_formatter(unit: Option<&str>) -> ValueFormatterFn {
    let unit = unit
        .filter(|unit| *unit != UNITLESS_CODE)
        .map(normalize_unit)
        .unwrap_or_default();

    match unit.as_str() {
        "percent" => Arc::new(|value: f64| FormattedValue::new(format_plain(value), "%")),
        "percentunit" => {
            Arc::new(|value: f64| FormattedValue::new(format_plain(value * 100.0), "%"))
        }
        "bytes" => Arc::new(|value: f64| format_scaled(value, 1_024.0, BYTE_UNITS)),
        "short" => Arc::new(|value: f64| format_scaled(value, 1_000.0, SHORT_UNITS)),
        _ => Arc::new(|value: f64| FormattedValue::new(format_plain(value), "")),
    }
}

fn format_scaled(value: f64, base: f64, units: &[&str]) -> FormattedValue {
    if !value.is_finite() {
        return FormattedValue::new(format_plain(value), "");
    }
    let mut scaled = value;
    let mut index = 0;
    while scaled.abs() >= base && index + 1 < units.len() {
        scaled /= base;
        index += 1;
    }
    let suffix = match units[index] {
        "" => String::new(),
        unit => format!(" {unit}"),
    };
    FormattedValue::new(format_plain(scaled), suffix)
}

fn format_plain(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }

    let decimals = if value == 0.0 || value.abs() >= 100.0 {
        0
    } else if value.abs() >= 1.0 {
        2
    } else {
        let leading_zeros = (-value.abs().log10()).floor() as usize;
        (leading_zeros + 3).min(10)
    };

    let mut text = format!("{value:.decimals$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" { "0".to_owned() } else { text }
}

#[cfg(test)]
mod tests {
    use super::{default_value_formatter, format_plain, normalize_unit, resolve_unit};
    use crate::core::{MetadataMap, MetricMetadata, Series};

    fn units(pairs: &[(&str, &str)]) -> (Vec<Series>, MetadataMap) {
        let mut metadata = MetadataMap::new();
        let series = pairs
            .iter()
            .map(|(metric, unit)| {
                metadata.insert(
                    (*metric).to_owned(),
                    MetricMetadata::new(*metric).with_unit(*unit),
                );
                Series::new(*metric, vec![Some(1.0)])
            })
            .collect();
        (series, metadata)
    }

    #[test]
    fn units_resolve_in_series_order() {
        let (series, metadata) = units(&[("a", "ms"), ("b", "1"), ("c", "ms")]);
        assert_eq!(resolve_unit(None, &series, &metadata).as_deref(), Some("ms"));

        let (series, metadata) = units(&[("a", "ms"), ("b", "By")]);
        assert_eq!(resolve_unit(None, &series, &metadata), None);
        assert_eq!(
            resolve_unit(Some("s"), &series, &metadata).as_deref(),
            Some("s")
        );
    }

    #[test]
    fn a_cleared_unit_is_picked_up_by_the_next_series() {
        let (series, metadata) = units(&[("a", "ms"), ("b", "By"), ("c", "ms")]);
        assert_eq!(resolve_unit(None, &series, &metadata).as_deref(), Some("ms"));

        let (series, metadata) = units(&[("a", "ms"), ("b", "By"), ("c", "By"), ("d", "s")]);
        assert_eq!(resolve_unit(None, &series, &metadata), None);
    }

    #[test]
    fn plain_numbers_trim_trailing_zeros() {
        assert_eq!(format_plain(12.50), "12.5");
        assert_eq!(format_plain(250.0), "250");
        assert_eq!(format_plain(0.0123), "0.0123");
        assert_eq!(format_plain(-0.0), "0");
    }

    #[test]
    fn unit_normalization() {
        assert_eq!(normalize_unit("By"), "bytes");
        assert_eq!(normalize_unit("{cpu}"), "short");
        assert_eq!(normalize_unit("ms"), "ms");
    }

    #[test]
    fn byte_values_scale_by_1024() {
        let format = default_value_formatter(Some("By"));
        let formatted = format(2_048.0);
        assert_eq!(formatted.text, "2");
        assert_eq!(formatted.suffix, " KiB");
    }

    #[test]
    fn percent_units_carry_a_suffix() {
        assert_eq!(default_value_formatter(Some("percent"))(42.0).joined(), "42%");
        assert_eq!(default_value_formatter(Some("percentunit"))(0.5).joined(), "50%");
    }
}
