use crate::error::{ChartError, ChartResult};

/// Linear mapping between a data domain and a pixel extent starting at 0.
///
/// The time axis uses this to turn cursor pixels into data-space seconds and
/// snapped samples back into pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    /// Builds a scale over `[first, last]` of an ascending sample sequence.
    ///
    /// A single sample gets a one-second domain centred on it so pixel
    /// mapping stays defined.
    pub fn from_samples(times: &[f64]) -> ChartResult<Self> {
        let (Some(first), Some(last)) = (times.first(), times.last()) else {
            return Err(ChartError::InvalidData(
                "cannot fit a scale to an empty time axis".to_owned(),
            ));
        };
        if first == last {
            return Self::new(first - 0.5, last + 0.5);
        }
        Self::new(*first, *last)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.domain_end - self.domain_start
    }

    pub fn value_to_pixel(self, value: f64, extent_px: f64) -> ChartResult<f64> {
        validate_extent(extent_px)?;
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.span();
        if span == 0.0 {
            return Ok(0.0);
        }
        Ok((value - self.domain_start) / span * extent_px)
    }

    pub fn pixel_to_value(self, pixel: f64, extent_px: f64) -> ChartResult<f64> {
        validate_extent(extent_px)?;
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        Ok(self.domain_start + pixel / extent_px * self.span())
    }
}

fn validate_extent(extent_px: f64) -> ChartResult<()> {
    if !extent_px.is_finite() || extent_px <= 0.0 {
        return Err(ChartError::InvalidData(
            "pixel extent must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}
