//! Linear mapping between slider domain values and track pixels.
//!
//! # Design
//! - Mapping is continuous and extrapolates; callers clamp pixels before inverting.
//! - Degenerate (zero-span) scales collapse onto their start so a zero-width track stays valid.
//! - Tick generation picks 1/2/5 × 10^k steps so axis labels stay round.

/// Continuous linear scale from a numeric domain onto a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Build a scale from `domain` onto `range`.
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain bounds as supplied.
    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Range bounds as supplied.
    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value onto the pixel range.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        interpolate(self.domain, self.range, value)
    }

    /// Map a pixel offset back onto the domain.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        interpolate(self.range, self.domain, pixel)
    }

    /// Clamp a pixel offset into the range bounds. `NaN` lands on the lower bound.
    #[must_use]
    pub fn clamp_pixel(&self, pixel: f64) -> f64 {
        let (low, high) = ordered(self.range);
        if pixel.is_nan() || pixel < low {
            low
        } else if pixel > high {
            high
        } else {
            pixel
        }
    }

    /// Clamp, invert and round a pixel offset to the nearest whole domain value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn value_at(&self, pixel: f64) -> u32 {
        let value = self.invert(self.clamp_pixel(pixel)).round();
        if value <= 0.0 {
            0
        } else {
            value as u32
        }
    }

    /// Roughly `count` evenly spaced, human friendly values covering the domain.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = ordered(self.domain);
        let Some(step) = tick_step(start, stop, count) else {
            return if start == stop { vec![start] } else { Vec::new() };
        };
        let first = (start / step).ceil() as i64;
        let last = (stop / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Step between ticks for `count` intervals over `[start, stop]`.
///
/// Returns `None` when the interval is empty or `count` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn tick_step(start: f64, stop: f64, count: usize) -> Option<f64> {
    const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
    const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
    const E2: f64 = std::f64::consts::SQRT_2;

    if count == 0 || !(stop > start) {
        return None;
    }
    let raw = (stop - start) / count as f64;
    let power = raw.log10().floor();
    let error = raw / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    Some(factor * 10f64.powf(power))
}

/// Format a tick value with just enough decimals for `step`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn tick_format(value: f64, step: f64) -> String {
    if step >= 1.0 || step <= 0.0 {
        return format!("{}", value.round());
    }
    let decimals = (-step.log10().floor()).max(0.0) as usize;
    format!("{value:.decimals$}")
}

fn interpolate(from: (f64, f64), to: (f64, f64), value: f64) -> f64 {
    let span = from.1 - from.0;
    if span == 0.0 {
        return to.0;
    }
    to.0 + (value - from.0) / span * (to.1 - to.0)
}

fn ordered(bounds: (f64, f64)) -> (f64, f64) {
    if bounds.0 <= bounds.1 {
        bounds
    } else {
        (bounds.1, bounds.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> LinearScale {
        LinearScale::new((0.0, 400.0), (0.0, 924.0))
    }

    #[test]
    fn every_domain_value_survives_a_pixel_round_trip() {
        let scale = track();
        for value in 0..=400u32 {
            assert_eq!(scale.value_at(scale.map(f64::from(value))), value);
        }
    }

    #[test]
    fn clamp_pins_out_of_range_pixels_to_track_edges() {
        let scale = track();
        assert_eq!(scale.clamp_pixel(-15.0), 0.0);
        assert_eq!(scale.clamp_pixel(-0.001), 0.0);
        assert_eq!(scale.clamp_pixel(925.0), 924.0);
        assert_eq!(scale.clamp_pixel(f64::INFINITY), 924.0);
        assert_eq!(scale.clamp_pixel(f64::NAN), 0.0);
        assert_eq!(scale.value_at(-300.0), 0);
        assert_eq!(scale.value_at(5_000.0), 400);
    }

    #[test]
    fn map_is_linear_and_extrapolates() {
        let scale = track();
        assert_eq!(scale.map(0.0), 0.0);
        assert_eq!(scale.map(200.0), 462.0);
        assert_eq!(scale.map(400.0), 924.0);
        assert_eq!(scale.map(800.0), 1848.0);
    }

    #[test]
    fn zero_width_track_collapses_to_origin() {
        let scale = LinearScale::new((0.0, 400.0), (0.0, 0.0));
        assert_eq!(scale.map(250.0), 0.0);
        assert_eq!(scale.value_at(12.0), 0);
    }

    #[test]
    fn ticks_use_round_steps() {
        let ticks = track().ticks(10);
        assert_eq!(ticks.len(), 9);
        assert_eq!(ticks.first().copied(), Some(0.0));
        assert_eq!(ticks.last().copied(), Some(400.0));
        assert_eq!(tick_step(0.0, 400.0, 10), Some(50.0));
        assert_eq!(tick_step(5.0, 5.0, 10), None);
    }

    #[test]
    fn tick_labels_drop_needless_decimals() {
        assert_eq!(tick_format(150.0, 50.0), "150");
        assert_eq!(tick_format(1.5, 0.5), "1.5");
        assert_eq!(tick_format(0.25, 0.05), "0.25");
    }
}
