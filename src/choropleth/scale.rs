//! Continuous color scale for the choropleth fill.

use std::fmt;

use serde::Serialize;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    const fn hex(code: u32) -> Self {
        Self { r: (code >> 16) as u8, g: (code >> 8) as u8, b: code as u8 }
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Viridis, as ten evenly spaced stops.
const VIRIDIS: [Rgb; 10] = [
    Rgb::hex(0x440154), Rgb::hex(0x482878), Rgb::hex(0x3e4989), Rgb::hex(0x31688e), Rgb::hex(0x26828e),
    Rgb::hex(0x1f9e89), Rgb::hex(0x35b779), Rgb::hex(0x6ece58), Rgb::hex(0xb5de2b), Rgb::hex(0xfde725),
];

/// Linear map from a value domain onto the Viridis ramp.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    /// Domain spanning every finite value, `None` if there are none.
    pub fn from_values(values: &[Option<f64>]) -> Option<Self> {
        values.iter().flatten().copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })
            .map(|(min, max)| Self { min, max })
    }

    /// Position of `value` on the ramp in [0, 1]. A flat domain maps to 0.5.
    /// Strictly increasing in `value` over the domain; this, not the rounded
    /// fill, is what orders regions.
    pub fn position(&self, value: f64) -> Option<f64> {
        if !value.is_finite() { return None }
        if self.max <= self.min { return Some(0.5) }
        Some(((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0))
    }

    /// Fill color for `value`, `None` for non-finite input.
    /// Channels are rounded to 8 bits, so close values can share a color.
    #[inline]
    pub fn color(&self, value: f64) -> Option<Rgb> {
        self.position(value).map(Self::color_at)
    }

    /// Interpolate the ramp at `t` in [0, 1].
    pub fn color_at(t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * (VIRIDIS.len() - 1) as f64;
        let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
        let frac = scaled - i as f64;

        let lerp = |a: u8, b: u8| -> u8 {
            (a as f64 + (b as f64 - a as f64) * frac)
                .round()
                .clamp(0.0, 255.0) as u8
        };

        let (lo, hi) = (VIRIDIS[i], VIRIDIS[i + 1]);
        Rgb { r: lerp(lo.r, hi.r), g: lerp(lo.g, hi.g), b: lerp(lo.b, hi.b) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hit_first_and_last_stop() {
        assert_eq!(ColorScale::color_at(0.0), VIRIDIS[0]);
        assert_eq!(ColorScale::color_at(1.0), VIRIDIS[9]);
        assert_eq!(ColorScale::color_at(1.0).to_string(), "#fde725");
    }

    #[test]
    fn ramp_is_monotonic_in_green() {
        let greens = (0..=100).map(|i| ColorScale::color_at(i as f64 / 100.0).g).collect::<Vec<_>>();
        for pair in greens.windows(2) { assert!(pair[0] <= pair[1]) }
        assert!(greens[0] < greens[50] && greens[50] < greens[100]);
    }

    #[test]
    fn domain_spans_finite_values() {
        let scale = ColorScale::from_values(&[Some(3.0), None, Some(-1.0), Some(f64::NAN)]).unwrap();
        assert_eq!((scale.min, scale.max), (-1.0, 3.0));
        assert_eq!(scale.position(1.0), Some(0.5));
        assert_eq!(scale.position(f64::NAN), None);
        assert!(ColorScale::from_values(&[None]).is_none());
    }

    #[test]
    fn position_separates_values_that_share_a_fill() {
        let scale = ColorScale { min: 0.0, max: 1e6 };
        let (a, b) = (scale.position(0.0).unwrap(), scale.position(1.0).unwrap());
        assert!(a < b);
        assert_eq!(scale.color(0.0), scale.color(1.0));
    }

    #[test]
    fn flat_domain_maps_to_middle() {
        let scale = ColorScale { min: 4.0, max: 4.0 };
        assert_eq!(scale.position(4.0), Some(0.5));
    }
}
