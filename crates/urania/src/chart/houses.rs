//! Equal-house cusps.

use crate::zodiac::normalize_degrees;
use serde::Serialize;

/// Twelve cusps 30° apart starting at the ascendant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseCusps {
    cusps: [f64; 12],
}

impl HouseCusps {
    pub fn equal(ascendant: f64) -> Self {
        let asc = normalize_degrees(ascendant);
        let mut cusps = [0.0; 12];
        for (i, cusp) in cusps.iter_mut().enumerate() {
            *cusp = normalize_degrees(asc + i as f64 * 30.0);
        }
        Self { cusps }
    }

    pub fn cusps(&self) -> &[f64; 12] {
        &self.cusps
    }

    /// House 1-12 holding `longitude`: `cusp[i] <= lon < cusp[i + 1]`, where the interval
    /// that crosses 0° wraps around.
    pub fn house_of(&self, longitude: f64) -> u8 {
        let lon = normalize_degrees(longitude);
        for i in 0..12 {
            let start = self.cusps[i];
            let end = self.cusps[(i + 1) % 12];
            let inside = if start <= end {
                start <= lon && lon < end
            } else {
                lon >= start || lon < end
            };
            if inside {
                return (i + 1) as u8;
            }
        }
        // unreachable with twelve distinct cusps
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cusps_from_zero() {
        let houses = HouseCusps::equal(0.0);
        assert_eq!(houses.cusps()[0], 0.0);
        assert_eq!(houses.cusps()[11], 330.0);
    }

    #[test]
    fn test_house_boundaries() {
        let houses = HouseCusps::equal(0.0);
        assert_eq!(houses.house_of(0.0), 1);
        assert_eq!(houses.house_of(29.999), 1);
        assert_eq!(houses.house_of(30.0), 2);
        assert_eq!(houses.house_of(329.999), 11);
        assert_eq!(houses.house_of(330.0), 12);
        assert_eq!(houses.house_of(359.999), 12);
        assert_eq!(houses.house_of(-5.0), 12);
    }

    #[test]
    fn test_every_longitude_lands_in_exactly_one_house() {
        for asc in [0.0, 17.5, 200.0, 345.0] {
            let houses = HouseCusps::equal(asc);
            let mut lon: f64 = 0.0;
            while lon < 360.0 {
                let matching = (0..12)
                    .filter(|&i| {
                        let start = houses.cusps()[i];
                        let end = houses.cusps()[(i + 1) % 12];
                        if start <= end {
                            start <= lon && lon < end
                        } else {
                            lon >= start || lon < end
                        }
                    })
                    .count();
                assert_eq!(matching, 1, "asc {} lon {}", asc, lon);
                lon += 0.5;
            }
        }
    }

    #[test]
    fn test_shifted_ascendant_wraps_twelfth_house() {
        let houses = HouseCusps::equal(345.0);
        assert_eq!(houses.house_of(345.0), 1);
        assert_eq!(houses.house_of(10.0), 1);
        assert_eq!(houses.house_of(15.0), 2);
        assert_eq!(houses.house_of(344.0), 12);
    }
}
