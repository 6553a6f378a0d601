use crate::noise::GradientNoise;

use super::{MAP_H, MAP_W};

const LATITUDE_COOLING: f64 = 1.3;
const ALTITUDE_COOLING: f64 = 0.45;
const OCEAN_WARMING: f64 = 0.12;
const TEMPERATURE_JITTER: f64 = 0.08;

const COASTAL_LIFT: f64 = 0.25;
const RAIN_SHADOW_ELEVATION: f32 = 0.5;
const OCEAN_PRECIPITATION: f32 = 0.6;

/// Phase 4: latitude gradient, altitude cooling on land, maritime warming
/// over ocean, plus low-amplitude noise jitter. Clamped to `[-1, 1]`.
pub(super) fn temperature_field(noise: &GradientNoise, elevation: &[f32]) -> Vec<f32> {
    let mut temperature = Vec::with_capacity(MAP_W * MAP_H);
    for y in 0..MAP_H {
        let lat = y as f64 / (MAP_H - 1) as f64 * 2.0 - 1.0;
        let sy = y as f64 / MAP_H as f64;
        for x in 0..MAP_W {
            let sx = x as f64 / MAP_W as f64;
            let e = elevation[y * MAP_W + x] as f64;
            let mut t = 1.0 - LATITUDE_COOLING * lat.abs();
            if e > 0.0 {
                t -= ALTITUDE_COOLING * e;
            } else {
                t += OCEAN_WARMING;
            }
            t += TEMPERATURE_JITTER * noise.noise2d(sx * 8.0, sy * 8.0);
            temperature.push(t.clamp(-1.0, 1.0) as f32);
        }
    }
    temperature
}

/// Phase 5: fBm precipitation shaped by latitude, lifted on coastal
/// lowland, halved in high-altitude rain shadow, fixed over open ocean.
/// Clamped to `[0, 1.2]`.
pub(super) fn moisture_field(noise: &GradientNoise, elevation: &[f32]) -> Vec<f32> {
    let mut moisture = Vec::with_capacity(MAP_W * MAP_H);
    for y in 0..MAP_H {
        let lat = y as f64 / (MAP_H - 1) as f64 * 2.0 - 1.0;
        let sy = y as f64 / MAP_H as f64;
        for x in 0..MAP_W {
            let e = elevation[y * MAP_W + x];
            if e <= 0.0 {
                moisture.push(OCEAN_PRECIPITATION);
                continue;
            }
            let sx = x as f64 / MAP_W as f64;
            let base = (noise.fbm(sx * 5.0, sy * 5.0, 4, 0.5, 2.0, 0.0) + 1.0) / 2.0;
            let mut precip = base * (1.2 - 0.6 * lat.abs());
            if e < 0.15 {
                precip += COASTAL_LIFT;
            }
            if e > RAIN_SHADOW_ELEVATION {
                precip *= 0.5;
            }
            moisture.push(precip.clamp(0.0, 1.2) as f32);
        }
    }
    moisture
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimRng;

    fn flat_world(elevation_value: f32) -> Vec<f32> {
        vec![elevation_value; MAP_W * MAP_H]
    }

    #[test]
    fn temperature_in_range_and_colder_at_poles() {
        let mut rng = SimRng::new(5);
        let noise = GradientNoise::new(&mut rng);
        let temperature = temperature_field(&noise, &flat_world(0.1));
        assert!(temperature.iter().all(|t| (-1.0..=1.0).contains(t)));

        let equator: f32 = (0..MAP_W)
            .map(|x| temperature[(MAP_H / 2) * MAP_W + x])
            .sum::<f32>()
            / MAP_W as f32;
        let pole: f32 =
            (0..MAP_W).map(|x| temperature[x]).sum::<f32>() / MAP_W as f32;
        assert!(equator > pole, "equator {equator} should be warmer than pole {pole}");
    }

    #[test]
    fn ocean_moisture_is_fixed() {
        let mut rng = SimRng::new(6);
        let noise = GradientNoise::new(&mut rng);
        let moisture = moisture_field(&noise, &flat_world(-0.5));
        assert!(moisture.iter().all(|&m| m == OCEAN_PRECIPITATION));
    }

    #[test]
    fn land_moisture_in_range() {
        let mut rng = SimRng::new(7);
        let noise = GradientNoise::new(&mut rng);
        let moisture = moisture_field(&noise, &flat_world(0.3));
        assert!(moisture.iter().all(|m| (0.0..=1.2).contains(m)));
    }

    #[test]
    fn rain_shadow_halves_highland_precipitation() {
        let mut rng = SimRng::new(8);
        let noise = GradientNoise::new(&mut rng);
        let lowland = moisture_field(&noise, &flat_world(0.3));
        let highland = moisture_field(&noise, &flat_world(0.8));
        let lowland_mean: f64 = lowland.iter().map(|&m| m as f64).sum::<f64>() / lowland.len() as f64;
        let highland_mean: f64 =
            highland.iter().map(|&m| m as f64).sum::<f64>() / highland.len() as f64;
        assert!(highland_mean < lowland_mean);
    }
}
