use crate::noise::GradientNoise;

use super::{MAP_H, MAP_W};

// Base elevation blend
const CONTINENTAL_WEIGHT: f64 = 0.60;
const TERRAIN_WEIGHT: f64 = 0.28;
const DETAIL_WEIGHT: f64 = 0.12;

// Fraction of the map that ends up underwater.
const SEA_LEVEL_PERCENTILE: f64 = 0.60;
const POST_NORMALIZE_GAIN: f32 = 2.8;

// Ridged mountain pass
const MOUNTAIN_MIN_ELEVATION: f32 = 0.08;
const MOUNTAIN_THRESHOLD: f64 = 0.35;
const MOUNTAIN_AMPLITUDE: f64 = 0.18;
const MOUNTAIN_SHARPNESS: f64 = 1.6;

/// Phase 1: continental + terrain + detail fBm layers, latitude-weighted
/// so land thins toward the poles and lifts slightly at the equator.
pub(super) fn base_elevation(noise: &GradientNoise) -> Vec<f32> {
    let mut elevation = Vec::with_capacity(MAP_W * MAP_H);
    for y in 0..MAP_H {
        let lat = y as f64 / (MAP_H - 1) as f64 * 2.0 - 1.0;
        let lat_weight = 1.0 - lat.abs().powf(1.5) * 0.3;
        let equator_lift = if lat.abs() < 0.35 {
            0.08 * (1.0 - lat.abs() / 0.35)
        } else {
            0.0
        };
        let sy = y as f64 / MAP_H as f64;
        for x in 0..MAP_W {
            let sx = x as f64 / MAP_W as f64;
            let continental = noise.fbm(sx * 2.2, sy * 2.2, 5, 0.55, 2.1, 0.5);
            let terrain = noise.fbm(sx * 7.0, sy * 7.0, 5, 0.6, 2.0, 0.0);
            let detail = noise.fbm(sx * 20.0, sy * 20.0, 4, 0.5, 2.0, 0.0);

            let combined = CONTINENTAL_WEIGHT * continental
                + TERRAIN_WEIGHT * terrain
                + DETAIL_WEIGHT * detail;
            elevation.push((combined * lat_weight + equator_lift) as f32);
        }
    }
    elevation
}

/// Phase 2: shift so the 60th percentile sits at zero, then stretch.
/// After this the sign of a pixel is its land/ocean classification.
pub(super) fn normalize_sea_level(elevation: &mut [f32]) {
    let mut sorted = elevation.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let sea_level = sorted[(sorted.len() as f64 * SEA_LEVEL_PERCENTILE) as usize];
    for e in elevation.iter_mut() {
        *e = (*e - sea_level) * POST_NORMALIZE_GAIN;
    }
}

/// Phase 3: add ridged-noise mountain ranges to already-elevated land,
/// masked by a very low frequency field so ranges cluster continent-scale.
pub(super) fn raise_mountains(noise: &GradientNoise, elevation: &mut [f32]) {
    for y in 0..MAP_H {
        let sy = y as f64 / MAP_H as f64;
        for x in 0..MAP_W {
            let i = y * MAP_W + x;
            if elevation[i] <= MOUNTAIN_MIN_ELEVATION {
                continue;
            }
            let sx = x as f64 / MAP_W as f64;
            let ridged = 1.0 - noise.fbm(sx * 5.0, sy * 5.0, 4, 0.5, 2.2, 0.0).abs();
            if ridged > MOUNTAIN_THRESHOLD {
                let mask = ((noise.fbm(sx * 0.6, sy * 0.6, 2, 0.6, 2.0, 0.0) + 1.0) * 0.5)
                    .clamp(0.0, 1.0);
                let lift = ((ridged - MOUNTAIN_THRESHOLD) / (1.0 - MOUNTAIN_THRESHOLD))
                    .powf(MOUNTAIN_SHARPNESS)
                    * MOUNTAIN_AMPLITUDE
                    * mask;
                elevation[i] += lift as f32;
            }
        }
    }
}
