use crate::model::River;
use crate::rng::SimRng;

use super::{wrap_x, MAP_H, MAP_W};

const MIN_SOURCES: i64 = 80;
const MAX_SOURCES: i64 = 150;
const ATTEMPTS_PER_SOURCE: i64 = 40;

const SOURCE_MIN_ELEVATION: f32 = 0.3;
const SOURCE_MAX_ELEVATION: f32 = 0.9;
const SOURCE_MIN_MOISTURE: f32 = 0.4;

const MAX_RIVER_STEPS: usize = 200;
/// Traces at or below this length are discarded.
const MIN_RIVER_LENGTH: usize = 10;

/// Phase 6: pick highland sources and trace each downhill until it
/// reaches the ocean, joins an existing river, bottoms out in a basin, or
/// runs out of steps. Kept rivers mark their pixels with their 1-based
/// index; a merge point keeps the mark of the river that got there first.
pub(super) fn carve_rivers(
    rng: &mut SimRng,
    elevation: &[f32],
    moisture: &[f32],
    river_mark: &mut [u8],
) -> Vec<River> {
    let target = rng.int(MIN_SOURCES, MAX_SOURCES);
    let max_attempts = target * ATTEMPTS_PER_SOURCE;
    let mut rivers: Vec<River> = Vec::new();

    let mut attempts = 0;
    while (rivers.len() as i64) < target && attempts < max_attempts {
        attempts += 1;
        let x = rng.int(0, MAP_W as i64 - 1) as usize;
        let y = rng.int(0, MAP_H as i64 - 1) as usize;
        let i = y * MAP_W + x;
        let e = elevation[i];
        if e <= SOURCE_MIN_ELEVATION || e >= SOURCE_MAX_ELEVATION {
            continue;
        }
        if moisture[i] <= SOURCE_MIN_MOISTURE || river_mark[i] != 0 {
            continue;
        }

        if let Some(points) = trace_downhill(x, y, elevation, river_mark) {
            let id = (rivers.len() + 1) as u8;
            for &(px, py) in &points {
                let mark = &mut river_mark[py as usize * MAP_W + px as usize];
                if *mark == 0 {
                    *mark = id;
                }
            }
            let strength = (points.len() as f32 / 100.0).min(1.0);
            rivers.push(River { points, strength });
        }
    }
    rivers
}

/// Follow strictly descending elevation from a source. Neighbor probes go
/// N, S, E, W in that fixed order (ties keep the earlier direction); X
/// wraps and off-map rows do not exist.
fn trace_downhill(
    x: usize,
    y: usize,
    elevation: &[f32],
    river_mark: &[u8],
) -> Option<Vec<(u32, u32)>> {
    let mut points = vec![(x as u32, y as u32)];
    let (mut cx, mut cy) = (x, y);

    for _ in 0..MAX_RIVER_STEPS {
        let here = elevation[cy * MAP_W + cx];
        let mut best: Option<(usize, usize, f32)> = None;
        for (dx, dy) in [(0i64, -1i64), (0, 1), (1, 0), (-1, 0)] {
            let ny = cy as i64 + dy;
            if ny < 0 || ny >= MAP_H as i64 {
                continue;
            }
            let nx = wrap_x(cx as i64 + dx, MAP_W);
            let ne = elevation[ny as usize * MAP_W + nx];
            if ne < here && best.is_none_or(|(_, _, be)| ne < be) {
                best = Some((nx, ny as usize, ne));
            }
        }

        // Local minimum: the river ends in a basin.
        let Some((nx, ny, ne)) = best else { break };

        points.push((nx as u32, ny as u32));
        if ne <= 0.0 {
            break; // reached the ocean
        }
        if river_mark[ny * MAP_W + nx] != 0 {
            break; // joined an existing river
        }
        (cx, cy) = (nx, ny);
    }

    (points.len() > MIN_RIVER_LENGTH).then_some(points)
}
