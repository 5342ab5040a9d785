//! Fruchterman–Reingold force-directed placement.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use crate::config::DEFAULT_LAYOUT_TEMPERATURE;

/// Distances below this are treated as coincident.
const MIN_DISTANCE: f64 = 0.01;

/// Simulation parameters.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ForceParams {
    pub iterations: usize,
    pub spring_length: Option<f64>,
    /// Stop iterating once this instant has passed.
    pub deadline: Option<Instant>,
}

/// Place `n` vertices joined by `edges` (index pairs) in the unit square.
///
/// All randomness (initial positions and coincident-node jitter) comes from
/// `rng`, so a fixed seed yields fixed coordinates.
pub(crate) fn place(n: usize, edges: &[(usize, usize)], params: ForceParams, rng: &mut StdRng) -> Vec<[f64; 2]> {
    let mut pos: Vec<[f64; 2]> = (0..n).map(|_| [rng.gen::<f64>(), rng.gen::<f64>()]).collect();
    if n < 2 {
        return pos;
    }

    let k = params.spring_length.unwrap_or(1.0 / (n as f64).sqrt());
    let mut temperature = DEFAULT_LAYOUT_TEMPERATURE;
    let cooling = temperature / (params.iterations as f64 + 1.0);

    for iteration in 0..params.iterations {
        if params.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            debug!(iteration, n, "layout deadline passed");
            break;
        }
        let mut disp = vec![[0.0f64; 2]; n];

        // Repulsion between every pair.
        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy, dist) = separation(pos[i], pos[j], rng);
                let force = k * k / dist;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[i][0] += fx;
                disp[i][1] += fy;
                disp[j][0] -= fx;
                disp[j][1] -= fy;
            }
        }

        // Attraction along edges.
        for &(a, b) in edges {
            if a == b {
                continue;
            }
            let (dx, dy, dist) = separation(pos[a], pos[b], rng);
            let force = dist * dist / k;
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            disp[a][0] -= fx;
            disp[a][1] -= fy;
            disp[b][0] += fx;
            disp[b][1] += fy;
        }

        // Move, capped by the temperature.
        for (p, d) in pos.iter_mut().zip(&disp) {
            let len = (d[0] * d[0] + d[1] * d[1]).sqrt();
            if len < f64::EPSILON {
                continue;
            }
            let step = len.min(temperature);
            p[0] += d[0] / len * step;
            p[1] += d[1] / len * step;
        }

        temperature -= cooling;
    }

    pos
}

/// Vector from `b` to `a` and its length, jittered apart when coincident.
fn separation(a: [f64; 2], b: [f64; 2], rng: &mut StdRng) -> (f64, f64, f64) {
    let (mut dx, mut dy) = (a[0] - b[0], a[1] - b[1]);
    let mut dist = (dx * dx + dy * dy).sqrt();
    if dist < MIN_DISTANCE {
        dx = rng.gen_range(-MIN_DISTANCE..MIN_DISTANCE);
        dy = rng.gen_range(-MIN_DISTANCE..MIN_DISTANCE);
        dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
    }
    (dx, dy, dist)
}

/// Center on the origin and rescale so the largest coordinate is `scale`.
pub(crate) fn rescale(pos: &mut [[f64; 2]], scale: f64) {
    if pos.is_empty() {
        return;
    }
    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p[1]).sum::<f64>() / n;
    for p in pos.iter_mut() {
        p[0] -= cx;
        p[1] -= cy;
    }

    let extent = pos
        .iter()
        .flat_map(|p| [p[0].abs(), p[1].abs()])
        .fold(0.0f64, f64::max);
    if extent < f64::EPSILON {
        return;
    }
    for p in pos.iter_mut() {
        p[0] *= scale / extent;
        p[1] *= scale / extent;
    }
}
