/*
 * Path Attractor Module
 *
 * A read-only snapshot of sample points along an external path, used to pull
 * agents toward the path. The simulation treats the snapshot as immutable;
 * whoever owns the underlying path re-samples and swaps in a new snapshot
 * when it changes.
 */

use nannou::prelude::*;

pub struct PathAttractor {
    points: Vec<Point2>,
    /// No pull is applied within this distance of the nearest sample.
    pub dead_zone: f32,
    /// Magnitude of the pull outside the dead-zone.
    pub strength: f32,
}

impl PathAttractor {
    pub fn new(points: Vec<Point2>, dead_zone: f32, strength: f32) -> Self {
        Self {
            points,
            dead_zone,
            strength,
        }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Nearest sample point to `from` and its distance. Linear scan; the
    /// sample resolution is small enough that this stays cheap per agent.
    pub fn nearest(&self, from: Point2) -> Option<(Point2, f32)> {
        let mut best: Option<(Point2, f32)> = None;
        for &point in &self.points {
            let dist_sq = from.distance_squared(point);
            if best.map_or(true, |(_, best_sq)| dist_sq < best_sq) {
                best = Some((point, dist_sq));
            }
        }
        best.map(|(point, dist_sq)| (point, dist_sq.sqrt()))
    }

    /// Sample a circle into an attractor snapshot.
    pub fn circle(
        center: Point2,
        radius: f32,
        samples: usize,
        dead_zone: f32,
        strength: f32,
    ) -> Self {
        let points = (0..samples)
            .map(|i| {
                let theta = i as f32 / samples as f32 * std::f32::consts::TAU;
                center + vec2(theta.cos(), theta.sin()) * radius
            })
            .collect();
        Self::new(points, dead_zone, strength)
    }
}
