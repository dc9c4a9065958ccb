/*
 * Agent Module
 *
 * This module defines the Agent struct and its behavior.
 * Each agent follows three main rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * On top of the flocking rules an agent can be repelled by the pointer and
 * pulled toward a sampled path. Every behavior produces a steering force
 * bounded by max_force; the combined acceleration is integrated once per
 * tick and the velocity is capped at max_speed.
 */

use crate::params::{BoundaryPolicy, SimulationParams};
use crate::path::PathAttractor;
use nannou::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Clone)]
pub struct Agent {
    pub position: Point2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

impl Agent {
    pub fn new(x: f32, y: f32, rng: &mut impl Rng, max_speed: f32) -> Self {
        // Random initial heading, speed in the upper half of the cap
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range((max_speed / 2.0)..max_speed);

        Self {
            position: pt2(x, y),
            velocity: vec2(angle.cos() * speed, angle.sin() * speed),
            acceleration: Vec2::ZERO,
        }
    }

    // Apply a force to the agent
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Reynolds steering: scale the average up to max_speed (when non-zero),
    /// turn it into a velocity correction, and cap the correction at
    /// max_force. All three flocking behaviors go through this identically.
    pub fn limit_avg_force(&self, mut avg: Vec2, params: &SimulationParams) -> Vec2 {
        let len = avg.length();
        if len > 0.0 {
            avg *= params.max_speed / len;
        }

        avg -= self.velocity;

        let force_sq = avg.length_squared();
        let max_force_sq = params.max_force * params.max_force;
        if force_sq > max_force_sq {
            avg *= params.max_force / force_sq.sqrt();
        }

        avg
    }

    // Calculate separation force (avoid crowding neighbors)
    pub fn separation(
        &self,
        positions: &[Point2],
        dist_sq: &[f32],
        params: &SimulationParams,
    ) -> Vec2 {
        if positions.is_empty() {
            return Vec2::ZERO;
        }

        let mut avg = Vec2::ZERO;
        for (other, &d_sq) in positions.iter().zip(dist_sq) {
            // Vector pointing away from the neighbor, weighted by inverse
            // squared distance. A coincident neighbor contributes the raw
            // (zero) difference instead of dividing by zero.
            let mut diff = self.position - *other;
            if d_sq > 0.0 {
                diff /= d_sq;
            }
            avg += diff;
        }

        avg /= positions.len() as f32;
        self.limit_avg_force(avg, params)
    }

    // Calculate cohesion force (steer towards average position of neighbors)
    pub fn cohesion(&self, positions: &[Point2], params: &SimulationParams) -> Vec2 {
        if positions.is_empty() {
            return Vec2::ZERO;
        }

        let mut centroid = Vec2::ZERO;
        for other in positions {
            centroid += *other;
        }
        centroid /= positions.len() as f32;

        self.limit_avg_force(centroid - self.position, params)
    }

    // Calculate alignment force (steer towards average heading of neighbors)
    pub fn alignment(&self, velocities: &[Vec2], params: &SimulationParams) -> Vec2 {
        if velocities.is_empty() {
            return Vec2::ZERO;
        }

        let mut avg = Vec2::ZERO;
        for other in velocities {
            avg += *other;
        }
        avg /= velocities.len() as f32;

        self.limit_avg_force(avg, params)
    }

    /// Repulsion away from an active pointer. The falloff (1 - d^2/r^2)^2
    /// grows smoothly as the pointer closes in; the result goes through the
    /// same normalize-and-clamp discipline as the flocking behaviors.
    pub fn pointer_avoidance(&self, params: &SimulationParams) -> Vec2 {
        if !params.pointer_active {
            return Vec2::ZERO;
        }

        let dist_sq = self.position.distance_squared(params.pointer_position);
        let radius_sq = params.pointer_radius * params.pointer_radius;
        if dist_sq >= radius_sq {
            return Vec2::ZERO;
        }

        let mut push = self.position - params.pointer_position;
        if dist_sq > 0.0 {
            let falloff = (1.0 - dist_sq / radius_sq).powi(2);
            push *= falloff * 2.0;
        }

        let len = push.length();
        if len > 0.0 {
            push *= params.max_speed * params.pointer_force / len;
        }

        push -= self.velocity;

        let force_sq = push.length_squared();
        let max_force_sq = params.max_force * params.max_force;
        if force_sq > max_force_sq {
            push *= params.max_force / force_sq.sqrt();
        }

        push
    }

    /// Fixed-strength pull toward the nearest path sample, suppressed inside
    /// the dead-zone so agents sitting on the path do not jitter.
    pub fn path_attraction(&self, path: &PathAttractor) -> Vec2 {
        match path.nearest(self.position) {
            Some((point, dist)) if dist > path.dead_zone => {
                (point - self.position) / dist * path.strength
            }
            _ => Vec2::ZERO,
        }
    }

    /// Apply the accumulated acceleration: velocity is capped at max_speed,
    /// the position advances, and the boundary policy resolves any edge
    /// violation. The accumulator is cleared for the next tick.
    pub fn integrate(&mut self, bounds: Vec2, params: &SimulationParams) {
        self.velocity += self.acceleration;

        // Limit speed
        let speed_sq = self.velocity.length_squared();
        let max_speed_sq = params.max_speed * params.max_speed;
        if speed_sq > max_speed_sq {
            self.velocity *= params.max_speed / speed_sq.sqrt();
        }

        self.position += self.velocity;

        match params.boundary_policy {
            BoundaryPolicy::Wrap => {
                self.position.x = self.position.x.rem_euclid(bounds.x);
                self.position.y = self.position.y.rem_euclid(bounds.y);
            }
            BoundaryPolicy::Reflect => {
                if self.position.x < 0.0 {
                    self.position.x = 0.0;
                    self.velocity.x = -self.velocity.x;
                } else if self.position.x >= bounds.x {
                    self.position.x = bounds.x;
                    self.velocity.x = -self.velocity.x;
                }
                if self.position.y < 0.0 {
                    self.position.y = 0.0;
                    self.velocity.y = -self.velocity.y;
                } else if self.position.y >= bounds.y {
                    self.position.y = bounds.y;
                    self.velocity.y = -self.velocity.y;
                }
            }
        }

        // Reset acceleration
        self.acceleration = Vec2::ZERO;
    }
}
