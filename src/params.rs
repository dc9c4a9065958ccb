/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that contains all the
 * adjustable parameters for the flocking simulation. These parameters can be
 * modified through the UI. It also provides methods for parameter change
 * detection so the app layer can react to slider movements between ticks.
 */

use nannou::prelude::*;

/// How an agent is resolved against the world boundary after integration.
/// One policy per simulation; the two are never mixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Re-enter on the opposite edge.
    Wrap,
    /// Negate the violated velocity component and clamp to the edge.
    Reflect,
}

// Parameters for the simulation that can be adjusted via UI
pub struct SimulationParams {
    pub pool_capacity: usize,
    pub active_count: usize,
    pub separation_weight: f32,
    pub cohesion_weight: f32,
    pub alignment_weight: f32,
    pub perception_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub boundary_policy: BoundaryPolicy,
    // Steering cost budget: above this many candidates the neighbor scan
    // subsamples with a fixed stride, unless `accurate` is set.
    pub max_flock_count: usize,
    pub accurate: bool,
    pub show_debug: bool,
    pub pause_simulation: bool,
    // Pointer repulsion, written by the input adapter between ticks.
    pub pointer_position: Point2,
    pub pointer_active: bool,
    pub pointer_radius: f32,
    pub pointer_force: f32,
    // Path attractor knobs; the sampled points live in a PathAttractor
    // snapshot owned by the simulation.
    pub path_enabled: bool,
    pub path_strength: f32,
    pub path_dead_zone: f32,
    // Seed for reproducible runs; None draws from entropy.
    pub rng_seed: Option<u64>,

    // Internal state for tracking changes
    previous_values: Option<ParamSnapshot>,
}

// A snapshot of parameter values used for change detection
struct ParamSnapshot {
    active_count: usize,
    separation_weight: f32,
    cohesion_weight: f32,
    alignment_weight: f32,
    perception_radius: f32,
    max_speed: f32,
    max_force: f32,
    boundary_policy: BoundaryPolicy,
    max_flock_count: usize,
    accurate: bool,
    show_debug: bool,
    pause_simulation: bool,
    pointer_radius: f32,
    pointer_force: f32,
    path_enabled: bool,
    path_strength: f32,
    path_dead_zone: f32,
}

/// What changed since the last snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParamChanges {
    pub active_count_changed: bool,
    pub perception_radius_changed: bool,
    pub path_changed: bool,
    pub any_changed: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            pool_capacity: 10_000,
            active_count: 1800,
            separation_weight: 1.3,
            cohesion_weight: 0.8,
            alignment_weight: 1.0,
            perception_radius: 40.0,
            max_speed: 5.0,
            max_force: 0.3,
            boundary_policy: BoundaryPolicy::Reflect,
            max_flock_count: 80,
            accurate: false,
            show_debug: false,
            pause_simulation: false,
            pointer_position: pt2(0.0, 0.0),
            pointer_active: false,
            pointer_radius: 100.0,
            pointer_force: 2.0,
            path_enabled: false,
            path_strength: 0.05,
            path_dead_zone: 10.0,
            rng_seed: None,
            previous_values: None,
        }
    }
}

impl SimulationParams {
    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(ParamSnapshot {
            active_count: self.active_count,
            separation_weight: self.separation_weight,
            cohesion_weight: self.cohesion_weight,
            alignment_weight: self.alignment_weight,
            perception_radius: self.perception_radius,
            max_speed: self.max_speed,
            max_force: self.max_force,
            boundary_policy: self.boundary_policy,
            max_flock_count: self.max_flock_count,
            accurate: self.accurate,
            show_debug: self.show_debug,
            pause_simulation: self.pause_simulation,
            pointer_radius: self.pointer_radius,
            pointer_force: self.pointer_force,
            path_enabled: self.path_enabled,
            path_strength: self.path_strength,
            path_dead_zone: self.path_dead_zone,
        });
    }

    // Compare current values against the last snapshot
    pub fn detect_changes(&self) -> ParamChanges {
        let mut changes = ParamChanges::default();

        if let Some(prev) = &self.previous_values {
            changes.active_count_changed = self.active_count != prev.active_count;
            changes.perception_radius_changed =
                self.perception_radius != prev.perception_radius;
            changes.path_changed = self.path_enabled != prev.path_enabled
                || self.path_strength != prev.path_strength
                || self.path_dead_zone != prev.path_dead_zone;

            changes.any_changed = changes.active_count_changed
                || changes.perception_radius_changed
                || changes.path_changed
                || self.separation_weight != prev.separation_weight
                || self.cohesion_weight != prev.cohesion_weight
                || self.alignment_weight != prev.alignment_weight
                || self.max_speed != prev.max_speed
                || self.max_force != prev.max_force
                || self.boundary_policy != prev.boundary_policy
                || self.max_flock_count != prev.max_flock_count
                || self.accurate != prev.accurate
                || self.show_debug != prev.show_debug
                || self.pause_simulation != prev.pause_simulation
                || self.pointer_radius != prev.pointer_radius
                || self.pointer_force != prev.pointer_force;
        }

        changes
    }

    // Parameter ranges for UI sliders
    pub fn weight_range() -> std::ops::RangeInclusive<f32> {
        0.0..=5.0
    }

    pub fn max_speed_range() -> std::ops::RangeInclusive<f32> {
        1.0..=20.0
    }

    pub fn perception_radius_range() -> std::ops::RangeInclusive<f32> {
        10.0..=100.0
    }

    pub fn max_flock_count_range() -> std::ops::RangeInclusive<usize> {
        10..=400
    }

    pub fn pointer_radius_range() -> std::ops::RangeInclusive<f32> {
        10.0..=300.0
    }

    pub fn pointer_force_range() -> std::ops::RangeInclusive<f32> {
        0.0..=5.0
    }

    pub fn path_strength_range() -> std::ops::RangeInclusive<f32> {
        0.0..=0.5
    }

    pub fn path_dead_zone_range() -> std::ops::RangeInclusive<f32> {
        0.0..=50.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_snapshot_means_no_changes() {
        let params = SimulationParams::default();
        let changes = params.detect_changes();
        assert!(!changes.any_changed);
        assert!(!changes.active_count_changed);
    }

    #[test]
    fn detects_active_count_and_radius_changes() {
        let mut params = SimulationParams::default();
        params.take_snapshot();
        params.active_count = 500;
        params.perception_radius = 60.0;

        let changes = params.detect_changes();
        assert!(changes.any_changed);
        assert!(changes.active_count_changed);
        assert!(changes.perception_radius_changed);
        assert!(!changes.path_changed);
    }

    #[test]
    fn unchanged_parameters_report_clean() {
        let mut params = SimulationParams::default();
        params.take_snapshot();
        assert!(!params.detect_changes().any_changed);
    }
}
