/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui. It provides controls for adjusting simulation parameters.
 * Parameter change detection is handled by the SimulationParams struct.
 */

use crate::debug::DebugInfo;
use crate::params::{BoundaryPolicy, ParamChanges, SimulationParams};
use nannou_egui::{egui, Egui};

// Update the UI. Returns whether agents should be re-randomized and which
// parameters changed during this frame.
pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    debug_info: &DebugInfo,
) -> (bool, ParamChanges) {
    let mut should_reset_agents = false;

    // Take a snapshot of current parameter values for change detection
    params.take_snapshot();

    let pool_capacity = params.pool_capacity;
    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Flock", |ui| {
                ui.add(
                    egui::Slider::new(&mut params.active_count, 0..=pool_capacity)
                        .text("Active Agents"),
                );

                if ui.button("Reset Agents").clicked() {
                    should_reset_agents = true;
                }

                ui.add(
                    egui::Slider::new(&mut params.max_speed, SimulationParams::max_speed_range())
                        .text("Max Speed"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut params.perception_radius,
                        SimulationParams::perception_radius_range(),
                    )
                    .text("Perception Radius"),
                );
            });

            ui.collapsing("Flocking Behavior", |ui| {
                ui.add(
                    egui::Slider::new(
                        &mut params.separation_weight,
                        SimulationParams::weight_range(),
                    )
                    .text("Separation Weight"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut params.cohesion_weight,
                        SimulationParams::weight_range(),
                    )
                    .text("Cohesion Weight"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut params.alignment_weight,
                        SimulationParams::weight_range(),
                    )
                    .text("Alignment Weight"),
                );
            });

            ui.collapsing("Pointer", |ui| {
                ui.add(
                    egui::Slider::new(
                        &mut params.pointer_radius,
                        SimulationParams::pointer_radius_range(),
                    )
                    .text("Pointer Radius"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut params.pointer_force,
                        SimulationParams::pointer_force_range(),
                    )
                    .text("Pointer Force"),
                );
            });

            ui.collapsing("Path Attractor", |ui| {
                ui.checkbox(&mut params.path_enabled, "Enable Path Attractor");
                ui.add(
                    egui::Slider::new(
                        &mut params.path_strength,
                        SimulationParams::path_strength_range(),
                    )
                    .text("Strength"),
                );
                ui.add(
                    egui::Slider::new(
                        &mut params.path_dead_zone,
                        SimulationParams::path_dead_zone_range(),
                    )
                    .text("Dead Zone"),
                );
            });

            ui.collapsing("Boundary", |ui| {
                ui.radio_value(&mut params.boundary_policy, BoundaryPolicy::Reflect, "Reflect");
                ui.radio_value(&mut params.boundary_policy, BoundaryPolicy::Wrap, "Wrap");
            });

            ui.collapsing("Performance Tuning", |ui| {
                ui.checkbox(&mut params.accurate, "Accurate (no subsampling)");
                ui.add(
                    egui::Slider::new(
                        &mut params.max_flock_count,
                        SimulationParams::max_flock_count_range(),
                    )
                    .text("Steering Budget"),
                );

                ui.separator();

                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!(
                    "Frame time: {:.2} ms",
                    debug_info.frame_time.as_secs_f64() * 1000.0
                ));
                ui.label(format!("Active Agents: {}", params.active_count));
            });

            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");
        });

    // Detect parameter changes
    let changes = params.detect_changes();

    (should_reset_agents, changes)
}
