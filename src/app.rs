/*
 * Application Module
 *
 * This module defines the main application model and logic for the flocking
 * simulation. It owns the window, the egui instance and the simulation, and
 * wires mouse input into the pointer-avoidance parameters. All per-frame
 * work happens here: UI pass, parameter application, one simulation tick,
 * and drawing.
 */

use nannou::prelude::*;
use nannou::winit::event::WindowEvent;
use nannou_egui::Egui;

use crate::debug::DebugInfo;
use crate::params::SimulationParams;
use crate::path::PathAttractor;
use crate::render;
use crate::simulation::Simulation;
use crate::ui;

// Main model for the application
pub struct Model {
    pub simulation: Simulation,
    pub egui: Egui,
    pub debug_info: DebugInfo,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    // Get the primary monitor's dimensions
    let monitor = app.primary_monitor().expect("Failed to get primary monitor");
    let monitor_size = monitor.size();

    // Window at 80% of the monitor; the world shares its dimensions
    let window_width = monitor_size.width as f32 * 0.8;
    let window_height = monitor_size.height as f32 * 0.8;

    let window_id = app
        .new_window()
        .title("Flocking Simulation")
        .size(window_width as u32, window_height as u32)
        .view(view)
        .mouse_moved(mouse_moved)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let params = SimulationParams::default();
    let simulation = Simulation::new(window_width, window_height, params)
        .expect("Failed to create simulation");

    Model {
        simulation,
        egui,
        debug_info: DebugInfo::default(),
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    // Update debug info
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    // UI pass
    let (should_reset_agents, changes) =
        ui::update_ui(&mut model.egui, model.simulation.params_mut(), &model.debug_info);

    if should_reset_agents {
        model.simulation.reset_agents();
    }

    // Rebuild the path snapshot when its knobs changed
    if changes.path_changed {
        model.simulation.set_path(build_path(&model.simulation));
    }

    // Structural parameter changes (grid rebuild, active count)
    model.simulation.apply_param_changes();

    if !model.simulation.params().pause_simulation {
        model.simulation.tick();
    }
}

// Sample a circle centered in the world as the attractor path
fn build_path(simulation: &Simulation) -> Option<PathAttractor> {
    let params = simulation.params();
    if !params.path_enabled {
        return None;
    }

    let bounds = simulation.bounds();
    let center = pt2(bounds.x / 2.0, bounds.y / 2.0);
    let radius = bounds.x.min(bounds.y) / 3.0;
    Some(PathAttractor::circle(
        center,
        radius,
        128,
        params.path_dead_zone,
        params.path_strength,
    ))
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let simulation = &model.simulation;
    let bounds = simulation.bounds();
    let params = simulation.params();

    // Clear the background
    draw.background().color(rgb::<u8>(0x21, 0x21, 0x24));

    // Path attractor samples
    if let Some(path) = simulation.path() {
        for &point in path.points() {
            draw.ellipse()
                .xy(render::world_to_screen(point, bounds))
                .radius(1.5)
                .color(rgba(0.4, 0.4, 0.45, 0.6));
        }
    }

    // Debug overlay: the observed agent's neighborhood buckets
    if params.show_debug {
        let cell_size = simulation.grid().cell_size;
        for &cell in simulation.observed_cells() {
            let origin = simulation.grid().cell_origin(cell);
            let center = origin + vec2(cell_size / 2.0, cell_size / 2.0);
            draw.rect()
                .xy(render::world_to_screen(center, bounds))
                .w_h(cell_size, cell_size)
                .no_fill()
                .stroke_weight(1.0)
                .stroke(rgba(0.3, 0.3, 0.35, 1.0));
        }
    }

    // Draw the active agents; the observed agent's neighbors are highlighted
    // while the debug overlay is on
    let observed_neighbors = simulation.observed_neighbors();
    for (index, agent) in simulation
        .agents()
        .iter()
        .enumerate()
        .take(simulation.active_count())
    {
        let highlighted = params.show_debug && observed_neighbors.contains(&index);
        render::draw_agent(&draw, agent, bounds, params.max_speed, highlighted);
    }

    // Perception circle around the observed agent
    if params.show_debug && simulation.active_count() > 0 {
        let observed = &simulation.agents()[0];
        draw.ellipse()
            .xy(render::world_to_screen(observed.position, bounds))
            .radius(params.perception_radius)
            .no_fill()
            .stroke(WHITE)
            .stroke_weight(1.0);
    }

    // Finish drawing
    draw.to_frame(app, &frame).unwrap();

    // Draw the egui UI
    model.egui.draw_to_frame(&frame).unwrap();
}

// Mouse moved event handler: feed the pointer position to the simulation
pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    let bounds = model.simulation.bounds();
    let world_pos = render::screen_to_world(pos, bounds);
    model.simulation.set_pointer(world_pos, true);
}

// Handle raw window events for egui and pointer enter/leave
pub fn raw_window_event(_app: &App, model: &mut Model, event: &WindowEvent) {
    // Pass events to egui
    model.egui.handle_raw_event(event);

    match event {
        WindowEvent::CursorLeft { .. } => {
            let position = model.simulation.params().pointer_position;
            model.simulation.set_pointer(position, false);
        }
        WindowEvent::CursorEntered { .. } => {
            let position = model.simulation.params().pointer_position;
            model.simulation.set_pointer(position, true);
        }
        _ => {}
    }
}
