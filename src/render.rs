/*
 * Render Module
 *
 * Presentation adapter: turns agent state into drawable transforms. Reads
 * position (translation) and velocity (heading via atan2, speed-derived
 * tint) per agent; never writes agent state.
 */

use crate::agent::Agent;
use crate::AGENT_SIZE;
use nannou::prelude::*;

/// Discretize |velocity| / max_speed into one of five palette buckets.
pub fn speed_bucket(speed: f32, max_speed: f32) -> usize {
    if max_speed <= 0.0 {
        return 0;
    }
    let normalized = (speed / max_speed).clamp(0.0, 1.0);
    ((normalized * 5.0) as usize).min(4)
}

/// Tint for an agent at the given speed. Faster agents render brighter.
pub fn speed_color(speed: f32, max_speed: f32) -> Rgb<u8> {
    match speed_bucket(speed, max_speed) {
        0 | 1 => rgb(0x30, 0x30, 0x33),
        2 => rgb(0x76, 0x76, 0x7D),
        3 => rgb(0xC6, 0xC6, 0xCE),
        _ => rgb(0xD4, 0xD4, 0xDA),
    }
}

/// Heading angle in radians derived from the velocity.
pub fn heading(velocity: Vec2) -> f32 {
    velocity.y.atan2(velocity.x)
}

// World space is [0, w) x [0, h); nannou's screen origin is the window
// center, so the transform is a plain offset.
pub fn world_to_screen(point: Point2, bounds: Vec2) -> Point2 {
    point - bounds * 0.5
}

pub fn screen_to_world(point: Point2, bounds: Vec2) -> Point2 {
    point + bounds * 0.5
}

/// Draw one agent as a heading-aligned triangle.
pub fn draw_agent(draw: &Draw, agent: &Agent, bounds: Vec2, max_speed: f32, highlighted: bool) {
    let screen_pos = world_to_screen(agent.position, bounds);
    let angle = heading(agent.velocity);

    let color = if highlighted {
        rgb(0xFF, 0xFF, 0xFF)
    } else {
        speed_color(agent.velocity.length(), max_speed)
    };

    let points = [
        pt2(AGENT_SIZE, 0.0),
        pt2(-AGENT_SIZE, AGENT_SIZE / 2.0),
        pt2(-AGENT_SIZE, -AGENT_SIZE / 2.0),
    ];

    draw.polygon()
        .color(color)
        .points(points.iter().cloned())
        .xy(screen_pos)
        .rotate(angle);
}
