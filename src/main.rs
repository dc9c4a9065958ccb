/*
 * Flocking Simulation
 *
 * This application simulates flocking behavior based on three main rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * Neighbor queries run against a spatial grid that is maintained
 * incrementally as agents move. The simulation includes interactive sliders
 * to adjust parameters in real-time, pointer avoidance, an optional path
 * attractor, and a debug overlay showing the observed agent's neighborhood.
 */

use flocking::app;

fn main() {
    env_logger::init();
    nannou::app(app::model).update(app::update).run();
}
