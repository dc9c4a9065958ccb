/*
 * Flocking Simulation - Module Definitions
 *
 * This file defines the module structure for the flocking simulation.
 * It organizes the code into logical components for better maintainability.
 */

// Re-export key components for easier access
pub use agent::Agent;
pub use debug::DebugInfo;
pub use params::{BoundaryPolicy, ParamChanges, SimulationParams};
pub use path::PathAttractor;
pub use simulation::{Simulation, SimulationError};
pub use spatial_grid::{CellBlock, GridError, SpatialGrid};

// Define modules
pub mod agent;
pub mod app;
pub mod debug;
pub mod params;
pub mod path;
pub mod render;
pub mod simulation;
pub mod spatial_grid;
pub mod ui;

// Constants
pub const AGENT_SIZE: f32 = 6.0;
