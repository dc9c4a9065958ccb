/*
 * Simulation Module
 *
 * This module drives the flock. It owns the fixed agent pool, the spatial
 * grid, the path-attractor snapshot and the scratch buffers used for
 * neighbor gathering, and runs the per-tick sequence for every active
 * agent: query the grid, subsample and filter candidates, compute the
 * weighted steering forces, integrate, and re-register the agent in the
 * grid.
 *
 * The pass is sequential and in-place: later agents in the iteration order
 * see earlier agents' already updated positions. There is no
 * double-buffering; changing that changes flock behavior.
 */

use crate::agent::Agent;
use crate::params::SimulationParams;
use crate::path::PathAttractor;
use crate::spatial_grid::{GridError, SpatialGrid};
use nannou::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid simulation configuration: {0}")]
    InvalidConfig(&'static str),
    #[error(transparent)]
    Grid(#[from] GridError),
}

pub struct Simulation {
    params: SimulationParams,
    bounds: Vec2,
    agents: Vec<Agent>,
    active: usize,
    grid: SpatialGrid,
    path: Option<PathAttractor>,
    rng: SmallRng,
    // Scratch buffers reused across ticks so the per-agent neighbor pass
    // allocates nothing in the steady state.
    neighbor_positions: Vec<Point2>,
    neighbor_velocities: Vec<Vec2>,
    neighbor_dist_sq: Vec<f32>,
    // Debug pass output for the observed agent (index 0).
    observed_cells: Vec<usize>,
    observed_neighbors: Vec<usize>,
}

impl Simulation {
    /// Build the simulation: a pool of `pool_capacity` agents at random
    /// positions and headings, with the first `active_count` registered in
    /// the grid.
    pub fn new(width: f32, height: f32, params: SimulationParams) -> Result<Self, SimulationError> {
        if params.pool_capacity == 0 {
            return Err(SimulationError::InvalidConfig(
                "pool capacity must be non-zero",
            ));
        }

        let mut rng = match params.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mut grid = SpatialGrid::new(
            width,
            height,
            params.perception_radius,
            params.pool_capacity,
        )?;

        let mut agents = Vec::with_capacity(params.pool_capacity);
        for _ in 0..params.pool_capacity {
            let x = rng.gen_range(0.0..width);
            let y = rng.gen_range(0.0..height);
            agents.push(Agent::new(x, y, &mut rng, params.max_speed));
        }

        let active = params.active_count.min(params.pool_capacity);
        for (index, agent) in agents.iter().enumerate().take(active) {
            grid.update(index, agent.position);
        }

        log::info!(
            "created agent pool of {} ({} active) on a {}x{} grid",
            params.pool_capacity,
            active,
            grid.cols(),
            grid.rows()
        );

        let mut params = params;
        params.active_count = active;

        Ok(Self {
            params,
            bounds: vec2(width, height),
            agents,
            active,
            grid,
            path: None,
            rng,
            neighbor_positions: Vec::new(),
            neighbor_velocities: Vec::new(),
            neighbor_dist_sq: Vec::new(),
            observed_cells: Vec::new(),
            observed_neighbors: Vec::new(),
        })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut SimulationParams {
        &mut self.params
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn path(&self) -> Option<&PathAttractor> {
        self.path.as_ref()
    }

    /// Neighborhood cells of the observed agent from the last debug pass.
    pub fn observed_cells(&self) -> &[usize] {
        &self.observed_cells
    }

    /// Accepted neighbors of the observed agent from the last debug pass.
    pub fn observed_neighbors(&self) -> &[usize] {
        &self.observed_neighbors
    }

    /// Input adapter entry point: pointer position in world coordinates and
    /// whether the pointer is inside the canvas.
    pub fn set_pointer(&mut self, position: Point2, active: bool) {
        self.params.pointer_position = position;
        self.params.pointer_active = active;
    }

    /// Swap in a new path snapshot (or remove it).
    pub fn set_path(&mut self, path: Option<PathAttractor>) {
        self.path = path;
    }

    /// Advance the whole flock by one tick.
    pub fn tick(&mut self) {
        for index in 0..self.active {
            self.update_agent(index);
        }

        if self.params.show_debug && self.active > 0 {
            self.collect_observed();
        } else {
            self.observed_cells.clear();
            self.observed_neighbors.clear();
        }
    }

    fn update_agent(&mut self, index: usize) {
        // Destructure so the grid query, the agent pool and the scratch
        // buffers can be borrowed independently.
        let Self {
            params,
            bounds,
            agents,
            grid,
            path,
            neighbor_positions,
            neighbor_velocities,
            neighbor_dist_sq,
            ..
        } = self;

        Self::gather_neighbors(
            grid,
            agents,
            params,
            index,
            neighbor_positions,
            neighbor_velocities,
            neighbor_dist_sq,
            None,
        );

        let agent = &mut agents[index];

        let separation =
            agent.separation(neighbor_positions, neighbor_dist_sq, params) * params.separation_weight;
        let cohesion = agent.cohesion(neighbor_positions, params) * params.cohesion_weight;
        let alignment = agent.alignment(neighbor_velocities, params) * params.alignment_weight;
        agent.apply_force(separation + cohesion + alignment);

        let pointer = agent.pointer_avoidance(params);
        agent.apply_force(pointer);

        if let Some(path) = path.as_ref() {
            let pull = agent.path_attraction(path);
            agent.apply_force(pull);
        }

        agent.integrate(*bounds, params);

        // The position moved: keep the grid consistent before the next
        // agent queries it.
        grid.update(index, agent.position);
    }

    // Flatten the 3x3 candidate block into the scratch buffers. When the
    // candidate total exceeds the steering budget (and the accurate flag is
    // off) a fixed fractional stride skips candidates. The stride is
    // deterministic, never random sampling.
    #[allow(clippy::too_many_arguments)]
    fn gather_neighbors(
        grid: &SpatialGrid,
        agents: &[Agent],
        params: &SimulationParams,
        index: usize,
        positions: &mut Vec<Point2>,
        velocities: &mut Vec<Vec2>,
        dist_sq_out: &mut Vec<f32>,
        mut accepted: Option<&mut Vec<usize>>,
    ) {
        positions.clear();
        velocities.clear();
        dist_sq_out.clear();

        let block = grid.neighborhood(index);
        let total = block.total();
        let step = if total > params.max_flock_count && !params.accurate {
            total as f32 / params.max_flock_count as f32
        } else {
            1.0
        };

        let radius_sq = params.perception_radius * params.perception_radius;
        let origin = agents[index].position;

        for (_, bucket) in block.buckets() {
            let mut cursor = 0.0f32;
            while (cursor as usize) < bucket.len() {
                let other = bucket[cursor as usize];
                cursor += step;

                if other == index {
                    continue;
                }
                let d_sq = origin.distance_squared(agents[other].position);
                if d_sq <= radius_sq {
                    positions.push(agents[other].position);
                    velocities.push(agents[other].velocity);
                    dist_sq_out.push(d_sq);
                    if let Some(list) = accepted.as_deref_mut() {
                        list.push(other);
                    }
                }
            }
        }
    }

    // Debug pass: record the observed agent's neighborhood buckets and the
    // neighbors it would steer against, post-move.
    fn collect_observed(&mut self) {
        let Self {
            params,
            agents,
            grid,
            neighbor_positions,
            neighbor_velocities,
            neighbor_dist_sq,
            observed_cells,
            observed_neighbors,
            ..
        } = self;

        observed_cells.clear();
        observed_cells.extend(grid.neighborhood(0).buckets().map(|(cell, _)| cell));

        observed_neighbors.clear();
        Self::gather_neighbors(
            grid,
            agents,
            params,
            0,
            neighbor_positions,
            neighbor_velocities,
            neighbor_dist_sq,
            Some(observed_neighbors),
        );
    }

    /// Grow or shrink the active subset of the pool. Agents are never
    /// destroyed: a shrink only removes them from the grid, a grow restores
    /// the same agents with whatever state they last held.
    pub fn set_active_count(&mut self, count: usize) {
        let count = count.min(self.agents.len());
        if count == self.active {
            self.params.active_count = count;
            return;
        }

        if count > self.active {
            for index in self.active..count {
                self.grid.update(index, self.agents[index].position);
            }
        } else {
            for index in count..self.active {
                self.grid.remove(index);
            }
        }

        log::debug!("active agents {} -> {}", self.active, count);
        self.active = count;
        self.params.active_count = count;
    }

    /// Re-randomize the whole pool (UI reset button).
    pub fn reset_agents(&mut self) {
        let Self {
            params,
            bounds,
            agents,
            rng,
            ..
        } = self;

        for agent in agents.iter_mut() {
            let x = rng.gen_range(0.0..bounds.x);
            let y = rng.gen_range(0.0..bounds.y);
            *agent = Agent::new(x, y, rng, params.max_speed);
        }

        for index in 0..self.active {
            self.grid.update(index, self.agents[index].position);
        }
        log::debug!("reset {} agents", self.agents.len());
    }

    /// Apply pending parameter changes that need structural work: a new
    /// perception radius rebuilds the grid, a new active count resizes the
    /// active subset. Called by the app layer between ticks.
    pub fn apply_param_changes(&mut self) {
        if (self.params.perception_radius - self.grid.cell_size).abs() > f32::EPSILON {
            if let Err(err) = self.rebuild_grid() {
                log::warn!("keeping previous grid: {err}");
            }
        }
        if self.params.active_count != self.active {
            self.set_active_count(self.params.active_count);
        }
    }

    // Cell size tracks the perception radius so a 3x3 block always covers
    // the full perception circle.
    fn rebuild_grid(&mut self) -> Result<(), GridError> {
        let grid = SpatialGrid::new(
            self.bounds.x,
            self.bounds.y,
            self.params.perception_radius,
            self.agents.len(),
        )?;
        self.grid = grid;
        for index in 0..self.active {
            self.grid.update(index, self.agents[index].position);
        }
        log::debug!(
            "rebuilt spatial grid with cell size {}",
            self.params.perception_radius
        );
        Ok(())
    }
}
