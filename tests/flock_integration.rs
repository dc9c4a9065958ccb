/*
 * Flock Integration Tests
 *
 * Long-run invariants over the public API: speed and position stay bounded
 * under both boundary policies, every value stays finite, the grid tracks
 * the flock, and the pool survives activation churn.
 */

use flocking::{BoundaryPolicy, Simulation, SimulationParams};

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;
const TICKS: usize = 60;

fn params(policy: BoundaryPolicy) -> SimulationParams {
    let mut params = SimulationParams::default();
    params.pool_capacity = 1200;
    params.active_count = 800;
    params.boundary_policy = policy;
    params.rng_seed = Some(1234);
    params
}

fn assert_flock_invariants(sim: &Simulation) {
    let max_speed = sim.params().max_speed;
    let bounds = sim.bounds();

    for (index, agent) in sim.agents().iter().enumerate().take(sim.active_count()) {
        assert!(
            agent.position.x.is_finite() && agent.position.y.is_finite(),
            "agent {index} has a non-finite position"
        );
        assert!(
            agent.velocity.x.is_finite() && agent.velocity.y.is_finite(),
            "agent {index} has a non-finite velocity"
        );
        assert!(
            agent.velocity.length() <= max_speed + 1e-3,
            "agent {index} exceeds the speed cap: {}",
            agent.velocity.length()
        );
        assert!(
            agent.position.x >= 0.0
                && agent.position.x <= bounds.x
                && agent.position.y >= 0.0
                && agent.position.y <= bounds.y,
            "agent {index} escaped the world: {:?}",
            agent.position
        );

        let expected_cell = sim.grid().cell_index(agent.position);
        assert_eq!(
            sim.grid().bucket_of(index),
            Some(expected_cell),
            "agent {index} is indexed in the wrong bucket"
        );
    }

    // Uniqueness: the union of all buckets is exactly the active set.
    let mut members: Vec<usize> = (0..sim.grid().cols() * sim.grid().rows())
        .flat_map(|cell| sim.grid().bucket(cell).iter().copied())
        .collect();
    members.sort_unstable();
    let total = members.len();
    members.dedup();
    assert_eq!(total, members.len(), "an agent is listed in two buckets");
    assert_eq!(total, sim.active_count());
}

#[test]
fn reflect_policy_run_preserves_invariants() {
    let mut sim =
        Simulation::new(WIDTH, HEIGHT, params(BoundaryPolicy::Reflect)).expect("simulation");
    for _ in 0..TICKS {
        sim.tick();
        assert_flock_invariants(&sim);
    }
}

#[test]
fn wrap_policy_run_preserves_invariants() {
    let mut sim =
        Simulation::new(WIDTH, HEIGHT, params(BoundaryPolicy::Wrap)).expect("simulation");
    for _ in 0..TICKS {
        sim.tick();
        assert_flock_invariants(&sim);
    }
}

#[test]
fn seeded_runs_are_reproducible() {
    let mut a =
        Simulation::new(WIDTH, HEIGHT, params(BoundaryPolicy::Reflect)).expect("simulation");
    let mut b =
        Simulation::new(WIDTH, HEIGHT, params(BoundaryPolicy::Reflect)).expect("simulation");

    for _ in 0..20 {
        a.tick();
        b.tick();
    }

    for (left, right) in a.agents().iter().zip(b.agents()).take(a.active_count()) {
        assert_eq!(left.position, right.position);
        assert_eq!(left.velocity, right.velocity);
    }
}

#[test]
fn activation_churn_keeps_the_pool_stable() {
    let mut sim =
        Simulation::new(WIDTH, HEIGHT, params(BoundaryPolicy::Reflect)).expect("simulation");
    for _ in 0..10 {
        sim.tick();
    }

    let saved: Vec<_> = sim.agents()[400..800]
        .iter()
        .map(|a| (a.position, a.velocity))
        .collect();

    sim.set_active_count(400);
    for _ in 0..10 {
        sim.tick();
        assert_flock_invariants(&sim);
    }

    sim.set_active_count(800);
    assert_flock_invariants(&sim);

    // The reactivated half is exactly as it was left.
    for (agent, (position, velocity)) in sim.agents()[400..800].iter().zip(&saved) {
        assert_eq!(agent.position, *position);
        assert_eq!(agent.velocity, *velocity);
    }
}

#[test]
fn growing_the_active_count_is_bounded_by_the_pool() {
    let mut sim =
        Simulation::new(WIDTH, HEIGHT, params(BoundaryPolicy::Reflect)).expect("simulation");
    sim.set_active_count(usize::MAX);
    assert_eq!(sim.active_count(), 1200);
    sim.tick();
    assert_flock_invariants(&sim);
}
