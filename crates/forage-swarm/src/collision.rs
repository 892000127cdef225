//! Hard collision resolution: obstacle push-out and pairwise separation.
//!
//! Both solvers are iterative with small fixed budgets.  When a budget runs
//! out the residual overlap is counted into [`SwarmMetrics`] instead of being
//! treated as an error; the next tick gets another chance.

use forage_core::Obstacle;
use glam::Vec2;

use crate::grid::SpatialGrid;
use crate::metrics::SwarmMetrics;
use crate::store::AgentStore;
use crate::SwarmConfig;

/// Passes of the per-agent obstacle push-out loop.
const OBSTACLE_PASSES: usize = 3;

/// Iterations of the global pairwise separation solver.
const SEPARATION_ITERS: usize = 3;

/// Pairs closer than `min_separation` minus this slack after the final
/// iteration are counted as residual.
const SEPARATION_SLACK: f32 = 1e-3;

/// Reflect `v` across the plane with unit normal `n`.
#[inline]
fn reflect(v: Vec2, n: Vec2) -> Vec2 {
    v - 2.0 * v.dot(n) * n
}

/// Renormalize `v` to exactly `speed`, falling back to `n` for degenerate
/// vectors so the fixed-speed invariant survives reflection.
#[inline]
fn with_speed(v: Vec2, n: Vec2, speed: f32) -> Vec2 {
    v.try_normalize().unwrap_or(n) * speed
}

/// Push `pos` out of every obstacle footprint it overlaps, reflecting `vel`
/// off the footprint tangent when it points inward.
///
/// Returns `true` when the pass budget was exhausted with an overlap still
/// present (dense obstacle clusters can re-push an agent into a neighbor).
pub(crate) fn resolve_obstacles(
    pos:       &mut Vec2,
    vel:       &mut Vec2,
    speed:     f32,
    obstacles: &[Obstacle],
) -> bool {
    for _ in 0..OBSTACLE_PASSES {
        let mut hit = false;
        for obs in obstacles {
            let delta = *pos - obs.center;
            if delta.length_squared() >= obs.radius * obs.radius {
                continue;
            }
            hit = true;
            let n = delta.try_normalize().unwrap_or(Vec2::X);
            *pos = obs.center + n * obs.radius;
            if vel.dot(n) < 0.0 {
                *vel = with_speed(reflect(*vel, n), n, speed);
            }
        }
        if !hit {
            return false;
        }
    }
    obstacles.iter().any(|o| o.contains(*pos))
}

/// One global separation sweep over the whole swarm.
///
/// Rebuilds the uniform grid each iteration, walks every overlapping pair
/// once (`j > i`), moves both agents half the overlap apart, and reflects
/// the velocity of whichever agent is still closing.  Converged swarms exit
/// before the iteration budget; leftover overlaps are counted, not fixed.
pub(crate) fn separation_pass(
    store:   &mut AgentStore,
    cfg:     &SwarmConfig,
    scratch: &mut Vec<u32>,
    metrics: &mut SwarmMetrics,
) {
    let min_sep = cfg.min_separation;
    if min_sep <= 0.0 || store.count < 2 {
        return;
    }

    for _ in 0..SEPARATION_ITERS {
        let grid = SpatialGrid::build(&store.pos, min_sep);
        metrics.separation_iterations += 1;
        let mut moved = false;

        for i in 0..store.count {
            scratch.clear();
            grid.neighbors_into(store.pos[i], scratch);
            for &j in scratch.iter() {
                let j = j as usize;
                if j <= i {
                    continue;
                }
                let delta = store.pos[j] - store.pos[i];
                let dist = delta.length();
                if dist >= min_sep {
                    continue;
                }
                moved = true;
                let n = delta.try_normalize().unwrap_or(Vec2::X);
                let push = 0.5 * (min_sep - dist);
                store.pos[i] -= n * push;
                store.pos[j] += n * push;
                if store.vel[i].dot(n) > 0.0 {
                    let speed = cfg.speed(store.state[i]);
                    store.vel[i] = with_speed(reflect(store.vel[i], n), -n, speed);
                }
                if store.vel[j].dot(n) < 0.0 {
                    let speed = cfg.speed(store.state[j]);
                    store.vel[j] = with_speed(reflect(store.vel[j], n), n, speed);
                }
            }
        }

        if !moved {
            return;
        }
    }

    // Budget spent; tally whatever overlap is left.
    let grid = SpatialGrid::build(&store.pos, min_sep);
    for i in 0..store.count {
        scratch.clear();
        grid.neighbors_into(store.pos[i], scratch);
        for &j in scratch.iter() {
            let j = j as usize;
            if j <= i {
                continue;
            }
            if store.pos[i].distance(store.pos[j]) < min_sep - SEPARATION_SLACK {
                metrics.residual_separation_pairs += 1;
            }
        }
    }
}

/// Soft crowd repulsion: the pre-move nudge away from nearby agents.
///
/// Exploring agents yield to returning ones (2x push), returning agents
/// barge through explorers (0.5x); same-state pairs push symmetrically.
pub(crate) fn crowd_push(
    i:       usize,
    store:   &AgentStore,
    grid:    &SpatialGrid,
    scratch: &mut Vec<u32>,
    cfg:     &SwarmConfig,
) -> Vec2 {
    let radius = cfg.repulsion_radius;
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    let pos = store.pos[i];
    scratch.clear();
    grid.neighbors_into(pos, scratch);

    let mut push = Vec2::ZERO;
    for &j in scratch.iter() {
        let j = j as usize;
        if j == i {
            continue;
        }
        let delta = pos - store.pos[j];
        let dist = delta.length();
        if dist >= radius || dist <= f32::EPSILON {
            continue;
        }
        let falloff = (radius - dist) / radius;
        let factor = yield_factor(store.state[i], store.state[j]);
        push += (delta / dist) * falloff * factor;
    }
    push
}

fn yield_factor(me: crate::AgentState, other: crate::AgentState) -> f32 {
    use crate::AgentState::{Exploring, Returning};
    match (me, other) {
        (Exploring, Returning) => 2.0,
        (Returning, Exploring) => 0.5,
        _ => 1.0,
    }
}
