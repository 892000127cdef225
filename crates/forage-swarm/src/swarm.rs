//! The swarm tick driver — owns agent storage and runs the four-phase
//! update documented on the crate root.

use forage_core::{AgentId, FoodId, FoodSource, Obstacle};
use forage_field::{PheromoneConfig, PheromoneField, TrailDeposit};
use forage_terrain::TerrainSource;
use glam::Vec2;

use crate::collision::{crowd_push, resolve_obstacles, separation_pass};
use crate::grid::SpatialGrid;
use crate::metrics::SwarmMetrics;
use crate::steering::{steer_agent, Steer, SteerCtx};
use crate::store::{AgentRngs, AgentState, AgentStore};
use crate::SwarmConfig;

/// One food pickup, reported the tick it happens.
///
/// `remaining` is the source's stock after this pickup; zero means this
/// agent took the last unit and the source is now depleted.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoodEvent {
    pub food: FoodId,
    pub agent: AgentId,
    pub remaining: u32,
}

/// All agents plus the scratch buffers the tick reuses.
pub struct Swarm {
    config: SwarmConfig,
    pub(crate) store: AgentStore,
    rngs: AgentRngs,
    metrics: SwarmMetrics,

    // Tick scratch, allocated once.
    steers: Vec<Steer>,
    deposits: Vec<TrailDeposit>,
    scratch: Vec<u32>,
}

impl Swarm {
    /// Spawn `config.agent_count` agents around the nest, all exploring.
    pub fn new(config: SwarmConfig, global_seed: u64) -> Self {
        let (store, rngs) = AgentStore::spawn(&config, global_seed);
        let count = store.count;
        Self {
            config,
            store,
            rngs,
            metrics: SwarmMetrics::default(),
            steers: Vec::with_capacity(count),
            deposits: Vec::with_capacity(count),
            scratch: Vec::new(),
        }
    }

    // ── Snapshot accessors ────────────────────────────────────────────────

    pub fn agent_count(&self) -> usize {
        self.store.count
    }

    /// Ground-plane positions, indexed by `AgentId`.
    pub fn positions(&self) -> &[Vec2] {
        &self.store.pos
    }

    /// Derived vertical coordinates, valid after the first tick.
    pub fn elevations(&self) -> &[f32] {
        &self.store.y
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.store.vel
    }

    pub fn states(&self) -> &[AgentState] {
        &self.store.state
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn metrics(&self) -> &SwarmMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut SwarmMetrics {
        &mut self.metrics
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance every agent by one step of at most `config.max_step_secs`.
    ///
    /// Mutates `foods` (pickups) and `field` (end-of-tick deposits); the
    /// caller runs `field.update()` before this, per the field's tick
    /// ordering contract.  Returns this tick's pickup events in agent order.
    pub fn update<T: TerrainSource>(
        &mut self,
        dt: f32,
        terrain: &T,
        field: &mut PheromoneField,
        trail_cfg: &PheromoneConfig,
        obstacles: &[Obstacle],
        foods: &mut [FoodSource],
    ) -> Vec<FoodEvent> {
        let cfg = &self.config;
        let dt = dt.clamp(0.0, cfg.max_step_secs);

        // ── ① Steer: read-only intent, one record per agent ───────────────
        let ctx = SteerCtx {
            cfg,
            trail_cfg,
            field: &*field,
            obstacles,
            foods: &*foods,
        };
        let store = &self.store;
        let steers = &mut self.steers;
        let rngs = &mut self.rngs.inner;
        steers.clear();

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            steers.par_extend(
                rngs.par_iter_mut()
                    .enumerate()
                    .map(|(i, rng)| steer_agent(i, store, &ctx, rng)),
            );
        }
        #[cfg(not(feature = "parallel"))]
        {
            steers.extend(
                rngs.iter_mut()
                    .enumerate()
                    .map(|(i, rng)| steer_agent(i, store, &ctx, rng)),
            );
        }

        // ── ② Apply: sequential, ascending index ──────────────────────────
        //
        // Food stock is decremented here, not in the steer phase, so two
        // agents arriving at a one-unit source the same tick race in a
        // deterministic order: the lower index wins, the loser reverts to
        // exploring.
        let crowd_grid = SpatialGrid::build(&self.store.pos, cfg.repulsion_radius.max(1e-3));
        let mut events = Vec::new();
        for i in 0..self.store.count {
            let steer = &self.steers[i];
            let mut state = steer.state;
            let mut vel = steer.vel;

            if steer.food_arrival != FoodId::INVALID {
                let food = &mut foods[steer.food_arrival.index()];
                if food.take_one() {
                    self.metrics.food_pickups += 1;
                    events.push(FoodEvent {
                        food: steer.food_arrival,
                        agent: AgentId(i as u32),
                        remaining: food.remaining,
                    });
                } else {
                    state = AgentState::Exploring;
                }
            }

            let push = crowd_push(i, &self.store, &crowd_grid, &mut self.scratch, cfg);
            let dir = (vel.try_normalize().unwrap_or(Vec2::X) + push)
                .try_normalize()
                .unwrap_or(Vec2::X);
            vel = dir * cfg.speed(state);

            self.store.state[i] = state;
            self.store.vel[i] = vel;
            self.store.momentum[i] = steer.momentum;
        }

        // Integrate, then push each agent out of any obstacle it entered.
        let mut budget_exhausted = false;
        for i in 0..self.store.count {
            let mut pos = self.store.pos[i] + self.store.vel[i] * dt;
            let mut vel = self.store.vel[i];
            let speed = cfg.speed(self.store.state[i]);
            if resolve_obstacles(&mut pos, &mut vel, speed, obstacles) {
                budget_exhausted = true;
            }
            self.store.pos[i] = pos;
            self.store.vel[i] = vel;
        }
        if budget_exhausted {
            self.metrics.obstacle_budget_exhausted += 1;
        }

        // ── ③ Separate: global pairwise relaxation ────────────────────────
        separation_pass(&mut self.store, cfg, &mut self.scratch, &mut self.metrics);

        // ── ④ Settle: vertical placement and trail deposit at the final
        //    ground-plane position ──────────────────────────────────────────
        self.deposits.clear();
        for i in 0..self.store.count {
            let pos = self.store.pos[i];
            let mut y = terrain.height(pos.x, pos.y) + cfg.ride_height;
            for obs in obstacles {
                if obs.contains(pos) {
                    y = y.max(obs.top + cfg.ride_height);
                }
            }
            self.store.y[i] = y;

            let (search, ret) = match self.store.state[i] {
                AgentState::Exploring => (1.0, 0.0),
                AgentState::Returning => (0.0, 1.0),
            };
            self.deposits.push(TrailDeposit {
                position: pos,
                search_amount: search,
                return_amount: ret,
            });
        }
        field.deposit(trail_cfg, &self.deposits);

        self.metrics.ticks += 1;
        events
    }
}
