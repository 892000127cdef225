//! Per-agent steering: the side-effect-free "intent" half of the tick.
//!
//! [`steer_agent`] reads the start-of-tick snapshot (agent arrays, pheromone
//! field, obstacle and food lists) plus its own RNG and produces a [`Steer`]
//! record.  It writes nothing, so the swarm may run it for all agents in
//! parallel; the sequential apply phase in `swarm.rs` consumes the records
//! in ascending agent order for determinism.

use forage_core::{AgentRng, FoodId, FoodSource, Obstacle};
use forage_field::Channel;
use glam::Vec2;

use crate::store::{AgentState, AgentStore};
use crate::SwarmConfig;

// ── Steering constants ────────────────────────────────────────────────────────

/// Momentum is an exponential blend: keep 0.7 of the old vector, gain 0.3 of
/// the new desired direction each tick.
const MOMENTUM_KEEP: f32 = 0.7;
const MOMENTUM_GAIN: f32 = 0.3;

/// Share of the final steering direction taken from momentum, per state.
/// Exploring agents lean on momentum slightly more, smoothing their wander.
const MOMENTUM_MIX_RETURNING: f32 = 0.4;
const MOMENTUM_MIX_EXPLORING: f32 = 0.5;

/// Antenna strengths are capped before weighting so a saturated trail cannot
/// drown out every other steering input.
const ANTENNA_STRENGTH_CAP: f32 = 2.0;

/// A sensed home trail is only trusted over the direct nest heuristic when
/// its attenuated strength clears this bar.
const HOME_SENSE_MIN: f32 = 0.5;

/// Direct food attraction gains this multiplier when the source is close
/// (inside 30% of visual range) — the final dash ignores distractions.
const FOOD_CLOSE_BOOST: f32 = 1.5;

/// Scale on the obstacle repulsion term added to every branch.
const OBSTACLE_PUSH: f32 = 1.5;

// ── Records ───────────────────────────────────────────────────────────────────

/// Read-only context shared by every agent's steering call this tick.
pub(crate) struct SteerCtx<'a> {
    pub cfg:       &'a SwarmConfig,
    pub trail_cfg: &'a forage_field::PheromoneConfig,
    pub field:     &'a forage_field::PheromoneField,
    pub obstacles: &'a [Obstacle],
    pub foods:     &'a [FoodSource],
}

/// One agent's intent for the tick: the state it wants to be in, the
/// velocity it wants to move with, the momentum it carries forward, and the
/// food source it arrived at (or `FoodId::INVALID`).
pub(crate) struct Steer {
    pub vel:          Vec2,
    pub momentum:     Vec2,
    pub state:        AgentState,
    pub food_arrival: FoodId,
}

// ── Steering pipeline ─────────────────────────────────────────────────────────

/// Compute agent `i`'s intent from the start-of-tick snapshot.
pub(crate) fn steer_agent(
    i:     usize,
    store: &AgentStore,
    ctx:   &SteerCtx<'_>,
    rng:   &mut AgentRng,
) -> Steer {
    let cfg = ctx.cfg;
    let pos = store.pos[i];
    let mut vel = store.vel[i];

    // ── 1. Boundary reflection ────────────────────────────────────────────
    //
    // Only flips a component that is still carrying the agent outward, so a
    // just-reflected agent doesn't flap at the margin.
    let limit = cfg.world_half_extent - cfg.boundary_margin;
    if pos.x.abs() > limit && pos.x * vel.x > 0.0 {
        vel.x = -vel.x;
    }
    if pos.y.abs() > limit && pos.y * vel.y > 0.0 {
        vel.y = -vel.y;
    }

    let heading = vel.try_normalize().unwrap_or_else(|| rng.unit_vec2());

    // ── 2. State transition ───────────────────────────────────────────────
    let to_nest = cfg.nest_position - pos;
    let nest_dist = to_nest.length();

    let mut state = store.state[i];
    let mut food_arrival = FoodId::INVALID;
    match state {
        AgentState::Returning if nest_dist < cfg.nest_radius => {
            state = AgentState::Exploring;
        }
        AgentState::Exploring => {
            // Nearest stocked source only — arrival at a cluster of sources
            // still fires exactly one pickup.
            if let Some((id, _)) = nearest_food(ctx.foods, pos, cfg.food_radius) {
                state = AgentState::Returning;
                food_arrival = id;
            }
        }
        _ => {}
    }

    // ── 3. Desired-direction synthesis ────────────────────────────────────
    let nest_dir = to_nest.try_normalize().unwrap_or(heading);
    let desired = match state {
        AgentState::Returning => {
            steer_returning(pos, heading, nest_dir, nest_dist, ctx, rng)
        }
        AgentState::Exploring => {
            steer_exploring(pos, heading, store.momentum[i], ctx, rng)
        }
    };
    let desired = (desired + obstacle_repulsion(ctx.obstacles, pos, cfg.obstacle_margin))
        .try_normalize()
        .unwrap_or(heading);

    // ── 4. Momentum blend ─────────────────────────────────────────────────
    let momentum = store.momentum[i] * MOMENTUM_KEEP + desired * MOMENTUM_GAIN;
    let mix = match state {
        AgentState::Returning => MOMENTUM_MIX_RETURNING,
        AgentState::Exploring => MOMENTUM_MIX_EXPLORING,
    };
    let momentum_dir = momentum.try_normalize().unwrap_or(desired);
    let target = (desired * (1.0 - mix) + momentum_dir * mix)
        .try_normalize()
        .unwrap_or(desired);

    // ── 5. Turn-rate clamp at fixed state speed ───────────────────────────
    //
    // Speed is never ramped; only the heading is integrated.  The signed
    // angle from the current heading to the target is clamped per state.
    let turn = heading.perp_dot(target).atan2(heading.dot(target));
    let max_turn = cfg.max_turn(state);
    let new_heading = Vec2::from_angle(turn.clamp(-max_turn, max_turn)).rotate(heading);
    let vel = new_heading * cfg.speed(state);

    Steer { vel, momentum, state, food_arrival }
}

// ── Per-state branches ────────────────────────────────────────────────────────

fn steer_returning(
    pos:       Vec2,
    heading:   Vec2,
    nest_dir:  Vec2,
    nest_dist: f32,
    ctx:       &SteerCtx<'_>,
    rng:       &mut AgentRng,
) -> Vec2 {
    let cfg = ctx.cfg;

    // Close to home: the direct vector dominates, ramping to fully direct
    // as the distance shrinks.  No point consulting the field here.
    if nest_dist < cfg.close_range {
        let closeness = 1.0 - nest_dist / cfg.close_range;
        return ramp_blend(nest_dir, rng.unit_vec2(), closeness);
    }

    // Far from home: trust a strong sensed home trail, weighted by capped
    // strength and blended with the direct bearing.
    if let Some(r) =
        ctx.field
            .antennae_direction(ctx.trail_cfg, pos, heading, Channel::Home, rng)
    {
        if r.strength > HOME_SENSE_MIN {
            let w = r.strength.min(ANTENNA_STRENGTH_CAP);
            return (r.direction * w + nest_dir)
                .try_normalize()
                .unwrap_or(nest_dir);
        }
    }

    // No usable trail: half direct, half wander.
    ramp_blend(nest_dir, rng.unit_vec2(), 0.0)
}

fn steer_exploring(
    pos:      Vec2,
    heading:  Vec2,
    momentum: Vec2,
    ctx:      &SteerCtx<'_>,
    rng:      &mut AgentRng,
) -> Vec2 {
    let cfg = ctx.cfg;

    // Food in sight: head straight for the nearest stocked source, with the
    // same closeness ramp as the homing branch and a dash boost when near.
    if let Some((id, dist)) = nearest_food(ctx.foods, pos, cfg.visual_range) {
        let food_dir = (ctx.foods[id.index()].position - pos)
            .try_normalize()
            .unwrap_or(heading);
        let closeness = 1.0 - dist / cfg.visual_range;
        let direct = if dist < cfg.visual_range * 0.3 {
            food_dir * FOOD_CLOSE_BOOST
        } else {
            food_dir
        };
        return ramp_blend(direct, rng.unit_vec2(), closeness);
    }

    let momentum_dir = momentum.try_normalize().unwrap_or(heading);

    // No food visible: follow a sensed food trail outward if there is one.
    if let Some(r) =
        ctx.field
            .antennae_direction(ctx.trail_cfg, pos, heading, Channel::Food, rng)
    {
        let w = r.strength.min(ANTENNA_STRENGTH_CAP);
        return (r.direction * w + rng.unit_vec2() * 0.3 + momentum_dir * 0.3)
            .try_normalize()
            .unwrap_or(r.direction);
    }

    // Nothing sensed: random walk smoothed by momentum.
    let wander = Vec2::from_angle(rng.jitter_angle(cfg.heading_jitter)).rotate(heading);
    (wander * 0.5 + momentum_dir * 0.5)
        .try_normalize()
        .unwrap_or(wander)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Blend a (possibly boosted) direct attraction vector with jitter.
///
/// `closeness` 0 → an even blend; 1 → fully direct.  Always unit length.
fn ramp_blend(direct: Vec2, jitter: Vec2, closeness: f32) -> Vec2 {
    let w = 0.5 + 0.5 * closeness.clamp(0.0, 1.0);
    (direct * w + jitter * (1.0 - w))
        .try_normalize()
        .unwrap_or_else(|| direct.try_normalize().unwrap_or(Vec2::X))
}

/// Sum of repulsion away from every obstacle whose safety band contains
/// `pos`.  Zero outside all bands; grows linearly with band penetration.
fn obstacle_repulsion(obstacles: &[Obstacle], pos: Vec2, margin: f32) -> Vec2 {
    let mut push = Vec2::ZERO;
    for obs in obstacles {
        let pen = obs.penetration(pos, margin);
        if pen <= 0.0 {
            continue;
        }
        let away = (pos - obs.center).try_normalize().unwrap_or(Vec2::X);
        push += away * pen * OBSTACLE_PUSH;
    }
    push
}

/// The nearest food source with stock inside `radius`, with its distance.
///
/// Full min-scan rather than first match, so the result is independent of
/// food list ordering.
pub(crate) fn nearest_food(
    foods:  &[FoodSource],
    pos:    Vec2,
    radius: f32,
) -> Option<(FoodId, f32)> {
    let mut best: Option<(FoodId, f32)> = None;
    for (i, f) in foods.iter().enumerate() {
        if !f.has_stock() {
            continue;
        }
        let d = f.position.distance(pos);
        if d >= radius {
            continue;
        }
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((FoodId(i as u16), d));
        }
    }
    best
}
