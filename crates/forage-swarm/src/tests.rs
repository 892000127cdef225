use forage_core::{FoodSource, Obstacle};
use forage_field::{PheromoneConfig, PheromoneField};
use forage_terrain::FlatTerrain;
use glam::Vec2;

use crate::collision::{resolve_obstacles, separation_pass};
use crate::grid::SpatialGrid;
use crate::steering::nearest_food;
use crate::{AgentState, Swarm, SwarmConfig, SwarmMetrics};

const DT: f32 = 1.0 / 60.0;

fn small_config(agent_count: usize) -> SwarmConfig {
    SwarmConfig {
        agent_count,
        ..SwarmConfig::default()
    }
}

fn world() -> (FlatTerrain, PheromoneField, PheromoneConfig) {
    (
        FlatTerrain::default(),
        PheromoneField::new(64),
        PheromoneConfig::default(),
    )
}

/// Run `ticks` full update cycles (field decay + swarm step) with no
/// obstacles against the given food list.
fn run(
    swarm: &mut Swarm,
    field: &mut PheromoneField,
    trail_cfg: &PheromoneConfig,
    foods: &mut [FoodSource],
    ticks: usize,
) -> Vec<crate::FoodEvent> {
    let terrain = FlatTerrain::default();
    let mut events = Vec::new();
    for _ in 0..ticks {
        field.update(trail_cfg);
        events.extend(swarm.update(DT, &terrain, field, trail_cfg, &[], foods));
    }
    events
}

mod grid {
    use super::*;

    #[test]
    fn finds_neighbors_within_cell_radius() {
        let positions = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.4, 0.0),
            Vec2::new(5.0, 5.0),
        ];
        let grid = SpatialGrid::build(&positions, 0.6);
        let mut out = Vec::new();
        grid.neighbors_into(positions[0], &mut out);
        assert!(out.contains(&0));
        assert!(out.contains(&1));
        assert!(!out.contains(&2));
    }

    #[test]
    fn far_agents_land_in_distinct_cells() {
        let positions: Vec<Vec2> = (0..10).map(|i| Vec2::new(i as f32 * 10.0, 0.0)).collect();
        let grid = SpatialGrid::build(&positions, 1.0);
        assert_eq!(grid.occupied_cells(), 10);
    }

    #[test]
    fn neighbors_into_does_not_clear_output() {
        let positions = vec![Vec2::ZERO];
        let grid = SpatialGrid::build(&positions, 1.0);
        let mut out = vec![99];
        grid.neighbors_into(Vec2::ZERO, &mut out);
        assert_eq!(out[0], 99);
        assert!(out.contains(&0));
    }
}

mod steering {
    use super::*;

    #[test]
    fn nearest_food_prefers_closest_stocked_source() {
        let foods = vec![
            FoodSource { position: Vec2::new(3.0, 0.0), remaining: 5 },
            FoodSource { position: Vec2::new(1.0, 0.0), remaining: 0 },
            FoodSource { position: Vec2::new(2.0, 0.0), remaining: 1 },
        ];
        let found = nearest_food(&foods, Vec2::ZERO, 10.0);
        let (id, dist) = found.unwrap();
        // The 1.0-away source is empty, so the 2.0-away one wins.
        assert_eq!(id.index(), 2);
        assert!((dist - 2.0).abs() < 1e-6);
    }

    #[test]
    fn nearest_food_respects_radius() {
        let foods = vec![FoodSource { position: Vec2::new(5.0, 0.0), remaining: 5 }];
        assert!(nearest_food(&foods, Vec2::ZERO, 4.0).is_none());
    }

    #[test]
    fn turn_rate_is_clamped_per_tick() {
        // One agent heading +X with the only attractor directly behind it.
        // After a single steer the heading may rotate by at most the
        // exploring turn limit.
        let cfg = SwarmConfig {
            agent_count: 1,
            heading_jitter: 0.0,
            ..SwarmConfig::default()
        };
        let mut swarm = Swarm::new(cfg.clone(), 7);
        let (terrain, mut field, trail_cfg) = world();

        let before = swarm.velocities()[0].normalize();
        swarm.update(DT, &terrain, &mut field, &trail_cfg, &[], &mut []);
        let after = swarm.velocities()[0].normalize();

        let angle = before.perp_dot(after).atan2(before.dot(after)).abs();
        assert!(
            angle <= cfg.max_turn_exploring + 1e-4,
            "turned {angle} rad in one tick"
        );
    }

    #[test]
    fn velocity_magnitude_matches_state_speed() {
        let cfg = small_config(32);
        let mut swarm = Swarm::new(cfg.clone(), 11);
        let (_, mut field, trail_cfg) = world();
        run(&mut swarm, &mut field, &trail_cfg, &mut [], 20);

        for (vel, state) in swarm.velocities().iter().zip(swarm.states()) {
            let speed = cfg.speed(*state);
            assert!(
                (vel.length() - speed).abs() < 1e-3,
                "speed {} for {:?}",
                vel.length(),
                state
            );
        }
    }
}

mod collision {
    use super::*;

    #[test]
    fn obstacle_pushout_lands_on_rim() {
        let obstacles = [Obstacle { center: Vec2::ZERO, radius: 2.0, top: 1.0 }];
        let mut pos = Vec2::new(0.5, 0.0);
        let mut vel = Vec2::new(-6.0, 0.0);
        let exhausted = resolve_obstacles(&mut pos, &mut vel, 6.0, &obstacles);

        assert!(!exhausted);
        assert!((pos.length() - 2.0).abs() < 1e-4);
        // Velocity was inward; it must have reflected and kept its speed.
        assert!(vel.x > 0.0);
        assert!((vel.length() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn outward_velocity_survives_pushout() {
        let obstacles = [Obstacle { center: Vec2::ZERO, radius: 2.0, top: 1.0 }];
        let mut pos = Vec2::new(1.0, 0.0);
        let mut vel = Vec2::new(6.0, 0.0);
        resolve_obstacles(&mut pos, &mut vel, 6.0, &obstacles);
        assert_eq!(vel, Vec2::new(6.0, 0.0));
    }

    #[test]
    fn separation_spreads_overlapping_pair() {
        let cfg = small_config(2);
        let mut store = crate::AgentStore::spawn(&cfg, 3).0;
        store.pos[0] = Vec2::new(0.0, 0.0);
        store.pos[1] = Vec2::new(0.1, 0.0);
        let mut scratch = Vec::new();
        let mut metrics = SwarmMetrics::default();
        separation_pass(&mut store, &cfg, &mut scratch, &mut metrics);

        let dist = store.pos[0].distance(store.pos[1]);
        assert!(
            dist >= cfg.min_separation - 1e-3,
            "pair still {dist} apart"
        );
        assert!(metrics.separation_iterations >= 1);
        assert_eq!(metrics.residual_separation_pairs, 0);
    }

    #[test]
    fn crowded_cluster_leaves_residuals_in_metrics_not_panics() {
        // 50 agents on (almost) one point cannot fully separate in three
        // iterations; the overflow must land in the residual counter.
        let cfg = small_config(50);
        let mut store = crate::AgentStore::spawn(&cfg, 9).0;
        for (i, p) in store.pos.iter_mut().enumerate() {
            *p = Vec2::new(i as f32 * 1e-4, 0.0);
        }
        let mut scratch = Vec::new();
        let mut metrics = SwarmMetrics::default();
        separation_pass(&mut store, &cfg, &mut scratch, &mut metrics);
        assert_eq!(metrics.separation_iterations, 3);
        assert!(metrics.residual_separation_pairs > 0);
    }
}

mod swarm {
    use super::*;

    #[test]
    fn spawns_exploring_around_nest() {
        let cfg = small_config(64);
        let swarm = Swarm::new(cfg.clone(), 42);
        assert_eq!(swarm.agent_count(), 64);
        for (pos, state) in swarm.positions().iter().zip(swarm.states()) {
            assert!(pos.distance(cfg.nest_position) <= cfg.spawn_radius + 1e-6);
            assert_eq!(*state, AgentState::Exploring);
        }
    }

    #[test]
    fn same_seed_same_trajectory() {
        let cfg = small_config(40);
        let mut a = Swarm::new(cfg.clone(), 1234);
        let mut b = Swarm::new(cfg, 1234);
        let (_, mut field_a, trail_cfg) = world();
        let mut field_b = PheromoneField::new(64);
        let mut foods_a = vec![FoodSource { position: Vec2::new(8.0, 0.0), remaining: 10 }];
        let mut foods_b = foods_a.clone();

        run(&mut a, &mut field_a, &trail_cfg, &mut foods_a, 120);
        run(&mut b, &mut field_b, &trail_cfg, &mut foods_b, 120);

        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.states(), b.states());
        assert_eq!(foods_a, foods_b);
    }

    #[test]
    fn agent_at_food_picks_up_exactly_one_unit() {
        let cfg = small_config(1);
        let mut swarm = Swarm::new(cfg.clone(), 5);
        let (terrain, mut field, trail_cfg) = world();
        // Park the food right on top of the only agent.
        let mut foods = vec![FoodSource {
            position: swarm.positions()[0],
            remaining: 3,
        }];

        let events = swarm.update(DT, &terrain, &mut field, &trail_cfg, &[], &mut foods);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].remaining, 2);
        assert_eq!(foods[0].remaining, 2);
        assert_eq!(swarm.states()[0], AgentState::Returning);
        assert_eq!(swarm.metrics().food_pickups, 1);
    }

    #[test]
    fn last_unit_goes_to_lowest_index() {
        // Two agents both standing on a one-unit source: the lower index
        // wins the unit, the other must stay exploring.
        let cfg = SwarmConfig {
            agent_count: 2,
            spawn_radius: 0.5,
            min_separation: 0.0,
            repulsion_radius: 0.0,
            ..SwarmConfig::default()
        };
        let mut swarm = Swarm::new(cfg, 8);
        let (terrain, mut field, trail_cfg) = world();
        let mut foods = vec![FoodSource {
            position: Vec2::ZERO,
            remaining: 1,
        }];

        let events = swarm.update(DT, &terrain, &mut field, &trail_cfg, &[], &mut foods);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].agent.index(), 0);
        assert_eq!(events[0].remaining, 0);
        assert_eq!(foods[0].remaining, 0);
        assert_eq!(swarm.states()[0], AgentState::Returning);
        assert_eq!(swarm.states()[1], AgentState::Exploring);
    }

    #[test]
    fn returning_agent_flips_at_nest_in_one_tick() {
        // Tight spawn keeps the agent well inside the nest radius for both
        // ticks.
        let cfg = SwarmConfig {
            agent_count: 1,
            spawn_radius: 0.5,
            ..SwarmConfig::default()
        };
        let mut swarm = Swarm::new(cfg.clone(), 13);
        let (terrain, mut field, trail_cfg) = world();
        // Hand the agent food far away so it returns, then let it walk home.
        let mut foods = vec![FoodSource {
            position: swarm.positions()[0],
            remaining: 5,
        }];
        swarm.update(DT, &terrain, &mut field, &trail_cfg, &[], &mut foods);
        assert_eq!(swarm.states()[0], AgentState::Returning);

        // Spawned inside the nest radius, the very next tick must flip it.
        swarm.update(DT, &terrain, &mut field, &trail_cfg, &[], &mut foods);
        assert_eq!(swarm.states()[0], AgentState::Exploring);
    }

    #[test]
    fn oversized_dt_is_clamped() {
        // Collision off so the only movement is the integration step itself.
        let cfg = SwarmConfig {
            agent_count: 16,
            min_separation: 0.0,
            repulsion_radius: 0.0,
            ..SwarmConfig::default()
        };
        let mut swarm = Swarm::new(cfg.clone(), 21);
        let (terrain, mut field, trail_cfg) = world();
        let before: Vec<Vec2> = swarm.positions().to_vec();

        // A ten-second stall must advance agents by at most
        // speed * max_step_secs.
        swarm.update(10.0, &terrain, &mut field, &trail_cfg, &[], &mut []);

        let max_step = cfg.speed_exploring * cfg.max_step_secs + 1e-4;
        for (a, b) in before.iter().zip(swarm.positions()) {
            assert!(a.distance(*b) <= max_step, "moved {}", a.distance(*b));
        }
    }

    #[test]
    fn agents_stay_inside_world_bounds() {
        let cfg = small_config(100);
        let mut swarm = Swarm::new(cfg.clone(), 31);
        let (_, mut field, trail_cfg) = world();
        run(&mut swarm, &mut field, &trail_cfg, &mut [], 1200);

        // Reflection plus the margin keeps everyone within the half-extent
        // with a little slack for the single tick spent crossing the margin.
        let bound = cfg.world_half_extent + 1.0;
        for pos in swarm.positions() {
            assert!(pos.x.abs() <= bound && pos.y.abs() <= bound, "escaped to {pos}");
        }
    }

    #[test]
    fn flat_ground_elevation_is_ride_height() {
        let cfg = small_config(4);
        let mut swarm = Swarm::new(cfg.clone(), 17);
        let (terrain, mut field, trail_cfg) = world();
        swarm.update(DT, &terrain, &mut field, &trail_cfg, &[], &mut []);
        for y in swarm.elevations() {
            assert!((y - cfg.ride_height).abs() < 1e-4);
        }
    }

    #[test]
    fn trapped_agent_rests_on_obstacle_top() {
        // Two overlapping footprints ping-pong the push-out until the pass
        // budget runs out; the agent ends the tick inside one of them and
        // must rest on its top instead of the terrain.
        let cfg = SwarmConfig {
            agent_count: 1,
            min_separation: 0.0,
            repulsion_radius: 0.0,
            ..SwarmConfig::default()
        };
        let mut swarm = Swarm::new(cfg.clone(), 17);
        swarm.store.pos[0] = Vec2::ZERO;
        let (terrain, mut field, trail_cfg) = world();
        let obstacles = [
            Obstacle::new(Vec2::new(-1.5, 0.0), 2.0, 3.0),
            Obstacle::new(Vec2::new(1.5, 0.0), 2.0, 3.0),
        ];

        swarm.update(0.0, &terrain, &mut field, &trail_cfg, &obstacles, &mut []);

        assert_eq!(swarm.metrics().obstacle_budget_exhausted, 1);
        let pos = swarm.positions()[0];
        assert!(obstacles.iter().any(|o| o.contains(pos)));
        assert!((swarm.elevations()[0] - (3.0 + cfg.ride_height)).abs() < 1e-4);
    }

    #[test]
    fn deposits_reach_the_field_each_tick() {
        let cfg = small_config(8);
        let mut swarm = Swarm::new(cfg, 2);
        let (_, mut field, trail_cfg) = world();
        run(&mut swarm, &mut field, &trail_cfg, &mut [], 5);

        // Exploring agents lay home trail wherever they stand; the last
        // deposit of the run has not decayed yet.
        let strength = field.sample(swarm.positions()[0], forage_field::Channel::Home);
        assert!(strength > 0.0);
    }
}
