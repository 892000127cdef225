//! Unit tests for the pheromone field.

use forage_core::{AgentId, AgentRng};
use glam::Vec2;

use crate::{Channel, PheromoneConfig, PheromoneField, TrailDeposit, TRAIL_MAX};

fn cfg() -> PheromoneConfig {
    PheromoneConfig::default()
}

/// A config with unit deposit rates so deposited amounts land unscaled.
fn unit_cfg() -> PheromoneConfig {
    PheromoneConfig {
        deposit_rate_search: 1.0,
        deposit_rate_return: 1.0,
        ..PheromoneConfig::default()
    }
}

fn deposit_at(position: Vec2, search: f32, ret: f32) -> TrailDeposit {
    TrailDeposit {
        position,
        search_amount: search,
        return_amount: ret,
    }
}

/// Every cell of both channels, via public sampling at cell centres.
fn all_values(field: &PheromoneField) -> Vec<(f32, f32)> {
    let s = field.resolution();
    let mut vals = Vec::with_capacity(s * s);
    for cz in 0..s {
        for cx in 0..s {
            let c = field.cell_center(cx, cz);
            vals.push((field.sample(c, Channel::Home), field.sample(c, Channel::Food)));
        }
    }
    vals
}

#[cfg(test)]
mod invariants {
    use super::*;

    #[test]
    fn channels_stay_bounded_under_heavy_deposits() {
        let mut field = PheromoneField::new(32);
        let cfg = unit_cfg();
        let hot = Vec2::new(10.0, -5.0);
        for _ in 0..50 {
            field.deposit(&cfg, &[deposit_at(hot, 100.0, 100.0)]);
            field.update(&cfg);
        }
        for (home, food) in all_values(&field) {
            assert!((0.0..=TRAIL_MAX).contains(&home));
            assert!((0.0..=TRAIL_MAX).contains(&food));
        }
    }

    #[test]
    fn empty_field_converges_to_exact_zero() {
        let mut field = PheromoneField::new(32);
        let cfg = PheromoneConfig {
            evaporation: 0.05,
            ..unit_cfg()
        };
        field.deposit(&cfg, &[
            deposit_at(Vec2::ZERO, 50.0, 50.0),
            deposit_at(Vec2::new(20.0, 20.0), 50.0, 0.0),
        ]);
        for _ in 0..400 {
            field.update(&cfg);
        }
        for (home, food) in all_values(&field) {
            assert_eq!(home, 0.0, "zero-snap must drive home channel to true zero");
            assert_eq!(food, 0.0, "zero-snap must drive food channel to true zero");
        }
    }

    #[test]
    fn deposit_after_update_is_not_decayed() {
        let mut field = PheromoneField::new(50);
        let cfg = unit_cfg();
        field.update(&cfg);
        field.deposit(&cfg, &[deposit_at(Vec2::ZERO, 1.0, 0.0)]);
        // Fresh deposit sits on top of the already-decayed field at full
        // strength; only the next update() decays it.
        assert_eq!(field.sample(Vec2::ZERO, Channel::Home), 1.0);
    }
}

#[cfg(test)]
mod deposits {
    use super::*;

    #[test]
    fn order_independent() {
        let a = deposit_at(Vec2::new(3.0, 3.0), 1.0, 0.5);
        let b = deposit_at(Vec2::new(3.5, 3.2), 0.4, 1.0);

        let cfg = cfg();
        let mut ab = PheromoneField::new(64);
        ab.deposit(&cfg, &[a, b]);
        let mut ba = PheromoneField::new(64);
        ba.deposit(&cfg, &[b, a]);

        for ((h1, f1), (h2, f2)) in all_values(&ab).into_iter().zip(all_values(&ba)) {
            assert!((h1 - h2).abs() < 1e-6);
            assert!((f1 - f2).abs() < 1e-6);
        }
    }

    #[test]
    fn spreads_to_neighbors_at_lower_strength() {
        let mut field = PheromoneField::new(100); // 1-unit cells
        let cfg = unit_cfg();
        let p = Vec2::new(10.5, 10.5);
        field.deposit(&cfg, &[deposit_at(p, 1.0, 0.0)]);

        let center = field.sample(p, Channel::Home);
        let cardinal = field.sample(p + Vec2::new(1.0, 0.0), Channel::Home);
        let diagonal = field.sample(p + Vec2::new(1.0, 1.0), Channel::Home);
        let far = field.sample(p + Vec2::new(3.0, 0.0), Channel::Home);

        assert_eq!(center, 1.0);
        assert!(cardinal > 0.0 && cardinal < center);
        assert!(diagonal > 0.0 && diagonal < cardinal, "closer neighbors get more");
        assert_eq!(far, 0.0);
    }

    #[test]
    fn channels_are_independent() {
        let mut field = PheromoneField::new(64);
        let cfg = unit_cfg();
        field.deposit(&cfg, &[deposit_at(Vec2::ZERO, 1.0, 0.0)]);
        assert!(field.sample(Vec2::ZERO, Channel::Home) > 0.0);
        assert_eq!(field.sample(Vec2::ZERO, Channel::Food), 0.0);
    }

    #[test]
    fn edge_deposits_do_not_panic() {
        let mut field = PheromoneField::new(16);
        let cfg = unit_cfg();
        // Corner of the world and beyond it: clamped, never out of bounds.
        field.deposit(&cfg, &[
            deposit_at(Vec2::new(-50.0, -50.0), 1.0, 1.0),
            deposit_at(Vec2::new(999.0, -999.0), 1.0, 1.0),
        ]);
        assert!(field.sample(Vec2::new(-50.0, -50.0), Channel::Home) > 0.0);
    }
}

#[cfg(test)]
mod sensing {
    use super::*;

    #[test]
    fn gradient_is_none_on_uniform_field() {
        let mut field = PheromoneField::new(32);
        let cfg = unit_cfg();
        // Uniform non-zero field: every cell gets the same deposit.
        let s = field.resolution();
        let mut batch = Vec::new();
        for cz in 0..s {
            for cx in 0..s {
                batch.push(deposit_at(field.cell_center(cx, cz), 1.0, 0.0));
            }
        }
        field.deposit(&cfg, &batch);
        assert!(field.gradient(Vec2::new(5.0, 5.0), Channel::Home).is_none());
        // And trivially on an all-zero field.
        let empty = PheromoneField::new(32);
        assert!(empty.gradient(Vec2::ZERO, Channel::Food).is_none());
    }

    #[test]
    fn gradient_points_at_single_hot_cell() {
        let mut field = PheromoneField::new(100);
        let cfg = unit_cfg();
        let hot = Vec2::new(10.5, 10.5);
        field.deposit(&cfg, &[deposit_at(hot, 8.0, 0.0)]);

        // Query one cell to the west of the hot cell: gradient must point east.
        let g = field
            .gradient(hot + Vec2::new(-1.0, 0.0), Channel::Home)
            .expect("one-hot field has a gradient next to the spike");
        assert!(g.x > 0.9, "expected eastward gradient, got {g:?}");
        assert!((g.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn antennae_find_a_trail_ahead() {
        let mut field = PheromoneField::new(100);
        let cfg = unit_cfg();
        // A thick blob of home trail straight ahead (+x) of the agent.
        let mut batch = Vec::new();
        for ix in 0..5 {
            for iz in -3..=3 {
                batch.push(deposit_at(
                    Vec2::new(6.0 + ix as f32, iz as f32),
                    20.0,
                    0.0,
                ));
            }
        }
        field.deposit(&cfg, &batch);

        let mut rng = AgentRng::new(42, AgentId(0));
        let reading = field
            .antennae_direction(&cfg, Vec2::ZERO, Vec2::X, Channel::Home, &mut rng)
            .expect("strong trail within antenna range must be sensed");
        assert!(reading.strength >= cfg.min_trail_strength);
        assert!(
            reading.direction.dot(Vec2::X) > 0.6,
            "best sample should lie roughly ahead, got {:?}",
            reading.direction
        );
    }

    #[test]
    fn antennae_silent_on_empty_field() {
        let field = PheromoneField::new(64);
        let cfg = cfg();
        let mut rng = AgentRng::new(7, AgentId(1));
        for _ in 0..20 {
            let r = field.antennae_direction(&cfg, Vec2::ZERO, Vec2::Y, Channel::Food, &mut rng);
            assert!(r.is_none());
        }
    }

    #[test]
    fn sample_clamps_outside_world() {
        let mut field = PheromoneField::new(16);
        let cfg = unit_cfg();
        field.deposit(&cfg, &[deposit_at(Vec2::new(-50.0, 0.0), 1.0, 0.0)]);
        // Far outside the span: clamps onto the western border cells.
        let inside = field.sample(Vec2::new(-50.0, 0.0), Channel::Home);
        let outside = field.sample(Vec2::new(-5000.0, 0.0), Channel::Home);
        assert_eq!(inside, outside);
    }
}
