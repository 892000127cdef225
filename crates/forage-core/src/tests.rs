//! Unit tests for forage-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, FoodId, ObstacleId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(FoodId(100) > FoodId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(FoodId::INVALID.0, u16::MAX);
        assert_eq!(ObstacleId::INVALID.0, u16::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = SimClock::new(1.0 / 60.0);
        assert_eq!(clock.elapsed_secs(), 0.0);
        for _ in 0..60 {
            clock.advance();
        }
        assert!((clock.elapsed_secs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ticks_for_duration_rounds_up() {
        let clock = SimClock::new(1.0 / 60.0);
        assert_eq!(clock.ticks_for_secs(1.0), 60);
        assert_eq!(clock.ticks_for_secs(0.001), 1);
    }

    #[test]
    fn max_dt_is_two_reference_frames() {
        let cfg = SimConfig::default();
        assert!((cfg.max_dt_secs() - 2.0 / 60.0).abs() < 1e-7);
        assert_eq!(cfg.end_tick(), Tick(0));
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng, SimRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = AgentRng::new(12345, AgentId(0));
        let mut r2 = AgentRng::new(12345, AgentId(0));
        for _ in 0..100 {
            let a: f32 = r1.random();
            let b: f32 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_agents_differ() {
        let mut r0 = AgentRng::new(1, AgentId(0));
        let mut r1 = AgentRng::new(1, AgentId(1));
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b, "seeds for adjacent agents should diverge");
    }

    #[test]
    fn unit_vec2_is_unit_length() {
        let mut rng = AgentRng::new(7, AgentId(3));
        for _ in 0..100 {
            let v = rng.unit_vec2();
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn jitter_angle_bounds() {
        let mut rng = AgentRng::new(0, AgentId(0));
        for _ in 0..1000 {
            let a = rng.jitter_angle(0.25);
            assert!((-0.25..=0.25).contains(&a));
        }
        assert_eq!(rng.jitter_angle(0.0), 0.0);
        assert_eq!(rng.jitter_angle(-1.0), 0.0);
    }

    #[test]
    fn in_disc_stays_in_disc() {
        let mut rng = AgentRng::new(99, AgentId(1));
        for _ in 0..1000 {
            let p = rng.in_disc(3.0);
            assert!(p.length() <= 3.0 + 1e-5);
        }
    }

    #[test]
    fn sim_rng_children_diverge() {
        let mut root = SimRng::new(42);
        let mut a = root.child(1);
        let mut b = root.child(2);
        let va: u64 = a.random();
        let vb: u64 = b.random();
        assert_ne!(va, vb);
    }
}

#[cfg(test)]
mod world {
    use crate::{FoodSource, Obstacle};
    use glam::Vec2;

    #[test]
    fn obstacle_contains() {
        let o = Obstacle::new(Vec2::new(5.0, 0.0), 2.0, 1.0);
        assert!(o.contains(Vec2::new(6.0, 0.0)));
        assert!(!o.contains(Vec2::new(8.0, 0.0)));
    }

    #[test]
    fn obstacle_penetration_band() {
        let o = Obstacle::new(Vec2::ZERO, 2.0, 3.0);
        // Outside the margin band: zero.
        assert_eq!(o.penetration(Vec2::new(4.0, 0.0), 1.5), 0.0);
        // At the footprint boundary: full.
        let at_edge = o.penetration(Vec2::new(2.0, 0.0), 1.5);
        assert!((at_edge - 1.0).abs() < 1e-5);
        // Midway through the band: between the two.
        let mid = o.penetration(Vec2::new(2.75, 0.0), 1.5);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn food_take_one() {
        let mut f = FoodSource::new(Vec2::new(30.0, 35.0), 2);
        assert!(f.has_stock());
        assert!(f.take_one());
        assert!(f.take_one());
        assert!(!f.take_one());
        assert!(!f.has_stock());
        assert_eq!(f.remaining, 0);
    }
}
