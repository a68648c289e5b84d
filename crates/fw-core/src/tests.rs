//! Unit tests for fw-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, MapId};

    #[test]
    fn index_and_next() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(id.next(), AgentId(43));
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(MapId::INVALID.0, u16::MAX);
        assert!(!AgentId::default().is_valid());
        assert_eq!(AgentId::INVALID.next(), AgentId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(MapId(2).to_string(), "MapId(2)");
    }
}

#[cfg(test)]
mod geo {
    use std::f32::consts::{FRAC_PI_2, PI};

    use glam::{Vec2, Vec3};

    use crate::WorldRect;
    use crate::geo::{flat, forward_from_yaw, signed_flat_angle, wrap_angle, yaw_of};

    #[test]
    fn flat_drops_height() {
        assert_eq!(flat(Vec3::new(1.0, 9.0, -2.0)), Vec2::new(1.0, -2.0));
    }

    #[test]
    fn yaw_zero_faces_plus_z() {
        let f = forward_from_yaw(0.0);
        assert!((f - Vec3::Z).length() < 1e-6);
        let right = forward_from_yaw(FRAC_PI_2);
        assert!((right - Vec3::X).length() < 1e-6);
        assert!((yaw_of(Vec3::X).unwrap() - FRAC_PI_2).abs() < 1e-6);
        assert!(yaw_of(Vec3::Y).is_none());
    }

    #[test]
    fn signed_angle_sign_and_range() {
        let a = signed_flat_angle(Vec3::Z, Vec3::X);
        assert!((a - FRAC_PI_2).abs() < 1e-5);
        let b = signed_flat_angle(Vec3::Z, -Vec3::X);
        assert!((b + FRAC_PI_2).abs() < 1e-5);
        let behind = signed_flat_angle(Vec3::Z, -Vec3::Z);
        assert!((behind.abs() - PI).abs() < 1e-5);
    }

    #[test]
    fn wrap_angle_stays_in_range() {
        for k in -20..20 {
            let a = wrap_angle(k as f32 * 0.7);
            assert!((-PI..=PI).contains(&a), "{a}");
        }
    }

    #[test]
    fn rect_contains_and_clamps() {
        let r = WorldRect::centered(Vec2::ZERO, Vec2::new(10.0, 4.0));
        assert!(r.contains(Vec2::new(5.0, 2.0)));
        assert!(!r.contains(Vec2::new(5.1, 0.0)));
        assert_eq!(r.clamp(Vec2::new(20.0, -9.0)), Vec2::new(5.0, -2.0));
        assert!((r.diagonal() - (116.0f32).sqrt()).abs() < 1e-5);
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
    fn clock_elapsed_secs() {
        let mut clock = SimClock::new(0.5);
        assert_eq!(clock.elapsed_secs(), 0.0);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert!((clock.elapsed_secs() - 1.0).abs() < 1e-6);
        assert_eq!(clock.ticks_for_secs(1.2), 3);
    }

    #[test]
    fn config_validation() {
        assert!(SimConfig::default().validate().is_ok());
        let bad = SimConfig { tick_duration_secs: 0.0, ..SimConfig::default() };
        assert!(bad.validate().is_err());
        let bad = SimConfig { crowding_radius: -1.0, ..SimConfig::default() };
        assert!(bad.validate().is_err());
    }
}

#[cfg(test)]
mod budget {
    use std::time::Duration;

    use crate::{BudgetConfig, WorkBudget};

    #[test]
    fn unit_budget_exhausts_after_n() {
        let mut b = WorkBudget::units(3);
        let mut done = 0;
        while !b.exhausted() {
            b.spend(1);
            done += 1;
        }
        assert_eq!(done, 3);
        assert_eq!(b.remaining_units(), Some(0));
    }

    #[test]
    fn unlimited_never_exhausts() {
        let mut b = WorkBudget::unlimited();
        b.spend(u64::MAX);
        assert!(!b.exhausted());
        assert_eq!(b.remaining_units(), None);
    }

    #[test]
    fn zero_wall_clock_is_exhausted_immediately() {
        let b = WorkBudget::wall_clock(Duration::ZERO);
        assert!(b.exhausted());
    }

    #[test]
    fn config_validation() {
        assert!(BudgetConfig::default().validate("probe").is_ok());
        assert!(BudgetConfig::Units(0).validate("probe").is_err());
        assert!(BudgetConfig::WallClock { secs: -1.0 }.validate("probe").is_err());
        assert!(BudgetConfig::Unlimited.validate("probe").is_ok());
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng, SimRng};

    #[test]
    fn agent_rng_is_deterministic() {
        let mut a = AgentRng::new(7, AgentId(3));
        let mut b = AgentRng::new(7, AgentId(3));
        for _ in 0..10 {
            assert_eq!(a.random::<u32>(), b.random::<u32>());
        }
    }

    #[test]
    fn agents_get_distinct_streams() {
        let mut a = AgentRng::new(7, AgentId(0));
        let mut b = AgentRng::new(7, AgentId(1));
        let xs: Vec<u32> = (0..4).map(|_| a.random()).collect();
        let ys: Vec<u32> = (0..4).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn symmetric_range() {
        let mut r = AgentRng::new(1, AgentId(0));
        for _ in 0..100 {
            let v = r.symmetric(0.5);
            assert!((-0.5..=0.5).contains(&v));
        }
        assert_eq!(r.symmetric(0.0), 0.0);
    }

    #[test]
    fn sim_rng_angle_range() {
        let mut r = SimRng::new(9);
        let mut child = r.child(1);
        for _ in 0..100 {
            let a = child.angle();
            assert!((0.0..std::f32::consts::TAU).contains(&a));
        }
    }
}
