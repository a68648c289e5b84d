//! Unit tests for fw-territory.

#[cfg(test)]
mod ellipse {
    use std::f32::consts::{FRAC_PI_2, PI};

    use glam::{Vec2, Vec3};
    use proptest::prelude::*;

    use fw_field::{GridField, GridSpec};

    use crate::{TerritoryConfig, TerritoryEllipse};

    fn shape(rotation: f32) -> TerritoryEllipse {
        TerritoryEllipse {
            center: Vec2::new(5.0, 5.0),
            rotation,
            width: 2.0,
            front: 3.0,
            back: 1.0,
            cost: 1.0,
        }
    }

    #[test]
    fn front_reaches_farther_than_back() {
        let e = shape(0.0);
        assert!(e.contains(Vec2::new(5.0, 7.0)));
        assert!(!e.contains(Vec2::new(5.0, 3.0)));
        assert!(e.contains(Vec2::new(5.0, 4.5)));
        assert!(e.contains(Vec2::new(6.5, 5.0)));
        assert!(!e.contains(Vec2::new(7.5, 5.0)));
    }

    #[test]
    fn rotation_turns_the_front() {
        // facing +x
        let e = shape(FRAC_PI_2);
        assert!(e.contains(Vec2::new(7.0, 5.0)));
        assert!(!e.contains(Vec2::new(3.0, 5.0)));
        // facing -y
        let e = shape(PI);
        assert!(e.contains(Vec2::new(5.0, 3.0)));
        assert!(!e.contains(Vec2::new(5.0, 7.0)));
    }

    #[test]
    fn centre_is_contained_even_when_degenerate() {
        let mut e = shape(0.0);
        e.width = 0.0;
        assert!(e.contains(e.center));
        assert!(!e.contains(Vec2::new(5.0, 5.5)));
    }

    #[test]
    fn config_scales_to_grid_units() {
        let field = GridField::new(&GridSpec::new(Vec3::ZERO, Vec2::splat(10.0), 0.5)).unwrap();
        let cfg = TerritoryConfig { width: 1.0, front: 2.0, back: 0.5, cost: 3.0 };
        let e = cfg.ellipse_for(Vec3::new(1.0, 0.0, -1.0), 0.3, &field);
        assert_eq!(e.center, Vec2::new(12.0, 8.0));
        assert_eq!((e.width, e.front, e.back), (2.0, 4.0, 1.0));
        assert_eq!(e.rotation, 0.3);
        assert_eq!(e.cost, 3.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(TerritoryConfig::default().validate().is_ok());
        assert!(TerritoryConfig { front: 0.0, ..TerritoryConfig::default() }.validate().is_err());
        assert!(TerritoryConfig { cost: f32::NAN, ..TerritoryConfig::default() }.validate().is_err());
    }

    proptest! {
        #[test]
        fn nothing_beyond_reach_is_contained(
            rotation in -PI..PI,
            angle in 0.0f32..std::f32::consts::TAU,
            extra in 0.01f32..20.0,
        ) {
            let e = shape(rotation);
            let r = e.reach() + extra;
            let p = e.center + Vec2::new(angle.cos(), angle.sin()) * r;
            prop_assert!(!e.contains(p));
            prop_assert!(e.contains(e.center));
        }
    }
}

#[cfg(test)]
mod cost {
    use glam::{Vec2, Vec3};

    use fw_core::AgentId;
    use fw_field::{FieldSource, GridSpec};

    use crate::{TerritorialCostField, TerritoryEllipse};

    fn field() -> TerritorialCostField {
        TerritorialCostField::new(&GridSpec::new(Vec3::ZERO, Vec2::splat(10.0), 1.0), 0.1, 99.0)
            .unwrap()
    }

    /// World position of the centre of grid cell `(x, y)` in a 10×10 unit
    /// grid centred on the origin.
    fn at(x: i32, y: i32) -> Vec3 {
        Vec3::new(x as f32 - 4.5, 0.0, y as f32 - 4.5)
    }

    fn ellipse(cx: f32, cy: f32, cost: f32) -> TerritoryEllipse {
        TerritoryEllipse { center: Vec2::new(cx, cy), rotation: 0.0, width: 1.5, front: 2.0, back: 1.0, cost }
    }

    #[test]
    fn repaint_starts_from_base_cost() {
        let mut t = field();
        t.repaint();
        assert!(t.field().values().iter().all(|&v| v == 0.1));
    }

    #[test]
    fn overlapping_ellipses_add_up() {
        let mut t = field();
        t.set_shapes(AgentId(0), vec![ellipse(5.5, 5.5, 1.0)]);
        t.set_shapes(AgentId(1), vec![ellipse(5.5, 6.5, 2.0)]);
        t.repaint();
        let v = t.value_at(at(5, 6), &[]);
        assert!((v - 3.1).abs() < 1e-5, "v = {v}");
        assert!((t.value_at(at(0, 0), &[]) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn own_territory_is_subtracted() {
        let mut t = field();
        let mine = ellipse(5.5, 5.5, 1.0);
        t.set_shapes(AgentId(0), vec![mine]);
        t.set_shapes(AgentId(1), vec![ellipse(5.5, 6.5, 2.0)]);
        t.repaint();

        let pos = at(5, 6);
        assert!((t.sample(pos, AgentId(0)) - 2.1).abs() < 1e-5);
        assert!((t.sample(pos, AgentId(1)) - 1.1).abs() < 1e-5);
        assert!((t.sample(pos, AgentId(2)) - 3.1).abs() < 1e-5);
        assert!((t.value_at(pos, &[mine]) - 2.1).abs() < 1e-5);
    }

    #[test]
    fn outside_grid_returns_sentinel() {
        let mut t = field();
        t.set_shapes(AgentId(0), vec![ellipse(0.0, 0.0, 1.0)]);
        t.repaint();
        assert_eq!(t.value_at(Vec3::new(-20.0, 0.0, 0.0), t.shapes_of(AgentId(0))), 99.0);
        assert_eq!(t.out_of_bounds_cost(), 99.0);
    }

    #[test]
    fn shapes_are_replaced_not_merged() {
        let mut t = field();
        t.set_shapes(AgentId(3), vec![ellipse(2.5, 2.5, 1.0), ellipse(7.5, 7.5, 1.0)]);
        t.set_shapes(AgentId(3), vec![ellipse(5.5, 5.5, 1.0)]);
        assert_eq!(t.shapes_of(AgentId(3)).len(), 1);
        t.repaint();
        assert!((t.value_at(at(2, 2), &[]) - 0.1).abs() < 1e-6);
        assert!((t.value_at(at(5, 5), &[]) - 1.1).abs() < 1e-6);

        t.remove_agent(AgentId(3));
        assert!(t.shapes_of(AgentId(3)).is_empty());
        t.repaint();
        assert!((t.value_at(at(5, 5), &[]) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn ellipse_clipped_at_grid_edge() {
        let mut t = field();
        t.set_shapes(AgentId(0), vec![ellipse(0.5, 0.5, 1.0)]);
        t.repaint();
        assert!((t.value_at(at(0, 0), &[]) - 1.1).abs() < 1e-6);
        assert_eq!(t.owner_count(), 1);
    }
}
