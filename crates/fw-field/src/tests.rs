//! Unit tests for fw-field.

#[cfg(test)]
mod grid {
    use glam::{Vec2, Vec3};
    use proptest::prelude::*;

    use crate::{FieldError, FieldSource, GridField, GridSpec};
    use fw_core::AgentId;

    fn ten_by_ten() -> GridField {
        GridField::new(&GridSpec::new(Vec3::ZERO, Vec2::splat(10.0), 1.0)).unwrap()
    }

    #[test]
    fn dims_from_world_size() {
        let spec = GridSpec::new(Vec3::ZERO, Vec2::new(10.0, 4.0), 0.1);
        assert_eq!(spec.dims(), (100, 40));
        let spec = GridSpec::new(Vec3::ZERO, Vec2::new(10.5, 4.0), 1.0);
        assert_eq!(spec.dims(), (11, 4));
    }

    #[test]
    fn origin_maps_to_centre_cell() {
        let f = ten_by_ten();
        assert_eq!(f.world_to_grid(Vec3::ZERO), (5, 5));
        assert_eq!(f.world_to_grid(Vec3::new(-5.0, 0.0, -5.0)), (0, 0));
        assert_eq!(f.world_to_grid(Vec3::new(4.99, 0.0, 4.99)), (9, 9));
        assert_eq!(f.world_to_grid(Vec3::new(-5.01, 0.0, 0.0)).0, -1);
    }

    #[test]
    fn height_is_ignored_by_mapping() {
        let f = ten_by_ten();
        assert_eq!(
            f.world_to_grid(Vec3::new(1.2, 50.0, -3.4)),
            f.world_to_grid(Vec3::new(1.2, -7.0, -3.4))
        );
    }

    #[test]
    fn out_of_bounds_reads_return_sentinel() {
        let spec = GridSpec::new(Vec3::ZERO, Vec2::splat(10.0), 1.0).with_out_of_bounds(-1.0);
        let mut f = GridField::new(&spec).unwrap();
        f.clear(0.25);
        assert_eq!(f.value_at(-1, 0), -1.0);
        assert_eq!(f.value_at(0, 10), -1.0);
        assert_eq!(f.value_at(3, 3), 0.25);
        assert_eq!(f.value_at_world(Vec3::new(100.0, 0.0, 0.0)), -1.0);
        assert_eq!(f.sample(Vec3::new(0.5, 0.0, 0.5), AgentId(0)), 0.25);
    }

    #[test]
    fn writes_outside_grid_are_rejected() {
        let mut f = ten_by_ten();
        assert!(!f.set(10, 0, 1.0));
        assert!(!f.add(0, -1, 1.0));
        assert!(f.values().iter().all(|&v| v == 0.0));
        assert!(f.add(2, 3, 0.5));
        assert_eq!(f.value_at(2, 3), 0.5);
    }

    #[test]
    fn bad_specs_are_config_errors() {
        let zero_cell = GridSpec::new(Vec3::ZERO, Vec2::splat(10.0), 0.0);
        assert!(matches!(GridField::new(&zero_cell), Err(FieldError::Config(_))));
        let negative = GridSpec::new(Vec3::ZERO, Vec2::new(-1.0, 10.0), 1.0);
        assert!(matches!(GridField::new(&negative), Err(FieldError::Config(_))));
        let nan = GridSpec::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec2::splat(10.0), 1.0);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn from_values_checks_length() {
        let err = GridField::from_values(Vec3::ZERO, 1.0, 2, 2, 0.0, vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, FieldError::DimensionMismatch { expected: 4, got: 3 }));
    }

    #[test]
    fn bounds_cover_the_field() {
        let f = GridField::new(&GridSpec::new(Vec3::new(10.0, 1.0, -4.0), Vec2::new(6.0, 2.0), 0.5))
            .unwrap();
        let b = f.bounds();
        assert_eq!(b.min, Vec2::new(7.0, -5.0));
        assert_eq!(b.max, Vec2::new(13.0, -3.0));
        assert_eq!(f.plane_height(), 1.0);
    }

    proptest! {
        #[test]
        fn grid_to_world_round_trips(x in 0i32..40, y in 0i32..25) {
            let f = GridField::new(&GridSpec::new(
                Vec3::new(3.0, 0.0, -2.0),
                Vec2::new(20.0, 12.5),
                0.5,
            ))
            .unwrap();
            let world = f.grid_to_world(x, y);
            prop_assert_eq!(f.world_to_grid(world), (x, y));
        }

        #[test]
        fn world_to_grid_lands_within_a_cell(u in 0.0f32..1.0, v in 0.0f32..1.0) {
            let f = GridField::new(&GridSpec::new(
                Vec3::new(3.0, 0.0, -2.0),
                Vec2::new(20.0, 12.5),
                0.5,
            ))
            .unwrap();
            let b = f.bounds();
            let size = b.max - b.min;
            let p = Vec3::new(b.min.x + u * size.x, 0.0, b.min.y + v * size.y);
            let (x, y) = f.world_to_grid(p);
            let back = f.grid_to_world(x, y);
            prop_assert!((back.x - p.x).abs() <= f.cell_size(), "x: {} vs {}", back.x, p.x);
            prop_assert!((back.z - p.z).abs() <= f.cell_size(), "z: {} vs {}", back.z, p.z);
        }
    }
}

#[cfg(test)]
mod accum {
    use glam::{Vec2, Vec3};

    use crate::{AccumulationBuffer, GridField, GridSpec};

    #[test]
    fn matches_field_and_ignores_outside() {
        let f = GridField::new(&GridSpec::new(Vec3::ZERO, Vec2::new(4.0, 3.0), 1.0)).unwrap();
        let mut a = AccumulationBuffer::for_field(&f);
        assert_eq!((a.width(), a.height()), (4, 3));
        assert!(a.add(1, 2, 1.5));
        assert!(a.add(1, 2, 1.0));
        assert!(!a.add(4, 0, 1.0));
        assert_eq!(a.get(1, 2), Some(2.5));
        assert_eq!(a.get(-1, 0), None);
        assert!((a.total() - 2.5).abs() < 1e-9);
        a.record_event();
        assert_eq!(a.events(), 1);
    }
}

#[cfg(test)]
mod normalize {
    use fw_core::WorkBudget;
    use glam::{Vec2, Vec3};
    use proptest::prelude::*;

    use crate::normalize::logistic;
    use crate::{
        AccumulationBuffer, ConvergenceState, FieldError, GridField, GridSpec, NormalizeStrategy,
        Normalizer,
    };

    fn pair(w: f32, h: f32) -> (GridField, AccumulationBuffer) {
        let f = GridField::new(&GridSpec::new(Vec3::ZERO, Vec2::new(w, h), 1.0)).unwrap();
        let a = AccumulationBuffer::for_field(&f);
        (f, a)
    }

    fn fill(a: &mut AccumulationBuffer, values: &[f32]) {
        let w = a.width();
        for (i, &v) in values.iter().enumerate() {
            a.add((i % w) as i32, (i / w) as i32, v);
        }
    }

    #[test]
    fn max_normalize_scales_to_unit_peak() {
        let (mut f, mut a) = pair(10.0, 10.0);
        for y in 0..10 {
            for x in 0..10 {
                a.add(x, y, 5.0);
            }
        }
        a.add(3, 4, 5.0);

        let mut n = Normalizer::new(NormalizeStrategy::Max, 0.01);
        let report = n.normalize(&a, &mut f).unwrap();

        assert_eq!(f.value_at(3, 4), 1.0);
        assert_eq!(f.value_at(0, 0), 0.5);
        assert_eq!(f.value_at(9, 9), 0.5);
        let change = report.change.unwrap();
        assert!((change - 0.505).abs() < 1e-5, "change = {change}");
        assert!((n.convergence().mean_change - 0.505).abs() < 1e-5);
        assert!(!n.has_converged());
    }

    #[test]
    fn repeated_pass_on_stable_input_converges() {
        let (mut f, mut a) = pair(10.0, 10.0);
        fill(&mut a, &[1.0, 2.0, 3.0, 4.0]);
        let mut n = Normalizer::new(NormalizeStrategy::Max, 0.01);
        assert!(!n.normalize(&a, &mut f).unwrap().converged_now);
        let second = n.normalize(&a, &mut f).unwrap();
        assert_eq!(second.change, Some(0.0));
        assert!(second.converged_now);
        assert!(n.has_converged());
        // only the first converging pass reports it
        assert!(!n.normalize(&a, &mut f).unwrap().converged_now);
        assert_eq!(n.passes_completed(), 3);
    }

    #[test]
    fn all_zero_buffer_leaves_field_untouched() {
        let (mut f, a) = pair(4.0, 4.0);
        f.clear(0.3);
        let mut n = Normalizer::new(NormalizeStrategy::Max, 0.01);
        let report = n.normalize(&a, &mut f).unwrap();
        assert_eq!(report.change, None);
        assert!(f.values().iter().all(|&v| v == 0.3));
        assert_eq!(n.convergence().mean_change, f32::MAX);
    }

    #[test]
    fn constant_buffer_is_degenerate_for_min_max() {
        let (mut f, mut a) = pair(2.0, 2.0);
        fill(&mut a, &[2.0, 2.0, 2.0, 2.0]);
        let mut n = Normalizer::new(NormalizeStrategy::MinMax, 0.01);
        assert_eq!(n.normalize(&a, &mut f).unwrap().change, None);
        assert!(f.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn z_score_skips_zero_cells_and_reports_spread() {
        let (mut f, mut a) = pair(2.0, 2.0);
        fill(&mut a, &[0.0, 2.0, 4.0, 6.0]);
        let mut n = Normalizer::new(NormalizeStrategy::ZScoreLogistic, 10.0);
        let report = n.normalize(&a, &mut f).unwrap();

        // population std of {2, 4, 6}
        let std = (8.0f32 / 3.0).sqrt();
        assert!((report.change.unwrap() - std).abs() < 1e-5);
        assert_eq!(f.value_at(0, 0), 0.0);
        assert!((f.value_at(0, 1) - 0.5).abs() < 1e-6);
        assert!(f.value_at(1, 1) > 0.5 && f.value_at(1, 0) < 0.5);
        // below threshold but never gates convergence
        assert!(!report.converged_now);
        assert!(!n.has_converged());
    }

    #[test]
    fn z_score_with_identical_positives_maps_to_half() {
        let (mut f, mut a) = pair(2.0, 1.0);
        fill(&mut a, &[3.0, 3.0]);
        let mut n = Normalizer::new(NormalizeStrategy::ZScoreLogistic, 0.1);
        assert_eq!(n.normalize(&a, &mut f).unwrap().change, Some(0.0));
        assert!(f.values().iter().all(|&v| (v - 0.5).abs() < 1e-6));
    }

    #[test]
    fn logistic_shape() {
        assert!((logistic(0.0) - 0.5).abs() < 1e-6);
        assert!(logistic(3.0) > 0.99);
        assert!(logistic(-3.0) < 0.01);
    }

    #[test]
    fn sliced_pass_matches_single_pass() {
        let (mut whole, mut a) = pair(9.0, 7.0);
        let values: Vec<f32> = (0..63).map(|i| ((i * 37) % 11) as f32).collect();
        fill(&mut a, &values);
        let mut sliced = whole.clone();

        let mut n1 = Normalizer::new(NormalizeStrategy::MinMax, 0.01);
        let r1 = n1.normalize(&a, &mut whole).unwrap();

        let mut n2 = Normalizer::new(NormalizeStrategy::MinMax, 0.01);
        n2.begin();
        let mut calls = 0;
        let r2 = loop {
            calls += 1;
            let mut budget = WorkBudget::units(7);
            if let Some(report) = n2.resume(&a, &mut sliced, &mut budget).unwrap() {
                break report;
            }
            assert!(n2.is_running());
        };

        assert!(calls > 1);
        assert_eq!(r1, r2);
        assert_eq!(whole.values(), sliced.values());
    }

    #[test]
    fn resume_without_pass_is_idle() {
        let (mut f, a) = pair(2.0, 2.0);
        let mut n = Normalizer::new(NormalizeStrategy::Max, 0.01);
        let mut budget = WorkBudget::unlimited();
        assert_eq!(n.resume(&a, &mut f, &mut budget).unwrap(), None);
        assert_eq!(n.passes_completed(), 0);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let (mut f, _) = pair(2.0, 2.0);
        let (_, other) = pair(3.0, 3.0);
        let mut n = Normalizer::new(NormalizeStrategy::Max, 0.01);
        let err = n.normalize(&other, &mut f).unwrap_err();
        assert!(matches!(err, FieldError::DimensionMismatch { expected: 4, got: 9 }));
        assert!(!n.is_running());
    }

    #[test]
    fn convergence_is_sticky() {
        let mut c = ConvergenceState::new(0.1);
        assert!(!c.record(0.5, true));
        assert!(c.record(0.05, true));
        assert!(!c.record(0.9, true));
        assert!(c.has_converged);
        assert_eq!(c.mean_change, 0.9);
    }

    proptest! {
        #[test]
        fn min_max_lands_in_unit_interval(values in proptest::collection::vec(0.0f32..1000.0, 12)) {
            let (mut f, mut a) = pair(4.0, 3.0);
            fill(&mut a, &values);
            let mut n = Normalizer::new(NormalizeStrategy::MinMax, 0.01);
            let report = n.normalize(&a, &mut f).unwrap();
            if report.change.is_some() {
                for &v in f.values() {
                    prop_assert!((-1e-6..=1.0 + 1e-6).contains(&v));
                }
            }
        }

        #[test]
        fn max_lands_in_unit_interval(
            values in proptest::collection::vec(0.0f32..1000.0, 12),
            peak in 0.5f32..1000.0,
        ) {
            let (mut f, mut a) = pair(4.0, 3.0);
            let mut values = values;
            values[7] = peak;
            fill(&mut a, &values);
            let mut n = Normalizer::new(NormalizeStrategy::Max, 0.01);
            let report = n.normalize(&a, &mut f).unwrap();
            prop_assert!(report.change.is_some());
            let top = f.values().iter().copied().fold(f32::MIN, f32::max);
            prop_assert!((top - 1.0).abs() < 1e-6);
            for &v in f.values() {
                prop_assert!((0.0..=1.0 + 1e-6).contains(&v));
            }
        }

        #[test]
        fn convergence_never_reverts(changes in proptest::collection::vec(0.0f32..1.0, 1..30)) {
            let mut c = ConvergenceState::new(0.2);
            let mut seen = false;
            for change in changes {
                c.record(change, true);
                if seen {
                    prop_assert!(c.has_converged);
                }
                seen |= c.has_converged;
            }
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_form {
    use glam::{Vec2, Vec3};

    use crate::{GridField, GridSpec};

    #[test]
    fn snapshot_round_trips() {
        let mut f = GridField::new(&GridSpec::new(Vec3::new(1.0, 0.5, -1.0), Vec2::new(3.0, 2.0), 1.0)).unwrap();
        f.values_mut()[4] = 0.75;
        let json = serde_json::to_string(&f).unwrap();
        let back: GridField = serde_json::from_str(&json).unwrap();
        assert_eq!((back.width(), back.height()), (3, 2));
        assert_eq!(back.values(), f.values());
    }

    #[test]
    fn snapshot_with_wrong_length_is_rejected() {
        let json = r#"{"origin":[0.0,0.0,0.0],"cell_size":1.0,"width":3,"height":2,"out_of_bounds":0.0,"values":[0.1,0.2]}"#;
        let err = serde_json::from_str::<GridField>(json).unwrap_err();
        assert!(err.to_string().contains("does not match"), "{err}");
    }

    #[test]
    fn snapshot_with_zero_cell_size_is_rejected() {
        let json = r#"{"origin":[0.0,0.0,0.0],"cell_size":0.0,"width":1,"height":1,"out_of_bounds":0.0,"values":[0.0]}"#;
        assert!(serde_json::from_str::<GridField>(json).is_err());
    }
}
