//! Unit tests for fw-spatial.
//!
//! All tests use hand-built scenes so they run without any asset files.

#[cfg(test)]
mod helpers {
    use glam::{Vec2, Vec3};

    use fw_core::WorldRect;

    use crate::{BoxScene, GridNavSurface, SceneBox};

    /// 10×10 plaza (cells of 1) centred on the origin with a wall across
    /// the middle row, open only at the right-hand end.
    ///
    /// ```text
    ///   z
    ///   ▲ . . . . . . . . . .
    ///     . . . . . . . . . .
    ///     # # # # # # # # . .   row y = 5
    ///     . . . . . . . . . .
    ///     . . . . . . . . . . ▶ x
    /// ```
    pub fn walled_plaza() -> (BoxScene, GridNavSurface) {
        let scene = BoxScene::new().with(SceneBox::new(
            Vec3::new(-5.0, 0.0, 0.1),
            Vec3::new(3.0, 2.0, 0.9),
        ));
        let bounds = WorldRect::centered(Vec2::ZERO, Vec2::splat(10.0));
        let nav = GridNavSurface::from_scene(&scene, bounds, 0.0, 1.0, 0.0, 1.8).unwrap();
        (scene, nav)
    }
}

// ── Scene queries ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod scene {
    use glam::Vec3;

    use crate::{BoxScene, LayerMask, SceneBox, SceneQuery};

    fn one_box() -> BoxScene {
        BoxScene::new().with(SceneBox::centered(Vec3::new(0.0, 1.0, 5.0), Vec3::new(2.0, 2.0, 2.0)))
    }

    #[test]
    fn ray_hits_near_face() {
        let hit = one_box().probe(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 100.0, LayerMask::ALL).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(0.0, 1.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn direction_need_not_be_normalized() {
        let hit = one_box().probe(Vec3::new(0.0, 1.0, 0.0), Vec3::Z * 7.0, 100.0, LayerMask::ALL);
        assert!((hit.unwrap().distance - 4.0).abs() < 1e-5);
    }

    #[test]
    fn max_distance_bounds_the_ray() {
        let scene = one_box();
        assert!(scene.probe(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 3.9, LayerMask::ALL).is_none());
        assert!(scene.probe(Vec3::new(0.0, 1.0, 0.0), -Vec3::Z, 100.0, LayerMask::ALL).is_none());
    }

    #[test]
    fn layer_filter_excludes_boxes() {
        let scene = BoxScene::new().with(
            SceneBox::centered(Vec3::new(0.0, 1.0, 5.0), Vec3::splat(2.0)).on_layers(LayerMask::layer(3)),
        );
        let origin = Vec3::new(0.0, 1.0, 0.0);
        assert!(scene.probe(origin, Vec3::Z, 10.0, LayerMask::layer(0)).is_none());
        assert!(scene.probe(origin, Vec3::Z, 10.0, LayerMask::layer(3) | LayerMask::layer(0)).is_some());
    }

    #[test]
    fn origin_inside_box_does_not_hit_it() {
        let scene = one_box();
        assert!(scene.probe(Vec3::new(0.0, 1.0, 5.0), Vec3::X, 10.0, LayerMask::ALL).is_none());
    }

    #[test]
    fn nearest_of_several_boxes() {
        let scene = BoxScene::new()
            .with(SceneBox::centered(Vec3::new(0.0, 0.0, 8.0), Vec3::ONE))
            .with(SceneBox::centered(Vec3::new(0.0, 0.0, 3.0), Vec3::ONE));
        let hit = scene.probe(Vec3::ZERO, Vec3::Z, 20.0, LayerMask::ALL).unwrap();
        assert!((hit.distance - 2.5).abs() < 1e-5);
    }

    #[test]
    fn line_of_sight() {
        let scene = one_box();
        let eye = Vec3::new(0.0, 1.0, 0.0);
        assert!(!scene.line_of_sight(eye, Vec3::new(0.0, 1.0, 10.0), LayerMask::ALL));
        assert!(scene.line_of_sight(eye, Vec3::new(0.0, 1.0, 3.0), LayerMask::ALL));
        assert!(scene.line_of_sight(eye, eye, LayerMask::ALL));
    }
}

// ── Navigation surface ────────────────────────────────────────────────────────

#[cfg(test)]
mod nav {
    use glam::Vec3;

    use crate::{GridNavSurface, NavSurface, SpatialError};

    #[test]
    fn scene_footprint_blocks_cells() {
        let (_, nav) = super::helpers::walled_plaza();
        assert_eq!((nav.width(), nav.height()), (10, 10));
        for x in 0..8 {
            assert!(!nav.is_walkable(x, 5), "cell ({x}, 5) should be blocked");
        }
        assert!(nav.is_walkable(8, 5));
        assert!(nav.is_walkable(0, 0));
        assert_eq!(nav.walkable_count(), 92);
    }

    #[test]
    fn sample_keeps_walkable_points_and_snaps_blocked_ones() {
        let (_, nav) = super::helpers::walled_plaza();
        let open = Vec3::new(-2.3, 0.0, -3.1);
        assert_eq!(nav.sample(open, 0.1), Some(open));

        let blocked = Vec3::new(-4.5, 0.0, 0.5);
        let snapped = nav.sample(blocked, 2.0).unwrap();
        assert!((snapped.z - 1.5).abs() < 1e-5 || (snapped.z + 0.5).abs() < 1e-5);
        assert!(nav.sample(blocked, 0.5).is_none());
    }

    #[test]
    fn sample_counts_height_distance() {
        let (_, nav) = super::helpers::walled_plaza();
        assert!(nav.sample(Vec3::new(-2.0, 3.0, -3.0), 1.0).is_none());
        assert!(nav.sample(Vec3::new(-2.0, 0.5, -3.0), 1.0).is_some());
    }

    #[test]
    fn path_detours_around_wall() {
        let (_, nav) = super::helpers::walled_plaza();
        let from = Vec3::new(-4.5, 0.0, -4.5);
        let to = Vec3::new(-4.5, 0.0, 4.5);
        let corners = nav.calculate_path(from, to);
        assert_eq!(corners.first(), Some(&from));
        assert_eq!(corners.last(), Some(&to));
        assert!(corners.len() >= 3);
        // the only gap is at x >= 3
        assert!(corners.iter().any(|c| c.x > 3.0));
    }

    #[test]
    fn straight_path_has_only_endpoints() {
        let (_, nav) = super::helpers::walled_plaza();
        let from = Vec3::new(-4.5, 0.0, -4.5);
        let to = Vec3::new(4.5, 0.0, -4.5);
        assert_eq!(nav.calculate_path(from, to), vec![from, to]);
    }

    #[test]
    fn same_cell_path() {
        let (_, nav) = super::helpers::walled_plaza();
        let a = Vec3::new(-4.6, 0.0, -4.6);
        let b = Vec3::new(-4.4, 0.0, -4.4);
        assert_eq!(nav.calculate_path(a, b), vec![a, b]);
    }

    #[test]
    fn disconnected_cells_have_no_path() {
        // two walkable cells separated by a blocked column
        let nav = GridNavSurface::from_walkable(Vec3::ZERO, 1.0, 3, 1, vec![true, false, true]).unwrap();
        assert!(matches!(nav.cell_path((0, 0), (2, 0)), Err(SpatialError::NoPath { .. })));
        assert!(nav.calculate_path(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).is_empty());
    }

    #[test]
    fn diagonals_do_not_cut_corners() {
        // . #
        // . .
        let nav = GridNavSurface::from_walkable(Vec3::ZERO, 1.0, 2, 2, vec![true, true, true, false])
            .unwrap();
        let path = nav.cell_path((1, 0), (0, 1)).unwrap();
        assert_eq!(path, vec![(1, 0), (0, 0), (0, 1)]);
    }

    #[test]
    fn bad_mask_is_config_error() {
        let err = GridNavSurface::from_walkable(Vec3::ZERO, 1.0, 2, 2, vec![true; 3]).unwrap_err();
        assert!(matches!(err, SpatialError::Config(_)));
        assert!(GridNavSurface::from_walkable(Vec3::ZERO, 0.0, 2, 2, vec![true; 4]).is_err());
    }

    #[test]
    fn fully_blocked_surface_samples_nothing() {
        let nav = GridNavSurface::from_walkable(Vec3::ZERO, 1.0, 2, 1, vec![false, false]).unwrap();
        assert_eq!(nav.walkable_count(), 0);
        assert!(nav.sample(Vec3::ZERO, 100.0).is_none());
        assert!(nav.calculate_path(Vec3::ZERO, Vec3::X).is_empty());
    }
}
