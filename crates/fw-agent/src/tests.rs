//! Unit tests for fw-agent.

#[cfg(test)]
mod history {
    use glam::Vec3;

    use crate::PositionHistory;

    #[test]
    fn ring_drops_oldest_but_log_keeps_all() {
        let mut h = PositionHistory::new(3, 0.0);
        for i in 0..5 {
            assert!(h.record(Vec3::new(i as f32, 0.0, 0.0)));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.oldest(), Some(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(h.newest(), Some(Vec3::new(4.0, 0.0, 0.0)));
        assert_eq!(h.log().len(), 5);
        let xs: Vec<f32> = h.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn spacing_skips_small_moves() {
        let mut h = PositionHistory::new(4, 1.0);
        assert!(h.record(Vec3::ZERO));
        assert!(!h.record(Vec3::new(0.5, 0.0, 0.0)));
        assert!(h.record(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn empty_history_has_no_oldest() {
        let h = PositionHistory::new(4, 1.0);
        assert!(h.is_empty());
        assert_eq!(h.oldest(), None);
    }
}

#[cfg(test)]
mod nav_state {
    use glam::Vec3;

    use crate::{AgentNavigationState, WanderMode};

    #[test]
    fn walk_back_and_arrive() {
        let mut s = AgentNavigationState::new(4, 0.5);
        assert_eq!(s.since_last_pick(10.0), f32::INFINITY);
        s.commit(Vec3::X, 1.0);
        assert_eq!(s.mode, WanderMode::Wandering);
        assert_eq!(s.since_last_pick(3.0), 2.0);

        s.begin_walk_back(Vec3::Z, 4.0);
        assert!(s.walk_backward());
        assert_eq!(s.destination, Some(Vec3::Z));
        assert_eq!(s.last_crisis_pick_time, Some(4.0));

        s.arrive();
        assert!(!s.walk_backward());
        assert_eq!(s.destination, None);
    }
}

#[cfg(test)]
mod locomotion {
    use std::f32::consts::FRAC_PI_2;

    use glam::Vec3;

    use crate::{AgentPose, FollowStatus, PathFollower};

    #[test]
    fn empty_path_is_invalid() {
        let mut f = PathFollower::new(1.0, 0.1);
        assert!(!f.set_path(Vec::new()));
        let mut pose = AgentPose::default();
        assert_eq!(f.advance(&mut pose, 1.0), FollowStatus::Idle);
    }

    #[test]
    fn walks_corners_and_turns() {
        let mut f = PathFollower::new(2.0, 0.01);
        let mut pose = AgentPose::new(Vec3::ZERO, 0.0);
        assert!(f.set_path(vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::new(3.0, 0.0, 1.0)]));

        assert_eq!(f.advance(&mut pose, 1.0), FollowStatus::Moving);
        assert!((pose.position - Vec3::new(1.0, 0.0, 1.0)).length() < 1e-5);
        assert!((pose.yaw - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(f.remaining().len(), 1);

        assert_eq!(f.advance(&mut pose, 0.5), FollowStatus::Moving);
        assert!((pose.position - Vec3::new(2.0, 0.0, 1.0)).length() < 1e-5);
        assert_eq!(f.advance(&mut pose, 1.0), FollowStatus::Arrived);
        assert!((pose.position - Vec3::new(3.0, 0.0, 1.0)).length() < 1e-5);
        assert!(!f.has_path());
        assert_eq!(f.advance(&mut pose, 1.0), FollowStatus::Idle);
    }

    #[test]
    fn arrival_tolerance() {
        let mut f = PathFollower::new(1.0, 0.5);
        let mut pose = AgentPose::new(Vec3::ZERO, 0.0);
        f.set_path(vec![Vec3::new(0.0, 0.0, 0.4)]);
        assert_eq!(f.destination(), Some(Vec3::new(0.0, 0.0, 0.4)));
        assert_eq!(f.advance(&mut pose, 0.1), FollowStatus::Arrived);
        assert_eq!(pose.position, Vec3::ZERO);
        assert_eq!(f.destination(), None);
    }
}

#[cfg(test)]
mod store {
    use glam::Vec3;

    use fw_core::AgentId;

    use crate::{AgentConfig, AgentError, AgentPose, AgentStoreBuilder};

    #[test]
    fn builder_spawns_initial_agents() {
        let (store, rngs) = AgentStoreBuilder::new(1)
            .agents((0..3).map(|i| AgentPose::new(Vec3::new(i as f32, 0.0, 0.0), 0.0)))
            .build()
            .unwrap();
        assert_eq!(store.count, 3);
        assert_eq!(store.live_count(), 3);
        assert_eq!(rngs.len(), 3);
        assert_eq!(store.position(AgentId(2)), Some(Vec3::new(2.0, 0.0, 0.0)));
        // spawn position seeds the history
        assert_eq!(store.nav[1].history.oldest(), Some(Vec3::X));
    }

    #[test]
    fn insert_grows_and_remove_keeps_slot() {
        let (mut store, _) = AgentStoreBuilder::new(1).build().unwrap();
        store.insert(AgentId(4), AgentPose::default()).unwrap();
        assert_eq!(store.count, 5);
        assert_eq!(store.agent_ids().collect::<Vec<_>>(), vec![AgentId(4)]);
        assert!(matches!(
            store.insert(AgentId(4), AgentPose::default()),
            Err(AgentError::AlreadyAlive(_))
        ));

        store.remove(AgentId(4)).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.count, 5);
        assert!(matches!(store.remove(AgentId(4)), Err(AgentError::NotFound(_))));
        assert_eq!(store.position(AgentId(4)), None);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = AgentConfig { walk_speed: 0.0, ..AgentConfig::default() };
        assert!(matches!(AgentStoreBuilder::new(1).config(cfg).build(), Err(AgentError::Config(_))));
    }
}
