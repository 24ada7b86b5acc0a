//! Tests for Projectile / ProjectileManager.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use crate::host::recording::RecordingHost;
    use crate::host::{ObjectHandle, RenderNode, RenderNodeId};
    use crate::shared::Lifecycle;
    use crate::weapon::{Projectile, ProjectileManager, TerminationCause};

    const VELOCITY: Vec3 = Vec3::new(0.0, 0.0, -10.0);
    const WEAPON: ObjectHandle = ObjectHandle(5);

    fn shot_at_origin() -> Projectile {
        Projectile {
            id: 0,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            velocity: VELOCITY,
            spawn_time: 0.0,
            expiry_time: 5000.0,
        }
    }

    #[test]
    fn test_miss_moves_full_displacement() {
        let host = RecordingHost::default();
        let mut shot = shot_at_origin();

        assert_eq!(shot.advance(16.0, 0.05, &host), Lifecycle::Active);
        assert!((shot.position - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-6);
        assert_eq!(host.raycasts.get(), 1);
    }

    #[test]
    fn test_hit_inside_step_truncates_at_hit_point() {
        let host = RecordingHost {
            ray_hit: Some(Vec3::new(0.0, 0.0, -0.3)),
            ..Default::default()
        };
        let mut shot = shot_at_origin();

        match shot.advance(16.0, 0.05, &host) {
            Lifecycle::Terminal(request) => {
                assert_eq!(request.cause, TerminationCause::Hit);
                assert_eq!(request.position, Vec3::new(0.0, 0.0, -0.3));
                assert_eq!(request.orientation, Quat::IDENTITY);
            }
            Lifecycle::Active => panic!("shot should hit the wall"),
        }
    }

    #[test]
    fn test_hit_beyond_step_is_ignored() {
        let host = RecordingHost {
            ray_hit: Some(Vec3::new(0.0, 0.0, -3.0)),
            ..Default::default()
        };
        let mut shot = shot_at_origin();

        assert_eq!(shot.advance(16.0, 0.05, &host), Lifecycle::Active);
        assert!((shot.position.z + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_expiry_wins_over_collision() {
        let host = RecordingHost {
            ray_hit: Some(Vec3::new(0.0, 0.0, -0.1)),
            ..Default::default()
        };
        let mut shot = shot_at_origin();
        shot.position = Vec3::new(1.0, 0.0, -2.0);

        match shot.advance(5000.0, 0.05, &host) {
            Lifecycle::Terminal(request) => {
                assert_eq!(request.cause, TerminationCause::Expired);
                assert_eq!(request.position, Vec3::new(1.0, 0.0, -2.0));
            }
            Lifecycle::Active => panic!("expired shot must terminate"),
        }
        // Истёкшая пуля не делает raycast
        assert_eq!(host.raycasts.get(), 0);
    }

    #[test]
    fn test_rotated_shot_flies_along_local_forward() {
        let host = RecordingHost::default();
        let mut shot = shot_at_origin();
        // -Z повёрнутый на 90° вокруг Y → -X
        shot.orientation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);

        shot.advance(16.0, 0.1, &host);
        assert!((shot.position - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5, "{:?}", shot.position);
    }

    #[test]
    fn test_zero_dt_keeps_position() {
        let host = RecordingHost::default();
        let mut shot = shot_at_origin();

        assert_eq!(shot.advance(0.0, 0.0, &host), Lifecycle::Active);
        assert_eq!(shot.position, Vec3::ZERO);
    }

    #[test]
    fn test_manager_spawn_and_prune() {
        let mut host = RecordingHost::default();
        let mut manager = ProjectileManager::new(WEAPON, VELOCITY, 5000.0);

        let first = manager.spawn(Vec3::ZERO, Quat::IDENTITY, 0.0, &mut host);
        let second = manager.spawn(Vec3::X, Quat::IDENTITY, 100.0, &mut host);
        assert_ne!(first, second);
        assert_eq!(manager.active().len(), 2);
        assert_eq!(manager.active()[1].expiry_time, 5100.0);
        assert_eq!(
            host.added,
            vec![RenderNodeId::Shot(WEAPON, first), RenderNodeId::Shot(WEAPON, second)]
        );

        // now = 5000: первая истекла, вторая ещё летит
        let requests = manager.tick(5000.0, 0.05, &mut host);

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].cause, TerminationCause::Expired);
        assert_eq!(manager.active().len(), 1);
        assert_eq!(manager.active()[0].id, second);
        assert_eq!(host.removed, vec![RenderNodeId::Shot(WEAPON, first)]);
        assert!(matches!(
            host.updated.last(),
            Some(RenderNode::Shot { id, .. }) if *id == second
        ));
    }

    #[test]
    fn test_managers_of_different_weapons_use_distinct_nodes() {
        let mut host = RecordingHost::default();
        let other = ObjectHandle(6);
        let mut left = ProjectileManager::new(WEAPON, VELOCITY, 5000.0);
        let mut right = ProjectileManager::new(other, VELOCITY, 5000.0);

        let a = left.spawn(Vec3::ZERO, Quat::IDENTITY, 0.0, &mut host);
        let b = right.spawn(Vec3::X, Quat::IDENTITY, 0.0, &mut host);

        // Локальные id совпадают, ключи render list — нет
        assert_eq!(a, b);
        assert_eq!(
            host.added,
            vec![RenderNodeId::Shot(WEAPON, a), RenderNodeId::Shot(other, b)]
        );
        assert_eq!(host.added[1].weapon(), other);
    }
}
