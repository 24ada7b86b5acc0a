//! Tests for ParticleClusterTemplate.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use crate::error::TemplateError;
    use crate::explosion::ParticleClusterTemplate;
    use crate::host::mesh::{CUBE_INDICES, CUBE_VERTICES};

    #[test]
    fn test_template_10x10_layout() {
        let template = ParticleClusterTemplate::from_seed(10, 10, 42).expect("valid template");
        let expected = 10 * 10 * CUBE_VERTICES;

        assert_eq!(template.vertex_count(), expected);
        assert_eq!(template.positions().len(), expected);
        assert_eq!(template.depths().len(), expected);
        assert_eq!(template.max_depths().len(), expected);
        assert_eq!(template.rotations().len(), expected);
        assert_eq!(template.phases().len(), expected);
        assert_eq!(template.scales().len(), expected);
        assert_eq!(template.indices().len(), 10 * 10 * CUBE_INDICES);
        assert!(template.indices().iter().all(|&i| (i as usize) < expected));
    }

    #[test]
    fn test_template_rejects_empty_dimensions() {
        assert_eq!(
            ParticleClusterTemplate::from_seed(0, 10, 42),
            Err(TemplateError::NoSmokes)
        );
        assert_eq!(
            ParticleClusterTemplate::from_seed(10, 0, 42),
            Err(TemplateError::NoLayers)
        );
    }

    #[test]
    fn test_template_rejects_overflowing_dimensions() {
        let result = ParticleClusterTemplate::from_seed(usize::MAX / 2, 4, 42);
        assert!(matches!(result, Err(TemplateError::TooLarge { .. })));
    }

    #[test]
    fn test_depths_evenly_spaced_per_layer() {
        let template = ParticleClusterTemplate::from_seed(3, 4, 7).expect("valid template");

        for (i, &depth) in template.depths().iter().enumerate() {
            let layer = (i / CUBE_VERTICES) % 4;
            assert_eq!(depth, layer as f32 / 4.0);
            assert!((0.0..1.0).contains(&depth));
        }
    }

    #[test]
    fn test_group_attributes_constant_and_in_range() {
        let template = ParticleClusterTemplate::from_seed(6, 5, 99).expect("valid template");

        for group in 0..6 {
            let first = template.vertex(group * 5 * CUBE_VERTICES).expect("vertex");

            assert!((0.0..1.0).contains(&first.max_depth));
            assert!((0.9..1.1).contains(&first.scale), "scale = {}", first.scale);
            assert!(first.phase.z >= 0.1 && first.phase.z < 0.3);
            assert!(first.phase.w >= 0.1 && first.phase.w < 0.3);
            // Small-angle offset: не больше ~0.05 оборота по каждой оси
            assert!(first.rotation.angle_between(Quat::IDENTITY) < 1.0);

            for vertex in template
                .vertices()
                .enumerate()
                .filter(|(i, _)| template.group_of(*i) == group)
                .map(|(_, v)| v)
            {
                assert_eq!(vertex.max_depth, first.max_depth);
                assert_eq!(vertex.scale, first.scale);
                assert_eq!(vertex.phase, first.phase);
                assert_eq!(vertex.rotation, first.rotation);
            }
        }
    }

    #[test]
    fn test_template_deterministic_for_seed() {
        let a = ParticleClusterTemplate::from_seed(10, 10, 1234).expect("valid template");
        let b = ParticleClusterTemplate::from_seed(10, 10, 1234).expect("valid template");
        let c = ParticleClusterTemplate::from_seed(10, 10, 4321).expect("valid template");

        assert_eq!(a, b);
        assert_ne!(a.max_depths(), c.max_depths());
    }
}
