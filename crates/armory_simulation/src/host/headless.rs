//! HeadlessHost — in-process reference runtime (harness + integration tests)
//!
//! Не физический движок: хранит cooked shapes как rapier `Collider`
//! (convex hull через parry), raycast'ит по ним перебором и грубо роняет
//! simulated bodies под гравитацией на плоскость пола.
//!
//! Grab slots, externally-driven transforms и render list — простые HashMap'ы.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use super::*;
use crate::logger;

/// Тело в headless мире
struct Body {
    collider: Collider,
    transform: Transform,
    velocity: Vec3,
    geometry_enabled: bool,
    queries_enabled: bool,
    /// false = static world geometry (стены, пол) — гравитация не действует
    dynamic: bool,
}

pub struct HeadlessHost {
    cooked: Vec<Collider>,
    bodies: Vec<Body>,
    grabs: HashMap<Hand, ObjectHandle>,
    objects: HashMap<ObjectHandle, Transform>,
    nodes: HashMap<RenderNodeId, RenderNode>,
    /// Сила гравитации (m/s²)
    pub gravity: f32,
    /// Высота пола (simulated bodies не проваливаются ниже)
    pub ground_height: f32,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self {
            cooked: Vec::new(),
            bodies: Vec::new(),
            grabs: HashMap::new(),
            objects: HashMap::new(),
            nodes: HashMap::new(),
            gravity: -9.81,
            ground_height: 0.0,
        }
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn body(&self, id: BodyId) -> Result<&Body, PhysicsError> {
        self.bodies.get(id.0 as usize).ok_or(PhysicsError::UnknownBody(id))
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        let body = self.bodies.get_mut(id.0 as usize);
        if body.is_none() {
            logger::log_warning(&format!("HeadlessHost: unknown body {:?}", id));
        }
        body
    }

    /// Static box в мире (стена/пол), сразу участвует в raycast
    pub fn add_static_cuboid(&mut self, half_extents: Vec3, transform: Transform) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(Body {
            collider: Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
            transform,
            velocity: Vec3::ZERO,
            geometry_enabled: true,
            queries_enabled: true,
            dynamic: false,
        });
        id
    }

    /// Разместить scene-объект (например pickup оружия)
    pub fn place_object(&mut self, object: ObjectHandle, transform: Transform) {
        self.objects.insert(object, transform);
    }

    /// Актёр берёт объект в руку
    pub fn grab(&mut self, hand: Hand, object: ObjectHandle) {
        self.grabs.insert(hand, object);
    }

    /// Рука отпускает всё, что держала
    pub fn release(&mut self, hand: Hand) {
        self.grabs.remove(&hand);
    }

    /// (geometry_enabled, queries_enabled)
    pub fn body_flags(&self, id: BodyId) -> Option<(bool, bool)> {
        self.bodies
            .get(id.0 as usize)
            .map(|b| (b.geometry_enabled, b.queries_enabled))
    }

    pub fn render_nodes(&self) -> impl Iterator<Item = &RenderNode> {
        self.nodes.values()
    }

    pub fn render_node(&self, id: RenderNodeId) -> Option<&RenderNode> {
        self.nodes.get(&id)
    }

    pub fn explosion_count(&self) -> usize {
        self.nodes
            .keys()
            .filter(|id| matches!(id, RenderNodeId::Explosion(..)))
            .count()
    }

    pub fn shot_count(&self) -> usize {
        self.nodes
            .keys()
            .filter(|id| matches!(id, RenderNodeId::Shot(..)))
            .count()
    }

    /// Один шаг "мира": гравитация для enabled dynamic bodies + пол
    pub fn step(&mut self, dt: f32) {
        let ground = self.ground_height;
        for body in self.bodies.iter_mut().filter(|b| b.dynamic && b.geometry_enabled) {
            body.velocity.y += self.gravity * dt;
            body.transform.translation += body.velocity * dt;

            if body.transform.translation.y <= ground {
                body.transform.translation.y = ground;
                body.velocity = Vec3::ZERO;
            }
        }
    }
}

impl PhysicsService for HeadlessHost {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RaycastHit> {
        let direction = direction.try_normalize()?;

        self.bodies
            .iter()
            .filter(|b| b.queries_enabled)
            .filter_map(|b| {
                b.collider.cast_ray(
                    b.transform.translation,
                    b.transform.rotation,
                    origin,
                    direction,
                    f32::MAX,
                    true,
                )
            })
            .min_by(|a, b| a.total_cmp(b))
            .map(|toi| RaycastHit {
                point: origin + direction * toi,
            })
    }

    fn cook_convex_geometry(&mut self, vertices: &[Vec3]) -> Result<CookedGeometry, PhysicsError> {
        let degenerate = PhysicsError::DegenerateMesh {
            vertices: vertices.len(),
        };
        // Меньше тетраэдра hull не построить
        if vertices.len() < 4 {
            return Err(degenerate);
        }
        let collider = Collider::convex_hull(vertices).ok_or(degenerate)?;

        let id = self.cooked.len() as u32;
        self.cooked.push(collider);

        logger::log(&format!(
            "HeadlessHost: cooked convex geometry #{} from {} vertices",
            id,
            vertices.len()
        ));

        Ok(CookedGeometry(id))
    }

    fn add_cooked_convex_geometry(
        &mut self,
        geometry: &CookedGeometry,
        position: Vec3,
        orientation: Quat,
    ) -> Result<BodyId, PhysicsError> {
        let collider = self
            .cooked
            .get(geometry.0 as usize)
            .cloned()
            .ok_or(PhysicsError::UnknownGeometry(geometry.0))?;

        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(Body {
            collider,
            transform: Transform::from_translation(position).with_rotation(orientation),
            velocity: Vec3::ZERO,
            geometry_enabled: true,
            queries_enabled: true,
            dynamic: true,
        });

        Ok(id)
    }

    fn enable_geometry(&mut self, body: BodyId) {
        if let Some(body) = self.body_mut(body) {
            body.geometry_enabled = true;
        }
    }

    fn disable_geometry(&mut self, body: BodyId) {
        if let Some(body) = self.body_mut(body) {
            body.geometry_enabled = false;
            body.velocity = Vec3::ZERO;
        }
    }

    fn enable_geometry_queries(&mut self, body: BodyId) {
        if let Some(body) = self.body_mut(body) {
            body.queries_enabled = true;
        }
    }

    fn disable_geometry_queries(&mut self, body: BodyId) {
        if let Some(body) = self.body_mut(body) {
            body.queries_enabled = false;
        }
    }

    fn set_physics_transform(
        &mut self,
        body: BodyId,
        position: Vec3,
        orientation: Quat,
    ) -> Result<(), PhysicsError> {
        if !position.is_finite() || !orientation.is_finite() {
            return Err(PhysicsError::TransformRejected {
                body,
                reason: format!("non-finite transform {:?} / {:?}", position, orientation),
            });
        }

        let target = self
            .bodies
            .get_mut(body.0 as usize)
            .ok_or(PhysicsError::UnknownBody(body))?;
        target.transform.translation = position;
        target.transform.rotation = orientation;
        Ok(())
    }

    fn get_physics_transform(&self, body: BodyId) -> Result<Transform, PhysicsError> {
        self.body(body).map(|b| b.transform)
    }
}

impl GrabService for HeadlessHost {
    fn get_grab(&self, hand: Hand) -> Option<ObjectHandle> {
        self.grabs.get(&hand).copied()
    }
}

impl SceneService for HeadlessHost {
    fn object_transform(&self, object: ObjectHandle) -> Transform {
        self.objects.get(&object).copied().unwrap_or_default()
    }

    fn set_object_transform(&mut self, object: ObjectHandle, transform: Transform) {
        self.objects.insert(object, transform);
    }

    fn add(&mut self, node: RenderNode) {
        self.nodes.insert(node.id(), node);
    }

    fn update(&mut self, node: RenderNode) {
        self.nodes.insert(node.id(), node);
    }

    fn remove(&mut self, id: RenderNodeId) {
        self.nodes.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raycast_hits_nearest_static_box() {
        let mut host = HeadlessHost::new();
        host.add_static_cuboid(Vec3::splat(0.5), Transform::from_xyz(0.0, 0.0, -5.0));
        host.add_static_cuboid(Vec3::splat(0.5), Transform::from_xyz(0.0, 0.0, -10.0));

        let hit = host.raycast(Vec3::ZERO, Vec3::NEG_Z).expect("hit");
        assert!((hit.point - Vec3::new(0.0, 0.0, -4.5)).length() < 1e-4, "{:?}", hit.point);

        assert!(host.raycast(Vec3::ZERO, Vec3::Z).is_none());
    }

    #[test]
    fn test_disabled_queries_are_invisible_to_raycast() {
        let mut host = HeadlessHost::new();
        let wall = host.add_static_cuboid(Vec3::splat(0.5), Transform::from_xyz(0.0, 0.0, -5.0));

        host.disable_geometry_queries(wall);
        assert!(host.raycast(Vec3::ZERO, Vec3::NEG_Z).is_none());
        assert_eq!(host.body_flags(wall), Some((true, false)));
    }

    #[test]
    fn test_cooked_body_falls_to_ground_when_enabled() {
        let mut host = HeadlessHost::new();
        let hull = crate::host::mesh::cube(0.2).positions;
        let cooked = host.cook_convex_geometry(&hull).expect("cook");
        let body = host
            .add_cooked_convex_geometry(&cooked, Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY)
            .expect("add");

        for _ in 0..120 {
            host.step(1.0 / 60.0);
        }
        let t = host.get_physics_transform(body).expect("transform");
        assert_eq!(t.translation.y, 0.0);

        // Disabled body не двигается
        host.set_physics_transform(body, Vec3::new(0.0, 3.0, 0.0), Quat::IDENTITY)
            .expect("set");
        host.disable_geometry(body);
        host.step(0.5);
        assert_eq!(host.get_physics_transform(body).expect("transform").translation.y, 3.0);
    }

    #[test]
    fn test_rejects_degenerate_and_non_finite_input() {
        let mut host = HeadlessHost::new();
        assert!(host.cook_convex_geometry(&[Vec3::ZERO]).is_err());
        assert!(matches!(
            host.set_physics_transform(BodyId(0), Vec3::NAN, Quat::IDENTITY),
            Err(PhysicsError::TransformRejected { .. })
        ));
        assert_eq!(
            host.get_physics_transform(BodyId(3)),
            Err(PhysicsError::UnknownBody(BodyId(3)))
        );
    }
}
