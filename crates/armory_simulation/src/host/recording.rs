//! RecordingHost — mock хоста для unit тестов (пишет все вызовы)

use std::cell::Cell;
use std::collections::HashMap;

use bevy::prelude::*;

use super::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsCall {
    EnableGeometry(BodyId),
    DisableGeometry(BodyId),
    EnableQueries(BodyId),
    DisableQueries(BodyId),
    SetTransform(BodyId, Vec3),
}

pub struct RecordingHost {
    pub calls: Vec<PhysicsCall>,
    pub holder: Option<ObjectHandle>,
    /// Что вернёт любой raycast
    pub ray_hit: Option<Vec3>,
    pub raycasts: Cell<usize>,
    pub body_transform: Transform,
    pub objects: HashMap<ObjectHandle, Transform>,
    pub reject_transforms: bool,
    /// get_physics_transform отвечает ошибкой
    pub fail_physics_reads: bool,
    pub added: Vec<RenderNodeId>,
    pub updated: Vec<RenderNode>,
    pub removed: Vec<RenderNodeId>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            holder: None,
            ray_hit: None,
            raycasts: Cell::new(0),
            body_transform: Transform::IDENTITY,
            objects: HashMap::new(),
            reject_transforms: false,
            fail_physics_reads: false,
            added: Vec::new(),
            updated: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl RecordingHost {
    pub fn count(&self, call: PhysicsCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    pub fn toggle_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| !matches!(c, PhysicsCall::SetTransform(..)))
            .count()
    }
}

impl PhysicsService for RecordingHost {
    fn raycast(&self, _origin: Vec3, _direction: Vec3) -> Option<RaycastHit> {
        self.raycasts.set(self.raycasts.get() + 1);
        self.ray_hit.map(|point| RaycastHit { point })
    }

    fn cook_convex_geometry(&mut self, vertices: &[Vec3]) -> Result<CookedGeometry, PhysicsError> {
        if vertices.len() < 4 {
            return Err(PhysicsError::DegenerateMesh {
                vertices: vertices.len(),
            });
        }
        Ok(CookedGeometry(0))
    }

    fn add_cooked_convex_geometry(
        &mut self,
        _geometry: &CookedGeometry,
        position: Vec3,
        orientation: Quat,
    ) -> Result<BodyId, PhysicsError> {
        self.body_transform = Transform::from_translation(position).with_rotation(orientation);
        Ok(BodyId(1))
    }

    fn enable_geometry(&mut self, body: BodyId) {
        self.calls.push(PhysicsCall::EnableGeometry(body));
    }

    fn disable_geometry(&mut self, body: BodyId) {
        self.calls.push(PhysicsCall::DisableGeometry(body));
    }

    fn enable_geometry_queries(&mut self, body: BodyId) {
        self.calls.push(PhysicsCall::EnableQueries(body));
    }

    fn disable_geometry_queries(&mut self, body: BodyId) {
        self.calls.push(PhysicsCall::DisableQueries(body));
    }

    fn set_physics_transform(
        &mut self,
        body: BodyId,
        position: Vec3,
        orientation: Quat,
    ) -> Result<(), PhysicsError> {
        if self.reject_transforms {
            return Err(PhysicsError::TransformRejected {
                body,
                reason: "test rejection".into(),
            });
        }
        self.calls.push(PhysicsCall::SetTransform(body, position));
        self.body_transform = Transform::from_translation(position).with_rotation(orientation);
        Ok(())
    }

    fn get_physics_transform(&self, body: BodyId) -> Result<Transform, PhysicsError> {
        if self.fail_physics_reads {
            Err(PhysicsError::TransformRejected {
                body,
                reason: "test read failure".into(),
            })
        } else if body == BodyId(1) {
            Ok(self.body_transform)
        } else {
            Err(PhysicsError::UnknownBody(body))
        }
    }
}

impl GrabService for RecordingHost {
    fn get_grab(&self, hand: Hand) -> Option<ObjectHandle> {
        match hand {
            Hand::Right => self.holder,
            Hand::Left => None,
        }
    }
}

impl SceneService for RecordingHost {
    fn object_transform(&self, object: ObjectHandle) -> Transform {
        self.objects.get(&object).copied().unwrap_or_default()
    }

    fn set_object_transform(&mut self, object: ObjectHandle, transform: Transform) {
        self.objects.insert(object, transform);
    }

    fn add(&mut self, node: RenderNode) {
        self.added.push(node.id());
    }

    fn update(&mut self, node: RenderNode) {
        self.updated.push(node);
    }

    fn remove(&mut self, id: RenderNodeId) {
        self.removed.push(id);
    }
}
