use super::{Entity, Scene};
use glam::{Mat4, Vec3};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
struct EntityState {
    enabled: bool,
    transform: Mat4,
    light_direction: Option<Vec3>,
}

/// Scene kept entirely in memory. Backs the demo viewer and the tests; a
/// GPU renderer adapter implements [`Scene`] the same way over its own
/// entity manager.
#[derive(Debug, Default)]
pub struct MemoryScene {
    entities: HashMap<Entity, EntityState>,
    next_id: u32,
    indirect_light_rotation: Option<Mat4>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, state: EntityState) -> Entity {
        self.next_id += 1;
        let entity = Entity(self.next_id);
        self.entities.insert(entity, state);
        entity
    }

    pub fn add_geometry(&mut self, transform: Mat4) -> Entity {
        self.insert(EntityState {
            enabled: true,
            transform,
            light_direction: None,
        })
    }

    pub fn add_directional_light(&mut self, direction: Vec3) -> Entity {
        self.insert(EntityState {
            enabled: true,
            transform: Mat4::IDENTITY,
            light_direction: Some(direction.normalize_or_zero()),
        })
    }

    pub fn add_skybox(&mut self, enabled: bool) -> Entity {
        self.insert(EntityState {
            enabled,
            transform: Mat4::IDENTITY,
            light_direction: None,
        })
    }

    pub fn remove(&mut self, entity: Entity) {
        self.entities.remove(&entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Scene for MemoryScene {
    fn set_entity_enabled(&mut self, entity: Entity, enabled: bool) {
        if let Some(state) = self.entities.get_mut(&entity) {
            state.enabled = enabled;
        }
    }

    fn is_entity_enabled(&self, entity: Entity) -> bool {
        self.entities
            .get(&entity)
            .map(|state| state.enabled)
            .unwrap_or(false)
    }

    fn entity_transform(&self, entity: Entity) -> Mat4 {
        self.entities
            .get(&entity)
            .map(|state| state.transform)
            .unwrap_or(Mat4::IDENTITY)
    }

    fn set_entity_transform(&mut self, entity: Entity, transform: Mat4) {
        if let Some(state) = self.entities.get_mut(&entity) {
            state.transform = transform;
        }
    }

    fn light_direction(&self, light: Entity) -> Vec3 {
        self.entities
            .get(&light)
            .and_then(|state| state.light_direction)
            .unwrap_or(Vec3::NEG_Z)
    }

    fn set_light_direction(&mut self, light: Entity, direction: Vec3) {
        if let Some(state) = self.entities.get_mut(&light) {
            if state.light_direction.is_some() {
                state.light_direction = Some(direction);
            } else {
                log::debug!("Entity {:?} is not a light; direction ignored", light);
            }
        }
    }

    fn indirect_light_rotation(&self) -> Mat4 {
        self.indirect_light_rotation.unwrap_or(Mat4::IDENTITY)
    }

    fn set_indirect_light_rotation(&mut self, rotation: Mat4) {
        self.indirect_light_rotation = Some(rotation);
    }

    fn set_skybox_enabled(&mut self, skybox: Entity, enabled: bool) {
        self.set_entity_enabled(skybox, enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryScene;
    use crate::render::{Entity, Scene};
    use glam::{Mat4, Vec3};

    #[test]
    fn unknown_entities_are_ignored() {
        let mut scene = MemoryScene::new();
        scene.set_entity_enabled(Entity(42), true);
        scene.set_entity_transform(Entity(42), Mat4::from_translation(Vec3::X));
        assert!(!scene.is_entity_enabled(Entity(42)));
        assert_eq!(scene.entity_transform(Entity(42)), Mat4::IDENTITY);
        assert!(scene.is_empty());
    }

    #[test]
    fn light_direction_round_trips_through_scene() {
        let mut scene = MemoryScene::new();
        let light = scene.add_directional_light(Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(scene.light_direction(light), Vec3::NEG_Y);
        scene.set_light_direction(light, Vec3::X);
        assert_eq!(scene.light_direction(light), Vec3::X);
    }

    #[test]
    fn geometry_does_not_accept_light_direction() {
        let mut scene = MemoryScene::new();
        let mesh = scene.add_geometry(Mat4::IDENTITY);
        scene.set_light_direction(mesh, Vec3::X);
        assert_eq!(scene.light_direction(mesh), Vec3::NEG_Z);
        assert_eq!(scene.len(), 1);
    }
}
