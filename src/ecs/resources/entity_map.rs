use std::collections::BTreeMap;

use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;

/// Bidirectional mapping between simulation IDs (u64) and Bevy entities.
///
/// Simulation IDs are what the audit trail and external registries refer to;
/// entities are only meaningful inside one running app.
#[derive(Resource, Debug, Clone, Default)]
pub struct SimEntityMap {
    to_bevy: BTreeMap<u64, Entity>,
    to_sim: BTreeMap<Entity, u64>,
}

impl SimEntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping. Returns false (and changes nothing) if either side is
    /// already registered.
    pub fn insert(&mut self, sim_id: u64, entity: Entity) -> bool {
        if self.to_bevy.contains_key(&sim_id) || self.to_sim.contains_key(&entity) {
            tracing::warn!("duplicate registration of sim_id {sim_id} / {entity:?}");
            return false;
        }
        self.to_bevy.insert(sim_id, entity);
        self.to_sim.insert(entity, sim_id);
        true
    }

    /// Drop the mapping for a despawned entity.
    pub fn remove_entity(&mut self, entity: Entity) -> Option<u64> {
        let sim_id = self.to_sim.remove(&entity)?;
        self.to_bevy.remove(&sim_id);
        Some(sim_id)
    }

    pub fn get_bevy(&self, sim_id: u64) -> Option<Entity> {
        self.to_bevy.get(&sim_id).copied()
    }

    pub fn get_sim(&self, entity: Entity) -> Option<u64> {
        self.to_sim.get(&entity).copied()
    }

    pub fn len(&self) -> usize {
        self.to_bevy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_bevy.is_empty()
    }
}
