use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;
use bevy_ecs::world::World;
use serde::{Deserialize, Serialize};

use crate::ecs::clock::SimClock;
use crate::ecs::components::SimEntity;
use crate::ecs::time::SimTime;
use crate::model::{EventEffect, SiegeEventKind, StateChange};

use super::sim_resources::EcsIdGenerator;

/// One entry in the siege audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiegeRecord {
    pub id: u64,
    pub kind: SiegeEventKind,
    pub timestamp: SimTime,
    /// Sim ID of the settlement under siege (0 if it could not be resolved).
    pub settlement_id: u64,
    pub description: String,
    pub data: serde_json::Value,
}

/// Accumulates siege records and their effects between flushes.
#[derive(Resource, Debug, Clone, Default)]
pub struct EventLog {
    pub records: Vec<SiegeRecord>,
    pub effects: Vec<EventEffect>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.effects.clear();
    }

    pub fn records_of(&self, kind: SiegeEventKind) -> impl Iterator<Item = &SiegeRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    pub fn count_of(&self, kind: SiegeEventKind) -> usize {
        self.records_of(kind).count()
    }
}

fn sim_id_of(world: &World, entity: Entity) -> u64 {
    world.get::<SimEntity>(entity).map(|s| s.id).unwrap_or(0)
}

/// Append a record for `settlement` at the current clock time. Returns its id.
pub fn log_record(
    world: &mut World,
    kind: SiegeEventKind,
    settlement: Entity,
    description: impl Into<String>,
    data: serde_json::Value,
) -> u64 {
    let id = world.resource_mut::<EcsIdGenerator>().next_id();
    let timestamp = world.resource::<SimClock>().time;
    let settlement_id = sim_id_of(world, settlement);
    let description = description.into();
    tracing::info!(kind = kind.as_str(), settlement_id, "{description}");
    world.resource_mut::<EventLog>().records.push(SiegeRecord {
        id,
        kind,
        timestamp,
        settlement_id,
        description,
        data,
    });
    id
}

/// Record a state-change effect against `entity` under record `event_id`.
pub fn log_effect(world: &mut World, event_id: u64, entity: Entity, effect: StateChange) {
    let entity_id = sim_id_of(world, entity);
    world.resource_mut::<EventLog>().effects.push(EventEffect {
        event_id,
        entity_id,
        effect,
    });
}

/// Record `EntityEnded` under `event_id` for entities already despawned.
pub fn log_ended(world: &mut World, event_id: u64, entity_ids: impl IntoIterator<Item = u64>) {
    let mut log = world.resource_mut::<EventLog>();
    for entity_id in entity_ids {
        log.effects.push(EventEffect {
            event_id,
            entity_id,
            effect: StateChange::EntityEnded,
        });
    }
}
