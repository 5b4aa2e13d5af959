use bevy_ecs::entity::Entity;
use bevy_ecs::message::{Message, Messages};
use bevy_ecs::world::World;

use crate::ecs::systems::siege::orchestrator::StartRefusal;
use crate::model::{Position, SiegeOutcome};

/// Audio cues the presentation layer may play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    SiegeHorn,
    WaveHorn,
    StructureHit,
    StructureCollapse,
    VictoryFanfare,
    DefeatToll,
}

/// Fire-and-forget presentation events. Nothing in the siege engine reads
/// them back; dropping them never affects simulation state.
#[derive(Message, Clone, Debug)]
pub enum SiegeEvent {
    Announcement {
        settlement: Entity,
        recipients: Vec<Entity>,
        text: String,
    },
    StartRefused {
        settlement: Entity,
        reason: StartRefusal,
    },
    Sound {
        cue: SoundCue,
        at: Position,
    },
    /// Attack animation and particles at the struck structure.
    AttackFeedback {
        attacker: Entity,
        structure: Entity,
        at: Position,
    },
    StructureRuined {
        structure: Entity,
        at: Position,
    },
    ProgressShown {
        settlement: Entity,
        viewers: Vec<Entity>,
        title: String,
        fraction: f64,
    },
    ProgressUpdated {
        settlement: Entity,
        title: String,
        fraction: f64,
    },
    ProgressHidden {
        settlement: Entity,
        viewers: Vec<Entity>,
    },
    SiegeEnded {
        settlement: Entity,
        outcome: SiegeOutcome,
    },
}

/// Queue a presentation event from exclusive code.
pub fn emit(world: &mut World, event: SiegeEvent) {
    if let Some(mut messages) = world.get_resource_mut::<Messages<SiegeEvent>>() {
        messages.write(event);
    }
}
