use std::collections::BTreeMap;

use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;

use crate::ecs::systems::siege::progress::ProgressIndicator;
use crate::ecs::time::SimTime;
use crate::model::Position;

/// Where a live session is within its current wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiegePhase {
    /// Hostiles of the current wave are on the field.
    WaveActive,
    /// Previous wave cleared; the current wave spawns at `resume_at`.
    WaveTransition { resume_at: SimTime },
    /// The scheduled continuation could not resolve a spawn point.
    Stalled { since: SimTime },
}

/// Externally observable siege state of one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiegeState {
    Inactive,
    WaveActive(u32),
    /// Wave `n` cleared, wave `n + 1` pending.
    WaveTransition(u32),
    /// Wave `n` could not be spawned.
    Stalled(u32),
}

/// Live state of one ongoing siege against one settlement.
#[derive(Debug, Clone)]
pub struct SiegeSession {
    pub settlement: Entity,
    pub started: SimTime,
    /// 1-based; never decreases.
    pub wave: u32,
    pub max_waves: u32,
    /// When the current wave was scheduled or spawned. Drives the wave timeout.
    pub wave_started: SimTime,
    /// Hostiles spawned for the current wave.
    pub wave_size: u32,
    /// Hostiles of this session still alive.
    pub remaining: u32,
    pub phase: SiegePhase,
    pub indicator: ProgressIndicator,
    /// Every combatant spawned by this session, in spawn order.
    pub combatants: Vec<Entity>,
    /// Started by the threat meter, bypassing cooldown.
    pub forced: bool,
    /// Where the siege began. Resolution sounds play here.
    pub origin: Position,
    /// Sim ids of counted deaths not yet written to the audit trail.
    pub fallen: Vec<u64>,
}

impl SiegeSession {
    pub fn new(settlement: Entity, started: SimTime, max_waves: u32) -> Self {
        Self {
            settlement,
            started,
            wave: 1,
            max_waves,
            wave_started: started,
            wave_size: 0,
            remaining: 0,
            phase: SiegePhase::WaveActive,
            indicator: ProgressIndicator::new(1, max_waves),
            combatants: Vec::new(),
            forced: false,
            origin: Position::default(),
            fallen: Vec::new(),
        }
    }

    pub fn state(&self) -> SiegeState {
        match self.phase {
            SiegePhase::WaveActive => SiegeState::WaveActive(self.wave),
            SiegePhase::WaveTransition { .. } => {
                SiegeState::WaveTransition(self.wave.saturating_sub(1))
            }
            SiegePhase::Stalled { .. } => SiegeState::Stalled(self.wave),
        }
    }

    pub fn is_final_wave(&self) -> bool {
        self.wave >= self.max_waves
    }

    pub fn owns(&self, combatant: Entity) -> bool {
        self.combatants.contains(&combatant)
    }

    /// Count one death. Returns true if this emptied the wave.
    pub fn record_death(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.indicator.update(self.remaining, self.wave_size);
        self.remaining == 0
    }
}

/// Settlement → active siege session. At most one session per settlement.
///
/// The only shared mutable siege state. Bevy's scheduler grants `ResMut`
/// access to one system at a time, so systems in other sets may read it
/// without further locking.
#[derive(Resource, Debug, Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<Entity, SiegeSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session. Returns false without replacing if one already exists.
    pub fn insert(&mut self, session: SiegeSession) -> bool {
        if self.sessions.contains_key(&session.settlement) {
            return false;
        }
        self.sessions.insert(session.settlement, session);
        true
    }

    pub fn remove(&mut self, settlement: Entity) -> Option<SiegeSession> {
        self.sessions.remove(&settlement)
    }

    pub fn get(&self, settlement: Entity) -> Option<&SiegeSession> {
        self.sessions.get(&settlement)
    }

    pub fn get_mut(&mut self, settlement: Entity) -> Option<&mut SiegeSession> {
        self.sessions.get_mut(&settlement)
    }

    pub fn contains(&self, settlement: Entity) -> bool {
        self.sessions.contains_key(&settlement)
    }

    pub fn state_of(&self, settlement: Entity) -> SiegeState {
        self.get(settlement)
            .map(SiegeSession::state)
            .unwrap_or(SiegeState::Inactive)
    }

    /// Settlements with a live session, in a stable order.
    pub fn settlements(&self) -> Vec<Entity> {
        self.sessions.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiegeSession> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use bevy_ecs::world::World;

    use super::*;

    #[test]
    fn second_insert_for_same_settlement_is_rejected() {
        let mut world = World::new();
        let settlement = world.spawn_empty().id();
        let mut registry = SessionRegistry::new();
        assert!(registry.insert(SiegeSession::new(settlement, SimTime::from_secs(0), 5)));
        let mut replacement = SiegeSession::new(settlement, SimTime::from_secs(9), 5);
        replacement.wave = 3;
        assert!(!registry.insert(replacement));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(settlement).unwrap().wave, 1);
    }

    #[test]
    fn state_reflects_phase() {
        let mut world = World::new();
        let settlement = world.spawn_empty().id();
        let mut registry = SessionRegistry::new();
        assert_eq!(registry.state_of(settlement), SiegeState::Inactive);

        registry.insert(SiegeSession::new(settlement, SimTime::from_secs(0), 5));
        assert_eq!(registry.state_of(settlement), SiegeState::WaveActive(1));

        let session = registry.get_mut(settlement).unwrap();
        session.wave = 2;
        session.phase = SiegePhase::WaveTransition {
            resume_at: SimTime::from_secs(10),
        };
        assert_eq!(registry.state_of(settlement), SiegeState::WaveTransition(1));

        registry.remove(settlement);
        assert_eq!(registry.state_of(settlement), SiegeState::Inactive);
    }

    #[test]
    fn record_death_reports_wave_cleared_once() {
        let mut world = World::new();
        let settlement = world.spawn_empty().id();
        let mut session = SiegeSession::new(settlement, SimTime::from_secs(0), 5);
        session.wave_size = 2;
        session.remaining = 2;
        assert!(!session.record_death());
        assert!((session.indicator.fraction() - 0.5).abs() < 1e-9);
        assert!(session.record_death());
        assert!(!session.record_death());
        assert_eq!(session.remaining, 0);
    }
}
