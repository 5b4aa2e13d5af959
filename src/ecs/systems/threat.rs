//! World-wide threat meter. When it saturates, a siege is forced on one
//! eligible settlement regardless of its cooldown.

use bevy_app::App;
use bevy_ecs::entity::Entity;
use bevy_ecs::query::With;
use bevy_ecs::resource::Resource;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::world::World;
use rand::Rng;

use crate::ecs::components::{Settlement, SettlementCore, SimEntity};
use crate::ecs::resources::{SessionRegistry, Terrain, ThreatRng, log_record};
use crate::ecs::schedule::{SiegeSet, SimTick};
use crate::ecs::systems::siege::orchestrator;
use crate::model::SiegeEventKind;

pub const DEFAULT_SATURATION: f64 = 100.0;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ThreatMeter {
    pub level: f64,
    pub saturation: f64,
}

impl Default for ThreatMeter {
    fn default() -> Self {
        Self {
            level: 0.0,
            saturation: DEFAULT_SATURATION,
        }
    }
}

impl ThreatMeter {
    /// Raise the level by `amount`, capped at saturation. Negative amounts are ignored.
    pub fn raise(&mut self, amount: f64) {
        if amount > 0.0 {
            self.level = (self.level + amount).min(self.saturation);
        }
    }

    pub fn is_saturated(&self) -> bool {
        self.level >= self.saturation
    }
}

/// Settlements with no live session and at least one online member, by sim id.
fn surge_candidates(world: &mut World) -> Vec<(Entity, Vec<String>)> {
    let mut candidates: Vec<(u64, Entity, Vec<String>)> = {
        let mut query =
            world.query_filtered::<(Entity, &SimEntity, &SettlementCore), With<Settlement>>();
        query
            .iter(world)
            .map(|(entity, sim, core)| (sim.id, entity, core.claims.clone()))
            .collect()
    };
    let world: &World = world;
    let registry = world.resource::<SessionRegistry>();
    candidates.retain(|(_, entity, _)| {
        !registry.contains(*entity) && !orchestrator::online_members(world, *entity).is_empty()
    });
    candidates.sort_by_key(|(id, _, _)| *id);
    candidates
        .into_iter()
        .map(|(_, entity, claims)| (entity, claims))
        .collect()
}

/// Exclusive system: on saturation, force a siege on one seeded pick.
pub(crate) fn check_threat_surge(world: &mut World) {
    if !world.resource::<ThreatMeter>().is_saturated() {
        return;
    }
    let candidates = surge_candidates(world);
    if candidates.is_empty() {
        tracing::debug!("threat saturated but no settlement can be besieged");
        return;
    }

    let first = world
        .resource_mut::<ThreatRng>()
        .0
        .random_range(0..candidates.len());
    // Start at the seeded pick and walk on past settlements whose claims don't resolve.
    for offset in 0..candidates.len() {
        let (settlement, claims) = &candidates[(first + offset) % candidates.len()];
        let origin = match world.resource::<Terrain>().resolve_first_claim(claims) {
            Ok(origin) => origin,
            Err(err) => {
                tracing::debug!("threat surge skipping {settlement:?}: {err}");
                continue;
            }
        };
        if !orchestrator::force_start(world, *settlement, origin) {
            continue;
        }
        let level = world.resource::<ThreatMeter>().level;
        log_record(
            world,
            SiegeEventKind::ThreatSurge,
            *settlement,
            "threat surge forced a siege",
            serde_json::json!({ "level": level, "origin": origin }),
        );
        world.resource_mut::<ThreatMeter>().level = 0.0;
        return;
    }
}

// ---------------------------------------------------------------------------
// Plugin registration
// ---------------------------------------------------------------------------

pub fn add_threat_systems(app: &mut App) {
    app.add_systems(SimTick, check_threat_surge.in_set(SiegeSet::Threat));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::app::build_siege_app;
    use crate::ecs::components::PlayerState;
    use crate::ecs::resources::EventLog;
    use crate::ecs::test_helpers::{spawn_test_settlement, tick};

    #[test]
    fn raise_caps_at_saturation() {
        let mut meter = ThreatMeter::default();
        meter.raise(60.0);
        meter.raise(-10.0);
        assert_eq!(meter.level, 60.0);
        assert!(!meter.is_saturated());
        meter.raise(70.0);
        assert_eq!(meter.level, 100.0);
        assert!(meter.is_saturated());
    }

    #[test]
    fn surge_forces_siege_despite_cooldown() {
        let mut app = build_siege_app();
        let settlement = spawn_test_settlement(&mut app, "Stonewatch");
        app.world_mut()
            .get_mut::<SettlementCore>(settlement)
            .unwrap()
            .last_siege = Some(crate::ecs::time::SimTime::from_secs(0));
        app.world_mut().resource_mut::<ThreatMeter>().raise(100.0);

        tick(&mut app);
        let registry = app.world().resource::<SessionRegistry>();
        assert!(registry.get(settlement).is_some_and(|s| s.forced));
        assert_eq!(app.world().resource::<ThreatMeter>().level, 0.0);
        assert_eq!(
            app.world().resource::<EventLog>().count_of(SiegeEventKind::ThreatSurge),
            1
        );
    }

    #[test]
    fn surge_waits_for_an_online_member() {
        let mut app = build_siege_app();
        let settlement = spawn_test_settlement(&mut app, "Stonewatch");
        let member = orchestrator::online_members(app.world(), settlement)[0];
        app.world_mut().get_mut::<PlayerState>(member).unwrap().online = false;
        app.world_mut().resource_mut::<ThreatMeter>().raise(100.0);

        tick(&mut app);
        assert!(app.world().resource::<SessionRegistry>().is_empty());
        assert!(app.world().resource::<ThreatMeter>().is_saturated());

        app.world_mut().get_mut::<PlayerState>(member).unwrap().online = true;
        tick(&mut app);
        assert!(app.world().resource::<SessionRegistry>().contains(settlement));
    }
}
