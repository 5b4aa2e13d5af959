use std::collections::BTreeSet;

use bevy_ecs::entity::Entity;
use bevy_ecs::message::MessageWriter;
use bevy_ecs::query::With;
use bevy_ecs::system::{Query, ResMut};
use bevy_ecs::world::World;

use crate::ecs::components::{Combatant, Player, PlayerState};
use crate::ecs::events::{SiegeEvent, emit};
use crate::ecs::relationships::MemberOfSources;
use crate::ecs::resources::{SessionRegistry, SiegePhase};

/// Seconds between indicator viewer refreshes.
pub const VIEWER_REFRESH_SECS: u64 = 5;

/// Per-session progress display: "wave n / max" plus the surviving fraction
/// of the current wave.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressIndicator {
    wave: u32,
    max_waves: u32,
    fraction: f64,
    viewers: BTreeSet<Entity>,
    visible: bool,
}

impl ProgressIndicator {
    pub fn new(wave: u32, max_waves: u32) -> Self {
        Self {
            wave,
            max_waves,
            fraction: 1.0,
            viewers: BTreeSet::new(),
            visible: false,
        }
    }

    pub fn title(&self) -> String {
        format!("Siege: Wave {} / {}", self.wave, self.max_waves)
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn viewers(&self) -> Vec<Entity> {
        self.viewers.iter().copied().collect()
    }

    /// Switch to `wave` and reset the fraction to full. The wave shown never
    /// goes backwards.
    pub fn reset_wave(&mut self, wave: u32) {
        self.wave = self.wave.max(wave);
        self.fraction = 1.0;
    }

    /// Recompute the fraction as `remaining / wave_size`, clamped to [0, 1].
    pub fn update(&mut self, remaining: u32, wave_size: u32) {
        self.fraction = if wave_size == 0 {
            0.0
        } else {
            (f64::from(remaining) / f64::from(wave_size)).clamp(0.0, 1.0)
        };
    }

    /// Make the indicator visible to `viewers`. Returns the viewers that were
    /// not already watching.
    pub fn show_to(&mut self, viewers: &[Entity]) -> Vec<Entity> {
        self.visible = true;
        viewers
            .iter()
            .copied()
            .filter(|v| self.viewers.insert(*v))
            .collect()
    }

    /// Drop viewers not in `keep`. Returns the dropped viewers.
    pub fn retain_viewers(&mut self, keep: &BTreeSet<Entity>) -> Vec<Entity> {
        let dropped: Vec<Entity> = self.viewers.difference(keep).copied().collect();
        for viewer in &dropped {
            self.viewers.remove(viewer);
        }
        dropped
    }

    /// Hide from everyone. Only the first call returns viewers.
    pub fn hide_all(&mut self) -> Vec<Entity> {
        if !self.visible {
            return Vec::new();
        }
        self.visible = false;
        std::mem::take(&mut self.viewers).into_iter().collect()
    }
}

/// Keep each visible indicator in step with the settlement's online members.
pub(crate) fn refresh_viewers(
    mut registry: ResMut<SessionRegistry>,
    members: Query<&MemberOfSources>,
    players: Query<&PlayerState, With<Player>>,
    mut events: MessageWriter<SiegeEvent>,
) {
    let settlements = registry.settlements();
    for settlement in settlements {
        let online: BTreeSet<Entity> = members
            .get(settlement)
            .map(|m| {
                m.iter()
                    .copied()
                    .filter(|p| players.get(*p).is_ok_and(|s| s.online))
                    .collect()
            })
            .unwrap_or_default();

        let Some(session) = registry.get_mut(settlement) else {
            continue;
        };
        if !session.indicator.is_visible() {
            continue;
        }
        let dropped = session.indicator.retain_viewers(&online);
        let joined = session
            .indicator
            .show_to(&online.into_iter().collect::<Vec<_>>());
        if !dropped.is_empty() {
            events.write(SiegeEvent::ProgressHidden {
                settlement,
                viewers: dropped,
            });
        }
        if !joined.is_empty() {
            events.write(SiegeEvent::ProgressShown {
                settlement,
                viewers: joined,
                title: session.indicator.title(),
                fraction: session.indicator.fraction(),
            });
        }
    }
}

/// Bring each active wave's remaining count down to its alive combatants.
///
/// Covers hosts that despawn combatants without a death notification. The
/// count is never raised.
pub(crate) fn reconcile_remaining(world: &mut World) {
    let settlements = world.resource::<SessionRegistry>().settlements();
    for settlement in settlements {
        let alive = {
            let registry = world.resource::<SessionRegistry>();
            let Some(session) = registry.get(settlement) else {
                continue;
            };
            if session.phase != SiegePhase::WaveActive || session.remaining == 0 {
                continue;
            }
            session
                .combatants
                .iter()
                .filter(|e| world.get::<Combatant>(**e).is_some())
                .count() as u32
        };

        let update = {
            let mut registry = world.resource_mut::<SessionRegistry>();
            let Some(session) = registry.get_mut(settlement) else {
                continue;
            };
            if alive >= session.remaining {
                continue;
            }
            tracing::debug!(
                "reconciling {settlement:?}: {} recorded, {alive} alive",
                session.remaining
            );
            session.remaining = alive;
            let (remaining, wave_size) = (session.remaining, session.wave_size);
            session.indicator.update(remaining, wave_size);
            SiegeEvent::ProgressUpdated {
                settlement,
                title: session.indicator.title(),
                fraction: session.indicator.fraction(),
            }
        };
        emit(world, update);
    }
}
