//! Buffer for the presentation event stream. The host drains it each frame
//! and renders messages, sounds and bars however it likes.

use std::collections::VecDeque;

use bevy_app::App;
use bevy_ecs::message::MessageReader;
use bevy_ecs::resource::Resource;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::ResMut;

use crate::ecs::events::SiegeEvent;
use crate::ecs::schedule::{SimPhase, SimTick};

pub const FEED_CAPACITY: usize = 1024;

/// Bounded queue of presentation events. The oldest events are dropped once full.
#[derive(Resource, Debug, Clone)]
pub struct PresentationFeed {
    events: VecDeque<SiegeEvent>,
    capacity: usize,
    dropped: u64,
}

impl Default for PresentationFeed {
    fn default() -> Self {
        Self::with_capacity(FEED_CAPACITY)
    }
}

impl PresentationFeed {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(FEED_CAPACITY)),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: SiegeEvent) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<SiegeEvent> {
        self.events.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiegeEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events discarded because the host did not drain in time.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

pub(crate) fn collect_presentation_events(
    mut events: MessageReader<SiegeEvent>,
    mut feed: ResMut<PresentationFeed>,
) {
    for event in events.read() {
        feed.push(event.clone());
    }
}

// ---------------------------------------------------------------------------
// Plugin registration
// ---------------------------------------------------------------------------

pub fn add_presentation_systems(app: &mut App) {
    app.add_systems(
        SimTick,
        collect_presentation_events.in_set(SimPhase::Reactions),
    );
}
