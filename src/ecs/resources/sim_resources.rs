use std::hash::{DefaultHasher, Hash, Hasher};

use bevy_ecs::resource::Resource;
use bevy_ecs::world::World;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::ecs::clock::SimClock;

/// Deterministic root RNG for the simulation.
#[derive(Resource)]
pub struct SimRng {
    pub rng: SmallRng,
    pub seed: u64,
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-domain RNG resources
// ---------------------------------------------------------------------------

macro_rules! domain_rng {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Resource)]
        pub struct $name(pub SmallRng);

        impl Default for $name {
            fn default() -> Self {
                Self(SmallRng::seed_from_u64(0))
            }
        }
    };
}

domain_rng!(SiegeRng, "Per-domain RNG for wave spawning.");
domain_rng!(ThreatRng, "Per-domain RNG for threat-triggered sieges.");

/// Derive a deterministic per-domain seed from the global seed, domain name, and tick count.
fn derive_domain_seed(seed: u64, domain: &str, tick: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    domain.hash(&mut hasher);
    tick.hash(&mut hasher);
    hasher.finish()
}

/// Exclusive system that re-seeds all per-domain RNGs each tick.
/// Runs in `SimPhase::PreUpdate` before any siege systems.
pub fn distribute_rng(world: &mut World) {
    let seed = world.resource::<SimRng>().seed;
    let tick = world.resource::<SimClock>().tick_count;
    world.resource_mut::<SiegeRng>().0 =
        SmallRng::seed_from_u64(derive_domain_seed(seed, "siege", tick));
    world.resource_mut::<ThreatRng>().0 =
        SmallRng::seed_from_u64(derive_domain_seed(seed, "threat", tick));
}

/// Monotonic ID generator for combatants and audit records.
/// IDs are globally unique across both.
#[derive(Resource, Debug)]
pub struct EcsIdGenerator {
    next: u64,
}

impl EcsIdGenerator {
    pub fn starting_from(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for EcsIdGenerator {
    fn default() -> Self {
        Self::starting_from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids() {
        let mut ids = EcsIdGenerator::default();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
    }

    #[test]
    fn starting_from_offsets_ids() {
        let mut ids = EcsIdGenerator::starting_from(10_000);
        assert_eq!(ids.next_id(), 10_000);
    }

    #[test]
    fn domain_seeds_differ_by_domain_and_tick() {
        let a = derive_domain_seed(42, "siege", 1);
        assert_eq!(a, derive_domain_seed(42, "siege", 1));
        assert_ne!(a, derive_domain_seed(42, "threat", 1));
        assert_ne!(a, derive_domain_seed(42, "siege", 2));
    }
}
