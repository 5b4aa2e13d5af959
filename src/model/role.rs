use serde::{Deserialize, Serialize};

use super::structure::StructureCategory;

/// Behavioral classification of a spawned combatant. Fixed at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CombatantRole {
    #[default]
    Grunt,
    Breacher,
    Saboteur,
}

string_enum!(CombatantRole {
    Grunt => "grunt",
    Breacher => "breacher",
    Saboteur => "saboteur",
});

impl CombatantRole {
    /// Parse a host-supplied role tag, falling back to `Grunt`.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|err| {
            tracing::warn!("{err}; treating combatant as grunt");
            CombatantRole::Grunt
        })
    }

    /// Structure categories this role hunts before falling back to grunt behavior.
    /// Empty for grunts, which only ever fall back to "any structure".
    pub fn priority_categories(self) -> &'static [StructureCategory] {
        match self {
            CombatantRole::Grunt => &[],
            CombatantRole::Breacher => &[StructureCategory::Defensive],
            CombatantRole::Saboteur => {
                &[StructureCategory::Generator, StructureCategory::CommandNexus]
            }
        }
    }

    pub fn hostile_kind(self) -> HostileKind {
        match self {
            CombatantRole::Grunt => HostileKind::Raider,
            CombatantRole::Breacher => HostileKind::Ravager,
            CombatantRole::Saboteur => HostileKind::Skirmisher,
        }
    }
}

/// Cosmetic archetype a role is spawned as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum HostileKind {
    Raider,
    Ravager,
    /// Ranged specialist.
    Skirmisher,
}

string_enum!(HostileKind {
    Raider => "raider",
    Ravager => "ravager",
    Skirmisher => "skirmisher",
});

impl HostileKind {
    pub fn max_health(self) -> f64 {
        match self {
            HostileKind::Raider => 20.0,
            HostileKind::Ravager => 40.0,
            HostileKind::Skirmisher => 16.0,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HostileKind::Raider => "Siege Raider",
            HostileKind::Ravager => "Siege Ravager",
            HostileKind::Skirmisher => "Siege Skirmisher",
        }
    }
}
