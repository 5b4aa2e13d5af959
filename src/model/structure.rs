use serde::{Deserialize, Serialize};

/// Category of a settlement structure as reported by the structure registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StructureCategory {
    /// Walls, towers, turrets.
    Defensive,
    Generator,
    CommandNexus,
    Other,
}

string_enum!(StructureCategory {
    Defensive => "defensive",
    Generator => "generator",
    CommandNexus => "command_nexus",
    Other => "other",
});
