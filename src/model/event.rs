use serde::{Deserialize, Serialize};

/// Kinds of records written to the siege audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SiegeEventKind {
    SiegeStarted,
    WaveSpawned,
    WaveCleared,
    WaveStalled,
    StructureRuined,
    Victory,
    Defeat,
    ThreatSurge,
}

string_enum!(SiegeEventKind {
    SiegeStarted => "siege_started",
    WaveSpawned => "wave_spawned",
    WaveCleared => "wave_cleared",
    WaveStalled => "wave_stalled",
    StructureRuined => "structure_ruined",
    Victory => "victory",
    Defeat => "defeat",
    ThreatSurge => "threat_surge",
});

/// How a siege ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiegeOutcome {
    Victory,
    Defeat,
}

impl SiegeOutcome {
    pub fn event_kind(self) -> SiegeEventKind {
        match self {
            SiegeOutcome::Victory => SiegeEventKind::Victory,
            SiegeOutcome::Defeat => SiegeEventKind::Defeat,
        }
    }
}
