use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventEffect {
    pub event_id: u64,
    pub entity_id: u64,
    pub effect: StateChange,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateChange {
    EntityCreated {
        kind: String,
        name: String,
    },
    EntityEnded,
    PropertyChanged {
        field: String,
        old_value: serde_json::Value,
        new_value: serde_json::Value,
    },
}

impl StateChange {
    pub fn property(
        field: impl Into<String>,
        old_value: impl Serialize,
        new_value: impl Serialize,
    ) -> Self {
        StateChange::PropertyChanged {
            field: field.into(),
            old_value: serde_json::to_value(old_value).unwrap_or(serde_json::Value::Null),
            new_value: serde_json::to_value(new_value).unwrap_or(serde_json::Value::Null),
        }
    }

    /// Return the serde tag string for this variant.
    pub fn effect_type_str(&self) -> &'static str {
        match self {
            StateChange::EntityCreated { .. } => "entity_created",
            StateChange::EntityEnded => "entity_ended",
            StateChange::PropertyChanged { .. } => "property_changed",
        }
    }
}
