//! Wire model for conversation records returned by the messaging platform.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Whether a conversation was started by the customer (`IN`) or the business (`OUT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::In, Direction::Out];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }

    /// Case-insensitive parse of an upstream direction token.
    pub fn from_wire(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("OUT") {
            Some(Self::Out)
        } else if trimmed.eq_ignore_ascii_case("IN") {
            Some(Self::In)
        } else {
            None
        }
    }
}

/// Agent attached to a conversation, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationAgent {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub name: Option<String>,
}

/// One conversation as delivered by the upstream fetch.
///
/// Decoding never fails for a JSON object: fields with an unexpected shape
/// decode as `None` and are dealt with during aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub direction: Option<String>,
    #[serde(default)]
    pub created: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub agent: Option<ConversationAgent>,
}

impl ConversationRecord {
    /// Decodes a record from an arbitrary JSON value; non-objects become an
    /// empty record, which aggregation skips for lack of a timestamp.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Convenience constructor for well-formed records.
    pub fn new(direction: Direction, created_unix_ms: i64, agent_name: Option<&str>) -> Self {
        Self {
            direction: Some(direction.as_str().to_string()),
            created: Some(Value::from(created_unix_ms)),
            agent: agent_name.map(|name| ConversationAgent {
                name: Some(name.to_string()),
            }),
        }
    }

    /// Creation time in Unix milliseconds. Zero, non-numeric, and non-finite
    /// values count as missing.
    pub fn created_unix_ms(&self) -> Option<i64> {
        let Value::Number(number) = self.created.as_ref()? else {
            return None;
        };
        let unix_ms = if let Some(value) = number.as_i64() {
            value
        } else if let Some(value) = number.as_u64() {
            i64::try_from(value).ok()?
        } else {
            let value = number.as_f64().filter(|value| value.is_finite())?;
            if value.abs() >= i64::MAX as f64 {
                return None;
            }
            value.trunc() as i64
        };
        (unix_ms != 0).then_some(unix_ms)
    }

    /// Agent name when present and non-empty.
    pub fn agent_name(&self) -> Option<&str> {
        self.agent
            .as_ref()
            .and_then(|agent| agent.name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    // Arrays would otherwise decode positionally into structs.
    match Value::deserialize(deserializer)? {
        Value::Array(_) => Ok(None),
        value => Ok(serde_json::from_value(value).ok()),
    }
}
