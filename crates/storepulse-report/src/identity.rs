//! Store/role/person identity attached to each conversation.

use serde::{Deserialize, Serialize};

/// Catch-all store for unparseable or missing agent names.
pub const UNASSIGNED_STORE: &str = "Unassigned";
/// Reserved aggregate key holding the cross-store sum in the daily series.
pub const TOTAL_STORE: &str = "Total";
/// Person label used when the agent name itself is empty.
pub const NO_NAME_PERSON: &str = "No Name";
/// Person label for conversations with no agent attached.
pub const AUTOMATED_CONVERSATION_PERSON: &str = "Automated Conversation";

/// Functional role of an agent within a store.
///
/// Variants are declared in dashboard sort order, so the derived `Ord`
/// agrees with [`RoleCode::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoleCode {
    #[serde(rename = "J")]
    Jefe,
    #[serde(rename = "SUP")]
    Supervisor,
    #[serde(rename = "C")]
    Coordinador,
    #[serde(rename = "V")]
    Vendedor,
    #[serde(rename = "VD")]
    VendedorDigital,
    #[serde(rename = "TR")]
    Transferencia,
    #[serde(rename = "Otro")]
    Otro,
    #[serde(rename = "Sistema")]
    Sistema,
}

impl RoleCode {
    pub fn rank(self) -> u8 {
        match self {
            Self::Jefe => 1,
            Self::Supervisor => 2,
            Self::Coordinador => 3,
            Self::Vendedor => 4,
            Self::VendedorDigital => 5,
            Self::Transferencia => 6,
            Self::Otro => 99,
            Self::Sistema => 100,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jefe => "J",
            Self::Supervisor => "SUP",
            Self::Coordinador => "C",
            Self::Vendedor => "V",
            Self::VendedorDigital => "VD",
            Self::Transferencia => "TR",
            Self::Otro => "Otro",
            Self::Sistema => "Sistema",
        }
    }

    /// Maps a role token written inside an agent name. Only the six real
    /// roles can appear there; `Otro` and `Sistema` are assigned, never parsed.
    pub fn from_name_token(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "J" => Some(Self::Jefe),
            "SUP" => Some(Self::Supervisor),
            "C" => Some(Self::Coordinador),
            "V" => Some(Self::Vendedor),
            "VD" => Some(Self::VendedorDigital),
            "TR" => Some(Self::Transferencia),
            _ => None,
        }
    }
}

/// Resolved identity of the agent behind one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AgentIdentity {
    pub store: String,
    pub role: RoleCode,
    pub person: String,
}

impl AgentIdentity {
    pub fn new(store: impl Into<String>, role: RoleCode, person: impl Into<String>) -> Self {
        Self {
            store: store.into(),
            role,
            person: person.into(),
        }
    }

    /// Identity for conversations with no agent, or an agent without a name.
    pub fn automated() -> Self {
        Self::new(
            UNASSIGNED_STORE,
            RoleCode::Sistema,
            AUTOMATED_CONVERSATION_PERSON,
        )
    }

    /// Fallback bucket keeping the raw text visible as the person name.
    pub fn unassigned(person: impl Into<String>) -> Self {
        Self::new(UNASSIGNED_STORE, RoleCode::Otro, person)
    }
}
