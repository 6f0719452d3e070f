//! Agent classification and conversation aggregation for StorePulse reports.
//!
//! Raw upstream conversation records flow one way through this crate:
//! `AgentNameResolver` maps each free-text agent name to a store identity,
//! `ReportAggregator` accumulates counters for one batch, and
//! `ReportFormatter` shapes those counters into the dashboard `ReportBundle`.
//! Nothing here performs I/O or logging; diagnostics are returned as values.

pub mod aggregation;
pub mod diagnostics;
pub mod identity;
pub mod overrides;
pub mod records;
pub mod report_format;
pub mod resolver;
pub mod store_order;

pub use aggregation::{AggregationOutcome, AggregationState, ReportAggregator};
pub use diagnostics::{ReportDiagnostic, SkipReason};
pub use identity::{
    AgentIdentity, RoleCode, AUTOMATED_CONVERSATION_PERSON, NO_NAME_PERSON, TOTAL_STORE,
    UNASSIGNED_STORE,
};
pub use overrides::{IdentityOverride, IdentityOverrideTable, OverrideTableError};
pub use records::{ConversationAgent, ConversationRecord, Direction};
pub use report_format::{
    AgentTableRow, AgentUsage, DailyStoreSeries, ReportBundle, ReportFormatter, SummarySeries,
    DEFAULT_DAILY_CAP,
};
pub use resolver::{AgentNameResolver, Resolution, ResolutionSource};
pub use store_order::{StoreOrdering, StoreSortKey};
