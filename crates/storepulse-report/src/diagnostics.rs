//! Non-fatal events produced while aggregating a batch.
//!
//! The core returns these instead of logging; the caller decides how to
//! surface them.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingCreated,
    UnparsableCreated,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingCreated => "missing_created",
            Self::UnparsableCreated => "unparsable_created",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportDiagnostic {
    /// Record dropped from every aggregate.
    SkippedRecord { index: usize, reason: SkipReason },
    /// Agent name matched neither an override nor the structured pattern.
    UnmatchedAgentName { index: usize, raw_name: String },
    /// Direction value other than IN/OUT; the record was counted as IN.
    UnrecognizedDirection { index: usize, raw_direction: String },
}

impl ReportDiagnostic {
    pub fn code(&self) -> &'static str {
        match self {
            Self::SkippedRecord { .. } => "skipped_record",
            Self::UnmatchedAgentName { .. } => "unmatched_agent_name",
            Self::UnrecognizedDirection { .. } => "unrecognized_direction",
        }
    }

    pub fn record_index(&self) -> usize {
        match self {
            Self::SkippedRecord { index, .. }
            | Self::UnmatchedAgentName { index, .. }
            | Self::UnrecognizedDirection { index, .. } => *index,
        }
    }
}

impl fmt::Display for ReportDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedRecord { index, reason } => {
                write!(f, "record #{index} skipped: {}", reason.as_str())
            }
            Self::UnmatchedAgentName { index, raw_name } => write!(
                f,
                "record #{index}: agent name '{raw_name}' does not match the naming pattern; assigned to Unassigned"
            ),
            Self::UnrecognizedDirection {
                index,
                raw_direction,
            } => write!(
                f,
                "record #{index}: unrecognized direction '{raw_direction}' counted as IN"
            ),
        }
    }
}
