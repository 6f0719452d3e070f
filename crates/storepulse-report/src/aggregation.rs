//! Aggregation Engine: one pass over a fetched batch, commutative counters only.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde_json::Value;
use storepulse_core::local_date_from_unix_ms;

use crate::diagnostics::{ReportDiagnostic, SkipReason};
use crate::identity::{AgentIdentity, RoleCode, TOTAL_STORE};
use crate::records::{ConversationRecord, Direction};
use crate::resolver::AgentNameResolver;

/// Counters built for a single report request. Constructed fresh per request
/// and never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationState {
    pub reference_today: NaiveDate,
    pub overall_by_direction: BTreeMap<Direction, u64>,
    /// Keyed by store, including the reserved `Total` aggregate.
    pub daily_by_store_direction: BTreeMap<String, BTreeMap<NaiveDate, BTreeMap<Direction, u64>>>,
    /// Outbound-only.
    pub outbound_by_store_role_person: BTreeMap<String, BTreeMap<RoleCode, BTreeMap<String, u64>>>,
    pub today_usage_by_store: BTreeMap<String, u64>,
    pub observed_dates: BTreeSet<NaiveDate>,
    /// Stores seen on any counted record; never contains `Total`.
    pub observed_stores: BTreeSet<String>,
}

impl AggregationState {
    pub fn new(reference_today: NaiveDate) -> Self {
        Self {
            reference_today,
            overall_by_direction: BTreeMap::new(),
            daily_by_store_direction: BTreeMap::new(),
            outbound_by_store_role_person: BTreeMap::new(),
            today_usage_by_store: BTreeMap::new(),
            observed_dates: BTreeSet::new(),
            observed_stores: BTreeSet::new(),
        }
    }

    pub fn overall_count(&self, direction: Direction) -> u64 {
        self.overall_by_direction
            .get(&direction)
            .copied()
            .unwrap_or(0)
    }

    pub fn daily_count(&self, store: &str, date: NaiveDate, direction: Direction) -> u64 {
        self.daily_by_store_direction
            .get(store)
            .and_then(|dates| dates.get(&date))
            .and_then(|directions| directions.get(&direction))
            .copied()
            .unwrap_or(0)
    }

    pub fn today_usage(&self, store: &str) -> u64 {
        self.today_usage_by_store.get(store).copied().unwrap_or(0)
    }

    /// Number of records that contributed to the counters.
    pub fn counted_records(&self) -> u64 {
        self.overall_by_direction.values().sum()
    }

    fn count(&mut self, date: NaiveDate, direction: Direction, identity: AgentIdentity) {
        *self.overall_by_direction.entry(direction).or_insert(0) += 1;
        self.observed_dates.insert(date);

        for store in [identity.store.as_str(), TOTAL_STORE] {
            *self
                .daily_by_store_direction
                .entry(store.to_string())
                .or_default()
                .entry(date)
                .or_default()
                .entry(direction)
                .or_insert(0) += 1;
        }

        if direction == Direction::Out {
            if date == self.reference_today {
                *self
                    .today_usage_by_store
                    .entry(identity.store.clone())
                    .or_insert(0) += 1;
            }
            *self
                .outbound_by_store_role_person
                .entry(identity.store.clone())
                .or_default()
                .entry(identity.role)
                .or_default()
                .entry(identity.person)
                .or_insert(0) += 1;
        }

        self.observed_stores.insert(identity.store);
    }
}

/// Aggregation result plus the non-fatal diagnostics raised along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationOutcome {
    pub state: AggregationState,
    pub diagnostics: Vec<ReportDiagnostic>,
}

impl AggregationOutcome {
    pub fn skipped_records(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| matches!(diagnostic, ReportDiagnostic::SkippedRecord { .. }))
            .count()
    }
}

/// Buckets records by direction, store/date, and store/role/person.
#[derive(Debug, Clone, Copy)]
pub struct ReportAggregator<'a> {
    resolver: &'a AgentNameResolver,
    timezone: Tz,
}

impl<'a> ReportAggregator<'a> {
    pub fn new(resolver: &'a AgentNameResolver, timezone: Tz) -> Self {
        Self { resolver, timezone }
    }

    pub fn aggregate(
        &self,
        records: &[ConversationRecord],
        reference_today: NaiveDate,
    ) -> AggregationOutcome {
        let mut state = AggregationState::new(reference_today);
        let mut diagnostics = Vec::new();
        for (index, record) in records.iter().enumerate() {
            self.ingest(&mut state, &mut diagnostics, index, record);
        }
        AggregationOutcome { state, diagnostics }
    }

    /// Folds one record into `state`. `index` only labels diagnostics.
    pub fn ingest(
        &self,
        state: &mut AggregationState,
        diagnostics: &mut Vec<ReportDiagnostic>,
        index: usize,
        record: &ConversationRecord,
    ) {
        let date = match self.record_date(record) {
            Ok(date) => date,
            Err(reason) => {
                diagnostics.push(ReportDiagnostic::SkippedRecord { index, reason });
                return;
            }
        };

        let direction = match record.direction.as_deref() {
            None => Direction::In,
            Some(raw) => Direction::from_wire(raw).unwrap_or_else(|| {
                if !raw.trim().is_empty() {
                    diagnostics.push(ReportDiagnostic::UnrecognizedDirection {
                        index,
                        raw_direction: raw.to_string(),
                    });
                }
                Direction::In
            }),
        };

        let identity = match record.agent_name() {
            None => AgentIdentity::automated(),
            Some(raw_name) => {
                let resolution = self.resolver.resolve(raw_name);
                if resolution.is_unmatched() {
                    diagnostics.push(ReportDiagnostic::UnmatchedAgentName {
                        index,
                        raw_name: raw_name.to_string(),
                    });
                }
                resolution.identity
            }
        };

        state.count(date, direction, identity);
    }

    fn record_date(&self, record: &ConversationRecord) -> Result<NaiveDate, SkipReason> {
        let Some(unix_ms) = record.created_unix_ms() else {
            return Err(if created_is_blank(record.created.as_ref()) {
                SkipReason::MissingCreated
            } else {
                SkipReason::UnparsableCreated
            });
        };
        local_date_from_unix_ms(unix_ms, self.timezone).ok_or(SkipReason::UnparsableCreated)
    }
}

fn created_is_blank(created: Option<&Value>) -> bool {
    match created {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::Number(number)) => number.as_f64() == Some(0.0),
        Some(Value::String(raw)) => raw.is_empty(),
        Some(_) => false,
    }
}
