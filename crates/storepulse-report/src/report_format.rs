//! Report Formatter: shapes aggregation counters into the dashboard payload.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use storepulse_core::day_month_label;

use crate::aggregation::AggregationState;
use crate::identity::{RoleCode, TOTAL_STORE};
use crate::records::Direction;
use crate::store_order::StoreOrdering;

/// Per-store outbound conversations allowed per day, shown next to today's usage.
pub const DEFAULT_DAILY_CAP: u64 = 20;

/// Accumulated IN/OUT totals for the summary cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySeries {
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
}

/// Daily IN/OUT series for one store, aligned with `dates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStoreSeries {
    pub store: String,
    pub dates: Vec<String>,
    #[serde(rename = "in")]
    pub inbound: Vec<u64>,
    #[serde(rename = "out")]
    pub outbound: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentUsage {
    pub role: RoleCode,
    pub person: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTableRow {
    pub store: String,
    pub today_usage: u64,
    pub daily_cap: u64,
    pub agents: Vec<AgentUsage>,
}

/// JSON body returned by the report endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportBundle {
    pub summary: SummarySeries,
    pub daily_series: Vec<DailyStoreSeries>,
    pub agent_table: Vec<AgentTableRow>,
    pub available_stores: Vec<String>,
    pub generated_for: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct ReportFormatter {
    ordering: StoreOrdering,
    daily_cap: u64,
    hidden_stores: BTreeSet<String>,
}

impl ReportFormatter {
    pub fn new(ordering: StoreOrdering) -> Self {
        Self {
            ordering,
            daily_cap: DEFAULT_DAILY_CAP,
            hidden_stores: BTreeSet::new(),
        }
    }

    pub fn with_daily_cap(mut self, daily_cap: u64) -> Self {
        self.daily_cap = daily_cap;
        self
    }

    /// Internal-only buckets left out of the store filter and the agent table.
    /// They still count toward `Total` and the summary.
    pub fn with_hidden_stores<I, S>(mut self, stores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_stores = stores.into_iter().map(Into::into).collect();
        self
    }

    pub fn format(&self, state: &AggregationState) -> ReportBundle {
        ReportBundle {
            summary: summary_series(state),
            daily_series: self.daily_series(state),
            agent_table: self.agent_table(state),
            available_stores: self.available_stores(state),
            generated_for: state.reference_today,
        }
    }

    fn sorted_stores<'a>(&self, stores: impl Iterator<Item = &'a String>) -> Vec<&'a String> {
        let mut sorted: Vec<&String> = stores.filter(|store| *store != TOTAL_STORE).collect();
        self.ordering.sort(&mut sorted);
        sorted
    }

    fn daily_series(&self, state: &AggregationState) -> Vec<DailyStoreSeries> {
        let labels: Vec<String> = state
            .observed_dates
            .iter()
            .copied()
            .map(day_month_label)
            .collect();

        let mut stores = vec![TOTAL_STORE];
        stores.extend(
            self.sorted_stores(state.observed_stores.iter())
                .into_iter()
                .map(String::as_str),
        );

        stores
            .into_iter()
            .map(|store| {
                let series = |direction: Direction| -> Vec<u64> {
                    state
                        .observed_dates
                        .iter()
                        .map(|date| state.daily_count(store, *date, direction))
                        .collect()
                };
                DailyStoreSeries {
                    store: store.to_string(),
                    dates: labels.clone(),
                    inbound: series(Direction::In),
                    outbound: series(Direction::Out),
                }
            })
            .collect()
    }

    fn agent_table(&self, state: &AggregationState) -> Vec<AgentTableRow> {
        self.sorted_stores(state.outbound_by_store_role_person.keys())
            .into_iter()
            .filter(|store| !self.hidden_stores.contains(store.as_str()))
            .filter_map(|store| {
                let roles = state.outbound_by_store_role_person.get(store)?;
                let mut agents: Vec<AgentUsage> = roles
                    .iter()
                    .flat_map(|(role, people)| {
                        people.iter().map(|(person, total)| AgentUsage {
                            role: *role,
                            person: person.clone(),
                            total: *total,
                        })
                    })
                    .collect();
                if agents.is_empty() {
                    return None;
                }
                sort_agent_usage(&mut agents);
                Some(AgentTableRow {
                    store: store.clone(),
                    today_usage: state.today_usage(store),
                    daily_cap: self.daily_cap,
                    agents,
                })
            })
            .collect()
    }

    fn available_stores(&self, state: &AggregationState) -> Vec<String> {
        self.sorted_stores(state.observed_stores.iter())
            .into_iter()
            .filter(|store| !self.hidden_stores.contains(store.as_str()))
            .cloned()
            .collect()
    }
}

fn summary_series(state: &AggregationState) -> SummarySeries {
    SummarySeries {
        labels: Direction::ALL
            .iter()
            .map(|direction| direction.as_str().to_string())
            .collect(),
        counts: Direction::ALL
            .iter()
            .map(|direction| state.overall_count(*direction))
            .collect(),
    }
}

/// Stable sort by role rank, then person name.
pub fn sort_agent_usage(agents: &mut [AgentUsage]) {
    agents.sort_by(|left, right| {
        left.role
            .rank()
            .cmp(&right.role.rank())
            .then_with(|| left.person.cmp(&right.person))
    });
}
