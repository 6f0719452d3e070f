#![no_main]

use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use storepulse_report::{
    AgentNameResolver, ConversationRecord, Direction, ReportAggregator, TOTAL_STORE,
};

fuzz_target!(|data: &[u8]| {
    let Ok(Value::Array(items)) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    let records: Vec<ConversationRecord> =
        items.into_iter().map(ConversationRecord::from_json).collect();
    let Some(today) = NaiveDate::from_ymd_opt(2026, 10, 16) else {
        return;
    };

    let resolver = AgentNameResolver::default();
    let outcome =
        ReportAggregator::new(&resolver, chrono_tz::UTC).aggregate(&records, today);
    let state = &outcome.state;

    assert_eq!(
        state.counted_records() as usize + outcome.skipped_records(),
        records.len()
    );
    for direction in Direction::ALL {
        let total: u64 = state
            .observed_dates
            .iter()
            .map(|date| state.daily_count(TOTAL_STORE, *date, direction))
            .sum();
        assert_eq!(total, state.overall_count(direction));
    }
});
