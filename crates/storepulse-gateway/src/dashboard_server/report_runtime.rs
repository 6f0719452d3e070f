//! Report request pipeline: fetch -> aggregate -> format.
use super::*;
use storepulse_core::{current_month_window, current_unix_timestamp_ms, elapsed_ms_since};
use storepulse_report::{ReportAggregator, ReportDiagnostic};

pub(super) async fn build_dashboard_report(
    state: &DashboardServerState,
) -> Result<ReportBundle, DashboardApiError> {
    let timezone = state.config.timezone;
    let now = (state.clock)();
    let window = current_month_window(now, timezone)
        .map_err(|error| DashboardApiError::internal(error.to_string()))?;

    let started_unix_ms = current_unix_timestamp_ms();
    let records = state
        .source
        .fetch_conversations(window)
        .await
        .map_err(|error| {
            tracing::warn!(error = %error, "upstream fetch failed");
            if error.is_auth_failure() {
                DashboardApiError::upstream_auth_failed(format!(
                    "failed to obtain upstream token: {}",
                    error.inner()
                ))
            } else {
                DashboardApiError::upstream_fetch_failed(format!(
                    "failed to fetch upstream conversations: {}",
                    error.inner()
                ))
            }
        })?;
    let fetch_ms = elapsed_ms_since(started_unix_ms);

    let reference_today = now.with_timezone(&timezone).date_naive();
    let outcome =
        ReportAggregator::new(&state.resolver, timezone).aggregate(&records, reference_today);
    log_report_diagnostics(&outcome.diagnostics);

    let bundle = state.formatter.format(&outcome.state);
    tracing::info!(
        records = records.len(),
        counted = outcome.state.counted_records(),
        skipped = outcome.skipped_records(),
        stores = bundle.available_stores.len(),
        dates = outcome.state.observed_dates.len(),
        fetch_ms,
        "report built"
    );
    Ok(bundle)
}

fn log_report_diagnostics(diagnostics: &[ReportDiagnostic]) {
    for diagnostic in diagnostics {
        tracing::debug!(
            code = diagnostic.code(),
            record = diagnostic.record_index(),
            "{diagnostic}"
        );
    }
}
