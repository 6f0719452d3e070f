//! HTTP boundary for the StorePulse dashboard.
//!
//! Serves the basic-auth protected entry page and the JSON report endpoint.
//! Each report request runs one upstream fetch and one in-memory aggregation
//! pass; no counters survive between requests.

pub mod dashboard_server;

pub use dashboard_server::{
    build_dashboard_router, run_dashboard_server, DashboardCredentials, DashboardServerConfig,
    DashboardServerState, DEFAULT_DASHBOARD_PASSWORD, DEFAULT_DASHBOARD_USER, ENTRY_PAGE_ENDPOINT,
    HEALTH_ENDPOINT, REPORT_ENDPOINT,
};
