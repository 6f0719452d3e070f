//! Static dashboard entry page.
use super::*;
use std::io::ErrorKind;
use std::path::Path;

pub(super) async fn load_entry_page(static_dir: &Path) -> Result<String, DashboardApiError> {
    let path = static_dir.join(ENTRY_PAGE_FILE);
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Ok(page),
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "dashboard entry page is missing");
            Err(DashboardApiError::not_found(
                "entry_page_unavailable",
                format!("dashboard entry page '{}' was not found", path.display()),
            ))
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), error = %error, "failed to read dashboard entry page");
            Err(DashboardApiError::internal(format!(
                "failed to read dashboard entry page '{}'",
                path.display()
            )))
        }
    }
}
