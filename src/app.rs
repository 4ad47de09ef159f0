use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

/// The three entries of the sidebar menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Submit,
    Status,
    Admin,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Submit, Page::Status, Page::Admin];

    pub fn path(self) -> &'static str {
        match self {
            Page::Submit => "/submit",
            Page::Status => "/status",
            Page::Admin => "/admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Submit => "Submit Complaint",
            Page::Status => "Check Status",
            Page::Admin => "Admin Portal",
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(Page::Submit.path(), get(handlers::submit_page).post(handlers::submit_form))
        .route(Page::Status.path(), get(handlers::status_page).post(handlers::status_form))
        .route(Page::Admin.path(), get(handlers::admin_page))
        .route("/admin/login", post(handlers::admin_login))
        .route("/admin/logout", post(handlers::admin_logout))
        .route("/admin/complaints/:id/status", post(handlers::admin_update_status))
        .route("/api/complaints", post(handlers::api_submit))
        .route("/api/complaints/:id", get(handlers::api_lookup))
        .route("/api/admin/login", post(handlers::api_login))
        .route("/api/admin/logout", post(handlers::api_logout))
        .route("/api/admin/dashboard", get(handlers::api_dashboard))
        .route("/api/admin/complaints/:id/status", put(handlers::api_update_status))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_paths_are_distinct() {
        let paths: std::collections::HashSet<_> = Page::ALL.iter().map(|page| page.path()).collect();
        assert_eq!(paths.len(), 3);
        assert_eq!(Page::Admin.label(), "Admin Portal");
    }
}
