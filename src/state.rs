use crate::session::SessionRegistry;
use crate::storage::ComplaintStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: ComplaintStore,
    pub sessions: SessionRegistry,
    pub admin_password: Arc<str>,
}

impl AppState {
    pub fn new(store: ComplaintStore, admin_password: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            sessions: SessionRegistry::default(),
            admin_password: admin_password.into(),
        }
    }
}
