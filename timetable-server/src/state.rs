use std::sync::Arc;

use timetable_core::config::DeletePolicy;
use timetable_core::store::SlotStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SlotStore>,
    pub delete_policy: DeletePolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn SlotStore>, delete_policy: DeletePolicy) -> Self {
        AppState {
            store,
            delete_policy,
        }
    }
}
