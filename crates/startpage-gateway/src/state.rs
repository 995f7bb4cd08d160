use std::sync::Arc;

use startpage_core::Dashboard;

use crate::token::RequestToken;

#[derive(Clone)]
pub struct AppState {
    dashboard: Arc<dyn Dashboard>,
    request_token: RequestToken,
}

impl AppState {
    pub fn new(dashboard: Arc<dyn Dashboard>, request_token: RequestToken) -> Self {
        Self {
            dashboard,
            request_token,
        }
    }

    pub fn dashboard(&self) -> &dyn Dashboard {
        self.dashboard.as_ref()
    }

    pub fn request_token(&self) -> &RequestToken {
        &self.request_token
    }
}
