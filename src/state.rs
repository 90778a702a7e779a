use std::sync::Arc;
use tokio::sync::broadcast;

use crate::posts::PostService;
use crate::settings::Settings;
use crate::templates::PageRenderer;

pub type RefreshBroadcaster = broadcast::Sender<()>;

pub struct AppState {
    pub posts: PostService,
    pub renderer: Box<dyn PageRenderer>,
    pub settings: Settings,
}

#[derive(Clone)]
pub struct RouterState {
    pub app: Arc<AppState>,
    pub broadcaster: RefreshBroadcaster,
}

impl axum::extract::FromRef<RouterState> for Arc<AppState> {
    fn from_ref(state: &RouterState) -> Self {
        state.app.clone()
    }
}

impl axum::extract::FromRef<RouterState> for RefreshBroadcaster {
    fn from_ref(state: &RouterState) -> Self {
        state.broadcaster.clone()
    }
}
