use std::sync::Arc;

use shared::protocol::TaskEvent;

use crate::{api::ApiContext, config::Settings, events::Broadcaster};

pub const TASK_EVENT_CAPACITY: usize = 256;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    pub(crate) events: Broadcaster<TaskEvent>,
    pub(crate) settings: Arc<Settings>,
}

impl AppState {
    pub(crate) fn new(api: ApiContext, settings: Settings) -> Self {
        Self {
            api,
            events: Broadcaster::new(TASK_EVENT_CAPACITY),
            settings: Arc::new(settings),
        }
    }
}
