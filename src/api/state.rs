use std::sync::Arc;

use crate::cache::TimedCache;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<TimedCache>,
}

impl AppState {
    pub fn new(cache: Arc<TimedCache>) -> Self {
        Self { cache }
    }
}
