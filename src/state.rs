use std::sync::Arc;

use crate::{
    config::AppConfig,
    services::{kv::SharedKv, session::SessionStore, trips::TripStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub trips: TripStore,
    pub session: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig, kv: SharedKv) -> Self {
        Self {
            config,
            trips: TripStore::new(Arc::clone(&kv)),
            session: SessionStore::new(kv),
        }
    }
}
