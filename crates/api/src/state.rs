use std::sync::Arc;

use infra::store::Store;

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::services::{BookingService, CatalogService};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    bookings: BookingService<Store>,
    catalog: CatalogService<Store>,
    config: Arc<AppConfig>,
    jwt_service: JwtService,
}

impl AppState {
    pub fn new(store: Store, config: AppConfig) -> Self {
        let jwt_service = JwtService::new(&config.auth);
        let bookings = BookingService::new(store.clone(), config.capacity_granularity);
        let catalog = CatalogService::new(store.clone());

        Self {
            store,
            bookings,
            catalog,
            config: Arc::new(config),
            jwt_service,
        }
    }

    pub fn bookings(&self) -> &BookingService<Store> {
        &self.bookings
    }

    pub fn catalog(&self) -> &CatalogService<Store> {
        &self.catalog
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
