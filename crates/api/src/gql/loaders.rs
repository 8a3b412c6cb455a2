use async_graphql::dataloader::Loader;
use infra::models::{ActivityRow, VendorRow};
use infra::store::{BookingStore, Store};
use std::{collections::HashMap, future::Future, sync::Arc};
use uuid::Uuid;

// ActivityLoader - batch load activities by ID
#[derive(Clone)]
pub struct ActivityLoader {
    store: Store,
}

impl ActivityLoader {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for ActivityLoader {
    type Value = ActivityRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let store = self.store.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = store.get_activities(&ids).await.map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}

// VendorLoader - batch load vendors by ID
#[derive(Clone)]
pub struct VendorLoader {
    store: Store,
}

impl VendorLoader {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl Loader<Uuid> for VendorLoader {
    type Value = VendorRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let store = self.store.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows = store.get_vendors(&ids).await.map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}
