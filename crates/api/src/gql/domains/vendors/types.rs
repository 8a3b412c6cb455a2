use async_graphql::{InputObject, SimpleObject, ID};
use chrono::{DateTime, Utc};

use infra::models::VendorRow;

#[derive(SimpleObject, Clone)]
pub struct Vendor {
    pub id: ID,
    pub business_name: String,
    pub city: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<VendorRow> for Vendor {
    fn from(row: VendorRow) -> Self {
        Self {
            id: row.id.into(),
            business_name: row.business_name,
            city: row.city,
            is_verified: row.is_verified,
            created_at: row.created_at,
        }
    }
}

#[derive(InputObject)]
pub struct RegisterVendorInput {
    pub business_name: String,
    pub city: Option<String>,
}
