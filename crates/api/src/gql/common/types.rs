use async_graphql::{InputObject, OutputType, SimpleObject};
use infra::pagination::LimitOffset;

use crate::gql::domains::activities::types::Activity;
use crate::gql::domains::bookings::types::Booking;

#[derive(InputObject, Clone, Copy, Debug, Default)]
pub struct PaginationInput {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl PaginationInput {
    pub fn to_limit_offset(self) -> LimitOffset {
        LimitOffset::new(self.limit.map(i64::from), self.offset.map(i64::from))
    }
}

#[derive(SimpleObject, Clone)]
#[graphql(concrete(name = "PaginatedActivities", params(Activity)))]
#[graphql(concrete(name = "PaginatedBookings", params(Booking)))]
pub struct PaginatedResponse<T: OutputType> {
    pub items: Vec<T>,
    pub total_count: Option<i32>,
    pub page_size: i32,
    pub offset: i32,
    pub has_next_page: bool,
}

impl<T: OutputType> PaginatedResponse<T> {
    /// Without a total count, a full page is taken to mean more may follow.
    pub fn new(items: Vec<T>, page: LimitOffset, total_count: Option<i64>) -> Self {
        let page_size = items.len() as i32;
        let offset = page.offset as i32;
        let has_next_page = match total_count {
            Some(total) => i64::from(offset + page_size) < total,
            None => i64::from(page_size) == page.limit,
        };

        Self {
            items,
            total_count: total_count.map(|t| t as i32),
            page_size,
            offset,
            has_next_page,
        }
    }
}
