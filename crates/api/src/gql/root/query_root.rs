use async_graphql::MergedObject;

use crate::gql::domains::activities::ActivityQuery;
use crate::gql::domains::bookings::BookingQuery;
use crate::gql::domains::users::UserQuery;
use crate::gql::domains::vendors::VendorQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(ActivityQuery, BookingQuery, UserQuery, VendorQuery);
