use async_graphql::MergedObject;

use crate::gql::domains::activities::ActivityMutation;
use crate::gql::domains::bookings::BookingMutation;
use crate::gql::domains::vendors::VendorMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(ActivityMutation, BookingMutation, VendorMutation);
