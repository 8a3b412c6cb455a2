use async_graphql::{Context, Result, Subscription, ID};
use futures_util::Stream;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use uuid::Uuid;

use infra::models::BookingRow;

use crate::auth::permissions::require_actor;
use crate::gql::common::helpers::parse_id;
use crate::gql::types::{BookingEvent, BookingEventType};

const CHANNEL_CAPACITY: usize = 100;

/// Per-activity booking event channels
struct SubscriptionChannels {
    activities: HashMap<Uuid, broadcast::Sender<BookingEvent>>,
}

impl SubscriptionChannels {
    fn new() -> Self {
        Self {
            activities: HashMap::new(),
        }
    }

    fn get_or_create_activity(&mut self, activity_id: Uuid) -> &broadcast::Sender<BookingEvent> {
        self.activities
            .entry(activity_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
    }
}

static CHANNELS: Lazy<Arc<Mutex<SubscriptionChannels>>> =
    Lazy::new(|| Arc::new(Mutex::new(SubscriptionChannels::new())));

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Bookings admitted for an activity and their later status changes.
    /// Events carry counts and status only, never the booker's details.
    async fn booking_events(
        &self,
        ctx: &Context<'_>,
        activity_id: ID,
    ) -> Result<impl Stream<Item = Result<BookingEvent, BroadcastStreamRecvError>>> {
        require_actor(ctx)?;
        let activity_uuid = parse_id(&activity_id, "activity")?;

        Ok(BroadcastStream::new(subscribe_activity(activity_uuid)))
    }
}

/// Receiver for an activity's booking events.
pub fn subscribe_activity(activity_id: Uuid) -> broadcast::Receiver<BookingEvent> {
    let mut channels = CHANNELS.lock();
    channels.get_or_create_activity(activity_id).subscribe()
}

/// Publish a booking event to its activity's channel. Having no listeners is not an error.
pub fn publish_booking_event(booking: &BookingRow, event_type: BookingEventType) {
    let event = BookingEvent::from_row(booking, event_type);

    let mut channels = CHANNELS.lock();
    let sender = channels.get_or_create_activity(booking.activity_id);
    let _ = sender.send(event);
}
