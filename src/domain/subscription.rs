use super::{City, Frequency, SubscriberEmail, SubscriptionStatus, SubscriptionToken};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: Uuid,
    pub email: SubscriberEmail,
    pub city: City,
    pub frequency: Frequency,
    pub status: SubscriptionStatus,
    pub token: SubscriptionToken,
    pub subscribed_at: OffsetDateTime,
    pub last_update_sent_at: Option<OffsetDateTime>,
}

impl Subscription {
    /// Whether a weather update should go out at `now`.
    pub fn is_due(&self, now: OffsetDateTime) -> bool {
        if self.status != SubscriptionStatus::Confirmed {
            return false;
        }

        match self.last_update_sent_at {
            Some(sent_at) => now - sent_at >= self.frequency.period(),
            None => true,
        }
    }
}
