//! Owner profile types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{SubscriptionStatus, Tier};

/// Unique owner identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    /// Parse an owner ID from its string form
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Owner profile
///
/// Carries a denormalized mirror of the owner's subscription so the
/// client can render tier and status without a second lookup. The
/// sweeper keeps the mirror consistent with the authoritative
/// subscription record on every transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    /// Owner ID
    pub id: OwnerId,
    /// Display name
    pub display_name: String,
    /// Mirrored subscription tier
    pub subscription_tier: Tier,
    /// Mirrored subscription status
    pub subscription_status: SubscriptionStatus,
    /// Mirrored expiry date; absent once the owner is downgraded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_end_date: Option<DateTime<Utc>>,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_parses_its_display_form() {
        let id = OwnerId(Uuid::new_v4());
        assert_eq!(OwnerId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn downgraded_profile_omits_the_end_date_field() {
        // The client contract removes the field entirely rather than
        // serializing a null
        let profile = OwnerProfile {
            id: OwnerId(Uuid::new_v4()),
            display_name: "Asha".to_string(),
            subscription_tier: Tier::Free,
            subscription_status: SubscriptionStatus::Expired,
            subscription_end_date: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("subscriptionEndDate").is_none());
        assert_eq!(json["subscriptionTier"], "free");
        assert_eq!(json["subscriptionStatus"], "expired");
    }
}
