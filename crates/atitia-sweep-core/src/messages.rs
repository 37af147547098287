//! Notification message composition
//!
//! Reminder wording escalates as expiry approaches. Tiers are rendered
//! from their stored string form so an unknown tier name still produces
//! a sensible message.

/// A composed notification title and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
}

/// Compose a renewal reminder for the given lead time
pub fn renewal_reminder(tier: &str, days_before_expiry: i64) -> Message {
    match days_before_expiry {
        7 => Message {
            title: "Subscription Renewal Reminder".to_string(),
            body: format!(
                "Your {tier} subscription expires in 7 days. \
                 Renew now to continue enjoying premium features."
            ),
        },
        3 => Message {
            title: "Subscription Expiring Soon".to_string(),
            body: format!(
                "Your {tier} subscription expires in 3 days. \
                 Don't miss out on premium features!"
            ),
        },
        _ => Message {
            title: "Last Day to Renew".to_string(),
            body: format!(
                "Your {tier} subscription expires today. \
                 Renew now to avoid service interruption."
            ),
        },
    }
}

/// Compose the grace-period-start notification
pub fn grace_period(tier: &str, grace_period_days: i64) -> Message {
    Message {
        title: "Subscription in Grace Period".to_string(),
        body: format!(
            "Your {tier} subscription has expired. You have {grace_period_days} days \
             to renew before downgrading to Free tier."
        ),
    }
}

/// Compose the downgrade notification
pub fn downgraded(tier: &str) -> Message {
    Message {
        title: "Subscription Downgraded".to_string(),
        body: format!(
            "Your {tier} subscription has been downgraded to Free tier. \
             Upgrade anytime to regain premium features."
        ),
    }
}
