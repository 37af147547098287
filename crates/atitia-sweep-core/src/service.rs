//! Subscription lifecycle sweep service
//!
//! Three passes over the subscription store, in order:
//! 1. Reminder pass: active subscriptions nearing expiry get a renewal
//!    reminder; no status mutation.
//! 2. Expiry pass: active subscriptions past their end date move into
//!    the grace period.
//! 3. Grace-expiry pass: grace-period subscriptions past the grace
//!    window are downgraded to the baseline tier.
//!
//! Per-subscription failures are logged with the subscription id and
//! skipped; the sweep continues. Query failures abort the invocation.

use std::sync::Arc;

use atitia_db::{
    CreateNotification, DowngradeTransition, GraceTransition, LifecycleRepository,
    NotificationRepository, OwnerProfileRepository, Page, SubscriptionRepository, SubscriptionRow,
};
use atitia_types::{NotificationId, NotificationType};
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::{messages, SweepConfig, SweepError};

/// Cancellation reason stamped on auto-downgraded subscriptions
const AUTO_DOWNGRADE_REASON: &str = "Auto-downgraded after grace period";

/// Counters reported at the end of a sweep run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Renewal reminders persisted
    pub reminders_sent: u64,
    /// Subscriptions moved from active to gracePeriod
    pub moved_to_grace_period: u64,
    /// Subscriptions downgraded to the baseline tier
    pub downgraded: u64,
}

/// Subscription lifecycle sweep service
///
/// Generic over the repository traits so it can run against the
/// Postgres implementations in production and in-memory fakes in tests.
pub struct SweepService<S, O, N, L> {
    config: SweepConfig,
    subscriptions: Arc<S>,
    owner_profiles: Arc<O>,
    notifications: Arc<N>,
    lifecycle: Arc<L>,
}

impl<S, O, N, L> SweepService<S, O, N, L>
where
    S: SubscriptionRepository,
    O: OwnerProfileRepository,
    N: NotificationRepository,
    L: LifecycleRepository,
{
    /// Create a new sweep service; fails on an invalid configuration
    pub fn new(
        config: SweepConfig,
        subscriptions: Arc<S>,
        owner_profiles: Arc<O>,
        notifications: Arc<N>,
        lifecycle: Arc<L>,
    ) -> Result<Self, SweepError> {
        config.validate()?;
        Ok(Self {
            config,
            subscriptions,
            owner_profiles,
            notifications,
            lifecycle,
        })
    }

    /// Run one sweep at the given instant
    ///
    /// `now` is injected rather than read from the clock so runs are
    /// reproducible under test.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<SweepSummary, SweepError> {
        tracing::info!("starting subscription lifecycle sweep");

        let mut summary = SweepSummary::default();
        self.reminder_pass(now, &mut summary).await?;
        self.expiry_pass(now, &mut summary).await?;
        self.grace_expiry_pass(now, &mut summary).await?;

        tracing::info!(
            reminders_sent = summary.reminders_sent,
            moved_to_grace_period = summary.moved_to_grace_period,
            downgraded = summary.downgraded,
            "subscription lifecycle sweep completed"
        );

        Ok(summary)
    }

    // =========================================================================
    // Pass 1: renewal reminders
    // =========================================================================

    /// Send reminders for active subscriptions nearing expiry
    ///
    /// Lead times are evaluated as disjoint buckets walked from the
    /// widest down: with leads [7, 3, 1] the windows are (now+3d, now+7d],
    /// (now+1d, now+3d], and (now, now+1d]. A subscription therefore
    /// matches exactly one bucket per run and is tagged with that
    /// bucket's lead time.
    async fn reminder_pass(
        &self,
        now: DateTime<Utc>,
        summary: &mut SweepSummary,
    ) -> Result<(), SweepError> {
        let leads = &self.config.reminder_lead_days;

        for (i, &lead) in leads.iter().enumerate() {
            let lower = leads.get(i + 1).copied().unwrap_or(0);
            let after = now + Duration::days(lower);
            let until = now + Duration::days(lead);

            let mut page = Page::first(self.config.batch_size);
            loop {
                let batch = self
                    .subscriptions
                    .find_active_expiring(after, until, page)
                    .await?;

                for sub in &batch {
                    match self.send_renewal_reminder(sub, lead, now).await {
                        Ok(true) => summary.reminders_sent += 1,
                        Ok(false) => {}
                        Err(error) => {
                            tracing::warn!(
                                subscription_id = %sub.id,
                                owner_id = %sub.owner_id,
                                %error,
                                "failed to send renewal reminder"
                            );
                        }
                    }
                }

                match next_page(&batch, page) {
                    Some(next) => page = next,
                    None => break,
                }
            }
        }

        Ok(())
    }

    /// Persist one reminder notification; returns false when skipped
    async fn send_renewal_reminder(
        &self,
        sub: &SubscriptionRow,
        days_before_expiry: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, SweepError> {
        // A reminder without a profile to deliver to is a no-op, not an
        // error for the whole pass.
        if self.owner_profiles.find_by_id(sub.owner_id).await?.is_none() {
            tracing::warn!(
                subscription_id = %sub.id,
                owner_id = %sub.owner_id,
                "owner profile not found, skipping reminder"
            );
            return Ok(false);
        }

        let message = messages::renewal_reminder(&sub.tier, days_before_expiry);
        let data = json!({
            "subscriptionId": sub.id,
            "tier": sub.tier,
            "daysBeforeExpiry": days_before_expiry,
            "expiryDate": sub.end_date.to_rfc3339(),
            "action": "renew_subscription",
        });

        self.notifications
            .create(self.notification(
                sub,
                NotificationType::SubscriptionRenewalReminder,
                message,
                data,
                now,
            ))
            .await?;

        tracing::info!(
            subscription_id = %sub.id,
            owner_id = %sub.owner_id,
            days_before_expiry,
            "renewal reminder sent"
        );
        Ok(true)
    }

    // =========================================================================
    // Pass 2: expiry into grace period
    // =========================================================================

    /// Move active subscriptions past their end date into the grace period
    async fn expiry_pass(
        &self,
        now: DateTime<Utc>,
        summary: &mut SweepSummary,
    ) -> Result<(), SweepError> {
        let mut page = Page::first(self.config.batch_size);
        loop {
            let batch = self.subscriptions.find_active_expired(now, page).await?;

            for sub in &batch {
                match self.move_to_grace_period(sub, now).await {
                    Ok(()) => summary.moved_to_grace_period += 1,
                    Err(error) => {
                        tracing::warn!(
                            subscription_id = %sub.id,
                            owner_id = %sub.owner_id,
                            %error,
                            "failed to move subscription to grace period"
                        );
                    }
                }
            }

            match next_page(&batch, page) {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(())
    }

    /// Apply the grace transition atomically (status + mirror + notification)
    async fn move_to_grace_period(
        &self,
        sub: &SubscriptionRow,
        now: DateTime<Utc>,
    ) -> Result<(), SweepError> {
        let grace_period_ends = sub.end_date + Duration::days(self.config.grace_period_days);

        let message = messages::grace_period(&sub.tier, self.config.grace_period_days);
        let data = json!({
            "subscriptionId": sub.id,
            "tier": sub.tier,
            "gracePeriodEnds": grace_period_ends.to_rfc3339(),
            "action": "renew_subscription",
        });

        self.lifecycle
            .begin_grace_period(GraceTransition {
                subscription_id: sub.id,
                owner_id: sub.owner_id,
                notification: self.notification(
                    sub,
                    NotificationType::SubscriptionGracePeriod,
                    message,
                    data,
                    now,
                ),
            })
            .await?;

        tracing::info!(
            subscription_id = %sub.id,
            owner_id = %sub.owner_id,
            grace_period_ends = %grace_period_ends,
            "subscription moved to grace period"
        );
        Ok(())
    }

    // =========================================================================
    // Pass 3: downgrade after grace period
    // =========================================================================

    /// Downgrade grace-period subscriptions whose grace window elapsed
    ///
    /// A subscription still inside the window is left untouched; a
    /// future run re-evaluates it.
    async fn grace_expiry_pass(
        &self,
        now: DateTime<Utc>,
        summary: &mut SweepSummary,
    ) -> Result<(), SweepError> {
        let mut page = Page::first(self.config.batch_size);
        loop {
            let batch = self.subscriptions.find_in_grace_period(page).await?;

            for sub in &batch {
                let days_since_expiry = (now - sub.end_date).num_days();
                if days_since_expiry <= self.config.grace_period_days {
                    continue;
                }

                match self.auto_downgrade(sub, now).await {
                    Ok(()) => summary.downgraded += 1,
                    Err(error) => {
                        tracing::warn!(
                            subscription_id = %sub.id,
                            owner_id = %sub.owner_id,
                            %error,
                            "failed to downgrade subscription"
                        );
                    }
                }
            }

            match next_page(&batch, page) {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(())
    }

    /// Apply the downgrade transition atomically
    async fn auto_downgrade(
        &self,
        sub: &SubscriptionRow,
        now: DateTime<Utc>,
    ) -> Result<(), SweepError> {
        let message = messages::downgraded(&sub.tier);
        let data = json!({
            "subscriptionId": sub.id,
            "previousTier": sub.tier,
            "action": "upgrade_subscription",
        });

        self.lifecycle
            .downgrade(DowngradeTransition {
                subscription_id: sub.id,
                owner_id: sub.owner_id,
                baseline_tier: self.config.baseline_tier.as_str().to_string(),
                cancellation_reason: AUTO_DOWNGRADE_REASON.to_string(),
                cancelled_at: now,
                notification: self.notification(
                    sub,
                    NotificationType::SubscriptionDowngraded,
                    message,
                    data,
                    now,
                ),
            })
            .await?;

        tracing::info!(
            subscription_id = %sub.id,
            owner_id = %sub.owner_id,
            previous_tier = %sub.tier,
            "subscription auto-downgraded"
        );
        Ok(())
    }

    /// Assemble a full notification document for the given subscription
    fn notification(
        &self,
        sub: &SubscriptionRow,
        kind: NotificationType,
        message: messages::Message,
        data: serde_json::Value,
        now: DateTime<Utc>,
    ) -> CreateNotification {
        let id = NotificationId::compose(sub.owner_id(), now, kind);
        CreateNotification {
            id: id.0,
            user_id: sub.owner_id,
            kind: kind.as_str().to_string(),
            title: message.title,
            body: message.body,
            data,
            created_at: now,
        }
    }
}

/// Next keyset page, or None when the batch was short
fn next_page(batch: &[SubscriptionRow], page: Page) -> Option<Page> {
    let last = batch.last()?;
    if batch.len() as i64 == page.limit {
        Some(Page::after(page.limit, last.id))
    } else {
        None
    }
}
