//! REST-facing request and response shapes.
//!
//! Response structs own the external field contract; procedure-layer types
//! never serialize straight onto the wire.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::rpc::{Reminder, ReminderPriority, ReminderStatus, Subscription};

/// Validated body of `POST /api/v1/reminders`. Field order here is the
/// order validation reports failures in.
#[derive(Debug, Clone)]
pub struct CreateReminderRequest {
    pub title: String,
    pub due_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub record_id: Option<Uuid>,
    pub priority: Option<ReminderPriority>,
    /// Cross-org override; passed verbatim to the procedure layer when set.
    pub org_id: Option<String>,
}

/// Validated query of `GET /api/v1/reminders` (pagination params are
/// decoded separately by the codec).
#[derive(Debug, Clone, Default)]
pub struct ListRemindersQuery {
    pub org_id: Option<String>,
    pub record_id: Option<Uuid>,
    pub status: Option<ReminderStatus>,
    pub priority: Option<ReminderPriority>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReminderResponse {
    pub id: Uuid,
    pub org_id: String,
    pub record_id: Option<Uuid>,
    pub title: String,
    pub notes: Option<String>,
    pub due_at: DateTime<Utc>,
    pub status: ReminderStatus,
    pub priority: Option<ReminderPriority>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub snoozed_until: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl From<Reminder> for ReminderResponse {
    fn from(r: Reminder) -> Self {
        Self {
            id: r.id,
            org_id: r.org_id,
            record_id: r.record_id,
            title: r.title,
            notes: r.notes,
            due_at: r.due_at,
            status: r.status,
            priority: r.priority,
            created_by: r.created_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
            snoozed_until: r.snoozed_until,
            completed_at: r.completed_at,
            sent_at: r.sent_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub org_id: String,
    pub plan: String,
    pub status: String,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub trial_end: Option<DateTime<Utc>>,
    pub stripe_sub_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(s: Subscription) -> Self {
        Self {
            org_id: s.org_id,
            plan: s.plan,
            status: s.status,
            current_period_start: s.current_period_start,
            current_period_end: s.current_period_end,
            trial_end: s.trial_end,
            stripe_sub_id: s.stripe_sub_id,
            updated_at: s.updated_at,
        }
    }
}
