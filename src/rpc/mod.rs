//! Typed procedure interface the gateway calls into.
//!
//! The gateway owns none of the business logic: handlers bind a
//! [`ProcedureCaller`] to the request's identity and invoke named procedures,
//! trusting their results and errors. Authorization (including cross-org
//! access when an explicit org id is supplied) is entirely the procedure
//! layer's responsibility.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::CallerIdentity;

/// Error surface of the procedure layer. Anything other than `NotFound`
/// is opaque to REST callers and normalized to a 500 at the boundary.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Per-call context carrying the resolved caller identity.
#[derive(Debug, Clone)]
pub struct ProcedureContext {
    pub identity: CallerIdentity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Sent,
    Snoozed,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub org_id: String,
    pub plan: String,
    pub status: String,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub trial_end: Option<DateTime<Utc>>,
    pub stripe_sub_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Argument envelope for `scheduling.list_reminders`. `org_id` is always
/// resolved by the handler before the call (request override or caller org).
#[derive(Debug, Clone)]
pub struct ListRemindersArgs {
    pub org_id: String,
    pub record_id: Option<Uuid>,
    pub status: Option<ReminderStatus>,
    pub priority: Option<ReminderPriority>,
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u64,
}

#[derive(Debug, Clone)]
pub struct ReminderPage {
    pub reminders: Vec<Reminder>,
    pub total: u64,
}

#[derive(Debug, Clone)]
pub struct CreateReminderArgs {
    pub org_id: String,
    pub record_id: Option<Uuid>,
    pub title: String,
    pub notes: Option<String>,
    pub due_at: DateTime<Utc>,
    pub priority: Option<ReminderPriority>,
}

#[async_trait]
pub trait SchedulingProcedures: Send + Sync {
    async fn list_reminders(
        &self,
        ctx: &ProcedureContext,
        args: ListRemindersArgs,
    ) -> Result<ReminderPage, RpcError>;

    async fn create_reminder(
        &self,
        ctx: &ProcedureContext,
        args: CreateReminderArgs,
    ) -> Result<Reminder, RpcError>;
}

#[async_trait]
pub trait BillingProcedures: Send + Sync {
    async fn get_subscription(
        &self,
        ctx: &ProcedureContext,
        org_id: &str,
    ) -> Result<Option<Subscription>, RpcError>;
}

/// Routing table of procedure namespaces, shared across requests.
#[derive(Clone)]
pub struct ProcedureRouter {
    pub scheduling: Arc<dyn SchedulingProcedures>,
    pub billing: Arc<dyn BillingProcedures>,
}

impl ProcedureRouter {
    pub fn new(
        scheduling: Arc<dyn SchedulingProcedures>,
        billing: Arc<dyn BillingProcedures>,
    ) -> Self {
        Self { scheduling, billing }
    }

    /// Bind a caller identity, yielding a per-request caller. No timeout is
    /// imposed here; the procedure layer owns its own deadlines.
    pub fn caller(&self, identity: CallerIdentity) -> ProcedureCaller {
        ProcedureCaller {
            router: self.clone(),
            ctx: ProcedureContext { identity },
        }
    }
}

/// One request's bound view of the procedure router. Calls are made at most
/// once per handler; failures propagate without retries.
pub struct ProcedureCaller {
    router: ProcedureRouter,
    ctx: ProcedureContext,
}

impl ProcedureCaller {
    pub async fn list_reminders(&self, args: ListRemindersArgs) -> Result<ReminderPage, RpcError> {
        self.router.scheduling.list_reminders(&self.ctx, args).await
    }

    pub async fn create_reminder(&self, args: CreateReminderArgs) -> Result<Reminder, RpcError> {
        self.router.scheduling.create_reminder(&self.ctx, args).await
    }

    pub async fn get_subscription(&self, org_id: &str) -> Result<Option<Subscription>, RpcError> {
        self.router.billing.get_subscription(&self.ctx, org_id).await
    }
}
