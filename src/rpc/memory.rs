//! In-memory procedure implementations.
//!
//! Back the gateway in offline mode and in tests, where no live procedure
//! upstream exists. List ordering is `due_at` then id so pages are stable
//! across calls.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    BillingProcedures, CreateReminderArgs, ListRemindersArgs, ProcedureContext, Reminder,
    ReminderPage, ReminderStatus, RpcError, SchedulingProcedures, Subscription,
};

#[derive(Default)]
pub struct MemoryScheduling {
    reminders: RwLock<Vec<Reminder>>,
}

impl MemoryScheduling {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SchedulingProcedures for MemoryScheduling {
    async fn list_reminders(
        &self,
        _ctx: &ProcedureContext,
        args: ListRemindersArgs,
    ) -> Result<ReminderPage, RpcError> {
        let reminders = self.reminders.read().await;

        let mut matches: Vec<Reminder> = reminders
            .iter()
            .filter(|r| r.org_id == args.org_id)
            .filter(|r| args.record_id.map_or(true, |id| r.record_id == Some(id)))
            .filter(|r| args.status.map_or(true, |s| r.status == s))
            .filter(|r| args.priority.map_or(true, |p| r.priority == Some(p)))
            .filter(|r| {
                args.search.as_deref().map_or(true, |q| {
                    let q = q.to_lowercase();
                    r.title.to_lowercase().contains(&q)
                        || r.notes
                            .as_deref()
                            .map_or(false, |n| n.to_lowercase().contains(&q))
                })
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(a.id.cmp(&b.id)));

        let total = matches.len() as u64;
        let page = matches
            .into_iter()
            .skip(args.offset as usize)
            .take(args.limit as usize)
            .collect();

        Ok(ReminderPage {
            reminders: page,
            total,
        })
    }

    async fn create_reminder(
        &self,
        ctx: &ProcedureContext,
        args: CreateReminderArgs,
    ) -> Result<Reminder, RpcError> {
        let now = Utc::now();
        let reminder = Reminder {
            id: Uuid::new_v4(),
            org_id: args.org_id,
            record_id: args.record_id,
            title: args.title,
            notes: args.notes,
            due_at: args.due_at,
            status: ReminderStatus::Pending,
            priority: args.priority,
            created_by: ctx.identity.user_id,
            created_at: now,
            updated_at: now,
            snoozed_until: None,
            completed_at: None,
            sent_at: None,
        };

        self.reminders.write().await.push(reminder.clone());
        Ok(reminder)
    }
}

#[derive(Default)]
pub struct MemoryBilling {
    subscriptions: RwLock<HashMap<String, Subscription>>,
}

impl MemoryBilling {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a subscription record, keyed by org id.
    pub async fn insert(&self, subscription: Subscription) {
        self.subscriptions
            .write()
            .await
            .insert(subscription.org_id.clone(), subscription);
    }
}

#[async_trait]
impl BillingProcedures for MemoryBilling {
    async fn get_subscription(
        &self,
        _ctx: &ProcedureContext,
        org_id: &str,
    ) -> Result<Option<Subscription>, RpcError> {
        Ok(self.subscriptions.read().await.get(org_id).cloned())
    }
}
