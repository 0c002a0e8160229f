//! Request validation against per-endpoint schemas.
//!
//! Checks walk fields in declaration order and never mutate input, so the
//! same malformed request always produces the same ordered error list.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::error::FieldError;
use crate::rpc::{ReminderPriority, ReminderStatus};

use super::types::{CreateReminderRequest, ListRemindersQuery};

const MAX_TITLE_LEN: usize = 500;
const MAX_NOTES_LEN: usize = 5000;

pub fn validate_create_reminder(body: &Value) -> Result<CreateReminderRequest, Vec<FieldError>> {
    let Some(obj) = body.as_object() else {
        return Err(vec![FieldError::new(
            "body",
            "request body must be a JSON object",
        )]);
    };

    let mut errors = Vec::new();

    let title = match obj.get("title") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("title", "title is required"));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(FieldError::new("title", "title must not be empty"));
            None
        }
        Some(Value::String(s)) if s.chars().count() > MAX_TITLE_LEN => {
            errors.push(FieldError::new(
                "title",
                format!("title must be at most {} characters", MAX_TITLE_LEN),
            ));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new("title", "title must be a string"));
            None
        }
    };

    let due_at = match obj.get("due_at") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("due_at", "due_at is required"));
            None
        }
        Some(Value::String(s)) => match parse_timestamp(s) {
            Some(ts) => Some(ts),
            None => {
                errors.push(FieldError::new(
                    "due_at",
                    "due_at must be an RFC 3339 timestamp",
                ));
                None
            }
        },
        Some(_) => {
            errors.push(FieldError::new(
                "due_at",
                "due_at must be an RFC 3339 timestamp",
            ));
            None
        }
    };

    let notes = match obj.get("notes") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.chars().count() > MAX_NOTES_LEN => {
            errors.push(FieldError::new(
                "notes",
                format!("notes must be at most {} characters", MAX_NOTES_LEN),
            ));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new("notes", "notes must be a string"));
            None
        }
    };

    let record_id = match obj.get("record_id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match Uuid::parse_str(s) {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push(FieldError::new("record_id", "record_id must be a UUID"));
                None
            }
        },
        Some(_) => {
            errors.push(FieldError::new("record_id", "record_id must be a UUID"));
            None
        }
    };

    let priority = match obj.get("priority") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match parse_priority(s) {
            Some(p) => Some(p),
            None => {
                errors.push(FieldError::new(
                    "priority",
                    "priority must be one of low, medium, high",
                ));
                None
            }
        },
        Some(_) => {
            errors.push(FieldError::new(
                "priority",
                "priority must be one of low, medium, high",
            ));
            None
        }
    };

    let org_id = match obj.get("org_id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(
                "org_id",
                "org_id must be a non-empty string",
            ));
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CreateReminderRequest {
        // Both unwraps guarded by the empty error list above
        title: title.unwrap(),
        due_at: due_at.unwrap(),
        notes,
        record_id,
        priority,
        org_id,
    })
}

pub fn validate_list_query(
    params: &HashMap<String, String>,
) -> Result<ListRemindersQuery, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut query = ListRemindersQuery::default();

    if let Some(org_id) = non_empty(params.get("org_id")) {
        query.org_id = Some(org_id.to_string());
    }

    if let Some(record_id) = non_empty(params.get("record_id")) {
        match Uuid::parse_str(record_id) {
            Ok(id) => query.record_id = Some(id),
            Err(_) => errors.push(FieldError::new("record_id", "record_id must be a UUID")),
        }
    }

    if let Some(status) = non_empty(params.get("status")) {
        match parse_status(status) {
            Some(s) => query.status = Some(s),
            None => errors.push(FieldError::new(
                "status",
                "status must be one of pending, sent, snoozed, completed",
            )),
        }
    }

    if let Some(priority) = non_empty(params.get("priority")) {
        match parse_priority(priority) {
            Some(p) => query.priority = Some(p),
            None => errors.push(FieldError::new(
                "priority",
                "priority must be one of low, medium, high",
            )),
        }
    }

    if let Some(q) = non_empty(params.get("q")) {
        query.q = Some(q.to_string());
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(query)
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.as_str()).filter(|s| !s.trim().is_empty())
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_status(s: &str) -> Option<ReminderStatus> {
    match s {
        "pending" => Some(ReminderStatus::Pending),
        "sent" => Some(ReminderStatus::Sent),
        "snoozed" => Some(ReminderStatus::Snoozed),
        "completed" => Some(ReminderStatus::Completed),
        _ => None,
    }
}

fn parse_priority(s: &str) -> Option<ReminderPriority> {
    match s {
        "low" => Some(ReminderPriority::Low),
        "medium" => Some(ReminderPriority::Medium),
        "high" => Some(ReminderPriority::High),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_body_produces_typed_request() {
        let body = json!({
            "title": "Vaccine",
            "due_at": "2025-01-01T00:00:00Z",
            "notes": "booster shot",
            "priority": "high",
        });

        let request = validate_create_reminder(&body).unwrap();
        assert_eq!(request.title, "Vaccine");
        assert_eq!(request.priority, Some(ReminderPriority::High));
        assert_eq!(request.org_id, None);
        assert_eq!(request.due_at.timestamp(), 1735689600);
    }

    #[test]
    fn org_override_is_preserved_verbatim() {
        let body = json!({
            "title": "Vaccine",
            "due_at": "2025-01-01T00:00:00Z",
            "org_id": "org-42",
        });

        let request = validate_create_reminder(&body).unwrap();
        assert_eq!(request.org_id.as_deref(), Some("org-42"));
    }

    #[test]
    fn errors_come_back_in_field_declaration_order() {
        let body = json!({
            "org_id": 7,
            "priority": "urgent",
            "due_at": "tomorrow",
        });

        let errors = validate_create_reminder(&body).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["title", "due_at", "priority", "org_id"]);
    }

    #[test]
    fn validation_is_idempotent() {
        let body = json!({ "title": "", "due_at": 42 });

        let first = validate_create_reminder(&body).unwrap_err();
        let second = validate_create_reminder(&body).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errors = validate_create_reminder(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "body");
    }

    #[test]
    fn query_rejects_out_of_range_enums() {
        let mut params = HashMap::new();
        params.insert("status".to_string(), "done".to_string());

        let errors = validate_list_query(&params).unwrap_err();
        assert_eq!(errors[0].field, "status");
    }

    #[test]
    fn query_accepts_filters_and_ignores_blank_values() {
        let mut params = HashMap::new();
        params.insert("status".to_string(), "pending".to_string());
        params.insert("q".to_string(), "vaccine".to_string());
        params.insert("org_id".to_string(), "  ".to_string());

        let query = validate_list_query(&params).unwrap();
        assert_eq!(query.status, Some(ReminderStatus::Pending));
        assert_eq!(query.q.as_deref(), Some("vaccine"));
        assert_eq!(query.org_id, None);
    }
}
