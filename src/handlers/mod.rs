pub mod billing;
pub mod reminders;
