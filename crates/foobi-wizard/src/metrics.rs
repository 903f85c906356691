//! Wizard metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const TRANSITIONS_TOTAL: &str = "foobi_wizard_transitions_total";
    pub const TRANSITIONS_REJECTED_TOTAL: &str = "foobi_wizard_transitions_rejected_total";
    pub const PROMPTS_TOTAL: &str = "foobi_wizard_prompts_total";
    pub const OPERATIONS_STARTED_TOTAL: &str = "foobi_operations_started_total";
    pub const OPERATIONS_COMPLETED_TOTAL: &str = "foobi_operations_completed_total";
    pub const OPERATIONS_FAILED_TOTAL: &str = "foobi_operations_failed_total";
    pub const OPERATIONS_CANCELLED_TOTAL: &str = "foobi_operations_cancelled_total";
    pub const OPERATION_DURATION_SECONDS: &str = "foobi_operation_duration_seconds";
    pub const STORAGE_FAILURES_TOTAL: &str = "foobi_storage_failures_total";
}

pub fn record_transition(action: &'static str) {
    counter!(names::TRANSITIONS_TOTAL, "action" => action).increment(1);
}

pub fn record_transition_rejected(action: &'static str) {
    counter!(names::TRANSITIONS_REJECTED_TOTAL, "action" => action).increment(1);
}

pub fn record_prompt(prompt: &'static str) {
    counter!(names::PROMPTS_TOTAL, "prompt" => prompt).increment(1);
}

pub fn record_operation_started(kind: &'static str) {
    counter!(names::OPERATIONS_STARTED_TOTAL, "kind" => kind).increment(1);
}

pub fn record_operation_completed(kind: &'static str, duration_secs: f64) {
    counter!(names::OPERATIONS_COMPLETED_TOTAL, "kind" => kind).increment(1);
    histogram!(names::OPERATION_DURATION_SECONDS, "kind" => kind).record(duration_secs);
}

pub fn record_operation_failed(kind: &'static str) {
    counter!(names::OPERATIONS_FAILED_TOTAL, "kind" => kind).increment(1);
}

pub fn record_operation_cancelled() {
    counter!(names::OPERATIONS_CANCELLED_TOTAL).increment(1);
}

pub fn record_storage_failure(operation: &'static str) {
    counter!(names::STORAGE_FAILURES_TOTAL, "operation" => operation).increment(1);
}
