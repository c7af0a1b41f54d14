//! Single-field patch descriptors.
//!
//! Each backend exposes one endpoint per patchable scalar. A descriptor names
//! the endpoint, the query parameter carrying the new value, how to apply the
//! value to the local copy, and the message recorded when the patch fails.

use crate::record::{CandidateRecord, LeaveRecord, Record};

/// Describes how to patch one field of one record type.
pub trait FieldPatch: Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Record type this field belongs to.
    type Record: Record;

    /// Endpoint path (PUT, with `id` and the value as query parameters).
    fn path(&self) -> &'static str;

    /// Query parameter name for the new value.
    fn query_key(&self) -> &'static str;

    /// Apply the value to a local record, leaving every other field untouched.
    fn apply(&self, record: &mut Self::Record, value: &str);

    /// Message recorded in store state when the patch fails.
    fn failure_message(&self) -> &'static str;
}

/// Patchable leave fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveField {
    /// Approval status
    Status,
}

impl FieldPatch for LeaveField {
    type Record = LeaveRecord;

    fn path(&self) -> &'static str {
        match self {
            LeaveField::Status => "/leave/editLeavestatus",
        }
    }

    fn query_key(&self) -> &'static str {
        match self {
            LeaveField::Status => "status",
        }
    }

    fn apply(&self, record: &mut LeaveRecord, value: &str) {
        match self {
            LeaveField::Status => record.status = Some(value.to_string()),
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            LeaveField::Status => "Error editing leave status.",
        }
    }
}

/// Patchable candidate fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateField {
    /// Hiring status
    Status,
    /// Attendance status
    AttendanceStatus,
    /// Assigned task
    Task,
}

impl FieldPatch for CandidateField {
    type Record = CandidateRecord;

    fn path(&self) -> &'static str {
        match self {
            CandidateField::Status => "/condidate/updateCondidate",
            // Attendance and task share one endpoint, told apart by query key.
            CandidateField::AttendanceStatus | CandidateField::Task => "/condidate/updateTask",
        }
    }

    fn query_key(&self) -> &'static str {
        match self {
            CandidateField::Status => "status",
            CandidateField::AttendanceStatus => "attendenceStatus",
            CandidateField::Task => "task",
        }
    }

    fn apply(&self, record: &mut CandidateRecord, value: &str) {
        let slot = match self {
            CandidateField::Status => &mut record.status,
            CandidateField::AttendanceStatus => &mut record.attendance_status,
            CandidateField::Task => &mut record.task,
        };
        *slot = Some(value.to_string());
    }

    fn failure_message(&self) -> &'static str {
        match self {
            CandidateField::Status => "Error updating candidate status.",
            CandidateField::AttendanceStatus => "Error updating candidate attendenceStatus.",
            CandidateField::Task => "Error updating candidate task.",
        }
    }
}
