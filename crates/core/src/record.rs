//! Leave and candidate records.
//!
//! Records are server-defined. Only the fields this layer reads or patches are
//! typed; everything else is kept in `extra` so the local mirror serializes
//! back exactly what the server returned.

use crate::id::RecordId;
use crate::Fields;
use serde::{Deserialize, Deserializer, Serialize};

/// A record mirrored in a store's local list.
pub trait Record: Clone + Send + Sync + 'static {
    /// Identifier used to match local entries against mutation targets.
    fn id(&self) -> &RecordId;
}

/// A leave request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// Server identifier
    #[serde(rename = "_id")]
    pub id: RecordId,

    /// Approval status (values are not interpreted here)
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,

    /// Remaining server fields
    #[serde(flatten)]
    pub extra: Fields,
}

impl LeaveRecord {
    /// Create a leave record with no extra fields.
    pub fn new(id: impl Into<RecordId>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: Some(status.into()),
            extra: Fields::new(),
        }
    }
}

impl Record for LeaveRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// A recruitment candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Server identifier
    #[serde(rename = "_id")]
    pub id: RecordId,

    /// Hiring status
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,

    /// Attendance status (the backend spells it `attendenceStatus`)
    #[serde(
        rename = "attendenceStatus",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub attendance_status: Option<String>,

    /// Assigned task
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub task: Option<String>,

    /// Remaining server fields
    #[serde(flatten)]
    pub extra: Fields,
}

impl CandidateRecord {
    /// Create a candidate with only an identifier.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            status: None,
            attendance_status: None,
            task: None,
            extra: Fields::new(),
        }
    }
}

impl Record for CandidateRecord {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Scalar fields are opaque: `null` reads as absent, and a non-string value
/// is kept as its JSON text instead of failing the whole record.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
