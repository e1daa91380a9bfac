use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ticket::Ticket;

pub const FIELD_TITLE: &str = "/fields/System.Title";
pub const FIELD_DESCRIPTION: &str = "/fields/System.Description";
pub const FIELD_CLIENT_PRIORITY: &str = "/fields/Custom.ClientPriority";
pub const FIELD_CLIENT: &str = "/fields/Custom.Client";
pub const FIELD_RESOLUTION: &str = "/fields/Custom.Resolutiondetails";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: Value,
}

impl PatchOperation {
    pub fn add(path: &str, value: impl Into<Value>) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.to_string(),
            value: value.into(),
        }
    }
}

/// JSON Patch document sent to Azure DevOps to create a work item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WorkItemRequest(Vec<PatchOperation>);

impl WorkItemRequest {
    /// Every field is always present, in this order.
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self(vec![
            PatchOperation::add(FIELD_TITLE, ticket.subject.as_str()),
            PatchOperation::add(FIELD_DESCRIPTION, ticket.content.as_str()),
            PatchOperation::add(FIELD_CLIENT_PRIORITY, ticket.priority().value()),
            PatchOperation::add(FIELD_CLIENT, ticket.client_id.as_str()),
            PatchOperation::add(FIELD_RESOLUTION, ticket.resolution_notes.as_str()),
        ])
    }

    #[cfg(test)]
    pub fn field(&self, path: &str) -> Option<&Value> {
        self.0.iter().find(|op| op.path == path).map(|op| &op.value)
    }
}

/// ADO returns a numeric id, but any JSON value is accepted once the item exists.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorkItemResult {
    #[serde(default)]
    pub id: Option<Value>,
}

impl WorkItemResult {
    pub fn id_text(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
