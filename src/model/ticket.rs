use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// HubSpot properties requested for every ticket lookup.
pub const TICKET_PROPERTIES: &[&str] = &[
    "subject",
    "content",
    "hs_ticket_priority",
    "client_id",
    "ticket_resolution_notes",
    "createdate",
    "hubspot_owner_id",
    "form_identifier",
    "closed_date",
];

pub const DEFAULT_DESCRIPTION: &str = "No description provided";
pub const DEFAULT_CLIENT: &str = "ftr";
pub const DEFAULT_RESOLUTION: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketId(String);

impl TicketId {
    /// Returns None for an empty identifier. Whitespace is kept as-is.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One notification from a HubSpot webhook delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    object_id: Option<Value>,
    pub event_id: Option<String>,
    pub subscription_type: Option<String>,
    pub property_name: Option<String>,
}

impl ChangeEvent {
    pub fn from_object(obj: Map<String, Value>) -> Self {
        let text = |key: &str| obj.get(key).and_then(scalar_to_string);
        Self {
            event_id: text("eventId"),
            subscription_type: text("subscriptionType"),
            property_name: text("propertyName"),
            object_id: obj.get("objectId").cloned(),
        }
    }

    /// HubSpot sends `objectId` as a number; strings are accepted too.
    /// Null, empty, zero and non-scalar values count as missing.
    pub fn ticket_id(&self) -> Option<TicketId> {
        match self.object_id.as_ref()? {
            Value::String(s) => TicketId::new(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => TicketId::new(n.to_string()),
            _ => None,
        }
    }
}

/// Case-insensitive HubSpot priority, ordered most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorityLevel {
    Urgent = 1,
    High = 2,
    Medium = 3,
    Low = 4,
}

impl PriorityLevel {
    /// Unknown or empty labels map to `Low`.
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "urgent" => PriorityLevel::Urgent,
            "high" => PriorityLevel::High,
            "medium" => PriorityLevel::Medium,
            _ => PriorityLevel::Low,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriorityLevel::Urgent => "Urgent",
            PriorityLevel::High => "High",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::Low => "Low",
        };
        write!(f, "{name} ({})", self.value())
    }
}

/// A HubSpot ticket with every field resolved to a value or its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: TicketId,
    pub subject: String,
    pub content: String,
    pub priority_label: String,
    pub client_id: String,
    pub resolution_notes: String,
    pub created_date: String,
    pub owner_id: String,
    pub form_identifier: String,
    pub closed_date: String,
}

impl Ticket {
    pub fn from_properties(id: TicketId, props: &HashMap<String, Value>) -> Self {
        let get = |key: &str| props.get(key).and_then(scalar_to_string);

        Ticket {
            subject: get("subject").unwrap_or_else(|| format!("HubSpot Ticket {id}")),
            content: get("content").unwrap_or_else(|| DEFAULT_DESCRIPTION.into()),
            priority_label: get("hs_ticket_priority").unwrap_or_default(),
            client_id: get("client_id").unwrap_or_else(|| DEFAULT_CLIENT.into()),
            resolution_notes: get("ticket_resolution_notes")
                .unwrap_or_else(|| DEFAULT_RESOLUTION.into()),
            created_date: get("createdate").unwrap_or_default(),
            owner_id: get("hubspot_owner_id").unwrap_or_default(),
            form_identifier: get("form_identifier").unwrap_or_default(),
            closed_date: get("closed_date").unwrap_or_default(),
            id,
        }
    }

    pub fn priority(&self) -> PriorityLevel {
        PriorityLevel::from_label(&self.priority_label)
    }
}

/// Non-empty strings pass through; numbers and booleans are stringified.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: Value) -> ChangeEvent {
        match value {
            Value::Object(obj) => ChangeEvent::from_object(obj),
            other => panic!("not an object: {other}"),
        }
    }

    fn props(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    fn id(s: &str) -> TicketId {
        TicketId::new(s).unwrap()
    }

    #[test]
    fn numeric_object_id_becomes_ticket_id() {
        let ev = event(json!({ "objectId": 123456, "subscriptionType": "ticket.creation" }));
        assert_eq!(ev.ticket_id(), Some(id("123456")));
        assert_eq!(ev.subscription_type.as_deref(), Some("ticket.creation"));
    }

    #[test]
    fn string_object_id_is_kept_verbatim() {
        let ev = event(json!({ "objectId": "abc-42" }));
        assert_eq!(ev.ticket_id(), Some(id("abc-42")));
    }

    #[test]
    fn falsy_object_ids_are_missing() {
        for value in [json!(null), json!(""), json!(0), json!(false), json!([1])] {
            let ev = event(json!({ "objectId": value }));
            assert_eq!(ev.ticket_id(), None, "objectId {value} should be missing");
        }
        assert_eq!(event(json!({ "eventId": 7 })).ticket_id(), None);
    }

    #[test]
    fn priority_mapping_is_case_insensitive_and_total() {
        assert_eq!(PriorityLevel::from_label("URGENT").value(), 1);
        assert_eq!(PriorityLevel::from_label("urgent").value(), 1);
        assert_eq!(PriorityLevel::from_label("High").value(), 2);
        assert_eq!(PriorityLevel::from_label("Medium").value(), 3);
        assert_eq!(PriorityLevel::from_label("Low").value(), 4);
        assert_eq!(PriorityLevel::from_label("").value(), 4);
        assert_eq!(PriorityLevel::from_label("unknown-label").value(), 4);
        assert_eq!(PriorityLevel::from_label(" urgent ").value(), 4);
    }

    #[test]
    fn priority_levels_are_ordered_by_urgency() {
        assert!(PriorityLevel::Urgent < PriorityLevel::High);
        assert!(PriorityLevel::Medium < PriorityLevel::Low);
        assert_eq!(PriorityLevel::High.to_string(), "High (2)");
    }

    #[test]
    fn missing_properties_fall_back_to_defaults() {
        let ticket = Ticket::from_properties(id("42"), &HashMap::new());
        assert_eq!(ticket.subject, "HubSpot Ticket 42");
        assert_eq!(ticket.content, "No description provided");
        assert_eq!(ticket.client_id, "ftr");
        assert_eq!(ticket.resolution_notes, "N/A");
        assert_eq!(ticket.created_date, "");
        assert_eq!(ticket.owner_id, "");
        assert_eq!(ticket.form_identifier, "");
        assert_eq!(ticket.closed_date, "");
        assert_eq!(ticket.priority(), PriorityLevel::Low);
    }

    #[test]
    fn empty_and_null_properties_count_as_missing() {
        let ticket = Ticket::from_properties(
            id("42"),
            &props(json!({ "subject": "", "content": null, "client_id": "" })),
        );
        assert_eq!(ticket.subject, "HubSpot Ticket 42");
        assert_eq!(ticket.content, "No description provided");
        assert_eq!(ticket.client_id, "ftr");
    }

    #[test]
    fn present_properties_are_used() {
        let ticket = Ticket::from_properties(
            id("7"),
            &props(json!({
                "subject": "Printer on fire",
                "content": "Smoke everywhere",
                "hs_ticket_priority": "HIGH",
                "client_id": "acme",
                "ticket_resolution_notes": "Extinguished",
                "createdate": "2024-05-01T10:00:00Z",
                "hubspot_owner_id": 991,
                "form_identifier": "support-form",
                "closed_date": "2024-05-02T10:00:00Z"
            })),
        );
        assert_eq!(ticket.subject, "Printer on fire");
        assert_eq!(ticket.content, "Smoke everywhere");
        assert_eq!(ticket.priority(), PriorityLevel::High);
        assert_eq!(ticket.client_id, "acme");
        assert_eq!(ticket.resolution_notes, "Extinguished");
        assert_eq!(ticket.owner_id, "991");
        assert_eq!(ticket.form_identifier, "support-form");
        assert_eq!(ticket.closed_date, "2024-05-02T10:00:00Z");
    }

    #[test]
    fn only_empty_ticket_id_is_rejected() {
        assert!(TicketId::new("").is_none());
        assert_eq!(TicketId::new("   ").map(|id| id.to_string()), Some("   ".into()));
    }

    #[test]
    fn whitespace_object_id_is_not_missing() {
        let ev = event(json!({ "objectId": "  " }));
        assert_eq!(ev.ticket_id().map(|id| id.to_string()), Some("  ".into()));
    }
}
