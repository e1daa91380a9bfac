//! Webhook pipeline: parse the delivery, then for each event look the ticket
//! up in HubSpot and create the matching Azure DevOps work item.
//!
//! Events are handled strictly one after another. The first failure ends the
//! batch; work items already created for earlier events are left in place.

use serde_json::{Map, Value};
use tracing::{info, info_span, warn, Instrument};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::model::ticket::{ChangeEvent, TicketId};
use crate::model::work_item::{WorkItemRequest, WorkItemResult};
use crate::providers::{self, TicketSource, WorkItemSink};

/// Decode a webhook body into change events. The body must be a JSON array of objects.
pub fn parse_events(body: &[u8]) -> Result<Vec<ChangeEvent>, RelayError> {
    match serde_json::from_slice::<Vec<Map<String, Value>>>(body) {
        Ok(objects) => Ok(objects.into_iter().map(ChangeEvent::from_object).collect()),
        Err(err) => {
            info!(
                error = %err,
                raw_body = %String::from_utf8_lossy(body),
                "Rejecting webhook body"
            );
            Err(RelayError::MalformedPayload)
        }
    }
}

pub struct Relay {
    tickets: Box<dyn TicketSource>,
    work_items: Box<dyn WorkItemSink>,
}

impl Relay {
    pub fn new(tickets: Box<dyn TicketSource>, work_items: Box<dyn WorkItemSink>) -> Self {
        Self {
            tickets,
            work_items,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        let (tickets, work_items) = providers::create_providers(config);
        Self::new(tickets, work_items)
    }

    /// Handle one webhook delivery end to end.
    pub async fn handle_body(&self, body: &[u8]) -> Result<Vec<WorkItemResult>, RelayError> {
        let events = parse_events(body)?;
        info!(events = events.len(), "Parsed webhook delivery");
        self.process_events(&events).await
    }

    pub async fn process_events(
        &self,
        events: &[ChangeEvent],
    ) -> Result<Vec<WorkItemResult>, RelayError> {
        let mut created = Vec::with_capacity(events.len());
        for event in events {
            let Some(ticket_id) = event.ticket_id() else {
                warn!(event_id = ?event.event_id, "Event has no ticket id");
                return Err(RelayError::MissingTicketId);
            };
            info!(
                ticket_id = %ticket_id,
                subscription = ?event.subscription_type,
                property = ?event.property_name,
                "Ticket ID"
            );
            created.push(self.relay_ticket(&ticket_id).await?);
        }
        Ok(created)
    }

    /// Enrich, map and publish a single ticket.
    pub async fn relay_ticket(&self, ticket_id: &TicketId) -> Result<WorkItemResult, RelayError> {
        let span = info_span!("relay_ticket", ticket_id = %ticket_id);
        async {
            let ticket = self.tickets.fetch_ticket(ticket_id).await?;
            info!(
                source = self.tickets.name(),
                title = %ticket.subject,
                priority = %ticket.priority(),
                client = %ticket.client_id,
                resolution = %ticket.resolution_notes,
                owner = %ticket.owner_id,
                form = %ticket.form_identifier,
                created = %ticket.created_date,
                closed = %ticket.closed_date,
                "Fetched ticket"
            );

            let request = WorkItemRequest::from_ticket(&ticket);
            let result = self.work_items.create_work_item(&request).await?;
            match result.id_text() {
                Some(id) => info!(
                    work_item_id = %id,
                    sink = self.work_items.name(),
                    "ADO Work Item Created"
                ),
                None => warn!(
                    sink = self.work_items.name(),
                    "Work item created but response had no id"
                ),
            }
            Ok::<_, RelayError>(result)
        }
        .instrument(span)
        .await
    }
}
