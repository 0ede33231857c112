//! Outbound notification boundary
//!
//! The lifecycle engine emits an event after each committed transition; the
//! dispatcher is best-effort and its failures never roll back or fail the
//! transition itself. The real mail integration lives behind this trait.
use crate::request::{ApprovalHistory, PaymentRequest, RequestStatus, RequestType};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// A freshly submitted request, addressed to the resolved approver.
    NewRequest {
        to_email: String,
        employee_name: String,
        request_type: RequestType,
        amount: Decimal,
        request_id: String,
    },
    /// An approval or rejection, addressed to the owning employee.
    Decision {
        to_email: String,
        employee_name: String,
        request_type: RequestType,
        amount: Decimal,
        status: RequestStatus,
        approver_name: String,
        comments: Option<String>,
    },
}

impl NotificationEvent {
    pub fn new_request(request: &PaymentRequest, to_email: &str) -> Self {
        Self::NewRequest {
            to_email: to_email.to_string(),
            employee_name: request.employee_name.clone(),
            request_type: request.request_type,
            amount: request.amount,
            request_id: request.id.clone(),
        }
    }

    pub fn decision(request: &PaymentRequest, entry: &ApprovalHistory) -> Self {
        Self::Decision {
            to_email: request.employee_email.clone(),
            employee_name: request.employee_name.clone(),
            request_type: request.request_type,
            amount: request.amount,
            status: entry.status,
            approver_name: entry.approver_name.clone(),
            comments: entry.comments.clone(),
        }
    }

    pub fn recipient(&self) -> &str {
        match self {
            Self::NewRequest { to_email, .. } | Self::Decision { to_email, .. } => to_email,
        }
    }
}

pub trait NotificationDispatcher {
    /// Best-effort delivery. The caller logs errors and carries on.
    fn dispatch(&self, event: &NotificationEvent) -> anyhow::Result<()>;
}

/// Dispatcher that only records the event in the log stream. Useful on its
/// own for development, and the fallback when no mail transport is wired up.
pub struct LogDispatcher;

impl NotificationDispatcher for LogDispatcher {
    fn dispatch(&self, event: &NotificationEvent) -> anyhow::Result<()> {
        tracing::info!(recipient = event.recipient(), event = ?event, "notification dispatched");
        Ok(())
    }
}
