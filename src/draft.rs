//! Draft construction and validation for payment requests
use crate::error::WorkflowError;
use crate::identity::Identity;
use crate::request::{PaymentRequest, RequestStatus, RequestType, TimeStamp};
use crate::utils;
use chrono::Utc;
use rust_decimal::Decimal;

/// Builder for a payment request draft, the basis for `submit`.
#[derive(Debug, Clone, Default)]
pub struct RequestDraft {
    request_type: Option<RequestType>,
    amount: Decimal,
    description: String,
    supporting_documents: Vec<String>,
    requested_payment_date: Option<TimeStamp<Utc>>,
}

impl RequestDraft {
    /// Construct a new builder object, this becomes the basis for a draft
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_request_type(mut self, request_type: RequestType) -> Self {
        self.request_type = Some(request_type);
        self
    }
    pub fn set_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }
    pub fn set_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
    pub fn add_supporting_document(mut self, reference: &str) -> Self {
        self.supporting_documents.push(reference.to_string());
        self
    }
    pub fn set_requested_payment_date(mut self, date: TimeStamp<Utc>) -> Self {
        self.requested_payment_date = Some(date);
        self
    }

    /// Checks fields, then mints the pending request owned by `employee`.
    /// The initial approver is the employee's manager; an employee without a
    /// manager submits an unrouted request that needs hr/admin intervention.
    pub fn validate_and_finalise(
        self,
        employee: &Identity,
    ) -> Result<PaymentRequest, WorkflowError> {
        let Some(request_type) = self.request_type else {
            return Err(WorkflowError::MissingRequestType);
        };
        if self.amount <= Decimal::ZERO {
            return Err(WorkflowError::NonPositiveAmount);
        }
        if self.description.trim().is_empty() {
            return Err(WorkflowError::EmptyDescription);
        }

        let id = utils::mint_id(utils::REQUEST_HRP)?;
        let now = TimeStamp::new();

        Ok(PaymentRequest {
            id,
            employee_id: employee.id.clone(),
            employee_name: employee.full_name.clone(),
            employee_email: employee.email.clone(),
            request_type,
            amount: self.amount,
            description: self.description,
            supporting_documents: self.supporting_documents,
            status: RequestStatus::Pending,
            approval_history: vec![],
            current_approver_id: employee.manager_id.clone(),
            rejection_reason: None,
            requested_payment_date: self.requested_payment_date,
            actual_payment_date: None,
            created_at: now.clone(),
            updated_at: now,
        })
    }
}

/// Content patch an owning employee may apply while the request is still
/// pending. Only the set fields are merged.
#[derive(Debug, Clone, Default)]
pub struct ContentPatch {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub supporting_documents: Option<Vec<String>>,
    pub requested_payment_date: Option<TimeStamp<Utc>>,
}

impl ContentPatch {
    /// Merge the patch into `request`. Validation runs before any field is
    /// touched, so a failed patch leaves the request as it was.
    pub fn apply(self, request: &mut PaymentRequest) -> Result<(), WorkflowError> {
        if let Some(amount) = self.amount {
            if amount <= Decimal::ZERO {
                return Err(WorkflowError::NonPositiveAmount);
            }
        }
        if let Some(description) = &self.description {
            if description.trim().is_empty() {
                return Err(WorkflowError::EmptyDescription);
            }
        }

        if let Some(amount) = self.amount {
            request.amount = amount;
        }
        if let Some(description) = self.description {
            request.description = description;
        }
        if let Some(supporting_documents) = self.supporting_documents {
            request.supporting_documents = supporting_documents;
        }
        if let Some(requested_payment_date) = self.requested_payment_date {
            request.requested_payment_date = Some(requested_payment_date);
        }
        request.updated_at = TimeStamp::new();

        Ok(())
    }
}
