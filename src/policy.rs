//! Role-gated authorization predicates
//!
//! Pure functions over an identity and a request; no I/O, no side effects.
//! Callers translate a `false` into `WorkflowError::Unauthorized` (or the
//! more specific self-approval error, see the service layer).
use crate::identity::Identity;
use crate::request::{PaymentRequest, RequestStatus};

/// Owner, current approver, and hr/admin may view a request. A manager's own
/// submissions fall under the owner clause.
pub fn can_view(identity: &Identity, request: &PaymentRequest) -> bool {
    request.employee_id == identity.id
        || request.current_approver_id.as_deref() == Some(identity.id.as_str())
        || identity.role.is_elevated()
}

/// Only hr/admin may list the entire request collection.
pub fn can_list_all(identity: &Identity) -> bool {
    identity.role.is_elevated()
}

/// A decision is allowed on a decidable request, by the current approver or
/// an elevated role, never by the owning employee. The self-approval ban is
/// unconditional, hr/admin included.
pub fn can_approve(identity: &Identity, request: &PaymentRequest) -> bool {
    request.status.is_decidable()
        && (request.current_approver_id.as_deref() == Some(identity.id.as_str())
            || identity.role.is_elevated())
        && identity.id != request.employee_id
}

/// Content fields are only editable by the owner, and only while pending.
pub fn can_edit_content(identity: &Identity, request: &PaymentRequest) -> bool {
    identity.id == request.employee_id && request.status == RequestStatus::Pending
}
