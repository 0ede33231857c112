//! Service layer API for the payroll approval workflow
use crate::draft::{ContentPatch, RequestDraft};
use crate::error::WorkflowError;
use crate::identity::{Identity, IdentityUpdate, NewIdentity, Role};
use crate::notify::{NotificationDispatcher, NotificationEvent};
use crate::policy;
use crate::request::{ApprovalHistory, PaymentRequest, RequestStatus, TimeStamp};
use crate::store::{IdentityStore, RequestStore};

/// An approval or rejection verdict on a request.
#[derive(Debug, Clone)]
pub struct Decision {
    pub status: RequestStatus,
    pub comments: Option<String>,
}

/// The lifecycle engine. Holds an injected store and dispatcher; every
/// action funnels through the policy predicates before it mutates anything.
pub struct ApprovalService<S, N> {
    store: S,
    dispatcher: N,
    // in future we could add a config for strict tier sequencing
}

impl<S, N> ApprovalService<S, N>
where
    S: RequestStore + IdentityStore,
    N: NotificationDispatcher,
{
    pub fn new(store: S, dispatcher: N) -> Self {
        Self { store, dispatcher }
    }

    /// Register a new identity. Email must be unique across the directory,
    /// and a referenced manager must already exist.
    pub fn register_identity(&self, new: NewIdentity) -> Result<Identity, WorkflowError> {
        if self.store.identity_by_email(&new.email)?.is_some() {
            return Err(WorkflowError::DuplicateEmail(new.email));
        }
        if let Some(manager_id) = &new.manager_id {
            self.store.load_identity(manager_id)?;
        }

        let identity = Identity::register(new)?;
        self.store.upsert_identity(&identity)?;

        Ok(identity)
    }

    /// Merge a profile patch into an existing identity.
    pub fn update_identity(
        &self,
        identity_id: &str,
        patch: IdentityUpdate,
    ) -> Result<Identity, WorkflowError> {
        let mut identity = self.store.load_identity(identity_id)?;
        if let Some(manager_id) = &patch.manager_id {
            self.store.load_identity(manager_id)?;
        }

        patch.apply(&mut identity);
        self.store.upsert_identity(&identity)?;

        Ok(identity)
    }

    /// Submit a new payment request for approval
    pub fn submit(
        &self,
        employee: &Identity,
        draft: RequestDraft,
    ) -> Result<PaymentRequest, WorkflowError> {
        let request = draft.validate_and_finalise(employee)?;
        self.store.create_request(&request)?;

        // Notify the routed approver, if the employee has one. The request
        // is already committed; delivery is best-effort from here.
        if let Some(manager_id) = &request.current_approver_id {
            match self.store.load_identity(manager_id) {
                Ok(manager) => {
                    self.notify_best_effort(NotificationEvent::new_request(&request, &manager.email));
                }
                Err(err) => {
                    tracing::warn!(manager_id = %manager_id, error = %err, "approver lookup failed, skipping notification");
                }
            }
        }

        Ok(request)
    }

    /// Approve or reject a request.
    ///
    /// Policy is re-validated here even though callers are expected to have
    /// checked it already. A lost compare-and-swap race means someone else
    /// decided first, and surfaces as an invalid transition from the status
    /// they moved the request to.
    pub fn decide(
        &self,
        approver: &Identity,
        request_id: &str,
        decision: Decision,
    ) -> Result<PaymentRequest, WorkflowError> {
        let before = self.store.load_request(request_id)?;
        let target = decision.status;

        if before.status.is_terminal() {
            return Err(WorkflowError::InvalidTransition {
                from: before.status,
                to: target,
            });
        }
        if approver.id == before.employee_id {
            return Err(WorkflowError::SelfApproval);
        }
        if !policy::can_approve(approver, &before) {
            return Err(WorkflowError::Unauthorized);
        }
        if !before.status.allows_transition_to(target) {
            return Err(WorkflowError::InvalidTransition {
                from: before.status,
                to: target,
            });
        }

        let entry = ApprovalHistory {
            approver_id: approver.id.clone(),
            approver_name: approver.full_name.clone(),
            status: target,
            comments: decision.comments,
            approved_at: TimeStamp::new(),
        };

        let mut after = before.clone();
        after.apply_decision(entry.clone());

        match self.store.swap_request(&before, &after) {
            Ok(()) => {}
            Err(WorkflowError::Conflict) => {
                let current = self.store.load_request(request_id)?;
                return Err(WorkflowError::InvalidTransition {
                    from: current.status,
                    to: target,
                });
            }
            Err(err) => return Err(err),
        }

        self.notify_best_effort(NotificationEvent::decision(&after, &entry));

        Ok(after)
    }

    /// Edit the content fields of a still-pending request. Owner only.
    pub fn edit_content(
        &self,
        employee: &Identity,
        request_id: &str,
        patch: ContentPatch,
    ) -> Result<PaymentRequest, WorkflowError> {
        let before = self.store.load_request(request_id)?;
        if !policy::can_edit_content(employee, &before) {
            return Err(WorkflowError::Unauthorized);
        }

        let mut after = before.clone();
        patch.apply(&mut after)?;
        self.store.swap_request(&before, &after)?;

        Ok(after)
    }

    /// Mark a finally-approved request as paid out. This is the external
    /// payment-processing action, restricted to hr/admin; `decide` can never
    /// reach `paid`.
    pub fn mark_paid(
        &self,
        actor: &Identity,
        request_id: &str,
    ) -> Result<PaymentRequest, WorkflowError> {
        if !actor.role.is_elevated() {
            return Err(WorkflowError::Unauthorized);
        }

        let before = self.store.load_request(request_id)?;
        if before.status != RequestStatus::ApprovedFinal {
            return Err(WorkflowError::InvalidTransition {
                from: before.status,
                to: RequestStatus::Paid,
            });
        }

        let entry = ApprovalHistory {
            approver_id: actor.id.clone(),
            approver_name: actor.full_name.clone(),
            status: RequestStatus::Paid,
            comments: None,
            approved_at: TimeStamp::new(),
        };

        let mut after = before.clone();
        after.apply_decision(entry);
        after.actual_payment_date = Some(after.updated_at.clone());

        match self.store.swap_request(&before, &after) {
            Ok(()) => Ok(after),
            Err(WorkflowError::Conflict) => {
                let current = self.store.load_request(request_id)?;
                Err(WorkflowError::InvalidTransition {
                    from: current.status,
                    to: RequestStatus::Paid,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Load a single request, gated by the view policy.
    pub fn get_request(
        &self,
        identity: &Identity,
        request_id: &str,
    ) -> Result<PaymentRequest, WorkflowError> {
        let request = self.store.load_request(request_id)?;
        if !policy::can_view(identity, &request) {
            return Err(WorkflowError::Unauthorized);
        }

        Ok(request)
    }

    /// Role-scoped listing: employees see their own requests, managers their
    /// own plus the ones currently routed to them, hr/admin everything. The
    /// optional status filter applies after scoping; newest first.
    pub fn list_requests(
        &self,
        identity: &Identity,
        status_filter: Option<RequestStatus>,
    ) -> Result<Vec<PaymentRequest>, WorkflowError> {
        let mut visible: Vec<PaymentRequest> = self
            .store
            .list_requests()?
            .into_iter()
            .filter(|request| match identity.role {
                Role::Employee => request.employee_id == identity.id,
                Role::Manager => {
                    request.employee_id == identity.id
                        || request.current_approver_id.as_deref() == Some(identity.id.as_str())
                }
                Role::Hr | Role::Admin => true,
            })
            .filter(|request| status_filter.is_none_or(|wanted| request.status == wanted))
            .collect();

        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(visible)
    }

    fn notify_best_effort(&self, event: NotificationEvent) {
        if let Err(err) = self.dispatcher.dispatch(&event) {
            tracing::warn!(recipient = event.recipient(), error = %err, "notification delivery failed");
        }
    }
}
