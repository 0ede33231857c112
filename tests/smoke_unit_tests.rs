//! Smoke screen unit tests for the payroll approval components
//!
//! These are unit tests that span the codebase, testing behavior in
//! isolation from integration scenarios. They are intended as smoke-screen
//! and generally test the happy path plus the documented denials.

use payroll_approval::draft::{ContentPatch, RequestDraft};
use payroll_approval::error::WorkflowError;
use payroll_approval::identity::{Identity, Role};
use payroll_approval::policy;
use payroll_approval::request::{PaymentRequest, RequestStatus, RequestType, TimeStamp};
use payroll_approval::utils::mint_id;
use rust_decimal::Decimal;

fn identity(id: &str, role: Role, manager_id: Option<&str>) -> Identity {
    Identity {
        id: id.to_string(),
        email: format!("{id}@corp.test"),
        full_name: id.to_string(),
        role,
        department: None,
        manager_id: manager_id.map(str::to_string),
        is_active: true,
        created_at: TimeStamp::new(),
        updated_at: TimeStamp::new(),
    }
}

fn pending_request(owner: &Identity, approver: Option<&str>) -> PaymentRequest {
    PaymentRequest {
        id: "req_1test".to_string(),
        employee_id: owner.id.clone(),
        employee_name: owner.full_name.clone(),
        employee_email: owner.email.clone(),
        request_type: RequestType::Overtime,
        amount: Decimal::new(50000, 2),
        description: "overtime for the release".to_string(),
        supporting_documents: vec![],
        status: RequestStatus::Pending,
        approval_history: vec![],
        current_approver_id: approver.map(str::to_string),
        rejection_reason: None,
        requested_payment_date: None,
        actual_payment_date: None,
        created_at: TimeStamp::new(),
        updated_at: TimeStamp::new(),
    }
}

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// Minted ids carry the human-readable prefix
    #[test]
    fn generates_ids_with_hrp() {
        let id = mint_id("req_").unwrap();
        assert!(id.starts_with("req_1"));
        assert!(id.len() > 10);
    }

    /// Empty prefix should fail
    #[test]
    fn handles_empty_hrp() {
        assert!(mint_id("").is_err());
    }

    /// Multiple calls generate unique identifiers
    #[test]
    fn generates_unique_ids() {
        let id1 = mint_id("emp_").unwrap();
        let id2 = mint_id("emp_").unwrap();

        assert_ne!(id1, id2);
    }
}

// STATE MACHINE TESTS
#[cfg(test)]
mod status_tests {
    use super::*;

    #[test]
    fn terminal_and_decidable_partition_the_states() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::ApprovedL1,
            RequestStatus::ApprovedL2,
            RequestStatus::ApprovedFinal,
            RequestStatus::Rejected,
            RequestStatus::Paid,
        ] {
            assert_ne!(status.is_terminal(), status.is_decidable());
        }
    }

    #[test]
    fn decidable_states_accept_rejection_and_final_approval() {
        for from in [
            RequestStatus::Pending,
            RequestStatus::ApprovedL1,
            RequestStatus::ApprovedL2,
        ] {
            assert!(from.allows_transition_to(RequestStatus::Rejected));
            assert!(from.allows_transition_to(RequestStatus::ApprovedFinal));
            // paid is never a decision target, nor is going back to pending
            assert!(!from.allows_transition_to(RequestStatus::Paid));
            assert!(!from.allows_transition_to(RequestStatus::Pending));
        }
    }

    #[test]
    fn tiers_advance_one_step_at_a_time() {
        assert!(RequestStatus::Pending.allows_transition_to(RequestStatus::ApprovedL1));
        assert!(!RequestStatus::Pending.allows_transition_to(RequestStatus::ApprovedL2));

        assert!(RequestStatus::ApprovedL1.allows_transition_to(RequestStatus::ApprovedL2));
        assert!(!RequestStatus::ApprovedL1.allows_transition_to(RequestStatus::ApprovedL1));

        assert!(!RequestStatus::ApprovedL2.allows_transition_to(RequestStatus::ApprovedL1));
    }

    #[test]
    fn terminal_states_allow_nothing() {
        for from in [
            RequestStatus::ApprovedFinal,
            RequestStatus::Rejected,
            RequestStatus::Paid,
        ] {
            for to in [
                RequestStatus::Pending,
                RequestStatus::ApprovedL1,
                RequestStatus::ApprovedL2,
                RequestStatus::ApprovedFinal,
                RequestStatus::Rejected,
                RequestStatus::Paid,
            ] {
                assert!(!from.allows_transition_to(to));
            }
        }
    }

    #[test]
    fn request_type_wire_names_roundtrip() {
        for request_type in [
            RequestType::Overtime,
            RequestType::Bonus,
            RequestType::Reimbursement,
            RequestType::SalaryAdvance,
            RequestType::Commission,
        ] {
            assert_eq!(
                RequestType::parse(request_type.as_str()).unwrap(),
                request_type
            );
        }

        assert!(matches!(
            RequestType::parse("expenses"),
            Err(WorkflowError::UnknownRequestType(_))
        ));
    }
}

// AUTHORIZATION POLICY TESTS
#[cfg(test)]
mod policy_tests {
    use super::*;

    #[test]
    fn owner_approver_and_elevated_can_view() {
        let manager = identity("maria", Role::Manager, None);
        let owner = identity("evan", Role::Employee, Some("maria"));
        let outsider = identity("drew", Role::Employee, None);
        let hr = identity("hana", Role::Hr, None);
        let admin = identity("ada", Role::Admin, None);

        let request = pending_request(&owner, Some("maria"));

        assert!(policy::can_view(&owner, &request));
        assert!(policy::can_view(&manager, &request));
        assert!(policy::can_view(&hr, &request));
        assert!(policy::can_view(&admin, &request));
        assert!(!policy::can_view(&outsider, &request));
    }

    #[test]
    fn managers_view_their_own_submissions_without_being_approver() {
        let manager = identity("maria", Role::Manager, None);
        let own_request = pending_request(&manager, None);

        assert!(policy::can_view(&manager, &own_request));
    }

    #[test]
    fn only_elevated_roles_list_all() {
        assert!(!policy::can_list_all(&identity("evan", Role::Employee, None)));
        assert!(!policy::can_list_all(&identity("maria", Role::Manager, None)));
        assert!(policy::can_list_all(&identity("hana", Role::Hr, None)));
        assert!(policy::can_list_all(&identity("ada", Role::Admin, None)));
    }

    #[test]
    fn approval_requires_assignment_or_elevation() {
        let manager = identity("maria", Role::Manager, None);
        let other_manager = identity("mike", Role::Manager, None);
        let owner = identity("evan", Role::Employee, Some("maria"));
        let hr = identity("hana", Role::Hr, None);

        let request = pending_request(&owner, Some("maria"));

        assert!(policy::can_approve(&manager, &request));
        assert!(policy::can_approve(&hr, &request));
        assert!(!policy::can_approve(&other_manager, &request));
        // unconditional self-approval ban
        assert!(!policy::can_approve(&owner, &request));
    }

    #[test]
    fn no_approval_on_terminal_requests() {
        let manager = identity("maria", Role::Manager, None);
        let owner = identity("evan", Role::Employee, Some("maria"));

        let mut request = pending_request(&owner, Some("maria"));
        request.status = RequestStatus::Rejected;
        request.current_approver_id = None;

        assert!(!policy::can_approve(&manager, &request));
    }

    #[test]
    fn self_approval_banned_for_elevated_owner() {
        let hr_owner = identity("hana", Role::Hr, None);
        let request = pending_request(&hr_owner, None);

        assert!(!policy::can_approve(&hr_owner, &request));
    }

    #[test]
    fn content_edits_are_owner_and_pending_only() {
        let owner = identity("evan", Role::Employee, Some("maria"));
        let manager = identity("maria", Role::Manager, None);

        let request = pending_request(&owner, Some("maria"));
        assert!(policy::can_edit_content(&owner, &request));
        assert!(!policy::can_edit_content(&manager, &request));

        let mut decided = request.clone();
        decided.status = RequestStatus::ApprovedL1;
        assert!(!policy::can_edit_content(&owner, &decided));
    }
}

// DRAFT AND PATCH TESTS
#[cfg(test)]
mod draft_tests {
    use super::*;

    #[test]
    fn finalised_draft_starts_pending_with_the_manager_routed() {
        let employee = identity("evan", Role::Employee, Some("maria"));

        let request = RequestDraft::new()
            .set_request_type(RequestType::Reimbursement)
            .set_amount(Decimal::new(12550, 2))
            .set_description("client lunch")
            .add_supporting_document("receipts/lunch.pdf")
            .validate_and_finalise(&employee)
            .unwrap();

        assert!(request.id.starts_with("req_1"));
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.current_approver_id.as_deref(), Some("maria"));
        assert!(request.approval_history.is_empty());
        assert_eq!(request.supporting_documents.len(), 1);
        assert_eq!(request.employee_email, employee.email);
    }

    #[test]
    fn draft_without_type_is_refused() {
        let employee = identity("evan", Role::Employee, None);

        let err = RequestDraft::new()
            .set_amount(Decimal::ONE)
            .set_description("mystery payment")
            .validate_and_finalise(&employee)
            .unwrap_err();

        assert!(matches!(err, WorkflowError::MissingRequestType));
    }

    #[test]
    fn non_positive_amounts_are_refused() {
        let employee = identity("evan", Role::Employee, None);

        for amount in [Decimal::ZERO, Decimal::new(-100, 2)] {
            let err = RequestDraft::new()
                .set_request_type(RequestType::Bonus)
                .set_amount(amount)
                .set_description("bonus")
                .validate_and_finalise(&employee)
                .unwrap_err();

            assert!(matches!(err, WorkflowError::NonPositiveAmount));
        }
    }

    #[test]
    fn blank_description_is_refused() {
        let employee = identity("evan", Role::Employee, None);

        let err = RequestDraft::new()
            .set_request_type(RequestType::Bonus)
            .set_amount(Decimal::ONE)
            .set_description("   ")
            .validate_and_finalise(&employee)
            .unwrap_err();

        assert!(matches!(err, WorkflowError::EmptyDescription));
    }

    #[test]
    fn patch_merges_only_set_fields() {
        let owner = identity("evan", Role::Employee, Some("maria"));
        let mut request = pending_request(&owner, Some("maria"));
        let original_description = request.description.clone();

        ContentPatch {
            amount: Some(Decimal::new(7500, 2)),
            ..ContentPatch::default()
        }
        .apply(&mut request)
        .unwrap();

        assert_eq!(request.amount, Decimal::new(7500, 2));
        assert_eq!(request.description, original_description);
    }

    #[test]
    fn failed_patch_leaves_the_request_untouched() {
        let owner = identity("evan", Role::Employee, Some("maria"));
        let mut request = pending_request(&owner, Some("maria"));
        let snapshot = request.clone();

        let err = ContentPatch {
            amount: Some(Decimal::new(7500, 2)),
            description: Some(String::new()),
            ..ContentPatch::default()
        }
        .apply(&mut request)
        .unwrap_err();

        assert!(matches!(err, WorkflowError::EmptyDescription));
        assert_eq!(request, snapshot);
    }
}
