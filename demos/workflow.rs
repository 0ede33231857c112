//! End-to-end walk through the approval workflow against a throwaway sled db.
//!
//! Run with `cargo run --example workflow`.

use payroll_approval::draft::RequestDraft;
use payroll_approval::identity::{NewIdentity, Role};
use payroll_approval::notify::LogDispatcher;
use payroll_approval::request::{RequestStatus, RequestType};
use payroll_approval::service::{ApprovalService, Decision};
use payroll_approval::store::SledStore;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let db = sled::Config::new().temporary(true).open()?;
    let service = ApprovalService::new(SledStore::new(&db)?, LogDispatcher);

    let manager = service.register_identity(NewIdentity {
        email: "maria@corp.test".into(),
        full_name: "Maria Vale".into(),
        role: Role::Manager,
        department: Some("Engineering".into()),
        manager_id: None,
    })?;
    let employee = service.register_identity(NewIdentity {
        email: "evan@corp.test".into(),
        full_name: "Evan Hart".into(),
        role: Role::Employee,
        department: Some("Engineering".into()),
        manager_id: Some(manager.id.clone()),
    })?;
    let hr = service.register_identity(NewIdentity {
        email: "hana@corp.test".into(),
        full_name: "Hana Sato".into(),
        role: Role::Hr,
        department: Some("People".into()),
        manager_id: None,
    })?;

    let draft = RequestDraft::new()
        .set_request_type(RequestType::Reimbursement)
        .set_amount("125.50".parse()?)
        .set_description("client lunch")
        .add_supporting_document("receipts/lunch-0412.pdf");

    let request = service.submit(&employee, draft)?;
    println!("submitted: {} ({})", request.id, request.status);

    let request = service.decide(
        &manager,
        &request.id,
        Decision {
            status: RequestStatus::ApprovedFinal,
            comments: Some("ok".into()),
        },
    )?;
    println!("decided:   {} ({})", request.id, request.status);

    let request = service.mark_paid(&hr, &request.id)?;
    println!("paid:      {} ({})", request.id, request.status);

    for entry in &request.approval_history {
        println!(
            "  history: {} -> {} by {}",
            entry.approver_id, entry.status, entry.approver_name
        );
    }

    Ok(())
}
