//! Payroll request approval workflow core.
//!
//! Employees submit payment requests, managers and hr/admin decide on them
//! through a role-gated chain. The state machine and authorization policy
//! live here; transport, mail delivery and paycheck rendering sit behind the
//! boundaries in [`store`] and [`notify`].

pub mod draft;
pub mod error;
pub mod identity;
pub mod notify;
pub mod policy;
pub mod request;
pub mod service;
pub mod store;
pub mod utils;
