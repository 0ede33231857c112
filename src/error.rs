use crate::request::RequestStatus;

#[derive(thiserror::Error, Debug)]
pub enum WorkflowError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("request type is not set")]
    MissingRequestType,
    #[error("unknown request type: {0}")]
    UnknownRequestType(String),
    #[error("unknown request status: {0}")]
    UnknownStatus(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("an identity with email {0} already exists")]
    DuplicateEmail(String),
    #[error("not enough permissions for this action")]
    Unauthorized,
    #[error("approving your own request is forbidden")]
    SelfApproval,
    #[error("request cannot move from {from} to {to}")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },
    #[error("request not found: {0}")]
    RequestNotFound(String),
    #[error("identity not found: {0}")]
    IdentityNotFound(String),
    #[error("request was modified concurrently")]
    Conflict,
    #[error("storage failure")]
    Store(#[from] sled::Error),
    #[error("codec failure: {0}")]
    Codec(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<minicbor::decode::Error> for WorkflowError {
    fn from(err: minicbor::decode::Error) -> Self {
        Self::Codec(err.to_string())
    }
}
