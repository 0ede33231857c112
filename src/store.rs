//! Persistence boundary for identities and payment requests
//!
//! The service layer only ever talks to the two traits here; `SledStore` is
//! the embedded implementation, keeping documents as CBOR in two sled trees.
use crate::error::WorkflowError;
use crate::identity::Identity;
use crate::request::PaymentRequest;

pub trait RequestStore {
    fn load_request(&self, request_id: &str) -> Result<PaymentRequest, WorkflowError>;
    fn create_request(&self, request: &PaymentRequest) -> Result<(), WorkflowError>;
    /// Replace the stored document with `after`, but only if it still equals
    /// `before`. A concurrent modification surfaces as
    /// `WorkflowError::Conflict`.
    fn swap_request(
        &self,
        before: &PaymentRequest,
        after: &PaymentRequest,
    ) -> Result<(), WorkflowError>;
    fn list_requests(&self) -> Result<Vec<PaymentRequest>, WorkflowError>;
}

pub trait IdentityStore {
    fn load_identity(&self, identity_id: &str) -> Result<Identity, WorkflowError>;
    fn upsert_identity(&self, identity: &Identity) -> Result<(), WorkflowError>;
    fn identity_by_email(&self, email: &str) -> Result<Option<Identity>, WorkflowError>;
}

/// Embedded store over sled. Updates go through byte-level compare-and-swap,
/// which is what makes two racing decisions on one request impossible to
/// both commit.
#[derive(Clone)]
pub struct SledStore {
    requests: sled::Tree,
    identities: sled::Tree,
}

impl SledStore {
    pub fn new(db: &sled::Db) -> Result<Self, WorkflowError> {
        let requests = db.open_tree("requests")?;
        let identities = db.open_tree("identities")?;

        Ok(Self {
            requests,
            identities,
        })
    }
}

fn to_cbor<T: minicbor::Encode<()>>(value: &T) -> Result<Vec<u8>, WorkflowError> {
    minicbor::to_vec(value).map_err(|e| WorkflowError::Codec(e.to_string()))
}

impl RequestStore for SledStore {
    fn load_request(&self, request_id: &str) -> Result<PaymentRequest, WorkflowError> {
        match self.requests.get(request_id.as_bytes())? {
            Some(bytes) => Ok(minicbor::decode(&bytes)?),
            None => Err(WorkflowError::RequestNotFound(request_id.to_string())),
        }
    }

    fn create_request(&self, request: &PaymentRequest) -> Result<(), WorkflowError> {
        let bytes = to_cbor(request)?;

        self.requests
            .compare_and_swap(request.id.as_bytes(), None as Option<&[u8]>, Some(bytes))?
            .map_err(|_| WorkflowError::Conflict)
    }

    fn swap_request(
        &self,
        before: &PaymentRequest,
        after: &PaymentRequest,
    ) -> Result<(), WorkflowError> {
        let old = to_cbor(before)?;
        let new = to_cbor(after)?;

        self.requests
            .compare_and_swap(after.id.as_bytes(), Some(old), Some(new))?
            .map_err(|_| WorkflowError::Conflict)
    }

    fn list_requests(&self) -> Result<Vec<PaymentRequest>, WorkflowError> {
        let mut requests = Vec::new();
        for entry in self.requests.iter() {
            let (_, bytes) = entry?;
            requests.push(minicbor::decode(&bytes)?);
        }

        Ok(requests)
    }
}

impl IdentityStore for SledStore {
    fn load_identity(&self, identity_id: &str) -> Result<Identity, WorkflowError> {
        match self.identities.get(identity_id.as_bytes())? {
            Some(bytes) => Ok(minicbor::decode(&bytes)?),
            None => Err(WorkflowError::IdentityNotFound(identity_id.to_string())),
        }
    }

    fn upsert_identity(&self, identity: &Identity) -> Result<(), WorkflowError> {
        let bytes = to_cbor(identity)?;
        self.identities.insert(identity.id.as_bytes(), bytes)?;

        Ok(())
    }

    fn identity_by_email(&self, email: &str) -> Result<Option<Identity>, WorkflowError> {
        for entry in self.identities.iter() {
            let (_, bytes) = entry?;
            let identity: Identity = minicbor::decode(&bytes)?;
            if identity.email == email {
                return Ok(Some(identity));
            }
        }

        Ok(None)
    }
}
