//! User identities and their workflow roles
use crate::error::WorkflowError;
use crate::request::TimeStamp;
use crate::utils;
use chrono::Utc;
use std::fmt;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Role {
    #[n(0)]
    Employee,
    #[n(1)]
    Manager,
    #[n(2)]
    Hr,
    #[n(3)]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Hr => "hr",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Result<Self, WorkflowError> {
        match s {
            "employee" => Ok(Self::Employee),
            "manager" => Ok(Self::Manager),
            "hr" => Ok(Self::Hr),
            "admin" => Ok(Self::Admin),
            other => Err(WorkflowError::UnknownRole(other.to_string())),
        }
    }

    /// Hr and admin see and decide everything; the self-approval ban still
    /// applies to them.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::Hr | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated actor. `manager_id` routes approvals only, it never
/// confers ownership of anything.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Identity {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub email: String,
    #[n(2)]
    pub full_name: String,
    #[n(3)]
    pub role: Role,
    #[n(4)]
    pub department: Option<String>,
    #[n(5)]
    pub manager_id: Option<String>,
    #[n(6)]
    pub is_active: bool,
    #[n(7)]
    pub created_at: TimeStamp<Utc>,
    #[n(8)]
    pub updated_at: TimeStamp<Utc>,
}

/// Registration input for a new identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub department: Option<String>,
    pub manager_id: Option<String>,
}

/// Profile patch; only the set fields are merged. Identities are never
/// deleted, deactivation goes through `is_active`.
#[derive(Debug, Clone, Default)]
pub struct IdentityUpdate {
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub manager_id: Option<String>,
    pub is_active: Option<bool>,
}

impl Identity {
    /// Mint a fresh identity from registration input.
    pub fn register(new: NewIdentity) -> Result<Self, WorkflowError> {
        let id = utils::mint_id(utils::IDENTITY_HRP)?;
        let now = TimeStamp::new();

        Ok(Self {
            id,
            email: new.email,
            full_name: new.full_name,
            role: new.role,
            department: new.department,
            manager_id: new.manager_id,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        })
    }
}

impl IdentityUpdate {
    pub fn apply(self, identity: &mut Identity) {
        if let Some(full_name) = self.full_name {
            identity.full_name = full_name;
        }
        if let Some(department) = self.department {
            identity.department = Some(department);
        }
        if let Some(manager_id) = self.manager_id {
            identity.manager_id = Some(manager_id);
        }
        if let Some(is_active) = self.is_active {
            identity.is_active = is_active;
        }
        identity.updated_at = TimeStamp::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_names_roundtrip() {
        for role in [Role::Employee, Role::Manager, Role::Hr, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }

        assert!(matches!(
            Role::parse("supervisor"),
            Err(WorkflowError::UnknownRole(_))
        ));
    }

    #[test]
    fn identity_encoding() {
        let original = Identity::register(NewIdentity {
            email: "jo@corp.test".into(),
            full_name: "Jo Bloggs".into(),
            role: Role::Manager,
            department: Some("Finance".into()),
            manager_id: None,
        })
        .unwrap();

        let encoding = minicbor::to_vec(&original).unwrap();
        let decode: Identity = minicbor::decode(&encoding).unwrap();

        assert_eq!(original, decode);
    }
}
