//! Actors performing operations. Identity lives outside the ledger; callers
//! pass the acting user explicitly into every operation.
use crate::utils;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    #[n(0)]
    Admin,
    #[n(1)]
    Artist,
    #[n(2)]
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String, // bech32 encoded, `user_` prefix
    pub username: String,
    pub role: Role,
}

/// Copy of an actor's identity frozen at the moment a record was written.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct IdentitySnapshot {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub username: String,
    #[n(2)]
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            role,
        }
    }
    /// Mint an actor with a fresh `user_` identifier.
    pub fn register(username: impl Into<String>, role: Role) -> anyhow::Result<Self> {
        let id = utils::new_uuid_to_bech32(utils::USER_HRP)?;
        Ok(Self::new(id, username, role))
    }
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
    /// The artist who owns a record, or any administrator.
    pub fn can_manage(&self, artist_id: &str) -> bool {
        self.is_admin() || self.id == artist_id
    }
    pub fn snapshot(&self) -> IdentitySnapshot {
        IdentitySnapshot {
            id: self.id.clone(),
            username: self.username.clone(),
            role: self.role,
        }
    }
}
