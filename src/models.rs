use {
    serde::{
        Deserialize,
        Serialize,
    },
    uuid::Uuid,
};

pub type UserId = Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Vendor,
    Admin,
}

/// An already-authenticated caller. The transport layer resolves identity
/// and role before dispatching into any workflow; the engine only performs
/// ownership and role checks on top of this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id:   UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
