use async_graphql::{Context, Enum, ErrorExtensions, Result};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::AppError;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub enum Role {
    Admin,
    Vendor,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Vendor => "vendor",
            Role::User => "user",
        }
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        match role {
            "admin" => Role::Admin,
            "vendor" => Role::Vendor,
            _ => Role::User, // Unknown roles get the least privilege
        }
    }
}

/// The authenticated caller, as seen by the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid subject in token".to_string()))?;
        Ok(Self::new(user_id, Role::from(claims.role.as_str())))
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Resolve the caller from the claims the JWT middleware put into the context.
pub fn require_actor(ctx: &Context<'_>) -> Result<Actor> {
    let claims = ctx.data::<Claims>().map_err(|_| {
        AppError::Unauthorized("You must be logged in to perform this action".to_string())
            .extend()
    })?;

    Actor::from_claims(claims).map_err(|e| e.extend())
}

/// Like [`require_actor`], additionally checking the role carried by the token.
pub fn require_role(ctx: &Context<'_>, required_role: Role) -> Result<Actor> {
    let actor = require_actor(ctx)?;

    if !has_required_role(actor.role, required_role) {
        return Err(AppError::Forbidden(format!(
            "Access denied: {:?} privileges required. Your current role is {:?}",
            required_role, actor.role
        ))
        .extend());
    }

    Ok(actor)
}

fn has_required_role(user_role: Role, required_role: Role) -> bool {
    match required_role {
        Role::Admin => user_role == Role::Admin,
        Role::Vendor => user_role == Role::Vendor || user_role == Role::Admin,
        Role::User => true,
    }
}
