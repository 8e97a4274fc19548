//! Role gate: one table of per-operation access policies and the single
//! function that checks a caller against them.
//!
//! Every route is registered together with its [`Operation`]; the
//! [`enforce_policy`] layer runs before the handler and rejects callers the
//! policy does not admit.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::{
    error::AuthError,
    models::{Identity, UserType},
    repository::UserRepository,
};

/// Who may invoke an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Anyone, including anonymous callers
    Public,
    /// Any caller with a verified token
    Authenticated,
    /// Callers whose stored role is in the set
    Roles(&'static [UserType]),
}

impl Policy {
    /// Whether checking this policy needs the caller's stored role
    pub fn needs_role(&self) -> bool {
        matches!(self, Policy::Roles(roles) if !roles.is_empty())
    }
}

/// Every operation the API exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListHomes,
    GetHome,
    CreateHome,
    UpdateHome,
    DeleteHome,
    Signup,
    Signin,
    GenerateProductKey,
    CurrentUser,
}

const REALTOR_ONLY: &[UserType] = &[UserType::Realtor];

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::ListHomes,
        Operation::GetHome,
        Operation::CreateHome,
        Operation::UpdateHome,
        Operation::DeleteHome,
        Operation::Signup,
        Operation::Signin,
        Operation::GenerateProductKey,
        Operation::CurrentUser,
    ];

    pub fn policy(self) -> Policy {
        match self {
            Operation::ListHomes => Policy::Public,
            Operation::GetHome => Policy::Public,
            Operation::CreateHome => Policy::Roles(REALTOR_ONLY),
            Operation::UpdateHome => Policy::Roles(REALTOR_ONLY),
            Operation::DeleteHome => Policy::Roles(REALTOR_ONLY),
            Operation::Signup => Policy::Public,
            Operation::Signin => Policy::Public,
            Operation::GenerateProductKey => Policy::Public,
            Operation::CurrentUser => Policy::Authenticated,
        }
    }
}

/// Check a caller against a policy
///
/// `role` is the caller's stored role; it is only consulted for
/// [`Policy::Roles`] and is None when no identity was presented or the account
/// no longer exists.
pub fn authorize(policy: Policy, identity: Option<&Identity>, role: Option<UserType>) -> Result<(), AuthError> {
    match policy {
        Policy::Public => Ok(()),
        Policy::Roles(allowed) if allowed.is_empty() => Ok(()),
        Policy::Authenticated => identity.map(|_| ()).ok_or(AuthError::MissingToken),
        Policy::Roles(allowed) => {
            if identity.is_none() {
                return Err(AuthError::MissingToken);
            }
            match role {
                Some(role) if allowed.contains(&role) => Ok(()),
                actual => Err(AuthError::InsufficientPermissions { allowed, actual }),
            }
        }
    }
}

/// State for the per-route policy layer
#[derive(Clone)]
pub struct PolicyGate {
    operation: Operation,
    users: Arc<dyn UserRepository>,
}

impl PolicyGate {
    pub fn new(operation: Operation, users: Arc<dyn UserRepository>) -> Self {
        Self { operation, users }
    }
}

/// Middleware that enforces the operation's policy before the handler runs
///
/// Expects the identity (if any) to have been attached by
/// [`crate::auth::middleware::attach_identity`].
pub async fn enforce_policy(
    State(gate): State<PolicyGate>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let policy = gate.operation.policy();
    let identity = request.extensions().get::<Identity>().cloned();

    let role = match (&identity, policy.needs_role()) {
        (Some(identity), true) => gate
            .users
            .find_by_id(identity.id)
            .await?
            .map(|user| user.user_type),
        _ => None,
    };

    if let Err(err) = authorize(policy, identity.as_ref(), role) {
        warn!(
            "Denied {:?} on {}: user_id={:?}",
            gate.operation,
            request.uri().path(),
            identity.as_ref().map(|i| i.id)
        );
        return Err(err);
    }

    debug!("Allowed {:?} for user_id={:?}", gate.operation, identity.map(|i| i.id));
    Ok(next.run(request).await)
}
