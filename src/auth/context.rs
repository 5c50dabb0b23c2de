use std::collections::BTreeSet;

use crate::token::claims::Claims;
use crate::users::Role;

/// The authenticated principal for one request.
///
/// Built only from verified token claims, installed into the request's
/// extensions by the authentication middleware, and read back by extractors
/// and authorization checks downstream. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    user_id: i64,
    email: String,
    roles: BTreeSet<Role>,
}

impl AuthContext {
    pub fn new(user_id: i64, email: String, roles: BTreeSet<Role>) -> Self {
        Self {
            user_id,
            email,
            roles,
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.sub,
            roles: claims.roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(roles: &[Role]) -> AuthContext {
        AuthContext::new(
            1,
            "test@example.com".into(),
            roles.iter().copied().collect(),
        )
    }

    #[test]
    fn has_role_checks_membership() {
        let user = context(&[Role::User]);
        assert!(user.has_role(Role::User));
        assert!(!user.has_role(Role::Admin));

        let admin = context(&[Role::User, Role::Admin]);
        assert!(admin.has_role(Role::Admin));
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(context(&[Role::User]), context(&[Role::User]));
        assert_ne!(context(&[Role::User]), context(&[Role::Admin]));
    }

    #[test]
    fn built_from_claims() {
        let claims = Claims {
            sub: "test@example.com".into(),
            user_id: 1,
            roles: BTreeSet::from([Role::User]),
            iat: 946_720_800,
            exp: 946_721_400,
        };

        assert_eq!(AuthContext::from(claims), context(&[Role::User]));
    }
}
