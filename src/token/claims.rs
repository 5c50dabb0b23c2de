use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::users::Role;

/// Signed token payload.
///
/// Field order is the wire order: the claims segment of a token is the
/// compact JSON serialization of this struct, so `sub`, `userId`, `roles`,
/// `iat`, `exp` must stay in this order for tokens to be reproducible
/// byte-for-byte. Roles are a `BTreeSet` so the array is emitted in a fixed
/// iteration order. Timestamps are epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub roles: BTreeSet<Role>,
    pub iat: i64,
    pub exp: i64,
}
