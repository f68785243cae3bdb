//! Address domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use rosewood_core::{AddressId, UserId};

/// A shipping address belonging to a user.
///
/// At most one address per user carries `is_default`; repositories clear the
/// flag on siblings whenever a default is written.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub full_name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}
