//! User roles.

use serde::{Deserialize, Serialize};

/// Role attached to a user account.
///
/// Authorization decisions are made by matching on this enum, never by
/// comparing raw strings. The admin surface of the API requires
/// [`UserRole::Admin`]; everything else is available to customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Regular shopper. Can manage their own cart, orders, addresses and reviews.
    #[default]
    Customer,
    /// Store operator. Additionally manages products, orders and users.
    Admin,
}

impl UserRole {
    /// Whether this role grants access to the admin surface.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "CUSTOMER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CUSTOMER" => Ok(Self::Customer),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(
            serde_json::to_string(&UserRole::Customer).expect("serialize"),
            "\"CUSTOMER\""
        );
        let role: UserRole = serde_json::from_str("\"ADMIN\"").expect("deserialize");
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<UserRole>().ok(), Some(UserRole::Admin));
        assert_eq!(
            "CUSTOMER".parse::<UserRole>().ok(),
            Some(UserRole::Customer)
        );
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Customer.is_admin());
    }
}
