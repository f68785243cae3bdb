//! Admin user management commands.

use tracing::info;

use rosewood_api::db::users::{NewUser, UserRepository};
use rosewood_api::services::auth;
use rosewood_core::{Email, UserRole};

/// Create an admin user (with their cart, like any registration).
///
/// # Errors
///
/// Returns an error if the email is invalid or already taken, or the
/// database is unreachable.
pub async fn create_user(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;
    let password_hash = auth::hash_password(password)?;

    let pool = super::connect().await?;

    let user = UserRepository::new(&pool)
        .create(NewUser {
            email: &email,
            password_hash: &password_hash,
            first_name,
            last_name,
            phone: None,
            role: UserRole::Admin,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "Admin user created");

    Ok(())
}
