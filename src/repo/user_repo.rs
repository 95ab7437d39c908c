use crate::db::DbPool;
use crate::models::{Role, User};
use crate::schema::users;
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Creates a new user in the database
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `username` - The unique login name
/// * `password_hash` - The already-hashed password
/// * `role` - The role of the new user
///
/// ### Returns
///
/// A Result containing the newly created User if successful
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The username is already taken (unique constraint)
/// - The database insert operation fails
#[instrument(skip(pool, password_hash), fields(username = %username, role = %role))]
pub fn create_user(pool: &DbPool, username: String, password_hash: String, role: Role) -> Result<User> {
    debug!("Creating new user");

    let conn = &mut pool.get()?;

    let new_user = User::new(username, password_hash, role);

    diesel::insert_into(users::table)
        .values(&new_user)
        .execute(conn)?;

    info!("Successfully created user with id: {}", new_user.get_id());

    Ok(new_user)
}

/// Retrieves a user by ID
///
/// ### Returns
///
/// A Result containing an Option with the User if found
#[instrument(skip(pool))]
pub fn get_user(pool: &DbPool, user_id: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .find(user_id)
        .select(User::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a user by their login name
///
/// ### Returns
///
/// A Result containing an Option with the User if found
#[instrument(skip(pool))]
pub fn get_user_by_username(pool: &DbPool, username: &str) -> Result<Option<User>> {
    debug!("Looking up user by username");

    let conn = &mut pool.get()?;

    let result = users::table
        .filter(users::username.eq(username))
        .select(User::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}
