//! Location and home operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{HomeLocation, Location};

/// Get a location by name.
pub async fn get_location(pool: &SqlitePool, name: &str) -> Result<Option<Location>> {
    let location = sqlx::query_as::<_, Location>(
        r#"
        SELECT name, latitude, longitude, country, country_code
        FROM locations
        WHERE name = ?
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(location)
}

/// Create a bare location with only a name.
pub async fn create_location(pool: &SqlitePool, name: &str) -> Result<Location> {
    sqlx::query(
        r#"
        INSERT INTO locations (name)
        VALUES (?)
        "#,
    )
    .bind(name)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Location",
                    id: name.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(Location::named(name))
}

/// Update the coordinates and country of an existing location.
pub async fn update_location(pool: &SqlitePool, location: &Location) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE locations
        SET latitude = ?, longitude = ?, country = ?, country_code = ?,
            updated_at = datetime('now')
        WHERE name = ?
        "#,
    )
    .bind(location.latitude)
    .bind(location.longitude)
    .bind(&location.country)
    .bind(&location.country_code)
    .bind(&location.name)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Location",
            id: location.name.clone(),
        });
    }

    Ok(())
}

/// Get the home of a user, if one is set.
pub async fn get_home(pool: &SqlitePool, user_id: i64) -> Result<Option<Location>> {
    let location = sqlx::query_as::<_, Location>(
        r#"
        SELECT l.name, l.latitude, l.longitude, l.country, l.country_code
        FROM user_locations ul
        JOIN locations l ON l.name = ul.location_name
        WHERE ul.user_id = ? AND ul.is_home = 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(location)
}

/// Make `location_name` the home of `user_id`.
///
/// Any previous home of the user is unmarked in the same transaction, so a
/// reader never sees the user with zero or two homes.
pub async fn set_home(pool: &SqlitePool, user_id: i64, location_name: &str) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE user_locations
        SET is_home = 0, updated_at = datetime('now')
        WHERE user_id = ? AND is_home = 1 AND location_name <> ?
        "#,
    )
    .bind(user_id)
    .bind(location_name)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO user_locations (location_name, user_id, is_home)
        VALUES (?, ?, 1)
        ON CONFLICT(location_name, user_id) DO UPDATE SET
            is_home = 1,
            updated_at = datetime('now')
        "#,
    )
    .bind(location_name)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::NotFound {
                    entity: "Location",
                    id: location_name.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    tx.commit().await?;

    tracing::info!(user_id, location = %location_name, "Home set");
    Ok(())
}

/// List every user's home.
pub async fn list_homes(pool: &SqlitePool) -> Result<Vec<HomeLocation>> {
    let homes = sqlx::query_as::<_, HomeLocation>(
        r#"
        SELECT ul.user_id, l.name, l.latitude, l.longitude, l.country, l.country_code
        FROM user_locations ul
        JOIN locations l ON l.name = ul.location_name
        WHERE ul.is_home = 1
        ORDER BY ul.user_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(homes)
}
