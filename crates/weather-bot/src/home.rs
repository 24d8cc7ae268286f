//! Set-Home procedure.

use std::time::Duration;

use database::{DatabaseError, Location};
use tracing::{debug, info};
use weather::PlaceResolver;

use crate::deadline::with_deadline;
use crate::error::Result;
use crate::store::HomeStore;

/// Save `name` as the home of `user_id` and return the stored location.
///
/// Known places are reused; a place is only geocoded while it still lacks
/// coordinates. A bare record created here stays behind when geocoding
/// fails, and the next attempt retries the hydration.
pub async fn set_home(
    homes: &dyn HomeStore,
    places: &dyn PlaceResolver,
    user_id: i64,
    name: &str,
    timeout: Duration,
) -> Result<Location> {
    let name = name.trim();

    let mut location = match homes.get_location(name).await? {
        Some(location) => location,
        None => match homes.create_location(name).await {
            Ok(location) => location,
            // Lost a race with another request creating the same place.
            Err(DatabaseError::AlreadyExists { .. }) => homes
                .get_location(name)
                .await?
                .unwrap_or_else(|| Location::named(name)),
            Err(e) => return Err(e.into()),
        },
    };

    if location.needs_hydration() {
        debug!(location = %location.name, "Geocoding home");
        let place = with_deadline(timeout, "geocode", places.geocode(name)).await?;
        location.latitude = Some(place.latitude);
        location.longitude = Some(place.longitude);
        location.country = Some(place.country);
        location.country_code = Some(place.country_code);
        homes.update_location(&location).await?;
    }

    homes.set_home(user_id, &location).await?;
    info!(user_id, location = %location.name, "Home saved");

    Ok(location)
}
