//! Upper bound for external calls.

use std::future::Future;
use std::time::Duration;

use crate::error::{BotError, Result};

/// Await `call`, failing with [`BotError::Timeout`] once `limit` elapses.
pub(crate) async fn with_deadline<T, E, F>(
    limit: Duration,
    operation: &'static str,
    call: F,
) -> Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    BotError: From<E>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(BotError::from),
        Err(_) => Err(BotError::Timeout { operation, limit }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather::WeatherError;

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapses() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, WeatherError>(1)
        };

        let result = with_deadline(Duration::from_secs(5), "forecast", slow).await;
        assert!(matches!(
            result,
            Err(BotError::Timeout { operation: "forecast", .. })
        ));
    }

    #[tokio::test]
    async fn test_deadline_passes_errors_through() {
        let failing = async { Err::<u8, _>(WeatherError::NotFound("x".to_string())) };
        let result = with_deadline(Duration::from_secs(5), "geocode", failing).await;
        assert!(matches!(result, Err(BotError::Weather(WeatherError::NotFound(_)))));
    }
}
