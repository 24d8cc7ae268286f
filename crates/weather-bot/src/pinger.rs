//! Background alert job.
//!
//! Once a day, at a configured local hour, the pinger walks every saved
//! home, runs the alert evaluator over its hourly forecast and pushes a
//! message when something fired. Homes are processed one at a time; a
//! failing home is logged and skipped.
//!
//! Cancellation goes through a `watch::Receiver<bool>`: the loop stops when
//! the value turns `true`. It is checked between ticks, before each home and
//! while a forecast fetch is in flight. A message that is already being
//! sent is allowed to finish.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use database::HomeLocation;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};
use weather::ForecastSource;

use crate::alerts::{compose_message, evaluate, AlertConfig};
use crate::deadline::with_deadline;
use crate::error::Result;
use crate::router::ReportKind;
use crate::sender::{MessageSender, QuickReply};
use crate::store::HomeStore;

/// Default local hour for the daily pass.
pub const DEFAULT_PINGER_HOUR: u32 = 8;

/// Default time between schedule checks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Schedule and limits for the pinger.
#[derive(Debug, Clone, PartialEq)]
pub struct PingerConfig {
    /// Local hour (0-23) at which the daily pass runs.
    pub hour: u32,
    /// How often the loop wakes up to check the schedule.
    pub check_interval: Duration,
    /// Upper bound for each store, forecast and send call.
    pub call_timeout: Duration,
    /// Time zone of the bot's local time.
    pub zone: Tz,
}

impl Default for PingerConfig {
    fn default() -> Self {
        Self {
            hour: DEFAULT_PINGER_HOUR,
            check_interval: DEFAULT_CHECK_INTERVAL,
            call_timeout: weather::config::DEFAULT_TIMEOUT,
            zone: Tz::UTC,
        }
    }
}

/// Outcome of one pass over the saved homes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PingReport {
    /// Homes found in the store.
    pub homes: usize,
    /// Messages delivered.
    pub sent: usize,
    /// Homes with nothing to report or without coordinates.
    pub skipped: usize,
    /// Homes whose fetch or send failed.
    pub failed: usize,
    /// Whether the pass stopped early on shutdown.
    pub cancelled: bool,
}

enum Outcome {
    Sent,
    Quiet,
    Cancelled,
}

/// Background job pushing weather alerts for saved homes.
pub struct Pinger<S: MessageSender> {
    homes: Arc<dyn HomeStore>,
    forecasts: Arc<dyn ForecastSource>,
    sender: S,
    alerts: AlertConfig,
    config: PingerConfig,
}

impl<S: MessageSender> Pinger<S> {
    pub fn new(
        homes: Arc<dyn HomeStore>,
        forecasts: Arc<dyn ForecastSource>,
        sender: S,
        alerts: AlertConfig,
        config: PingerConfig,
    ) -> Self {
        Self {
            homes,
            forecasts,
            sender,
            alerts,
            config,
        }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Whether a pass should run at `now`, given the local date of the last
    /// pass.
    pub fn is_due(&self, now: DateTime<Utc>, last_run: Option<NaiveDate>) -> bool {
        let local = now.with_timezone(&self.config.zone);
        local.hour() == self.config.hour && last_run != Some(local.date_naive())
    }

    /// Run a single pass right now, without a shutdown signal.
    pub async fn run_once(&self) -> PingReport {
        let (_shutdown_tx, mut shutdown) = watch::channel(false);
        self.run_pass(Utc::now(), &mut shutdown).await
    }

    /// Run one pass as if the current time were `now`.
    #[instrument(skip(self, shutdown))]
    pub async fn run_pass(
        &self,
        now: DateTime<Utc>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> PingReport {
        let local_now = now.with_timezone(&self.config.zone);
        let mut report = PingReport::default();

        let homes = match with_deadline(
            self.config.call_timeout,
            "list homes",
            self.homes.list_homes(),
        )
        .await
        {
            Ok(homes) => homes,
            Err(e) => {
                error!(error = %e, "Failed to list homes");
                return report;
            }
        };
        report.homes = homes.len();
        debug!(homes = homes.len(), "Checking homes");

        for home in &homes {
            if *shutdown.borrow() {
                report.cancelled = true;
                break;
            }

            match self.ping_home(home, &local_now, shutdown).await {
                Ok(Outcome::Sent) => report.sent += 1,
                Ok(Outcome::Quiet) => report.skipped += 1,
                Ok(Outcome::Cancelled) => {
                    report.cancelled = true;
                    break;
                }
                Err(e) => {
                    warn!(
                        user_id = home.user_id,
                        home = %home.location.name,
                        error = %e,
                        "Skipping home"
                    );
                    report.failed += 1;
                }
            }
        }

        if report.cancelled {
            info!(sent = report.sent, "Pinger pass cancelled");
        }
        report
    }

    #[instrument(
        skip(self, home, now, shutdown),
        fields(user_id = home.user_id, home = %home.location.name)
    )]
    async fn ping_home(
        &self,
        home: &HomeLocation,
        now: &DateTime<Tz>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<Outcome> {
        let Some((latitude, longitude)) = home.location.coordinates() else {
            debug!("Home has no coordinates yet");
            return Ok(Outcome::Quiet);
        };

        let fetch = with_deadline(
            self.config.call_timeout,
            "hourly forecast",
            self.forecasts.hourly_forecast(latitude, longitude),
        );
        let forecasts = tokio::select! {
            biased;

            () = cancelled(shutdown) => return Ok(Outcome::Cancelled),
            result = fetch => result?,
        };

        let alerts = evaluate(&forecasts, now, &self.alerts);
        let Some(message) = compose_message(&alerts, now) else {
            debug!("Nothing to report");
            return Ok(Outcome::Quiet);
        };

        let replies = quick_replies(latitude, longitude);
        with_deadline(
            self.config.call_timeout,
            "send message",
            self.sender.send_message(home.user_id, &message, &replies),
        )
        .await?;

        info!("Alert sent");
        Ok(Outcome::Sent)
    }

    /// Run until `shutdown` turns `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            hour = self.config.hour,
            interval = ?self.config.check_interval,
            "Starting pinger"
        );

        let mut ticker = tokio::time::interval(self.config.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_run: Option<NaiveDate> = None;

        loop {
            tokio::select! {
                biased;

                () = cancelled(&mut shutdown) => {
                    info!("Shutdown signal received, stopping pinger");
                    return;
                }
                _ = ticker.tick() => {}
            }

            let now = Utc::now();
            if !self.is_due(now, last_run) {
                continue;
            }
            last_run = Some(now.with_timezone(&self.config.zone).date_naive());

            let report = self.run_pass(now, &mut shutdown).await;
            info!(
                homes = report.homes,
                sent = report.sent,
                skipped = report.skipped,
                failed = report.failed,
                "Pinger pass finished"
            );
            if report.cancelled {
                return;
            }
        }
    }
}

/// Buttons attached to an alert.
pub fn quick_replies(latitude: f64, longitude: f64) -> Vec<QuickReply> {
    vec![
        QuickReply::new(
            "⏰ Check hourly forecast",
            ReportKind::Hourly.callback_data(latitude, longitude),
        ),
        QuickReply::new(
            "📆 Check daily forecast",
            ReportKind::Daily.callback_data(latitude, longitude),
        ),
    ]
}

/// Resolves once shutdown is requested. Never resolves if the sender is
/// gone without requesting it.
async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    let closed = shutdown.wait_for(|stop| *stop).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}
