use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::http::Http;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, service::channel_tracker::ChannelTrackerService};

/// Every 30 minutes, on the minute.
const SCHEDULE: &str = "0 */30 * * * *";

/// Starts the channel inactivity scheduler
///
/// Each run checks every tracked channel and posts an alert when a channel goes
/// quiet or comes back.
///
/// # Arguments
/// - `db`: Database connection holding the tracked channels
/// - `discord_http`: Discord HTTP client for fetching channels and posting alerts
/// - `threshold_minutes`: Minutes without messages before a channel counts as inactive
pub async fn start_scheduler(
    db: DatabaseConnection,
    discord_http: Arc<Http>,
    threshold_minutes: i64,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(SCHEDULE, move |_uuid, _lock| {
        let db = db.clone();
        let http = discord_http.clone();

        Box::pin(async move {
            let service = ChannelTrackerService::new(&db, http, threshold_minutes);
            if let Err(e) = service.check_all().await {
                tracing::error!("Error checking tracked channel activity: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Channel activity scheduler started");

    Ok(scheduler)
}
