use super::*;

/// Tests tracking a channel for the first time.
///
/// Expected: Ok with an active tracked channel
#[tokio::test]
async fn creates_new_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedChannel)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TrackedChannelRepository::new(db);
    let channel = repo
        .upsert(UpsertTrackedChannelParam {
            channel_id: 100,
            guild_id: 200,
            user_id: 300,
            notification_channel_id: 400,
        })
        .await?;

    assert_eq!(channel.channel_id, 100);
    assert_eq!(channel.guild_id, 200);
    assert_eq!(channel.user_id, 300);
    assert_eq!(channel.notification_channel_id, 400);
    assert!(!channel.is_inactive);

    Ok(())
}

/// Tests re-tracking an inactive channel.
///
/// Verifies that the owner and notification destination are replaced, the inactivity
/// flag is cleared, and no duplicate row is created.
///
/// Expected: Ok with one active row carrying the new owner
#[tokio::test]
async fn retracking_resets_inactivity() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedChannel)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    TrackedChannelFactory::new(db)
        .channel_id("100")
        .guild_id("200")
        .user_id("300")
        .notification_channel_id("400")
        .inactive(true)
        .build()
        .await?;

    let repo = TrackedChannelRepository::new(db);
    let channel = repo
        .upsert(UpsertTrackedChannelParam {
            channel_id: 100,
            guild_id: 200,
            user_id: 301,
            notification_channel_id: 401,
        })
        .await?;

    assert!(!channel.is_inactive);
    assert_eq!(channel.user_id, 301);
    assert_eq!(channel.notification_channel_id, 401);

    let count = entity::prelude::TrackedChannel::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}
