use super::*;

/// Tests untracking a tracked channel.
///
/// Expected: Ok(true) and the row is gone
#[tokio::test]
async fn deletes_existing_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedChannel)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    TrackedChannelFactory::new(db).channel_id("10").build().await?;

    let repo = TrackedChannelRepository::new(db);

    assert!(repo.delete(10).await?);
    assert!(repo.find_by_channel_id(10).await?.is_none());

    Ok(())
}

/// Tests untracking a channel that was never tracked.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_unknown_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedChannel)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TrackedChannelRepository::new(db);

    assert!(!repo.delete(10).await?);

    Ok(())
}
