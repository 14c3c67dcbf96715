use super::*;

/// Tests flipping the inactivity flag back and forth.
///
/// Expected: Ok with the stored flag following each call
#[tokio::test]
async fn updates_flag() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedChannel)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    TrackedChannelFactory::new(db).channel_id("10").build().await?;

    let repo = TrackedChannelRepository::new(db);

    repo.set_inactive(10, true).await?;
    assert!(repo.find_by_channel_id(10).await?.unwrap().is_inactive);

    repo.set_inactive(10, false).await?;
    assert!(!repo.find_by_channel_id(10).await?.unwrap().is_inactive);

    Ok(())
}

/// Tests updating a channel that is not tracked.
///
/// Expected: Ok with nothing created
#[tokio::test]
async fn ignores_unknown_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedChannel)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = TrackedChannelRepository::new(db);
    repo.set_inactive(999, true).await?;

    assert!(repo.find_by_channel_id(999).await?.is_none());

    Ok(())
}
