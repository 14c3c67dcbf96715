use super::*;

/// Tests listing tracked channels.
///
/// Expected: Ok with every tracked channel parsed to numeric ids
#[tokio::test]
async fn returns_all_channels() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedChannel)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    TrackedChannelFactory::new(db).channel_id("1").build().await?;
    TrackedChannelFactory::new(db)
        .channel_id("2")
        .inactive(true)
        .build()
        .await?;

    let repo = TrackedChannelRepository::new(db);
    let channels = repo.get_all().await?;

    assert_eq!(channels.len(), 2);
    assert!(channels.iter().any(|c| c.channel_id == 2 && c.is_inactive));

    Ok(())
}

/// Tests that a corrupted stored id surfaces as an error.
///
/// Expected: Err(AppError::InternalErr)
#[tokio::test]
async fn fails_on_corrupted_id() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::TrackedChannel)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    TrackedChannelFactory::new(db)
        .channel_id("not-a-number")
        .build()
        .await?;

    let repo = TrackedChannelRepository::new(db);
    let result = repo.get_all().await;

    assert!(matches!(result, Err(AppError::InternalErr(_))));

    Ok(())
}
