use super::*;

/// Tests inserting a token for a new user.
///
/// Verifies that the repository stores the token and display metadata and sets
/// both timestamps.
///
/// Expected: Ok with one stored row
#[tokio::test]
async fn creates_new_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserToken)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserTokenRepository::new(db);
    let record = repo
        .upsert(
            UpsertCredentialParam::new("123456789", "token-a")
                .with_username("alice")
                .with_avatar_hash(Some("abc".to_string())),
        )
        .await?;

    assert_eq!(record.user_id, "123456789");
    assert_eq!(record.access_token, "token-a");
    assert_eq!(record.username.as_deref(), Some("alice"));
    assert_eq!(record.avatar_hash.as_deref(), Some("abc"));
    assert!(record.updated_at.is_some());

    let count = entity::prelude::UserToken::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}

/// Tests that writing the same user twice overwrites instead of duplicating.
///
/// Expected: Ok with exactly one row holding the second token
#[tokio::test]
async fn second_write_overwrites() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserToken)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserTokenRepository::new(db);
    repo.upsert(UpsertCredentialParam::new("1", "first").with_username("old"))
        .await?;
    repo.upsert(UpsertCredentialParam::new("1", "second").with_username("new"))
        .await?;

    let count = entity::prelude::UserToken::find().count(db).await?;
    assert_eq!(count, 1);

    let stored = entity::prelude::UserToken::find_by_id("1".to_string())
        .one(db)
        .await?
        .unwrap();
    assert_eq!(stored.access_token, "second");
    assert_eq!(stored.username.as_deref(), Some("new"));

    Ok(())
}

/// Tests that re-authorizing keeps the original creation time.
///
/// Expected: Ok with created_at unchanged and updated_at refreshed
#[tokio::test]
async fn keeps_created_at_on_update() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserToken)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let existing = UserTokenFactory::new(db).user_id("42").build().await?;

    let repo = UserTokenRepository::new(db);
    repo.upsert(UpsertCredentialParam::new("42", "refreshed"))
        .await?;

    let stored = entity::prelude::UserToken::find_by_id("42".to_string())
        .one(db)
        .await?
        .unwrap();
    assert_eq!(stored.created_at, existing.created_at);
    assert!(stored.updated_at >= existing.updated_at);
    assert_eq!(stored.access_token, "refreshed");

    Ok(())
}

/// Tests that upsert fails when the table does not exist.
///
/// Expected: Err
#[tokio::test]
async fn fails_without_table() -> Result<(), AppError> {
    let test = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserTokenRepository::new(db);
    let result = repo.upsert(UpsertCredentialParam::new("1", "token")).await;

    assert!(result.is_err());

    Ok(())
}
