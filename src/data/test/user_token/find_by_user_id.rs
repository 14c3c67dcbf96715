use super::*;

/// Tests finding a stored token.
///
/// Expected: Ok(Some) with the stored token
#[tokio::test]
async fn finds_existing_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserToken)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    UserTokenFactory::new(db)
        .user_id("77")
        .access_token("token-77")
        .username("bob")
        .build()
        .await?;

    let repo = UserTokenRepository::new(db);
    let record = repo.find_by_user_id("77").await?.unwrap();

    assert_eq!(record.access_token, "token-77");
    assert_eq!(record.username.as_deref(), Some("bob"));

    Ok(())
}

/// Tests looking up a user without a token.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserToken)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    UserTokenFactory::new(db).user_id("1").build().await?;

    let repo = UserTokenRepository::new(db);
    let record = repo.find_by_user_id("2").await?;

    assert!(record.is_none());

    Ok(())
}
