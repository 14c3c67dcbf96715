use super::*;

/// Tests deleting a stored token.
///
/// Expected: Ok(true) and the row is gone
#[tokio::test]
async fn deletes_existing_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserToken)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    UserTokenFactory::new(db).user_id("5").build().await?;

    let repo = UserTokenRepository::new(db);
    let deleted = repo.delete("5").await?;

    assert!(deleted);
    assert!(repo.find_by_user_id("5").await?.is_none());

    Ok(())
}

/// Tests deleting a user that has no stored token.
///
/// Expected: Ok(false), not an error
#[tokio::test]
async fn deleting_unknown_user_is_not_an_error() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserToken)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserTokenRepository::new(db);
    let deleted = repo.delete("404").await?;

    assert!(!deleted);

    Ok(())
}
