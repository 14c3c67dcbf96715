use super::*;

/// Tests listing every stored token.
///
/// Expected: Ok with all records and a matching count
#[tokio::test]
async fn returns_all_records() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserToken)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    UserTokenFactory::new(db).user_id("1").build().await?;
    UserTokenFactory::new(db).user_id("2").build().await?;
    UserTokenFactory::new(db).user_id("3").build().await?;

    let repo = UserTokenRepository::new(db);
    let records = repo.get_all().await?;

    assert_eq!(records.len(), 3);
    assert_eq!(repo.count().await?, 3);

    let mut ids: Vec<_> = records.into_iter().map(|record| record.user_id).collect();
    ids.sort();
    assert_eq!(ids, vec!["1", "2", "3"]);

    Ok(())
}

/// Tests listing an empty table.
///
/// Expected: Ok with no records
#[tokio::test]
async fn returns_empty_for_empty_table() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserToken)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserTokenRepository::new(db);

    assert!(repo.get_all().await?.is_empty());
    assert_eq!(repo.count().await?, 0);

    Ok(())
}
