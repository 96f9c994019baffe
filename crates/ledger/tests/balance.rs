use pointshub_ledger::{Command, adjust_balance};
use pointshub_shared::Error;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_adjust_balance_credits_and_debits() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = Command::new(state.clone());
    let user_id = helpers::create_user(&cmd, "alice001", "Alice").await?;

    let mut conn = state.write_db.acquire().await?;
    assert_eq!(adjust_balance(&mut conn, &user_id, 150).await?, 150);
    assert_eq!(adjust_balance(&mut conn, &user_id, -100).await?, 50);

    let user = cmd.load(&user_id).await?.unwrap();
    assert_eq!(user.points, 50);

    Ok(())
}

#[tokio::test]
async fn test_adjust_balance_never_goes_negative() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = Command::new(state.clone());
    let user_id = helpers::create_user(&cmd, "alice001", "Alice").await?;

    let mut conn = state.write_db.acquire().await?;
    adjust_balance(&mut conn, &user_id, 40).await?;

    let err = adjust_balance(&mut conn, &user_id, -41).await.unwrap_err();
    assert!(matches!(err, Error::InsufficientPoints));

    // the failed debit left the balance untouched
    let user = cmd.load(&user_id).await?.unwrap();
    assert_eq!(user.points, 40);

    Ok(())
}

#[tokio::test]
async fn test_adjust_balance_unknown_user() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    let mut conn = state.write_db.acquire().await?;
    let err = adjust_balance(&mut conn, "01JBOGUSID0000000000000000", 10)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    Ok(())
}
