use pointshub_promotion::{Command, catalog};
use pointshub_shared::{Error, PromotionKind};
use temp_dir::TempDir;
use time::OffsetDateTime;

mod helpers;

fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[tokio::test]
async fn test_active_automatic_filters_window_and_min_spending() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = Command::new(state.clone());
    let now = now();

    let active = helpers::create_promotion(
        &cmd,
        PromotionKind::Automatic,
        now,
        now + 3600,
        Some(50.0),
        Some(0.5),
        None,
    )
    .await?;
    // not started yet
    helpers::create_promotion(
        &cmd,
        PromotionKind::Automatic,
        now + 7200,
        now + 10800,
        None,
        Some(1.0),
        None,
    )
    .await?;
    // one-time promotions never surface automatically
    helpers::create_promotion(
        &cmd,
        PromotionKind::OneTime,
        now,
        now + 3600,
        None,
        Some(1.0),
        None,
    )
    .await?;

    let mut conn = state.read_db.acquire().await?;

    let rows = catalog::active_automatic(&mut conn, 100.0, now + 10).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, active);

    // below the minimum spend
    let rows = catalog::active_automatic(&mut conn, 10.0, now + 10).await?;
    assert!(rows.is_empty());

    // window is half-open: at end_time the promotion is gone
    let rows = catalog::active_automatic(&mut conn, 100.0, now + 3600).await?;
    assert!(rows.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_resolve_manual_rejects_bad_ids() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = Command::new(state.clone());
    let now = now();

    let id = helpers::create_promotion(
        &cmd,
        PromotionKind::OneTime,
        now,
        now + 3600,
        Some(20.0),
        None,
        Some(75.0),
    )
    .await?;

    let mut conn = state.read_db.acquire().await?;

    // unknown id
    let err = catalog::resolve_manual(
        &mut conn,
        &[id.to_owned(), "01JBOGUSID0000000000000000".to_owned()],
        100.0,
        now + 10,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::InvalidPromotion(_)));

    // outside the window
    let err = catalog::resolve_manual(&mut conn, &[id.to_owned()], 100.0, now + 7200)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPromotion(_)));

    // minimum spend unmet
    let err = catalog::resolve_manual(&mut conn, &[id.to_owned()], 10.0, now + 10)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPromotion(_)));

    let rows = catalog::resolve_manual(&mut conn, &[id.to_owned()], 100.0, now + 10).await?;
    assert_eq!(rows.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_one_time_use_is_exactly_once() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = Command::new(state.clone());
    let now = now();

    let id = helpers::create_promotion(
        &cmd,
        PromotionKind::OneTime,
        now,
        now + 3600,
        None,
        None,
        Some(50.0),
    )
    .await?;

    let mut conn = state.write_db.acquire().await?;

    assert!(!catalog::is_one_time_used(&mut conn, "u1", &id).await?);
    catalog::mark_one_time_used(&mut conn, "u1", &id, now).await?;
    assert!(catalog::is_one_time_used(&mut conn, "u1", &id).await?);

    let err = catalog::mark_one_time_used(&mut conn, "u1", &id, now)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PromotionAlreadyUsed));

    // a different user is unaffected
    catalog::mark_one_time_used(&mut conn, "u2", &id, now).await?;

    Ok(())
}

#[tokio::test]
async fn test_eligible_one_time_excludes_consumed() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let cmd = Command::new(state.clone());
    let now = now();

    let id = helpers::create_promotion(
        &cmd,
        PromotionKind::OneTime,
        now,
        now + 3600,
        None,
        None,
        Some(50.0),
    )
    .await?;

    let mut conn = state.write_db.acquire().await?;

    let rows = catalog::eligible_one_time_for(&mut conn, "u1", now + 10).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);

    catalog::mark_one_time_used(&mut conn, "u1", &id, now).await?;

    let rows = catalog::eligible_one_time_for(&mut conn, "u1", now + 10).await?;
    assert!(rows.is_empty());

    Ok(())
}
