use pointshub_engine::{Command, RedemptionInput, Transaction};
use pointshub_shared::{Actor, Error, Role};
use temp_dir::TempDir;

mod helpers;

fn redemption_input(amount: i64) -> RedemptionInput {
    RedemptionInput {
        amount,
        remark: None,
    }
}

#[tokio::test]
async fn test_redemption_is_two_phase() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let engine = Command::new(state.clone());

    let user_id = helpers::create_user(&state, "customer", Role::Regular, true).await?;
    helpers::gift_points(&state, &user_id, 200).await?;
    let cashier_id = helpers::create_user(&state, "cashier1", Role::Cashier, true).await?;

    let claim = engine
        .redeem(&Actor::new(&user_id, Role::Regular), redemption_input(80))
        .await?;

    // creation is a pending claim, not a debit
    assert_eq!(helpers::balance_of(&state, &user_id).await?, 200);
    let Transaction::Redemption {
        id,
        amount,
        redeemed,
        processed_at,
        ..
    } = &claim
    else {
        panic!("expected redemption");
    };
    assert_eq!(*amount, 0);
    assert_eq!(*redeemed, 80);
    assert!(processed_at.is_none());

    let processed = engine
        .process_redemption(&Actor::new(&cashier_id, Role::Cashier), id)
        .await?;

    assert_eq!(helpers::balance_of(&state, &user_id).await?, 120);
    let Transaction::Redemption {
        amount,
        processed_by,
        ..
    } = &processed
    else {
        panic!("expected redemption");
    };
    assert_eq!(*amount, -80);
    assert_eq!(processed_by.as_deref(), Some(cashier_id.as_str()));

    Ok(())
}

#[tokio::test]
async fn test_redemption_create_checks_balance() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let engine = Command::new(state.clone());

    let user_id = helpers::create_user(&state, "customer", Role::Regular, true).await?;
    helpers::gift_points(&state, &user_id, 40).await?;

    let err = engine
        .redeem(&Actor::new(&user_id, Role::Regular), redemption_input(50))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InsufficientPoints));

    // no pending claim was created
    let transactions = engine.list_for_user(&user_id, Default::default()).await?;
    assert!(transactions.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_redemption_requires_verified_account() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let engine = Command::new(state.clone());

    let user_id = helpers::create_user(&state, "customer", Role::Regular, false).await?;
    helpers::gift_points(&state, &user_id, 100).await?;

    let err = engine
        .redeem(&Actor::new(&user_id, Role::Regular), redemption_input(50))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotVerified));

    Ok(())
}

#[tokio::test]
async fn test_processing_twice_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let engine = Command::new(state.clone());

    let user_id = helpers::create_user(&state, "customer", Role::Regular, true).await?;
    helpers::gift_points(&state, &user_id, 100).await?;
    let cashier_id = helpers::create_user(&state, "cashier1", Role::Cashier, true).await?;

    let claim = engine
        .redeem(&Actor::new(&user_id, Role::Regular), redemption_input(60))
        .await?;

    let cashier = Actor::new(&cashier_id, Role::Cashier);
    engine.process_redemption(&cashier, claim.id()).await?;

    let err = engine
        .process_redemption(&cashier, claim.id())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyProcessed));

    // the debit happened exactly once
    assert_eq!(helpers::balance_of(&state, &user_id).await?, 40);

    Ok(())
}

#[tokio::test]
async fn test_processing_rechecks_balance() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let engine = Command::new(state.clone());

    let user_id = helpers::create_user(&state, "customer", Role::Regular, true).await?;
    helpers::gift_points(&state, &user_id, 100).await?;
    let cashier_id = helpers::create_user(&state, "cashier1", Role::Cashier, true).await?;

    let claim = engine
        .redeem(&Actor::new(&user_id, Role::Regular), redemption_input(80))
        .await?;

    // the balance drifted below the claim between creation and processing
    helpers::gift_points(&state, &user_id, -50).await?;

    let err = engine
        .process_redemption(&Actor::new(&cashier_id, Role::Cashier), claim.id())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InsufficientPoints));

    // the aborted unit rolled the processing marker back
    let reloaded = engine.find(claim.id()).await?;
    let Transaction::Redemption {
        amount,
        processed_at,
        ..
    } = &reloaded
    else {
        panic!("expected redemption");
    };
    assert_eq!(*amount, 0);
    assert!(processed_at.is_none());
    assert_eq!(helpers::balance_of(&state, &user_id).await?, 50);

    Ok(())
}

#[tokio::test]
async fn test_processing_rejects_other_kinds() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let engine = Command::new(state.clone());

    let cashier_id = helpers::create_user(&state, "cashier1", Role::Cashier, true).await?;
    helpers::create_user(&state, "customer", Role::Regular, false).await?;

    let purchase = engine
        .purchase(
            &Actor::new(&cashier_id, Role::Cashier),
            pointshub_engine::PurchaseInput {
                utorid: "customer".to_owned(),
                spent: 10.0,
                promotion_ids: vec![],
                remark: None,
            },
        )
        .await?;

    let err = engine
        .process_redemption(&Actor::new(&cashier_id, Role::Cashier), purchase.id())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransactionKind));

    Ok(())
}
