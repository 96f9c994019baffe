use std::sync::Arc;

use pointshub_engine::{Command, PurchaseInput, RedemptionInput};
use pointshub_shared::{Actor, Error, PromotionKind, Role};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_concurrent_one_time_use_has_one_winner() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let engine = Arc::new(Command::new(state.clone()));

    let cashier_id = helpers::create_user(&state, "cashier1", Role::Cashier, true).await?;
    let customer_id = helpers::create_user(&state, "customer", Role::Regular, false).await?;
    let promotion_id =
        helpers::create_promotion(&state, PromotionKind::OneTime, None, None, Some(50.0)).await?;

    let cashier = Actor::new(&cashier_id, Role::Cashier);
    let attempt = |engine: Arc<Command>, cashier: Actor, promotion_id: String| async move {
        engine
            .purchase(
                &cashier,
                PurchaseInput {
                    utorid: "customer".to_owned(),
                    spent: 10.0,
                    promotion_ids: vec![promotion_id],
                    remark: None,
                },
            )
            .await
    };

    let (first, second) = futures::join!(
        attempt(engine.clone(), cashier.clone(), promotion_id.clone()),
        attempt(engine.clone(), cashier.clone(), promotion_id.clone()),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);

    let failure = if first.is_err() { first } else { second };
    assert!(matches!(
        failure.unwrap_err(),
        Error::PromotionAlreadyUsed
    ));

    // the losing purchase was rejected whole; only the winner credited
    // base 40 + flat 50
    assert_eq!(helpers::balance_of(&state, &customer_id).await?, 90);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_processing_has_one_winner() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let engine = Arc::new(Command::new(state.clone()));

    let user_id = helpers::create_user(&state, "customer", Role::Regular, true).await?;
    helpers::gift_points(&state, &user_id, 100).await?;
    let cashier_id = helpers::create_user(&state, "cashier1", Role::Cashier, true).await?;

    let claim = engine
        .redeem(
            &Actor::new(&user_id, Role::Regular),
            RedemptionInput {
                amount: 60,
                remark: None,
            },
        )
        .await?;

    let cashier = Actor::new(&cashier_id, Role::Cashier);
    let claim_id = claim.id().to_owned();
    let attempt = |engine: Arc<Command>, cashier: Actor, id: String| async move {
        engine.process_redemption(&cashier, id).await
    };

    let (first, second) = futures::join!(
        attempt(engine.clone(), cashier.clone(), claim_id.clone()),
        attempt(engine.clone(), cashier.clone(), claim_id.clone()),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);

    let failure = if first.is_err() { first } else { second };
    assert!(matches!(failure.unwrap_err(), Error::AlreadyProcessed));

    // debited exactly once
    assert_eq!(helpers::balance_of(&state, &user_id).await?, 40);

    Ok(())
}
