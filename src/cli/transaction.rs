use pointshub_engine::TransactionFilter;

pub async fn show(config: crate::config::Config, id: String) -> anyhow::Result<()> {
    let state = crate::create_state(&config).await?;
    let engine = pointshub_engine::Command::new(state);

    let transaction = engine.find(id).await?;
    println!("{transaction:#?}");

    Ok(())
}

pub async fn list(config: crate::config::Config, utorid: String) -> anyhow::Result<()> {
    let state = crate::create_state(&config).await?;
    let users = pointshub_ledger::Command::new(state.clone());
    let engine = pointshub_engine::Command::new(state);

    let Some(user) = users.load_by_utorid(&utorid).await? else {
        tracing::error!("user {utorid} not found");
        return Ok(());
    };

    let transactions = engine
        .list_for_user(&user.id, TransactionFilter::default())
        .await?;

    for transaction in &transactions {
        println!("{transaction:?}");
    }

    tracing::info!(count = transactions.len(), "transactions listed");

    Ok(())
}
