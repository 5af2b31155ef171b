use engine::{Engine, QrService};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "chiabill={level},telegram_bot={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let qr = QrService::new(&settings.qr.base_url, &settings.qr.template)?
        .include_memo(settings.qr.include_memo);
    let engine = Engine::builder()
        .registry_path(&settings.registry.path)
        .qr_service(qr)
        .build()?;

    match engine.banks() {
        Ok(banks) if banks.is_empty() => tracing::warn!(
            "bank registry {} is missing or empty, every request will fail",
            engine.registry_path().display()
        ),
        Ok(banks) => tracing::info!("{} banks available", banks.len()),
        Err(err) => tracing::warn!("{err}"),
    }

    let bot = telegram_bot::Bot::builder()
        .token(&settings.telegram.token)
        .allowed_users(settings.telegram.allowed_users.iter().copied())
        .engine(engine)
        .build()?;
    bot.run().await;

    Ok(())
}
