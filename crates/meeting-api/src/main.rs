use meeting_core::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Database, storage, queue and routes
    let (_state, router) = meeting_api::setup::initialize_app(config.clone()).await?;

    meeting_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
