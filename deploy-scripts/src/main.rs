use clap::Parser;
use deploy_scripts::{cli::Cli, config::EnvVars};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // A missing `.env` file is not an error, the variables may already be set
    dotenv::dotenv().ok();

    let Cli { command } = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let env: EnvVars = std::env::vars().collect();
    command.run(&env).await?;

    Ok(())
}
