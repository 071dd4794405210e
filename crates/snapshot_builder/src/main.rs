use anyhow::Result;
use chrono::Local;
use clap::Parser;
use covid_data::Config;
use snapshot_builder::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env();
    log::debug!("Running {:?} with {:?}", cli.command, config);

    let code = run(cli.command, &config, Local::now().date_naive()).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
