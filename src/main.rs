// Entry point.
// Loads configuration, installs logging, and runs the TUI until the user quits.

use blogem::api::ApiClient;
use blogem::app::App;
use blogem::config::Config;
use blogem::error::Result;
use blogem::logging;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config)?;

    let api = ApiClient::from_config(&config)?;
    info!(api = api.base_url(), "starting blogem");

    let mut terminal = ratatui::init();
    let result = App::new(api).run(&mut terminal);
    ratatui::restore();

    result?;
    info!("exiting");
    Ok(())
}
