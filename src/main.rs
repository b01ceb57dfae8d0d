// SPDX-License-Identifier: GPL-3.0-only

use std::{io::Write, path::PathBuf, sync::Arc};

use clap::Parser;
use starrypages::{
    app::{AppModel, Message, Task, parse_command},
    config::StarryConfig,
    core::{StarryApi, StarryCore},
    entities::PageRequest,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(version, about = "Browse PokéApi one page at a time")]
struct Args {
    /// Number of Pokémon per page, overrides the config file
    #[arg(long)]
    limit: Option<u32>,

    /// Position in the listing to start at
    #[arg(long, default_value_t = 0)]
    offset: u32,

    /// Listing endpoint, overrides the config file
    #[arg(long)]
    listing_url: Option<String>,

    /// Config file to use instead of the one in the user's config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration back to the config file
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), anywho::Error> {
    let args = Args::parse();

    // stdout belongs to the grid, logs go to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("starrypages=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = args.config.clone().or_else(StarryConfig::default_path);
    let mut config = match &config_path {
        Some(path) => StarryConfig::load(path)?,
        None => StarryConfig::default(),
    };

    if let Some(limit) = args.limit {
        config.items_per_page = limit;
    }
    if let Some(listing_url) = args.listing_url {
        config.listing_url = listing_url;
    }

    if args.save_config {
        match &config_path {
            Some(path) => config.save(path)?,
            None => tracing::warn!("no config directory on this system, not saving"),
        }
    }

    let api = StarryApi::new(&config.listing_url, config.request_timeout())?;
    let initial = PageRequest::new(args.offset, config.items_per_page)?;
    let core = StarryCore::start(Arc::new(api), initial);

    let mut rows = core.rows();
    let mut details = core.details();
    let mut app = AppModel::new(config, core);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    render(&app)?;

    loop {
        let message = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => parse_command(&line),
                None => Message::Quit,
            },
            Ok(()) = rows.changed() => Message::RowsUpdated(rows.borrow_and_update().clone()),
            Ok(()) = details.changed() => Message::DetailsUpdated(details.borrow_and_update().clone()),
        };

        match app.update(message) {
            Task::Render => render(&app)?,
            Task::Quit => break,
        }
    }

    tracing::debug!("bye");
    Ok(())
}

/// Clears the terminal and draws the grid
fn render(app: &AppModel) -> Result<(), anywho::Error> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\x1b[2J\x1b[H{}> ", app.view())?;
    stdout.flush()?;
    Ok(())
}
