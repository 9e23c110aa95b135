use std::io;
use std::time::Duration;

use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod app;
mod config;
mod content;
mod db;
mod editor;
mod error;
mod models;
mod session;
mod tui;

use app::App;
use config::{Config, Secrets};
use error::Result;
use models::Category;
use tui::{draw, handle_key_event};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for --list flag (headless dump of one category)
    let list_category = match args.get(1).map(String::as_str) {
        Some("--list") => {
            let slug = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("usage: blog --list <scary|chat|tech>"))?;
            Some(slug.parse::<Category>()?)
        }
        Some(other) => return Err(anyhow::anyhow!("unknown argument '{other}'").into()),
        None => None,
    };

    // Load configuration
    let config = Config::load()?;
    let secrets = Secrets::load()?;

    // Initialize app
    let mut app = App::new(&config, secrets).await?;

    if let Some(category) = list_category {
        let articles = app.aggregator().aggregate(category).await?;
        println!("{}", serde_json::to_string_pretty(&articles)?);
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Storage and filesystem faults end the run with a non-zero status
    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.mode, app.show_help) {
                        let should_quit = app.handle_action(action).await?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
