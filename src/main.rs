use std::io::stdout;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use rand::thread_rng;

mod engine;
mod error;
mod tui;
mod tui4096;

use engine::game::Game;
use tui::crossterm::{Crossterm, CrosstermEvents};
use tui4096::Tui4096;

/// Slide and merge tiles until one of them reads 4096.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Append logs to this file; the terminal itself is busy drawing the game
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let rng = thread_rng();
    let game = Game::new(rng);
    let w = stdout().lock();
    let renderer = Crossterm::new(Box::new(w))?;
    let event_source = CrosstermEvents::default();

    log::info!("tui4096 starting");
    Tui4096::new(game, renderer, event_source).run()?;

    Ok(())
}

fn init_logging(args: &Args) -> error::Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message,
            ))
        })
        .level(args.verbose.log_level_filter())
        .chain(fern::log_file(path)?)
        .apply()?;
    Ok(())
}
