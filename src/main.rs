mod app;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use typewriter_ui::{EventLoop, WriterWindow};

use app::App;
use config::Config;

#[derive(Parser)]
#[command(name = "typewriter", about = "Animated typewriter text with a blinking cursor")]
struct Cli {
    /// Path to a TOML config (defaults to ./typewriter.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Text to write
    #[arg(short, long)]
    text: Option<String>,
    /// Seconds before the first character appears
    #[arg(short, long)]
    delay: Option<f32>,
    /// Never show the cursor
    #[arg(long)]
    nocursor: bool,
    /// Hide the cursor once writing completes
    #[arg(long)]
    noblink: bool,
}

impl Cli {
    /// Apply command line overrides on top of the file config
    fn apply(self, mut config: Config) -> Config {
        if let Some(text) = self.text {
            config.writing.text = text;
        }
        if let Some(delay) = self.delay {
            config.writing.delay = delay;
        }
        config.writing.nocursor |= self.nocursor;
        config.writing.noblink |= self.noblink;
        config
    }
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    let loaded = Config::load_or_default(cli.config.as_deref());
    let config = match loaded {
        Ok(config) => cli.apply(config),
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = config.validate() {
        log::error!("{}", e);
        return ExitCode::FAILURE;
    }

    let event_loop = EventLoop::new();

    let window = match WriterWindow::new(&event_loop, config.window_config()) {
        Ok(window) => window,
        Err(e) => {
            log::error!("Failed to create window: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let app = App::new(&config);

    typewriter_ui::run_with_app(window, event_loop, app);

    ExitCode::SUCCESS
}
