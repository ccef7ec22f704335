use std::fs::File;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use level_snake::autopilot;
use level_snake::game::Engine;
use level_snake::input::{GameInput, poll_input};
use level_snake::level::LevelCatalog;
use level_snake::renderer;
use level_snake::ui::hud::HudInfo;
use log::{LevelFilter, error, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use simplelog::{Config, WriteLogger};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Level to start on.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    level: u32,

    /// JSON level catalog to use instead of the built-in levels.
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Let the greedy autopilot steer the snake.
    #[arg(long)]
    autopilot: bool,

    /// File the log is written to.
    #[arg(long, default_value = "level-snake.log")]
    log_file: PathBuf,

    /// Minimum level of log records to keep.
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = init_logging(&cli) {
        eprintln!("Failed to open log file {}: {error}", cli.log_file.display());
        return ExitCode::FAILURE;
    }

    let catalog = match &cli.levels {
        Some(path) => match LevelCatalog::load(path) {
            Ok(catalog) => catalog,
            Err(error) => {
                eprintln!("{error}");
                error!("{error}");
                return ExitCode::FAILURE;
            }
        },
        None => LevelCatalog::builtin().clone(),
    };

    install_panic_hook();

    let result = run(&cli, Engine::new(catalog));
    let cleanup = cleanup_terminal();

    match result.and(cleanup) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("terminal error: {error}");
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) -> io::Result<()> {
    let file = File::create(&cli.log_file)?;
    // Only fails when a logger is already installed.
    let _ = WriteLogger::init(cli.log_level, Config::default(), file);
    Ok(())
}

fn run(cli: &Cli, mut engine: Engine) -> io::Result<()> {
    let mut terminal = setup_terminal()?;
    let mut state = engine.initialize_game(cli.level);
    let mut started = false;
    let mut last_tick = Instant::now();

    info!(
        "session started on level {} (grid {}, autopilot {})",
        cli.level,
        engine.grid_size(),
        cli.autopilot
    );

    loop {
        let hud_info = HudInfo {
            grid_size: engine.grid_size(),
            has_walls: engine.level_config(state.level).has_walls,
            started,
            autopilot: cli.autopilot,
        };
        terminal.draw(|frame| renderer::render(frame, &state, &hud_info))?;

        if let Some(input) = poll_input(FRAME_INTERVAL)? {
            match input {
                GameInput::Quit => break,
                GameInput::Confirm if !started => {
                    started = true;
                    last_tick = Instant::now();
                }
                GameInput::Confirm if state.is_game_over => {
                    state = engine.initialize_game(cli.level);
                    last_tick = Instant::now();
                }
                other if started => state.apply_input(other),
                _ => {}
            }
        }

        if started && last_tick.elapsed() >= Duration::from_millis(u64::from(state.speed)) {
            if cli.autopilot && state.is_active() {
                let grid_size = engine.grid_size();
                let direction =
                    autopilot::next_direction(&state, engine.level_config(state.level), grid_size);
                state.set_next_direction(direction);
            }

            state = engine.update_game_state(&state);
            last_tick = Instant::now();
        }
    }

    info!("session ended at level {} with score {}", state.level, state.score);
    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn cleanup_terminal() -> io::Result<()> {
    disable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, Show, LeaveAlternateScreen)?;

    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_after_panic();
        error!("panic: {panic_info}");
        default_hook(panic_info);
    }));
}

fn restore_terminal_after_panic() {
    let _ = disable_raw_mode();

    let mut stdout = io::stdout();
    let _ = execute!(stdout, Show, LeaveAlternateScreen);
}
