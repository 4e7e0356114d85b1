use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::io;
use std::thread;
use std::time::Instant;

use snake_duel::app::{Game, GameState};
use snake_duel::config::GameConfig;
use snake_duel::persistence::JsonFileStore;

const CONFIG_FILE: &str = "snake_duel.json";

fn main() -> Result<(), io::Error> {
    // Log to a file; the terminal belongs to the game
    WriteLogger::init(
        LevelFilter::Info,
        Config::default(),
        File::create("snake_duel.log")?,
    )
    .expect("Failed to initialize logger");

    info!("Starting Snake Duel");

    let config = GameConfig::load_or_default(CONFIG_FILE);
    let store = JsonFileStore::new(&config.data_dir);
    let tick_rate = config.tick_rate();
    let mut game = Game::new(config, store);
    let mut rng = rand::thread_rng();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut last_tick = Instant::now();
    let mut ignore_input = false;
    loop {
        terminal.draw(|f| game.render(f))?;

        // At most one key per tick
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if ignore_input {
            thread::sleep(timeout);
        } else if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    game.handle_input(key, &mut rng);
                    ignore_input = true;
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            game.update(&mut rng);
            last_tick = Instant::now();
            ignore_input = false;
        }

        if let GameState::Exit = game.state {
            break;
        }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Exiting");
    Ok(())
}
