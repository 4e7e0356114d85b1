use crossterm::event::{KeyCode, KeyEvent};
use log::info;
use rand::Rng;
use std::time::Duration;

use crate::arena::{Arena, ArenaEvent, TickStatus};
use crate::config::GameConfig;
use crate::grid::{Direction, Grid};
use crate::outcome::RoundResult;
use crate::persistence::{KeyValueStore, Persistence};
use crate::snake::Side;
use crate::stats::{PowerUpStats, Scores, Session, StatsSnapshot};
use crate::titles;

#[derive(Debug)]
pub enum GameState {
    Idle,
    Running(Arena),
    Paused(Arena),
    RoundOver {
        arena: Arena,
        result: RoundResult,
        new_titles: Vec<&'static str>,
    },
    Exit,
}

/// Everything between rounds: the current state, saved progress and the
/// session record.
pub struct Game<S: KeyValueStore> {
    pub state: GameState,
    pub config: GameConfig,
    persistence: Persistence<S>,
    pub session: Session,
    pub scores: Scores,
    pub titles: Vec<String>,
    pub power_up_stats: PowerUpStats,
    /// Playfield size picked up from the terminal, if known
    pub grid: Option<Grid>,
    /// Last title unlocked during play
    pub notice: Option<String>,
    clock: Duration,
}

fn steering(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::North),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::South),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::West),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::East),
        _ => None,
    }
}

impl<S: KeyValueStore> Game<S> {
    pub fn new(config: GameConfig, store: S) -> Self {
        let persistence = Persistence::new(store);
        let scores = persistence.load_scores();
        let titles = persistence.load_titles();
        let power_up_stats = persistence.load_power_up_stats();
        info!(
            "Loaded {} wins, {} losses, {} titles",
            scores.wins,
            scores.losses,
            titles.len()
        );

        Game {
            state: GameState::Idle,
            session: Session::new(config.starting_difficulty),
            config,
            persistence,
            scores,
            titles,
            power_up_stats,
            grid: None,
            notice: None,
            clock: Duration::ZERO,
        }
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn handle_input(&mut self, key: KeyEvent, rng: &mut impl Rng) {
        let state = std::mem::replace(&mut self.state, GameState::Exit);

        self.state = match (state, key.code) {
            (_, KeyCode::Esc) => GameState::Exit,

            (GameState::Idle, KeyCode::Char(' ')) => GameState::Running(self.start_round(rng)),
            (GameState::Idle, KeyCode::Char('q')) => GameState::Exit,
            (GameState::Idle, KeyCode::Char('r')) => {
                self.reset_scores();
                GameState::Idle
            }

            (GameState::Running(arena), KeyCode::Char(' ')) => GameState::Paused(arena),
            (GameState::Running(arena) | GameState::Paused(arena), KeyCode::Char('q')) => {
                self.finish_round(arena, RoundResult::forfeit())
            }
            (GameState::Running(mut arena), code) => {
                if let Some(direction) = steering(code) {
                    arena.steer_player(direction);
                }
                GameState::Running(arena)
            }

            (GameState::Paused(arena), KeyCode::Char(' ')) => GameState::Running(arena),

            (GameState::RoundOver { .. }, KeyCode::Char(' ') | KeyCode::Char('q')) => {
                GameState::Idle
            }

            (state, _) => state,
        };
    }

    /// Advance the running round by one tick of game time.
    pub fn update(&mut self, rng: &mut impl Rng) {
        let GameState::Running(arena) = &mut self.state else {
            return;
        };

        self.clock += self.config.tick_rate();
        let report = arena.tick(self.clock, rng);
        let survival = arena.survival;
        let player_length = arena.player.len();

        let mut picked_up = false;
        for event in &report.events {
            if let ArenaEvent::PowerUpCollected {
                side: Side::Player,
                kind,
            } = *event
            {
                self.session.record_power_up(kind, &mut self.power_up_stats);
                picked_up = true;
            }
        }

        if picked_up {
            let snapshot = self.snapshot(survival, player_length);
            if let Some(&name) = self.award_titles(&snapshot).last() {
                self.notice = Some(format!("New Title Unlocked: {}!", name));
            }
        }

        if let TickStatus::RoundOver(result) = report.status {
            if let GameState::Running(arena) = std::mem::replace(&mut self.state, GameState::Idle) {
                self.state = self.finish_round(arena, result);
            }
        }
    }

    fn start_round(&mut self, rng: &mut impl Rng) -> Arena {
        let grid = self.grid.unwrap_or_else(|| self.config.grid());
        self.session.start_round();
        self.notice = None;
        Arena::new(&self.config, grid, self.session.difficulty, self.clock, rng)
    }

    fn finish_round(&mut self, arena: Arena, result: RoundResult) -> GameState {
        info!("{}", result.message(&self.config.player_name));

        self.session.record_result(&result, &mut self.scores);
        self.power_up_stats.add_shield_time(arena.shield_time);

        let snapshot = self.snapshot(arena.survival, arena.player.len());
        let new_titles = self.award_titles(&snapshot);

        self.persistence.save_scores(&self.scores);
        self.persistence.save_power_up_stats(&self.power_up_stats);
        self.session.adapt_difficulty();

        GameState::RoundOver {
            arena,
            result,
            new_titles,
        }
    }

    fn snapshot(&self, survival: Duration, player_length: usize) -> StatsSnapshot {
        self.session
            .snapshot(self.scores, self.power_up_stats, survival, player_length)
    }

    fn award_titles(&mut self, snapshot: &StatsSnapshot) -> Vec<&'static str> {
        let earned: Vec<&'static str> = titles::newly_earned(snapshot, &self.titles)
            .into_iter()
            .map(|rule| rule.name)
            .collect();
        if earned.is_empty() {
            return earned;
        }

        for name in &earned {
            info!("Title unlocked: {}", name);
            self.titles.push(name.to_string());
        }
        self.persistence.save_titles(&self.titles);
        earned
    }

    fn reset_scores(&mut self) {
        info!("Scores reset");
        self.scores = Scores::default();
        self.persistence.save_scores(&self.scores);
    }
}
