use log::{debug, info, warn};
use rand::Rng;
use std::time::Duration;

use crate::ai::{self, ArenaView, Brain};
use crate::config::GameConfig;
use crate::grid::{Cell, Direction, Grid};
use crate::items::{random_free_cell, PortalPair, PowerUp};
use crate::movement::{advance, dash};
use crate::outcome::{classify, RoundResult};
use crate::snake::{Effect, Side, Snake};

/// Something the front end or the stats keeper may want to react to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArenaEvent {
    PowerUpSpawned(Effect),
    PowerUpCollected { side: Side, kind: Effect },
    FoodEaten { side: Side, bonus: u32 },
    Teleported(Side),
    CloneSpawned(Side),
    CloneGone(Side),
    PortalsOpened,
    PortalsClosed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickStatus {
    Continue,
    RoundOver(RoundResult),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub status: TickStatus,
    pub events: Vec<ArenaEvent>,
}

/// One round of the duel. Owns every entity on the board and advances them
/// together, one tick at a time. Times are offsets on a single monotonic
/// clock supplied by the caller.
#[derive(Clone, Debug)]
pub struct Arena {
    pub grid: Grid,
    config: GameConfig,
    pub player: Snake,
    pub ai: Snake,
    pub clones: Vec<Snake>,
    pub food: Cell,
    pub power_ups: Vec<PowerUp>,
    pub portals: Option<PortalPair>,
    started_at: Duration,
    last_tick: Duration,
    /// Time since the round started, as of the last tick
    pub survival: Duration,
    last_power_up: Option<Duration>,
    next_portals: Duration,
    pub player_points: u32,
    pub ai_points: u32,
    /// Time the player has spent shielded this round
    pub shield_time: Duration,
}

impl Arena {
    pub fn new(
        config: &GameConfig,
        grid: Grid,
        difficulty: u8,
        now: Duration,
        rng: &mut impl Rng,
    ) -> Self {
        let row = grid.height / 3;
        let length = config.initial_length.clamp(1, grid.width as usize);
        let interval = config.base_move_interval;
        // Keep the trailing body on the board when the grid is narrow
        let spawn_x = |x: i32| x.clamp(length as i32 - 1, grid.width - 1);

        let brain = if config.advanced_ai {
            Brain::advanced(difficulty)
        } else {
            Brain::standard(difficulty)
        };
        let ai = Snake::new(Cell::new(spawn_x(grid.width / 8), row), Direction::East, length, interval)
            .with_brain(brain);
        let player = Snake::new(
            Cell::new(spawn_x(grid.width * 5 / 8), row),
            Direction::East,
            length,
            interval,
        );

        let mut arena = Arena {
            grid,
            config: config.clone(),
            player,
            ai,
            clones: Vec::new(),
            food: Cell::new(0, 0),
            power_ups: Vec::new(),
            portals: None,
            started_at: now,
            last_tick: now,
            survival: Duration::ZERO,
            last_power_up: None,
            next_portals: now + config.portal_interval(),
            player_points: 0,
            ai_points: 0,
            shield_time: Duration::ZERO,
        };
        arena.relocate_food(rng);
        info!(
            "Round started on {}x{} grid at difficulty {}",
            grid.width, grid.height, difficulty
        );
        arena
    }

    pub fn snake(&self, side: Side) -> &Snake {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn snake_mut(&mut self, side: Side) -> &mut Snake {
        match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        }
    }

    pub fn steer_player(&mut self, direction: Direction) {
        self.player.steer(direction);
    }

    pub fn has_clone(&self, side: Side) -> bool {
        self.clones
            .iter()
            .any(|c| c.clone_of.is_some_and(|link| link.parent == side))
    }

    /// Any snake, food, power-up or portal on this cell.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.player.occupies(cell)
            || self.ai.occupies(cell)
            || self.clones.iter().any(|c| c.occupies(cell))
            || self.food == cell
            || self.power_ups.iter().any(|p| p.cell == cell)
            || self.portals.is_some_and(|p| p.contains(cell))
    }

    /// Run one simulation step.
    pub fn tick(&mut self, now: Duration, rng: &mut impl Rng) -> TickReport {
        let mut events = Vec::new();

        if let Some(shield) = self.player.effect.filter(|e| e.kind == Effect::Shield) {
            let until = now.min(shield.expires_at);
            self.shield_time += until.saturating_sub(self.last_tick);
        }
        self.last_tick = now;
        self.survival = now.saturating_sub(self.started_at);

        self.expire(now, &mut events);
        self.spawn_power_up(now, rng, &mut events);
        self.spawn_portals(now, rng, &mut events);
        self.step_clones(rng, &mut events);

        let grid = self.grid;
        ai::update_behavior(&mut self.ai, &self.player);
        if self.ai.is_ai() && self.ai.is_due() {
            let view = ArenaView {
                grid,
                food: self.food,
                power_ups: &self.power_ups,
            };
            self.ai.next_direction = ai::choose_direction(&view, &self.ai, Some(&self.player), rng);
        }

        let heads_before = [self.ai.head(), self.player.head()];
        let ai_direction = self.ai.next_direction;
        let ai_outcome = advance(grid, &mut self.ai, ai_direction, Some(&self.player));
        let player_direction = self.player.next_direction;
        let player_outcome = advance(grid, &mut self.player, player_direction, Some(&self.ai));

        self.collect_power_ups(now, &mut events);

        if let Some(result) = classify(&self.player, player_outcome, &self.ai, ai_outcome) {
            info!(
                "Round over after {:.1}s: {:?} ({})",
                self.survival.as_secs_f64(),
                result.verdict,
                result.cause
            );
            return TickReport {
                status: TickStatus::RoundOver(result),
                events,
            };
        }

        self.eat_food(now, rng, &mut events);

        for (side, before) in [Side::Ai, Side::Player].into_iter().zip(heads_before) {
            if self.snake(side).head() != before {
                self.teleport(side, &mut events);
            }
        }

        TickReport {
            status: TickStatus::Continue,
            events,
        }
    }

    fn expire(&mut self, now: Duration, events: &mut Vec<ArenaEvent>) {
        for side in [Side::Ai, Side::Player] {
            if let Some(kind) = self.snake_mut(side).expire(now) {
                debug!("{:?} lost {}", side, kind);
            }
        }

        let mut gone = Vec::new();
        self.clones.retain_mut(|clone| {
            clone.expire(now);
            match clone.clone_of {
                Some(link) if now >= link.expires_at => {
                    gone.push(link.parent);
                    false
                }
                _ => true,
            }
        });
        for parent in gone {
            info!("{:?} clone expired", parent);
            events.push(ArenaEvent::CloneGone(parent));
        }

        if self.portals.is_some_and(|p| now >= p.closes_at) {
            self.portals = None;
            info!("Portals closed");
            events.push(ArenaEvent::PortalsClosed);
        }

        self.power_ups.retain(|p| now < p.stale_at);
    }

    fn spawn_power_up(&mut self, now: Duration, rng: &mut impl Rng, events: &mut Vec<ArenaEvent>) {
        if !self.power_ups.is_empty() {
            return;
        }
        let interval = self.config.power_up_interval();
        if self.last_power_up.is_some_and(|last| now < last + interval) {
            return;
        }

        let Some(cell) = random_free_cell(self.grid, |c| self.is_occupied(c), rng) else {
            return;
        };
        let kind = Effect::ALL[rng.gen_range(0..Effect::ALL.len())];
        self.power_ups.push(PowerUp {
            cell,
            kind,
            stale_at: now + self.config.power_up_freshness(),
        });
        self.last_power_up = Some(now);
        info!("{} power-up spawned at ({}, {})", kind, cell.x, cell.y);
        events.push(ArenaEvent::PowerUpSpawned(kind));
    }

    fn spawn_portals(&mut self, now: Duration, rng: &mut impl Rng, events: &mut Vec<ArenaEvent>) {
        if self.portals.is_some() || now < self.next_portals {
            return;
        }
        self.next_portals = now + self.config.portal_interval();

        let Some(first) = random_free_cell(self.grid, |c| self.is_occupied(c), rng) else {
            return;
        };
        let Some(second) = random_free_cell(self.grid, |c| c == first || self.is_occupied(c), rng)
        else {
            return;
        };
        self.portals = Some(PortalPair {
            ends: [first, second],
            closes_at: now + self.config.portal_lifetime(),
        });
        info!(
            "Portals opened at ({}, {}) and ({}, {})",
            first.x, first.y, second.x, second.y
        );
        events.push(ArenaEvent::PortalsOpened);
    }

    /// Clones steer with the AI against their parent's opponent but move
    /// through it, and vanish quietly on a wall or self hit.
    fn step_clones(&mut self, rng: &mut impl Rng, events: &mut Vec<ArenaEvent>) {
        if self.clones.is_empty() {
            return;
        }

        let grid = self.grid;
        let view = ArenaView {
            grid,
            food: self.food,
            power_ups: &self.power_ups,
        };
        let mut food_taken = false;
        let mut survivors = Vec::with_capacity(self.clones.len());

        for mut clone in std::mem::take(&mut self.clones) {
            let parent = clone.clone_of.map_or(Side::Ai, |link| link.parent);
            let target = match parent {
                Side::Player => &self.ai,
                Side::Ai => &self.player,
            };

            if clone.is_ai() && clone.is_due() {
                clone.next_direction = ai::choose_direction(&view, &clone, Some(target), rng);
            }
            let direction = clone.next_direction;
            if advance(grid, &mut clone, direction, None).is_fatal() {
                debug!("{:?} clone crashed", parent);
                events.push(ArenaEvent::CloneGone(parent));
                continue;
            }

            if !food_taken && clone.head() == Some(self.food) {
                clone.grow();
                food_taken = true;
            }
            survivors.push(clone);
        }

        self.clones = survivors;
        if food_taken {
            self.relocate_food(rng);
        }
    }

    fn collect_power_ups(&mut self, now: Duration, events: &mut Vec<ArenaEvent>) {
        for side in [Side::Ai, Side::Player] {
            let Some(head) = self.snake(side).head() else {
                continue;
            };
            let Some(index) = self.power_ups.iter().position(|p| p.cell == head) else {
                continue;
            };
            let kind = self.power_ups.remove(index).kind;
            self.apply_effect(side, kind, now);
            info!("{:?} collected {}", side, kind);
            events.push(ArenaEvent::PowerUpCollected { side, kind });
        }
    }

    /// Reverse and freeze land on the opponent; the picker keeps the tag.
    fn apply_effect(&mut self, side: Side, kind: Effect, now: Duration) {
        let until = match kind {
            Effect::Reverse => now + self.config.reverse_duration(),
            _ => now + self.config.power_up_duration(),
        };
        if kind.targets_opponent() {
            let opponent = self.snake_mut(side.other());
            if kind == Effect::Reverse {
                opponent.reverse_until(until);
            } else {
                opponent.freeze_until(until);
            }
        }
        self.snake_mut(side).activate(kind, until);
    }

    fn eat_food(&mut self, now: Duration, rng: &mut impl Rng, events: &mut Vec<ArenaEvent>) {
        for side in [Side::Ai, Side::Player] {
            if self.snake(side).head() != Some(self.food) {
                continue;
            }

            let window = self.config.combo_window();
            let snake = self.snake_mut(side);
            snake.grow();
            if snake.has_effect(Effect::Growth) {
                snake.grow();
            }
            let bonus = snake.add_combo(now, window);
            let combo = snake.combo;

            match side {
                Side::Player => self.player_points += bonus,
                Side::Ai => self.ai_points += bonus,
            }
            events.push(ArenaEvent::FoodEaten { side, bonus });

            if combo >= self.config.combo_clone_threshold && !self.has_clone(side) {
                self.spawn_clone(side, now);
                events.push(ArenaEvent::CloneSpawned(side));
            }

            self.relocate_food(rng);
        }
    }

    fn spawn_clone(&mut self, side: Side, now: Duration) {
        let expires_at = now + self.config.clone_lifetime();
        let mut clone = self.snake(side).spawn_clone(side, expires_at);
        if !dash(self.grid, &mut clone, self.config.dash_distance) {
            debug!("{:?} clone dash blocked by wall", side);
        }
        info!("{:?} spawned a clone of length {}", side, clone.len());
        self.clones.push(clone);
    }

    fn teleport(&mut self, side: Side, events: &mut Vec<ArenaEvent>) {
        let Some(portals) = self.portals else {
            return;
        };
        let snake = self.snake_mut(side);
        let Some(exit) = snake.head().and_then(|head| portals.exit_for(head)) else {
            return;
        };
        snake.body[0] = exit;
        debug!("{:?} teleported to ({}, {})", side, exit.x, exit.y);
        events.push(ArenaEvent::Teleported(side));
    }

    fn relocate_food(&mut self, rng: &mut impl Rng) {
        let current = self.food;
        let free = random_free_cell(self.grid, |c| c == current || self.is_occupied(c), rng);
        match free {
            Some(cell) => self.food = cell,
            None => warn!("No free cell left for food"),
        }
    }
}
