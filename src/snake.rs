use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use crate::ai::Brain;
use crate::grid::{Cell, CellDelta, Direction};

/// Which main snake an entity belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }
}

/// Power-up types. The same tag marks the effect a snake carries after pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Speed,
    Shield,
    Ghost,
    Reverse,
    Freeze,
    Growth,
}

impl Effect {
    pub const ALL: [Effect; 6] = [
        Effect::Speed,
        Effect::Shield,
        Effect::Ghost,
        Effect::Reverse,
        Effect::Freeze,
        Effect::Growth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Effect::Speed => "Speed Boost",
            Effect::Shield => "Shield",
            Effect::Ghost => "Ghost Mode",
            Effect::Reverse => "Reverse",
            Effect::Freeze => "Freeze",
            Effect::Growth => "Growth",
        }
    }

    /// Reverse and freeze act on the opponent rather than the picker.
    pub fn targets_opponent(&self) -> bool {
        matches!(self, Effect::Reverse | Effect::Freeze)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedEffect {
    pub kind: Effect,
    pub expires_at: Duration,
}

/// Weak link from a clone back to the side that spawned it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloneLink {
    pub parent: Side,
    pub expires_at: Duration,
}

#[derive(Clone, Debug)]
pub struct Snake {
    /// Head first.
    pub body: VecDeque<Cell>,
    /// Direction of the last move.
    pub direction: Direction,
    /// Direction to use on the next move.
    pub next_direction: Direction,
    pub move_counter: u32,
    pub base_interval: u32,
    pub effect: Option<TimedEffect>,
    /// Imposed by an opponent's reverse pickup
    pub reversed_until: Option<Duration>,
    /// Imposed by an opponent's freeze pickup
    pub frozen_until: Option<Duration>,
    pub combo: u32,
    pub combo_until: Option<Duration>,
    pub difficulty: u8,
    /// Present for AI-controlled snakes and clones.
    pub brain: Option<Brain>,
    pub clone_of: Option<CloneLink>,
}

impl Snake {
    /// A snake whose body trails straight behind `head`, opposite to `direction`.
    pub fn new(head: Cell, direction: Direction, length: usize, base_interval: u32) -> Self {
        let back: CellDelta = direction.opposite().into();
        let body = (0..length.max(1) as i32)
            .map(|i| head.offset(back.scaled(i)))
            .collect();

        Snake {
            body,
            direction,
            next_direction: direction,
            move_counter: 0,
            base_interval: base_interval.max(1),
            effect: None,
            reversed_until: None,
            frozen_until: None,
            combo: 0,
            combo_until: None,
            difficulty: 1,
            brain: None,
            clone_of: None,
        }
    }

    pub fn with_brain(mut self, brain: Brain) -> Self {
        self.difficulty = brain.difficulty;
        self.brain = Some(brain);
        self
    }

    pub fn head(&self) -> Option<Cell> {
        self.body.front().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn is_ai(&self) -> bool {
        self.brain.is_some()
    }

    pub fn is_clone(&self) -> bool {
        self.clone_of.is_some()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn has_effect(&self, kind: Effect) -> bool {
        self.effect.is_some_and(|e| e.kind == kind)
    }

    pub fn is_ghost(&self) -> bool {
        self.has_effect(Effect::Ghost)
    }

    pub fn is_shielded(&self) -> bool {
        self.has_effect(Effect::Shield)
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed_until.is_some()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_until.is_some()
    }

    /// Ticks per move. Freeze overrides every other effect.
    pub fn move_interval(&self) -> u32 {
        if self.is_frozen() {
            self.base_interval * 2
        } else if self.has_effect(Effect::Speed) {
            ((self.base_interval as f64 / 1.25).floor() as u32).max(1)
        } else {
            self.base_interval
        }
    }

    /// Whether the next cadence tick will actually move this snake.
    pub fn is_due(&self) -> bool {
        (self.move_counter + 1) % self.move_interval() == 0
    }

    /// Direction the body will travel in, after any imposed reversal.
    pub fn effective_direction(&self) -> Direction {
        if self.is_reversed() {
            self.direction.opposite()
        } else {
            self.direction
        }
    }

    /// Record a directional intent, refusing an immediate 180° turn.
    pub fn steer(&mut self, new_direction: Direction) {
        if new_direction != self.direction.opposite() {
            self.next_direction = new_direction;
        }
    }

    /// Duplicate the tail cell; it separates from the tail on the next move.
    pub fn grow(&mut self) {
        if let Some(&tail) = self.body.back() {
            self.body.push_back(tail);
        }
    }

    pub fn activate(&mut self, kind: Effect, expires_at: Duration) {
        self.effect = Some(TimedEffect { kind, expires_at });
    }

    pub fn reverse_until(&mut self, until: Duration) {
        self.reversed_until = Some(until);
    }

    pub fn freeze_until(&mut self, until: Duration) {
        self.frozen_until = Some(until);
    }

    /// Drop every deadline that has passed. Returns the self effect that ended, if any.
    pub fn expire(&mut self, now: Duration) -> Option<Effect> {
        if self.reversed_until.is_some_and(|t| now >= t) {
            self.reversed_until = None;
        }
        if self.frozen_until.is_some_and(|t| now >= t) {
            self.frozen_until = None;
        }
        if self.combo_until.is_some_and(|t| now >= t) {
            self.combo = 0;
            self.combo_until = None;
        }
        match self.effect {
            Some(effect) if now >= effect.expires_at => {
                self.effect = None;
                Some(effect.kind)
            }
            _ => None,
        }
    }

    /// Bump the combo counter and push its deadline out. Returns the bonus points.
    pub fn add_combo(&mut self, now: Duration, window: Duration) -> u32 {
        self.combo += 1;
        self.combo_until = Some(now + window);
        self.combo * 10
    }

    /// A standalone copy of this body that lives until `expires_at`.
    pub fn spawn_clone(&self, parent: Side, expires_at: Duration) -> Snake {
        Snake {
            body: self.body.clone(),
            direction: self.direction,
            next_direction: self.direction,
            move_counter: 0,
            base_interval: self.base_interval,
            effect: None,
            reversed_until: None,
            frozen_until: None,
            combo: 0,
            combo_until: None,
            difficulty: 3,
            brain: Some(Brain::standard(3)),
            clone_of: Some(CloneLink { parent, expires_at }),
        }
    }
}
