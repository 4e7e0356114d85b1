//! Heuristic move selection for AI snakes and clones.
//!
//! Every candidate direction is scored one step ahead as a weighted sum of
//! independent terms: food seeking, opponent chase/flee, reachable space,
//! nearby power-ups, wall clearance and a little noise. Snakes whose brain
//! has intercept mode enabled first try to cut off the opponent's projected
//! path whenever they are sufficiently longer.

use log::debug;
use rand::Rng;
use std::collections::{HashSet, VecDeque};

use crate::grid::{Cell, Direction, Grid};
use crate::items::PowerUp;
use crate::snake::{Effect, Snake};

/// Upper bound on cells visited by the space flood fill.
pub const FLOOD_FILL_CAP: usize = 100;
/// Power-ups closer than this (Manhattan) attract the AI.
pub const POWER_UP_RANGE: i32 = 5;
/// Size advantage from which the AI turns aggressive.
pub const AGGRESSIVE_ADVANTAGE: i32 = 2;

const SPACE_WEIGHT: f64 = 2.0;
const POWER_UP_WEIGHT: f64 = 4.0;

const PREDICTION_STEPS: usize = 5;
const INTERCEPT_BASE: f64 = 100.0;
const INTERCEPT_DISTANCE_WEIGHT: f64 = 10.0;
const INTERCEPT_EARLY_WEIGHT: f64 = 15.0;
const TRAP_BONUS: f64 = 50.0;
const ESCAPE_BLOCK_BONUS: f64 = 30.0;

/// Read-only slice of the arena the AI looks at.
#[derive(Clone, Copy, Debug)]
pub struct ArenaView<'a> {
    pub grid: Grid,
    pub food: Cell,
    pub power_ups: &'a [PowerUp],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Personality {
    pub pursuit_threshold: f64,
    pub power_up_priority: f64,
    pub risk_tolerance: f64,
}

impl Personality {
    pub const AGGRESSIVE: Personality = Personality {
        pursuit_threshold: 0.7,
        power_up_priority: 0.3,
        risk_tolerance: 0.8,
    };
    pub const CAUTIOUS: Personality = Personality {
        pursuit_threshold: 0.3,
        power_up_priority: 0.6,
        risk_tolerance: 0.2,
    };
    pub const BALANCED: Personality = Personality {
        pursuit_threshold: 0.5,
        power_up_priority: 0.5,
        risk_tolerance: 0.5,
    };
    pub const OPPORTUNIST: Personality = Personality {
        pursuit_threshold: 0.4,
        power_up_priority: 0.8,
        risk_tolerance: 0.6,
    };

    pub fn for_difficulty(difficulty: u8) -> Personality {
        let index = ((difficulty.max(1) - 1) as f64 / 1.25).floor() as usize;
        match index {
            0 => Personality::AGGRESSIVE,
            1 => Personality::CAUTIOUS,
            2 => Personality::BALANCED,
            3 => Personality::OPPORTUNIST,
            _ => Personality::BALANCED,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    Seeking,
    Hunting,
}

/// Per-snake AI parameters and behaviour state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Brain {
    pub difficulty: u8,
    /// Try to cut off the opponent when ahead in size
    pub intercept: bool,
    pub personality: Personality,
    pub behavior: Behavior,
    /// Appetite for power-ups in the current behaviour state. Reported in
    /// behaviour logs; move scoring uses the fixed per-type weights instead.
    pub power_up_priority: f64,
    pub aggression_threshold: i32,
    pub hunting_range: i32,
    pub intercept_distance: i32,
}

impl Brain {
    pub fn standard(difficulty: u8) -> Self {
        let difficulty = difficulty.clamp(1, 5);
        let personality = Personality::for_difficulty(difficulty);
        Brain {
            difficulty,
            intercept: false,
            personality,
            behavior: Behavior::Seeking,
            power_up_priority: personality.power_up_priority,
            aggression_threshold: AGGRESSIVE_ADVANTAGE,
            hunting_range: 15,
            intercept_distance: 5,
        }
    }

    pub fn advanced(difficulty: u8) -> Self {
        Brain {
            intercept: true,
            power_up_priority: 0.8,
            ..Brain::standard(difficulty)
        }
    }

    /// Move between seeking and hunting. Pursuit threshold stretches the
    /// hunting range; risk tolerance lets an evenly matched AI hunt at close range.
    pub fn update_behavior(&mut self, size_advantage: i32, distance: i32) {
        let reach =
            (self.hunting_range as f64 * (0.5 + self.personality.pursuit_threshold)).round() as i32;

        let (behavior, priority) = if size_advantage >= self.aggression_threshold {
            if distance < reach {
                (Behavior::Hunting, 0.3)
            } else {
                (Behavior::Seeking, 0.6)
            }
        } else if size_advantage >= 0
            && distance <= self.intercept_distance
            && self.personality.risk_tolerance >= 0.6
        {
            (Behavior::Hunting, self.personality.power_up_priority * 0.5)
        } else {
            (Behavior::Seeking, self.personality.power_up_priority)
        };

        if behavior != self.behavior {
            debug!(
                "AI behaviour {:?} -> {:?} (advantage {}, distance {}, power-up priority {:.2})",
                self.behavior, behavior, size_advantage, distance, priority
            );
        }
        self.behavior = behavior;
        self.power_up_priority = priority;
    }
}

/// Scoring regime picked from the size advantage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regime {
    Aggressive,
    Defensive,
    Balanced,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegimeWeights {
    /// Multiplies the reduction in distance to food
    pub food: f64,
    /// Multiplies the reduction in distance to the opponent's head; negative flees
    pub chase: f64,
}

impl Regime {
    pub fn from_size_advantage(advantage: i32) -> Regime {
        if advantage >= AGGRESSIVE_ADVANTAGE {
            Regime::Aggressive
        } else if advantage < 0 {
            Regime::Defensive
        } else {
            Regime::Balanced
        }
    }

    pub fn weights(&self) -> RegimeWeights {
        match self {
            Regime::Aggressive => RegimeWeights {
                food: 1.0,
                chase: 3.0,
            },
            Regime::Defensive => RegimeWeights {
                food: 3.0,
                chase: -2.0,
            },
            Regime::Balanced => RegimeWeights {
                food: 2.0,
                chase: -0.5,
            },
        }
    }
}

pub fn power_up_weight(kind: Effect) -> f64 {
    match kind {
        Effect::Shield => 6.0,
        Effect::Speed => 5.0,
        Effect::Ghost | Effect::Reverse => 4.0,
        Effect::Freeze => 3.0,
        Effect::Growth => 0.0,
    }
}

pub fn size_advantage(snake: &Snake, opponent: Option<&Snake>) -> i32 {
    opponent.map_or(0, |o| snake.len() as i32 - o.len() as i32)
}

/// Directions the snake can take next tick without dying immediately,
/// paired with the cell each leads to.
pub fn candidate_moves(grid: Grid, snake: &Snake, opponent: Option<&Snake>) -> Vec<(Direction, Cell)> {
    let Some(head) = snake.head() else {
        return Vec::new();
    };

    Direction::ALL
        .into_iter()
        .filter(|&dir| dir != snake.direction.opposite())
        .filter_map(|dir| {
            let mut next = head.offset(dir.into());
            if snake.is_ghost() {
                next = grid.wrap(next);
            } else if !grid.contains(next) {
                return None;
            }
            if snake.body.iter().skip(1).any(|&c| c == next) {
                return None;
            }
            if !snake.is_shielded() && opponent.is_some_and(|o| o.occupies(next)) {
                return None;
            }
            Some((dir, next))
        })
        .collect()
}

/// Breadth-first count of open cells reachable from `start`, stopping at
/// [`FLOOD_FILL_CAP`]. The start cell always counts.
pub fn flood_fill(grid: Grid, start: Cell, blocked: impl Fn(Cell) -> bool) -> usize {
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    let mut count = 0;

    while let Some(cell) = queue.pop_front() {
        count += 1;
        if count >= FLOOD_FILL_CAP {
            break;
        }
        for next in cell.neighbours() {
            if grid.contains(next) && !blocked(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    count
}

pub fn reachable_space(grid: Grid, start: Cell, snake: &Snake, opponent: Option<&Snake>) -> usize {
    flood_fill(grid, start, |c| {
        snake.occupies(c) || opponent.is_some_and(|o| o.occupies(c))
    })
}

/// Attraction of power-ups within [`POWER_UP_RANGE`] of `cell`.
pub fn power_up_bonus(cell: Cell, power_ups: &[PowerUp]) -> f64 {
    power_ups
        .iter()
        .filter_map(|p| {
            let distance = cell.manhattan(p.cell);
            (distance < POWER_UP_RANGE).then(|| power_up_weight(p.kind) / (distance + 1) as f64)
        })
        .sum()
}

/// Heuristic value of moving the head from `head` to `next`.
pub fn score_move(
    view: &ArenaView,
    snake: &Snake,
    opponent: Option<&Snake>,
    head: Cell,
    next: Cell,
    rng: &mut impl Rng,
) -> f64 {
    let advantage = size_advantage(snake, opponent);
    let weights = Regime::from_size_advantage(advantage).weights();

    let mut score = (head.manhattan(view.food) - next.manhattan(view.food)) as f64 * weights.food;

    if let Some(target) = opponent.and_then(|o| o.head()) {
        score += (head.manhattan(target) - next.manhattan(target)) as f64 * weights.chase;
    }

    score += reachable_space(view.grid, next, snake, opponent) as f64 * SPACE_WEIGHT;
    score += power_up_bonus(next, view.power_ups) * POWER_UP_WEIGHT;

    // Stay off the walls unless clearly the bigger snake
    if advantage < AGGRESSIVE_ADVANTAGE {
        score += view.grid.wall_distance(next) as f64;
    }

    score + rng.gen::<f64>() * snake.difficulty as f64
}

/// Where the opponent's head will be over the next `steps` ticks if it keeps going straight.
pub fn predict_path(opponent: &Snake, steps: usize) -> Vec<Cell> {
    let Some(mut cell) = opponent.head() else {
        return Vec::new();
    };
    let delta = opponent.effective_direction().into();
    (0..steps)
        .map(|_| {
            cell = cell.offset(delta);
            cell
        })
        .collect()
}

/// Two or more of the opponent's four escape cells are covered by our body.
pub fn blocks_escape_routes(snake: &Snake, opponent_head: Cell) -> bool {
    opponent_head
        .neighbours()
        .iter()
        .filter(|&&c| snake.occupies(c))
        .count()
        >= 2
}

/// Best candidate for cutting off the opponent's projected path, if any scores positively.
pub fn intercept_move(
    grid: Grid,
    snake: &Snake,
    opponent: &Snake,
    candidates: &[(Direction, Cell)],
) -> Option<Direction> {
    let target = opponent.head()?;
    let predicted = predict_path(opponent, PREDICTION_STEPS);

    let mut situational = 0.0;
    if grid.near_wall(target) {
        situational += TRAP_BONUS;
    }
    if blocks_escape_routes(snake, target) {
        situational += ESCAPE_BLOCK_BONUS;
    }

    let mut best = None;
    let mut best_score = f64::NEG_INFINITY;
    for &(dir, next) in candidates {
        for (step, &point) in predicted.iter().enumerate() {
            let score = INTERCEPT_BASE - next.manhattan(point) as f64 * INTERCEPT_DISTANCE_WEIGHT
                + (PREDICTION_STEPS - step) as f64 * INTERCEPT_EARLY_WEIGHT
                + situational;
            if score > best_score {
                best_score = score;
                best = Some(dir);
            }
        }
    }

    best.filter(|_| best_score > 0.0)
}

/// Pick the next direction for an AI-driven snake. Falls back to the
/// current direction when every move is fatal.
pub fn choose_direction(
    view: &ArenaView,
    snake: &Snake,
    opponent: Option<&Snake>,
    rng: &mut impl Rng,
) -> Direction {
    let Some(head) = snake.head() else {
        return snake.direction;
    };

    let candidates = candidate_moves(view.grid, snake, opponent);
    if candidates.is_empty() {
        return snake.direction;
    }

    if let (Some(brain), Some(opponent)) = (&snake.brain, opponent) {
        if brain.intercept && size_advantage(snake, Some(opponent)) >= brain.aggression_threshold {
            if let Some(dir) = intercept_move(view.grid, snake, opponent, &candidates) {
                return dir;
            }
        }
    }

    let mut best = candidates[0].0;
    let mut best_score = f64::NEG_INFINITY;
    for &(dir, next) in &candidates {
        let score = score_move(view, snake, opponent, head, next, rng);
        if score > best_score {
            best_score = score;
            best = dir;
        }
    }
    best
}

/// Refresh the snake's behaviour state against its opponent.
pub fn update_behavior(snake: &mut Snake, opponent: &Snake) {
    let (Some(head), Some(target)) = (snake.head(), opponent.head()) else {
        return;
    };
    let advantage = size_advantage(snake, Some(opponent));
    if let Some(brain) = snake.brain.as_mut() {
        brain.update_behavior(advantage, head.manhattan(target));
    }
}
