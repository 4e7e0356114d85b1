use crate::grid::{Cell, CellDelta, Direction, Grid};
use crate::snake::Snake;

/// Result of one cadence tick for one snake. Collision variants carry the
/// cell the head tried to enter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Continue,
    HitWallOrSelf(Cell),
    HitOtherSnake(Cell),
}

impl MoveOutcome {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MoveOutcome::Continue)
    }
}

/// Advance the cadence counter and, when it reaches the snake's move
/// interval, move one cell toward `intended`.
///
/// Collisions leave the body untouched. Body length never changes here;
/// growth goes through [`Snake::grow`].
pub fn advance(
    grid: Grid,
    snake: &mut Snake,
    intended: Direction,
    opponent: Option<&Snake>,
) -> MoveOutcome {
    let Some(head) = snake.head() else {
        // Nothing left to move
        return MoveOutcome::HitWallOrSelf(Cell::new(-1, -1));
    };

    snake.move_counter += 1;
    if snake.move_counter % snake.move_interval() != 0 {
        return MoveOutcome::Continue;
    }

    if intended != snake.direction.opposite() {
        snake.direction = intended;
    }
    snake.next_direction = snake.direction;

    let ghost = snake.is_ghost();
    let mut new_head = head.offset(snake.effective_direction().into());

    if ghost {
        new_head = grid.wrap(new_head);
    } else if !grid.contains(new_head) || hits_own_body(snake, new_head) {
        return MoveOutcome::HitWallOrSelf(new_head);
    }

    if !ghost && !snake.is_shielded() {
        if let Some(other) = opponent {
            if other.occupies(new_head) {
                return MoveOutcome::HitOtherSnake(new_head);
            }
        }
    }

    snake.body.push_front(new_head);
    snake.body.pop_back();
    MoveOutcome::Continue
}

/// Every segment except the tail, which vacates in the same step.
fn hits_own_body(snake: &Snake, cell: Cell) -> bool {
    let keep = snake.body.len().saturating_sub(1);
    snake.body.iter().take(keep).any(|&c| c == cell)
}

/// Jump the head `distance` cells along the current direction in one step,
/// ignoring the cadence counter, and drop `distance` cells from the tail.
///
/// Returns `false` and leaves the snake alone when a non-ghost dash would
/// leave the grid.
pub fn dash(grid: Grid, snake: &mut Snake, distance: i32) -> bool {
    let Some(head) = snake.head() else {
        return false;
    };

    let delta: CellDelta = snake.direction.into();
    let mut new_head = head.offset(delta.scaled(distance));
    if snake.is_ghost() {
        new_head = grid.wrap(new_head);
    } else if !grid.contains(new_head) {
        return false;
    }

    snake.body.push_front(new_head);
    let keep = snake.body.len().saturating_sub(distance.max(0) as usize).max(1);
    snake.body.truncate(keep);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Effect;
    use std::collections::VecDeque;
    use std::time::Duration;

    fn snake_at(cells: &[(i32, i32)], direction: Direction) -> Snake {
        let mut snake = Snake::new(Cell::new(0, 0), direction, 1, 1);
        snake.body = cells.iter().map(|&(x, y)| Cell::new(x, y)).collect();
        snake
    }

    fn body(cells: &[(i32, i32)]) -> VecDeque<Cell> {
        cells.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    #[test]
    fn test_basic_step() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(5, 5), (4, 5), (3, 5)], Direction::East);

        let outcome = advance(grid, &mut snake, Direction::East, None);
        assert_eq!(outcome, MoveOutcome::Continue);
        assert_eq!(snake.body, body(&[(6, 5), (5, 5), (4, 5)]));
    }

    #[test]
    fn test_cadence_gates_movement() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(5, 5), (4, 5), (3, 5)], Direction::East);
        snake.base_interval = 3;

        for _ in 0..2 {
            assert_eq!(advance(grid, &mut snake, Direction::East, None), MoveOutcome::Continue);
            assert_eq!(snake.head(), Some(Cell::new(5, 5)));
        }
        advance(grid, &mut snake, Direction::East, None);
        assert_eq!(snake.head(), Some(Cell::new(6, 5)));
    }

    #[test]
    fn test_freeze_forces_slow_interval() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(5, 5), (4, 5)], Direction::East);
        snake.base_interval = 2;
        snake.activate(Effect::Speed, Duration::from_secs(5));
        snake.freeze_until(Duration::from_secs(5));

        for _ in 0..3 {
            advance(grid, &mut snake, Direction::East, None);
        }
        assert_eq!(snake.head(), Some(Cell::new(5, 5)));
        advance(grid, &mut snake, Direction::East, None);
        assert_eq!(snake.head(), Some(Cell::new(6, 5)));
    }

    #[test]
    fn test_reversal_intent_ignored() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(5, 5), (4, 5), (3, 5)], Direction::East);

        let outcome = advance(grid, &mut snake, Direction::West, None);
        assert_eq!(outcome, MoveOutcome::Continue);
        assert_eq!(snake.direction, Direction::East);
        assert_eq!(snake.head(), Some(Cell::new(6, 5)));
    }

    #[test]
    fn test_wall_collision() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(9, 5), (8, 5), (7, 5)], Direction::East);

        let outcome = advance(grid, &mut snake, Direction::East, None);
        assert_eq!(outcome, MoveOutcome::HitWallOrSelf(Cell::new(10, 5)));
        // Body untouched on collision
        assert_eq!(snake.body, body(&[(9, 5), (8, 5), (7, 5)]));
    }

    #[test]
    fn test_self_collision() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(5, 5), (5, 6), (4, 6), (4, 5), (4, 4)], Direction::North);

        let outcome = advance(grid, &mut snake, Direction::West, None);
        assert_eq!(outcome, MoveOutcome::HitWallOrSelf(Cell::new(4, 5)));
    }

    #[test]
    fn test_tail_cell_is_free() {
        let grid = Grid::new(10, 10);
        // Square loop; the head chases its own tail
        let mut snake = snake_at(&[(5, 5), (5, 6), (4, 6), (4, 5)], Direction::North);

        let outcome = advance(grid, &mut snake, Direction::West, None);
        assert_eq!(outcome, MoveOutcome::Continue);
        assert_eq!(snake.head(), Some(Cell::new(4, 5)));
        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn test_grown_tail_is_not_free() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(5, 5), (5, 6), (4, 6), (4, 5)], Direction::North);
        snake.grow();

        let outcome = advance(grid, &mut snake, Direction::West, None);
        assert_eq!(outcome, MoveOutcome::HitWallOrSelf(Cell::new(4, 5)));
    }

    #[test]
    fn test_other_snake_collision() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(5, 5), (4, 5), (3, 5)], Direction::East);
        let other = snake_at(&[(6, 3), (6, 4), (6, 5), (6, 6)], Direction::North);

        let outcome = advance(grid, &mut snake, Direction::East, Some(&other));
        assert_eq!(outcome, MoveOutcome::HitOtherSnake(Cell::new(6, 5)));
        assert_eq!(snake.head(), Some(Cell::new(5, 5)));
    }

    #[test]
    fn test_shield_passes_through_other_snake() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(5, 5), (4, 5), (3, 5)], Direction::East);
        snake.activate(Effect::Shield, Duration::from_secs(5));
        let other = snake_at(&[(6, 3), (6, 4), (6, 5), (6, 6)], Direction::North);

        let outcome = advance(grid, &mut snake, Direction::East, Some(&other));
        assert_eq!(outcome, MoveOutcome::Continue);
        assert_eq!(snake.head(), Some(Cell::new(6, 5)));

        // Shield does not help against walls
        let mut snake = snake_at(&[(9, 5), (8, 5)], Direction::East);
        snake.activate(Effect::Shield, Duration::from_secs(5));
        assert!(advance(grid, &mut snake, Direction::East, None).is_fatal());
    }

    #[test]
    fn test_ghost_wraps() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(0, 5), (1, 5), (2, 5)], Direction::West);
        snake.activate(Effect::Ghost, Duration::from_secs(5));

        let outcome = advance(grid, &mut snake, Direction::West, None);
        assert_eq!(outcome, MoveOutcome::Continue);
        assert_eq!(snake.head(), Some(Cell::new(9, 5)));
    }

    #[test]
    fn test_ghost_ignores_bodies() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(5, 5), (5, 6), (4, 6), (4, 5), (4, 4)], Direction::North);
        snake.activate(Effect::Ghost, Duration::from_secs(5));
        let other = snake_at(&[(5, 4), (6, 4)], Direction::West);

        assert_eq!(
            advance(grid, &mut snake, Direction::North, Some(&other)),
            MoveOutcome::Continue
        );
        assert_eq!(snake.head(), Some(Cell::new(5, 4)));
    }

    #[test]
    fn test_reverse_inverts_movement() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(5, 5)], Direction::East);
        snake.reverse_until(Duration::from_secs(2));

        advance(grid, &mut snake, Direction::East, None);
        assert_eq!(snake.head(), Some(Cell::new(4, 5)));
        assert_eq!(snake.direction, Direction::East);

        snake.expire(Duration::from_secs(2));
        advance(grid, &mut snake, Direction::East, None);
        assert_eq!(snake.head(), Some(Cell::new(5, 5)));
    }

    #[test]
    fn test_non_ghost_head_stays_in_bounds() {
        let grid = Grid::new(6, 4);
        for start in grid.cells() {
            for dir in Direction::ALL {
                let mut snake = snake_at(&[(start.x, start.y)], dir);
                let outcome = advance(grid, &mut snake, dir, None);
                let head = snake.head().unwrap();
                assert!(grid.contains(head));
                if !grid.contains(start.offset(dir.into())) {
                    assert!(outcome.is_fatal());
                }
            }
        }
    }

    #[test]
    fn test_length_unchanged_by_advance() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(2, 2), (1, 2), (0, 2)], Direction::East);
        let turns = [Direction::East, Direction::South, Direction::South, Direction::West];
        for dir in turns {
            advance(grid, &mut snake, dir, None);
            assert_eq!(snake.len(), 3);
        }
    }

    #[test]
    fn test_empty_body_is_fatal() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[], Direction::East);
        assert!(advance(grid, &mut snake, Direction::East, None).is_fatal());
    }

    #[test]
    fn test_dash() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(5, 5), (4, 5), (3, 5), (2, 5)], Direction::East);

        assert!(dash(grid, &mut snake, 2));
        assert_eq!(snake.body, body(&[(7, 5), (5, 5), (4, 5)]));
    }

    #[test]
    fn test_dash_rejected_at_wall() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(8, 5), (7, 5), (6, 5)], Direction::East);

        assert!(!dash(grid, &mut snake, 2));
        assert_eq!(snake.body, body(&[(8, 5), (7, 5), (6, 5)]));
    }

    #[test]
    fn test_ghost_dash_wraps() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(9, 5), (8, 5), (7, 5)], Direction::East);
        snake.activate(Effect::Ghost, Duration::from_secs(5));

        assert!(dash(grid, &mut snake, 2));
        assert_eq!(snake.head(), Some(Cell::new(1, 5)));
        assert_eq!(snake.len(), 2);
    }

    #[test]
    fn test_dash_keeps_a_head() {
        let grid = Grid::new(10, 10);
        let mut snake = snake_at(&[(5, 5)], Direction::South);

        assert!(dash(grid, &mut snake, 2));
        assert_eq!(snake.body, body(&[(5, 7)]));
    }
}
