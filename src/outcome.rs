use std::fmt;

use crate::movement::MoveOutcome;
use crate::snake::Snake;

/// Why a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cause {
    /// A snake ran into a wall or its own body
    WallOrSelf,
    /// A snake's head met the other snake and the longer one won
    Devoured,
    /// The snakes met with equal length
    Tie,
    /// The player gave up the round
    Forfeit,
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cause::WallOrSelf => "self",
            Cause::Devoured => "snake",
            Cause::Tie => "tie",
            Cause::Forfeit => "forfeit",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    PlayerWins,
    AiWins,
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundResult {
    pub verdict: Verdict,
    pub cause: Cause,
    /// What each main snake reported on the final tick
    pub player: MoveOutcome,
    pub ai: MoveOutcome,
}

impl RoundResult {
    /// The player quit mid-round; counts as a loss.
    pub fn forfeit() -> Self {
        RoundResult {
            verdict: Verdict::AiWins,
            cause: Cause::Forfeit,
            player: MoveOutcome::Continue,
            ai: MoveOutcome::Continue,
        }
    }

    pub fn message(&self, player_name: &str) -> String {
        match (self.verdict, self.cause) {
            (Verdict::Draw, Cause::WallOrSelf) => "Both snakes crashed! No winner.".to_string(),
            (Verdict::Draw, _) => "Tie! Both snakes collided with equal size!".to_string(),
            (_, Cause::Forfeit) => "You forfeited the round.".to_string(),
            (Verdict::AiWins, Cause::WallOrSelf) => {
                "You lost by hitting the wall or yourself!".to_string()
            }
            (Verdict::AiWins, _) => "You got devoured by the AI!".to_string(),
            (Verdict::PlayerWins, Cause::WallOrSelf) => {
                format!("{} wins! AI hit the wall or itself!", player_name)
            }
            (Verdict::PlayerWins, _) => format!("{} wins by devouring the AI!", player_name),
        }
    }

    /// Player won by eating the AI.
    pub fn is_devour_win(&self) -> bool {
        self.verdict == Verdict::PlayerWins && self.cause == Cause::Devoured
    }
}

fn by_length(player: &Snake, ai: &Snake) -> (Verdict, Cause) {
    match player.len().cmp(&ai.len()) {
        std::cmp::Ordering::Greater => (Verdict::PlayerWins, Cause::Devoured),
        std::cmp::Ordering::Less => (Verdict::AiWins, Cause::Devoured),
        std::cmp::Ordering::Equal => (Verdict::Draw, Cause::Tie),
    }
}

/// Turn both main snakes' outcomes for a tick into a round result.
/// Returns `None` while both can continue.
///
/// Wall and self hits decide first; a double fault is a draw. Otherwise
/// the snakes made contact and the longer body wins, equal lengths tie.
pub fn classify(
    player: &Snake,
    player_outcome: MoveOutcome,
    ai: &Snake,
    ai_outcome: MoveOutcome,
) -> Option<RoundResult> {
    let (verdict, cause) = match (player_outcome, ai_outcome) {
        (MoveOutcome::Continue, MoveOutcome::Continue) => return None,
        (MoveOutcome::HitWallOrSelf(_), MoveOutcome::HitWallOrSelf(_)) => {
            (Verdict::Draw, Cause::WallOrSelf)
        }
        (MoveOutcome::HitWallOrSelf(_), _) => (Verdict::AiWins, Cause::WallOrSelf),
        (_, MoveOutcome::HitWallOrSelf(_)) => (Verdict::PlayerWins, Cause::WallOrSelf),
        // Head-on or head into body, the shorter snake is eaten either way
        _ => by_length(player, ai),
    };

    Some(RoundResult {
        verdict,
        cause,
        player: player_outcome,
        ai: ai_outcome,
    })
}
