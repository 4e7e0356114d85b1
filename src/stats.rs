use log::info;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::outcome::{RoundResult, Verdict};
use crate::snake::Effect;

/// Rounds needed before the AI difficulty starts to adapt.
const ADAPT_AFTER: u32 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scores {
    pub wins: u32,
    pub losses: u32,
}

/// Pickups per power-up type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpCounts {
    pub speed: u32,
    pub shield: u32,
    pub ghost: u32,
    pub reverse: u32,
    pub freeze: u32,
    pub growth: u32,
}

impl PowerUpCounts {
    pub fn get(&self, kind: Effect) -> u32 {
        match kind {
            Effect::Speed => self.speed,
            Effect::Shield => self.shield,
            Effect::Ghost => self.ghost,
            Effect::Reverse => self.reverse,
            Effect::Freeze => self.freeze,
            Effect::Growth => self.growth,
        }
    }

    pub fn record(&mut self, kind: Effect) {
        let count = match kind {
            Effect::Speed => &mut self.speed,
            Effect::Shield => &mut self.shield,
            Effect::Ghost => &mut self.ghost,
            Effect::Reverse => &mut self.reverse,
            Effect::Freeze => &mut self.freeze,
            Effect::Growth => &mut self.growth,
        };
        *count += 1;
    }

    pub fn total(&self) -> u32 {
        Effect::ALL.iter().map(|&kind| self.get(kind)).sum()
    }

    /// Every type picked up at least once.
    pub fn has_every_kind(&self) -> bool {
        Effect::ALL.iter().all(|&kind| self.get(kind) > 0)
    }
}

/// Lifetime power-up record, persisted between runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpStats {
    #[serde(flatten)]
    pub counts: PowerUpCounts,
    pub total: u32,
    /// Seconds
    #[serde(rename = "shieldTime")]
    pub shield_time: f64,
}

impl PowerUpStats {
    pub fn record(&mut self, kind: Effect) {
        self.counts.record(kind);
        self.total += 1;
    }

    pub fn add_shield_time(&mut self, time: Duration) {
        self.shield_time += time.as_secs_f64();
    }
}

/// Read-only view of everything titles are judged on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatsSnapshot {
    pub scores: Scores,
    pub power_ups: PowerUpStats,
    pub session_power_ups: PowerUpCounts,
    pub round_power_ups: PowerUpCounts,
    pub survival_secs: f64,
    pub win_streak: u32,
    pub devour_count: u32,
    pub difficulty: u8,
    pub player_length: usize,
}

/// Bookkeeping that lives for one run of the program.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub player_wins: u32,
    pub ai_wins: u32,
    pub win_streak: u32,
    pub devour_count: u32,
    pub difficulty: u8,
    pub session_power_ups: PowerUpCounts,
    pub round_power_ups: PowerUpCounts,
}

impl Session {
    pub fn new(difficulty: u8) -> Self {
        Session {
            player_wins: 0,
            ai_wins: 0,
            win_streak: 0,
            devour_count: 0,
            difficulty: difficulty.clamp(1, 5),
            session_power_ups: PowerUpCounts::default(),
            round_power_ups: PowerUpCounts::default(),
        }
    }

    pub fn start_round(&mut self) {
        self.round_power_ups = PowerUpCounts::default();
    }

    /// A pickup by the human player.
    pub fn record_power_up(&mut self, kind: Effect, lifetime: &mut PowerUpStats) {
        self.session_power_ups.record(kind);
        self.round_power_ups.record(kind);
        lifetime.record(kind);
    }

    /// Apply a finished round to the session and the persisted scores.
    /// Draws change nothing.
    pub fn record_result(&mut self, result: &RoundResult, scores: &mut Scores) {
        match result.verdict {
            Verdict::PlayerWins => {
                scores.wins += 1;
                self.player_wins += 1;
                self.win_streak += 1;
                if result.is_devour_win() {
                    self.devour_count += 1;
                }
            }
            Verdict::AiWins => {
                scores.losses += 1;
                self.ai_wins += 1;
                self.win_streak = 0;
            }
            Verdict::Draw => {}
        }
    }

    /// Nudge the AI difficulty toward the player's level once enough
    /// rounds have been decided. Returns the new level if it changed.
    pub fn adapt_difficulty(&mut self) -> Option<u8> {
        let played = self.player_wins + self.ai_wins;
        if played < ADAPT_AFTER {
            return None;
        }

        let win_rate = self.player_wins as f64 / played as f64;
        let adjusted = if win_rate > 0.7 {
            (self.difficulty + 1).min(5)
        } else if win_rate < 0.3 {
            self.difficulty.saturating_sub(1).max(1)
        } else {
            self.difficulty
        };

        if adjusted == self.difficulty {
            return None;
        }
        info!(
            "AI difficulty {} -> {} (player win rate {:.2})",
            self.difficulty, adjusted, win_rate
        );
        self.difficulty = adjusted;
        Some(adjusted)
    }

    pub fn snapshot(
        &self,
        scores: Scores,
        power_ups: PowerUpStats,
        survival: Duration,
        player_length: usize,
    ) -> StatsSnapshot {
        StatsSnapshot {
            scores,
            power_ups,
            session_power_ups: self.session_power_ups,
            round_power_ups: self.round_power_ups,
            survival_secs: survival.as_secs_f64(),
            win_streak: self.win_streak,
            devour_count: self.devour_count,
            difficulty: self.difficulty,
            player_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::movement::MoveOutcome;
    use crate::outcome::Cause;

    fn result(verdict: Verdict, cause: Cause) -> RoundResult {
        RoundResult {
            verdict,
            cause,
            player: MoveOutcome::Continue,
            ai: MoveOutcome::HitOtherSnake(Cell::new(7, 7)),
        }
    }

    #[test]
    fn test_counts_by_kind() {
        let mut counts = PowerUpCounts::default();
        counts.record(Effect::Ghost);
        counts.record(Effect::Ghost);
        counts.record(Effect::Freeze);
        assert_eq!(counts.get(Effect::Ghost), 2);
        assert_eq!(counts.get(Effect::Speed), 0);
        assert_eq!(counts.total(), 3);
        assert!(!counts.has_every_kind());

        for kind in Effect::ALL {
            counts.record(kind);
        }
        assert!(counts.has_every_kind());
    }

    #[test]
    fn test_power_up_stats_json_layout() {
        let mut stats = PowerUpStats::default();
        stats.record(Effect::Shield);
        stats.add_shield_time(Duration::from_millis(2_500));

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["shield"], 1);
        assert_eq!(json["total"], 1);
        assert_eq!(json["shieldTime"], 2.5);

        // Records written with fewer fields still load
        let partial: PowerUpStats = serde_json::from_str(r#"{"speed": 4}"#).unwrap();
        assert_eq!(partial.counts.speed, 4);
        assert_eq!(partial.total, 0);
    }

    #[test]
    fn test_record_result() {
        let mut session = Session::new(1);
        let mut scores = Scores::default();

        session.record_result(&result(Verdict::PlayerWins, Cause::Devoured), &mut scores);
        session.record_result(&result(Verdict::PlayerWins, Cause::WallOrSelf), &mut scores);
        assert_eq!(scores, Scores { wins: 2, losses: 0 });
        assert_eq!(session.win_streak, 2);
        assert_eq!(session.devour_count, 1);

        // A draw leaves everything alone
        session.record_result(&result(Verdict::Draw, Cause::Tie), &mut scores);
        assert_eq!(scores, Scores { wins: 2, losses: 0 });
        assert_eq!(session.win_streak, 2);

        session.record_result(&result(Verdict::AiWins, Cause::Devoured), &mut scores);
        assert_eq!(scores, Scores { wins: 2, losses: 1 });
        assert_eq!(session.win_streak, 0);
        assert_eq!(session.ai_wins, 1);
    }

    #[test]
    fn test_adapt_difficulty() {
        let mut session = Session::new(3);
        session.player_wins = 2;
        assert_eq!(session.adapt_difficulty(), None);

        session.player_wins = 3;
        assert_eq!(session.adapt_difficulty(), Some(4));
        session.player_wins = 8;
        assert_eq!(session.adapt_difficulty(), Some(5));
        assert_eq!(session.adapt_difficulty(), None);

        // Balanced record holds steady
        session.ai_wins = 8;
        assert_eq!(session.adapt_difficulty(), None);

        session.ai_wins = 30;
        assert_eq!(session.adapt_difficulty(), Some(4));
    }

    #[test]
    fn test_difficulty_floor() {
        let mut session = Session::new(1);
        session.ai_wins = 5;
        assert_eq!(session.adapt_difficulty(), None);
        assert_eq!(session.difficulty, 1);
    }

    #[test]
    fn test_round_counts_reset() {
        let mut session = Session::new(1);
        let mut lifetime = PowerUpStats::default();
        session.record_power_up(Effect::Speed, &mut lifetime);
        session.start_round();
        session.record_power_up(Effect::Speed, &mut lifetime);

        assert_eq!(session.round_power_ups.speed, 1);
        assert_eq!(session.session_power_ups.speed, 2);
        assert_eq!(lifetime.counts.speed, 2);
        assert_eq!(lifetime.total, 2);

        let snapshot = session.snapshot(Scores::default(), lifetime, Duration::from_secs(3), 7);
        assert_eq!(snapshot.survival_secs, 3.0);
        assert_eq!(snapshot.player_length, 7);
        assert_eq!(snapshot.power_ups.total, 2);
    }
}
