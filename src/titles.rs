use crate::stats::StatsSnapshot;

/// A title and the rule for earning it.
#[derive(Clone, Copy, Debug)]
pub struct TitleRule {
    pub name: &'static str,
    pub description: &'static str,
    pub earned: fn(&StatsSnapshot) -> bool,
}

pub const TITLES: &[TitleRule] = &[
    TitleRule {
        name: "Naga Guardian",
        description: "Harness the power of the Naga in battle.",
        earned: |s| s.power_ups.counts.shield >= 5,
    },
    TitleRule {
        name: "Serpent of Speed",
        description: "Swift as the legendary serpent, strike with haste.",
        earned: |s| s.power_ups.counts.speed >= 5,
    },
    TitleRule {
        name: "Chimera's Embrace",
        description: "Embody the fierce spirit of the Chimera.",
        earned: |s| s.power_ups.counts.freeze >= 5,
    },
    TitleRule {
        name: "Basilisk's Gaze",
        description: "Stare down your foes like the fearsome Basilisk.",
        earned: |s| s.power_ups.counts.reverse >= 5,
    },
    TitleRule {
        name: "Hydra's Growth",
        description: "Grow stronger, like the many-headed Hydra.",
        earned: |s| s.power_ups.counts.growth >= 5,
    },
    TitleRule {
        name: "Dragon's Devourer",
        description: "Devour your enemies like a dragon feasting.",
        earned: |s| s.devour_count >= 5,
    },
    TitleRule {
        name: "Serpent King",
        description: "Rule the battlefield like a mighty serpent king.",
        earned: |s| s.devour_count >= 10,
    },
    TitleRule {
        name: "Ouroboros",
        description: "Eternal cycle of life and death, consume endlessly.",
        earned: |s| s.scores.wins >= 1,
    },
    TitleRule {
        name: "Jörmungandr's Wrath",
        description: "Unleash the fury of the world serpent.",
        earned: |s| s.player_length >= 20,
    },
    TitleRule {
        name: "Ghostly Serpent",
        description: "Use ghost power to evade and confuse enemies.",
        earned: |s| s.power_ups.counts.ghost >= 10,
    },
    TitleRule {
        name: "Speed Demon",
        description: "Outpace all foes with unmatched speed and agility.",
        earned: |s| s.power_ups.counts.speed >= 15,
    },
    TitleRule {
        name: "Divine Shield",
        description: "Survive against all odds with protective power.",
        earned: |s| s.power_ups.shield_time >= 20.0,
    },
    TitleRule {
        name: "Tiamat's Champion",
        description: "Conquer the strongest foes with cunning and strength.",
        earned: |s| s.scores.wins >= 1 && s.difficulty == 5,
    },
    TitleRule {
        name: "Silver Tongue",
        description: "A con artist who has pure skill.",
        earned: |s| s.scores.wins >= 1 && s.power_ups.total == 0,
    },
    TitleRule {
        name: "Ryu Master",
        description: "Channel the power of Eastern dragon spirits.",
        earned: |s| s.power_ups.counts.has_every_kind(),
    },
    TitleRule {
        name: "Apophis Incarnate",
        description: "Embody the great serpent of chaos.",
        earned: |s| s.win_streak >= 5,
    },
    TitleRule {
        name: "Orochi's Legacy",
        description: "Eight-headed serpent's chosen successor.",
        earned: |s| s.survival_secs >= 120.0,
    },
    TitleRule {
        name: "Champion of the Serpent's Den",
        description: "Conquer the arena, proving your might among the serpents.",
        earned: |s| s.scores.wins >= 10,
    },
    TitleRule {
        name: "Wyrm's Wrath",
        description: "Unleash the fury of the wyrm, a force to be reckoned with.",
        earned: |s| s.scores.wins >= 20,
    },
    TitleRule {
        name: "Serpent Slayer",
        description: "Defeat your foes with the precision of a striking serpent.",
        earned: |s| s.scores.wins >= 50,
    },
    TitleRule {
        name: "Eternal Serpent",
        description: "Achieve immortality through victories, becoming a legend.",
        earned: |s| s.scores.wins >= 100,
    },
    TitleRule {
        name: "Conqueror of the Serpent's Realm",
        description: "Dominate the realm, earning respect as the ultimate conqueror.",
        earned: |s| s.scores.wins >= 150,
    },
    TitleRule {
        name: "Long Lasting Snake",
        description: "Survive for at least half a second.",
        earned: |s| s.survival_secs >= 0.5,
    },
    TitleRule {
        name: "Serpent of the Abyss",
        description: "Wield the power of the ancient serpent that dwells in the depths.",
        earned: |s| s.survival_secs >= 10.0,
    },
    TitleRule {
        name: "Fang of the Ancients",
        description: "A legendary serpent's fang, symbolizing strength and resilience.",
        earned: |s| s.survival_secs >= 180.0,
    },
    TitleRule {
        name: "Lone Serpent",
        description: "The one who is alone.",
        earned: |s| s.survival_secs >= 200.0,
    },
    TitleRule {
        name: "Caduceus Wielder",
        description: "Bearer of the Caduceus, a symbol of balance and healing.",
        earned: |s| s.survival_secs >= 240.0,
    },
    TitleRule {
        name: "Scales of Destiny",
        description: "Wear the scales of fate, guiding your path through trials.",
        earned: |s| s.survival_secs >= 300.0,
    },
    TitleRule {
        name: "Serpent of the Stars",
        description: "A celestial serpent, weaving the fabric of the cosmos.",
        earned: |s| s.survival_secs >= 360.0,
    },
];

/// Titles whose rule holds for `stats` and that aren't in `owned` yet, in table order.
pub fn newly_earned(stats: &StatsSnapshot, owned: &[String]) -> Vec<&'static TitleRule> {
    TITLES
        .iter()
        .filter(|rule| !owned.iter().any(|name| name == rule.name))
        .filter(|rule| (rule.earned)(stats))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Scores;
    use std::collections::HashSet;

    fn names(rules: &[&TitleRule]) -> Vec<&'static str> {
        rules.iter().map(|rule| rule.name).collect()
    }

    #[test]
    fn test_names_are_unique() {
        let unique: HashSet<_> = TITLES.iter().map(|rule| rule.name).collect();
        assert_eq!(unique.len(), TITLES.len());
    }

    #[test]
    fn test_nothing_earned_from_blank_stats() {
        assert!(newly_earned(&StatsSnapshot::default(), &[]).is_empty());
    }

    #[test]
    fn test_first_win_without_power_ups() {
        let stats = StatsSnapshot {
            scores: Scores { wins: 1, losses: 0 },
            survival_secs: 12.0,
            difficulty: 2,
            ..StatsSnapshot::default()
        };
        assert_eq!(
            names(&newly_earned(&stats, &[])),
            vec![
                "Ouroboros",
                "Silver Tongue",
                "Long Lasting Snake",
                "Serpent of the Abyss"
            ]
        );
    }

    #[test]
    fn test_owned_titles_are_skipped() {
        let stats = StatsSnapshot {
            survival_secs: 11.0,
            ..StatsSnapshot::default()
        };
        let owned = vec!["Long Lasting Snake".to_string()];
        assert_eq!(names(&newly_earned(&stats, &owned)), vec!["Serpent of the Abyss"]);
    }

    #[test]
    fn test_power_up_titles() {
        let mut stats = StatsSnapshot::default();
        for kind in crate::snake::Effect::ALL {
            stats.power_ups.record(kind);
        }
        stats.power_ups.counts.shield = 5;

        let earned = names(&newly_earned(&stats, &[]));
        assert!(earned.contains(&"Ryu Master"));
        assert!(earned.contains(&"Naga Guardian"));
        assert!(!earned.contains(&"Serpent of Speed"));
    }
}
