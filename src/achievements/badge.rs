use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Per-match distinction awarded to one or more participants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementType {
    MostExpensiveSquad,
    MostDamageDealt,
    MostEliminations,
    FirstPlace,
    TopFour,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BadgeType {
    Luxury,
    DamageDealer,
    Executor,
    Mvp,
    Steady,
}

struct BadgeRule {
    achievement_type: AchievementType,
    required_count: i64,
}

/// Indexed by `BadgeType` discriminant.
const BADGE_RULES: [BadgeRule; 5] = [
    BadgeRule {
        achievement_type: AchievementType::MostExpensiveSquad,
        required_count: 5,
    },
    BadgeRule {
        achievement_type: AchievementType::MostDamageDealt,
        required_count: 5,
    },
    BadgeRule {
        achievement_type: AchievementType::MostEliminations,
        required_count: 5,
    },
    BadgeRule {
        achievement_type: AchievementType::FirstPlace,
        required_count: 6,
    },
    BadgeRule {
        achievement_type: AchievementType::TopFour,
        required_count: 10,
    },
];

impl BadgeType {
    pub const ALL: [BadgeType; 5] = [
        Self::Luxury,
        Self::DamageDealer,
        Self::Executor,
        Self::Mvp,
        Self::Steady,
    ];

    fn rule(self) -> &'static BadgeRule {
        &BADGE_RULES[self as usize]
    }

    pub fn achievement_type(self) -> AchievementType {
        self.rule().achievement_type
    }

    pub fn required_count(self) -> i64 {
        self.rule().required_count
    }

    pub fn is_unlocked(self, achievement_count: i64) -> bool {
        achievement_count >= self.required_count()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Luxury => "LUXURY",
            Self::DamageDealer => "DAMAGE_DEALER",
            Self::Executor => "EXECUTOR",
            Self::Mvp => "MVP",
            Self::Steady => "STEADY",
        }
    }
}

impl FromStr for BadgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == normalized)
            .ok_or_else(|| format!("unknown badge type: {s}"))
    }
}

impl fmt::Display for BadgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_bind_each_badge_to_one_category() {
        assert_eq!(
            BadgeType::Luxury.achievement_type(),
            AchievementType::MostExpensiveSquad
        );
        assert_eq!(
            BadgeType::DamageDealer.achievement_type(),
            AchievementType::MostDamageDealt
        );
        assert_eq!(
            BadgeType::Executor.achievement_type(),
            AchievementType::MostEliminations
        );
        assert_eq!(BadgeType::Mvp.achievement_type(), AchievementType::FirstPlace);
        assert_eq!(BadgeType::Steady.achievement_type(), AchievementType::TopFour);

        let required: Vec<_> = BadgeType::ALL.iter().map(|b| b.required_count()).collect();
        assert_eq!(required, vec![5, 5, 5, 6, 10]);
    }

    #[test]
    fn parses_badge_names() {
        assert_eq!("mvp".parse::<BadgeType>().unwrap(), BadgeType::Mvp);
        assert_eq!(
            "damage-dealer".parse::<BadgeType>().unwrap(),
            BadgeType::DamageDealer
        );
        assert!("legendary".parse::<BadgeType>().is_err());
    }

    #[test]
    fn serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&AchievementType::MostExpensiveSquad).unwrap(),
            r#""MOST_EXPENSIVE_SQUAD""#
        );
        assert_eq!(serde_json::to_string(&BadgeType::Steady).unwrap(), r#""STEADY""#);
    }
}
