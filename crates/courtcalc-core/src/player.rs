// Player stat records as read from storage.

use serde::{Deserialize, Serialize};

use crate::stat::Stat;

/// One player's season line.
///
/// Numeric fields are optional: storage rows may be sparse, and a missing
/// field binds as `0` when a formula is evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub player_id: i64,
    pub name: String,
    pub team: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub season: Option<String>,

    #[serde(default)]
    pub games_played: Option<f64>,
    #[serde(default)]
    pub minutes_per_game: Option<f64>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub assists: Option<f64>,
    #[serde(default)]
    pub rebounds: Option<f64>,
    #[serde(default)]
    pub steals: Option<f64>,
    #[serde(default)]
    pub blocks: Option<f64>,
    #[serde(default)]
    pub turnovers: Option<f64>,
    #[serde(default)]
    pub field_goal_percentage: Option<f64>,
    #[serde(default)]
    pub field_goal_attempts: Option<f64>,
    #[serde(default)]
    pub free_throw_percentage: Option<f64>,
    #[serde(default)]
    pub free_throw_attempts: Option<f64>,
    #[serde(default)]
    pub three_point_percentage: Option<f64>,
    #[serde(default)]
    pub three_point_attempts: Option<f64>,
    #[serde(default)]
    pub plus_minus: Option<f64>,
    #[serde(default)]
    pub win_percentage: Option<f64>,
}

impl PlayerRecord {
    /// Minimal record with identity fields only; numeric fields are unset.
    pub fn new(player_id: i64, name: impl Into<String>, team: impl Into<String>) -> Self {
        PlayerRecord {
            player_id,
            name: name.into(),
            team: team.into(),
            ..Default::default()
        }
    }

    /// Raw field value backing `stat`, if present.
    pub fn stat(&self, stat: Stat) -> Option<f64> {
        match stat {
            Stat::Points => self.points,
            Stat::Assists => self.assists,
            Stat::Rebounds => self.rebounds,
            Stat::Turnovers => self.turnovers,
            Stat::Steals => self.steals,
            Stat::Blocks => self.blocks,
            Stat::FieldGoalPct => self.field_goal_percentage,
            Stat::FieldGoalAttempts => self.field_goal_attempts,
            Stat::FreeThrowPct => self.free_throw_percentage,
            Stat::FreeThrowAttempts => self.free_throw_attempts,
            Stat::ThreePointPct => self.three_point_percentage,
            Stat::ThreePointAttempts => self.three_point_attempts,
            Stat::Minutes => self.minutes_per_game,
            Stat::GamesPlayed => self.games_played,
            Stat::WinPct => self.win_percentage,
            Stat::PlusMinus => self.plus_minus,
        }
    }

    /// Mutable access to the field backing `stat`.
    pub fn stat_mut(&mut self, stat: Stat) -> &mut Option<f64> {
        match stat {
            Stat::Points => &mut self.points,
            Stat::Assists => &mut self.assists,
            Stat::Rebounds => &mut self.rebounds,
            Stat::Turnovers => &mut self.turnovers,
            Stat::Steals => &mut self.steals,
            Stat::Blocks => &mut self.blocks,
            Stat::FieldGoalPct => &mut self.field_goal_percentage,
            Stat::FieldGoalAttempts => &mut self.field_goal_attempts,
            Stat::FreeThrowPct => &mut self.free_throw_percentage,
            Stat::FreeThrowAttempts => &mut self.free_throw_attempts,
            Stat::ThreePointPct => &mut self.three_point_percentage,
            Stat::ThreePointAttempts => &mut self.three_point_attempts,
            Stat::Minutes => &mut self.minutes_per_game,
            Stat::GamesPlayed => &mut self.games_played,
            Stat::WinPct => &mut self.win_percentage,
            Stat::PlusMinus => &mut self.plus_minus,
        }
    }

    /// Builder-style setter used by fixtures and imports.
    pub fn with(mut self, stat: Stat, value: f64) -> Self {
        *self.stat_mut(stat) = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_sets_the_matching_field() {
        let p = PlayerRecord::new(1, "A", "BOS")
            .with(Stat::Points, 20.0)
            .with(Stat::ThreePointAttempts, 6.5);
        assert_eq!(p.points, Some(20.0));
        assert_eq!(p.three_point_attempts, Some(6.5));
        assert_eq!(p.stat(Stat::Assists), None);
    }

    #[test]
    fn every_stat_round_trips_through_its_field() {
        let mut p = PlayerRecord::new(1, "A", "BOS");
        for (i, stat) in Stat::ALL.into_iter().enumerate() {
            p = p.with(stat, i as f64);
        }
        for (i, stat) in Stat::ALL.into_iter().enumerate() {
            assert_eq!(p.stat(stat), Some(i as f64), "{stat}");
        }
    }

    #[test]
    fn json_uses_camel_case_and_tolerates_missing_fields() {
        let p: PlayerRecord = serde_json::from_str(
            r#"{"playerId":7,"name":"B","team":"LAL","points":25.0,"fieldGoalAttempts":18.2}"#,
        )
        .unwrap();
        assert_eq!(p.player_id, 7);
        assert_eq!(p.points, Some(25.0));
        assert_eq!(p.field_goal_attempts, Some(18.2));
        assert_eq!(p.rebounds, None);
        assert!(p.position.is_none());
    }
}
