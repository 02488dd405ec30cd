// Stat evaluation engine: runs a formula over every player and ranks the
// results into a leaderboard.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::formula::{EvalError, Formula, StatBindings};
use crate::player::PlayerRecord;
use crate::stat::Stat;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Lower bounds substituted for the stats that commonly appear as
/// denominators. They keep `PTS / FGA` finite for players with zero
/// attempts, which also means such players get a (large) score instead of
/// none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DenominatorFloors {
    pub field_goal_attempts: f64,
    pub minutes_per_game: f64,
    pub games_played: f64,
}

impl Default for DenominatorFloors {
    fn default() -> Self {
        DenominatorFloors {
            field_goal_attempts: 0.1,
            minutes_per_game: 0.1,
            games_played: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Leaderboard rows returned per call.
    pub max_results: usize,
    pub floors: DenominatorFloors,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            max_results: 100,
            floors: DenominatorFloors::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Result rows
// ---------------------------------------------------------------------------

/// One leaderboard entry. Created per evaluation call, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub rank: usize,
    pub player_id: i64,
    pub name: String,
    pub team: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub computed_value: f64,
    pub points: Option<f64>,
    pub assists: Option<f64>,
    pub rebounds: Option<f64>,
    pub games_played: Option<f64>,
}

impl ResultRow {
    /// Unranked row; `rank` is assigned after sorting.
    fn scored(player: &PlayerRecord, computed_value: f64) -> Self {
        ResultRow {
            rank: 0,
            player_id: player.player_id,
            name: player.name.clone(),
            team: player.team.clone(),
            position: player.position.clone(),
            computed_value,
            points: player.points,
            assists: player.assists,
            rebounds: player.rebounds,
            games_played: player.games_played,
        }
    }
}

/// Counts for one evaluation call, logged but not returned to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationSummary {
    pub evaluated: usize,
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Binding and rounding
// ---------------------------------------------------------------------------

/// Build the per-player variable table. Missing and non-finite fields read
/// as `0`; field-goal attempts, minutes, and games played are raised to
/// their floors.
pub fn bind(player: &PlayerRecord, floors: &DenominatorFloors) -> StatBindings {
    let mut bindings = StatBindings::zeroed();
    for stat in Stat::ALL {
        let raw = player
            .stat(stat)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        let value = match stat {
            Stat::FieldGoalAttempts => raw.max(floors.field_goal_attempts),
            Stat::Minutes => raw.max(floors.minutes_per_game),
            Stat::GamesPlayed => raw.max(floors.games_played),
            _ => raw,
        };
        bindings.set(stat, value);
    }
    bindings
}

/// Round half away from zero at the cent level. Small negatives round to
/// `0.0`, never `-0.0`, so they tie with zero in the ranking sort.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Evaluates formulas against player collections. Holds only configuration,
/// so one engine can serve concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct StatEngine {
    config: EvaluationConfig,
}

impl StatEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        StatEngine { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Parse `formula` and rank `players` by it.
    ///
    /// A formula that does not parse would fail for every player, so the
    /// result is an empty leaderboard rather than an error. Callers wanting
    /// a reason should run [`validate`](crate::validate::validate) or
    /// [`Formula::parse`] first.
    pub fn evaluate(&self, formula: &str, players: &[PlayerRecord]) -> Vec<ResultRow> {
        match Formula::parse(formula) {
            Ok(parsed) => self.evaluate_formula(&parsed, players),
            Err(e) => {
                debug!(formula, error = %e, "formula failed to parse; no player can be scored");
                Vec::new()
            }
        }
    }

    /// Rank `players` by an already-parsed formula.
    pub fn evaluate_formula(&self, formula: &Formula, players: &[PlayerRecord]) -> Vec<ResultRow> {
        let (rows, summary) = self.score_all(formula, players);
        debug!(
            formula = formula.source(),
            evaluated = summary.evaluated,
            skipped = summary.skipped,
            "formula evaluated"
        );
        rank(rows, self.config.max_results)
    }

    /// Score one player. Failure is routine (zero denominators, overflow)
    /// and only means the player is left off the leaderboard.
    pub fn score_player(
        &self,
        formula: &Formula,
        player: &PlayerRecord,
    ) -> Result<ResultRow, EvalError> {
        let bindings = bind(player, &self.config.floors);
        let value = formula.evaluate(&bindings)?;
        let rounded = round_to_cents(value);
        if !rounded.is_finite() {
            return Err(EvalError::NonFinite(rounded));
        }
        Ok(ResultRow::scored(player, rounded))
    }

    /// Score every player, keeping successes in input order.
    fn score_all(
        &self,
        formula: &Formula,
        players: &[PlayerRecord],
    ) -> (Vec<ResultRow>, EvaluationSummary) {
        players.iter().fold(
            (Vec::with_capacity(players.len()), EvaluationSummary::default()),
            |(mut rows, mut summary), player| {
                match self.score_player(formula, player) {
                    Ok(row) => {
                        summary.evaluated += 1;
                        rows.push(row);
                    }
                    Err(e) => {
                        summary.skipped += 1;
                        debug!(player = %player.name, error = %e, "player skipped");
                    }
                }
                (rows, summary)
            },
        )
    }
}

/// Stable sort by value descending, assign 1-based ranks, keep the top
/// `limit`.
fn rank(mut rows: Vec<ResultRow>, limit: usize) -> Vec<ResultRow> {
    rows.sort_by(|a, b| b.computed_value.total_cmp(&a.computed_value));
    rows.truncate(limit);
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}
