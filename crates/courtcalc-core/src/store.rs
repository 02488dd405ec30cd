// Storage seam consumed by the HTTP layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::player::PlayerRecord;

/// A saved, shareable formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomStat {
    pub id: i64,
    pub formula: String,
    pub name: String,
    pub description: Option<String>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`CustomStat`]; the store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomStat {
    pub formula: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Read access to players plus CRUD on saved formulas.
///
/// Players come back in a stable order (insertion order for the SQLite
/// store); leaderboard tie-breaking depends on it.
#[async_trait]
pub trait StatStore: Send + Sync {
    async fn all_players(&self) -> anyhow::Result<Vec<PlayerRecord>>;

    async fn players_in_season(&self, season: &str) -> anyhow::Result<Vec<PlayerRecord>>;

    async fn save_custom_stat(&self, stat: NewCustomStat) -> anyhow::Result<CustomStat>;

    /// Saved formulas, newest first. `Some(user)` restricts to that user.
    async fn custom_stats(&self, user_id: Option<&str>) -> anyhow::Result<Vec<CustomStat>>;

    async fn custom_stat(&self, id: i64) -> anyhow::Result<Option<CustomStat>>;

    /// Returns `false` when no row had that id.
    async fn delete_custom_stat(&self, id: i64) -> anyhow::Result<bool>;
}
