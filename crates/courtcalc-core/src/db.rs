// SQLite persistence for player stat lines and saved custom stats.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row, ToSql};

use crate::player::PlayerRecord;
use crate::stat::Stat;
use crate::store::{CustomStat, NewCustomStat, StatStore};

/// SQLite-backed store for players and custom stats.
pub struct Database {
    conn: Mutex<Connection>,
}

/// Column holding `stat` in the `players` table.
fn stat_column(stat: Stat) -> &'static str {
    match stat {
        Stat::Points => "points",
        Stat::Assists => "assists",
        Stat::Rebounds => "rebounds",
        Stat::Turnovers => "turnovers",
        Stat::Steals => "steals",
        Stat::Blocks => "blocks",
        Stat::FieldGoalPct => "field_goal_percentage",
        Stat::FieldGoalAttempts => "field_goal_attempts",
        Stat::FreeThrowPct => "free_throw_percentage",
        Stat::FreeThrowAttempts => "free_throw_attempts",
        Stat::ThreePointPct => "three_point_percentage",
        Stat::ThreePointAttempts => "three_point_attempts",
        Stat::Minutes => "minutes_per_game",
        Stat::GamesPlayed => "games_played",
        Stat::WinPct => "win_percentage",
        Stat::PlusMinus => "plus_minus",
    }
}

/// Identity columns followed by one column per stat, in table order.
fn player_columns() -> String {
    let mut cols = vec!["player_id", "name", "team", "position", "season"];
    cols.extend(Stat::ALL.iter().map(|s| stat_column(*s)));
    cols.join(", ")
}

const IDENTITY_COLUMNS: usize = 5;

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        let stat_columns: String = Stat::ALL
            .iter()
            .map(|s| format!("{} REAL,\n", stat_column(*s)))
            .collect();

        conn.execute_batch(&format!(
            "
            CREATE TABLE IF NOT EXISTS players (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                player_id INTEGER NOT NULL,
                name      TEXT NOT NULL,
                team      TEXT NOT NULL,
                position  TEXT,
                season    TEXT NOT NULL DEFAULT '',
                {stat_columns}
                UNIQUE(player_id, season)
            );

            CREATE TABLE IF NOT EXISTS custom_stats (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                formula     TEXT NOT NULL,
                name        TEXT NOT NULL,
                description TEXT,
                user_id     TEXT,
                created_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_players_season ON players(season);
            CREATE INDEX IF NOT EXISTS idx_custom_stats_user ON custom_stats(user_id);
            "
        ))
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock).
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    // ------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------

    fn upsert_player_on(conn: &Connection, player: &PlayerRecord) -> Result<i64> {
        let columns = player_columns();
        let placeholders: Vec<String> = (1..=IDENTITY_COLUMNS + Stat::COUNT)
            .map(|i| format!("?{i}"))
            .collect();
        let updates: Vec<String> = columns
            .split(", ")
            .filter(|c| *c != "player_id" && *c != "season")
            .map(|c| format!("{c} = excluded.{c}"))
            .collect();
        let sql = format!(
            "INSERT INTO players ({columns}) VALUES ({})
             ON CONFLICT(player_id, season) DO UPDATE SET {}
             RETURNING id",
            placeholders.join(", "),
            updates.join(", "),
        );

        let season = player.season.clone().unwrap_or_default();
        let stats: Vec<Option<f64>> = Stat::ALL.iter().map(|s| player.stat(*s)).collect();
        let mut values: Vec<&dyn ToSql> = vec![
            &player.player_id,
            &player.name,
            &player.team,
            &player.position,
            &season,
        ];
        values.extend(stats.iter().map(|v| v as &dyn ToSql));

        let id = conn
            .query_row(&sql, values.as_slice(), |row| row.get(0))
            .with_context(|| format!("failed to upsert player {}", player.name))?;
        Ok(id)
    }

    /// Insert a player or update the existing `(player_id, season)` row.
    /// Returns the row id; updates keep the original id and position in
    /// iteration order.
    pub fn upsert_player(&self, player: &PlayerRecord) -> Result<i64> {
        let conn = self.conn();
        Self::upsert_player_on(&conn, player)
    }

    /// Upsert many players in one transaction. Returns the number written.
    pub fn insert_players(&self, players: &[PlayerRecord]) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        for player in players {
            Self::upsert_player_on(&tx, player)?;
        }
        tx.commit().context("failed to commit player insert")?;
        Ok(players.len())
    }

    fn query_players(&self, filter: &str, params: &[&dyn ToSql]) -> Result<Vec<PlayerRecord>> {
        let conn = self.conn();
        let sql = format!(
            "SELECT {} FROM players {filter} ORDER BY id",
            player_columns()
        );
        let mut stmt = conn
            .prepare(&sql)
            .context("failed to prepare players query")?;
        let players = stmt
            .query_map(params, player_from_row)
            .context("failed to query players")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map player rows")?;
        Ok(players)
    }

    /// Every stored player line, in insertion order.
    pub fn load_players(&self) -> Result<Vec<PlayerRecord>> {
        self.query_players("", &[])
    }

    /// Player lines for one season, in insertion order.
    pub fn load_players_in_season(&self, season: &str) -> Result<Vec<PlayerRecord>> {
        self.query_players("WHERE season = ?1", &[&season])
    }

    pub fn player_count(&self) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))
            .context("failed to count players")?;
        Ok(count as usize)
    }

    pub fn delete_all_players(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM players", [])
            .context("failed to delete players")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Custom stats
    // ------------------------------------------------------------------

    pub fn insert_custom_stat(&self, stat: &NewCustomStat) -> Result<CustomStat> {
        let conn = self.conn();
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO custom_stats (formula, name, description, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                stat.formula,
                stat.name,
                stat.description,
                stat.user_id,
                created_at.to_rfc3339(),
            ],
        )
        .context("failed to insert custom stat")?;
        Ok(CustomStat {
            id: conn.last_insert_rowid(),
            formula: stat.formula.clone(),
            name: stat.name.clone(),
            description: stat.description.clone(),
            user_id: stat.user_id.clone(),
            created_at,
        })
    }

    pub fn load_custom_stats(&self, user_id: Option<&str>) -> Result<Vec<CustomStat>> {
        let conn = self.conn();
        let base = "SELECT id, formula, name, description, user_id, created_at FROM custom_stats";
        let stats = match user_id {
            Some(user) => {
                let mut stmt = conn
                    .prepare(&format!("{base} WHERE user_id = ?1 ORDER BY id DESC"))
                    .context("failed to prepare custom stats query")?;
                let rows = stmt
                    .query_map(params![user], custom_stat_from_row)
                    .context("failed to query custom stats")?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
            }
            None => {
                let mut stmt = conn
                    .prepare(&format!("{base} ORDER BY id DESC"))
                    .context("failed to prepare custom stats query")?;
                let rows = stmt
                    .query_map([], custom_stat_from_row)
                    .context("failed to query custom stats")?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
            }
        }
        .context("failed to map custom stat rows")?;
        Ok(stats)
    }

    pub fn load_custom_stat(&self, id: i64) -> Result<Option<CustomStat>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, formula, name, description, user_id, created_at
                 FROM custom_stats WHERE id = ?1",
            )
            .context("failed to prepare custom stat query")?;
        let mut rows = stmt
            .query_map(params![id], custom_stat_from_row)
            .context("failed to query custom stat")?;
        let stat = rows
            .next()
            .transpose()
            .context("failed to read custom stat row")?;
        Ok(stat)
    }

    pub fn remove_custom_stat(&self, id: i64) -> Result<bool> {
        let conn = self.conn();
        let deleted = conn
            .execute("DELETE FROM custom_stats WHERE id = ?1", params![id])
            .context("failed to delete custom stat")?;
        Ok(deleted > 0)
    }
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<PlayerRecord> {
    let season: String = row.get(4)?;
    let mut player = PlayerRecord {
        player_id: row.get(0)?,
        name: row.get(1)?,
        team: row.get(2)?,
        position: row.get(3)?,
        season: (!season.is_empty()).then_some(season),
        ..Default::default()
    };
    for (i, stat) in Stat::ALL.into_iter().enumerate() {
        *player.stat_mut(stat) = row.get(IDENTITY_COLUMNS + i)?;
    }
    Ok(player)
}

fn custom_stat_from_row(row: &Row<'_>) -> rusqlite::Result<CustomStat> {
    let created_at: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);
    Ok(CustomStat {
        id: row.get(0)?,
        formula: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        user_id: row.get(4)?,
        created_at,
    })
}

#[async_trait]
impl StatStore for Database {
    async fn all_players(&self) -> Result<Vec<PlayerRecord>> {
        self.load_players()
    }

    async fn players_in_season(&self, season: &str) -> Result<Vec<PlayerRecord>> {
        self.load_players_in_season(season)
    }

    async fn save_custom_stat(&self, stat: NewCustomStat) -> Result<CustomStat> {
        self.insert_custom_stat(&stat)
    }

    async fn custom_stats(&self, user_id: Option<&str>) -> Result<Vec<CustomStat>> {
        self.load_custom_stats(user_id)
    }

    async fn custom_stat(&self, id: i64) -> Result<Option<CustomStat>> {
        self.load_custom_stat(id)
    }

    async fn delete_custom_stat(&self, id: i64) -> Result<bool> {
        self.remove_custom_stat(id)
    }
}
