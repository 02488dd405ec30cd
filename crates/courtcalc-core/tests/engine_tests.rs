// End-to-end tests for formula evaluation: players go into SQLite, come back
// out through the store, and are ranked by the engine.

use courtcalc_core::config::load_config_from;
use courtcalc_core::db::Database;
use courtcalc_core::engine::{EvaluationConfig, StatEngine};
use courtcalc_core::examples::EXAMPLE_FORMULAS;
use courtcalc_core::naming::suggest_name;
use courtcalc_core::player::PlayerRecord;
use courtcalc_core::stat::Stat;
use courtcalc_core::store::StatStore;
use courtcalc_core::validate::validate;

// ===========================================================================
// Helpers
// ===========================================================================

fn two_players() -> Vec<PlayerRecord> {
    vec![
        PlayerRecord::new(1, "A", "BOS")
            .with(Stat::Points, 20.0)
            .with(Stat::Rebounds, 5.0)
            .with(Stat::Assists, 5.0)
            .with(Stat::Turnovers, 2.0),
        PlayerRecord::new(2, "B", "LAL")
            .with(Stat::Points, 25.0)
            .with(Stat::Rebounds, 3.0)
            .with(Stat::Assists, 2.0)
            .with(Stat::Turnovers, 1.0),
    ]
}

/// A roster with every stat populated and varied per player.
fn league(size: usize) -> Vec<PlayerRecord> {
    (0..size)
        .map(|i| {
            let f = i as f64;
            let mut p = PlayerRecord::new(i as i64 + 1, format!("Player {i}"), "NYK");
            for stat in Stat::ALL {
                *p.stat_mut(stat) = Some(1.0 + (f * 7.0 + stat.index() as f64 * 3.0) % 31.0);
            }
            p
        })
        .collect()
}

fn engine() -> StatEngine {
    StatEngine::new(EvaluationConfig::default())
}

// ===========================================================================
// Ranking
// ===========================================================================

#[test]
fn two_player_leaderboard() {
    let rows = engine().evaluate("PTS + REB + AST - TOV", &two_players());

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "B");
    assert_eq!(rows[0].computed_value, 29.0);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[1].name, "A");
    assert_eq!(rows[1].computed_value, 28.0);
    assert_eq!(rows[1].rank, 2);

    let json = serde_json::to_value(&rows[0]).unwrap();
    assert_eq!(json["computedValue"], 29.0);
    assert_eq!(json["team"], "LAL");
}

#[test]
fn results_are_capped_at_one_hundred() {
    let players: Vec<PlayerRecord> = (0..150)
        .map(|i| PlayerRecord::new(i, format!("P{i}"), "MIA").with(Stat::Points, i as f64))
        .collect();

    let rows = engine().evaluate("PTS", &players);
    assert_eq!(rows.len(), 100);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.rank, i + 1);
        assert_eq!(row.computed_value, (149 - i) as f64);
    }
}

#[test]
fn cap_follows_configuration() {
    let config = EvaluationConfig {
        max_results: 5,
        ..EvaluationConfig::default()
    };
    let rows = StatEngine::new(config).evaluate("PTS", &league(40));
    assert_eq!(rows.len(), 5);
}

#[test]
fn evaluation_is_idempotent() {
    let players = league(120);
    let e = engine();
    for example in EXAMPLE_FORMULAS {
        let first = e.evaluate(example.formula, &players);
        let second = e.evaluate(example.formula, &players);
        assert_eq!(first, second, "{} is not deterministic", example.name);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.computed_value.to_bits(), b.computed_value.to_bits());
        }
    }
}

#[test]
fn ties_keep_dataset_order() {
    let players: Vec<PlayerRecord> = ["X", "Y", "Z"]
        .iter()
        .enumerate()
        .map(|(i, n)| PlayerRecord::new(i as i64, *n, "CHI").with(Stat::Points, 10.0))
        .collect();
    let names: Vec<String> = engine()
        .evaluate("PTS", &players)
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["X", "Y", "Z"]);
}

// ===========================================================================
// Numeric safety
// ===========================================================================

#[test]
fn zero_attempts_use_the_floor() {
    let players = vec![PlayerRecord::new(1, "Zero", "DEN")
        .with(Stat::Points, 10.0)
        .with(Stat::FieldGoalAttempts, 0.0)];

    let rows = engine().evaluate("PTS / FGA", &players);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].computed_value.is_finite());
    assert_eq!(rows[0].computed_value, 100.0);
}

#[test]
fn non_finite_player_is_dropped_alone() {
    let players = vec![
        PlayerRecord::new(1, "First", "PHX")
            .with(Stat::Points, 10.0)
            .with(Stat::Turnovers, 2.0),
        // 0 / 0 is NaN
        PlayerRecord::new(2, "Broken", "PHX")
            .with(Stat::Points, 0.0)
            .with(Stat::Turnovers, 0.0),
        PlayerRecord::new(3, "Third", "PHX")
            .with(Stat::Points, 30.0)
            .with(Stat::Turnovers, 3.0),
    ];

    let rows = engine().evaluate("PTS / TOV", &players);
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Third", "First"]);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[1].rank, 2);
}

#[test]
fn unknown_symbol_yields_empty_leaderboard() {
    assert!(engine().evaluate("PTS + FOO", &two_players()).is_empty());
    assert!(engine().evaluate("", &two_players()).is_empty());
}

#[test]
fn three_point_aliases_agree() {
    let players = league(30);
    let e = engine();
    let canonical = e.evaluate("3PA * 2", &players);
    let spelled = e.evaluate("THREE_PA * 2", &players);
    assert_eq!(canonical, spelled);

    let pct = e.evaluate("THREE_PCT * 2", &players);
    let pct_alias = e.evaluate("3P_PCT * 2", &players);
    assert_eq!(pct, pct_alias);
}

// ===========================================================================
// Validation and naming
// ===========================================================================

#[test]
fn validation_properties() {
    for blank in ["", "   ", "\t\n"] {
        let v = validate(blank);
        assert!(!v.is_valid);
        assert!(v.used_stats.is_empty());
    }

    let v = validate("1 + 2");
    assert!(!v.is_valid);
    let message = v.error.unwrap();
    for stat in Stat::ALL {
        assert!(message.contains(stat.abbreviation()), "{message}");
    }

    let v = validate("PTS + (AST");
    assert!(!v.is_valid);
    assert_eq!(v.used_stats, vec![Stat::Points, Stat::Assists]);
}

#[test]
fn examples_have_suggested_names() {
    for example in EXAMPLE_FORMULAS {
        assert!(!suggest_name(example.formula).name.is_empty());
    }
}

// ===========================================================================
// Storage round trip
// ===========================================================================

#[tokio::test]
async fn leaderboard_from_stored_players() {
    let db = Database::open(":memory:").unwrap();
    db.insert_players(&two_players()).unwrap();

    let store: &dyn StatStore = &db;
    let players = store.all_players().await.unwrap();
    let rows = engine().evaluate("PTS + REB + AST - TOV", &players);
    assert_eq!(rows[0].name, "B");
    assert_eq!(rows[1].name, "A");
}

#[tokio::test]
async fn season_filter_narrows_dataset() {
    let db = Database::open(":memory:").unwrap();
    let mut players = two_players();
    players[0].season = Some("2023-24".into());
    players[1].season = Some("2024-25".into());
    db.insert_players(&players).unwrap();

    let season = db.players_in_season("2024-25").await.unwrap();
    let rows = engine().evaluate("PTS", &season);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "B");
}

#[test]
fn shipped_defaults_load() {
    let cwd = std::env::current_dir().unwrap();
    let root = if cwd.join("defaults").exists() {
        cwd
    } else {
        cwd.join("../..")
    };
    let tmp = std::env::temp_dir().join("courtcalc_integration_defaults");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(tmp.join("config")).unwrap();
    std::fs::copy(
        root.join("defaults/courtcalc.toml"),
        tmp.join("config/courtcalc.toml"),
    )
    .unwrap();

    let config = load_config_from(&tmp).unwrap();
    assert_eq!(config.evaluation.max_results, 100);

    let _ = std::fs::remove_dir_all(&tmp);
}
