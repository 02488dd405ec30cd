// Stat symbol table: the fixed set of abbreviations a formula may reference.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A basketball statistic that can appear in a formula.
///
/// Variant order is the canonical table order; it drives validator error
/// messages, `used_stats` ordering, and the layout of [`StatBindings`].
///
/// [`StatBindings`]: crate::formula::StatBindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stat {
    Points,
    Assists,
    Rebounds,
    Turnovers,
    Steals,
    Blocks,
    FieldGoalPct,
    FieldGoalAttempts,
    FreeThrowPct,
    FreeThrowAttempts,
    ThreePointPct,
    ThreePointAttempts,
    Minutes,
    GamesPlayed,
    WinPct,
    PlusMinus,
}

impl Stat {
    pub const COUNT: usize = 16;

    pub const ALL: [Stat; Stat::COUNT] = [
        Stat::Points,
        Stat::Assists,
        Stat::Rebounds,
        Stat::Turnovers,
        Stat::Steals,
        Stat::Blocks,
        Stat::FieldGoalPct,
        Stat::FieldGoalAttempts,
        Stat::FreeThrowPct,
        Stat::FreeThrowAttempts,
        Stat::ThreePointPct,
        Stat::ThreePointAttempts,
        Stat::Minutes,
        Stat::GamesPlayed,
        Stat::WinPct,
        Stat::PlusMinus,
    ];

    /// Position of this stat in [`Stat::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical formula spelling.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Stat::Points => "PTS",
            Stat::Assists => "AST",
            Stat::Rebounds => "REB",
            Stat::Turnovers => "TOV",
            Stat::Steals => "STL",
            Stat::Blocks => "BLK",
            Stat::FieldGoalPct => "FG_PCT",
            Stat::FieldGoalAttempts => "FGA",
            Stat::FreeThrowPct => "FT_PCT",
            Stat::FreeThrowAttempts => "FTA",
            Stat::ThreePointPct => "THREE_PCT",
            Stat::ThreePointAttempts => "3PA",
            Stat::Minutes => "MIN",
            Stat::GamesPlayed => "GP",
            Stat::WinPct => "W_PCT",
            Stat::PlusMinus => "PLUS_MINUS",
        }
    }

    /// Alternate spellings accepted in formulas.
    ///
    /// The three-point stats each have one digit-leading and one
    /// identifier-safe spelling, and both resolve to the same stat.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Stat::ThreePointPct => &["3P_PCT"],
            Stat::ThreePointAttempts => &["THREE_PA"],
            Stat::Minutes => &["MPG"],
            _ => &[],
        }
    }

    /// Every accepted spelling, canonical first.
    pub fn spellings(self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.abbreviation()).chain(self.aliases().iter().copied())
    }

    pub fn description(self) -> &'static str {
        match self {
            Stat::Points => "Points per game",
            Stat::Assists => "Assists per game",
            Stat::Rebounds => "Rebounds per game",
            Stat::Turnovers => "Turnovers per game",
            Stat::Steals => "Steals per game",
            Stat::Blocks => "Blocks per game",
            Stat::FieldGoalPct => "Field Goal Percentage",
            Stat::FieldGoalAttempts => "Field Goal Attempts per game",
            Stat::FreeThrowPct => "Free Throw Percentage",
            Stat::FreeThrowAttempts => "Free Throw Attempts per game",
            Stat::ThreePointPct => "Three Point Percentage",
            Stat::ThreePointAttempts => "Three Point Attempts per game",
            Stat::Minutes => "Minutes per game",
            Stat::GamesPlayed => "Games Played",
            Stat::WinPct => "Team win percentage in games played",
            Stat::PlusMinus => "Plus/Minus",
        }
    }

    /// Name of the player record field this stat reads, as it appears in
    /// the JSON API.
    pub fn field(self) -> &'static str {
        match self {
            Stat::Points => "points",
            Stat::Assists => "assists",
            Stat::Rebounds => "rebounds",
            Stat::Turnovers => "turnovers",
            Stat::Steals => "steals",
            Stat::Blocks => "blocks",
            Stat::FieldGoalPct => "fieldGoalPercentage",
            Stat::FieldGoalAttempts => "fieldGoalAttempts",
            Stat::FreeThrowPct => "freeThrowPercentage",
            Stat::FreeThrowAttempts => "freeThrowAttempts",
            Stat::ThreePointPct => "threePointPercentage",
            Stat::ThreePointAttempts => "threePointAttempts",
            Stat::Minutes => "minutesPerGame",
            Stat::GamesPlayed => "gamesPlayed",
            Stat::WinPct => "winPercentage",
            Stat::PlusMinus => "plusMinus",
        }
    }

    /// Resolve any accepted spelling, ignoring ASCII case.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Stat::ALL
            .into_iter()
            .find(|stat| stat.spellings().any(|s| s.eq_ignore_ascii_case(symbol)))
    }

    /// Comma-separated canonical abbreviations in table order.
    pub fn abbreviation_list() -> String {
        Stat::ALL
            .iter()
            .map(|s| s.abbreviation())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl Serialize for Stat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.abbreviation())
    }
}

impl<'de> Deserialize<'de> for Stat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        Stat::from_symbol(&symbol)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown stat symbol `{symbol}`")))
    }
}

/// Catalogue entry describing one stat for API consumers.
#[derive(Debug, Clone, Serialize)]
pub struct StatInfo {
    pub abbreviation: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub field: &'static str,
}

impl From<Stat> for StatInfo {
    fn from(stat: Stat) -> Self {
        StatInfo {
            abbreviation: stat.abbreviation(),
            aliases: stat.aliases(),
            description: stat.description(),
            field: stat.field(),
        }
    }
}

/// The full stat catalogue in table order.
pub fn catalogue() -> Vec<StatInfo> {
    Stat::ALL.into_iter().map(StatInfo::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_order_matches_index() {
        for (i, stat) in Stat::ALL.iter().enumerate() {
            assert_eq!(stat.index(), i);
        }
    }

    #[test]
    fn spellings_are_unique_across_table() {
        let mut seen = HashSet::new();
        for stat in Stat::ALL {
            for spelling in stat.spellings() {
                assert!(seen.insert(spelling), "duplicate spelling {spelling}");
            }
        }
    }

    #[test]
    fn from_symbol_is_case_insensitive() {
        assert_eq!(Stat::from_symbol("pts"), Some(Stat::Points));
        assert_eq!(Stat::from_symbol("Fg_Pct"), Some(Stat::FieldGoalPct));
        assert_eq!(Stat::from_symbol("XYZ"), None);
    }

    #[test]
    fn three_point_aliases_resolve_to_same_stat() {
        assert_eq!(Stat::from_symbol("3PA"), Some(Stat::ThreePointAttempts));
        assert_eq!(Stat::from_symbol("THREE_PA"), Some(Stat::ThreePointAttempts));
        assert_eq!(Stat::from_symbol("3P_PCT"), Some(Stat::ThreePointPct));
        assert_eq!(Stat::from_symbol("THREE_PCT"), Some(Stat::ThreePointPct));
    }

    #[test]
    fn abbreviation_list_is_in_table_order() {
        let list = Stat::abbreviation_list();
        assert!(list.starts_with("PTS, AST, REB, TOV"));
        assert!(list.ends_with("GP, W_PCT, PLUS_MINUS"));
    }

    #[test]
    fn serializes_as_abbreviation() {
        let json = serde_json::to_string(&vec![Stat::Points, Stat::ThreePointAttempts]).unwrap();
        assert_eq!(json, r#"["PTS","3PA"]"#);
        let back: Vec<Stat> = serde_json::from_str(r#"["reb","3P_PCT"]"#).unwrap();
        assert_eq!(back, vec![Stat::Rebounds, Stat::ThreePointPct]);
    }
}
