// Rule-based name suggestions for custom formulas.
//
// Purely local: keyword categories are scored against the upper-cased
// formula, then structure and a few special patterns pick the label.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedName {
    pub name: String,
    pub description: String,
}

impl SuggestedName {
    fn new(name: &str, description: &str) -> Self {
        SuggestedName {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Scoring,
    Playmaking,
    Rebounding,
    Defense,
    Efficiency,
    Shooting,
    Impact,
    Durability,
}

impl Category {
    const ALL: [Category; 8] = [
        Category::Scoring,
        Category::Playmaking,
        Category::Rebounding,
        Category::Defense,
        Category::Efficiency,
        Category::Shooting,
        Category::Impact,
        Category::Durability,
    ];

    /// Substrings that count toward this category. Matching is by
    /// substring, so `FG` also fires for `FGA` and `FG_PCT`.
    fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Scoring => &["PTS", "PPG", "FG", "THREE", "FT"],
            Category::Playmaking => &["AST", "APG"],
            Category::Rebounding => &["REB", "RPG"],
            Category::Defense => &["STL", "BLK", "SPG", "BPG"],
            Category::Efficiency => &["/", "TOV", "TPG"],
            Category::Shooting => &["FG_PCT", "FG%", "THREE_PCT", "3P%", "FT_PCT", "FT%"],
            Category::Impact => &["PLUS_MINUS", "+/-"],
            Category::Durability => &["GP", "MIN"],
        }
    }

    fn score(self, upper: &str) -> usize {
        self.keywords().iter().filter(|k| upper.contains(*k)).count()
    }
}

/// Suggest a display name and description for `formula`.
pub fn suggest_name(formula: &str) -> SuggestedName {
    let upper = formula.to_ascii_uppercase();

    let mut scored: Vec<(Category, usize)> = Category::ALL
        .into_iter()
        .map(|c| (c, c.score(&upper)))
        .filter(|&(_, score)| score > 0)
        .collect();
    // Stable, so equal scores keep declaration order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let mut suggestion = SuggestedName::new("Custom Metric", "A custom basketball statistic");
    let Some(&(primary, _)) = scored.first() else {
        return suggestion;
    };
    let secondary = scored.get(1).map(|&(c, _)| c);

    let has_division = formula.contains('/');
    let has_multiplication = formula.contains('*');
    let has_subtraction = formula.contains('-');

    if let Some(s) = structural_name(&upper, primary, secondary, has_division, has_multiplication)
    {
        suggestion = s;
    }

    if upper.contains("PTS") && upper.contains("AST") && upper.contains("REB") {
        suggestion = if upper.contains("STL") || upper.contains("BLK") {
            SuggestedName::new(
                "Complete Player",
                "Comprehensive metric covering all major statistical categories",
            )
        } else {
            SuggestedName::new(
                "Triple Threat",
                "Measures scoring, rebounding, and playmaking ability",
            )
        };
    }

    if has_subtraction && upper.contains("TOV") {
        suggestion = SuggestedName::new(
            "Clean Game Score",
            "Rewards positive contributions while penalizing turnovers",
        );
    }

    if upper.contains("GP") || upper.contains("MIN") {
        suggestion = SuggestedName::new(
            "Durability Factor",
            "Incorporates games played or minutes as a reliability measure",
        );
    }

    suggestion
}

fn structural_name(
    upper: &str,
    primary: Category,
    secondary: Option<Category>,
    has_division: bool,
    has_multiplication: bool,
) -> Option<SuggestedName> {
    use Category::*;

    if has_division {
        return Some(if upper.contains("TOV") {
            SuggestedName::new(
                "Efficiency Rating",
                "Measures productive output while minimizing turnovers",
            )
        } else {
            SuggestedName::new(
                "Production Rate",
                "Calculates statistical output per unit of measurement",
            )
        });
    }

    let named = match (primary, secondary) {
        (Scoring, Some(Playmaking)) => (
            "Offensive Impact",
            "Combines scoring and playmaking contributions",
        ),
        (Scoring, Some(Rebounding)) => (
            "Big Man Index",
            "Measures traditional big man statistical production",
        ),
        (Defense, Some(Rebounding)) => (
            "Defensive Presence",
            "Quantifies defensive impact through blocks, steals, and rebounds",
        ),
        (Playmaking, Some(Scoring)) => (
            "Point Guard Rating",
            "Emphasizes playmaking with scoring support",
        ),
        (Shooting, Some(Scoring)) => (
            "Shooter's Touch",
            "Measures scoring efficiency across different shot types",
        ),
        (Scoring, _) if has_multiplication => (
            "Scoring Punch",
            "Weighted scoring metric emphasizing volume and efficiency",
        ),
        (Scoring, _) => (
            "Offensive Output",
            "Measures total offensive statistical production",
        ),
        (Defense, _) => (
            "Defensive Impact",
            "Tracks defensive contributions through steals and blocks",
        ),
        (Playmaking, _) => (
            "Floor General",
            "Focuses on playmaking and team facilitation",
        ),
        (Rebounding, _) => (
            "Board Control",
            "Measures rebounding dominance and presence",
        ),
        (Efficiency, _) => (
            "Smart Play Index",
            "Rewards efficient play while penalizing mistakes",
        ),
        (Impact, _) => (
            "Winning Impact",
            "Incorporates team success metrics with individual stats",
        ),
        _ => return None,
    };
    Some(SuggestedName::new(named.0, named.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of(formula: &str) -> String {
        suggest_name(formula).name
    }

    #[test]
    fn no_keywords_gives_default() {
        let s = suggest_name("1 + 2");
        assert_eq!(s.name, "Custom Metric");
        assert_eq!(s.description, "A custom basketball statistic");
    }

    #[test]
    fn division_names() {
        assert_eq!(name_of("AST / TOV"), "Efficiency Rating");
        assert_eq!(name_of("PTS / FGA"), "Production Rate");
    }

    #[test]
    fn two_category_combinations() {
        assert_eq!(name_of("PTS + AST"), "Offensive Impact");
        assert_eq!(name_of("PTS + REB"), "Big Man Index");
        assert_eq!(name_of("STL + BLK + REB"), "Defensive Presence");
    }

    #[test]
    fn single_category_names() {
        assert_eq!(name_of("PTS * 2"), "Scoring Punch");
        assert_eq!(name_of("PTS + 1"), "Offensive Output");
        assert_eq!(name_of("STL + BLK"), "Defensive Impact");
        assert_eq!(name_of("AST"), "Floor General");
        assert_eq!(name_of("REB * 2"), "Board Control");
        assert_eq!(name_of("TOV * 2"), "Smart Play Index");
        assert_eq!(name_of("PLUS_MINUS * 2 + +/-"), "Durability Factor");
    }

    #[test]
    fn special_patterns_override_structure() {
        assert_eq!(name_of("PTS + AST + REB"), "Triple Threat");
        assert_eq!(name_of("PTS + AST + REB + STL"), "Complete Player");
        assert_eq!(name_of("PTS + REB + AST - TOV"), "Clean Game Score");
        assert_eq!(name_of("PTS * GP"), "Durability Factor");
    }

    #[test]
    fn case_is_ignored() {
        assert_eq!(name_of("pts + ast"), "Offensive Impact");
    }
}
