// Example formulas offered to users as starting points.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExampleFormula {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

pub const EXAMPLE_FORMULAS: &[ExampleFormula] = &[
    ExampleFormula {
        name: "True Shooting % (TS%)",
        formula: "PTS / (2 * (FGA + (0.44 * FTA)))",
        description: "Combines all forms of scoring into one metric - field goals, 3-pointers, and free throws",
    },
    ExampleFormula {
        name: "Effective FG% (eFG%)",
        formula: "((FGA * FG_PCT) + (0.5 * 3PA * THREE_PCT)) / FGA",
        description: "Shooting efficiency that weights 3-pointers as 1.5x more valuable than 2-pointers",
    },
    ExampleFormula {
        name: "Player Efficiency Rating",
        formula: "PTS + REB + AST - TOV",
        description: "Basic efficiency combining production and protecting the ball",
    },
    ExampleFormula {
        name: "Impact Score",
        formula: "(PTS + AST) * PLUS_MINUS / MIN",
        description: "Per-minute impact weighted by team performance",
    },
    ExampleFormula {
        name: "Shooting Efficiency",
        formula: "PTS * FG_PCT * FT_PCT",
        description: "Points scored weighted by shooting accuracy",
    },
    ExampleFormula {
        name: "Defensive Impact",
        formula: "STL + BLK - (TOV / 2)",
        description: "Defensive contributions minus half of turnovers",
    },
    ExampleFormula {
        name: "Balanced Scorer",
        formula: "(PTS + AST + REB) / (TOV + 1)",
        description: "Well-rounded production with turnover penalty",
    },
    ExampleFormula {
        name: "Usage Rate (USG%)",
        formula: "100 * (0.33 * AST + FGA + 0.44 * FTA + TOV) / (MIN * 2.4)",
        description: "Usage rate - percentage of team possessions used by player (using minutes played x 2.4 as possession estimate)",
    },
    ExampleFormula {
        name: "Winning Impact",
        formula: "PTS * W_PCT + AST * W_PCT",
        description: "Offensive production weighted by team success when player plays",
    },
    ExampleFormula {
        name: "3 Point Attempt Rate",
        formula: "3PA / FGA",
        description: "Percentage of field goal attempts that are three-pointers",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;
    use crate::validate::validate;

    #[test]
    fn every_example_validates_and_parses() {
        for example in EXAMPLE_FORMULAS {
            let v = validate(example.formula);
            assert!(v.is_valid, "{}: {:?}", example.name, v.error);
            Formula::parse(example.formula)
                .unwrap_or_else(|e| panic!("{} failed to parse: {e}", example.name));
        }
    }

    #[test]
    fn example_names_are_unique() {
        let mut names: Vec<&str> = EXAMPLE_FORMULAS.iter().map(|e| e.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EXAMPLE_FORMULAS.len());
    }
}
