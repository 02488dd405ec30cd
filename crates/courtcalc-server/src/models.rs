// Request bodies and query strings accepted by the API.

use serde::{Deserialize, Serialize};

/// Body shared by the validate and name endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormulaRequest {
    #[serde(default)]
    pub formula: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub formula: Option<String>,
    /// Restrict the dataset to one season, e.g. `"2024-25"`.
    #[serde(default)]
    pub season: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomStatRequest {
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayersQuery {
    pub season: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomStatsQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Trimmed, non-empty formula text, if any.
pub fn required_formula(formula: Option<&str>) -> Option<&str> {
    formula.map(str::trim).filter(|f| !f.is_empty())
}

/// Treat a blank query or body value as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_formulas_are_missing() {
        assert_eq!(required_formula(None), None);
        assert_eq!(required_formula(Some("")), None);
        assert_eq!(required_formula(Some("  \t")), None);
        assert_eq!(required_formula(Some(" PTS ")), Some("PTS"));
    }

    #[test]
    fn custom_stat_request_uses_camel_case() {
        let req: CreateCustomStatRequest =
            serde_json::from_str(r#"{"formula":"PTS","userId":"u1"}"#).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u1"));
        assert!(req.name.is_none());
    }
}
