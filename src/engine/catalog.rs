use crate::config::{CatalogConfig, CatalogSource};
use crate::service::PredictionService;

/// Premier League clubs used when the service cannot supply its own list.
pub const FALLBACK_TEAMS: [&str; 20] = [
    "Arsenal",
    "Aston Villa",
    "Brighton",
    "Burnley",
    "Chelsea",
    "Crystal Palace",
    "Everton",
    "Fulham",
    "Liverpool",
    "Luton Town",
    "Manchester City",
    "Manchester Utd",
    "Newcastle Utd",
    "Nottingham Forest",
    "Sheffield Utd",
    "Tottenham",
    "West Ham",
    "Wolves",
    "Bournemouth",
    "Brentford",
];

/// Matching key for team names: trimmed, inner whitespace runs collapsed to
/// one space, lowercased. Diacritics are left alone.
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Read-only set of canonical team names, kept in alphabetical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamCatalog {
    teams: Vec<String>,
}

impl TeamCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut teams: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        teams.sort_by_key(|t| normalize(t));
        teams.dedup_by(|a, b| normalize(a) == normalize(b));
        Self { teams }
    }

    pub fn builtin() -> Self {
        Self::new(FALLBACK_TEAMS)
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Canonical spelling of `input`, if the catalog knows it.
    pub fn resolve(&self, input: &str) -> Option<&str> {
        let key = normalize(input);
        if key.is_empty() {
            return None;
        }
        self.teams
            .iter()
            .find(|t| normalize(t) == key)
            .map(String::as_str)
    }

    pub fn sample(&self, n: usize) -> Vec<String> {
        self.teams.iter().take(n).cloned().collect()
    }

    /// Entries containing `query` (case-insensitive), minus `exclude`.
    pub fn candidates(&self, query: &str, exclude: Option<&str>) -> Vec<&str> {
        let query = normalize(query);
        let exclude = exclude.map(normalize);
        self.teams
            .iter()
            .filter(|t| {
                let key = normalize(t);
                key.contains(&query) && exclude.as_deref() != Some(key.as_str())
            })
            .map(String::as_str)
            .collect()
    }
}

/// Build the catalog the form validates against.
pub async fn load_catalog(
    config: &CatalogConfig,
    service: &dyn PredictionService,
) -> Option<TeamCatalog> {
    if let Some(teams) = &config.teams {
        return Some(TeamCatalog::new(teams));
    }
    match config.source {
        CatalogSource::None => None,
        CatalogSource::Builtin => Some(TeamCatalog::builtin()),
        CatalogSource::Service => match service.fetch_teams().await {
            Ok(teams) if !teams.is_empty() => {
                tracing::info!(count = teams.len(), "team catalog loaded from service");
                Some(TeamCatalog::new(teams))
            }
            Ok(_) => {
                tracing::warn!("service returned an empty team list, using built-in catalog");
                Some(TeamCatalog::builtin())
            }
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "team list fetch failed, using built-in catalog");
                Some(TeamCatalog::builtin())
            }
        },
    }
}
