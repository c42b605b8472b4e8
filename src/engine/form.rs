use super::catalog::{normalize, TeamCatalog};
use crate::service::types::{AnalysisMode, TeamSelection};

/// How many catalog names an unknown-team message lists.
const SAMPLE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Both teams are required.")]
    MissingTeam,
    #[error("Please enter two different teams.")]
    SameTeam,
    #[error("Unknown team name \"{input}\". Available teams include: {}, etc.", .sample.join(", "))]
    UnknownTeam { input: String, sample: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Team1,
    Team2,
    Mode,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Team1 => FormField::Team2,
            FormField::Team2 => FormField::Mode,
            FormField::Mode => FormField::Team1,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Team1 => FormField::Mode,
            FormField::Team2 => FormField::Team1,
            FormField::Mode => FormField::Team2,
        }
    }
}

/// Raw field contents of the team selection form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub team1: String,
    pub team2: String,
    pub mode: AnalysisMode,
    pub focus: FormField,
}

impl FormState {
    pub fn new(mode: AnalysisMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Team1 => Some(&mut self.team1),
            FormField::Team2 => Some(&mut self.team2),
            FormField::Mode => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.focused_text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
    }

    /// Submit stays disabled until both fields hold something.
    pub fn is_filled(&self) -> bool {
        !self.team1.is_empty() && !self.team2.is_empty()
    }

    /// Validate the current fields. Checks run in a fixed order: presence,
    /// distinctness, then catalog membership.
    pub fn submit(&self, catalog: Option<&TeamCatalog>) -> Result<TeamSelection, ValidationError> {
        let team1 = self.team1.trim();
        let team2 = self.team2.trim();
        if team1.is_empty() || team2.is_empty() {
            return Err(ValidationError::MissingTeam);
        }
        if normalize(team1) == normalize(team2) {
            return Err(ValidationError::SameTeam);
        }

        let (team1, team2) = match catalog {
            Some(catalog) => (
                resolve_or_reject(catalog, team1)?,
                resolve_or_reject(catalog, team2)?,
            ),
            None => (team1.to_string(), team2.to_string()),
        };

        Ok(TeamSelection {
            team1,
            team2,
            mode: self.mode,
        })
    }

    /// Suggestions for a team field: catalog entries matching what has been
    /// typed, never including the team chosen in the other field.
    pub fn candidates<'a>(&self, catalog: &'a TeamCatalog, field: FormField) -> Vec<&'a str> {
        let (query, other) = match field {
            FormField::Team1 => (&self.team1, &self.team2),
            FormField::Team2 => (&self.team2, &self.team1),
            FormField::Mode => return Vec::new(),
        };
        let exclude = catalog.resolve(other);
        catalog.candidates(query, exclude)
    }

    /// Replace the focused team field with its first suggestion.
    pub fn accept_candidate(&mut self, catalog: &TeamCatalog) -> bool {
        let first = self
            .candidates(catalog, self.focus)
            .first()
            .map(|s| s.to_string());
        match (first, self.focused_text_mut()) {
            (Some(name), Some(text)) => {
                *text = name;
                true
            }
            _ => false,
        }
    }
}

fn resolve_or_reject(catalog: &TeamCatalog, input: &str) -> Result<String, ValidationError> {
    catalog
        .resolve(input)
        .map(str::to_string)
        .ok_or_else(|| ValidationError::UnknownTeam {
            input: input.to_string(),
            sample: catalog.sample(SAMPLE_SIZE),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(team1: &str, team2: &str) -> FormState {
        FormState {
            team1: team1.to_string(),
            team2: team2.to_string(),
            mode: AnalysisMode::Advanced,
            focus: FormField::Team1,
        }
    }

    #[test]
    fn test_valid_free_text_selection_is_trimmed() {
        let selection = form("  Arsenal ", "Chelsea").submit(None).unwrap();
        assert_eq!(selection.team1, "Arsenal");
        assert_eq!(selection.team2, "Chelsea");
        assert_eq!(selection.mode, AnalysisMode::Advanced);
    }

    #[test]
    fn test_blank_team_is_missing() {
        assert_eq!(form("Arsenal", "   ").submit(None), Err(ValidationError::MissingTeam));
        assert_eq!(form("", "Chelsea").submit(None), Err(ValidationError::MissingTeam));
    }

    #[test]
    fn test_case_differing_duplicate_rejected() {
        assert_eq!(form("Arsenal", "arsenal").submit(None), Err(ValidationError::SameTeam));
        let catalog = TeamCatalog::builtin();
        assert_eq!(
            form("Arsenal", " ARSENAL").submit(Some(&catalog)),
            Err(ValidationError::SameTeam)
        );
    }

    #[test]
    fn test_missing_checked_before_duplicate() {
        assert_eq!(form(" ", " ").submit(None), Err(ValidationError::MissingTeam));
    }

    #[test]
    fn test_duplicate_checked_before_catalog() {
        let catalog = TeamCatalog::builtin();
        assert_eq!(
            form("Real Madrid", "real madrid").submit(Some(&catalog)),
            Err(ValidationError::SameTeam)
        );
    }

    #[test]
    fn test_catalog_resolves_canonical_casing() {
        let catalog = TeamCatalog::builtin();
        let selection = form("manchester city", "WEST  HAM").submit(Some(&catalog)).unwrap();
        assert_eq!(selection.team1, "Manchester City");
        assert_eq!(selection.team2, "West Ham");
    }

    #[test]
    fn test_unknown_team_lists_sample() {
        let catalog = TeamCatalog::builtin();
        let err = form("Arsenal", "Real Madrid").submit(Some(&catalog)).unwrap_err();
        match &err {
            ValidationError::UnknownTeam { input, sample } => {
                assert_eq!(input, "Real Madrid");
                assert_eq!(sample.len(), 5);
                assert_eq!(sample[0], "Arsenal");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        let message = err.to_string();
        assert!(message.starts_with("Unknown team name \"Real Madrid\""));
        assert!(message.contains("Arsenal, Aston Villa, Bournemouth, Brentford, Brighton, etc."));
    }

    #[test]
    fn test_candidates_hide_other_field_selection() {
        let catalog = TeamCatalog::builtin();
        let f = form("arsenal", "a");
        let team2 = f.candidates(&catalog, FormField::Team2);
        assert!(!team2.contains(&"Arsenal"));
        assert!(team2.contains(&"Aston Villa"));

        let f = form("", "Chelsea");
        let team1 = f.candidates(&catalog, FormField::Team1);
        assert_eq!(team1.len(), 19);
        assert!(!team1.contains(&"Chelsea"));
        assert!(f.candidates(&catalog, FormField::Mode).is_empty());
    }

    #[test]
    fn test_accept_candidate_fills_focused_field() {
        let catalog = TeamCatalog::builtin();
        let mut f = form("totten", "");
        assert!(f.accept_candidate(&catalog));
        assert_eq!(f.team1, "Tottenham");

        f.focus = FormField::Mode;
        assert!(!f.accept_candidate(&catalog));

        f.focus = FormField::Team2;
        f.team2 = "zzz".to_string();
        assert!(!f.accept_candidate(&catalog));
        assert_eq!(f.team2, "zzz");
    }

    #[test]
    fn test_editing_follows_focus() {
        let mut f = FormState::new(AnalysisMode::Basic);
        f.push_char('A');
        f.focus_next();
        f.push_char('B');
        f.push_char('C');
        f.backspace();
        f.focus_next();
        f.push_char('X');
        f.toggle_mode();
        assert_eq!(f.team1, "A");
        assert_eq!(f.team2, "B");
        assert_eq!(f.mode, AnalysisMode::Advanced);
        assert!(f.is_filled());
        f.focus_prev();
        assert_eq!(f.focus, FormField::Team2);
    }
}
