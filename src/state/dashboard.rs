use crate::model::{TeamDraft, Visibility};
use crate::state::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardFocus {
    Teams,
    Board,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamField {
    Name,
    Event,
    Kind,
    Visibility,
    MaxMembers,
    Submit,
}

impl TeamField {
    const ORDER: [TeamField; 6] = [
        TeamField::Name,
        TeamField::Event,
        TeamField::Kind,
        TeamField::Visibility,
        TeamField::MaxMembers,
        TeamField::Submit,
    ];

    pub fn next(self, forward: bool) -> Self {
        let len = Self::ORDER.len();
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[if forward { (idx + 1) % len } else { (idx + len - 1) % len }]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamForm {
    pub name: String,
    pub event: String,
    pub kind: String,
    pub visibility: Visibility,
    pub max_members: String,
    pub field: TeamField,
    pub error: Option<String>,
}

impl Default for TeamForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            event: String::new(),
            kind: "Hackathon".to_string(),
            visibility: Visibility::Public,
            max_members: "4".to_string(),
            field: TeamField::Name,
            error: None,
        }
    }
}

impl TeamForm {
    pub fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            TeamField::Name => Some(&mut self.name),
            TeamField::Event => Some(&mut self.event),
            TeamField::Kind => Some(&mut self.kind),
            TeamField::MaxMembers => Some(&mut self.max_members),
            TeamField::Visibility | TeamField::Submit => None,
        }
    }

    pub fn toggle_visibility(&mut self) {
        self.visibility = match self.visibility {
            Visibility::Public => Visibility::Private,
            Visibility::Private => Visibility::Public,
        };
    }

    pub fn to_draft(&self) -> Result<TeamDraft, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Squad name cannot be empty.".into()));
        }
        if name.chars().count() > 40 {
            return Err(AppError::Validation("Squad name must be 40 characters or less.".into()));
        }
        let max_members: u32 = self
            .max_members
            .trim()
            .parse()
            .map_err(|_| AppError::Validation("Max members must be a number.".into()))?;
        if !(2..=10).contains(&max_members) {
            return Err(AppError::Validation("Max members must be between 2 and 10.".into()));
        }
        Ok(TeamDraft {
            name: name.to_string(),
            event: self.event.trim().to_string(),
            kind: self.kind.trim().to_string(),
            visibility: self.visibility,
            max_members,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JoinForm {
    pub code: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardForm {
    CreateTeam(TeamForm),
    JoinTeam(JoinForm),
}

#[derive(Debug)]
pub struct DashboardState {
    pub focus: DashboardFocus,
    pub team_selected: usize,
    pub board_selected: usize,
    pub board_query: String,
    pub editing_query: bool,
    pub form: Option<DashboardForm>,
    /// A create/join request is in flight.
    pub pending: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            focus: DashboardFocus::Teams,
            team_selected: 0,
            board_selected: 0,
            board_query: String::new(),
            editing_query: false,
            form: None,
            pending: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_form_validates_before_building_a_draft() {
        let mut form = TeamForm::default();
        assert!(matches!(form.to_draft(), Err(AppError::Validation(_))));

        form.name = "  Neon  ".into();
        form.max_members = "eleven".into();
        assert!(form.to_draft().is_err());

        form.max_members = "11".into();
        assert!(form.to_draft().is_err());

        form.max_members = "5".into();
        form.toggle_visibility();
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.name, "Neon");
        assert_eq!(draft.max_members, 5);
        assert_eq!(draft.visibility, Visibility::Private);
    }

    #[test]
    fn team_field_order_wraps() {
        assert_eq!(TeamField::Submit.next(true), TeamField::Name);
        assert_eq!(TeamField::Name.next(false), TeamField::Submit);
    }
}
