use crate::model::{ProfileUpdate, Socials, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTab {
    Profile,
    Preferences,
    Integrations,
    Account,
}

impl SettingsTab {
    pub const ALL: [SettingsTab; 4] = [
        SettingsTab::Profile,
        SettingsTab::Preferences,
        SettingsTab::Integrations,
        SettingsTab::Account,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SettingsTab::Profile => "Profile",
            SettingsTab::Preferences => "Preferences",
            SettingsTab::Integrations => "Integrations",
            SettingsTab::Account => "Account",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn cycle(self, forward: bool) -> Self {
        let len = Self::ALL.len();
        let idx = self.index();
        Self::ALL[if forward { (idx + 1) % len } else { (idx + len - 1) % len }]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Role,
    Bio,
    Skills,
    Github,
    Linkedin,
    Twitter,
    Website,
    Save,
}

impl ProfileField {
    const ORDER: [ProfileField; 9] = [
        ProfileField::Name,
        ProfileField::Role,
        ProfileField::Bio,
        ProfileField::Skills,
        ProfileField::Github,
        ProfileField::Linkedin,
        ProfileField::Twitter,
        ProfileField::Website,
        ProfileField::Save,
    ];

    pub fn next(self, forward: bool) -> Self {
        let len = Self::ORDER.len();
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[if forward { (idx + 1) % len } else { (idx + len - 1) % len }]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileForm {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub skills: String,
    pub github: String,
    pub linkedin: String,
    pub twitter: String,
    pub website: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            role: user.role.clone(),
            bio: user.bio.clone(),
            skills: user.skills.join(", "),
            github: user.socials.github.clone().unwrap_or_default(),
            linkedin: user.socials.linkedin.clone().unwrap_or_default(),
            twitter: user.socials.twitter.clone().unwrap_or_default(),
            website: user.socials.website.clone().unwrap_or_default(),
        }
    }

    pub fn field_mut(&mut self, field: ProfileField) -> Option<&mut String> {
        match field {
            ProfileField::Name => Some(&mut self.name),
            ProfileField::Role => Some(&mut self.role),
            ProfileField::Bio => Some(&mut self.bio),
            ProfileField::Skills => Some(&mut self.skills),
            ProfileField::Github => Some(&mut self.github),
            ProfileField::Linkedin => Some(&mut self.linkedin),
            ProfileField::Twitter => Some(&mut self.twitter),
            ProfileField::Website => Some(&mut self.website),
            ProfileField::Save => None,
        }
    }

    pub fn to_update(&self) -> ProfileUpdate {
        fn opt(s: &str) -> Option<String> {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        ProfileUpdate {
            name: Some(self.name.trim().to_string()),
            role: Some(self.role.trim().to_string()),
            bio: Some(self.bio.trim().to_string()),
            skills: Some(
                self.skills
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            socials: Some(Socials {
                github: opt(&self.github),
                linkedin: opt(&self.linkedin),
                twitter: opt(&self.twitter),
                website: opt(&self.website),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceItem {
    Theme,
    EmailNotifications,
    PublicProfile,
    ShowOnlineStatus,
    PresenceSidebar,
    CompactFeed,
}

impl PreferenceItem {
    pub const ALL: [PreferenceItem; 6] = [
        PreferenceItem::Theme,
        PreferenceItem::EmailNotifications,
        PreferenceItem::PublicProfile,
        PreferenceItem::ShowOnlineStatus,
        PreferenceItem::PresenceSidebar,
        PreferenceItem::CompactFeed,
    ];
}

#[derive(Debug)]
pub struct SettingsState {
    pub tab: SettingsTab,
    pub profile_form: ProfileForm,
    pub profile_field: ProfileField,
    pub profile_error: Option<String>,
    pub saving: bool,
    pub pref_selected: usize,
    pub github_input: String,
    pub github_error: Option<String>,
    pub editing_github: bool,
    pub confirm_logout: bool,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            tab: SettingsTab::Profile,
            profile_form: ProfileForm::default(),
            profile_field: ProfileField::Name,
            profile_error: None,
            saving: false,
            pref_selected: 0,
            github_input: String::new(),
            github_error: None,
            editing_github: false,
            confirm_logout: false,
        }
    }
}

impl SettingsState {
    pub fn load_profile(&mut self, user: &User) {
        self.profile_form = ProfileForm::from_user(user);
        self.profile_field = ProfileField::Name;
        self.profile_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserPreferences;
    use uuid::Uuid;

    #[test]
    fn profile_form_round_trips_through_an_update() {
        let user = User {
            id: Uuid::new_v4(),
            name: "ZeroCool".into(),
            avatar: "ZC".into(),
            role: "Full-Stack".into(),
            rank: "Elite".into(),
            reputation: 1,
            skills: vec!["Rust".into(), "React".into()],
            bio: "hi".into(),
            socials: Socials { github: Some("zerocool".into()), ..Socials::default() },
            preferences: UserPreferences::default(),
            github_username: None,
            github_connected: false,
        };
        let mut form = ProfileForm::from_user(&user);
        assert_eq!(form.skills, "Rust, React");
        form.skills.push_str(", , Go ");
        form.twitter = "   ".into();

        let update = form.to_update();
        assert_eq!(update.skills.unwrap(), vec!["Rust", "React", "Go"]);
        let socials = update.socials.unwrap();
        assert_eq!(socials.github.as_deref(), Some("zerocool"));
        assert_eq!(socials.twitter, None);
    }
}
