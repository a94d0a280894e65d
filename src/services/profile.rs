use once_cell::sync::Lazy;
use regex::Regex;

use crate::state::{AppError, ProfileForm};

static GITHUB_USER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9]){0,38}$").expect("github username regex"));

/// Service for profile validation
pub struct ProfileService;

impl ProfileService {
    pub fn validate_profile(form: &ProfileForm) -> Result<(), AppError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Display name cannot be empty".to_string()));
        }
        if name.chars().count() > 32 {
            return Err(AppError::Validation("Display name must be 32 characters or less".to_string()));
        }
        if form.bio.chars().count() > 500 {
            return Err(AppError::Validation("Bio must be 500 characters or less".to_string()));
        }

        for (label, url) in [("LinkedIn", &form.linkedin), ("Website", &form.website)] {
            let url = url.trim();
            if !url.is_empty() && !Self::is_valid_url(url) {
                return Err(AppError::Validation(format!("{} link is not a valid URL", label)));
            }
        }

        let github = form.github.trim();
        if !github.is_empty() && !Self::is_valid_github_username(github) {
            return Err(AppError::Validation("GitHub username is not valid".to_string()));
        }

        Ok(())
    }

    pub fn is_valid_url(url: &str) -> bool {
        url.starts_with("http://") || url.starts_with("https://")
    }

    pub fn is_valid_github_username(username: &str) -> bool {
        GITHUB_USER_RE.is_match(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProfileForm {
        ProfileForm { name: "ZeroCool".into(), ..ProfileForm::default() }
    }

    #[test]
    fn accepts_a_minimal_profile() {
        assert!(ProfileService::validate_profile(&form()).is_ok());
    }

    #[test]
    fn rejects_bad_fields() {
        let mut f = form();
        f.name = "  ".into();
        assert!(ProfileService::validate_profile(&f).is_err());

        let mut f = form();
        f.website = "example.com".into();
        assert!(ProfileService::validate_profile(&f).is_err());

        let mut f = form();
        f.bio = "x".repeat(501);
        assert!(ProfileService::validate_profile(&f).is_err());
    }

    #[test]
    fn github_usernames() {
        assert!(ProfileService::is_valid_github_username("zero-cool"));
        assert!(!ProfileService::is_valid_github_username("-zero"));
        assert!(!ProfileService::is_valid_github_username("zero--cool"));
        assert!(!ProfileService::is_valid_github_username("has space"));
    }
}
