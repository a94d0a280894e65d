use once_cell::sync::Lazy;
use regex::Regex;

use crate::state::AppError;

static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@([a-zA-Z0-9_]+)").expect("mention regex"));

/// Service for message validation and processing
pub struct MessageService;

impl MessageService {
    /// Validate chat or direct-message content, returning it trimmed.
    pub fn validate_message(content: &str, max_len: usize) -> Result<String, AppError> {
        let trimmed = content.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation("Message cannot be empty".to_string()));
        }

        if trimmed.chars().count() > max_len {
            return Err(AppError::Validation(format!("Message too long (max {} characters)", max_len)));
        }

        Ok(trimmed.to_string())
    }

    /// Extract mentioned names from message content
    pub fn extract_mentions(content: &str) -> Vec<String> {
        MENTION_RE
            .captures_iter(content)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// True if `content` mentions `name`, ignoring case.
    pub fn mentions(content: &str, name: &str) -> bool {
        Self::extract_mentions(content)
            .iter()
            .any(|m| m.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_and_oversized_messages() {
        assert!(MessageService::validate_message("   \n", 10).is_err());
        assert!(MessageService::validate_message("x".repeat(11).as_str(), 10).is_err());
        assert_eq!(MessageService::validate_message("  hi  ", 10).unwrap(), "hi");
    }

    #[test]
    fn finds_mentions() {
        let content = "ping @ZeroCool and @acid_burn, not email@";
        assert_eq!(MessageService::extract_mentions(content), vec!["ZeroCool", "acid_burn"]);
        assert!(MessageService::mentions(content, "zerocool"));
        assert!(!MessageService::mentions(content, "NeonViper"));
    }
}
