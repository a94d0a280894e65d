use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::model::{Post, PostDraft, PostKind, ProjectDetails};
use crate::state::{AppError, ComposeForm};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([A-Za-z0-9_\-]+)").expect("tag regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFilter {
    All,
    Following,
    Code,
    Projects,
}

impl FeedFilter {
    pub const ALL: [FeedFilter; 4] = [FeedFilter::All, FeedFilter::Following, FeedFilter::Code, FeedFilter::Projects];

    pub fn label(self) -> &'static str {
        match self {
            FeedFilter::All => "ALL",
            FeedFilter::Following => "FOLLOWING",
            FeedFilter::Code => "CODE",
            FeedFilter::Projects => "PROJECTS",
        }
    }

    pub fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Posts passing the feed filter and the free-text query (content, author or tag).
pub fn visible_posts<'a>(
    posts: &'a [Post],
    filter: FeedFilter,
    query: &str,
    following: &HashSet<Uuid>,
    me: Uuid,
) -> Vec<&'a Post> {
    let needle = query.trim().trim_start_matches('#').to_lowercase();
    posts
        .iter()
        .filter(|p| match filter {
            FeedFilter::All => true,
            FeedFilter::Following => following.contains(&p.user_id) || p.user_id == me,
            FeedFilter::Code => p.kind == PostKind::Code,
            FeedFilter::Projects => p.kind == PostKind::Project,
        })
        .filter(|p| {
            needle.is_empty()
                || p.content.to_lowercase().contains(&needle)
                || p.user.to_lowercase().contains(&needle)
                || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn extract_tags(content: &str) -> BTreeSet<String> {
    TAG_RE
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turn the compose form into a draft, enforcing what each post kind needs.
pub fn build_draft(form: &ComposeForm, max_len: usize) -> Result<PostDraft, AppError> {
    let content = form.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Post content cannot be empty.".into()));
    }
    if content.chars().count() > max_len {
        return Err(AppError::Validation(format!("Post too long (max {} characters).", max_len)));
    }

    let mut draft = PostDraft {
        content: content.to_string(),
        kind: form.kind,
        tags: extract_tags(content),
        code_snippet: None,
        code_language: None,
        project: None,
    };

    match form.kind {
        PostKind::Text => {}
        PostKind::Code => {
            if form.code_snippet.trim().is_empty() {
                return Err(AppError::Validation("Code posts need a snippet.".into()));
            }
            draft.code_snippet = Some(form.code_snippet.trim_end().to_string());
            let lang = form.code_language.trim();
            draft.code_language = Some(if lang.is_empty() { "text".to_string() } else { lang.to_lowercase() });
        }
        PostKind::Project => {
            if form.project_name.trim().is_empty() {
                return Err(AppError::Validation("Project posts need a project name.".into()));
            }
            draft.project = Some(ProjectDetails {
                name: form.project_name.trim().to_string(),
                description: form.project_description.trim().to_string(),
                tech_stack: split_list(&form.tech_stack),
                open_roles: split_list(&form.open_roles),
            });
        }
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(user_id: Uuid, user: &str, kind: PostKind, content: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            user_id,
            user: user.to_string(),
            avatar: String::new(),
            content: content.to_string(),
            tags: extract_tags(content),
            kind,
            code_snippet: None,
            code_language: None,
            project: None,
            likes: 0,
            comments: 0,
            is_liked: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn tags_are_lowercased_and_deduplicated() {
        let tags = extract_tags("Ship it #Rust #rust #hack_day no#tag? #");
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["hack_day", "rust", "tag"]);
    }

    #[test]
    fn following_filter_includes_own_posts() {
        let me = Uuid::new_v4();
        let friend = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let posts = vec![
            post(friend, "friend", PostKind::Text, "a"),
            post(stranger, "stranger", PostKind::Text, "b"),
            post(me, "me", PostKind::Text, "c"),
        ];
        let following = HashSet::from([friend]);
        let shown: Vec<_> = visible_posts(&posts, FeedFilter::Following, "", &following, me)
            .into_iter()
            .map(|p| p.user.as_str())
            .collect();
        assert_eq!(shown, vec!["friend", "me"]);
    }

    #[test]
    fn query_matches_author_content_and_tags() {
        let me = Uuid::new_v4();
        let posts = vec![
            post(me, "AcidBurn", PostKind::Text, "hello"),
            post(me, "Other", PostKind::Code, "look #rust"),
        ];
        let none = HashSet::new();
        assert_eq!(visible_posts(&posts, FeedFilter::All, "acid", &none, me).len(), 1);
        assert_eq!(visible_posts(&posts, FeedFilter::All, "#rust", &none, me).len(), 1);
        assert_eq!(visible_posts(&posts, FeedFilter::Code, "hello", &none, me).len(), 0);
    }

    #[test]
    fn drafts_enforce_kind_requirements() {
        let mut form = ComposeForm::default();
        assert!(build_draft(&form, 100).is_err());

        form.content = "new drop #Rust".into();
        let draft = build_draft(&form, 100).unwrap();
        assert!(draft.tags.contains("rust"));

        form.kind = PostKind::Code;
        assert!(build_draft(&form, 100).is_err());
        form.code_snippet = "fn main() {}\n".into();
        let draft = build_draft(&form, 100).unwrap();
        assert_eq!(draft.code_language.as_deref(), Some("text"));
        assert_eq!(draft.code_snippet.as_deref(), Some("fn main() {}"));

        form.kind = PostKind::Project;
        assert!(build_draft(&form, 100).is_err());
        form.project_name = "GhostWriter".into();
        form.tech_stack = "Rust, , React".into();
        let project = build_draft(&form, 100).unwrap().project.unwrap();
        assert_eq!(project.tech_stack, vec!["Rust", "React"]);

        form.content = "x".repeat(101);
        assert!(build_draft(&form, 100).is_err());
    }
}
