use uuid::Uuid;

use crate::model::{PostComment, PostKind};
use crate::services::feed::FeedFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityFocus {
    Feed,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
    Kind,
    Content,
    CodeLanguage,
    CodeSnippet,
    ProjectName,
    ProjectDescription,
    TechStack,
    OpenRoles,
    Submit,
}

impl ComposeField {
    /// Fields shown for a given post kind, in focus order.
    pub fn for_kind(kind: PostKind) -> &'static [ComposeField] {
        use ComposeField::*;
        match kind {
            PostKind::Text => &[Kind, Content, Submit],
            PostKind::Code => &[Kind, Content, CodeLanguage, CodeSnippet, Submit],
            PostKind::Project => &[Kind, Content, ProjectName, ProjectDescription, TechStack, OpenRoles, Submit],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposeForm {
    pub kind: PostKind,
    pub content: String,
    pub code_language: String,
    pub code_snippet: String,
    pub project_name: String,
    pub project_description: String,
    pub tech_stack: String,
    pub open_roles: String,
    pub field: ComposeField,
    pub error: Option<String>,
}

impl Default for ComposeForm {
    fn default() -> Self {
        Self {
            kind: PostKind::Text,
            content: String::new(),
            code_language: String::new(),
            code_snippet: String::new(),
            project_name: String::new(),
            project_description: String::new(),
            tech_stack: String::new(),
            open_roles: String::new(),
            field: ComposeField::Content,
            error: None,
        }
    }
}

impl ComposeForm {
    pub fn focus_next(&mut self, forward: bool) {
        let fields = ComposeField::for_kind(self.kind);
        let idx = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        let next = if forward { (idx + 1) % fields.len() } else { (idx + fields.len() - 1) % fields.len() };
        self.field = fields[next];
    }

    pub fn cycle_kind(&mut self) {
        self.kind = self.kind.next();
        self.field = ComposeField::Kind;
    }

    pub fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            ComposeField::Content => Some(&mut self.content),
            ComposeField::CodeLanguage => Some(&mut self.code_language),
            ComposeField::CodeSnippet => Some(&mut self.code_snippet),
            ComposeField::ProjectName => Some(&mut self.project_name),
            ComposeField::ProjectDescription => Some(&mut self.project_description),
            ComposeField::TechStack => Some(&mut self.tech_stack),
            ComposeField::OpenRoles => Some(&mut self.open_roles),
            ComposeField::Kind | ComposeField::Submit => None,
        }
    }
}

/// Open post detail. Comments land here only if `post_id` and `generation` still match.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub post_id: Uuid,
    pub generation: u64,
    pub comments: Vec<PostComment>,
    pub loading: bool,
    pub input: String,
    pub reply_to: Option<Uuid>,
    pub selected_comment: usize,
}

impl PostDetail {
    /// Comments flattened in display order: each top-level comment followed by its replies.
    pub fn flattened(&self) -> Vec<(&PostComment, bool)> {
        let mut out = Vec::new();
        for comment in &self.comments {
            out.push((comment, false));
            for reply in &comment.replies {
                out.push((reply, true));
            }
        }
        out
    }
}

#[derive(Debug)]
pub struct CommunityState {
    pub filter: FeedFilter,
    pub query: String,
    pub focus: CommunityFocus,
    pub selected: usize,
    pub compose: Option<ComposeForm>,
    pub detail: Option<PostDetail>,
}

impl Default for CommunityState {
    fn default() -> Self {
        Self {
            filter: FeedFilter::All,
            query: String::new(),
            focus: CommunityFocus::Feed,
            selected: 0,
            compose: None,
            detail: None,
        }
    }
}

impl CommunityState {
    pub fn open_detail(&mut self, post_id: Uuid, generation: u64) {
        self.detail = Some(PostDetail {
            post_id,
            generation,
            comments: Vec::new(),
            loading: true,
            input: String::new(),
            reply_to: None,
            selected_comment: 0,
        });
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Apply loaded comments if the modal that asked for them is still the one on screen.
    pub fn accept_comments(&mut self, post_id: Uuid, generation: u64, comments: Vec<PostComment>) -> bool {
        match &mut self.detail {
            Some(detail) if detail.post_id == post_id && detail.generation == generation => {
                detail.comments = comments;
                detail.loading = false;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(content: &str, replies: Vec<PostComment>) -> PostComment {
        PostComment {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            author_name: "AcidBurn".into(),
            author_avatar: "AB".into(),
            content: content.into(),
            created_at: Utc::now(),
            replies,
        }
    }

    #[test]
    fn comments_for_a_closed_modal_are_dropped() {
        let mut state = CommunityState::default();
        let post = Uuid::new_v4();
        state.open_detail(post, 1);
        state.close_detail();
        assert!(!state.accept_comments(post, 1, vec![comment("late", vec![])]));
        assert!(state.detail.is_none());
    }

    #[test]
    fn comments_for_a_reopened_modal_need_the_new_generation() {
        let mut state = CommunityState::default();
        let post = Uuid::new_v4();
        state.open_detail(post, 1);
        state.open_detail(post, 2);
        assert!(!state.accept_comments(post, 1, vec![comment("stale", vec![])]));
        assert!(state.accept_comments(post, 2, vec![comment("fresh", vec![])]));
        let detail = state.detail.as_ref().unwrap();
        assert!(!detail.loading);
        assert_eq!(detail.comments[0].content, "fresh");
    }

    #[test]
    fn flattened_interleaves_replies() {
        let mut state = CommunityState::default();
        let post = Uuid::new_v4();
        state.open_detail(post, 1);
        state.accept_comments(
            post,
            1,
            vec![comment("a", vec![comment("a1", vec![]), comment("a2", vec![])]), comment("b", vec![])],
        );
        let flat: Vec<_> = state
            .detail
            .as_ref()
            .unwrap()
            .flattened()
            .into_iter()
            .map(|(c, nested)| (c.content.as_str(), nested))
            .collect();
        assert_eq!(flat, vec![("a", false), ("a1", true), ("a2", true), ("b", false)]);
    }

    #[test]
    fn compose_focus_follows_kind() {
        let mut form = ComposeForm::default();
        form.cycle_kind();
        assert_eq!(form.kind, PostKind::Code);
        form.focus_next(true);
        assert_eq!(form.field, ComposeField::Content);
        form.focus_next(true);
        assert_eq!(form.field, ComposeField::CodeLanguage);
        form.focus_next(false);
        form.focus_next(false);
        form.focus_next(false);
        assert_eq!(form.field, ComposeField::Submit);
    }
}
