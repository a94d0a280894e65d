use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{BackendEvent, BackendRequest, FollowListKind, Lookup, Snapshot};
use crate::global_prefs::{update_local_prefs, LocalPrefs};
use crate::model::{Bounty, DirectMessage, Post, PreferencesUpdate, User};
use crate::services::bounties::filter_bounties;
use crate::services::feed::visible_posts;
use crate::services::tasks::{prioritized_board, BoardTask};
use crate::services::{ConversationPreview, ThreadCache};
use crate::state::dashboard::JoinForm;
use crate::state::settings::PreferenceItem;
use crate::state::{
    AppConfig, AppError, AppMode, BountyState, CommsAction, CommsMode, CommsState, CommunityState,
    DashboardForm, DashboardState, DataState, FollowListPopup, NotificationState, OpenRequest,
    SearchState, SettingsState, ToastLevel, UiState,
};

pub struct App {
    pub config: AppConfig,
    pub ui: UiState,
    pub notifications: NotificationState,
    pub data: DataState,
    pub comms: CommsState,
    pub search: SearchState,
    pub community: CommunityState,
    pub dashboard: DashboardState,
    pub bounty: BountyState,
    pub settings: SettingsState,
    pub threads: ThreadCache,
    pub to_backend: mpsc::UnboundedSender<BackendRequest>,
    next_generation: u64,
    /// Reload the profile form from the next snapshot (first load, or after a save).
    profile_stale: bool,
}

impl App {
    pub fn new(to_backend: mpsc::UnboundedSender<BackendRequest>, config: AppConfig, prefs: &LocalPrefs) -> App {
        let ui = UiState {
            show_presence: prefs.show_presence,
            compact: prefs.compact_feed,
            ..UiState::default()
        };
        App {
            search: SearchState::new(config.search_debounce),
            comms: CommsState::new(prefs.default_comms_mode),
            config,
            ui,
            notifications: NotificationState::default(),
            data: DataState::default(),
            community: CommunityState::default(),
            dashboard: DashboardState::default(),
            bounty: BountyState::default(),
            settings: SettingsState::default(),
            threads: ThreadCache::default(),
            to_backend,
            next_generation: 0,
            profile_stale: true,
        }
    }

    /// Fresh token for requests whose answer targets ephemeral UI state.
    pub fn next_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    pub fn send(&mut self, request: BackendRequest) {
        if let Err(e) = self.to_backend.send(request) {
            let error = AppError::Channel("backend unavailable".into());
            warn!(op = e.0.op(), %error, "backend worker is gone");
            self.set_toast(error.to_string(), ToastLevel::Error, None);
        }
    }

    /// `ms = None` keeps the toast until the next key press.
    pub fn set_toast(&mut self, message: impl Into<String>, level: ToastLevel, ms: Option<u64>) {
        let close_tick = ms.map(|ms| self.ui.tick_count + self.config.ticks_for(ms));
        self.notifications.set_toast(message, level, close_tick);
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.data.snapshot.as_ref()
    }

    pub fn me(&self) -> Option<Uuid> {
        self.data.user_id()
    }

    pub fn on_tick(&mut self) {
        self.ui.tick();
        if self.notifications.should_close(self.ui.tick_count) {
            self.notifications.clear_toast();
        }
        self.poll_search(Instant::now());
    }

    pub fn poll_search(&mut self, now: Instant) {
        if let Some(ticket) = self.search.poll(now) {
            debug!(seq = ticket.seq, query = %ticket.query, "issuing operative search");
            self.send(BackendRequest::SearchUsers { seq: ticket.seq, query: ticket.query });
        }
    }

    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Snapshot(snapshot) => self.apply_snapshot(*snapshot),
            BackendEvent::Comments { post_id, generation, comments } => {
                if !self.community.accept_comments(post_id, generation, comments) {
                    debug!(%post_id, generation, "dropping comments for a closed or replaced post view");
                }
            }
            BackendEvent::FollowList { user_id, kind, generation, users } => match &mut self.ui.follow_list {
                Some(popup) if popup.user_id == user_id && popup.kind == kind && popup.generation == generation => {
                    popup.users = users;
                    popup.loading = false;
                }
                _ => debug!(%user_id, generation, "dropping stale follow list"),
            },
            BackendEvent::SearchResults { seq, query, users } => {
                if !self.search.accept(seq, &query, users) {
                    debug!(seq, %query, "dropping stale search results");
                }
            }
            BackendEvent::PostPublished(post) => {
                info!(post_id = %post.id, "post published");
                self.community.compose = None;
                self.community.selected = 0;
            }
            BackendEvent::BountyClaimed(id) => {
                if self.bounty.claiming == Some(id) {
                    self.bounty.claiming = None;
                }
            }
            BackendEvent::TeamCreated(team) => {
                self.dashboard.pending = false;
                self.dashboard.form = None;
                self.set_toast(
                    format!("Squad {} created. Join code: {}", team.name, team.join_code),
                    ToastLevel::Success,
                    Some(self.config.toast_timeout_ms),
                );
            }
            BackendEvent::TeamJoined { code, joined } => {
                self.dashboard.pending = false;
                if joined {
                    self.dashboard.form = None;
                    self.set_toast("Joined squad.", ToastLevel::Success, Some(self.config.toast_timeout_ms));
                } else {
                    if let Some(DashboardForm::JoinTeam(form)) = &mut self.dashboard.form {
                        form.error = Some(format!("No open squad for code {}.", code));
                    }
                    self.set_toast("Failed to join squad. Check the code.", ToastLevel::Error, None);
                }
            }
            BackendEvent::ProfileSaved => {
                self.settings.saving = false;
                self.profile_stale = true;
                self.set_toast("Profile saved.", ToastLevel::Success, Some(self.config.toast_timeout_ms));
            }
            BackendEvent::GitHubLinked => {
                self.settings.editing_github = false;
                self.settings.github_input.clear();
                self.settings.github_error = None;
            }
            BackendEvent::LoggedOut => {
                info!("logged out");
                self.ui.quit();
            }
            BackendEvent::LookupFailed { lookup, message } => self.handle_lookup_failure(lookup, &message),
            BackendEvent::Failed { op, message } => self.handle_failure(op, message),
        }
    }

    /// A failed lookup only stops the spinner of the view that issued it.
    fn handle_lookup_failure(&mut self, lookup: Lookup, message: &str) {
        match lookup {
            Lookup::Comments { post_id, generation } => match &mut self.community.detail {
                Some(detail) if detail.post_id == post_id && detail.generation == generation => detail.loading = false,
                _ => debug!(%post_id, generation, error = message, "ignoring failure of a replaced comment fetch"),
            },
            Lookup::FollowList { user_id, kind, generation } => match &mut self.ui.follow_list {
                Some(popup) if popup.user_id == user_id && popup.kind == kind && popup.generation == generation => {
                    popup.loading = false
                }
                _ => debug!(%user_id, generation, error = message, "ignoring failure of a replaced follow list"),
            },
            Lookup::Search { seq, .. } => self.search.fail(seq),
        }
    }

    fn handle_failure(&mut self, op: &'static str, message: String) {
        match op {
            "join_team" | "add_team" => {
                self.dashboard.pending = false;
                let verb = if op == "join_team" { "join" } else { "create" };
                self.set_toast(format!("Failed to {} squad: {}", verb, message), ToastLevel::Error, None);
            }
            "update_profile" => {
                self.settings.saving = false;
                self.set_toast(format!("Failed to save profile: {}", message), ToastLevel::Error, None);
            }
            "claim_bounty" => self.bounty.claiming = None,
            "connect_github" | "connect_github_manual" => self.settings.github_error = Some(message),
            // Everything else was already logged by the worker.
            _ => {}
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let dms_changed = self.data.apply(snapshot);
        let Some(snapshot) = self.data.snapshot.as_ref() else { return };
        let me = snapshot.user.id;
        if self.threads.refresh(&snapshot.direct_messages, me, self.data.dm_revision) {
            debug!(dms_changed, threads = self.threads.threads().len(), "direct-message threads rebuilt");
        }
        if self.profile_stale {
            self.settings.load_profile(&snapshot.user);
            self.profile_stale = false;
        }
        self.clamp_selections();
        self.mark_dms_read_if_viewing();
    }

    fn clamp_selections(&mut self) {
        fn clamp(selected: &mut usize, len: usize) {
            *selected = (*selected).min(len.saturating_sub(1));
        }
        let posts = self.visible_posts().len();
        let teams = self.snapshot().map(|s| s.teams.len()).unwrap_or(0);
        let board = self.board_tasks().len();
        let bounties = self.visible_bounties().len();
        let threads = self.threads.threads().len();
        let operatives = self.operatives().len();
        let all_bounties = self.snapshot().map(|s| s.bounties.len()).unwrap_or(0);
        clamp(&mut self.community.selected, posts);
        clamp(&mut self.dashboard.team_selected, teams);
        clamp(&mut self.dashboard.board_selected, board);
        clamp(&mut self.bounty.selected, bounties);
        clamp(&mut self.comms.thread_selected, threads);
        clamp(&mut self.comms.operative_selected, operatives);
        clamp(&mut self.comms.bounty_selected, all_bounties);
    }

    // --- Derived views ---

    pub fn visible_posts(&self) -> Vec<&Post> {
        let Some(snapshot) = self.snapshot() else { return Vec::new() };
        visible_posts(
            &snapshot.posts,
            self.community.filter,
            &self.community.query,
            &snapshot.following_ids,
            snapshot.user.id,
        )
    }

    pub fn selected_post(&self) -> Option<&Post> {
        self.visible_posts().get(self.community.selected).copied()
    }

    pub fn board_tasks(&self) -> Vec<BoardTask> {
        self.snapshot()
            .map(|s| prioritized_board(&s.teams, &self.dashboard.board_query))
            .unwrap_or_default()
    }

    pub fn visible_bounties(&self) -> Vec<&Bounty> {
        let Some(snapshot) = self.snapshot() else { return Vec::new() };
        filter_bounties(&snapshot.bounties, self.bounty.filter, &self.bounty.query, snapshot.user.id)
    }

    pub fn conversations(&self) -> Vec<ConversationPreview> {
        self.threads.threads().previews()
    }

    pub fn thread_messages(&self, partner_id: Uuid) -> &[DirectMessage] {
        self.threads.threads().get(partner_id).unwrap_or(&[])
    }

    /// Search results while a search is active, otherwise everyone but the current user.
    pub fn operatives(&self) -> Vec<&User> {
        let me = self.me();
        if self.search.is_active() {
            return self.search.results.iter().filter(|u| Some(u.id) != me).collect();
        }
        self.snapshot()
            .map(|s| s.all_profiles.iter().filter(|u| Some(u.id) != me).collect())
            .unwrap_or_default()
    }

    // --- Navigation ---

    pub fn set_mode(&mut self, mode: AppMode) {
        if self.ui.mode == mode {
            return;
        }
        if self.ui.mode == AppMode::Comms {
            self.comms.apply(CommsAction::Close);
        }
        self.ui.set_mode(mode);
        match mode {
            AppMode::Comms => {
                self.comms.apply(CommsAction::Reopen);
                self.mark_dms_read_if_viewing();
            }
            AppMode::Settings => {
                if let Some(user) = self.data.user().cloned() {
                    if !self.settings.saving {
                        self.settings.load_profile(&user);
                    }
                }
            }
            _ => {}
        }
    }

    pub fn select_comms_mode(&mut self, mode: CommsMode) {
        if self.comms.apply(CommsAction::SelectMode(mode)) {
            self.mark_dms_read_if_viewing();
        }
    }

    /// Jump to a direct-message thread with `user_id` from anywhere in the app.
    pub fn open_dm_with(&mut self, user_id: Uuid) {
        if Some(user_id) == self.me() {
            return;
        }
        let generation = self.next_generation();
        if self.ui.mode != AppMode::Comms {
            self.ui.set_mode(AppMode::Comms);
        }
        self.comms.apply(CommsAction::Open(OpenRequest {
            mode: CommsMode::Intel,
            target_user_id: Some(user_id),
            generation,
        }));
        self.mark_dms_read_if_viewing();
    }

    fn mark_dms_read_if_viewing(&mut self) {
        let viewing_intel = self.ui.mode == AppMode::Comms && self.comms.is_open && self.comms.mode == CommsMode::Intel;
        if viewing_intel && self.data.unread_direct_messages() > 0 {
            self.send(BackendRequest::MarkAllDmsAsRead);
        }
    }

    // --- Actions shared by several screens ---

    pub fn open_post_detail(&mut self, post_id: Uuid) {
        let generation = self.next_generation();
        self.community.open_detail(post_id, generation);
        self.send(BackendRequest::FetchComments { post_id, generation });
    }

    pub fn open_follow_list(&mut self, user_id: Uuid, kind: FollowListKind) {
        let generation = self.next_generation();
        self.ui.follow_list = Some(FollowListPopup {
            user_id,
            kind,
            generation,
            users: Vec::new(),
            loading: true,
            selected: 0,
        });
        self.send(BackendRequest::FetchFollowList { user_id, kind, generation });
    }

    pub fn toggle_follow(&mut self, user_id: Uuid) {
        if Some(user_id) == self.me() {
            return;
        }
        if self.data.is_following(user_id) {
            self.send(BackendRequest::UnfollowUser(user_id));
        } else {
            self.send(BackendRequest::FollowUser(user_id));
        }
    }

    pub fn claim_bounty(&mut self, bounty_id: Uuid) {
        let Some(bounty) = self.snapshot().and_then(|s| s.bounties.iter().find(|b| b.id == bounty_id)) else {
            return;
        };
        if let Err(e) = crate::services::bounties::check_claimable(bounty) {
            self.set_toast(e.to_string(), ToastLevel::Info, Some(self.config.toast_timeout_ms));
            return;
        }
        self.bounty.claiming = Some(bounty_id);
        self.send(BackendRequest::ClaimBounty(bounty_id));
    }

    pub fn open_join_form(&mut self) {
        self.dashboard.form = Some(DashboardForm::JoinTeam(JoinForm::default()));
    }

    pub fn toggle_preference(&mut self, item: PreferenceItem) {
        let prefs = self.data.user().map(|u| u.preferences).unwrap_or_default();
        match item {
            PreferenceItem::Theme => self.send(BackendRequest::ToggleTheme),
            PreferenceItem::EmailNotifications => self.send(BackendRequest::UpdatePreferences(PreferencesUpdate {
                email_notifications: Some(!prefs.email_notifications),
                ..PreferencesUpdate::default()
            })),
            PreferenceItem::PublicProfile => self.send(BackendRequest::UpdatePreferences(PreferencesUpdate {
                public_profile: Some(!prefs.public_profile),
                ..PreferencesUpdate::default()
            })),
            PreferenceItem::ShowOnlineStatus => self.send(BackendRequest::UpdatePreferences(PreferencesUpdate {
                show_online_status: Some(!prefs.show_online_status),
                ..PreferencesUpdate::default()
            })),
            PreferenceItem::PresenceSidebar => {
                self.ui.show_presence = !self.ui.show_presence;
                let show = self.ui.show_presence;
                self.save_local_prefs(|p| p.show_presence = show);
            }
            PreferenceItem::CompactFeed => {
                self.ui.compact = !self.ui.compact;
                let compact = self.ui.compact;
                self.save_local_prefs(|p| p.compact_feed = compact);
            }
        }
    }

    pub fn save_local_prefs(&mut self, change: impl FnOnce(&mut LocalPrefs)) {
        if let Err(e) = update_local_prefs(change) {
            warn!(error = %e, "could not save local preferences");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backend, InMemoryBackend};
    use crate::model::PostComment;
    use crate::state::{IntelView, SearchTicket};
    use std::time::Duration;

    fn app() -> (App, mpsc::UnboundedReceiver<BackendRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(tx, AppConfig::default(), &LocalPrefs::default()), rx)
    }

    async fn seeded_snapshot() -> Snapshot {
        InMemoryBackend::seeded(None).snapshot().await.unwrap()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<BackendRequest>) -> Vec<BackendRequest> {
        let mut out = Vec::new();
        while let Ok(request) = rx.try_recv() {
            out.push(request);
        }
        out
    }

    #[tokio::test]
    async fn snapshot_builds_threads_and_loads_profile() {
        let (mut app, _rx) = app();
        let snapshot = seeded_snapshot().await;
        let name = snapshot.user.name.clone();

        app.handle_backend_event(BackendEvent::Snapshot(Box::new(snapshot)));

        assert!(app.data.loaded);
        assert_eq!(app.settings.profile_form.name, name);
        assert!(!app.conversations().is_empty());
    }

    #[tokio::test]
    async fn identical_snapshot_keeps_the_thread_cache() {
        let (mut app, _rx) = app();
        let snapshot = seeded_snapshot().await;
        app.handle_backend_event(BackendEvent::Snapshot(Box::new(snapshot.clone())));
        let revision = app.data.dm_revision;
        app.handle_backend_event(BackendEvent::Snapshot(Box::new(snapshot)));
        assert_eq!(app.data.dm_revision, revision);
    }

    #[tokio::test]
    async fn opening_a_dm_jumps_to_the_thread_and_marks_read() {
        let (mut app, mut rx) = app();
        app.handle_backend_event(BackendEvent::Snapshot(Box::new(seeded_snapshot().await)));
        let partner = app.conversations()[0].partner_id;
        drain(&mut rx);

        app.open_dm_with(partner);

        assert_eq!(app.ui.mode, AppMode::Comms);
        assert_eq!(app.comms.intel, IntelView::ThreadSelected(partner));
        assert!(drain(&mut rx).contains(&BackendRequest::MarkAllDmsAsRead));
    }

    #[tokio::test]
    async fn leaving_and_reentering_comms_restores_the_last_request() {
        let (mut app, _rx) = app();
        app.handle_backend_event(BackendEvent::Snapshot(Box::new(seeded_snapshot().await)));
        let partner = app.conversations()[0].partner_id;
        app.open_dm_with(partner);
        app.select_comms_mode(CommsMode::Operatives);

        app.set_mode(AppMode::Dashboard);
        assert!(!app.comms.is_open);
        app.set_mode(AppMode::Comms);

        assert_eq!(app.comms.selected_partner(), Some(partner));
    }

    #[test]
    fn comments_for_a_replaced_modal_are_ignored() {
        let (mut app, mut rx) = app();
        let post = Uuid::new_v4();
        app.open_post_detail(post);
        app.open_post_detail(post);
        let generations: Vec<u64> = drain(&mut rx)
            .into_iter()
            .filter_map(|r| match r {
                BackendRequest::FetchComments { generation, .. } => Some(generation),
                _ => None,
            })
            .collect();
        assert_eq!(generations.len(), 2);

        let comment = PostComment {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            author_name: "AcidBurn".into(),
            author_avatar: "AB".into(),
            content: "old".into(),
            created_at: chrono::Utc::now(),
            replies: Vec::new(),
        };
        app.handle_backend_event(BackendEvent::Comments { post_id: post, generation: generations[0], comments: vec![comment] });
        let detail = app.community.detail.as_ref().unwrap();
        assert!(detail.loading);
        assert!(detail.comments.is_empty());
    }

    #[test]
    fn comment_failure_for_a_replaced_modal_keeps_loading() {
        let (mut app, mut rx) = app();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        app.open_post_detail(first);
        app.open_post_detail(second);
        let fetches: Vec<(Uuid, u64)> = drain(&mut rx)
            .into_iter()
            .filter_map(|r| match r {
                BackendRequest::FetchComments { post_id, generation } => Some((post_id, generation)),
                _ => None,
            })
            .collect();
        assert_eq!(fetches.len(), 2);

        let (post_id, generation) = fetches[0];
        app.handle_backend_event(BackendEvent::LookupFailed {
            lookup: Lookup::Comments { post_id, generation },
            message: "post not found".into(),
        });
        assert!(app.community.detail.as_ref().unwrap().loading);

        let (post_id, generation) = fetches[1];
        app.handle_backend_event(BackendEvent::LookupFailed {
            lookup: Lookup::Comments { post_id, generation },
            message: "post not found".into(),
        });
        assert!(!app.community.detail.as_ref().unwrap().loading);
    }

    #[test]
    fn follow_list_failure_needs_the_current_generation() {
        let (mut app, _rx) = app();
        let user = Uuid::new_v4();
        app.open_follow_list(user, FollowListKind::Followers);
        let stale = app.ui.follow_list.as_ref().unwrap().generation;
        app.open_follow_list(user, FollowListKind::Followers);
        let current = app.ui.follow_list.as_ref().unwrap().generation;

        app.handle_backend_event(BackendEvent::LookupFailed {
            lookup: Lookup::FollowList { user_id: user, kind: FollowListKind::Followers, generation: stale },
            message: "timed out".into(),
        });
        assert!(app.ui.follow_list.as_ref().unwrap().loading);

        app.handle_backend_event(BackendEvent::LookupFailed {
            lookup: Lookup::FollowList { user_id: user, kind: FollowListKind::Followers, generation: current },
            message: "timed out".into(),
        });
        assert!(!app.ui.follow_list.as_ref().unwrap().loading);
    }

    #[test]
    fn follow_list_answer_needs_the_current_generation() {
        let (mut app, _rx) = app();
        let user = Uuid::new_v4();
        app.open_follow_list(user, FollowListKind::Followers);
        let generation = app.ui.follow_list.as_ref().unwrap().generation;

        app.handle_backend_event(BackendEvent::FollowList {
            user_id: user,
            kind: FollowListKind::Following,
            generation,
            users: Vec::new(),
        });
        assert!(app.ui.follow_list.as_ref().unwrap().loading);

        app.handle_backend_event(BackendEvent::FollowList {
            user_id: user,
            kind: FollowListKind::Followers,
            generation,
            users: Vec::new(),
        });
        assert!(!app.ui.follow_list.as_ref().unwrap().loading);
    }

    #[test]
    fn only_join_create_and_profile_failures_toast() {
        let (mut app, _rx) = app();
        app.handle_backend_event(BackendEvent::Failed { op: "like_post", message: "nope".into() });
        assert!(app.notifications.current.is_none());

        for op in ["join_team", "add_team", "update_profile"] {
            app.notifications.clear_toast();
            app.handle_backend_event(BackendEvent::Failed { op, message: "nope".into() });
            let toast = app.notifications.current.as_ref().unwrap();
            assert_eq!(toast.level, ToastLevel::Error);
        }
    }

    #[test]
    fn join_returning_false_is_an_error() {
        let (mut app, _rx) = app();
        app.open_join_form();
        app.dashboard.pending = true;
        app.handle_backend_event(BackendEvent::TeamJoined { code: "NOPE".into(), joined: false });
        assert!(!app.dashboard.pending);
        assert!(matches!(&app.dashboard.form, Some(DashboardForm::JoinTeam(f)) if f.error.is_some()));
        assert_eq!(app.notifications.current.as_ref().unwrap().level, ToastLevel::Error);
    }

    #[test]
    fn debounced_search_is_sent_from_the_tick_loop() {
        let (mut app, mut rx) = app();
        let t0 = Instant::now();
        app.search.set_query("neo", t0);
        app.poll_search(t0 + Duration::from_millis(100));
        assert!(drain(&mut rx).is_empty());

        app.poll_search(t0 + Duration::from_millis(300));
        let sent = drain(&mut rx);
        assert_eq!(sent, vec![BackendRequest::SearchUsers { seq: 1, query: "neo".into() }]);

        let ticket = SearchTicket { seq: 1, query: "neo".into() };
        app.handle_backend_event(BackendEvent::SearchResults { seq: ticket.seq, query: ticket.query, users: Vec::new() });
        assert!(!app.search.loading);
    }

    #[tokio::test]
    async fn stale_search_failure_does_not_drop_newer_results() {
        let (mut app, mut rx) = app();
        let neo = seeded_snapshot().await.all_profiles.into_iter().take(1).collect::<Vec<_>>();
        assert_eq!(neo.len(), 1);
        let t0 = Instant::now();
        app.search.set_query("ne", t0);
        app.poll_search(t0 + Duration::from_millis(300));
        app.search.set_query("neo", t0 + Duration::from_millis(310));
        app.poll_search(t0 + Duration::from_millis(610));
        assert_eq!(
            drain(&mut rx),
            vec![
                BackendRequest::SearchUsers { seq: 1, query: "ne".into() },
                BackendRequest::SearchUsers { seq: 2, query: "neo".into() },
            ]
        );

        app.handle_backend_event(BackendEvent::LookupFailed {
            lookup: Lookup::Search { seq: 1, query: "ne".into() },
            message: "session ended".into(),
        });
        app.handle_backend_event(BackendEvent::SearchResults { seq: 2, query: "neo".into(), users: neo });

        assert!(!app.search.loading);
        assert_eq!(app.search.results.len(), 1);
    }

    #[test]
    fn timed_toast_closes_on_tick() {
        let (mut app, _rx) = app();
        app.set_toast("hi", ToastLevel::Info, Some(100));
        app.on_tick();
        assert!(app.notifications.current.is_some());
        app.on_tick();
        assert!(app.notifications.current.is_none());
    }

    #[test]
    fn lost_worker_shows_a_sticky_connection_error() {
        let (mut app, rx) = app();
        drop(rx);
        app.send(BackendRequest::Refresh);
        let toast = app.notifications.current.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "Connection error: backend unavailable");
        assert!(toast.close_tick.is_none());
    }

    #[test]
    fn logout_quits() {
        let (mut app, _rx) = app();
        app.handle_backend_event(BackendEvent::LoggedOut);
        assert!(app.ui.should_quit);
    }
}
