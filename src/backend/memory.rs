//! In-process backend seeded with demo data.
//!
//! Lets the client run without a service behind it and gives tests a real
//! implementation of the whole contract to drive.

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Backend, BackendError, BackendResult, Snapshot};
use crate::model::{
    Bounty, BountyStatus, ChatKind, ChatMessage, DirectMessage, Member, Notification,
    NotificationKind, Post, PostComment, PostDraft, PostKind, PreferencesUpdate, ProfileUpdate,
    ProjectDetails, Socials, Task, Team, TeamDraft, Theme, User, UserPreferences, Visibility,
};

const TEAM_COLORS: [&str; 5] = ["cyan", "magenta", "green", "yellow", "blue"];

#[derive(Debug)]
struct Store {
    me: Uuid,
    logged_in: bool,
    theme: Theme,
    users: Vec<User>,
    posts: Vec<Post>,
    comments: HashMap<Uuid, Vec<PostComment>>,
    global_messages: Vec<ChatMessage>,
    direct_messages: Vec<DirectMessage>,
    teams: Vec<Team>,
    bounties: Vec<Bounty>,
    /// (follower, followee)
    follows: HashSet<(Uuid, Uuid)>,
    notifications: Vec<Notification>,
    online: Vec<Uuid>,
}

impl Store {
    fn me(&self) -> BackendResult<&User> {
        if !self.logged_in {
            return Err(BackendError::Unavailable("session ended".into()));
        }
        self.users
            .iter()
            .find(|u| u.id == self.me)
            .ok_or(BackendError::NotFound("user"))
    }

    fn me_mut(&mut self) -> BackendResult<&mut User> {
        if !self.logged_in {
            return Err(BackendError::Unavailable("session ended".into()));
        }
        let me = self.me;
        self.users
            .iter_mut()
            .find(|u| u.id == me)
            .ok_or(BackendError::NotFound("user"))
    }

    fn user(&self, id: Uuid) -> BackendResult<&User> {
        self.users.iter().find(|u| u.id == id).ok_or(BackendError::NotFound("user"))
    }

    fn is_member(&self, team: &Team) -> bool {
        let Ok(me) = self.me() else { return false };
        team.current_members.iter().any(|m| m.name == me.name)
    }
}

pub struct InMemoryBackend {
    inner: RwLock<Store>,
}

impl InMemoryBackend {
    /// Build the demo world. `user_name` picks which seeded profile acts as the
    /// signed-in user; unknown names fall back to the first profile.
    pub fn seeded(user_name: Option<&str>) -> Self {
        let store = seed(user_name);
        Self { inner: RwLock::new(store) }
    }

    pub async fn current_user_id(&self) -> Uuid {
        self.inner.read().await.me
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn snapshot(&self) -> BackendResult<Snapshot> {
        let store = self.inner.read().await;
        let me = store.me()?.clone();

        let following_ids: HashSet<Uuid> = store
            .follows
            .iter()
            .filter(|(follower, _)| *follower == me.id)
            .map(|(_, followee)| *followee)
            .collect();
        let follower_count = store.follows.iter().filter(|(_, followee)| *followee == me.id).count() as u32;

        Ok(Snapshot {
            theme: store.theme,
            posts: store.posts.clone(),
            global_messages: store.global_messages.clone(),
            direct_messages: store
                .direct_messages
                .iter()
                .filter(|m| m.sender_id == me.id || m.receiver_id == me.id)
                .cloned()
                .collect(),
            teams: store.teams.iter().filter(|t| store.is_member(t)).cloned().collect(),
            bounties: store.bounties.clone(),
            all_profiles: store.users.clone(),
            following_count: following_ids.len() as u32,
            following_ids,
            follower_count,
            notifications: store.notifications.clone(),
            global_online_users: store.online.clone(),
            user: me,
        })
    }

    async fn like_post(&self, id: Uuid) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        store.me()?;
        let post = store.posts.iter_mut().find(|p| p.id == id).ok_or(BackendError::NotFound("post"))?;
        if post.is_liked {
            post.likes = post.likes.saturating_sub(1);
        } else {
            post.likes += 1;
        }
        post.is_liked = !post.is_liked;
        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let me = store.me()?.id;
        let idx = store.posts.iter().position(|p| p.id == id).ok_or(BackendError::NotFound("post"))?;
        if store.posts[idx].user_id != me {
            return Err(BackendError::Rejected("only the author can delete a post".into()));
        }
        store.posts.remove(idx);
        store.comments.remove(&id);
        Ok(())
    }

    async fn add_post(&self, draft: PostDraft) -> BackendResult<Post> {
        let mut store = self.inner.write().await;
        let me = store.me()?.clone();
        if draft.content.trim().is_empty() {
            return Err(BackendError::Rejected("post content is empty".into()));
        }
        let post = Post {
            id: Uuid::new_v4(),
            user_id: me.id,
            user: me.name.clone(),
            avatar: me.avatar.clone(),
            content: draft.content,
            tags: draft.tags,
            kind: draft.kind,
            code_snippet: draft.code_snippet,
            code_language: draft.code_language,
            project: draft.project,
            likes: 0,
            comments: 0,
            is_liked: false,
            created_at: Utc::now(),
        };
        store.posts.insert(0, post.clone());
        Ok(post)
    }

    async fn fetch_comments(&self, post_id: Uuid) -> BackendResult<Vec<PostComment>> {
        let store = self.inner.read().await;
        if !store.posts.iter().any(|p| p.id == post_id) {
            return Err(BackendError::NotFound("post"));
        }
        Ok(store.comments.get(&post_id).cloned().unwrap_or_default())
    }

    async fn add_comment(&self, post_id: Uuid, content: String, reply_to: Option<Uuid>) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let me = store.me()?.clone();
        if !store.posts.iter().any(|p| p.id == post_id) {
            return Err(BackendError::NotFound("post"));
        }
        let comment = PostComment {
            id: Uuid::new_v4(),
            author_id: me.id,
            author_name: me.name,
            author_avatar: me.avatar,
            content,
            created_at: Utc::now(),
            replies: Vec::new(),
        };

        let thread = store.comments.entry(post_id).or_default();
        match reply_to {
            None => thread.push(comment),
            Some(target) => {
                // A reply to a reply attaches to the top-level parent.
                let parent = thread
                    .iter_mut()
                    .find(|c| c.id == target || c.replies.iter().any(|r| r.id == target))
                    .ok_or(BackendError::NotFound("comment"))?;
                parent.replies.push(comment);
            }
        }

        if let Some(post) = store.posts.iter_mut().find(|p| p.id == post_id) {
            post.comments += 1;
        }
        Ok(())
    }

    async fn follow_user(&self, id: Uuid) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let me = store.me()?.id;
        store.user(id)?;
        if me == id {
            return Err(BackendError::Rejected("cannot follow yourself".into()));
        }
        store.follows.insert((me, id));
        Ok(())
    }

    async fn unfollow_user(&self, id: Uuid) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let me = store.me()?.id;
        store.follows.remove(&(me, id));
        Ok(())
    }

    async fn fetch_followers_list(&self, user_id: Uuid) -> BackendResult<Vec<User>> {
        let store = self.inner.read().await;
        store.user(user_id)?;
        Ok(store
            .users
            .iter()
            .filter(|u| store.follows.contains(&(u.id, user_id)))
            .cloned()
            .collect())
    }

    async fn fetch_following_list(&self, user_id: Uuid) -> BackendResult<Vec<User>> {
        let store = self.inner.read().await;
        store.user(user_id)?;
        Ok(store
            .users
            .iter()
            .filter(|u| store.follows.contains(&(user_id, u.id)))
            .cloned()
            .collect())
    }

    async fn search_users(&self, query: &str) -> BackendResult<Vec<User>> {
        let store = self.inner.read().await;
        let me = store.me()?.id;
        let needle = query.trim().to_lowercase();
        debug!(query = %needle, "searching users");
        Ok(store
            .users
            .iter()
            .filter(|u| u.id != me)
            .filter(|u| {
                u.name.to_lowercase().contains(&needle)
                    || u.skills.iter().any(|s| s.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn send_global_message(&self, content: String) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let me = store.me()?.clone();
        store.global_messages.push(ChatMessage {
            id: Uuid::new_v4(),
            user_id: Some(me.id),
            user: me.name,
            avatar: me.avatar,
            content,
            created_at: Utc::now(),
            kind: ChatKind::User,
        });
        Ok(())
    }

    async fn send_direct_message(&self, receiver_id: Uuid, content: String) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let me = store.me()?.clone();
        let receiver = store.user(receiver_id)?.clone();
        store.direct_messages.push(DirectMessage {
            id: Uuid::new_v4(),
            sender_id: me.id,
            receiver_id,
            sender_name: me.name,
            sender_avatar: me.avatar,
            receiver_name: receiver.name,
            receiver_avatar: receiver.avatar,
            content,
            created_at: Utc::now(),
            is_read: false,
        });
        Ok(())
    }

    async fn mark_all_dms_as_read(&self) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let me = store.me()?.id;
        for dm in store.direct_messages.iter_mut().filter(|m| m.receiver_id == me) {
            dm.is_read = true;
        }
        Ok(())
    }

    async fn claim_bounty(&self, id: Uuid) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let me = store.me()?.id;
        let bounty = store.bounties.iter_mut().find(|b| b.id == id).ok_or(BackendError::NotFound("bounty"))?;
        if bounty.status != BountyStatus::Open {
            return Err(BackendError::Rejected(format!("bounty is {}", bounty.status.label().to_lowercase())));
        }
        bounty.status = BountyStatus::Claimed;
        bounty.claimed_by = Some(me);
        Ok(())
    }

    async fn add_team(&self, draft: TeamDraft) -> BackendResult<Team> {
        let mut store = self.inner.write().await;
        let me = store.me()?.clone();
        if draft.name.trim().is_empty() {
            return Err(BackendError::Rejected("team name is empty".into()));
        }
        if store.teams.iter().any(|t| t.name.eq_ignore_ascii_case(draft.name.trim())) {
            return Err(BackendError::Rejected(format!("a squad named '{}' already exists", draft.name.trim())));
        }
        let mut rng = rand::thread_rng();
        let join_code: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(|c| (c as char).to_ascii_uppercase())
            .collect();
        let team = Team {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            event: draft.event,
            kind: draft.kind,
            visibility: draft.visibility,
            max_members: draft.max_members.max(1),
            current_members: vec![Member { name: me.name, avatar: me.avatar }],
            tasks: Vec::new(),
            progress: 0,
            color: TEAM_COLORS[rng.gen_range(0..TEAM_COLORS.len())].to_string(),
            join_code,
        };
        store.teams.push(team.clone());
        Ok(team)
    }

    async fn join_team(&self, code: &str) -> BackendResult<bool> {
        let mut store = self.inner.write().await;
        let me = store.me()?.clone();
        let code = code.trim();
        let Some(team) = store.teams.iter_mut().find(|t| t.join_code.eq_ignore_ascii_case(code)) else {
            warn!(code, "no squad matches join code");
            return Ok(false);
        };
        if team.current_members.iter().any(|m| m.name == me.name) {
            return Ok(true);
        }
        if team.is_full() {
            return Ok(false);
        }
        team.current_members.push(Member { name: me.name, avatar: me.avatar });
        Ok(true)
    }

    async fn update_profile(&self, update: ProfileUpdate) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let me = store.me_mut()?;
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(BackendError::Rejected("display name is empty".into()));
            }
            me.name = name.trim().to_string();
        }
        if let Some(role) = update.role {
            me.role = role;
        }
        if let Some(bio) = update.bio {
            me.bio = bio;
        }
        if let Some(skills) = update.skills {
            me.skills = skills;
        }
        if let Some(socials) = update.socials {
            me.socials = socials;
        }
        Ok(())
    }

    async fn update_preferences(&self, update: PreferencesUpdate) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let prefs = &mut store.me_mut()?.preferences;
        if let Some(v) = update.email_notifications {
            prefs.email_notifications = v;
        }
        if let Some(v) = update.public_profile {
            prefs.public_profile = v;
        }
        if let Some(v) = update.show_online_status {
            prefs.show_online_status = v;
        }
        Ok(())
    }

    async fn connect_github(&self) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let me = store.me_mut()?;
        // Without a browser round trip the only account we can link is the one on the profile.
        let Some(username) = me.socials.github.clone() else {
            return Err(BackendError::Rejected("no GitHub account on profile, link one manually".into()));
        };
        me.github_username = Some(username);
        me.github_connected = true;
        Ok(())
    }

    async fn connect_github_manual(&self, username: &str) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let me = store.me_mut()?;
        me.github_username = Some(username.trim().to_string());
        me.github_connected = true;
        Ok(())
    }

    async fn disconnect_github(&self) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let me = store.me_mut()?;
        me.github_username = None;
        me.github_connected = false;
        Ok(())
    }

    async fn logout(&self) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        store.logged_in = false;
        Ok(())
    }

    async fn toggle_theme(&self) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        store.theme = match store.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
        Ok(())
    }

    async fn mark_as_read(&self, id: Uuid) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        let n = store
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(BackendError::NotFound("notification"))?;
        n.read = true;
        Ok(())
    }

    async fn mark_all_notifications_as_read(&self) -> BackendResult<()> {
        let mut store = self.inner.write().await;
        for n in store.notifications.iter_mut() {
            n.read = true;
        }
        Ok(())
    }
}

// --- Demo world ---

fn profile(name: &str, avatar: &str, role: &str, rank: &str, reputation: u32, skills: &[&str]) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        avatar: avatar.to_string(),
        role: role.to_string(),
        rank: rank.to_string(),
        reputation,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        bio: String::new(),
        socials: Socials::default(),
        preferences: UserPreferences::default(),
        github_username: None,
        github_connected: false,
    }
}

fn task(title: &str, status: &str, priority: &str) -> Task {
    Task {
        id: Uuid::new_v4(),
        title: title.to_string(),
        status: status.to_string(),
        priority: priority.to_string(),
    }
}

fn seed(user_name: Option<&str>) -> Store {
    let now = Utc::now();
    let mut users = vec![
        profile("ZeroCool", "ZC", "Full-Stack", "Elite", 1337, &["Rust", "React", "Postgres"]),
        profile("AcidBurn", "AB", "Frontend", "Veteran", 980, &["TypeScript", "CSS", "Figma"]),
        profile("NeonViper", "NV", "ML Engineer", "Operative", 640, &["Python", "PyTorch", "Rust"]),
        profile("CipherMonk", "CM", "Security", "Veteran", 870, &["Pentesting", "Go", "Crypto"]),
        profile("ByteWitch", "BW", "Designer", "Rookie", 210, &["UI", "Motion", "Blender"]),
    ];
    users[0].bio = "Breaking things so you don't have to.".into();
    users[0].socials.github = Some("zerocool".into());

    let me_idx = match user_name {
        Some(name) => users.iter().position(|u| u.name.eq_ignore_ascii_case(name)).unwrap_or_else(|| {
            warn!(name, "unknown profile requested, signing in as the first seeded user");
            0
        }),
        None => 0,
    };
    let me = users[me_idx].clone();
    let others: Vec<User> = users.iter().filter(|u| u.id != me.id).cloned().collect();
    let (a, b, c, d) = (&others[0], &others[1], &others[2], &others[3]);

    let mut follows = HashSet::new();
    follows.insert((me.id, a.id));
    follows.insert((me.id, b.id));
    follows.insert((a.id, me.id));
    follows.insert((c.id, me.id));
    follows.insert((d.id, a.id));

    let first_post = Uuid::new_v4();
    let posts = vec![
        Post {
            id: first_post,
            user_id: a.id,
            user: a.name.clone(),
            avatar: a.avatar.clone(),
            content: "Shipping the squad matcher UI tonight. Who's up for a review? #frontend #hackathon".into(),
            tags: BTreeSet::from(["frontend".to_string(), "hackathon".to_string()]),
            kind: PostKind::Text,
            code_snippet: None,
            code_language: None,
            project: None,
            likes: 12,
            comments: 2,
            is_liked: false,
            created_at: now - Duration::minutes(14),
        },
        Post {
            id: Uuid::new_v4(),
            user_id: b.id,
            user: b.name.clone(),
            avatar: b.avatar.clone(),
            content: "Tiny trick for stable priority sorts. #rust".into(),
            tags: BTreeSet::from(["rust".to_string()]),
            kind: PostKind::Code,
            code_snippet: Some("tasks.sort_by_key(|t| std::cmp::Reverse(weight(&t.priority)));".into()),
            code_language: Some("rust".into()),
            project: None,
            likes: 31,
            comments: 0,
            is_liked: true,
            created_at: now - Duration::hours(3),
        },
        Post {
            id: Uuid::new_v4(),
            user_id: me.id,
            user: me.name.clone(),
            avatar: me.avatar.clone(),
            content: "Recruiting for a realtime collab editor. #project".into(),
            tags: BTreeSet::from(["project".to_string()]),
            kind: PostKind::Project,
            code_snippet: None,
            code_language: None,
            project: Some(ProjectDetails {
                name: "GhostWriter".into(),
                description: "CRDT-backed editor for hackathon squads".into(),
                tech_stack: vec!["Rust".into(), "WebSockets".into(), "React".into()],
                open_roles: vec!["Frontend".into(), "Designer".into()],
            }),
            likes: 7,
            comments: 0,
            is_liked: false,
            created_at: now - Duration::days(1),
        },
        Post {
            id: Uuid::new_v4(),
            user_id: c.id,
            user: c.name.clone(),
            avatar: c.avatar.clone(),
            content: "Reminder: rotate your API keys before demo day. #security".into(),
            tags: BTreeSet::from(["security".to_string()]),
            kind: PostKind::Text,
            code_snippet: None,
            code_language: None,
            project: None,
            likes: 4,
            comments: 0,
            is_liked: false,
            created_at: now - Duration::days(2),
        },
    ];

    let top_comment = PostComment {
        id: Uuid::new_v4(),
        author_id: b.id,
        author_name: b.name.clone(),
        author_avatar: b.avatar.clone(),
        content: "Send the branch, I'll take a look.".into(),
        created_at: now - Duration::minutes(10),
        replies: vec![PostComment {
            id: Uuid::new_v4(),
            author_id: a.id,
            author_name: a.name.clone(),
            author_avatar: a.avatar.clone(),
            content: "Pushed to feat/matcher.".into(),
            created_at: now - Duration::minutes(8),
            replies: Vec::new(),
        }],
    };
    let mut comments = HashMap::new();
    comments.insert(first_post, vec![top_comment]);

    let chat = |user: Option<&User>, content: &str, minutes_ago: i64| ChatMessage {
        id: Uuid::new_v4(),
        user_id: user.map(|u| u.id),
        user: user.map(|u| u.name.clone()).unwrap_or_else(|| "SYSTEM".to_string()),
        avatar: user.map(|u| u.avatar.clone()).unwrap_or_default(),
        content: content.to_string(),
        created_at: now - Duration::minutes(minutes_ago),
        kind: if user.is_some() { ChatKind::User } else { ChatKind::System },
    };
    let global_messages = vec![
        chat(None, "Uplink established. Welcome to the grid.", 60),
        chat(Some(a), "anyone seen the judging rubric?", 42),
        chat(Some(c), "pinned in #announcements", 40),
        chat(Some(c), &format!("@{} your squad still has an open slot?", me.name), 25),
        chat(Some(b), "GPU credits are live for ML squads", 12),
    ];

    let dm = |from: &User, to: &User, content: &str, minutes_ago: i64, is_read: bool| DirectMessage {
        id: Uuid::new_v4(),
        sender_id: from.id,
        receiver_id: to.id,
        sender_name: from.name.clone(),
        sender_avatar: from.avatar.clone(),
        receiver_name: to.name.clone(),
        receiver_avatar: to.avatar.clone(),
        content: content.to_string(),
        created_at: now - Duration::minutes(minutes_ago),
        is_read,
    };
    let direct_messages = vec![
        dm(&me, a, "you still need a backend dev?", 90, true),
        dm(a, &me, "yes! join with code NEON42", 85, true),
        dm(&me, a, "in. see you at standup", 80, true),
        dm(b, &me, "can you review my inference PR?", 5, false),
        dm(c, a, "this one is not ours to see", 3, false),
    ];

    let member = |u: &User| Member { name: u.name.clone(), avatar: u.avatar.clone() };
    let teams = vec![
        Team {
            id: Uuid::new_v4(),
            name: "Neon Syndicate".into(),
            event: "HackTheGrid 2026".into(),
            kind: "Hackathon".into(),
            visibility: Visibility::Public,
            max_members: 4,
            current_members: vec![member(&me), member(a)],
            tasks: vec![
                task("Wire up auth callback", "todo", "high"),
                task("Pitch deck", "in_progress", "medium"),
                task("Fix prod crash on join", "todo", "urgent"),
                task("Set up CI", "done", "urgent"),
            ],
            progress: 45,
            color: "cyan".into(),
            join_code: "NEON42".into(),
        },
        Team {
            id: Uuid::new_v4(),
            name: "Ghost Protocol".into(),
            event: "Open Source Sprint".into(),
            kind: "Project".into(),
            visibility: Visibility::Private,
            max_members: 3,
            current_members: vec![member(&me), member(c)],
            tasks: vec![
                task("Threat model review", "todo", "low"),
                task("Write README", "todo", "whenever"),
                task("Audit dependencies", "in_progress", "high"),
            ],
            progress: 20,
            color: "magenta".into(),
            join_code: "GHOST7".into(),
        },
        Team {
            id: Uuid::new_v4(),
            name: "Byte Brigade".into(),
            event: "Design Jam".into(),
            kind: "Hackathon".into(),
            visibility: Visibility::Public,
            max_members: 5,
            current_members: vec![member(d)],
            tasks: vec![task("Moodboard", "todo", "medium")],
            progress: 5,
            color: "green".into(),
            join_code: "BYTE99".into(),
        },
    ];

    let bounty = |title: &str, kind: &str, difficulty: &str, xp: u32, status: BountyStatus, claimed_by: Option<Uuid>, days: i64| Bounty {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: format!("{} Submit a PR and tag the maintainers when done.", title),
        kind: kind.to_string(),
        difficulty: difficulty.to_string(),
        reward_xp: xp,
        status,
        claimed_by,
        deadline: Some(now + Duration::days(days)),
    };
    let bounties = vec![
        bounty("Fix flaky websocket reconnect", "bug", "medium", 250, BountyStatus::Open, None, 3),
        bounty("Dark mode for the leaderboard", "feature", "easy", 100, BountyStatus::Claimed, Some(me.id), 5),
        bounty("Rate limit the search endpoint", "security", "hard", 400, BountyStatus::Claimed, Some(c.id), 2),
        bounty("Document the squad API", "docs", "easy", 80, BountyStatus::InProgress, Some(me.id), 7),
        bounty("Port matcher to WASM", "feature", "hard", 600, BountyStatus::Completed, Some(b.id), -1),
    ];

    let notification = |kind: NotificationKind, title: &str, body: &str, minutes_ago: i64, read: bool| Notification {
        id: Uuid::new_v4(),
        kind,
        title: title.to_string(),
        body: body.to_string(),
        created_at: now - Duration::minutes(minutes_ago),
        read,
    };
    let notifications = vec![
        notification(NotificationKind::Social, "New follower", format!("{} started following you", c.name).as_str(), 30, false),
        notification(NotificationKind::Team, "Squad update", "Neon Syndicate progress is now 45%", 120, false),
        notification(NotificationKind::Bounty, "Bounty claimed", "You claimed 'Dark mode for the leaderboard'", 600, true),
    ];

    Store {
        me: me.id,
        logged_in: true,
        theme: Theme::Dark,
        online: vec![a.id, b.id],
        users,
        posts,
        comments,
        global_messages,
        direct_messages,
        teams,
        bounties,
        follows,
        notifications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn user_named(backend: &InMemoryBackend, name: &str) -> User {
        let snapshot = backend.snapshot().await.unwrap();
        snapshot.all_profiles.into_iter().find(|u| u.name == name).unwrap()
    }

    #[tokio::test]
    async fn snapshot_only_carries_own_direct_messages() {
        let backend = InMemoryBackend::seeded(None);
        let snapshot = backend.snapshot().await.unwrap();
        let me = snapshot.user.id;
        assert!(!snapshot.direct_messages.is_empty());
        assert!(snapshot
            .direct_messages
            .iter()
            .all(|m| m.sender_id == me || m.receiver_id == me));
    }

    #[tokio::test]
    async fn seeded_user_can_be_chosen_by_name() {
        let backend = InMemoryBackend::seeded(Some("neonviper"));
        let snapshot = backend.snapshot().await.unwrap();
        assert_eq!(snapshot.user.name, "NeonViper");
    }

    #[tokio::test]
    async fn like_toggles_count_and_flag() {
        let backend = InMemoryBackend::seeded(None);
        let post = backend.snapshot().await.unwrap().posts[0].clone();

        backend.like_post(post.id).await.unwrap();
        let liked = backend.snapshot().await.unwrap().posts[0].clone();
        assert!(liked.is_liked);
        assert_eq!(liked.likes, post.likes + 1);

        backend.like_post(post.id).await.unwrap();
        let unliked = backend.snapshot().await.unwrap().posts[0].clone();
        assert!(!unliked.is_liked);
        assert_eq!(unliked.likes, post.likes);
    }

    #[tokio::test]
    async fn only_the_author_deletes_a_post() {
        let backend = InMemoryBackend::seeded(None);
        let snapshot = backend.snapshot().await.unwrap();
        let foreign = snapshot.posts.iter().find(|p| p.user_id != snapshot.user.id).unwrap();
        let own = snapshot.posts.iter().find(|p| p.user_id == snapshot.user.id).unwrap();

        assert!(matches!(backend.delete_post(foreign.id).await, Err(BackendError::Rejected(_))));
        backend.delete_post(own.id).await.unwrap();
        assert!(!backend.snapshot().await.unwrap().posts.iter().any(|p| p.id == own.id));
    }

    #[tokio::test]
    async fn replies_to_replies_attach_to_the_top_level_comment() {
        let backend = InMemoryBackend::seeded(None);
        let post_id = backend.snapshot().await.unwrap().posts[0].id;
        let comments = backend.fetch_comments(post_id).await.unwrap();
        let nested = comments[0].replies[0].id;

        backend.add_comment(post_id, "same".into(), Some(nested)).await.unwrap();

        let comments = backend.fetch_comments(post_id).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].replies.len(), 2);
        assert!(comments[0].replies.iter().all(|r| r.replies.is_empty()));
    }

    #[tokio::test]
    async fn join_team_by_code() {
        let backend = InMemoryBackend::seeded(None);
        assert!(!backend.join_team("NOPE00").await.unwrap());
        assert!(backend.join_team("byte99").await.unwrap());
        let snapshot = backend.snapshot().await.unwrap();
        assert!(snapshot.teams.iter().any(|t| t.name == "Byte Brigade"));
    }

    #[tokio::test]
    async fn claim_requires_an_open_bounty() {
        let backend = InMemoryBackend::seeded(None);
        let snapshot = backend.snapshot().await.unwrap();
        let open = snapshot.bounties.iter().find(|b| b.status == BountyStatus::Open).unwrap();
        let taken = snapshot.bounties.iter().find(|b| b.status == BountyStatus::Completed).unwrap();

        backend.claim_bounty(open.id).await.unwrap();
        assert!(matches!(backend.claim_bounty(open.id).await, Err(BackendError::Rejected(_))));
        assert!(matches!(backend.claim_bounty(taken.id).await, Err(BackendError::Rejected(_))));

        let claimed = backend.snapshot().await.unwrap();
        let claimed = claimed.bounties.iter().find(|b| b.id == open.id).unwrap();
        assert_eq!(claimed.claimed_by, Some(snapshot.user.id));
    }

    #[tokio::test]
    async fn follow_graph_drives_counts_and_lists() {
        let backend = InMemoryBackend::seeded(None);
        let me = backend.current_user_id().await;
        let monk = user_named(&backend, "CipherMonk").await;

        let before = backend.snapshot().await.unwrap();
        assert!(!before.following_ids.contains(&monk.id));
        backend.follow_user(monk.id).await.unwrap();
        let after = backend.snapshot().await.unwrap();
        assert!(after.following_ids.contains(&monk.id));
        assert_eq!(after.following_count, before.following_count + 1);

        let followers = backend.fetch_followers_list(monk.id).await.unwrap();
        assert!(followers.iter().any(|u| u.id == me));
        assert!(matches!(backend.follow_user(me).await, Err(BackendError::Rejected(_))));
    }

    #[tokio::test]
    async fn search_excludes_self_and_matches_skills() {
        let backend = InMemoryBackend::seeded(None);
        let found = backend.search_users("rust").await.unwrap();
        let names: Vec<_> = found.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["NeonViper"]);
    }

    #[tokio::test]
    async fn logout_ends_the_session() {
        let backend = InMemoryBackend::seeded(None);
        backend.logout().await.unwrap();
        assert!(matches!(backend.snapshot().await, Err(BackendError::Unavailable(_))));
    }
}
