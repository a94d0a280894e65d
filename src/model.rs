// client/src/model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

// --- Feed ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Text,
    Code,
    Project,
}

impl PostKind {
    pub fn label(self) -> &'static str {
        match self {
            PostKind::Text => "TEXT",
            PostKind::Code => "CODE",
            PostKind::Project => "PROJECT",
        }
    }

    pub fn next(self) -> Self {
        match self {
            PostKind::Text => PostKind::Code,
            PostKind::Code => PostKind::Project,
            PostKind::Project => PostKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectDetails {
    pub name: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub open_roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user: String,
    pub avatar: String,
    pub content: String,
    pub tags: BTreeSet<String>,
    pub kind: PostKind,
    pub code_snippet: Option<String>,
    pub code_language: Option<String>,
    pub project: Option<ProjectDetails>,
    pub likes: u32,
    pub comments: u32,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
}

/// A comment on a post. Replies are only ever one level deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostComment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_avatar: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<PostComment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub content: String,
    pub kind: PostKind,
    pub tags: BTreeSet<String>,
    pub code_snippet: Option<String>,
    pub code_language: Option<String>,
    pub project: Option<ProjectDetails>,
}

// --- Comms ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub user: String,
    pub avatar: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub kind: ChatKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub sender_name: String,
    pub sender_avatar: String,
    pub receiver_name: String,
    pub receiver_avatar: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

// --- Squads ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub avatar: String,
}

/// `status` and `priority` stay free-form: the board must tolerate values it does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub priority: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub event: String,
    pub kind: String,
    pub visibility: Visibility,
    pub max_members: u32,
    pub current_members: Vec<Member>,
    pub tasks: Vec<Task>,
    pub progress: u8,
    pub color: String,
    pub join_code: String,
}

impl Team {
    pub fn is_full(&self) -> bool {
        self.current_members.len() as u32 >= self.max_members
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDraft {
    pub name: String,
    pub event: String,
    pub kind: String,
    pub visibility: Visibility,
    pub max_members: u32,
}

// --- Bounties ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BountyStatus {
    Open,
    Claimed,
    InProgress,
    Completed,
}

impl BountyStatus {
    pub fn label(self) -> &'static str {
        match self {
            BountyStatus::Open => "OPEN",
            BountyStatus::Claimed => "CLAIMED",
            BountyStatus::InProgress => "IN PROGRESS",
            BountyStatus::Completed => "COMPLETED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounty {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub difficulty: String,
    pub reward_xp: u32,
    pub status: BountyStatus,
    pub claimed_by: Option<Uuid>,
    pub deadline: Option<DateTime<Utc>>,
}

// --- Users ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Socials {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub email_notifications: bool,
    pub public_profile: bool,
    pub show_online_status: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
            public_profile: true,
            show_online_status: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub role: String,
    pub rank: String,
    pub reputation: u32,
    pub skills: Vec<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub socials: Socials,
    #[serde(default)]
    pub preferences: UserPreferences,
    pub github_username: Option<String>,
    pub github_connected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Partial profile edit; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub socials: Option<Socials>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PreferencesUpdate {
    pub email_notifications: Option<bool>,
    pub public_profile: Option<bool>,
    pub show_online_status: Option<bool>,
}

// --- Notifications ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Social,
    Team,
    Bounty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}
