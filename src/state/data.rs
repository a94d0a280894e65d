use uuid::Uuid;

use crate::backend::Snapshot;
use crate::model::{Theme, User};

/// Latest backend snapshot plus change counters for derived views.
#[derive(Debug, Default)]
pub struct DataState {
    pub snapshot: Option<Snapshot>,
    /// Bumped whenever the direct-message list differs from the previous snapshot.
    pub dm_revision: u64,
    pub loaded: bool,
}

impl DataState {
    /// Replace the cached snapshot. Returns true if direct messages changed.
    pub fn apply(&mut self, snapshot: Snapshot) -> bool {
        let dms_changed = match &self.snapshot {
            Some(previous) => previous.direct_messages != snapshot.direct_messages,
            None => true,
        };
        if dms_changed {
            self.dm_revision += 1;
        }
        self.snapshot = Some(snapshot);
        self.loaded = true;
        dms_changed
    }

    pub fn user(&self) -> Option<&User> {
        self.snapshot.as_ref().map(|s| &s.user)
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user().map(|u| u.id)
    }

    pub fn theme(&self) -> Theme {
        self.snapshot.as_ref().map(|s| s.theme).unwrap_or_default()
    }

    pub fn profile(&self, id: Uuid) -> Option<&User> {
        self.snapshot.as_ref()?.all_profiles.iter().find(|u| u.id == id)
    }

    pub fn is_following(&self, id: Uuid) -> bool {
        self.snapshot
            .as_ref()
            .map(|s| s.following_ids.contains(&id))
            .unwrap_or(false)
    }

    pub fn is_online(&self, id: Uuid) -> bool {
        self.snapshot
            .as_ref()
            .map(|s| s.global_online_users.contains(&id))
            .unwrap_or(false)
    }

    pub fn unread_notifications(&self) -> usize {
        self.snapshot
            .as_ref()
            .map(|s| s.notifications.iter().filter(|n| !n.read).count())
            .unwrap_or(0)
    }

    pub fn unread_direct_messages(&self) -> usize {
        let Some(snapshot) = &self.snapshot else { return 0 };
        let me = snapshot.user.id;
        snapshot
            .direct_messages
            .iter()
            .filter(|m| m.receiver_id == me && !m.is_read)
            .count()
    }
}
