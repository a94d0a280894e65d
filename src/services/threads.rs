//! Direct-message threads derived from the flat message log.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::trace;
use uuid::Uuid;

use crate::model::DirectMessage;

/// One conversation row: the partner plus the last message exchanged with them.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationPreview {
    pub partner_id: Uuid,
    pub partner_name: String,
    pub partner_avatar: String,
    pub last_message: String,
    pub last_at: DateTime<Utc>,
    pub last_from_me: bool,
    pub unread: usize,
}

/// Messages grouped by the other participant. Each thread keeps input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Threads {
    by_partner: HashMap<Uuid, Vec<DirectMessage>>,
    /// Partner ids in order of first appearance, to keep iteration deterministic.
    order: Vec<Uuid>,
    me: Option<Uuid>,
}

impl Threads {
    pub fn get(&self, partner_id: Uuid) -> Option<&[DirectMessage]> {
        self.by_partner.get(&partner_id).map(Vec::as_slice)
    }

    pub fn partners(&self) -> &[Uuid] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Conversation list, most recent activity first.
    pub fn previews(&self) -> Vec<ConversationPreview> {
        let Some(me) = self.me else { return Vec::new() };
        let mut previews: Vec<ConversationPreview> = self
            .order
            .iter()
            .filter_map(|partner| {
                let messages = self.by_partner.get(partner)?;
                let last = messages.last()?;
                // Name and avatar come from whichever side of the last message is not us.
                let (partner_name, partner_avatar) = if last.sender_id == me {
                    (last.receiver_name.clone(), last.receiver_avatar.clone())
                } else {
                    (last.sender_name.clone(), last.sender_avatar.clone())
                };
                Some(ConversationPreview {
                    partner_id: *partner,
                    partner_name,
                    partner_avatar,
                    last_message: last.content.clone(),
                    last_at: last.created_at,
                    last_from_me: last.sender_id == me,
                    unread: messages.iter().filter(|m| m.receiver_id == me && !m.is_read).count(),
                })
            })
            .collect();
        // Stable: partners with equal timestamps keep first-appearance order.
        previews.sort_by(|a, b| b.last_at.cmp(&a.last_at));
        previews
    }
}

pub fn reconstruct_threads(messages: &[DirectMessage], current_user_id: Uuid) -> Threads {
    let mut threads = Threads { me: Some(current_user_id), ..Threads::default() };
    for message in messages {
        let partner = if message.sender_id == current_user_id {
            message.receiver_id
        } else if message.receiver_id == current_user_id {
            message.sender_id
        } else {
            trace!(message_id = %message.id, "skipping direct message that does not involve the current user");
            continue;
        };
        threads
            .by_partner
            .entry(partner)
            .or_insert_with(|| {
                threads.order.push(partner);
                Vec::new()
            })
            .push(message.clone());
    }
    threads
}

/// Memoised [`reconstruct_threads`], keyed on the message-list revision and the user.
#[derive(Debug, Default)]
pub struct ThreadCache {
    key: Option<(u64, Uuid)>,
    threads: Threads,
}

impl ThreadCache {
    /// Recompute only if the revision or the user changed. Returns whether it recomputed.
    pub fn refresh(&mut self, messages: &[DirectMessage], current_user_id: Uuid, revision: u64) -> bool {
        let key = (revision, current_user_id);
        if self.key == Some(key) {
            return false;
        }
        self.threads = reconstruct_threads(messages, current_user_id);
        self.key = Some(key);
        true
    }

    pub fn threads(&self) -> &Threads {
        &self.threads
    }
}
