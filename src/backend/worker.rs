use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::{Backend, BackendEvent, BackendRequest, BackendResult, FollowListKind};

/// Serve requests from the UI loop until its sender is dropped.
///
/// Mutations are awaited in arrival order so that, say, two messages sent back to back
/// land in the order they were typed. Lookups are spawned so a slow search never
/// queues behind a post. The snapshot is re-read every `refresh_every` as well.
pub async fn run_worker(
    backend: Arc<dyn Backend>,
    mut requests: mpsc::UnboundedReceiver<BackendRequest>,
    events: mpsc::UnboundedSender<BackendEvent>,
    refresh_every: Duration,
) {
    let mut refresh = tokio::time::interval(refresh_every);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of an interval fires immediately; the UI asks for its own first snapshot.
    refresh.tick().await;

    loop {
        tokio::select! {
            request = requests.recv() => {
                let Some(request) = request else {
                    info!("request channel closed, backend worker stopping");
                    break;
                };
                if request.is_read_only() {
                    let backend = backend.clone();
                    let events = events.clone();
                    tokio::spawn(async move {
                        dispatch(backend.as_ref(), request, &events).await;
                    });
                } else {
                    dispatch(backend.as_ref(), request, &events).await;
                }
            }
            _ = refresh.tick() => {
                dispatch(backend.as_ref(), BackendRequest::Refresh, &events).await;
            }
        }

        if events.is_closed() {
            break;
        }
    }
}

/// Run one request against the backend and report the outcome.
///
/// Failures are logged and reported once, never retried. Lookups fail as
/// [`BackendEvent::LookupFailed`] with their token, everything else as [`BackendEvent::Failed`].
pub async fn dispatch(
    backend: &dyn Backend,
    request: BackendRequest,
    events: &mpsc::UnboundedSender<BackendEvent>,
) {
    let op = request.op();
    let read_only = request.is_read_only();
    let logging_out = matches!(request, BackendRequest::Logout);
    let lookup = request.lookup();
    debug!(op, "dispatching backend request");

    let outcome = match execute(backend, request).await {
        Ok(event) => event,
        Err(e) => {
            warn!(op, error = %e, "backend request failed");
            let message = e.to_string();
            let event = match lookup {
                Some(lookup) => BackendEvent::LookupFailed { lookup, message },
                None => BackendEvent::Failed { op, message },
            };
            let _ = events.send(event);
            return;
        }
    };

    if let Some(event) = outcome {
        let _ = events.send(event);
    }

    if read_only || logging_out {
        return;
    }

    match backend.snapshot().await {
        Ok(snapshot) => {
            let _ = events.send(BackendEvent::Snapshot(Box::new(snapshot)));
        }
        Err(e) => {
            warn!(op, error = %e, "snapshot refresh failed");
            let _ = events.send(BackendEvent::Failed { op: "refresh", message: e.to_string() });
        }
    }
}

async fn execute(
    backend: &dyn Backend,
    request: BackendRequest,
) -> BackendResult<Option<BackendEvent>> {
    let event = match request {
        BackendRequest::Refresh => None,
        BackendRequest::LikePost(id) => {
            backend.like_post(id).await?;
            None
        }
        BackendRequest::DeletePost(id) => {
            backend.delete_post(id).await?;
            None
        }
        BackendRequest::AddPost(draft) => Some(BackendEvent::PostPublished(backend.add_post(draft).await?)),
        BackendRequest::FetchComments { post_id, generation } => {
            let comments = backend.fetch_comments(post_id).await?;
            Some(BackendEvent::Comments { post_id, generation, comments })
        }
        BackendRequest::AddComment { post_id, content, reply_to, generation } => {
            backend.add_comment(post_id, content, reply_to).await?;
            let comments = backend.fetch_comments(post_id).await?;
            Some(BackendEvent::Comments { post_id, generation, comments })
        }
        BackendRequest::FollowUser(id) => {
            backend.follow_user(id).await?;
            None
        }
        BackendRequest::UnfollowUser(id) => {
            backend.unfollow_user(id).await?;
            None
        }
        BackendRequest::FetchFollowList { user_id, kind, generation } => {
            let users = match kind {
                FollowListKind::Followers => backend.fetch_followers_list(user_id).await?,
                FollowListKind::Following => backend.fetch_following_list(user_id).await?,
            };
            Some(BackendEvent::FollowList { user_id, kind, generation, users })
        }
        BackendRequest::SearchUsers { seq, query } => {
            let users = backend.search_users(&query).await?;
            Some(BackendEvent::SearchResults { seq, query, users })
        }
        BackendRequest::SendGlobalMessage(content) => {
            backend.send_global_message(content).await?;
            None
        }
        BackendRequest::SendDirectMessage { receiver_id, content } => {
            backend.send_direct_message(receiver_id, content).await?;
            None
        }
        BackendRequest::MarkAllDmsAsRead => {
            backend.mark_all_dms_as_read().await?;
            None
        }
        BackendRequest::ClaimBounty(id) => {
            backend.claim_bounty(id).await?;
            Some(BackendEvent::BountyClaimed(id))
        }
        BackendRequest::AddTeam(draft) => Some(BackendEvent::TeamCreated(backend.add_team(draft).await?)),
        BackendRequest::JoinTeam(code) => {
            let joined = backend.join_team(&code).await?;
            Some(BackendEvent::TeamJoined { code, joined })
        }
        BackendRequest::UpdateProfile(update) => {
            backend.update_profile(update).await?;
            Some(BackendEvent::ProfileSaved)
        }
        BackendRequest::UpdatePreferences(update) => {
            backend.update_preferences(update).await?;
            None
        }
        BackendRequest::ConnectGitHub => {
            backend.connect_github().await?;
            Some(BackendEvent::GitHubLinked)
        }
        BackendRequest::ConnectGitHubManual(username) => {
            backend.connect_github_manual(&username).await?;
            Some(BackendEvent::GitHubLinked)
        }
        BackendRequest::DisconnectGitHub => {
            backend.disconnect_github().await?;
            None
        }
        BackendRequest::Logout => {
            backend.logout().await?;
            Some(BackendEvent::LoggedOut)
        }
        BackendRequest::ToggleTheme => {
            backend.toggle_theme().await?;
            None
        }
        BackendRequest::MarkAsRead(id) => {
            backend.mark_as_read(id).await?;
            None
        }
        BackendRequest::MarkAllNotificationsAsRead => {
            backend.mark_all_notifications_as_read().await?;
            None
        }
    };
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{InMemoryBackend, Lookup};
    use uuid::Uuid;

    fn drain(rx: &mut mpsc::UnboundedReceiver<BackendEvent>) -> Vec<BackendEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[tokio::test]
    async fn mutation_is_followed_by_a_snapshot() {
        let backend = InMemoryBackend::seeded(None);
        let (tx, mut rx) = mpsc::unbounded_channel();

        dispatch(&backend, BackendRequest::SendGlobalMessage("gm operatives".into()), &tx).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        match &events[0] {
            BackendEvent::Snapshot(snapshot) => {
                let last = snapshot.global_messages.last().expect("message stored");
                assert_eq!(last.content, "gm operatives");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn lookups_do_not_trigger_a_snapshot() {
        let backend = InMemoryBackend::seeded(None);
        let (tx, mut rx) = mpsc::unbounded_channel();

        dispatch(&backend, BackendRequest::SearchUsers { seq: 7, query: "ne".into() }, &tx).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], BackendEvent::SearchResults { seq: 7, query, .. } if query == "ne"));
    }

    #[tokio::test]
    async fn failures_are_reported_once_without_retry() {
        let backend = InMemoryBackend::seeded(None);
        let (tx, mut rx) = mpsc::unbounded_channel();

        dispatch(&backend, BackendRequest::ClaimBounty(Uuid::new_v4()), &tx).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], BackendEvent::Failed { op: "claim_bounty", .. }));
    }

    #[tokio::test]
    async fn comment_answers_carry_their_generation() {
        let backend = InMemoryBackend::seeded(None);
        let post_id = backend.snapshot().await.unwrap().posts[0].id;
        let (tx, mut rx) = mpsc::unbounded_channel();

        dispatch(
            &backend,
            BackendRequest::AddComment { post_id, content: "ship it".into(), reply_to: None, generation: 4 },
            &tx,
        )
        .await;

        let events = drain(&mut rx);
        match &events[0] {
            BackendEvent::Comments { post_id: pid, generation, comments } => {
                assert_eq!(*pid, post_id);
                assert_eq!(*generation, 4);
                assert!(comments.iter().any(|c| c.content == "ship it"));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(matches!(events.last(), Some(BackendEvent::Snapshot(_))));
    }

    #[tokio::test]
    async fn failed_lookups_carry_their_token() {
        let backend = InMemoryBackend::seeded(None);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let missing = Uuid::new_v4();

        dispatch(&backend, BackendRequest::FetchComments { post_id: missing, generation: 3 }, &tx).await;
        dispatch(&backend, BackendRequest::Logout, &tx).await;
        dispatch(&backend, BackendRequest::SearchUsers { seq: 9, query: "neo".into() }, &tx).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[0],
            BackendEvent::LookupFailed { lookup: Lookup::Comments { post_id, generation: 3 }, .. } if *post_id == missing
        ));
        assert!(matches!(
            &events[2],
            BackendEvent::LookupFailed { lookup: Lookup::Search { seq: 9, query }, .. } if query == "neo"
        ));
    }

    #[tokio::test]
    async fn logout_skips_the_snapshot() {
        let backend = InMemoryBackend::seeded(None);
        let (tx, mut rx) = mpsc::unbounded_channel();

        dispatch(&backend, BackendRequest::Logout, &tx).await;

        assert_eq!(drain(&mut rx), vec![BackendEvent::LoggedOut]);
    }

    #[tokio::test]
    async fn worker_stops_when_requests_close() {
        let backend: Arc<dyn Backend> = Arc::new(InMemoryBackend::seeded(None));
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (ev_tx, mut ev_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(run_worker(backend, req_rx, ev_tx, Duration::from_secs(3600)));
        req_tx.send(BackendRequest::Refresh).unwrap();
        let first = ev_rx.recv().await.expect("snapshot event");
        assert!(matches!(first, BackendEvent::Snapshot(_)));

        drop(req_tx);
        handle.await.unwrap();
    }
}
