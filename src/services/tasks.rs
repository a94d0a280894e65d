//! Cross-squad operations board.

use uuid::Uuid;

use crate::model::Team;

/// A pending task together with the squad it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTask {
    pub task_id: Uuid,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub team_id: Uuid,
    pub team_name: String,
    pub team_color: String,
}

/// Keys are exact and lowercase; anything else, "URGENT" included, weighs 0.
pub fn priority_weight(priority: &str) -> u8 {
    match priority {
        "urgent" => 3,
        "high" => 2,
        "medium" => 1,
        _ => 0,
    }
}

pub fn is_done(status: &str) -> bool {
    status == "done"
}

/// Every unfinished task across `teams`, highest priority first.
///
/// Ties keep flattening order (team order, then task order); there is no secondary key.
pub fn prioritized_board(teams: &[Team], query: &str) -> Vec<BoardTask> {
    let needle = query.trim().to_lowercase();
    let mut board: Vec<BoardTask> = teams
        .iter()
        .flat_map(|team| {
            team.tasks.iter().map(move |task| BoardTask {
                task_id: task.id,
                title: task.title.clone(),
                status: task.status.clone(),
                priority: task.priority.clone(),
                team_id: team.id,
                team_name: team.name.clone(),
                team_color: team.color.clone(),
            })
        })
        .filter(|t| !is_done(&t.status))
        .filter(|t| {
            needle.is_empty()
                || t.title.to_lowercase().contains(&needle)
                || t.team_name.to_lowercase().contains(&needle)
        })
        .collect();
    board.sort_by(|a, b| priority_weight(&b.priority).cmp(&priority_weight(&a.priority)));
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Task, Visibility};

    fn team(name: &str, tasks: &[(&str, &str, &str)]) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: name.to_string(),
            event: String::new(),
            kind: String::new(),
            visibility: Visibility::Public,
            max_members: 4,
            current_members: Vec::new(),
            tasks: tasks
                .iter()
                .map(|(title, status, priority)| Task {
                    id: Uuid::new_v4(),
                    title: title.to_string(),
                    status: status.to_string(),
                    priority: priority.to_string(),
                })
                .collect(),
            progress: 0,
            color: "cyan".into(),
            join_code: "X".into(),
        }
    }

    fn priorities(board: &[BoardTask]) -> Vec<&str> {
        board.iter().map(|t| t.priority.as_str()).collect()
    }

    #[test]
    fn sorts_by_priority_weight() {
        let teams = vec![team("A", &[("t1", "todo", "low"), ("t2", "todo", "urgent"), ("t3", "todo", "medium")])];
        assert_eq!(priorities(&prioritized_board(&teams, "")), vec!["urgent", "medium", "low"]);
    }

    #[test]
    fn unknown_priority_weighs_like_low_and_keeps_flatten_order() {
        let teams = vec![
            team("A", &[("a-low", "todo", "low"), ("a-odd", "todo", "someday")]),
            team("B", &[("b-low", "todo", "low"), ("b-high", "todo", "high")]),
        ];
        let titles: Vec<_> = prioritized_board(&teams, "").into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["b-high", "a-low", "a-odd", "b-low"]);
        assert_eq!(priority_weight("someday"), priority_weight("low"));
    }

    #[test]
    fn done_tasks_never_appear() {
        let teams = vec![team("Neon", &[("ship", "done", "urgent"), ("ship docs", "todo", "low")])];
        let board = prioritized_board(&teams, "ship");
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].title, "ship docs");
        assert!(prioritized_board(&teams, "neon").iter().all(|t| t.status != "done"));
    }

    #[test]
    fn query_matches_title_or_team_name() {
        let teams = vec![
            team("Neon Syndicate", &[("auth", "todo", "high")]),
            team("Ghost", &[("neon sign", "todo", "low"), ("audit", "todo", "low")]),
        ];
        let titles: Vec<_> = prioritized_board(&teams, "NEON").into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["auth", "neon sign"]);
    }

    #[test]
    fn priority_and_status_keys_are_exact() {
        assert_eq!(priority_weight("urgent"), 3);
        assert_eq!(priority_weight("URGENT"), 0);
        assert_eq!(priority_weight("High"), 0);
        assert!(is_done("done"));
        assert!(!is_done("Done"));

        let teams = vec![team("A", &[("shout", "Done", "URGENT"), ("calm", "todo", "medium")])];
        let titles: Vec<_> = prioritized_board(&teams, "").into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["calm", "shout"]);
    }
}
