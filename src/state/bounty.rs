use uuid::Uuid;

use crate::services::bounties::BountyFilter;

#[derive(Debug)]
pub struct BountyState {
    pub filter: BountyFilter,
    pub query: String,
    pub editing_query: bool,
    pub selected: usize,
    pub detail: Option<Uuid>,
    /// Claim sent, waiting for the backend.
    pub claiming: Option<Uuid>,
}

impl Default for BountyState {
    fn default() -> Self {
        Self {
            filter: BountyFilter::All,
            query: String::new(),
            editing_query: false,
            selected: 0,
            detail: None,
            claiming: None,
        }
    }
}

impl BountyState {
    pub fn open_detail(&mut self, id: Uuid) {
        self.detail = Some(id);
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn set_filter(&mut self, filter: BountyFilter) {
        self.filter = filter;
        self.selected = 0;
    }
}
