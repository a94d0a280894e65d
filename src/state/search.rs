//! Debounced operative search.
//!
//! The state machine is clock-injected: callers pass `now` in, the tick loop calls
//! [`SearchState::poll`], and the returned ticket is what goes to the backend.

use std::time::{Duration, Instant};

use crate::model::User;

/// Identifies one issued lookup. Answers are only accepted for the latest ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

#[derive(Debug)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<User>,
    pub loading: bool,
    delay: Duration,
    deadline: Option<Instant>,
    in_flight: Option<SearchTicket>,
    last_seq: u64,
}

impl SearchState {
    pub fn new(delay: Duration) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            loading: false,
            delay,
            deadline: None,
            in_flight: None,
            last_seq: 0,
        }
    }

    /// Query used for lookups: trimmed.
    pub fn effective_query(&self) -> &str {
        self.query.trim()
    }

    /// True once the query is long enough to be worth a lookup.
    pub fn is_active(&self) -> bool {
        self.effective_query().chars().count() > 1
    }

    pub fn set_query(&mut self, query: impl Into<String>, now: Instant) {
        self.query = query.into();
        if !self.is_active() {
            // Too short to search: drop everything right away, including any answer still on its way.
            self.deadline = None;
            self.in_flight = None;
            self.results.clear();
            self.loading = false;
            return;
        }
        self.deadline = Some(now + self.delay);
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        let mut query = std::mem::take(&mut self.query);
        query.push(c);
        self.set_query(query, now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        let mut query = std::mem::take(&mut self.query);
        query.pop();
        self.set_query(query, now);
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.deadline = None;
        self.in_flight = None;
        self.results.clear();
        self.loading = false;
    }

    /// Fire the pending lookup once the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchTicket> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.last_seq += 1;
        let ticket = SearchTicket { seq: self.last_seq, query: self.effective_query().to_string() };
        self.in_flight = Some(ticket.clone());
        self.loading = true;
        Some(ticket)
    }

    /// Apply an answer if it belongs to the latest issued lookup. Returns whether it was used.
    pub fn accept(&mut self, seq: u64, query: &str, users: Vec<User>) -> bool {
        match &self.in_flight {
            Some(ticket) if ticket.seq == seq && ticket.query == query => {
                self.in_flight = None;
                self.results = users;
                self.loading = false;
                true
            }
            _ => false,
        }
    }

    /// A failed lookup stops the spinner if it is still the latest; results stay as they were.
    pub fn fail(&mut self, seq: u64) {
        if self.in_flight.as_ref().map(|t| t.seq) == Some(seq) {
            self.in_flight = None;
            self.loading = false;
        }
    }
}
