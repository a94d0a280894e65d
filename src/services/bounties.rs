use uuid::Uuid;

use crate::model::{Bounty, BountyStatus};
use crate::state::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BountyFilter {
    All,
    Open,
    Claimed,
    Completed,
}

impl BountyFilter {
    pub const ALL: [BountyFilter; 4] = [BountyFilter::All, BountyFilter::Open, BountyFilter::Claimed, BountyFilter::Completed];

    pub fn label(self) -> &'static str {
        match self {
            BountyFilter::All => "ALL",
            BountyFilter::Open => "OPEN",
            BountyFilter::Claimed => "MY CLAIMS",
            BountyFilter::Completed => "COMPLETED",
        }
    }

    pub fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// `Claimed` means claimed by `me`, whatever the status says.
    pub fn matches(self, bounty: &Bounty, me: Uuid) -> bool {
        match self {
            BountyFilter::All => true,
            BountyFilter::Open => bounty.status == BountyStatus::Open,
            BountyFilter::Claimed => bounty.claimed_by == Some(me),
            BountyFilter::Completed => bounty.status == BountyStatus::Completed,
        }
    }
}

pub fn filter_bounties<'a>(bounties: &'a [Bounty], filter: BountyFilter, query: &str, me: Uuid) -> Vec<&'a Bounty> {
    let needle = query.trim().to_lowercase();
    bounties
        .iter()
        .filter(|b| filter.matches(b, me))
        .filter(|b| {
            needle.is_empty()
                || b.title.to_lowercase().contains(&needle)
                || b.description.to_lowercase().contains(&needle)
                || b.kind.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Local guard before asking the backend to claim.
pub fn check_claimable(bounty: &Bounty) -> Result<(), AppError> {
    if bounty.status != BountyStatus::Open {
        return Err(AppError::Validation(format!(
            "Bounty is {} and cannot be claimed.",
            bounty.status.label().to_lowercase()
        )));
    }
    Ok(())
}

pub fn total_claimed_xp(bounties: &[Bounty], me: Uuid) -> u32 {
    bounties
        .iter()
        .filter(|b| b.claimed_by == Some(me))
        .map(|b| b.reward_xp)
        .sum()
}
