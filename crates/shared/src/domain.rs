use std::{
    fmt,
    ops::RangeInclusive,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scores a committed talk may carry.
pub const ALLOWED_SCORES: RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TalkId(pub Uuid);

impl TalkId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl fmt::Display for TalkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    pub id: TalkId,
    pub title: String,
    pub score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_date: Option<NaiveDate>,
}

impl Talk {
    /// A blank talk: empty title, unset score (0), not given yet.
    pub fn new(id: TalkId) -> Self {
        Self {
            id,
            title: String::new(),
            score: 0,
            given_date: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_score(mut self, score: u8) -> Self {
        self.score = score;
        self
    }

    pub fn with_given_date(mut self, given_date: Option<NaiveDate>) -> Self {
        self.given_date = given_date;
        self
    }

    pub fn is_given(&self) -> bool {
        self.given_date.is_some()
    }

    /// The value as it may be stored in a talk collection.
    pub fn committed(mut self) -> Self {
        self.score = clamp_score(self.score);
        self
    }
}

pub fn clamp_score(score: u8) -> u8 {
    score.clamp(*ALLOWED_SCORES.start(), *ALLOWED_SCORES.end())
}

/// Source of fresh talk identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> TalkId;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> TalkId {
        TalkId::random()
    }
}

/// Hands out `0, 1, 2, ...` as UUIDs; deterministic ids for tests and replays.
#[derive(Debug, Default)]
pub struct IncrementingIdGenerator {
    next: AtomicU64,
}

impl IncrementingIdGenerator {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl IdGenerator for IncrementingIdGenerator {
    fn next_id(&self) -> TalkId {
        let value = self.next.fetch_add(1, Ordering::Relaxed);
        TalkId::from_u128(u128::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_talk_has_unset_score_and_no_date() {
        let talk = Talk::new(TalkId::from_u128(7));
        assert_eq!(talk.title, "");
        assert_eq!(talk.score, 0);
        assert!(!talk.is_given());
    }

    #[test]
    fn committed_talk_clamps_score_into_allowed_range() {
        let id = TalkId::from_u128(1);
        assert_eq!(Talk::new(id).committed().score, 1);
        assert_eq!(Talk::new(id).with_score(9).committed().score, 5);
        assert_eq!(Talk::new(id).with_score(3).committed().score, 3);
    }

    #[test]
    fn incrementing_generator_counts_up_from_start() {
        let ids = IncrementingIdGenerator::starting_at(5);
        assert_eq!(ids.next_id(), TalkId::from_u128(5));
        assert_eq!(ids.next_id(), TalkId::from_u128(6));
    }

    #[test]
    fn talk_serializes_without_missing_given_date() {
        let talk = Talk::new(TalkId::from_u128(0)).with_title("TCA revisited");
        let json = serde_json::to_value(&talk).expect("serialize");
        assert_eq!(json["title"], "TCA revisited");
        assert!(json.get("given_date").is_none());

        let given = talk.with_given_date(NaiveDate::from_ymd_opt(2022, 5, 12));
        let json = serde_json::to_value(&given).expect("serialize");
        assert_eq!(json["given_date"], "2022-05-12");
    }
}
