use std::{ops::RangeInclusive, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::stream::{BoxStream, StreamExt};
use rand::{seq::SliceRandom, Rng};
use shared::{
    domain::{Talk, TalkId, ALLOWED_SCORES},
    error::StoreError,
};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};

use crate::{Result, TalkClient};

const SUGGESTED_TITLES: [&str; 5] = [
    "Back to basics with 6502 assembly",
    "Welcome to dependency hell with npm",
    "Notepad, vi, ed - replacing Xcode",
    "Reinventing the 🛞 with manual layout",
    "Forget about architecture 🍝",
];

pub(crate) const FAILURE_MESSAGES: [&str; 3] = [
    "Internet was down",
    "A:\\DATABASE.TXT not found",
    "Encoding error",
];

#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryOptions {
    /// Chance in `[0, 1]` that a load or save fails.
    pub failure_probability: f64,
    /// Simulated latency of fetch/load, in milliseconds.
    pub latency_ms: RangeInclusive<u64>,
}

impl Default for InMemoryOptions {
    fn default() -> Self {
        Self {
            failure_probability: 0.5,
            latency_ms: 500..=1900,
        }
    }
}

impl InMemoryOptions {
    /// No latency, never fails.
    pub fn reliable() -> Self {
        Self {
            failure_probability: 0.0,
            latency_ms: 0..=0,
        }
    }

    /// No latency, always fails.
    pub fn failing() -> Self {
        Self {
            failure_probability: 1.0,
            latency_ms: 0..=0,
        }
    }

    fn normalized(self) -> Self {
        let (start, end) = self.latency_ms.into_inner();
        Self {
            failure_probability: if self.failure_probability.is_nan() {
                0.0
            } else {
                self.failure_probability.clamp(0.0, 1.0)
            },
            latency_ms: start.min(end)..=start.max(end),
        }
    }
}

/// Mock store keeping the collection in memory. Loads and saves fail at random
/// to exercise the error paths of the UI.
pub struct InMemoryTalkClient {
    talks: watch::Sender<Vec<Talk>>,
    pub(crate) options: InMemoryOptions,
}

impl InMemoryTalkClient {
    pub fn new(initial: Vec<Talk>, options: InMemoryOptions) -> Self {
        let (talks, _) = watch::channel(initial);
        Self {
            talks,
            options: options.normalized(),
        }
    }

    pub fn with_demo_talks(options: InMemoryOptions) -> Self {
        Self::new(demo_talks(), options)
    }

    /// Current backing collection.
    pub fn snapshot(&self) -> Vec<Talk> {
        self.talks.borrow().clone()
    }

    fn should_fail(&self) -> bool {
        rand::thread_rng().gen_bool(self.options.failure_probability)
    }

    fn random_failure() -> StoreError {
        let message = FAILURE_MESSAGES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(FAILURE_MESSAGES[0]);
        StoreError::transient(message)
    }

    async fn simulate_latency(&self) {
        let millis = rand::thread_rng().gen_range(self.options.latency_ms.clone());
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

#[async_trait]
impl TalkClient for InMemoryTalkClient {
    async fn fetch_suggested(&self) -> Result<String> {
        self.simulate_latency().await;
        let title = SUGGESTED_TITLES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(SUGGESTED_TITLES[0]);
        Ok(title.to_string())
    }

    fn talks_stream(&self) -> BoxStream<'static, Vec<Talk>> {
        WatchStream::new(self.talks.subscribe()).boxed()
    }

    async fn load(&self) -> Result<()> {
        self.simulate_latency().await;
        if self.should_fail() {
            let err = Self::random_failure();
            warn!(error = %err, "simulated load failure");
            return Err(err);
        }
        // Re-emit the current collection to every subscriber.
        self.talks.send_modify(|_| {});
        debug!(talks = self.talks.borrow().len(), "reloaded talks");
        Ok(())
    }

    async fn save(&self, talks: Vec<Talk>) -> Result<()> {
        if self.should_fail() {
            let err = Self::random_failure();
            warn!(error = %err, "simulated save failure");
            return Err(err);
        }
        debug!(talks = talks.len(), "saved talks");
        self.talks.send_replace(talks);
        Ok(())
    }
}

/// The catalogue the app starts with. Scores are random.
pub fn demo_talks() -> Vec<Talk> {
    let mut rng = rand::thread_rng();
    let mut talk = |title: &str| {
        Talk::new(TalkId::random())
            .with_title(title)
            .with_score(rng.gen_range(ALLOWED_SCORES))
    };

    vec![
        talk("Is testing really dead?"),
        talk("C++ GUI development"),
        talk("Enterprise Swift on the Server"),
        talk("Framework of the week"),
        talk("JSON parsing from scratch in C89"),
        talk("TCA revisited"),
        talk("Legacy TCA").with_given_date(NaiveDate::from_ymd_opt(2022, 5, 12)),
    ]
}
