//! User intents coming from the front-end, before they are resolved against state.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    Add,
    /// Open the editor for the row with this 1-based display number.
    Edit(usize),
    /// Set the score of the row with this display number, without opening it.
    Rate(usize, u8),
    Title(String),
    Score(u8),
    Given(GivenDate),
    FetchTitle,
    ConfirmAdd,
    Done,
    Remove,
    ConfirmRemoval,
    CancelRemoval,
    Dismiss,
    Load,
    Save,
    Clear,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GivenDate {
    On(NaiveDate),
    Today,
    NotGiven,
}

impl GivenDate {
    pub fn resolve(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::On(date) => Some(date),
            Self::Today => Some(today),
            Self::NotGiven => None,
        }
    }
}
