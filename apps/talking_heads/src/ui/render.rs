use std::fmt::Write as _;

use shared::domain::{Talk, ALLOWED_SCORES};

use crate::controller::{
    edit_talk::EditTalkState,
    talk_list::{Destination, TalkListState},
};

pub fn render(state: &TalkListState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "== TalkingHeads{} ==",
        if state.is_loading { " (loading…)" } else { "" }
    );

    if state.talks.is_empty() {
        out.push_str("No talks found\n");
        out.push_str("  Type `add` to create a talk\n");
    } else {
        let mut number = 0;
        for (section, rows) in [
            ("Prepared talks", state.prepared_talks().collect::<Vec<_>>()),
            ("Given talks", state.given_talks().collect::<Vec<_>>()),
        ] {
            let _ = writeln!(out, "{section}");
            for row in rows {
                number += 1;
                render_row(&mut out, number, row);
            }
        }
    }

    if let Some(destination) = &state.destination {
        out.push('\n');
        render_destination(&mut out, destination);
    }
    out
}

fn render_row(out: &mut String, number: usize, row: &EditTalkState) {
    let talk = &row.talk;
    let _ = write!(out, "  {number:>2}. {}  {}", talk.title, stars(talk.score));
    if let Some(date) = talk.given_date {
        let _ = write!(out, "  held on {}", date.format("%A, %-d %B %Y"));
    }
    out.push('\n');
}

fn render_destination(out: &mut String, destination: &Destination) {
    match destination {
        Destination::Add(add) => {
            out.push_str("[Add talk]\n");
            render_form(out, &add.talk);
            if add.is_fetching {
                out.push_str("  fetching a title…\n");
            }
            out.push_str("  (confirm | fetch | dismiss)\n");
        }
        Destination::Edit(edit) => {
            out.push_str("[Edit talk]\n");
            render_form(out, &edit.talk);
            match &edit.confirmation {
                Some(confirmation) => {
                    let _ = writeln!(out, "  {}", confirmation.title);
                    let _ = writeln!(out, "  {} (yes | no)", confirmation.message());
                }
                None => out.push_str("  (done | remove)\n"),
            }
        }
        Destination::Alert(alert) => {
            let _ = writeln!(out, "[{}]", alert.title);
            let _ = writeln!(out, "  {}", alert.message);
            out.push_str("  (dismiss)\n");
        }
    }
}

fn render_form(out: &mut String, talk: &Talk) {
    let _ = writeln!(out, "  title: {}", talk.title);
    let _ = writeln!(out, "  score: {}", stars(talk.score));
    match talk.given_date {
        Some(date) => {
            let _ = writeln!(out, "  given: {date}");
        }
        None => out.push_str("  given: not yet\n"),
    }
}

fn stars(score: u8) -> String {
    ALLOWED_SCORES
        .map(|position| if position <= score { '★' } else { '☆' })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use shared::domain::TalkId;

    use super::*;
    use crate::controller::{add_talk::AddTalkState, talk_list::AlertState};

    fn talk(id: u128, title: &str, score: u8) -> Talk {
        Talk::new(TalkId::from_u128(id))
            .with_title(title)
            .with_score(score)
    }

    #[test]
    fn empty_list_shows_placeholder_and_loading() {
        let rendered = render(&TalkListState::default());
        assert!(rendered.contains("(loading…)"));
        assert!(rendered.contains("No talks found"));
    }

    #[test]
    fn rows_are_partitioned_and_numbered_in_display_order() {
        let mut state = TalkListState::with_talks([
            talk(1, "Legacy TCA", 2).with_given_date(NaiveDate::from_ymd_opt(2022, 5, 12)),
            talk(2, "TCA revisited", 4),
        ]);
        state.is_loading = false;

        let rendered = render(&state);
        let prepared = rendered.find("Prepared talks").expect("prepared section");
        let given = rendered.find("Given talks").expect("given section");
        assert!(prepared < given);
        assert!(rendered.contains(" 1. TCA revisited  ★★★★☆"));
        assert!(rendered.contains(" 2. Legacy TCA  ★★☆☆☆  held on Thursday, 12 May 2022"));
        assert!(!rendered.contains("loading"));
    }

    #[test]
    fn presented_destination_is_rendered_below_the_list() {
        let mut state = TalkListState::default();
        let mut add = AddTalkState::new(TalkId::from_u128(9));
        add.is_fetching = true;
        state.destination = Some(Destination::Add(add));
        assert!(render(&state).contains("fetching a title"));

        state.destination = Some(Destination::Alert(AlertState::failure("Encoding error")));
        let rendered = render(&state);
        assert!(rendered.contains("[An error occurred]"));
        assert!(rendered.contains("Encoding error"));
    }
}
