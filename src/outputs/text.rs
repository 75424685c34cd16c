//! Plain-text rendering for `--headless` mode.
//!
//! ```text
//!                  ON THIS DAY  March 14
//!                   6 events • 6 births
//! ────────────────────────────────────────────────────────
//!
//! Historical Events
//! ─────────────────
//!   1879 │ Albert Einstein is born in Ulm, Kingdom of
//!        │ Württemberg.
//!
//! Famous Birthdays
//! ────────────────
//! • Jane Doe b. 1950
//! ```

use super::layout::{self, Row, TIMELINE_BAR, YEAR_WIDTH};
use crate::models::Record;
use crate::utils::{FALLBACK_WIDTH, center};
use std::fmt::Write;

const RULE: char = '─';

/// Render `record` for a `width`-column terminal. A zero width means
/// [`FALLBACK_WIDTH`].
pub fn render_headless(record: &Record, width: usize) -> String {
    let width = if width == 0 { FALLBACK_WIDTH } else { width };
    let mut out = String::new();

    let title = format!("{}  {}", layout::TITLE, record.date);
    writeln!(out, "{}", center(&title, width)).unwrap();
    writeln!(out, "{}", center(&layout::summary(record), width)).unwrap();
    writeln!(out, "{}", rule(width)).unwrap();

    for row in layout::body_rows(record, width) {
        match row {
            Row::Heading(heading) => {
                writeln!(out).unwrap();
                writeln!(out, "{}", heading).unwrap();
                writeln!(out, "{}", rule(heading.chars().count())).unwrap();
            }
            Row::Blank => {}
            Row::Event { year, line } => {
                writeln!(out, "{:>w$} {} {}", year, TIMELINE_BAR, line, w = YEAR_WIDTH).unwrap();
            }
            Row::Continuation(line) => {
                writeln!(out, "{:>w$} {} {}", "", TIMELINE_BAR, line, w = YEAR_WIDTH).unwrap();
            }
            Row::Birthday(birthday) => {
                writeln!(
                    out,
                    "{} {} {}",
                    layout::BULLET,
                    birthday.name,
                    birthday.year_info
                ).unwrap();
            }
        }
    }

    out
}

fn rule(width: usize) -> String {
    std::iter::repeat(RULE).take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Birthday, Event};

    fn sample_record() -> Record {
        Record {
            date: "March 14".to_string(),
            events: vec![
                Event {
                    year: "1879".to_string(),
                    text: "Albert Einstein is born".to_string(),
                },
                Event {
                    year: String::new(),
                    text: "Undated entry".to_string(),
                },
            ],
            birthdays: vec![Birthday {
                name: "Jane Doe".to_string(),
                year_info: "b. 1950".to_string(),
            }],
        }
    }

    #[test]
    fn test_render_headless_layout() {
        let out = render_headless(&sample_record(), 40);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0].trim(), "ON THIS DAY  March 14");
        assert_eq!(lines[1].trim(), "2 events • 1 births");
        assert_eq!(lines[2], "─".repeat(40));
        assert!(lines.contains(&"Historical Events"));
        assert!(lines.contains(&"  1879 │ Albert Einstein is born"));
        assert!(lines.contains(&"       │ Undated entry"));
        assert!(lines.contains(&"Famous Birthdays"));
        assert!(lines.contains(&"• Jane Doe b. 1950"));
    }

    #[test]
    fn test_render_headless_zero_width_falls_back() {
        let out = render_headless(&Record::default(), 0);
        assert_eq!(out.lines().nth(2), Some("─".repeat(FALLBACK_WIDTH).as_str()));
        assert!(out.contains("ON THIS DAY  Today"));
        assert!(out.contains("0 events • 0 births"));
    }

    #[test]
    fn test_render_headless_wraps_under_the_bar() {
        let mut record = sample_record();
        record.events[0].text = "alpha beta gamma delta epsilon zeta eta".to_string();

        let out = render_headless(&record, 32);
        assert!(out.contains(
            "  1879 │ alpha beta gamma\n       │ delta epsilon zeta\n       │ eta\n"
        ));
    }
}
