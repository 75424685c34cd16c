//! Presentation of a [`Record`](crate::models::Record).
//!
//! # Submodules
//!
//! - [`layout`]: which rows appear, shared by both renderers
//! - [`text`]: plain text for `--headless`
//! - [`tui`]: the interactive ratatui view
//!
//! Both modes show the same screen:
//!
//! ```text
//!            ON THIS DAY  March 14
//!             6 events • 6 births
//! ───────────────────────────────────────────
//! Historical Events
//!   1879 │ Albert Einstein is born.
//!   1988 │ The first Pi Day is celebrated.
//!
//! Famous Birthdays
//! • Jane Doe b. 1950
//! ```

pub mod layout;
pub mod text;
pub mod tui;
