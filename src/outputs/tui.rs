//! Interactive, scrollable terminal view.
//!
//! The view is a single-threaded loop over a closed set of [`Message`]s.
//! The record is fetched on a tokio task and arrives as
//! [`Message::DataReady`] (or [`Message::Failed`]); keys, resizes and ticks
//! come from crossterm. The loop only waits at [`next_message`], and quitting
//! ends the loop, not the fetch.

use super::layout::{self, Row, TIMELINE_BAR, YEAR_WIDTH};
use crate::models::Record;
use crate::scrapers::PageSource;
use crate::today::Today;
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::error::Error;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, error::TryRecvError};
use tracing::{debug, info, warn};

/// How long to wait for terminal input before emitting a tick.
const TICK_RATE: Duration = Duration::from_millis(100);

const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Title/date, summary, divider.
const HEADER_ROWS: u16 = 3;
const FOOTER_ROWS: u16 = 1;

const ACCENT: Color = Color::Rgb(0x7D, 0x56, 0xF4);
const WARNING: Color = Color::Rgb(0xF5, 0x53, 0x85);
const SPECIAL: Color = Color::Rgb(0x73, 0xF5, 0x9F);
const SUBTLE: Color = Color::Rgb(0x38, 0x38, 0x38);
const MUTED: Color = Color::Rgb(0x62, 0x62, 0x62);
const TEXT: Color = Color::Rgb(0xDD, 0xDD, 0xDD);

/// Everything that can move the view forward.
#[derive(Debug)]
pub enum Message {
    Resize(u16, u16),
    Key(KeyEvent),
    Tick,
    DataReady(Record),
    Failed(String),
}

#[derive(Debug)]
enum Phase {
    Loading,
    Ready(Record),
    Failed(String),
}

/// View state. Mutated only through [`App::update`].
#[derive(Debug)]
pub struct App {
    phase: Phase,
    spinner: usize,
    scroll: u16,
    width: u16,
    height: u16,
    quit: bool,
}

impl App {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            phase: Phase::Loading,
            spinner: 0,
            scroll: 0,
            width,
            height,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn update(&mut self, msg: Message) {
        match msg {
            Message::Resize(width, height) => {
                self.width = width;
                self.height = height;
                self.scroll = self.scroll.min(self.max_scroll());
            }
            Message::Key(key) => self.on_key(key),
            Message::Tick => {
                if matches!(self.phase, Phase::Loading) {
                    self.spinner = (self.spinner + 1) % SPINNER_FRAMES.len();
                }
            }
            Message::DataReady(record) => {
                info!(date = %record.date, "Record ready");
                self.phase = Phase::Ready(record);
                self.scroll = 0;
            }
            Message::Failed(err) => {
                self.phase = Phase::Failed(err);
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            _ if !matches!(self.phase, Phase::Ready(_)) => {}
            KeyCode::Char('j') | KeyCode::Down => self.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(self.viewport_height() as i32),
            KeyCode::PageUp => self.scroll_by(-(self.viewport_height() as i32)),
            KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
            KeyCode::Char('G') | KeyCode::End => self.scroll = self.max_scroll(),
            _ => {}
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let target = (self.scroll as i32 + delta).clamp(0, self.max_scroll() as i32);
        self.scroll = target as u16;
    }

    fn viewport_height(&self) -> u16 {
        self.height.saturating_sub(HEADER_ROWS + FOOTER_ROWS)
    }

    fn content_height(&self) -> usize {
        match &self.phase {
            Phase::Ready(record) => layout::body_rows(record, self.width as usize).len(),
            _ => 0,
        }
    }

    fn max_scroll(&self) -> u16 {
        let overflow = self
            .content_height()
            .saturating_sub(self.viewport_height() as usize);
        overflow.min(u16::MAX as usize) as u16
    }
}

/// Run the interactive view until the user quits.
///
/// The record is fetched on a spawned task; the terminal loop runs on a
/// blocking thread so crossterm's polling never stalls the runtime.
pub async fn run<S>(today: Today<S>) -> Result<(), Box<dyn Error>>
where
    S: PageSource + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let msg = match today.get_record().await {
            Ok(record) => Message::DataReady(record),
            Err(e) => Message::Failed(e.to_string()),
        };
        // The receiver is gone only if the user already quit.
        let _ = tx.send(msg);
    });

    tokio::task::spawn_blocking(move || run_terminal(rx)).await??;
    Ok(())
}

fn run_terminal(rx: UnboundedReceiver<Message>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, Some(rx));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    mut rx: Option<UnboundedReceiver<Message>>,
) -> io::Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width, size.height);

    loop {
        terminal.draw(|f| draw(f, &app))?;
        app.update(next_message(&mut rx)?);
        if app.should_quit() {
            debug!("Quit requested");
            return Ok(());
        }
    }
}

/// Pipeline results first, then terminal input, else a tick.
fn next_message(rx: &mut Option<UnboundedReceiver<Message>>) -> io::Result<Message> {
    if let Some(msg) = pipeline_message(rx) {
        return Ok(msg);
    }

    if !event::poll(TICK_RATE)? {
        return Ok(Message::Tick);
    }

    Ok(match event::read()? {
        TermEvent::Key(key) => Message::Key(key),
        TermEvent::Resize(width, height) => Message::Resize(width, height),
        _ => Message::Tick,
    })
}

/// The pipeline sends exactly one message. The receiver is dropped once it
/// arrives, or once the sender is gone without sending (the task panicked).
fn pipeline_message(rx: &mut Option<UnboundedReceiver<Message>>) -> Option<Message> {
    let msg = match rx.as_mut()?.try_recv() {
        Ok(msg) => msg,
        Err(TryRecvError::Empty) => return None,
        Err(TryRecvError::Disconnected) => {
            warn!("Record task ended without a result");
            Message::Failed("the record task stopped before producing a result".to_string())
        }
    };
    *rx = None;
    Some(msg)
}

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.size();

    let record = match &app.phase {
        Phase::Loading => {
            let text = format!("\n {} Loading history...", SPINNER_FRAMES[app.spinner]);
            f.render_widget(Paragraph::new(text).style(Style::default().fg(WARNING)), area);
            return;
        }
        Phase::Failed(err) => {
            let text = format!("\nError: {}\n\nPress q to quit.", err);
            f.render_widget(Paragraph::new(text), area);
            return;
        }
        Phase::Ready(record) => record,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_ROWS),
            Constraint::Min(0),
            Constraint::Length(FOOTER_ROWS),
        ])
        .split(area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", layout::TITLE),
                bold.fg(Color::White).bg(ACCENT),
            ),
            Span::styled(format!(" {} ", record.date), bold.fg(Color::White).bg(WARNING)),
        ]),
        Line::styled(layout::summary(record), Style::default().fg(MUTED)),
        Line::styled("─".repeat(area.width as usize), Style::default().fg(SUBTLE)),
    ];
    f.render_widget(Paragraph::new(header).alignment(Alignment::Center), chunks[0]);

    let body: Vec<Line> = layout::body_rows(record, area.width as usize)
        .into_iter()
        .map(body_line)
        .collect();
    f.render_widget(Paragraph::new(body).scroll((app.scroll, 0)), chunks[1]);

    let footer = Paragraph::new("j/k scroll • q quit")
        .style(Style::default().fg(MUTED))
        .alignment(Alignment::Center);
    f.render_widget(footer, chunks[2]);
}

fn body_line(row: Row<'_>) -> Line<'static> {
    let year_style = Style::default().fg(WARNING).add_modifier(Modifier::BOLD);
    let bar = Span::styled(format!(" {} ", TIMELINE_BAR), Style::default().fg(SUBTLE));
    let text_style = Style::default().fg(TEXT);

    match row {
        Row::Heading(heading) => Line::styled(
            heading,
            Style::default()
                .fg(SPECIAL)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ),
        Row::Blank => Line::default(),
        Row::Event { year, line } => Line::from(vec![
            Span::styled(format!("{:>w$}", year, w = YEAR_WIDTH), year_style),
            bar,
            Span::styled(line, text_style),
        ]),
        Row::Continuation(line) => Line::from(vec![
            Span::raw(" ".repeat(YEAR_WIDTH)),
            bar,
            Span::styled(line, text_style),
        ]),
        Row::Birthday(birthday) => Line::from(vec![
            Span::raw(format!("{} ", layout::BULLET)),
            Span::styled(
                birthday.name.clone(),
                Style::default().fg(SPECIAL).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", birthday.year_info), Style::default().fg(MUTED)),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Birthday, Event};
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> Message {
        Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn long_record() -> Record {
        Record {
            date: "March 14".to_string(),
            events: (0..6)
                .map(|i| Event {
                    year: format!("{}", 1900 + i),
                    text: format!("Event number {}", i),
                })
                .collect(),
            birthdays: vec![Birthday {
                name: "Jane Doe".to_string(),
                year_info: "b. 1950".to_string(),
            }],
        }
    }

    fn screen_text(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_quit_keys() {
        for msg in [
            key(KeyCode::Char('q')),
            key(KeyCode::Esc),
            Message::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        ] {
            let mut app = App::new(80, 24);
            app.update(msg);
            assert!(app.should_quit());
        }
    }

    #[test]
    fn test_plain_c_does_not_quit() {
        let mut app = App::new(80, 24);
        app.update(key(KeyCode::Char('c')));
        assert!(!app.should_quit());
    }

    #[test]
    fn test_tick_advances_spinner_only_while_loading() {
        let mut app = App::new(80, 24);
        app.update(Message::Tick);
        assert_eq!(app.spinner, 1);

        app.update(Message::DataReady(long_record()));
        app.update(Message::Tick);
        assert_eq!(app.spinner, 1);
    }

    #[test]
    fn test_scroll_is_clamped_to_content() {
        // 10 body rows, 4 visible rows => max scroll 6.
        let mut app = App::new(80, 8);
        app.update(Message::DataReady(long_record()));

        app.update(key(KeyCode::Char('k')));
        assert_eq!(app.scroll, 0);

        app.update(key(KeyCode::Char('j')));
        app.update(key(KeyCode::Down));
        assert_eq!(app.scroll, 2);

        app.update(key(KeyCode::End));
        assert_eq!(app.scroll, 6);
        app.update(key(KeyCode::Char('j')));
        assert_eq!(app.scroll, 6);

        app.update(key(KeyCode::Home));
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_resize_reclamps_scroll() {
        let mut app = App::new(80, 8);
        app.update(Message::DataReady(long_record()));
        app.update(key(KeyCode::End));

        app.update(Message::Resize(80, 40));
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_scroll_keys_ignored_until_ready() {
        let mut app = App::new(80, 8);
        app.update(key(KeyCode::End));
        assert_eq!(app.scroll, 0);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_draw_loading_screen() {
        let app = App::new(40, 5);
        assert!(screen_text(&app, 40, 5).contains("Loading history..."));
    }

    #[test]
    fn test_draw_ready_screen() {
        let mut app = App::new(60, 20);
        app.update(Message::DataReady(long_record()));

        let text = screen_text(&app, 60, 20);
        assert!(text.contains("ON THIS DAY"));
        assert!(text.contains("March 14"));
        assert!(text.contains("6 events • 1 births"));
        assert!(text.contains("Historical Events"));
        assert!(text.contains("1900 │ Event number 0"));
        assert!(text.contains("• Jane Doe b. 1950"));
        assert!(text.contains("j/k scroll • q quit"));
    }

    #[test]
    fn test_draw_error_screen_waits_for_quit() {
        let mut app = App::new(60, 10);
        app.update(Message::Failed("status code error: 503 Service Unavailable".to_string()));
        app.update(key(KeyCode::Char('j')));
        assert!(!app.should_quit());

        let text = screen_text(&app, 60, 10);
        assert!(text.contains("Error: status code error: 503"));
        assert!(text.contains("Press q to quit."));
    }

    #[test]
    fn test_dropped_pipeline_fails_instead_of_spinning() {
        let (tx, rx) = mpsc::unbounded_channel::<Message>();
        drop(tx);
        let mut rx = Some(rx);

        let msg = pipeline_message(&mut rx).unwrap();
        assert!(rx.is_none());

        let mut app = App::new(60, 10);
        app.update(msg);
        assert!(screen_text(&app, 60, 10).contains("Error: the record task stopped"));
    }

    #[test]
    fn test_pipeline_result_is_taken_once() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut rx = Some(rx);
        assert!(pipeline_message(&mut rx).is_none());

        tx.send(Message::DataReady(long_record())).unwrap();
        drop(tx);
        assert!(matches!(
            pipeline_message(&mut rx),
            Some(Message::DataReady(_))
        ));

        // The finished task's closed channel must not replace the record.
        assert!(rx.is_none());
        assert!(pipeline_message(&mut rx).is_none());
    }
}
