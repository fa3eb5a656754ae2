//! Keyboard Playground - drive the keyboard-dispatch engine from a terminal
//!
//! Every terminal key is turned into one or more gestures on a keyboard
//! action, and the engine edits an in-memory document:
//! - Printable keys: press + release on a character (space uses the space key)
//! - Backspace: press, Enter: primary key
//! - Tab: long press on space, then Left/Right drag the cursor, Esc releases
//! - F1-F3: accept a suggestion, F5/F6: toggle audio/haptic feedback
//! - Ctrl+L: next locale, Ctrl+E: type an emoji, Ctrl+C: quit

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use keyboard_dispatch::prelude::*;
use keyboard_dispatch::SpaceDragState;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};

/// Points moved per arrow key while space-dragging
const DRAG_STEP: f64 = 8.0;
/// Feedback entries kept on screen
const FEEDBACK_LOG_LEN: usize = 8;

const WORDS: &[&str] = &[
    "hello", "help", "here", "there", "their", "the", "they", "keyboard", "key", "quick",
    "brown", "fox", "jumps", "over", "lazy", "dog", "world", "word", "write", "rust",
];

/// Keyboard Playground - type through the keyboard-dispatch engine
#[derive(Parser, Debug)]
#[command(name = "keyboard-playground")]
#[command(about = "Type into a buffer through the keyboard gesture engine")]
struct Args {
    /// Active locale, e.g. en, de, ckb
    #[arg(long)]
    locale: Option<String>,

    /// Keyboard settings JSON file
    #[arg(long)]
    settings: Option<String>,

    /// Start with audio feedback disabled
    #[arg(long)]
    no_audio: bool,

    /// Start with haptic feedback disabled
    #[arg(long)]
    no_haptic: bool,
}

// ============================================================================
// Controller - suggestions from a tiny word list
// ============================================================================

struct PlaygroundController {
    keyboard: Shared<KeyboardContext>,
    autocomplete: Shared<AutocompleteContext>,
    quit: Cell<bool>,
    calls: RefCell<Vec<String>>,
}

impl PlaygroundController {
    fn suggestions_for(word: &str) -> Vec<Suggestion> {
        if word.is_empty() {
            return Vec::new();
        }
        let lower = word.to_lowercase();
        let known = WORDS.contains(&lower.as_str());
        let mut suggestions: Vec<Suggestion> = WORDS
            .iter()
            .filter(|w| w.starts_with(&lower) && **w != lower)
            .take(3)
            .map(|w| Suggestion::new(*w))
            .collect();
        if !known {
            if let Some(fix) = WORDS.iter().find(|w| is_one_edit_away(&lower, w)) {
                suggestions.retain(|s| s.text != *fix);
                suggestions.insert(0, Suggestion::new(*fix).autocorrect());
            }
        }
        suggestions.truncate(3);
        suggestions
    }
}

impl KeyboardController for PlaygroundController {
    fn perform_autocomplete(&self) {
        let word = self.keyboard.borrow().proxy().current_word_before_cursor();
        let suggestions = Self::suggestions_for(&word);
        self.autocomplete.borrow_mut().set_suggestions(suggestions);
    }

    fn select_next_keyboard(&self) {
        self.calls.borrow_mut().push("next keyboard".to_string());
    }

    fn dismiss_keyboard(&self) {
        self.quit.set(true);
    }

    fn start_dictation(&self) {
        self.calls.borrow_mut().push("dictation".to_string());
    }

    fn perform_custom(&self, name: &str) {
        self.calls.borrow_mut().push(format!("custom {name}"));
    }
}

/// Single insertion, deletion or substitution
fn is_one_edit_away(a: &str, b: &str) -> bool {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > 1 {
        return false;
    }
    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    a.len().max(b.len()) - prefix - suffix == 1
}

// ============================================================================
// Feedback - the most recent descriptors, newest first
// ============================================================================

#[derive(Clone, Default)]
struct FeedbackLog {
    entries: Rc<RefCell<VecDeque<Feedback>>>,
}

impl FeedbackLog {
    fn recent(&self) -> Vec<Feedback> {
        self.entries.borrow().iter().copied().collect()
    }
}

impl FeedbackTrigger for FeedbackLog {
    fn trigger(&mut self, feedback: Feedback) {
        TracingFeedback.trigger(feedback);
        let mut entries = self.entries.borrow_mut();
        entries.push_front(feedback);
        entries.truncate(FEEDBACK_LOG_LEN);
    }
}

// ============================================================================
// App - engine, drag session and what to show
// ============================================================================

struct DragSession {
    anchor: DragPoint,
    x: f64,
}

struct App {
    handler: ActionHandler<LoggingMiddleware>,
    controller: Rc<PlaygroundController>,
    feedback: FeedbackLog,
    emojis: Rc<RefCell<Vec<Emoji>>>,
    drag: Option<DragSession>,
    last_report: Vec<&'static str>,
    last_gesture: String,
}

impl App {
    fn new(settings: KeyboardSettings) -> Self {
        let feedback = FeedbackLog::default();
        let emojis = Rc::new(RefCell::new(Vec::new()));
        let registered = emojis.clone();
        let mut handler = settings
            .into_handler(BufferProxy::new(), ControllerHandle::detached())
            .with_feedback_trigger(feedback.clone())
            .on_emoji(move |emoji| registered.borrow_mut().push(emoji.clone()))
            .with_middleware(LoggingMiddleware::new());

        let controller = Rc::new(PlaygroundController {
            keyboard: handler.keyboard_context().clone(),
            autocomplete: handler.autocomplete_context().clone(),
            quit: Cell::new(false),
            calls: RefCell::new(Vec::new()),
        });
        handler.set_controller(ControllerHandle::new(&controller));

        Self {
            handler,
            controller,
            feedback,
            emojis,
            drag: None,
            last_report: Vec::new(),
            last_gesture: String::new(),
        }
    }

    fn should_quit(&self) -> bool {
        self.controller.quit.get()
    }

    fn record(&mut self, label: String, report: HandleReport) {
        self.last_gesture = label;
        self.last_report = report.names();
    }

    fn tap(&mut self, action: KeyboardAction) {
        let mut report = self.handler.handle(Gesture::Press, &action);
        report.extend(self.handler.handle(Gesture::Release, &action));
        self.record(format!("tap {action}"), report);
    }

    fn gesture(&mut self, gesture: Gesture, action: KeyboardAction) {
        let report = self.handler.handle(gesture, &action);
        self.record(format!("{gesture} {action}"), report);
    }

    fn start_drag(&mut self) {
        self.gesture(Gesture::Press, KeyboardAction::Space);
        let report = self.handler.handle(Gesture::LongPress, &KeyboardAction::Space);
        self.record("long press Space".to_string(), report);
        let anchor = DragPoint::new(0.0, 0.0);
        self.handler.handle_drag(&KeyboardAction::Space, anchor, anchor);
        self.drag = Some(DragSession { anchor, x: 0.0 });
    }

    fn drag_by(&mut self, points: f64) {
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        session.x += points;
        let (from, to) = (session.anchor, DragPoint::new(session.x, 0.0));
        let moved = self.handler.handle_drag(&KeyboardAction::Space, from, to);
        self.last_gesture = format!("drag to {:+.0}pt", to.x);
        self.last_report = match moved {
            Some(delta) => vec![if delta < 0 { "MovedLeft" } else { "MovedRight" }],
            None => Vec::new(),
        };
    }

    fn end_drag(&mut self) {
        self.drag = None;
        self.gesture(Gesture::Release, KeyboardAction::Space);
    }

    fn select_suggestion(&mut self, index: usize) {
        let suggestion = self
            .handler
            .autocomplete_context()
            .borrow()
            .suggestions()
            .get(index)
            .cloned();
        if let Some(suggestion) = suggestion {
            let report = self.handler.handle_suggestion(&suggestion);
            self.record(format!("suggestion {}", suggestion.text), report);
        }
    }

    fn toggle_audio(&mut self) {
        let enabled = self
            .handler
            .feedback_configuration()
            .borrow_mut()
            .toggle_audio_enabled();
        self.last_gesture = format!("audio {}", if enabled { "on" } else { "off" });
    }

    fn toggle_haptic(&mut self) {
        let enabled = self
            .handler
            .feedback_configuration()
            .borrow_mut()
            .toggle_haptic_enabled();
        self.last_gesture = format!("haptic {}", if enabled { "on" } else { "off" });
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.drag.is_some() {
            match key.code {
                KeyCode::Left => self.drag_by(-DRAG_STEP),
                KeyCode::Right => self.drag_by(DRAG_STEP),
                KeyCode::Esc | KeyCode::Tab => self.end_drag(),
                _ => {}
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.gesture(Gesture::Release, KeyboardAction::DismissKeyboard),
            KeyCode::Char('l') if ctrl => self.tap(KeyboardAction::NextLocale),
            KeyCode::Char('e') if ctrl => self.tap(KeyboardAction::emoji("🙂")),
            KeyCode::Char(' ') => self.tap(KeyboardAction::Space),
            KeyCode::Char(c) if !ctrl => self.tap(KeyboardAction::character(c.to_string())),
            KeyCode::Backspace => self.gesture(Gesture::Press, KeyboardAction::Backspace),
            KeyCode::Enter => self.tap(KeyboardAction::Primary(PrimaryKind::Return)),
            KeyCode::Tab => self.start_drag(),
            KeyCode::Left => self.gesture(Gesture::Press, KeyboardAction::MoveCursorBackward),
            KeyCode::Right => self.gesture(Gesture::Press, KeyboardAction::MoveCursorForward),
            KeyCode::F(n @ 1..=3) => self.select_suggestion(usize::from(n - 1)),
            KeyCode::F(5) => self.toggle_audio(),
            KeyCode::F(6) => self.toggle_haptic(),
            KeyCode::Esc => self.gesture(Gesture::Release, KeyboardAction::DismissKeyboard),
            _ => {}
        }
    }
}

// ============================================================================
// Render
// ============================================================================

fn render(frame: &mut Frame, app: &App) {
    let [buffer_area, suggestions_area, status_area, report_area, help_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(FEEDBACK_LOG_LEN as u16 + 2),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let keyboard = app.handler.keyboard_context().borrow();
    let proxy = keyboard.proxy();
    let before = proxy.context_before_input().unwrap_or_default();
    let after = proxy.context_after_input().unwrap_or_default();
    let cursor = Style::default().fg(Color::Black).bg(Color::Yellow);
    let buffer = Paragraph::new(Line::from(vec![
        Span::raw(before),
        Span::styled("|", cursor),
        Span::raw(after),
    ]))
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .title(" Document ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(buffer, buffer_area);

    let autocomplete = app.handler.autocomplete_context().borrow();
    let mut suggestions = Vec::new();
    for (index, suggestion) in autocomplete.suggestions().iter().enumerate() {
        let style = if suggestion.is_autocorrect {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        suggestions.push(Span::styled(format!(" F{} {} ", index + 1, suggestion.title), style));
    }
    let suggestions = Paragraph::new(Line::from(suggestions))
        .block(Block::default().title(" Suggestions ").borders(Borders::ALL));
    frame.render_widget(suggestions, suggestions_area);

    let feedback_config = app.handler.feedback_configuration().borrow();
    let drag_state = match app.handler.space_drag().state() {
        SpaceDragState::Idle => "idle",
        SpaceDragState::Armed => "armed",
        SpaceDragState::Dragging => "dragging",
    };
    let emojis: String = app.emojis.borrow().iter().map(|e| e.value.as_str()).collect();
    let status = format!(
        "locale {}  type {:?}  drag {}  audio {}  haptic {}  emojis {}",
        keyboard.locale,
        keyboard.keyboard_type,
        drag_state,
        if feedback_config.is_audio_enabled() { "on" } else { "off" },
        if feedback_config.is_haptic_enabled() { "on" } else { "off" },
        emojis,
    );
    let status = Paragraph::new(status).block(Block::default().title(" Keyboard ").borders(Borders::ALL));
    frame.render_widget(status, status_area);

    let [report_area, feedback_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(report_area);
    let mut lines = vec![Line::styled(
        app.last_gesture.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    lines.extend(app.last_report.iter().map(|name| Line::raw(format!("  {name}"))));
    lines.extend(app.controller.calls.borrow().iter().rev().take(2).map(|call| {
        Line::styled(format!("  host: {call}"), Style::default().fg(Color::Magenta))
    }));
    let report = Paragraph::new(lines).block(Block::default().title(" Last gesture ").borders(Borders::ALL));
    frame.render_widget(report, report_area);

    let log: Vec<Line> = app
        .feedback
        .recent()
        .iter()
        .map(|feedback| Line::raw(format!("{feedback:?}")))
        .collect();
    let log = Paragraph::new(log)
        .block(Block::default().title(" Feedback ").borders(Borders::ALL));
    frame.render_widget(log, feedback_area);

    let help = Paragraph::new(
        "Tab: space drag (←/→, Esc)  F1-F3: suggestion  F5/F6: audio/haptic  ^L: locale  ^E: emoji  Esc: quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area);
}

// ============================================================================
// Main - Setup terminal, run event loop, cleanup
// ============================================================================

fn load_settings(args: &Args) -> io::Result<KeyboardSettings> {
    let mut settings = match &args.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            KeyboardSettings::from_json(&json).map_err(io::Error::other)?
        }
        None => KeyboardSettings::default(),
    };
    if let Some(locale) = &args.locale {
        if !settings.locales.contains(locale) {
            settings.locales.push(locale.clone());
        }
        settings.locale = locale.clone();
    }
    if args.no_audio {
        settings.feedback.set_audio_enabled(false);
    }
    if args.no_haptic {
        settings.feedback.set_haptic_enabled(false);
    }
    Ok(settings)
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args)?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(settings));

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    let mut should_render = true;

    loop {
        if should_render {
            terminal.draw(|frame| render(frame, &app))?;
            should_render = false;
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                app.handle_key(key);
                should_render = true;
            }
            Event::Resize(_, _) => should_render = true,
            _ => {}
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
