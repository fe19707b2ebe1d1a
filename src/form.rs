//! Interactive terminal form.
//!
//! [`FormState`] holds the editable fields and turns key presses into
//! [`FormAction`]s. [`FormController`] owns the worker session and applies
//! those actions. [`run_form`] draws the form with crossterm and pumps
//! terminal events until the user quits.

use crate::clicker::CancelToken;
use crate::config::{ClickConfig, MouseButton};
use crate::error::Result;
use crate::input::MouseInjector;
use crate::session::ClickSession;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Write};
use std::time::Duration;
use tracing::debug;

pub const STATUS_READY: &str = "Ready";
pub const STATUS_RUNNING: &str = "Running...";
pub const STATUS_STOPPED: &str = "Stopped";
pub const STATUS_ALREADY_RUNNING: &str = "Already running";
pub const STATUS_BAD_NUMBER: &str = "Please enter valid numbers";

const TICK: Duration = Duration::from_millis(100);

/// Focusable form elements, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Count,
    Interval,
    Button,
    Start,
    Stop,
}

impl Field {
    const ORDER: [Field; 5] = [
        Field::Count,
        Field::Interval,
        Field::Button,
        Field::Start,
        Field::Stop,
    ];

    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.index() + len - 1) % len]
    }
}

/// What a key press asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Start,
    Stop,
    Quit,
}

#[derive(Debug, Clone)]
pub struct FormState {
    count: String,
    interval: String,
    button: MouseButton,
    focus: Field,
    status: String,
}

impl FormState {
    /// Seed the fields from `defaults`. The start delay is not editable.
    pub fn new(defaults: &ClickConfig) -> Self {
        Self {
            count: defaults.count.to_string(),
            interval: defaults.interval_ms.to_string(),
            button: defaults.button,
            focus: Field::Count,
            status: STATUS_READY.to_string(),
        }
    }

    pub fn count(&self) -> &str {
        &self.count
    }

    pub fn interval(&self) -> &str {
        &self.interval
    }

    pub fn button(&self) -> MouseButton {
        self.button
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => FormAction::Quit,
                _ => FormAction::None,
            };
        }

        match key.code {
            KeyCode::Esc => FormAction::Quit,
            KeyCode::F(5) => FormAction::Start,
            KeyCode::F(6) => FormAction::Stop,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                FormAction::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.previous();
                FormAction::None
            }
            KeyCode::Enter => match self.focus {
                Field::Stop => FormAction::Stop,
                Field::Button => {
                    self.button = self.button.toggled();
                    FormAction::None
                }
                _ => FormAction::Start,
            },
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if self.focus == Field::Button => {
                self.button = self.button.toggled();
                FormAction::None
            }
            KeyCode::Backspace => {
                if let Some(text) = self.focused_text() {
                    text.pop();
                }
                FormAction::None
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.focused_text() {
                    text.push(c);
                }
                FormAction::None
            }
            _ => FormAction::None,
        }
    }

    /// Parse the fields into a validated config, or the status line to show.
    pub fn build_config(&self) -> std::result::Result<ClickConfig, String> {
        let (Ok(interval_ms), Ok(count)) = (
            self.interval.trim().parse::<i64>(),
            self.count.trim().parse::<i64>(),
        ) else {
            return Err(STATUS_BAD_NUMBER.to_string());
        };

        let config = ClickConfig {
            interval_ms,
            count,
            button: self.button,
            delay_secs: 0.0,
        };
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Count => Some(&mut self.count),
            Field::Interval => Some(&mut self.interval),
            _ => None,
        }
    }
}

/// Owns the form state and at most one click worker.
pub struct FormController<I> {
    state: FormState,
    session: Option<ClickSession>,
    cancel: CancelToken,
    injector: I,
}

impl<I> FormController<I>
where
    I: MouseInjector + Clone + Send + 'static,
{
    pub fn new(defaults: &ClickConfig, injector: I) -> Self {
        Self {
            state: FormState::new(defaults),
            session: None,
            cancel: CancelToken::new(),
            injector,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Start a worker from the current fields.
    ///
    /// Does nothing but report it when a worker is still active. Bad input
    /// only updates the status line.
    pub fn start(&mut self) -> Result<()> {
        self.poll()?;
        if self.session.is_some() {
            self.state.set_status(STATUS_ALREADY_RUNNING);
            return Ok(());
        }

        let config = match self.state.build_config() {
            Ok(config) => config,
            Err(message) => {
                self.state.set_status(message);
                return Ok(());
            }
        };

        self.cancel.reset();
        let session = ClickSession::spawn(config, self.injector.clone(), self.cancel.clone())?;
        self.session = Some(session);
        self.state.set_status(STATUS_RUNNING);
        Ok(())
    }

    /// Signal the worker to stop. The session is cleared once it has exited.
    pub fn stop(&mut self) {
        if let Some(session) = &self.session {
            session.stop();
        }
        self.state.set_status(STATUS_STOPPED);
    }

    /// Reap a worker that has exited. Errors from the loop are fatal.
    pub fn poll(&mut self) -> Result<()> {
        let finished = self
            .session
            .as_ref()
            .is_some_and(ClickSession::is_finished);
        if !finished {
            return Ok(());
        }

        if let Some(session) = self.session.take() {
            let summary = session.join()?;
            debug!(clicks = summary.clicks, cancelled = summary.cancelled, "click worker exited");
            if !summary.cancelled {
                self.state
                    .set_status(format!("Finished ({} clicks)", summary.clicks));
            }
        }
        Ok(())
    }

    /// Apply a key press. Returns `false` when the form should close.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match self.state.handle_key(key) {
            FormAction::None => {}
            FormAction::Start => self.start()?,
            FormAction::Stop => self.stop(),
            FormAction::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Stop any worker and wait for it to exit.
    pub fn shutdown(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            session.stop();
            session.join()?;
        }
        Ok(())
    }
}

/// Restores the terminal when dropped.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(out: &mut impl Write) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = execute!(out, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Show the form until the user quits.
pub fn run_form<I>(defaults: &ClickConfig, injector: I) -> Result<()>
where
    I: MouseInjector + Clone + Send + 'static,
{
    let mut controller = FormController::new(defaults, injector);
    let mut out = io::stdout();
    let _guard = TerminalGuard::enter(&mut out)?;

    let result = event_loop(&mut controller, &mut out);
    let shutdown = controller.shutdown();
    result.and(shutdown)
}

fn event_loop<I>(controller: &mut FormController<I>, out: &mut impl Write) -> Result<()>
where
    I: MouseInjector + Clone + Send + 'static,
{
    loop {
        controller.poll()?;
        draw(out, controller.state(), controller.is_running())?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            // Windows also reports key releases.
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !controller.handle_key(key)? {
                return Ok(());
            }
        }
    }
}

fn draw(out: &mut impl Write, state: &FormState, running: bool) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(2, 1), Print("Autoclicker"))?;

    let rows = [
        (Field::Count, "Clicks (0 = unlimited)", format!("[{:<10}]", state.count())),
        (Field::Interval, "Interval (ms)", format!("[{:<10}]", state.interval())),
        (Field::Button, "Button", format!("< {:<5} >", state.button())),
    ];
    for (row, (field, label, value)) in (3u16..).zip(rows) {
        queue!(out, MoveTo(2, row), Print(label), MoveTo(28, row))?;
        draw_focusable(out, state.focus() == field, &value)?;
    }

    queue!(out, MoveTo(4, 7))?;
    draw_focusable(out, state.focus() == Field::Start, "[ Start ]")?;
    queue!(out, MoveTo(16, 7))?;
    draw_focusable(out, state.focus() == Field::Stop, "[ Stop ]")?;

    let marker = if running { "*" } else { " " };
    queue!(
        out,
        MoveTo(2, 9),
        Print(format!("{} {}", marker, state.status())),
        MoveTo(2, 11),
        Print("Tab/Up/Down move  Enter activate  F5 start  F6 stop  Esc quit"),
    )?;
    out.flush()
}

fn draw_focusable(out: &mut impl Write, focused: bool, text: &str) -> io::Result<()> {
    if focused {
        queue!(
            out,
            SetAttribute(Attribute::Reverse),
            Print(text),
            SetAttribute(Attribute::Reset)
        )
    } else {
        queue!(out, Print(text))
    }
}
