//! The terminal page.

use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use waveportal::{Action, Controller};

mod draw;
mod input;

pub(crate) use input::Command;

type PortalTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Page state that only the terminal cares about.
#[derive(Debug)]
pub(crate) struct App {
    pub(crate) controller: Controller,
    /// Index of the first visible wave card.
    pub(crate) scroll: usize,
}

impl App {
    pub(crate) fn new(controller: Controller) -> Self {
        Self { controller, scroll: 0 }
    }

    fn last_card(&self) -> usize {
        self.controller.state().waves.len().saturating_sub(1)
    }

    pub(crate) fn scroll_down(&mut self) {
        self.scroll = (self.scroll + 1).min(self.last_card());
    }

    pub(crate) fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub(crate) fn scroll_to_end(&mut self) {
        self.scroll = self.last_card();
    }
}

/// Runs the page until the user quits.
pub async fn run(controller: Controller) -> Result<()> {
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(controller);
    let mut events = EventStream::new();

    let mut tasks = FuturesUnordered::new();
    for action in
        [Action::DetectExistingConnection, Action::LoadAllWaves, Action::SubscribeToNewWaves]
    {
        tasks.push(app.controller.task(action));
    }

    loop {
        guard.terminal.draw(|f| draw::draw(&app, f))?;

        tokio::select! {
            Some(update) = tasks.next(), if !tasks.is_empty() => {
                app.controller.apply(update);
                app.scroll = app.scroll.min(app.last_card());
            }
            _ = app.controller.next_new_wave() => {}
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    match input::on_key(&mut app, key) {
                        Command::None => {}
                        Command::Quit => break,
                        Command::Run(action) => tasks.push(app.controller.task(action)),
                        Command::Reload => {
                            debug!("rebinding portal");
                            tasks.extend(app.controller.rebind_tasks());
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => break,
            },
        }
    }

    if !tasks.is_empty() {
        debug!(pending = tasks.len(), "leaving with operations in flight");
    }
    app.controller.unmount();
    Ok(())
}

/// Owns the terminal in raw mode on the alternate screen, restoring it when dropped.
struct TerminalGuard {
    terminal: PortalTerminal,
}

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        enable_raw_mode()?;
        execute!(terminal.backend_mut(), EnterAlternateScreen)?;
        terminal.hide_cursor()?;

        // Leave the alternate screen before the panic report is printed.
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore(&mut io::stdout());
            hook(info);
        }));

        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore(self.terminal.backend_mut());
        let _ = self.terminal.show_cursor();
    }
}

fn restore(out: &mut impl io::Write) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen)
}
