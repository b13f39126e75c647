mod app;
mod editor;
mod event;
mod view;

use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self as ct_event, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use log::{info, warn};
use ratatui::prelude::*;
use tokio::runtime::Handle;

use crate::api::TaskClient;
use crate::dispatch::{self, Dispatcher, Response};
use crate::form::local_today;
use app::{App, Screen};
use event::KeyAction;

pub fn run(handle: Handle, client: TaskClient, poll_interval: u64) -> Result<()> {
    info!("starting TUI against {}", client.base_url());
    let (mut dispatcher, rx) = Dispatcher::new(handle, client);
    let mut app = App::new(local_today, &mut dispatcher);

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &mut dispatcher, &rx, poll_interval);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dispatcher: &mut Dispatcher,
    rx: &Receiver<Response>,
    poll_interval: u64,
) -> Result<()> {
    let poll_duration = Duration::from_millis(poll_interval);

    loop {
        terminal.draw(|frame| view::render(frame, app))?;

        if ct_event::poll(poll_duration)? {
            if let Event::Key(key) = ct_event::read()? {
                if key.kind == KeyEventKind::Press {
                    match event::handle_key(app, key) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Navigate(route) => app.navigate(route, dispatcher),
                        KeyAction::Reload => app.reload(dispatcher),
                        KeyAction::Submit => app.submit(dispatcher),
                        KeyAction::OpenEditor => {
                            if let Screen::Create(screen) = &mut app.screen {
                                match editor::open_editor(terminal, &screen.form.description) {
                                    Ok(content) => {
                                        screen.set_description(content.trim_end().to_string());
                                    }
                                    Err(e) => {
                                        warn!("editor failed: {e:#}");
                                        screen.error = Some(e.to_string());
                                    }
                                }
                            }
                        }
                        KeyAction::Continue => {}
                    }
                }
            }
        }

        // Results from the runtime (non-blocking)
        while let Some(response) = dispatch::try_next(rx) {
            app.handle_response(response, dispatcher);
        }
    }
}
