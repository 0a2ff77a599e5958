//! App glue: terminal lifecycle, input handling, and drawing the model.

use std::{io, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use netpulse::model::ModelHandle;
use netpulse::session::{SessionError, SessionHandle, StreamSession};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::task::JoinHandle;
use tokio::time::sleep;

pub struct App {
    model: ModelHandle,
    handle: SessionHandle,
    should_quit: bool,
}

impl App {
    pub fn new(session: &StreamSession) -> Self {
        Self {
            model: session.model(),
            handle: session.handle(),
            should_quit: false,
        }
    }

    pub async fn run(mut self, session: StreamSession) -> anyhow::Result<()> {
        // The session pumps frames on its own task; the UI only reads the model.
        let session_task = tokio::spawn(session.run());

        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal, &session_task).await;

        // Teardown
        disable_raw_mode()?;
        let backend = terminal.backend_mut();
        execute!(backend, LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        self.handle.stop();
        let session_result = session_task.await;
        res?;
        match session_result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(join) => Err(join.into()),
        }
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        session_task: &JoinHandle<Result<(), SessionError>>,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    if matches!(
                        k.code,
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
                    ) {
                        self.should_quit = true;
                    }
                }
            }
            // A finished session task is a transport failure; surface it
            // after terminal teardown instead of redrawing forever.
            if self.should_quit || session_task.is_finished() {
                break;
            }

            let model = self.model.get();
            terminal.draw(|f| crate::ui::draw(f, &model))?;

            sleep(Duration::from_millis(250)).await;
        }
        Ok(())
    }
}
