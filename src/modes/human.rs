use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};

use crate::game::{GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;
use crate::tick::TickSource;

/// Keyboard-driven game in the terminal
///
/// All engine calls happen on this loop, one event at a time, and the loop
/// owns the only copy of the state.
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(mut engine: GameEngine) -> Self {
        let state = engine.new_game();

        Self {
            engine,
            state,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut ticks = TickSource::new(self.engine.config().tick_interval());
        self.sync_tick_source(&mut ticks);

        self.draw(terminal)?;

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                _ = ticks.tick() => {
                    self.update_game();
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("quitting with score {}", self.state.score);
                break;
            }

            self.sync_tick_source(&mut ticks);
            self.draw(terminal)?;
        }

        Ok(())
    }

    /// Run the tick source exactly while the game is running
    fn sync_tick_source(&self, ticks: &mut TickSource) {
        match (self.state.is_game_over(), ticks.is_running()) {
            (true, true) => {
                debug!("stopping tick source");
                ticks.stop();
            }
            (false, false) => {
                debug!("starting tick source every {:?}", ticks.period());
                ticks.start();
            }
            _ => {}
        }
    }

    fn draw(&self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        terminal
            .draw(|frame| self.renderer.render(frame, &self.state))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            self.apply_action(self.input_handler.handle_key_event(key));
        }
    }

    fn apply_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn(direction) => {
                self.state = self.state.with_direction(direction);
            }
            // Restart is only offered once the game is over.
            KeyAction::Restart if self.state.is_game_over() => {
                self.state = self.engine.new_game();
            }
            KeyAction::Restart | KeyAction::None => {}
            KeyAction::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn update_game(&mut self) {
        let result = self.engine.tick(&self.state);
        if result.event.ended_game() {
            info!("game over ({:?}), final score {}", result.event, result.state.score);
        }
        self.state = result.state;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
