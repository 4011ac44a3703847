//! Pumps published views, user input, and rendering for the CLI client.
use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::{
    sync::watch,
    time::{self, Duration},
};

use battle::{BattleHandle, BattleView};
use client_frontend_core::{ViewConsumer, view_model::ArenaViewModel};

use crate::config::UiConfig;
use crate::input::{InputHandler, KeyAction};
use crate::presentation::{
    terminal::Tui,
    ui::{self, RenderContext},
};

const FRAME_INTERVAL_MS: u64 = 16;

pub struct EventLoop<C>
where
    C: ViewConsumer,
{
    handle: BattleHandle,
    views: watch::Receiver<BattleView>,
    input: InputHandler,
    consumer: C,
    ui: UiConfig,
}

impl<C> EventLoop<C>
where
    C: ViewConsumer,
{
    pub fn new(handle: BattleHandle, consumer: C, ui: UiConfig) -> Self {
        let views = handle.watch();
        Self {
            handle,
            views,
            input: InputHandler::new(),
            consumer,
            ui,
        }
    }

    /// Run until the operator quits or the controller stops publishing.
    pub async fn run(mut self, terminal: &mut Tui) -> Result<C> {
        let initial = self.views.borrow_and_update().clone();
        self.consumer.on_view(&initial);
        self.render(terminal, &initial)?;

        loop {
            tokio::select! {
                changed = self.views.changed() => {
                    if changed.is_err() {
                        tracing::warn!("Battle controller stopped publishing views");
                        break;
                    }
                    let view = self.views.borrow_and_update().clone();
                    if self.consumer.on_view(&view).requires_redraw {
                        self.render(terminal, &view)?;
                    }
                }
                _ = time::sleep(Duration::from_millis(FRAME_INTERVAL_MS)) => {
                    if self.handle_input_tick(terminal)? {
                        break;
                    }
                }
            }
        }

        Ok(self.consumer)
    }

    fn handle_input_tick(&mut self, terminal: &mut Tui) -> Result<bool> {
        if !event::poll(Duration::from_millis(0))? {
            return Ok(false);
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.handle_key_press(key, terminal)
            }
            Event::Resize(_, _) => {
                let view = self.views.borrow().clone();
                self.render(terminal, &view)?;
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn handle_key_press(&mut self, key: KeyEvent, terminal: &mut Tui) -> Result<bool> {
        match self.input.handle_key(key) {
            KeyAction::Quit => {
                self.consumer.message_log_mut().info("Leaving the arena...");
                let view = self.views.borrow().clone();
                self.render(terminal, &view)?;
                Ok(true)
            }
            KeyAction::Attack => {
                if !self.views.borrow().can_attack() {
                    tracing::debug!("Attack key ignored; no connection or attack in flight");
                    return Ok(false);
                }
                if let Err(err) = self.handle.request_attack() {
                    tracing::error!("Attack request failed: {}", err);
                    return Ok(true);
                }
                Ok(false)
            }
            KeyAction::None => Ok(false),
        }
    }

    fn render(&mut self, terminal: &mut Tui, view: &BattleView) -> Result<()> {
        let view_model = ArenaViewModel::from_view(view);
        let ctx = RenderContext {
            view_model: &view_model,
            messages: self.consumer.message_log(),
            message_panel_height: self.ui.message_panel_height,
        };
        ui::render(terminal, &ctx)
    }
}
