use color_eyre::eyre::Result;
use ratatui::{
    layout::{Constraint, Layout, Margin},
    prelude::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
    Frame,
};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
    action::{act, Action, Command},
    components::help::Help,
    config::{binding_key, Config},
    constants::{SURFACE_HEIGHT, SURFACE_WIDTH},
    scenes::{play::PlayScene, Scene},
    tui,
};

pub struct App {
    config: Config,
    tick_rate: f64,
    frame_rate: f64,
    should_quit: bool,
    should_suspend: bool,
    show_help: bool,
    scene: Box<dyn Scene>,
}

impl App {
    pub fn new(tick_rate: f64, frame_rate: f64) -> Result<Self> {
        let config = Config::new()?;

        Ok(Self {
            tick_rate,
            frame_rate,
            should_quit: false,
            should_suspend: false,
            show_help: false,
            config,
            scene: Box::new(PlayScene::new()),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = tui::Tui::new()?;
        tui.tick_rate(self.tick_rate);
        tui.frame_rate(self.frame_rate);
        tui.enter()?;

        self.scene.register_keymap(&self.config.keybindings.scenes)?;
        self.scene.register_action_handler(action_tx.clone())?;
        self.scene.register_config_handler(self.config.clone())?;
        self.scene.init()?;

        loop {
            if let Some(e) = tui.next().await {
                let mut handled = false;
                match e {
                    tui::Event::Quit => action_tx.send(act!(Command::Quit))?,
                    tui::Event::Tick => action_tx.send(act!(Command::Tick))?,
                    tui::Event::Render => action_tx.send(act!(Command::Render))?,
                    tui::Event::Resize(x, y) => action_tx.send(act!(Command::Resize(x, y)))?,
                    tui::Event::Key(key) => {
                        // Global bindings win over the scene's own.
                        if let Some(action) = self.config.keybindings.global.get(&binding_key(key)) {
                            log::info!("Got action: {action:?}");
                            action_tx.send(action.clone())?;
                            handled = true;
                        }
                    },
                    _ => {},
                }
                if !handled {
                    if let Some(action) = self.scene.handle_events(Some(e))? {
                        action_tx.send(action)?;
                    }
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                let Action { command, .. } = &action;
                if *command != Command::Tick && *command != Command::Render {
                    log::debug!("{command:?}");
                }
                match command {
                    Command::Quit => self.should_quit = true,
                    Command::Suspend => self.should_suspend = true,
                    Command::Resume => self.should_suspend = false,
                    Command::ToggleShowHelp => self.show_help = !self.show_help,
                    Command::ClearScreen => tui.clear()?,
                    Command::Error(message) => log::error!("{message}"),
                    Command::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, *w, *h))?;
                        self.render(&mut tui, &action_tx)?;
                    },
                    Command::Render => {
                        self.render(&mut tui, &action_tx)?;
                    },
                    _ => {},
                }
                // The game is paused while help is open.
                if !self.show_help {
                    if let Some(action) = self.scene.update(action)? {
                        action_tx.send(action)?
                    }
                }
            }
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(act!(Command::Resume))?;
                tui.resume()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    fn render(&mut self, tui: &mut tui::Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
        tui.draw(|f| {
            let (frame, status) = layout(f.area());

            let border = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(Color::Black));
            f.render_widget(border, frame);

            let surface = frame.inner(Margin { horizontal: 1, vertical: 1 });
            if let Err(e) = self.scene.draw(f, surface) {
                let _ = action_tx.send(act!(Command::Error(format!("Failed to draw: {:?}", e))));
            }
            if let Err(e) = self.scene.draw_status(f, status) {
                let _ = action_tx.send(act!(Command::Error(format!("Failed to draw status: {:?}", e))));
            }

            if self.show_help {
                self.draw_help(f, surface);
            };
        })?;

        Ok(())
    }

    fn draw_help(&self, f: &mut Frame<'_>, rect: Rect) {
        let scene_id = self.scene.id();
        let mut groups = vec![("System".to_string(), self.config.keybindings.global.clone())];
        if let Some(bindings) = self.config.keybindings.scenes.get(&scene_id) {
            groups.push((scene_id.to_string(), bindings.clone()));
        }

        f.render_widget(Help::new(groups), rect);
    }
}

/// Bordered play surface centered in `area`, and the status row right under it.
fn layout(area: Rect) -> (Rect, Rect) {
    let [_, frame, status, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(SURFACE_HEIGHT + 2),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    let horizontal = Layout::horizontal([Constraint::Fill(1), Constraint::Length(SURFACE_WIDTH + 2), Constraint::Fill(1)]);
    let [_, frame, _] = horizontal.areas(frame);
    let [_, status, _] = horizontal.areas(status);
    (frame, status)
}
