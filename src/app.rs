use color_eyre::Result;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::time::{Duration, Instant};

use crate::audio::AudioManager;
use crate::config::GameConfig;
use crate::game::{Command, Game, GameEvent, Phase};
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, Hud, RenderView};
use crate::timer::Scheduler;

/// Simulation runs in fixed steps regardless of the terminal's frame rate
pub const SIMULATION_STEP: f32 = 1.0 / 60.0;

/// Longest frame we try to catch up on; anything beyond is dropped
const MAX_FRAME_TIME: f32 = 0.25;

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    config: GameConfig,
    seed: Option<u64>,
    game: Game,
    scheduler: Scheduler,
    hud: Hud,
    /// Unsimulated wall-clock time carried between frames
    accumulator: f32,
    /// Frames info
    last_frame_time: Instant,
    fps: u32,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(
        config: GameConfig,
        seed: Option<u64>,
        audio_manager: AudioManager,
        reports_key_release: bool,
    ) -> Self {
        let input_manager =
            InputManager::new(config.controls, config.keyboard_tilt, reports_key_release);

        Self {
            running: true,
            game: Game::new(config.clone(), seed),
            scheduler: Scheduler::new(&config),
            hud: Hud::default(),
            accumulator: 0.0,
            last_frame_time: Instant::now(),
            fps: 0,
            input_manager,
            renderer: GameRenderer::new(),
            audio_manager,
            config,
            seed,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        while self.running {
            // Calculate FPS
            let now = Instant::now();
            let frame_time = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if frame_time.as_micros() > 0 {
                self.fps = (1_000_000 / frame_time.as_micros()) as u32;
            }

            terminal.draw(|frame| {
                let view = RenderView {
                    game: &self.game,
                    hud: &self.hud,
                    area: frame.area(),
                    fps: self.fps,
                };
                self.renderer.render(frame, &view);
            })?;

            // Poll input events and get actions
            self.input_manager.poll_events(self.game.phase())?;
            let actions = self.input_manager.get_actions();
            self.process_actions(&actions);

            self.advance(frame_time.as_secs_f32());
            self.dispatch_events();

            // Small sleep to maintain ~60 FPS and prevent CPU spinning
            std::thread::sleep(Duration::from_millis(8));
        }
        Ok(())
    }

    /// Process input actions and update game state accordingly
    fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match action {
                InputAction::Quit => {
                    log::info!("quit with score {}", self.game.score());
                    self.running = false;
                }
                InputAction::Pause | InputAction::Resume => self.game.toggle_pause(),
                InputAction::Restart => self.restart(),
                InputAction::Fire => self.game.push_command(Command::Fire),
            }
        }
    }

    fn restart(&mut self) {
        log::info!("restart after score {}", self.game.score());
        self.game = Game::new(self.config.clone(), self.seed);
        self.scheduler = Scheduler::new(&self.config);
        self.hud = Hud::default();
        self.accumulator = 0.0;
    }

    /// Runs as many fixed simulation steps as the elapsed time covers.
    fn advance(&mut self, frame_secs: f32) {
        if self.game.phase() == Phase::Paused {
            return;
        }
        self.accumulator += frame_secs.min(MAX_FRAME_TIME);
        while self.accumulator >= SIMULATION_STEP {
            self.accumulator -= SIMULATION_STEP;
            self.scheduler
                .advance(SIMULATION_STEP, self.input_manager.tilt(), &mut self.game);
            self.game.step(SIMULATION_STEP);
        }
    }

    /// Hands game events to the HUD and the audio system.
    fn dispatch_events(&mut self) {
        for event in self.game.drain_events() {
            self.hud.apply(&event);
            if let GameEvent::Sound(effect) = event {
                self.audio_manager.play(effect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(GameConfig::default(), Some(4), AudioManager::silent(), true)
    }

    #[test]
    fn test_advance_runs_fixed_steps() {
        let mut app = app();
        // Two spawn intervals worth of frames
        for _ in 0..60 {
            app.advance(1.0 / 60.0);
        }
        app.advance(0.001);
        assert!(!app.game.enemies().is_empty());
        assert!(app.accumulator < SIMULATION_STEP);
    }

    #[test]
    fn test_paused_app_does_not_advance() {
        let mut app = app();
        app.process_actions(&[InputAction::Pause]);
        app.advance(0.2);
        app.advance(0.2);
        app.advance(0.2);
        assert!(app.game.enemies().is_empty());
        assert_eq!(app.accumulator, 0.0);
    }

    #[test]
    fn test_fire_action_reaches_game() {
        let mut app = app();
        app.process_actions(&[InputAction::Fire]);
        app.advance(SIMULATION_STEP);
        assert_eq!(app.game.projectiles().len(), 1);
    }

    #[test]
    fn test_restart_resets_game_and_hud() {
        let mut app = app();
        app.hud.apply(&GameEvent::ScoreChanged(20));
        app.process_actions(&[InputAction::Fire]);
        app.advance(0.1);
        app.process_actions(&[InputAction::Restart]);
        assert!(app.game.projectiles().is_empty());
        assert_eq!(app.hud.score_label, "Score: 0");
    }

    #[test]
    fn test_quit_stops_running() {
        let mut app = app();
        app.process_actions(&[InputAction::Quit]);
        assert!(!app.running);
    }
}
