use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use std::time::{Duration, Instant};

use crate::entities::ControlScheme;
use crate::game::Phase;
use crate::timer::TiltSensor;

/// Without key-release reporting, a direction counts as held this long after
/// its last press/repeat event.
const HOLD_TIMEOUT: Duration = Duration::from_millis(500);

/// Represents semantic game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Fire,
    Pause,
    Resume,
    Restart,
    Quit,
}

/// Stands in for an accelerometer: holding left or right reports a fixed
/// tilt reading on the x axis.
#[derive(Debug, Clone)]
pub struct KeyboardTilt {
    strength: f32,
    left: Option<Instant>,
    right: Option<Instant>,
    reports_release: bool,
}

impl KeyboardTilt {
    pub fn new(strength: f32, reports_release: bool) -> Self {
        Self {
            strength,
            left: None,
            right: None,
            reports_release,
        }
    }

    pub fn press_left(&mut self, now: Instant) {
        self.left = Some(now);
        self.right = None;
    }

    pub fn press_right(&mut self, now: Instant) {
        self.right = Some(now);
        self.left = None;
    }

    pub fn release_left(&mut self) {
        self.left = None;
    }

    pub fn release_right(&mut self) {
        self.right = None;
    }

    fn is_held(&self, pressed_at: Option<Instant>, now: Instant) -> bool {
        pressed_at.is_some_and(|t| {
            self.reports_release || now.saturating_duration_since(t) <= HOLD_TIMEOUT
        })
    }

    /// The reading the sensor reports at `now`.
    pub fn reading_at(&self, now: Instant) -> f32 {
        let left = self.is_held(self.left, now);
        let right = self.is_held(self.right, now);
        match (left, right) {
            (true, false) => -self.strength,
            (false, true) => self.strength,
            _ => 0.0,
        }
    }
}

impl TiltSensor for KeyboardTilt {
    fn sample_x(&self) -> f32 {
        self.reading_at(Instant::now())
    }
}

/// Manages input polling and translates raw terminal events into game actions
pub struct InputManager {
    controls: ControlScheme,
    tilt: KeyboardTilt,
    oneshot_actions: Vec<InputAction>,
}

impl InputManager {
    pub fn new(controls: ControlScheme, tilt_strength: f32, reports_release: bool) -> Self {
        Self {
            controls,
            tilt: KeyboardTilt::new(tilt_strength, reports_release),
            oneshot_actions: Vec::new(),
        }
    }

    /// Polls for all input events and stores one-shot actions
    /// Should be called once per frame before getting actions
    pub fn poll_events(&mut self, phase: Phase) -> color_eyre::Result<()> {
        // Clear previous one-shot actions
        self.oneshot_actions.clear();

        // Poll for all available events without blocking
        while event::poll(Duration::from_millis(0))? {
            let event = event::read()?;
            self.handle_event(event, phase, Instant::now());
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event, phase: Phase, now: Instant) {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event, phase, now),
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event, phase),
            _ => {}
        }
    }

    /// Lifting a mouse button is the terminal's closest thing to a touch ending
    fn handle_mouse_event(&mut self, mouse_event: MouseEvent, phase: Phase) {
        if phase == Phase::Playing && matches!(mouse_event.kind, MouseEventKind::Up(_)) {
            self.oneshot_actions.push(InputAction::Fire);
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent, phase: Phase, now: Instant) {
        match key_event.kind {
            KeyEventKind::Press => self.handle_key_press(key_event, phase, now),
            KeyEventKind::Repeat => self.handle_tilt_key(key_event.code, now),
            KeyEventKind::Release => self.handle_key_release(key_event.code),
        }
    }

    fn handle_key_press(&mut self, key_event: KeyEvent, phase: Phase, now: Instant) {
        // Check for quit keys first (works in any state)
        if matches!(
            key_event.code,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
        ) || (key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        match key_event.code {
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.oneshot_actions.push(match phase {
                    Phase::Playing => InputAction::Pause,
                    Phase::Paused => InputAction::Resume,
                });
                return;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.oneshot_actions.push(InputAction::Restart);
                return;
            }
            _ => {}
        }

        if phase != Phase::Playing {
            return;
        }

        match key_event.code {
            KeyCode::Char(' ') | KeyCode::Enter => self.oneshot_actions.push(InputAction::Fire),
            code => self.handle_tilt_key(code, now),
        }
    }

    fn handle_tilt_key(&mut self, code: KeyCode, now: Instant) {
        if self.controls != ControlScheme::Tilt {
            return;
        }
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => self.tilt.press_left(now),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => self.tilt.press_right(now),
            _ => {}
        }
    }

    fn handle_key_release(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => self.tilt.release_left(),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => self.tilt.release_right(),
            _ => {}
        }
    }

    /// Returns this frame's one-shot actions. Must be called after poll_events()
    pub fn get_actions(&self) -> Vec<InputAction> {
        self.oneshot_actions.clone()
    }

    /// Sensor the scheduler polls for tilt readings
    pub fn tilt(&self) -> &KeyboardTilt {
        &self.tilt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 10,
            row: 10,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_space_fires_while_playing() {
        let mut input = InputManager::new(ControlScheme::Touch, 0.2, true);
        let now = Instant::now();
        input.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press), Phase::Playing, now);
        assert_eq!(input.get_actions(), vec![InputAction::Fire]);
    }

    #[test]
    fn test_no_fire_while_paused() {
        let mut input = InputManager::new(ControlScheme::Touch, 0.2, true);
        let now = Instant::now();
        input.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press), Phase::Paused, now);
        input.handle_event(mouse(MouseEventKind::Up(MouseButton::Left)), Phase::Paused, now);
        assert!(input.get_actions().is_empty());
    }

    #[test]
    fn test_mouse_release_fires() {
        let mut input = InputManager::new(ControlScheme::Touch, 0.2, true);
        let now = Instant::now();
        input.handle_event(mouse(MouseEventKind::Down(MouseButton::Left)), Phase::Playing, now);
        assert!(input.get_actions().is_empty());
        input.handle_event(mouse(MouseEventKind::Up(MouseButton::Left)), Phase::Playing, now);
        assert_eq!(input.get_actions(), vec![InputAction::Fire]);
    }

    #[test]
    fn test_pause_toggles_by_phase() {
        let mut input = InputManager::new(ControlScheme::Touch, 0.2, true);
        let now = Instant::now();
        input.handle_event(key(KeyCode::Char('p'), KeyEventKind::Press), Phase::Playing, now);
        input.handle_event(key(KeyCode::Char('p'), KeyEventKind::Press), Phase::Paused, now);
        assert_eq!(input.get_actions(), vec![InputAction::Pause, InputAction::Resume]);
    }

    #[test]
    fn test_quit_keys() {
        let mut input = InputManager::new(ControlScheme::Touch, 0.2, true);
        let now = Instant::now();
        input.handle_event(key(KeyCode::Esc, KeyEventKind::Press), Phase::Paused, now);
        input.handle_event(
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Phase::Playing,
            now,
        );
        assert_eq!(input.get_actions(), vec![InputAction::Quit, InputAction::Quit]);
    }

    #[test]
    fn test_tilt_keys_ignored_for_touch_controls() {
        let mut input = InputManager::new(ControlScheme::Touch, 0.2, true);
        let now = Instant::now();
        input.handle_event(key(KeyCode::Left, KeyEventKind::Press), Phase::Playing, now);
        assert_eq!(input.tilt().reading_at(now), 0.0);
    }

    #[test]
    fn test_tilt_reading_follows_held_key() {
        let mut input = InputManager::new(ControlScheme::Tilt, 0.2, true);
        let now = Instant::now();
        input.handle_event(key(KeyCode::Left, KeyEventKind::Press), Phase::Playing, now);
        assert_eq!(input.tilt().reading_at(now), -0.2);

        input.handle_event(key(KeyCode::Char('d'), KeyEventKind::Press), Phase::Playing, now);
        assert_eq!(input.tilt().reading_at(now), 0.2);

        input.handle_event(key(KeyCode::Char('d'), KeyEventKind::Release), Phase::Playing, now);
        assert_eq!(input.tilt().reading_at(now), 0.0);
    }

    #[test]
    fn test_tilt_expires_without_release_events() {
        let mut tilt = KeyboardTilt::new(0.2, false);
        let now = Instant::now();
        tilt.press_right(now);
        assert_eq!(tilt.reading_at(now + Duration::from_millis(100)), 0.2);
        assert_eq!(tilt.reading_at(now + Duration::from_secs(2)), 0.0);
    }
}
