use glam::Vec2;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::entities::{ControlScheme, EnemyVariant};
use crate::game::{Game, GameEvent, Phase};

/// Spark travel distance for explosions, in world units
const EXPLOSION_RADIUS: f32 = 60.0;

/// Text overlay state, fed by game events rather than read from the game.
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score_label: String,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            score_label: "Score: 0".to_string(),
        }
    }
}

impl Hud {
    pub fn apply(&mut self, event: &GameEvent) {
        if let GameEvent::ScoreChanged(score) = event {
            self.score_label = format!("Score: {}", score);
        }
    }
}

/// Maps world coordinates (origin bottom-left, y up) onto terminal cells.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub area: Rect,
    pub world: Vec2,
}

impl Viewport {
    /// Cell containing `pos`, or None if it is off screen.
    pub fn to_cell(&self, pos: Vec2) -> Option<(u16, u16)> {
        if self.area.width == 0
            || self.area.height == 0
            || self.world.x <= 0.0
            || self.world.y <= 0.0
        {
            return None;
        }
        let nx = pos.x / self.world.x;
        let ny = 1.0 - pos.y / self.world.y;
        if !(0.0..1.0).contains(&nx) || !(0.0..1.0).contains(&ny) {
            return None;
        }
        Some((
            self.area.x + (nx * self.area.width as f32) as u16,
            self.area.y + (ny * self.area.height as f32) as u16,
        ))
    }

    /// Like [`Viewport::to_cell`] but without clipping, for sprites that
    /// straddle an edge.
    fn to_cell_unclipped(&self, pos: Vec2) -> (i32, i32) {
        let nx = pos.x / self.world.x;
        let ny = 1.0 - pos.y / self.world.y;
        (
            self.area.x as i32 + (nx * self.area.width as f32).floor() as i32,
            self.area.y as i32 + (ny * self.area.height as f32).floor() as i32,
        )
    }
}

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game: &'a Game,
    pub hud: &'a Hud,
    pub area: Rect,
    pub fps: u32,
}

/// Handles all rendering responsibilities for the game
#[derive(Default)]
pub struct GameRenderer;

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);
        if view.game.phase() == Phase::Paused {
            self.render_paused(frame, view);
        }
    }

    /// Renders the active gameplay screen
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let game = view.game;
        let config = game.config();

        // Leave the top row for the HUD and the bottom row for the hint
        let game_area = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        };
        let viewport = Viewport {
            area: game_area,
            world: Vec2::new(config.screen_width, config.screen_height),
        };

        let buffer = frame.buffer_mut();

        for star in game.starfield().stars() {
            if let Some((x, y)) = viewport.to_cell(star.position) {
                let style = Style::default().fg(Color::DarkGray);
                buffer.set_string(x, y, star.char.to_string(), style);
            }
        }

        for enemy in game.enemies() {
            let color = match enemy.variant {
                EnemyVariant::Alien => Color::Red,
                EnemyVariant::Alien2 => Color::Magenta,
                EnemyVariant::Alien3 => Color::Yellow,
            };
            draw_sprite(
                buffer,
                &viewport,
                enemy.position,
                &enemy.variant.get_sprite_lines(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }

        for projectile in game.projectiles() {
            if let Some((x, y)) = viewport.to_cell(projectile.position) {
                buffer.set_string(
                    x,
                    y,
                    projectile.get_sprite().to_string(),
                    Style::default().fg(Color::Yellow),
                );
            }
        }

        for explosion in game.explosions() {
            // Fade from red to yellow as the blast ages
            let color = if explosion.progress() < 0.3 {
                Color::Red
            } else if explosion.progress() < 0.6 {
                Color::LightRed
            } else {
                Color::Yellow
            };
            let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            for spark in explosion.spark_positions(EXPLOSION_RADIUS) {
                if let Some((x, y)) = viewport.to_cell(spark) {
                    buffer.set_string(x, y, "*", style);
                }
            }
            if explosion.progress() < 0.5
                && let Some((x, y)) = viewport.to_cell(explosion.position)
            {
                buffer.set_string(x, y, "o", style);
            }
        }

        let player = game.player();
        draw_sprite(
            buffer,
            &viewport,
            player.position,
            &player.get_sprite_lines(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        );

        // Stats overlay at the top
        let stats = Line::from(vec![
            Span::styled(
                view.hud.score_label.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Enemies: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", game.enemies().len()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  FPS: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", view.fps),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let stats_area = Rect {
            x: area.x + 1,
            y: area.y,
            width: area.width.saturating_sub(2),
            height: 1.min(area.height),
        };
        frame.render_widget(Paragraph::new(stats), stats_area);

        // Controls hint at bottom
        let hint = match config.controls {
            ControlScheme::Touch => "[Space/Click: Fire] [P: Pause] [R: Restart] [Q: Quit]",
            ControlScheme::Tilt => {
                "[A/D/Arrows: Tilt] [Space/Click: Fire] [P: Pause] [R: Restart] [Q: Quit]"
            }
        };
        let controls = Line::from(vec![Span::styled(hint, Style::default().fg(Color::DarkGray))]);

        let controls_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1.min(area.height),
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    /// Renders the pause overlay on top of the game
    fn render_paused(&self, frame: &mut Frame, view: &RenderView) {
        let area = view.area;
        let pause_text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];

        let width = 30.min(area.width);
        let height = 6.min(area.height);
        let pause_area = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(
            Paragraph::new(pause_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            pause_area,
        );
    }
}

/// Draws a multi-line sprite centered on `center`, clipping whatever falls
/// outside the viewport.
fn draw_sprite(
    buffer: &mut Buffer,
    viewport: &Viewport,
    center: Vec2,
    lines: &[&str],
    style: Style,
) {
    let (cx, cy) = viewport.to_cell_unclipped(center);
    let area = viewport.area;
    let top = cy - lines.len() as i32 / 2;

    for (row, line) in lines.iter().enumerate() {
        let y = top + row as i32;
        if y < area.top() as i32 || y >= area.bottom() as i32 {
            continue;
        }
        let left = cx - line.chars().count() as i32 / 2;
        for (col, ch) in line.chars().enumerate() {
            let x = left + col as i32;
            if ch == ' ' || x < area.left() as i32 || x >= area.right() as i32 {
                continue;
            }
            buffer.set_string(x as u16, y as u16, ch.to_string(), style);
        }
    }
}
