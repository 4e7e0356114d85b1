use ratatui::buffer::{Buffer, Cell as BufferCell};
use ratatui::layout::{self, Alignment, Constraint, Layout, Rect};
use ratatui::style::Color;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use ratatui::Frame;

use crate::app::{Game, GameState};
use crate::arena::Arena;
use crate::grid::{Cell, Grid};
use crate::persistence::KeyValueStore;
use crate::snake::{Effect, Snake};

const FOOD_SYMBOL: &str = "♥";
const PORTAL_SYMBOL: &str = "◎";
const HEAD_SYMBOL: &str = "●";
const PLAYER_COLOR: Color = Color::Rgb(59, 130, 246);
const AI_COLOR: Color = Color::Rgb(239, 68, 68);
const CLONE_COLOR: Color = Color::DarkGray;

pub fn effect_color(kind: Effect) -> Color {
    match kind {
        Effect::Speed => Color::Rgb(251, 191, 36),
        Effect::Shield => Color::Rgb(96, 165, 250),
        Effect::Ghost => Color::Rgb(167, 139, 250),
        Effect::Reverse => Color::Rgb(245, 158, 11),
        Effect::Freeze => Color::Rgb(56, 189, 248),
        Effect::Growth => Color::Rgb(34, 197, 94),
    }
}

pub fn effect_symbol(kind: Effect) -> &'static str {
    match kind {
        Effect::Speed => "»",
        Effect::Shield => "◊",
        Effect::Ghost => "○",
        Effect::Reverse => "↔",
        Effect::Freeze => "*",
        Effect::Growth => "+",
    }
}

/// Buffer cell for a grid cell, if it falls inside `area`.
fn cell_at(buf: &mut Buffer, area: Rect, cell: Cell) -> Option<&mut BufferCell> {
    let x = u16::try_from(cell.x).ok()?;
    let y = u16::try_from(cell.y).ok()?;
    if x >= area.width || y >= area.height {
        return None;
    }
    buf.cell_mut((area.x + x, area.y + y))
}

fn draw_snake(buf: &mut Buffer, area: Rect, snake: &Snake, base: Color) {
    let color = snake.effect.map_or(base, |e| effect_color(e.kind));
    for &segment in &snake.body {
        if let Some(c) = cell_at(buf, area, segment) {
            c.set_symbol(" ").set_bg(color);
        }
    }
    if let Some(c) = snake.head().and_then(|head| cell_at(buf, area, head)) {
        c.set_symbol(HEAD_SYMBOL).set_fg(Color::White).set_bg(color);
    }
}

impl Widget for &Arena {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(portals) = self.portals {
            for end in portals.ends {
                if let Some(c) = cell_at(buf, area, end) {
                    c.set_symbol(PORTAL_SYMBOL).set_fg(Color::Magenta);
                }
            }
        }

        for power_up in &self.power_ups {
            if let Some(c) = cell_at(buf, area, power_up.cell) {
                c.set_symbol(effect_symbol(power_up.kind))
                    .set_fg(effect_color(power_up.kind));
            }
        }

        if let Some(c) = cell_at(buf, area, self.food) {
            c.set_symbol(FOOD_SYMBOL).set_fg(Color::LightRed);
        }

        for clone in &self.clones {
            draw_snake(buf, area, clone, CLONE_COLOR);
        }
        draw_snake(buf, area, &self.ai, AI_COLOR);
        draw_snake(buf, area, &self.player, PLAYER_COLOR);
    }
}

impl<S: KeyValueStore> Game<S> {
    pub fn render(&mut self, frame: &mut Frame) {
        let mut header = format!(
            "SNAKE DUEL    {}: {}    AI: {}    Difficulty: {}",
            self.config.player_name, self.scores.wins, self.scores.losses, self.session.difficulty
        );
        if let GameState::Running(arena) | GameState::Paused(arena) = &self.state {
            header.push_str(&format!(
                "    Points: {} vs {}",
                arena.player_points, arena.ai_points
            ));
            if let Some(effect) = arena.player.effect {
                header.push_str(&format!("    {}", effect.kind));
            }
        }
        if let Some(notice) = &self.notice {
            header.push_str(&format!("\n{}", notice));
        }

        let layout = Layout::default()
            .direction(layout::Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(frame.area());

        frame.render_widget(
            Paragraph::new(header)
                .alignment(Alignment::Left)
                .block(Block::default().borders(Borders::ALL)),
            layout[0],
        );

        match &self.state {
            GameState::Idle => {
                let block = Block::default().borders(Borders::ALL);
                let inner = block.inner(layout[1]);
                self.grid = Some(Grid::new(inner.width as i32, inner.height as i32));
                frame.render_widget(
                    Paragraph::new(format!(
                        "Press SPACE to start\nr: reset scores    Esc: quit\n\nTitles earned: {}",
                        self.titles.len()
                    ))
                    .alignment(Alignment::Center)
                    .block(block),
                    layout[1],
                );
            }
            GameState::Running(arena) => {
                let block = Block::default().title("Duel").borders(Borders::ALL);
                let inner = block.inner(layout[1]);
                frame.render_widget(block, layout[1]);
                frame.render_widget(arena, inner);
            }
            GameState::Paused(arena) => {
                let block = Block::default()
                    .title("Paused. Press SPACE to continue")
                    .borders(Borders::ALL);
                let inner = block.inner(layout[1]);
                frame.render_widget(block, layout[1]);
                frame.render_widget(arena, inner);
            }
            GameState::RoundOver {
                arena,
                result,
                new_titles,
            } => {
                let block = Block::default().borders(Borders::ALL);
                let inner = block.inner(layout[1]);
                frame.render_widget(block, layout[1]);
                frame.render_widget(arena, inner);

                let mut text = format!(
                    "ROUND OVER\n{}\nSurvived {:.1}s",
                    result.message(&self.config.player_name),
                    arena.survival.as_secs_f64()
                );
                for title in new_titles {
                    text.push_str(&format!("\nNew Title Unlocked: {}!", title));
                }
                text.push_str("\nPress SPACE to continue");
                frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
            }
            GameState::Exit => {}
        }
    }
}
