//! TerminalRenderer: draws session snapshots to a real terminal.
//!
//! Full redraw every frame. The board is two columns per cell with a side
//! panel for the counters.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::core::GameSnapshot;
use crate::runtime::LifetimeStats;
use crate::types::{Rgb, BOARD_HEIGHT, BOARD_WIDTH};

const FILLED: &str = "██";
const GHOST: &str = "░░";
const EMPTY: &str = " .";

pub struct TerminalRenderer {
    stdout: io::Stdout,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Draw one frame
    pub fn draw(&mut self, snap: &GameSnapshot, lifetime: &LifetimeStats) -> Result<()> {
        let panel = panel_lines(snap, lifetime);

        self.buf.clear();
        self.buf.queue(cursor::MoveTo(0, 0))?;
        for y in 0..BOARD_HEIGHT {
            self.buf.queue(Print("|"))?;
            for x in 0..BOARD_WIDTH {
                let (text, color) = cell_style(snap, x, y);
                match color {
                    Some(color) => self.buf.queue(SetForegroundColor(color))?,
                    None => self.buf.queue(ResetColor)?,
                };
                self.buf.queue(Print(text))?;
            }
            self.buf.queue(ResetColor)?;
            self.buf.queue(Print("|  "))?;
            if let Some(line) = panel.get(y) {
                self.buf.queue(Print(line))?;
            }
            self.buf
                .queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
            self.buf.queue(cursor::MoveToNextLine(1))?;
        }
        self.buf
            .queue(Print(format!("+{}+", "-".repeat(BOARD_WIDTH * 2))))?;
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Text and color for one board cell
pub fn cell_style(snap: &GameSnapshot, x: usize, y: usize) -> (&'static str, Option<Color>) {
    if snap.flashing_rows.contains(&y) {
        return (FILLED, Some(Color::White));
    }
    match snap.glyph(x as i32, y as i32) {
        '.' => (EMPTY, None),
        '+' => (GHOST, Some(Color::DarkGrey)),
        c if c.is_ascii_lowercase() => (FILLED, snap.active.map(|a| to_color(a.color))),
        _ => (FILLED, snap.board[y][x].map(|kind| to_color(kind.color()))),
    }
}

/// Side panel, one entry per board row
pub fn panel_lines(snap: &GameSnapshot, lifetime: &LifetimeStats) -> Vec<String> {
    let hold = snap.hold.map_or('-', |k| k.letter());
    let hold_note = if snap.can_hold { "" } else { " (used)" };

    let mut lines = vec![
        "SCORE".to_string(),
        snap.score.to_string(),
        String::new(),
        format!("LINES {}", snap.lines),
        format!("LEVEL {}", snap.level),
        format!(
            "TIME  {:02}:{:02}",
            snap.elapsed_secs / 60,
            snap.elapsed_secs % 60
        ),
        format!("SPEED {}ms", snap.fall_speed_ms),
        String::new(),
        format!("NEXT  {}", snap.next.letter()),
        format!("HOLD  {}{}", hold, hold_note),
        String::new(),
        format!("BEST  {}", lifetime.high_score.max(snap.score as u64)),
        format!("GAMES {}", lifetime.total_games_played),
        String::new(),
    ];
    if snap.game_over {
        lines.push("GAME OVER".to_string());
        lines.push("r restart  q quit".to_string());
    } else {
        lines.push("arrows move/rotate".to_string());
        lines.push("space drop  c hold".to_string());
    }
    lines
}
