//! Rendering layer. All terminal output lives here.
//!
//! The simulation draws into a `Canvas`; this module only translates the
//! finished canvas into terminal commands.

use std::io::Write;

use bridge_duel::surface::Canvas;
use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BRIDGE: Color = Color::DarkYellow;
const C_SHIP: Color = Color::Green;
const C_BEAM: Color = Color::Red;
const C_POWER: Color = Color::Cyan;
const C_TEXT: Color = Color::White;

fn color_for(glyph: char) -> Color {
    match glyph {
        '=' => C_BRIDGE,
        '<' | '>' | 'O' | 'o' => C_SHIP,
        '|' | '*' => C_BEAM,
        '+' => C_POWER,
        _ => C_TEXT,
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    for row in 0..canvas.height() {
        for (col, glyph) in canvas.row_text(row).chars().enumerate() {
            if glyph == ' ' {
                continue;
            }
            out.queue(cursor::MoveTo(col as u16, row as u16))?;
            out.queue(style::SetForegroundColor(color_for(glyph)))?;
            out.queue(Print(glyph))?;
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, canvas.height().saturating_sub(1) as u16))?;
    out.flush()?;
    Ok(())
}
