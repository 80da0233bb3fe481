//! Rendering helpers shared by component tests

use ratatui::{backend::TestBackend, buffer::Buffer, Frame, Terminal};

/// Flatten a buffer into one string, one row per line
pub fn buffer_text(buffer: &Buffer) -> String {
    let width = buffer.area.width.max(1) as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Draw once on a `width` x `height` test terminal and return the screen text
pub fn render_to_text<F>(width: u16, height: u16, draw: F) -> String
where
    F: FnOnce(&mut Frame),
{
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(draw).unwrap();
    buffer_text(terminal.backend().buffer())
}
