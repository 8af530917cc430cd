use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue, terminal,
};
use dishrs::{Cell, Glyph, Grid, Pos2};
use std::{io, time::Duration};

pub enum ConsoleCommand {
    Exit,
    Start,
    Pause,
    Step,
    RandomFill,
    Clear,
    ToggleBoundary,
    /// Start when paused, pause when running
    TogglePause,
    Faster,
    Slower,
    /// Flip the cell under a left click
    Toggle(Pos2),
    /// Put the ant under a right click
    MoveMarker(Pos2),
    Handled,
}

/// Maps between grid positions and terminal cells for a panned view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    tl: Pos2,
}
impl Viewport {
    /// Grid position under terminal cell `(column, row)`
    pub fn to_grid(self, column: u16, row: u16) -> Pos2 {
        self.tl
            + Pos2 {
                x: column as i32,
                y: row as i32,
            }
    }

    /// Terminal cell showing `pos`, if it is on screen
    pub fn to_screen(self, pos: Pos2) -> Option<(u16, u16)> {
        let rel = pos - self.tl;
        Some((u16::try_from(rel.x).ok()?, u16::try_from(rel.y).ok()?))
    }

    fn pan(&mut self, x: i32, y: i32) {
        self.tl = self.tl + Pos2 { x, y };
    }
}

pub struct ConsoleRender {
    view: Viewport,
    report: String,
}
impl ConsoleRender {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), cursor::Hide, EnableMouseCapture)?;
        Ok(Self {
            view: Viewport::default(),
            report: String::new(),
        })
    }

    pub fn render<C: Cell + Glyph>(&self, grid: &Grid<C>) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        // the last row holds the report
        let br = self.view.to_grid(cols, rows.saturating_sub(1));
        let mut stdout = io::stdout();
        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        let mut buf = [0u8; 4];
        for (pos, cell) in grid.window(self.view.tl, br).iter() {
            let Some((x, y)) = self.view.to_screen(pos) else {
                continue;
            };
            queue!(stdout, cursor::MoveTo(x, y))?;
            io::Write::write_all(&mut stdout, cell.glyph().encode_utf8(&mut buf).as_bytes())?;
        }

        // write footer
        queue!(stdout, cursor::MoveTo(0, rows.saturating_sub(1)))?;
        io::Write::write_all(&mut stdout, self.report.as_bytes())?;

        io::Write::flush(&mut stdout)
    }

    /// Waits up to `timeout` for one input event and maps it to a command
    pub fn poll_events(&mut self, timeout: Duration) -> io::Result<Option<ConsoleCommand>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let cmd = match event::read()? {
            event::Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }) => ConsoleCommand::Exit,
            event::Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') => ConsoleCommand::Exit,
                KeyCode::Char('s') => ConsoleCommand::Start,
                KeyCode::Char('p') => ConsoleCommand::Pause,
                KeyCode::Char('r') => ConsoleCommand::RandomFill,
                KeyCode::Char('c') => ConsoleCommand::Clear,
                KeyCode::Char('b') => ConsoleCommand::ToggleBoundary,
                KeyCode::Char(' ') => ConsoleCommand::TogglePause,
                KeyCode::Right => ConsoleCommand::Step,
                KeyCode::Up => ConsoleCommand::Faster,
                KeyCode::Down => ConsoleCommand::Slower,
                // vim keys to pan the viewport
                KeyCode::Char('h') => self.pan(-1, 0),
                KeyCode::Char('j') => self.pan(0, 1),
                KeyCode::Char('k') => self.pan(0, -1),
                KeyCode::Char('l') => self.pan(1, 0),
                _ => ConsoleCommand::Handled,
            },
            event::Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(button),
                column,
                row,
                ..
            }) => {
                let pos = self.view.to_grid(column, row);
                match button {
                    MouseButton::Left => ConsoleCommand::Toggle(pos),
                    MouseButton::Right => ConsoleCommand::MoveMarker(pos),
                    _ => ConsoleCommand::Handled,
                }
            }
            _ => ConsoleCommand::Handled,
        };
        Ok(Some(cmd))
    }

    fn pan(&mut self, x: i32, y: i32) -> ConsoleCommand {
        self.view.pan(x, y);
        ConsoleCommand::Handled
    }

    pub fn set_report(&mut self, report: String) {
        self.report = report;
    }
}
impl Drop for ConsoleRender {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::error!(?err, "failed to disable raw mode");
        }
        if let Err(err) = execute!(io::stdout(), DisableMouseCapture, cursor::Show) {
            tracing::error!(?err, "failed to restore cursor");
        }
    }
}
