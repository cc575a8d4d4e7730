use std::io::Write;

use crossterm::{
    cursor,
    event::{self, Event as CrossTermEvent, KeyCode, KeyEvent, KeyEventKind},
    style,
    style::Color,
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::engine::grid::Direction;
use crate::error::Result;

use super::events::{Event, EventSource, UserInput};
use super::geometry::{Idx, Rectangle};
use super::renderer::{Modifier, Renderer};

/// Crossterm renders frames to any Write handle that is a terminal.
/// Constructing one switches the terminal to raw mode on the alternate
/// screen; dropping it switches back.
pub(crate) struct Crossterm<T: Write> {
    w: Box<T>,
}

impl<T: Write> Crossterm<T> {
    pub(crate) fn new(mut w: Box<T>) -> Result<Self> {
        terminal::enable_raw_mode()?;
        w.execute(terminal::EnterAlternateScreen)?;
        w.execute(cursor::Hide)?;
        Ok(Self { w })
    }
}

impl<T: Write> Drop for Crossterm<T> {
    fn drop(&mut self) {
        self.restore_terminal();
    }
}

impl<T: Write> Renderer for Crossterm<T> {
    fn size_hint(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    fn begin_frame(&mut self) -> Result<()> {
        self.w.queue(terminal::BeginSynchronizedUpdate)?;
        self.w.queue(style::ResetColor)?;
        self.w.queue(style::SetAttribute(style::Attribute::Reset))?;
        Ok(())
    }

    fn fill(&mut self, rect: &Rectangle, modifiers: &[Modifier]) -> Result<()> {
        for modifier in modifiers {
            self.queue(modifier)?;
        }
        let blank = " ".repeat(rect.width());
        for row in 0..rect.height() {
            self.w
                .queue(cursor::MoveTo(rect.x() as u16, (rect.y() + row) as u16))?;
            self.w.queue(style::Print(&blank))?;
        }
        Ok(())
    }

    fn draw_border(&mut self, rect: &Rectangle, modifiers: &[Modifier]) -> Result<()> {
        // a border needs two columns and two rows to close
        if rect.width() < 2 || rect.height() < 2 {
            return Ok(());
        }
        for modifier in modifiers {
            self.queue(modifier)?;
        }
        let corner = boxy::Char::upper_left(boxy::Weight::Doubled);
        let horizontal: char = boxy::Char::horizontal(boxy::Weight::Doubled).into();
        let vertical: char = boxy::Char::vertical(boxy::Weight::Doubled).into();
        let upper_left: char = corner.clone().into();
        let upper_right: char = corner.clone().rotate_cw(1).into();
        let lower_left: char = corner.clone().rotate_ccw(1).into();
        let lower_right: char = corner.rotate_cw(2).into();
        let run = horizontal.to_string().repeat(rect.width() - 2);
        let top = format!("{}{}{}", upper_left, run, upper_right);
        let bottom = format!("{}{}{}", lower_left, run, lower_right);

        let (x, y) = (rect.x() as u16, rect.y() as u16);
        self.w.queue(cursor::MoveTo(x, y))?;
        self.w.queue(style::Print(&top))?;
        for row in 1..rect.height() - 1 {
            self.w.queue(cursor::MoveTo(x, y + row as u16))?;
            self.w.queue(style::Print(vertical))?;
            self.w
                .queue(cursor::MoveTo(x + (rect.width() - 1) as u16, y + row as u16))?;
            self.w.queue(style::Print(vertical))?;
        }
        self.w
            .queue(cursor::MoveTo(x, y + (rect.height() - 1) as u16))?;
        self.w.queue(style::Print(&bottom))?;
        Ok(())
    }

    fn print(&mut self, idx: &Idx, modifiers: &[Modifier], text: &str) -> Result<()> {
        for modifier in modifiers {
            self.queue(modifier)?;
        }
        self.w
            .queue(cursor::MoveTo(idx.x() as u16, idx.y() as u16))?;
        self.w.queue(style::Print(text))?;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        self.w.queue(terminal::EndSynchronizedUpdate)?;
        self.w.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.w.queue(style::ResetColor)?;
        self.w.queue(terminal::Clear(terminal::ClearType::All))?;
        self.w.flush()?;
        Ok(())
    }

    fn recover(&mut self) {
        self.restore_terminal();
    }
}

impl<T: Write> Crossterm<T> {
    fn queue(&mut self, m: &Modifier) -> Result<()> {
        match m {
            Modifier::BackgroundColor(r, g, b) => {
                self.w.queue(style::SetBackgroundColor(Color::Rgb {
                    r: *r,
                    g: *g,
                    b: *b,
                }))?
            }
            Modifier::ForegroundColor(r, g, b) => {
                self.w.queue(style::SetForegroundColor(Color::Rgb {
                    r: *r,
                    g: *g,
                    b: *b,
                }))?
            }
            Modifier::Bold => self.w.queue(style::SetAttribute(style::Attribute::Bold))?,
        };
        Ok(())
    }

    // must not panic: this runs from Drop, possibly mid-unwind
    fn restore_terminal(&mut self) {
        let _ = self.w.execute(cursor::Show);
        let _ = self.w.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Default)]
pub(crate) struct CrosstermEvents {}

impl EventSource for CrosstermEvents {
    /// Block until the next event the game cares about.
    fn next_event(&self) -> Result<Event> {
        loop {
            match event::read()? {
                CrossTermEvent::Key(ke) => match handle_key_event(ke) {
                    Some(input) => return Ok(Event::UserInput(input)),
                    None => continue,
                },
                CrossTermEvent::Resize(_, _) => return Ok(Event::Resize),
                _ => continue,
            };
        }
    }
}

fn handle_key_event(ke: KeyEvent) -> Option<UserInput> {
    // a held key repeats as fresh Press events; Release and Repeat kinds
    // would double-count on terminals that report them
    if ke.kind != KeyEventKind::Press {
        return None;
    }
    match ke.code {
        KeyCode::Left | KeyCode::Char('h') => Some(UserInput::Direction(Direction::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(UserInput::Direction(Direction::Right)),
        KeyCode::Up | KeyCode::Char('k') => Some(UserInput::Direction(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(UserInput::Direction(Direction::Down)),
        KeyCode::Char('n') | KeyCode::Enter => Some(UserInput::NewGame),
        KeyCode::Char('q') | KeyCode::Esc => Some(UserInput::Quit),
        _ => None,
    }
}
