use crate::error::Result;

use super::geometry::{Idx, Rectangle};

/// Modifier alters how characters drawn after it appear on screen.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Modifier {
    ForegroundColor(u8, u8, u8),
    BackgroundColor(u8, u8, u8),
    Bold,
}

/// Renderer turns frame primitives into terminal output. Implementations own
/// whatever terminal state they need; `recover` must hand the terminal back
/// usable after a failure in the main loop.
pub(crate) trait Renderer {
    fn size_hint(&self) -> Result<(u16, u16)>;
    /// Open a frame. Draw calls up to the matching `end_frame` appear on
    /// screen atomically.
    fn begin_frame(&mut self) -> Result<()>;
    fn fill(&mut self, rect: &Rectangle, modifiers: &[Modifier]) -> Result<()>;
    fn draw_border(&mut self, rect: &Rectangle, modifiers: &[Modifier]) -> Result<()>;
    fn print(&mut self, idx: &Idx, modifiers: &[Modifier], text: &str) -> Result<()>;
    fn end_frame(&mut self) -> Result<()>;
    /// Wipe the whole screen, including regions no later draw covers.
    fn clear(&mut self) -> Result<()>;
    fn recover(&mut self);
}
