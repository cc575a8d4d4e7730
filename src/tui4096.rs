use textwrap::wrap;

use crate::engine::game::Game;
use crate::engine::grid::{Idx as BoardIdx, GRID_SIZE};
use crate::error::Result;
use crate::tui::colors::TilePalette;
use crate::tui::events::{Event, EventSource, UserInput};
use crate::tui::geometry::{Bounds2D, Idx, Rectangle};
use crate::tui::renderer::{Modifier, Renderer};

/// Generates a 4096 TUI layout with legible numbers.
///
///  36
///  ╔══════════════════════════════════╗
///  ║                                  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║                                  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║                                  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║                                  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║  xxxxxx  xxxxxx  xxxxxx  xxxxxx  ║
///  ║                                  ║
///  ╚══════════════════════════════════╝
///  27
///
const BOARD_FIXED_Y_OFFSET: usize = 5;
const BOARD_FIXED_X_OFFSET: usize = 5;
const BOARD_BORDER_WIDTH: usize = 1;
const BOARD_X_PADDING: usize = 2;
const BOARD_Y_PADDING: usize = 1;
const TILE_HEIGHT: usize = 5;
const TILE_WIDTH: usize = 6;

const BOARD_BACKGROUND: Modifier = Modifier::BackgroundColor(40, 0, 0);
const BOARD_FOREGROUND: Modifier = Modifier::ForegroundColor(120, 140, 160);
const OVERLAY_BACKGROUND: Modifier = Modifier::BackgroundColor(30, 30, 30);
const OVERLAY_FOREGROUND: Modifier = Modifier::ForegroundColor(230, 230, 230);

const GAME_OVER_BOUNDS: Bounds2D = Bounds2D(28, 5);
const GAME_OVER_MESSAGE: &str = "game over! press enter for a new game or q to quit";
// tile colors keep their hue but drop most lightness under the overlay
const GAME_OVER_SHADE: f32 = 0.45;

fn board_rectangle() -> Rectangle {
    let width = 2 * BOARD_BORDER_WIDTH + BOARD_X_PADDING + GRID_SIZE * (TILE_WIDTH + BOARD_X_PADDING);
    let height =
        2 * BOARD_BORDER_WIDTH + BOARD_Y_PADDING + GRID_SIZE * (TILE_HEIGHT + BOARD_Y_PADDING);
    Rectangle(
        Idx(BOARD_FIXED_X_OFFSET, BOARD_FIXED_Y_OFFSET),
        Bounds2D(width, height),
    )
}

fn tile_rectangle(x: usize, y: usize) -> Rectangle {
    let x_offset = BOARD_FIXED_X_OFFSET + BOARD_BORDER_WIDTH + BOARD_X_PADDING;
    let y_offset = BOARD_FIXED_Y_OFFSET + BOARD_BORDER_WIDTH + BOARD_Y_PADDING;
    let idx = Idx(
        x_offset + (BOARD_X_PADDING + TILE_WIDTH) * x,
        y_offset + (BOARD_Y_PADDING + TILE_HEIGHT) * y,
    );
    let bounds = Bounds2D(TILE_WIDTH, TILE_HEIGHT);
    Rectangle(idx, bounds)
}

pub(crate) struct Tui4096<R: Renderer, E: EventSource> {
    renderer: R,
    event_source: E,
    palette: TilePalette,
    game: Game,
}

impl<R: Renderer, E: EventSource> Tui4096<R, E> {
    pub(crate) fn new(game: Game, renderer: R, event_source: E) -> Self {
        Self {
            renderer,
            event_source,
            palette: TilePalette::new(),
            game,
        }
    }

    /// Run consumes the Tui4096 instance and takes control of the terminal
    /// until the player quits, restoring it if the loop errors out.
    pub(crate) fn run(mut self) -> Result<()> {
        match self.inner_run() {
            Err(e) => {
                self.renderer.recover();
                Err(e)
            }
            Ok(_) => Ok(()),
        }
    }
}

impl<R: Renderer, E: EventSource> Tui4096<R, E> {
    fn inner_run(&mut self) -> Result<()> {
        self.new_game();
        loop {
            self.draw()?;
            let event = self.event_source.next_event()?;
            if !self.handle(event)? {
                break;
            }
        }
        Ok(())
    }

    /// Apply one event to the game, honoring the game-over gate: once play
    /// has ended only NewGame and Quit do anything. Returns false when the
    /// loop should stop.
    fn handle(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::UserInput(UserInput::Direction(direction)) => {
                if self.game.is_over() {
                    log::debug!("dropping {} input: game is over", direction);
                } else {
                    self.game.advance(Some(direction));
                }
            }
            Event::UserInput(UserInput::NewGame) => self.new_game(),
            Event::UserInput(UserInput::Quit) => return Ok(false),
            Event::Resize => self.renderer.clear()?,
        }
        Ok(true)
    }

    /// Reset the game and run the two opening ticks so the first frame
    /// already shows the starting tiles.
    fn new_game(&mut self) {
        self.game.reset();
        self.game.advance(None);
        self.game.advance(None);
        log::info!("starting a new game");
    }

    fn draw(&mut self) -> Result<()> {
        let board = board_rectangle();
        let (width, height) = self.renderer.size_hint()?;
        let (x_extent, y_extent) = board.extents();
        self.renderer.begin_frame()?;
        if (width as usize) < x_extent || (height as usize) < y_extent {
            self.renderer.print(
                &Idx(0, 0),
                &[],
                "hey there! this terminal is too small! try making it bigger!",
            )?;
            return self.renderer.end_frame();
        }
        self.draw_board(&board)?;
        if self.game.is_over() {
            self.draw_game_over(&board)?;
        }
        self.renderer.end_frame()
    }

    fn draw_board(&mut self, board: &Rectangle) -> Result<()> {
        let shade = if self.game.is_over() {
            GAME_OVER_SHADE
        } else {
            1.0
        };
        self.renderer.fill(board, &[BOARD_BACKGROUND, BOARD_FOREGROUND])?;
        self.renderer
            .draw_border(board, &[BOARD_BACKGROUND, BOARD_FOREGROUND])?;
        let (width, height) = self.game.dimensions();
        for y in 0..height {
            for x in 0..width {
                let value = self.game.grid().get(&BoardIdx(x, y));
                if value == 0 {
                    continue;
                }
                let rect = tile_rectangle(x, y);
                let (background, foreground) = self.palette.modifiers(value, shade);
                let modifiers = [background, foreground];
                self.renderer.fill(&rect, &modifiers)?;
                self.renderer.draw_border(&rect, &modifiers)?;
                let text = value.to_string();
                let at = rect.centered_text(rect.height() / 2, text.len());
                self.renderer.print(&at, &modifiers, &text)?;
            }
        }
        Ok(())
    }

    fn draw_game_over(&mut self, board: &Rectangle) -> Result<()> {
        let overlay = board.centered_within(GAME_OVER_BOUNDS);
        let modifiers = [OVERLAY_BACKGROUND, OVERLAY_FOREGROUND, Modifier::Bold];
        self.renderer.fill(&overlay, &modifiers)?;
        self.renderer.draw_border(&overlay, &modifiers)?;
        let inner_width = overlay.width() - 2 * (BOARD_BORDER_WIDTH + 1);
        let lines = wrap(GAME_OVER_MESSAGE, inner_width);
        let first_row = overlay.height().saturating_sub(lines.len()) / 2;
        for (offset, line) in lines.iter().enumerate() {
            let at = overlay.centered_text(first_row + offset, line.len());
            self.renderer.print(&at, &modifiers, line.as_ref())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use crate::engine::game::WIN_TILE;
    use crate::engine::grid::{Direction, Grid};

    use super::*;

    /// Hands out a scripted sequence of events, then quits.
    struct ScriptedEvents {
        events: RefCell<VecDeque<Event>>,
    }

    impl ScriptedEvents {
        fn new(events: Vec<Event>) -> Self {
            Self {
                events: RefCell::new(VecDeque::from(events)),
            }
        }
    }

    impl EventSource for ScriptedEvents {
        fn next_event(&self) -> Result<Event> {
            Ok(self
                .events
                .borrow_mut()
                .pop_front()
                .unwrap_or(Event::UserInput(UserInput::Quit)))
        }
    }

    /// Renderer that draws nowhere and counts screen clears.
    struct NullRenderer {
        size: (u16, u16),
        clears: usize,
    }

    impl Default for NullRenderer {
        fn default() -> Self {
            Self {
                size: (120, 40),
                clears: 0,
            }
        }
    }

    impl Renderer for NullRenderer {
        fn size_hint(&self) -> Result<(u16, u16)> {
            Ok(self.size)
        }

        fn begin_frame(&mut self) -> Result<()> {
            Ok(())
        }

        fn fill(&mut self, _: &Rectangle, _: &[Modifier]) -> Result<()> {
            Ok(())
        }

        fn draw_border(&mut self, _: &Rectangle, _: &[Modifier]) -> Result<()> {
            Ok(())
        }

        fn print(&mut self, _: &Idx, _: &[Modifier], _: &str) -> Result<()> {
            Ok(())
        }

        fn end_frame(&mut self) -> Result<()> {
            Ok(())
        }

        fn clear(&mut self) -> Result<()> {
            self.clears += 1;
            Ok(())
        }

        fn recover(&mut self) {}
    }

    fn shell(events: Vec<Event>) -> Tui4096<NullRenderer, ScriptedEvents> {
        Tui4096::new(
            Game::new(SmallRng::seed_from_u64(42)),
            NullRenderer::default(),
            ScriptedEvents::new(events),
        )
    }

    fn tile_count(game: &Game) -> usize {
        Grid::cells().filter(|idx| game.grid().get(idx) != 0).count()
    }

    fn win_position() -> Grid {
        let mut grid = Grid::default();
        grid.set(&BoardIdx(0, 0), WIN_TILE);
        grid
    }

    #[test]
    fn new_game_seeds_two_tiles() {
        let mut s = shell(vec![]);
        s.new_game();
        assert_eq!(tile_count(&s.game), 2);
        assert!(!s.game.is_over());
    }

    #[test]
    fn run_processes_the_script_and_stops_at_quit() {
        let s = shell(vec![
            Event::UserInput(UserInput::Direction(Direction::Left)),
            Event::UserInput(UserInput::Direction(Direction::Up)),
        ]);
        // the script falls back to Quit once drained
        s.run().expect("scripted run");
    }

    #[test]
    fn directions_are_dropped_once_the_game_is_over() {
        let mut s = shell(vec![]);
        s.new_game();
        s.game.load(win_position());
        s.game.advance(None);
        assert!(s.game.is_over());
        let before = Grid::cells()
            .map(|idx| s.game.grid().get(&idx))
            .collect::<Vec<_>>();
        assert!(s
            .handle(Event::UserInput(UserInput::Direction(Direction::Left)))
            .expect("handle"));
        let after = Grid::cells()
            .map(|idx| s.game.grid().get(&idx))
            .collect::<Vec<_>>();
        assert_eq!(before, after);
        assert!(s.game.is_over());
    }

    #[test]
    fn new_game_is_honored_after_the_game_ends() {
        let mut s = shell(vec![]);
        s.new_game();
        s.game.load(win_position());
        s.game.advance(None);
        assert!(s.game.is_over());
        assert!(s
            .handle(Event::UserInput(UserInput::NewGame))
            .expect("handle"));
        assert!(!s.game.is_over());
        assert_eq!(tile_count(&s.game), 2);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut s = shell(vec![]);
        assert!(!s.handle(Event::UserInput(UserInput::Quit)).expect("handle"));
    }

    #[test]
    fn resize_clears_the_screen() {
        let mut s = shell(vec![]);
        assert!(s.handle(Event::Resize).expect("handle"));
        assert_eq!(s.renderer.clears, 1);
    }

    #[test]
    fn draw_survives_a_tiny_terminal() {
        let mut s = shell(vec![]);
        s.renderer.size = (20, 10);
        s.new_game();
        s.draw().expect("draw");
    }

    #[test]
    fn draw_renders_the_game_over_overlay() {
        let mut s = shell(vec![]);
        s.new_game();
        s.game.load(win_position());
        s.game.advance(None);
        assert!(s.game.is_over());
        s.draw().expect("draw");
    }
}
