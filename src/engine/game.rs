use rand::RngCore;

use super::grid::{Direction, Grid, Tile, GRID_SIZE};

/// Reaching this tile anywhere on the grid ends the game as a win.
pub(crate) const WIN_TILE: Tile = 4096;

/// Number of tiles placed on a fresh board by the opening ticks.
const OPENING_SPAWNS: u8 = 2;

/// Game owns the grid plus the turn bookkeeping around it: whether a spawn
/// is owed from the last shift, how many opening spawns remain, and whether
/// play has ended.
pub(crate) struct Game {
    rng: Box<dyn RngCore>,
    grid: Grid,
    spawn_pending: bool,
    opening_spawns_remaining: u8,
    over: bool,
}

impl Game {
    /// Initialize a Game using the provided random number generator. The
    /// grid starts empty; the first two ticks place the opening tiles.
    pub(crate) fn new(rng: impl RngCore + 'static) -> Self {
        Self {
            rng: Box::new(rng),
            grid: Grid::default(),
            spawn_pending: false,
            opening_spawns_remaining: OPENING_SPAWNS,
            over: false,
        }
    }

    /// Put the game back in its starting state, keeping the random source.
    pub(crate) fn reset(&mut self) {
        self.grid = Grid::default();
        self.spawn_pending = false;
        self.opening_spawns_remaining = OPENING_SPAWNS;
        self.over = false;
    }

    /// Run one tick: shift if the player indicated a direction, spawn if the
    /// shift changed the board (or an opening spawn is still owed), then
    /// check for the end of the game. Returns whether the shift changed the
    /// board. Once the game is over every tick is ignored until `reset`.
    pub(crate) fn advance(&mut self, input: Option<Direction>) -> bool {
        if self.over {
            return false;
        }
        let mut changed = false;
        if let Some(direction) = input {
            changed = self.grid.shift(direction);
            self.spawn_pending = changed;
            log::debug!("shift {}: changed={}", direction, changed);
        }
        if self.spawn_pending || self.opening_spawns_remaining > 0 {
            self.grid.spawn(&mut self.rng);
            self.spawn_pending = false;
            self.opening_spawns_remaining = self.opening_spawns_remaining.saturating_sub(1);
        }
        if self.grid.is_terminal(WIN_TILE) {
            self.over = true;
            log::info!("game over");
        }
        changed
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn is_over(&self) -> bool {
        self.over
    }

    pub(crate) fn dimensions(&self) -> (usize, usize) {
        (GRID_SIZE, GRID_SIZE)
    }

    /// Drop the game into a mid-run position with no spawns owed.
    #[cfg(test)]
    pub(crate) fn load(&mut self, grid: Grid) {
        self.grid = grid;
        self.spawn_pending = false;
        self.opening_spawns_remaining = 0;
        self.over = false;
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::super::grid::Idx;
    use super::*;

    fn game() -> Game {
        let _ = env_logger::builder().is_test(true).try_init();
        Game::new(SmallRng::seed_from_u64(42))
    }

    fn tile_count(game: &Game) -> usize {
        Grid::cells().filter(|idx| game.grid().get(idx) != 0).count()
    }

    #[test]
    fn new_game_starts_empty_and_running() {
        let g = game();
        assert_eq!(tile_count(&g), 0);
        assert!(!g.is_over());
    }

    #[test]
    fn opening_ticks_seed_two_tiles() {
        let mut g = game();
        assert!(!g.advance(None));
        assert_eq!(tile_count(&g), 1);
        g.advance(None);
        assert_eq!(tile_count(&g), 2);
        // the opening spawns are spent; further input-less ticks do nothing
        g.advance(None);
        assert_eq!(tile_count(&g), 2);
        for idx in Grid::cells() {
            let value = g.grid().get(&idx);
            assert!(value == 0 || value == 2 || value == 4);
        }
    }

    #[test]
    fn changing_move_spawns_one_tile() {
        let mut g = game();
        let mut grid = Grid::default();
        grid.set(&Idx(1, 0), 2);
        grid.set(&Idx(2, 0), 2);
        g.load(grid);
        assert!(g.advance(Some(Direction::Left)));
        assert_eq!(g.grid().get(&Idx(0, 0)), 4);
        // the merged pair plus one spawned tile
        assert_eq!(tile_count(&g), 2);
    }

    #[test]
    fn rejected_move_spawns_nothing() {
        let mut g = game();
        let mut grid = Grid::default();
        grid.set(&Idx(0, 0), 2);
        grid.set(&Idx(1, 0), 4);
        g.load(grid);
        assert!(!g.advance(Some(Direction::Left)));
        assert_eq!(tile_count(&g), 2);
        assert!(!g.is_over());
    }

    #[test]
    fn winning_merge_latches_game_over() {
        let mut g = game();
        let mut grid = Grid::default();
        grid.set(&Idx(0, 0), 2048);
        grid.set(&Idx(1, 0), 2048);
        g.load(grid);
        g.advance(Some(Direction::Left));
        assert!(g.is_over());
        assert_eq!(g.grid().get(&Idx(0, 0)), WIN_TILE);
        let frozen = Grid::cells().map(|idx| g.grid().get(&idx)).collect::<Vec<Tile>>();
        assert!(!g.advance(Some(Direction::Right)));
        let after = Grid::cells().map(|idx| g.grid().get(&idx)).collect::<Vec<Tile>>();
        assert_eq!(frozen, after);
    }

    #[test]
    fn reset_restores_a_fresh_game() {
        let mut g = game();
        let mut grid = Grid::default();
        grid.set(&Idx(0, 0), WIN_TILE);
        g.load(grid);
        g.advance(None);
        assert!(g.is_over());
        g.reset();
        assert!(!g.is_over());
        assert_eq!(tile_count(&g), 0);
        // the opening ticks work again after a reset
        g.advance(None);
        g.advance(None);
        assert_eq!(tile_count(&g), 2);
    }
}
