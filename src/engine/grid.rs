use rand::distributions::Distribution;
use rand::distributions::WeightedIndex;
use rand::seq::IteratorRandom;
use rand::Rng;

/// Width and height of the playing field.
pub(crate) const GRID_SIZE: usize = 4;

/// A single cell value. Zero marks an empty cell; every nonzero tile is a
/// power of two starting at 2.
pub(crate) type Tile = u16;

const SPAWN_CHOICES: [Tile; 2] = [2, 4];
const SPAWN_WEIGHTS: [u8; 2] = [9, 1];

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Idx(pub(crate) usize, pub(crate) usize);

impl std::fmt::Display for Idx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gidx({0},{1})", self.0, self.1)
    }
}

impl Idx {
    pub(crate) fn x(&self) -> usize {
        self.0
    }

    pub(crate) fn y(&self) -> usize {
        self.1
    }
}

/// Direction represents the direction indicated by the player.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        };
        write!(f, "{}", s)
    }
}

/// Grid holds the 4x4 field of tile values. It stores and moves values but
/// knows nothing about turn order or input; callers keep the coordinates in
/// bounds.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Grid {
    slots: [[Tile; GRID_SIZE]; GRID_SIZE],
}

// public methods
impl Grid {
    pub(crate) fn get(&self, idx: &Idx) -> Tile {
        *self
            .slots
            .get(idx.1)
            .expect(format!("invalid y coordinate {}", idx.1).as_str())
            .get(idx.0)
            .expect(format!("invalid x coordinate {}", idx.0).as_str())
    }

    pub(crate) fn set(&mut self, idx: &Idx, value: Tile) {
        let rf = self.get_mut(idx);
        *rf = value;
    }

    /// All cell indices in row-major order.
    pub(crate) fn cells() -> impl Iterator<Item = Idx> {
        (0..GRID_SIZE).flat_map(|y| (0..GRID_SIZE).map(move |x| Idx(x, y)))
    }

    pub(crate) fn empty_cells(&self) -> impl Iterator<Item = Idx> + '_ {
        Self::cells().filter(|idx| self.get(idx) == 0)
    }

    /// Slide every tile as far as it goes toward the named edge, merging
    /// equal neighbors on contact. Returns true if any tile moved or merged.
    pub(crate) fn shift(&mut self, direction: Direction) -> bool {
        let mut changed = false;
        for lane in Lanes::new(direction) {
            // each destination cell may absorb at most one merge per move
            let mut merged = [[false; GRID_SIZE]; GRID_SIZE];
            for start in 1..GRID_SIZE {
                if self.get(&lane[start]) == 0 {
                    continue;
                }
                for at in (1..=start).rev() {
                    let src = &lane[at];
                    let dst = &lane[at - 1];
                    let value = self.get(src);
                    let ahead = self.get(dst);
                    if ahead == 0 {
                        // the next cell toward the edge is open: keep sliding
                        self.set(dst, value);
                        self.set(src, 0);
                        changed = true;
                    } else if ahead == value && !merged[dst.y()][dst.x()] {
                        // equal neighbor that hasn't merged yet this move
                        self.set(dst, ahead + value);
                        self.set(src, 0);
                        merged[dst.y()][dst.x()] = true;
                        changed = true;
                        break;
                    } else {
                        // blocked by a different value or an already-merged tile
                        break;
                    }
                }
            }
        }
        changed
    }

    /// Place a new tile in a uniformly chosen empty cell: 2 nine times out
    /// of ten, 4 otherwise. On a full grid this is a no-op; declaring the
    /// game over is `is_terminal`'s job, not the spawner's.
    pub(crate) fn spawn<T: Rng>(&mut self, rng: &mut T) {
        let idx = match self.empty_cells().choose(rng) {
            Some(idx) => idx,
            None => return,
        };
        let weighted =
            WeightedIndex::new(SPAWN_WEIGHTS).expect("spawn weights are fixed and nonzero");
        self.set(&idx, SPAWN_CHOICES[weighted.sample(rng)]);
    }

    /// True once play has ended: a `win` tile has appeared anywhere, or the
    /// grid is full with no equal adjacent pair left to merge. The win check
    /// runs first, so reaching `win` ends the game even when moves remain.
    pub(crate) fn is_terminal(&self, win: Tile) -> bool {
        if Self::cells().any(|idx| self.get(&idx) == win) {
            return true;
        }
        for idx in Self::cells() {
            let value = self.get(&idx);
            if value == 0 {
                return false;
            }
            if idx.x() + 1 < GRID_SIZE && self.get(&Idx(idx.x() + 1, idx.y())) == value {
                return false;
            }
            if idx.y() + 1 < GRID_SIZE && self.get(&Idx(idx.x(), idx.y() + 1)) == value {
                return false;
            }
        }
        true
    }
}

// private methods
impl Grid {
    fn get_mut(&mut self, idx: &Idx) -> &mut Tile {
        self.slots
            .get_mut(idx.1)
            .expect(format!("invalid y coordinate {}", idx.1).as_str())
            .get_mut(idx.0)
            .expect(format!("invalid x coordinate {}", idx.0).as_str())
    }
}

// Lanes yields each row or column as a fixed-size array of indices ordered
// from the target edge inward, so one slide pass serves all four directions.
struct Lanes {
    direction: Direction,
    lane: usize,
}

impl Lanes {
    fn new(direction: Direction) -> Self {
        Self { direction, lane: 0 }
    }
}

impl Iterator for Lanes {
    type Item = [Idx; GRID_SIZE];

    fn next(&mut self) -> Option<Self::Item> {
        if self.lane == GRID_SIZE {
            return None;
        }
        let k = self.lane;
        self.lane += 1;
        Some(std::array::from_fn(|step| match self.direction {
            Direction::Left => Idx(step, k),
            Direction::Right => Idx(GRID_SIZE - 1 - step, k),
            Direction::Up => Idx(k, step),
            Direction::Down => Idx(k, GRID_SIZE - 1 - step),
        }))
    }
}
