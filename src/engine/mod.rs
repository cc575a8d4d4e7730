pub(crate) mod game;
pub(crate) mod grid;
