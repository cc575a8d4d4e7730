use crate::engine::grid::Direction;
use crate::error::Result;

pub(crate) trait EventSource {
    fn next_event(&self) -> Result<Event>;
}

pub(crate) enum Event {
    UserInput(UserInput),
    Resize,
}

pub(crate) enum UserInput {
    Direction(Direction),
    NewGame,
    Quit,
}
