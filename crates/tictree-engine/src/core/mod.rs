pub use self::{board::*, cell::*, position::*};

pub(crate) mod board;
pub(crate) mod cell;
pub(crate) mod position;
