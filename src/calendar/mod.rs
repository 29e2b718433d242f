mod day;
mod grid;

pub use day::*;
pub use grid::*;
