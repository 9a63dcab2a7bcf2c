/// User interface widgets
pub mod grid;
