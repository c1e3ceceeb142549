pub mod categories;
pub mod content;
pub mod exercises;
pub mod submissions;
