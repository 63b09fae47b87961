//! Output formatting for debate results

pub mod console;
