//! Small I/O and text helpers shared by the platform collectors

pub mod command;
pub mod file;
pub mod parsing;
