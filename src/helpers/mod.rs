//! Helper functions shared by the loader, checker and commands

mod date;

pub use date::*;
