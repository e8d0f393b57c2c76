//! CLI commands

pub mod check;
pub mod clean;
pub mod index;
pub mod init;
pub mod list;
pub mod new;
pub mod show;
