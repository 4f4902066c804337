//! Shared helpers: external commands, minification, atomic writes.

pub mod exec;
pub mod fs;
pub mod minify;
