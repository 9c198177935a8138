pub mod commands;
pub mod config;
pub mod context;
pub mod editor;
pub mod error;
pub mod model;
pub mod output;
pub mod shell;
pub mod signals;
pub mod store;
pub mod tree;
