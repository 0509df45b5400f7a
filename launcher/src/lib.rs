//! Launcher and setup tooling around [`gfx_compose`].

pub mod app;
pub mod cli;
pub mod doctor;
pub mod environment;
pub mod logging;
pub mod runner;
pub mod settings;
pub mod setup;
