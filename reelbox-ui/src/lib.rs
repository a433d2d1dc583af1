pub mod cmd;
pub mod controller;
pub mod data;
pub mod delegate;
pub mod error;
pub mod launcher;
pub mod ui;
pub mod webapi;

pub use crate::{
    cmd::Command,
    data::{AppState, Config},
    launcher::{AppLauncher, EventCtx, ExtEventSink},
    ui::{Grid, Surface},
    webapi::WebApi,
};
