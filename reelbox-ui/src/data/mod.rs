mod config;
mod detail;
mod media;
mod nav;
mod promise;
mod stream;
pub mod utils;

pub use crate::data::{
    config::{Backend, Config},
    detail::{format_duration, Detail, Person, Role, Tag, CAM_TAG, NOT_AVAILABLE, NO_DESCRIPTION},
    media::{MediaItem, DEFAULT_COVER_PRIMARY, DEFAULT_COVER_SECONDARY},
    nav::{NavigationState, Param, Params, Route, Ticket, View},
    promise::{Promise, PromiseState},
    stream::{StreamSource, Streams},
};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub nav: NavigationState,
    pub home: Promise<Vec<MediaItem>, Ticket>,
    pub search: Search,
    pub detail: DetailPage,
    pub player: PlayerState,
}

impl AppState {
    pub fn default_with_config(config: Config) -> Self {
        Self {
            config,
            nav: NavigationState::default(),
            home: Promise::Empty,
            search: Search {
                input: "".into(),
                results: Promise::Empty,
            },
            detail: DetailPage {
                detail: Promise::Empty,
                recommendations: Promise::Empty,
            },
            player: PlayerState {
                streams: Promise::Empty,
            },
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::default_with_config(Config::default())
    }
}

#[derive(Clone, Debug)]
pub struct Search {
    pub input: Arc<str>,
    pub results: Promise<Vec<MediaItem>, Ticket>,
}

#[derive(Clone, Debug)]
pub struct DetailPage {
    pub detail: Promise<Detail, Ticket>,
    pub recommendations: Promise<Vec<MediaItem>, Ticket>,
}

#[derive(Clone, Debug)]
pub struct PlayerState {
    pub streams: Promise<Streams, Ticket>,
}
