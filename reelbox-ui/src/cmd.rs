use std::sync::Arc;

use crate::{
    data::{Detail, MediaItem, Route, Streams, Ticket, View},
    error::Error,
};

/// Everything the event loop reacts to.  Commands come from the front end
/// (through `ExtEventSink`), from timers, or from finished background jobs.
#[derive(Debug)]
pub enum Command {
    // Navigation
    Navigate(Route),
    NavigateBack,
    ClosePlayer,
    /// Run the loader of `view`, unless another navigation happened since
    /// `generation` was issued.
    LoadRoute { view: View, generation: u64 },

    // Search
    SubmitSearch(Arc<str>),
    UpdateSearchResults(Ticket, Result<Vec<MediaItem>, Error>),

    // Home
    UpdateHome(Ticket, Result<Vec<MediaItem>, Error>),

    // Detail
    UpdateDetail(Ticket, Result<Detail, Error>),
    UpdateRecommendations(Ticket, Result<Vec<MediaItem>, Error>),

    // Player
    UpdateStreams(Ticket, Result<Streams, Error>),
    SwitchQuality(u32),

    Quit,
}
