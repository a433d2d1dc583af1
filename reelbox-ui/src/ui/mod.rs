use reelbox_core::envelope::Envelope;

use crate::{
    data::{Detail, MediaItem, Streams, View},
    error::Error,
    webapi::WebApi,
};

pub mod detail;
pub mod home;
pub mod player;
pub mod recommend;
pub mod search;

/// The card grids a surface knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Grid {
    Home,
    Search,
    Recommendations,
}

/// Rendering and playback, provided by the front end.  Calls arrive on the
/// event loop thread, one at a time.
pub trait Surface {
    /// Activate the screen of `view` and hide every other one.
    fn show_view(&mut self, view: &View);
    fn scroll_to_top(&mut self);
    fn set_search_input(&mut self, query: &str);

    fn render_loading(&mut self, grid: Grid);
    fn render_grid(&mut self, grid: Grid, items: &[MediaItem]);
    /// Replace the grid contents with a single line of text.
    fn render_message(&mut self, grid: Grid, message: &str);

    /// Reset every detail field, and the recommendation grid, to placeholders.
    fn render_detail_skeleton(&mut self);
    fn render_detail(&mut self, detail: &Detail);
    fn render_detail_error(&mut self, message: &str);

    /// Start playing `streams.current`, offering the alternatives as a
    /// quality menu.
    fn render_player(&mut self, streams: &Streams);
    fn render_player_message(&mut self, message: &str);
    /// Stop playback and free the player widget.
    fn release_player(&mut self);
}

/// Items of a list envelope, with their detail paths recorded for later
/// stream lookups.
fn media_items(webapi: &WebApi, envelope: &Envelope) -> Result<Vec<MediaItem>, Error> {
    let data = envelope
        .data()
        .ok_or_else(|| Error::WebApiError(envelope.error_message()))?;
    let items = MediaItem::from_results(data);
    webapi.remember_detail_paths(&items);
    Ok(items)
}
