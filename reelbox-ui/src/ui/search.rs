use crate::{
    cmd::Command,
    controller::NavController,
    data::{AppState, MediaItem, Promise, Route, Ticket},
    error::Error,
    launcher::EventCtx,
};

use super::{media_items, Grid};

pub const NO_RESULTS: &str = "No results found.";
const FIRST_PAGE: u32 = 1;

pub fn submit(ctx: &mut EventCtx, data: &mut AppState, query: &str) {
    let query = query.trim();
    data.search.input = query.into();
    ctx.surface.set_search_input(query);
    if query.is_empty() {
        log::debug!("ignoring empty search");
        return;
    }
    NavController::navigate(ctx, data, Route::search(query));
}

pub fn load(ctx: &mut EventCtx, data: &mut AppState) {
    let Some(query) = data.nav.params().get_str("q") else {
        log::debug!("search opened without a query");
        return;
    };

    ctx.surface.render_loading(Grid::Search);
    let ticket = data.nav.ticket(&query);
    data.search.results.defer(ticket.clone());
    ctx.spawn(move |webapi| {
        let result = media_items(webapi, &webapi.search(&ticket.key, FIRST_PAGE));
        Command::UpdateSearchResults(ticket, result)
    });
}

pub fn update(
    ctx: &mut EventCtx,
    data: &mut AppState,
    ticket: Ticket,
    result: Result<Vec<MediaItem>, Error>,
) {
    if !data.search.results.update((ticket.clone(), result)) || !data.nav.is_current(&ticket) {
        log::debug!("dropping superseded results for {:?}", ticket.key);
        return;
    }
    match &data.search.results {
        Promise::Resolved(items) if !items.is_empty() => {
            ctx.surface.render_grid(Grid::Search, items)
        }
        Promise::Rejected(err) => {
            log::warn!("search for {:?} failed: {err}", ticket.key);
            ctx.surface.render_message(Grid::Search, NO_RESULTS);
        }
        _ => ctx.surface.render_message(Grid::Search, NO_RESULTS),
    }
}
