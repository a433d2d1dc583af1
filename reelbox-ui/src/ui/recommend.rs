use crate::{
    cmd::Command,
    data::{AppState, MediaItem, Promise, Ticket},
    error::Error,
    launcher::EventCtx,
};

use super::{media_items, Grid};

pub const NO_RECOMMENDATIONS: &str = "No recommendations found.";
pub const MAX_ITEMS: usize = 12;

pub fn load(ctx: &mut EventCtx, data: &mut AppState, id: &str) {
    let ticket = data.nav.ticket(id);
    data.detail.recommendations.defer(ticket.clone());
    ctx.surface.render_loading(Grid::Recommendations);
    ctx.spawn(move |webapi| {
        let result = media_items(webapi, &webapi.get_recommendations(&ticket.key, 1));
        Command::UpdateRecommendations(ticket, result)
    });
}

pub fn update(
    ctx: &mut EventCtx,
    data: &mut AppState,
    ticket: Ticket,
    result: Result<Vec<MediaItem>, Error>,
) {
    if !data.detail.recommendations.update((ticket.clone(), result))
        || !data.nav.is_current(&ticket)
    {
        log::debug!("dropping superseded recommendations for {:?}", ticket.key);
        return;
    }
    match &data.detail.recommendations {
        Promise::Resolved(items) if !items.is_empty() => {
            let shown = items.len().min(MAX_ITEMS);
            ctx.surface.render_grid(Grid::Recommendations, &items[..shown]);
        }
        Promise::Rejected(err) => {
            log::warn!("recommendations for {:?} failed: {err}", ticket.key);
            ctx.surface.render_message(Grid::Recommendations, NO_RECOMMENDATIONS);
        }
        _ => ctx.surface.render_message(Grid::Recommendations, NO_RECOMMENDATIONS),
    }
}
