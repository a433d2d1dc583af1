use crate::{
    cmd::Command,
    data::{AppState, Detail, Promise, Ticket},
    error::Error,
    launcher::EventCtx,
};

use super::recommend;

pub const DETAIL_FAILED: &str = "Failed to load details.";

pub fn load(ctx: &mut EventCtx, data: &mut AppState) {
    ctx.surface.render_detail_skeleton();
    data.detail.recommendations.clear();

    let Some(id) = data.nav.params().get_str("id") else {
        log::warn!("details opened without an id");
        data.detail.detail.clear();
        ctx.surface.render_detail_error(DETAIL_FAILED);
        return;
    };

    let ticket = data.nav.ticket(&id);
    data.detail.detail.defer(ticket.clone());
    ctx.spawn(move |webapi| {
        let envelope = webapi.get_details(&ticket.key);
        let result = envelope
            .data()
            .map(|data| Detail::from_data(&ticket.key, data))
            .ok_or_else(|| Error::WebApiError(envelope.error_message()));
        Command::UpdateDetail(ticket, result)
    });
}

pub fn update(
    ctx: &mut EventCtx,
    data: &mut AppState,
    ticket: Ticket,
    result: Result<Detail, Error>,
) {
    if !data.detail.detail.update((ticket.clone(), result)) || !data.nav.is_current(&ticket) {
        log::debug!("dropping superseded details of {:?}", ticket.key);
        return;
    }
    let loaded = match &data.detail.detail {
        Promise::Resolved(detail) => {
            ctx.surface.render_detail(detail);
            true
        }
        Promise::Rejected(err) => {
            log::warn!("details of {:?} failed: {err}", ticket.key);
            ctx.surface.render_detail_error(DETAIL_FAILED);
            false
        }
        _ => false,
    };
    if loaded {
        recommend::load(ctx, data, &ticket.key);
    }
}
