use crate::{
    cmd::Command,
    data::{AppState, Promise, Streams, Ticket, View},
    error::Error,
    launcher::EventCtx,
};

pub const NO_STREAMS: &str = "No Stream Links Found";

pub fn load(ctx: &mut EventCtx, data: &mut AppState) {
    let Some(id) = data.nav.details_target() else {
        log::warn!("player opened with no title to play");
        ctx.surface.render_player_message(NO_STREAMS);
        return;
    };

    let ticket = data.nav.ticket(&id);
    data.player.streams.defer(ticket.clone());
    ctx.spawn(move |webapi| {
        let envelope = webapi.get_streams(&ticket.key);
        let result = match envelope.data() {
            Some(data) => Streams::from_data(data, webapi.stream_base().as_ref())
                .ok_or_else(|| Error::WebApiError(NO_STREAMS.into())),
            None => Err(Error::WebApiError(envelope.error_message())),
        };
        Command::UpdateStreams(ticket, result)
    });
}

pub fn update(
    ctx: &mut EventCtx,
    data: &mut AppState,
    ticket: Ticket,
    result: Result<Streams, Error>,
) {
    if !data.player.streams.update((ticket.clone(), result)) || !data.nav.is_current(&ticket) {
        log::debug!("dropping superseded streams of {:?}", ticket.key);
        return;
    }
    match &data.player.streams {
        Promise::Resolved(streams) => {
            log::info!(
                "playing {} at {}, {} alternatives",
                ticket.key,
                streams.current.label(),
                streams.alternatives.len()
            );
            ctx.surface.render_player(streams);
        }
        Promise::Rejected(err) => {
            log::warn!("no streams for {:?}: {err}", ticket.key);
            ctx.surface.render_player_message(NO_STREAMS);
        }
        _ => {}
    }
}

pub fn switch_quality(ctx: &mut EventCtx, data: &mut AppState, resolution: u32) {
    if *data.nav.current_view() != View::Player {
        log::debug!("quality switch outside the player");
        return;
    }
    let Some(streams) = data.player.streams.resolved_mut() else {
        log::debug!("quality switch before streams loaded");
        return;
    };
    if streams.switch_to(resolution) {
        ctx.surface.render_player(streams);
    } else {
        log::info!("no other {resolution}p source to switch to");
    }
}
