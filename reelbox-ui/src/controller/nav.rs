use crate::{
    cmd::Command,
    data::{AppState, NavigationState, Route, View},
    launcher::EventCtx,
    ui::{detail, home, player, search},
};

pub struct NavController;

impl NavController {
    /// Show `route`, record it, and schedule its loader after the paint delay.
    pub fn navigate(ctx: &mut EventCtx, data: &mut AppState, route: Route) {
        let view = route.view.clone();
        Self::transition(ctx, data, &view, |nav| Some(nav.navigate(route)));
    }

    pub fn navigate_back(ctx: &mut EventCtx, data: &mut AppState) {
        let Some(view) = data.nav.history().last().map(|route| route.view.clone()) else {
            log::debug!("no history to go back to");
            return;
        };
        Self::transition(ctx, data, &view, NavigationState::navigate_back);
    }

    /// Leave the player for the detail page it was opened from, or home if
    /// there is none.
    pub fn close_player(ctx: &mut EventCtx, data: &mut AppState) {
        let route = match data.nav.details_target() {
            Some(id) => Route::details(&id),
            None => Route::home(),
        };
        Self::navigate(ctx, data, route);
    }

    fn transition(
        ctx: &mut EventCtx,
        data: &mut AppState,
        view: &View,
        record: impl FnOnce(&mut NavigationState) -> Option<u64>,
    ) {
        if *data.nav.current_view() == View::Player {
            ctx.surface.release_player();
            data.player.streams.clear();
        }
        ctx.surface.show_view(view);
        ctx.surface.scroll_to_top();

        if let Some(generation) = record(&mut data.nav) {
            ctx.submit_after(
                data.config.paint_delay(),
                Command::LoadRoute {
                    view: view.clone(),
                    generation,
                },
            );
        }
    }

    pub fn load_route_data(
        ctx: &mut EventCtx,
        data: &mut AppState,
        view: &View,
        generation: u64,
    ) {
        if generation != data.nav.generation() {
            log::debug!("skipping load of {view}, navigated away since");
            return;
        }
        match view {
            View::Home => home::load(ctx, data),
            View::Search => search::load(ctx, data),
            View::Details => detail::load(ctx, data),
            View::Player => player::load(ctx, data),
            View::Unknown(name) => log::debug!("no loader for view {name:?}"),
        }
    }
}
