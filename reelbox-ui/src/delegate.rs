use crate::{
    cmd::Command,
    controller::NavController,
    data::AppState,
    launcher::EventCtx,
    ui::{detail, home, player, recommend, search},
};

#[derive(Debug, Eq, PartialEq)]
pub enum Handled {
    Yes,
    No,
}

pub struct Delegate;

impl Delegate {
    pub fn command(ctx: &mut EventCtx, cmd: Command, data: &mut AppState) -> Handled {
        match cmd {
            Command::Navigate(route) => NavController::navigate(ctx, data, route),
            Command::NavigateBack => NavController::navigate_back(ctx, data),
            Command::ClosePlayer => NavController::close_player(ctx, data),
            Command::LoadRoute { view, generation } => {
                NavController::load_route_data(ctx, data, &view, generation)
            }
            Command::SubmitSearch(query) => search::submit(ctx, data, &query),
            Command::UpdateSearchResults(ticket, result) => {
                search::update(ctx, data, ticket, result)
            }
            Command::UpdateHome(ticket, result) => home::update(ctx, data, ticket, result),
            Command::UpdateDetail(ticket, result) => detail::update(ctx, data, ticket, result),
            Command::UpdateRecommendations(ticket, result) => {
                recommend::update(ctx, data, ticket, result)
            }
            Command::UpdateStreams(ticket, result) => player::update(ctx, data, ticket, result),
            Command::SwitchQuality(resolution) => player::switch_quality(ctx, data, resolution),
            Command::Quit => return Handled::No,
        }
        Handled::Yes
    }
}
