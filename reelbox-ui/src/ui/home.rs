use serde_json::Value;

use crate::{
    cmd::Command,
    data::{utils::list_field, AppState, MediaItem, Promise, Ticket},
    error::Error,
    launcher::EventCtx,
    webapi::WebApi,
};

use super::{media_items, Grid};

/// A home grid holding at least this many cards is not fetched again.
pub const FULL_GRID: usize = 6;
const TRENDING_SECTION: &str = "Trending";

pub fn load(ctx: &mut EventCtx, data: &mut AppState) {
    if let Some(items) = data.home.resolved().filter(|items| items.len() >= FULL_GRID) {
        log::debug!("home grid already has {} items", items.len());
        ctx.surface.render_grid(Grid::Home, items);
        return;
    }

    let ticket = data.nav.ticket("home");
    let keyword = data.config.default_keyword.clone();
    data.home.defer(ticket.clone());
    ctx.spawn(move |webapi| Command::UpdateHome(ticket, load_feed(webapi, &keyword)));
}

pub fn update(
    ctx: &mut EventCtx,
    data: &mut AppState,
    ticket: Ticket,
    result: Result<Vec<MediaItem>, Error>,
) {
    if !data.home.update((ticket.clone(), result)) {
        log::debug!("dropping superseded home feed");
        return;
    }
    match &data.home {
        Promise::Resolved(items) if data.nav.is_current(&ticket) => {
            ctx.surface.render_grid(Grid::Home, items)
        }
        Promise::Rejected(err) => log::error!("home feed unavailable: {err}"),
        _ => {}
    }
}

/// Trending titles, falling back to a search for `keyword` when the ranking
/// holds nothing usable.
pub fn load_feed(webapi: &WebApi, keyword: &str) -> Result<Vec<MediaItem>, Error> {
    let envelope = webapi.get_trending();
    match envelope.data() {
        Some(data) => {
            let items = trending_items(data);
            if !items.is_empty() {
                webapi.remember_detail_paths(&items);
                return Ok(items);
            }
            log::info!("trending feed is empty, searching for {keyword:?}");
        }
        None => log::warn!("trending feed failed: {}", envelope.error_message()),
    }
    media_items(webapi, &webapi.search(keyword, 1))
}

/// Subjects of a trending payload, trying in order: a top-level
/// `subjectList`, a nested `data.subjectList`, the `operatingList` section
/// titled as trending, and the first section with any subjects.
pub fn trending_items(data: &Value) -> Vec<MediaItem> {
    fn non_empty(list: Option<&[Value]>) -> Option<&[Value]> {
        list.filter(|l| !l.is_empty())
    }
    fn section_subjects(section: &Value) -> Option<&[Value]> {
        non_empty(list_field(section, &["subjects", "subjectList"]))
    }

    let sections = list_field(data, &["operatingList"]).unwrap_or_default();

    let subjects = non_empty(list_field(data, &["subjectList"]))
        .or_else(|| {
            data.get("data")
                .and_then(|nested| non_empty(list_field(nested, &["subjectList"])))
        })
        .or_else(|| {
            sections
                .iter()
                .filter(|section| {
                    section
                        .get("title")
                        .and_then(Value::as_str)
                        .is_some_and(|title| title.contains(TRENDING_SECTION))
                })
                .find_map(section_subjects)
        })
        .or_else(|| sections.iter().find_map(section_subjects));

    subjects.map(MediaItem::from_list).unwrap_or_default()
}
