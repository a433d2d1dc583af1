use std::{fmt, io::Write};

use itertools::Itertools;
use reelbox_ui::{
    data::{Detail, MediaItem, Streams, View},
    Grid, Surface,
};

/// Draws every screen as plain lines of text.
pub struct TerminalSurface<W> {
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, args: fmt::Arguments) {
        if let Err(err) = writeln!(self.out, "{args}").and_then(|_| self.out.flush()) {
            log::warn!("failed to write to terminal: {err}");
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

fn grid_name(grid: Grid) -> &'static str {
    match grid {
        Grid::Home => "trending",
        Grid::Search => "results",
        Grid::Recommendations => "you may also like",
    }
}

fn card(item: &MediaItem) -> String {
    let mut card = format!("{:>20}  {}", item.id, item.title);
    if let Some(year) = &item.year {
        card.push_str(&format!(" ({year})"));
    }
    if let Some(rating) = &item.rating {
        card.push_str(&format!("  * {rating}"));
    }
    if let Some(badge) = &item.badge {
        card.push_str(&format!("  [{badge}]"));
    }
    card
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn show_view(&mut self, view: &View) {
        self.line(format_args!("== {view} =="));
    }

    fn scroll_to_top(&mut self) {}

    fn set_search_input(&mut self, query: &str) {
        self.line(format_args!("search: {query}"));
    }

    fn render_loading(&mut self, grid: Grid) {
        self.line(format_args!("{}: loading...", grid_name(grid)));
    }

    fn render_grid(&mut self, grid: Grid, items: &[MediaItem]) {
        self.line(format_args!("{} ({}):", grid_name(grid), items.len()));
        for item in items {
            self.line(format_args!("{}", card(item)));
        }
    }

    fn render_message(&mut self, grid: Grid, message: &str) {
        self.line(format_args!("{}: {message}", grid_name(grid)));
    }

    fn render_detail_skeleton(&mut self) {
        self.line(format_args!("loading details..."));
    }

    fn render_detail(&mut self, detail: &Detail) {
        self.line(format_args!("{}", detail.title));
        self.line(format_args!(
            "rating {} | released {} | {}",
            detail.rating, detail.release, detail.duration
        ));
        if !detail.tags.is_empty() {
            let tags = detail
                .tags
                .iter()
                .map(|tag| {
                    if tag.warning {
                        format!("!{}", tag.label)
                    } else {
                        tag.label.to_string()
                    }
                })
                .join(", ");
            self.line(format_args!("tags: {tags}"));
        }
        self.line(format_args!("{}", detail.description));
        if !detail.cast.is_empty() {
            let cast = detail
                .cast
                .iter()
                .map(|person| match &person.character {
                    Some(character) => format!("{} as {character}", person.name),
                    None => person.name.to_string(),
                })
                .join(", ");
            self.line(format_args!("cast: {cast}"));
        }
        if !detail.directors.is_empty() {
            let directors = detail.directors.iter().map(|p| &p.name).join(", ");
            self.line(format_args!("directed by {directors}"));
        }
        if let Some(poster) = &detail.poster_url {
            self.line(format_args!("poster: {poster}"));
        }
    }

    fn render_detail_error(&mut self, message: &str) {
        self.line(format_args!("{message}"));
    }

    fn render_player(&mut self, streams: &Streams) {
        let current = &streams.current;
        self.line(format_args!(
            "playing {} ({:.1} MB): {}",
            current.label(),
            current.size_mb(),
            current.url
        ));
        if !streams.alternatives.is_empty() {
            let menu = streams.alternatives.iter().map(|s| s.label()).join(", ");
            self.line(format_args!("other qualities: {menu}"));
        }
    }

    fn render_player_message(&mut self, message: &str) {
        self.line(format_args!("{message}"));
    }

    fn release_player(&mut self) {
        self.line(format_args!("player closed"));
    }
}
