use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::utils::{image_url, list_field, str_field};

pub const DEFAULT_COVER_PRIMARY: &str = "#2a2a2a";
pub const DEFAULT_COVER_SECONDARY: &str = "#121212";
const UNTITLED: &str = "Untitled";

/// A grid card, normalized from any of the upstream subject shapes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: Arc<str>,
    pub title: Arc<str>,
    pub cover_url: Option<Arc<str>>,
    pub cover_color_primary: Arc<str>,
    pub cover_color_secondary: Arc<str>,
    pub year: Option<Arc<str>>,
    pub rating: Option<Arc<str>>,
    pub badge: Option<Arc<str>>,
    pub detail_path: Option<Arc<str>>,
}

impl MediaItem {
    /// `None` when the subject carries no usable id, since such a card could
    /// never be opened.
    pub fn from_subject(subject: &Value) -> Option<Self> {
        let id = str_field(subject, &["subjectId", "id"])?;
        let cover = subject.get("cover").or_else(|| subject.get("image"));
        let color = |key: &str, default: &str| {
            cover
                .and_then(|cover| str_field(cover, &[key]))
                .unwrap_or_else(|| default.into())
        };

        Some(Self {
            title: str_field(subject, &["title", "name"]).unwrap_or_else(|| UNTITLED.into()),
            cover_url: image_url(subject, &["cover", "image"]),
            cover_color_primary: color("avgHueLight", DEFAULT_COVER_PRIMARY),
            cover_color_secondary: color("avgHueDark", DEFAULT_COVER_SECONDARY),
            year: release_year(subject),
            rating: str_field(subject, &["imdbRatingValue", "score"]),
            badge: str_field(subject, &["corner", "quality"]),
            detail_path: str_field(subject, &["detailPath"]),
            id,
        })
    }

    pub fn from_list(subjects: &[Value]) -> Vec<Self> {
        subjects.iter().filter_map(Self::from_subject).collect()
    }

    /// Items of a search or recommendation payload, found under `items` or
    /// `list`.
    pub fn from_results(data: &Value) -> Vec<Self> {
        list_field(data, &["items", "list"])
            .map(Self::from_list)
            .unwrap_or_default()
    }
}

fn release_year(subject: &Value) -> Option<Arc<str>> {
    str_field(subject, &["releaseDate"])
        .and_then(|date| date.get(..4).map(Arc::from))
        .or_else(|| str_field(subject, &["year"]))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn search_item_is_normalized() {
        let item = MediaItem::from_subject(&json!({
            "subjectId": "8855",
            "title": "Dune: Part Two",
            "cover": { "url": "https://img/dune.jpg", "avgHueLight": "#C0A080", "avgHueDark": "#403020" },
            "releaseDate": "2024-02-27",
            "imdbRatingValue": "8.5",
            "corner": "HD",
            "detailPath": "dune-part-two-abc"
        }))
        .unwrap();

        assert_eq!(item.id.as_ref(), "8855");
        assert_eq!(item.title.as_ref(), "Dune: Part Two");
        assert_eq!(item.cover_url.as_deref(), Some("https://img/dune.jpg"));
        assert_eq!(item.cover_color_primary.as_ref(), "#C0A080");
        assert_eq!(item.cover_color_secondary.as_ref(), "#403020");
        assert_eq!(item.year.as_deref(), Some("2024"));
        assert_eq!(item.rating.as_deref(), Some("8.5"));
        assert_eq!(item.badge.as_deref(), Some("HD"));
        assert_eq!(item.detail_path.as_deref(), Some("dune-part-two-abc"));
    }

    #[test]
    fn alternate_field_names_are_used() {
        let item = MediaItem::from_subject(&json!({
            "id": 12,
            "name": "Heat",
            "image": "https://img/heat.jpg",
            "year": 1995,
            "score": 8.3,
            "quality": "CAM"
        }))
        .unwrap();

        assert_eq!(item.id.as_ref(), "12");
        assert_eq!(item.title.as_ref(), "Heat");
        assert_eq!(item.cover_url.as_deref(), Some("https://img/heat.jpg"));
        assert_eq!(item.cover_color_primary.as_ref(), DEFAULT_COVER_PRIMARY);
        assert_eq!(item.year.as_deref(), Some("1995"));
        assert_eq!(item.rating.as_deref(), Some("8.3"));
        assert_eq!(item.badge.as_deref(), Some("CAM"));
    }

    #[test]
    fn subjects_without_id_are_dropped() {
        let items = MediaItem::from_list(&[json!({ "title": "Ghost" }), json!({ "id": "1" })]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title.as_ref(), UNTITLED);
    }

    #[test]
    fn results_are_read_from_items_or_list() {
        let by_items = json!({ "items": [{ "id": "1" }] });
        let by_list = json!({ "list": [{ "id": "2" }, { "id": "3" }] });
        assert_eq!(MediaItem::from_results(&by_items).len(), 1);
        assert_eq!(MediaItem::from_results(&by_list).len(), 2);
        assert!(MediaItem::from_results(&json!({})).is_empty());
    }
}
