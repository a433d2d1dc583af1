use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::utils::{image_url, list_field, str_field, u64_field};

pub const NO_DESCRIPTION: &str = "No description available.";
pub const NOT_AVAILABLE: &str = "N/A";
pub const CAM_TAG: &str = "CAM";

const STAFF_ACTOR: u64 = 1;
const STAFF_DIRECTOR: u64 = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub label: Arc<str>,
    /// Rendered with the warning style.
    pub warning: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Actor,
    Director,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: Arc<str>,
    pub character: Option<Arc<str>>,
    pub role: Role,
}

/// Content of the detail page, with every fallback already applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub id: Arc<str>,
    pub title: Arc<str>,
    pub description: Arc<str>,
    pub rating: Arc<str>,
    pub release: Arc<str>,
    pub duration: Arc<str>,
    pub poster_url: Option<Arc<str>>,
    pub tags: Vec<Tag>,
    pub cast: Vec<Person>,
    pub directors: Vec<Person>,
    pub detail_path: Option<Arc<str>>,
}

impl Detail {
    /// Build from a detail payload, either `{subject, stars}` or a bare
    /// subject object.
    pub fn from_data(id: &str, data: &Value) -> Self {
        let subject = data.get("subject").filter(|s| s.is_object()).unwrap_or(data);
        let na = || Arc::<str>::from(NOT_AVAILABLE);

        let title = str_field(subject, &["title", "name"]).unwrap_or_else(na);
        let tags = tags(subject, &title);
        let (cast, directors) = list_field(data, &["stars"])
            .or_else(|| list_field(subject, &["stars"]))
            .map(people)
            .unwrap_or_default();

        Self {
            id: str_field(subject, &["subjectId", "id"]).unwrap_or_else(|| id.into()),
            description: str_field(subject, &["description", "intro"])
                .unwrap_or_else(|| NO_DESCRIPTION.into()),
            rating: str_field(subject, &["imdbRatingValue", "score"]).unwrap_or_else(na),
            release: str_field(subject, &["releaseDate", "year"]).unwrap_or_else(na),
            duration: u64_field(subject, &["duration"])
                .and_then(format_duration)
                .unwrap_or_else(na),
            poster_url: image_url(subject, &["cover", "image", "poster"]),
            detail_path: str_field(subject, &["detailPath"]),
            title,
            tags,
            cast,
            directors,
        }
    }

    pub fn has_warning(&self) -> bool {
        self.tags.iter().any(|tag| tag.warning)
    }
}

fn tags(subject: &Value, title: &str) -> Vec<Tag> {
    let genres: Vec<Arc<str>> = match subject.get("genre") {
        Some(Value::String(genre)) => genre
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(Arc::from)
            .collect(),
        _ => list_field(subject, &["genres"])
            .unwrap_or_default()
            .iter()
            .filter_map(|g| match g {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().into()),
                other => str_field(other, &["name"]),
            })
            .collect(),
    };

    let mut tags = genres
        .into_iter()
        .unique()
        .map(|label| Tag {
            label,
            warning: false,
        })
        .collect_vec();
    if title.contains(CAM_TAG) {
        tags.retain(|tag| tag.label.as_ref() != CAM_TAG);
        tags.push(Tag {
            label: CAM_TAG.into(),
            warning: true,
        });
    }
    tags
}

fn people(stars: &[Value]) -> (Vec<Person>, Vec<Person>) {
    stars
        .iter()
        .filter_map(|star| {
            let name = str_field(star, &["name"])?;
            let role = match u64_field(star, &["staffType"]) {
                Some(STAFF_DIRECTOR) => Role::Director,
                Some(STAFF_ACTOR) | None => Role::Actor,
                Some(other) => {
                    log::debug!("unknown staff type {other} for {name}, listing as cast");
                    Role::Actor
                }
            };
            Some(Person {
                character: str_field(star, &["character"]),
                name,
                role,
            })
        })
        .partition(|person| person.role == Role::Actor)
}

/// `6720` seconds reads as `1h 52m`, anything under an hour as `48m`.
pub fn format_duration(seconds: u64) -> Option<Arc<str>> {
    if seconds == 0 {
        return None;
    }
    let minutes = seconds / 60;
    let text = match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    };
    Some(text.into())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn full_detail_is_populated() {
        let detail = Detail::from_data(
            "42",
            &json!({
                "subject": {
                    "subjectId": "42",
                    "title": "Arrival",
                    "description": "Linguist meets heptapods.",
                    "genre": "Drama, Sci-Fi",
                    "cover": { "url": "https://img/arrival.jpg" },
                    "releaseDate": "2016-11-11",
                    "duration": 6960,
                    "imdbRatingValue": "7.9",
                    "detailPath": "arrival-x1"
                },
                "stars": [
                    { "name": "Amy Adams", "character": "Louise", "staffType": 1 },
                    { "name": "Denis Villeneuve", "staffType": 2 },
                    { "name": "Jeremy Renner" }
                ]
            }),
        );

        assert_eq!(detail.title.as_ref(), "Arrival");
        assert_eq!(detail.description.as_ref(), "Linguist meets heptapods.");
        assert_eq!(detail.rating.as_ref(), "7.9");
        assert_eq!(detail.release.as_ref(), "2016-11-11");
        assert_eq!(detail.duration.as_ref(), "1h 56m");
        assert_eq!(detail.poster_url.as_deref(), Some("https://img/arrival.jpg"));
        assert_eq!(
            detail.tags.iter().map(|t| t.label.as_ref()).collect_vec(),
            ["Drama", "Sci-Fi"]
        );
        assert_eq!(
            detail.cast.iter().map(|p| p.name.as_ref()).collect_vec(),
            ["Amy Adams", "Jeremy Renner"]
        );
        assert_eq!(detail.cast[0].character.as_deref(), Some("Louise"));
        assert_eq!(detail.directors.len(), 1);
        assert_eq!(detail.directors[0].name.as_ref(), "Denis Villeneuve");
        assert_eq!(detail.detail_path.as_deref(), Some("arrival-x1"));
        assert!(!detail.has_warning());
    }

    #[test]
    fn rating_falls_back_to_score_then_na() {
        let scored = Detail::from_data("1", &json!({ "subject": { "title": "A", "score": 6.4 } }));
        assert_eq!(scored.rating.as_ref(), "6.4");

        let bare = Detail::from_data("1", &json!({ "subject": { "title": "A" } }));
        assert_eq!(bare.rating.as_ref(), NOT_AVAILABLE);
        assert_eq!(bare.release.as_ref(), NOT_AVAILABLE);
        assert_eq!(bare.duration.as_ref(), NOT_AVAILABLE);
        assert_eq!(bare.description.as_ref(), NO_DESCRIPTION);
        assert_eq!(bare.poster_url, None);
        assert_eq!(bare.id.as_ref(), "1");
    }

    #[test]
    fn cam_title_gets_warning_tag() {
        let detail = Detail::from_data(
            "9",
            &json!({ "title": "Some Movie [CAM]", "genres": [{ "name": "Action" }] }),
        );
        assert_eq!(detail.tags.len(), 2);
        let last = detail.tags.last().unwrap();
        assert_eq!(last.label.as_ref(), CAM_TAG);
        assert!(last.warning);
        assert!(detail.has_warning());
    }

    #[test]
    fn cam_genre_becomes_the_warning_tag() {
        let detail = Detail::from_data(
            "9",
            &json!({ "title": "Some Movie CAM", "genre": "CAM,Horror" }),
        );
        let labels = detail.tags.iter().map(|t| (t.label.as_ref(), t.warning)).collect_vec();
        assert_eq!(labels, [("Horror", false), (CAM_TAG, true)]);
    }

    #[test]
    fn short_runtime_has_no_hours() {
        assert_eq!(format_duration(48 * 60).as_deref(), Some("48m"));
        assert_eq!(format_duration(6720).as_deref(), Some("1h 52m"));
        assert_eq!(format_duration(0), None);
    }
}
