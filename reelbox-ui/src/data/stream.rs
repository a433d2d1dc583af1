use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::utils::{list_field, str_field, u64_field};

const MIB: f64 = 1024.0 * 1024.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamSource {
    pub url: Arc<str>,
    pub resolution: u32,
    pub size_bytes: u64,
}

impl StreamSource {
    /// Entry of an upstream `downloads` list: `{url, resolution, size}`.
    pub fn from_download(item: &Value) -> Option<Self> {
        Some(Self {
            url: str_field(item, &["url"])?,
            resolution: resolution(item, &["resolution"])?,
            size_bytes: u64_field(item, &["size"]).unwrap_or(0),
        })
    }

    /// Entry of a proxy `qualities` list:
    /// `{quality, direct_url | proxy_url, size_mb}`.  Relative proxy URLs are
    /// resolved against `base`.
    pub fn from_quality(item: &Value, base: Option<&Url>) -> Option<Self> {
        let url = str_field(item, &["direct_url"]).or_else(|| {
            let relative = str_field(item, &["proxy_url", "url"])?;
            match base {
                Some(base) => base.join(&relative).ok().map(|url| url.as_str().into()),
                None => Some(relative),
            }
        })?;
        let size_mb = item.get("size_mb").and_then(Value::as_f64).unwrap_or(0.0);
        Some(Self {
            url,
            resolution: resolution(item, &["quality", "resolution"])?,
            size_bytes: (size_mb.max(0.0) * MIB) as u64,
        })
    }

    pub fn label(&self) -> String {
        format!("{}p", self.resolution)
    }

    pub fn size_mb(&self) -> f64 {
        (self.size_bytes as f64 / MIB * 10.0).round() / 10.0
    }
}

fn resolution(item: &Value, keys: &[&str]) -> Option<u32> {
    u64_field(item, keys)
        .or_else(|| {
            let text = str_field(item, keys)?;
            text.trim_end_matches(['p', 'P']).parse().ok()
        })
        .and_then(|res| u32::try_from(res).ok())
}

/// Playable sources of one title: the one currently playing, and the rest of
/// the quality menu.  Both stay ordered by resolution, highest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Streams {
    pub current: StreamSource,
    pub alternatives: Vec<StreamSource>,
}

impl Streams {
    /// `None` when the payload holds no usable source.
    pub fn from_data(data: &Value, base: Option<&Url>) -> Option<Self> {
        let sources = if let Some(downloads) = list_field(data, &["downloads"]) {
            downloads
                .iter()
                .filter_map(StreamSource::from_download)
                .collect_vec()
        } else {
            list_field(data, &["qualities"])
                .or_else(|| data.as_array().map(Vec::as_slice))
                .unwrap_or_default()
                .iter()
                .filter_map(|item| StreamSource::from_quality(item, base))
                .collect_vec()
        };
        Self::from_sources(sources)
    }

    pub fn from_sources(mut sources: Vec<StreamSource>) -> Option<Self> {
        sources.sort_by(|a, b| b.resolution.cmp(&a.resolution));
        let mut sources = sources.into_iter();
        let current = sources.next()?;
        Some(Self {
            current,
            alternatives: sources.collect(),
        })
    }

    /// Start playing the source with `resolution`.  Returns `false` if there
    /// is no such source or it is already playing.
    pub fn switch_to(&mut self, resolution: u32) -> bool {
        let Some(pos) = self
            .alternatives
            .iter()
            .position(|s| s.resolution == resolution)
        else {
            return false;
        };
        let next = self.alternatives.remove(pos);
        let previous = std::mem::replace(&mut self.current, next);
        self.alternatives.push(previous);
        self.alternatives
            .sort_by(|a, b| b.resolution.cmp(&a.resolution));
        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn downloads_are_ordered_highest_first() {
        let streams = Streams::from_data(
            &json!({ "downloads": [
                { "url": "https://cdn/360.mp4", "resolution": 360, "size": "104857600" },
                { "url": "https://cdn/1080.mp4", "resolution": 1080, "size": 1073741824 },
                { "url": "https://cdn/720.mp4", "resolution": "720" }
            ] }),
            None,
        )
        .unwrap();

        assert_eq!(streams.current.resolution, 1080);
        assert_eq!(streams.current.label(), "1080p");
        assert_eq!(streams.current.size_mb(), 1024.0);
        assert_eq!(
            streams.alternatives.iter().map(|s| s.resolution).collect_vec(),
            [720, 360]
        );
    }

    #[test]
    fn proxy_qualities_resolve_relative_urls() {
        let base = Url::parse("http://localhost:8002").unwrap();
        let streams = Streams::from_data(
            &json!({ "success": true, "qualities": [
                { "quality": 480, "size_mb": 300.5, "proxy_url": "/stream/abc/def/video_480p.mp4" },
                { "quality": 720, "size_mb": 800, "direct_url": "https://cdn/720.mp4" }
            ] }),
            Some(&base),
        )
        .unwrap();

        assert_eq!(streams.current.url.as_ref(), "https://cdn/720.mp4");
        assert_eq!(
            streams.alternatives[0].url.as_ref(),
            "http://localhost:8002/stream/abc/def/video_480p.mp4"
        );
        assert_eq!(streams.alternatives[0].size_mb(), 300.5);
    }

    #[test]
    fn empty_payload_has_no_streams() {
        assert_eq!(Streams::from_data(&json!({ "downloads": [] }), None), None);
        assert_eq!(Streams::from_data(&json!({}), None), None);
    }

    #[test]
    fn switching_keeps_menu_ordered() {
        let mut streams = Streams::from_sources(
            [1080, 720, 480]
                .into_iter()
                .map(|resolution| StreamSource {
                    url: format!("https://cdn/{resolution}.mp4").into(),
                    resolution,
                    size_bytes: 0,
                })
                .collect(),
        )
        .unwrap();

        assert!(streams.switch_to(480));
        assert_eq!(streams.current.resolution, 480);
        assert_eq!(
            streams.alternatives.iter().map(|s| s.resolution).collect_vec(),
            [1080, 720]
        );
        assert!(!streams.switch_to(480));
        assert!(!streams.switch_to(2160));
    }
}
