use std::{fmt::Display, num::NonZeroUsize, sync::Arc};

use lru::LruCache;
use parking_lot::Mutex;
use reelbox_core::{
    envelope::Envelope,
    error::Error as CoreError,
    transport::{Method, Request, Transport},
    util::USER_AGENT,
};
use serde_json::{json, Value};
use url::Url;

use crate::data::{Backend, Config, MediaItem};

use super::cache::WebApiCache;

pub const H5_ORIGIN: &str = "https://h5.aoneroom.com";
const H5_BASE: &str = "https://h5.aoneroom.com/wefeed-h5-bff/web";
const H5_API_BASE: &str = "https://h5-api.aoneroom.com/wefeed-h5api-bff";
const TRENDING_PAGE_SIZE: u32 = 20;
const DETAIL_PATH_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// Which of the two response shapes a request will come back in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Upstream,
    Proxy,
}

pub struct WebApi {
    transport: Arc<dyn Transport>,
    cache: WebApiCache,
    backend: Backend,
    proxy_base: String,
    upstream_hosts: Vec<String>,
    trending_ranking_id: String,
    search_page_size: u32,
    recommendation_page_size: u32,
    detail_paths: Mutex<LruCache<Arc<str>, Arc<str>>>,
}

impl WebApi {
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: WebApiCache::new(config.cache_capacity),
            backend: config.backend,
            proxy_base: config.proxy_base.clone(),
            upstream_hosts: config.upstream_hosts.clone(),
            trending_ranking_id: config.trending_ranking_id.clone(),
            search_page_size: config.search_page_size,
            recommendation_page_size: config.recommendation_page_size,
            detail_paths: Mutex::new(LruCache::new(DETAIL_PATH_CAPACITY)),
        }
    }

    pub fn cache(&self) -> &WebApiCache {
        &self.cache
    }

    /// Base that relative stream URLs handed out by the proxy resolve
    /// against.
    pub fn stream_base(&self) -> Option<Url> {
        match self.backend {
            Backend::Direct => None,
            Backend::Proxy => Url::parse(&self.proxy_base).ok(),
        }
    }

    fn target(&self, url: &Url) -> Target {
        let is_upstream = url
            .host_str()
            .is_some_and(|host| self.upstream_hosts.iter().any(|h| h == host));
        if is_upstream {
            Target::Upstream
        } else {
            Target::Proxy
        }
    }

    /// Perform `request` and fold whatever comes back into an envelope.
    /// Faults never escape; they become failure envelopes.
    pub fn fetch(&self, request: &RequestBuilder) -> Envelope {
        let url = match request.build() {
            Ok(url) => url,
            Err(err) => {
                log::warn!("cannot build request for {}: {}", request.path, err);
                return Envelope::from_fault(&err);
            }
        };
        let key: Arc<str> = url.as_str().into();

        if request.cached {
            if let Some(envelope) = self.cache.get(&key) {
                log::debug!("cache hit: {key}");
                return envelope;
            }
        }

        let result = match self.target(&url) {
            Target::Upstream => {
                let mut req = match request.method {
                    Method::Get => Request::get(url.as_str()),
                    Method::Post => {
                        Request::post(url.as_str(), request.body.clone().unwrap_or(json!({})))
                    }
                };
                for (key, value) in &request.headers {
                    req = req.header(key.as_str(), value.as_str());
                }
                self.transport.send(&req).map(Envelope::from_upstream)
            }
            Target::Proxy => self
                .transport
                .send(&Request::get(url.as_str()))
                .map(Envelope::from_proxy),
        };

        let envelope = result.unwrap_or_else(|err| {
            log::warn!("request to {key} failed: {err}");
            Envelope::from_fault(&err)
        });
        if !envelope.success {
            log::debug!("{key} answered with failure: {}", envelope.error_message());
        }
        if request.cached {
            self.cache.put(key, envelope.clone());
        }
        envelope
    }

    fn direct(base: &str, path: impl Display, method: Method) -> RequestBuilder {
        RequestBuilder::new(base, path, method)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json, text/plain, */*")
            .header("Origin", H5_ORIGIN)
            .header("Referer", format!("{H5_ORIGIN}/"))
    }

    fn proxy(&self, path: impl Display) -> RequestBuilder {
        RequestBuilder::new(&self.proxy_base, path, Method::Get)
    }
}

/// Detail path registry.  The content API refuses stream lookups whose
/// `Referer` does not name the title's page.
impl WebApi {
    pub fn detail_path(&self, id: &str) -> Option<Arc<str>> {
        self.detail_paths.lock().get(id).cloned()
    }

    pub fn remember_detail_path(&self, id: Arc<str>, path: Arc<str>) {
        self.detail_paths.lock().put(id, path);
    }

    pub fn remember_detail_paths(&self, items: &[MediaItem]) {
        let mut paths = self.detail_paths.lock();
        for item in items {
            if let Some(path) = &item.detail_path {
                paths.put(item.id.clone(), path.clone());
            }
        }
    }
}

/// Home endpoints.
impl WebApi {
    pub fn get_trending(&self) -> Envelope {
        let request = match self.backend {
            Backend::Direct => Self::direct(H5_API_BASE, "ranking-list/content", Method::Get)
                .query("id", &self.trending_ranking_id)
                .query("page", 1)
                .query("perPage", TRENDING_PAGE_SIZE),
            Backend::Proxy => self.proxy("api/home"),
        };
        self.fetch(&request)
    }
}

/// Search endpoints.
impl WebApi {
    pub fn search(&self, keyword: &str, page: u32) -> Envelope {
        let request = match self.backend {
            Backend::Direct => Self::direct(H5_BASE, "subject/search", Method::Post).body(json!({
                "keyword": keyword,
                "page": page,
                "perPage": self.search_page_size,
                "subjectType": 0,
            })),
            Backend::Proxy => self
                .proxy("api/search")
                .query("q", keyword)
                .query("page", page)
                .query("per_page", self.search_page_size),
        };
        self.fetch(&request)
    }
}

/// Detail endpoints.
impl WebApi {
    pub fn get_details(&self, id: &str) -> Envelope {
        let request = match self.backend {
            Backend::Direct => {
                Self::direct(H5_BASE, "subject/detail", Method::Get).query("subjectId", id)
            }
            Backend::Proxy => self.proxy(format!("api/details/{id}")),
        }
        .cached();

        let envelope = self.fetch(&request);
        if let Some(path) = envelope.data().and_then(detail_path_of) {
            self.remember_detail_path(id.into(), path);
        }
        envelope
    }

    pub fn get_recommendations(&self, id: &str, page: u32) -> Envelope {
        let request = match self.backend {
            Backend::Direct => Self::direct(H5_BASE, "subject/detail-rec", Method::Post).body(json!({
                "subjectId": id,
                "page": page,
                "perPage": self.recommendation_page_size,
            })),
            Backend::Proxy => self
                .proxy("api/recommendations")
                .query("id", id)
                .query("page", page)
                .query("per_page", self.recommendation_page_size),
        };
        self.fetch(&request)
    }
}

/// Stream endpoints.
impl WebApi {
    pub fn get_streams(&self, id: &str) -> Envelope {
        let request = match self.backend {
            Backend::Direct => {
                let referer = match self.resolve_detail_path(id) {
                    Some(path) => format!("{H5_ORIGIN}/movies/{path}"),
                    None => {
                        log::debug!("no detail path for {id}, stream lookup may be refused");
                        format!("{H5_ORIGIN}/")
                    }
                };
                Self::direct(H5_BASE, "subject/download", Method::Get)
                    .query("subjectId", id)
                    .query("se", 0)
                    .query("ep", 0)
                    .header("Referer", referer)
            }
            Backend::Proxy => self.proxy(format!("api/stream/{id}")),
        };
        self.fetch(&request)
    }

    fn resolve_detail_path(&self, id: &str) -> Option<Arc<str>> {
        self.detail_path(id).or_else(|| {
            self.get_details(id);
            self.detail_path(id)
        })
    }
}

fn detail_path_of(data: &Value) -> Option<Arc<str>> {
    let subject = data.get("subject").unwrap_or(data);
    crate::data::utils::str_field(subject, &["detailPath"])
}

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base: String,
    path: String,
    queries: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    method: Method,
    body: Option<Value>,
    cached: bool,
}

impl RequestBuilder {
    pub fn new(base: impl Display, path: impl Display, method: Method) -> Self {
        Self {
            base: base.to_string(),
            path: path.to_string(),
            queries: Vec::new(),
            headers: Vec::new(),
            method,
            body: None,
            cached: false,
        }
    }

    pub fn query(mut self, key: impl Display, value: impl Display) -> Self {
        self.queries.push((key.to_string(), value.to_string()));
        self
    }

    /// Set a header, replacing an earlier value for the same name.
    pub fn header(mut self, key: impl Display, value: impl Display) -> Self {
        let key = key.to_string();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&key));
        self.headers.push((key, value.to_string()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serve from and store into the response cache.
    pub fn cached(mut self) -> Self {
        self.cached = true;
        self
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn build(&self) -> Result<Url, CoreError> {
        let mut url = Url::parse(&self.base)?;
        url.path_segments_mut()
            .map_err(|_| CoreError::InvalidUrl(self.base.clone()))?
            .pop_if_empty()
            .extend(self.path.split('/').filter(|s| !s.is_empty()));
        if !self.queries.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.queries);
        }
        Ok(url)
    }
}
