use std::{collections::BTreeMap, fmt, sync::Arc};

use url::Url;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Search,
    Details,
    Player,
    /// A view name with no screen or loader behind it.
    Unknown(Arc<str>),
}

impl View {
    pub fn parse(name: &str) -> Self {
        match name {
            "home" => Self::Home,
            "search" => Self::Search,
            "details" => Self::Details,
            "player" => Self::Player,
            other => Self::Unknown(other.into()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Home => "home",
            Self::Search => "search",
            Self::Details => "details",
            Self::Player => "player",
            Self::Unknown(name) => name,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    Str(Arc<str>),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => n.fmt(f),
            Self::Bool(b) => b.fmt(f),
        }
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<Arc<str>> for Param {
    fn from(s: Arc<str>) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Param {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Param {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<Arc<str>, Param>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Param>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Param>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Param> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Param> {
        self.0.get(key)
    }

    /// Parameter rendered as text, with blank strings treated as absent.
    pub fn get_str(&self, key: &str) -> Option<Arc<str>> {
        match self.0.get(key)? {
            Param::Str(s) if s.trim().is_empty() => None,
            Param::Str(s) => Some(s.clone()),
            other => Some(other.to_string().into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v))
    }
}

/// A view together with the parameters it was opened with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub view: View,
    pub params: Params,
}

impl Route {
    pub fn new(view: View, params: Params) -> Self {
        Self { view, params }
    }

    pub fn home() -> Self {
        Self::new(View::Home, Params::new())
    }

    pub fn search(query: &str) -> Self {
        Self::new(View::Search, Params::new().with("q", query))
    }

    pub fn details(id: &str) -> Self {
        Self::new(View::Details, Params::new().with("id", id))
    }

    pub fn player(id: &str) -> Self {
        Self::new(View::Player, Params::new().with("id", id))
    }

    /// Resolve a deep link.  An `id` on a details-like path opens the detail
    /// page, a `q` opens search, anything else lands on home.  Relative links
    /// such as `/details?id=1` are accepted.
    pub fn from_url(link: &str) -> Self {
        let url = Url::parse(link).or_else(|_| {
            Url::parse("http://localhost/").and_then(|base| base.join(link))
        });
        let Ok(url) = url else {
            log::warn!("unreadable deep link {link:?}, opening home");
            return Self::home();
        };

        let query = |name: &str| {
            url.query_pairs()
                .find(|(key, value)| key == name && !value.trim().is_empty())
                .map(|(_, value)| value.into_owned())
        };

        if let Some(id) = query("id") {
            if url.path().contains("detail") {
                return Self::details(&id);
            }
        }
        if let Some(q) = query("q") {
            return Self::search(&q);
        }
        Self::home()
    }
}

/// Identifies one load: the navigation it belongs to and the key it was
/// issued for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: u64,
    pub key: Arc<str>,
}

/// Back history keeps at most this many routes; the oldest are forgotten.
pub const MAX_HISTORY: usize = 50;

#[derive(Clone, Debug)]
pub struct NavigationState {
    current: Route,
    last_details_id: Option<Arc<str>>,
    generation: u64,
    history: Vec<Route>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            current: Route::home(),
            last_details_id: None,
            generation: 0,
            history: Vec::new(),
        }
    }
}

impl NavigationState {
    pub fn current_view(&self) -> &View {
        &self.current.view
    }

    pub fn params(&self) -> &Params {
        &self.current.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.current.params
    }

    pub fn route(&self) -> &Route {
        &self.current
    }

    pub fn last_details_id(&self) -> Option<&Arc<str>> {
        self.last_details_id.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Make `route` current, remembering the previous route for back
    /// navigation.  Returns the new generation.
    pub fn navigate(&mut self, route: Route) -> u64 {
        if self.generation > 0 {
            let previous = std::mem::replace(&mut self.current, route);
            if self.history.len() == MAX_HISTORY {
                self.history.remove(0);
            }
            self.history.push(previous);
        } else {
            self.current = route;
        }
        self.settle()
    }

    /// Return to the previous route.  `None` when there is nothing to go back to.
    pub fn navigate_back(&mut self) -> Option<u64> {
        let previous = self.history.pop()?;
        self.current = previous;
        Some(self.settle())
    }

    /// Id of the detail page the player belongs to: the live `id` parameter,
    /// falling back to the last details page visited.
    pub fn details_target(&self) -> Option<Arc<str>> {
        self.current
            .params
            .get_str("id")
            .or_else(|| self.last_details_id.clone())
    }

    pub fn ticket(&self, key: &str) -> Ticket {
        Ticket {
            generation: self.generation,
            key: key.into(),
        }
    }

    /// `true` if `ticket` was issued for the navigation still on screen.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation
    }

    fn settle(&mut self) -> u64 {
        if self.current.view == View::Details {
            if let Some(id) = self.current.params.get_str("id") {
                self.last_details_id = Some(id);
            }
        }
        self.generation += 1;
        self.generation
    }
}
