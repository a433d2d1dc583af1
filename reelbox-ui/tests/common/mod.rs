#![allow(dead_code)]

use std::{
    io::{Read, Write},
    net::TcpListener,
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use reelbox_core::{
    error::Error as CoreError,
    transport::{Request, Transport},
};
use reelbox_ui::{
    data::{Detail, MediaItem, Streams, View},
    AppLauncher, Config, Grid, Surface,
};
use serde_json::Value;

enum Reply {
    Body(Value),
    Fault,
}

/// Scripted transport.  A request is answered by the first route whose
/// fragment occurs in its URL or JSON body; anything unrouted is a fault.
#[derive(Default)]
pub struct FakeTransport {
    routes: Vec<(String, Reply)>,
    gates: Mutex<Vec<(String, Receiver<()>)>>,
    calls: Mutex<Vec<Request>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, fragment: &str, body: Value) -> Self {
        self.routes.push((fragment.into(), Reply::Body(body)));
        self
    }

    pub fn fail(mut self, fragment: &str) -> Self {
        self.routes.push((fragment.into(), Reply::Fault));
        self
    }

    /// Hold the next matching request until the returned sender fires.
    pub fn hold(&self, fragment: &str) -> Sender<()> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.gates.lock().push((fragment.into(), rx));
        tx
    }

    pub fn calls(&self) -> Vec<Request> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, fragment: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|request| signature(request).contains(fragment))
            .count()
    }
}

fn signature(request: &Request) -> String {
    match &request.body {
        Some(body) => format!("{} {}", request.url, body),
        None => request.url.clone(),
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &Request) -> Result<Value, CoreError> {
        let signature = signature(request);
        self.calls.lock().push(request.clone());

        let gate = {
            let mut gates = self.gates.lock();
            gates
                .iter()
                .position(|(fragment, _)| signature.contains(fragment.as_str()))
                .map(|pos| gates.remove(pos).1)
        };
        if let Some(gate) = gate {
            let _ = gate.recv();
        }

        match self
            .routes
            .iter()
            .find(|(fragment, _)| signature.contains(fragment.as_str()))
        {
            Some((_, Reply::Body(body))) => Ok(body.clone()),
            Some((_, Reply::Fault)) | None => Err(CoreError::UnexpectedResponse),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Painted {
    View(String),
    ScrollTop,
    SearchInput(String),
    Loading(Grid),
    Grid(Grid, Vec<String>),
    Message(Grid, String),
    DetailSkeleton,
    Detail(Detail),
    DetailError(String),
    Player(Streams),
    PlayerMessage(String),
    ReleasePlayer,
}

#[derive(Default)]
pub struct RecordingSurface {
    pub painted: Vec<Painted>,
}

impl RecordingSurface {
    pub fn last_grid(&self, grid: Grid) -> Option<Vec<String>> {
        self.painted.iter().rev().find_map(|p| match p {
            Painted::Grid(g, ids) if *g == grid => Some(ids.clone()),
            _ => None,
        })
    }

    pub fn messages(&self, grid: Grid) -> Vec<String> {
        self.painted
            .iter()
            .filter_map(|p| match p {
                Painted::Message(g, message) if *g == grid => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_detail(&self) -> Option<&Detail> {
        self.painted.iter().rev().find_map(|p| match p {
            Painted::Detail(detail) => Some(detail),
            _ => None,
        })
    }

    pub fn last_player(&self) -> Option<&Streams> {
        self.painted.iter().rev().find_map(|p| match p {
            Painted::Player(streams) => Some(streams),
            _ => None,
        })
    }

    pub fn count(&self, painted: &Painted) -> usize {
        self.painted.iter().filter(|p| *p == painted).count()
    }

    pub fn position(&self, painted: &Painted) -> Option<usize> {
        self.painted.iter().position(|p| p == painted)
    }
}

impl Surface for RecordingSurface {
    fn show_view(&mut self, view: &View) {
        self.painted.push(Painted::View(view.name().into()));
    }

    fn scroll_to_top(&mut self) {
        self.painted.push(Painted::ScrollTop);
    }

    fn set_search_input(&mut self, query: &str) {
        self.painted.push(Painted::SearchInput(query.into()));
    }

    fn render_loading(&mut self, grid: Grid) {
        self.painted.push(Painted::Loading(grid));
    }

    fn render_grid(&mut self, grid: Grid, items: &[MediaItem]) {
        let ids = items.iter().map(|item| item.id.to_string()).collect();
        self.painted.push(Painted::Grid(grid, ids));
    }

    fn render_message(&mut self, grid: Grid, message: &str) {
        self.painted.push(Painted::Message(grid, message.into()));
    }

    fn render_detail_skeleton(&mut self) {
        self.painted.push(Painted::DetailSkeleton);
    }

    fn render_detail(&mut self, detail: &Detail) {
        self.painted.push(Painted::Detail(detail.clone()));
    }

    fn render_detail_error(&mut self, message: &str) {
        self.painted.push(Painted::DetailError(message.into()));
    }

    fn render_player(&mut self, streams: &Streams) {
        self.painted.push(Painted::Player(streams.clone()));
    }

    fn render_player_message(&mut self, message: &str) {
        self.painted.push(Painted::PlayerMessage(message.into()));
    }

    fn release_player(&mut self) {
        self.painted.push(Painted::ReleasePlayer);
    }
}

pub fn test_config() -> Config {
    Config {
        paint_delay_ms: 0,
        ..Config::default()
    }
}

pub fn launch(
    config: Config,
    transport: FakeTransport,
) -> (AppLauncher<RecordingSurface>, Arc<FakeTransport>) {
    let transport = Arc::new(transport);
    let launcher = AppLauncher::new(config, transport.clone(), RecordingSurface::default());
    (launcher, transport)
}

/// Answer one HTTP request on a loopback port with `status` and a JSON
/// `body`.  Returns the base URL and a handle yielding the request line.
pub fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });
    (base, handle)
}
