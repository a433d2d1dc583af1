use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use itertools::Itertools;
use reelbox_core::transport::Transport;
use threadpool::ThreadPool;

use crate::{
    cmd::Command,
    data::{AppState, Config, Route, View},
    delegate::Delegate,
    error::Error,
    ui::Surface,
    webapi::WebApi,
};

const MAX_WEB_THREADS: usize = 4;

enum Event {
    /// Submitted from outside the loop.
    Command(Command),
    /// Result of a job spawned through `EventCtx::spawn`.
    Completed(Command),
}

struct Timer {
    deadline: Instant,
    command: Command,
}

/// Handle for submitting commands to a running `AppLauncher` from any thread.
#[derive(Clone)]
pub struct ExtEventSink {
    tx: Sender<Event>,
}

impl ExtEventSink {
    pub fn submit_command(&self, command: Command) -> Result<(), Error> {
        self.tx
            .send(Event::Command(command))
            .map_err(|_| Error::Disconnected)
    }
}

/// What a command handler may do besides mutating `AppState`.
pub struct EventCtx<'a> {
    pub surface: &'a mut dyn Surface,
    queue: &'a mut VecDeque<Command>,
    timers: &'a mut Vec<Timer>,
    pool: &'a ThreadPool,
    tx: &'a Sender<Event>,
    webapi: &'a Arc<WebApi>,
    in_flight: &'a mut usize,
}

impl EventCtx<'_> {
    pub fn submit_command(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn submit_after(&mut self, delay: Duration, command: Command) {
        if delay.is_zero() {
            self.queue.push_back(command);
        } else {
            self.timers.push(Timer {
                deadline: Instant::now() + delay,
                command,
            });
        }
    }

    /// Run `job` on the worker pool and handle the command it returns back on
    /// the loop thread.
    pub fn spawn(&mut self, job: impl FnOnce(&WebApi) -> Command + Send + 'static) {
        *self.in_flight += 1;
        let tx = self.tx.clone();
        let webapi = self.webapi.clone();
        self.pool.execute(move || {
            let command = job(&webapi);
            if tx.send(Event::Completed(command)).is_err() {
                log::warn!("event loop is gone, dropping response");
            }
        });
    }
}

struct EventLoop {
    queue: VecDeque<Command>,
    timers: Vec<Timer>,
    pool: ThreadPool,
    tx: Sender<Event>,
    rx: Receiver<Event>,
    in_flight: usize,
}

impl EventLoop {
    fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            queue: VecDeque::new(),
            timers: Vec::new(),
            pool: ThreadPool::with_name("webapi".into(), MAX_WEB_THREADS),
            tx,
            rx,
            in_flight: 0,
        }
    }

    fn accept(&mut self, event: Event) {
        match event {
            Event::Command(command) => self.queue.push_back(command),
            Event::Completed(command) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.queue.push_back(command);
            }
        }
    }

    fn fire_due_timers(&mut self) {
        let now = Instant::now();
        let (due, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|t| t.deadline <= now);
        self.timers = pending;
        self.queue.extend(
            due.into_iter()
                .sorted_by_key(|t| t.deadline)
                .map(|t| t.command),
        );
    }

    fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.timers.is_empty() && self.in_flight == 0
    }

    /// Next command to handle, waiting for timers and jobs as needed.
    /// Returns `None` once idle if `until_idle` is set, or when every sender
    /// is gone.
    fn next_command(&mut self, until_idle: bool) -> Option<Command> {
        loop {
            while let Ok(event) = self.rx.try_recv() {
                self.accept(event);
            }
            self.fire_due_timers();
            if let Some(command) = self.queue.pop_front() {
                return Some(command);
            }
            if until_idle && self.is_idle() {
                return None;
            }

            let next_deadline = self.timers.iter().map(|t| t.deadline).min();
            match next_deadline {
                Some(deadline) => match self.rx.recv_deadline(deadline) {
                    Ok(event) => self.accept(event),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => return None,
                },
                None => match self.rx.recv() {
                    Ok(event) => self.accept(event),
                    Err(_) => return None,
                },
            }
        }
    }
}

/// Owns the application state and the rendering surface, and handles one
/// command at a time on the calling thread.
pub struct AppLauncher<S> {
    data: AppState,
    surface: S,
    webapi: Arc<WebApi>,
    event_loop: EventLoop,
}

impl<S: Surface> AppLauncher<S> {
    pub fn new(config: Config, transport: Arc<dyn Transport>, surface: S) -> Self {
        let webapi = Arc::new(WebApi::new(&config, transport));
        Self {
            data: AppState::default_with_config(config),
            surface,
            webapi,
            event_loop: EventLoop::new(),
        }
    }

    pub fn sink(&self) -> ExtEventSink {
        ExtEventSink {
            tx: self.event_loop.tx.clone(),
        }
    }

    /// Queue the initial navigation.  A deep link with a query goes through
    /// search submission so the search input is filled in as well.
    pub fn open(&mut self, deep_link: Option<&str>) {
        let route = deep_link.map(Route::from_url).unwrap_or_else(Route::home);
        log::info!("opening {} {:?}", route.view, route.params);
        let command = match route.params.get_str("q") {
            Some(query) if route.view == View::Search => Command::SubmitSearch(query),
            _ => Command::Navigate(route),
        };
        self.event_loop.queue.push_back(command);
    }

    /// Handle commands until `Command::Quit` arrives.
    pub fn run(&mut self) {
        while let Some(command) = self.event_loop.next_command(false) {
            if matches!(command, Command::Quit) {
                log::info!("quitting");
                break;
            }
            self.dispatch(command);
        }
    }

    /// Handle commands until nothing is queued, scheduled or in flight.
    pub fn run_until_idle(&mut self) {
        while let Some(command) = self.event_loop.next_command(true) {
            if matches!(command, Command::Quit) {
                break;
            }
            self.dispatch(command);
        }
    }

    fn dispatch(&mut self, command: Command) {
        let event_loop = &mut self.event_loop;
        let mut ctx = EventCtx {
            surface: &mut self.surface,
            queue: &mut event_loop.queue,
            timers: &mut event_loop.timers,
            pool: &event_loop.pool,
            tx: &event_loop.tx,
            webapi: &self.webapi,
            in_flight: &mut event_loop.in_flight,
        };
        Delegate::command(&mut ctx, command, &mut self.data);
    }

    pub fn data(&self) -> &AppState {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut AppState {
        &mut self.data
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn webapi(&self) -> &Arc<WebApi> {
        &self.webapi
    }
}
