#![forbid(unsafe_code)]

//! Bubbletea/Elm-style runtime for terminal applications.
//!
//! The program runtime manages the update/view loop, handling events and
//! rendering frames. It separates state (Model) from rendering (View) and
//! provides a command pattern for side effects.
//!
//! # Example
//!
//! ```ignore
//! use deptgate_runtime::program::{Cmd, Model};
//! use deptgate_core::event::Event;
//! use deptgate_render::frame::Frame;
//!
//! struct Counter {
//!     count: i32,
//! }
//!
//! enum Msg {
//!     Increment,
//!     Quit,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(event: Event) -> Self {
//!         match event {
//!             Event::Key(k) if k.is_char('q') => Msg::Quit,
//!             _ => Msg::Increment,
//!         }
//!     }
//! }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Increment => {
//!                 self.count += 1;
//!                 Cmd::none()
//!             }
//!             Msg::Quit => Cmd::quit(),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         // Render counter
//!     }
//! }
//! ```

use std::io::{self, Stdout};
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use deptgate_core::event::Event;
use deptgate_core::terminal_session::{SessionOptions, TerminalSession};
use deptgate_render::buffer::Buffer;
use deptgate_render::frame::Frame;
use deptgate_render::presenter::Presenter;
use tracing::{debug, debug_span, info, info_span};

/// The Model trait defines application state and behavior.
///
/// Implementations define how the application responds to events
/// and renders its current state.
pub trait Model: Sized {
    /// The message type for this model.
    ///
    /// Must be convertible from terminal events.
    type Message: From<Event> + Send + 'static;

    /// Initialize the model with startup commands.
    ///
    /// Called once when the program starts.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Update the model in response to a message.
    ///
    /// This is the core state transition function. Returns commands
    /// for any side effects that should be executed.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state to a frame.
    fn view(&self, frame: &mut Frame);
}

/// Scheduling metadata for background tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskSpec {
    /// Optional task name for logging.
    pub name: Option<String>,
}

impl TaskSpec {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Commands represent side effects to be executed by the runtime.
#[derive(Default)]
pub enum Cmd<M> {
    /// No operation.
    #[default]
    None,
    /// Quit the application.
    Quit,
    /// Execute multiple commands as a batch (currently sequential).
    Batch(Vec<Cmd<M>>),
    /// Execute commands sequentially.
    Sequence(Vec<Cmd<M>>),
    /// Send a message to the model.
    Msg(M),
    /// Record a log line. The terminal runtime forwards it to `tracing`.
    Log(String),
    /// Execute a blocking operation on a background thread.
    ///
    /// The return value is sent back as a message to the model.
    Task(TaskSpec, Box<dyn FnOnce() -> M + Send>),
}

impl<M: std::fmt::Debug> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Sequence(cmds) => f.debug_tuple("Sequence").field(cmds).finish(),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Log(s) => f.debug_tuple("Log").field(s).finish(),
            Self::Task(spec, _) => f.debug_struct("Task").field("spec", spec).finish(),
        }
    }
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a quit command.
    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a log command.
    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Create a batch of commands.
    ///
    /// `None` entries are dropped; a single remaining command is returned
    /// unwrapped.
    pub fn batch(cmds: Vec<Self>) -> Self {
        Self::collapse(cmds, Self::Batch)
    }

    /// Create a sequence of commands.
    pub fn sequence(cmds: Vec<Self>) -> Self {
        Self::collapse(cmds, Self::Sequence)
    }

    fn collapse(cmds: Vec<Self>, wrap: fn(Vec<Self>) -> Self) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => wrap(cmds),
        }
    }

    /// Create a background task command.
    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(TaskSpec::default(), Box::new(f))
    }

    /// Create a named background task command.
    pub fn task_named<F>(name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(TaskSpec::named(name), Box::new(f))
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Return a stable name for tracing.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Quit => "Quit",
            Self::Batch(_) => "Batch",
            Self::Sequence(_) => "Sequence",
            Self::Msg(_) => "Msg",
            Self::Log(_) => "Log",
            Self::Task(..) => "Task",
        }
    }
}

/// Program configuration.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    /// Draw on the alternate screen (`false` draws over the main screen).
    pub alternate_screen: bool,
    /// Deliver pastes as a single `Event::Paste`.
    pub bracketed_paste: bool,
    /// How long to wait for input before checking task results.
    pub poll_interval: Duration,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            bracketed_paste: true,
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl ProgramConfig {
    /// Config for drawing without the alternate screen.
    #[must_use]
    pub fn inline() -> Self {
        Self {
            alternate_screen: false,
            ..Self::default()
        }
    }
}

/// The program runtime that manages the update/view loop.
pub struct Program<M: Model> {
    model: M,
    config: ProgramConfig,
    session: TerminalSession,
    presenter: Presenter<Stdout>,
    /// Last presented buffer (None forces a full redraw).
    previous: Option<Buffer>,
    width: u16,
    height: u16,
    running: bool,
    dirty: bool,
    task_sender: mpsc::Sender<M::Message>,
    task_receiver: mpsc::Receiver<M::Message>,
    task_handles: Vec<JoinHandle<()>>,
}

impl<M: Model> Program<M> {
    /// Enter the terminal session and prepare to run `model`.
    ///
    /// # Errors
    ///
    /// Fails if the terminal cannot be put into raw mode.
    pub fn new(model: M, config: ProgramConfig) -> io::Result<Self> {
        let session = TerminalSession::new(SessionOptions {
            alternate_screen: config.alternate_screen,
            bracketed_paste: config.bracketed_paste,
        })?;
        let (width, height) = session.size()?;
        let (task_sender, task_receiver) = mpsc::channel();

        Ok(Self {
            model,
            config,
            session,
            presenter: Presenter::new(io::stdout()),
            previous: None,
            width: width.max(1),
            height: height.max(1),
            running: true,
            dirty: true,
            task_sender,
            task_receiver,
            task_handles: Vec::new(),
        })
    }

    /// Run until the model returns `Cmd::Quit`.
    ///
    /// The terminal is restored when `self` drops, including on error.
    pub fn run(mut self) -> io::Result<M> {
        let cmd = {
            let _span = info_span!("deptgate.program.init").entered();
            self.model.init()
        };
        self.execute_cmd(cmd);
        self.render_frame()?;

        while self.running {
            if self.session.poll_event(self.config.poll_interval)? {
                // Drain everything already queued before rendering.
                loop {
                    if let Some(event) = self.session.read_event()? {
                        self.handle_event(event);
                    }
                    if !self.running || !self.session.poll_event(Duration::ZERO)? {
                        break;
                    }
                }
            }

            self.process_task_results();
            self.reap_finished_tasks();

            if self.running && self.dirty {
                self.render_frame()?;
            }
        }

        info!(pending_tasks = self.task_handles.len(), "program exiting");
        Ok(self.model)
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Resize { width, height } = event {
            self.width = width.max(1);
            self.height = height.max(1);
            self.previous = None;
        }
        self.dispatch(M::Message::from(event), "event");
    }

    fn dispatch(&mut self, msg: M::Message, source: &'static str) {
        let cmd = {
            let _span = debug_span!(
                "deptgate.program.update",
                msg_source = source,
                duration_us = tracing::field::Empty,
                cmd_type = tracing::field::Empty
            )
            .entered();
            let start = Instant::now();
            let cmd = self.model.update(msg);
            let span = tracing::Span::current();
            span.record("duration_us", start.elapsed().as_micros() as u64);
            span.record("cmd_type", cmd.type_name());
            cmd
        };
        self.dirty = true;
        self.execute_cmd(cmd);
    }

    fn process_task_results(&mut self) {
        while self.running {
            match self.task_receiver.try_recv() {
                Ok(msg) => self.dispatch(msg, "task"),
                Err(_) => break,
            }
        }
    }

    fn execute_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => self.running = false,
            Cmd::Msg(m) => self.dispatch(m, "cmd"),
            Cmd::Batch(cmds) | Cmd::Sequence(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                    if !self.running {
                        break;
                    }
                }
            }
            Cmd::Log(text) => info!(target: "deptgate::cmd_log", "{text}"),
            Cmd::Task(spec, f) => {
                debug!(task = spec.name.as_deref().unwrap_or("anonymous"), "spawning task");
                let sender = self.task_sender.clone();
                let handle = std::thread::spawn(move || {
                    let msg = f();
                    // The receiver is gone once the program has exited.
                    let _ = sender.send(msg);
                });
                self.task_handles.push(handle);
            }
        }
    }

    fn reap_finished_tasks(&mut self) {
        if self.task_handles.is_empty() {
            return;
        }

        let mut remaining = Vec::with_capacity(self.task_handles.len());
        for handle in self.task_handles.drain(..) {
            if handle.is_finished() {
                if let Err(payload) = handle.join() {
                    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                        (*s).to_owned()
                    } else if let Some(s) = payload.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "unknown panic payload".to_owned()
                    };
                    tracing::error!("spawned task panicked: {msg}");
                }
            } else {
                remaining.push(handle);
            }
        }
        self.task_handles = remaining;
    }

    fn render_frame(&mut self) -> io::Result<()> {
        let _span = debug_span!(
            "deptgate.program.render",
            width = self.width,
            height = self.height
        )
        .entered();

        let mut frame = Frame::new(self.width, self.height);
        self.model.view(&mut frame);
        self.presenter
            .present(&frame.buffer, self.previous.as_ref(), frame.cursor_position)?;
        self.previous = Some(frame.buffer);
        self.dirty = false;
        Ok(())
    }
}
