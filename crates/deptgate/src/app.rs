#![forbid(unsafe_code)]

//! Top-level application model: message routing and screen navigation.
//!
//! [`AppModel`] owns the injected collaborators and exactly one mounted
//! screen. Navigation always builds a fresh screen; the outgoing one is
//! dropped, and any fetch it started is recognised as stale by its
//! [`MountId`] when the result arrives.

use std::sync::Arc;

use deptgate_core::event::{Event, KeyCode};
use deptgate_core::geometry::{Rect, Sides};
use deptgate_render::frame::Frame;
use deptgate_runtime::{Cmd, Model};
use deptgate_widgets::Widget;
use deptgate_widgets::paragraph::{Line, Paragraph};

use crate::domain::{DepartmentTree, RemoteItem};
use crate::identity_store::IdentityStore;
use crate::item_source::{FetchError, ItemSource};
use crate::navigation::{Route, Transition};
use crate::screens::detail::{DetailScreen, MountId};
use crate::screens::identity_capture::IdentityCaptureScreen;
use crate::screens::{self, HelpEntry, Screen};
use crate::theme;

/// Messages routed through the runtime.
#[derive(Debug)]
pub enum AppMsg {
    /// A terminal event for the current screen.
    Event(Event),
    /// Result of the fetch started by detail mount `mount`.
    ItemsLoaded {
        mount: MountId,
        result: Result<Vec<RemoteItem>, FetchError>,
    },
    Navigate(Transition),
}

impl From<Event> for AppMsg {
    fn from(event: Event) -> Self {
        Self::Event(event)
    }
}

/// The mounted screen.
pub enum ActiveScreen {
    Identity(IdentityCaptureScreen),
    Detail(DetailScreen),
}

impl ActiveScreen {
    pub fn route(&self) -> Route {
        match self {
            ActiveScreen::Identity(_) => Route::IdentityCapture,
            ActiveScreen::Detail(_) => Route::Detail,
        }
    }

    fn as_screen(&self) -> &dyn Screen {
        match self {
            ActiveScreen::Identity(s) => s,
            ActiveScreen::Detail(s) => s,
        }
    }

    fn as_screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            ActiveScreen::Identity(s) => s,
            ActiveScreen::Detail(s) => s,
        }
    }
}

pub struct AppModel {
    store: Arc<dyn IdentityStore>,
    source: Arc<dyn ItemSource>,
    tree: Arc<DepartmentTree>,
    initial_route: Route,
    screen: Option<ActiveScreen>,
    next_mount: u64,
    transitions: Vec<Transition>,
    stale_results: usize,
}

impl AppModel {
    /// Starts on the identity screen once `init` runs.
    pub fn new(store: Arc<dyn IdentityStore>, source: Arc<dyn ItemSource>) -> Self {
        Self {
            store,
            source,
            tree: Arc::new(DepartmentTree::standard()),
            initial_route: Route::IdentityCapture,
            screen: None,
            next_mount: 1,
            transitions: Vec::new(),
            stale_results: 0,
        }
    }

    #[must_use]
    pub fn with_initial_route(mut self, route: Route) -> Self {
        self.initial_route = route;
        self
    }

    /// Route of the mounted screen; `None` before `init`.
    pub fn route(&self) -> Option<Route> {
        self.screen.as_ref().map(ActiveScreen::route)
    }

    pub fn screen(&self) -> Option<&ActiveScreen> {
        self.screen.as_ref()
    }

    pub fn identity_screen(&self) -> Option<&IdentityCaptureScreen> {
        match &self.screen {
            Some(ActiveScreen::Identity(s)) => Some(s),
            _ => None,
        }
    }

    pub fn identity_screen_mut(&mut self) -> Option<&mut IdentityCaptureScreen> {
        match &mut self.screen {
            Some(ActiveScreen::Identity(s)) => Some(s),
            _ => None,
        }
    }

    pub fn detail_screen(&self) -> Option<&DetailScreen> {
        match &self.screen {
            Some(ActiveScreen::Detail(s)) => Some(s),
            _ => None,
        }
    }

    pub fn detail_screen_mut(&mut self) -> Option<&mut DetailScreen> {
        match &mut self.screen {
            Some(ActiveScreen::Detail(s)) => Some(s),
            _ => None,
        }
    }

    /// Every transition handled so far, as it arrived.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Fetch results dropped because their mount was gone.
    pub fn stale_results(&self) -> usize {
        self.stale_results
    }

    fn navigate(&mut self, mut transition: Transition) -> Cmd<AppMsg> {
        tracing::info!(
            from = self.route().map(Route::name),
            to = transition.to.name(),
            advisory = transition.advisory.is_some(),
            "navigate"
        );
        self.transitions.push(transition.clone());
        let advisory = transition.take_advisory();
        match transition.to {
            Route::IdentityCapture => {
                self.screen = Some(ActiveScreen::Identity(IdentityCaptureScreen::mount(
                    Arc::clone(&self.store),
                    advisory,
                )));
                Cmd::none()
            }
            Route::Detail => {
                let mount = MountId(self.next_mount);
                self.next_mount += 1;
                let (screen, cmd) = DetailScreen::mount(
                    mount,
                    self.store.as_ref(),
                    Arc::clone(&self.source),
                    Arc::clone(&self.tree),
                );
                self.screen = Some(ActiveScreen::Detail(screen));
                cmd
            }
        }
    }

    fn apply_items(&mut self, mount: MountId, result: Result<Vec<RemoteItem>, FetchError>) {
        let current = self.detail_screen().map(DetailScreen::mount_id);
        if current == Some(mount)
            && let Some(detail) = self.detail_screen_mut()
        {
            detail.apply_items(result);
            return;
        }
        self.stale_results += 1;
        tracing::debug!(%mount, ?current, "dropping fetch result for unmounted screen");
    }
}

impl Model for AppModel {
    type Message = AppMsg;

    fn init(&mut self) -> Cmd<AppMsg> {
        self.navigate(Transition::to(self.initial_route))
    }

    fn update(&mut self, msg: AppMsg) -> Cmd<AppMsg> {
        match msg {
            AppMsg::Event(event) => {
                if is_quit_chord(&event) {
                    tracing::info!("quit requested");
                    return Cmd::quit();
                }
                match self.screen.as_mut() {
                    Some(screen) => screen.as_screen_mut().update(&event),
                    None => Cmd::none(),
                }
            }
            AppMsg::ItemsLoaded { mount, result } => {
                self.apply_items(mount, result);
                Cmd::none()
            }
            AppMsg::Navigate(transition) => self.navigate(transition),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let Some(screen) = self.screen.as_ref().map(ActiveScreen::as_screen) else {
            return;
        };
        let area = Rect::from_size(frame.width(), frame.height());
        let (body, footer) = area.split_bottom(1);
        screen.view(frame, body.inner(Sides::horizontal(1)));

        let mut hints = screen.keybindings();
        if !hints.is_empty() {
            hints.push(HelpEntry::new("Ctrl+C", "exit"));
            Paragraph::new(vec![Line::styled(screens::help_line(&hints), theme::muted())])
                .render(footer, frame);
        }
    }
}

/// True for the global quit chord.
pub fn is_quit_chord(event: &Event) -> bool {
    matches!(event.as_key_press(), Some(k) if k.ctrl() && k.code == KeyCode::Char('c'))
}
