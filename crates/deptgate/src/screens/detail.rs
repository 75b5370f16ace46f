#![forbid(unsafe_code)]

//! Detail screen: the remote table and the department selector, behind the
//! identity gate.

use std::fmt;
use std::sync::Arc;

use deptgate_core::event::{Event, KeyCode};
use deptgate_core::geometry::Rect;
use deptgate_render::frame::Frame;
use deptgate_runtime::Cmd;
use deptgate_widgets::Widget;
use deptgate_widgets::block::Block;
use deptgate_widgets::check_tree::CheckTree;

use super::{HelpEntry, Screen};
use crate::app::AppMsg;
use crate::domain::{DepartmentTree, RemoteItem};
use crate::gate::GateState;
use crate::hierarchy::HierarchySelector;
use crate::identity_store::IdentityStore;
use crate::item_source::{FetchError, ItemSource};
use crate::remote_table::{PAGE_SIZE, RemoteTable};
use crate::theme;

pub const TABLE_HEADING: &str = "Posts Data";
pub const TREE_HEADING: &str = "Departments";

/// Task name for the one fetch each mount issues.
pub const FETCH_TASK: &str = "fetch_items";

/// Identifies one mount of the detail screen.
///
/// Fetch results carry the id of the mount that asked for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(pub u64);

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mount#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailFocus {
    Table,
    Tree,
}

pub struct DetailScreen {
    mount: MountId,
    gate: GateState,
    table: RemoteTable,
    selector: HierarchySelector,
    focus: DetailFocus,
}

impl DetailScreen {
    /// Check the gate and return the screen with its mount command.
    ///
    /// A redirecting gate yields the backward navigation and no fetch; an
    /// authorized one yields exactly one background `list()`.
    pub fn mount(
        mount: MountId,
        store: &dyn IdentityStore,
        source: Arc<dyn ItemSource>,
        tree: Arc<DepartmentTree>,
    ) -> (Self, Cmd<AppMsg>) {
        let gate = GateState::check(store);
        let screen = Self {
            mount,
            gate,
            table: RemoteTable::new(),
            selector: HierarchySelector::new(tree),
            focus: DetailFocus::Table,
        };
        let cmd = match gate.redirect() {
            Some(transition) => Cmd::msg(AppMsg::Navigate(transition)),
            None => Cmd::task_named(FETCH_TASK, move || AppMsg::ItemsLoaded {
                mount,
                result: source.list(),
            }),
        };
        (screen, cmd)
    }

    pub fn mount_id(&self) -> MountId {
        self.mount
    }

    pub fn gate(&self) -> GateState {
        self.gate
    }

    pub fn focus(&self) -> DetailFocus {
        self.focus
    }

    pub fn table(&self) -> &RemoteTable {
        &self.table
    }

    pub fn selector(&self) -> &HierarchySelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut HierarchySelector {
        &mut self.selector
    }

    /// Store this mount's fetch result.
    pub fn apply_items(&mut self, result: Result<Vec<RemoteItem>, FetchError>) {
        self.table.apply_result(result);
    }

    fn handle_table_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::PageUp => {
                self.table.prev_page();
            }
            KeyCode::Right | KeyCode::PageDown => {
                self.table.next_page();
            }
            KeyCode::Home => {
                self.table.first_page();
            }
            KeyCode::End => {
                self.table.last_page();
            }
            _ => {}
        }
    }

    fn handle_tree_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => {
                self.selector.cursor_up();
            }
            KeyCode::Down => {
                self.selector.cursor_down();
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.selector.toggle_at_cursor();
            }
            _ => {}
        }
    }
}

impl Screen for DetailScreen {
    fn update(&mut self, event: &Event) -> Cmd<AppMsg> {
        if !self.gate.is_authorized() {
            return Cmd::none();
        }
        let Some(key) = event.as_key_press() else {
            return Cmd::none();
        };
        match key.code {
            KeyCode::Escape | KeyCode::Char('q') => return Cmd::quit(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    DetailFocus::Table => DetailFocus::Tree,
                    DetailFocus::Tree => DetailFocus::Table,
                };
            }
            code => match self.focus {
                DetailFocus::Table => self.handle_table_key(code),
                DetailFocus::Tree => self.handle_tree_key(code),
            },
        }
        Cmd::none()
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if !self.gate.is_authorized() || area.is_empty() {
            return;
        }
        // Borders, header row, one page, status line.
        let table_height = PAGE_SIZE as u16 + 4;
        let (table_area, tree_area) = area.split_top(table_height);

        let table_focused = self.focus == DetailFocus::Table;
        let block = Block::bordered()
            .title(TABLE_HEADING)
            .title_style(theme::heading())
            .border_style(theme::border(table_focused));
        block.render(table_area, frame);
        self.table.render(block.inner(table_area), frame, table_focused);

        let tree_focused = self.focus == DetailFocus::Tree;
        let block = Block::bordered()
            .title(TREE_HEADING)
            .title_style(theme::heading())
            .border_style(theme::border(tree_focused));
        block.render(tree_area, frame);
        let rows = self.selector.tree_rows();
        CheckTree::new(&rows)
            .group_style(theme::heading())
            .cursor(tree_focused.then_some(self.selector.cursor()))
            .cursor_style(theme::cursor_row())
            .render(block.inner(tree_area), frame);
    }

    fn keybindings(&self) -> Vec<HelpEntry> {
        if !self.gate.is_authorized() {
            return vec![];
        }
        let mut entries = vec![HelpEntry::new("Tab", "switch pane")];
        match self.focus {
            DetailFocus::Table => {
                entries.push(HelpEntry::new("←/→", "page"));
                entries.push(HelpEntry::new("Home/End", "first/last"));
            }
            DetailFocus::Tree => {
                entries.push(HelpEntry::new("↑/↓", "move"));
                entries.push(HelpEntry::new("Space", "toggle"));
            }
        }
        entries.push(HelpEntry::new("q", "quit"));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DepartmentId, IdentityRecord, SubDepartmentId};
    use crate::identity_store::MemoryIdentityStore;
    use crate::item_source::StaticItemSource;
    use crate::navigation::{IDENTITY_REQUIRED_MESSAGE, Route};

    fn authorized_store() -> MemoryIdentityStore {
        let record = IdentityRecord::new("Ada", "555", "ada@example.com").expect("valid");
        MemoryIdentityStore::with_record(&record)
    }

    fn mount(store: &MemoryIdentityStore, source: Arc<StaticItemSource>) -> (DetailScreen, Cmd<AppMsg>) {
        DetailScreen::mount(
            MountId(1),
            store,
            source,
            Arc::new(DepartmentTree::standard()),
        )
    }

    fn render(screen: &DetailScreen) -> String {
        let mut frame = Frame::new(60, 20);
        let area = frame.area();
        screen.view(&mut frame, area);
        frame.buffer.to_text()
    }

    #[test]
    fn missing_identity_redirects_without_fetch() {
        let store = MemoryIdentityStore::new();
        let source = Arc::new(StaticItemSource::ok(vec![]));
        let (screen, cmd) = mount(&store, source.clone());
        assert_eq!(screen.gate(), GateState::Redirecting);
        match cmd {
            Cmd::Msg(AppMsg::Navigate(t)) => {
                assert_eq!(t.to, Route::IdentityCapture);
                assert_eq!(
                    t.advisory.map(|a| a.message),
                    Some(IDENTITY_REQUIRED_MESSAGE.to_string())
                );
            }
            other => panic!("expected redirect, got {}", other.type_name()),
        }
        assert_eq!(source.calls(), 0);
        assert!(render(&screen).trim().is_empty());
        assert!(screen.keybindings().is_empty());
    }

    #[test]
    fn authorized_mount_issues_one_fetch() {
        let store = authorized_store();
        let source = Arc::new(StaticItemSource::ok(vec![]));
        let (screen, cmd) = mount(&store, source.clone());
        assert!(screen.gate().is_authorized());
        let Cmd::Task(spec, task) = cmd else {
            panic!("expected a fetch task");
        };
        assert_eq!(spec.name.as_deref(), Some(FETCH_TASK));
        match task() {
            AppMsg::ItemsLoaded { mount, result } => {
                assert_eq!(mount, MountId(1));
                assert_eq!(result, Ok(vec![]));
            }
            _ => panic!("expected items"),
        }
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn shows_headings_while_loading() {
        let store = authorized_store();
        let (screen, _) = mount(&store, Arc::new(StaticItemSource::ok(vec![])));
        let text = render(&screen);
        assert!(text.contains(TABLE_HEADING));
        assert!(text.contains(TREE_HEADING));
        assert!(text.contains("Loading…"));
        assert!(text.contains("▸ Human Resources"));
    }

    #[test]
    fn tree_keys_need_tree_focus() {
        let store = authorized_store();
        let (mut screen, _) = mount(&store, Arc::new(StaticItemSource::ok(vec![])));
        screen.update(&Event::key(KeyCode::Enter));
        assert!(!screen.selector().is_expanded(DepartmentId(1)));

        screen.update(&Event::key(KeyCode::Tab));
        assert_eq!(screen.focus(), DetailFocus::Tree);
        screen.update(&Event::key(KeyCode::Enter));
        assert!(screen.selector().is_expanded(DepartmentId(1)));
        screen.update(&Event::key(KeyCode::Down));
        screen.update(&Event::key(KeyCode::Char(' ')));
        assert!(screen.selector().is_selected(SubDepartmentId(1)));
        assert!(render(&screen).contains("[x] Recruitment"));
    }

    #[test]
    fn q_quits() {
        let store = authorized_store();
        let (mut screen, _) = mount(&store, Arc::new(StaticItemSource::ok(vec![])));
        assert!(matches!(
            screen.update(&Event::key(KeyCode::Char('q'))),
            Cmd::Quit
        ));
    }
}
