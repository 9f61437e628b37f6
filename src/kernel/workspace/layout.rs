//! Rows of tabs and the current focus.

use crate::kernel::services::ports::editor::Position;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl TabId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    pub row_id: RowId,
    pub file_path: PathBuf,
    /// Shown as a file outside the workspace tree (e.g. the settings file).
    pub external: bool,
    pub size: Option<u32>,
    pub initial_position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: RowId,
    pub tab_ids: Vec<TabId>,
}

/// Arguments for [`TabLayout::add_tab_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTab {
    pub row_id: RowId,
    pub file_path: PathBuf,
    pub external: bool,
    pub size: Option<u32>,
    pub initial_position: Option<Position>,
}

impl NewTab {
    pub fn new(row_id: RowId, file_path: impl Into<PathBuf>) -> Self {
        Self {
            row_id,
            file_path: file_path.into(),
            external: false,
            size: None,
            initial_position: None,
        }
    }

    pub fn external(mut self, external: bool) -> Self {
        self.external = external;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.initial_position = Some(position);
        self
    }
}

/// What row navigation does when there is only one row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SingleRowNavigation {
    /// Keep the current row.
    Stay,
    /// Leave the row view for the overview.
    #[default]
    Overview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowNavigation {
    Row { row: RowId, focus: Option<TabId> },
    Overview,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutInvariantError {
    #[error("layout has no rows")]
    NoRows,
    #[error("current row {0:?} does not exist")]
    DanglingCurrentRow(RowId),
    #[error("no current row")]
    MissingCurrentRow,
    #[error("current tab {0:?} does not exist")]
    DanglingCurrentTab(TabId),
    #[error("tab {tab:?} points at missing row {row:?}")]
    OrphanTab { tab: TabId, row: RowId },
    #[error("tab {tab:?} is listed by {count} rows")]
    TabListing { tab: TabId, count: usize },
    #[error("row {row:?} lists unknown tab {tab:?}")]
    UnknownTabInRow { row: RowId, tab: TabId },
}

#[derive(Debug)]
pub struct TabLayout {
    rows: Vec<Row>,
    tabs: FxHashMap<TabId, Tab>,
    current_tab_id: Option<TabId>,
    current_row_id: Option<RowId>,
    single_row: SingleRowNavigation,
    next_tab_id: u64,
    next_row_id: u64,
}

impl Default for TabLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TabLayout {
    /// A layout with one empty, current row.
    pub fn new() -> Self {
        Self::with_single_row_navigation(SingleRowNavigation::default())
    }

    pub fn with_single_row_navigation(single_row: SingleRowNavigation) -> Self {
        let mut layout = Self {
            rows: Vec::new(),
            tabs: FxHashMap::default(),
            current_tab_id: None,
            current_row_id: None,
            single_row,
            next_tab_id: 1,
            next_row_id: 1,
        };
        layout.ensure_at_least_one_row();
        layout
    }

    fn alloc_tab_id(&mut self) -> TabId {
        let id = TabId::new(self.next_tab_id);
        self.next_tab_id = self.next_tab_id.saturating_add(1);
        id
    }

    fn alloc_row_id(&mut self) -> RowId {
        let id = RowId::new(self.next_row_id);
        self.next_row_id = self.next_row_id.saturating_add(1);
        id
    }

    fn row_index(&self, row_id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == row_id)
    }

    // Queries

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.get(&id)
    }

    /// Tabs in row order, then in each row's tab order.
    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.rows
            .iter()
            .flat_map(|row| row.tab_ids.iter())
            .filter_map(|id| self.tabs.get(id))
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn find_tab_by_path(&self, path: &Path) -> Option<&Tab> {
        self.tabs().find(|tab| tab.file_path == path)
    }

    pub fn current_tab_id(&self) -> Option<TabId> {
        self.current_tab_id
    }

    pub fn current_row_id(&self) -> Option<RowId> {
        self.current_row_id
    }

    pub fn current_tab(&self) -> Option<&Tab> {
        self.current_tab_id.and_then(|id| self.tabs.get(&id))
    }

    pub fn single_row_navigation(&self) -> SingleRowNavigation {
        self.single_row
    }

    pub fn set_single_row_navigation(&mut self, mode: SingleRowNavigation) {
        self.single_row = mode;
    }

    /// Focuses `id` and its row. Unknown ids are ignored.
    pub fn set_current_tab(&mut self, id: TabId) -> bool {
        let Some(row_id) = self.tabs.get(&id).map(|tab| tab.row_id) else {
            return false;
        };
        self.current_tab_id = Some(id);
        self.current_row_id = Some(row_id);
        true
    }

    pub fn set_current_row(&mut self, id: RowId) -> bool {
        if self.row_index(id).is_none() {
            return false;
        }
        self.current_row_id = Some(id);
        true
    }

    // Transitions

    pub fn add_row(&mut self) -> RowId {
        let id = self.alloc_row_id();
        self.rows.push(Row {
            id,
            tab_ids: Vec::new(),
        });
        if self.current_row_id.is_none() {
            self.current_row_id = Some(id);
        }
        id
    }

    pub fn add_tab(
        &mut self,
        row_id: RowId,
        file_path: impl Into<PathBuf>,
        external: bool,
    ) -> TabId {
        self.add_tab_with(NewTab::new(row_id, file_path).external(external))
    }

    /// Appends a tab to `new.row_id`, creating a fresh current row when that row is unknown.
    /// The new tab always becomes current.
    pub fn add_tab_with(&mut self, new: NewTab) -> TabId {
        let index = match self.row_index(new.row_id) {
            Some(index) => index,
            None => {
                let row_id = self.add_row();
                self.current_row_id = Some(row_id);
                self.rows.len() - 1
            }
        };
        let row_id = self.rows[index].id;
        let id = self.alloc_tab_id();
        self.rows[index].tab_ids.push(id);
        self.tabs.insert(
            id,
            Tab {
                id,
                row_id,
                file_path: new.file_path,
                external: new.external,
                size: new.size,
                initial_position: new.initial_position,
            },
        );
        self.current_tab_id = Some(id);
        id
    }

    /// Returns `false` for unknown ids.
    pub fn remove_tab(&mut self, tab_id: TabId) -> bool {
        let Some(tab) = self.tabs.remove(&tab_id) else {
            return false;
        };
        let Some(index) = self.row_index(tab.row_id) else {
            self.ensure_at_least_one_row();
            return true;
        };

        let row = &mut self.rows[index];
        row.tab_ids.retain(|id| *id != tab_id);
        if self.current_tab_id == Some(tab_id) {
            self.current_tab_id = row.tab_ids.first().copied();
        }

        if row.tab_ids.is_empty() && self.rows.len() > 1 {
            self.rows.remove(index);
            if self.current_row_id == Some(tab.row_id) {
                self.current_row_id = None;
            }
        }
        self.ensure_at_least_one_row();
        true
    }

    /// Drops a row and every tab it lists.
    pub fn remove_row(&mut self, row_id: RowId) -> bool {
        let Some(index) = self.row_index(row_id) else {
            return false;
        };
        let row = self.rows.remove(index);
        for tab_id in &row.tab_ids {
            self.tabs.remove(tab_id);
        }
        if self
            .current_tab_id
            .is_some_and(|id| !self.tabs.contains_key(&id))
        {
            self.current_tab_id = None;
        }
        if self.current_row_id == Some(row_id) {
            self.current_row_id = None;
        }
        self.ensure_at_least_one_row();
        true
    }

    /// Restores `rows.len() >= 1` and a resolvable `current_row_id`.
    pub fn ensure_at_least_one_row(&mut self) {
        if self.rows.is_empty() {
            let id = self.add_row();
            self.current_row_id = Some(id);
        }
        let current_valid = self
            .current_row_id
            .is_some_and(|id| self.row_index(id).is_some());
        if !current_valid {
            self.current_row_id = Some(self.rows[0].id);
        }
    }

    pub fn next_tab(&self, tab_id: TabId) -> Option<TabId> {
        self.step_tab(tab_id, true)
    }

    pub fn prev_tab(&self, tab_id: TabId) -> Option<TabId> {
        self.step_tab(tab_id, false)
    }

    fn step_tab(&self, tab_id: TabId, forward: bool) -> Option<TabId> {
        let tab = self.tabs.get(&tab_id)?;
        let row = self.row(tab.row_id)?;
        let len = row.tab_ids.len();
        let index = row.tab_ids.iter().position(|id| *id == tab_id)?;
        let target = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        row.tab_ids.get(target).copied()
    }

    pub fn next_row(&mut self, from: RowId) -> RowNavigation {
        self.step_row(from, true)
    }

    pub fn prev_row(&mut self, from: RowId) -> RowNavigation {
        self.step_row(from, false)
    }

    fn step_row(&mut self, from: RowId, forward: bool) -> RowNavigation {
        let Some(index) = self.row_index(from) else {
            return RowNavigation::None;
        };
        let len = self.rows.len();
        if len == 1 {
            return match self.single_row {
                SingleRowNavigation::Overview => RowNavigation::Overview,
                SingleRowNavigation::Stay => RowNavigation::Row {
                    row: from,
                    focus: self.current_tab_id.filter(|id| {
                        self.tabs.get(id).is_some_and(|tab| tab.row_id == from)
                    }),
                },
            };
        }

        let target = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        let row = &self.rows[target];
        let row_id = row.id;
        let focus = row.tab_ids.first().copied();
        self.current_row_id = Some(row_id);
        if let Some(tab_id) = focus {
            self.current_tab_id = Some(tab_id);
        }
        RowNavigation::Row { row: row_id, focus }
    }

    /// Structural check used by tests and debug assertions.
    pub fn check_invariants(&self) -> Result<(), LayoutInvariantError> {
        if self.rows.is_empty() {
            return Err(LayoutInvariantError::NoRows);
        }
        match self.current_row_id {
            None => return Err(LayoutInvariantError::MissingCurrentRow),
            Some(id) if self.row_index(id).is_none() => {
                return Err(LayoutInvariantError::DanglingCurrentRow(id))
            }
            Some(_) => {}
        }
        if let Some(id) = self.current_tab_id {
            if !self.tabs.contains_key(&id) {
                return Err(LayoutInvariantError::DanglingCurrentTab(id));
            }
        }

        for row in &self.rows {
            for tab in &row.tab_ids {
                if !self.tabs.contains_key(tab) {
                    return Err(LayoutInvariantError::UnknownTabInRow {
                        row: row.id,
                        tab: *tab,
                    });
                }
            }
        }
        for tab in self.tabs.values() {
            let Some(row) = self.row(tab.row_id) else {
                return Err(LayoutInvariantError::OrphanTab {
                    tab: tab.id,
                    row: tab.row_id,
                });
            };
            let in_own_row = row.tab_ids.iter().filter(|id| **id == tab.id).count();
            let total = self
                .rows
                .iter()
                .flat_map(|r| r.tab_ids.iter())
                .filter(|id| **id == tab.id)
                .count();
            if in_own_row != 1 || total != 1 {
                return Err(LayoutInvariantError::TabListing {
                    tab: tab.id,
                    count: total,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/workspace/layout.rs"]
mod tests;
