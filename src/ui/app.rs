use crate::export::export_csv;
use crate::model::{ProjectHandle, Table};
use crate::project::Explorer;
use crate::source::ModelSource;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};
use std::cell::Cell;
use std::path::PathBuf;
use tracing::warn;

/// Columns shown side by side in the table view.
pub const MAX_VISIBLE_COLUMNS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Dashboard,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPanel {
    Categories,
    Parameters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterChoice {
    pub name: String,
    pub selected: bool,
}

pub struct App<'a, S> {
    pub explorer: &'a Explorer<S>,
    pub handle: ProjectHandle,
    pub categories: Vec<String>,
    pub parameters: Vec<ParameterChoice>,
    pub table: Option<Table>,
    pub status: Option<String>,
    pub view: View,
    pub focus_panel: FocusPanel,
    pub selected_category: usize,
    pub selected_parameter: usize,
    pub parameters_scroll_offset: usize,
    /// Parameter rows that fit the panel, recorded on each draw.
    pub parameters_page: Cell<usize>,
    pub table_row_offset: usize,
    pub table_column_offset: usize,
    pub should_quit: bool,
}

impl<'a, S: ModelSource> App<'a, S> {
    /// Loads the project's categories and the parameters of the first one.
    pub fn new(explorer: &'a Explorer<S>, handle: ProjectHandle) -> Result<Self> {
        let categories = explorer.categories(&handle)?;
        let mut app = Self {
            explorer,
            handle,
            categories,
            parameters: Vec::new(),
            table: None,
            status: None,
            view: View::Dashboard,
            focus_panel: FocusPanel::Categories,
            selected_category: 0,
            selected_parameter: 0,
            parameters_scroll_offset: 0,
            parameters_page: Cell::new(1),
            table_row_offset: 0,
            table_column_offset: 0,
            should_quit: false,
        };
        app.load_parameters();
        Ok(app)
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => super::dashboard::draw_dashboard(frame, self),
            View::Table => super::dashboard::draw_table_view(frame, self),
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }
            self.handle_key(key.code);
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match self.view {
            View::Dashboard => self.handle_dashboard_keys(code),
            View::Table => self.handle_table_keys(code),
        }
    }

    fn handle_dashboard_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.navigate_down(),
            KeyCode::Left | KeyCode::Char('h') => self.focus_panel = FocusPanel::Categories,
            KeyCode::Right | KeyCode::Char('l') => self.focus_panel = FocusPanel::Parameters,
            KeyCode::Char(' ') => self.toggle_parameter(),
            KeyCode::Char('a') => self.toggle_all_parameters(),
            KeyCode::Enter => self.enter_table_view(),
            _ => {}
        }
    }

    fn handle_table_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => {
                self.view = View::Dashboard;
                self.table_row_offset = 0;
                self.table_column_offset = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.table_row_offset = self.table_row_offset.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let rows = self.table.as_ref().map_or(0, Table::row_count);
                if self.table_row_offset < rows.saturating_sub(1) {
                    self.table_row_offset += 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.table_column_offset = self.table_column_offset.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let columns = self.table.as_ref().map_or(0, Table::column_count);
                if self.table_column_offset + MAX_VISIBLE_COLUMNS < columns {
                    self.table_column_offset += 1;
                }
            }
            KeyCode::Char('c') => self.export_table(),
            _ => {}
        }
    }

    fn navigate_up(&mut self) {
        match self.focus_panel {
            FocusPanel::Categories => {
                if self.selected_category > 0 {
                    self.selected_category -= 1;
                    self.load_parameters();
                }
            }
            FocusPanel::Parameters => {
                if self.selected_parameter > 0 {
                    self.selected_parameter -= 1;
                    if self.selected_parameter < self.parameters_scroll_offset {
                        self.parameters_scroll_offset = self.selected_parameter;
                    }
                }
            }
        }
    }

    fn navigate_down(&mut self) {
        match self.focus_panel {
            FocusPanel::Categories => {
                if self.selected_category < self.categories.len().saturating_sub(1) {
                    self.selected_category += 1;
                    self.load_parameters();
                }
            }
            FocusPanel::Parameters => {
                if self.selected_parameter < self.parameters.len().saturating_sub(1) {
                    self.selected_parameter += 1;
                    let page = self.parameters_page.get().max(1);
                    if self.selected_parameter >= self.parameters_scroll_offset + page {
                        self.parameters_scroll_offset = self.selected_parameter + 1 - page;
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn current_category(&self) -> Option<&str> {
        self.categories.get(self.selected_category).map(String::as_str)
    }

    /// Reloads the parameter list for the selected category, all selected.
    fn load_parameters(&mut self) {
        self.parameters.clear();
        self.selected_parameter = 0;
        self.parameters_scroll_offset = 0;
        self.table = None;
        self.status = None;

        let Some(category) = self.current_category().map(str::to_string) else {
            return;
        };
        match self.explorer.parameters(&self.handle, &category) {
            Ok(names) => {
                self.parameters = names
                    .into_iter()
                    .map(|name| ParameterChoice {
                        name,
                        selected: true,
                    })
                    .collect();
            }
            Err(e) => {
                warn!(category = %category, error = %e, "cannot list parameters");
                self.status = Some(e.to_string());
            }
        }
    }

    fn toggle_parameter(&mut self) {
        if self.focus_panel != FocusPanel::Parameters {
            return;
        }
        if let Some(choice) = self.parameters.get_mut(self.selected_parameter) {
            choice.selected = !choice.selected;
        }
    }

    fn toggle_all_parameters(&mut self) {
        let select = !self.parameters.iter().all(|p| p.selected);
        for choice in &mut self.parameters {
            choice.selected = select;
        }
    }

    #[must_use]
    pub fn selected_parameters(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.selected)
            .map(|p| p.name.clone())
            .collect()
    }

    fn enter_table_view(&mut self) {
        let Some(category) = self.current_category().map(str::to_string) else {
            return;
        };
        let selected = self.selected_parameters();
        if selected.is_empty() {
            self.status = Some("Select at least one parameter".to_string());
            return;
        }

        match self.explorer.table(&self.handle, &category, Some(&selected)) {
            Ok(table) => {
                self.table = Some(table);
                self.status = None;
                self.view = View::Table;
                self.table_row_offset = 0;
                self.table_column_offset = 0;
            }
            Err(e) => {
                warn!(category = %category, error = %e, "cannot build table");
                self.status = Some(e.to_string());
            }
        }
    }

    /// File name the table view exports to.
    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        let category = self.current_category().unwrap_or("table");
        let stem: String = category
            .trim_start_matches('@')
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        PathBuf::from(format!("{stem}.csv"))
    }

    fn export_table(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let path = self.export_path();
        self.status = Some(match export_csv(table, &path) {
            Ok(()) => format!("Exported {}", path.display()),
            Err(e) => e.to_string(),
        });
    }

    /// Whether the table view hides columns beyond the visible window.
    #[must_use]
    pub fn has_hidden_columns(&self) -> bool {
        self.table
            .as_ref()
            .is_some_and(|t| t.column_count() > MAX_VISIBLE_COLUMNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::model::RawNode;
    use crate::project::{CommitCache, ProjectRegistry};
    use crate::source::{CommitLocator, Session};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;
    use url::Url;

    struct StaticSource(RawNode);

    impl ModelSource for StaticSource {
        fn authenticate(&self, server: &Url, _token: Option<&str>) -> Result<Session, SourceError> {
            Ok(Session {
                server: server.clone(),
                token: "t".to_string(),
                user: None,
            })
        }

        fn resolve_commit(
            &self,
            _locator: &CommitLocator,
            _session: &Session,
        ) -> Result<String, SourceError> {
            Ok("root".to_string())
        }

        fn receive(&self, _: &str, _: &str, _: &Session) -> Result<RawNode, SourceError> {
            Ok(self.0.clone())
        }
    }

    fn explorer() -> Explorer<StaticSource> {
        let root = RawNode::from_json(json!({
            "@Wände": [{
                "id": "w1",
                "speckle_type": "Objects.BuiltElements.Wall",
                "parameters": {
                    "a": { "name": "Name", "value": "W1" },
                    "b": { "name": "Breite", "value": 0.3 },
                    "c": { "name": "Höhe", "value": 2.75 },
                },
            }],
            "@Türen": [{ "id": "d1", "speckle_type": "Objects.BuiltElements.Door" }],
        }));
        Explorer::new(
            StaticSource(root),
            ProjectRegistry::new(),
            Arc::new(CommitCache::new()),
        )
    }

    fn handle() -> ProjectHandle {
        ProjectHandle::new("Haus", "https://speckle.xyz/streams/s1")
    }

    #[test]
    fn starts_with_first_category_parameters_selected() {
        let explorer = explorer();
        let app = App::new(&explorer, handle()).unwrap();

        assert_eq!(app.categories, vec!["@Wände", "@Türen"]);
        assert_eq!(app.selected_parameters(), vec!["Breite", "Höhe", "Name"]);
    }

    #[test]
    fn toggling_only_works_on_parameter_panel() {
        let explorer = explorer();
        let mut app = App::new(&explorer, handle()).unwrap();

        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.selected_parameters().len(), 3);

        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.selected_parameters(), vec!["Höhe", "Name"]);

        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.selected_parameters().len(), 3);
    }

    #[test]
    fn enter_builds_cleaned_table() {
        let explorer = explorer();
        let mut app = App::new(&explorer, handle()).unwrap();

        app.handle_key(KeyCode::Enter);

        assert_eq!(app.view, View::Table);
        let table = app.table.as_ref().unwrap();
        assert_eq!(table.column_names(), vec!["Name", "Breite", "Höhe"]);

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.view, View::Dashboard);
    }

    #[test]
    fn category_without_parameters_shows_status() {
        let explorer = explorer();
        let mut app = App::new(&explorer, handle()).unwrap();

        app.handle_key(KeyCode::Down);

        assert_eq!(app.current_category(), Some("@Türen"));
        assert!(app.parameters.is_empty());
        let status = app.status.as_deref().unwrap();
        assert!(status.contains("no authoring-tool parameters"));

        app.handle_key(KeyCode::Enter);
        assert_eq!(app.view, View::Dashboard);
    }

    #[test]
    fn parameter_window_keeps_its_position_when_moving_back_up() {
        let explorer = explorer();
        let mut app = App::new(&explorer, handle()).unwrap();
        app.parameters_page.set(2);

        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.parameters_scroll_offset, 0);
        app.handle_key(KeyCode::Down);
        assert_eq!(
            (app.selected_parameter, app.parameters_scroll_offset),
            (2, 1)
        );

        app.handle_key(KeyCode::Up);
        assert_eq!(
            (app.selected_parameter, app.parameters_scroll_offset),
            (1, 1)
        );
        app.handle_key(KeyCode::Up);
        assert_eq!(
            (app.selected_parameter, app.parameters_scroll_offset),
            (0, 0)
        );
    }

    #[test]
    fn export_path_is_sanitised() {
        let explorer = explorer();
        let app = App::new(&explorer, handle()).unwrap();

        assert_eq!(app.export_path(), PathBuf::from("Wände.csv"));
    }
}
