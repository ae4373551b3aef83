//! Application state and main event loop.
//!
//! Each screen owns its state. Key handlers on the screens return an
//! [`Action`]; the [`App`] applies it, which is the only place that spawns
//! requests or changes screen.

use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info};

use repograph_core::config::SearchConfig;
use repograph_core::lifecycle::{Confirmed, Deleted, Field};
use repograph_core::model::AvailableQuery;
use repograph_core::query::{Accepted, PendingQuery};
use repograph_core::{
    create_graph, request_delete, Backend, BackendClient, Config, DeleteDialog, GraphCatalog,
    GraphListing, GraphSummary, IssueCategory, IssueReport, IssueSelector, LifecycleError,
    NewGraphForm, QueryDescriptor, ResultPage, Route, SearchSession, ValidationErrors,
};

use super::event::{Event, EventHandler};
use super::ui;

/// The selected tab of the search screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchTab {
    #[default]
    Semantic,
    Named,
}

impl SearchTab {
    pub fn next(self) -> Self {
        match self {
            Self::Semantic => Self::Named,
            Self::Named => Self::Semantic,
        }
    }

    pub fn previous(self) -> Self {
        // Two tabs: previous and next coincide.
        self.next()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Semantic => "Semantic Search",
            Self::Named => "Predefined Queries",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Semantic => 0,
            Self::Named => 1,
        }
    }
}

/// Input mode for text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// A dismissible message shown over the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// What a key press asks the app to do.
#[derive(Debug)]
pub enum Action {
    Navigate(Route),
    Refresh,
    OpenDelete(GraphListing),
    Search(SearchTab, PendingQuery),
    Submit(NewGraphForm),
    Notify(Notification),
    Quit,
}

/// Graph listing.
#[derive(Debug, Clone, Default)]
pub struct GraphsScreen {
    pub selected: usize,
    pub loading: bool,
}

impl GraphsScreen {
    fn handle_key(&mut self, key: KeyEvent, catalog: &GraphCatalog) -> Option<Action> {
        let graphs = catalog.graphs();
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < graphs.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Char('n') => Some(Action::Navigate(Route::NewGraph)),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('d') => graphs
                .get(self.selected)
                .map(|g| Action::OpenDelete(g.clone())),
            KeyCode::Enter => {
                let graph = graphs.get(self.selected)?;
                if graph.status.is_ready() {
                    Some(Action::Navigate(Route::GraphHome(graph.route_name().to_string())))
                } else {
                    Some(Action::Notify(Notification::info(format!(
                        "Graph '{}' is still being built",
                        graph.name
                    ))))
                }
            }
            _ => None,
        }
    }
}

/// Summary of one graph.
#[derive(Debug, Clone)]
pub struct SummaryScreen {
    pub graph: GraphListing,
    pub summary: Option<GraphSummary>,
    pub loading: bool,
}

impl SummaryScreen {
    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let name = self.graph.route_name().to_string();
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('s') | KeyCode::Char('/') => Some(Action::Navigate(Route::Search(name))),
            KeyCode::Char('i') => Some(Action::Navigate(Route::Issues(name))),
            KeyCode::Char('d') => Some(Action::OpenDelete(self.graph.clone())),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => {
                Some(Action::Navigate(Route::Home))
            }
            _ => None,
        }
    }
}

/// Search view with one session per tab.
#[derive(Debug)]
pub struct SearchScreen {
    pub graph: GraphListing,
    pub tab: SearchTab,
    pub input_mode: InputMode,
    pub input: String,
    pub semantic: SearchSession,
    pub named: SearchSession,
    pub queries: Vec<AvailableQuery>,
    pub query_index: usize,
    pub repositories: Vec<String>,
    /// `None` searches every repository.
    pub repository_index: Option<usize>,
    pub loading: bool,
}

impl SearchScreen {
    fn new(graph: GraphListing, config: &SearchConfig) -> Self {
        Self {
            semantic: SearchSession::new(graph.clone(), config.semantic_limit),
            named: SearchSession::new(graph.clone(), config.query_limit),
            graph,
            tab: SearchTab::Semantic,
            input_mode: InputMode::Editing,
            input: String::new(),
            queries: Vec::new(),
            query_index: 0,
            repositories: Vec::new(),
            repository_index: None,
            loading: false,
        }
    }

    pub fn session(&self) -> &SearchSession {
        self.session_for(self.tab)
    }

    pub fn session_for(&self, tab: SearchTab) -> &SearchSession {
        match tab {
            SearchTab::Semantic => &self.semantic,
            SearchTab::Named => &self.named,
        }
    }

    fn session_mut(&mut self, tab: SearchTab) -> &mut SearchSession {
        match tab {
            SearchTab::Semantic => &mut self.semantic,
            SearchTab::Named => &mut self.named,
        }
    }

    pub fn selected_query(&self) -> Option<&AvailableQuery> {
        self.queries.get(self.query_index)
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository_index
            .and_then(|i| self.repositories.get(i))
            .map(String::as_str)
    }

    /// All repositories, then each one in turn.
    fn cycle_repository(&mut self) {
        self.repository_index = match self.repository_index {
            None if !self.repositories.is_empty() => Some(0),
            Some(i) if i + 1 < self.repositories.len() => Some(i + 1),
            _ => None,
        };
    }

    fn submit(&mut self) -> Option<Action> {
        let tab = self.tab;
        let (descriptor, repository) = match tab {
            SearchTab::Semantic => (QueryDescriptor::semantic(self.input.clone()), None),
            SearchTab::Named => {
                let Some(query) = self.selected_query().cloned() else {
                    return Some(Action::Notify(Notification::error(
                        "No predefined queries available",
                    )));
                };
                (
                    QueryDescriptor::Named(query),
                    self.repository().map(str::to_string),
                )
            }
        };

        match self.session_mut(tab).submit(descriptor, repository) {
            Ok(pending) => {
                self.input_mode = InputMode::Normal;
                Some(Action::Search(tab, pending))
            }
            Err(e) => Some(Action::Notify(Notification::error(e.to_string()))),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.input_mode == InputMode::Editing {
            match key.code {
                KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Enter => return self.submit(),
                KeyCode::Char(c) => self.input.push(c),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                _ => {}
            }
            return None;
        }

        let tab = self.tab;
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Esc => Some(Action::Navigate(Route::GraphHome(
                self.graph.route_name().to_string(),
            ))),
            KeyCode::Tab => {
                self.tab = self.tab.next();
                None
            }
            KeyCode::BackTab => {
                self.tab = self.tab.previous();
                None
            }
            KeyCode::Char('i') | KeyCode::Char('/') if tab == SearchTab::Semantic => {
                self.input_mode = InputMode::Editing;
                None
            }
            KeyCode::Char('j') | KeyCode::Down if tab == SearchTab::Named => {
                if self.query_index + 1 < self.queries.len() {
                    self.query_index += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up if tab == SearchTab::Named => {
                self.query_index = self.query_index.saturating_sub(1);
                None
            }
            KeyCode::Char('r') if tab == SearchTab::Named => {
                self.cycle_repository();
                None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Char('n') | KeyCode::Char(']') | KeyCode::Right => self
                .session_mut(tab)
                .next_page()
                .map(|pending| Action::Search(tab, pending)),
            KeyCode::Char('p') | KeyCode::Char('[') | KeyCode::Left => self
                .session_mut(tab)
                .previous_page()
                .map(|pending| Action::Search(tab, pending)),
            _ => None,
        }
    }
}

/// Issue cards plus the detail table of the selected category.
#[derive(Debug)]
pub struct IssuesScreen {
    pub graph: GraphListing,
    pub selector: Option<IssueSelector>,
    /// Card under the cursor.
    pub card: usize,
    pub page: Option<ResultPage>,
    pub loading: bool,
}

impl IssuesScreen {
    fn new(graph: GraphListing) -> Self {
        Self {
            graph,
            selector: None,
            card: 0,
            page: None,
            loading: true,
        }
    }

    pub fn focused_category(&self) -> IssueCategory {
        IssueCategory::ALL[self.card.min(IssueCategory::ALL.len() - 1)]
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::Esc => {
                let selected = self.selector.as_ref().and_then(|s| s.selected());
                if selected.is_some() {
                    if let Some(selector) = self.selector.as_mut() {
                        selector.clear();
                    }
                    self.page = None;
                    return None;
                }
                return Some(Action::Navigate(Route::GraphHome(
                    self.graph.route_name().to_string(),
                )));
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.card = self.card.saturating_sub(1);
                return None;
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.card = (self.card + 1).min(IssueCategory::ALL.len() - 1);
                return None;
            }
            _ => {}
        }

        let category = self.focused_category();
        let selector = self.selector.as_mut()?;
        match key.code {
            KeyCode::Enter => {
                let interactive = selector
                    .report()
                    .cards()
                    .get(category.index())
                    .is_some_and(|c| c.is_interactive());
                // Healthy categories have no detail table.
                if interactive {
                    self.page = selector.select_category(category);
                }
            }
            KeyCode::Char('n') | KeyCode::Char(']') => {
                if let Some(page) = selector.next_page() {
                    self.page = Some(page);
                }
            }
            KeyCode::Char('p') | KeyCode::Char('[') => {
                if let Some(page) = selector.previous_page() {
                    self.page = Some(page);
                }
            }
            _ => {}
        }
        None
    }
}

/// New graph form. Files are entered as a list of paths separated by
/// whitespace or commas.
#[derive(Debug, Clone)]
pub struct NewGraphScreen {
    pub name: String,
    pub description: String,
    pub files: String,
    pub focus: Field,
    pub errors: ValidationErrors,
    pub submitting: bool,
}

impl Default for NewGraphScreen {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            files: String::new(),
            focus: Field::Name,
            errors: ValidationErrors::default(),
            submitting: false,
        }
    }
}

impl NewGraphScreen {
    pub fn form(&self) -> NewGraphForm {
        let files = self
            .files
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
        NewGraphForm::new(self.name.clone(), self.description.clone(), files)
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Description => &self.description,
            Field::Files => &self.files,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Name => &mut self.name,
            Field::Description => &mut self.description,
            Field::Files => &mut self.files,
        }
    }

    fn next_field(&mut self) {
        self.focus = match self.focus {
            Field::Name => Field::Description,
            Field::Description => Field::Files,
            Field::Files => Field::Name,
        };
    }

    fn previous_field(&mut self) {
        self.focus = match self.focus {
            Field::Name => Field::Files,
            Field::Description => Field::Name,
            Field::Files => Field::Description,
        };
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.submitting {
            return None;
        }
        match key.code {
            KeyCode::Esc => return Some(Action::Navigate(Route::Home)),
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.previous_field(),
            KeyCode::Enter => {
                let form = self.form();
                self.errors = form.validate();
                if self.errors.is_empty() {
                    self.submitting = true;
                    return Some(Action::Submit(form));
                }
            }
            KeyCode::Char(c) => self.focused_mut().push(c),
            KeyCode::Backspace => {
                self.focused_mut().pop();
            }
            _ => {}
        }
        None
    }
}

/// The screen on display.
#[derive(Debug)]
pub enum Screen {
    Graphs(GraphsScreen),
    Summary(SummaryScreen),
    Search(Box<SearchScreen>),
    Issues(IssuesScreen),
    NewGraph(NewGraphScreen),
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Screen::Graphs(_) => Route::Home,
            Screen::NewGraph(_) => Route::NewGraph,
            Screen::Summary(s) => Route::GraphHome(s.graph.route_name().to_string()),
            Screen::Search(s) => Route::Search(s.graph.route_name().to_string()),
            Screen::Issues(s) => Route::Issues(s.graph.route_name().to_string()),
        }
    }

    /// Whether a request is outstanding for this screen.
    pub fn is_loading(&self) -> bool {
        match self {
            Screen::Graphs(s) => s.loading,
            Screen::Summary(s) => s.loading,
            Screen::Search(s) => s.loading,
            Screen::Issues(s) => s.loading,
            Screen::NewGraph(s) => s.submitting,
        }
    }
}

/// Main application state.
pub struct App {
    /// Configuration
    pub config: Config,
    backend: Arc<BackendClient>,
    /// Latest graph listing
    pub catalog: GraphCatalog,
    /// Current screen
    pub screen: Screen,
    /// Delete confirmation, shown over the current screen
    pub delete_dialog: Option<DeleteDialog>,
    pub notification: Option<Notification>,
    /// Message shown while a blocking operation runs
    pub busy: Option<String>,
    pub should_quit: bool,
    /// Advances on every tick; drives the loading indicator
    pub tick: usize,
    tx: mpsc::UnboundedSender<Event>,
    /// Route to open once the next listing arrives
    pending_route: Option<Route>,
}

impl App {
    /// Create a new app instance. `initial_graph` is opened once the
    /// listing has loaded.
    pub fn new(
        config: Config,
        backend: Arc<BackendClient>,
        tx: mpsc::UnboundedSender<Event>,
        initial_graph: Option<String>,
    ) -> Self {
        Self {
            config,
            backend,
            catalog: GraphCatalog::default(),
            screen: Screen::Graphs(GraphsScreen::default()),
            delete_dialog: None,
            notification: None,
            busy: None,
            should_quit: false,
            tick: 0,
            tx,
            pending_route: initial_graph.map(Route::GraphHome),
        }
    }

    /// Run the main event loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        mut events: EventHandler,
    ) -> Result<()> {
        self.navigate(Route::Home);

        loop {
            terminal.draw(|frame| ui::render(self, frame))?;

            match events.next().await {
                Some(event) => self.handle_event(event),
                None => break,
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    /// Replace the screen with the one for `route`, starting its loads.
    pub fn navigate(&mut self, route: Route) {
        debug!(%route, "navigate");
        self.screen = match route {
            Route::Home => {
                self.spawn_refresh();
                Screen::Graphs(GraphsScreen {
                    selected: 0,
                    loading: true,
                })
            }
            Route::NewGraph => Screen::NewGraph(NewGraphScreen::default()),
            Route::GraphHome(name) => {
                let graph = match self.catalog.require(&name) {
                    Ok(graph) => graph.clone(),
                    Err(e) => return self.notify(Notification::error(e.to_string())),
                };
                let loading = self.spawn_summary(&graph);
                Screen::Summary(SummaryScreen {
                    graph,
                    summary: None,
                    loading,
                })
            }
            Route::Search(name) => {
                let graph = match self.catalog.ensure_ready(&name) {
                    Ok(graph) => graph.clone(),
                    Err(e) => return self.notify(Notification::error(e.to_string())),
                };
                self.spawn_search_options(&graph);
                Screen::Search(Box::new(SearchScreen::new(graph, &self.config.search)))
            }
            Route::Issues(name) => {
                let graph = match self.catalog.ensure_ready(&name) {
                    Ok(graph) => graph.clone(),
                    Err(e) => return self.notify(Notification::error(e.to_string())),
                };
                self.spawn_issues(&graph);
                Screen::Issues(IssuesScreen::new(graph))
            }
        };
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Navigate(route) => self.navigate(route),
            Action::Refresh => {
                if let Screen::Graphs(screen) = &mut self.screen {
                    screen.loading = true;
                }
                self.spawn_refresh();
            }
            Action::OpenDelete(graph) => {
                let mut dialog = DeleteDialog::new(graph);
                dialog.open();
                self.delete_dialog = Some(dialog);
            }
            Action::Search(tab, pending) => {
                if let Screen::Search(screen) = &mut self.screen {
                    screen.loading = true;
                }
                self.spawn_search(tab, pending);
            }
            Action::Submit(form) => self.spawn_create(form),
            Action::Notify(notification) => self.notify(notification),
            Action::Quit => self.should_quit = true,
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Tick => self.tick = self.tick.wrapping_add(1),
            Event::Listing(update) => self.apply_listing(update.graphs),
            Event::GraphsLoaded(result) => {
                if let Screen::Graphs(screen) = &mut self.screen {
                    screen.loading = false;
                }
                match result {
                    Ok(graphs) => {
                        self.apply_listing(graphs);
                        if let Some(route) = self.pending_route.take() {
                            self.navigate(route);
                        }
                    }
                    Err(e) => self.notify(Notification::error(e.to_string())),
                }
            }
            Event::SummaryLoaded { graph, result } => {
                let Screen::Summary(screen) = &mut self.screen else {
                    return;
                };
                if screen.graph.route_name() != graph {
                    return;
                }
                screen.loading = false;
                match result {
                    Ok(summary) => screen.summary = Some(summary),
                    Err(e) => self.notify(Notification::error(e.to_string())),
                }
            }
            Event::SearchOptionsLoaded { graph, result } => {
                let Screen::Search(screen) = &mut self.screen else {
                    return;
                };
                if screen.graph.route_name() != graph {
                    return;
                }
                match result {
                    Ok((queries, repositories)) => {
                        screen.queries = queries;
                        screen.query_index = 0;
                        screen.repositories = repositories;
                        screen.repository_index = None;
                    }
                    Err(e) => self.notify(Notification::error(e.to_string())),
                }
            }
            Event::SearchLoaded {
                tab,
                pending,
                result,
            } => {
                let Screen::Search(screen) = &mut self.screen else {
                    return;
                };
                if screen.graph.id != pending.graph.id {
                    return;
                }
                match screen.session_mut(tab).accept(&pending, result) {
                    Ok(Accepted::Displayed) => screen.loading = false,
                    Ok(Accepted::Stale) => {}
                    Err(e) => {
                        screen.loading = false;
                        self.notify(Notification::error(e.to_string()));
                    }
                }
            }
            Event::IssuesLoaded { graph, result } => {
                let page_size = self.config.issues.page_size;
                let Screen::Issues(screen) = &mut self.screen else {
                    return;
                };
                if screen.graph.route_name() != graph {
                    return;
                }
                screen.loading = false;
                match result {
                    Ok(report) => screen.selector = Some(IssueSelector::new(report, page_size)),
                    Err(e) => self.notify(Notification::error(e.to_string())),
                }
            }
            Event::GraphCreated(result) => self.handle_created(result),
            Event::GraphDeleted(result) => self.handle_deleted(result),
        }
    }

    fn handle_created(&mut self, result: Result<Route, LifecycleError>) {
        match result {
            Ok(route) => {
                info!(%route, "graph submitted");
                self.notify(Notification::info(
                    "Graph submitted. It will be listed as Pending until built.",
                ));
                // The new graph is unknown until the listing is reloaded.
                self.pending_route = Some(route);
                self.navigate(Route::Home);
            }
            Err(LifecycleError::Invalid(errors)) => {
                if let Screen::NewGraph(screen) = &mut self.screen {
                    screen.errors = errors;
                    screen.submitting = false;
                }
            }
            Err(e) => {
                if let Screen::NewGraph(screen) = &mut self.screen {
                    screen.submitting = false;
                }
                self.notify(Notification::error(e.to_string()));
            }
        }
    }

    /// Replace the listing, announcing graphs that finished building.
    fn apply_listing(&mut self, graphs: Vec<GraphListing>) {
        let ready = self.catalog.replace(graphs);
        if !ready.is_empty() {
            self.notify(Notification::info(format!(
                "Graph ready: {}",
                ready.join(", ")
            )));
        }

        match &mut self.screen {
            Screen::Graphs(screen) => {
                let len = self.catalog.len();
                screen.selected = screen.selected.min(len.saturating_sub(1));
            }
            Screen::Summary(screen) if !screen.graph.status.is_ready() => {
                // Load the summary once a building graph becomes ready.
                let Some(fresh) = self.catalog.get(&screen.graph.id).cloned() else {
                    return;
                };
                if fresh.status.is_ready() {
                    screen.graph = fresh.clone();
                    screen.loading = true;
                    self.spawn_summary(&fresh);
                }
            }
            _ => {}
        }
    }

    /// Handle a key event.
    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.delete_dialog.is_some() {
            self.handle_dialog_key(key);
            return;
        }

        if self.notification.is_some() && key.code == KeyCode::Esc {
            self.notification = None;
            return;
        }

        let action = match &mut self.screen {
            Screen::Graphs(screen) => screen.handle_key(key, &self.catalog),
            Screen::Summary(screen) => screen.handle_key(key),
            Screen::Search(screen) => screen.handle_key(key),
            Screen::Issues(screen) => screen.handle_key(key),
            Screen::NewGraph(screen) => screen.handle_key(key),
        };

        if let Some(action) = action {
            self.apply(action);
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let Some(mut dialog) = self.delete_dialog.take() else {
                    return;
                };
                match dialog.confirm() {
                    Ok(confirmed) => {
                        self.busy = Some(format!("Deleting graph '{}'...", confirmed.graph().name));
                        self.spawn_delete(confirmed);
                    }
                    Err(e) => self.notify(Notification::error(e.to_string())),
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                if let Some(dialog) = self.delete_dialog.as_mut() {
                    dialog.cancel();
                }
                self.delete_dialog = None;
            }
            _ => {}
        }
    }

    /// The catalog only changes here, once the backend confirmed the delete.
    fn handle_deleted(&mut self, result: Result<Deleted, LifecycleError>) {
        self.busy = None;
        match result {
            Ok(deleted) => {
                let name = deleted.graph().name.clone();
                let route = deleted.apply(&mut self.catalog);
                self.navigate(route);
                self.notify(Notification::info(format!("Deleted graph '{}'", name)));
            }
            Err(e) => self.notify(Notification::error(e.to_string())),
        }
    }

    fn spawn_refresh(&self) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.list_graphs().await;
            let _ = tx.send(Event::GraphsLoaded(result));
        });
    }

    /// Returns whether a request was started; graphs still building have
    /// no summary yet.
    fn spawn_summary(&self, graph: &GraphListing) -> bool {
        if !graph.status.is_ready() {
            return false;
        }
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let name = graph.route_name().to_string();
        tokio::spawn(async move {
            let result = backend.summary(&name).await;
            let _ = tx.send(Event::SummaryLoaded {
                graph: name,
                result,
            });
        });
        true
    }

    fn spawn_search_options(&self, graph: &GraphListing) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let name = graph.route_name().to_string();
        tokio::spawn(async move {
            let result = futures::try_join!(
                backend.available_queries(&name),
                backend.repositories(&name)
            );
            let _ = tx.send(Event::SearchOptionsLoaded {
                graph: name,
                result,
            });
        });
    }

    fn spawn_search(&self, tab: SearchTab, pending: PendingQuery) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = pending.run(backend).await;
            let _ = tx.send(Event::SearchLoaded {
                tab,
                pending,
                result,
            });
        });
    }

    fn spawn_issues(&self, graph: &GraphListing) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let graph = graph.clone();
        tokio::spawn(async move {
            let result = IssueReport::fetch(&backend, &graph).await;
            let _ = tx.send(Event::IssuesLoaded {
                graph: graph.route_name().to_string(),
                result,
            });
        });
    }

    fn spawn_create(&self, form: NewGraphForm) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = create_graph(&backend, &form).await;
            let _ = tx.send(Event::GraphCreated(result));
        });
    }

    fn spawn_delete(&self, confirmed: Confirmed) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = request_delete(&backend, confirmed).await;
            let _ = tx.send(Event::GraphDeleted(result));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use repograph_core::model::{Row, TabularResult};
    use repograph_core::GraphStatus;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn listing(id: &str, name: &str, status: GraphStatus) -> GraphListing {
        GraphListing {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            created: Utc::now(),
            status,
            neo4j_name: None,
        }
    }

    fn app(base_url: &str) -> (App, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = Arc::new(BackendClient::new(base_url).unwrap());
        (App::new(Config::default(), backend, tx, None), rx)
    }

    #[test]
    fn test_search_tab_cycle() {
        assert_eq!(SearchTab::Semantic.next(), SearchTab::Named);
        assert_eq!(SearchTab::Named.next(), SearchTab::Semantic);
        assert_eq!(SearchTab::Named.previous(), SearchTab::Semantic);
        assert_eq!(SearchTab::Named.index(), 1);
    }

    #[test]
    fn test_pending_graph_is_not_opened() {
        let catalog = GraphCatalog::new(vec![listing("1", "repo1", GraphStatus::Pending)]);
        let mut screen = GraphsScreen::default();
        let action = screen.handle_key(key(KeyCode::Enter), &catalog);
        assert!(matches!(action, Some(Action::Notify(_))));

        let catalog = GraphCatalog::new(vec![listing("1", "repo1", GraphStatus::Created)]);
        let action = screen.handle_key(key(KeyCode::Enter), &catalog);
        assert!(matches!(
            action,
            Some(Action::Navigate(Route::GraphHome(ref name))) if name == "repo1"
        ));
    }

    #[test]
    fn test_new_graph_form_parses_file_list() {
        let screen = NewGraphScreen {
            name: "repo1".to_string(),
            description: "d".to_string(),
            files: "a.zip, b.zip  c.zip".to_string(),
            ..Default::default()
        };
        let form = screen.form();
        assert_eq!(
            form.files,
            vec![PathBuf::from("a.zip"), PathBuf::from("b.zip"), PathBuf::from("c.zip")]
        );
    }

    #[test]
    fn test_new_graph_enter_with_empty_form_shows_errors() {
        let mut screen = NewGraphScreen::default();
        assert!(screen.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(screen.errors.len(), 3);
        assert!(!screen.submitting);
    }

    #[test]
    fn test_blank_semantic_query_is_rejected() {
        let config = Config::default();
        let mut screen = SearchScreen::new(listing("1", "repo1", GraphStatus::Created), &config.search);
        let action = screen.handle_key(key(KeyCode::Enter));
        match action {
            Some(Action::Notify(n)) => assert_eq!(n.message, "Please enter a query"),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_repository_filter_cycles_back_to_all() {
        let config = Config::default();
        let mut screen = SearchScreen::new(listing("1", "repo1", GraphStatus::Created), &config.search);
        screen.repositories = vec!["a".to_string(), "b".to_string()];
        screen.cycle_repository();
        assert_eq!(screen.repository(), Some("a"));
        screen.cycle_repository();
        assert_eq!(screen.repository(), Some("b"));
        screen.cycle_repository();
        assert_eq!(screen.repository(), None);
    }

    #[test]
    fn test_healthy_issue_card_is_not_selectable() {
        let empty = TabularResult::default();
        let missing = TabularResult {
            columns: vec!["function".to_string()],
            data: vec![Row(vec![json!("f")])],
            size: None,
        };
        let report = IssueReport::new([empty.clone(), missing, empty.clone(), empty]);

        let mut screen = IssuesScreen::new(listing("1", "repo1", GraphStatus::Created));
        screen.selector = Some(IssueSelector::new(report, 10));

        screen.handle_key(key(KeyCode::Enter));
        assert!(screen.page.is_none());

        screen.handle_key(key(KeyCode::Right));
        screen.handle_key(key(KeyCode::Enter));
        assert_eq!(screen.page.as_ref().map(|p| p.len()), Some(1));

        // Esc first clears the selection, then leaves the screen.
        assert!(screen.handle_key(key(KeyCode::Esc)).is_none());
        assert!(screen.page.is_none());
        assert!(matches!(
            screen.handle_key(key(KeyCode::Esc)),
            Some(Action::Navigate(Route::GraphHome(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_through_dialog() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/graph/repo1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, mut rx) = app(&server.uri());
        app.catalog = GraphCatalog::new(vec![
            listing("1", "repo1", GraphStatus::Created),
            listing("2", "repo2", GraphStatus::Created),
        ]);
        let repo1 = app.catalog.graphs().iter().position(|g| g.name == "repo1").unwrap();
        app.screen = Screen::Graphs(GraphsScreen {
            selected: repo1,
            loading: false,
        });

        app.handle_key_event(key(KeyCode::Char('d')));
        assert!(app.delete_dialog.as_ref().is_some_and(|d| d.is_open()));

        app.handle_key_event(key(KeyCode::Char('y')));
        assert!(app.delete_dialog.is_none());
        // The request runs in the background; nothing changes until it answers.
        assert!(app.busy.is_some());
        assert_eq!(app.catalog.len(), 2);

        let event = rx.recv().await.unwrap();
        app.handle_event(event);
        assert!(app.busy.is_none());
        assert_eq!(app.catalog.len(), 1);
        assert!(app.catalog.get("repo1").is_none());
        assert_eq!(app.screen.route(), Route::Home);
        assert_eq!(
            app.notification.as_ref().map(|n| n.kind),
            Some(NotificationKind::Info)
        );
    }

    #[tokio::test]
    async fn test_cancelled_dialog_deletes_nothing() {
        let (mut app, _rx) = app("http://127.0.0.1:9");
        app.catalog = GraphCatalog::new(vec![listing("1", "repo1", GraphStatus::Created)]);

        app.apply(Action::OpenDelete(listing("1", "repo1", GraphStatus::Created)));
        app.handle_key_event(key(KeyCode::Esc));
        assert!(app.delete_dialog.is_none());
        assert!(app.busy.is_none());
        assert_eq!(app.catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_delete_keeps_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/graph/repo1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, mut rx) = app(&server.uri());
        app.catalog = GraphCatalog::new(vec![listing("1", "repo1", GraphStatus::Created)]);

        app.apply(Action::OpenDelete(listing("1", "repo1", GraphStatus::Created)));
        app.handle_key_event(key(KeyCode::Enter));

        // Keys keep being handled while the request is in flight.
        app.handle_key_event(key(KeyCode::Char('j')));

        let event = rx.recv().await.unwrap();
        app.handle_event(event);
        assert_eq!(app.catalog.len(), 1);
        assert!(app.busy.is_none());
        assert_eq!(
            app.notification.as_ref().map(|n| n.kind),
            Some(NotificationKind::Error)
        );
    }

    #[tokio::test]
    async fn test_search_route_requires_ready_graph() {
        let (mut app, _rx) = app("http://127.0.0.1:9");
        app.catalog = GraphCatalog::new(vec![listing("1", "repo1", GraphStatus::Pending)]);

        app.navigate(Route::Search("repo1".to_string()));
        assert_eq!(app.screen.route(), Route::Home);
        assert_eq!(
            app.notification.as_ref().map(|n| n.kind),
            Some(NotificationKind::Error)
        );
    }

    #[tokio::test]
    async fn test_listing_update_announces_ready_graph() {
        let (mut app, _rx) = app("http://127.0.0.1:9");
        app.apply_listing(vec![listing("1", "repo1", GraphStatus::Pending)]);
        assert!(app.notification.is_none());

        app.apply_listing(vec![listing("1", "repo1", GraphStatus::Created)]);
        assert_eq!(
            app.notification.as_ref().map(|n| n.message.as_str()),
            Some("Graph ready: repo1")
        );
    }
}
