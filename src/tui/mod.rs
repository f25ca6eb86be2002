//! Interactive terminal UI mirroring the Aura Hub single-page client.
//!
//! The draw loop never blocks on the network: API calls run on spawned
//! tokio tasks and come back over an mpsc channel tagged with the request
//! sequence number, which the controller uses to drop stale responses.

mod draw;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::ListState;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::app::upload::UploadState;
use crate::app::{App, SearchRequest, View, MSG_SEMANTIC_FALLBACK};
use crate::config::Settings;
use crate::models::{ExtractionSuggestions, ParceriaDetail, SearchResults};

/// Upload-view focus slots: path input plus the five draft fields.
pub(crate) const UPLOAD_FIELDS: usize = 6;

/// Responses delivered from spawned API tasks.
enum ApiResponse {
    Search {
        seq: u64,
        result: Result<SearchResults, ApiError>,
    },
    Detail {
        seq: u64,
        result: Result<ParceriaDetail, ApiError>,
    },
    Extraction(Result<ExtractionSuggestions, ApiError>),
    Save(Result<(), ApiError>),
}

/// Presentation-only state (cursor positions, toggles, text being typed).
/// Everything the backend contract cares about lives in [`App`].
pub(crate) struct UiState {
    /// Search term being typed (distinct from the submitted term).
    pub input: String,
    /// Semantic toggle; the original defaults to semantic search.
    pub semantic: bool,
    /// True while the result list has keyboard focus.
    pub results_focused: bool,
    pub list_state: ListState,
    /// Work-plan expansion in the detail view; reset per record.
    pub detail_expanded: bool,
    /// Upload view: 0 = file path, 1..=5 = draft fields.
    pub upload_focus: usize,
    pub upload_path: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            input: String::new(),
            semantic: true,
            results_focused: false,
            list_state: ListState::default(),
            detail_expanded: false,
            upload_focus: 0,
            upload_path: String::new(),
        }
    }
}

/// Restore the terminal even on early return or panic.
struct TerminalRestore;

impl Drop for TerminalRestore {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Run the interactive client until the user quits.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let client = ApiClient::new(&settings);
    let (tx, mut rx) = mpsc::unbounded_channel::<ApiResponse>();

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let _restore = TerminalRestore;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new();
    let mut ui = UiState::default();
    // Sequence number of an in-flight keyword->semantic fallback request.
    let mut fallback_seq: Option<u64> = None;

    loop {
        terminal.draw(|f| draw::draw(f, &app, &mut ui))?;

        while let Ok(response) = rx.try_recv() {
            handle_response(
                &mut app,
                &mut ui,
                &mut fallback_seq,
                &settings,
                &client,
                &tx,
                response,
            );
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if is_quit(&key) {
            break;
        }
        handle_key(&mut app, &mut ui, &mut fallback_seq, &client, &tx, key);
    }

    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[allow(clippy::too_many_arguments)]
fn handle_response(
    app: &mut App,
    ui: &mut UiState,
    fallback_seq: &mut Option<u64>,
    settings: &Settings,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<ApiResponse>,
    response: ApiResponse,
) {
    match response {
        ApiResponse::Search { seq, result } => {
            let zero_hits = matches!(&result, Ok(r) if r.total_items == 0);
            let was_fallback = *fallback_seq == Some(seq);

            // Stale responses are dropped before any follow-up logic runs:
            // a zero-hit answer to an old query must not flip the current
            // query to semantic, and a dropped fallback response must not
            // stamp the fallback banner onto a newer result set.
            if !app.apply_search_response(seq, result) {
                return;
            }
            ui.list_state.select(if app.results.is_empty() { None } else { Some(0) });

            if was_fallback {
                *fallback_seq = None;
                if app.search.total_items > 0 {
                    app.search.message = Some(MSG_SEMANTIC_FALLBACK.to_string());
                }
            } else if zero_hits && !app.search.semantic && settings.semantic_fallback {
                if let Some(req) = app.fallback_to_semantic() {
                    debug!("keyword search empty, falling back to semantic");
                    *fallback_seq = Some(req.seq);
                    spawn_search(client, tx, req);
                }
            }
        }
        ApiResponse::Detail { seq, result } => {
            if app.apply_detail_response(seq, result) {
                ui.detail_expanded = false;
            }
        }
        ApiResponse::Extraction(result) => app.upload.apply_extraction(result),
        ApiResponse::Save(result) => {
            let saved = result.is_ok();
            app.upload.apply_save(result);
            // On success the form is back to its NoFile-equivalent state;
            // drop the typed path so the Saved screen does not offer it.
            if saved {
                ui.upload_path.clear();
                ui.upload_focus = 0;
            }
        }
    }
}

fn handle_key(
    app: &mut App,
    ui: &mut UiState,
    fallback_seq: &mut Option<u64>,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<ApiResponse>,
    key: KeyEvent,
) {
    // F2 mirrors the original's view toggle buttons; nothing is discarded.
    if key.code == KeyCode::F(2) {
        app.set_view(match app.view {
            View::Search => View::Upload,
            View::Upload => View::Search,
        });
        return;
    }

    match app.view {
        View::Search if app.selected.is_some() => handle_detail_key(app, ui, key),
        View::Search => handle_search_key(app, ui, fallback_seq, client, tx, key),
        View::Upload => handle_upload_key(app, ui, client, tx, key),
    }
}

fn handle_detail_key(app: &mut App, ui: &mut UiState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => {
            app.back_to_results();
            ui.detail_expanded = false;
        }
        KeyCode::Enter | KeyCode::Char('e') => ui.detail_expanded = !ui.detail_expanded,
        _ => {}
    }
}

fn handle_search_key(
    app: &mut App,
    ui: &mut UiState,
    fallback_seq: &mut Option<u64>,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<ApiResponse>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Tab => ui.results_focused = !ui.results_focused && !app.results.is_empty(),
        KeyCode::F(3) if !app.search.loading => ui.semantic = !ui.semantic,
        KeyCode::Left | KeyCode::Right if ui.results_focused => {
            let delta: i64 = if key.code == KeyCode::Left { -1 } else { 1 };
            let target = app.search.page as i64 + delta;
            if target >= 1 && target as u64 <= app.total_pages() {
                *fallback_seq = None;
                if let Some(req) = app.change_page(target as u64) {
                    spawn_search(client, tx, req);
                }
            }
        }
        KeyCode::Up if ui.results_focused => move_selection(ui, app.results.len(), -1),
        KeyCode::Down if ui.results_focused => move_selection(ui, app.results.len(), 1),
        KeyCode::Enter if ui.results_focused => {
            if let Some(idx) = ui.list_state.selected() {
                if let Some(item) = app.results.get(idx) {
                    let req = app.select_result(item.id);
                    spawn_detail(client, tx, req);
                }
            }
        }
        KeyCode::Down if !app.results.is_empty() => {
            ui.results_focused = true;
            ui.list_state.select(Some(0));
        }
        // The input row: submit and edit, disabled while loading.
        KeyCode::Enter if !app.search.loading => {
            *fallback_seq = None;
            if let Some(req) = app.submit_search(&ui.input, ui.semantic) {
                ui.results_focused = false;
                spawn_search(client, tx, req);
            }
        }
        KeyCode::Backspace if !app.search.loading => {
            ui.input.pop();
        }
        KeyCode::Char(c) if !app.search.loading && !key.modifiers.contains(KeyModifiers::CONTROL) => {
            ui.input.push(c);
        }
        _ => {}
    }
}

fn move_selection(ui: &mut UiState, len: usize, delta: i64) {
    if len == 0 {
        return;
    }
    let current = ui.list_state.selected().unwrap_or(0) as i64;
    let next = (current + delta).clamp(0, len as i64 - 1);
    ui.list_state.select(Some(next as usize));
}

fn handle_upload_key(
    app: &mut App,
    ui: &mut UiState,
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<ApiResponse>,
    key: KeyEvent,
) {
    use crate::app::upload::DraftField;

    let busy = matches!(
        app.upload.state,
        UploadState::Extracting | UploadState::Saving
    );
    let has_draft = app.upload.draft.is_some();

    match key.code {
        KeyCode::Esc => app.set_view(View::Search),
        KeyCode::Tab | KeyCode::Down => {
            let limit = if has_draft { UPLOAD_FIELDS } else { 1 };
            ui.upload_focus = (ui.upload_focus + 1) % limit;
        }
        KeyCode::BackTab | KeyCode::Up => {
            let limit = if has_draft { UPLOAD_FIELDS } else { 1 };
            ui.upload_focus = (ui.upload_focus + limit - 1) % limit;
        }
        // Enter on the path row runs extraction; on a draft row it saves.
        KeyCode::Enter if !busy => {
            if ui.upload_focus == 0 {
                let path = ui.upload_path.trim();
                if !path.is_empty() {
                    app.upload.select_file(PathBuf::from(path));
                }
                if let Some(file) = app.upload.begin_extraction() {
                    spawn_extraction(client, tx, file.to_path_buf());
                }
            } else if let Some(payload) = app.upload.begin_save() {
                let client = client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = client.create_parceria(&payload).await.map(|_| ());
                    let _ = tx.send(ApiResponse::Save(result));
                });
            }
        }
        KeyCode::Backspace if !busy => edit_upload_field(app, ui, |s| {
            s.pop();
        }),
        KeyCode::Char(c) if !busy && !key.modifiers.contains(KeyModifiers::CONTROL) => {
            edit_upload_field(app, ui, |s| s.push(c))
        }
        _ => {}
    }

    // Single-field edit plumbing: the focused row maps onto one draft field.
    fn edit_upload_field(app: &mut App, ui: &mut UiState, op: impl FnOnce(&mut String)) {
        if ui.upload_focus == 0 {
            op(&mut ui.upload_path);
            return;
        }
        let field = match ui.upload_focus {
            1 => DraftField::Organization,
            2 => DraftField::TaxId,
            3 => DraftField::TermYear,
            4 => DraftField::ObjectDescription,
            _ => DraftField::WorkPlan,
        };
        let Some(draft) = app.upload.draft.as_ref() else {
            return;
        };
        let mut value = match field {
            DraftField::Organization => draft.organization.clone(),
            DraftField::TaxId => draft.tax_id.clone(),
            DraftField::TermYear => draft.term_year.clone(),
            DraftField::ObjectDescription => draft.object_description.clone(),
            DraftField::WorkPlan => draft.work_plan.clone(),
        };
        op(&mut value);
        app.upload.edit_field(field, value);
    }
}

fn spawn_search(
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<ApiResponse>,
    req: SearchRequest,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = if req.semantic {
            client.search_semantic(&req.term, req.skip, req.limit).await
        } else {
            client.search_keyword(&req.term, req.skip, req.limit).await
        };
        let _ = tx.send(ApiResponse::Search {
            seq: req.seq,
            result,
        });
    });
}

fn spawn_detail(
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<ApiResponse>,
    req: crate::app::DetailRequest,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.get_detail(req.id).await;
        let _ = tx.send(ApiResponse::Detail {
            seq: req.seq,
            result,
        });
    });
}


fn spawn_extraction(
    client: &ApiClient,
    tx: &mpsc::UnboundedSender<ApiResponse>,
    path: PathBuf,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "documento.pdf".to_string());
        let result = match tokio::fs::read(&path).await {
            Ok(bytes) => client.process_document(&file_name, bytes).await,
            Err(e) => Err(ApiError::Api(format!("read {}: {}", path.display(), e))),
        };
        let _ = tx.send(ApiResponse::Extraction(result));
    });
}
