//! Top-level application state for the search/upload client.
//!
//! State lives here and flows into the views read-only; every user action
//! comes back as a method call. Methods that need the network return a
//! request description instead of performing I/O — the TUI driver (or a
//! test) issues the call and feeds the response back through the matching
//! `apply_*` method. That split keeps the whole controller synchronous and
//! testable without a server.
//!
//! Requests carry a monotonic sequence number. Responses older than the
//! latest issued request of their kind are discarded, so a slow page-1
//! response can never overwrite a page-2 result list.

pub mod upload;

use tracing::debug;

use crate::api::ApiError;
use crate::models::{ParceriaDetail, ParceriaSummary, SearchResults};
use upload::UploadForm;

/// Fixed page size of the result list.
pub const PAGE_SIZE: u64 = 10;

pub const MSG_NO_RESULTS: &str = "Nenhum resultado encontrado.";
pub const MSG_CONNECTION_FAILED: &str = "Falha ao conectar com o servidor.";
pub const MSG_DETAIL_FAILED: &str = "Não foi possível carregar os detalhes.";
pub const MSG_SEMANTIC_FALLBACK: &str = "Mostrando resultados por similaridade (IA).";

/// Which top-level view is active. Switching discards nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Search,
    Upload,
}

/// Search state owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Last submitted term (not the text being typed).
    pub term: String,
    /// Current page, 1-based. Updated optimistically on page change.
    pub page: u64,
    pub total_items: u64,
    /// Semantic-vs-keyword choice recorded at submit time.
    pub semantic: bool,
    pub loading: bool,
    /// Short user-facing status line, when any.
    pub message: Option<String>,
}

/// A search call the driver should issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub term: String,
    pub semantic: bool,
    pub skip: u64,
    pub limit: u64,
}

/// A detail fetch the driver should issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub seq: u64,
    pub id: i64,
}

/// Top-level controller: view switching, search state, selection, upload.
#[derive(Default)]
pub struct App {
    pub view: View,
    pub search: SearchState,
    pub results: Vec<ParceriaSummary>,
    /// Detail record currently shown, if any.
    pub selected: Option<ParceriaDetail>,
    pub upload: UploadForm,

    next_seq: u64,
    latest_search_seq: u64,
    latest_detail_seq: u64,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a search submit. Blank terms clear the list and message and
    /// issue nothing; otherwise the state resets to page 1 and a request
    /// for the first page is returned.
    pub fn submit_search(&mut self, term: &str, semantic: bool) -> Option<SearchRequest> {
        if term.trim().is_empty() {
            self.results.clear();
            self.search.total_items = 0;
            self.search.message = None;
            return None;
        }

        self.search.term = term.to_string();
        self.search.semantic = semantic;
        self.search.page = 1;
        self.selected = None;
        self.begin_search()
    }

    /// Jump to another page of the current query. The displayed page number
    /// updates before the response arrives.
    pub fn change_page(&mut self, page: u64) -> Option<SearchRequest> {
        if self.search.term.trim().is_empty() || page < 1 {
            return None;
        }
        self.search.page = page;
        self.begin_search()
    }

    fn begin_search(&mut self) -> Option<SearchRequest> {
        self.search.loading = true;
        self.search.message = None;

        let seq = self.next_seq();
        self.latest_search_seq = seq;
        Some(SearchRequest {
            seq,
            term: self.search.term.clone(),
            semantic: self.search.semantic,
            skip: (self.search.page - 1) * PAGE_SIZE,
            limit: PAGE_SIZE,
        })
    }

    /// Apply a search response. Stale responses are dropped wholesale: a
    /// newer request is in flight and owns the loading flag. Returns whether
    /// the response was applied, so drivers can skip follow-up work (the
    /// semantic fallback, list-cursor resets) for dropped responses.
    pub fn apply_search_response(
        &mut self,
        seq: u64,
        result: Result<SearchResults, ApiError>,
    ) -> bool {
        if seq < self.latest_search_seq {
            debug!("dropping stale search response (seq {} < {})", seq, self.latest_search_seq);
            return false;
        }
        self.search.loading = false;

        match result {
            Ok(results) => {
                self.search.total_items = results.total_items;
                self.results = results.items;
                self.search.message = if results.total_items == 0 {
                    Some(MSG_NO_RESULTS.to_string())
                } else {
                    None
                };
            }
            Err(err) => {
                debug!("search failed: {}", err);
                self.results.clear();
                self.search.total_items = 0;
                self.search.message = Some(MSG_CONNECTION_FAILED.to_string());
            }
        }
        true
    }

    /// Re-issue the current query semantically. Drivers call this (when the
    /// opt-in fallback setting is on) after a keyword search came back with
    /// zero hits. The semantic flag is recorded, so later page changes stay
    /// on the semantic result set and the fallback cannot loop.
    pub fn fallback_to_semantic(&mut self) -> Option<SearchRequest> {
        if self.search.term.trim().is_empty() {
            return None;
        }
        self.search.semantic = true;
        self.begin_search()
    }

    /// Handle a click on a result row.
    pub fn select_result(&mut self, id: i64) -> DetailRequest {
        self.search.loading = true;
        self.search.message = None;

        let seq = self.next_seq();
        self.latest_detail_seq = seq;
        DetailRequest { seq, id }
    }

    /// Apply a detail response. On failure the message is set and the
    /// current selection and result list stay as they were. Returns whether
    /// the response was applied (stale responses are dropped).
    pub fn apply_detail_response(
        &mut self,
        seq: u64,
        result: Result<ParceriaDetail, ApiError>,
    ) -> bool {
        if seq < self.latest_detail_seq {
            debug!("dropping stale detail response (seq {} < {})", seq, self.latest_detail_seq);
            return false;
        }
        self.search.loading = false;

        match result {
            Ok(detail) => self.selected = Some(detail),
            Err(err) => {
                debug!("detail fetch failed: {}", err);
                self.search.message = Some(MSG_DETAIL_FAILED.to_string());
            }
        }
        true
    }

    /// Back from the detail view. The result list stays cached; no request
    /// is re-issued.
    pub fn back_to_results(&mut self) {
        self.selected = None;
        self.search.message = None;
    }

    /// Switch between search and upload. State on both sides is preserved.
    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn total_pages(&self) -> u64 {
        self.search.total_items.div_ceil(PAGE_SIZE)
    }

    /// Pagination is shown only when there is more than one page.
    pub fn pagination_visible(&self) -> bool {
        self.total_pages() > 1
    }

    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}
