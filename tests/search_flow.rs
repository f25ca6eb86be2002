//! End-to-end flows over the controller with canned API responses.
//!
//! The controller returns request descriptions instead of doing I/O, so
//! these tests play the backend: issue an action, inspect the request it
//! produced, and feed back a canned response.

use aurahub::api::ApiError;
use aurahub::app::upload::{DraftField, UploadState, MSG_SAVED};
use aurahub::app::{App, View, MSG_DETAIL_FAILED, MSG_NO_RESULTS, PAGE_SIZE};
use aurahub::models::{ExtractionSuggestions, ParceriaDetail, ParceriaSummary, SearchResults};

fn summary(id: i64, organization: &str, score: Option<f64>) -> ParceriaSummary {
    ParceriaSummary {
        id,
        organization: Some(organization.to_string()),
        object_description: Some("Cooperação técnica em educação".to_string()),
        term_year: Some(2024),
        work_plan: None,
        similarity_score: score,
    }
}

fn page(total: u64, items: Vec<ParceriaSummary>) -> SearchResults {
    SearchResults {
        total_items: total,
        items,
    }
}

fn detail(id: i64) -> ParceriaDetail {
    ParceriaDetail {
        id,
        term_number: Some("123".to_string()),
        term_year: Some(2024),
        tax_id: Some("21.154.877/0001-07".to_string()),
        organization: Some("Instituto Aurora".to_string()),
        object_description: Some("Apoio a projetos educacionais".to_string()),
        work_plan: Some("Plano de trabalho".to_string()),
        signature_date: None,
        publication_date: None,
        validity_date: None,
        status: Some("Vigente".to_string()),
        similarity_score: None,
    }
}

// ============================================================================
// Search and pagination
// ============================================================================

#[test]
fn semantic_search_with_two_hits_shows_both_without_pagination() {
    let mut app = App::new();

    let req = app.submit_search("educação", true).unwrap();
    assert!(req.semantic);
    assert_eq!(req.skip, 0);
    assert_eq!(req.limit, PAGE_SIZE);

    app.apply_search_response(
        req.seq,
        Ok(page(
            2,
            vec![
                summary(1, "Instituto Aurora", Some(0.82)),
                summary(2, "Associação Beta", Some(0.47)),
            ],
        )),
    );

    assert_eq!(app.results.len(), 2);
    assert!(app.search.message.is_none());
    assert!(!app.pagination_visible());
    assert!(!app.search.loading);
}

#[test]
fn keyword_search_without_hits_reports_no_results() {
    let mut app = App::new();
    let req = app.submit_search("zzz_no_match", false).unwrap();
    assert!(!req.semantic);

    app.apply_search_response(req.seq, Ok(page(0, vec![])));
    assert!(app.results.is_empty());
    assert_eq!(app.search.message.as_deref(), Some(MSG_NO_RESULTS));
}

#[test]
fn paging_through_a_large_result_set() {
    let mut app = App::new();
    let req = app.submit_search("saude", false).unwrap();
    app.apply_search_response(req.seq, Ok(page(57, vec![summary(1, "Org", None)])));

    assert_eq!(app.total_pages(), 6);
    assert!(app.pagination_visible());

    for p in 2..=6 {
        let req = app.change_page(p).unwrap();
        assert_eq!(req.skip, (p - 1) * PAGE_SIZE);
        assert_eq!(req.term, "saude");
        assert_eq!(app.search.page, p, "page display is optimistic");
        app.apply_search_response(req.seq, Ok(page(57, vec![summary(p as i64, "Org", None)])));
    }
}

// ============================================================================
// Detail view
// ============================================================================

#[test]
fn selecting_a_result_loads_its_detail_and_back_keeps_the_list() {
    let mut app = App::new();
    let req = app.submit_search("educação", true).unwrap();
    app.apply_search_response(
        req.seq,
        Ok(page(3, vec![
            summary(1, "A", None),
            summary(42, "B", None),
            summary(3, "C", None),
        ])),
    );

    let req = app.select_result(42);
    assert_eq!(req.id, 42);
    app.apply_detail_response(req.seq, Ok(detail(42)));
    assert_eq!(app.selected.as_ref().unwrap().id, 42);

    app.back_to_results();
    assert!(app.selected.is_none());
    assert_eq!(app.results.len(), 3, "no re-fetch on back");
}

#[test]
fn failed_detail_fetch_leaves_selection_unset() {
    let mut app = App::new();
    let req = app.submit_search("educação", true).unwrap();
    app.apply_search_response(req.seq, Ok(page(1, vec![summary(42, "A", None)])));

    let req = app.select_result(42);
    app.apply_detail_response(req.seq, Err(ApiError::Connection("refused".into())));

    assert!(app.selected.is_none());
    assert_eq!(app.search.message.as_deref(), Some(MSG_DETAIL_FAILED));
}

// ============================================================================
// Upload flow alongside search
// ============================================================================

#[test]
fn upload_flow_preserves_search_state_across_view_switches() {
    let mut app = App::new();
    let req = app.submit_search("cultura", true).unwrap();
    app.apply_search_response(req.seq, Ok(page(5, vec![summary(1, "Org", Some(0.7))])));

    app.set_view(View::Upload);
    app.upload.select_file("termo_2024.pdf".into());
    assert!(app.upload.begin_extraction().is_some());
    app.upload.apply_extraction(Ok(ExtractionSuggestions {
        organization: Some("Instituto Aurora".to_string()),
        object_description: Some("Cooperação técnica".to_string()),
        tax_id: Some("21.154.877/0001-07".to_string()),
        term_year: Some("2024".to_string()),
    }));
    assert_eq!(app.upload.state, UploadState::DraftReady);

    app.upload
        .edit_field(DraftField::WorkPlan, "Oficinas mensais".to_string());
    let payload = app.upload.begin_save().unwrap();
    assert_eq!(payload.term_year, Some(2024));
    assert_eq!(payload.work_plan, "Oficinas mensais");
    app.upload.apply_save(Ok(()));
    assert_eq!(app.upload.message.as_deref(), Some(MSG_SAVED));
    assert_eq!(app.upload.state, UploadState::Saved);

    // Back to search: results and term exactly as left.
    app.set_view(View::Search);
    assert_eq!(app.search.term, "cultura");
    assert_eq!(app.results.len(), 1);
}
