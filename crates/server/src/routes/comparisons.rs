//! Routes for comparison sessions: create, inspect, mutate slots,
//! render, and search for candidates.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::product_kind::ProductKind;
use serde::{Deserialize, Serialize};
use services::services::{
    comparison::{ComparisonSession, RenderModel, SessionPhase},
    render::{CardLayout, TableLayout},
    reviews::ReviewLookup,
    search::{SearchOutcome, StoreSearchProvider, find_candidates},
    session_state::{AnyProduct, SessionEntry, SlotChange},
    taxonomy,
};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Clone, Deserialize, TS)]
pub struct CreateComparisonRequest {
    pub kind: ProductKind,
    pub anchor_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, TS)]
pub struct AddSlotRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct ComparisonSummary {
    pub id: Uuid,
    pub kind: ProductKind,
    pub phase: SessionPhase,
    pub anchor_id: Uuid,
    pub product_ids: Vec<Uuid>,
    pub open_slots: usize,
}

impl ComparisonSummary {
    fn of(id: Uuid, entry: &SessionEntry) -> Self {
        Self {
            id,
            kind: entry.kind(),
            phase: entry.phase(),
            anchor_id: entry.anchor_id(),
            product_ids: entry.product_ids(),
            open_slots: entry.open_slots(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
pub enum SearchState {
    /// No query typed yet.
    EmptyQuery,
    Ok,
    /// The session changed while the fetch was in flight; the results
    /// were discarded.
    Stale,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct SearchResponse {
    pub state: SearchState,
    pub results: Vec<AnyProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// POST /api/comparisons
/// Seed a session with an anchor product.
pub async fn create_comparison(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateComparisonRequest>,
) -> Result<ResponseJson<ApiResponse<ComparisonSummary>>, ApiError> {
    let product = super::fetch_product(state.pool(), payload.kind, payload.anchor_id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;

    let entry = match product {
        AnyProduct::Mobile(p) => SessionEntry::Mobile(ComparisonSession::new(p)),
        AnyProduct::Laptop(p) => SessionEntry::Laptop(ComparisonSession::new(p)),
    };
    let summary_entry = entry.clone();
    let id = state.sessions().create(entry);

    Ok(ResponseJson(ApiResponse::success(ComparisonSummary::of(
        id,
        &summary_entry,
    ))))
}

/// GET /api/comparisons/{id}
pub async fn get_comparison(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<ComparisonSummary>>, ApiError> {
    let entry = state
        .sessions()
        .snapshot(id)
        .ok_or(ApiError::NotFound("comparison"))?;
    Ok(ResponseJson(ApiResponse::success(ComparisonSummary::of(
        id, &entry,
    ))))
}

/// DELETE /api/comparisons/{id}
pub async fn delete_comparison(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if !state.sessions().remove(id) {
        return Err(ApiError::NotFound("comparison"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

/// Project a session through its kind's taxonomy. Reviews are fetched
/// in one batch for the whole slot set; only the mobile taxonomy
/// carries expert rows, so the laptop path skips the fetch.
async fn render_model(state: &AppState, entry: &SessionEntry) -> Result<RenderModel, ApiError> {
    match entry {
        SessionEntry::Mobile(session) => {
            let reviews = ReviewLookup::fetch(state.pool(), &session.product_ids()).await?;
            Ok(session.to_render_model(taxonomy::mobile_taxonomy(), &reviews))
        }
        SessionEntry::Laptop(session) => {
            Ok(session.to_render_model(taxonomy::laptop_taxonomy(), &ReviewLookup::empty()))
        }
    }
}

/// GET /api/comparisons/{id}/table
pub async fn get_table(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<TableLayout>>, ApiError> {
    let entry = state
        .sessions()
        .snapshot(id)
        .ok_or(ApiError::NotFound("comparison"))?;
    let model = render_model(&state, &entry).await?;
    Ok(ResponseJson(ApiResponse::success(TableLayout::project(
        &model,
    ))))
}

/// GET /api/comparisons/{id}/cards
pub async fn get_cards(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<CardLayout>>, ApiError> {
    let entry = state
        .sessions()
        .snapshot(id)
        .ok_or(ApiError::NotFound("comparison"))?;
    let model = render_model(&state, &entry).await?;
    Ok(ResponseJson(ApiResponse::success(CardLayout::project(
        &model,
    ))))
}

/// POST /api/comparisons/{id}/slots
pub async fn add_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    axum::Json(payload): axum::Json<AddSlotRequest>,
) -> Result<ResponseJson<ApiResponse<ComparisonSummary>>, ApiError> {
    let kind = state
        .sessions()
        .kind(id)
        .ok_or(ApiError::NotFound("comparison"))?;
    let product = super::fetch_product(state.pool(), kind, payload.product_id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;

    let change = state
        .sessions()
        .mutate(id, |entry| entry.add(product))
        .ok_or(ApiError::NotFound("comparison"))?;

    match change {
        SlotChange::Added => {}
        SlotChange::Rejected(rejection) => return Err(ApiError::Rejected(rejection)),
        SlotChange::KindMismatch => return Err(ApiError::KindMismatch),
    }

    let entry = state
        .sessions()
        .snapshot(id)
        .ok_or(ApiError::NotFound("comparison"))?;
    Ok(ResponseJson(ApiResponse::success(ComparisonSummary::of(
        id, &entry,
    ))))
}

/// DELETE /api/comparisons/{id}/slots/{product_id}
pub async fn remove_slot(
    State(state): State<AppState>,
    Path((id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<ComparisonSummary>>, ApiError> {
    enum Removal {
        Removed,
        Anchor,
        Absent,
    }

    let outcome = state
        .sessions()
        .mutate(id, |entry| {
            if product_id == entry.anchor_id() {
                Removal::Anchor
            } else if entry.remove(product_id) {
                Removal::Removed
            } else {
                Removal::Absent
            }
        })
        .ok_or(ApiError::NotFound("comparison"))?;

    match outcome {
        Removal::Removed => {}
        Removal::Anchor => return Err(ApiError::SlotPinned),
        Removal::Absent => return Err(ApiError::NotFound("product")),
    }

    let entry = state
        .sessions()
        .snapshot(id)
        .ok_or(ApiError::NotFound("comparison"))?;
    Ok(ResponseJson(ApiResponse::success(ComparisonSummary::of(
        id, &entry,
    ))))
}

/// GET /api/comparisons/{id}/search?q=...
/// Candidates to fill an open slot. Results fetched against a session
/// that changed mid-flight are discarded, not applied.
pub async fn search_candidates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<SearchQuery>,
) -> Result<ResponseJson<ApiResponse<SearchResponse>>, ApiError> {
    let entry = state
        .sessions()
        .snapshot(id)
        .ok_or(ApiError::NotFound("comparison"))?;
    let ticket = state
        .sessions()
        .ticket(id)
        .ok_or(ApiError::NotFound("comparison"))?;

    let query = params.q.unwrap_or_default();
    let provider = StoreSearchProvider::new(state.pool().clone());

    let (search_state, results) = match &entry {
        SessionEntry::Mobile(session) => {
            match find_candidates(&provider, &query, session.anchor_id()).await? {
                SearchOutcome::EmptyQuery => (SearchState::EmptyQuery, Vec::new()),
                SearchOutcome::Results(hits) => (
                    SearchState::Ok,
                    hits.into_iter().map(AnyProduct::Mobile).collect(),
                ),
            }
        }
        SessionEntry::Laptop(session) => {
            match find_candidates(&provider, &query, session.anchor_id()).await? {
                SearchOutcome::EmptyQuery => (SearchState::EmptyQuery, Vec::new()),
                SearchOutcome::Results(hits) => (
                    SearchState::Ok,
                    hits.into_iter().map(AnyProduct::Laptop).collect(),
                ),
            }
        }
    };

    if !state.sessions().is_current(ticket) {
        return Ok(ResponseJson(ApiResponse::success(SearchResponse {
            state: SearchState::Stale,
            results: Vec::new(),
        })));
    }

    Ok(ResponseJson(ApiResponse::success(SearchResponse {
        state: search_state,
        results,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/comparisons",
        Router::new()
            .route("/", post(create_comparison))
            .route("/{id}", get(get_comparison).delete(delete_comparison))
            .route("/{id}/table", get(get_table))
            .route("/{id}/cards", get(get_cards))
            .route("/{id}/slots", post(add_slot))
            .route(
                "/{id}/slots/{product_id}",
                axum::routing::delete(remove_slot),
            )
            .route("/{id}/search", get(search_candidates)),
    )
}
