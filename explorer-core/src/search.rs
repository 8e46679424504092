//! Search modes and their translation into Chroma "get" / "query" calls.
//!
//! [`plan`] is a pure function from a [`SearchRequest`] to the remote request
//! it implies; [`Session::search`] executes the plan, normalizes the rows and
//! attaches the collection's total count.
//!
//! Semantic search is not paginated: it always returns the top `n_results`
//! neighbors starting from rank 0, and asking for a later page is rejected.

use chroma_client::models::QueryResult;
use chroma_client::wire::{GetRequest, Include, QueryRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::errors::{ExplorerError, ExplorerResult};
use crate::filters::{FilterClause, build_where, conjoin, document_contains, parse_raw_where};
use crate::session::Session;

/// Rows per page for every "get"-based mode.
pub const PAGE_SIZE: usize = 20;
/// Neighbors returned by a semantic search when the caller does not say.
pub const DEFAULT_N_RESULTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Text,
    Semantic,
    /// Accepted for compatibility; behaves exactly like [`SearchMode::Text`].
    Regex,
    Id,
    Metadata,
}

/// What the search form submits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub mode: SearchMode,
    /// Search term; blank means "plain listing" for every mode except `metadata`.
    pub query: Option<String>,
    /// Metadata clauses, used by `metadata` mode.
    pub filters: Vec<FilterClause>,
    /// Optional raw JSON `where` object, ANDed with whatever the mode builds.
    pub raw_where: Option<String>,
    /// 1-based page number; 0 is read as 1.
    pub page: usize,
    /// Neighbor count for `semantic` mode.
    pub n_results: Option<usize>,
}

impl SearchRequest {
    fn term(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    fn page(&self) -> usize {
        self.page.max(1)
    }
}

/// Remote call implied by a [`SearchRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPlan {
    Get(GetRequest),
    Query {
        text: String,
        n_results: usize,
        r#where: Option<Value>,
    },
}

/// One page of normalized results.
///
/// `total` is always the size of the whole collection, never the number of
/// rows matching the filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub mode: SearchMode,
    pub page: usize,
    pub page_size: usize,
    pub paginated: bool,
    pub total: usize,
    pub results: Vec<QueryResult>,
}

/// Translates a search request into the remote call it needs.
///
/// # Errors
/// - [`ExplorerError::MalformedFilter`] for a bad raw filter or non-numeric comparison
/// - [`ExplorerError::InvalidRequest`] for semantic search beyond page 1, `n_results == 0`,
///   or a page whose offset does not fit in `usize`
pub fn plan(request: &SearchRequest) -> ExplorerResult<SearchPlan> {
    let page = request.page();
    let raw = match request.raw_where.as_deref() {
        Some(raw) => parse_raw_where(raw)?,
        None => None,
    };

    match (request.mode, request.term()) {
        (SearchMode::Metadata, _) => {
            let mut parts = Vec::new();
            parts.extend(build_where(&request.filters)?);
            parts.extend(raw);
            listing(page, conjoin(parts), None)
        }
        (_, None) => listing(page, raw, None),
        (SearchMode::Text | SearchMode::Regex, Some(term)) => {
            listing(page, raw, Some(document_contains(term)))
        }
        (SearchMode::Id, Some(term)) => Ok(SearchPlan::Get(GetRequest {
            ids: Some(vec![term.to_string()]),
            r#where: raw,
            include: vec![Include::Documents, Include::Metadatas],
            ..Default::default()
        })),
        (SearchMode::Semantic, Some(term)) => {
            if page > 1 {
                return Err(ExplorerError::InvalidRequest(
                    "semantic search returns only the top results; pages beyond 1 are not supported"
                        .into(),
                ));
            }
            let n_results = request.n_results.unwrap_or(DEFAULT_N_RESULTS);
            if n_results == 0 {
                return Err(ExplorerError::InvalidRequest("n_results must be > 0".into()));
            }
            Ok(SearchPlan::Query {
                text: term.to_string(),
                n_results,
                r#where: raw,
            })
        }
    }
}

/// Paged "get" for the listing modes.
fn listing(
    page: usize,
    r#where: Option<Value>,
    where_document: Option<Value>,
) -> ExplorerResult<SearchPlan> {
    let offset = (page - 1)
        .checked_mul(PAGE_SIZE)
        .ok_or_else(|| ExplorerError::InvalidRequest(format!("page {page} is out of range")))?;

    Ok(SearchPlan::Get(GetRequest {
        r#where,
        where_document,
        limit: Some(PAGE_SIZE),
        offset: Some(offset),
        include: vec![Include::Documents, Include::Metadatas],
        ..Default::default()
    }))
}

impl Session {
    /// Runs a search against `collection` and returns one normalized page.
    #[instrument(skip_all, fields(collection = %collection, mode = ?request.mode))]
    pub async fn search(
        &self,
        collection: &str,
        request: &SearchRequest,
    ) -> ExplorerResult<SearchPage> {
        let plan = plan(request)?;
        let record = self.client().get_collection(collection).await?;

        let (results, paginated) = match plan {
            SearchPlan::Get(req) => {
                debug!(?req, "search: get");
                let rows = self.client().get(&record.id, &req).await?.into_results();
                (rows, req.ids.is_none())
            }
            SearchPlan::Query {
                text,
                n_results,
                r#where,
            } => {
                let embedding = self.embedder().generate_one(&text).await?;
                let req = QueryRequest {
                    query_embeddings: vec![embedding],
                    n_results,
                    r#where,
                    where_document: None,
                    include: vec![Include::Documents, Include::Metadatas, Include::Distances],
                };
                let rows = self.client().query(&record.id, &req).await?.into_results();
                (rows, false)
            }
        };

        let total = self.client().count(&record.id).await?;

        info!(hits = results.len(), total, "search: done");

        Ok(SearchPage {
            mode: request.mode,
            page: if paginated { request.page() } else { 1 },
            page_size: PAGE_SIZE,
            paginated,
            total,
            results,
        })
    }
}
