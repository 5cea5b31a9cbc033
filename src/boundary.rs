//! Boundary traits to excluded subsystems
//!
//! The core never performs network or database I/O itself; persistence
//! and the search index are consumed through these narrow traits. Calls
//! are synchronous in spirit (no retries, no timeouts here; that policy
//! belongs to the caller wrapping a request).

use crate::error::CmsResult;
use crate::page::Page;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// One search hit returned by the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
	/// Persistent identifier of the record
	pub record_id: String,
	/// Display title of the record
	pub title: String,
	/// Raw index fields of the hit
	pub fields: serde_json::Map<String, JsonValue>,
}

/// Persistence boundary for pages
#[async_trait]
pub trait PageRepository: Send + Sync {
	/// Load one page by id
	async fn load_page(&self, id: i64) -> CmsResult<Option<Page>>;

	/// Load every page
	async fn load_all_pages(&self) -> CmsResult<Vec<Page>>;

	/// Load the pages carrying the given classification tag
	async fn load_pages_by_classification(&self, tag: &str) -> CmsResult<Vec<Page>>;

	/// Persist a page; returns whether the page was written
	async fn save_page(&self, page: &Page) -> CmsResult<bool>;

	/// Delete a page; returns whether a page was deleted
	async fn delete_page(&self, page: &Page) -> CmsResult<bool>;
}

/// Search-index boundary used by collection, query and search items
#[async_trait]
pub trait SearchIndex: Send + Sync {
	/// Facet value counts for the given field
	async fn collection_facet_counts(&self, field: &str) -> CmsResult<HashMap<String, u64>>;

	/// Execute a query, returning one result page of hits
	async fn execute_query(
		&self,
		query: &str,
		sort: &str,
		page: usize,
		page_size: usize,
	) -> CmsResult<Vec<Hit>>;
}
