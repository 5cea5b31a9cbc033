//! Request-facing orchestration
//!
//! [`CmsService`] glues the catalog, the persistence boundary and the
//! search index together. Every page load re-runs reconciliation under a
//! lock scoped to that page, so two concurrent loads of the same page
//! never interleave their add/remove steps.

use crate::boundary::{Hit, PageRepository, SearchIndex};
use crate::catalog::TemplateCatalog;
use crate::config::CmsConfig;
use crate::content::{ItemContent, ItemFunctionality};
use crate::error::{CmsError, CmsResult};
use crate::page::Page;
use crate::reconcile::{reconcile, PageValidity};
use crate::validation::{validate_for_publish, ValidationReport};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// A page as handed to the rendering/editing layer: the reconciled page
/// plus its validity verdict
#[derive(Debug, Clone)]
pub struct LoadedPage {
	/// The page, already synchronized against the current template
	pub page: Page,
	/// Verdict callers must check before editing or rendering
	pub validity: PageValidity,
}

/// Result rows requested for raw-query items, which carry no own
/// pagination settings
const RAW_QUERY_ROWS: usize = 100;

/// Session-facing CMS service
pub struct CmsService {
	config: CmsConfig,
	catalog: Arc<TemplateCatalog>,
	repository: Arc<dyn PageRepository>,
	search: Arc<dyn SearchIndex>,
	// One lock per persisted page id; guards reconciliation's
	// read-diff-write against concurrent loads of the same page
	page_locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl CmsService {
	/// Create a service over the given collaborators
	pub fn new(
		config: CmsConfig,
		catalog: Arc<TemplateCatalog>,
		repository: Arc<dyn PageRepository>,
		search: Arc<dyn SearchIndex>,
	) -> Self {
		Self {
			config,
			catalog,
			repository,
			search,
			page_locks: DashMap::new(),
		}
	}

	/// The service's configuration
	pub fn config(&self) -> &CmsConfig {
		&self.config
	}

	/// The template catalog
	pub fn catalog(&self) -> &TemplateCatalog {
		&self.catalog
	}

	fn page_lock(&self, id: i64) -> Arc<Mutex<()>> {
		self.page_locks
			.entry(id)
			.or_insert_with(|| Arc::new(Mutex::new(())))
			.clone()
	}

	/// Stamp a new page from the catalog template with the given id
	pub fn create_page(&self, template_id: &str) -> CmsResult<Page> {
		let template = self
			.catalog
			.get(template_id)
			.ok_or_else(|| CmsError::TemplateNotFound(template_id.to_string()))?;
		Ok(template.create_page(&self.config.locales, &self.config.default_locale))
	}

	/// Load a page and synchronize it against the current template.
	///
	/// The returned verdict is [`PageValidity::InvalidNoTemplate`] when
	/// the catalog cannot resolve the page's template; such a page must
	/// not be edited.
	pub async fn load_page(&self, id: i64) -> CmsResult<Option<LoadedPage>> {
		let Some(mut page) = self.repository.load_page(id).await? else {
			return Ok(None);
		};
		let template = self.catalog.get(&page.template_id);
		let lock = self.page_lock(id);
		let validity = {
			let _guard = lock.lock();
			reconcile(&mut page, template.as_deref())
		};
		Ok(Some(LoadedPage { page, validity }))
	}

	/// Every page, sorted by manual sort key then id (unsorted pages
	/// last)
	pub async fn page_list(&self) -> CmsResult<Vec<Page>> {
		let mut pages = self.repository.load_all_pages().await?;
		pages.sort_by_key(|p| {
			(
				p.page_sorting.unwrap_or(i64::MAX),
				p.id.unwrap_or(i64::MAX),
			)
		});
		Ok(pages)
	}

	/// Pages carrying the given classification tag
	pub async fn pages_by_classification(&self, tag: &str) -> CmsResult<Vec<Page>> {
		self.repository.load_pages_by_classification(tag).await
	}

	/// Persist a page, bumping its update timestamp
	pub async fn save_page(&self, page: &mut Page) -> CmsResult<bool> {
		page.touch();
		self.repository.save_page(page).await
	}

	/// Run publish validation, then persist the page with whatever state
	/// mutations validation applied. The report carries the user-facing
	/// messages; nothing here is a hard error.
	pub async fn validate_and_save(&self, page: &mut Page) -> CmsResult<ValidationReport> {
		let report = validate_for_publish(page, &self.config.default_locale);
		self.save_page(page).await?;
		Ok(report)
	}

	/// Delete a page, dropping its load lock
	pub async fn delete_page(&self, page: &Page) -> CmsResult<bool> {
		let deleted = self.repository.delete_page(page).await?;
		if let Some(id) = page.id {
			self.page_locks.remove(&id);
		}
		Ok(deleted)
	}

	/// Resolve the rendered string for a content item, including the
	/// index-backed types [`Page::content_string`] cannot serve alone.
	pub async fn render_content(
		&self,
		page: &Page,
		item_id: &str,
		locale: &str,
		result_page: usize,
	) -> CmsResult<String> {
		let Some(item) =
			page.content_item(item_id, locale, &self.config.default_locale)
		else {
			return Ok(String::new());
		};
		match &item.content {
			ItemContent::Search { .. } => {
				let ItemFunctionality::Search(func) = item.functionality() else {
					return Ok(String::new());
				};
				let hits = self
					.search
					.execute_query(
						&func.solr_query(None),
						&func.sort_field,
						result_page,
						func.elements_per_page,
					)
					.await?;
				Ok(render_hit_list(&hits))
			}
			ItemContent::SolrQuery { query, sort_fields } => {
				let hits = self
					.search
					.execute_query(query, sort_fields, result_page, RAW_QUERY_ROWS)
					.await?;
				Ok(render_hit_list(&hits))
			}
			ItemContent::Collection { field, .. } => {
				let counts = self.search.collection_facet_counts(field).await?;
				let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
				entries.sort();
				let body: String = entries
					.iter()
					.map(|(value, count)| {
						format!("<li>{} ({})</li>", value, count)
					})
					.collect();
				Ok(format!("<ul class=\"cms-collection\">{}</ul>", body))
			}
			_ => Ok(page.content_string(item_id, locale, &self.config.default_locale)),
		}
	}
}

fn render_hit_list(hits: &[Hit]) -> String {
	let body: String = hits
		.iter()
		.map(|hit| format!("<li><a href=\"record/{}/\">{}</a></li>", hit.record_id, hit.title))
		.collect();
	format!("<ul class=\"cms-hits\">{}</ul>", body)
}
