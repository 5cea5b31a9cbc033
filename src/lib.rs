//! # Codex CMS
//!
//! The CMS page engine of a digitized-object presentation platform:
//! persistent pages stamped from externally configured templates, with
//! per-language content bundles, a shared "global" bundle for
//! language-independent content, and deterministic resolution of what to
//! render for any requested locale.
//!
//! ## Architecture
//!
//! ```text
//! codex-cms
//! ├── content    - Content items, type payloads, display ordering
//! ├── language   - Per-locale content bundles, completion status
//! ├── page       - Page aggregate, best-language resolution
//! ├── sidebar    - Sidebar widgets, HTML sanitizing
//! ├── template   - Page templates, page construction
//! ├── catalog    - Template descriptor loading, atomic reload
//! ├── reconcile  - Template/page synchronization, validity verdict
//! ├── validation - Publish validation state machine
//! ├── boundary   - Persistence and search-index traits
//! └── service    - Request-facing orchestration
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use codex_cms::prelude::*;
//!
//! let catalog = TemplateCatalog::new(&config);
//! let template = catalog.get("news").unwrap();
//!
//! // Stamp a new page from the template
//! let mut page = template.create_page(&config.locales, &config.default_locale);
//!
//! // Every load re-syncs the page against the current template
//! let validity = reconcile(&mut page, Some(&template));
//! assert_eq!(validity, PageValidity::Valid);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

// Re-export for downstream payload handling
pub use serde;
pub use serde_json;

// Module declarations
pub mod boundary;
pub mod catalog;
pub mod config;
pub mod content;
pub mod language;
pub mod page;
pub mod reconcile;
pub mod service;
pub mod sidebar;
pub mod template;
pub mod validation;

// Prelude for convenient imports
pub mod prelude {
	//! Convenient re-exports of commonly used items

	// Config
	pub use crate::config::CmsConfig;

	// Content
	pub use crate::content::{ContentItem, ContentItemType, ItemContent, ItemMode};

	// Language
	pub use crate::language::{LanguageVersion, VersionStatus, GLOBAL_LANGUAGE};

	// Page
	pub use crate::page::Page;

	// Sidebar
	pub use crate::sidebar::{SidebarElement, WidgetKind};

	// Template
	pub use crate::template::PageTemplate;

	// Catalog
	pub use crate::catalog::TemplateCatalog;

	// Reconciliation
	pub use crate::reconcile::{reconcile, PageValidity};

	// Validation
	pub use crate::validation::{validate_for_publish, ValidationReport};

	// Boundaries
	pub use crate::boundary::{Hit, PageRepository, SearchIndex};

	// Service
	pub use crate::service::CmsService;
}

/// CMS error types
pub mod error {
	use thiserror::Error;

	/// CMS-related errors
	#[derive(Error, Debug)]
	pub enum CmsError {
		/// Template descriptor could not be parsed
		#[error("Invalid template descriptor: {0}")]
		Descriptor(String),

		/// No template with the given id exists in the catalog
		#[error("Template not found: {0}")]
		TemplateNotFound(String),

		/// Persistence boundary failure
		#[error("Repository error: {0}")]
		Repository(String),

		/// Search-index boundary failure
		#[error("Search index error: {0}")]
		SearchIndex(String),

		/// Generic error
		#[error("{0}")]
		Generic(String),
	}

	/// Result type for CMS operations
	pub type CmsResult<T> = Result<T, CmsError>;
}
