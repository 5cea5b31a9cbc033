//! Content items and their type-specific payloads
//!
//! A content item is one slot/widget on a CMS page. Template items carry
//! configuration only (`is_template_only`); instance items are clones of
//! template items owned by exactly one language version and persisted with
//! the page.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Closed set of content-item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentItemType {
	/// Plain text fragment
	Text,
	/// HTML fragment
	Html,
	/// Reference to an uploaded media asset
	Media,
	/// Raw Solr query with sort fields
	SolrQuery,
	/// List of nested CMS pages filtered by classification
	PageList,
	/// Collection (facet) view over the search index
	Collection,
	/// Tile grid of highlighted records
	TileGrid,
	/// Table of contents of a record
	Toc,
	/// RSS feed snippet
	Rss,
	/// Embedded search mask with executable query
	Search,
	/// Glossary rendered by name
	Glossary,
	/// Themed UI component referenced by path
	Component,
}

impl ContentItemType {
	/// Map a descriptor type name to a type, case-insensitively.
	///
	/// Returns `None` for unrecognized names; the caller decides whether
	/// that fails the whole descriptor.
	pub fn from_name(name: &str) -> Option<Self> {
		match name.to_ascii_lowercase().as_str() {
			"text" => Some(Self::Text),
			"html" => Some(Self::Html),
			"media" => Some(Self::Media),
			"solrquery" => Some(Self::SolrQuery),
			"pagelist" => Some(Self::PageList),
			"collection" => Some(Self::Collection),
			"tilegrid" => Some(Self::TileGrid),
			"toc" => Some(Self::Toc),
			"rss" => Some(Self::Rss),
			"search" => Some(Self::Search),
			"glossary" => Some(Self::Glossary),
			"component" => Some(Self::Component),
			_ => None,
		}
	}

	/// Canonical lower-case name, matching the descriptor vocabulary
	pub fn name(&self) -> &'static str {
		match self {
			Self::Text => "text",
			Self::Html => "html",
			Self::Media => "media",
			Self::SolrQuery => "solrquery",
			Self::PageList => "pagelist",
			Self::Collection => "collection",
			Self::TileGrid => "tilegrid",
			Self::Toc => "toc",
			Self::Rss => "rss",
			Self::Search => "search",
			Self::Glossary => "glossary",
			Self::Component => "component",
		}
	}

	/// Whether items of this type hold free text and are therefore
	/// cloned once per language version instead of once globally
	pub fn is_translatable(&self) -> bool {
		matches!(self, Self::Text | Self::Html)
	}
}

/// Rendering mode of an item slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemMode {
	/// Plain slot
	#[default]
	Simple,
	/// Slot participates in expanded-URL rendering
	Expanded,
}

impl ItemMode {
	/// Parse a descriptor mode attribute, case-insensitively
	pub fn from_name(name: &str) -> Option<Self> {
		match name.to_ascii_lowercase().as_str() {
			"simple" => Some(Self::Simple),
			"expanded" => Some(Self::Expanded),
			_ => None,
		}
	}
}

/// Type tag plus type-specific payload of a content item
///
/// Carrying both in one enum replaces the subclass-per-type model: the
/// tag can never disagree with the fields present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemContent {
	/// Free text, language-specific
	Text {
		/// The text fragment
		html_fragment: String,
	},
	/// Free HTML, language-specific
	Html {
		/// The HTML fragment
		html_fragment: String,
	},
	/// A media asset reference
	Media {
		/// Persistent id of the referenced media asset, if any
		media_id: Option<i64>,
	},
	/// A raw Solr query rendered as a hit list
	SolrQuery {
		/// The query string
		query: String,
		/// Comma-separated sort fields
		sort_fields: String,
	},
	/// Nested pages selected by classification
	PageList {
		/// Classifications a page must carry to be listed
		classifications: Vec<String>,
		/// Pagination size
		elements_per_page: usize,
	},
	/// A collection (facet) view
	Collection {
		/// Facet field driving the view
		field: String,
		/// How many hierarchy levels open initially
		base_levels: u32,
		/// Whether the view starts fully expanded
		open_expanded: bool,
	},
	/// A tile grid of highlighted records
	TileGrid {
		/// Tiles shown per view
		items_per_view: u32,
		/// Number of tiles pinned as important
		important_count: u32,
		/// Tag filter restricting eligible records
		tag_filter: String,
	},
	/// Table of contents of the related record
	Toc,
	/// RSS feed snippet
	Rss {
		/// Feed entries shown
		elements_per_page: usize,
	},
	/// Embedded search with an executable query
	Search {
		/// The base query string
		query: String,
		/// Solr sort field
		sort_field: String,
		/// Hits per result page
		elements_per_page: usize,
	},
	/// Glossary rendered by name
	Glossary {
		/// Name of the glossary to render
		name: String,
	},
	/// Themed UI component
	Component {
		/// Path of the component within the theme
		path: String,
	},
}

impl ItemContent {
	/// Empty payload for the given type
	pub fn empty(item_type: ContentItemType) -> Self {
		match item_type {
			ContentItemType::Text => Self::Text {
				html_fragment: String::new(),
			},
			ContentItemType::Html => Self::Html {
				html_fragment: String::new(),
			},
			ContentItemType::Media => Self::Media { media_id: None },
			ContentItemType::SolrQuery => Self::SolrQuery {
				query: String::new(),
				sort_fields: String::new(),
			},
			ContentItemType::PageList => Self::PageList {
				classifications: Vec::new(),
				elements_per_page: 10,
			},
			ContentItemType::Collection => Self::Collection {
				field: String::new(),
				base_levels: 0,
				open_expanded: false,
			},
			ContentItemType::TileGrid => Self::TileGrid {
				items_per_view: 9,
				important_count: 0,
				tag_filter: String::new(),
			},
			ContentItemType::Toc => Self::Toc,
			ContentItemType::Rss => Self::Rss {
				elements_per_page: 5,
			},
			ContentItemType::Search => Self::Search {
				query: String::new(),
				sort_field: String::new(),
				elements_per_page: 10,
			},
			ContentItemType::Glossary => Self::Glossary {
				name: String::new(),
			},
			ContentItemType::Component => Self::Component {
				path: String::new(),
			},
		}
	}

	/// The type tag of this payload
	pub fn kind(&self) -> ContentItemType {
		match self {
			Self::Text { .. } => ContentItemType::Text,
			Self::Html { .. } => ContentItemType::Html,
			Self::Media { .. } => ContentItemType::Media,
			Self::SolrQuery { .. } => ContentItemType::SolrQuery,
			Self::PageList { .. } => ContentItemType::PageList,
			Self::Collection { .. } => ContentItemType::Collection,
			Self::TileGrid { .. } => ContentItemType::TileGrid,
			Self::Toc => ContentItemType::Toc,
			Self::Rss { .. } => ContentItemType::Rss,
			Self::Search { .. } => ContentItemType::Search,
			Self::Glossary { .. } => ContentItemType::Glossary,
			Self::Component { .. } => ContentItemType::Component,
		}
	}
}

/// One content slot on a page or template
///
/// `item_id` is the stable key shared between a template item and every
/// instance clone made from it; `order` plus `item_id` form the total
/// display ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
	/// Stable key shared with the template item of the same id
	pub item_id: String,
	/// Human-readable label shown in the editor
	pub item_label: String,
	/// Whether publish validation requires this item to be filled
	pub mandatory: bool,
	/// Display order; ties broken lexicographically by `item_id`
	pub order: i32,
	/// Rendering mode
	pub mode: ItemMode,
	/// Template items carry configuration only and are never persisted
	pub is_template_only: bool,
	/// Type tag and type-specific fields
	pub content: ItemContent,
}

impl ContentItem {
	/// Create an empty instance item of the given type
	pub fn new(item_type: ContentItemType, item_id: impl Into<String>) -> Self {
		Self {
			item_id: item_id.into(),
			item_label: String::new(),
			mandatory: false,
			order: 0,
			mode: ItemMode::Simple,
			is_template_only: false,
			content: ItemContent::empty(item_type),
		}
	}

	/// Create a template item (configuration only, never persisted)
	pub fn new_template(item_type: ContentItemType, item_id: impl Into<String>) -> Self {
		let mut item = Self::new(item_type, item_id);
		item.is_template_only = true;
		item
	}

	/// The type tag, derived from the payload
	pub fn item_type(&self) -> ContentItemType {
		self.content.kind()
	}

	/// Clone this (template) item into an instance item
	pub fn instance_clone(&self) -> Self {
		let mut clone = self.clone();
		clone.is_template_only = false;
		clone
	}

	/// Type-specific non-emptiness check used by publish validation
	///
	/// Types without a fillable payload are always complete.
	pub fn is_complete(&self) -> bool {
		match &self.content {
			ItemContent::Text { html_fragment } | ItemContent::Html { html_fragment } => {
				!html_fragment.trim().is_empty()
			}
			ItemContent::Media { media_id } => media_id.is_some(),
			ItemContent::SolrQuery { query, .. } => !query.trim().is_empty(),
			ItemContent::PageList {
				classifications, ..
			} => !classifications.is_empty(),
			_ => true,
		}
	}

	/// Text/HTML fragment, if this item carries one
	pub fn html_fragment(&self) -> Option<&str> {
		match &self.content {
			ItemContent::Text { html_fragment } | ItemContent::Html { html_fragment } => {
				Some(html_fragment)
			}
			_ => None,
		}
	}

	/// Set the text/HTML fragment; no-op for other types
	pub fn set_html_fragment(&mut self, fragment: impl Into<String>) {
		match &mut self.content {
			ItemContent::Text { html_fragment } | ItemContent::Html { html_fragment } => {
				*html_fragment = fragment.into();
			}
			_ => {}
		}
	}

	/// Type-specific behavior, rebuilt from the current fields on every
	/// access; there is no cached behavior object to invalidate
	pub fn functionality(&self) -> ItemFunctionality {
		match &self.content {
			ItemContent::Search {
				query,
				sort_field,
				elements_per_page,
			} => ItemFunctionality::Search(SearchFunctionality {
				query: query.clone(),
				sort_field: sort_field.clone(),
				elements_per_page: *elements_per_page,
			}),
			ItemContent::Toc => ItemFunctionality::Toc(TocFunctionality),
			_ => ItemFunctionality::None,
		}
	}

	/// Total display ordering: by `order`, ties broken lexicographically
	/// by `item_id`.
	///
	/// Deliberately a named comparator rather than an `Ord` impl, since
	/// equality compares every field while display ordering only looks at
	/// these two.
	pub fn display_cmp(&self, other: &Self) -> Ordering {
		self.order
			.cmp(&other.order)
			.then_with(|| self.item_id.cmp(&other.item_id))
	}
}

/// Type-specific behavior of a content item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemFunctionality {
	/// Query builder/executor of a `Search` item
	Search(SearchFunctionality),
	/// Table-of-contents locator of a `Toc` item
	Toc(TocFunctionality),
	/// Everything else has no behavior
	None,
}

/// Query builder of an embedded search item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFunctionality {
	/// Base query configured on the item
	pub query: String,
	/// Solr sort field configured on the item
	pub sort_field: String,
	/// Hits per result page
	pub elements_per_page: usize,
}

impl SearchFunctionality {
	/// Build the effective Solr query, AND-ing an optional caller filter
	/// onto the configured base query.
	pub fn solr_query(&self, filter: Option<&str>) -> String {
		let base = self.query.trim();
		match filter.map(str::trim).filter(|f| !f.is_empty()) {
			Some(filter) if !base.is_empty() => format!("({}) AND ({})", base, filter),
			Some(filter) => filter.to_string(),
			None => base.to_string(),
		}
	}
}

/// Table-of-contents locator of a `Toc` item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocFunctionality;

impl TocFunctionality {
	/// URL fragment addressing the TOC of the given record
	pub fn toc_url(&self, record_id: &str) -> String {
		format!("toc/{}/", record_id)
	}
}
