//! Per-locale content bundles
//!
//! Every page owns one language version per configured locale plus one
//! distinguished "global" version holding the language-independent
//! content items. Reads on a language version see its own items plus the
//! global ones (read-through union).

use crate::content::ContentItem;
use crate::template::PageTemplate;
use serde::{Deserialize, Serialize};

/// Sentinel pseudo-locale of the language-independent content bundle
pub const GLOBAL_LANGUAGE: &str = "global";

/// Editorial status of a language version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionStatus {
	/// Being edited
	#[default]
	Wip,
	/// Waiting for editorial review
	ReviewPending,
	/// Ready to be served
	Finished,
}

/// The content bundle of one page for one locale (or the global sentinel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageVersion {
	/// ISO language code, or [`GLOBAL_LANGUAGE`]
	pub language: String,
	/// Editorial status
	pub status: VersionStatus,
	/// Page title in this language
	pub title: String,
	/// Title shown in navigation menus
	pub menu_title: String,
	content_items: Vec<ContentItem>,
}

impl LanguageVersion {
	/// Create an empty version for the given language, status `Wip`
	pub fn new(language: impl Into<String>) -> Self {
		Self {
			language: language.into(),
			status: VersionStatus::Wip,
			title: String::new(),
			menu_title: String::new(),
			content_items: Vec::new(),
		}
	}

	/// Create an empty version with the given status
	pub fn with_status(language: impl Into<String>, status: VersionStatus) -> Self {
		let mut version = Self::new(language);
		version.status = status;
		version
	}

	/// Whether this is the language-independent global bundle
	pub fn is_global(&self) -> bool {
		self.language == GLOBAL_LANGUAGE
	}

	/// The items owned by this version, in insertion order
	pub fn content_items(&self) -> &[ContentItem] {
		&self.content_items
	}

	/// Look up an owned item by id
	pub fn content_item(&self, item_id: &str) -> Option<&ContentItem> {
		self.content_items.iter().find(|i| i.item_id == item_id)
	}

	/// Mutable lookup of an owned item by id
	pub fn content_item_mut(&mut self, item_id: &str) -> Option<&mut ContentItem> {
		self.content_items
			.iter_mut()
			.find(|i| i.item_id == item_id)
	}

	/// Whether this version owns an item with the given id
	pub fn has_item(&self, item_id: &str) -> bool {
		self.content_item(item_id).is_some()
	}

	/// Add an item to this version
	///
	/// A second item with an already-present id is refused with a logged
	/// warning rather than an error; returns whether the item was added.
	pub fn add_content_item(&mut self, item: ContentItem) -> bool {
		if self.has_item(&item.item_id) {
			tracing::warn!(
				"Refusing duplicate content item '{}' in language version '{}'",
				item.item_id,
				self.language
			);
			return false;
		}
		self.content_items.push(item);
		true
	}

	/// Remove the item with the given id; returns whether one was removed
	pub fn remove_content_item(&mut self, item_id: &str) -> bool {
		let before = self.content_items.len();
		self.content_items.retain(|i| i.item_id != item_id);
		self.content_items.len() != before
	}

	/// The complete item list visible to this version: own items plus the
	/// global version's items (when this version is not itself global),
	/// with each item's order overwritten from the matching template item
	/// and the merged list sorted by order then item id.
	///
	/// Recomputed on every call so item edits, including edits to the
	/// global bundle this version reads through, are visible immediately.
	pub fn complete_content_items(
		&self,
		global: Option<&LanguageVersion>,
		template: Option<&PageTemplate>,
	) -> Vec<ContentItem> {
		let mut items: Vec<ContentItem> = self.content_items.clone();
		if !self.is_global() {
			if let Some(global) = global {
				for item in global.content_items() {
					if !items.iter().any(|i| i.item_id == item.item_id) {
						items.push(item.clone());
					}
				}
			}
		}
		if let Some(template) = template {
			for item in &mut items {
				if let Some(template_item) = template.content_item(&item.item_id) {
					item.order = template_item.order;
				}
			}
		}
		items.sort_by(ContentItem::display_cmp);
		items
	}

	/// Completeness check used by publish validation: non-blank title and
	/// every mandatory item in the own/global union filled.
	pub fn is_complete(&self, global: Option<&LanguageVersion>) -> bool {
		if self.title.trim().is_empty() {
			return false;
		}
		let own_ok = self
			.content_items
			.iter()
			.filter(|i| i.mandatory)
			.all(ContentItem::is_complete);
		if !own_ok {
			return false;
		}
		if self.is_global() {
			return true;
		}
		global
			.map(|g| {
				g.content_items()
					.iter()
					.filter(|i| i.mandatory)
					.all(ContentItem::is_complete)
			})
			.unwrap_or(true)
	}
}
