//! The page aggregate
//!
//! A page owns its language versions (one per locale plus the global
//! bundle) and sidebar elements, and resolves which language version and
//! which content items to serve for any requested locale. Resolution
//! degrades gracefully: a page missing translations still renders with
//! whatever finished content exists, never erroring at the caller.

use crate::content::{ContentItem, ItemContent};
use crate::language::{LanguageVersion, VersionStatus};
use crate::sidebar::SidebarElement;
use crate::template::PageTemplate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One CMS page, stamped from a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
	/// Persistent id; absent until first saved
	pub id: Option<i64>,
	/// Id of the template this page was stamped from
	pub template_id: String,
	/// Creation timestamp
	pub date_created: DateTime<Utc>,
	/// Last-update timestamp
	pub date_updated: DateTime<Utc>,
	/// Whether the page is served to visitors
	pub published: bool,
	/// Manual sort key for page listings
	pub page_sorting: Option<i64>,
	/// Use the theme's default sidebar instead of the page's own elements
	pub use_default_sidebar: bool,
	/// Stable URL alias served instead of the id-based path
	pub persistent_url: Option<String>,
	/// Identifier of the digitized record this page accompanies
	pub related_record_id: Option<String>,
	/// Sub-theme this page belongs to
	pub sub_theme_discriminator: Option<String>,
	/// Reference to a parent page, by id or persistent URL
	pub parent_page_id: Option<String>,
	/// Free-form classification tags
	pub classifications: Vec<String>,
	language_versions: Vec<LanguageVersion>,
	/// Sidebar widgets, ignored when `use_default_sidebar` is set
	pub sidebar_elements: Vec<SidebarElement>,
}

impl Page {
	/// Create an empty, unpublished page for the given template id
	pub fn new(template_id: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: None,
			template_id: template_id.into(),
			date_created: now,
			date_updated: now,
			published: false,
			page_sorting: None,
			use_default_sidebar: false,
			persistent_url: None,
			related_record_id: None,
			sub_theme_discriminator: None,
			parent_page_id: None,
			classifications: Vec::new(),
			language_versions: Vec::new(),
			sidebar_elements: Vec::new(),
		}
	}

	/// Bump the update timestamp
	pub fn touch(&mut self) {
		self.date_updated = Utc::now();
	}

	/// All language versions, in page order (global included)
	pub fn language_versions(&self) -> &[LanguageVersion] {
		&self.language_versions
	}

	/// Mutable access to all language versions
	pub fn language_versions_mut(&mut self) -> &mut [LanguageVersion] {
		&mut self.language_versions
	}

	/// Add a language version; at most one version per language string.
	///
	/// A second version for an already-present language is refused with a
	/// logged warning; returns whether the version was added.
	pub fn add_language_version(&mut self, version: LanguageVersion) -> bool {
		if self.language_version(&version.language).is_some() {
			tracing::warn!(
				"Refusing duplicate language version '{}' on page {:?}",
				version.language,
				self.id
			);
			return false;
		}
		self.language_versions.push(version);
		true
	}

	/// The version for the given language, if present
	pub fn language_version(&self, language: &str) -> Option<&LanguageVersion> {
		self.language_versions
			.iter()
			.find(|v| v.language == language)
	}

	/// Mutable version lookup
	pub fn language_version_mut(&mut self, language: &str) -> Option<&mut LanguageVersion> {
		self.language_versions
			.iter_mut()
			.find(|v| v.language == language)
	}

	/// The global (language-independent) bundle
	pub fn global_version(&self) -> Option<&LanguageVersion> {
		self.language_versions.iter().find(|v| v.is_global())
	}

	/// Mutable access to the global bundle
	pub fn global_version_mut(&mut self) -> Option<&mut LanguageVersion> {
		self.language_versions.iter_mut().find(|v| v.is_global())
	}

	/// Best version to serve for the requested locale, by reference.
	///
	/// Fallback chain: requested locale if `Finished`, default locale if
	/// `Finished`, first finished non-global version, first non-global
	/// version. `None` only when the page has no non-global version at
	/// all.
	pub fn best_version_ref(
		&self,
		locale: &str,
		default_locale: &str,
	) -> Option<&LanguageVersion> {
		if let Some(version) = self.language_version(locale) {
			if version.status == VersionStatus::Finished {
				return Some(version);
			}
		}
		if let Some(version) = self.language_version(default_locale) {
			if version.status == VersionStatus::Finished {
				return Some(version);
			}
		}
		if let Some(version) = self
			.language_versions
			.iter()
			.find(|v| !v.is_global() && v.status == VersionStatus::Finished)
		{
			return Some(version);
		}
		self.language_versions.iter().find(|v| !v.is_global())
	}

	/// Best version to serve for the requested locale.
	///
	/// Like [`best_version_ref`](Self::best_version_ref) but total: a
	/// page with no non-global version yields a fresh empty version for
	/// the requested locale, so callers never handle an error.
	pub fn best_language_version(&self, locale: &str, default_locale: &str) -> LanguageVersion {
		self.best_version_ref(locale, default_locale)
			.cloned()
			.unwrap_or_else(|| LanguageVersion::new(locale))
	}

	/// Look up a content item by id across language versions.
	///
	/// Tries the best version's visible items (own plus global), then the
	/// default-locale version, then every other version in page order.
	pub fn content_item(
		&self,
		item_id: &str,
		locale: &str,
		default_locale: &str,
	) -> Option<&ContentItem> {
		if let Some(best) = self.best_version_ref(locale, default_locale) {
			if let Some(item) = best.content_item(item_id) {
				return Some(item);
			}
			if !best.is_global() {
				if let Some(item) = self
					.global_version()
					.and_then(|g| g.content_item(item_id))
				{
					return Some(item);
				}
			}
		}
		if let Some(item) = self
			.language_version(default_locale)
			.and_then(|v| v.content_item(item_id))
		{
			return Some(item);
		}
		self.language_versions
			.iter()
			.find_map(|v| v.content_item(item_id))
	}

	/// The ordered item list to render for the requested locale: the best
	/// version's own items unioned with the global items, template order
	/// applied, sorted by order then item id.
	pub fn sorted_content_items(
		&self,
		locale: &str,
		default_locale: &str,
		template: Option<&PageTemplate>,
	) -> Vec<ContentItem> {
		match self.best_version_ref(locale, default_locale) {
			Some(version) => version.complete_content_items(self.global_version(), template),
			None => self
				.global_version()
				.map(|g| g.complete_content_items(None, template))
				.unwrap_or_default(),
		}
	}

	/// Distinct item ids present across all language versions
	pub fn content_item_ids(&self) -> BTreeSet<String> {
		self.language_versions
			.iter()
			.flat_map(|v| v.content_items().iter().map(|i| i.item_id.clone()))
			.collect()
	}

	/// Whether any language version owns an item with the given id
	pub fn has_content_item(&self, item_id: &str) -> bool {
		self.language_versions.iter().any(|v| v.has_item(item_id))
	}

	/// Remove the item with the given id from every language version;
	/// returns whether anything was removed.
	pub fn remove_content_item(&mut self, item_id: &str) -> bool {
		let mut removed = false;
		for version in &mut self.language_versions {
			removed |= version.remove_content_item(item_id);
		}
		removed
	}

	/// Page title for the requested locale, via best-language resolution
	pub fn title(&self, locale: &str, default_locale: &str) -> String {
		self.best_version_ref(locale, default_locale)
			.map(|v| v.title.clone())
			.unwrap_or_default()
	}

	/// Menu title for the requested locale; falls back to the page title
	pub fn menu_title(&self, locale: &str, default_locale: &str) -> String {
		match self.best_version_ref(locale, default_locale) {
			Some(version) if !version.menu_title.trim().is_empty() => {
				version.menu_title.clone()
			}
			_ => self.title(locale, default_locale),
		}
	}

	/// Literal string to embed for the given item, dispatched by type.
	///
	/// Text and HTML yield their fragment and media items their asset
	/// path; index-backed types resolve through the service layer and
	/// yield an empty string here.
	pub fn content_string(&self, item_id: &str, locale: &str, default_locale: &str) -> String {
		match self.content_item(item_id, locale, default_locale) {
			Some(item) => match &item.content {
				ItemContent::Text { html_fragment } | ItemContent::Html { html_fragment } => {
					html_fragment.clone()
				}
				ItemContent::Media { media_id } => media_id
					.map(|id| format!("cms/media/{}/", id))
					.unwrap_or_default(),
				ItemContent::Component { path } => path.clone(),
				_ => String::new(),
			},
			None => String::new(),
		}
	}

	/// Relative URL path of this page.
	///
	/// A persistent URL wins; otherwise pretty pages resolve to
	/// `cms/{id}/` and plain pages to the viewer servlet path. Unsaved
	/// pages have no id yet and yield an empty path.
	pub fn relative_url_path(&self, pretty: bool) -> String {
		if let Some(url) = self
			.persistent_url
			.as_deref()
			.map(str::trim)
			.filter(|u| !u.is_empty())
		{
			let trimmed = url.trim_matches('/');
			return format!("{}/", trimmed);
		}
		match self.id {
			Some(id) if pretty => format!("cms/{}/", id),
			Some(id) => format!("cms/cms.xhtml?selectedPageId={}", id),
			None => String::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::content::{ContentItem, ContentItemType};
	use crate::language::GLOBAL_LANGUAGE;
	use rstest::rstest;

	fn page_with_versions() -> Page {
		let mut page = Page::new("t1");
		page.add_language_version(LanguageVersion::with_status("en", VersionStatus::Finished));
		page.add_language_version(LanguageVersion::new("de"));
		page.add_language_version(LanguageVersion::new(GLOBAL_LANGUAGE));
		page
	}

	#[rstest]
	fn test_duplicate_language_version_refused() {
		let mut page = page_with_versions();
		assert!(!page.add_language_version(LanguageVersion::new("en")));
		assert_eq!(page.language_versions().len(), 3);
	}

	#[rstest]
	fn test_best_language_prefers_finished_requested_locale() {
		let mut page = page_with_versions();
		page.language_version_mut("de").unwrap().status = VersionStatus::Finished;
		let best = page.best_language_version("de", "en");
		assert_eq!(best.language, "de");
	}

	#[rstest]
	fn test_best_language_falls_back_to_default() {
		let page = page_with_versions();
		// "de" exists but is WIP; default "en" is finished
		let best = page.best_language_version("de", "en");
		assert_eq!(best.language, "en");
	}

	#[rstest]
	fn test_best_language_falls_back_to_any_finished() {
		let mut page = Page::new("t1");
		page.add_language_version(LanguageVersion::new("en"));
		page.add_language_version(LanguageVersion::with_status("fr", VersionStatus::Finished));
		page.add_language_version(LanguageVersion::new(GLOBAL_LANGUAGE));

		let best = page.best_language_version("de", "en");
		assert_eq!(best.language, "fr");
	}

	#[rstest]
	fn test_best_language_never_returns_global() {
		let mut page = Page::new("t1");
		page.add_language_version(LanguageVersion::new(GLOBAL_LANGUAGE));
		let best = page.best_language_version("de", "en");
		assert_eq!(best.language, "de");
		assert!(best.content_items().is_empty());
	}

	#[rstest]
	fn test_content_item_lookup_reads_global() {
		let mut page = page_with_versions();
		page.global_version_mut()
			.unwrap()
			.add_content_item(ContentItem::new(ContentItemType::Media, "gallery"));

		let item = page.content_item("gallery", "en", "en");
		assert_eq!(item.unwrap().item_type(), ContentItemType::Media);
	}

	#[rstest]
	fn test_content_item_lookup_falls_through_versions() {
		let mut page = page_with_versions();
		// Item only exists in the non-best, non-default "de" version
		page.language_version_mut("de")
			.unwrap()
			.add_content_item(ContentItem::new(ContentItemType::Text, "aside"));

		assert!(page.content_item("aside", "en", "en").is_some());
		assert!(page.content_item("missing", "en", "en").is_none());
	}

	#[rstest]
	fn test_sorted_items_reflect_global_edit() {
		// Arrange - prime the rendered list, then edit the global item
		let mut page = page_with_versions();
		page.global_version_mut()
			.unwrap()
			.add_content_item(ContentItem::new(ContentItemType::Media, "gallery"));
		let before = page.sorted_content_items("en", "en", None);
		assert!(!before[0].is_complete());

		// Act
		page.global_version_mut()
			.unwrap()
			.content_item_mut("gallery")
			.unwrap()
			.content = crate::content::ItemContent::Media { media_id: Some(42) };

		// Assert - the edit is visible through every non-global version
		let after = page.sorted_content_items("en", "en", None);
		assert_eq!(
			after[0].content,
			crate::content::ItemContent::Media { media_id: Some(42) }
		);
	}

	#[rstest]
	fn test_menu_title_falls_back_to_title() {
		let mut page = page_with_versions();
		page.language_version_mut("en").unwrap().title = "Home".to_string();
		assert_eq!(page.menu_title("en", "en"), "Home");

		page.language_version_mut("en").unwrap().menu_title = "Start".to_string();
		assert_eq!(page.menu_title("en", "en"), "Start");
	}

	#[rstest]
	fn test_content_string_dispatch() {
		let mut page = page_with_versions();
		let mut intro = ContentItem::new(ContentItemType::Html, "intro");
		intro.set_html_fragment("<p>Hi</p>");
		page.language_version_mut("en").unwrap().add_content_item(intro);
		page.global_version_mut().unwrap().add_content_item({
			let mut media = ContentItem::new(ContentItemType::Media, "gallery");
			media.content = crate::content::ItemContent::Media { media_id: Some(12) };
			media
		});

		assert_eq!(page.content_string("intro", "en", "en"), "<p>Hi</p>");
		assert_eq!(page.content_string("gallery", "en", "en"), "cms/media/12/");
		assert_eq!(page.content_string("missing", "en", "en"), "");
	}

	#[rstest]
	#[case(None, true, "")]
	#[case(Some(4), true, "cms/4/")]
	#[case(Some(4), false, "cms/cms.xhtml?selectedPageId=4")]
	fn test_relative_url_path(
		#[case] id: Option<i64>,
		#[case] pretty: bool,
		#[case] expected: &str,
	) {
		let mut page = Page::new("t1");
		page.id = id;
		assert_eq!(page.relative_url_path(pretty), expected);
	}

	#[rstest]
	fn test_relative_url_path_prefers_persistent_url() {
		let mut page = Page::new("t1");
		page.id = Some(4);
		page.persistent_url = Some("/about/".to_string());
		assert_eq!(page.relative_url_path(true), "about/");
	}
}
