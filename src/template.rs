//! Page templates
//!
//! A template is the externally configured blueprint naming the content
//! slots every page built from it must carry. Templates are parsed from
//! descriptors by the [catalog](crate::catalog) and immutable at runtime.

use crate::content::ContentItem;
use crate::language::{LanguageVersion, VersionStatus, GLOBAL_LANGUAGE};
use crate::page::Page;
use serde::{Deserialize, Serialize};

/// Blueprint for pages: identity, render hints and the content slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageTemplate {
	/// Stable template id, referenced by [`Page::template_id`]
	pub id: String,
	/// Display name shown when picking a template
	pub name: String,
	/// Descriptor version string
	pub version: String,
	/// Free-form description
	pub description: String,
	/// Render template file within the theme
	pub html_file: String,
	/// Icon shown when picking a template
	pub icon: String,
	/// Whether pages offer a sorting-field selector
	pub display_sort_field: bool,
	/// Whether the template renders under expanded URLs
	pub applies_to_expanded_url: bool,
	content_items: Vec<ContentItem>,
}

impl PageTemplate {
	/// Create an empty template with the given id
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Self::default()
		}
	}

	/// The template's content slots, in display order
	pub fn content_items(&self) -> &[ContentItem] {
		&self.content_items
	}

	/// Look up a slot by item id
	pub fn content_item(&self, item_id: &str) -> Option<&ContentItem> {
		self.content_items.iter().find(|i| i.item_id == item_id)
	}

	/// Whether the template defines a slot with the given id
	pub fn has_item(&self, item_id: &str) -> bool {
		self.content_item(item_id).is_some()
	}

	/// Replace the slot list; items are marked template-only and sorted
	/// by the display order.
	pub fn set_content_items(&mut self, mut items: Vec<ContentItem>) {
		for item in &mut items {
			item.is_template_only = true;
		}
		items.sort_by(ContentItem::display_cmp);
		self.content_items = items;
	}

	/// Stamp a new, unpublished page from this template.
	///
	/// One language version is created per requested locale (the default
	/// locale starts `Finished`, the rest `Wip`), plus the global
	/// version. Translatable slots (text/HTML) are cloned once per
	/// non-global version; every other slot is cloned once into the
	/// global version.
	pub fn create_page(&self, locales: &[String], default_locale: &str) -> Page {
		let mut page = Page::new(&self.id);

		for locale in locales {
			let status = if locale == default_locale {
				VersionStatus::Finished
			} else {
				VersionStatus::Wip
			};
			page.add_language_version(LanguageVersion::with_status(locale.clone(), status));
		}
		page.add_language_version(LanguageVersion::new(GLOBAL_LANGUAGE));

		for item in &self.content_items {
			if item.item_type().is_translatable() {
				for version in page.language_versions_mut() {
					if !version.is_global() {
						version.add_content_item(item.instance_clone());
					}
				}
			} else if let Some(global) = page.global_version_mut() {
				global.add_content_item(item.instance_clone());
			}
		}

		page
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::content::ContentItemType;
	use rstest::rstest;

	fn template_with_items() -> PageTemplate {
		let mut template = PageTemplate::new("t1");
		let mut intro = ContentItem::new(ContentItemType::Html, "intro");
		intro.order = 0;
		intro.mandatory = true;
		let mut gallery = ContentItem::new(ContentItemType::Media, "gallery");
		gallery.order = 1;
		template.set_content_items(vec![gallery, intro]);
		template
	}

	#[rstest]
	fn test_set_content_items_marks_and_sorts() {
		let template = template_with_items();
		let ids: Vec<&str> = template
			.content_items()
			.iter()
			.map(|i| i.item_id.as_str())
			.collect();
		assert_eq!(ids, vec!["intro", "gallery"]);
		assert!(template.content_items().iter().all(|i| i.is_template_only));
	}

	#[rstest]
	fn test_create_page_language_split() {
		// Arrange
		let template = template_with_items();
		let locales = vec!["en".to_string(), "de".to_string()];

		// Act
		let page = template.create_page(&locales, "en");

		// Assert - one version per locale plus global
		assert_eq!(page.language_versions().len(), 3);
		assert_eq!(
			page.language_version("en").unwrap().status,
			VersionStatus::Finished
		);
		assert_eq!(
			page.language_version("de").unwrap().status,
			VersionStatus::Wip
		);

		// Assert - HTML slot per language, media slot global only
		assert!(page.language_version("en").unwrap().has_item("intro"));
		assert!(page.language_version("de").unwrap().has_item("intro"));
		assert!(!page.global_version().unwrap().has_item("intro"));
		assert!(page.global_version().unwrap().has_item("gallery"));
		assert!(!page.language_version("en").unwrap().has_item("gallery"));
	}

	#[rstest]
	fn test_create_page_clones_are_instance_items() {
		let template = template_with_items();
		let page = template.create_page(&["en".to_string()], "en");
		let intro = page.language_version("en").unwrap().content_item("intro");
		assert!(!intro.unwrap().is_template_only);
		assert!(!page.published);
		assert_eq!(page.template_id, "t1");
	}
}
