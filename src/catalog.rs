//! Template catalog
//!
//! Loads template descriptors from a themed search path (theme-specific
//! directory first, shared fallback directory second; the theme wins on
//! id collisions) and serves parsed templates by id. A reload rebuilds
//! the whole map and swaps it atomically, so concurrent readers never
//! observe a partially populated catalog.
//!
//! A descriptor that fails to parse is logged and skipped; it never
//! fails the batch.

use crate::config::CmsConfig;
use crate::content::{ContentItem, ContentItemType, ItemContent, ItemMode};
use crate::error::{CmsError, CmsResult};
use crate::template::PageTemplate;
use parking_lot::RwLock;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// In-memory catalog of page templates, reloadable at runtime
pub struct TemplateCatalog {
	theme_dir: PathBuf,
	fallback_dir: PathBuf,
	templates: RwLock<Arc<HashMap<String, Arc<PageTemplate>>>>,
}

impl TemplateCatalog {
	/// Build a catalog from the configured descriptor directories and
	/// perform the initial load.
	pub fn new(config: &CmsConfig) -> Self {
		Self::from_dirs(&config.theme_template_dir, &config.fallback_template_dir)
	}

	/// Build a catalog over explicit directories and load immediately
	pub fn from_dirs(theme_dir: impl Into<PathBuf>, fallback_dir: impl Into<PathBuf>) -> Self {
		let catalog = Self {
			theme_dir: theme_dir.into(),
			fallback_dir: fallback_dir.into(),
			templates: RwLock::new(Arc::new(HashMap::new())),
		};
		catalog.reload();
		catalog
	}

	/// The template with the given id, if loaded
	pub fn get(&self, template_id: &str) -> Option<Arc<PageTemplate>> {
		self.templates.read().get(template_id).cloned()
	}

	/// All loaded templates, sorted by id
	pub fn templates(&self) -> Vec<Arc<PageTemplate>> {
		let map = self.templates.read();
		let mut templates: Vec<Arc<PageTemplate>> = map.values().cloned().collect();
		templates.sort_by(|a, b| a.id.cmp(&b.id));
		templates
	}

	/// Number of loaded templates
	pub fn len(&self) -> usize {
		self.templates.read().len()
	}

	/// Whether the catalog is empty
	pub fn is_empty(&self) -> bool {
		self.templates.read().is_empty()
	}

	/// Re-run the descriptor scan and atomically swap the catalog.
	///
	/// The new map is built completely before the swap; in-flight lookups
	/// keep reading the old map until then. Returns the number of
	/// templates now loaded.
	pub fn reload(&self) -> usize {
		let map = Arc::new(load_all(&self.theme_dir, &self.fallback_dir));
		let count = map.len();
		*self.templates.write() = map;
		count
	}
}

/// Scan both descriptor directories and parse every `*.xml` file found.
///
/// The theme directory is scanned first; a fallback descriptor with an
/// id the theme already provided is ignored.
pub fn load_all(theme_dir: &Path, fallback_dir: &Path) -> HashMap<String, Arc<PageTemplate>> {
	let mut map: HashMap<String, Arc<PageTemplate>> = HashMap::new();
	for dir in [theme_dir, fallback_dir] {
		for path in descriptor_files(dir) {
			let xml = match std::fs::read_to_string(&path) {
				Ok(xml) => xml,
				Err(err) => {
					tracing::error!("Cannot read template descriptor {:?}: {}", path, err);
					continue;
				}
			};
			match parse_descriptor(&xml) {
				Ok(template) => {
					if map.contains_key(&template.id) {
						tracing::debug!(
							"Template '{}' from {:?} shadowed by theme descriptor",
							template.id,
							path
						);
					} else {
						map.insert(template.id.clone(), Arc::new(template));
					}
				}
				Err(err) => {
					tracing::error!("Skipping template descriptor {:?}: {}", path, err);
				}
			}
		}
	}
	map
}

/// `*.xml` files in the directory, sorted by name for determinism.
/// A missing or unreadable directory yields an empty list.
fn descriptor_files(dir: &Path) -> Vec<PathBuf> {
	let entries = match std::fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(_) => return Vec::new(),
	};
	let mut files: Vec<PathBuf> = entries
		.filter_map(|e| e.ok())
		.map(|e| e.path())
		.filter(|p| {
			p.extension()
				.map(|ext| ext.eq_ignore_ascii_case("xml"))
				.unwrap_or(false)
		})
		.collect();
	files.sort();
	files
}

/// Parse one template descriptor document.
///
/// Root attributes `id` and `version`; child text nodes `name`,
/// `description`, `icon`, `html`; a `content` element of `item`
/// elements; an optional `options` element with boolean text nodes
/// `useSorterField` and `appliesToExpandedUrl`. An unknown or missing
/// item type fails the whole descriptor.
pub fn parse_descriptor(xml: &str) -> CmsResult<PageTemplate> {
	let mut reader = Reader::from_str(xml);
	let mut template = PageTemplate::default();
	let mut items: Vec<ContentItem> = Vec::new();
	let mut path: Vec<String> = Vec::new();
	let mut insertion_index: i32 = 0;

	loop {
		match reader.read_event() {
			Ok(Event::Start(e)) => {
				let name = element_name(&e);
				if path.is_empty() {
					read_root_attributes(&e, &mut template)?;
				} else if name == "item" {
					items.push(parse_item(&e, insertion_index)?);
					insertion_index += 1;
				}
				path.push(name);
			}
			Ok(Event::Empty(e)) => {
				let name = element_name(&e);
				if name == "item" {
					items.push(parse_item(&e, insertion_index)?);
					insertion_index += 1;
				}
			}
			Ok(Event::Text(e)) => {
				let text = e
					.unescape()
					.map_err(|err| CmsError::Descriptor(format!("text decode: {}", err)))?;
				let text = text.trim();
				if !text.is_empty() {
					assign_text(&mut template, &path, text);
				}
			}
			Ok(Event::End(_)) => {
				path.pop();
			}
			Ok(Event::Eof) => {
				if !path.is_empty() {
					return Err(CmsError::Descriptor(format!(
						"unclosed element '{}'",
						path.join("/")
					)));
				}
				break;
			}
			Ok(_) => {}
			Err(err) => {
				return Err(CmsError::Descriptor(format!("malformed XML: {}", err)));
			}
		}
	}

	if template.id.trim().is_empty() {
		return Err(CmsError::Descriptor(
			"missing id attribute on root element".to_string(),
		));
	}
	for (index, item) in items.iter().enumerate() {
		if items[..index].iter().any(|i| i.item_id == item.item_id) {
			return Err(CmsError::Descriptor(format!(
				"duplicate item id '{}'",
				item.item_id
			)));
		}
	}
	template.set_content_items(items);
	Ok(template)
}

fn element_name(e: &BytesStart) -> String {
	String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn attribute(e: &BytesStart, name: &str) -> CmsResult<Option<String>> {
	match e.try_get_attribute(name) {
		Ok(Some(attr)) => {
			let value = attr
				.unescape_value()
				.map_err(|err| CmsError::Descriptor(format!("attribute decode: {}", err)))?;
			Ok(Some(value.into_owned()))
		}
		Ok(None) => Ok(None),
		Err(err) => Err(CmsError::Descriptor(format!("attribute error: {}", err))),
	}
}

fn read_root_attributes(e: &BytesStart, template: &mut PageTemplate) -> CmsResult<()> {
	if let Some(id) = attribute(e, "id")? {
		template.id = id;
	}
	if let Some(version) = attribute(e, "version")? {
		template.version = version;
	}
	Ok(())
}

/// Assign a text node to the template field addressed by the element path
fn assign_text(template: &mut PageTemplate, path: &[String], text: &str) {
	match path {
		[_, field] => match field.as_str() {
			"name" => template.name = text.to_string(),
			"description" => template.description = text.to_string(),
			"icon" => template.icon = text.to_string(),
			"html" => template.html_file = text.to_string(),
			_ => {}
		},
		[_, options, field] if options == "options" => match field.as_str() {
			"useSorterField" => template.display_sort_field = parse_bool(text),
			"appliesToExpandedUrl" => template.applies_to_expanded_url = parse_bool(text),
			_ => {}
		},
		_ => {}
	}
}

fn parse_bool(text: &str) -> bool {
	text.trim().eq_ignore_ascii_case("true")
}

/// Build a template content item from an `<item>` element.
///
/// `type` and `id` are required; `mandatory` defaults to false, `mode`
/// to simple and `order` to the insertion index.
fn parse_item(e: &BytesStart, insertion_index: i32) -> CmsResult<ContentItem> {
	let type_name = attribute(e, "type")?
		.ok_or_else(|| CmsError::Descriptor("item without type attribute".to_string()))?;
	let item_type = ContentItemType::from_name(&type_name)
		.ok_or_else(|| CmsError::Descriptor(format!("unknown item type '{}'", type_name)))?;
	let item_id = attribute(e, "id")?
		.filter(|id| !id.trim().is_empty())
		.ok_or_else(|| CmsError::Descriptor("item without id attribute".to_string()))?;

	let mut item = ContentItem {
		item_id,
		item_label: attribute(e, "label")?.unwrap_or_default(),
		mandatory: attribute(e, "mandatory")?
			.map(|v| parse_bool(&v))
			.unwrap_or(false),
		order: insertion_index,
		mode: ItemMode::Simple,
		is_template_only: true,
		content: ItemContent::empty(item_type),
	};
	if let Some(mode) = attribute(e, "mode")? {
		match ItemMode::from_name(&mode) {
			Some(mode) => item.mode = mode,
			None => {
				tracing::warn!(
					"Unknown mode '{}' on item '{}', using simple",
					mode,
					item.item_id
				);
			}
		}
	}
	if let Some(order) = attribute(e, "order")? {
		match order.trim().parse::<i32>() {
			Ok(order) => item.order = order,
			Err(_) => {
				tracing::warn!(
					"Unparseable order '{}' on item '{}', using insertion index",
					order,
					item.item_id
				);
			}
		}
	}
	Ok(item)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	const DESCRIPTOR: &str = r#"<template id="news" version="2">
		<name>News page</name>
		<description>A simple news page</description>
		<icon>icons/news.png</icon>
		<html>cms/news.xhtml</html>
		<content>
			<item type="html" id="intro" label="Introduction" mandatory="true" order="0" />
			<item type="media" id="gallery" order="1" />
			<item type="search" id="results" mode="expanded" />
		</content>
		<options>
			<useSorterField>true</useSorterField>
			<appliesToExpandedUrl>false</appliesToExpandedUrl>
		</options>
	</template>"#;

	#[rstest]
	fn test_parse_full_descriptor() {
		// Act
		let template = parse_descriptor(DESCRIPTOR).unwrap();

		// Assert - root attributes and text nodes
		assert_eq!(template.id, "news");
		assert_eq!(template.version, "2");
		assert_eq!(template.name, "News page");
		assert_eq!(template.description, "A simple news page");
		assert_eq!(template.icon, "icons/news.png");
		assert_eq!(template.html_file, "cms/news.xhtml");
		assert!(template.display_sort_field);
		assert!(!template.applies_to_expanded_url);

		// Assert - items parsed, marked template-only, sorted
		assert_eq!(template.content_items().len(), 3);
		let intro = template.content_item("intro").unwrap();
		assert_eq!(intro.item_type(), ContentItemType::Html);
		assert_eq!(intro.item_label, "Introduction");
		assert!(intro.mandatory);
		assert!(intro.is_template_only);
		let results = template.content_item("results").unwrap();
		assert_eq!(results.mode, ItemMode::Expanded);
		assert!(!results.mandatory);
	}

	#[rstest]
	fn test_order_defaults_to_insertion_index() {
		let xml = r#"<template id="t">
			<content>
				<item type="text" id="b" />
				<item type="text" id="a" />
			</content>
		</template>"#;
		let template = parse_descriptor(xml).unwrap();
		let ids: Vec<&str> = template
			.content_items()
			.iter()
			.map(|i| i.item_id.as_str())
			.collect();
		// Insertion order preserved via default order values
		assert_eq!(ids, vec!["b", "a"]);
		assert_eq!(template.content_item("b").unwrap().order, 0);
		assert_eq!(template.content_item("a").unwrap().order, 1);
	}

	#[rstest]
	fn test_unknown_item_type_fails_descriptor() {
		let xml = r#"<template id="t">
			<content><item type="video" id="v" /></content>
		</template>"#;
		let err = parse_descriptor(xml).unwrap_err();
		assert!(matches!(err, CmsError::Descriptor(_)));
	}

	#[rstest]
	fn test_missing_item_type_fails_descriptor() {
		let xml = r#"<template id="t">
			<content><item id="v" /></content>
		</template>"#;
		assert!(parse_descriptor(xml).is_err());
	}

	#[rstest]
	fn test_missing_root_id_fails_descriptor() {
		let xml = r#"<template><content/></template>"#;
		assert!(parse_descriptor(xml).is_err());
	}

	#[rstest]
	fn test_duplicate_item_ids_fail_descriptor() {
		let xml = r#"<template id="t">
			<content>
				<item type="text" id="x" />
				<item type="html" id="x" />
			</content>
		</template>"#;
		assert!(parse_descriptor(xml).is_err());
	}

	#[rstest]
	fn test_malformed_xml_fails_descriptor() {
		assert!(parse_descriptor("<template id='t'><content>").is_err());
		assert!(parse_descriptor("not xml at all <<<").is_err());
	}

	#[rstest]
	fn test_items_sorted_by_order_then_id() {
		let xml = r#"<template id="t">
			<content>
				<item type="text" id="z" order="0" />
				<item type="text" id="a" order="1" />
				<item type="text" id="b" order="0" />
			</content>
		</template>"#;
		let template = parse_descriptor(xml).unwrap();
		let ids: Vec<&str> = template
			.content_items()
			.iter()
			.map(|i| i.item_id.as_str())
			.collect();
		assert_eq!(ids, vec!["b", "z", "a"]);
	}
}
