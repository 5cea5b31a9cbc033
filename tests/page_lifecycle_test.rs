//! End-to-end page lifecycle: stamp from template, edit, validate,
//! template evolution via reconciliation

use codex_cms::content::{ContentItem, ContentItemType};
use codex_cms::language::VersionStatus;
use codex_cms::reconcile::{reconcile, PageValidity};
use codex_cms::template::PageTemplate;
use codex_cms::validation::validate_for_publish;
use rstest::rstest;

fn sample_template() -> PageTemplate {
	let mut template = PageTemplate::new("T1");
	let mut intro = ContentItem::new_template(ContentItemType::Html, "intro");
	intro.order = 0;
	intro.mandatory = true;
	let mut gallery = ContentItem::new_template(ContentItemType::Media, "gallery");
	gallery.order = 1;
	template.set_content_items(vec![intro, gallery]);
	template
}

#[rstest]
fn test_full_lifecycle() {
	// Arrange - template T1 with mandatory HTML "intro" and MEDIA "gallery",
	// locales [en, de], default en
	let template = sample_template();
	let locales = vec!["en".to_string(), "de".to_string()];

	// Act - stamp the page
	let mut page = template.create_page(&locales, "en");

	// Assert - en/de carry "intro", global carries "gallery"
	let en_ids: Vec<&str> = page
		.language_version("en")
		.unwrap()
		.content_items()
		.iter()
		.map(|i| i.item_id.as_str())
		.collect();
	assert_eq!(en_ids, vec!["intro"]);
	let global_ids: Vec<&str> = page
		.global_version()
		.unwrap()
		.content_items()
		.iter()
		.map(|i| i.item_id.as_str())
		.collect();
	assert_eq!(global_ids, vec!["gallery"]);
	assert_eq!(
		page.language_version("en").unwrap().status,
		VersionStatus::Finished
	);
	assert_eq!(
		page.language_version("de").unwrap().status,
		VersionStatus::Wip
	);

	// Act - fill in the English version and validate
	{
		let en = page.language_version_mut("en").unwrap();
		en.title = "Home".to_string();
		en.content_item_mut("intro")
			.unwrap()
			.set_html_fragment("<p>Hi</p>");
	}
	let report = validate_for_publish(&mut page, "en");

	// Assert - en stays finished (mandatory item satisfied), de stays WIP
	// without a warning (it was never finished)
	assert_eq!(
		page.language_version("en").unwrap().status,
		VersionStatus::Finished
	);
	assert_eq!(
		page.language_version("de").unwrap().status,
		VersionStatus::Wip
	);
	assert!(report.errors.is_empty());
	assert!(report.warnings.is_empty());

	// Act - the template gains a footer slot; reload reconciles the page
	let mut evolved = sample_template();
	let mut items: Vec<ContentItem> = evolved.content_items().to_vec();
	let mut footer = ContentItem::new_template(ContentItemType::Html, "footer");
	footer.order = 2;
	items.push(footer);
	evolved.set_content_items(items);
	let verdict = reconcile(&mut page, Some(&evolved));

	// Assert - footer lands in both language versions, not global; nothing
	// was removed
	assert_eq!(verdict, PageValidity::Valid);
	assert!(page.language_version("en").unwrap().has_item("footer"));
	assert!(page.language_version("de").unwrap().has_item("footer"));
	assert!(!page.global_version().unwrap().has_item("footer"));
	assert!(page.global_version().unwrap().has_item("gallery"));
	assert_eq!(
		page.language_version("en")
			.unwrap()
			.content_item("footer")
			.unwrap()
			.html_fragment(),
		Some("")
	);
}

#[rstest]
fn test_rendering_order_follows_template() {
	// Arrange
	let template = sample_template();
	let mut page = template.create_page(&["en".to_string()], "en");
	page.language_version_mut("en")
		.unwrap()
		.content_item_mut("intro")
		.unwrap()
		.set_html_fragment("text");

	// Act
	let items = page.sorted_content_items("en", "en", Some(&template));

	// Assert - intro (order 0) before gallery (order 1), global merged in
	let ids: Vec<&str> = items.iter().map(|i| i.item_id.as_str()).collect();
	assert_eq!(ids, vec!["intro", "gallery"]);
}

#[rstest]
fn test_template_order_overrides_stale_instance_order() {
	// Arrange - instance items persisted with orders the template since
	// changed
	let template = sample_template();
	let mut page = template.create_page(&["en".to_string()], "en");
	page.language_version_mut("en")
		.unwrap()
		.content_item_mut("intro")
		.unwrap()
		.order = 99;

	// Act - template still says intro comes first
	let items = page.sorted_content_items("en", "en", Some(&template));

	// Assert
	let ids: Vec<&str> = items.iter().map(|i| i.item_id.as_str()).collect();
	assert_eq!(ids, vec!["intro", "gallery"]);
}

#[rstest]
fn test_rendering_order_tracks_template_argument() {
	// Arrange - two templates disagreeing on the slot order
	let first = sample_template();
	let page = first.create_page(&["en".to_string()], "en");
	let mut reordered = PageTemplate::new("T1");
	let mut intro = ContentItem::new_template(ContentItemType::Html, "intro");
	intro.order = 1;
	let mut gallery = ContentItem::new_template(ContentItemType::Media, "gallery");
	gallery.order = 0;
	reordered.set_content_items(vec![intro, gallery]);

	// Act - render against each template in turn
	let by_first: Vec<String> = page
		.sorted_content_items("en", "en", Some(&first))
		.iter()
		.map(|i| i.item_id.clone())
		.collect();
	let by_reordered: Vec<String> = page
		.sorted_content_items("en", "en", Some(&reordered))
		.iter()
		.map(|i| i.item_id.clone())
		.collect();

	// Assert - each call follows the template it was given
	assert_eq!(by_first, vec!["intro", "gallery"]);
	assert_eq!(by_reordered, vec!["gallery", "intro"]);
}

#[rstest]
fn test_invalid_page_without_template_is_untouched() {
	let template = sample_template();
	let mut page = template.create_page(&["en".to_string()], "en");
	let item_ids = page.content_item_ids();

	let verdict = reconcile(&mut page, None);

	assert_eq!(verdict, PageValidity::InvalidNoTemplate);
	assert_eq!(page.content_item_ids(), item_ids);
}
