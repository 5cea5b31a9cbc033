//! Sidebar widgets
//!
//! A sidebar element carries its widget kind as an explicit tag instead
//! of a subclass per widget. Custom-HTML widgets are checked against a
//! disallowed-tag list before a page may publish.

use serde::{Deserialize, Serialize};

/// Tags that must never appear in custom sidebar HTML
pub const DISALLOWED_TAGS: &[&str] = &[
	"script", "object", "embed", "iframe", "applet", "meta", "base", "form",
];

/// Kind of sidebar widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetKind {
	/// Simple search input
	SearchField,
	/// Faceted drill-down over the index
	SearchDrillDown,
	/// Browsing entry points
	Browsing,
	/// RSS feed teaser
	RssFeed,
	/// Links to other CMS pages
	PageLinks,
	/// Free HTML authored by the editor
	CustomHtml,
}

impl WidgetKind {
	/// Map a stored widget-type name to a kind, case-insensitively
	pub fn from_name(name: &str) -> Option<Self> {
		match name.to_ascii_lowercase().as_str() {
			"searchfield" => Some(Self::SearchField),
			"searchdrilldown" => Some(Self::SearchDrillDown),
			"browsing" => Some(Self::Browsing),
			"rssfeed" => Some(Self::RssFeed),
			"pagelinks" => Some(Self::PageLinks),
			"customhtml" => Some(Self::CustomHtml),
			_ => None,
		}
	}
}

/// One widget in a page's sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarElement {
	/// Widget kind
	pub kind: WidgetKind,
	/// Widget title shown above the rendered block
	pub title: String,
	/// Editor-authored HTML, only meaningful for [`WidgetKind::CustomHtml`]
	pub html: Option<String>,
	/// Extra CSS class applied to the widget container
	pub css_class: Option<String>,
	/// Position within the sidebar
	pub order: i32,
}

impl SidebarElement {
	/// Create a widget of the given kind with defaults
	pub fn new(kind: WidgetKind) -> Self {
		Self {
			kind,
			title: String::new(),
			html: None,
			css_class: None,
			order: 0,
		}
	}

	/// First disallowed tag appearing in this widget's HTML, if any
	pub fn disallowed_tag(&self) -> Option<&'static str> {
		self.html.as_deref().and_then(contains_disallowed_tags)
	}
}

/// Scan HTML for disallowed tags; returns the first offending tag name.
///
/// Matches whole tag names only, so `<metadata>` does not trip the
/// `meta` rule.
pub fn contains_disallowed_tags(html: &str) -> Option<&'static str> {
	let lower = html.to_ascii_lowercase();
	let bytes = lower.as_bytes();
	let mut pos = 0;
	while let Some(offset) = lower[pos..].find('<') {
		let start = pos + offset + 1;
		// Skip closing-tag slashes so </script> is caught too
		let name_start = if bytes.get(start) == Some(&b'/') {
			start + 1
		} else {
			start
		};
		let name_end = lower[name_start..]
			.find(|c: char| !c.is_ascii_alphanumeric())
			.map(|i| name_start + i)
			.unwrap_or(lower.len());
		let name = &lower[name_start..name_end];
		if let Some(tag) = DISALLOWED_TAGS.iter().find(|t| **t == name) {
			return Some(*tag);
		}
		pos = start;
	}
	None
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("<p>fine</p>", None)]
	#[case("<script>alert(1)</script>", Some("script"))]
	#[case("text with <IFRAME src='x'>", Some("iframe"))]
	#[case("</form>", Some("form"))]
	#[case("<metadata>whole-name match only</metadata>", None)]
	#[case("", None)]
	fn test_disallowed_tag_scan(#[case] html: &str, #[case] expected: Option<&str>) {
		assert_eq!(contains_disallowed_tags(html), expected);
	}

	#[rstest]
	fn test_element_without_html_is_clean() {
		let element = SidebarElement::new(WidgetKind::SearchField);
		assert_eq!(element.disallowed_tag(), None);
	}

	#[rstest]
	fn test_custom_html_element_reports_tag() {
		let mut element = SidebarElement::new(WidgetKind::CustomHtml);
		element.html = Some("<object data='x'></object>".to_string());
		assert_eq!(element.disallowed_tag(), Some("object"));
	}
}
