//! Template/page reconciliation
//!
//! A template descriptor can change after pages were stamped from it.
//! Reconciliation re-diffs a page against the current template on every
//! load: items whose id the template no longer defines are removed, and
//! newly defined slots are cloned in following the same global/language
//! placement rule used at page creation. Template edits therefore apply
//! retroactively without manual migration.
//!
//! The operation is idempotent; re-running it on a reconciled page adds
//! and removes nothing.

use crate::page::Page;
use crate::template::PageTemplate;
use serde::{Deserialize, Serialize};

/// Validity verdict of a page against its template, derived per access
/// and never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageValidity {
	/// Template resolved; the page is safe to edit and render
	Valid,
	/// The page references a template id the catalog cannot resolve
	InvalidNoTemplate,
}

/// Read-only verdict: does the page's template resolve?
///
/// Use this on paths that must not mutate the page; [`reconcile`] gives
/// the same verdict while also applying the template diff.
pub fn validity(_page: &Page, template: Option<&PageTemplate>) -> PageValidity {
	match template {
		Some(_) => PageValidity::Valid,
		None => PageValidity::InvalidNoTemplate,
	}
}

/// Synchronize the page's content items with its template.
///
/// With no template the page cannot be safely edited; the verdict is
/// [`PageValidity::InvalidNoTemplate`] and the page is left untouched.
/// Otherwise stale items are removed, missing slots are cloned in, and
/// the verdict is [`PageValidity::Valid`].
pub fn reconcile(page: &mut Page, template: Option<&PageTemplate>) -> PageValidity {
	let Some(template) = template else {
		return PageValidity::InvalidNoTemplate;
	};

	let mut changed = false;

	// Remove items orphaned by a template edit
	for item_id in page.content_item_ids() {
		if !template.has_item(&item_id) {
			tracing::debug!(
				"Removing content item '{}' no longer defined by template '{}'",
				item_id,
				template.id
			);
			changed |= page.remove_content_item(&item_id);
		}
	}

	// Clone in slots the template gained since the page was stamped.
	// Translatable slots go to every non-global version lacking them,
	// everything else to the global version.
	for template_item in template.content_items() {
		if template_item.item_type().is_translatable() {
			for version in page.language_versions_mut() {
				if !version.is_global() && !version.has_item(&template_item.item_id) {
					changed |= version.add_content_item(template_item.instance_clone());
				}
			}
		} else if let Some(global) = page.global_version_mut() {
			if !global.has_item(&template_item.item_id) {
				changed |= global.add_content_item(template_item.instance_clone());
			}
		}
	}

	if changed {
		page.touch();
	}
	PageValidity::Valid
}
