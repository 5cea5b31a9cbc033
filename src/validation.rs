//! Publish validation
//!
//! Validation never raises: it mutates the page (status downgrades,
//! unpublish) and collects user-facing messages. An admin publishing an
//! incomplete page sees per-language warnings and the page simply stays
//! unpublished.

use crate::language::VersionStatus;
use crate::page::Page;
use serde::{Deserialize, Serialize};

/// One user-facing validation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
	/// Language the message concerns, when version-specific
	pub language: Option<String>,
	/// Message text
	pub message: String,
}

/// Outcome of a publish validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
	/// Hard findings that aborted validation (disallowed sidebar HTML)
	pub errors: Vec<ValidationMessage>,
	/// Soft findings (incomplete versions, downgrades, unpublish)
	pub warnings: Vec<ValidationMessage>,
}

impl ValidationReport {
	/// Whether the page passed with no findings at all
	pub fn passed(&self) -> bool {
		self.errors.is_empty() && self.warnings.is_empty()
	}

	fn error(&mut self, message: impl Into<String>) {
		self.errors.push(ValidationMessage {
			language: None,
			message: message.into(),
		});
	}

	fn warning(&mut self, language: impl Into<String>, message: impl Into<String>) {
		self.warnings.push(ValidationMessage {
			language: Some(language.into()),
			message: message.into(),
		});
	}
}

/// Validate a page for publishing, mutating state where required.
///
/// - Sidebar elements (unless the default sidebar is used) containing
///   disallowed HTML unpublish the page and abort validation.
/// - A `Finished` version that is incomplete (blank title or an unfilled
///   mandatory item) is downgraded to `Wip` with a warning.
/// - An incomplete default-language version unpublishes the page.
/// - A complete default-language version on a published page is forced
///   to `Finished`; its finished-ness is derived, not editable.
pub fn validate_for_publish(page: &mut Page, default_locale: &str) -> ValidationReport {
	let mut report = ValidationReport::default();

	if !page.use_default_sidebar {
		for element in &page.sidebar_elements {
			if let Some(tag) = element.disallowed_tag() {
				tracing::warn!(
					"Unpublishing page {:?}: sidebar element '{}' contains <{}>",
					page.id,
					element.title,
					tag
				);
				page.published = false;
				report.error(format!(
					"Sidebar element '{}' contains disallowed tag <{}>",
					element.title, tag
				));
				return report;
			}
		}
	}

	// Collect per-version verdicts first; the mutations below need
	// exclusive access to the version list.
	let verdicts: Vec<(String, VersionStatus, bool)> = {
		let global = page.global_version().cloned();
		page.language_versions()
			.iter()
			.filter(|v| !v.is_global())
			.map(|v| (v.language.clone(), v.status, v.is_complete(global.as_ref())))
			.collect()
	};

	for (language, status, complete) in &verdicts {
		if !*complete && *status == VersionStatus::Finished {
			tracing::debug!(
				"Downgrading incomplete finished version '{}' on page {:?}",
				language,
				page.id
			);
			if let Some(version) = page.language_version_mut(language) {
				version.status = VersionStatus::Wip;
			}
			report.warning(
				language.clone(),
				format!("Language version '{}' is incomplete", language),
			);
		}
	}

	if let Some((_, _, complete)) = verdicts.iter().find(|(l, _, _)| l == default_locale) {
		if !*complete && page.published {
			page.published = false;
			report.warning(
				default_locale,
				format!(
					"Default language version '{}' is incomplete; page unpublished",
					default_locale
				),
			);
		} else if *complete && page.published {
			if let Some(version) = page.language_version_mut(default_locale) {
				version.status = VersionStatus::Finished;
			}
		}
	}

	report
}
