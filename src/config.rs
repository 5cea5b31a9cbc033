//! CMS configuration
//!
//! A plain value object handed to constructors; no global settings
//! singleton. Built directly or through the builder.

use std::path::PathBuf;

/// Runtime configuration of the CMS core
#[derive(Debug, Clone)]
pub struct CmsConfig {
	/// Locales pages are authored in, in display order
	pub locales: Vec<String>,
	/// Locale used as the editorial fallback
	pub default_locale: String,
	/// Active theme name
	pub theme: String,
	/// Theme-specific template descriptor directory, searched first
	pub theme_template_dir: PathBuf,
	/// Shared template descriptor directory, searched second
	pub fallback_template_dir: PathBuf,
}

impl Default for CmsConfig {
	fn default() -> Self {
		Self {
			locales: vec!["en".to_string()],
			default_locale: "en".to_string(),
			theme: String::new(),
			theme_template_dir: PathBuf::new(),
			fallback_template_dir: PathBuf::new(),
		}
	}
}

impl CmsConfig {
	/// Creates a configuration with defaults (single locale `en`)
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a builder for fluent configuration
	///
	/// # Examples
	///
	/// ```
	/// use codex_cms::config::CmsConfig;
	///
	/// let config = CmsConfig::builder()
	///     .locales(vec!["en".to_string(), "de".to_string()])
	///     .default_locale("en")
	///     .build();
	///
	/// assert_eq!(config.locales.len(), 2);
	/// ```
	pub fn builder() -> CmsConfigBuilder {
		CmsConfigBuilder::default()
	}
}

/// Builder for [`CmsConfig`]
#[derive(Debug, Default)]
pub struct CmsConfigBuilder {
	locales: Option<Vec<String>>,
	default_locale: Option<String>,
	theme: Option<String>,
	theme_template_dir: Option<PathBuf>,
	fallback_template_dir: Option<PathBuf>,
}

impl CmsConfigBuilder {
	/// Set the authored locales
	pub fn locales(mut self, locales: Vec<String>) -> Self {
		self.locales = Some(locales);
		self
	}

	/// Set the default locale
	pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
		self.default_locale = Some(locale.into());
		self
	}

	/// Set the active theme name
	pub fn theme(mut self, theme: impl Into<String>) -> Self {
		self.theme = Some(theme.into());
		self
	}

	/// Set the theme-specific descriptor directory
	pub fn theme_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.theme_template_dir = Some(dir.into());
		self
	}

	/// Set the shared descriptor directory
	pub fn fallback_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.fallback_template_dir = Some(dir.into());
		self
	}

	/// Build the configuration
	pub fn build(self) -> CmsConfig {
		let default = CmsConfig::default();
		CmsConfig {
			locales: self.locales.unwrap_or(default.locales),
			default_locale: self.default_locale.unwrap_or(default.default_locale),
			theme: self.theme.unwrap_or(default.theme),
			theme_template_dir: self.theme_template_dir.unwrap_or(default.theme_template_dir),
			fallback_template_dir: self
				.fallback_template_dir
				.unwrap_or(default.fallback_template_dir),
		}
	}
}
