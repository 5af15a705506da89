use crate::{FunctionResult, TemplateFiles, TemplateFunctions};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// # Configuration for a [`ViewManager`](crate::ViewManager)
///
/// # Defaults
///
/// * pages: `pages/*.page.html`
/// * layouts: `layouts/*.layout.html`
/// * functions: [`TemplateFunctions::basic`]
/// * production mode, in which templates are compiled once
/// * handlebars strict mode, in which a reference to a missing field is
///   a render error
///
/// Patterns are joined to their location with a forward slash on every
/// platform, and are matched against paths relative to the root of the
/// file set.
///
/// ```
/// use trillium_views::{include_dir, ViewConfig};
///
/// let config = ViewConfig::new(include_dir!("$CARGO_MANIFEST_DIR/tests/templates"))
///     .with_pages("pages", "*.page.html")
///     .with_layouts("layouts", "*.layout.html")
///     .with_reload_root(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/templates"))
///     .with_production(!cfg!(debug_assertions));
///
/// assert_eq!(config.page_glob(), "pages/*.page.html");
/// assert_eq!(config.layout_glob(), "layouts/*.layout.html");
/// ```
#[derive(Debug, Clone)]
pub struct ViewConfig {
    files: TemplateFiles,
    reload_root: Option<PathBuf>,
    page_location: String,
    page_pattern: String,
    layout_location: String,
    layout_pattern: String,
    page_glob: String,
    layout_glob: String,
    functions: TemplateFunctions,
    production: bool,
    strict: bool,
}

impl ViewConfig {
    /**
    Builds a config for the given file set, which is either an
    [`include_dir::Dir`] or a path on disk.
    */
    pub fn new(files: impl Into<TemplateFiles>) -> Self {
        let mut config = Self {
            files: files.into(),
            reload_root: None,
            page_location: "pages".into(),
            page_pattern: "*.page.html".into(),
            layout_location: "layouts".into(),
            layout_pattern: "*.layout.html".into(),
            page_glob: String::new(),
            layout_glob: String::new(),
            functions: TemplateFunctions::basic(),
            production: true,
            strict: true,
        };
        config.update_globs();
        config
    }

    /// Sets the directory and glob pattern pages are found with.
    pub fn with_pages(mut self, location: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.page_location = location.into();
        self.page_pattern = pattern.into();
        self.update_globs();
        self
    }

    /// Sets the directory and glob pattern layouts are found with.
    pub fn with_layouts(mut self, location: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.layout_location = location.into();
        self.layout_pattern = pattern.into();
        self.update_globs();
        self
    }

    /// Replaces the template function registry.
    pub fn with_functions(mut self, functions: TemplateFunctions) -> Self {
        self.functions = functions;
        self
    }

    /// Adds a single template function to the registry.
    pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Value]) -> FunctionResult + Send + Sync + 'static,
    {
        self.functions.insert(name, function);
        self
    }

    /**
    Sets the directory on disk that templates are reloaded from in
    development mode. When templates are bundled with
    [`include_dir!`](crate::include_dir), this is usually the same
    directory that was bundled. If it is not set, development mode
    reloads from the configured file set.
    */
    pub fn with_reload_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.reload_root = Some(root.into());
        self
    }

    /// Sets production mode explicitly.
    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    /**
    Switches to development mode, in which every render recompiles
    every template from disk so that edits show up without a restart.
    */
    pub fn in_development(self) -> Self {
        self.with_production(false)
    }

    /**
    Disables handlebars strict mode, so that missing fields render as
    empty instead of failing the render.
    */
    pub fn without_strict_mode(mut self) -> Self {
        self.strict = false;
        self
    }

    /// the file set templates are built from in production
    pub fn files(&self) -> &TemplateFiles {
        &self.files
    }

    /// the directory templates are reloaded from in development, if any
    pub fn reload_root(&self) -> Option<&Path> {
        self.reload_root.as_deref()
    }

    /// the directory pages are found in
    pub fn page_location(&self) -> &str {
        &self.page_location
    }

    /// the pattern pages are matched with inside their directory
    pub fn page_pattern(&self) -> &str {
        &self.page_pattern
    }

    /// the directory layouts are found in
    pub fn layout_location(&self) -> &str {
        &self.layout_location
    }

    /// the pattern layouts are matched with inside their directory
    pub fn layout_pattern(&self) -> &str {
        &self.layout_pattern
    }

    /// the full glob for pages, relative to the file set root
    pub fn page_glob(&self) -> &str {
        &self.page_glob
    }

    /// the full glob for layouts, relative to the file set root
    pub fn layout_glob(&self) -> &str {
        &self.layout_glob
    }

    /// the template function registry
    pub fn functions(&self) -> &TemplateFunctions {
        &self.functions
    }

    /// is this config in production mode?
    pub fn is_production(&self) -> bool {
        self.production
    }

    /// is handlebars strict mode enabled?
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// the file set used for development-mode reloads
    pub(crate) fn live_files(&self) -> TemplateFiles {
        match &self.reload_root {
            Some(root) => TemplateFiles::Directory(root.clone()),
            None => self.files.clone(),
        }
    }

    fn update_globs(&mut self) {
        self.page_glob = join_glob(&self.page_location, &self.page_pattern);
        self.layout_glob = join_glob(&self.layout_location, &self.layout_pattern);
    }
}

// not Path::join: globs are matched against forward-slash paths everywhere
fn join_glob(location: &str, pattern: &str) -> String {
    let location = location.trim_end_matches('/');
    if location.is_empty() {
        pattern.to_string()
    } else {
        format!("{location}/{pattern}")
    }
}
