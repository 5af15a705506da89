use crate::{source::TemplateSource, Result, ViewConfig, ViewError};
use handlebars::Handlebars;
use serde::Serialize;
use std::collections::BTreeMap;

/**
Every compiled page from one build of a file set.

Pages are keyed by their base file name, so `pages/home.page.html`
is rendered as `home.page.html`. Layouts are available to every page
as partials named by their base file name up to the first `.`, so
`layouts/base.layout.html` is used with `{{#> base}}...{{/base}}`.
*/
#[derive(Debug)]
pub struct TemplateCache {
    registry: Handlebars<'static>,
    pages: BTreeMap<String, String>,
}

impl TemplateCache {
    pub(crate) fn build(config: &ViewConfig, source: &dyn TemplateSource) -> Result<Self> {
        let pages = source.glob(config.page_glob())?;
        let layouts = source.glob(config.layout_glob())?;

        let mut registry = Handlebars::new();
        registry.set_strict_mode(config.is_strict());
        config.functions().register(&mut registry);

        let mut partials = BTreeMap::new();
        for path in &layouts {
            let name = partial_name(path);
            let text = source.read(path)?;
            registry
                .register_partial(name, text)
                .map_err(|source| ViewError::Compile {
                    path: path.clone(),
                    source: Box::new(source),
                })?;
            log::debug!("registered layout {path} as {name}");
            if let Some(previous) = partials.insert(name, path) {
                log::warn!("layout {previous} was replaced by {path} because they share a partial name");
            }
        }

        let mut cache = BTreeMap::new();
        for path in pages {
            let name = base_name(&path).to_string();
            let text = source.read(&path)?;
            registry
                .register_template_string(&name, text)
                .map_err(|source| ViewError::Compile {
                    path: path.clone(),
                    source: Box::new(source),
                })?;

            log::debug!("registered template {path} as {name}");
            if let Some(previous) = cache.insert(name, path.clone()) {
                log::warn!("page {previous} was replaced by {path} because they share a file name");
            }
        }

        Ok(Self {
            registry,
            pages: cache,
        })
    }

    /// is there a page by this name?
    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    /// the names of every page, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// the path, relative to the file set, that a page was compiled from
    pub fn path(&self, name: &str) -> Option<&str> {
        self.pages.get(name).map(String::as_str)
    }

    /// the number of pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// does this cache contain no pages?
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /**
    Executes a page into a new buffer. Nothing is returned unless the
    whole page rendered.
    */
    pub(crate) fn execute(&self, name: &str, data: &impl Serialize) -> Result<Vec<u8>> {
        if !self.contains(name) {
            return Err(ViewError::NotFound(name.to_string()));
        }

        let mut buffer = Vec::new();
        self.registry
            .render_to_write(name, data, &mut buffer)
            .map_err(|source| ViewError::Render {
                name: name.to_string(),
                source: Box::new(source),
            })?;

        Ok(buffer)
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn partial_name(path: &str) -> &str {
    let base = base_name(path);
    base.split('.').next().filter(|s| !s.is_empty()).unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(base_name("pages/home.page.html"), "home.page.html");
        assert_eq!(base_name("home.page.html"), "home.page.html");
        assert_eq!(partial_name("layouts/base.layout.html"), "base");
        assert_eq!(partial_name("layouts/nested/nav.html"), "nav");
        assert_eq!(partial_name("layouts/.hidden"), ".hidden");
    }
}
