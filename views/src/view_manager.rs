use crate::{CsrfTokenSource, Result, TemplateCache, TemplateData, ViewConfig, ViewError};
use arc_swap::ArcSwap;
use std::{
    fmt::{self, Debug, Formatter},
    io::Write,
    sync::Arc,
};

/**
Compiles, caches, and renders pages.

In production mode, templates are compiled once, when the manager is
built. In development mode every render recompiles every template
from disk first, so edits show up on the next request.

```
use trillium_views::{include_dir, TemplateData, ViewConfig, ViewManager};

# fn main() -> Result<(), trillium_views::ViewError> {
let views = ViewManager::new(ViewConfig::new(include_dir!(
    "$CARGO_MANIFEST_DIR/tests/templates"
)))?;

let mut output = Vec::new();
let mut data = TemplateData::new().with_title("Welcome");
views.render(&mut output, "0123456789abcdef0123456789abcdef", "home.page.html", &mut data)?;

let output = String::from_utf8(output).unwrap();
assert!(output.contains("<h1>Welcome</h1>"));
assert!(output.contains(r#"value="0123456789abcdef0123456789abcdef""#));
# Ok(()) }
```
*/
pub struct ViewManager {
    config: ViewConfig,
    cache: ArcSwap<TemplateCache>,
}

impl Debug for ViewManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewManager")
            .field("config", &self.config)
            .field("cache", &*self.cache.load())
            .finish()
    }
}

impl ViewManager {
    /**
    Builds the initial template cache. In development mode it is
    built from the live file set. Any discovery or compile error
    prevents the manager from being built.
    */
    pub fn new(config: ViewConfig) -> Result<Self> {
        let files = if config.is_production() {
            config.files().clone()
        } else {
            config.live_files()
        };

        let cache = TemplateCache::build(&config, &*files.source())?;
        log::debug!(
            "built {} templates in {} mode",
            cache.len(),
            if config.is_production() {
                "production"
            } else {
                "development"
            }
        );

        Ok(Self {
            config,
            cache: ArcSwap::from_pointee(cache),
        })
    }

    /**
    Renders the page `name` into `out`.

    The anti-forgery token from `request` is set on `data` first. The
    page is executed into a buffer, and the buffer is written to `out`
    only once the whole page has rendered, so `out` never receives
    part of a page. A failed write after a successful render is
    reported as [`ViewError::Write`].
    */
    pub fn render<W, R>(
        &self,
        out: &mut W,
        request: &R,
        name: &str,
        data: &mut TemplateData,
    ) -> Result<()>
    where
        W: Write + ?Sized,
        R: CsrfTokenSource + ?Sized,
    {
        let buffer = self.execute(request, name, data)?;
        out.write_all(&buffer).map_err(ViewError::Write)?;
        out.flush().map_err(ViewError::Write)
    }

    /// Like [`ViewManager::render`], returning the page as a string.
    pub fn render_to_string<R>(
        &self,
        request: &R,
        name: &str,
        data: &mut TemplateData,
    ) -> Result<String>
    where
        R: CsrfTokenSource + ?Sized,
    {
        let buffer = self.execute(request, name, data)?;
        String::from_utf8(buffer).map_err(|e| {
            ViewError::Write(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    pub(crate) fn execute<R>(
        &self,
        request: &R,
        name: &str,
        data: &mut TemplateData,
    ) -> Result<Vec<u8>>
    where
        R: CsrfTokenSource + ?Sized,
    {
        data.csrf_token = request.token();

        let cache = if self.config.is_production() {
            self.cache.load_full()
        } else {
            self.reload()?
        };

        log::trace!("rendering {name}");
        cache.execute(name, data)
    }

    /**
    Recompiles every template from the live file set and replaces the
    cache, returning the new cache. Development mode does this before
    every render. If the build fails the current cache is kept.
    */
    pub fn reload(&self) -> Result<Arc<TemplateCache>> {
        let cache = Arc::new(TemplateCache::build(
            &self.config,
            &*self.config.live_files().source(),
        )?);
        self.cache.store(Arc::clone(&cache));
        Ok(cache)
    }

    /// the current template cache
    pub fn cache(&self) -> Arc<TemplateCache> {
        self.cache.load_full()
    }

    /// the names of every page in the current cache
    pub fn template_names(&self) -> Vec<String> {
        self.cache.load().names().map(String::from).collect()
    }

    /// is there a page by this name in the current cache?
    pub fn contains(&self, name: &str) -> bool {
        self.cache.load().contains(name)
    }

    /// is this manager in production mode?
    pub fn is_production(&self) -> bool {
        self.config.is_production()
    }

    /// the configuration this manager was built with
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }
}
