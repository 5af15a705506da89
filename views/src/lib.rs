#![forbid(unsafe_code)]
#![deny(
    clippy::dbg_macro,
    missing_copy_implementations,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    unused_qualifications
)]

/*!
Cached page and layout rendering for trillium, built on [the
handlebars crate](https://docs.rs/crate/handlebars).

Pages and layouts are discovered with glob patterns, either in a file
set bundled into the binary with [`include_dir!`] or in a directory on
disk. Each page is compiled with every layout available to it as a
partial and with a registry of [`TemplateFunctions`] bound, and is
then rendered by its base file name.

In production mode, templates are compiled once when the
[`ViewManager`] is built. In development mode, every render
recompiles the templates from disk first so that edits show up
without rebuilding the binary.

Rendering always happens into a buffer first: the response only
receives a page once it has rendered completely.

```
use trillium_testing::prelude::*;
use trillium_views::{
    include_dir, CsrfHandler, TemplateData, ViewConfig, ViewsConnExt, ViewsHandler,
};

# fn main() -> Result<(), trillium_views::ViewError> {
let config = ViewConfig::new(include_dir!("$CARGO_MANIFEST_DIR/tests/templates"))
    .with_pages("pages", "*.page.html")
    .with_layouts("layouts", "*.layout.html");

let app = (
    CsrfHandler::new(),
    ViewsHandler::new(config)?,
    |conn: Conn| async move {
        conn.render_view("home.page.html", TemplateData::new().with_title("Welcome"))
    },
);

let body = get("/").on(&app).take_response_body_string().unwrap();
assert!(body.contains("<title>Welcome</title>"));
assert!(body.contains("<h1>Welcome</h1>"));
# Ok(()) }
```
*/

pub use handlebars;
pub use include_dir::{include_dir, Dir};

mod assigns;
pub use assigns::Assigns;

mod cache;
pub use cache::TemplateCache;

mod config;
pub use config::ViewConfig;

mod csrf;
pub use csrf::{CsrfConnExt, CsrfHandler, CsrfToken, CsrfTokenSource};

mod error;
pub use error::{Result, ViewError};

mod functions;
pub use functions::{FunctionError, FunctionResult, TemplateFunctions};

mod source;
pub use source::TemplateFiles;

mod template_data;
pub use template_data::TemplateData;

mod view_manager;
pub use view_manager::ViewManager;

mod views_conn_ext;
pub use views_conn_ext::ViewsConnExt;

mod views_handler;
pub use views_handler::ViewsHandler;
