use crate::{Result, ViewConfig, ViewManager};
use std::{ops::Deref, sync::Arc};
use trillium::{async_trait, Conn, Handler};

/**
A trillium handler that provides a [`ViewManager`] to downsequence
handlers, for use with [`ViewsConnExt`](crate::ViewsConnExt).

```
use trillium_testing::prelude::*;
use trillium_views::{
    include_dir, CsrfHandler, TemplateData, ViewConfig, ViewsConnExt, ViewsHandler,
};

# fn main() -> Result<(), trillium_views::ViewError> {
let handler = (
    CsrfHandler::new().with_token_generator(|| "a".repeat(32)),
    ViewsHandler::new(ViewConfig::new(include_dir!(
        "$CARGO_MANIFEST_DIR/tests/templates"
    )))?,
    |conn: Conn| async move {
        conn.render_view("home.page.html", TemplateData::new().with_title("Welcome"))
    },
);

let mut conn = get("/").on(&handler);
assert_eq!(conn.status(), Some(trillium::Status::Ok));
assert_eq!(conn.response_headers().get_str("content-type"), Some("text/html"));
assert!(conn.take_response_body_string().unwrap().contains("<h1>Welcome</h1>"));
# Ok(()) }
```
*/
#[derive(Clone, Debug)]
pub struct ViewsHandler(Arc<ViewManager>);

impl ViewsHandler {
    /// Builds a [`ViewManager`] from the config and wraps it in a handler.
    pub fn new(config: ViewConfig) -> Result<Self> {
        ViewManager::new(config).map(Self::from)
    }

    /// the view manager this handler shares
    pub fn manager(&self) -> &ViewManager {
        &self.0
    }
}

impl Deref for ViewsHandler {
    type Target = ViewManager;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<ViewManager> for ViewsHandler {
    fn from(manager: ViewManager) -> Self {
        Self(Arc::new(manager))
    }
}

impl From<Arc<ViewManager>> for ViewsHandler {
    fn from(manager: Arc<ViewManager>) -> Self {
        Self(manager)
    }
}

#[async_trait]
impl Handler for ViewsHandler {
    async fn run(&self, conn: Conn) -> Conn {
        conn.with_state(self.clone())
    }
}
