use crate::{Result, TemplateData, ViewsHandler};
use trillium::{Conn, KnownHeaderName::ContentType};

/**
Extension trait that renders views into the response body of a
[`trillium::Conn`].

[`ViewsHandler`] **MUST** be run on the conn before any of these
functions are called. The token set by
[`CsrfHandler`](crate::CsrfHandler) is injected into the data.
*/
pub trait ViewsConnExt {
    /**
    Renders the page `name` as the response body with a 200 status,
    setting a content type guessed from the page name.

    If rendering fails, the error is logged and the conn is halted
    with a 500 status. The body is left empty in production mode and
    contains the error in development mode.
    */
    fn render_view(self, name: &str, data: TemplateData) -> Self;

    /**
    Renders the page `name` as the response body with a 200 status,
    returning any error for the caller to handle. The conn is left
    untouched when rendering fails.
    */
    fn try_render_view(&mut self, name: &str, data: &mut TemplateData) -> Result<()>;
}

impl ViewsConnExt for Conn {
    fn render_view(mut self, name: &str, mut data: TemplateData) -> Self {
        match self.try_render_view(name, &mut data) {
            Ok(()) => self,
            Err(error) => {
                log::error!("{error}");
                let production = views(&self).is_production();
                let conn = self.with_status(500).halt();
                if production {
                    conn
                } else {
                    conn.with_body(error.to_string())
                }
            }
        }
    }

    fn try_render_view(&mut self, name: &str, data: &mut TemplateData) -> Result<()> {
        let views = views(self).clone();

        let mut body = Vec::new();
        views.render(&mut body, &*self, name, data)?;

        let mime = mime_guess::from_path(name).first_or(mime_guess::mime::TEXT_HTML);
        self.response_headers_mut().try_insert(ContentType, mime.to_string());
        self.set_status(200);
        self.set_body(body);
        Ok(())
    }
}

fn views(conn: &Conn) -> &ViewsHandler {
    conn.state()
        .expect("ViewsConnExt::render_view called without running ViewsHandler first")
}
