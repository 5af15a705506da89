use trillium::Conn;
use trillium_logger::Logger;
use trillium_views::{
    include_dir, CsrfHandler, TemplateData, ViewConfig, ViewsConnExt, ViewsHandler,
};

fn main() {
    env_logger::init();

    // edit tests/templates while running a debug build to see changes on reload
    let config = ViewConfig::new(include_dir!("$CARGO_MANIFEST_DIR/tests/templates"))
        .with_reload_root(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/templates"))
        .with_production(!cfg!(debug_assertions));

    let views = match ViewsHandler::new(config) {
        Ok(views) => views,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    trillium_smol::run((
        Logger::new(),
        CsrfHandler::new(),
        views,
        |conn: Conn| async move {
            let data = TemplateData::new()
                .with_title("trillium views")
                .with_int("count", 1)
                .with_flash(conn.querystring().to_string());

            match conn.path().to_string().as_str() {
                "/" => conn.render_view("home.page.html", data),
                "/counter" => conn.render_view("counter.page.html", data),
                _ => conn,
            }
        },
    ));
}
