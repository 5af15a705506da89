use std::{fs, path::Path};
use tempfile::TempDir;
use trillium_views::{include_dir, TemplateData, ViewConfig, ViewError, ViewManager};

fn write(root: &Path, path: &str, contents: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixtures() -> String {
    format!("{}/tests/templates", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn names_are_base_file_names() {
    let views = ViewManager::new(ViewConfig::new(include_dir!(
        "$CARGO_MANIFEST_DIR/tests/templates"
    )))
    .unwrap();

    assert_eq!(
        views.template_names(),
        ["counter.page.html", "home.page.html", "strict.page.html"]
    );

    let cache = views.cache();
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.path("home.page.html"), Some("pages/home.page.html"));
    assert!(!cache.contains("base.layout.html"));
}

#[test]
fn embedded_and_disk_builds_agree() {
    let embedded = ViewManager::new(ViewConfig::new(include_dir!(
        "$CARGO_MANIFEST_DIR/tests/templates"
    )))
    .unwrap();
    let disk = ViewManager::new(ViewConfig::new(fixtures().as_str())).unwrap();
    let again = ViewManager::new(ViewConfig::new(fixtures().as_str())).unwrap();

    assert_eq!(embedded.template_names(), disk.template_names());
    assert_eq!(disk.template_names(), again.template_names());

    let render = |views: &ViewManager| {
        views
            .render_to_string("token", "home.page.html", &mut TemplateData::new().with_title("hi"))
            .unwrap()
    };
    assert_eq!(render(&embedded), render(&disk));
}

#[test]
fn pages_render_standalone_without_layouts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pages/plain.page.html", "<p>{{title}} {{csrf_token}}</p>");

    let views = ViewManager::new(ViewConfig::new(dir.path())).unwrap();
    let output = views
        .render_to_string(
            "0123456789abcdef0123456789abcdef",
            "plain.page.html",
            &mut TemplateData::new().with_title("Welcome"),
        )
        .unwrap();

    assert_eq!(output, "<p>Welcome 0123456789abcdef0123456789abcdef</p>");
}

#[test]
fn no_pages_is_an_empty_cache() {
    let dir = TempDir::new().unwrap();
    let views = ViewManager::new(ViewConfig::new(dir.path())).unwrap();
    assert!(views.cache().is_empty());
}

#[test]
fn custom_locations_and_patterns() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "views/index.hbs", "{{#> shell}}{{title}}{{/shell}}");
    write(dir.path(), "views/ignored.txt", "{{broken");
    write(dir.path(), "partials/shell.hbs", "<main>{{> @partial-block}}</main>");

    let views = ViewManager::new(
        ViewConfig::new(dir.path())
            .with_pages("views", "*.hbs")
            .with_layouts("partials", "*.hbs"),
    )
    .unwrap();

    assert_eq!(views.template_names(), ["index.hbs"]);
    assert_eq!(
        views
            .render_to_string("t", "index.hbs", &mut TemplateData::new().with_title("hi"))
            .unwrap(),
        "<main>hi</main>"
    );
}

#[test]
fn duplicate_names_resolve_to_the_last_path() {
    logger();
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pages/a/same.page.html", "from a");
    write(dir.path(), "pages/b/same.page.html", "from b");
    write(dir.path(), "pages/c/other.page.html", "other");

    let config = ViewConfig::new(dir.path()).with_pages("pages", "**/*.page.html");

    for _ in 0..3 {
        let views = ViewManager::new(config.clone()).unwrap();
        assert_eq!(views.template_names(), ["other.page.html", "same.page.html"]);
        assert_eq!(views.cache().path("same.page.html"), Some("pages/b/same.page.html"));
        assert_eq!(
            views
                .render_to_string("t", "same.page.html", &mut TemplateData::new())
                .unwrap(),
            "from b"
        );
    }
}

#[test]
fn compile_errors_prevent_construction() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pages/good.page.html", "fine");
    write(dir.path(), "pages/bad.page.html", "{{#if title}}never closed");

    let error = ViewManager::new(ViewConfig::new(dir.path())).unwrap_err();
    assert!(error.is_build());
    assert!(matches!(error, ViewError::Compile { path, .. } if path == "pages/bad.page.html"));
}

#[test]
fn layout_compile_errors_prevent_construction() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pages/good.page.html", "fine");
    write(dir.path(), "layouts/bad.layout.html", "{{#if title}}{{/each}}");

    let error = ViewManager::new(ViewConfig::new(dir.path())).unwrap_err();
    assert!(matches!(error, ViewError::Compile { path, .. } if path == "layouts/bad.layout.html"));
}

#[test]
fn malformed_patterns_prevent_construction() {
    let error = ViewManager::new(ViewConfig::new(fixtures().as_str()).with_pages("pages", "[*.html"))
        .unwrap_err();
    assert!(matches!(error, ViewError::Pattern { .. }));

    let error = ViewManager::new(
        ViewConfig::new(include_dir!("$CARGO_MANIFEST_DIR/tests/templates"))
            .with_layouts("layouts", "***.html"),
    )
    .unwrap_err();
    assert!(matches!(error, ViewError::Pattern { .. }));
}

#[test]
fn duplicate_layouts_resolve_to_the_last_path() {
    logger();
    let dir = TempDir::new().unwrap();
    write(dir.path(), "layouts/a/shell.layout.html", "A {{> @partial-block}}");
    write(dir.path(), "layouts/b/shell.layout.html", "B {{> @partial-block}}");
    write(dir.path(), "pages/index.page.html", "{{#> shell}}{{title}}{{/shell}}");

    let views = ViewManager::new(ViewConfig::new(dir.path()).with_layouts("layouts", "**/*.layout.html"))
        .unwrap();
    assert_eq!(
        views
            .render_to_string("t", "index.page.html", &mut TemplateData::new().with_title("hi"))
            .unwrap(),
        "B hi"
    );
}

#[test]
fn roots_with_a_leading_cur_dir() {
    let views = ViewManager::new(ViewConfig::new("./tests/templates")).unwrap();
    assert_eq!(
        views.template_names(),
        ["counter.page.html", "home.page.html", "strict.page.html"]
    );
    assert_eq!(views.cache().path("home.page.html"), Some("pages/home.page.html"));

    let dev = ViewManager::new(ViewConfig::new("./tests/templates").in_development()).unwrap();
    let output = dev
        .render_to_string("t", "home.page.html", &mut TemplateData::new().with_title("hi"))
        .unwrap();
    assert!(output.contains("<h1>hi</h1>"));
}

#[test]
fn unreadable_pages_prevent_construction() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pages/good.page.html", "fine");
    fs::write(dir.path().join("pages/x.page.html"), b"<p>\xff\xfe</p>").unwrap();

    let error = ViewManager::new(ViewConfig::new(dir.path())).unwrap_err();
    assert!(error.is_build());
    assert!(matches!(error, ViewError::Read { path, .. } if path == "pages/x.page.html"));

    let error = ViewManager::new(ViewConfig::new(include_dir!("$CARGO_MANIFEST_DIR/tests/binary")))
        .unwrap_err();
    assert!(matches!(error, ViewError::Read { path, .. } if path == "pages/x.page.html"));
}
