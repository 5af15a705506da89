use crate::Assigns;
use serde::Serialize;
use serde_json::Value;
use std::{borrow::Cow, collections::HashMap};

/**
The values a page is rendered with.

Every field is visible to templates under its own name, e.g.
`{{title}}`, `{{string_map.greeting}}` or `{{data.user.name}}`.
`csrf_token` is filled in by the
[`ViewManager`](crate::ViewManager) immediately before each render
and overwrites anything the caller put there.

```
use trillium_views::TemplateData;
use serde_json::json;

let data = TemplateData::new()
    .with_title("Welcome")
    .with_flash("saved!")
    .with_data("user", json!({ "name": "trillium" }))
    .authenticated();

assert_eq!(data.title, "Welcome");
assert!(data.is_authenticated);
assert_eq!(data.data["user"]["name"], "trillium");
```
*/
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TemplateData {
    /// the anti-forgery token for this request
    pub csrf_token: String,
    /// a list of strings
    pub string_slice: Vec<String>,
    /// string values by name
    pub string_map: HashMap<String, String>,
    /// integer values by name
    pub int_map: HashMap<String, i64>,
    /// float values by name
    pub float_map: HashMap<String, f32>,
    /// arbitrary json values by name
    pub data: Assigns,
    /// a one-time message, typically from a redirect
    pub flash: String,
    /// a warning message
    pub warning: String,
    /// an error message
    pub error: String,
    /// whether the current user is signed in
    pub is_authenticated: bool,
    /// the page title
    pub title: String,
    /// an informational notice
    pub info_msg: String,
    /// a warning notice
    pub warn_msg: String,
    /// an error notice
    pub err_msg: String,
}

impl TemplateData {
    /// empty data, with every field at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// chainable setter for the page title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// chainable setter for the flash message
    pub fn with_flash(mut self, flash: impl Into<String>) -> Self {
        self.flash = flash.into();
        self
    }

    /// chainable setter for the warning message
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = warning.into();
        self
    }

    /// chainable setter for the error message
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }

    /// marks the request as coming from a signed-in user
    pub fn authenticated(mut self) -> Self {
        self.is_authenticated = true;
        self
    }

    /// chainable insert into `string_map`
    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.string_map.insert(key.into(), value.into());
        self
    }

    /// chainable insert into `int_map`
    pub fn with_int(mut self, key: impl Into<String>, value: i64) -> Self {
        self.int_map.insert(key.into(), value);
        self
    }

    /// chainable insert into `float_map`
    pub fn with_float(mut self, key: impl Into<String>, value: f32) -> Self {
        self.float_map.insert(key.into(), value);
        self
    }

    /// chainable insert into `data`
    pub fn with_data(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /**
    Serializes anything serde-serializable into `data`. See
    [`Assigns::assign`].
    */
    pub fn assign(
        &mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Serialize,
    ) -> Result<&mut Self, serde_json::Error> {
        self.data.assign(key, value)?;
        Ok(self)
    }
}
