use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, RenderErrorReason,
    ScopedJson,
};
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fmt::{self, Debug, Formatter},
    sync::Arc,
};
use thiserror::Error;

/// The error a template function returns to fail the render it was called from
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FunctionError(String);

impl FunctionError {
    /// builds a new FunctionError from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// the result type for template functions
pub type FunctionResult = Result<Value, FunctionError>;

type TemplateFunction = Arc<dyn Fn(&[Value]) -> FunctionResult + Send + Sync + 'static>;

/**
A registry of functions that are callable by name from inside
templates.

Each function receives its template parameters as json values and
returns a json value, which handlebars escapes when written with
`{{ }}` and writes verbatim with `{{{ }}}`.

```
use trillium_views::{FunctionError, TemplateFunctions};
use serde_json::{json, Value};

let functions = TemplateFunctions::basic().with("shout", |args: &[Value]| {
    args.first()
        .and_then(Value::as_str)
        .map(|s| json!(s.to_uppercase()))
        .ok_or_else(|| FunctionError::new("shout requires a string"))
});

assert_eq!(functions.names().collect::<Vec<_>>(), ["inc", "marshal", "shout"]);
```
*/
#[derive(Clone, Default)]
pub struct TemplateFunctions(BTreeMap<String, TemplateFunction>);

impl Debug for TemplateFunctions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl TemplateFunctions {
    /// an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /**
    The default registry:

    * `inc` adds one to its numeric argument
    * `marshal` serializes its argument as json that is safe to embed
      in a `<script>` element
    */
    pub fn basic() -> Self {
        Self::new().with("inc", inc).with("marshal", marshal)
    }

    /// adds or replaces a function, chainable
    pub fn with<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Value]) -> FunctionResult + Send + Sync + 'static,
    {
        self.insert(name, function);
        self
    }

    /// adds or replaces a function
    pub fn insert<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value]) -> FunctionResult + Send + Sync + 'static,
    {
        self.0.insert(name.into(), Arc::new(function));
    }

    /// removes a function by name, returning whether it was present
    pub fn remove(&mut self, name: &str) -> bool {
        self.0.remove(name).is_some()
    }

    /// the registered function names, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// calls a registered function directly
    pub fn call(&self, name: &str, args: &[Value]) -> Option<FunctionResult> {
        self.0.get(name).map(|function| function(args))
    }

    /// the number of registered functions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// is this registry empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn register(&self, handlebars: &mut Handlebars<'static>) {
        for (name, function) in &self.0 {
            handlebars.register_helper(
                name,
                Box::new(FunctionHelper {
                    name: name.clone(),
                    function: Arc::clone(function),
                }),
            );
        }
    }
}

struct FunctionHelper {
    name: String,
    function: TemplateFunction,
}

impl HelperDef for FunctionHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let args = h
            .params()
            .iter()
            .map(|param| param.value().clone())
            .collect::<Vec<_>>();

        (self.function)(&args)
            .map(ScopedJson::Derived)
            .map_err(|error| RenderErrorReason::Other(format!("{}: {error}", self.name)).into())
    }
}

fn inc(args: &[Value]) -> FunctionResult {
    match args {
        [Value::Number(n)] => {
            if let Some(i) = n.as_i64() {
                i.checked_add(1)
                    .map(Value::from)
                    .ok_or_else(|| FunctionError::new("inc overflowed"))
            } else if let Some(u) = n.as_u64() {
                u.checked_add(1)
                    .map(Value::from)
                    .ok_or_else(|| FunctionError::new("inc overflowed"))
            } else {
                n.as_f64()
                    .map(|f| Value::from(f + 1.0))
                    .ok_or_else(|| FunctionError::new("inc requires a finite number"))
            }
        }
        [other] => Err(FunctionError::new(format!(
            "inc requires a number, not {other}"
        ))),
        _ => Err(FunctionError::new(format!(
            "inc takes exactly one argument, {} given",
            args.len()
        ))),
    }
}

fn marshal(args: &[Value]) -> FunctionResult {
    let [value] = args else {
        return Err(FunctionError::new(format!(
            "marshal takes exactly one argument, {} given",
            args.len()
        )));
    };

    let json = serde_json::to_string(value).map_err(|e| FunctionError::new(e.to_string()))?;
    Ok(Value::String(script_safe(&json)))
}

// json is already valid javascript; these are the characters that could
// still end a <script> element or a js string literal early
fn script_safe(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inc_adds_one() {
        assert_eq!(inc(&[json!(1)]), Ok(json!(2)));
        assert_eq!(inc(&[json!(-1)]), Ok(json!(0)));
        assert_eq!(inc(&[json!(u64::MAX - 1)]), Ok(json!(u64::MAX)));
        assert_eq!(inc(&[json!(1.5)]), Ok(json!(2.5)));
    }

    #[test]
    fn inc_rejects_bad_arguments() {
        assert!(inc(&[json!("1")]).is_err());
        assert!(inc(&[]).is_err());
        assert!(inc(&[json!(1), json!(2)]).is_err());
        assert!(inc(&[json!(u64::MAX)]).is_err());
    }

    #[test]
    fn marshal_is_script_safe() {
        assert_eq!(
            marshal(&[json!({ "a": "</script><b>&" })]),
            Ok(json!(r#"{"a":"\u003c/script\u003e\u003cb\u003e\u0026"}"#))
        );

        assert_eq!(marshal(&[json!([1, 2])]), Ok(json!("[1,2]")));
        assert_eq!(marshal(&[json!("\u{2028}")]), Ok(json!(r#""\u2028""#)));
        assert!(marshal(&[]).is_err());
    }

    #[test]
    fn registry() {
        let mut functions = TemplateFunctions::basic();
        assert_eq!(functions.len(), 2);
        assert_eq!(functions.call("inc", &[json!(41)]), Some(Ok(json!(42))));
        assert_eq!(functions.call("missing", &[]), None);

        functions.insert("inc", |_: &[Value]| Ok(json!("replaced")));
        assert_eq!(functions.call("inc", &[]), Some(Ok(json!("replaced"))));

        assert!(functions.remove("inc"));
        assert!(!functions.remove("inc"));
        assert_eq!(functions.names().collect::<Vec<_>>(), ["marshal"]);
    }
}
