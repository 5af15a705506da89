use std::{
    fmt::{self, Debug, Formatter},
    iter::repeat_with,
    ops::Deref,
};
use trillium::{async_trait, Conn, Handler, HeaderName};

/**
Anything a per-request anti-forgery token can be read from.

[`ViewManager::render`](crate::ViewManager::render) asks its request
argument for a token exactly once per render. Conns read the token
that [`CsrfHandler`] stored on them; strings are their own token,
which is mostly useful outside of a trillium application and in
tests.
*/
pub trait CsrfTokenSource {
    /// the token for the current request
    fn token(&self) -> String;
}

impl CsrfTokenSource for str {
    fn token(&self) -> String {
        self.to_string()
    }
}

impl CsrfTokenSource for String {
    fn token(&self) -> String {
        self.clone()
    }
}

impl CsrfTokenSource for Conn {
    fn token(&self) -> String {
        match self.state::<CsrfToken>() {
            Some(token) => token.to_string(),
            None => {
                log::warn!("rendering without a csrf token, was CsrfHandler run?");
                String::new()
            }
        }
    }
}

/**
The anti-forgery token for a conn, held in conn state.

An upstream handler that manages tokens itself (for example, by
storing them in a session) can put one of these on the conn, and
[`CsrfHandler`] will leave it alone.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// wraps an existing token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    fn generate() -> Self {
        Self(repeat_with(fastrand::alphanumeric).take(32).collect())
    }
}

impl Deref for CsrfToken {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for CsrfToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

/**
Trillium handler that makes sure every conn has a [`CsrfToken`].

If the conn already carries one it is kept. Otherwise a 32 character
random alphanumeric token is generated, which can be customized with
[`CsrfHandler::with_token_generator`].

```
use trillium_testing::prelude::*;
use trillium_views::{CsrfConnExt, CsrfHandler};

let app = (CsrfHandler::new(), |conn: Conn| async move {
    let len = conn.csrf_token().map_or(0, str::len);
    conn.ok(len.to_string())
});

assert_ok!(get("/").on(&app), "32");
```
*/
pub struct CsrfHandler {
    response_header: Option<HeaderName<'static>>,
    token_generator: Option<Box<dyn Fn() -> String + Send + Sync + 'static>>,
}

impl Debug for CsrfHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrfHandler")
            .field("response_header", &self.response_header)
            .field(
                "token_generator",
                &if self.token_generator.is_some() {
                    "Some(token generator fn)"
                } else {
                    "None"
                },
            )
            .finish()
    }
}

impl Default for CsrfHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CsrfHandler {
    /// Constructs a new CsrfHandler
    pub fn new() -> Self {
        Self {
            response_header: None,
            token_generator: None,
        }
    }

    /**
    Also sends the token as a response header, for clients that
    submit forms from javascript.

    ```
    use trillium_testing::prelude::*;
    use trillium_views::CsrfHandler;

    let app = (
        CsrfHandler::new()
            .with_token_generator(|| String::from("token"))
            .with_response_header("x-csrf-token"),
        "ok",
    );

    assert_ok!(get("/").on(&app), "ok", "x-csrf-token" => "token");
    ```
    */
    pub fn with_response_header(mut self, response_header: impl Into<HeaderName<'static>>) -> Self {
        self.response_header = Some(response_header.into());
        self
    }

    /// Provide an alternative generator function for tokens.
    pub fn with_token_generator<F>(mut self, token_generator: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.token_generator = Some(Box::new(token_generator));
        self
    }

    fn generate_token(&self) -> CsrfToken {
        match self.token_generator {
            Some(ref token_generator) => CsrfToken(token_generator()),
            None => CsrfToken::generate(),
        }
    }
}

#[async_trait]
impl Handler for CsrfHandler {
    async fn run(&self, mut conn: Conn) -> Conn {
        let token = match conn.state::<CsrfToken>() {
            Some(token) => token.clone(),
            None => self.generate_token(),
        };

        if let Some(ref response_header) = self.response_header {
            conn.response_headers_mut()
                .insert(response_header.clone(), token.to_string());
        }

        conn.with_state(token)
    }
}

/// Extension trait to retrieve the token set by [`CsrfHandler`]
pub trait CsrfConnExt {
    /// the anti-forgery token for this conn, if [`CsrfHandler`] has run
    fn csrf_token(&self) -> Option<&str>;
}

impl CsrfConnExt for Conn {
    fn csrf_token(&self) -> Option<&str> {
        self.state::<CsrfToken>().map(|token| &**token)
    }
}
