use std::io;
use thiserror::Error;

/**
Concrete errors that occur while building or rendering views.

Each variant names the stage that failed: discovering files, reading
them, compiling them, finding the requested page, executing it, or
writing the finished output.
*/
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ViewError {
    /// A page or layout glob could not be parsed.
    #[error("invalid template pattern {pattern:?}: {source}")]
    Pattern {
        /// the glob that failed to parse
        pattern: String,
        /// the underlying glob error
        #[source]
        source: glob::PatternError,
    },

    /// A matching path could not be read while enumerating a glob.
    #[error("unable to enumerate {pattern:?}: {source}")]
    Glob {
        /// the glob being enumerated
        pattern: String,
        /// the underlying glob error
        #[source]
        source: glob::GlobError,
    },

    /// A matched file could not be read as utf8 text.
    #[error("unable to read template {path}: {source}")]
    Read {
        /// the forward-slash path of the file, relative to the file set
        path: String,
        /// the underlying io error
        #[source]
        source: io::Error,
    },

    /// A page or layout failed to compile.
    #[error("unable to compile template {path}: {source}")]
    Compile {
        /// the forward-slash path of the file, relative to the file set
        path: String,
        /// the handlebars parse error
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// No page with this name is in the template cache.
    #[error("unable to find {0} in template cache")]
    NotFound(String),

    /// A page compiled but failed to execute against the supplied data.
    #[error("unable to render {name}: {source}")]
    Render {
        /// the template name
        name: String,
        /// the handlebars render error
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// The rendered output could not be written to the sink.
    #[error("error writing rendered template: {0}")]
    Write(#[source] io::Error),
}

impl ViewError {
    /// is this a lookup error for an unknown template name?
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// did the template fail while executing?
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }

    /// did the final write to the output sink fail?
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write(_))
    }

    /// did discovering, reading, or compiling the file set fail?
    pub fn is_build(&self) -> bool {
        matches!(
            self,
            Self::Pattern { .. } | Self::Glob { .. } | Self::Read { .. } | Self::Compile { .. }
        )
    }
}

/// this crate's result type
pub type Result<T, E = ViewError> = std::result::Result<T, E>;
