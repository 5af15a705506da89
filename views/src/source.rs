use crate::{Result, ViewError};
use glob::{MatchOptions, Pattern};
use include_dir::Dir;
use std::{
    fmt::{self, Debug, Formatter},
    fs, io,
    path::{Component, Path, PathBuf},
};

/**
The file set that templates are read from.

Production builds usually bundle their templates into the binary with
[`include_dir!`](crate::include_dir); a [`PathBuf`] reads them from the
live filesystem instead.
*/
#[derive(Clone)]
pub enum TemplateFiles {
    /// templates bundled at compile time
    Embedded(Dir<'static>),

    /// templates read from a directory on disk
    Directory(PathBuf),
}

impl Debug for TemplateFiles {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded(dir) => f
                .debug_tuple("Embedded")
                .field(&format_args!("{} entries", dir.entries().len()))
                .finish(),
            Self::Directory(path) => f.debug_tuple("Directory").field(path).finish(),
        }
    }
}

impl TemplateFiles {
    pub(crate) fn source(&self) -> Box<dyn TemplateSource + '_> {
        match self {
            Self::Embedded(dir) => Box::new(EmbeddedFiles(dir)),
            Self::Directory(root) => Box::new(DiskFiles(root)),
        }
    }
}

impl From<Dir<'static>> for TemplateFiles {
    fn from(dir: Dir<'static>) -> Self {
        Self::Embedded(dir)
    }
}

impl From<PathBuf> for TemplateFiles {
    fn from(path: PathBuf) -> Self {
        Self::Directory(path)
    }
}

impl From<&Path> for TemplateFiles {
    fn from(path: &Path) -> Self {
        Self::Directory(path.to_path_buf())
    }
}

impl From<&str> for TemplateFiles {
    fn from(path: &str) -> Self {
        Self::Directory(PathBuf::from(path))
    }
}

/**
Lists and reads template files.

Paths are always forward-slash separated and relative to the root of
the file set, whichever platform we are on.
*/
pub(crate) trait TemplateSource {
    /// every file matching `pattern`, sorted by path
    fn glob(&self, pattern: &str) -> Result<Vec<String>>;

    /// the text of the file at `path`
    fn read(&self, path: &str) -> Result<String>;
}

pub(crate) struct EmbeddedFiles<'a>(&'a Dir<'static>);

// glob() walks one path component at a time, so `*` never crosses a `/`
// on disk; this makes bundled files match the same way
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn collect_matches(dir: &Dir<'static>, pattern: &Pattern, paths: &mut Vec<String>) {
    for file in dir.files() {
        let path = slash_path(file.path());
        if pattern.matches_with(&path, MATCH_OPTIONS) {
            paths.push(path);
        }
    }

    for dir in dir.dirs() {
        collect_matches(dir, pattern, paths);
    }
}

impl TemplateSource for EmbeddedFiles<'_> {
    fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        let compiled = Pattern::new(pattern).map_err(|source| ViewError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut paths = vec![];
        collect_matches(self.0, &compiled, &mut paths);
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> Result<String> {
        let file = self.0.get_file(path).ok_or_else(|| ViewError::Read {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not in embedded file set"),
        })?;

        file.contents_utf8()
            .map(String::from)
            .ok_or_else(|| ViewError::Read {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::InvalidData, "not valid utf8"),
            })
    }
}

pub(crate) struct DiskFiles<'a>(&'a Path);

impl TemplateSource for DiskFiles<'_> {
    fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        // glob() leaves `.` components out of the paths it yields
        let root = without_cur_dir(self.0);
        let escaped = Pattern::escape(&root.to_string_lossy());
        let full_pattern = if escaped.is_empty() {
            pattern.to_string()
        } else {
            format!("{}/{pattern}", escaped.trim_end_matches(['/', '\\']))
        };

        let matches = glob::glob(&full_pattern).map_err(|source| ViewError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut paths = vec![];
        for entry in matches {
            let path = entry.map_err(|source| ViewError::Glob {
                pattern: pattern.to_string(),
                source,
            })?;

            if !path.is_file() {
                continue;
            }

            let path = without_cur_dir(&path);
            let relative = path.strip_prefix(&root).map_err(|_| ViewError::Read {
                path: path.to_string_lossy().into_owned(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not inside {}", self.0.display()),
                ),
            })?;
            paths.push(slash_path(relative));
        }

        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> Result<String> {
        fs::read_to_string(self.0.join(path)).map_err(|source| ViewError::Read {
            path: path.to_string(),
            source,
        })
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

// only used for paths relative to a file set root
fn slash_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
