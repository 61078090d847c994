//! URI reference parsing and relativization
//!
//! Request URIs arrive as strings from the dispatch layer; matching only
//! needs the RFC 3986 component split and `relativize` against the
//! deployment base URI.

use crate::errors::{ProcessorError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// RFC 3986, appendix B
static URI_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:([A-Za-z][A-Za-z0-9+.\-]*):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .unwrap_or_else(|e| panic!("URI reference regex must compile: {}", e))
});

/// Parsed URI reference components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUri {
    pub scheme: Option<String>,
    pub authority: Option<String>,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl ParsedUri {
    /// Split a URI reference into its components
    ///
    /// # Examples
    ///
    /// ```
    /// use ldt_processor::uri::ParsedUri;
    ///
    /// let uri = ParsedUri::parse("http://example.org/posts/42?view=full#top").unwrap();
    /// assert_eq!(uri.scheme.as_deref(), Some("http"));
    /// assert_eq!(uri.authority.as_deref(), Some("example.org"));
    /// assert_eq!(uri.path, "/posts/42");
    /// assert_eq!(uri.query.as_deref(), Some("view=full"));
    /// assert_eq!(uri.fragment.as_deref(), Some("top"));
    /// ```
    pub fn parse(uri: &str) -> Result<Self> {
        if uri.chars().any(char::is_whitespace) {
            return Err(ProcessorError::InvalidArgument(format!(
                "URI \"{}\" contains whitespace",
                uri
            )));
        }

        let caps = URI_REFERENCE
            .captures(uri)
            .ok_or_else(|| ProcessorError::InvalidArgument(format!("Cannot parse URI \"{}\"", uri)))?;

        let group = |idx: usize| caps.get(idx).map(|m| m.as_str().to_string());

        Ok(Self {
            scheme: group(1),
            authority: group(2),
            path: group(3).unwrap_or_default(),
            query: group(4),
            fragment: group(5),
        })
    }

    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }

    /// Relativize `self` against `base`, following `java.net.URI#relativize`.
    ///
    /// Both paths are normalized first (see [`remove_dot_segments`]).
    /// Returns `None` when `self` is not located under `base`: schemes or
    /// authorities differ, either URI is opaque, or the base path (with a
    /// trailing slash) is not a prefix of this URI's path.
    /// The result keeps the query and fragment of `self`.
    pub fn relativize(&self, base: &ParsedUri) -> Option<String> {
        if self.is_opaque() || base.is_opaque() {
            return None;
        }
        if !eq_ignore_case(&self.scheme, &base.scheme) || !eq_ignore_case(&self.authority, &base.authority) {
            return None;
        }

        let path = remove_dot_segments(&self.path);
        let mut base_path = remove_dot_segments(&base.path);
        let same_path = path == base_path;
        if !base_path.ends_with('/') {
            base_path.push('/');
        }

        let relative_path = if same_path {
            ""
        } else {
            path.strip_prefix(base_path.as_str())?
        };

        let mut relative = relative_path.to_string();
        if let Some(query) = &self.query {
            relative.push('?');
            relative.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            relative.push('#');
            relative.push_str(fragment);
        }
        Some(relative)
    }

    fn is_opaque(&self) -> bool {
        self.is_absolute() && self.authority.is_none() && !self.path.starts_with('/')
    }
}

/// Resolve `.` and `..` segments of a path (RFC 3986, section 5.2.4).
///
/// ```
/// use ldt_processor::uri::remove_dot_segments;
///
/// assert_eq!(remove_dot_segments("/app/../secret"), "/secret");
/// assert_eq!(remove_dot_segments("/a/./b/../c/"), "/a/c/");
/// assert_eq!(remove_dot_segments("/../x"), "/x");
/// ```
pub fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output: Vec<&str> = Vec::new();

    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            output.pop();
        } else if input == "/.." {
            input = "/";
            output.pop();
        } else if input == "." || input == ".." {
            input = "";
        } else {
            // first segment, with its leading slash
            let skip = usize::from(input.starts_with('/'));
            let end = input[skip..].find('/').map_or(input.len(), |idx| idx + skip);
            output.push(&input[..end]);
            input = &input[end..];
        }
    }

    output.concat()
}

fn eq_ignore_case(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

impl fmt::Display for ParsedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{}:", scheme)?;
        }
        if let Some(authority) = &self.authority {
            write!(f, "//{}", authority)?;
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}
