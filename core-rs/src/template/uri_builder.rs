//! Absolute URI builder
//!
//! Mirrors the subset of JAX-RS `UriBuilder` the skolemizer needs: start
//! from an absolute URI, append path templates, set a fragment template,
//! then expand everything from a name → value map.

use super::UriTemplate;
use crate::errors::{ProcessorError, Result};
use crate::uri::ParsedUri;
use oxigraph::model::NamedNode;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::HashMap;

/// Characters that may not appear raw inside a path segment
pub const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode `value` as path segment content.
///
/// Encoding is contextual: an existing `%XX` escape is kept as-is, any
/// other `%` is encoded.
///
/// ```
/// use ldt_processor::template::encode_path_segment;
///
/// assert_eq!(encode_path_segment("a b"), "a%20b");
/// assert_eq!(encode_path_segment("a/b"), "a%2Fb");
/// assert_eq!(encode_path_segment("100%25"), "100%25");
/// ```
pub fn encode_path_segment(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut encoded = String::with_capacity(value.len());
    let mut start = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        if bytes[idx] == b'%'
            && idx + 2 < bytes.len()
            && bytes[idx + 1].is_ascii_hexdigit()
            && bytes[idx + 2].is_ascii_hexdigit()
        {
            encoded.extend(utf8_percent_encode(&value[start..idx], PATH_SEGMENT));
            encoded.push_str(&value[idx..idx + 3]);
            idx += 3;
            start = idx;
        } else {
            idx += 1;
        }
    }
    encoded.extend(utf8_percent_encode(&value[start..], PATH_SEGMENT));

    encoded
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriBuilder {
    scheme: String,
    authority: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl UriBuilder {
    /// Start from an absolute URI; its fragment is dropped.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let parsed = ParsedUri::parse(uri)?;
        let scheme = parsed.scheme.ok_or_else(|| {
            ProcessorError::InvalidArgument(format!("UriBuilder base \"{}\" is not absolute", uri))
        })?;

        Ok(Self {
            scheme,
            authority: parsed.authority,
            path: parsed.path,
            query: parsed.query,
            fragment: None,
        })
    }

    /// Start from the absolute path of a request URI: query and fragment
    /// are dropped.
    pub fn absolute_path(uri: &str) -> Result<Self> {
        let mut builder = Self::from_uri(uri)?;
        builder.query = None;
        Ok(builder)
    }

    /// Append a path template, keeping exactly one `/` at the join.
    pub fn path(mut self, template: &str) -> Self {
        if template.is_empty() {
            return self;
        }

        match (self.path.ends_with('/'), template.starts_with('/')) {
            (true, true) => self.path.push_str(&template[1..]),
            (false, false) => {
                self.path.push('/');
                self.path.push_str(template);
            }
            _ => self.path.push_str(template),
        }
        self
    }

    /// Replace the fragment template
    pub fn fragment(mut self, template: Option<&str>) -> Self {
        self.fragment = template.map(str::to_string);
        self
    }

    /// Expand path and fragment templates with `values` and return the IRI.
    ///
    /// Values are substituted verbatim (see [`encode_path_segment`]);
    /// variables without a value expand to nothing.
    pub fn build_from_map(&self, values: &HashMap<String, String>) -> Result<NamedNode> {
        let mut uri = format!("{}:", self.scheme);
        if let Some(authority) = &self.authority {
            uri.push_str("//");
            uri.push_str(authority);
        }
        uri.push_str(&UriTemplate::new(&self.path)?.expand(values));
        if let Some(query) = &self.query {
            uri.push('?');
            uri.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            uri.push('#');
            uri.push_str(&UriTemplate::new(fragment)?.expand(values));
        }

        Ok(NamedNode::new(uri)?)
    }

    /// Path template accumulated so far
    pub fn path_template(&self) -> &str {
        &self.path
    }
}
