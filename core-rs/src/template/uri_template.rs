//! URI templates as used by `ldt:path`, `ldt:skolemTemplate` and `ldt:fragment`
//!
//! Syntax is the JAX-RS one: literal text interleaved with `{name}` or
//! `{name: regex}` variables. A plain variable matches one path segment
//! (`[^/]+?`); an explicit regex may span segments, e.g. `{path: .*}`.
//! Variable names may contain dots, which the skolemizer reads as a
//! property path (`{author.name}`).

use crate::errors::{ProcessorError, Result};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Regex used for variables that do not declare their own
pub const DEFAULT_VARIABLE_REGEX: &str = "[^/]+?";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable { name: String, regex: Option<String> },
}

/// Compiled URI template
#[derive(Debug, Clone)]
pub struct UriTemplate {
    template: String,
    segments: Vec<Segment>,
    regex: Regex,
    /// Capture group index → variable name (one entry per occurrence)
    groups: Vec<String>,
    explicit_characters: usize,
    explicit_regexes: usize,
}

impl UriTemplate {
    /// Parse and compile a template
    ///
    /// # Examples
    ///
    /// ```
    /// use ldt_processor::template::UriTemplate;
    ///
    /// let template = UriTemplate::new("/posts/{id}").unwrap();
    /// let bindings = template.match_path("/posts/42").unwrap();
    /// assert_eq!(bindings.get("id").map(String::as_str), Some("42"));
    /// assert!(template.match_path("/posts/42/comments").is_none());
    /// ```
    pub fn new(template: &str) -> Result<Self> {
        let segments = parse_segments(template)?;

        let mut pattern = String::from("^");
        let mut groups = Vec::new();
        let mut explicit_characters = 0;
        let mut explicit_regexes = 0;

        for segment in &segments {
            match segment {
                Segment::Literal(text) => {
                    explicit_characters += text.chars().count();
                    pattern.push_str(&regex::escape(text));
                }
                Segment::Variable { name, regex } => {
                    if regex.is_some() {
                        explicit_regexes += 1;
                    }
                    let group_regex = regex.as_deref().unwrap_or(DEFAULT_VARIABLE_REGEX);
                    pattern.push_str(&format!("(?P<v{}>{})", groups.len(), group_regex));
                    groups.push(name.clone());
                }
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| {
            ProcessorError::UriTemplate(format!("Invalid regex in template \"{}\": {}", template, e))
        })?;

        Ok(Self {
            template: template.to_string(),
            segments,
            regex,
            groups,
            explicit_characters,
            explicit_regexes,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Variable names in order of first appearance, without duplicates
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in &self.groups {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// Number of literal (non-variable) characters
    pub fn explicit_characters(&self) -> usize {
        self.explicit_characters
    }

    /// Number of variable occurrences
    pub fn variables(&self) -> usize {
        self.groups.len()
    }

    /// Number of variables declaring their own regex
    pub fn explicit_regexes(&self) -> usize {
        self.explicit_regexes
    }

    /// Match the whole of `path`, returning the captured variable values.
    ///
    /// A variable that occurs more than once must capture the same value
    /// everywhere, otherwise the template does not match.
    pub fn match_path(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let captures = self.regex.captures(path)?;

        let mut bindings = BTreeMap::new();
        for (idx, name) in self.groups.iter().enumerate() {
            let value = captures
                .name(&format!("v{}", idx))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            match bindings.get(name) {
                Some(existing) if existing != &value => return None,
                Some(_) => {}
                None => {
                    bindings.insert(name.clone(), value);
                }
            }
        }

        Some(bindings)
    }

    pub fn matches(&self, path: &str) -> bool {
        self.match_path(path).is_some()
    }

    /// Substitute variables with the given values.
    ///
    /// Values are inserted as-is; callers encode them beforehand. A variable
    /// without a value expands to the empty string.
    pub fn expand(&self, values: &HashMap<String, String>) -> String {
        let mut expanded = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => expanded.push_str(text),
                Segment::Variable { name, .. } => {
                    if let Some(value) = values.get(name) {
                        expanded.push_str(value);
                    }
                }
            }
        }
        expanded
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

fn parse_segments(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }

                // braces inside an explicit regex ({n,m} quantifiers) nest
                let mut body = String::new();
                let mut depth = 1;
                for inner in chars.by_ref() {
                    match inner {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    body.push(inner);
                }
                if depth != 0 {
                    return Err(ProcessorError::UriTemplate(format!(
                        "Unclosed variable in template \"{}\"",
                        template
                    )));
                }

                segments.push(parse_variable(template, &body)?);
            }
            '}' => {
                return Err(ProcessorError::UriTemplate(format!(
                    "Unmatched '}}' in template \"{}\"",
                    template
                )));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

fn parse_variable(template: &str, body: &str) -> Result<Segment> {
    let (name, regex) = match body.split_once(':') {
        Some((name, regex)) => (name.trim(), Some(regex.trim())),
        None => (body.trim(), None),
    };

    if name.is_empty() || !name.chars().all(is_name_char) {
        return Err(ProcessorError::UriTemplate(format!(
            "Invalid variable name \"{}\" in template \"{}\"",
            name, template
        )));
    }

    let regex = match regex {
        Some("") => {
            return Err(ProcessorError::UriTemplate(format!(
                "Empty regex for variable \"{}\" in template \"{}\"",
                name, template
            )))
        }
        Some(regex) => Some(regex.to_string()),
        None => None,
    };

    Ok(Segment::Variable {
        name: name.to_string(),
        regex,
    })
}

impl FromStr for UriTemplate {
    type Err = ProcessorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl PartialEq for UriTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for UriTemplate {}

impl Hash for UriTemplate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.template.hash(state);
    }
}

impl Serialize for UriTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.template)
    }
}
