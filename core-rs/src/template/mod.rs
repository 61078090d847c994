//! URI template language shared by request matching and skolemization
//!
//! - uri_template: parser, matcher and expander for `{name}` / `{name: regex}` templates
//! - comparator: specificity order used to rank competing matches
//! - uri_builder: absolute URI construction with path-segment encoding

pub mod comparator;
pub mod uri_builder;
pub mod uri_template;

pub use comparator::more_specific;
pub use uri_builder::{encode_path_segment, UriBuilder, PATH_SEGMENT};
pub use uri_template::{UriTemplate, DEFAULT_VARIABLE_REGEX};
