//! Endpoint templates with named path parameters
//!
//! ```rust,ignore
//! let endpoint = Endpoint::new("/projects/{project_id}/tasks").with_query("status", "status");
//! let params = PathParams::from([("project_id".into(), "p1".into())]);
//! assert_eq!(endpoint.resolve(&params).as_deref(), Some("projects/p1/tasks"));
//! ```

use crate::core::service::PathParams;
use reqwest::Url;

/// Throwaway origin used only to borrow `Url`'s encoders
const RELATIVE_BASE: &str = "http://workdesk.invalid/";

/// A collection path such as `/projects/{project_id}/tasks`
///
/// Path parameters are required: [`Endpoint::resolve`] yields nothing while
/// any of them is missing or blank. Query parameters are optional and only
/// sent when their parameter has a non-blank value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    template: String,
    /// (query key, parameter name)
    query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            query: Vec::new(),
        }
    }

    /// Send parameter `param` as query key `key` when it is set
    pub fn with_query(mut self, key: impl Into<String>, param: impl Into<String>) -> Self {
        self.query.push((key.into(), param.into()));
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Names of the required path parameters, in order
    pub fn parameters(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    names.push(&after[..end]);
                    rest = &after[end + 1..];
                }
                None => break,
            }
        }
        names
    }

    /// Build the relative request path (without leading slash), query included
    pub fn resolve(&self, params: &PathParams) -> Option<String> {
        let mut segments = Vec::new();
        for segment in self.template.split('/').filter(|s| !s.is_empty()) {
            segments.push(substitute(segment, params)?);
        }

        let query: Vec<(&str, &str)> = self
            .query
            .iter()
            .filter_map(|(key, name)| param(params, name).map(|value| (key.as_str(), value)))
            .collect();

        relative_url(&segments, &query)
    }
}

fn param<'p>(params: &'p PathParams, name: &str) -> Option<&'p str> {
    params
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Replace every `{name}` in one path segment, `None` if a value is missing
fn substitute(segment: &str, params: &PathParams) -> Option<String> {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}')?;
        out.push_str(param(params, &after[..end])?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Some(out)
}

/// Join raw segments and query pairs into an encoded relative URL
///
/// Each segment is percent-encoded as a whole, so a `/` inside a value
/// stays within its segment.
pub(crate) fn relative_url<S: AsRef<str>>(
    segments: &[S],
    query: &[(&str, &str)],
) -> Option<String> {
    let mut url = Url::parse(RELATIVE_BASE).ok()?;
    url.path_segments_mut().ok()?.clear().extend(segments);
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    let mut resolved = url.path().trim_start_matches('/').to_string();
    if let Some(query) = url.query() {
        resolved.push('?');
        resolved.push_str(query);
    }
    Some(resolved)
}
