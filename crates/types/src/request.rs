//! Request model passed through slot resolution and template helpers

use canopy_errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// HTTP request method, as far as predicates care
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Patch,
}

impl RequestMethod {
    /// Canonical upper-case name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "PATCH" => Ok(Self::Patch),
            _ => Err(ConfigError::InvalidValue {
                field: "request_method".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// Implement clap::ValueEnum for RequestMethod
impl clap::ValueEnum for RequestMethod {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::Get,
            Self::Post,
            Self::Put,
            Self::Delete,
            Self::Head,
            Self::Patch,
        ]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Get => clap::builder::PossibleValue::new("get"),
            Self::Post => clap::builder::PossibleValue::new("post"),
            Self::Put => clap::builder::PossibleValue::new("put"),
            Self::Delete => clap::builder::PossibleValue::new("delete"),
            Self::Head => clap::builder::PossibleValue::new("head"),
            Self::Patch => clap::builder::PossibleValue::new("patch"),
        })
    }
}

impl Default for RequestMethod {
    fn default() -> Self {
        Self::Get
    }
}

/// Default application URL for requests built outside a server
pub const DEFAULT_APPLICATION_URL: &str = "http://example.com";

/// The parts of an incoming request the rendering core reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Correlation id, carried into tracing spans
    pub id: Uuid,
    pub method: RequestMethod,
    /// Name of the view being rendered (e.g. `edit`), empty for the default view
    pub view_name: String,
    /// Query string parameters
    pub params: BTreeMap<String, String>,
    /// Form body parameters
    pub post: BTreeMap<String, String>,
    pub is_xhr: bool,
    /// Authenticated principal name, if any
    pub user: Option<String>,
    pub application_url: String,
}

impl Request {
    /// Create an empty request with the given method
    #[must_use]
    pub fn new(method: RequestMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            method,
            view_name: String::new(),
            params: BTreeMap::new(),
            post: BTreeMap::new(),
            is_xhr: false,
            user: None,
            application_url: DEFAULT_APPLICATION_URL.to_string(),
        }
    }

    /// Empty GET request
    #[must_use]
    pub fn get() -> Self {
        Self::new(RequestMethod::Get)
    }

    /// Empty POST request
    #[must_use]
    pub fn post() -> Self {
        Self::new(RequestMethod::Post)
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_post(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.post.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_view_name(mut self, view_name: impl Into<String>) -> Self {
        self.view_name = view_name.into();
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn with_xhr(mut self, is_xhr: bool) -> Self {
        self.is_xhr = is_xhr;
        self
    }

    /// Look a parameter up in the form body first, then the query string
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.post
            .get(key)
            .or_else(|| self.params.get(key))
            .map(String::as_str)
    }

    /// Derive the request a slot view is rendered with.
    ///
    /// The sub-request keeps the correlation id, method, user and query
    /// string of its parent. `extra` is merged into the form body and wins
    /// over existing keys.
    #[must_use]
    pub fn sub_request(&self, extra: &BTreeMap<String, String>) -> Self {
        let mut sub = self.clone();
        sub.post
            .extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        sub
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!("get".parse::<RequestMethod>().unwrap(), RequestMethod::Get);
        assert_eq!("POST".parse::<RequestMethod>().unwrap(), RequestMethod::Post);
        assert!("FETCH".parse::<RequestMethod>().is_err());
    }

    #[test]
    fn test_param_prefers_form_body() {
        let request = Request::post()
            .with_param("q", "from-query")
            .with_post("q", "from-body")
            .with_param("only", "query");
        assert_eq!(request.param("q"), Some("from-body"));
        assert_eq!(request.param("only"), Some("query"));
        assert_eq!(request.param("missing"), None);
    }

    #[test]
    fn test_sub_request_merges_params() {
        let request = Request::get().with_param("bar", "Hello").with_post("a", "1");
        let mut extra = BTreeMap::new();
        extra.insert("a".to_string(), "2".to_string());
        extra.insert("greeting".to_string(), "Yo".to_string());

        let sub = request.sub_request(&extra);
        assert_eq!(sub.id, request.id);
        assert_eq!(sub.param("bar"), Some("Hello"));
        assert_eq!(sub.param("a"), Some("2"));
        assert_eq!(sub.param("greeting"), Some("Yo"));
        // the parent request is untouched
        assert_eq!(request.param("greeting"), None);
    }
}
