//! Request-matching constraints

use canopy_types::{Request, RequestMethod};
use std::fmt;

/// A constraint a request must satisfy for a view or slot assignment to fire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Exactly this method
    RequestMethod(RequestMethod),
    /// Any of these methods
    RequestMethods(Vec<RequestMethod>),
    /// XHR or non-XHR requests only
    Xhr(bool),
}

impl Predicate {
    /// Whether `request` satisfies this predicate
    #[must_use]
    pub fn matches(&self, request: &Request) -> bool {
        match self {
            Self::RequestMethod(method) => request.method == *method,
            Self::RequestMethods(methods) => methods.contains(&request.method),
            Self::Xhr(is_xhr) => request.is_xhr == *is_xhr,
        }
    }
}

impl From<RequestMethod> for Predicate {
    fn from(method: RequestMethod) -> Self {
        Self::RequestMethod(method)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestMethod(method) => write!(f, "request_method={method}"),
            Self::RequestMethods(methods) => {
                let names: Vec<&str> = methods.iter().map(|m| m.as_str()).collect();
                write!(f, "request_method in [{}]", names.join(", "))
            }
            Self::Xhr(is_xhr) => write!(f, "xhr={is_xhr}"),
        }
    }
}
