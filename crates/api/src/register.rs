//! Self-registration of new users
//!
//! [`register`] handles both halves of the registration page: showing the
//! empty form and processing a submission. Accepted users are handed to a
//! [`UserSink`]; storing them is not this crate's business.

use crate::html::escape;
use canopy_config::RegisterConfig;
use canopy_errors::{Error, PrincipalError};
use canopy_types::Request;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Banner shown above a form that failed validation
pub const SUBMISSION_PROBLEM: &str = "There was a problem with your submission";

const FIELDS: [(&str, &str); 3] = [("title", "Full name"), ("name", "Username"), ("email", "Email")];

/// A user accepted by the registration form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub title: String,
    pub email: String,
    pub groups: Vec<String>,
    pub roles: BTreeSet<String>,
    /// Whether to mail the user a link for setting their password
    pub send_email: bool,
}

/// Principal-creation collaborator
pub trait UserSink {
    /// # Errors
    ///
    /// Returns `PrincipalError::AlreadyExists` when the name is taken.
    fn add_user(&mut self, user: NewUser) -> Result<(), PrincipalError>;
}

/// Keeps accepted users in memory
#[derive(Debug, Default)]
pub struct MemoryUsers {
    users: Vec<NewUser>,
}

impl MemoryUsers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn users(&self) -> &[NewUser] {
        &self.users
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NewUser> {
        self.users.iter().find(|user| user.name == name)
    }
}

impl UserSink for MemoryUsers {
    fn add_user(&mut self, user: NewUser) -> Result<(), PrincipalError> {
        if self.get(&user.name).is_some() {
            return Err(PrincipalError::AlreadyExists { name: user.name });
        }
        tracing::info!(user = %user.name, "Registered user");
        self.users.push(user);
        Ok(())
    }
}

/// Submitted values, per-field errors and an optional banner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub values: BTreeMap<String, String>,
    pub errors: BTreeMap<String, String>,
    pub message: Option<String>,
}

impl FormState {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// HTML for the registration form
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = String::from("<form action=\"\" method=\"POST\" id=\"register\">\n");
        if let Some(message) = &self.message {
            html.push_str(&format!(
                "  <div class=\"alert alert-error\">{}</div>\n",
                escape(message)
            ));
        }
        for (field, label) in FIELDS {
            let value = self.values.get(field).map_or("", String::as_str);
            html.push_str(&format!(
                "  <label for=\"{field}\">{label}</label>\n  <input type=\"text\" name=\"{field}\" id=\"{field}\" value=\"{}\"/>\n",
                escape(value)
            ));
            if let Some(error) = self.errors.get(field) {
                html.push_str(&format!("  <p class=\"error\">{}</p>\n", escape(error)));
            }
        }
        html.push_str("  <button type=\"submit\" name=\"register\" value=\"register\">Register</button>\n</form>");
        html
    }
}

/// What the registration page responds with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RegisterOutcome {
    /// Show the form (empty, or with errors)
    Form(FormState),
    /// Registration succeeded
    Redirect { location: String },
}

/// Show the registration form or process a submission
///
/// # Errors
///
/// Returns the sink's error for anything other than a taken name, which is
/// reported on the form instead.
pub fn register(
    request: &Request,
    config: &RegisterConfig,
    users: &mut dyn UserSink,
) -> Result<RegisterOutcome, Error> {
    if !request.post.contains_key("register") {
        return Ok(RegisterOutcome::Form(FormState::default()));
    }

    let mut form = validate(request);
    if !form.is_valid() {
        form.message = Some(SUBMISSION_PROBLEM.to_string());
        return Ok(RegisterOutcome::Form(form));
    }

    let user = new_user(&form.values, config);
    tracing::debug!(request = %request.id, user = %user.name, "Registration accepted");
    match users.add_user(user) {
        Ok(()) => Ok(RegisterOutcome::Redirect {
            location: request.application_url.clone(),
        }),
        Err(PrincipalError::AlreadyExists { name }) => {
            form.errors.insert(
                "name".to_string(),
                format!("A user with that name already exists: {name}"),
            );
            form.message = Some(SUBMISSION_PROBLEM.to_string());
            Ok(RegisterOutcome::Form(form))
        }
        Err(err) => Err(err.into()),
    }
}

fn validate(request: &Request) -> FormState {
    let mut form = FormState::default();
    for (field, _) in FIELDS {
        let value = request.post.get(field).map_or("", |v| v.trim());
        form.values.insert(field.to_string(), value.to_string());
        if value.is_empty() {
            form.errors.insert(field.to_string(), "Required".to_string());
        }
    }

    if let Some(name) = form.values.get("name").filter(|name| !name.is_empty()) {
        if !valid_name(name) {
            form.errors.insert(
                "name".to_string(),
                "Use lowercase letters, digits, '-', '_' or '.'".to_string(),
            );
        }
    }
    if let Some(email) = form.values.get("email").filter(|email| !email.is_empty()) {
        if !valid_email(email) {
            form.errors
                .insert("email".to_string(), "Invalid email address".to_string());
        }
    }
    form
}

fn new_user(values: &BTreeMap<String, String>, config: &RegisterConfig) -> NewUser {
    let value = |field: &str| values.get(field).cloned().unwrap_or_default();
    NewUser {
        name: value("name"),
        title: value("title"),
        email: value("email"),
        groups: config.group.iter().cloned().collect(),
        roles: config.role.iter().map(|role| format!("role:{role}")).collect(),
        send_email: true,
    }
}

fn valid_name(name: &str) -> bool {
    name.chars().all(|c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.')
    })
}

fn valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
