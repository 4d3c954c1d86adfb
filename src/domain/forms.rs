use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Accumulated validation failures, one entry per offending field, so a form
/// can highlight every invalid field at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Ok when no field failed.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

const MIN_PASSWORD_LEN: usize = 8;

/// Minimal email grammar: one `@`, non-empty local part, domain with a dot
/// and no leading/trailing dot.
fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    !local.contains(char::is_whitespace) && !domain.contains(char::is_whitespace)
}

fn require(errors: &mut FieldErrors, field: &'static str, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.push(field, format!("{label} is required"));
    }
}

/// Account sign-up submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignUpForm {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub terms_accepted: bool,
}

impl SignUpForm {
    /// Pure validation; the caller owns persistence.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.full_name.trim().len() < 2 {
            errors.push("full_name", "Full name must be at least 2 characters");
        }
        if self.username.trim().len() < 2 {
            errors.push("username", "Username must be at least 2 characters");
        }
        if !is_valid_email(&self.email) {
            errors.push("email", "Please enter a valid email address");
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            errors.push(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if self.confirm_password != self.password {
            errors.push("confirm_password", "Passwords don't match");
        }
        if !self.terms_accepted {
            errors.push("terms_accepted", "You must accept the terms and conditions");
        }
        errors.into_result()
    }
}

/// Shop registration / edit submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopForm {
    pub name: String,
    pub industry: String,
    pub shop_number: String,
    pub city: String,
    pub mall: String,
    pub whatsapp: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
}

impl ShopForm {
    /// Pure validation; every failing field reports independently.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "Shop name");
        require(&mut errors, "industry", &self.industry, "Industry");
        require(&mut errors, "shop_number", &self.shop_number, "Shop number");
        require(&mut errors, "city", &self.city, "City");
        require(&mut errors, "mall", &self.mall, "Mall");
        require(&mut errors, "whatsapp", &self.whatsapp, "WhatsApp number");
        if let Some(email) = &self.email
            && !email.trim().is_empty()
            && !is_valid_email(email)
        {
            errors.push("email", "Please enter a valid email address");
        }
        errors.into_result()
    }
}
