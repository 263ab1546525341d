//! Text form state and the conversions from form input to service requests.
//!
//! Forms check what the housing service would reject anyway (missing
//! fields, malformed email, non-numeric preferences) before a request is
//! made, so the user gets the message without a round trip.

use commutenest_core::{ProfileUpdate, RegisterRequest, User};

/// Maximum length for free-text fields
const MAX_TEXT_LENGTH: usize = 120;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for numeric fields
const MAX_NUMBER_LENGTH: usize = 12;

#[derive(Debug)]
pub struct FieldSpec {
    pub label: &'static str,
    /// Masked when rendered
    pub secret: bool,
    pub max_len: usize,
}

const fn text(label: &'static str) -> FieldSpec {
    FieldSpec { label, secret: false, max_len: MAX_TEXT_LENGTH }
}

const fn number(label: &'static str) -> FieldSpec {
    FieldSpec { label, secret: false, max_len: MAX_NUMBER_LENGTH }
}

const fn secret(label: &'static str) -> FieldSpec {
    FieldSpec { label, secret: true, max_len: MAX_PASSWORD_LENGTH }
}

pub static LOGIN_FIELDS: &[FieldSpec] = &[text("Email"), secret("Password")];

pub static REGISTER_FIELDS: &[FieldSpec] = &[
    text("Email"),
    text("Username"),
    secret("Password"),
    text("First name"),
    text("Last name"),
];

pub static PROFILE_FIELDS: &[FieldSpec] = &[
    text("First name"),
    text("Last name"),
    text("Work address"),
    number("Work latitude"),
    number("Work longitude"),
    number("Max commute (min)"),
    number("Budget min ($)"),
    number("Budget max ($)"),
    text("Preferred areas"),
];

// Field positions within the forms above
mod login {
    pub const EMAIL: usize = 0;
    pub const PASSWORD: usize = 1;
}

mod register {
    pub const EMAIL: usize = 0;
    pub const USERNAME: usize = 1;
    pub const PASSWORD: usize = 2;
    pub const FIRST_NAME: usize = 3;
    pub const LAST_NAME: usize = 4;
}

mod profile {
    pub const FIRST_NAME: usize = 0;
    pub const LAST_NAME: usize = 1;
    pub const WORK_ADDRESS: usize = 2;
    pub const WORK_LAT: usize = 3;
    pub const WORK_LNG: usize = 4;
    pub const MAX_COMMUTE: usize = 5;
    pub const BUDGET_MIN: usize = 6;
    pub const BUDGET_MAX: usize = 7;
    pub const PREFERRED_AREAS: usize = 8;
}

/// Editable form made of single-line text fields followed by a submit button.
#[derive(Debug)]
pub struct TextForm {
    specs: &'static [FieldSpec],
    values: Vec<String>,
    /// Focused field index; `specs.len()` is the submit button
    pub focus: usize,
    pub error: Option<String>,
}

impl TextForm {
    pub fn new(specs: &'static [FieldSpec]) -> Self {
        Self {
            specs,
            values: vec![String::new(); specs.len()],
            focus: 0,
            error: None,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&FieldSpec, &str, bool)> {
        self.specs
            .iter()
            .zip(&self.values)
            .enumerate()
            .map(move |(i, (spec, value))| (spec, value.as_str(), i == self.focus))
    }

    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value.into();
        }
    }

    pub fn button_focused(&self) -> bool {
        self.focus == self.specs.len()
    }

    /// Focus the first empty field, or the button when everything is filled
    pub fn focus_first_empty(&mut self) {
        self.focus = self
            .values
            .iter()
            .position(|v| v.is_empty())
            .unwrap_or(self.specs.len());
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % (self.specs.len() + 1);
    }

    pub fn prev_field(&mut self) {
        self.focus = if self.focus == 0 {
            self.specs.len()
        } else {
            self.focus - 1
        };
    }

    /// Append a character to the focused field. Returns false when rejected.
    pub fn push_char(&mut self, c: char) -> bool {
        let Some(spec) = self.specs.get(self.focus) else {
            return false;
        };
        let value = &mut self.values[self.focus];
        if can_add_char(value.chars().count(), spec.max_len, c) {
            value.push(c);
            true
        } else {
            false
        }
    }

    pub fn backspace(&mut self) {
        if let Some(value) = self.values.get_mut(self.focus) {
            value.pop();
        }
    }

    /// Wipe masked fields (passwords)
    pub fn clear_secrets(&mut self) {
        for (spec, value) in self.specs.iter().zip(self.values.iter_mut()) {
            if spec.secret {
                value.clear();
            }
        }
    }

    pub fn reset(&mut self) {
        for value in &mut self.values {
            value.clear();
        }
        self.focus = 0;
        self.error = None;
    }
}

/// Check if a character is valid for text input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character should be accepted into a field of `max_len`
pub fn can_add_char(current_len: usize, max_len: usize, c: char) -> bool {
    current_len < max_len && is_valid_input_char(c)
}

/// Email shape accepted by the housing service: `local@domain.tld`
/// with a TLD of at least two letters.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c));
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    local_ok && host_ok && tld_ok
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Email and password from the login form.
pub fn login_credentials(form: &TextForm) -> Result<(String, String), String> {
    let email = form.value(login::EMAIL).trim();
    let password = form.value(login::PASSWORD);

    if email.is_empty() || password.is_empty() {
        return Err("Email and password are required".to_string());
    }
    Ok((email.to_string(), password.to_string()))
}

pub fn prefill_login_email(form: &mut TextForm, email: &str) {
    form.set(login::EMAIL, email);
}

/// Registration request from the sign-up form.
pub fn registration_request(form: &TextForm) -> Result<RegisterRequest, String> {
    let email = form.value(register::EMAIL).trim();
    let username = form.value(register::USERNAME).trim();
    let password = form.value(register::PASSWORD);

    for (value, name) in [(email, "email"), (username, "username"), (password, "password")] {
        if value.is_empty() {
            return Err(format!("{} is required", name));
        }
    }
    if !is_valid_email(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(RegisterRequest {
        email: email.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        first_name: optional(form.value(register::FIRST_NAME)),
        last_name: optional(form.value(register::LAST_NAME)),
    })
}

/// Profile form filled in from the user's current values.
pub fn profile_form(user: &User) -> TextForm {
    fn show<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    let mut form = TextForm::new(PROFILE_FIELDS);
    form.set(profile::FIRST_NAME, show(user.first_name.as_deref()));
    form.set(profile::LAST_NAME, show(user.last_name.as_deref()));
    form.set(profile::WORK_ADDRESS, show(user.work_address.as_deref()));
    form.set(profile::WORK_LAT, show(user.work_lat));
    form.set(profile::WORK_LNG, show(user.work_lng));
    form.set(profile::MAX_COMMUTE, show(user.max_commute_time));
    form.set(profile::BUDGET_MIN, show(user.budget_min));
    form.set(profile::BUDGET_MAX, show(user.budget_max));
    form.set(
        profile::PREFERRED_AREAS,
        user.preferred_areas
            .as_ref()
            .map(|areas| areas.join(", "))
            .unwrap_or_default(),
    );
    form
}

fn parse_number<T: std::str::FromStr>(value: &str, label: &str) -> Result<Option<T>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| format!("{} must be a number", label))
}

fn parse_coordinate(value: &str, label: &str, limit: f64) -> Result<Option<f64>, String> {
    match parse_number::<f64>(value, label)? {
        Some(v) if !v.is_finite() || v.abs() > limit => {
            Err(format!("{} must be between -{} and {}", label, limit, limit))
        }
        other => Ok(other),
    }
}

/// Keep `new` only if it differs from `current`.
fn changed<T: PartialEq>(new: Option<T>, current: &Option<T>) -> Option<T> {
    match new {
        Some(v) if current.as_ref() != Some(&v) => Some(v),
        _ => None,
    }
}

/// Partial update holding only the fields the user changed.
///
/// A blank field means "leave as is"; the service has no way to clear a
/// preference through a partial update.
pub fn profile_update(form: &TextForm, user: &User) -> Result<ProfileUpdate, String> {
    let work_lat = parse_coordinate(form.value(profile::WORK_LAT), "Work latitude", 90.0)?;
    let work_lng = parse_coordinate(form.value(profile::WORK_LNG), "Work longitude", 180.0)?;
    let max_commute_time = parse_number::<u32>(form.value(profile::MAX_COMMUTE), "Max commute")?;
    let budget_min = parse_number::<u32>(form.value(profile::BUDGET_MIN), "Budget min")?;
    let budget_max = parse_number::<u32>(form.value(profile::BUDGET_MAX), "Budget max")?;

    if let (Some(min), Some(max)) = (budget_min.or(user.budget_min), budget_max.or(user.budget_max)) {
        if min > max {
            return Err("Budget min cannot exceed budget max".to_string());
        }
    }

    let preferred_areas = optional(form.value(profile::PREFERRED_AREAS)).map(|areas| {
        areas
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>()
    });

    Ok(ProfileUpdate {
        first_name: changed(optional(form.value(profile::FIRST_NAME)), &user.first_name),
        last_name: changed(optional(form.value(profile::LAST_NAME)), &user.last_name),
        work_address: changed(optional(form.value(profile::WORK_ADDRESS)), &user.work_address),
        work_lat: changed(work_lat, &user.work_lat),
        work_lng: changed(work_lng, &user.work_lng),
        max_commute_time: changed(max_commute_time, &user.max_commute_time),
        budget_min: changed(budget_min, &user.budget_min),
        budget_max: changed(budget_max, &user.budget_max),
        preferred_areas: changed(preferred_areas, &user.preferred_areas),
    })
}
