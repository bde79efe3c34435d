use crate::{
    error::ValidationErrors,
    models::trip::{NewTrip, TripDraft},
};

pub const LOAD_LOCATION: &str = "loadLocation";
pub const UNLOAD_LOCATION: &str = "unloadLocation";
pub const DATE: &str = "date";

/// Checks every required trip field and reports each one that is missing.
pub fn validate_trip(draft: &TripDraft) -> Result<NewTrip, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if draft.load_location.is_empty() {
        errors.add(LOAD_LOCATION, "load location required");
    }
    if draft.unload_location.is_empty() {
        errors.add(UNLOAD_LOCATION, "unload location required");
    }
    let Some(date) = draft.date else {
        errors.add(DATE, "date required");
        return Err(errors);
    };

    errors.into_result(NewTrip {
        load_location: draft.load_location.clone(),
        unload_location: draft.unload_location.clone(),
        date,
    })
}

/// Checks the sign-in form: all fields filled in and a plausible email address.
pub fn validate_login(name: &str, email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if name.trim().is_empty() {
        errors.add("name", "name required");
    }
    if email.trim().is_empty() {
        errors.add("email", "email required");
    } else if !is_valid_email(email) {
        errors.add("email", "email invalid");
    }
    if password.trim().is_empty() {
        errors.add("password", "password required");
    }

    errors.into_result(())
}

/// `local@domain.tld`: no whitespace, one `@`, and some dot in the domain with text on both sides.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .match_indices('.')
        .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
}
