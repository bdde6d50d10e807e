//! Per-field rules applied before any write.
//!
//! Text parsers (`parse_age`, `parse_price`, `parse_record_id`) turn raw form
//! input into typed values; the `validate_*` functions check typed input and
//! return the normalized form that the repository layer stores.

use chrono::NaiveDateTime;

use crate::config;
use crate::error::ClinicError;
use crate::models::*;

pub const MIN_AGE: i64 = 0;
pub const MAX_AGE: i64 = 150;

pub fn validate_name(name: &str) -> Result<String, ClinicError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClinicError::validation("Name is required"));
    }
    Ok(name.to_string())
}

pub fn validate_age(age: Option<i64>) -> Result<Option<i64>, ClinicError> {
    match age {
        Some(a) if !(MIN_AGE..=MAX_AGE).contains(&a) => Err(ClinicError::validation(format!(
            "Age must be between {MIN_AGE} and {MAX_AGE}"
        ))),
        other => Ok(other),
    }
}

/// Blank means "no age given".
pub fn parse_age(text: &str) -> Result<Option<i64>, ClinicError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let age = text
        .parse::<i64>()
        .map_err(|_| ClinicError::validation("Age must be a number"))?;
    validate_age(Some(age))
}

/// Dates must be `YYYY-MM-DD HH:MM`, zero-padded, and a real calendar moment.
pub fn validate_visit_date(date: &str) -> Result<String, ClinicError> {
    let date = date.trim();
    if date.is_empty() {
        return Err(ClinicError::validation("Date is required"));
    }
    let invalid = || ClinicError::validation("Date must be in format YYYY-MM-DD HH:MM");
    let parsed =
        NaiveDateTime::parse_from_str(date, config::DATE_TIME_FORMAT).map_err(|_| invalid())?;
    // chrono accepts unpadded fields ("2024-1-5 9:00"); the stored string must be canonical
    if parsed.format(config::DATE_TIME_FORMAT).to_string() != date {
        return Err(invalid());
    }
    Ok(date.to_string())
}

/// `None` (blank) defaults to 0.0.
pub fn validate_price(price: Option<f64>) -> Result<f64, ClinicError> {
    let price = price.unwrap_or(0.0);
    if !price.is_finite() {
        return Err(ClinicError::validation("Price must be a number"));
    }
    if price < 0.0 {
        return Err(ClinicError::validation("Price cannot be negative"));
    }
    Ok(price)
}

pub fn parse_price(text: &str) -> Result<Option<f64>, ClinicError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let price = text
        .parse::<f64>()
        .map_err(|_| ClinicError::validation("Price must be a number"))?;
    validate_price(Some(price)).map(Some)
}

/// Parses an id typed into a form ("Enter ID to load").
pub fn parse_record_id(text: &str) -> Result<i64, ClinicError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ClinicError::validation("ID is required"));
    }
    text.parse::<i64>()
        .map_err(|_| ClinicError::validation("ID must be a number"))
}

pub fn validate_patient(input: &PatientInput) -> Result<PatientFields, ClinicError> {
    let name = validate_name(&input.name)?;
    let age = validate_age(input.age)?;
    let gender = match input.gender.trim() {
        "" => config::DEFAULT_GENDER.to_string(),
        g => g.to_string(),
    };

    Ok(PatientFields {
        name,
        age,
        gender,
        phone: input.phone.trim().to_string(),
        address: input.address.trim().to_string(),
        occupation: input.occupation.trim().to_string(),
        diagnosis: input.diagnosis.trim().to_string(),
        prescription: input.prescription.trim().to_string(),
        doctor: input.doctor.trim().to_string(),
    })
}

/// Field-level visit checks. Patient existence is checked against storage by the caller.
pub fn validate_visit(input: &VisitInput) -> Result<VisitFields, ClinicError> {
    let date = validate_visit_date(&input.date)?;
    let price = validate_price(input.price)?;

    Ok(VisitFields {
        patient_id: input.patient_id,
        date,
        diagnosis: input.diagnosis.trim().to_string(),
        prescription: input.prescription.trim().to_string(),
        doctor: input.doctor.trim().to_string(),
        price,
    })
}

pub fn validate_new_user(user: &NewUser) -> Result<NewUser, ClinicError> {
    let username = user.username.trim();
    let password = user.password.trim();
    let role = user.role.trim();

    if username.is_empty() || password.is_empty() {
        return Err(ClinicError::validation("Username and password are required"));
    }
    if role.is_empty() {
        return Err(ClinicError::validation("Role is required"));
    }

    Ok(NewUser {
        username: username.to_string(),
        password: password.to_string(),
        role: role.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_validation<T: std::fmt::Debug>(result: Result<T, ClinicError>) {
        assert!(
            matches!(result, Err(ClinicError::Validation(_))),
            "expected validation error, got {result:?}"
        );
    }

    #[test]
    fn name_must_not_be_blank() {
        assert_validation(validate_name(""));
        assert_validation(validate_name("   "));
        assert_eq!(validate_name("  Jane Doe ").unwrap(), "Jane Doe");
    }

    #[test]
    fn age_boundaries() {
        assert_validation(validate_age(Some(-1)));
        assert_validation(validate_age(Some(151)));
        assert_eq!(validate_age(Some(0)).unwrap(), Some(0));
        assert_eq!(validate_age(Some(150)).unwrap(), Some(150));
        assert_eq!(validate_age(None).unwrap(), None);
    }

    #[test]
    fn age_text_parsing() {
        assert_eq!(parse_age("").unwrap(), None);
        assert_eq!(parse_age(" 42 ").unwrap(), Some(42));
        assert_validation(parse_age("forty"));
        assert_validation(parse_age("151"));
    }

    #[test]
    fn visit_date_format() {
        assert_eq!(validate_visit_date("2024-01-01 10:00").unwrap(), "2024-01-01 10:00");
        assert_validation(validate_visit_date("2024-13-01 10:00"));
        assert_validation(validate_visit_date("2024-02-30 10:00"));
        assert_validation(validate_visit_date("2024-01-01"));
        assert_validation(validate_visit_date("2024-1-1 10:00"));
        assert_validation(validate_visit_date("01/01/2024 10:00"));
        assert_validation(validate_visit_date(""));
    }

    #[test]
    fn price_defaults_and_bounds() {
        assert_eq!(validate_price(None).unwrap(), 0.0);
        assert_eq!(validate_price(Some(0.0)).unwrap(), 0.0);
        assert_eq!(validate_price(Some(12.5)).unwrap(), 12.5);
        assert_validation(validate_price(Some(-5.0)));
        assert_validation(validate_price(Some(f64::NAN)));
    }

    #[test]
    fn price_text_parsing() {
        assert_eq!(parse_price("").unwrap(), None);
        assert_eq!(parse_price("25.50").unwrap(), Some(25.5));
        assert_validation(parse_price("-5"));
        assert_validation(parse_price("free"));
    }

    #[test]
    fn record_id_parsing() {
        assert_eq!(parse_record_id(" 12 ").unwrap(), 12);
        assert_validation(parse_record_id(""));
        assert_validation(parse_record_id("abc"));
    }

    #[test]
    fn patient_gender_defaults_to_male() {
        let fields = validate_patient(&PatientInput {
            name: "Jane".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(fields.gender, "Male");

        let fields = validate_patient(&PatientInput {
            name: "Jane".into(),
            gender: "Female".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(fields.gender, "Female");
    }

    #[test]
    fn new_user_requires_all_fields() {
        let ok = NewUser {
            username: " nurse ".into(),
            password: "pw".into(),
            role: "Doctor".into(),
        };
        assert_eq!(validate_new_user(&ok).unwrap().username, "nurse");

        assert_validation(validate_new_user(&NewUser { username: "".into(), ..ok.clone() }));
        assert_validation(validate_new_user(&NewUser { password: " ".into(), ..ok.clone() }));
        assert_validation(validate_new_user(&NewUser { role: "".into(), ..ok }));
    }
}
