use chrono::Local;
use serde::Deserialize;

use crate::config;
use crate::core_state::CoreState;
use crate::error::ClinicError;
use crate::models::*;
use crate::validation;
use crate::visits;

use super::{signed_in_conn, to_message};

/// Visit form as typed. Price is free text; blank means 0.00.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitForm {
    /// `None` when nothing is picked in the patient selector.
    pub patient_id: Option<i64>,
    pub date: String,
    pub diagnosis: String,
    pub prescription: String,
    pub doctor: String,
    pub price: String,
}

impl VisitForm {
    fn to_input(&self) -> Result<VisitInput, ClinicError> {
        Ok(VisitInput {
            // 0 never matches a row, so an empty selector reads as "Select a valid patient"
            patient_id: self.patient_id.unwrap_or(0),
            date: self.date.clone(),
            diagnosis: self.diagnosis.clone(),
            prescription: self.prescription.clone(),
            doctor: self.doctor.clone(),
            price: validation::parse_price(&self.price)?,
        })
    }
}

/// Current local time in the visit date format, used to prefill a new visit.
pub fn default_visit_date() -> String {
    Local::now().format(config::DATE_TIME_FORMAT).to_string()
}

pub fn add_visit(state: &CoreState, form: &VisitForm) -> Result<i64, String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    let input = form.to_input().map_err(to_message)?;
    visits::add_visit(&conn, &input).map_err(to_message)
}

pub fn get_visit(state: &CoreState, id: i64) -> Result<Visit, String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    visits::get_visit(&conn, id).map_err(to_message)
}

pub fn update_visit(state: &CoreState, id: i64, form: &VisitForm) -> Result<(), String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    let input = form.to_input().map_err(to_message)?;
    visits::update_visit(&conn, id, &input).map_err(to_message)
}

pub fn delete_visit(state: &CoreState, id: i64) -> Result<(), String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    visits::delete_visit(&conn, id).map_err(to_message)
}

/// All visits, or one patient's when `patient_id` is set.
pub fn list_visits(state: &CoreState, patient_id: Option<i64>) -> Result<Vec<VisitListing>, String> {
    let conn = signed_in_conn(state).map_err(to_message)?;
    visits::list_visits(&conn, patient_id).map_err(to_message)
}
