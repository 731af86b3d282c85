use std::sync::Arc;

use chrono::NaiveDate;
use regex::Regex;
use tracing::info;

use registry_cell::LookupService;
use shared_gateway::ApiGateway;
use shared_models::error::ApiError;
use shared_models::params::ListParams;
use shared_models::refs::{DoctorRef, Duration};
use shared_query::QueryCache;
use speciality_cell::{Speciality, SpecialityService};

use crate::models::AppointmentBatchRequest;
use crate::services::BookingService;

/// Wall-clock hour as the operator types it, `H:mm` or `HH:mm`.
const HOUR_FORMAT: &str = r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$";

/// Field a validation issue belongs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Speciality,
    Doctor,
    Dates,
    StartHour,
    EndHour,
    Duration,
}

/// One local validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormIssue {
    pub field: FormField,
    pub message: &'static str,
}

/// Every date from `from` through `to`, inclusive. A reversed range expands
/// to nothing.
pub fn expand_range(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = from;
    while current <= to {
        dates.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

/// State machine behind the batch creation form. Collects the slot template
/// (speciality, doctor, hour window, duration) and the date range it repeats
/// over, validates everything locally, and submits one request; the backend
/// expands it into one appointment per date.
pub struct ScheduleForm {
    booking: BookingService,
    specialities: SpecialityService,
    lookups: LookupService,
    today: NaiveDate,
    speciality_id: Option<i64>,
    doctor_id: Option<i64>,
    range_start: NaiveDate,
    range_end: Option<NaiveDate>,
    dates: Vec<NaiveDate>,
    start_hour: String,
    end_hour: String,
    duration_id: Option<i64>,
    submitting: bool,
    hour_format: Regex,
}

impl ScheduleForm {
    pub fn new(gateway: Arc<ApiGateway>, cache: Arc<QueryCache>, today: NaiveDate) -> Self {
        Self {
            booking: BookingService::new(gateway.clone(), cache.clone()),
            specialities: SpecialityService::new(gateway.clone(), cache.clone()),
            lookups: LookupService::new(gateway, cache),
            today,
            speciality_id: None,
            doctor_id: None,
            range_start: today,
            range_end: None,
            dates: expand_range(today, today),
            start_hour: String::new(),
            end_hour: String::new(),
            duration_id: None,
            submitting: false,
            hour_format: Regex::new(HOUR_FORMAT).unwrap(),
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn range(&self) -> (NaiveDate, Option<NaiveDate>) {
        (self.range_start, self.range_end)
    }

    pub fn speciality_id(&self) -> Option<i64> {
        self.speciality_id
    }

    pub fn doctor_id(&self) -> Option<i64> {
        self.doctor_id
    }

    pub fn duration_id(&self) -> Option<i64> {
        self.duration_id
    }

    pub fn start_hour(&self) -> &str {
        &self.start_hour
    }

    pub fn end_hour(&self) -> &str {
        &self.end_hour
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Replaces the date range. An open range covers the single start day.
    pub fn set_range(&mut self, from: NaiveDate, to: Option<NaiveDate>) {
        self.range_start = from;
        self.range_end = to;
        self.dates = expand_range(from, to.unwrap_or(from));
    }

    /// Picking a speciality resets the doctor; the roster the doctor came
    /// from no longer applies.
    pub fn set_speciality(&mut self, speciality_id: Option<i64>) {
        self.speciality_id = speciality_id;
        if speciality_id.is_some() {
            self.doctor_id = None;
        }
    }

    /// Refused until a speciality is chosen.
    pub fn set_doctor(&mut self, doctor_id: Option<i64>) -> bool {
        if self.speciality_id.is_none() {
            return false;
        }
        self.doctor_id = doctor_id;
        true
    }

    pub fn set_start_hour(&mut self, hour: impl Into<String>) {
        self.start_hour = hour.into();
    }

    pub fn set_end_hour(&mut self, hour: impl Into<String>) {
        self.end_hour = hour.into();
    }

    pub fn set_duration(&mut self, duration_id: Option<i64>) {
        self.duration_id = duration_id;
    }

    /// Only active specialities are offered for new schedules.
    pub async fn speciality_options(&self) -> Result<Vec<Speciality>, ApiError> {
        self.specialities
            .list(&ListParams::all().with_status(true))
            .await
    }

    pub async fn doctor_options(&self) -> Result<Vec<DoctorRef>, ApiError> {
        match self.speciality_id {
            Some(speciality_id) => self.specialities.doctors_by_speciality(speciality_id).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn duration_options(&self) -> Result<Vec<Duration>, ApiError> {
        self.lookups.durations().await
    }

    /// Checks every field locally. The hour-window rule runs last and only
    /// once every field stands on its own, so its message never drowns out
    /// a plain format error.
    pub fn validate(&self) -> Vec<FormIssue> {
        let mut issues = Vec::new();

        match self.speciality_id {
            None => issues.push(FormIssue {
                field: FormField::Speciality,
                message: "La especialidad es obligatoria",
            }),
            Some(id) if id <= 0 => issues.push(FormIssue {
                field: FormField::Speciality,
                message: "La especialidad no es válida",
            }),
            Some(_) => {}
        }

        match self.doctor_id {
            None => issues.push(FormIssue {
                field: FormField::Doctor,
                message: "El doctor es obligatorio",
            }),
            Some(id) if id <= 0 => issues.push(FormIssue {
                field: FormField::Doctor,
                message: "El doctor no es válido",
            }),
            Some(_) => {}
        }

        if self.dates.is_empty() {
            issues.push(FormIssue {
                field: FormField::Dates,
                message: "Debes seleccionar al menos una fecha",
            });
        }

        if let Some(issue) =
            self.hour_issue(FormField::StartHour, &self.start_hour, "La hora de inicio es obligatoria")
        {
            issues.push(issue);
        }
        if let Some(issue) =
            self.hour_issue(FormField::EndHour, &self.end_hour, "La hora de fin es obligatoria")
        {
            issues.push(issue);
        }

        match self.duration_id {
            None => issues.push(FormIssue {
                field: FormField::Duration,
                message: "La duración de la consulta es obligatoria",
            }),
            Some(id) if id <= 0 => issues.push(FormIssue {
                field: FormField::Duration,
                message: "La duración no es válida",
            }),
            Some(_) => {}
        }

        // Plain text ordering, `09:00 < 10:00` but also `9:00 > 10:00`; the
        // window rule inherits the format's zero-padding expectations.
        if issues.is_empty() && self.start_hour >= self.end_hour {
            issues.push(FormIssue {
                field: FormField::EndHour,
                message: "La hora de fin debe ser posterior a la hora de inicio",
            });
        }

        issues
    }

    fn hour_issue(
        &self,
        field: FormField,
        value: &str,
        required_message: &'static str,
    ) -> Option<FormIssue> {
        if value.is_empty() {
            Some(FormIssue {
                field,
                message: required_message,
            })
        } else if !self.hour_format.is_match(value) {
            Some(FormIssue {
                field,
                message: "Formato de hora inválido (HH:mm)",
            })
        } else {
            None
        }
    }

    /// Validates, submits, and returns how many appointments the batch
    /// covers. Success returns the form to its pristine state; failure
    /// keeps every entry for a retry.
    pub async fn submit(&mut self) -> Result<usize, ApiError> {
        if !self.validate().is_empty() {
            return Err(ApiError::InvalidRequest(
                "Por favor complete todos los campos requeridos".to_string(),
            ));
        }
        let (speciality_id, doctor_id, duration_id) =
            match (self.speciality_id, self.doctor_id, self.duration_id) {
                (Some(speciality_id), Some(doctor_id), Some(duration_id)) => {
                    (speciality_id, doctor_id, duration_id)
                }
                _ => {
                    return Err(ApiError::InvalidRequest(
                        "Por favor complete todos los campos requeridos".to_string(),
                    ))
                }
            };

        let request = AppointmentBatchRequest {
            dates: self.dates.clone(),
            start_hour: self.start_hour.clone(),
            end_hour: self.end_hour.clone(),
            duration_id,
            doctor_id,
            speciality_id,
        };

        self.submitting = true;
        let result = self.booking.create_batch(&request).await;
        self.submitting = false;
        result?;

        let created = request.dates.len();
        info!(created, "schedule batch submitted");
        self.reset();
        Ok(created)
    }

    /// Back to the pristine state: selections clear and the range collapses
    /// onto today.
    fn reset(&mut self) {
        self.speciality_id = None;
        self.doctor_id = None;
        self.start_hour.clear();
        self.end_hour.clear();
        self.duration_id = None;
        self.range_start = self.today;
        self.range_end = None;
        self.dates = expand_range(self.today, self.today);
    }
}
