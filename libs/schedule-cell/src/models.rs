use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use shared_models::refs::{DoctorRef, Duration, NamedRef, PatientRef};

/// One bookable slot on the schedule board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    #[serde(rename = "dateAppointment")]
    pub date_appointment: String,
    #[serde(rename = "startHour")]
    pub start_hour: String,
    #[serde(rename = "endHour")]
    pub end_hour: String,
    #[serde(rename = "isOccuped")]
    pub is_occuped: bool,
    #[serde(rename = "isApproved")]
    pub is_approved: bool,
    pub duration: Duration,
    pub speciality: NamedRef,
    pub doctor: DoctorRef,
    #[serde(default)]
    pub patient: Option<PatientRef>,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

impl Appointment {
    /// Calendar date of the slot. The backend sends a timestamp here; only
    /// the leading `YYYY-MM-DD` is meaningful.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date_appointment.get(..10)?.parse().ok()
    }
}

/// Month-view entry describing how booked one calendar day is. `color` is
/// a backend-suggested tint; day tones derive from the status string, not
/// from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOccupancy {
    #[serde(rename = "calendarDate")]
    pub calendar_date: NaiveDate,
    #[serde(rename = "statusDay")]
    pub status_day: String,
    #[serde(default)]
    pub color: String,
}

impl DayOccupancy {
    pub fn tone(&self) -> DayTone {
        DayTone::from_status(&self.status_day)
    }
}

/// Visual tone of a calendar day, derived from the backend's status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTone {
    /// The month view carries no row for the day.
    Unknown,
    /// `sin_citas`: the day has no appointments at all.
    Empty,
    /// `ocupada`: every slot of the day is taken.
    Full,
    /// Any other status: open slots remain.
    Available,
}

impl DayTone {
    /// Status strings match case-insensitively; unrecognized ones count as
    /// available rather than erroring.
    pub fn from_status(status: &str) -> Self {
        if status.eq_ignore_ascii_case("sin_citas") {
            DayTone::Empty
        } else if status.eq_ignore_ascii_case("ocupada") {
            DayTone::Full
        } else {
            DayTone::Available
        }
    }

    pub fn for_date(days: &[DayOccupancy], date: NaiveDate) -> Self {
        days.iter()
            .find(|day| day.calendar_date == date)
            .map(DayOccupancy::tone)
            .unwrap_or(DayTone::Unknown)
    }
}

/// Query for one page of the schedule board. The whole shape folds into the
/// cache key, so every date + filter + page combination caches on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaQuery {
    pub date: NaiveDate,
    pub speciality_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub occupied: Option<bool>,
    pub limit: u32,
    pub offset: u32,
}

impl AgendaQuery {
    /// Query string axes; the date travels in the path, not here.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(speciality_id) = self.speciality_id {
            query.push(("specialityId", speciality_id.to_string()));
        }
        if let Some(doctor_id) = self.doctor_id {
            query.push(("doctorId", doctor_id.to_string()));
        }
        if let Some(occupied) = self.occupied {
            query.push(("isOccuped", occupied.to_string()));
        }
        query
    }

    pub fn cache_key(&self) -> String {
        let mut parts = vec![self.date.to_string()];
        parts.extend(
            self.to_query()
                .into_iter()
                .map(|(axis, value)| format!("{}={}", axis, value)),
        );
        parts.join("&")
    }
}

/// Batch creation payload. The backend expands it into one appointment per
/// listed date.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentBatchRequest {
    pub dates: Vec<NaiveDate>,
    #[serde(rename = "startHour")]
    pub start_hour: String,
    #[serde(rename = "endHour")]
    pub end_hour: String,
    #[serde(rename = "durationId")]
    pub duration_id: i64,
    #[serde(rename = "doctorId")]
    pub doctor_id: i64,
    #[serde(rename = "specialityId")]
    pub speciality_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentRequest {
    #[serde(rename = "appointmentId")]
    pub appointment_id: i64,
    #[serde(rename = "patientId")]
    pub patient_id: i64,
}

/// Calendar month laid out for a Sunday-first grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
}

impl MonthGrid {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The date for a day number of this month, when the day exists.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next();
        match (self.date(1), next.date(1)) {
            (Some(first), Some(first_of_next)) => {
                first_of_next.signed_duration_since(first).num_days() as u32
            }
            _ => 0,
        }
    }

    /// Blank cells before day 1 when weeks start on Sunday.
    pub fn leading_blanks(&self) -> u32 {
        self.date(1)
            .map(|first| first.weekday().num_days_from_sunday())
            .unwrap_or(0)
    }
}
