use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use patient_cell::{Patient, PatientService};
use shared_config::AppConfig;
use shared_gateway::ApiGateway;
use shared_models::error::ApiError;
use shared_models::params::ListParams;
use shared_models::refs::DoctorRef;
use shared_query::QueryCache;
use speciality_cell::{Speciality, SpecialityService};

use crate::models::{AgendaQuery, Appointment, AssignmentRequest, DayOccupancy, DayTone, MonthGrid};
use crate::services::{AgendaService, BookingService, CalendarService};

/// Active filter axes of the board. A `None` axis is off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardFilters {
    pub speciality_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub occupied: Option<bool>,
}

/// One loaded page of the selected day's agenda.
#[derive(Debug, Clone)]
pub struct AgendaPage {
    pub rows: Vec<Appointment>,
    pub page: u32,
    pub can_advance: bool,
}

/// In-progress patient assignment for one open slot.
#[derive(Debug, Clone)]
pub struct AssignmentDraft {
    pub appointment: Appointment,
    pub search: String,
    pub selected_patient: Option<Patient>,
}

/// State machine behind the schedule board: a month calendar, one selected
/// day, the filter cascade, the paged agenda of that day, and at most one
/// assignment dialog at a time.
///
/// The board never talks to the backend on a state change. Reads happen when
/// the caller asks for data, through the cache, so flipping a filter twice
/// costs nothing.
pub struct ScheduleBoard {
    agenda: AgendaService,
    calendar: CalendarService,
    booking: BookingService,
    specialities: SpecialityService,
    patients: PatientService,
    page_size: u32,
    patient_search_limit: u32,
    grid: MonthGrid,
    selected_date: NaiveDate,
    filters: BoardFilters,
    page: u32,
    can_advance: bool,
    draft: Option<AssignmentDraft>,
}

impl ScheduleBoard {
    pub fn new(
        gateway: Arc<ApiGateway>,
        cache: Arc<QueryCache>,
        config: &AppConfig,
        today: NaiveDate,
    ) -> Self {
        Self {
            agenda: AgendaService::new(gateway.clone(), cache.clone()),
            calendar: CalendarService::new(gateway.clone(), cache.clone()),
            booking: BookingService::new(gateway.clone(), cache.clone()),
            specialities: SpecialityService::new(gateway.clone(), cache.clone()),
            patients: PatientService::new(gateway, cache),
            page_size: config.schedule_page_size,
            patient_search_limit: config.patient_search_limit,
            grid: MonthGrid::containing(today),
            selected_date: today,
            filters: BoardFilters::default(),
            page: 1,
            can_advance: false,
            draft: None,
        }
    }

    pub fn month(&self) -> MonthGrid {
        self.grid
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn filters(&self) -> BoardFilters {
        self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn can_advance(&self) -> bool {
        self.can_advance
    }

    /// Shows the previous month in the calendar. The selected day stays
    /// where it was, even when it falls outside the shown month.
    pub fn previous_month(&mut self) {
        self.grid = self.grid.previous();
    }

    pub fn next_month(&mut self) {
        self.grid = self.grid.next();
    }

    /// Selects a day of the shown month. The page deliberately stays put;
    /// clearing filters is the only way the board rewinds to page one.
    pub fn select_day(&mut self, day: u32) -> bool {
        match self.grid.date(day) {
            Some(date) => {
                self.selected_date = date;
                self.can_advance = false;
                true
            }
            None => false,
        }
    }

    /// Changing the speciality always resets the doctor filter, whichever
    /// direction the change goes. The roster the doctor came from is gone.
    pub fn set_speciality(&mut self, speciality_id: Option<i64>) {
        self.filters.speciality_id = speciality_id;
        self.filters.doctor_id = None;
        self.can_advance = false;
    }

    /// Refused while no speciality is active; the doctor axis only narrows
    /// an already chosen roster.
    pub fn set_doctor(&mut self, doctor_id: Option<i64>) -> bool {
        if self.filters.speciality_id.is_none() {
            return false;
        }
        self.filters.doctor_id = doctor_id;
        self.can_advance = false;
        true
    }

    pub fn set_occupancy(&mut self, occupied: Option<bool>) {
        self.filters.occupied = occupied;
        self.can_advance = false;
    }

    /// Drops every filter axis and rewinds to page one. The selected date
    /// and the shown month survive.
    pub fn clear_filters(&mut self) {
        self.filters = BoardFilters::default();
        self.page = 1;
        self.can_advance = false;
    }

    /// Moves to the next page when the last loaded page was full. A short
    /// page means the backend has nothing further.
    pub fn next_page(&mut self) -> bool {
        if !self.can_advance {
            return false;
        }
        self.page += 1;
        self.can_advance = false;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        self.can_advance = false;
        true
    }

    /// Occupancy rows for the shown month.
    pub async fn month_days(&self) -> Result<Vec<DayOccupancy>, ApiError> {
        self.calendar.month_occupancy(self.grid).await
    }

    /// Tone of one day cell of the shown month.
    pub fn day_tone(&self, days: &[DayOccupancy], day: u32) -> DayTone {
        match self.grid.date(day) {
            Some(date) => DayTone::for_date(days, date),
            None => DayTone::Unknown,
        }
    }

    /// Loads the agenda page the current state points at and remembers
    /// whether a further page may exist.
    pub async fn load_page(&mut self) -> Result<AgendaPage, ApiError> {
        let query = AgendaQuery {
            date: self.selected_date,
            speciality_id: self.filters.speciality_id,
            doctor_id: self.filters.doctor_id,
            occupied: self.filters.occupied,
            limit: self.page_size,
            offset: (self.page - 1) * self.page_size,
        };
        let rows = self.agenda.for_day(&query).await?;
        self.can_advance = rows.len() as u32 == self.page_size;
        Ok(AgendaPage {
            rows,
            page: self.page,
            can_advance: self.can_advance,
        })
    }

    pub async fn speciality_options(&self) -> Result<Vec<Speciality>, ApiError> {
        self.specialities.list(&ListParams::all()).await
    }

    /// Doctors for the doctor filter. Empty until a speciality narrows the
    /// roster.
    pub async fn doctor_options(&self) -> Result<Vec<DoctorRef>, ApiError> {
        match self.filters.speciality_id {
            Some(speciality_id) => self.specialities.doctors_by_speciality(speciality_id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Opens the assignment dialog for a slot. Occupied slots refuse.
    pub fn open_assignment(&mut self, appointment: Appointment) -> Result<(), ApiError> {
        if appointment.is_occuped {
            return Err(ApiError::InvalidRequest(
                "La cita ya está ocupada".to_string(),
            ));
        }
        debug!(appointment = appointment.id, "assignment dialog opened");
        self.draft = Some(AssignmentDraft {
            appointment,
            search: String::new(),
            selected_patient: None,
        });
        Ok(())
    }

    pub fn assignment(&self) -> Option<&AssignmentDraft> {
        self.draft.as_ref()
    }

    pub fn cancel_assignment(&mut self) {
        self.draft = None;
    }

    /// Updates the dialog's search text and returns the matching patients,
    /// capped at the configured limit. An empty text lists the first
    /// patients unfiltered.
    pub async fn search_patients(&mut self, search: &str) -> Result<Vec<Patient>, ApiError> {
        let draft = self
            .draft
            .as_mut()
            .ok_or_else(|| ApiError::InvalidRequest("no assignment in progress".to_string()))?;
        draft.search = search.to_string();

        let mut params = ListParams::limited(self.patient_search_limit);
        if !search.is_empty() {
            params = params.with_search(search);
        }
        self.patients.list(&params).await
    }

    /// Picks the patient to book. Picking again replaces the earlier choice.
    pub fn select_patient(&mut self, patient: Patient) -> bool {
        match self.draft.as_mut() {
            Some(draft) => {
                draft.selected_patient = Some(patient);
                true
            }
            None => false,
        }
    }

    /// Books the selected patient into the dialog's slot. Success closes the
    /// dialog; failure leaves it open with the choice intact, so the
    /// operator can retry.
    pub async fn submit_assignment(&mut self) -> Result<(), ApiError> {
        let draft = self
            .draft
            .as_ref()
            .ok_or_else(|| ApiError::InvalidRequest("no assignment in progress".to_string()))?;
        let patient = draft.selected_patient.as_ref().ok_or_else(|| {
            ApiError::InvalidRequest("Debe seleccionar un paciente".to_string())
        })?;

        let request = AssignmentRequest {
            appointment_id: draft.appointment.id,
            patient_id: patient.id,
        };
        self.booking.assign(&request).await?;
        self.draft = None;
        Ok(())
    }
}
