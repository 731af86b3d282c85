pub mod agenda;
pub mod booking;
pub mod calendar;

pub use agenda::AgendaService;
pub use booking::BookingService;
pub use calendar::CalendarService;

pub(crate) const APPOINTMENTS_SCOPE: &str = "appointments";
pub(crate) const APPOINTMENT_SCOPE: &str = "appointment";
pub(crate) const DAY_OCCUPANCY_SCOPE: &str = "dayOccupancy";
