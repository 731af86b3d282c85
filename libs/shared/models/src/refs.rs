//! Small wire shapes the backend embeds inside larger entities.

use serde::{Deserialize, Serialize};

/// Generic id + name pair (document types, genders, specialities as embedded
/// references, ...). `code` tags the few catalogs that carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Embedded doctor reference. Doctors spell their surname `lastName` on the
/// wire; patients spell theirs `lastname`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRef {
    pub id: i64,
    pub name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

impl DoctorRef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

/// Embedded patient reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: i64,
    pub name: String,
    pub lastname: String,
}

impl PatientRef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.lastname)
    }
}

/// Consultation duration, both a standalone catalog row and an embedded
/// reference on appointments. The interval arrives as `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    pub id: i64,
    pub interval: String,
}

impl Duration {
    /// The minutes component of the interval, the figure selectors show.
    pub fn minutes(&self) -> Option<u32> {
        self.interval.split(':').nth(1)?.parse().ok()
    }

    pub fn label(&self) -> String {
        match self.minutes() {
            Some(minutes) => format!("{} min", minutes),
            None => self.interval.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_minutes_component() {
        let half_hour = Duration {
            id: 2,
            interval: "00:30:00".to_string(),
        };
        assert_eq!(half_hour.minutes(), Some(30));
        assert_eq!(half_hour.label(), "30 min");

        let malformed = Duration {
            id: 9,
            interval: "soon".to_string(),
        };
        assert_eq!(malformed.minutes(), None);
        assert_eq!(malformed.label(), "soon");
    }

    #[test]
    fn test_surname_spellings_stay_distinct() {
        let doctor: DoctorRef =
            serde_json::from_value(serde_json::json!({"id": 1, "name": "Elena", "lastName": "Vargas"}))
                .expect("doctor ref should decode");
        assert_eq!(doctor.full_name(), "Elena Vargas");

        let patient: PatientRef =
            serde_json::from_value(serde_json::json!({"id": 4, "name": "Ana", "lastname": "Ruiz"}))
                .expect("patient ref should decode");
        assert_eq!(patient.full_name(), "Ana Ruiz");
    }
}
