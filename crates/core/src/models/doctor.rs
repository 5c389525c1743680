use serde::{Deserialize, Serialize};

/// Offered when the backend's specialisation list cannot be fetched.
pub const DEFAULT_SPECIALISATIONS: [&str; 6] = [
    "General physician",
    "Gynecologist",
    "Dermatologist",
    "Pediatrician",
    "Neurologist",
    "Gastroenterologist",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub specialisation: String,
    pub phone: Option<String>,
    pub about: Option<String>,
    pub experience: Option<String>,
    pub image_url: Option<String>,
}

impl Doctor {
    pub fn has_specialisation(&self, specialisation: &str) -> bool {
        self.specialisation.eq_ignore_ascii_case(specialisation.trim())
    }
}

/// Other doctors sharing `specialisation`, excluding `current_doctor_id`.
pub fn related_doctors<'a>(
    doctors: &'a [Doctor],
    specialisation: &str,
    current_doctor_id: Option<i64>,
) -> Vec<&'a Doctor> {
    doctors
        .iter()
        .filter(|d| d.has_specialisation(specialisation))
        .filter(|d| Some(d.id) != current_doctor_id)
        .collect()
}
