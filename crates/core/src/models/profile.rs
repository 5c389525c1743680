use serde::{Deserialize, Serialize};

/// The signed-in doctor's own profile. `password` is only sent when changing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub name: String,
    pub email: String,
    pub specialisation: String,
    pub phone: String,
    pub about: String,
    pub experience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl DoctorProfile {
    /// Overwrites the fields that were given, keeping the rest.
    pub fn apply(&mut self, changes: DoctorProfileChanges) {
        let DoctorProfileChanges {
            name,
            email,
            specialisation,
            phone,
            about,
            experience,
            password,
        } = changes;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(specialisation) = specialisation {
            self.specialisation = specialisation;
        }
        if let Some(phone) = phone {
            self.phone = phone;
        }
        if let Some(about) = about {
            self.about = about;
        }
        if let Some(experience) = experience {
            self.experience = experience;
        }
        self.password = password;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub specialisation: Option<String>,
    pub phone: Option<String>,
    pub about: Option<String>,
    pub experience: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Both passwords are needed to change the password; neither otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfileUpdate {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

impl PatientProfileUpdate {
    pub fn validate(&self) -> crate::errors::MeetResult<()> {
        if self.current_password.is_some() != self.new_password.is_some() {
            return Err(crate::errors::MeetError::Validation(
                "Changing the password needs both the current and the new password".into(),
            ));
        }
        Ok(())
    }
}
