pub mod appointment;
pub mod doctor;
pub mod profile;
pub mod session;
pub mod stats;
