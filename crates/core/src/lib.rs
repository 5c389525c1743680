//! # MediMeet Core
//!
//! Client-side booking logic for the MediMeet appointment service: the month
//! calendar and time-slot table used to pick a slot, the booking form that
//! turns a selection into a request, and the accept/reject/cancel workflow
//! doctors and patients drive from their appointment lists.
//!
//! All backend access goes through the [`gateway::ApiGateway`] trait, so every
//! controller here can be exercised against `MockApiGateway` without a network.

/// Booking form controller
pub mod booking;
/// Month grid generation for the date picker
pub mod calendar;
/// Error taxonomy shared by all crates
pub mod errors;
/// The Remote API Gateway seam
pub mod gateway;
/// Domain types
pub mod models;
/// Explicit signed-in session context
pub mod session;
/// Fixed half-hour slots and 12-hour display formatting
pub mod time_slot;
/// Appointment status transitions and the appointment board
pub mod workflow;
