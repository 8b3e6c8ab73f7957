//! Clinic fixture entities used by unit tests, integration tests and docs.
//! Compiled under the `test-helpers` feature.
//!
//! A `Patient` owns `Checkup`s and `Prescription`s through a `patient_id`
//! foreign key on each child table.

mod checkup;
mod patient;
mod prescription;

pub use checkup::{Checkup, CheckupKind};
pub use patient::Patient;
pub use prescription::Prescription;
