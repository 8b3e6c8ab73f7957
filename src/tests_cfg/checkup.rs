use crate::error::BuoyError;
use crate::model::Entity;
use crate::schema::{ColumnDescriptor, TableBuilder};
use crate::value::Value;
use chrono::NaiveDateTime;

crate::column_enum! {
    /// Kind of checkup, stored by name
    #[allow(clippy::upper_case_acronyms, non_camel_case_types)]
    pub enum CheckupKind {
        GP, BLOOD, X_RAY, CT, MRI, ULTRA, EKG, ECHO, EYE, DERM, DENTA, MAMMO, EEG
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkup {
    pub id: i32,
    pub patient_id: i32,
    pub date: NaiveDateTime,
    pub notes: String,
    pub kind: CheckupKind,
}

impl Entity for Checkup {
    fn declare() -> TableBuilder {
        TableBuilder::new()
            .table("checkups")
            .column(ColumnDescriptor::of::<i32>("id").primary_key())
            .column(ColumnDescriptor::of::<i32>("patient_id"))
            .column(ColumnDescriptor::of::<NaiveDateTime>("checkup_date"))
            .column(ColumnDescriptor::of::<String>("doctor_notes"))
            .column(ColumnDescriptor::of::<CheckupKind>("checkup_type").default_value("'GP'"))
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "patient_id" => Some(self.patient_id.into()),
            "checkup_date" => Some(self.date.into()),
            "doctor_notes" => Some(self.notes.clone().into()),
            "checkup_type" => Some(crate::ValueType::into_value(self.kind)),
            _ => None,
        }
    }

    fn set(&mut self, column: &str, value: Value) -> Result<(), BuoyError> {
        match column {
            "id" => self.id = value.decode()?,
            "patient_id" => self.patient_id = value.decode()?,
            "checkup_date" => self.date = value.decode()?,
            "doctor_notes" => self.notes = value.decode()?,
            "checkup_type" => self.kind = value.decode()?,
            _ => return Err(BuoyError::unknown_column("checkups", column)),
        }
        Ok(())
    }
}
