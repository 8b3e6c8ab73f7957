use crate::error::BuoyError;
use crate::model::Entity;
use crate::schema::{ColumnDescriptor, TableBuilder};
use crate::value::Value;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prescription {
    pub id: i32,
    pub patient_id: i32,
    pub start_date: NaiveDateTime,
    pub medication: String,
    pub dosage: String,
}

impl Entity for Prescription {
    fn declare() -> TableBuilder {
        TableBuilder::new()
            .table("prescriptions")
            .column(ColumnDescriptor::of::<i32>("id").primary_key())
            .column(ColumnDescriptor::of::<i32>("patient_id"))
            .column(ColumnDescriptor::of::<NaiveDateTime>("start_date"))
            .column(ColumnDescriptor::of::<String>("medication_name"))
            .column(ColumnDescriptor::of::<String>("dosage"))
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "patient_id" => Some(self.patient_id.into()),
            "start_date" => Some(self.start_date.into()),
            "medication_name" => Some(self.medication.clone().into()),
            "dosage" => Some(self.dosage.clone().into()),
            _ => None,
        }
    }

    fn set(&mut self, column: &str, value: Value) -> Result<(), BuoyError> {
        match column {
            "id" => self.id = value.decode()?,
            "patient_id" => self.patient_id = value.decode()?,
            "start_date" => self.start_date = value.decode()?,
            "medication_name" => self.medication = value.decode()?,
            "dosage" => self.dosage = value.decode()?,
            _ => return Err(BuoyError::unknown_column("prescriptions", column)),
        }
        Ok(())
    }
}
