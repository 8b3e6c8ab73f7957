use super::{Checkup, Prescription};
use crate::error::BuoyError;
use crate::model::Entity;
use crate::relation::Related;
use crate::schema::{ColumnDescriptor, TableBuilder};
use crate::value::Value;

/// Patient with two navigational child lists (not columns)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patient {
    pub id: i32,
    pub first_name: String,
    pub age: i32,
    pub email: String,
    pub checkups: Vec<Checkup>,
    pub prescriptions: Vec<Prescription>,
}

impl Entity for Patient {
    fn declare() -> TableBuilder {
        TableBuilder::new()
            .table("patients")
            .column(ColumnDescriptor::of::<i32>("id").primary_key().db_type("SERIAL"))
            .column(ColumnDescriptor::of::<String>("first_name").db_type("VARCHAR(100)"))
            .column(ColumnDescriptor::of::<i32>("age").db_type("INT"))
            .column(ColumnDescriptor::of::<String>("email").unique().not_null())
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "first_name" => Some(self.first_name.clone().into()),
            "age" => Some(self.age.into()),
            "email" => Some(self.email.clone().into()),
            _ => None,
        }
    }

    fn set(&mut self, column: &str, value: Value) -> Result<(), BuoyError> {
        match column {
            "id" => self.id = value.decode()?,
            "first_name" => self.first_name = value.decode()?,
            "age" => self.age = value.decode()?,
            "email" => self.email = value.decode()?,
            _ => return Err(BuoyError::unknown_column("patients", column)),
        }
        Ok(())
    }
}

impl Related<Checkup> for Patient {
    fn related(&self) -> &[Checkup] {
        &self.checkups
    }

    fn related_mut(&mut self) -> &mut Vec<Checkup> {
        &mut self.checkups
    }
}

impl Related<Prescription> for Patient {
    fn related(&self) -> &[Prescription] {
        &self.prescriptions
    }

    fn related_mut(&mut self) -> &mut Vec<Prescription> {
        &mut self.prescriptions
    }
}
