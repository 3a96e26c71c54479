use diesel::prelude::*;

use super::schema::machines;
use crate::db::models::{Machine, MachineId, NewMachine};
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = machines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MachineRow {
    pub id: i32,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub serial_number: i64,
    pub installation_location: String,
}

impl TryFrom<MachineRow> for Machine {
    type Error = RepositoryError;

    fn try_from(row: MachineRow) -> RepositoryResult<Self> {
        let row_id = row.id;
        let context =
            move || ErrorContext::new("decode_row").with_entity("machine").with_entity_id(row_id);
        let id = u32::try_from(row.id)
            .map_err(|_| RepositoryError::internal_with_context("negative id", context()))?;
        let serial_number = u64::try_from(row.serial_number).map_err(|_| {
            RepositoryError::internal_with_context("negative serial_number", context())
        })?;

        Ok(Machine {
            id: MachineId(id),
            name: row.name,
            brand: row.brand,
            description: row.description,
            serial_number,
            installation_location: row.installation_location,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = machines)]
pub struct NewMachineRow<'a> {
    pub name: &'a str,
    pub brand: &'a str,
    pub description: &'a str,
    pub serial_number: i64,
    pub installation_location: &'a str,
}

impl<'a> NewMachineRow<'a> {
    /// Bind the five insert parameters.
    pub fn bind(machine: &'a NewMachine) -> RepositoryResult<Self> {
        Ok(Self {
            name: &machine.name,
            brand: &machine.brand,
            description: &machine.description,
            serial_number: machine.stored_serial_number()?,
            installation_location: &machine.installation_location,
        })
    }
}
