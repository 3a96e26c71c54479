//! Machine record model shared by every repository backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::repository::{ErrorContext, RepositoryError, RepositoryResult};

/// Database-assigned machine identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(pub u32);

impl MachineId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Convert an identifier generated by the storage layer.
    ///
    /// Auto-increment keys start at 1, so zero or negative values mean the
    /// insert result carried no usable id.
    pub fn from_generated(raw: i64) -> RepositoryResult<Self> {
        u32::try_from(raw)
            .ok()
            .filter(|id| *id > 0)
            .map(Self)
            .ok_or_else(|| {
                RepositoryError::generated_id_with_context(
                    format!("generated id {} is not a positive u32", raw),
                    ErrorContext::new("insert_machine").with_entity("machine"),
                )
            })
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub serial_number: u64,
    pub installation_location: String,
}

/// Client payload for creating a machine.
///
/// Missing fields decode to their zero value; an `id` in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewMachine {
    pub name: String,
    pub brand: String,
    pub description: String,
    pub serial_number: u64,
    pub installation_location: String,
}

impl NewMachine {
    /// Decode a request body.
    ///
    /// Keys match field names exactly, then case-insensitively. A `null`
    /// value leaves the field at its zero value and a repeated key keeps its
    /// last value. A top-level `null` yields an all-zero record.
    pub fn from_json_slice(body: &[u8]) -> serde_json::Result<Self> {
        let fields = match serde_json::from_slice::<Value>(body)? {
            Value::Null => return Ok(Self::default()),
            other => serde_json::from_value::<Map<String, Value>>(other)?,
        };

        // Type-checked like the other fields, then discarded
        let _: u32 = field(&fields, "id")?;

        Ok(Self {
            name: field(&fields, "name")?,
            brand: field(&fields, "brand")?,
            description: field(&fields, "description")?,
            serial_number: field(&fields, "serial_number")?,
            installation_location: field(&fields, "installation_location")?,
        })
    }

    /// Serial number as bound to the `BIGINT` column.
    pub fn stored_serial_number(&self) -> RepositoryResult<i64> {
        i64::try_from(self.serial_number).map_err(|_| {
            RepositoryError::statement_with_context(
                format!("serial_number {} exceeds BIGINT range", self.serial_number),
                ErrorContext::new("bind_parameters")
                    .with_entity("machine")
                    .with_details("column=serial_number"),
            )
        })
    }

    pub fn into_machine(self, id: MachineId) -> Machine {
        Machine {
            id,
            name: self.name,
            brand: self.brand,
            description: self.description,
            serial_number: self.serial_number,
            installation_location: self.installation_location,
        }
    }
}

fn field<T>(fields: &Map<String, Value>, name: &str) -> serde_json::Result<T>
where
    T: DeserializeOwned + Default,
{
    let value = fields.get(name).or_else(|| {
        fields
            .iter()
            .find(|(key, _)| key.to_lowercase() == name)
            .map(|(_, value)| value)
    });

    match value {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value),
    }
}
