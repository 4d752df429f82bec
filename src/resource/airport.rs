use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{EditBuffer, FieldKind, FieldSpec, Resource, ResourceKind};

/// An airport, addressed by its (unique) name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    pub name: String,
}

/// Input of `addAirport`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAirport {
    pub name: String,
}

/// Input of `updateAirport`; renaming is the only possible change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirportRename {
    pub new_name: String,
}

const NAME: FieldSpec = FieldSpec::required("name", "Name", FieldKind::Text);

impl Resource for Airport {
    type Key = String;
    type Draft = NewAirport;
    type Changes = AirportRename;

    const KIND: ResourceKind = ResourceKind::Airport;
    const CREATE_FIELDS: &'static [FieldSpec] = &[NAME];
    const UPDATE_FIELDS: &'static [FieldSpec] = &[NAME];
    const COLUMNS: &'static [&'static str] = &["Name"];

    fn key(&self) -> String {
        self.name.clone()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }

    fn seed(&self) -> Vec<(&'static str, String)> {
        vec![("name", self.name.clone())]
    }

    fn draft(buffer: &EditBuffer) -> Result<NewAirport> {
        Ok(NewAirport {
            name: buffer.text("name")?,
        })
    }

    fn changes(buffer: &EditBuffer) -> Result<AirportRename> {
        Ok(AirportRename {
            new_name: buffer.text("name")?,
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone()]
    }
}
