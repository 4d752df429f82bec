use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{EditBuffer, FieldKind, FieldSpec, Resource, ResourceKind};

/// A scheduled flight, addressed by its date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub date: String,
    /// Minutes
    pub duration: i32,
    /// Miles
    pub distance: i32,
    pub airline: String,
    /// Origin airport name, when the API returns it
    pub origin: Option<String>,
    /// Destination airport name, when the API returns it
    pub destination: Option<String>,
}

/// Input of `addFlight`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlight {
    pub date: String,
    pub duration: i32,
    pub distance: i32,
    pub airline: String,
    pub origin: String,
    pub destination: String,
}

/// Input of `updateFlight`; `None` fields are left out of the request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightChanges {
    pub duration: Option<i32>,
    pub distance: Option<i32>,
    pub airline: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
}

const DATE: FieldSpec = FieldSpec::required("date", "Date", FieldKind::Date);
const DURATION: FieldSpec = FieldSpec::required("duration", "Duration (min)", FieldKind::Integer);
const DISTANCE: FieldSpec = FieldSpec::required("distance", "Distance (miles)", FieldKind::Integer);
const AIRLINE: FieldSpec = FieldSpec::required("airline", "Airline", FieldKind::Text);
const ORIGIN: FieldSpec = FieldSpec::required("origin", "Origin", FieldKind::Text);
const DESTINATION: FieldSpec = FieldSpec::required("destination", "Destination", FieldKind::Text);

impl Resource for Flight {
    type Key = String;
    type Draft = NewFlight;
    type Changes = FlightChanges;

    const KIND: ResourceKind = ResourceKind::Flight;
    const CREATE_FIELDS: &'static [FieldSpec] =
        &[DATE, DURATION, DISTANCE, AIRLINE, ORIGIN, DESTINATION];
    // The date is the identity key and cannot be edited
    const UPDATE_FIELDS: &'static [FieldSpec] =
        &[DURATION, DISTANCE, AIRLINE, ORIGIN, DESTINATION];
    const COLUMNS: &'static [&'static str] = &[
        "Date",
        "Duration",
        "Distance (miles)",
        "Airline",
        "Origin",
        "Destination",
    ];

    fn key(&self) -> String {
        self.date.clone()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.airline.as_str(), self.date.as_str()];
        fields.extend(self.origin.as_deref());
        fields.extend(self.destination.as_deref());
        fields
    }

    fn seed(&self) -> Vec<(&'static str, String)> {
        vec![
            ("duration", self.duration.to_string()),
            ("distance", self.distance.to_string()),
            ("airline", self.airline.clone()),
            ("origin", self.origin.clone().unwrap_or_default()),
            ("destination", self.destination.clone().unwrap_or_default()),
        ]
    }

    fn draft(buffer: &EditBuffer) -> Result<NewFlight> {
        Ok(NewFlight {
            date: buffer.date("date")?,
            duration: buffer.integer("duration")?,
            distance: buffer.integer("distance")?,
            airline: buffer.text("airline")?,
            origin: buffer.text("origin")?,
            destination: buffer.text("destination")?,
        })
    }

    fn changes(buffer: &EditBuffer) -> Result<FlightChanges> {
        Ok(FlightChanges {
            duration: buffer.changed_integer("duration")?,
            distance: buffer.changed_integer("distance")?,
            airline: buffer.changed_text("airline")?,
            origin: buffer.changed_text("origin")?,
            destination: buffer.changed_text("destination")?,
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.duration.to_string(),
            self.distance.to_string(),
            self.airline.clone(),
            self.origin.clone().unwrap_or_else(|| "-".to_string()),
            self.destination.clone().unwrap_or_else(|| "-".to_string()),
        ]
    }
}
