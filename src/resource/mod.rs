//! Record types managed by aerodesk and the trait that parameterizes the
//! generic resource controller over them.
//!
//! Each record type supplies its identity key, the field schema used by the
//! create and update forms, the fields searched by the list filter, and the
//! conversion from a filled-in [`EditBuffer`] into the typed input of the
//! corresponding remote mutation.

mod airport;
mod buffer;
mod flight;
mod ticket;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use airport::{Airport, AirportRename, NewAirport};
pub use buffer::{BufferEntry, EditBuffer};
pub use flight::{Flight, FlightChanges, NewFlight};
pub use ticket::{NewTicket, Ticket, TicketChanges, TicketKey};

/// The three record types exposed by the airline API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Airport,
    Flight,
    Ticket,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Airport,
        ResourceKind::Flight,
        ResourceKind::Ticket,
    ];

    /// Lowercase singular noun, e.g. "airport"
    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Airport => "airport",
            ResourceKind::Flight => "flight",
            ResourceKind::Ticket => "ticket",
        }
    }

    /// Lowercase plural noun, e.g. "airports"
    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::Airport => "airports",
            ResourceKind::Flight => "flights",
            ResourceKind::Ticket => "tickets",
        }
    }

    /// Capitalized singular noun for messages, e.g. "Airport"
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Airport => "Airport",
            ResourceKind::Flight => "Flight",
            ResourceKind::Ticket => "Ticket",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.singular())
    }
}

/// Value type of a form field, deciding how its text is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Non-negative whole number
    Integer,
    /// Non-negative finite decimal
    Decimal,
    /// Calendar date in `YYYY-MM-DD` form
    Date,
}

/// Static description of one editable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name used to address the field (e.g. from the command line)
    pub name: &'static str,
    /// Human-readable label
    pub label: &'static str,
    pub kind: FieldKind,
    /// Whether a value must be supplied when creating a record
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }
}

/// A record type the generic controller can manage.
///
/// The record type itself implements this trait; the associated types carry
/// the shape of its identity key and of its create/update inputs.
pub trait Resource:
    Clone + fmt::Debug + PartialEq + Serialize + Send + Sync + 'static
{
    /// Field(s) addressing one record for update and delete
    type Key: Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static;
    /// Typed input of the create mutation
    type Draft: fmt::Debug + Send + 'static;
    /// Typed input of the update mutation (only changed fields are set)
    type Changes: fmt::Debug + Send + 'static;

    const KIND: ResourceKind;
    /// Fields of the add form
    const CREATE_FIELDS: &'static [FieldSpec];
    /// Fields of the update form
    const UPDATE_FIELDS: &'static [FieldSpec];
    /// Table column headers, matching [`Resource::cells`]
    const COLUMNS: &'static [&'static str];

    /// Identity key of this record
    fn key(&self) -> Self::Key;

    /// Values searched by the list filter
    fn search_fields(&self) -> Vec<&str>;

    /// Initial values of the update form for this record
    fn seed(&self) -> Vec<(&'static str, String)>;

    /// Build the create input from a filled-in add form
    fn draft(buffer: &EditBuffer) -> Result<Self::Draft>;

    /// Build the update input from the changed fields of an update form.
    ///
    /// Callers check [`EditBuffer::has_changes`] first.
    fn changes(buffer: &EditBuffer) -> Result<Self::Changes>;

    /// Display cells for one table row
    fn cells(&self) -> Vec<String>;

    /// Case-insensitive substring match against the search fields.
    ///
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Identity keys that occur more than once in `records`, each reported once
pub fn duplicate_keys<R: Resource>(records: &[R]) -> Vec<R::Key> {
    let keys: Vec<R::Key> = records.iter().map(Resource::key).collect();
    keys.iter()
        .enumerate()
        .filter(|(i, key)| keys[..*i].iter().filter(|k| k == key).count() == 1)
        .map(|(_, key)| key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(ResourceKind::Airport.singular(), "airport");
        assert_eq!(ResourceKind::Flight.plural(), "flights");
        assert_eq!(ResourceKind::Ticket.label(), "Ticket");
        assert_eq!(ResourceKind::Ticket.to_string(), "ticket");
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ResourceKind::ALL).unwrap();
        assert_eq!(json, r#"["airport","flight","ticket"]"#);
    }

    #[test]
    fn test_matches_is_case_insensitive_substring() {
        let airport = Airport {
            name: "John F. Kennedy".to_string(),
        };
        assert!(airport.matches("kennedy"));
        assert!(airport.matches("f. k"));
        assert!(airport.matches(""));
        assert!(!airport.matches("jfk"));
    }

    #[test]
    fn test_duplicate_keys_reported_once() {
        let airports: Vec<Airport> = ["A", "B", "A", "C", "A", "B"]
            .iter()
            .map(|name| Airport {
                name: name.to_string(),
            })
            .collect();
        assert_eq!(duplicate_keys(&airports), vec!["A".to_string(), "B".to_string()]);
        assert!(duplicate_keys(&airports[..2]).is_empty());
    }
}
