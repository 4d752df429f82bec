use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{EditBuffer, FieldKind, FieldSpec, Resource, ResourceKind};

/// A ticket, addressed by the pair (class, price)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub ticket_class: String,
    pub price: f64,
}

/// Composite identity key of a ticket
#[derive(Debug, Clone, PartialEq)]
pub struct TicketKey {
    pub ticket_class: String,
    pub price: f64,
}

impl fmt::Display for TicketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:.2}", self.ticket_class, self.price)
    }
}

/// Input of `addTicket`; the flight date is only ever written here
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub ticket_class: String,
    pub price: f64,
    pub flight_date: String,
}

/// Input of `updateTicket`; `None` fields are left out of the request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketChanges {
    pub new_ticket_class: Option<String>,
    pub new_price: Option<f64>,
}

const TICKET_CLASS: FieldSpec = FieldSpec::required("ticket_class", "Class", FieldKind::Text);
const PRICE: FieldSpec = FieldSpec::required("price", "Price", FieldKind::Decimal);
const FLIGHT_DATE: FieldSpec = FieldSpec::required("flight_date", "Flight date", FieldKind::Date);

impl Resource for Ticket {
    type Key = TicketKey;
    type Draft = NewTicket;
    type Changes = TicketChanges;

    const KIND: ResourceKind = ResourceKind::Ticket;
    const CREATE_FIELDS: &'static [FieldSpec] = &[TICKET_CLASS, PRICE, FLIGHT_DATE];
    const UPDATE_FIELDS: &'static [FieldSpec] = &[TICKET_CLASS, PRICE];
    const COLUMNS: &'static [&'static str] = &["Class", "Price"];

    fn key(&self) -> TicketKey {
        TicketKey {
            ticket_class: self.ticket_class.clone(),
            price: self.price,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.ticket_class]
    }

    fn seed(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ticket_class", self.ticket_class.clone()),
            ("price", self.price.to_string()),
        ]
    }

    fn draft(buffer: &EditBuffer) -> Result<NewTicket> {
        Ok(NewTicket {
            ticket_class: buffer.text("ticket_class")?,
            price: buffer.decimal("price")?,
            flight_date: buffer.date("flight_date")?,
        })
    }

    fn changes(buffer: &EditBuffer) -> Result<TicketChanges> {
        Ok(TicketChanges {
            new_ticket_class: buffer.changed_text("ticket_class")?,
            new_price: buffer.changed_decimal("price")?,
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![self.ticket_class.clone(), format!("{:.2}", self.price)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        let ticket = Ticket {
            ticket_class: "Economy".to_string(),
            price: 120.5,
        };
        assert_eq!(ticket.key().to_string(), "Economy at 120.50");
    }

    #[test]
    fn test_price_only_update() {
        let ticket = Ticket {
            ticket_class: "Business".to_string(),
            price: 900.0,
        };
        let mut buffer = EditBuffer::seeded(Ticket::UPDATE_FIELDS, &ticket.seed());
        assert_eq!(buffer.value("price"), Some("900"));
        buffer.set("price", "850.25").unwrap();

        let changes = Ticket::changes(&buffer).unwrap();
        assert_eq!(changes.new_ticket_class, None);
        assert_eq!(changes.new_price, Some(850.25));
    }

    #[test]
    fn test_flight_date_is_create_only() {
        assert!(Ticket::CREATE_FIELDS.iter().any(|f| f.name == "flight_date"));
        assert!(!Ticket::UPDATE_FIELDS.iter().any(|f| f.name == "flight_date"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let ticket = Ticket {
            ticket_class: "First".to_string(),
            price: 2000.0,
        };
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["ticketClass"], "First");
    }
}
