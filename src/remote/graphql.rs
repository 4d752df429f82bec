//! Type-safe cynic operations against the airline GraphQL schema

// Re-export cynic types we need
pub use cynic::{GraphQlResponse, MutationBuilder, QueryBuilder};

// Import schema from the dedicated aerodesk-schema crate.
// The import MUST be named `schema` for cynic derives to work.
use aerodesk_schema::airline as schema;

use serde::Deserialize;

/// Custom error extensions type for API errors
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorExtensions {
    pub code: Option<String>,
}

// Record Fragments

#[derive(cynic::QueryFragment, Debug, Clone)]
#[cynic(graphql_type = "Airport")]
pub struct AirportNode {
    pub name: String,
}

/// Origin and destination are write-only: the flight list returns neither
#[derive(cynic::QueryFragment, Debug, Clone)]
#[cynic(graphql_type = "Flight")]
pub struct FlightNode {
    pub date: String,
    pub duration: i32,
    pub distance: i32,
    pub airline: String,
}

#[derive(cynic::QueryFragment, Debug, Clone)]
#[cynic(graphql_type = "Ticket")]
pub struct TicketNode {
    pub ticket_class: String,
    pub price: f64,
}

// List Queries

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Query")]
pub struct AllAirportsQuery {
    pub all_airports: Vec<AirportNode>,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Query")]
pub struct AllFlightsQuery {
    pub all_flights: Vec<FlightNode>,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Query")]
pub struct AllTicketsQuery {
    pub all_tickets: Vec<TicketNode>,
}

// Airport Mutations

#[derive(cynic::QueryVariables, Debug)]
pub struct AirportNameVariables {
    pub name: String,
}

#[derive(cynic::QueryVariables, Debug)]
pub struct UpdateAirportVariables {
    pub name: String,
    pub new_name: String,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Mutation", variables = "AirportNameVariables")]
pub struct AddAirportMutation {
    #[arguments(name: $name)]
    pub add_airport: AirportNode,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Mutation", variables = "UpdateAirportVariables")]
pub struct UpdateAirportMutation {
    #[arguments(name: $name, newName: $new_name)]
    pub update_airport: AirportNode,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Mutation", variables = "AirportNameVariables")]
pub struct DeleteAirportMutation {
    #[arguments(name: $name)]
    pub delete_airport: bool,
}

// Flight Mutations

#[derive(cynic::QueryVariables, Debug)]
pub struct AddFlightVariables {
    pub date: String,
    pub duration: i32,
    pub distance: i32,
    pub airline: String,
    pub origin: String,
    pub destination: String,
}

/// Unset fields are omitted from the request rather than sent as null
#[derive(cynic::QueryVariables, Debug)]
pub struct UpdateFlightVariables {
    pub date: String,
    #[cynic(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[cynic(skip_serializing_if = "Option::is_none")]
    pub distance: Option<i32>,
    #[cynic(skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    #[cynic(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[cynic(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

#[derive(cynic::QueryVariables, Debug)]
pub struct FlightDateVariables {
    pub date: String,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Mutation", variables = "AddFlightVariables")]
pub struct AddFlightMutation {
    #[arguments(
        date: $date,
        duration: $duration,
        distance: $distance,
        airline: $airline,
        origin: $origin,
        destination: $destination
    )]
    pub add_flight: FlightNode,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Mutation", variables = "UpdateFlightVariables")]
pub struct UpdateFlightMutation {
    #[arguments(
        date: $date,
        duration: $duration,
        distance: $distance,
        airline: $airline,
        origin: $origin,
        destination: $destination
    )]
    pub update_flight: FlightNode,
}

#[derive(cynic::QueryFragment, Debug)]
pub struct DeleteFlightPayload {
    pub success: bool,
    pub message: Option<String>,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Mutation", variables = "FlightDateVariables")]
pub struct DeleteFlightMutation {
    #[arguments(date: $date)]
    pub delete_flight: DeleteFlightPayload,
}

// Ticket Mutations

#[derive(cynic::QueryVariables, Debug)]
pub struct AddTicketVariables {
    pub ticket_class: String,
    pub price: f64,
    pub flight_date: String,
}

/// Unset fields are omitted from the request rather than sent as null
#[derive(cynic::QueryVariables, Debug)]
pub struct UpdateTicketVariables {
    pub ticket_class: String,
    pub ticket_price: f64,
    #[cynic(skip_serializing_if = "Option::is_none")]
    pub new_ticket_class: Option<String>,
    #[cynic(skip_serializing_if = "Option::is_none")]
    pub new_price: Option<f64>,
}

#[derive(cynic::QueryVariables, Debug)]
pub struct TicketKeyVariables {
    pub ticket_class: String,
    pub ticket_price: f64,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Mutation", variables = "AddTicketVariables")]
pub struct AddTicketMutation {
    #[arguments(ticketClass: $ticket_class, price: $price, flightDate: $flight_date)]
    pub add_ticket: TicketNode,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Mutation", variables = "UpdateTicketVariables")]
pub struct UpdateTicketMutation {
    #[arguments(
        ticketClass: $ticket_class,
        ticketPrice: $ticket_price,
        newTicketClass: $new_ticket_class,
        newPrice: $new_price
    )]
    pub update_ticket: TicketNode,
}

#[derive(cynic::QueryFragment, Debug)]
#[cynic(graphql_type = "Mutation", variables = "TicketKeyVariables")]
pub struct DeleteTicketMutation {
    #[arguments(ticketClass: $ticket_class, ticketPrice: $ticket_price)]
    pub delete_ticket: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_list_selects_only_listed_fields() {
        let operation = AllFlightsQuery::build(());
        assert!(operation.query.contains("allFlights"));
        for field in ["date", "duration", "distance", "airline"] {
            assert!(operation.query.contains(field), "missing {field}");
        }
        assert!(!operation.query.contains("origin"));
        assert!(!operation.query.contains("destination"));
    }

    #[test]
    fn test_update_flight_omits_unchanged_fields() {
        let operation = UpdateFlightMutation::build(UpdateFlightVariables {
            date: "2024-01-01".to_string(),
            duration: None,
            distance: Some(3700),
            airline: None,
            origin: None,
            destination: None,
        });
        assert!(operation.query.contains("updateFlight"));

        let json = serde_json::to_value(&operation).unwrap();
        let variables = &json["variables"];
        assert_eq!(variables["date"], "2024-01-01");
        assert_eq!(variables["distance"], 3700);
        assert!(variables.get("duration").is_none());
        assert!(variables.get("airline").is_none());
    }

    #[test]
    fn test_delete_ticket_addresses_composite_key() {
        let operation = DeleteTicketMutation::build(TicketKeyVariables {
            ticket_class: "Economy".to_string(),
            ticket_price: 120.5,
        });
        assert!(operation.query.contains("deleteTicket"));
        assert!(operation.query.contains("ticketClass"));
        assert!(operation.query.contains("ticketPrice"));
    }

    #[test]
    fn test_response_with_errors_deserializes() {
        let body = r#"{
            "data": null,
            "errors": [{
                "message": "Flight not found",
                "path": ["deleteFlight"],
                "extensions": {"code": "NOT_FOUND"}
            }]
        }"#;
        let response: GraphQlResponse<DeleteFlightMutation, ErrorExtensions> =
            serde_json::from_str(body).unwrap();
        assert!(response.data.is_none());
        let errors = response.errors.unwrap();
        assert_eq!(errors[0].message, "Flight not found");
        assert_eq!(
            errors[0].extensions.as_ref().unwrap().code.as_deref(),
            Some("NOT_FOUND")
        );
    }
}
