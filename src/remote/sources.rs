//! [`RemoteSource`] implementations of the GraphQL client, one per record type

use tracing::debug;

use crate::error::{AerodeskError, Result};
use crate::resource::{
    Airport, AirportRename, Flight, FlightChanges, NewAirport, NewFlight, NewTicket, Ticket,
    TicketChanges, TicketKey,
};

use super::RemoteSource;
use super::client::GraphQlClient;
use super::graphql::{
    AddAirportMutation, AddFlightMutation, AddFlightVariables, AddTicketMutation,
    AddTicketVariables, AirportNameVariables, AirportNode, AllAirportsQuery, AllFlightsQuery,
    AllTicketsQuery, DeleteAirportMutation, DeleteFlightMutation, DeleteFlightPayload,
    DeleteTicketMutation, FlightDateVariables, FlightNode, MutationBuilder, QueryBuilder,
    TicketKeyVariables, TicketNode, UpdateAirportMutation, UpdateAirportVariables,
    UpdateFlightMutation, UpdateFlightVariables, UpdateTicketMutation, UpdateTicketVariables,
};

impl From<AirportNode> for Airport {
    fn from(node: AirportNode) -> Self {
        Airport { name: node.name }
    }
}

impl From<FlightNode> for Flight {
    fn from(node: FlightNode) -> Self {
        Flight {
            date: node.date,
            duration: node.duration,
            distance: node.distance,
            airline: node.airline,
            origin: None,
            destination: None,
        }
    }
}

impl From<TicketNode> for Ticket {
    fn from(node: TicketNode) -> Self {
        Ticket {
            ticket_class: node.ticket_class,
            price: node.price,
        }
    }
}

fn not_deleted(kind: &str, key: impl std::fmt::Display) -> AerodeskError {
    AerodeskError::Api(format!("{kind} '{key}' was not deleted"))
}

/// Map the boolean answer of `deleteAirport`/`deleteTicket`
fn confirm_deleted(kind: &str, key: impl std::fmt::Display, deleted: bool) -> Result<()> {
    if deleted {
        Ok(())
    } else {
        Err(not_deleted(kind, key))
    }
}

/// Map the `deleteFlight` payload, preferring the server's message
fn confirm_flight_deleted(key: &str, payload: DeleteFlightPayload) -> Result<()> {
    if payload.success {
        return Ok(());
    }
    Err(match payload.message {
        Some(message) if !message.trim().is_empty() => AerodeskError::Api(message),
        _ => not_deleted("flight", key),
    })
}

impl RemoteSource<Airport> for GraphQlClient {
    async fn list(&self) -> Result<Vec<Airport>> {
        let response = self.execute(AllAirportsQuery::build(())).await?;
        let airports: Vec<Airport> = response.all_airports.into_iter().map(Into::into).collect();
        debug!(count = airports.len(), "fetched airports");
        Ok(airports)
    }

    async fn create(&self, draft: NewAirport) -> Result<Airport> {
        let operation = AddAirportMutation::build(AirportNameVariables { name: draft.name });
        let response = self.execute(operation).await?;
        Ok(response.add_airport.into())
    }

    async fn update(&self, key: &String, changes: AirportRename) -> Result<Airport> {
        let operation = UpdateAirportMutation::build(UpdateAirportVariables {
            name: key.clone(),
            new_name: changes.new_name,
        });
        let response = self.execute(operation).await?;
        Ok(response.update_airport.into())
    }

    async fn delete(&self, key: &String) -> Result<()> {
        let operation = DeleteAirportMutation::build(AirportNameVariables { name: key.clone() });
        let response = self.execute(operation).await?;
        confirm_deleted("airport", key, response.delete_airport)
    }
}

impl RemoteSource<Flight> for GraphQlClient {
    async fn list(&self) -> Result<Vec<Flight>> {
        let response = self.execute(AllFlightsQuery::build(())).await?;
        let flights: Vec<Flight> = response.all_flights.into_iter().map(Into::into).collect();
        debug!(count = flights.len(), "fetched flights");
        Ok(flights)
    }

    async fn create(&self, draft: NewFlight) -> Result<Flight> {
        let operation = AddFlightMutation::build(AddFlightVariables {
            date: draft.date,
            duration: draft.duration,
            distance: draft.distance,
            airline: draft.airline,
            origin: draft.origin,
            destination: draft.destination,
        });
        let response = self.execute(operation).await?;
        Ok(response.add_flight.into())
    }

    async fn update(&self, key: &String, changes: FlightChanges) -> Result<Flight> {
        let operation = UpdateFlightMutation::build(UpdateFlightVariables {
            date: key.clone(),
            duration: changes.duration,
            distance: changes.distance,
            airline: changes.airline,
            origin: changes.origin,
            destination: changes.destination,
        });
        let response = self.execute(operation).await?;
        Ok(response.update_flight.into())
    }

    async fn delete(&self, key: &String) -> Result<()> {
        let operation = DeleteFlightMutation::build(FlightDateVariables { date: key.clone() });
        let response = self.execute(operation).await?;
        confirm_flight_deleted(key, response.delete_flight)
    }
}

impl RemoteSource<Ticket> for GraphQlClient {
    async fn list(&self) -> Result<Vec<Ticket>> {
        let response = self.execute(AllTicketsQuery::build(())).await?;
        let tickets: Vec<Ticket> = response.all_tickets.into_iter().map(Into::into).collect();
        debug!(count = tickets.len(), "fetched tickets");
        Ok(tickets)
    }

    async fn create(&self, draft: NewTicket) -> Result<Ticket> {
        let operation = AddTicketMutation::build(AddTicketVariables {
            ticket_class: draft.ticket_class,
            price: draft.price,
            flight_date: draft.flight_date,
        });
        let response = self.execute(operation).await?;
        Ok(response.add_ticket.into())
    }

    async fn update(&self, key: &TicketKey, changes: TicketChanges) -> Result<Ticket> {
        let operation = UpdateTicketMutation::build(UpdateTicketVariables {
            ticket_class: key.ticket_class.clone(),
            ticket_price: key.price,
            new_ticket_class: changes.new_ticket_class,
            new_price: changes.new_price,
        });
        let response = self.execute(operation).await?;
        Ok(response.update_ticket.into())
    }

    async fn delete(&self, key: &TicketKey) -> Result<()> {
        let operation = DeleteTicketMutation::build(TicketKeyVariables {
            ticket_class: key.ticket_class.clone(),
            ticket_price: key.price,
        });
        let response = self.execute(operation).await?;
        confirm_deleted("ticket", key, response.delete_ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::resource::Resource;

    #[test]
    fn test_flight_node_conversion_leaves_airports_unset() {
        let node = FlightNode {
            date: "2024-05-01".to_string(),
            duration: 75,
            distance: 320,
            airline: "SAS".to_string(),
        };
        let flight = Flight::from(node);
        assert_eq!(flight.origin, None);
        assert_eq!(flight.destination, None);
        assert_eq!(flight.key(), "2024-05-01");
    }

    #[test]
    fn test_ticket_node_conversion() {
        let ticket = Ticket::from(TicketNode {
            ticket_class: "Economy".to_string(),
            price: 99.0,
        });
        assert_eq!(ticket.key().to_string(), "Economy at 99.00");
    }

    #[test]
    fn test_not_deleted_is_api_error() {
        let err = not_deleted("airport", "Heathrow");
        assert_eq!(err.to_string(), "API error: airport 'Heathrow' was not deleted");
    }

    #[test]
    fn test_boolean_delete_result() {
        assert!(confirm_deleted("airport", "Heathrow", true).is_ok());

        let err = confirm_deleted("ticket", "Economy at 99.00", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(
            err.to_string(),
            "API error: ticket 'Economy at 99.00' was not deleted"
        );
    }

    #[test]
    fn test_flight_delete_payload() {
        let deleted = DeleteFlightPayload {
            success: true,
            message: None,
        };
        assert!(confirm_flight_deleted("2024-01-01", deleted).is_ok());

        let refused = DeleteFlightPayload {
            success: false,
            message: Some("Flight has tickets".to_string()),
        };
        let err = confirm_flight_deleted("2024-01-01", refused).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.to_string(), "API error: Flight has tickets");

        let silent = DeleteFlightPayload {
            success: false,
            message: Some("  ".to_string()),
        };
        let err = confirm_flight_deleted("2024-01-01", silent).unwrap_err();
        assert_eq!(
            err.to_string(),
            "API error: flight '2024-01-01' was not deleted"
        );
    }
}
