#![allow(dead_code)]

use std::fs;
use std::process::{Command, Output};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use aerodesk::resource::{
    AirportRename, FlightChanges, NewAirport, NewFlight, NewTicket, TicketChanges,
};
use aerodesk::{AerodeskError, Airport, Flight, RemoteSource, Resource, Result, Ticket};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Helper struct to run aerodesk commands in an isolated temp directory
pub struct AerodeskTest {
    pub temp_dir: TempDir,
    binary_path: String,
}

impl AerodeskTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        AerodeskTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_aerodesk").to_string(),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("AERODESK_API_URL")
            .env_remove("AERODESK_API_TOKEN")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to execute aerodesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".aerodesk");
        fs::create_dir_all(&dir).expect("Failed to create .aerodesk directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> String {
        let path = self.temp_dir.path().join(".aerodesk").join("config.yaml");
        fs::read_to_string(path).expect("Failed to read config file")
    }
}

type ServedAirports = Arc<Mutex<Vec<String>>>;

/// Serve the airport operations of the GraphQL API on a local port.
///
/// Returns the endpoint URL. The server lives as long as the test runtime.
pub async fn serve_airport_api(names: &[&str]) -> String {
    let airports: ServedAirports = Arc::new(Mutex::new(
        names.iter().map(|name| name.to_string()).collect(),
    ));
    let app = Router::new()
        .route("/graphql", post(answer_airport_operation))
        .with_state(airports);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind local API");
    let addr = listener.local_addr().expect("Failed to read local API address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Local API stopped");
    });
    format!("http://{addr}/graphql")
}

async fn answer_airport_operation(
    State(airports): State<ServedAirports>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or_default();
    let name = body["variables"]["name"].as_str().unwrap_or_default().to_string();
    let mut airports = airports.lock().unwrap();

    let data = if query.contains("addAirport") {
        airports.push(name.clone());
        json!({ "addAirport": { "name": name } })
    } else if query.contains("deleteAirport") {
        let before = airports.len();
        airports.retain(|airport| *airport != name);
        json!({ "deleteAirport": airports.len() < before })
    } else {
        let all: Vec<Value> = airports.iter().map(|name| json!({ "name": name })).collect();
        json!({ "allAirports": all })
    };
    Json(json!({ "data": data }))
}

/// How an in-memory record applies drafts and changes, mirroring the API
pub trait MemoryRecord: Resource {
    fn from_draft(draft: Self::Draft) -> Self;
    fn apply(&mut self, changes: Self::Changes);
}

impl MemoryRecord for Airport {
    fn from_draft(draft: NewAirport) -> Self {
        Airport { name: draft.name }
    }

    fn apply(&mut self, changes: AirportRename) {
        self.name = changes.new_name;
    }
}

impl MemoryRecord for Flight {
    fn from_draft(draft: NewFlight) -> Self {
        Flight {
            date: draft.date,
            duration: draft.duration,
            distance: draft.distance,
            airline: draft.airline,
            origin: Some(draft.origin),
            destination: Some(draft.destination),
        }
    }

    fn apply(&mut self, changes: FlightChanges) {
        if let Some(duration) = changes.duration {
            self.duration = duration;
        }
        if let Some(distance) = changes.distance {
            self.distance = distance;
        }
        if let Some(airline) = changes.airline {
            self.airline = airline;
        }
        if let Some(origin) = changes.origin {
            self.origin = Some(origin);
        }
        if let Some(destination) = changes.destination {
            self.destination = Some(destination);
        }
    }
}

impl MemoryRecord for Ticket {
    fn from_draft(draft: NewTicket) -> Self {
        Ticket {
            ticket_class: draft.ticket_class,
            price: draft.price,
        }
    }

    fn apply(&mut self, changes: TicketChanges) {
        if let Some(class) = changes.new_ticket_class {
            self.ticket_class = class;
        }
        if let Some(price) = changes.new_price {
            self.price = price;
        }
    }
}

/// In-memory stand-in for the airline API with failure injection
pub struct MemorySource<R> {
    records: Mutex<Vec<R>>,
    /// Every call fails with a network error
    pub offline: AtomicBool,
    /// List queries fail with a network error; mutations still commit
    pub fail_lists: AtomicBool,
    /// Mutations never answer
    pub hang: AtomicBool,
    /// Held by a test to keep mutations waiting
    pub gate: tokio::sync::Mutex<()>,
    mutations: AtomicUsize,
    lists: AtomicUsize,
}

impl<R: MemoryRecord> MemorySource<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: Mutex::new(records),
            offline: AtomicBool::new(false),
            fail_lists: AtomicBool::new(false),
            hang: AtomicBool::new(false),
            gate: tokio::sync::Mutex::new(()),
            mutations: AtomicUsize::new(0),
            lists: AtomicUsize::new(0),
        }
    }

    /// Current server-side records
    pub fn snapshot(&self) -> Vec<R> {
        self.records.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    pub fn list_count(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AerodeskError::Network("connection refused".to_string()));
        }
        Ok(())
    }

    /// Wait at the gate, then count the mutation
    async fn enter_mutation(&self) -> Result<()> {
        self.check_online()?;
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let _open = self.gate.lock().await;
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn not_found(key: &R::Key) -> AerodeskError {
        AerodeskError::Api(format!("{} '{key}' not found", R::KIND))
    }
}

impl<R: MemoryRecord> RemoteSource<R> for MemorySource<R> {
    async fn list(&self) -> Result<Vec<R>> {
        self.check_online()?;
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(AerodeskError::Network("connection reset".to_string()));
        }
        Ok(self.snapshot())
    }

    async fn create(&self, draft: R::Draft) -> Result<R> {
        self.enter_mutation().await?;
        let record = R::from_draft(draft);
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.key() == record.key()) {
            return Err(AerodeskError::Api(format!(
                "{} '{}' already exists",
                R::KIND,
                record.key()
            )));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, key: &R::Key, changes: R::Changes) -> Result<R> {
        self.enter_mutation().await?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| &r.key() == key)
            .ok_or_else(|| Self::not_found(key))?;
        record.apply(changes);
        Ok(record.clone())
    }

    async fn delete(&self, key: &R::Key) -> Result<()> {
        self.enter_mutation().await?;
        let mut records = self.records.lock().unwrap();
        let index = records
            .iter()
            .position(|r| &r.key() == key)
            .ok_or_else(|| Self::not_found(key))?;
        records.remove(index);
        Ok(())
    }
}

pub fn airports(n: usize) -> Vec<Airport> {
    (1..=n)
        .map(|i| Airport {
            name: format!("Airport {i:02}"),
        })
        .collect()
}

pub fn flight(date: &str, airline: &str, origin: &str, destination: &str) -> Flight {
    Flight {
        date: date.to_string(),
        duration: 120,
        distance: 500,
        airline: airline.to_string(),
        origin: Some(origin.to_string()),
        destination: Some(destination.to_string()),
    }
}

pub fn ticket(class: &str, price: f64) -> Ticket {
    Ticket {
        ticket_class: class.to_string(),
        price,
    }
}
