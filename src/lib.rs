pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod pagination;
pub mod remote;
pub mod resource;

pub use config::Config;
pub use controller::{
    Lifecycle, Modal, Mutation, MutationKind, MutationOutcome, Records, ResourceController,
    ResourceState, ResourceViewModel, Toast, ToastLevel,
};
pub use error::{AerodeskError, ErrorKind, Result};
pub use pagination::{PAGE_SIZE, Page, paginate};
pub use remote::{GraphQlClient, RemoteSource};
pub use resource::{
    Airport, EditBuffer, FieldKind, FieldSpec, Flight, Resource, ResourceKind, Ticket, TicketKey,
};
