use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::error::Result;
use crate::resource::{Airport, Flight, Ticket};

#[derive(Parser)]
#[command(name = "aerodesk")]
#[command(about = "Manage airports, flights and tickets of an airline API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options shared by every command
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Search and paging options of the list commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only show records whose searchable fields contain this text (case-insensitive)
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Page to show, 10 records per page (clamped to the last page)
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage airports
    #[command(subcommand)]
    Airports(AirportCommand),

    /// Manage flights
    #[command(subcommand)]
    Flights(FlightCommand),

    /// Manage tickets
    #[command(subcommand)]
    Tickets(TicketCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum AirportCommand {
    /// List airports
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Add an airport
    Add {
        /// Airport name (must be unique)
        #[arg(long)]
        name: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Rename an airport
    Update {
        /// Current name of the airport
        name: String,

        /// New name
        #[arg(long = "name")]
        new_name: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Delete an airport
    #[command(visible_alias = "rm")]
    Delete {
        /// Name of the airport
        name: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum FlightCommand {
    /// List flights
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Add a flight
    Add {
        /// Flight date (YYYY-MM-DD), identifies the flight
        #[arg(long)]
        date: String,

        /// Duration in minutes
        #[arg(long)]
        duration: String,

        /// Distance in miles
        #[arg(long)]
        distance: String,

        /// Operating airline
        #[arg(long)]
        airline: String,

        /// Origin airport name
        #[arg(long)]
        origin: String,

        /// Destination airport name
        #[arg(long)]
        destination: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Update a flight; only the given fields are sent
    Update {
        /// Date of the flight to update (YYYY-MM-DD)
        date: String,

        /// Duration in minutes
        #[arg(long)]
        duration: Option<String>,

        /// Distance in miles
        #[arg(long)]
        distance: Option<String>,

        /// Operating airline
        #[arg(long)]
        airline: Option<String>,

        /// Origin airport name
        #[arg(long)]
        origin: Option<String>,

        /// Destination airport name
        #[arg(long)]
        destination: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Delete a flight
    #[command(visible_alias = "rm")]
    Delete {
        /// Date of the flight (YYYY-MM-DD)
        date: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum TicketCommand {
    /// List tickets
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Add a ticket to a flight
    Add {
        /// Ticket class, e.g. Economy
        #[arg(long = "class")]
        ticket_class: String,

        /// Price
        #[arg(long)]
        price: String,

        /// Date of the flight the ticket belongs to (YYYY-MM-DD)
        #[arg(long)]
        flight_date: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Update a ticket, addressed by its class and price
    Update {
        /// Current class of the ticket
        ticket_class: String,

        /// Current price of the ticket
        price: String,

        /// New class
        #[arg(long = "class")]
        new_class: Option<String>,

        /// New price
        #[arg(long = "price")]
        new_price: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Delete a ticket, addressed by its class and price
    #[command(visible_alias = "rm")]
    Delete {
        /// Class of the ticket
        ticket_class: String,

        /// Price of the ticket
        price: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Set a configuration value
    Set {
        /// Config key (api.url, api.token, request_timeout)
        key: String,
        /// Value to set
        value: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Get a specific configuration value
    Get {
        /// Config key (api.url, api.token, request_timeout)
        key: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> Result<()> {
        use crate::commands::{
            cmd_add, cmd_config_get, cmd_config_set, cmd_config_show, cmd_delete, cmd_list,
            cmd_update, parse_ticket_key,
        };

        match self {
            Commands::Airports(command) => match command {
                AirportCommand::List(args) => cmd_list::<Airport>(args).await,
                AirportCommand::Add { name, output } => {
                    cmd_add::<Airport>(vec![("name", name)], output).await
                }
                AirportCommand::Update {
                    name,
                    new_name,
                    output,
                } => cmd_update::<Airport>(&name, vec![("name", new_name)], output).await,
                AirportCommand::Delete { name, output } => {
                    cmd_delete::<Airport>(name, output).await
                }
            },

            Commands::Flights(command) => match command {
                FlightCommand::List(args) => cmd_list::<Flight>(args).await,
                FlightCommand::Add {
                    date,
                    duration,
                    distance,
                    airline,
                    origin,
                    destination,
                    output,
                } => {
                    let fields = vec![
                        ("date", date),
                        ("duration", duration),
                        ("distance", distance),
                        ("airline", airline),
                        ("origin", origin),
                        ("destination", destination),
                    ];
                    cmd_add::<Flight>(fields, output).await
                }
                FlightCommand::Update {
                    date,
                    duration,
                    distance,
                    airline,
                    origin,
                    destination,
                    output,
                } => {
                    let fields = given(vec![
                        ("duration", duration),
                        ("distance", distance),
                        ("airline", airline),
                        ("origin", origin),
                        ("destination", destination),
                    ]);
                    cmd_update::<Flight>(&date, fields, output).await
                }
                FlightCommand::Delete { date, output } => cmd_delete::<Flight>(date, output).await,
            },

            Commands::Tickets(command) => match command {
                TicketCommand::List(args) => cmd_list::<Ticket>(args).await,
                TicketCommand::Add {
                    ticket_class,
                    price,
                    flight_date,
                    output,
                } => {
                    let fields = vec![
                        ("ticket_class", ticket_class),
                        ("price", price),
                        ("flight_date", flight_date),
                    ];
                    cmd_add::<Ticket>(fields, output).await
                }
                TicketCommand::Update {
                    ticket_class,
                    price,
                    new_class,
                    new_price,
                    output,
                } => {
                    let key = parse_ticket_key(ticket_class, &price)?;
                    let fields = given(vec![("ticket_class", new_class), ("price", new_price)]);
                    cmd_update::<Ticket>(&key, fields, output).await
                }
                TicketCommand::Delete {
                    ticket_class,
                    price,
                    output,
                } => {
                    let key = parse_ticket_key(ticket_class, &price)?;
                    cmd_delete::<Ticket>(key, output).await
                }
            },

            Commands::Config(command) => match command {
                ConfigCommand::Show { output } => cmd_config_show(output),
                ConfigCommand::Set { key, value, output } => cmd_config_set(&key, &value, output),
                ConfigCommand::Get { key, output } => cmd_config_get(&key, output),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Keep only the fields given on the command line
fn given(fields: Vec<(&'static str, Option<String>)>) -> Vec<(&'static str, String)> {
    fields
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "aerodesk", &mut io::stdout());
}
