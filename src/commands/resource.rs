//! List, add, update and delete commands, generic over the record type.
//!
//! Each command drives a [`ResourceController`] the way an interactive screen
//! would: open the form, fill in fields, submit, then show the refreshed list
//! and the controller's feedback message.

use owo_colors::OwoColorize;
use serde_json::json;
use tabled::builder::Builder;
use tabled::settings::Style;

use super::CommandOutput;
use crate::cli::{ListArgs, OutputOptions};
use crate::config::Config;
use crate::controller::{ResourceController, ResourceState, ResourceViewModel, Toast, ToastLevel};
use crate::error::{AerodeskError, Result};
use crate::remote::{GraphQlClient, RemoteSource};
use crate::resource::{Resource, TicketKey};

type Controller<R> = ResourceController<R, GraphQlClient>;

/// Build a controller over the configured API endpoint
fn connect<R>() -> Result<Controller<R>>
where
    R: Resource,
    GraphQlClient: RemoteSource<R>,
{
    let config = Config::load()?;
    let client = GraphQlClient::from_config(&config)?;
    Ok(ResourceController::new(client).with_timeout(config.request_timeout()))
}

/// Parse the `(class, price)` pair addressing a ticket
pub fn parse_ticket_key(ticket_class: String, price: &str) -> Result<TicketKey> {
    let price = price
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| {
            AerodeskError::validation("price", format!("'{price}' is not a non-negative number"))
        })?;
    Ok(TicketKey {
        ticket_class,
        price,
    })
}

/// List one page of records
pub async fn cmd_list<R>(args: ListArgs) -> Result<()>
where
    R: Resource,
    GraphQlClient: RemoteSource<R>,
{
    let mut controller = connect::<R>()?;
    controller.mount().await?;
    controller.set_search(args.search);
    controller.go_to_page(args.page);

    let view = controller.view_model();
    CommandOutput::new(page_json(&view)?)
        .with_text(render_page::<R>(&view))
        .print(args.output)
}

/// Create a record from `(field, value)` pairs
pub async fn cmd_add<R>(fields: Vec<(&'static str, String)>, output: OutputOptions) -> Result<()>
where
    R: Resource,
    GraphQlClient: RemoteSource<R>,
{
    let mut controller = connect::<R>()?;
    controller.open_add()?;
    for (name, value) in fields {
        controller.edit_field(name, value)?;
    }
    let result = controller.submit().await;
    report(&controller, "create", result, output)
}

/// Update the record addressed by `key`; only the given fields are changed
pub async fn cmd_update<R>(
    key: &R::Key,
    fields: Vec<(&'static str, String)>,
    output: OutputOptions,
) -> Result<()>
where
    R: Resource,
    GraphQlClient: RemoteSource<R>,
{
    let mut controller = connect::<R>()?;
    controller.mount().await?;
    controller.open_update_for(key)?;
    for (name, value) in fields {
        controller.edit_field(name, value)?;
    }
    let result = controller.submit().await;
    report(&controller, "update", result, output)
}

/// Delete the record addressed by `key`
pub async fn cmd_delete<R>(key: R::Key, output: OutputOptions) -> Result<()>
where
    R: Resource,
    GraphQlClient: RemoteSource<R>,
{
    let mut controller = connect::<R>()?;
    let result = controller.delete_key(key).await;
    report(&controller, "delete", result, output)
}

/// Print the outcome of a mutation.
///
/// A plain failure is left to the caller's error output. When the change was
/// committed but the reload failed, the feedback message goes to stderr as
/// well, since the error alone would not say the change went through.
fn report<R: Resource>(
    controller: &Controller<R>,
    action: &str,
    result: Result<()>,
    output: OutputOptions,
) -> Result<()> {
    let view = controller.view_model();

    if let Err(err) = result {
        if let Some(toast) = stale_notice(controller.state()) {
            eprintln!("{}", toast.render());
        }
        return Err(err);
    }

    let message = view
        .toast
        .filter(|t| t.level == ToastLevel::Success)
        .map(|t| t.message.clone())
        .unwrap_or_default();

    let mut json_output = page_json(&view)?;
    json_output["action"] = json!(action);
    json_output["success"] = json!(true);
    json_output["message"] = json!(message);

    let text = format!("{}\n\n{}", message.green(), render_page::<R>(&view));
    CommandOutput::new(json_output).with_text(text).print(output)
}

/// The error toast of a mutation that committed before its reload failed
fn stale_notice<R: Resource>(state: &ResourceState<R>) -> Option<&Toast> {
    state.records().error()?;
    state.toast().filter(|toast| toast.is_error())
}

fn page_json<R: Resource>(view: &ResourceViewModel<'_, R>) -> Result<serde_json::Value> {
    Ok(json!({
        "resource": R::KIND.plural(),
        "page": view.page,
        "total_pages": view.total_pages,
        "total_matches": view.total_matches,
        "total_records": view.total_records,
        "search": view.search,
        "items": serde_json::to_value(&view.items)?,
    }))
}

/// Render the visible page as a table with a paging footer
fn render_page<R: Resource>(view: &ResourceViewModel<'_, R>) -> String {
    if view.rows.is_empty() {
        let message = if view.search.is_empty() {
            format!("No {} found", R::KIND.plural())
        } else {
            format!("No {} match '{}'", R::KIND.plural(), view.search)
        };
        return message.dimmed().to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(view.columns.iter().copied());
    for row in &view.rows {
        builder.push_record(row.iter().map(String::as_str));
    }
    let mut table = builder.build();
    table.with(Style::rounded());

    let footer = if view.search.is_empty() {
        format!(
            "Page {} of {} ({} {})",
            view.page,
            view.total_pages,
            view.total_records,
            R::KIND.plural()
        )
    } else {
        format!(
            "Page {} of {} ({} of {} {} match '{}')",
            view.page,
            view.total_pages,
            view.total_matches,
            view.total_records,
            R::KIND.plural(),
            view.search
        )
    };

    format!("{table}\n{}", footer.dimmed())
}
