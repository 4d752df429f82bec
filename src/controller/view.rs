//! View model derived from [`ResourceState`].
//!
//! The renderer only ever sees this value, so everything it shows is
//! recomputed from the state on each call.

use crate::resource::Resource;

use super::state::{Modal, Records, ResourceState};
use super::toast::Toast;

/// What the list area should display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus<'a> {
    Loading,
    Ready,
    Failed(&'a str),
}

/// One field of the open form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViewModel<'a> {
    pub name: &'static str,
    pub label: &'static str,
    pub value: &'a str,
    pub required: bool,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormViewModel<'a> {
    pub title: String,
    pub fields: Vec<FieldViewModel<'a>>,
    /// False while a mutation is in flight
    pub submit_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct ResourceViewModel<'a, R> {
    pub status: ListStatus<'a>,
    pub columns: &'static [&'static str],
    /// Records on the visible page
    pub items: Vec<&'a R>,
    /// Display cells of `items`, row by row
    pub rows: Vec<Vec<String>>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
    pub total_records: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub search: &'a str,
    pub form: Option<FormViewModel<'a>>,
    pub toast: Option<&'a Toast>,
    pub is_submitting: bool,
}

pub fn compute_view_model<R: Resource>(state: &ResourceState<R>) -> ResourceViewModel<'_, R> {
    let status = match state.records() {
        Records::Loading => ListStatus::Loading,
        Records::Ready(_) => ListStatus::Ready,
        Records::Failed(message) => ListStatus::Failed(message),
    };

    let page = state.current_page();
    let rows = page.items.iter().map(|record| record.cells()).collect();
    let is_submitting = state.is_submitting();

    let form = match state.modal() {
        Modal::Closed => None,
        Modal::Add { buffer } => Some((format!("Add {}", R::KIND.singular()), buffer)),
        Modal::Update { key, buffer } => {
            Some((format!("Update {} '{key}'", R::KIND.singular()), buffer))
        }
    }
    .map(|(title, buffer)| FormViewModel {
        title,
        fields: buffer
            .entries()
            .iter()
            .map(|entry| FieldViewModel {
                name: entry.spec.name,
                label: entry.spec.label,
                value: entry.value(),
                required: entry.spec.required,
                changed: entry.is_changed(),
            })
            .collect(),
        submit_enabled: !is_submitting,
    });

    ResourceViewModel {
        status,
        columns: R::COLUMNS,
        has_prev: page.has_prev(),
        has_next: page.has_next(),
        page: page.page,
        total_pages: page.total_pages,
        total_matches: page.total_matches,
        total_records: state.records().as_slice().len(),
        items: page.items,
        rows,
        search: state.search(),
        form,
        toast: state.toast(),
        is_submitting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Ticket;

    fn tickets() -> Vec<Ticket> {
        ["Economy", "Business", "First", "Economy Plus"]
            .iter()
            .enumerate()
            .map(|(i, class)| Ticket {
                ticket_class: class.to_string(),
                price: 100.0 * (i + 1) as f64,
            })
            .collect()
    }

    #[test]
    fn test_loading_view() {
        let state = ResourceState::<Ticket>::default();
        let view = compute_view_model(&state);
        assert_eq!(view.status, ListStatus::Loading);
        assert!(view.rows.is_empty());
        assert!(view.form.is_none());
        assert_eq!(view.columns, &["Class", "Price"]);
    }

    #[test]
    fn test_rows_follow_search() {
        let mut state = ResourceState::default();
        state.load(tickets());
        state.set_search("economy");
        let view = compute_view_model(&state);
        assert_eq!(view.status, ListStatus::Ready);
        assert_eq!(view.total_records, 4);
        assert_eq!(view.total_matches, 2);
        assert_eq!(
            view.rows,
            vec![
                vec!["Economy".to_string(), "100.00".to_string()],
                vec!["Economy Plus".to_string(), "400.00".to_string()],
            ]
        );
        assert!(!view.has_next);
        assert_eq!(view.search, "economy");
    }

    #[test]
    fn test_update_form_marks_changed_fields() {
        let mut state = ResourceState::default();
        state.load(tickets());
        state.open_update(1).unwrap();
        state.edit_field("price", "250").unwrap();

        let view = compute_view_model(&state);
        let form = view.form.unwrap();
        assert_eq!(form.title, "Update ticket 'Business at 200.00'");
        assert!(form.submit_enabled);
        let price = form.fields.iter().find(|f| f.name == "price").unwrap();
        assert!(price.changed);
        assert_eq!(price.value, "250");
        let class = form.fields.iter().find(|f| f.name == "ticket_class").unwrap();
        assert!(!class.changed);
    }

    #[test]
    fn test_submit_disabled_while_submitting() {
        let mut state = ResourceState::default();
        state.load(tickets());
        state.open_update(0).unwrap();
        state.edit_field("ticket_class", "Premium").unwrap();
        state.begin_submit().unwrap();

        let view = compute_view_model(&state);
        assert!(view.is_submitting);
        assert!(!view.form.unwrap().submit_enabled);
    }
}
