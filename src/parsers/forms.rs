use crate::error::ScrapeError;
use crate::parsers::selector;
use crate::results::{Form, FormInput};
use scraper::Html;

/// CSS selector for the controls collected from a form
pub const FIELD_SELECTOR: &str = "input, select, textarea";

/// Attribute values of one `<form>`, as read from the DOM
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub action: Option<String>,
    pub method: Option<String>,
    pub fields: Vec<FieldSnapshot>,
}

/// Attribute values of one form control
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSnapshot {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub placeholder: Option<String>,
    /// Whether the `required` attribute is present
    pub required: bool,
}

/// Applies the form defaults to a set of snapshots.
///
/// A missing or empty action becomes "", a missing or empty method becomes
/// GET. Methods are uppercased. Controls without a type are text inputs.
pub fn extract_forms(snapshots: Vec<FormSnapshot>) -> Vec<Form> {
    snapshots
        .into_iter()
        .map(|form| Form {
            action: form.action.unwrap_or_default(),
            method: non_empty(form.method)
                .unwrap_or_else(|| "GET".to_string())
                .to_uppercase(),
            inputs: form
                .fields
                .into_iter()
                .map(|field| FormInput {
                    kind: non_empty(field.kind).unwrap_or_else(|| "text".to_string()),
                    name: field.name.unwrap_or_default(),
                    placeholder: field.placeholder.unwrap_or_default(),
                    required: field.required,
                })
                .collect(),
        })
        .collect()
}

/// Reads form snapshots from static markup, for pages parsed without a browser
pub fn snapshot_forms(doc: &Html) -> Result<Vec<FormSnapshot>, ScrapeError> {
    let form_selector = selector("form")?;
    let field_selector = selector(FIELD_SELECTOR)?;

    Ok(doc
        .select(&form_selector)
        .map(|form| FormSnapshot {
            action: attr(form.value().attr("action")),
            method: attr(form.value().attr("method")),
            fields: form
                .select(&field_selector)
                .map(|field| {
                    let element = field.value();
                    FieldSnapshot {
                        kind: attr(element.attr("type")),
                        name: attr(element.attr("name")),
                        placeholder: attr(element.attr("placeholder")),
                        required: element.attr("required").is_some(),
                    }
                })
                .collect(),
        })
        .collect())
}

fn attr(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
