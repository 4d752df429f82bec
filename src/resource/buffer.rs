//! Edit buffer backing the add and update forms
//!
//! Every entry remembers the value it was seeded with. An entry counts as
//! changed once its current text differs from that original, which is how
//! the update path knows which fields to send.

use jiff::civil::Date;

use crate::error::{AerodeskError, Result};

use super::{FieldKind, FieldSpec};

/// One form field with its seeded and current text
#[derive(Debug, Clone, PartialEq)]
pub struct BufferEntry {
    pub spec: FieldSpec,
    original: String,
    value: String,
}

impl BufferEntry {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_changed(&self) -> bool {
        self.value.trim() != self.original.trim()
    }
}

/// Transient copy of a record's fields while a form is open
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    entries: Vec<BufferEntry>,
}

impl EditBuffer {
    /// Empty buffer for the add form
    pub fn blank(fields: &[FieldSpec]) -> Self {
        Self::seeded(fields, &[])
    }

    /// Buffer pre-filled with a record's values for the update form.
    ///
    /// Fields without a seed value start empty.
    pub fn seeded(fields: &[FieldSpec], values: &[(&str, String)]) -> Self {
        let entries = fields
            .iter()
            .map(|spec| {
                let original = values
                    .iter()
                    .find(|(name, _)| *name == spec.name)
                    .map(|(_, value)| value.clone())
                    .unwrap_or_default();
                BufferEntry {
                    spec: *spec,
                    value: original.clone(),
                    original,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[BufferEntry] {
        &self.entries
    }

    fn entry(&self, name: &str) -> Result<&BufferEntry> {
        self.entries
            .iter()
            .find(|e| e.spec.name == name)
            .ok_or_else(|| AerodeskError::UnknownField(name.to_string()))
    }

    /// Replace the text of a field
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.spec.name == name)
            .ok_or_else(|| AerodeskError::UnknownField(name.to_string()))?;
        entry.value = value.into();
        Ok(())
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.entry(name).ok().map(|e| e.value.as_str())
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.entry(name).map(|e| e.is_changed()).unwrap_or(false)
    }

    pub fn has_changes(&self) -> bool {
        self.entries.iter().any(BufferEntry::is_changed)
    }

    /// Required text field
    pub fn text(&self, name: &str) -> Result<String> {
        let entry = self.entry(name)?;
        require_text(entry)
    }

    /// Required non-negative whole number
    pub fn integer(&self, name: &str) -> Result<i32> {
        let entry = self.entry(name)?;
        parse_integer(entry.spec, &require_text(entry)?)
    }

    /// Required non-negative decimal
    pub fn decimal(&self, name: &str) -> Result<f64> {
        let entry = self.entry(name)?;
        parse_decimal(entry.spec, &require_text(entry)?)
    }

    /// Required date, normalized to `YYYY-MM-DD`
    pub fn date(&self, name: &str) -> Result<String> {
        let entry = self.entry(name)?;
        parse_date(entry.spec, &require_text(entry)?)
    }

    /// Text of a changed field, `None` when untouched
    pub fn changed_text(&self, name: &str) -> Result<Option<String>> {
        self.changed(name, require_text)
    }

    /// Whole number of a changed field, `None` when untouched
    pub fn changed_integer(&self, name: &str) -> Result<Option<i32>> {
        self.changed(name, |entry| parse_integer(entry.spec, &require_text(entry)?))
    }

    /// Decimal of a changed field, `None` when untouched
    pub fn changed_decimal(&self, name: &str) -> Result<Option<f64>> {
        self.changed(name, |entry| parse_decimal(entry.spec, &require_text(entry)?))
    }

    fn changed<T>(
        &self,
        name: &str,
        parse: impl FnOnce(&BufferEntry) -> Result<T>,
    ) -> Result<Option<T>> {
        let entry = self.entry(name)?;
        if !entry.is_changed() {
            return Ok(None);
        }
        parse(entry).map(Some)
    }

    /// Check every field parses according to its kind.
    ///
    /// Empty optional fields are skipped; empty required fields are errors.
    pub fn validate(&self) -> Result<()> {
        for entry in &self.entries {
            let trimmed = entry.value.trim();
            if trimmed.is_empty() {
                if entry.spec.required {
                    return Err(blank(entry.spec));
                }
                continue;
            }
            match entry.spec.kind {
                FieldKind::Text => {}
                FieldKind::Integer => {
                    parse_integer(entry.spec, trimmed)?;
                }
                FieldKind::Decimal => {
                    parse_decimal(entry.spec, trimmed)?;
                }
                FieldKind::Date => {
                    parse_date(entry.spec, trimmed)?;
                }
            }
        }
        Ok(())
    }
}

fn blank(spec: FieldSpec) -> AerodeskError {
    AerodeskError::validation(spec.label, "must not be blank")
}

fn require_text(entry: &BufferEntry) -> Result<String> {
    let trimmed = entry.value.trim();
    if trimmed.is_empty() {
        return Err(blank(entry.spec));
    }
    Ok(trimmed.to_string())
}

fn parse_integer(spec: FieldSpec, raw: &str) -> Result<i32> {
    match raw.parse::<i32>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(AerodeskError::validation(
            spec.label,
            format!("'{raw}' is not a non-negative whole number"),
        )),
    }
}

fn parse_decimal(spec: FieldSpec, raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(AerodeskError::validation(
            spec.label,
            format!("'{raw}' is not a non-negative number"),
        )),
    }
}

fn parse_date(spec: FieldSpec, raw: &str) -> Result<String> {
    raw.parse::<Date>()
        .map(|d| d.to_string())
        .map_err(|_| {
            AerodeskError::validation(spec.label, format!("'{raw}' is not a YYYY-MM-DD date"))
        })
}
