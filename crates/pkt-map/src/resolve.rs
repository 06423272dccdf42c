//! Turning a field mapping into concrete per-recipient values.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;
use pkt_model::{FieldMapping, MappingTarget, PdfField, Recipient};

/// Date format used for the computed "today" value when none is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Inputs for computed values that do not come from the recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveContext {
    pub today: NaiveDate,
    /// `chrono` strftime format for [`MappingTarget::ComputedToday`].
    pub date_format: String,
}

impl ResolveContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    /// Context for the current local date.
    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Formats `today`, falling back to [`DEFAULT_DATE_FORMAT`] when the
    /// configured format is invalid.
    pub fn formatted_today(&self) -> String {
        let mut out = String::new();
        if write!(out, "{}", self.today.format(&self.date_format)).is_err() {
            tracing::warn!(format = %self.date_format, "invalid date format, using default");
            return self.today.format(DEFAULT_DATE_FORMAT).to_string();
        }
        out
    }
}

/// Value of one mapping target for one recipient.
///
/// A CSV header that no longer resolves (stale mapping after a re-import)
/// yields an empty string.
pub fn resolve_target(
    target: &MappingTarget,
    recipient: &Recipient,
    ctx: &ResolveContext,
) -> String {
    match target {
        MappingTarget::BuiltIn(property) => recipient.property(*property).unwrap_or_default(),
        MappingTarget::ComputedToday => ctx.formatted_today(),
        MappingTarget::ComputedInitials => recipient.initials(),
        MappingTarget::ComputedBlank => String::new(),
        MappingTarget::CsvHeader(header) => recipient.value_for_key(header).unwrap_or_default(),
    }
}

/// Field name -> value for every mapped field in `fields`.
///
/// Unmapped fields are absent from the result, so a PDF engine leaves them
/// untouched.
pub fn resolve_field_values(
    fields: &[PdfField],
    mapping: &FieldMapping,
    recipient: &Recipient,
    ctx: &ResolveContext,
) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter_map(|field| {
            let target = mapping.target_for(&field.name)?;
            Some((field.name.clone(), resolve_target(&target, recipient, ctx)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkt_model::{BuiltInProperty, RecipientSource};

    fn ctx() -> ResolveContext {
        ResolveContext::new(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
    }

    fn jane() -> Recipient {
        Recipient::new("Jane", "Doe", "jane@x.com", RecipientSource::Csv)
            .with_custom_field("Room #", "12")
    }

    #[test]
    fn test_resolve_targets() {
        let jane = jane();
        let ctx = ctx();
        assert_eq!(
            resolve_target(&MappingTarget::BuiltIn(BuiltInProperty::FullName), &jane, &ctx),
            "Jane Doe"
        );
        assert_eq!(resolve_target(&MappingTarget::ComputedToday, &jane, &ctx), "03/09/2024");
        assert_eq!(resolve_target(&MappingTarget::ComputedInitials, &jane, &ctx), "JD");
        assert_eq!(resolve_target(&MappingTarget::ComputedBlank, &jane, &ctx), "");
        assert_eq!(
            resolve_target(&MappingTarget::CsvHeader("Room #".into()), &jane, &ctx),
            "12"
        );
        assert_eq!(
            resolve_target(&MappingTarget::CsvHeader("Gone".into()), &jane, &ctx),
            ""
        );
    }

    #[test]
    fn test_date_format() {
        let ctx = ctx().with_date_format("%Y-%m-%d");
        assert_eq!(ctx.formatted_today(), "2024-03-09");

        let broken = ctx.with_date_format("%Q");
        assert_eq!(broken.formatted_today(), "03/09/2024");
    }

    #[test]
    fn test_missing_phone_is_empty() {
        let target = MappingTarget::BuiltIn(BuiltInProperty::PhoneNumber);
        assert_eq!(resolve_target(&target, &jane(), &ctx()), "");
    }
}
