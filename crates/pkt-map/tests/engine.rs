use chrono::NaiveDate;
use pkt_map::{
    AutoMapConfig, AutoMapper, ResolveContext, build_candidates, resolve_field_values, suggest,
};
use pkt_model::{
    FieldHint, FieldMapping, MappingTarget, PdfField, PdfFieldType, Recipient, RecipientSource,
    normalize,
};

fn permission_slip_fields() -> Vec<PdfField> {
    vec![
        PdfField::text("First Name"),
        PdfField::text("LastName"),
        PdfField::text("Parent Email"),
        PdfField::text("Room #"),
        PdfField::text("Initials"),
        PdfField::new("Parent Signature", PdfFieldType::Signature),
        PdfField::text("Signature Date"),
        PdfField::text("Notes"),
    ]
}

#[test]
fn auto_map_fills_obvious_fields_only() {
    let candidates = build_candidates(&["Room #", "Grade"]);
    let mut mapping = FieldMapping::new();
    let fields = permission_slip_fields();
    let report = AutoMapper::default().auto_map(&fields, &candidates, &mut mapping);

    assert_eq!(mapping.get("First Name"), Some("FirstName"));
    assert_eq!(mapping.get("LastName"), Some("LastName"));
    assert_eq!(mapping.get("Parent Email"), Some("Email"));
    assert_eq!(mapping.get("Initials"), Some("__computed__:initials"));
    assert!(!mapping.is_mapped("Notes"));

    assert_eq!(
        report.signature_fields,
        vec!["Parent Signature".to_string(), "Signature Date".to_string()]
    );
    assert!(report.unmapped.contains(&"Notes".to_string()));
    assert!(report.preserved.is_empty());
}

#[test]
fn signature_fields_never_mapped() {
    let headers = ["Signature", "Parent Signature", "Signed", "Signature Date"];
    let candidates = build_candidates(&headers);
    for name in [
        "Signature",
        "Parent Signature",
        "Signature Date",
        "DateSigned",
        "sig",
    ] {
        let field = normalize(name);
        assert_eq!(field.hint, FieldHint::Signature, "{name}");
        assert_eq!(suggest(&field, &candidates), None, "{name}");

        let lenient = AutoMapper::new(AutoMapConfig {
            min_score: 0.0,
            min_margin: 0.0,
        });
        assert_eq!(lenient.suggest(&field, &candidates), None, "{name}");
    }
}

#[test]
fn numbered_columns_are_ambiguous() {
    // Both "Date 1" and "Date 2" normalize to ["date"] and tie at 1.35.
    let candidates = build_candidates(&["Date 1", "Date 2"]);
    assert_eq!(suggest(&normalize("Date"), &candidates), None);

    let single = build_candidates(&["Date 1"]);
    assert_eq!(
        suggest(&normalize("Date"), &single).as_deref(),
        Some("Date 1")
    );
}

#[test]
fn today_never_auto_assigned() {
    let candidates = build_candidates::<&str>(&[]);
    assert_eq!(suggest(&normalize("Today's Date"), &candidates), None);
}

#[test]
fn manual_mappings_survive_and_rerun_is_noop() {
    let fields = permission_slip_fields();
    let candidates = build_candidates(&["Room #"]);
    let mut mapping = FieldMapping::new();
    mapping.set("First Name", &MappingTarget::ComputedBlank);

    let mapper = AutoMapper::default();
    let first = mapper.auto_map(&fields, &candidates, &mut mapping);
    assert_eq!(mapping.get("First Name"), Some("__computed__:blank"));
    assert_eq!(first.preserved, vec!["First Name".to_string()]);

    let snapshot = mapping.clone();
    let second = mapper.auto_map(&fields, &candidates, &mut mapping);
    assert_eq!(mapping, snapshot);
    assert!(second.mapped.is_empty());
}

#[test]
fn resolves_values_for_fill() {
    let fields = permission_slip_fields();
    let mut mapping = FieldMapping::new();
    mapping.set("First Name", &MappingTarget::parse("FirstName"));
    mapping.set("Room #", &MappingTarget::CsvHeader("Room #".into()));
    mapping.set("Signature Date", &MappingTarget::ComputedToday);
    mapping.set("Initials", &MappingTarget::ComputedInitials);
    mapping.insert("Not On This Form", "Email");

    let recipient = Recipient::new("Ann", "Lee", "ann@x.com", RecipientSource::Csv)
        .with_custom_field("room #", "14");
    let ctx = ResolveContext::new(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap());

    let values = resolve_field_values(&fields, &mapping, &recipient, &ctx);
    assert_eq!(values.len(), 4);
    assert_eq!(values["First Name"], "Ann");
    assert_eq!(values["Room #"], "14");
    assert_eq!(values["Signature Date"], "09/01/2025");
    assert_eq!(values["Initials"], "AL");
}

#[test]
fn signature_widgets_skipped_regardless_of_name() {
    let fields = vec![PdfField::new("Parent Name", PdfFieldType::Signature)];
    let candidates = build_candidates(&["Grade"]);
    let mut mapping = FieldMapping::new();
    let report = AutoMapper::default().auto_map(&fields, &candidates, &mut mapping);

    assert!(mapping.is_empty());
    assert_eq!(report.signature_fields, vec!["Parent Name".to_string()]);
    assert!(report.mapped.is_empty());
    assert!(report.unmapped.is_empty());
}

#[test]
fn near_tie_below_margin_is_ambiguous() {
    // 1.0 against 6/7: a lead of about 0.143.
    let field = normalize("Bus Route Stop Zone Pickup Window Code");
    let candidates = build_candidates(&[
        "Bus Route Stop Zone Pickup Window Code",
        "Bus Route Stop Zone Pickup Window",
    ]);
    assert_eq!(suggest(&field, &candidates), None);

    let single = build_candidates(&["Bus Route Stop Zone Pickup Window Code"]);
    assert_eq!(
        suggest(&field, &single).as_deref(),
        Some("Bus Route Stop Zone Pickup Window Code")
    );
}

#[test]
fn lead_of_exactly_the_margin_is_accepted() {
    // 1.0 against 17/20 with the default thresholds.
    let words: Vec<String> = ('a'..='t').map(|c| format!("w{c}")).collect();
    let full = words.join(" ");
    let partial = words[..17].join(" ");
    let candidates = build_candidates(&[full.as_str(), partial.as_str()]);
    assert_eq!(
        suggest(&normalize(&full), &candidates).as_deref(),
        Some(full.as_str())
    );

    // 0.5 - 0.4 lands just under 0.1 in floating point.
    let mapper = AutoMapper::new(AutoMapConfig {
        min_score: 0.0,
        min_margin: 0.1,
    });
    let candidates = build_candidates(&["Bus Route Stop Zone", "Bus Route Stop Zone Code"]);
    assert_eq!(
        mapper.suggest(&normalize("Bus Route"), &candidates).as_deref(),
        Some("Bus Route Stop Zone")
    );
}
