use std::fs;

use pricelist_map::{JsonTemplateStore, TemplateError, TemplateStore};
use pricelist_model::{CanonicalField, ColumnSelector, MappingTemplate, SourceFormat};
use tempfile::tempdir;

fn sysco_template() -> MappingTemplate {
    MappingTemplate::new("sysco", SourceFormat::RowTyped)
        .with_mapping(CanonicalField::Identifier, ColumnSelector::Name("SUPC".into()))
        .with_mapping(CanonicalField::Name, ColumnSelector::Name("Desc".into()))
        .with_mapping(CanonicalField::Brand, ColumnSelector::Index(6))
        .with_price_field(ColumnSelector::Name("Case $".into()))
        .with_default(CanonicalField::Location, "Dry Storage")
        .with_description("Weekly Sysco order guide")
}

#[test]
fn save_then_load_returns_the_same_template() {
    let dir = tempdir().unwrap();
    let mut store = JsonTemplateStore::new(dir.path().join("templates.json"));
    let template = sysco_template();

    store.save(&template).unwrap();
    let loaded = store.load("sysco").unwrap();
    assert_eq!(loaded, template);

    // A fresh store on the same file sees the template too.
    let reopened = JsonTemplateStore::new(store.path());
    assert_eq!(reopened.load("sysco").unwrap(), template);
}

#[test]
fn file_is_an_object_keyed_by_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("templates.json");
    let mut store = JsonTemplateStore::new(&path);
    store.save(&sysco_template()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let body = &value["sysco"];
    assert_eq!(body["sourceFormat"], "row_typed");
    assert_eq!(body["columnMapping"]["identifier"], "SUPC");
    assert_eq!(body["columnMapping"]["brand"], 6);
    assert_eq!(body["priceField"], "Case $");
    assert_eq!(body["defaults"]["location"], "Dry Storage");
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn list_is_sorted_and_save_overwrites() {
    let dir = tempdir().unwrap();
    let mut store = JsonTemplateStore::new(dir.path().join("templates.json"));
    for name in ["usfoods", "acme", "sysco"] {
        store
            .save(&MappingTemplate::new(name, SourceFormat::PlainHeadered))
            .unwrap();
    }
    store.save(&sysco_template()).unwrap();

    assert_eq!(store.list().unwrap(), vec!["acme", "sysco", "usfoods"]);
    assert_eq!(store.load("sysco").unwrap().source_format, SourceFormat::RowTyped);
}

#[test]
fn errors_for_unknown_and_blank_names() {
    let dir = tempdir().unwrap();
    let mut store = JsonTemplateStore::new(dir.path().join("templates.json"));

    let err = store.load("missing").unwrap_err();
    assert!(matches!(err, TemplateError::NotFound(ref name) if name == "missing"));
    assert!(err.suggestion().is_some());

    let err = store
        .save(&MappingTemplate::new("   ", SourceFormat::PlainHeadered))
        .unwrap_err();
    assert!(matches!(err, TemplateError::InvalidName(_)));
}

#[test]
fn corrupt_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("templates.json");
    fs::write(&path, "{ not json").unwrap();
    let store = JsonTemplateStore::new(&path);

    let err = store.list().unwrap_err();
    assert!(matches!(err, TemplateError::Json { .. }));
    assert!(err.user_message().contains("templates.json"));
}
