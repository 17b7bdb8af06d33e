use setterfilter::attributes::{AttrValue, AttributeSpec, Selection, TypeTag};
use setterfilter::config::SetterFilterConfig;
use setterfilter::filters::{apply_chain, FilterRegistry, FilterTable};
use setterfilter::model::{ModelDef, ModelId, RecordKey};
use setterfilter::schema::Schema;
use setterfilter::store::{MemBackend, StorageBackend};
use setterfilter::{SetterFilterApi, SetterFilterError};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

type Api = SetterFilterApi<Schema, MemBackend>;

fn my_models() -> ModelDef {
    ModelDef::new(
        "my_models",
        vec![
            AttributeSpec::new("id", TypeTag::Integer),
            AttributeSpec::new("name", TypeTag::String),
            AttributeSpec::new("bio", TypeTag::Text),
            AttributeSpec::new("address", TypeTag::String),
        ],
    )
}

/// Api over `my_models`, with `f1`/`f2` filters that append their own name.
fn setup() -> (Api, ModelId) {
    let mut schema = Schema::new();
    schema
        .define(my_models())
        .define(ModelDef::subclass("special_models", "my_models"));

    let mut api = SetterFilterApi::new(schema, MemBackend::new(), SetterFilterConfig::default());
    api.register_filter("f1", |_, v: AttrValue| Ok(v.map_text(|s| s + "1")))
        .register_filter("f2", |_, v: AttrValue| Ok(v.map_text(|s| s + "2")));
    (api, ModelId::from("my_models"))
}

fn stored(api: &Api, record: &RecordKey, field: &str) -> AttrValue {
    api.read(record, field).unwrap().unwrap_or(AttrValue::Null)
}

#[test]
fn filters_applied_sequentially_to_all_attributes() {
    let (mut api, model) = setup();
    api.setter_filter(&model, ["downcase", "strip_vowels"], Selection::all())
        .unwrap();

    let record = api.new_record(&model).unwrap();
    api.assign_all(
        &record,
        [
            ("name", "ABCDEabcde"),
            ("bio", "ABCDEabcde"),
            ("address", "ABCDEabcde"),
        ],
    )
    .unwrap();

    for field in ["name", "bio", "address"] {
        assert_eq!(stored(&api, &record, field), AttrValue::from("bcdbcd"));
    }
}

#[test]
fn filters_applied_only_to_selected_attributes_in_order() {
    let (mut api, model) = setup();
    api.setter_filter(
        &model,
        ["downcase", "strip_vowels"],
        Selection::all().only(["name"]),
    )
    .unwrap();
    api.setter_filter(
        &model,
        ["strip_vowels", "downcase"],
        Selection::all().only(["bio"]),
    )
    .unwrap();

    let record = api.new_record(&model).unwrap();
    api.assign_all(
        &record,
        [
            ("name", "ABCDEabcde"),
            ("bio", "ABCDEabcde"),
            ("address", "ABCDEabcde"),
        ],
    )
    .unwrap();

    assert_eq!(stored(&api, &record, "name"), AttrValue::from("bcdbcd"));
    assert_eq!(stored(&api, &record, "bio"), AttrValue::from("abcdebcd"));
    assert_eq!(stored(&api, &record, "address"), AttrValue::from("ABCDEabcde"));
}

#[test]
fn only_and_except_declarations_get_their_own_order() {
    let (mut api, model) = setup();
    api.setter_filter(&model, ["f1", "f2"], Selection::all().only(["name"]))
        .unwrap();
    api.setter_filter(&model, ["f2", "f1"], Selection::all().except(["name"]))
        .unwrap();

    assert_eq!(api.chain_for(&model, "name").unwrap(), vec!["f1", "f2"]);
    assert_eq!(api.chain_for(&model, "bio").unwrap(), vec!["f2", "f1"]);

    let record = api.new_record(&model).unwrap();
    api.assign(&record, "name", "v").unwrap();
    api.assign(&record, "bio", "v").unwrap();
    assert_eq!(stored(&api, &record, "name"), AttrValue::from("v12"));
    assert_eq!(stored(&api, &record, "bio"), AttrValue::from("v21"));
}

#[test]
fn type_rules_merge_per_field() {
    let (mut api, model) = setup();
    api.setter_filter(&model, ["f1"], Selection::all().only_types([TypeTag::String]))
        .unwrap();
    api.setter_filter(
        &model,
        ["f2"],
        Selection::all().except_types([TypeTag::Text]),
    )
    .unwrap();

    assert_eq!(api.chain_for(&model, "name").unwrap(), vec!["f1", "f2"]);
    assert!(api.chain_for(&model, "bio").unwrap().is_empty());
    assert!(!api.is_filtered(&model, "bio").unwrap());

    let record = api.new_record(&model).unwrap();
    api.assign(&record, "name", "v").unwrap();
    api.assign(&record, "bio", "v").unwrap();
    assert_eq!(stored(&api, &record, "name"), AttrValue::from("v12"));
    assert_eq!(stored(&api, &record, "bio"), AttrValue::from("v"));
}

#[test]
fn separate_declarations_accumulate() {
    let (mut api, model) = setup();
    api.setter_filter(&model, ["f1"], Selection::all().only(["name"]))
        .unwrap();
    api.setter_filter(&model, ["f2"], Selection::all().only(["name"]))
        .unwrap();

    assert_eq!(api.chain_for(&model, "name").unwrap(), vec!["f1", "f2"]);
}

#[test]
fn reinstalling_does_not_double_apply() {
    let (mut api, model) = setup();
    api.setter_filter(&model, ["f1"], Selection::all().only(["name"]))
        .unwrap();
    api.setter_filter(&model, Vec::<String>::new(), Selection::all().only(["name"]))
        .unwrap();

    let record = api.new_record(&model).unwrap();
    api.assign(&record, "name", "v").unwrap();
    assert_eq!(stored(&api, &record, "name"), AttrValue::from("v1"));
}

#[test]
fn later_declarations_reach_existing_records() {
    let (mut api, model) = setup();
    api.setter_filter(&model, ["f1"], Selection::all().only(["name"]))
        .unwrap();
    let record = api.new_record(&model).unwrap();
    api.assign(&record, "name", "v").unwrap();
    assert_eq!(stored(&api, &record, "name"), AttrValue::from("v1"));

    api.setter_filter(&model, ["f2"], Selection::all()).unwrap();
    api.assign(&record, "name", "v").unwrap();
    assert_eq!(stored(&api, &record, "name"), AttrValue::from("v12"));
}

#[test]
fn undeclared_model_fields_pass_through() {
    let (api, model) = setup();
    let record = api.new_record(&model).unwrap();
    api.assign(&record, "name", "ABCDE").unwrap();
    api.assign(&record, "bio", AttrValue::Null).unwrap();
    assert_eq!(stored(&api, &record, "name"), AttrValue::from("ABCDE"));
    assert!(stored(&api, &record, "bio").is_null());
}

#[test]
fn identity_field_is_never_filtered() {
    let (mut api, model) = setup();
    api.setter_filter(&model, ["f1"], Selection::all()).unwrap();
    assert!(!api.is_filtered(&model, "id").unwrap());

    let record = api.new_record(&model).unwrap();
    api.assign(&record, "id", 7i64).unwrap();
    assert_eq!(stored(&api, &record, "id"), AttrValue::Int(7));
}

#[test]
fn failing_filter_aborts_assignment() {
    let (mut api, model) = setup();
    api.register_filter("reject_empty", |field, v: AttrValue| {
        if v.is_blank() {
            Err(SetterFilterError::Filter(format!("{} is blank", field)))
        } else {
            Ok(v)
        }
    });
    api.setter_filter(&model, ["f1", "reject_empty"], Selection::all().only(["name"]))
        .unwrap();

    let record = api.new_record(&model).unwrap();
    api.assign(&record, "name", "ok").unwrap();
    let err = api.assign(&record, "name", AttrValue::Null).unwrap_err();
    assert_eq!(err.to_string(), "Filter error: name is blank");
    assert_eq!(stored(&api, &record, "name"), AttrValue::from("ok1"));
}

#[test]
fn subclass_inherits_parent_chains_until_it_declares() {
    let (mut api, model) = setup();
    let special = ModelId::from("special_models");

    api.setter_filter(&model, ["f1"], Selection::all().only(["name"]))
        .unwrap();
    assert!(api.is_filtered(&special, "name").unwrap());
    assert_eq!(api.chain_for(&special, "name").unwrap(), vec!["f1"]);

    api.setter_filter(&special, ["f2"], Selection::all().only(["name", "bio"]))
        .unwrap();
    assert_eq!(api.chain_for(&special, "name").unwrap(), vec!["f1", "f2"]);
    assert_eq!(api.chain_for(&special, "bio").unwrap(), vec!["f2"]);

    // The parent is unaffected by the subclass declaration.
    assert_eq!(api.chain_for(&model, "name").unwrap(), vec!["f1"]);
    assert!(!api.is_filtered(&model, "bio").unwrap());

    let record = api.new_record(&special).unwrap();
    api.assign(&record, "name", "v").unwrap();
    assert_eq!(stored(&api, &record, "name"), AttrValue::from("v12"));
}

#[test]
fn custom_identity_field_is_excluded() {
    let mut schema = Schema::new();
    schema.define(ModelDef::new(
        "accounts",
        vec![
            AttributeSpec::new("uuid", TypeTag::String),
            AttributeSpec::new("email", TypeTag::String),
        ],
    ));
    let config = SetterFilterConfig {
        identity_field: "uuid".to_string(),
        ..Default::default()
    };
    let mut api = SetterFilterApi::new(schema, MemBackend::new(), config);
    let fields = api
        .setter_filter(&ModelId::from("accounts"), ["downcase"], Selection::all())
        .unwrap();
    assert_eq!(fields, vec!["email"]);
}

#[test]
fn chains_can_be_read_from_many_threads() {
    let mut registry = FilterRegistry::new();
    let lineage = vec![ModelId::from("my_models")];
    registry.append(&lineage, "name", ["downcase", "strip_vowels"]);
    let table = FilterTable::with_builtins();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let chain = registry.chain_for(&lineage, "name");
                    apply_chain(&table, chain, "name", AttrValue::from("ABCDEabcde")).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), AttrValue::from("bcdbcd"));
        }
    });
}

#[test]
fn repeated_schema_column_is_filtered_once() {
    let mut schema = Schema::new();
    schema.define(ModelDef::new(
        "dupes",
        vec![
            AttributeSpec::new("id", TypeTag::Integer),
            AttributeSpec::new("name", TypeTag::String),
            AttributeSpec::new("name", TypeTag::String),
        ],
    ));
    let mut api = SetterFilterApi::new(schema, MemBackend::new(), SetterFilterConfig::default());
    api.register_filter("f1", |_, v: AttrValue| Ok(v.map_text(|s| s + "1")));
    let model = ModelId::from("dupes");

    let fields = api.setter_filter(&model, ["f1"], Selection::all()).unwrap();
    assert_eq!(fields, vec!["name"]);
    assert_eq!(api.chain_for(&model, "name").unwrap(), vec!["f1"]);

    let record = api.new_record(&model).unwrap();
    api.assign(&record, "name", "v").unwrap();
    assert_eq!(stored(&api, &record, "name"), AttrValue::from("v1"));
}

#[test]
fn parent_declared_after_subclass_still_filters_subclass() {
    let (mut api, model) = setup();
    let special = ModelId::from("special_models");

    api.setter_filter(&special, ["upcase"], Selection::all().only(["bio"]))
        .unwrap();
    api.setter_filter(&model, ["downcase"], Selection::all().only(["name"]))
        .unwrap();

    assert!(api.is_filtered(&special, "name").unwrap());
    assert_eq!(api.chain_for(&special, "name").unwrap(), vec!["downcase"]);
    assert_eq!(api.chain_for(&special, "bio").unwrap(), vec!["upcase"]);
    assert!(api.chain_for(&model, "bio").unwrap().is_empty());

    let record = api.new_record(&special).unwrap();
    api.assign_all(&record, [("name", "ABC"), ("bio", "abc")])
        .unwrap();
    assert_eq!(stored(&api, &record, "name"), AttrValue::from("abc"));
    assert_eq!(stored(&api, &record, "bio"), AttrValue::from("ABC"));
}

/// Thread-safe backend for sharing one facade across threads.
#[derive(Default)]
struct LockedBackend {
    records: Mutex<HashMap<RecordKey, BTreeMap<String, AttrValue>>>,
}

impl LockedBackend {
    fn with_records<T>(
        &self,
        f: impl FnOnce(&mut HashMap<RecordKey, BTreeMap<String, AttrValue>>) -> T,
    ) -> setterfilter::Result<T> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| SetterFilterError::Store(e.to_string()))?;
        Ok(f(&mut records))
    }
}

impl StorageBackend for LockedBackend {
    fn create_record(&self, model: &ModelId) -> setterfilter::Result<RecordKey> {
        let key = RecordKey::new(model.clone());
        self.with_records(|records| {
            records.insert(key.clone(), BTreeMap::new());
        })?;
        Ok(key)
    }

    fn raw_write(
        &self,
        record: &RecordKey,
        field: &str,
        value: AttrValue,
    ) -> setterfilter::Result<()> {
        self.with_records(|records| {
            records
                .get_mut(record)
                .map(|values| {
                    values.insert(field.to_string(), value);
                })
                .ok_or_else(|| SetterFilterError::Store(format!("Record not found: {}", record)))
        })?
    }

    fn raw_read(&self, record: &RecordKey, field: &str) -> setterfilter::Result<Option<AttrValue>> {
        self.with_records(|records| {
            records
                .get(record)
                .map(|values| values.get(field).cloned())
                .ok_or_else(|| SetterFilterError::Store(format!("Record not found: {}", record)))
        })?
    }

    fn read_record(&self, record: &RecordKey) -> setterfilter::Result<BTreeMap<String, AttrValue>> {
        self.with_records(|records| {
            records
                .get(record)
                .cloned()
                .ok_or_else(|| SetterFilterError::Store(format!("Record not found: {}", record)))
        })?
    }
}

fn assert_sync<T: Sync>() {}

#[test]
fn facade_with_sync_backend_assigns_from_many_threads() {
    assert_sync::<SetterFilterApi<Schema, LockedBackend>>();

    let mut schema = Schema::new();
    schema.define(my_models());
    let mut api = SetterFilterApi::new(schema, LockedBackend::default(), SetterFilterConfig::default());
    let model = ModelId::from("my_models");
    api.setter_filter(&model, ["downcase", "strip_vowels"], Selection::all().only(["name"]))
        .unwrap();

    let api = &api;
    let records: Vec<RecordKey> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let model = model.clone();
                scope.spawn(move || {
                    let record = api.new_record(&model).unwrap();
                    api.assign_all(&record, [("name", "ABCDEabcde"), ("bio", "ABCDEabcde")])
                        .unwrap();
                    api.assign(&record, "address", format!("No. {}", i)).unwrap();
                    record
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, record) in records.iter().enumerate() {
        assert_eq!(api.read(record, "name").unwrap(), Some(AttrValue::from("bcdbcd")));
        assert_eq!(api.read(record, "bio").unwrap(), Some(AttrValue::from("ABCDEabcde")));
        assert_eq!(
            api.read(record, "address").unwrap(),
            Some(AttrValue::from(format!("No. {}", i)))
        );
    }
}
