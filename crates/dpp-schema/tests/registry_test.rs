//! Integration tests for the schema registry

use dpp_mapping::{
    Fragment, FromConfig, MappedDocument, MapperConfig, PassportLayers, SchemaMapper,
    ValidationResult,
};
use dpp_model::{
    DigitalProductPassport, IdentityLayer, LifecycleLayer, Part, ProvenanceLayer, RiskLayer,
    StructureLayer, SustainabilityLayer,
};
use dpp_schema::{Error, SchemaInfo, SchemaRegistry, factory_of};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

/// Test mapper with a configurable schema name
#[derive(Debug)]
struct MockMapper {
    name: String,
    config: MapperConfig,
}

impl FromConfig for MockMapper {
    fn from_config(config: MapperConfig) -> Self {
        Self {
            name: "MOCK".to_string(),
            config,
        }
    }
}

impl SchemaMapper for MockMapper {
    fn config(&self) -> &MapperConfig {
        &self.config
    }
    fn schema_name(&self) -> &str {
        &self.name
    }
    fn schema_version(&self) -> &str {
        "1.0"
    }
    fn map_identity(&self, _: &IdentityLayer) -> dpp_mapping::Result<Fragment> {
        Ok(Fragment::new())
    }
    fn map_structure(&self, _: &StructureLayer) -> dpp_mapping::Result<Fragment> {
        Ok(Fragment::new())
    }
    fn map_lifecycle(&self, _: &LifecycleLayer) -> dpp_mapping::Result<Fragment> {
        Ok(Fragment::new())
    }
    fn map_risk(&self, _: &RiskLayer) -> dpp_mapping::Result<Fragment> {
        Ok(Fragment::new())
    }
    fn map_sustainability(&self, _: &SustainabilityLayer) -> dpp_mapping::Result<Fragment> {
        Ok(Fragment::new())
    }
    fn map_provenance(&self, _: &ProvenanceLayer) -> dpp_mapping::Result<Fragment> {
        Err(dpp_mapping::Error::layer("provenance", "not supported"))
    }
    fn validate_mapping(&self, _: &MappedDocument) -> ValidationResult {
        ValidationResult::valid()
    }
    fn context(&self) -> Fragment {
        Fragment::new()
    }
}

fn named_factory(name: &'static str) -> dpp_schema::MapperFactory {
    Arc::new(move |config| {
        Box::new(MockMapper {
            name: name.to_string(),
            config,
        }) as Box<dyn SchemaMapper>
    })
}

#[test]
fn test_alias_and_canonical_share_instance() -> anyhow::Result<()> {
    let mut registry = SchemaRegistry::new(testdata("config"));
    registry.register::<MockMapper>(&["mock_alias", "mock2"])?;

    let m1 = registry.get_mapper("MOCK", false)?;
    let m2 = registry.get_mapper("mock_alias", false)?;
    let m3 = registry.get_mapper("mock2", false)?;

    assert!(Arc::ptr_eq(&m1, &m2));
    assert!(Arc::ptr_eq(&m2, &m3));
    assert_eq!(m1.schema_name(), "MOCK");
    Ok(())
}

#[test]
fn test_force_reload_creates_new_instance() -> anyhow::Result<()> {
    let mut registry = SchemaRegistry::new(testdata("config"));
    registry.register::<MockMapper>(&[])?;

    let first = registry.get_mapper("MOCK", false)?;
    let reloaded = registry.get_mapper("MOCK", true)?;
    let cached = registry.get_mapper("MOCK", false)?;

    assert!(!Arc::ptr_eq(&first, &reloaded));
    assert!(Arc::ptr_eq(&reloaded, &cached));
    Ok(())
}

#[test]
fn test_unknown_schema_lists_available_names() {
    let mut registry = SchemaRegistry::with_builtin(testdata("config"));

    match registry.get_mapper("DIN-SPEC", false) {
        Err(Error::NotFound { name, available }) => {
            assert_eq!(name, "DIN-SPEC");
            assert_eq!(available, vec!["ECLASS", "ISA-95"]);
        }
        other => panic!("Expected NotFound, got {other:?}"),
    }

    let err = registry
        .map_dpp("DIN-SPEC", &DigitalProductPassport::default())
        .unwrap_err();
    assert!(err.to_string().contains("not registered"));
    assert!(err.to_string().contains("ISA-95"));
}

#[test]
fn test_builtin_mappers_receive_their_config() -> anyhow::Result<()> {
    let mut registry = SchemaRegistry::with_builtin(testdata("config"));

    let isa95 = registry.get_mapper("IEC62264", false)?;
    assert_eq!(isa95.schema_name(), "ISA-95");
    assert_eq!(
        isa95.config().domain_ids("Actuator", "isa95_type_ids"),
        vec!["X1", "X2"]
    );
    assert!(isa95.mapper_type().ends_with("Isa95Mapper"));

    let eclass = registry.get_mapper("EC", false)?;
    assert_eq!(eclass.schema_version(), "16.0");
    assert_eq!(
        eclass.mapping_config("eclass_version"),
        Some(&serde_json::json!("16.0"))
    );
    Ok(())
}

#[test]
fn test_missing_config_gives_empty_config() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut registry = SchemaRegistry::with_builtin(dir.path());

    assert!(registry.load_config("ISA-95").is_empty());
    let mapper = registry.get_mapper("isa95", false)?;
    assert!(mapper.config().is_empty());
    Ok(())
}

#[test]
fn test_malformed_config_gives_empty_config() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::copy(
        testdata("config/broken_mapping.yml"),
        dir.path().join("eclass_mapping.yml"),
    )?;
    fs::copy(
        testdata("config/list_mapping.yml"),
        dir.path().join("isa95_mapping.yml"),
    )?;

    let mut registry = SchemaRegistry::with_builtin(dir.path());
    assert!(registry.load_config("ECLASS").is_empty());
    assert!(registry.load_config("ISA-95").is_empty());
    assert!(registry.get_mapper("eclass", false)?.config().is_empty());
    Ok(())
}

#[test]
fn test_custom_config_reaches_mapper() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("mock_mapping.yml"),
        "schema_info:\n  version: X\n",
    )?;

    let mut registry = SchemaRegistry::new(dir.path());
    registry.register::<MockMapper>(&[])?;
    let mapper = registry.get_mapper("MOCK", false)?;

    assert_eq!(
        mapper.mapping_config("schema_info"),
        Some(&serde_json::json!({"version": "X"}))
    );
    Ok(())
}

#[test]
fn test_lazy_loader_runs_once_on_first_use() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut registry = SchemaRegistry::new(testdata("config"));
    registry.register_lazy(
        "MOCK",
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(factory_of::<MockMapper>())
        },
        &["lazy"],
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(registry.list_schemas(), vec!["MOCK"]);

    registry.get_mapper("lazy", false)?;
    registry.get_mapper("MOCK", true)?;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_lazy_loader_error_is_returned_unchanged() {
    let mut registry = SchemaRegistry::new(testdata("config"));
    registry.register_lazy(
        "GHOST",
        || {
            Err(Error::NotFound {
                name: "ghost-module".into(),
                available: Vec::new(),
            })
        },
        &[],
    );

    match registry.get_mapper("GHOST", false) {
        Err(Error::NotFound { name, .. }) => assert_eq!(name, "ghost-module"),
        other => panic!("Expected loader error, got {other:?}"),
    }
}

#[test]
fn test_lazy_factory_for_wrong_schema_is_type_mismatch() {
    let mut registry = SchemaRegistry::new(testdata("config"));
    registry.register_lazy("EXPECTED", || Ok(named_factory("SOMETHING_ELSE")), &[]);

    match registry.get_mapper("EXPECTED", false) {
        Err(Error::TypeMismatch { name, reason }) => {
            assert_eq!(name, "EXPECTED");
            assert!(reason.contains("SOMETHING_ELSE"));
        }
        other => panic!("Expected TypeMismatch, got {other:?}"),
    }

    // The entry stays unresolved, so the failure repeats
    assert!(matches!(
        registry.get_mapper("EXPECTED", false),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_nameless_mapper_is_rejected_at_registration() {
    let mut registry = SchemaRegistry::new(testdata("config"));
    let result = registry.register_factory(named_factory(""), &["blank"]);

    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
    assert!(registry.list_schemas().is_empty());
    assert!(registry.list_aliases("").is_empty());
}

#[test]
fn test_info_found_and_missing() -> anyhow::Result<()> {
    let mut registry = SchemaRegistry::with_builtin(testdata("config"));

    let info = registry.info("ISA95")?;
    match &info {
        SchemaInfo::Found {
            name,
            version,
            canonical_name,
            aliases,
            mapper_type,
        } => {
            assert_eq!(name, "ISA-95");
            assert_eq!(version, "V0600");
            assert_eq!(canonical_name, "ISA-95");
            assert_eq!(aliases, &vec!["ISA95", "isa95", "IEC62264"]);
            assert!(mapper_type.ends_with("Isa95Mapper"));
        }
        SchemaInfo::Missing { error } => panic!("Unexpected missing: {error}"),
    }
    assert_eq!(registry.info("ISA-95")?, info);

    let missing = registry.info("NOPE")?;
    let value = serde_json::to_value(&missing)?;
    assert!(value["error"].as_str().unwrap().contains("not registered"));
    Ok(())
}

#[test]
fn test_registry_delegates_mapping() -> anyhow::Result<()> {
    let mut registry = SchemaRegistry::with_builtin(testdata("config"));
    let text = fs::read_to_string(testdata("passport.json"))?;
    let passport = DigitalProductPassport::from_json_str(&text)?;

    let document = registry.map_dpp("isa95", &passport)?;
    assert_eq!(document.schema, "ISA-95");

    let from_layers = registry.map_layers("ISA-95", PassportLayers::from(&passport))?;
    assert_eq!(from_layers, document);

    let part = Part::new("A1", "Servo", "Actuator");
    let fragment = registry.map_part("ISA95", &part)?;
    assert_eq!(fragment["EquipmentClassID"], "X1");
    Ok(())
}

#[test]
fn test_layer_error_surfaces_through_registry() -> anyhow::Result<()> {
    let mut registry = SchemaRegistry::new(testdata("config"));
    registry.register::<MockMapper>(&[])?;

    match registry.map_dpp("MOCK", &DigitalProductPassport::default()) {
        Err(Error::Mapping(dpp_mapping::Error::Layer { layer, .. })) => {
            assert_eq!(layer, "provenance");
        }
        other => panic!("Expected layer error, got {other:?}"),
    }
    Ok(())
}
