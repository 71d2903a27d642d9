use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn cargo_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dpp"))
}

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

fn run_dpp(args: &[&str]) -> Output {
    Command::new(cargo_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run dpp")
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success; stdout: {}; stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should contain valid JSON")
}

#[test]
fn schemas_lists_builtins_with_aliases() {
    let output = run_dpp(&["schemas"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "ECLASS (aliases: eclass, EC)",
            "ISA-95 (aliases: ISA95, isa95, IEC62264)"
        ]
    );
}

#[test]
fn info_resolves_alias() {
    let config_dir = path_arg(&testdata("config"));
    let output = run_dpp(&["--config-dir", &config_dir, "info", "isa95"]);
    assert_success(&output);

    let info = stdout_json(&output);
    assert_eq!(info["name"], "ISA-95");
    assert_eq!(info["canonical_name"], "ISA-95");
    assert_eq!(info["version"], "V0600");
    assert_eq!(info["aliases"], serde_json::json!(["ISA95", "isa95", "IEC62264"]));
}

#[test]
fn info_for_unknown_schema_fails() {
    let output = run_dpp(&["info", "AAS"]);
    assert!(!output.status.success());

    let info = stdout_json(&output);
    assert!(info["error"].as_str().unwrap().contains("AAS"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR:"));
}

#[test]
fn map_passport_file_with_config() {
    let config_dir = path_arg(&testdata("config"));
    let input = path_arg(&testdata("passport.json"));
    let output = run_dpp(&[
        "--config-dir",
        &config_dir,
        "map",
        "--schema",
        "ISA95",
        "--input",
        &input,
    ]);
    assert_success(&output);

    let document = stdout_json(&output);
    assert_eq!(document["schema"], "ISA-95");
    let equipment = document["structure"]["NestedEquipment"].as_array().unwrap();
    assert_eq!(equipment.len(), 4);
    let actuator = equipment.iter().find(|e| e["ID"] == "M-100").unwrap();
    assert_eq!(actuator["EquipmentClassID"], "X1");
}

#[test]
fn map_yaml_passport_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("mapped.json");
    let input = path_arg(&testdata("passport.yaml"));
    let output = run_dpp(&[
        "map",
        "--schema",
        "eclass",
        "--input",
        &input,
        "--output",
        &path_arg(&out),
    ]);
    assert_success(&output);
    assert!(output.stdout.is_empty());

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(document["schema"], "ECLASS");
    assert_eq!(document["identity"]["productId"], "FAN-77");
}

#[test]
fn map_defaults_to_sample_passport() {
    let output = run_dpp(&["map", "--schema", "EC"]);
    assert_success(&output);

    let document = stdout_json(&output);
    let components = document["structure"]["components"].as_array().unwrap();
    assert_eq!(components.len(), 51);
    assert_eq!(document["identity"]["brand"], "BaristaPro");
}

#[test]
fn map_with_unknown_schema_fails() {
    let output = run_dpp(&["map", "--schema", "AAS"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR:"));
    assert!(stderr.contains("Schema 'AAS' not registered"));
}

#[test]
fn map_with_invalid_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.json");
    fs::write(&input, "{ not json").unwrap();

    let output = run_dpp(&["map", "--schema", "ECLASS", "--input", &path_arg(&input)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid passport"));
}

#[test]
fn sample_round_trips() {
    let output = run_dpp(&["sample"]);
    assert_success(&output);

    let passport = stdout_json(&output);
    assert_eq!(passport["structure"]["parts"].as_array().unwrap().len(), 51);
    assert_eq!(passport["identity"]["global_ids"]["serial"], "CM2025-001");
}

#[test]
fn classify_eclass_then_map_with_generated_table() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("config");
    let table = config_dir.join("eclass_mapping.yml");
    let examples = dir.path().join("examples.json");

    let output = run_dpp(&[
        "classify",
        "eclass",
        "--dir",
        &path_arg(&testdata("eclass")),
        "--output",
        &path_arg(&table),
        "--examples",
        &path_arg(&examples),
    ]);
    assert_success(&output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Classify summary: files=3, parsed=2, skipped=1, classified=3/7"),
        "stderr: {stderr}"
    );
    assert!(stderr.contains("malformed.xml"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Actuator: 1 classes, 2 items"));

    let parts: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&examples).unwrap()).unwrap();
    assert_eq!(parts.as_array().unwrap().len(), 15);

    let output = run_dpp(&["--config-dir", &path_arg(&config_dir), "map", "--schema", "ECLASS"]);
    assert_success(&output);
    let document = stdout_json(&output);
    let components = document["structure"]["components"].as_array().unwrap();
    let pump = components.iter().find(|c| c["id"] == "M01-MainPump").unwrap();
    assert_eq!(pump["eclassIrdi"], "0173-1#01-AKE795#017");
    assert_eq!(
        pump["eclassItemIds"],
        serde_json::json!(["0173-1#01-AKE796#017", "0173-1#01-AKE797#017"])
    );
}

#[test]
fn classify_empty_corpus_writes_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("isa95_mapping.yml");

    let output = run_dpp(&[
        "classify",
        "isa95",
        "--dir",
        &path_arg(dir.path()),
        "--output",
        &path_arg(&table),
    ]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("classified=0/0"));

    let value: serde_yaml::Value = serde_yaml::from_str(&fs::read_to_string(&table).unwrap()).unwrap();
    assert_eq!(value["total_definitions"].as_u64(), Some(0));
    let domains = value["domain_mappings"].as_mapping().unwrap();
    assert_eq!(domains.len(), 15);
    assert!(domains.values().all(|entry| {
        entry["isa95_type_ids"].as_sequence().is_some_and(Vec::is_empty)
    }));
}
