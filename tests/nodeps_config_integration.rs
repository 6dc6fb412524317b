use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{json, Value};

struct TestProject {
    root: PathBuf,
}

impl TestProject {
    fn new(prefix: &str) -> Self {
        let root = unique_temp_dir(prefix);
        fs::create_dir_all(root.join("data")).expect("create data dir");
        fs::write(
            root.join("data").join("nodes.csv"),
            "id,name,shortName\n\
             x,Import Kunden,IMP\n\
             y,Load,LOAD\n\
             z,Prepare,PREP\n\
             PAR,Parallelisierung,Parallelisierung\n\
             end,Report,REP\n",
        )
        .expect("write node csv");
        fs::write(
            root.join("data").join("edges.csv"),
            "predecessor,successor\nx,PAR\nz,y\ny,PAR\nPAR,end\n",
        )
        .expect("write edge csv");
        fs::write(
            root.join("batchgraph.toml"),
            r#"[sources]
nodes = "data/nodes.csv"
edges = "data/edges.csv"

[graph]
sentinel = "PAR"
node_name = "raw"

[[labels.abbreviations]]
pattern = "^Parallelisierung$"
replacement = "||"
"#,
        )
        .expect("write config");
        Self { root }
    }

    fn command(&self, cwd: &Path) -> Command {
        let mut cmd = Command::new(batchgraph_bin());
        cmd.current_dir(cwd)
            .env_remove("BATCHGRAPH_CONFIG")
            .env_remove("BATCHGRAPH_NODES")
            .env_remove("BATCHGRAPH_EDGES")
            .env_remove("BATCHGRAPH_LOG");
        cmd
    }

    fn run_json(&self, cmd: &mut Command) -> Value {
        let output: Output = cmd.output().expect("run batchgraph");
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        assert!(
            output.status.success(),
            "batchgraph failed\nstdout:\n{stdout}\nstderr:\n{stderr}"
        );
        serde_json::from_slice(&output.stdout).expect("parse batchgraph json")
    }
}

impl Drop for TestProject {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn batchgraph_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_batchgraph"))
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("batchgraph-{prefix}-{pid}-{nanos}"))
}

fn node_ids(graph: &Value) -> Vec<String> {
    graph["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .map(|node| node["id"].as_str().expect("node id").to_string())
        .collect()
}

#[test]
fn nodeps_ids_use_configured_sentinel() {
    let project = TestProject::new("nodeps-ids");
    let ids = project.run_json(
        project
            .command(&project.root)
            .args(["nodeps", "--ids-only", "--format", "json"]),
    );
    assert_eq!(ids, json!(["x"]));
}

#[test]
fn nodeps_ids_reject_unknown_format() {
    let project = TestProject::new("nodeps-format");
    let output = project
        .command(&project.root)
        .args(["--no-color", "nodeps", "--ids-only", "--format", "svg"])
        .output()
        .expect("run batchgraph");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown format 'svg'"), "stderr: {stderr}");

    let output = project
        .command(&project.root)
        .args(["nodeps", "--ids-only", "--format", "TEXT"])
        .output()
        .expect("run batchgraph");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "x\n");
}

#[test]
fn nodeps_graph_drops_starters_and_their_links() {
    let project = TestProject::new("nodeps-graph");
    let graph = project.run_json(project.command(&project.root).arg("nodeps"));
    assert_eq!(graph["inited"], json!(true));
    assert_eq!(node_ids(&graph), vec!["y", "z", "PAR", "end"]);
    let links: Vec<(String, String)> = graph["links"]
        .as_array()
        .expect("links array")
        .iter()
        .map(|link| {
            (
                link["source"].as_str().expect("source id").to_string(),
                link["target"].as_str().expect("target id").to_string(),
            )
        })
        .collect();
    assert_eq!(
        links,
        vec![
            ("z".to_string(), "y".to_string()),
            ("y".to_string(), "PAR".to_string()),
            ("PAR".to_string(), "end".to_string()),
        ]
    );
}

#[test]
fn sentinel_flag_overrides_config() {
    let project = TestProject::new("nodeps-flag");
    let ids = project.run_json(project.command(&project.root).args([
        "nodeps",
        "--sentinel",
        "y",
        "--ids-only",
    ]));
    assert_eq!(ids, json!(["z"]));
}

#[test]
fn config_is_discovered_from_nested_directory() {
    let project = TestProject::new("config-discovery");
    let nested = project.root.join("a").join("b");
    fs::create_dir_all(&nested).expect("create nested dir");
    let graph = project.run_json(project.command(&nested).arg("graph"));
    assert_eq!(graph["nodes"].as_array().map(Vec::len), Some(5));
    let par = &graph["nodes"][3];
    assert_eq!(par["name"], json!("Parallelisierung"));
    assert_eq!(par["label"], json!("||"));
}

#[test]
fn env_override_replaces_configured_source() {
    let project = TestProject::new("config-env");
    fs::write(
        project.root.join("data").join("other.csv"),
        "id,name,shortName\nonly,Only,ONLY\n",
    )
    .expect("write alternate nodes");
    let graph = project.run_json(
        project
            .command(&project.root)
            .env("BATCHGRAPH_NODES", project.root.join("data").join("other.csv"))
            .arg("graph"),
    );
    assert_eq!(node_ids(&graph), vec!["only"]);
}

#[test]
fn explicit_config_flag_wins_over_discovery() {
    let project = TestProject::new("config-explicit");
    fs::create_dir_all(project.root.join("alt")).expect("create alt dir");
    fs::write(
        project.root.join("alt").join("nodes.csv"),
        "id,name,shortName\nq,Q,Q\n",
    )
    .expect("write alt nodes");
    fs::write(
        project.root.join("alt").join("edges.csv"),
        "predecessor,successor\n",
    )
    .expect("write alt edges");
    fs::write(
        project.root.join("alt").join("alt.toml"),
        "[sources]\nnodes = \"nodes.csv\"\nedges = \"edges.csv\"\n",
    )
    .expect("write alt config");

    let graph = project.run_json(
        project
            .command(&project.root)
            .arg("--config")
            .arg(project.root.join("alt").join("alt.toml"))
            .arg("graph"),
    );
    assert_eq!(node_ids(&graph), vec!["q"]);
    assert_eq!(graph["nodes"][0]["name"], json!("q"));
}

#[test]
fn resolved_graph_inlines_endpoints() {
    let project = TestProject::new("graph-resolved");
    let graph = project.run_json(
        project
            .command(&project.root)
            .args(["graph", "--resolved"]),
    );
    assert_eq!(
        graph["links"][0]["source"],
        json!({"id": "x", "name": "Import Kunden", "label": "IMP"})
    );
}
