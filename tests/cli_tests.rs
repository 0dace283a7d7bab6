use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    _dir: TempDir,
    data_root: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_root = dir.path().join("resources");

        let alabama = data_root.join("alabama").join("counties");
        fs::create_dir_all(&alabama).unwrap();
        write_county(&alabama, "01001.json", "Autauga", "Alabama", 30.0, 70.0);
        write_county(&alabama, "01003.json", "Baldwin", "Alabama", 55.0, 45.0);

        let wyoming = data_root.join("wyoming").join("counties");
        fs::create_dir_all(&wyoming).unwrap();
        write_county(&wyoming, "56001.json", "Albany", "Wyoming", 48.0, 52.0);

        Self {
            _dir: dir,
            data_root,
        }
    }
}

fn write_county(dir: &Path, file: &str, name: &str, state: &str, young: f32, old: f32) {
    let mut f = File::create(dir.join(file)).unwrap();
    write!(
        f,
        r#"{{
            "name": "{}",
            "state": "{}",
            "population": 50000,
            "demographics": {{ "ages": {{ "0-20": {}, "21-99": {} }} }}
        }}"#,
        name, state, young, old
    )
    .unwrap();
}

fn build_binary() {
    let _ = Command::new("cargo")
        .arg("build")
        .arg("--release")
        .status()
        .unwrap();
}

fn run_search(ctx: &TestContext, extra: &[&str]) -> Output {
    let mut args = vec![
        "search",
        "--data",
        ctx.data_root.to_str().unwrap(),
        "--max-steps",
        "200",
        "-S",
        "7",
        "--seed-effects",
        "--descriptor-cap",
        "8",
    ];
    args.extend_from_slice(extra);

    Command::new("./target/release/demoforge")
        .args(&args)
        .output()
        .expect("Failed to execute binary")
}

// Accepted means are the bare numeric stdout lines; table and summary rows
// never parse as a float whole.
fn score_stream(stdout: &str) -> Vec<f32> {
    stdout
        .lines()
        .filter_map(|line| line.trim().parse::<f32>().ok())
        .collect()
}

#[test]
fn test_cli_search_execution() {
    build_binary();
    let ctx = TestContext::new();

    let output = run_search(&ctx, &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SEARCH COMPLETE"));
    assert!(stdout.contains("Mean score:"));
    assert!(!score_stream(&stdout).is_empty());
}

#[test]
fn test_cli_score_stream_never_regresses() {
    build_binary();
    let ctx = TestContext::new();

    let output = run_search(&ctx, &[]);
    let stream = score_stream(&String::from_utf8_lossy(&output.stdout));

    for pair in stream.windows(2) {
        assert!(pair[1] >= pair[0], "stream regressed: {:?}", pair);
    }
}

#[test]
fn test_cli_same_seed_reproduces_the_stream() {
    build_binary();
    let ctx = TestContext::new();

    let first = run_search(&ctx, &[]);
    let second = run_search(&ctx, &[]);

    let stream_a = score_stream(&String::from_utf8_lossy(&first.stdout));
    let stream_b = score_stream(&String::from_utf8_lossy(&second.stdout));
    assert!(!stream_a.is_empty());
    assert_eq!(stream_a, stream_b);
}

#[test]
fn test_cli_score_audit() {
    build_binary();
    let ctx = TestContext::new();

    let output = Command::new("./target/release/demoforge")
        .args([
            "score",
            "--data",
            ctx.data_root.to_str().unwrap(),
            "--descriptor-cap",
            "8",
        ])
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("COUNTY AUDIT"));
    assert!(stdout.contains("Autauga"));
    assert!(stdout.contains("MEAN"));
}

#[test]
fn test_cli_rejects_unknown_method() {
    build_binary();
    let ctx = TestContext::new();

    let output = run_search(&ctx, &["--method", "manhattan"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown similarity method: manhattan"));
}

#[test]
fn test_cli_writes_final_dump() {
    build_binary();
    let ctx = TestContext::new();
    let dump = ctx._dir.path().join("final.txt");

    let output = run_search(&ctx, &["-o", dump.to_str().unwrap()]);
    assert!(output.status.success());

    let body = fs::read_to_string(&dump).unwrap();
    assert!(body.contains("Autauga, Alabama | population: 50000"));
    assert!(body.contains("\"Nation\" : {"));
}
