use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    if let Some(path) = env::var_os("CARGO_BIN_EXE_chatmark") {
        return PathBuf::from(path);
    }
    let exe = env::current_exe().expect("current exe");
    let mut debug_dir = exe.as_path();
    while let Some(parent) = debug_dir.parent() {
        if parent.file_name().and_then(|name| name.to_str()) == Some("debug") {
            let candidate = parent.join("chatmark");
            if candidate.exists() {
                return candidate;
            }
        }
        debug_dir = parent;
    }
    panic!("binary path missing");
}

fn temp_file(name: &str, extension: &str, contents: &str) -> PathBuf {
    let mut path = env::temp_dir();
    let now = SystemTime::now().duration_since(UNIX_EPOCH).expect("time");
    let file_name = format!(
        "chatmark_cli_{}_{}_{}.{}",
        name,
        now.as_secs(),
        now.subsec_nanos(),
        extension
    );
    path.push(file_name);
    fs::write(&path, contents).expect("write temp file");
    path
}

#[test]
fn renders_a_file() {
    let input = temp_file("file", "md", "# Hi\n\n**there**\n");
    let output = Command::new(bin_path())
        .args(["--no-math", input.to_str().expect("path")])
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), "<h1>Hi</h1>\n<p><strong>there</strong></p>");
}

#[test]
fn reads_stdin_when_no_input_is_given() {
    let mut child = Command::new(bin_path())
        .arg("--no-math")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"a < b")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), "<p>a &lt; b</p>");
}

#[test]
fn citations_file_is_applied() {
    let input = temp_file("cited", "md", "See [S1].\n");
    let citations = temp_file(
        "citations",
        "json",
        r#"[{"matchedText": "[S1]", "items": [{"url": "https://x", "title": "X"}]}]"#,
    );
    let output = Command::new(bin_path())
        .args([
            "--no-math",
            "--citations",
            citations.to_str().expect("path"),
            input.to_str().expect("path"),
        ])
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<a href=\"https://x\" title=\"X\" class=\"citation\""));
    assert!(stdout.contains(">1</a>."));
}

#[test]
fn link_limit_flag_and_env() {
    let input = temp_file("link", "md", "https://example.com/abcdef\n");
    let output = Command::new(bin_path())
        .args(["--no-math", "--link-limit", "5", input.to_str().expect("path")])
        .output()
        .expect("run");
    assert!(String::from_utf8_lossy(&output.stdout).contains(">example.com/...</a>"));

    let output = Command::new(bin_path())
        .args(["--no-math", input.to_str().expect("path")])
        .env("CHATMARK_LINK_LIMIT", "5")
        .output()
        .expect("run");
    assert!(String::from_utf8_lossy(&output.stdout).contains(">example.com/...</a>"));
}

#[test]
fn sanitized_output_adds_rel() {
    let input = temp_file("sanitized", "md", "www.example.com\n");
    let output = Command::new(bin_path())
        .args(["--no-math", "--sanitized", input.to_str().expect("path")])
        .output()
        .expect("run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("href=\"https://www.example.com\""));
    assert!(stdout.contains("rel=\"noopener noreferrer\""));
}

#[test]
fn missing_input_fails() {
    let output = Command::new(bin_path())
        .args(["--no-math", "/definitely/not/here.md"])
        .output()
        .expect("run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"));
}

#[test]
fn malformed_citations_fail() {
    let input = temp_file("bad_cite_input", "md", "x\n");
    let citations = temp_file("bad_cite", "json", "{not json");
    let output = Command::new(bin_path())
        .args([
            "--no-math",
            "--citations",
            citations.to_str().expect("path"),
            input.to_str().expect("path"),
        ])
        .output()
        .expect("run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid citation JSON"));
}
