use std::fs;

use assert_cmd::Command;

fn stderr_of(args: &[&str]) -> String {
    let output = Command::cargo_bin("spookquiz")
        .unwrap()
        .args(args)
        .output()
        .unwrap();
    assert!(!output.status.success());
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn missing_bank_file_is_reported() {
    let stderr = stderr_of(&["--bank", "/nonexistent/questions.json"]);
    assert!(stderr.contains("could not read question bank"), "{stderr}");
}

#[test]
fn invalid_bank_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank.json");
    fs::write(
        &path,
        r#"{"candy": [{"question": "Q", "options": ["a", "b"], "correct_answer": "c"}]}"#,
    )
    .unwrap();

    let stderr = stderr_of(&["--bank", path.to_str().unwrap()]);
    assert!(
        stderr.contains("invalid question 0 in category 'candy'"),
        "{stderr}"
    );
}

#[test]
fn unknown_difficulty_is_rejected() {
    let stderr = stderr_of(&["--difficulty", "nightmare"]);
    assert!(stderr.contains("nightmare"), "{stderr}");
}
