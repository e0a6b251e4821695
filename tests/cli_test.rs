//! CLI integration tests for the dto-openapi binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("dto-openapi"))
}

// Helper to create a temp metadata file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const BASIC_METADATA: &str = r#"{
    "classes": {
        "App.CreateUser": {
            "json_request": true,
            "members": [
                {"name": "email", "types": [{"builtin": "string"}]}
            ]
        }
    },
    "endpoints": [
        {
            "method": "post",
            "path": "/users",
            "arguments": [
                {"types": [{"builtin": "object", "class_name": "App.CreateUser"}]}
            ]
        }
    ]
}"#;

mod generate_command {
    use super::*;

    #[test]
    fn basic_generate() {
        let dir = TempDir::new().unwrap();
        let metadata = write_temp_file(&dir, "api.json", BASIC_METADATA);

        cmd()
            .args(["generate", metadata.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""email":{"type":"string"}"#));
    }

    #[test]
    fn generate_with_pretty() {
        let dir = TempDir::new().unwrap();
        let metadata = write_temp_file(&dir, "api.json", BASIC_METADATA);

        cmd()
            .args(["generate", metadata.to_str().unwrap(), "--pretty"])
            .assert()
            .success()
            // Pretty output has newlines and indentation
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn generate_with_output_file() {
        let dir = TempDir::new().unwrap();
        let metadata = write_temp_file(&dir, "api.json", BASIC_METADATA);
        let output = dir.path().join("openapi.json");

        cmd()
            .args([
                "generate",
                metadata.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(r#""paths""#));
    }

    #[test]
    fn generate_emits_components_for_named_types() {
        let dir = TempDir::new().unwrap();
        let metadata = write_temp_file(&dir, "api.json", BASIC_METADATA);

        cmd()
            .args(["generate", metadata.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#""components":{"schemas":{"CreateUser""#,
            ));
    }

    #[test]
    fn generate_with_upload_class() {
        let dir = TempDir::new().unwrap();
        let metadata = write_temp_file(
            &dir,
            "api.json",
            r#"{
                "classes": {
                    "App.UploadedFile": {},
                    "App.Import": {
                        "json_request": true,
                        "members": [
                            {"name": "file", "types": [{"builtin": "object", "class_name": "App.UploadedFile"}]}
                        ]
                    }
                },
                "endpoints": [
                    {
                        "method": "post",
                        "path": "/import",
                        "arguments": [
                            {"types": [{"builtin": "object", "class_name": "App.Import"}]}
                        ]
                    }
                ]
            }"#,
        );

        cmd()
            .args([
                "generate",
                metadata.to_str().unwrap(),
                "--upload-class",
                "App.UploadedFile",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("multipart/form-data"))
            .stdout(predicate::str::contains(r#""format":"binary""#));
    }

    #[test]
    fn generate_with_error_responses() {
        let dir = TempDir::new().unwrap();
        let metadata = write_temp_file(&dir, "api.json", BASIC_METADATA);
        let responses = write_temp_file(
            &dir,
            "errors.json",
            r#"{"400": {"description": "validation error"}}"#,
        );

        cmd()
            .args([
                "generate",
                metadata.to_str().unwrap(),
                "--error-responses",
                responses.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""responses":{"400""#));
    }

    #[test]
    fn missing_file_exits_3() {
        cmd()
            .args(["generate", "no-such-file.json"])
            .assert()
            .failure()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn invalid_json_exits_2() {
        let dir = TempDir::new().unwrap();
        let metadata = write_temp_file(&dir, "api.json", "{not valid json");

        cmd()
            .args(["generate", metadata.to_str().unwrap()])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("invalid metadata JSON"));
    }

    #[test]
    fn endpoint_failure_exits_1_but_still_writes_document() {
        let dir = TempDir::new().unwrap();
        let metadata = write_temp_file(
            &dir,
            "api.json",
            r#"{
                "classes": {
                    "App.Req": {
                        "json_request": true,
                        "members": [
                            {"name": "x", "types": [{"builtin": "object", "class_name": "App.Missing"}]}
                        ]
                    }
                },
                "endpoints": [
                    {
                        "method": "post",
                        "path": "/broken",
                        "arguments": [
                            {"types": [{"builtin": "object", "class_name": "App.Req"}]}
                        ]
                    }
                ]
            }"#,
        );

        cmd()
            .args(["generate", metadata.to_str().unwrap()])
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::contains(r#""paths""#))
            .stderr(predicate::str::contains("App.Missing"));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn check_passing_metadata() {
        let dir = TempDir::new().unwrap();
        let metadata = write_temp_file(&dir, "api.json", BASIC_METADATA);

        cmd()
            .args(["check", metadata.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("all passed"));
    }

    #[test]
    fn check_reports_failing_endpoint() {
        let dir = TempDir::new().unwrap();
        let metadata = write_temp_file(
            &dir,
            "api.json",
            r#"{
                "classes": {
                    "App.Req": {
                        "json_request": true,
                        "members": [
                            {"name": "x", "types": [{"builtin": "object", "class_name": "App.Missing"}]}
                        ]
                    }
                },
                "endpoints": [
                    {
                        "method": "post",
                        "path": "/broken",
                        "arguments": [
                            {"types": [{"builtin": "object", "class_name": "App.Req"}]}
                        ]
                    }
                ]
            }"#,
        );

        cmd()
            .args(["check", metadata.to_str().unwrap()])
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::contains("POST /broken"))
            .stdout(predicate::str::contains("1 failed"));
    }

    #[test]
    fn check_json_format() {
        let dir = TempDir::new().unwrap();
        let metadata = write_temp_file(&dir, "api.json", BASIC_METADATA);

        cmd()
            .args(["check", metadata.to_str().unwrap(), "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""document""#));
    }
}
