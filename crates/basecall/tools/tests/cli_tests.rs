// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use basecall_analyzer::ReportFormat;
use basecall_common::{Block, Expr, Stmt};
use basecall_core::{CompilationUnit, MethodDecl, TypeDecl};
use basecall_tools::{CheckArgs, RulesArgs, run_check, run_rules};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use test_case::test_case;

fn paint_calls(count: usize) -> Vec<Stmt> {
    (0..count).map(|_| Stmt::expr(Expr::base_call("Paint", vec![]))).collect()
}

/// `Widget.Paint` with one override per entry of `calls`, each making that many base calls
fn write_unit(dir: &Path, calls: &[usize]) -> PathBuf {
    let mut unit = CompilationUnit::new("widgets").with_type(TypeDecl::new("Widget").with_method(MethodDecl::new("Paint").virtual_method().with_body(Block::empty())));
    for (index, count) in calls.iter().enumerate() {
        let start = 100 * (index + 1);
        unit = unit.with_type(TypeDecl::new(format!("Control{}", index)).with_base("Widget").with_method(MethodDecl::new("Paint").override_method().at(start, start + 40).with_body(paint_calls(*count))));
    }
    let path = dir.join("widgets.json");
    fs::write(&path, unit.to_json().unwrap()).unwrap();
    path
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("basecall.toml");
    fs::write(&path, content).unwrap();
    path
}

fn args(unit: PathBuf) -> CheckArgs {
    CheckArgs { unit, config: None, format: ReportFormat::Text, parallel: false, next_in_chain: false, verbose: 0 }
}

#[test]
fn test_clean_unit() {
    let dir = TempDir::new().unwrap();
    let outcome = run_check(&args(write_unit(dir.path(), &[1, 1]))).unwrap();
    assert!(!outcome.failed);
    assert!(outcome.output.is_empty());
}

#[test]
fn test_findings_fail_the_check() {
    let dir = TempDir::new().unwrap();
    let outcome = run_check(&args(write_unit(dir.path(), &[1, 2, 0]))).unwrap();
    assert!(outcome.failed);

    let lines: Vec<_> = outcome.output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("widgets: error[MultipleBaseCalls] "));
    assert!(lines[0].contains("'Paint'"));
    assert!(lines[1].starts_with("widgets: error[MissingBaseCall] "));
    assert!(lines[1].ends_with("at 300..340"));
}

#[test]
fn test_parallel_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let unit = write_unit(dir.path(), &[0, 1, 2, 1, 0, 3, 1, 2]);
    let sequential = run_check(&args(unit.clone())).unwrap();
    let parallel = run_check(&CheckArgs { parallel: true, ..args(unit) }).unwrap();
    assert_eq!(sequential.output, parallel.output);
}

#[test]
fn test_config_downgrades_severity() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "[severity]\nMultipleBaseCalls = \"warning\"\n");
    let outcome = run_check(&CheckArgs { config: Some(config), ..args(write_unit(dir.path(), &[2])) }).unwrap();
    assert!(!outcome.failed);
    assert!(outcome.output.starts_with("widgets: warning[MultipleBaseCalls] "));
}

#[test]
fn test_config_message_override() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "[messages]\nMissingBaseCall = \"Call base.{0}()\"\n");
    let outcome = run_check(&CheckArgs { config: Some(config), ..args(write_unit(dir.path(), &[0])) }).unwrap();
    assert_eq!(outcome.output, "widgets: error[MissingBaseCall] Call base.Paint() at 100..140\n");
}

#[test]
fn test_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "[severity]\nMissingBaseCall = \"fatal\"\n");
    let error = run_check(&CheckArgs { config: Some(config), ..args(write_unit(dir.path(), &[1])) }).unwrap_err();
    assert!(error.to_string().contains("Invalid configuration file"));
}

#[test]
fn test_json_output() {
    let dir = TempDir::new().unwrap();
    let outcome = run_check(&CheckArgs { format: ReportFormat::Json, ..args(write_unit(dir.path(), &[0, 1])) }).unwrap();
    let findings: serde_json::Value = serde_json::from_str(&outcome.output).unwrap();
    let findings = findings.as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["code"], "MissingBaseCall");
    assert_eq!(findings[0]["severity"], "error");
    assert_eq!(findings[0]["method_name"], "Paint");
}

#[test]
fn test_missing_unit_file() {
    let dir = TempDir::new().unwrap();
    let error = run_check(&args(dir.path().join("absent.json"))).unwrap_err();
    assert!(error.to_string().contains("Failed to load"));
}

#[test]
fn test_rules_with_config() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "[severity]\nBaseCallInLoop = \"info\"\n");
    let rendered = run_rules(&RulesArgs { config: Some(config) }).unwrap();
    assert_eq!(rendered.lines().count(), 9);
    assert!(rendered.lines().any(|line| line.starts_with("BaseCallInLoop ") && line.contains("info")));
}

#[test_case("text", ReportFormat::Text; "lowercase text")]
#[test_case("JSON", ReportFormat::Json; "uppercase json")]
#[test_case("Json", ReportFormat::Json; "mixed case json")]
fn test_format_parsing(input: &str, expected: ReportFormat) {
    assert_eq!(input.parse::<ReportFormat>().unwrap(), expected);
}

#[test]
fn test_unknown_format() {
    assert!("sarif".parse::<ReportFormat>().is_err());
}

#[test_case(&[1], 0; "clean unit exits zero")]
#[test_case(&[2], 1; "error finding exits one")]
fn test_binary_exit_status(calls: &[usize], expected: i32) {
    let dir = TempDir::new().unwrap();
    let unit = write_unit(dir.path(), calls);
    let status = Command::new(env!("CARGO_BIN_EXE_basecall")).arg("check").arg(&unit).output().unwrap().status;
    assert_eq!(status.code(), Some(expected));
}

#[test]
fn test_binary_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    let unit = write_unit(dir.path(), &[1]);
    let output = Command::new(env!("CARGO_BIN_EXE_basecall")).args(["check", "--format", "sarif"]).arg(&unit).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown report format"));
}
