//! Shared test helpers for workspace crates.

use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Read a fixture's raw bytes, panicking with the path when it is missing.
pub fn fixture_bytes(name: &str) -> Vec<u8> {
	let path = fixture_path(name);
	fs::read(&path).unwrap_or_else(|err| panic!("failed to read fixture {}: {err}", path.display()))
}

/// Parse a fixture as a JSON document.
pub fn fixture_json(name: &str) -> serde_json::Value {
	parse_json(&fixture_bytes(name))
}

/// Parse bytes as JSON, panicking with the text on failure.
pub fn parse_json(bytes: &[u8]) -> serde_json::Value {
	serde_json::from_slice(bytes).unwrap_or_else(|err| panic!("invalid JSON ({err}): {}", String::from_utf8_lossy(bytes)))
}

/// Assert that `actual` bytes hold the same JSON document as `expected`, ignoring
/// whitespace and object member order.
#[track_caller]
pub fn assert_json_eq(actual: &[u8], expected: &serde_json::Value) {
	let actual = parse_json(actual);
	assert_eq!(&actual, expected, "JSON mismatch\n  actual:   {actual}\n  expected: {expected}");
}
