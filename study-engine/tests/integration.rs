// ---------------------------------------------------------------------------
// Integration tests for study-engine JSON-RPC 2.0 / NDJSON protocol
// ---------------------------------------------------------------------------
//
// Each test spawns a fresh study-engine binary over a catalog file and
// communicates via stdin/stdout using newline-delimited JSON-RPC 2.0 messages.
// ---------------------------------------------------------------------------

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{json, Value};

const SAMPLE_CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_topics.json");

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

struct StudyProcess {
	child: Child,
	reader: BufReader<std::process::ChildStdout>,
	next_id: AtomicU64,
}

impl StudyProcess {
	fn spawn() -> Self {
		Self::spawn_with(&[Path::new(SAMPLE_CATALOG)])
	}

	fn spawn_with(catalogs: &[&Path]) -> Self {
		let mut child = command(catalogs)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::null())
			.spawn()
			.expect("failed to spawn study-engine");

		let stdout = child.stdout.take().expect("no stdout");
		let reader = BufReader::new(stdout);

		Self {
			child,
			reader,
			next_id: AtomicU64::new(1),
		}
	}

	fn send_raw(&mut self, line: &str) {
		let stdin = self.child.stdin.as_mut().expect("no stdin");
		stdin.write_all(line.as_bytes()).unwrap();
		stdin.write_all(b"\n").unwrap();
		stdin.flush().unwrap();
	}

	fn send(&mut self, method: &str, params: Value) -> RpcResponse {
		let id = self.next_id.fetch_add(1, Ordering::SeqCst);
		let request = json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params,
		});
		self.send_raw(&serde_json::to_string(&request).unwrap());

		loop {
			let mut buf = String::new();
			let bytes_read = self
				.reader
				.read_line(&mut buf)
				.expect("failed to read from stdout");
			if bytes_read == 0 {
				panic!("unexpected EOF while waiting for response to id={}", id);
			}
			let buf = buf.trim();
			if buf.is_empty() {
				continue;
			}
			let parsed: Value = serde_json::from_str(buf)
				.unwrap_or_else(|e| panic!("invalid JSON from engine: {e}\nline: {buf}"));
			let resp_id = parsed["id"].as_u64().expect("response id is not u64");
			assert_eq!(resp_id, id, "response id mismatch");
			if let Some(error) = parsed.get("error") {
				return RpcResponse::Error(error.clone());
			}
			return RpcResponse::Ok(parsed.get("result").cloned().unwrap_or(Value::Null));
		}
	}

	fn call(&mut self, method: &str, params: Value) -> Value {
		match self.send(method, params) {
			RpcResponse::Ok(v) => v,
			RpcResponse::Error(e) => panic!("expected success, got error: {e}"),
		}
	}

	fn call_err(&mut self, method: &str, params: Value) -> Value {
		match self.send(method, params) {
			RpcResponse::Error(e) => e,
			RpcResponse::Ok(v) => panic!("expected error, got success: {v}"),
		}
	}

	fn topic_names(&mut self, method: &str, params: Value) -> Vec<String> {
		let result = self.call(method, params);
		result["recommendations"]
			.as_array()
			.expect("recommendations should be an array")
			.iter()
			.map(|r| r["topic"].as_str().unwrap().to_string())
			.collect()
	}
}

impl Drop for StudyProcess {
	fn drop(&mut self) {
		drop(self.child.stdin.take());
		let _ = self.child.wait();
	}
}

#[derive(Debug)]
enum RpcResponse {
	Ok(Value),
	Error(Value),
}

fn command(catalogs: &[&Path]) -> Command {
	let mut cmd = Command::new(env!("CARGO_BIN_EXE_study-engine"));
	cmd.env_remove("STUDY_CATALOG").env_remove("STUDY_TOP_N");
	for path in catalogs {
		cmd.arg("--catalog").arg(path);
	}
	cmd
}

fn write_catalog(path: &Path, names: &[(&str, &str)]) {
	let topics: Vec<Value> = names
		.iter()
		.map(|(name, keywords)| json!({ "name": name, "keywords": keywords }))
		.collect();
	std::fs::write(path, json!({ "topics": topics }).to_string()).unwrap();
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

#[test]
fn recommend_ranks_matching_topic_first() {
	let mut proc = StudyProcess::spawn();

	let result = proc.call("study/recommend", json!({ "query": "Python ile kod yazmak" }));
	let recs = result["recommendations"].as_array().unwrap();
	assert!(!recs.is_empty());
	assert!(recs.len() <= 5, "default topN is 5");
	assert_eq!(recs[0]["topic"], "Python Programlama");

	let scores: Vec<f64> = recs.iter().map(|r| r["score"].as_f64().unwrap()).collect();
	assert!(scores.windows(2).all(|w| w[0] >= w[1]), "scores should be descending");
	assert!(scores.iter().all(|s| *s > 0.01 && *s <= 1.0 + 1e-9));
}

#[test]
fn recommend_uses_synonym_expansion() {
	let mut proc = StudyProcess::spawn();
	let names = proc.topic_names("study/recommend", json!({ "query": "yapay zeka", "topN": 3 }));
	assert!(names.len() <= 3);
	assert_eq!(names[0], "Yapay Zeka");
}

#[test]
fn recommend_blank_and_unmatched_queries_are_empty() {
	let mut proc = StudyProcess::spawn();
	assert!(proc.topic_names("study/recommend", json!({ "query": "" })).is_empty());
	assert!(proc.topic_names("study/recommend", json!({ "query": "?!." })).is_empty());
	assert!(proc.topic_names("study/recommend", json!({ "query": "qqqq zzzz" })).is_empty());
}

#[test]
fn recommend_is_repeatable() {
	let mut proc = StudyProcess::spawn();
	let params = json!({ "query": "web site tasarım", "topN": 4 });
	let first = proc.call("study/recommend", params.clone());
	let second = proc.call("study/recommend", params);
	assert_eq!(first, second);
}

#[test]
fn similar_excludes_the_topic_itself() {
	let mut proc = StudyProcess::spawn();
	let names = proc.topic_names("study/similar", json!({ "topic": "Veri Bilimi" }));
	assert!(!names.is_empty());
	assert!(names.len() <= 3, "default topN for similar is 3");
	assert!(!names.iter().any(|n| n == "Veri Bilimi"));

	let lower = proc.topic_names("study/similar", json!({ "topic": "veri bilimi" }));
	assert_eq!(names, lower);

	assert!(proc.topic_names("study/similar", json!({ "topic": "Kuantum" })).is_empty());
}

#[test]
fn classify_intent() {
	let mut proc = StudyProcess::spawn();

	let result = proc.call("study/classifyIntent", json!({ "query": "Python nasıl öğrenilir" }));
	assert_eq!(result["intent"], "learning");
	assert_eq!(result["confidence"], 0.8);

	let result = proc.call("study/classifyIntent", json!({ "query": "React vs Vue" }));
	assert_eq!(result["intent"], "comparison");
	assert_eq!(result["confidence"], 0.85);

	let result = proc.call("study/classifyIntent", json!({ "query": "Docker kullanımı" }));
	assert_eq!(result["intent"], "learning");
	assert_eq!(result["confidence"], 0.5);
	assert_eq!(result["keywords"], json!(["docker", "kullanımı"]));
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[test]
fn catalog_list_and_get() {
	let mut proc = StudyProcess::spawn();

	let result = proc.call("catalog/list", json!({}));
	let topics = result["topics"].as_array().unwrap();
	assert_eq!(topics.len(), 12);
	assert_eq!(topics[0], "Python Programlama");

	let result = proc.call("catalog/get", json!({ "name": "ROBOTIK" }));
	assert_eq!(result["topic"]["name"], "Robotik");
	assert!(result["topic"]["keywords"].as_str().unwrap().contains("arduino"));

	let result = proc.call("catalog/get", json!({ "name": "Kuantum" }));
	assert!(result["topic"].is_null());
}

#[test]
fn catalog_resources() {
	let mut proc = StudyProcess::spawn();

	let result = proc.call("catalog/resources", json!({ "name": "Python Programlama" }));
	assert_eq!(
		result["resources"],
		json!([
			"https://ogren.example.org/python/baslangic/giris",
			"https://ogren.example.org/python/baslangic/temeller",
			"https://video.example.org/python/kurs"
		])
	);

	let result = proc.call(
		"catalog/resources",
		json!({
			"name": "python programlama",
			"difficulty": "advanced",
			"styles": ["📚 Okuma", "pratik", "interaktif", "video"]
		}),
	);
	let resources = result["resources"].as_array().unwrap();
	assert_eq!(resources.len(), 5, "resources are capped at five");
	assert_eq!(resources[0], "https://ogren.example.org/python/ileri/uzmanlik");
	assert_eq!(resources[2], "https://kitap.example.org/python");

	let result = proc.call("catalog/resources", json!({ "name": "Kuantum" }));
	assert_eq!(result["resources"], json!([]));
}

#[test]
fn fallback_to_next_catalog() {
	let dir = tempfile::tempdir().unwrap();
	let missing = dir.path().join("sample_topics_complete.json");
	let mut proc = StudyProcess::spawn_with(&[&missing, Path::new(SAMPLE_CATALOG)]);

	let result = proc.call("catalog/list", json!({}));
	assert_eq!(result["topics"].as_array().unwrap().len(), 12);
}

#[test]
fn first_loadable_catalog_wins() {
	let dir = tempfile::tempdir().unwrap();
	let complete = dir.path().join("complete.json");
	write_catalog(&complete, &[("Go", "go golang eşzamanlılık")]);
	let mut proc = StudyProcess::spawn_with(&[&complete, Path::new(SAMPLE_CATALOG)]);

	let result = proc.call("catalog/list", json!({}));
	assert_eq!(result["topics"], json!(["Go"]));
}

#[test]
fn startup_fails_without_catalog() {
	let dir = tempfile::tempdir().unwrap();
	let missing = dir.path().join("missing.json");
	let status = command(&[&missing])
		.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.status()
		.expect("failed to run study-engine");
	assert!(!status.success());
}

#[test]
fn reload_swaps_catalog() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("topics.json");
	write_catalog(&path, &[("Go", "go golang"), ("Rust", "rust cargo")]);
	let mut proc = StudyProcess::spawn_with(&[&path]);

	assert_eq!(
		proc.topic_names("study/recommend", json!({ "query": "rust" })),
		vec!["Rust"]
	);

	write_catalog(
		&path,
		&[("Go", "go golang"), ("Rust", "rust cargo"), ("Zig", "zig comptime")],
	);
	let result = proc.call("catalog/reload", json!({}));
	assert_eq!(result["topicCount"], 3);
	assert_eq!(
		proc.topic_names("study/recommend", json!({ "query": "zig" })),
		vec!["Zig"]
	);

	std::fs::write(&path, "{ not json").unwrap();
	let err = proc.call_err("catalog/reload", json!({}));
	assert_eq!(err["code"], -32000);
	assert_eq!(err["data"]["studyCode"], "STUDY_CATALOG_UNAVAILABLE");
	assert_eq!(
		proc.call("catalog/list", json!({}))["topics"],
		json!(["Go", "Rust", "Zig"])
	);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn unknown_method() {
	let mut proc = StudyProcess::spawn();
	let err = proc.call_err("store/initialize", json!({}));
	assert_eq!(err["code"], -32601);
	assert!(err["message"].as_str().unwrap().contains("store/initialize"));
}

#[test]
fn invalid_params() {
	let mut proc = StudyProcess::spawn();
	let err = proc.call_err("study/recommend", json!({ "topN": 2 }));
	assert_eq!(err["code"], -32000);
	assert_eq!(err["data"]["studyCode"], "STUDY_INVALID_PARAMS");

	let err = proc.call_err(
		"catalog/resources",
		json!({ "name": "Robotik", "difficulty": "expert" }),
	);
	assert_eq!(err["data"]["studyCode"], "STUDY_INVALID_PARAMS");
}

#[test]
fn malformed_line_is_skipped() {
	let mut proc = StudyProcess::spawn();
	proc.send_raw("this is not json");
	let result = proc.call("catalog/list", json!({}));
	assert_eq!(result["topics"].as_array().unwrap().len(), 12);
}
