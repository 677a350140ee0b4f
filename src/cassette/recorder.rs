//! Records interactions into a cassette file.

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use super::format::{Cassette, Interaction, Port};

/// Records interactions and writes them as a YAML cassette file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
    next_seq: u64,
}

impl CassetteRecorder {
    /// Create a new recorder that will write to the given path.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            commit: "unknown".to_string(),
            interactions: Vec::new(),
            next_seq: 0,
        }
    }

    /// Sets the commit stamped into the cassette header.
    pub fn set_commit(&mut self, commit: impl Into<String>) {
        self.commit = commit.into();
    }

    /// Record an interaction. The `seq` field is assigned automatically.
    pub fn record(
        &mut self,
        port: Port,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        self.interactions.push(Interaction {
            seq: self.next_seq,
            port,
            method: method.into(),
            input,
            output,
        });
        self.next_seq += 1;
    }

    /// Record a `Result` using the `{"ok": v}` / `{"err": message}` convention.
    pub fn record_result<I, T, E>(
        &mut self,
        port: Port,
        method: &str,
        input: &I,
        result: &Result<T, E>,
    ) where
        I: Serialize,
        T: Serialize,
        E: std::fmt::Display,
    {
        let input = serde_json::to_value(input)
            .unwrap_or_else(|e| serde_json::json!({ "unserializable": e.to_string() }));
        let output = match result {
            Ok(value) => match serde_json::to_value(value) {
                Ok(value) => serde_json::json!({ "ok": value }),
                Err(e) => serde_json::json!({ "err": format!("unserializable output: {e}") }),
            },
            Err(e) => serde_json::json!({ "err": e.to_string() }),
        };
        self.record(port, method, input, output);
    }

    /// Number of interactions captured so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Finish recording and write the cassette YAML file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_and_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "test-recording");
        recorder.set_commit("deadbeef");
        recorder.record(Port::Git, "list_files", json!({"root": "/repo"}), json!({"ok": ["a.py"]}));
        recorder.record_result(
            Port::Llm,
            "complete",
            &json!({"prompt": "hi"}),
            &Ok::<_, String>(json!({"text": "bye"})),
        );
        recorder.record_result(
            Port::Llm,
            "complete",
            &json!({"prompt": "again"}),
            &Err::<String, _>("quota exceeded"),
        );
        assert_eq!(recorder.len(), 3);

        let result_path = recorder.finish().expect("finish should succeed");
        assert_eq!(result_path, path);

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "test-recording");
        assert_eq!(cassette.commit, "deadbeef");
        let seqs: Vec<u64> = cassette.interactions.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, [0, 1, 2]);
        assert_eq!(cassette.interactions[1].output, json!({"ok": {"text": "bye"}}));
        assert_eq!(cassette.interactions[2].output, json!({"err": "quota exceeded"}));
    }
}
