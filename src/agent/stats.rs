//! Per-request counters, reported when the request ends.

use std::collections::BTreeSet;

use crate::message::ToolCallRequest;

/// What one request did. Bookkeeping only: nothing here steers the loop
/// except `function_calls`, which the clarification guard reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStats {
    pub function_calls: usize,
    /// `file_path` arguments of `read_file` calls.
    pub files_read: BTreeSet<String>,
    /// `file_path` arguments of `write_file` calls.
    pub files_modified: BTreeSet<String>,
}

impl RequestStats {
    /// Records one dispatched call.
    pub fn record(&mut self, call: &ToolCallRequest) {
        self.function_calls += 1;
        let Some(path) = call.str_arg("file_path") else {
            return;
        };
        match call.name.as_str() {
            "read_file" => {
                self.files_read.insert(path.to_string());
            }
            "write_file" => {
                self.files_modified.insert(path.to_string());
            }
            _ => {}
        }
    }
}
