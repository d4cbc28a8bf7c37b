// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The serialized outcome record is a compatibility surface: field names,
//! the line-split quirk, and the transparent exit code all pin the wire
//! shape downstream consumers parse.

use kx_cluster::test_support::{ScriptedChannel, ScriptedExec};
use kx_cluster::{ExecChannel, Executor};
use kx_core::{ExecutionOutcome, ExitCode};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn gateway_outcome_serializes_to_the_wire_shape() {
    let channel = Arc::new(ScriptedChannel::new());
    channel.push(ScriptedExec::success("a\nb\n").with_stderr(""));
    let executor = Executor::new(Arc::clone(&channel) as Arc<dyn ExecChannel>);

    let outcome = executor
        .execute("web-0", "app", &["ls".to_string()], None, Duration::from_secs(5))
        .await;

    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({
            "Pod": "web-0",
            "Container": "app",
            "RetCode": 0,
            "Error": [""],
            "Stdout": ["a", "b", ""],
            "Stderr": [""],
        })
    );
}

#[test]
fn empty_streams_keep_the_single_empty_line_quirk() {
    let outcome =
        ExecutionOutcome::new("web-0", "app", ExitCode::SUCCESS, "", "", "");
    assert_eq!(outcome.stdout, vec![""]);

    let round_tripped: ExecutionOutcome =
        serde_json::from_str(&serde_json::to_string(&outcome).unwrap()).unwrap();
    assert_eq!(round_tripped, outcome);
}
