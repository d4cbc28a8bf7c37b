// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end: survey the namespace, then execute against each
//! representative pod under the dispatch throttle.

use kx_cluster::test_support::{group, pod, ScriptedChannel, ScriptedExec, ScriptedLister};
use kx_cluster::{ExecChannel, Executor, FileProbe, GroupKind, Inventory, TokenBucket};
use kx_core::ExitCode;
use std::sync::Arc;
use std::time::Duration;

const DEADLINE: Duration = Duration::from_secs(30);

fn command(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn executes_once_per_representative_pod() {
    // Namespace: a three-replica deployment, a two-replica statefulset,
    // and one standalone pod. Only three targets should see a command.
    let lister = ScriptedLister::new()
        .with_groups(GroupKind::Deployment, vec![group("web", &[("app", "web")])])
        .with_groups(GroupKind::StatefulSet, vec![group("db", &[("app", "db")])])
        .with_pods(Some("app=web"), vec![pod("web-0"), pod("web-1"), pod("web-2")])
        .with_pods(Some("app=db"), vec![pod("db-0"), pod("db-1")])
        .with_pods(
            None,
            vec![pod("web-0"), pod("web-1"), pod("web-2"), pod("db-0"), pod("db-1"), pod("job-x")],
        );
    let inventory = Inventory::new(Arc::new(lister));

    let unique = inventory.unique_pods().await.unwrap();
    assert_eq!(unique.total, 6);
    assert!(unique.skipped.is_empty());

    let channel = Arc::new(ScriptedChannel::new());
    for _ in &unique.pods {
        channel.push(ScriptedExec::success("uptime 3 days\n"));
    }
    let executor = Executor::new(Arc::clone(&channel) as Arc<dyn ExecChannel>);
    let bucket = TokenBucket::start(100, 2);

    let mut outcomes = Vec::new();
    for target in &unique.pods {
        bucket.acquire().await;
        let outcome = executor
            .execute(&target.name, &target.containers[0].name, &command(&["uptime"]), None, DEADLINE)
            .await;
        outcomes.push(outcome);
    }
    bucket.stop();

    assert!(outcomes.iter().all(|o| o.is_success()));
    let calls = channel.calls();
    let reached: Vec<&str> = calls.iter().map(|c| c.pod.as_str()).collect();
    assert_eq!(reached, vec!["web-0", "db-0", "job-x"]);
}

#[tokio::test(start_paused = true)]
async fn mixed_outcomes_are_classified_independently() {
    let channel = Arc::new(ScriptedChannel::new());
    channel.push(ScriptedExec::success("ok\n"));
    channel.push(ScriptedExec::exit(137));
    channel.push(ScriptedExec::stall("half-written"));
    let executor = Executor::new(Arc::clone(&channel) as Arc<dyn ExecChannel>);

    let ok = executor.execute("a-0", "app", &command(&["true"]), None, DEADLINE).await;
    let killed = executor.execute("b-0", "app", &command(&["stress"]), None, DEADLINE).await;
    let timed_out = executor.execute("c-0", "app", &command(&["sleep"]), None, DEADLINE).await;

    assert_eq!(ok.ret_code, ExitCode::SUCCESS);
    assert_eq!(killed.ret_code, ExitCode::from(137));
    assert_eq!(killed.error, vec!["command terminated with exit code 137"]);
    assert_eq!(timed_out.ret_code, ExitCode::EXECUTION_TIMED_OUT);
    assert_eq!(timed_out.stdout, vec!["half-written"]);
}

#[tokio::test]
async fn probe_reads_a_config_from_a_minimal_image() {
    // The target image carries a shell but none of cat/sed/tail.
    let channel = Arc::new(ScriptedChannel::new());
    for _ in 0..3 {
        channel.push(ScriptedExec::exit(127));
    }
    channel.push(ScriptedExec::success("key=value\n"));
    let probe = FileProbe::new(Executor::new(Arc::clone(&channel) as Arc<dyn ExecChannel>));

    let content = probe.read_file("web-0", "app", "/app/config.ini").await.unwrap();

    assert_eq!(content, "key=value\n");
    assert_eq!(channel.calls().len(), 4);
}

#[tokio::test]
async fn image_survey_spans_every_container() {
    let lister = ScriptedLister::new().with_pods(
        None,
        vec![
            kx_cluster::test_support::pod_with_images("web-0", &["nginx:1.27", "envoy:1.31"]),
            kx_cluster::test_support::pod_with_images("web-1", &["nginx:1.27", "envoy:1.31"]),
            kx_cluster::test_support::pod_with_images("db-0", &["postgres:16"]),
        ],
    );
    let inventory = Inventory::new(Arc::new(lister));

    let images = inventory.unique_images().await.unwrap();

    assert_eq!(images.containers, 5);
    assert_eq!(images.images, vec!["nginx:1.27", "envoy:1.31", "postgres:16"]);
}
