// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::channel::ExecChannel;
use crate::test_support::{ScriptedChannel, ScriptedExec};
use std::sync::Arc;

fn probe() -> (Arc<ScriptedChannel>, FileProbe) {
    let channel = Arc::new(ScriptedChannel::new());
    let executor = Executor::new(Arc::clone(&channel) as Arc<dyn ExecChannel>);
    (channel, FileProbe::new(executor))
}

#[tokio::test]
async fn read_returns_the_first_successful_attempt() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::success("line1\nline2\n"));

    let content = probe.read_file("web-0", "app", "/etc/hosts").await.unwrap();

    assert_eq!(content, "line1\nline2\n");
    let calls = channel.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].command, vec!["cat", "/etc/hosts"]);
}

#[tokio::test]
async fn read_falls_back_down_the_chain_to_the_shell_loop() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::exit(127)); // no cat
    channel.push(ScriptedExec::exit(127)); // no sed
    channel.push(ScriptedExec::exit(127)); // no tail
    channel.push(ScriptedExec::success("payload\n"));

    let content = probe.read_file("web-0", "app", "/etc/hosts").await.unwrap();

    assert_eq!(content, "payload\n");
    let calls = channel.calls();
    let commands: Vec<&str> = calls.iter().map(|c| c.command[0].as_str()).collect();
    assert_eq!(commands, vec!["cat", "sed", "tail", "sh"]);
    let last = &calls[3].command;
    assert_eq!(last[1], "-c");
    assert!(last[2].contains("while IFS= read -r line"));
    assert!(last[2].contains("'/etc/hosts'"));
}

#[tokio::test]
async fn read_surfaces_the_last_attempt_error_when_all_fail() {
    let (channel, probe) = probe();
    for _ in 0..3 {
        channel.push(ScriptedExec::exit(127));
    }
    channel.push(ScriptedExec::exit(2));

    let err = probe.read_file("web-0", "app", "/etc/secret").await.unwrap_err();

    assert_eq!(err.path, "/etc/secret");
    assert_eq!(err.ret_code, ExitCode::from(2));
    assert_eq!(err.message, "command terminated with exit code 2");
    assert_eq!(channel.calls().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn each_read_attempt_is_deadline_bounded() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::stall("stuck"));
    channel.push(ScriptedExec::success("via sed\n"));

    let content = probe.read_file("web-0", "app", "/var/log/app.log").await.unwrap();

    assert_eq!(content, "via sed\n");
    assert_eq!(channel.calls().len(), 2);
}

#[yare::parameterized(
    owner_read      = { "644", true },
    group_read_only = { "040", true },
    other_read_only = { "004", true },
    write_only      = { "200", false },
    none            = { "000", false },
    setuid_readable = { "4755", true },
    setuid_opaque   = { "4200", false },
    too_short       = { "44", false },
    too_long        = { "07555", false },
    symbolic        = { "rw-r--r--", false },
    empty           = { "", false },
)]
fn read_bit_parsing(mode: &str, expected: bool) {
    assert_eq!(read_bit_set(mode), expected);
}

#[tokio::test]
async fn readability_queries_the_octal_mode_first() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::success("644\n"));

    assert!(probe.is_readable("web-0", "app", "/etc/config").await);
    let calls = channel.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].command, vec!["stat", "-c", "%a", "/etc/config"]);
}

#[tokio::test]
async fn unreadable_mode_is_the_verdict_without_a_fallback() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::success("200\n"));

    assert!(!probe.is_readable("web-0", "app", "/etc/shadow").await);
    assert_eq!(channel.calls().len(), 1);
}

#[tokio::test]
async fn readability_falls_back_to_test_dash_r_when_stat_is_absent() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::exit(127));
    channel.push(ScriptedExec::success(""));

    assert!(probe.is_readable("web-0", "app", "/etc/config").await);
    let calls = channel.calls();
    assert_eq!(calls[1].command, vec!["sh", "-c", "test -r '/etc/config'"]);
}

#[tokio::test]
async fn readability_fallback_failure_is_the_verdict() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::exit(127));
    channel.push(ScriptedExec::exit(1));

    assert!(!probe.is_readable("web-0", "app", "/etc/shadow").await);
}

#[tokio::test]
async fn exists_short_circuits_on_stat() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::success("  File: /etc/hosts\n"));

    assert!(probe.exists("web-0", "app", "/etc/hosts").await);
    let calls = channel.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].command, vec!["stat", "/etc/hosts"]);
}

#[tokio::test]
async fn exists_falls_back_to_a_shell_conditional() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::exit(127));
    channel.push(ScriptedExec::success(""));

    assert!(probe.exists("web-0", "app", "/data/seed.sql").await);
    assert_eq!(channel.calls()[1].command, vec!["sh", "-c", "[ -f '/data/seed.sql' ]"]);
}

#[tokio::test]
async fn exists_is_false_when_both_attempts_fail() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::exit(1));
    channel.push(ScriptedExec::exit(1));

    assert!(!probe.exists("web-0", "app", "/nope").await);
}

#[tokio::test]
async fn util_check_invokes_the_utility_bare() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::success(""));

    assert!(probe.has_util("web-0", "app", "grep").await);
    assert_eq!(channel.calls()[0].command, vec!["grep"]);
}

#[tokio::test]
async fn util_check_tolerates_a_nonzero_bare_exit() {
    // grep with no arguments exits 2, but the binary is there.
    let (channel, probe) = probe();
    channel.push(ScriptedExec::exit(2));

    assert!(probe.has_util("web-0", "app", "grep").await);
}

#[tokio::test]
async fn util_check_fails_on_command_not_found() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::exit(127));

    assert!(!probe.has_util("web-0", "app", "jq").await);
}

#[tokio::test]
async fn util_check_fails_on_command_cannot_execute() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::exit(126));

    assert!(!probe.has_util("web-0", "app", "jq").await);
}

#[tokio::test]
async fn util_check_fails_on_internal_error() {
    let (channel, probe) = probe();
    channel.push(ScriptedExec::transport("connection reset"));

    assert!(!probe.has_util("web-0", "app", "grep").await);
}
