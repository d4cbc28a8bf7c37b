// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File probing inside minimal container images.
//!
//! A container image may lack `cat`, `sed`, `stat`, or any other common
//! utility, so every capability here is a descending chain of attempts
//! that short-circuits on the first exit-0 result and degrades down to a
//! portable shell fragment. Attempts are strictly sequential, each bounded
//! by its own fixed deadline; there is no outer deadline beyond their sum.

use crate::error::ProbeError;
use crate::exec::Executor;
use kx_core::ExitCode;
use std::time::Duration;

const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_BIT: u8 = 4;

/// File reads and checks built on the execution gateway.
#[derive(Clone)]
pub struct FileProbe {
    executor: Executor,
}

impl FileProbe {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Read a file's content, tolerating missing utilities.
    ///
    /// Chain: `cat`, a no-op `sed` pass, `tail -n +1`, then a line-by-line
    /// shell read loop. Returns the first successful attempt's stdout
    /// verbatim; if every attempt fails, the last attempt's exit code and
    /// error text surface in the [`ProbeError`].
    pub async fn read_file(
        &self,
        pod: &str,
        container: &str,
        path: &str,
    ) -> Result<String, ProbeError> {
        let attempts = [
            vec!["cat".to_string(), path.to_string()],
            vec!["sed".to_string(), String::new(), path.to_string()],
            vec!["tail".to_string(), "-n".to_string(), "+1".to_string(), path.to_string()],
            vec![
                "sh".to_string(),
                "-c".to_string(),
                format!("while IFS= read -r line; do echo \"$line\"; done < '{}'", path),
            ],
        ];

        let mut outcome =
            self.executor.execute(pod, container, &attempts[0], None, ATTEMPT_TIMEOUT).await;
        for command in &attempts[1..] {
            if outcome.is_success() {
                break;
            }
            outcome = self.executor.execute(pod, container, command, None, ATTEMPT_TIMEOUT).await;
        }

        if outcome.is_success() {
            return Ok(outcome.stdout_text());
        }
        Err(ProbeError {
            path: path.to_string(),
            ret_code: outcome.ret_code,
            message: outcome.error_text(),
        })
    }

    /// Whether `path` is readable inside the container.
    ///
    /// Queries the octal mode via `stat -c %a` and passes when any of
    /// owner/group/other carries the read bit. When `stat` itself fails
    /// (utility absent), falls back to `test -r` and treats its exit code
    /// as the verdict directly.
    pub async fn is_readable(&self, pod: &str, container: &str, path: &str) -> bool {
        let stat =
            vec!["stat".to_string(), "-c".to_string(), "%a".to_string(), path.to_string()];
        let outcome = self.executor.execute(pod, container, &stat, None, ATTEMPT_TIMEOUT).await;
        if !outcome.is_success() {
            let fallback =
                vec!["sh".to_string(), "-c".to_string(), format!("test -r '{}'", path)];
            let outcome =
                self.executor.execute(pod, container, &fallback, None, ATTEMPT_TIMEOUT).await;
            return outcome.is_success();
        }
        read_bit_set(outcome.stdout_text().trim_end())
    }

    /// Whether `path` exists as a file inside the container.
    pub async fn exists(&self, pod: &str, container: &str, path: &str) -> bool {
        let stat = vec!["stat".to_string(), path.to_string()];
        let outcome = self.executor.execute(pod, container, &stat, None, ATTEMPT_TIMEOUT).await;
        if outcome.is_success() {
            return true;
        }
        let fallback = vec!["sh".to_string(), "-c".to_string(), format!("[ -f '{}' ]", path)];
        let outcome =
            self.executor.execute(pod, container, &fallback, None, ATTEMPT_TIMEOUT).await;
        outcome.is_success()
    }

    /// Whether `util` is present and runnable inside the container.
    ///
    /// Invokes the utility bare and passes unless the outcome is
    /// command-not-found, command-cannot-execute, or an internal error.
    // TODO: flip to a positive success check; utils whose bare invocation
    // exits non-zero (e.g. grep) still pass today, but so would a binary
    // that crashes on startup.
    pub async fn has_util(&self, pod: &str, container: &str, util: &str) -> bool {
        let command = vec![util.to_string()];
        let outcome = self.executor.execute(pod, container, &command, None, ATTEMPT_TIMEOUT).await;
        outcome.ret_code != ExitCode::COMMAND_NOT_FOUND
            && outcome.ret_code != ExitCode::COMMAND_CANNOT_EXECUTE
            && outcome.ret_code != ExitCode::INTERNAL_APP_ERROR
    }
}

/// Parse a 3-or-4-digit octal mode string; a 4-digit mode drops the
/// leading setuid/setgid/sticky digit.
fn read_bit_set(perm: &str) -> bool {
    if !perm.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits = perm.as_bytes();
    let digits = match digits.len() {
        3 => digits,
        4 => &digits[1..],
        _ => return false,
    };
    digits.iter().any(|d| (d - b'0') & READ_BIT != 0)
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
