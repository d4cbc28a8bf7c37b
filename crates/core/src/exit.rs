// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! POSIX shell exit-code taxonomy.
//!
//! Two negative sentinels are reserved for conditions that are not process
//! exits at all: [`ExitCode::EXECUTION_TIMED_OUT`] when a deadline fired
//! before the remote command finished, and [`ExitCode::INTERNAL_APP_ERROR`]
//! when the exec stream itself failed (auth, network, malformed request).
//! Everything in `[0, 255]` is a real process exit; the documented subset
//! carries fixed descriptive text, all other codes describe as `""`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A classified exit status for one remote command invocation.
///
/// Serializes transparently as its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExitCode(i32);

impl ExitCode {
    /// The deadline fired before the remote command finished.
    pub const EXECUTION_TIMED_OUT: ExitCode = ExitCode(-2);
    /// The failure was not a process exit (stream setup, transport, auth).
    pub const INTERNAL_APP_ERROR: ExitCode = ExitCode(-1);
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const GENERAL_ERROR: ExitCode = ExitCode(1);
    pub const INCORRECT_USAGE: ExitCode = ExitCode(2);
    pub const COMMAND_CANNOT_EXECUTE: ExitCode = ExitCode(126);
    pub const COMMAND_NOT_FOUND: ExitCode = ExitCode(127);
    pub const INVALID_ARGUMENT_TO_EXIT: ExitCode = ExitCode(128);
    /// 130 is reserved for SIGINT and deliberately shadows the generic
    /// "fatal error signal 2" slot in the 128+n range.
    pub const SCRIPT_TERMINATED_BY_CTRL_C: ExitCode = ExitCode(130);
    pub const EXIT_STATUS_OUT_OF_RANGE: ExitCode = ExitCode(255);

    /// The raw integer value.
    pub fn code(self) -> i32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Fixed descriptive text for documented codes, `""` otherwise.
    ///
    /// An empty result means "no entry", which callers must keep distinct
    /// from exit code 0's literal `"Success"` description.
    pub fn describe(self) -> &'static str {
        match self.0 {
            -1 => "Internal app error",
            0 => "Success",
            1 => "General error, unspecified error",
            2 => "Incorrect usage or syntax of the command",
            126 => "Command cannot execute",
            127 => "Command not found",
            128 => "Invalid argument to exit",
            130 => "Script terminated by Control-C (SIGINT)",
            255 => "Exit status out of range",
            // Signal based exit codes (128+n); 130 carries the SIGINT text above
            129 => "Fatal error signal 1 (SIGHUP)",
            131 => "Fatal error signal 3 (SIGQUIT)",
            132 => "Fatal error signal 4 (SIGILL)",
            133 => "Fatal error signal 5 (SIGTRAP)",
            134 => "Fatal error signal 6 (SIGABRT/SIGIOT)",
            135 => "Fatal error signal 7 (SIGBUS)",
            136 => "Fatal error signal 8 (SIGFPE)",
            137 => "Fatal error signal 9 (SIGKILL)",
            138 => "Fatal error signal 10 (SIGUSR1)",
            139 => "Fatal error signal 11 (SIGSEGV)",
            140 => "Fatal error signal 12 (SIGUSR2)",
            141 => "Fatal error signal 13 (SIGPIPE)",
            142 => "Fatal error signal 14 (SIGALRM)",
            143 => "Fatal error signal 15 (SIGTERM)",
            _ => "",
        }
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "exit_tests.rs"]
mod tests;
