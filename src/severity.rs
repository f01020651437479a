// SPDX-License-Identifier: MIT OR Apache-2.0

//! Severity levels and their parsing.

use crate::error::LogError;
use std::fmt::Display;
use std::str::FromStr;

/// Ordered log severity.
///
/// `Debug < Info < Warn < Error < Fatal < Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Severity {
    /// Diagnostic detail, usually off in production
    #[default]
    Debug = 0,
    /// Normal operation
    Info = 1,
    /// Suspicious condition
    Warn = 2,
    /// Runtime error
    Error = 3,
    /// The program cannot continue
    Fatal = 4,
    /// Always logged
    Unknown = 5,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 6] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
        Severity::Unknown,
    ];

    /// The upper-case name, e.g. `"WARN"`. `Unknown` renders as `"ANY"`.
    pub const fn name(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
            Severity::Unknown => "ANY",
        }
    }

    /// First letter of the name, used by [`crate::DefaultFormatter`].
    pub const fn initial(self) -> char {
        match self {
            Severity::Debug => 'D',
            Severity::Info => 'I',
            Severity::Warn => 'W',
            Severity::Error => 'E',
            Severity::Fatal => 'F',
            Severity::Unknown => 'A',
        }
    }

    pub(crate) const fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) const fn from_u8(value: u8) -> Option<Severity> {
        match value {
            0 => Some(Severity::Debug),
            1 => Some(Severity::Info),
            2 => Some(Severity::Warn),
            3 => Some(Severity::Error),
            4 => Some(Severity::Fatal),
            5 => Some(Severity::Unknown),
            _ => None,
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "unknown" | "any" => Ok(Severity::Unknown),
            _ => Err(LogError::InvalidSeverity(s.to_string())),
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = LogError;

    fn try_from(value: u8) -> Result<Self, LogError> {
        Severity::from_u8(value).ok_or_else(|| LogError::InvalidSeverity(value.to_string()))
    }
}

/**
Anything a level-setting call accepts.

Conversion happens before any state is touched, so a rejected value never leaves a
handle half-updated.
*/
pub trait IntoSeverity {
    fn into_severity(self) -> Result<Severity, LogError>;
}

impl IntoSeverity for Severity {
    fn into_severity(self) -> Result<Severity, LogError> {
        Ok(self)
    }
}

impl IntoSeverity for &str {
    fn into_severity(self) -> Result<Severity, LogError> {
        self.parse()
    }
}

impl IntoSeverity for String {
    fn into_severity(self) -> Result<Severity, LogError> {
        self.parse()
    }
}

impl IntoSeverity for u8 {
    fn into_severity(self) -> Result<Severity, LogError> {
        Severity::try_from(self)
    }
}
