#![warn(missing_docs)]
//! Fibersim specific error structures
use std::{error::Error, fmt::Display};

/// Fibersim application specific Result type
pub type FiberResult<T> = std::result::Result<T, FiberError>;

/// Errors that can be returned by various fibersim functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FiberError {
    /// invalid fiber profile, launch angles or configuration file content
    Configuration(String),
    /// errors in connection with the command line interface
    Console(String),
    /// errors while writing reports (files, csv, json, plots)
    Report(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for FiberError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(m) => {
                write!(f, "Configuration:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Report(m) => {
                write!(f, "Report:{m}")
            }
            Self::Other(m) => write!(f, "Fibersim Error:Other:{m}"),
        }
    }
}
impl Error for FiberError {}

impl std::convert::From<String> for FiberError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn from() {
        let error = FiberError::from("test".to_string());
        assert_eq!(error, FiberError::Other("test".to_string()));
    }
    #[test]
    fn display() {
        assert_eq!(
            format!("{}", FiberError::Configuration("test".to_string())),
            "Configuration:test"
        );
        assert_eq!(
            format!("{}", FiberError::Console("test".to_string())),
            "Console:test"
        );
        assert_eq!(
            format!("{}", FiberError::Report("test".to_string())),
            "Report:test"
        );
        assert_eq!(
            format!("{}", FiberError::Other("test".to_string())),
            "Fibersim Error:Other:test"
        );
    }
    #[test]
    fn debug() {
        assert_eq!(
            format!("{:?}", FiberError::Configuration("test".to_string())),
            "Configuration(\"test\")"
        );
    }
}
