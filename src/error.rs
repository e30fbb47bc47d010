// Copyright 2026 Dmitry Tantsur <dtantsur@protonmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error and Result implementations.

use std::io;
use std::path::PathBuf;

use osauth::ErrorKind;
use thiserror::Error;

/// Failure to build a connection profile.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field is absent or empty.
    #[error("Missing required authentication field: {0}")]
    MissingRequiredField(&'static str),

    /// A field is present but its value cannot be used.
    #[error("Invalid value for authentication field {field}: {reason}")]
    InvalidField {
        /// Name of the field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// No configuration file was found.
    ///
    /// Carries the paths that were probed.
    #[error("Configuration file not found (tried: {})", display_paths(.0))]
    ConfigNotFound(Vec<PathBuf>),

    /// The configuration file exists but cannot be used.
    #[error("Invalid configuration file {path:?}: {reason}")]
    InvalidConfigFormat {
        /// Path to the file.
        path: PathBuf,
        /// Human-readable reason.
        reason: String,
    },

    /// The operator closed the input stream or the terminal is not available.
    #[error("Interactive input was aborted")]
    InteractiveInputAborted,
}

/// Failure when talking to the cloud.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The cloud could not be reached.
    #[error("Cannot connect to the cloud: {0}")]
    ConnectionFailed(String),

    /// Authentication was rejected or access was denied.
    ///
    /// Maps to HTTP 401 and 403.
    #[error("Authentication failed or access denied: {0}")]
    Unauthorized(String),

    /// The response could not be understood.
    #[error("Received malformed response: {0}")]
    MalformedResponse(String),

    /// Requested resource or endpoint was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other failure reported by the cloud.
    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// Error of any operation in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Credential resolution failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A call to the cloud failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Writing a CSV file failed.
    #[error("Cannot write CSV file {path:?}: {source}")]
    Csv {
        /// Path to the output file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },

    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result of an operation in this crate.
pub type Result<T> = ::std::result::Result<T, Error>;

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        String::from("no candidate paths")
    } else {
        paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<osauth::Error> for ApiError {
    fn from(value: osauth::Error) -> ApiError {
        let msg = value.to_string();
        match value.kind() {
            ErrorKind::AuthenticationFailed | ErrorKind::AccessDenied => {
                ApiError::Unauthorized(msg)
            }
            ErrorKind::InvalidResponse => ApiError::MalformedResponse(msg),
            ErrorKind::ProtocolError | ErrorKind::OperationTimedOut => {
                ApiError::ConnectionFailed(msg)
            }
            ErrorKind::ResourceNotFound | ErrorKind::EndpointNotFound => ApiError::NotFound(msg),
            _ => ApiError::RequestFailed(msg),
        }
    }
}

impl From<osauth::Error> for Error {
    fn from(value: osauth::Error) -> Error {
        Error::Api(value.into())
    }
}
