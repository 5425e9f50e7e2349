#![forbid(unsafe_code)]

use thiserror::Error;

/// Error enumerates the errors returned by this application.
#[derive(Error, Debug)]
pub enum Errors {
    /// Input parameter logging.
    #[error("hello_server input parameters:\n{}", .0)]
    InputParms(String),

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Logging subsystem could not be configured.
    #[error("Unable to initialize the Log4rs logging subsystem: {}", .0)]
    LogInitialization(String),

    #[error("Unable to parse the PORT environment variable: {}", .0)]
    InvalidPort(String),

    #[error("Unable to render page template: {}", .0)]
    TemplateRender(String),
}
