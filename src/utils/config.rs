#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use lazy_static::lazy_static;
use log::{info, error, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::{env, fmt};

// Server Utilities
use crate::utils::errors::Errors;

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Environment variables read at startup.
const ENV_PORT             : &str = "PORT";
const ENV_RUN_MODE         : &str = "RUN_MODE";

// Networking.
const DEFAULT_HTTP_ADDR    : &str = "http://localhost";
const DEFAULT_HTTP_PORT    : u16  = 3000;

// Run mode value that selects production behavior; any other value,
// including an unset variable, selects development behavior.
const RUN_MODE_PRODUCTION  : &str = "production";

// Console log line layout.
const LOG_PATTERN          : &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {h({l})} {t} - {m}{n}";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Assign the run mode BEFORE RUNTIME_CTX is initialized in main, since
// logging is configured from it before the context is first touched.
lazy_static! {
    pub static ref RUN_MODE: RunMode = init_run_mode();
}

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// RunMode:
// ---------------------------------------------------------------------------
#[derive(Debug, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

// Convert enum to its string representation.
impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunMode::Development => write!(f, "development"),
            RunMode::Production  => write!(f, "production"),
        }
    }
}

impl RunMode {
    /** The run mode affects only internal wiring: development runs with
     * debug logging, production with info logging.
     */
    pub fn log_level(&self) -> LevelFilter {
        match self {
            RunMode::Development => LevelFilter::Debug,
            RunMode::Production  => LevelFilter::Info,
        }
    }
}

// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct RuntimeCtx {
    pub config: Config,
    pub run_mode: &'static RunMode,
}

// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
#[derive(Debug)]
pub struct Config {
    pub http_addr: String,
    pub http_port: u16,
}

impl Config {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Config::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Initialize log4rs logging with a console appender.  The root level is
 * derived from the run mode.  Any failure results in a panic since the
 * server won't run without its log.
 */
pub fn init_log() {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let logconfig = match log4rs::config::Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(RUN_MODE.log_level())) {
            Ok(c) => c,
            Err(e) => {
                println!("{}", e);
                let s = format!("{}", Errors::LogInitialization(e.to_string()));
                panic!("{}", s);
            },
    };
    match log4rs::init_config(logconfig) {
        Ok(_) => (),
        Err(e) => {
            println!("{}", e);
            let s = format!("{}", Errors::LogInitialization(e.to_string()));
            panic!("{}", s);
        },
    }
    info!("Log4rs initialized in {} mode at level {}.", *RUN_MODE, RUN_MODE.log_level());
}

/// ***************************************************************************
//                             Parms Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_config:
// ---------------------------------------------------------------------------
/** Retrieve the application parameters from the environment.  Unset
 * variables fall back to their documented defaults; a port value that is
 * set but unparsable is a fatal startup error.
 */
fn get_config() -> Result<Config> {
    let http_port = parse_port(env::var(ENV_PORT).ok())?;
    Ok(Config { http_addr: DEFAULT_HTTP_ADDR.to_string(), http_port })
}

// ---------------------------------------------------------------------------
// parse_port:
// ---------------------------------------------------------------------------
fn parse_port(raw: Option<String>) -> Result<u16> {
    let raw = match raw {
        Some(r) => r,
        None => return Ok(DEFAULT_HTTP_PORT),
    };
    match raw.parse::<u16>() {
        Ok(p) => Ok(p),
        Err(e) => {
            let msg = format!("{}\n   {}", Errors::InvalidPort(raw), e);
            error!("{}", msg);
            Result::Err(anyhow!(msg))
        }
    }
}

// ---------------------------------------------------------------------------
// init_run_mode:
// ---------------------------------------------------------------------------
fn init_run_mode() -> RunMode {
    run_mode_from(env::var(ENV_RUN_MODE).ok())
}

// ---------------------------------------------------------------------------
// run_mode_from:
// ---------------------------------------------------------------------------
fn run_mode_from(raw: Option<String>) -> RunMode {
    match raw {
        Some(v) if v == RUN_MODE_PRODUCTION => RunMode::Production,
        _ => RunMode::Development,
    }
}

// ***************************************************************************
//                             Config Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_runtime_context:
// ---------------------------------------------------------------------------
pub fn init_runtime_context() -> RuntimeCtx {
    // If this fails the application aborts.
    let config = get_config().expect("FAILED to read configuration from the environment.");
    RuntimeCtx { config, run_mode: &RUN_MODE }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_config() {
        println!("{:?}", Config::new());
    }

    #[test]
    fn port_defaults_when_unset() {
        assert_eq!(parse_port(None).unwrap(), DEFAULT_HTTP_PORT);
    }

    #[test]
    fn port_parses_when_set() {
        assert_eq!(parse_port(Some("8080".to_string())).unwrap(), 8080);
    }

    #[test]
    fn bad_port_is_fatal() {
        assert!(parse_port(Some("not-a-port".to_string())).is_err());
    }

    #[test]
    fn run_mode_selection() {
        assert_eq!(run_mode_from(None), RunMode::Development);
        assert_eq!(run_mode_from(Some("development".to_string())), RunMode::Development);
        assert_eq!(run_mode_from(Some("staging".to_string())), RunMode::Development);
        assert_eq!(run_mode_from(Some("production".to_string())), RunMode::Production);
    }

    #[test]
    fn log_levels_follow_run_mode() {
        assert_eq!(RunMode::Development.log_level(), LevelFilter::Debug);
        assert_eq!(RunMode::Production.log_level(), LevelFilter::Info);
    }
}
