//! # Autoclicker
//!
//! Repeated mouse clicks at a fixed interval, injected through the Windows
//! input API.
//!
//! ## Features
//!
//! - Configurable interval, click count (0 = until stopped), button and start delay
//! - Validation of every parameter before the first click
//! - Cooperative stop through a shared [`CancelToken`]
//! - Interactive terminal form that runs the clicker on a worker thread
//!
//! ## Example
//!
//! ```no_run
//! use autoclicker::{run_click_loop, ClickConfig, MouseButton, SystemInjector};
//!
//! let config = ClickConfig::from_seconds(0.1, 5, MouseButton::Left, 0.0);
//! config.validate().unwrap();
//!
//! let mut injector = SystemInjector::new().unwrap();
//! let summary = run_click_loop(&config, &mut injector, None).unwrap();
//! assert_eq!(summary.clicks, 5);
//! ```

pub mod clicker;
pub mod config;
pub mod error;
pub mod form;
pub mod input;
pub mod session;

pub use clicker::{run_click_loop, CancelToken, ClickSummary};
pub use config::{ClickConfig, MouseButton};
pub use error::{ClickerError, Result};
pub use form::{run_form, FormController};
pub use input::{MouseInjector, SystemInjector};
pub use session::ClickSession;
