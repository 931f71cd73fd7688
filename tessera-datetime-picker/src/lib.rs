//! Wheel-style date and time picker components for the Tessera UI
//! framework.
//!
//! # Usage
//!
//! The components in this crate draw with the pipelines provided by
//! `tessera-components`, so register those at startup and provide a
//! `MaterialTheme`:
//!
//! ```no_run
//! use tessera_components::theme::{MaterialTheme, material_theme};
//! use tessera_datetime_picker::date_time_picker::{DateTimePickerArgs, date_time_picker};
//! use tessera_ui::tessera;
//!
//! #[tessera]
//! fn app() {
//!     material_theme(MaterialTheme::default, || {
//!         date_time_picker(&DateTimePickerArgs::default());
//!     });
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use tessera_datetime_picker::date_time_picker::DateTimePickerState;
//!
//! let mut state = DateTimePickerState::new(2024, 1, 31, 8, 30, 0, 1900..=2100);
//! state.set_month(2);
//! assert_eq!(state.day(), 29);
//! assert_eq!(state.formatted(), "2024-2-29 8:30:0");
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod date_time_picker;
pub mod wheel_picker;
