//! Cross-crate scenarios: a scanner thread feeding the display host, and remembered positions
//! surviving a restart.

mod display;
