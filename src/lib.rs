// Library root
// -----------
// This crate exposes the library surface of the `apod` CLI. The binary
// (`main.rs`) only initialises logging, reads the configuration and hands
// the arguments to `commands::run`.
//
// Module responsibilities:
// - `api`: blocking HTTP access to the APOD endpoint.
// - `apod`: the record type and its on-disk JSON encoding.
// - `commands`: the command table and one handler per command.
// - `config`: environment-derived settings.
// - `date`: `YYYY-MM-DD` parsing and formatting.
// - `store`: the one-file-per-date storage directory.
// - `ui`: terminal rendering and error reporting.
pub mod api;
pub mod apod;
pub mod commands;
pub mod config;
pub mod date;
pub mod error;
pub mod logging;
pub mod store;
pub mod ui;
