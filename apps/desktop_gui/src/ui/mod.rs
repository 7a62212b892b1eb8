//! UI layer for the flight board window.

pub mod app;

pub use app::FlightBoardApp;
