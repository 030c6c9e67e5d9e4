//! Output data models for the IPO calendar.

pub mod ipo;

pub use ipo::{Business, CoreData, IpoEvent, IpoRecord, IpoStatus, Logic, Scores, Strategy};
