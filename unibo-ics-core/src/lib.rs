//! Unibo ICS Core Library
//!
//! This library resolves the University of Bologna open data catalogue into
//! course records, locates each course's lesson timetable feed and converts
//! it into an ICS calendar document.

pub mod client;
pub mod courses;
pub mod error;
pub mod ics;
pub mod opendata;
pub mod timetable;
pub mod website;

// Re-export core types and error handling
pub use client::{UniboClient, UniboClientBuilder};
pub use courses::Course;
pub use error::{Error, Result};
pub use opendata::{Package, Resource, Resources};
pub use timetable::{Timetable, TimetableEvent};
pub use website::CourseWebsiteId;

/// Commonly used items
pub mod prelude {
    pub use crate::{client::*, courses::*, ics::*, opendata::*, timetable::*, website::*};
}
