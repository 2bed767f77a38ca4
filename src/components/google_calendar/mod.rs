mod client;
pub mod models;
pub mod token;

pub use client::GoogleCalendarClient;
pub use models::{Attendee, CalendarEvent, EventDateTime, EventStatus, ResponseStatus};
pub use token::{CalendarSession, TokenManager};
