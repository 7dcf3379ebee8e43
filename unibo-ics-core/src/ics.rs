//! ICS calendar generation.

use icalendar::{Calendar, CalendarDateTime, Component, Event, EventLike, Property};
use sha2::{Digest, Sha256};

use crate::timetable::{TimetableEvent, calendar_time};

/// Calendar generation options.
#[derive(Debug, Clone, Default)]
pub struct IcsOptions {
    /// Calendar display name (`X-WR-CALNAME`).
    pub calendar_name: Option<String>,
}

/// Builds ICS calendar documents from timetables.
pub struct IcsGenerator {
    options: IcsOptions,
}

impl IcsGenerator {
    pub fn new(options: IcsOptions) -> Self {
        Self { options }
    }

    /// Map a timetable into a calendar document.
    ///
    /// The document carries request-method semantics. Events keep the feed's
    /// order, one calendar event per timetable event; an empty timetable
    /// yields an empty, still valid document.
    pub fn generate(&self, timetable: &[TimetableEvent]) -> Calendar {
        let mut calendar = Calendar::new();
        calendar.append_property(Property::new("METHOD", "REQUEST"));

        if let Some(ref name) = self.options.calendar_name {
            calendar.name(name);
        }

        for event in timetable {
            calendar.push(self.build_event(event));
        }

        calendar.done()
    }

    fn build_event(&self, event: &TimetableEvent) -> Event {
        let mut ics_event = Event::new();
        ics_event.uid(&event_uid(event));
        ics_event.add_property("ORGANIZER", &event.docente);
        ics_event.summary(&event.title);
        ics_event.starts(CalendarDateTime::Floating(event.start));
        ics_event.ends(CalendarDateTime::Floating(event.end));
        ics_event.description(&event_description(event));

        if let Some(aula) = event.aule.first() {
            ics_event.location(&aula.des_risorsa);
        }

        ics_event.done()
    }
}

impl Default for IcsGenerator {
    fn default() -> Self {
        Self::new(IcsOptions::default())
    }
}

/// Content-derived identifier of a timetable event.
///
/// Hashes the module code and the wire-format string forms of the start and
/// end timestamps, in that order. Re-running on unchanged input reproduces
/// the identical identifier, so regenerated calendars can be diffed against
/// earlier runs.
pub fn event_uid(event: &TimetableEvent) -> String {
    let mut hasher = Sha256::new();
    hasher.update(event.cod_modulo.as_bytes());
    hasher.update(event.start.format(calendar_time::FORMAT).to_string().as_bytes());
    hasher.update(event.end.format(calendar_time::FORMAT).to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Free-text event description: docente, first aula (when any), cfu, periodo.
fn event_description(event: &TimetableEvent) -> String {
    let mut description = String::new();

    description.push_str(&format!("Docente: {}\n", event.docente));
    if let Some(aula) = event.aule.first() {
        description.push_str(&format!("Aula: {}\n", aula.des_risorsa));
    }
    description.push_str(&format!("Cfu: {}\n", event.cfu));
    description.push_str(&format!("Periodo: {}\n", event.periodo));

    description
}
