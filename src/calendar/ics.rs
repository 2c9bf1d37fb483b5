use std::{collections::BTreeSet, ffi::OsString, path::Path};

use chrono::{Duration, Utc};
use icalendar::{Calendar, CalendarDateTime, Component, Event, EventLike};
use tokio::fs;

use super::{CalendarEvent, CALENDAR_NAME, TIMEZONE};

fn format_iso_duration(duration: Duration) -> String {
    let mins = duration.num_minutes();
    if mins % 60 == 0 {
        format!("PT{}H", mins / 60)
    } else {
        format!("PT{mins}M")
    }
}

impl CalendarEvent {
    fn to_vevent(&self) -> Event {
        Event::new()
            .uid(self.uid())
            .summary(self.title())
            .description(self.body())
            .timestamp(Utc::now())
            .starts(CalendarDateTime::WithTimezone {
                date_time: self.start(),
                tzid: TIMEZONE.to_owned(),
            })
            .add_property("DURATION", format_iso_duration(self.duration()))
            .done()
    }
}

// Europe/Paris rules since 1996: CEST from the last Sunday of March to the
// last Sunday of October.
const VTIMEZONE: &str = "BEGIN:VTIMEZONE\r
TZID:Europe/Paris\r
BEGIN:DAYLIGHT\r
TZOFFSETFROM:+0100\r
TZOFFSETTO:+0200\r
TZNAME:CEST\r
DTSTART:19700329T020000\r
RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU\r
END:DAYLIGHT\r
BEGIN:STANDARD\r
TZOFFSETFROM:+0200\r
TZOFFSETTO:+0100\r
TZNAME:CET\r
DTSTART:19701025T030000\r
RRULE:FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU\r
END:STANDARD\r
END:VTIMEZONE\r
";

/// Renders the events as an iCalendar document, one VEVENT each.
///
/// `icalendar` has no VTIMEZONE component, so the definition of the zone
/// every DTSTART refers to is spliced in ahead of the first VEVENT.
pub fn to_ics(events: &BTreeSet<CalendarEvent>) -> String {
    let mut calendar = Calendar::new();
    calendar.name(CALENDAR_NAME).timezone(TIMEZONE);
    for event in events {
        calendar.push(event.to_vevent());
    }
    let mut ics = calendar.done().to_string();
    let at = ics
        .find("BEGIN:VEVENT")
        .or_else(|| ics.find("END:VCALENDAR"))
        .unwrap_or(ics.len());
    ics.insert_str(at, VTIMEZONE);
    ics
}

/// Writes the calendar next to `path` first and renames it into place, so an
/// interrupted run never leaves a truncated file behind.
pub async fn write_calendar(
    path: impl AsRef<Path>,
    events: &BTreeSet<CalendarEvent>,
) -> std::io::Result<()> {
    let path = path.as_ref();
    let mut partial = OsString::from(path.as_os_str());
    partial.push(".part");
    let ics = to_ics(events);
    if let Err(e) = fs::write(&partial, ics).await {
        let _res = fs::remove_file(&partial).await;
        return Err(e);
    }
    if let Err(e) = fs::rename(&partial, path).await {
        let _res = fs::remove_file(&partial).await;
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::MealSlot;
    use chrono::NaiveDate;

    fn events() -> BTreeSet<CalendarEvent> {
        let monday = NaiveDate::from_ymd_opt(2024, 9, 16).unwrap();
        [
            CalendarEvent::new(monday, MealSlot::Dinner, &vec!["Soupe".to_owned()]),
            CalendarEvent::new(monday, MealSlot::Lunch, &vec!["Poulet".to_owned()]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_format_iso_duration() {
        assert_eq!(format_iso_duration(Duration::minutes(45)), "PT45M");
        assert_eq!(format_iso_duration(Duration::minutes(120)), "PT2H");
    }

    #[test]
    fn test_to_ics() {
        let ics = to_ics(&events());
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
        assert!(ics.contains("DTSTART;TZID=Europe/Paris:20240916T121500"));
        assert!(ics.contains("DTSTART;TZID=Europe/Paris:20240916T191500"));
        assert_eq!(ics.matches("DURATION:PT45M").count(), 2);
        assert!(ics.contains("SUMMARY:Menu du midi"));
        assert!(ics.contains("SUMMARY:Menu du soir"));
        assert!(ics.contains("DESCRIPTION:• Poulet"));
        assert!(ics.contains("X-WR-TIMEZONE:Europe/Paris"));
        // lunch comes first
        assert!(ics.find("Menu du midi") < ics.find("Menu du soir"));
    }

    #[tokio::test]
    async fn test_write_calendar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menus.ics");
        write_calendar(&path, &events()).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("BEGIN:VCALENDAR"));
        assert!(!dir.path().join("menus.ics.part").exists());
    }

    #[test]
    fn test_to_ics_defines_timezone() {
        let ics = to_ics(&events());
        assert_eq!(ics.matches("BEGIN:VTIMEZONE").count(), 1);
        assert!(ics.contains("TZID:Europe/Paris\r\n"));
        assert!(ics.find("END:VTIMEZONE") < ics.find("BEGIN:VEVENT"));

        let empty = to_ics(&BTreeSet::new());
        assert!(empty.find("BEGIN:VTIMEZONE") < empty.find("END:VCALENDAR"));
        assert!(empty.starts_with("BEGIN:VCALENDAR"));
    }

    #[tokio::test]
    async fn test_write_calendar_failed_rename_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory cannot be replaced by a file
        let path = dir.path().join("menus.ics");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "").unwrap();
        assert!(write_calendar(&path, &events()).await.is_err());
        assert!(!dir.path().join("menus.ics.part").exists());
        assert!(path.join("keep").exists());
    }

    #[tokio::test]
    async fn test_write_calendar_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("menus.ics");
        assert!(write_calendar(&path, &events()).await.is_err());
        assert!(!path.exists());
    }
}
