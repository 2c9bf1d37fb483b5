mod ics;
mod range;

use std::{collections::BTreeSet, sync::OnceLock};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;
use uuid::Uuid;

use crate::parse::{cached_regex, segment, DishList, MealSlot, Weeks};

pub use ics::write_calendar;
pub use range::{DateRange, RangeMode};

/// Time zone of the restaurant, used for every event start.
pub const TIMEZONE: &str = "Europe/Paris";
pub const CALENDAR_NAME: &str = "Menus RAK";
pub const MEAL_DURATION: Duration = Duration::minutes(45);
pub const BULLET: &str = "• ";

impl MealSlot {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Lunch => "Menu du midi",
            Self::Dinner => "Menu du soir",
        }
    }

    pub fn start_time(self) -> NaiveTime {
        match self {
            Self::Lunch => NaiveTime::from_hms_opt(12, 15, 0),
            Self::Dinner => NaiveTime::from_hms_opt(19, 15, 0),
        }
        .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    uid: String,
    title: &'static str,
    start: NaiveDateTime,
    duration: Duration,
    body: String,
}

impl CalendarEvent {
    pub fn new(date: NaiveDate, slot: MealSlot, dishes: &DishList) -> Self {
        let uid = Uuid::new_v5(
            &Uuid::NAMESPACE_URL,
            format!("rak-menu:{date}:{slot:?}").as_bytes(),
        );
        Self {
            uid: uid.to_string(),
            title: slot.title(),
            start: date.and_time(slot.start_time()),
            duration: MEAL_DURATION,
            body: render_dishes(dishes),
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub const fn title(&self) -> &'static str {
        self.title
    }

    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub const fn duration(&self) -> Duration {
        self.duration
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

impl PartialOrd for CalendarEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.title.cmp(other.title))
            .then_with(|| self.uid.cmp(&other.uid))
    }
}

fn render_dishes(dishes: &DishList) -> String {
    dishes
        .iter()
        .map(|dish| format!("{BULLET}{dish}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether the meal is only a closure notice. Every line has to announce it,
/// so a dish mentioning a closure word does not hide a served meal.
pub fn signals_closure(dishes: &DishList) -> bool {
    static CLOSED_RE: OnceLock<Regex> = OnceLock::new();
    let re = cached_regex(&CLOSED_RE, r"(?i)\b(?:fermée?|fermeture|closed)\b");
    !dishes.is_empty() && dishes.iter().all(|dish| re.is_match(dish))
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Skip {
    NotFound,
    Empty,
    Closed,
}

fn classify(dishes: Option<DishList>) -> Result<DishList, Skip> {
    match dishes {
        None => Err(Skip::NotFound),
        Some(d) if d.is_empty() => Err(Skip::Empty),
        Some(d) if signals_closure(&d) => Err(Skip::Closed),
        Some(d) => Ok(d),
    }
}

/// Builds one event per served meal of every date in `range`.
pub fn assemble(weeks: &Weeks, range: DateRange) -> BTreeSet<CalendarEvent> {
    let mut events = BTreeSet::new();
    for date in range.days() {
        let Some(week) = weeks.covering(date) else {
            tracing::debug!(%date, "no week of the feed covers this date");
            continue;
        };
        if date.weekday() == Weekday::Sun {
            continue;
        }
        for slot in MealSlot::ALL {
            match classify(segment(week.raw_text(), date, slot)) {
                Ok(dishes) => {
                    events.insert(CalendarEvent::new(date, slot, &dishes));
                }
                Err(reason) => {
                    tracing::debug!(%date, ?slot, ?reason, "no event for this meal");
                }
            }
        }
    }
    events
}
