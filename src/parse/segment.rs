use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;

use crate::parse::cached_regex;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum MealSlot {
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [Self; 2] = [Self::Lunch, Self::Dinner];
}

/// Ordered dish lines of one meal.
pub type DishList = Vec<String>;

/// Line in the feed flagging a food bar annotation rather than a dish.
pub const NOISE_MARKER: &str = "***Rampe***";

// indexed by Weekday::num_days_from_monday
static DAY_NAMES: [&str; 7] = [
    "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche",
];

/// French name of a weekday, as used in the feed's day headers.
pub fn day_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// Text belonging to the day called `name`: from the end of its
/// `--- name ---` header to the start of the next day header, or the end of
/// the text.
fn day_section<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    static DAY_HEADER_RE: OnceLock<Regex> = OnceLock::new();
    let re = cached_regex(
        &DAY_HEADER_RE,
        r"---\s*(Lundi|Mardi|Mercredi|Jeudi|Vendredi|Samedi|Dimanche)\s*---",
    );
    let mut headers = re.captures_iter(text);
    let header = headers.find(|c| &c[1] == name)?.get(0)?;
    let start = header.end();
    let end = headers
        .next()
        .and_then(|c| c.get(0))
        .map_or(text.len(), |m| m.start());
    Some(&text[start..end])
}

fn meal_section(day: &str, slot: MealSlot) -> Option<&str> {
    static LUNCH_RE: OnceLock<Regex> = OnceLock::new();
    static DINNER_RE: OnceLock<Regex> = OnceLock::new();
    static DASHES_RE: OnceLock<Regex> = OnceLock::new();
    let lunch = cached_regex(&LUNCH_RE, r"\|\s*Dejeuner\s*\|");
    let dinner = cached_regex(&DINNER_RE, r"\|\s*Diner\s*\|");
    match slot {
        MealSlot::Lunch => {
            let start = lunch.find(day)?.end();
            let rest = &day[start..];
            let end = dinner.find(rest).map_or(rest.len(), |m| m.start());
            Some(&rest[..end])
        }
        MealSlot::Dinner => {
            let start = dinner.find(day)?.end();
            let rest = &day[start..];
            let end = cached_regex(&DASHES_RE, r"---+")
                .find(rest)
                .map_or(rest.len(), |m| m.start());
            Some(&rest[..end])
        }
    }
}

fn dish_lines(section: &str) -> DishList {
    section
        .split(['|', '\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.contains(NOISE_MARKER))
        .map(str::to_owned)
        .collect()
}

/// Extracts the dishes served on `date` for `slot` from a week's cleaned text.
///
/// Returns `None` when the day header or the meal marker cannot be found.
/// An empty list means the markers are present but no dish is listed.
pub fn segment(text: &str, date: NaiveDate, slot: MealSlot) -> Option<DishList> {
    let day = day_section(text, day_name(date.weekday()))?;
    let meal = meal_section(day, slot)?;
    Some(dish_lines(meal))
}
