mod error;
mod feed;
mod segment;
mod cached_regex;

pub use cached_regex::cached_regex;
pub use error::Error;
#[cfg(test)]
pub use feed::WeekRecord;
pub use feed::Weeks;
pub use segment::{segment, DishList, MealSlot};
