use std::{slice::Iter, sync::OnceLock};

use chrono::NaiveDate;
use regex::Regex;

use crate::parse::{cached_regex, Error};

/// One feed item describing a week of menus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRecord {
    start_date: NaiveDate,
    end_date: NaiveDate,
    raw_text: String,
}

impl WeekRecord {
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub const fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// The two dates of a `du DD/MM/YYYY au DD/MM/YYYY` title, unparsed.
    fn range_text(title: &str) -> Option<(&str, &str)> {
        static RANGE_RE: OnceLock<Regex> = OnceLock::new();
        let re = cached_regex(
            &RANGE_RE,
            r"du\s+(\d{1,2}/\d{1,2}/\d{4})\s+au\s+(\d{1,2}/\d{1,2}/\d{4})",
        );
        let captures = re.captures(title)?;
        Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
    }

    fn from_item(item: roxmltree::Node) -> Option<Self> {
        let title = child_text(item, "title")?;
        let Some((start, end)) = Self::range_text(&title) else {
            log::debug!("Feed item \"{title}\" carries no menu date range, skipping");
            return None;
        };
        let parse = |s: &str| NaiveDate::parse_from_str(s, "%d/%m/%Y").ok();
        let (Some(start_date), Some(end_date)) = (parse(start), parse(end)) else {
            log::warn!("Feed item \"{title}\" has a range with an invalid date, skipping");
            return None;
        };
        if start_date > end_date {
            log::warn!("Feed item \"{title}\" ends before it starts, skipping");
            return None;
        }
        let description = child_text(item, "description").unwrap_or_default();
        Some(Self {
            start_date,
            end_date,
            raw_text: clean_description(&description),
        })
    }
}

/// Concatenates every text and CDATA node below the first child named `name`.
fn child_text(node: roxmltree::Node, name: &str) -> Option<String> {
    let child = node.children().find(|n| n.has_tag_name(name))?;
    Some(
        child
            .descendants()
            .filter(roxmltree::Node::is_text)
            .filter_map(|n| n.text())
            .collect(),
    )
}

/// Strips CDATA markers and markup tags, decodes non-breaking spaces and trims.
pub fn clean_description(description: &str) -> String {
    static CDATA_RE: OnceLock<Regex> = OnceLock::new();
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let cdata = cached_regex(&CDATA_RE, r"<!\[CDATA\[|\]\]>");
    let tags = cached_regex(&TAG_RE, r"<[^>]+>");
    let without_cdata = cdata.replace_all(description, "");
    let without_tags = tags.replace_all(&without_cdata, "");
    without_tags
        .replace("&nbsp;", " ")
        .replace('\u{00A0}', " ")
        .trim()
        .to_owned()
}

/// Every week record of a feed, in document order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Weeks {
    weeks: Vec<WeekRecord>,
}

impl Weeks {
    pub fn from_xml(raw: &str) -> Result<Self, Error> {
        let document = roxmltree::Document::parse(raw)?;
        let channel = document
            .descendants()
            .find(|n| n.has_tag_name("channel"))
            .ok_or_else(|| Error::missing_element_error("The feed should have a channel."))?;
        let weeks = channel
            .descendants()
            .filter(|n| n.has_tag_name("item"))
            .filter_map(WeekRecord::from_item)
            .collect();
        Ok(Self { weeks })
    }

    pub fn iter(&self) -> Iter<WeekRecord> {
        self.weeks.iter()
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// The record describing `date`. Republished weeks overlap earlier ones, so
    /// the record appearing last in the feed wins.
    pub fn covering(&self, date: NaiveDate) -> Option<&WeekRecord> {
        self.weeks.iter().rev().find(|week| week.contains(date))
    }

    /// Latest end date among the weeks starting on or after `today`, falling
    /// back to weeks that still cover `today` or later.
    pub fn last_date_from(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.weeks
            .iter()
            .filter(|week| week.start_date() >= today)
            .map(WeekRecord::end_date)
            .max()
            .or_else(|| {
                self.weeks
                    .iter()
                    .filter(|week| week.end_date() >= today)
                    .map(WeekRecord::end_date)
                    .max()
            })
    }
}

impl<'a> IntoIterator for &'a Weeks {
    type Item = &'a WeekRecord;
    type IntoIter = Iter<'a, WeekRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
impl FromIterator<WeekRecord> for Weeks {
    fn from_iter<T: IntoIterator<Item = WeekRecord>>(iter: T) -> Self {
        Self {
            weeks: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl WeekRecord {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, raw_text: &str) -> Self {
        Self {
            start_date,
            end_date,
            raw_text: raw_text.to_owned(),
        }
    }
}
