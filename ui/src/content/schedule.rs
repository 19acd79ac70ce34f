use serde::Deserialize;

use crate::i18n::Lang;
use crate::t;

/// One class session. Missing fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScheduleEntry {
    pub day: String,
    pub time: String,
    /// Older documents call this `name`; see [`ScheduleEntry::class_name`].
    pub class: String,
    pub name: String,
    pub instructor: String,
}

impl ScheduleEntry {
    pub fn class_name(&self) -> &str {
        if self.class.is_empty() {
            &self.name
        } else {
            &self.class
        }
    }

    pub fn weekday(&self) -> Option<Weekday> {
        Weekday::parse(&self.day)
    }
}

pub fn parse_schedule(text: &str) -> Result<Vec<ScheduleEntry>, serde_json::Error> {
    serde_json::from_str(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Display order of the schedule table.
    pub const ORDER: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Case-insensitive English weekday name.
    pub fn parse(day: &str) -> Option<Weekday> {
        let day = day.trim().to_lowercase();
        Self::ORDER.into_iter().find(|d| d.key() == day)
    }

    /// Lowercase English name, the key used in `schedule.days`.
    pub fn key(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    pub fn label(self, lang: Lang) -> String {
        match self {
            Weekday::Monday => t!(lang, "day-monday"),
            Weekday::Tuesday => t!(lang, "day-tuesday"),
            Weekday::Wednesday => t!(lang, "day-wednesday"),
            Weekday::Thursday => t!(lang, "day-thursday"),
            Weekday::Friday => t!(lang, "day-friday"),
            Weekday::Saturday => t!(lang, "day-saturday"),
            Weekday::Sunday => t!(lang, "day-sunday"),
        }
    }
}

/// Entries grouped by weekday in [`Weekday::ORDER`]. Within a day the
/// document order is kept; entries with an unrecognised day are dropped.
pub fn group_by_day(entries: &[ScheduleEntry]) -> Vec<(Weekday, Vec<&ScheduleEntry>)> {
    Weekday::ORDER
        .into_iter()
        .filter_map(|day| {
            let sessions: Vec<_> = entries.iter().filter(|e| e.weekday() == Some(day)).collect();
            (!sessions.is_empty()).then_some((day, sessions))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_class_field_names() {
        let entries = parse_schedule(
            r#"[
                {"day":"Monday","time":"6pm","class":"Boxing","instructor":"Ali"},
                {"day":"tuesday","time":"7pm","name":"Yoga"}
            ]"#,
        )
        .unwrap();
        assert_eq!(entries[0].class_name(), "Boxing");
        assert_eq!(entries[1].class_name(), "Yoga");
        assert_eq!(entries[1].instructor, "");
    }

    #[test]
    fn grouping_uses_canonical_order_and_drops_unknown_days() {
        let entry = |day: &str, class: &str| ScheduleEntry {
            day: day.into(),
            class: class.into(),
            ..ScheduleEntry::default()
        };
        let entries = vec![
            entry("SUNDAY", "Stretch"),
            entry("monday", "Boxing"),
            entry("Funday", "Nope"),
            entry("Monday", "Crossfit"),
        ];

        let grouped = group_by_day(&entries);
        let days: Vec<_> = grouped.iter().map(|(day, _)| *day).collect();
        assert_eq!(days, vec![Weekday::Monday, Weekday::Sunday]);
        let monday: Vec<_> = grouped[0].1.iter().map(|e| e.class_name()).collect();
        assert_eq!(monday, vec!["Boxing", "Crossfit"]);
    }
}
