use dioxus::prelude::*;

use super::render_html;
use crate::config::SiteConfig;
use crate::content::schedule::group_by_day;
use crate::content::{present, ScheduleEntry, SiteContent};
use crate::core::format::{international_digits, whatsapp_url};
use crate::core::Document;
use crate::i18n::Lang;
use crate::t;

pub const SCHEDULE_CONTAINER: &str = "schedule-display";

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleHeaders {
    pub day: String,
    pub time: String,
    pub class: String,
    pub coach: String,
}

impl ScheduleHeaders {
    pub fn for_lang(lang: Lang) -> Self {
        Self {
            day: t!(lang, "schedule-col-day"),
            time: t!(lang, "schedule-col-time"),
            class: t!(lang, "schedule-col-class"),
            coach: t!(lang, "schedule-col-coach"),
        }
    }
}

/// A table row; only the first session of a day carries the day cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    pub day_cell: Option<DayCell>,
    pub time: String,
    pub class: String,
    pub coach: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub label: String,
    pub rowspan: usize,
}

pub fn schedule_rows(entries: &[ScheduleEntry], site: &SiteContent, lang: Lang) -> Vec<ScheduleRow> {
    let mut rows = Vec::new();
    for (day, sessions) in group_by_day(entries) {
        let label = site
            .schedule
            .days
            .get(day.key())
            .filter(|name| !name.is_empty())
            .cloned()
            .unwrap_or_else(|| day.label(lang));
        let rowspan = sessions.len();
        for (idx, entry) in sessions.into_iter().enumerate() {
            rows.push(ScheduleRow {
                day_cell: (idx == 0).then(|| DayCell {
                    label: label.clone(),
                    rowspan,
                }),
                time: entry.time.clone(),
                class: entry.class_name().to_string(),
                coach: entry.instructor.clone(),
            });
        }
    }
    rows
}

#[component]
pub fn ScheduleTable(headers: ScheduleHeaders, rows: Vec<ScheduleRow>) -> Element {
    rsx! {
        table { class: "schedule-table",
            thead {
                tr {
                    th { "{headers.day}" }
                    th { "{headers.time}" }
                    th { "{headers.class}" }
                    th { "{headers.coach}" }
                }
            }
            tbody {
                for (idx, row) in rows.into_iter().enumerate() {
                    tr { key: "{idx}",
                        {row.day_cell.map(|day| rsx! {
                            td { rowspan: "{day.rowspan}", "data-label": "{headers.day}", "{day.label}" }
                        })}
                        td { "data-label": "{headers.time}", "{row.time}" }
                        td { "data-label": "{headers.class}", "{row.class}" }
                        td { "data-label": "{headers.coach}", "{row.coach}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn SchedulePlaceholder(message: String, link: String, label: String) -> Element {
    rsx! {
        div { class: "schedule-placeholder",
            p { "{message}" }
            a { href: "{link}", class: "btn btn-primary", target: "_blank", "{label}" }
        }
    }
}

pub fn schedule_html(
    entries: &[ScheduleEntry],
    site: &SiteContent,
    lang: Lang,
    config: &SiteConfig,
) -> String {
    let rows = schedule_rows(entries, site, lang);
    if rows.is_empty() {
        return placeholder_html(site, lang, config);
    }
    render_html(
        ScheduleTable,
        ScheduleTableProps {
            headers: ScheduleHeaders::for_lang(lang),
            rows,
        },
    )
}

fn placeholder_html(site: &SiteContent, lang: Lang, config: &SiteConfig) -> String {
    let copy = &site.schedule;
    let number = present(&site.phone)
        .map(|phone| international_digits(phone, &config.country_code))
        .unwrap_or_else(|| config.default_schedule_phone.clone());
    let message = present(&copy.whatsapp_message)
        .map(str::to_string)
        .unwrap_or_else(|| t!(lang, "schedule-whatsapp-message"));

    render_html(
        SchedulePlaceholder,
        SchedulePlaceholderProps {
            message: present(&copy.coming_soon)
                .map(str::to_string)
                .unwrap_or_else(|| t!(lang, "schedule-coming-soon")),
            link: whatsapp_url(&format!("https://wa.me/{number}"), &message),
            label: present(&site.cta.contact)
                .map(str::to_string)
                .unwrap_or_else(|| t!(lang, "schedule-contact")),
        },
    )
}

/// Fills `#schedule-display` when the page has one.
pub fn paint_schedule<D: Document>(
    doc: &D,
    entries: &[ScheduleEntry],
    site: &SiteContent,
    lang: Lang,
    config: &SiteConfig,
) {
    if let Some(container) = doc.by_id(SCHEDULE_CONTAINER) {
        doc.set_inner_html(&container, &schedule_html(entries, site, lang, config));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: &str, time: &str, class: &str, instructor: &str) -> ScheduleEntry {
        ScheduleEntry {
            day: day.into(),
            time: time.into(),
            class: class.into(),
            instructor: instructor.into(),
            ..ScheduleEntry::default()
        }
    }

    #[test]
    fn rows_span_their_day() {
        let entries = vec![
            entry("Wednesday", "8am", "Spin", "Mona"),
            entry("monday", "6pm", "Boxing", "Ali"),
            entry("Monday", "7pm", "Crossfit", "Omar"),
        ];
        let rows = schedule_rows(&entries, &SiteContent::default(), Lang::En);

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].day_cell,
            Some(DayCell { label: "Monday".into(), rowspan: 2 })
        );
        assert_eq!(rows[1].day_cell, None);
        assert_eq!(rows[1].class, "Crossfit");
        assert_eq!(rows[2].day_cell.as_ref().map(|d| d.label.as_str()), Some("Wednesday"));
    }

    #[test]
    fn content_day_names_win() {
        let mut site = SiteContent::default();
        site.schedule.days.insert("monday".into(), "الاثنين".into());
        let rows = schedule_rows(&[entry("Monday", "6pm", "Boxing", "Ali")], &site, Lang::Ar);
        assert_eq!(rows[0].day_cell.as_ref().map(|d| d.label.as_str()), Some("الاثنين"));
    }

    #[test]
    fn table_markup_escapes_values() {
        let html = schedule_html(
            &[entry("Friday", "9pm", "<b>HIIT</b>", "Sara")],
            &SiteContent::default(),
            Lang::En,
            &SiteConfig::default(),
        );
        assert!(html.starts_with("<table class=\"schedule-table\">"));
        assert!(html.contains("&lt;b&gt;HIIT&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn placeholder_links_to_whatsapp() {
        let mut site = SiteContent::default();
        site.phone = Some("01112622236".into());
        let html = schedule_html(&[], &site, Lang::En, &SiteConfig::default());

        assert!(html.contains("class=\"schedule-placeholder\""));
        assert!(html.contains("Schedule will be updated soon."));
        assert!(html.contains(
            "https://wa.me/201112622236?text=Hi%2C%20I%20want%20to%20know%20the%20schedule."
        ));
        assert!(html.contains("Contact us on WhatsApp"));
    }
}
