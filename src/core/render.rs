use crate::domain::model::{SearchOutcome, TherapistRecord};
use chrono::{DateTime, Utc};

pub const DEFAULT_TITLE: &str = "Therapist";
pub const UNKNOWN_EXPERIENCE: &str = "Unknown";

const MS_PER_YEAR: i64 = 1000 * 60 * 60 * 24 * 365;

/// Turns a search outcome into an HTML fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultRenderer;

impl ResultRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, outcome: &SearchOutcome) -> String {
        self.render_at(outcome, Utc::now())
    }

    pub fn render_at(&self, outcome: &SearchOutcome, now: DateTime<Utc>) -> String {
        match outcome {
            SearchOutcome::Found(records) if records.is_empty() => empty_state(),
            SearchOutcome::Found(records) => records
                .iter()
                .enumerate()
                .map(|(index, record)| therapist_card(record, index, now))
                .collect::<Vec<_>>()
                .join("\n"),
            SearchOutcome::Failed(message) => error_state(message),
        }
    }
}

fn therapist_card(record: &TherapistRecord, index: usize, now: DateTime<Utc>) -> String {
    let initials = generate_initials(&record.first_name, &record.last_name);
    let experience = calculate_experience(record.registration_date, now);
    let title = record
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    format!(
        r#"<div class="therapist-card" style="--delay: {index}">
    <div class="therapist-header">
        <div class="therapist-avatar">{initials}</div>
        <div>
            <h3 class="therapist-name">{first} {last}</h3>
            <p class="therapist-title">{title}</p>
        </div>
    </div>
    <div class="therapist-details">
        <div class="detail-item"><span class="detail-icon">🏥</span><span>Method: {methods}</span></div>
        <div class="detail-item"><span class="detail-icon">📍</span><span>District: {postal_code} {state}</span></div>
        <div class="detail-item"><span class="detail-icon">⏱️</span><span>Experience: {experience} years</span></div>
        <div class="detail-item"><span class="detail-icon">📧</span><span>{email}</span></div>
    </div>
</div>"#,
        index = index,
        initials = escape_html(&initials),
        first = escape_html(&record.first_name),
        last = escape_html(&record.last_name),
        title = escape_html(title),
        methods = escape_html(&record.therapy_methods),
        postal_code = escape_html(&record.postal_code),
        state = escape_html(&record.state),
        experience = escape_html(&experience),
        email = escape_html(&record.email),
    )
}

fn empty_state() -> String {
    r#"<div class="empty-state">
    <div class="empty-state-icon">🔍</div>
    <h3 class="empty-state-title">No therapists found</h3>
    <p class="empty-state-message">Try adjusting your search criteria or browse all available therapists.</p>
</div>"#
        .to_string()
}

fn error_state(message: &str) -> String {
    format!(
        r#"<div class="empty-state error-state">
    <div class="empty-state-icon">⚠️</div>
    <h3 class="empty-state-title">Search Error</h3>
    <p class="empty-state-message">{}<br>Please try again or contact support if the problem persists.</p>
</div>"#,
        escape_html(message)
    )
}

/// First letter of each name, uppercased; `?` when both are empty.
pub fn generate_initials(first_name: &str, last_name: &str) -> String {
    let initials: String = [first_name, last_name]
        .iter()
        .filter_map(|name| name.trim().chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

/// Whole 365-day years between registration and `now`. Leap days are ignored.
pub fn calculate_experience(registration_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match registration_date {
        Some(registered) => {
            let elapsed_ms = (now - registered).num_milliseconds().abs();
            (elapsed_ms / MS_PER_YEAR).to_string()
        }
        None => UNKNOWN_EXPERIENCE.to_string(),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Minimal standalone document around a results fragment.
pub fn render_page(fragment: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>ELIS - Therapist Search</title>
</head>
<body>
<section id="resultsSection">
<div id="resultsContainer">
{}
</div>
</section>
</body>
</html>
"#,
        fragment
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn jane() -> TherapistRecord {
        TherapistRecord {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            title: Some("Mag.".to_string()),
            therapy_methods: "Gestalttherapie".to_string(),
            postal_code: "1010".to_string(),
            state: "Wien".to_string(),
            registration_date: Some(now() - Duration::days(730)),
            email: "jane@example.com".to_string(),
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(generate_initials("Jane", "Doe"), "JD");
        assert_eq!(generate_initials("jane", ""), "J");
        assert_eq!(generate_initials("", "doe"), "D");
        assert_eq!(generate_initials("", ""), "?");
        assert_eq!(generate_initials("ßa", "öz"), "SSÖ");
    }

    #[test]
    fn test_experience_floors_365_day_years() {
        let now = now();
        assert_eq!(calculate_experience(Some(now - Duration::days(730)), now), "2");
        assert_eq!(calculate_experience(Some(now - Duration::days(729)), now), "1");
        assert_eq!(calculate_experience(Some(now - Duration::days(364)), now), "0");
        assert_eq!(calculate_experience(None, now), "Unknown");
    }

    #[test]
    fn test_future_registration_counts_absolute_distance() {
        let now = now();
        assert_eq!(calculate_experience(Some(now + Duration::days(400)), now), "1");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("A & B \"C\""), "A &amp; B &quot;C&quot;");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_render_cards() {
        let renderer = ResultRenderer::new();
        let mut second = jane();
        second.first_name = "Max".to_string();
        second.last_name = "Muster".to_string();
        second.title = None;
        second.registration_date = None;

        let html = renderer.render_at(&SearchOutcome::Found(vec![jane(), second]), now());

        assert_eq!(html.matches("class=\"therapist-card\"").count(), 2);
        assert!(html.contains(r#"<div class="therapist-avatar">JD</div>"#));
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("Mag."));
        assert!(html.contains("Method: Gestalttherapie"));
        assert!(html.contains("District: 1010 Wien"));
        assert!(html.contains("Experience: 2 years"));
        assert!(html.contains("jane@example.com"));
        assert!(html.contains(r#"<div class="therapist-avatar">MM</div>"#));
        assert!(html.contains(r#"<p class="therapist-title">Therapist</p>"#));
        assert!(html.contains("Experience: Unknown years"));
        assert!(!html.contains("No therapists found"));
    }

    #[test]
    fn test_render_empty_placeholder() {
        let html = ResultRenderer::new().render_at(&SearchOutcome::Found(vec![]), now());
        assert!(html.contains("No therapists found"));
        assert!(!html.contains("therapist-card"));
    }

    #[test]
    fn test_render_error_placeholder() {
        let html = ResultRenderer::new().render_at(
            &SearchOutcome::Failed("Invalid district code".to_string()),
            now(),
        );
        assert!(html.contains("Search Error"));
        assert!(html.contains("Invalid district code"));
        assert!(!html.contains("therapist-card"));
    }

    #[test]
    fn test_render_escapes_record_fields() {
        let mut record = jane();
        record.first_name = "<script>".to_string();
        record.email = "<img src=x onerror=alert(1)>".to_string();

        let html = ResultRenderer::new().render_at(&SearchOutcome::Found(vec![record]), now());

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(!html.contains("<img"));
        // 頭像中的縮寫也要轉義
        assert!(html.contains(r#"<div class="therapist-avatar">&lt;D</div>"#));
    }

    #[test]
    fn test_render_escapes_error_message() {
        let html = ResultRenderer::new()
            .render_at(&SearchOutcome::Failed("<b>bad</b>".to_string()), now());
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(!html.contains("<b>bad"));
    }

    #[test]
    fn test_render_page_wraps_fragment() {
        let page = render_page("<p>x</p>");
        assert!(page.contains("<div id=\"resultsContainer\">\n<p>x</p>\n</div>"));
    }
}
