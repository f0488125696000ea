// src/notify/format.rs
use crate::ingest::types::{Extras, JobPosting, Source};

/// Renders the alert text for one posting.
pub fn format_message(job: &JobPosting) -> String {
    let mut lines = vec![
        "🔔 New job match!".to_string(),
        String::new(),
        format!("📋 {}", job.title),
        format!("🏢 {}", job.company),
        format!("📅 Posted: {}", job.created_at),
        format!("🌐 Source: {}", job.source),
    ];

    if let Some(s) = format_salary(job.salary_min, job.salary_max) {
        lines.push(format!("💰 Salary: {s}"));
    }
    if let Some(r) = job.is_remote {
        lines.push(format!("🏠 Remote: {}", if r { "Yes" } else { "No" }));
    }
    if let Some(t) = job.employment_type.as_deref().filter(|t| !t.is_empty()) {
        lines.push(format!("⏰ Type: {t}"));
    }

    source_block(job, &mut lines);

    if let Some(u) = job.url.as_deref().filter(|u| !u.is_empty()) {
        lines.push(format!("🔗 {u}"));
    }
    lines.join("\n")
}

fn source_block(job: &JobPosting, lines: &mut Vec<String>) {
    match &job.extras {
        Extras::LinkedIn {
            company_size,
            company_industry,
            company_employees,
            recruiter_name,
            recruiter_title,
        } => {
            if let Some(v) = present(company_size) {
                lines.push(format!("🏢 Company Size: {v}"));
            }
            if let Some(v) = present(company_industry) {
                lines.push(format!("🏭 Industry: {v}"));
            }
            if let Some(v) = present(company_employees) {
                lines.push(format!("👥 Employees: {v}"));
            }
            if let Some(name) = present(recruiter_name) {
                match present(recruiter_title) {
                    Some(t) => lines.push(format!("👤 Recruiter: {name} ({t})")),
                    None => lines.push(format!("👤 Recruiter: {name}")),
                }
            }
        }
        Extras::Glassdoor {
            rating,
            job_type,
            easy_apply,
            is_urgent,
            age_days,
        } => {
            if let Some(r) = rating.filter(|r| *r > 0.0) {
                lines.push(format!("⭐ Company Rating: {r:.1}/5"));
            }
            if let Some(t) = present(job_type) {
                lines.push(format!("⏰ Job Type: {t}"));
            }
            if *easy_apply {
                lines.push("✅ Easy Apply: Yes".to_string());
            }
            if *is_urgent {
                lines.push("🚨 Urgent: New Job".to_string());
            }
            match age_days {
                Some(0) => lines.push("📅 Posted: Today".to_string()),
                Some(1) => lines.push("📅 Posted: Yesterday".to_string()),
                Some(n) => lines.push(format!("📅 Posted: {n} days ago")),
                None => {}
            }
            if job.source == Source::GlassdoorCa {
                lines.push("🇨🇦 Location: Canada".to_string());
            }
        }
        Extras::Indeed {
            relative_time,
            salary_type,
        } => {
            if let Some(v) = present(relative_time) {
                lines.push(format!("⏰ Posted: {v}"));
            }
            if let Some(v) = present(salary_type) {
                lines.push(format!("💰 Pay Type: {v}"));
            }
        }
        Extras::None => {}
    }
}

fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `$min - $max` when both bounds are known, `$min+` with only a minimum.
/// Zero bounds count as unknown.
pub fn format_salary(min: Option<f64>, max: Option<f64>) -> Option<String> {
    let min = min.filter(|v| *v > 0.0)?;
    match max.filter(|v| *v > 0.0) {
        Some(max) => Some(format!("${} - ${}", format_money(min), format_money(max))),
        None => Some(format!("${}+", format_money(min))),
    }
}

/// Thousands separators; two decimals only when the value is fractional.
pub fn format_money(v: f64) -> String {
    let neg = v < 0.0;
    let v = v.abs();
    let cents = (v * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if neg { "-" } else { "" };
    if frac == 0 {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_grouping() {
        assert_eq!(format_money(0.0), "0");
        assert_eq!(format_money(999.0), "999");
        assert_eq!(format_money(1000.0), "1,000");
        assert_eq!(format_money(150000.0), "150,000");
        assert_eq!(format_money(1234567.5), "1,234,567.50");
    }

    #[test]
    fn salary_shapes() {
        assert_eq!(
            format_salary(Some(100000.0), Some(150000.0)).as_deref(),
            Some("$100,000 - $150,000")
        );
        assert_eq!(format_salary(Some(100000.0), None).as_deref(), Some("$100,000+"));
        assert_eq!(format_salary(Some(100000.0), Some(0.0)).as_deref(), Some("$100,000+"));
        assert_eq!(format_salary(None, Some(150000.0)), None);
        assert_eq!(format_salary(Some(0.0), Some(150000.0)), None);
    }

    #[test]
    fn whole_rating_keeps_one_decimal() {
        let mut job = JobPosting::new(Source::Glassdoor, "9");
        job.extras = Extras::Glassdoor {
            rating: Some(4.0),
            job_type: None,
            easy_apply: false,
            is_urgent: false,
            age_days: Some(0),
        };
        assert!(format_message(&job).contains("⭐ Company Rating: 4.0/5\n"));
    }
}
