// tests/matching_and_format.rs
use chrono::{Duration, TimeZone, Utc};
use jobwatch::ingest::keywords::KeywordMatcher;
use jobwatch::ingest::normalize_text;
use jobwatch::ingest::recency::{is_recent, is_recent_raw, RawTimestamp, Window};
use jobwatch::ingest::types::{Extras, JobPosting, Source};
use jobwatch::notify::{format_message, format_salary};

#[test]
fn keyword_matcher_is_case_insensitive_substring() {
    let m = KeywordMatcher::default();
    assert!(m.matches("Senior REACT Developer"));
    assert!(!m.matches(""));
    assert!(!m.matches_opt(None));
    // substring semantics: "ai" inside "pairing"
    assert!(m.matches("pairing"));
    assert!(!m.matches("Barista"));
}

#[test]
fn recency_boundary_is_closed() {
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
    for w in [Window::Hour, Window::Day, Window::Week] {
        assert!(is_recent(now - w.duration(), now, w));
        assert!(!is_recent(now - w.duration() - Duration::seconds(1), now, w));
    }
}

#[test]
fn raw_timestamps_of_every_shape() {
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
    let hour = Window::Hour;
    assert!(is_recent_raw(&RawTimestamp::Text("2025-06-10T11:30:00Z"), now, hour));
    assert!(is_recent_raw(&RawTimestamp::Text("2025-06-10T13:30:00+02:00"), now, hour));
    assert!(is_recent_raw(&RawTimestamp::Text("2025-06-10 11:30:00"), now, hour));
    assert!(is_recent_raw(&RawTimestamp::Text("Tue, 10 Jun 2025 11:30:00 GMT"), now, hour));
    assert!(is_recent_raw(&RawTimestamp::EpochSeconds(1_749_556_500), now, hour));
    assert!(is_recent_raw(&RawTimestamp::EpochMillis(1_749_556_500_000), now, hour));
    assert!(!is_recent_raw(&RawTimestamp::Text("yesterday"), now, hour));
    assert!(!is_recent_raw(&RawTimestamp::Text(""), now, hour));
}

#[test]
fn normalize_handles_entities_and_markup() {
    assert_eq!(normalize_text(""), "");
    assert_eq!(
        normalize_text("<p>Hello&nbsp;<b>world</b> &ldquo;ok&rdquo;</p>"),
        r#"Hello world "ok""#
    );
    assert_eq!(normalize_text("A\u{00A0}\n\tB   C"), "A B C");
}

#[test]
fn salary_lines() {
    assert_eq!(
        format_salary(Some(100000.0), Some(150000.0)).as_deref(),
        Some("$100,000 - $150,000")
    );
    assert_eq!(format_salary(Some(100000.0), None).as_deref(), Some("$100,000+"));
    assert_eq!(format_salary(None, None), None);
}

fn base(source: Source) -> JobPosting {
    let mut j = JobPosting::new(source, "1");
    j.title = "Backend Engineer".into();
    j.company = "Acme".into();
    j.created_at = "2025-06-10T11:55:00Z".into();
    j
}

#[test]
fn message_without_optional_lines() {
    let j = base(Source::RemoteOk);
    assert_eq!(
        format_message(&j),
        "🔔 New job match!\n\n📋 Backend Engineer\n🏢 Acme\n📅 Posted: 2025-06-10T11:55:00Z\n🌐 Source: remoteok"
    );
}

#[test]
fn message_with_common_optional_lines() {
    let mut j = base(Source::JSearch);
    j.salary_min = Some(100000.0);
    j.salary_max = Some(150000.0);
    j.is_remote = Some(false);
    j.employment_type = Some("Full-time".into());
    j.url = Some("https://jobs.example/1".into());
    let msg = format_message(&j);
    assert!(msg.ends_with(
        "🌐 Source: jsearch\n💰 Salary: $100,000 - $150,000\n🏠 Remote: No\n⏰ Type: Full-time\n🔗 https://jobs.example/1"
    ));
}

#[test]
fn linkedin_block() {
    let mut j = base(Source::LinkedIn);
    j.extras = Extras::LinkedIn {
        company_size: Some("51-200 employees".into()),
        company_industry: Some("Cloud Computing".into()),
        company_employees: None,
        recruiter_name: Some("Dana Smith".into()),
        recruiter_title: Some("Technical Recruiter".into()),
    };
    let msg = format_message(&j);
    assert!(msg.contains("\n🏢 Company Size: 51-200 employees\n🏭 Industry: Cloud Computing\n👤 Recruiter: Dana Smith (Technical Recruiter)"));
    assert!(!msg.contains("Employees"));
}

#[test]
fn glassdoor_block_for_canada() {
    let mut j = base(Source::GlassdoorCa);
    j.extras = Extras::Glassdoor {
        rating: Some(0.0),
        job_type: Some("Contract".into()),
        easy_apply: false,
        is_urgent: true,
        age_days: Some(1),
    };
    let msg = format_message(&j);
    assert!(!msg.contains("Rating"));
    assert!(msg.contains("\n⏰ Job Type: Contract\n🚨 Urgent: New Job\n📅 Posted: Yesterday\n🇨🇦 Location: Canada"));
}

#[test]
fn glassdoor_age_wording() {
    for (age, text) in [(0, "Today"), (4, "4 days ago")] {
        let mut j = base(Source::Glassdoor);
        j.extras = Extras::Glassdoor {
            rating: Some(4.5),
            job_type: None,
            easy_apply: true,
            is_urgent: false,
            age_days: Some(age),
        };
        let msg = format_message(&j);
        assert!(msg.contains("⭐ Company Rating: 4.5/5\n✅ Easy Apply: Yes"));
        assert!(msg.contains(&format!("📅 Posted: {text}")));
        assert!(!msg.contains("Canada"));
    }
}

#[test]
fn indeed_block() {
    let mut j = base(Source::Indeed);
    j.extras = Extras::Indeed {
        relative_time: Some("Just posted".into()),
        salary_type: Some("yearly".into()),
    };
    assert!(format_message(&j).ends_with("\n⏰ Posted: Just posted\n💰 Pay Type: yearly"));
}
