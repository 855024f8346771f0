#[cfg(test)]
mod tests {

    mod slug_tests {
        use crate::error::StoreError;
        use crate::services::slug::{
            allocate_slug, generate_slug, next_attempt, timestamp_slug, validate_slug, Clock,
            MAX_SLUG_ATTEMPTS,
        };
        use chrono::{DateTime, TimeZone, Utc};
        use std::collections::HashSet;

        struct FixedClock(DateTime<Utc>);

        impl Clock for FixedClock {
            fn now(&self) -> DateTime<Utc> {
                self.0
            }
        }

        fn reference_time() -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
        }

        #[test]
        fn test_generate_slug_basic() {
            assert_eq!(generate_slug("Hello World"), "hello-world");
        }

        #[test]
        fn test_generate_slug_special_characters() {
            assert_eq!(generate_slug("Hello, World!"), "hello-world");
        }

        #[test]
        fn test_generate_slug_unicode() {
            assert_eq!(generate_slug("Café au lait"), "cafe-au-lait");
        }

        #[test]
        fn test_generate_slug_multiple_spaces() {
            assert_eq!(generate_slug("City   Hall   Leak"), "city-hall-leak");
        }

        #[test]
        fn test_timestamp_slug_format() {
            assert_eq!(
                timestamp_slug("City Hall Leak", reference_time()),
                "city-hall-leak-20240301100000"
            );
        }

        #[test]
        fn test_next_attempt_bumps_past_stalled_clock() {
            let clock = FixedClock(reference_time());
            let next = next_attempt(&clock, reference_time());
            assert_eq!(next, reference_time() + chrono::Duration::seconds(1));
        }

        #[test]
        fn test_next_attempt_uses_clock_when_it_moved() {
            let later = reference_time() + chrono::Duration::seconds(42);
            let clock = FixedClock(later);
            assert_eq!(next_attempt(&clock, reference_time()), later);
        }

        #[test]
        fn test_allocate_slug_first_candidate_free() {
            let clock = FixedClock(reference_time());
            let (slug, at) = allocate_slug("City Hall Leak", &clock, |_| Ok(false)).unwrap();
            assert_eq!(slug, "city-hall-leak-20240301100000");
            assert_eq!(at, reference_time());
        }

        #[test]
        fn test_allocate_slug_never_repeats_a_candidate() {
            let clock = FixedClock(reference_time());
            let mut seen = HashSet::new();
            let mut rejections = 0;
            let (slug, _) = allocate_slug("Leak", &clock, |candidate| {
                assert!(
                    seen.insert(candidate.to_string()),
                    "candidate '{candidate}' proposed twice"
                );
                rejections += 1;
                Ok(rejections <= 2)
            })
            .unwrap();
            assert_eq!(slug, "leak-20240301100002");
        }

        #[test]
        fn test_allocate_slug_exhaustion() {
            let clock = FixedClock(reference_time());
            let result = allocate_slug("Leak", &clock, |_| Ok(true));
            match result {
                Err(StoreError::SlugExhausted { base, attempts }) => {
                    assert_eq!(base, "leak");
                    assert_eq!(attempts, MAX_SLUG_ATTEMPTS);
                }
                other => panic!("expected SlugExhausted, got {other:?}"),
            }
        }

        #[test]
        fn test_validate_slug_valid() {
            assert!(validate_slug("city-hall-leak-20240301100000"));
            assert!(validate_slug("a"));
            assert!(validate_slug("123"));
        }

        #[test]
        fn test_validate_slug_invalid() {
            assert!(!validate_slug(""));
            assert!(!validate_slug("City-Hall"));
            assert!(!validate_slug("city hall"));
            assert!(!validate_slug("city_hall"));
            assert!(!validate_slug(&"a".repeat(251)));
        }
    }

    mod rich_text_tests {
        use crate::services::rich_text::{reading_time_minutes, render_markdown};

        #[test]
        fn test_render_basic_markdown() {
            let html = render_markdown("# City Hall Leak");
            assert!(html.contains("<h1>"));
            assert!(html.contains("City Hall Leak"));
        }

        #[test]
        fn test_render_paragraph_and_emphasis() {
            let html = render_markdown("The **mayor** knew.");
            assert!(html.contains("<p>"));
            assert!(html.contains("<strong>mayor</strong>"));
        }

        #[test]
        fn test_render_strips_script_tags() {
            let html = render_markdown("hello <script>alert(1)</script> world");
            assert!(!html.contains("<script>"));
            assert!(html.contains("hello"));
        }

        #[test]
        fn test_render_strips_event_handlers() {
            let html = render_markdown(r#"<img src="x" onerror="alert(1)">"#);
            assert!(!html.contains("onerror"));
        }

        #[test]
        fn test_reading_time_minimum_one_minute() {
            assert_eq!(reading_time_minutes("a few words"), 1);
        }

        #[test]
        fn test_reading_time_scales_with_length() {
            let story = "word ".repeat(450);
            assert_eq!(reading_time_minutes(&story), 3);
        }
    }

    mod evidence_tests {
        use crate::error::ValidationError;
        use crate::services::evidence::{validate_evidence, MAX_EVIDENCE_BYTES};

        const PDF_BYTES: &[u8] = b"%PDF-1.4 fake document body";
        const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

        #[test]
        fn test_pdf_accepted() {
            assert_eq!(validate_evidence("leak.pdf", PDF_BYTES).unwrap(), "pdf");
        }

        #[test]
        fn test_extension_is_case_insensitive() {
            assert_eq!(validate_evidence("LEAK.PDF", PDF_BYTES).unwrap(), "pdf");
        }

        #[test]
        fn test_disallowed_extension_rejected() {
            match validate_evidence("malware.exe", b"MZ") {
                Err(ValidationError::EvidenceType(ext)) => assert_eq!(ext, "exe"),
                other => panic!("expected EvidenceType, got {other:?}"),
            }
        }

        #[test]
        fn test_missing_extension_rejected() {
            assert!(matches!(
                validate_evidence("evidence", PDF_BYTES),
                Err(ValidationError::EvidenceType(_))
            ));
        }

        #[test]
        fn test_oversized_file_rejected() {
            let data = vec![0u8; MAX_EVIDENCE_BYTES as usize + 1];
            assert!(matches!(
                validate_evidence("leak.pdf", &data),
                Err(ValidationError::EvidenceTooLarge { .. })
            ));
        }

        #[test]
        fn test_content_mismatch_rejected() {
            match validate_evidence("report.pdf", PNG_BYTES) {
                Err(ValidationError::EvidenceMismatch { claimed, detected }) => {
                    assert_eq!(claimed, "pdf");
                    assert_eq!(detected, "png");
                }
                other => panic!("expected EvidenceMismatch, got {other:?}"),
            }
        }

        #[test]
        fn test_jpeg_alias_accepted() {
            let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0];
            assert_eq!(validate_evidence("photo.jpeg", &jpeg).unwrap(), "jpeg");
        }
    }

    mod intake_validation_tests {
        use crate::error::ValidationError;
        use crate::services::submissions::{validate_intake, MAX_META_DESCRIPTION_LENGTH};

        #[test]
        fn test_valid_intake() {
            assert!(validate_intake("Title", "Summary", "Story", None).is_ok());
        }

        #[test]
        fn test_empty_title_rejected() {
            assert_eq!(
                validate_intake("   ", "Summary", "Story", None),
                Err(ValidationError::Required("title"))
            );
        }

        #[test]
        fn test_empty_summary_rejected() {
            assert_eq!(
                validate_intake("Title", "", "Story", None),
                Err(ValidationError::Required("summary"))
            );
        }

        #[test]
        fn test_empty_story_rejected() {
            assert_eq!(
                validate_intake("Title", "Summary", "\n\n", None),
                Err(ValidationError::Required("story"))
            );
        }

        #[test]
        fn test_meta_description_length_capped() {
            let long = "x".repeat(MAX_META_DESCRIPTION_LENGTH + 1);
            assert!(matches!(
                validate_intake("Title", "Summary", "Story", Some(&long)),
                Err(ValidationError::TooLong { .. })
            ));
        }
    }

    mod category_tests {
        use crate::models::Category;
        use std::str::FromStr;

        #[test]
        fn test_roundtrip() {
            for raw in ["user-submitted", "corruption", "investigative", "justice", "other"] {
                let category = Category::from_str(raw).unwrap();
                assert_eq!(category.to_string(), raw);
            }
        }

        #[test]
        fn test_unknown_rejected() {
            assert!(Category::from_str("gossip").is_err());
        }

        #[test]
        fn test_default_is_user_submitted() {
            assert_eq!(Category::default(), Category::UserSubmitted);
        }
    }

    mod contact_validation_tests {
        use crate::error::ValidationError;
        use crate::models::NewContact;
        use crate::services::contact::validate;

        fn contact(email: &str, subject: &str, message: &str) -> NewContact {
            NewContact {
                name: None,
                email: email.to_string(),
                subject: subject.to_string(),
                message: message.to_string(),
            }
        }

        #[test]
        fn test_valid_contact() {
            assert!(validate(&contact("tipper@example.com", "Hello", "A message")).is_ok());
        }

        #[test]
        fn test_bad_email_rejected() {
            assert!(matches!(
                validate(&contact("not-an-email", "Hello", "A message")),
                Err(ValidationError::Invalid { field: "email", .. })
            ));
        }

        #[test]
        fn test_empty_subject_rejected() {
            assert_eq!(
                validate(&contact("a@b.com", " ", "A message")),
                Err(ValidationError::Required("subject"))
            );
        }
    }

    mod config_tests {
        use crate::Config;

        fn minimal_toml() -> &'static str {
            r#"
            [site]
            title = "BreachPress"
            description = "Exposing what stays hidden"
            url = "http://localhost:3000"

            [server]

            [database]
            path = "./data/breachpress.db"

            [media]
            upload_dir = "./data/media"
            "#
        }

        #[test]
        fn test_defaults_fill_in() {
            let config: Config = toml::from_str(minimal_toml()).unwrap();
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.content.articles_per_page, 10);
            assert_eq!(config.intake.max_requests, 5);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_zero_page_size_rejected() {
            let mut config: Config = toml::from_str(minimal_toml()).unwrap();
            config.content.articles_per_page = 0;
            assert!(config.validate().is_err());
        }
    }
}
