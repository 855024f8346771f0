use breachpress::models::{
    Category, NewArticle, NewContact, NewSubmission, StoredEvidence, UpdateArticle,
    ANONYMOUS_AUTHOR,
};
use breachpress::services::slug::Clock;
use breachpress::services::{articles, auth, bootstrap, contact, evidence, site, submissions, tags};
use breachpress::Database;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::PathBuf;
use std::sync::Mutex;

fn create_test_db() -> Database {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let id: u32 = rng.gen();
    let name = format!("test_db_{}", id);

    let db = Database::open_memory(&name).expect("Failed to create test database");
    db.migrate().expect("Failed to run migrations");
    db
}

fn temp_media_dir() -> PathBuf {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let id: u32 = rng.gen();
    let dir = std::env::temp_dir().join(format!("breachpress_test_{}", id));
    std::fs::create_dir_all(&dir).expect("Failed to create temp media dir");
    dir
}

/// Always reports the same instant, so colliding titles exercise the
/// allocator's retry path.
struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Advances one second per call, like a wall clock sampled across
/// consecutive operations.
struct SteppingClock {
    start: DateTime<Utc>,
    calls: Mutex<i64>,
}

impl SteppingClock {
    fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            calls: Mutex::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut calls = self.calls.lock().unwrap();
        let at = self.start + Duration::seconds(*calls);
        *calls += 1;
        at
    }
}

fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

fn story_input(title: &str, tags: Vec<String>) -> NewSubmission {
    NewSubmission {
        title: title.to_string(),
        summary: "Documents show years of missing funds.".to_string(),
        story_markdown: "The documents arrived in a plain envelope.".to_string(),
        category: Category::Corruption,
        meta_description: None,
        evidence: None,
        tags,
    }
}

mod submission_tests {
    use super::*;

    #[test]
    fn test_submission_slug_pattern() {
        let db = create_test_db();
        let clock = FixedClock(reference_time());

        let created =
            submissions::create_submission(&db, &clock, story_input("City Hall Leak", vec![]))
                .unwrap();

        assert_eq!(created.submission.slug, "city-hall-leak-20240301100000");
        assert_eq!(
            created.submission.created_at,
            reference_time().to_rfc3339()
        );
        assert!(!created.submission.is_promoted());
    }

    #[test]
    fn test_identical_titles_same_second_get_distinct_slugs() {
        let db = create_test_db();
        let clock = FixedClock(reference_time());

        let first =
            submissions::create_submission(&db, &clock, story_input("Leak", vec![])).unwrap();
        let second =
            submissions::create_submission(&db, &clock, story_input("Leak", vec![])).unwrap();

        assert_eq!(first.submission.slug, "leak-20240301100000");
        assert_eq!(second.submission.slug, "leak-20240301100001");
        assert_ne!(first.submission.slug, second.submission.slug);
    }

    #[test]
    fn test_submission_tags_attached() {
        let db = create_test_db();
        let clock = FixedClock(reference_time());

        let created = submissions::create_submission(
            &db,
            &clock,
            story_input(
                "City Hall Leak",
                vec!["corruption".to_string(), "city hall".to_string()],
            ),
        )
        .unwrap();

        let names: Vec<&str> = created.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["city hall", "corruption"]);
    }

    #[test]
    fn test_story_body_is_sanitized() {
        let db = create_test_db();
        let clock = FixedClock(reference_time());

        let mut input = story_input("XSS Attempt", vec![]);
        input.story_markdown = "hello <script>alert(1)</script>".to_string();
        let created = submissions::create_submission(&db, &clock, input).unwrap();

        assert!(!created.submission.story_html.contains("<script>"));
    }

    #[test]
    fn test_lookup_by_slug() {
        let db = create_test_db();
        let clock = FixedClock(reference_time());

        submissions::create_submission(&db, &clock, story_input("City Hall Leak", vec![]))
            .unwrap();

        let found =
            submissions::get_submission_by_slug(&db, "city-hall-leak-20240301100000").unwrap();
        assert!(found.is_some());
        assert!(submissions::get_submission_by_slug(&db, "nope").unwrap().is_none());
    }

    #[test]
    fn test_pending_filter() {
        let db = create_test_db();
        let media = temp_media_dir();
        let clock = SteppingClock::new(reference_time());

        submissions::create_submission(&db, &clock, story_input("First", vec![])).unwrap();
        let second =
            submissions::create_submission(&db, &clock, story_input("Second", vec![])).unwrap();

        submissions::promote_submission(&db, &clock, &media, &second.submission.slug).unwrap();

        let pending = submissions::list_submissions(&db, true, 50, 0).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].submission.title, "First");

        let all = submissions::list_submissions(&db, false, 50, 0).unwrap();
        assert_eq!(all.len(), 2);
    }
}

mod promotion_tests {
    use super::*;

    #[test]
    fn test_promotion_copies_fields_and_forces_flags() {
        let db = create_test_db();
        let media = temp_media_dir();
        let clock = SteppingClock::new(reference_time());

        let created = submissions::create_submission(
            &db,
            &clock,
            story_input("City Hall Leak", vec!["corruption".to_string()]),
        )
        .unwrap();
        assert_eq!(created.submission.slug, "city-hall-leak-20240301100000");

        let promotion =
            submissions::promote_submission(&db, &clock, &media, &created.submission.slug)
                .unwrap();
        assert!(promotion.newly_created);
        assert_eq!(promotion.article_slug, "city-hall-leak-20240301100001");

        let article = articles::get_published_by_slug(&db, &promotion.article_slug)
            .unwrap()
            .expect("promoted article should be publicly readable");

        assert_eq!(article.article.title, created.submission.title);
        assert_eq!(article.article.summary, created.submission.summary);
        assert_eq!(
            article.article.body_markdown,
            created.submission.story_markdown
        );
        assert_eq!(article.article.author.as_deref(), Some(ANONYMOUS_AUTHOR));
        assert!(article.article.published);
        assert!(!article.article.featured);
        assert_eq!(article.article.category, "corruption");

        // Tag set copied exactly, by reference.
        let article_tags: Vec<&str> = article.tags.iter().map(|t| t.slug.as_str()).collect();
        let submission_tags: Vec<&str> = created.tags.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(article_tags, submission_tags);

        // The submission survives promotion with its own slug and tags.
        let after = submissions::get_submission_by_slug(&db, &created.submission.slug)
            .unwrap()
            .unwrap();
        assert_eq!(after.submission.promoted_article_id, Some(promotion.article_id));
        assert_eq!(after.tags.len(), 1);
    }

    #[test]
    fn test_retried_promotion_creates_no_duplicate() {
        let db = create_test_db();
        let media = temp_media_dir();
        let clock = SteppingClock::new(reference_time());

        let created =
            submissions::create_submission(&db, &clock, story_input("Leak", vec![])).unwrap();

        let first =
            submissions::promote_submission(&db, &clock, &media, &created.submission.slug)
                .unwrap();
        let second =
            submissions::promote_submission(&db, &clock, &media, &created.submission.slug)
                .unwrap();

        assert!(first.newly_created);
        assert!(!second.newly_created);
        assert_eq!(first.article_id, second.article_id);
        assert_eq!(first.article_slug, second.article_slug);
        assert_eq!(articles::count_published(&db, None, None).unwrap(), 1);
    }

    #[test]
    fn test_promotion_of_unknown_submission_fails() {
        let db = create_test_db();
        let media = temp_media_dir();
        let clock = FixedClock(reference_time());

        let result = submissions::promote_submission(&db, &clock, &media, "missing-slug");
        assert!(matches!(
            result,
            Err(breachpress::error::PromotionError::NotFound(_))
        ));
    }

    #[test]
    fn test_promotion_with_missing_evidence_leaves_no_article() {
        let db = create_test_db();
        let media = temp_media_dir();
        let clock = SteppingClock::new(reference_time());

        let mut input = story_input("Shredded Files", vec![]);
        input.evidence = Some(StoredEvidence {
            filename: "gone.pdf".to_string(),
            sha256: "0".repeat(64),
            size_bytes: 12,
            original_name: "gone.pdf".to_string(),
        });
        let created = submissions::create_submission(&db, &clock, input).unwrap();

        let result =
            submissions::promote_submission(&db, &clock, &media, &created.submission.slug);
        assert!(matches!(
            result,
            Err(breachpress::error::PromotionError::MissingEvidence(_))
        ));

        // Failure leg of the atomicity guarantee: no article row at all.
        assert_eq!(articles::count_published(&db, None, None).unwrap(), 0);
        let after = submissions::get_submission_by_slug(&db, &created.submission.slug)
            .unwrap()
            .unwrap();
        assert!(!after.submission.is_promoted());
    }

    #[test]
    fn test_promotion_with_stored_evidence_copies_reference() {
        let db = create_test_db();
        let media = temp_media_dir();
        let clock = SteppingClock::new(reference_time());

        let stored =
            evidence::store_evidence(&media, "leak.pdf", "pdf", b"%PDF-1.4 contents").unwrap();
        let checksum = stored.sha256.clone();

        let mut input = story_input("Documented Leak", vec![]);
        input.evidence = Some(stored);
        let created = submissions::create_submission(&db, &clock, input).unwrap();

        let promotion =
            submissions::promote_submission(&db, &clock, &media, &created.submission.slug)
                .unwrap();
        let article = articles::get_published_by_slug(&db, &promotion.article_slug)
            .unwrap()
            .unwrap();

        assert_eq!(article.article.evidence, created.submission.evidence);
        assert_eq!(article.article.evidence_sha256.as_deref(), Some(checksum.as_str()));
    }

    #[test]
    fn test_article_and_submission_namespaces_are_independent() {
        let db = create_test_db();
        let clock = FixedClock(reference_time());

        let created =
            submissions::create_submission(&db, &clock, story_input("Leak", vec![])).unwrap();

        // Same title, same second, other collection: identical slug string
        // is legal because uniqueness is scoped per collection.
        let article_id = articles::create_article(
            &db,
            &clock,
            NewArticle {
                title: "Leak".to_string(),
                summary: "Editorial version".to_string(),
                body_markdown: "Body".to_string(),
                category: String::new(),
                author: Some("Desk".to_string()),
                published: true,
                featured: false,
                meta_description: None,
                evidence: None,
                evidence_sha256: None,
                tags: vec![],
            },
        )
        .unwrap();

        let article = articles::get_published_by_slug(&db, "leak-20240301100000")
            .unwrap()
            .unwrap();
        assert_eq!(article.article.id, article_id);
        assert_eq!(article.article.slug, created.submission.slug);
    }
}

mod article_tests {
    use super::*;

    fn publish(db: &Database, clock: &dyn Clock, title: &str, tags: Vec<String>) -> i64 {
        articles::create_article(
            db,
            clock,
            NewArticle {
                title: title.to_string(),
                summary: "Summary".to_string(),
                body_markdown: "Body text".to_string(),
                category: "investigative".to_string(),
                author: Some("Desk".to_string()),
                published: true,
                featured: false,
                meta_description: None,
                evidence: None,
                evidence_sha256: None,
                tags,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_update_never_touches_slug_or_publication_time() {
        let db = create_test_db();
        let clock = FixedClock(reference_time());

        let id = publish(&db, &clock, "Original Title", vec![]);
        let before = articles::get_article_by_slug(&db, "original-title-20240301100000")
            .unwrap()
            .unwrap();

        articles::update_article(
            &db,
            id,
            UpdateArticle {
                title: Some("Rewritten Title".to_string()),
                summary: Some("New summary".to_string()),
                featured: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        let after = articles::get_article_by_slug(&db, "original-title-20240301100000")
            .unwrap()
            .expect("slug must remain stable across edits");

        assert_eq!(after.article.title, "Rewritten Title");
        assert!(after.article.featured);
        assert_eq!(after.article.slug, before.article.slug);
        assert_eq!(after.article.published_at, before.article.published_at);
    }

    #[test]
    fn test_unpublished_articles_are_invisible() {
        let db = create_test_db();
        let clock = FixedClock(reference_time());

        articles::create_article(
            &db,
            &clock,
            NewArticle {
                title: "Unpublished Draft".to_string(),
                summary: "Summary".to_string(),
                body_markdown: "Body".to_string(),
                category: String::new(),
                author: None,
                published: false,
                featured: false,
                meta_description: None,
                evidence: None,
                evidence_sha256: None,
                tags: vec![],
            },
        )
        .unwrap();

        assert!(articles::get_published_by_slug(&db, "unpublished-draft-20240301100000")
            .unwrap()
            .is_none());
        assert!(articles::list_published(&db, None, None, 10, 0).unwrap().is_empty());
        assert_eq!(articles::count_published(&db, None, None).unwrap(), 0);

        // Operators still see it.
        assert!(articles::get_article_by_slug(&db, "unpublished-draft-20240301100000")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_list_newest_first_with_filters() {
        let db = create_test_db();
        let clock = SteppingClock::new(reference_time());

        publish(&db, &clock, "Older Story", vec!["budget".to_string()]);
        publish(&db, &clock, "Newer Story", vec!["schools".to_string()]);

        let listed = articles::list_published(&db, None, None, 10, 0).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].article.title, "Newer Story");
        assert_eq!(listed[1].article.title, "Older Story");

        let by_tag = articles::list_published(&db, None, Some("budget"), 10, 0).unwrap();
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].article.title, "Older Story");

        let by_category =
            articles::list_published(&db, Some("investigative"), None, 10, 0).unwrap();
        assert_eq!(by_category.len(), 2);

        assert_eq!(
            articles::count_published(&db, None, Some("schools")).unwrap(),
            1
        );
    }

    #[test]
    fn test_featured_article() {
        let db = create_test_db();
        let clock = SteppingClock::new(reference_time());

        let id = publish(&db, &clock, "Front Page", vec![]);
        publish(&db, &clock, "Also Ran", vec![]);

        assert!(articles::featured_article(&db).unwrap().is_none());

        articles::update_article(
            &db,
            id,
            UpdateArticle {
                featured: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        let featured = articles::featured_article(&db).unwrap().unwrap();
        assert_eq!(featured.article.id, id);
    }

    #[test]
    fn test_related_articles_share_a_tag_with_fallback() {
        let db = create_test_db();
        let clock = SteppingClock::new(reference_time());

        let main = publish(&db, &clock, "Main Story", vec!["budget".to_string()]);
        let related = publish(&db, &clock, "Related Story", vec!["budget".to_string()]);
        let unrelated = publish(&db, &clock, "Unrelated Story", vec!["sports".to_string()]);

        let found = articles::related_articles(&db, main, 5).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].article.id, related);

        // No shared tags: fall back to newest published, excluding self.
        let fallback = articles::related_articles(&db, unrelated, 5).unwrap();
        assert_eq!(fallback.len(), 2);
        assert!(fallback.iter().all(|a| a.article.id != unrelated));
    }

    #[test]
    fn test_write_time_slug_conflict_is_detectable() {
        use breachpress::services::slug::is_slug_conflict;

        let db = create_test_db();
        let conn = db.get().unwrap();

        let insert = "INSERT INTO articles (slug, title, summary, body_markdown, body_html, published_at) \
             VALUES ('dup-slug', 't', 's', 'b', 'b', '2024-03-01T10:00:00Z')";
        conn.execute(insert, []).unwrap();
        let err = conn.execute(insert, []).unwrap_err();

        assert!(is_slug_conflict(&err, "articles"));
        assert!(!is_slug_conflict(&err, "submissions"));
    }
}

mod tag_tests {
    use super::*;

    #[test]
    fn test_counts_only_published_articles() {
        let db = create_test_db();
        let clock = SteppingClock::new(reference_time());

        submissions::create_submission(
            &db,
            &clock,
            story_input("Tip", vec!["budget".to_string()]),
        )
        .unwrap();

        articles::create_article(
            &db,
            &clock,
            NewArticle {
                title: "Published Piece".to_string(),
                summary: "s".to_string(),
                body_markdown: "b".to_string(),
                category: String::new(),
                author: None,
                published: true,
                featured: false,
                meta_description: None,
                evidence: None,
                evidence_sha256: None,
                tags: vec!["budget".to_string()],
            },
        )
        .unwrap();

        let counts = tags::list_tags_with_counts(&db).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].tag.slug, "budget");
        assert_eq!(counts[0].article_count, 1);
    }

    #[test]
    fn test_ensure_tag_deduplicates_by_slug() {
        let db = create_test_db();

        let first = tags::create_tag(&db, "City Hall").unwrap();
        let second = tags::create_tag(&db, "City Hall").unwrap();
        assert_eq!(first, second);

        let all = tags::list_tags(&db).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].slug, "city-hall");
    }

    #[test]
    fn test_cleanup_keeps_tags_referenced_by_submissions() {
        let db = create_test_db();
        let clock = FixedClock(reference_time());

        submissions::create_submission(&db, &clock, story_input("Tip", vec!["kept".to_string()]))
            .unwrap();
        tags::create_tag(&db, "orphan").unwrap();

        let deleted = tags::cleanup_orphaned_tags(&db).unwrap();
        assert_eq!(deleted, 1);

        let remaining = tags::list_tags(&db).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].slug, "kept");
    }
}

mod site_tests {
    use super::*;
    use breachpress::models::{HeroSection, SectionType};

    #[test]
    fn test_home_sections_are_unique_per_type() {
        let db = create_test_db();

        site::upsert_home_section(&db, SectionType::Mission, "First", "d", "", "").unwrap();
        site::upsert_home_section(&db, SectionType::Mission, "Second", "d", "", "").unwrap();

        let sections = site::list_home_sections(&db).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Second");
    }

    #[test]
    fn test_navigation_ordering_and_active_filter() {
        let db = create_test_db();
        use breachpress::models::NewNavigationLink;

        site::create_navigation_link(
            &db,
            &NewNavigationLink {
                title: "Contact".to_string(),
                url: "/contact".to_string(),
                position: 2,
                is_active: true,
            },
        )
        .unwrap();
        site::create_navigation_link(
            &db,
            &NewNavigationLink {
                title: "Home".to_string(),
                url: "/".to_string(),
                position: 0,
                is_active: true,
            },
        )
        .unwrap();
        site::create_navigation_link(
            &db,
            &NewNavigationLink {
                title: "Hidden".to_string(),
                url: "/hidden".to_string(),
                position: 1,
                is_active: false,
            },
        )
        .unwrap();

        let active = site::list_navigation(&db, true).unwrap();
        let titles: Vec<&str> = active.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Home", "Contact"]);

        assert_eq!(site::list_navigation(&db, false).unwrap().len(), 3);
    }

    #[test]
    fn test_hero_upsert() {
        let db = create_test_db();

        assert!(site::get_hero(&db).unwrap().is_none());

        site::set_hero(
            &db,
            &HeroSection {
                title: "Speak up".to_string(),
                description: "d".to_string(),
                cta_text: "Submit".to_string(),
                cta_link: "/submit".to_string(),
            },
        )
        .unwrap();
        site::set_hero(
            &db,
            &HeroSection {
                title: "Speak louder".to_string(),
                description: "d".to_string(),
                cta_text: "Submit".to_string(),
                cta_link: "/submit".to_string(),
            },
        )
        .unwrap();

        assert_eq!(site::get_hero(&db).unwrap().unwrap().title, "Speak louder");
    }

    #[test]
    fn test_current_quote_is_newest() {
        let db = create_test_db();

        site::add_quote(&db, "Sunlight disinfects.", "L. Brandeis").unwrap();
        site::add_quote(&db, "The truth will out.", "").unwrap();

        let quote = site::current_quote(&db).unwrap().unwrap();
        assert_eq!(quote.text, "The truth will out.");
    }

    #[test]
    fn test_about_page_roundtrips_process_steps() {
        let db = create_test_db();
        use breachpress::models::AboutPage;

        site::set_about_page(
            &db,
            &AboutPage {
                intro: "i".to_string(),
                mission: "m".to_string(),
                body: "b".to_string(),
                process_steps: vec!["Receive".to_string(), "Verify".to_string()],
                closing: "c".to_string(),
            },
        )
        .unwrap();

        let about = site::get_about_page(&db).unwrap().unwrap();
        assert_eq!(about.process_steps, vec!["Receive", "Verify"]);
    }
}

mod contact_tests {
    use super::*;

    #[test]
    fn test_create_and_list() {
        let db = create_test_db();

        let input = NewContact {
            name: Some("A. Reader".to_string()),
            email: "reader@example.com".to_string(),
            subject: "Correction".to_string(),
            message: "Paragraph three is wrong.".to_string(),
        };
        contact::validate(&input).unwrap();
        contact::create_contact(&db, &input).unwrap();

        let stored = contact::list_contacts(&db, 10, 0).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].email, "reader@example.com");
    }
}

mod bootstrap_tests {
    use super::*;

    #[test]
    fn test_seeding_is_idempotent() {
        let db = create_test_db();

        let first = bootstrap::seed_site_defaults(&db, "BreachPress").unwrap();
        assert!(first.seeded_metadata);
        assert!(first.seeded_navigation);

        let second = bootstrap::seed_site_defaults(&db, "BreachPress").unwrap();
        assert!(!second.seeded_metadata);
        assert!(!second.seeded_navigation);

        let metadata = site::get_site_metadata(&db).unwrap().unwrap();
        assert_eq!(metadata.site_name, "BreachPress");
        assert_eq!(site::list_navigation(&db, false).unwrap().len(), 5);
    }

    #[test]
    fn test_operator_created_once() {
        let db = create_test_db();

        let created =
            bootstrap::ensure_operator(&db, "editor", "editor@example.com", "Password123")
                .unwrap();
        assert!(created);

        let again =
            bootstrap::ensure_operator(&db, "other", "other@example.com", "Password456").unwrap();
        assert!(!again);

        assert!(auth::has_operators(&db).unwrap());
        assert!(auth::authenticate(&db, "editor", "Password123")
            .unwrap()
            .is_some());
        assert!(auth::authenticate(&db, "editor", "WrongPass1")
            .unwrap()
            .is_none());
        assert!(auth::authenticate(&db, "other", "Password456")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_weak_operator_password_rejected() {
        let db = create_test_db();
        assert!(bootstrap::ensure_operator(&db, "editor", "editor@example.com", "short").is_err());
        assert!(!auth::has_operators(&db).unwrap());
    }
}

mod evidence_tests {
    use super::*;
    use sha2::{Digest, Sha256};

    #[test]
    fn test_store_writes_blob_and_checksum() {
        let media = temp_media_dir();
        let data = b"%PDF-1.4 the smoking gun";

        let stored = evidence::store_evidence(&media, "smoking-gun.pdf", "pdf", data).unwrap();

        assert!(stored.filename.ends_with(".pdf"));
        assert_ne!(stored.filename, "smoking-gun.pdf");
        assert_eq!(stored.size_bytes, data.len() as u64);
        assert_eq!(stored.sha256, hex::encode(Sha256::digest(data)));

        let on_disk = std::fs::read(media.join(&stored.filename)).unwrap();
        assert_eq!(on_disk, data);
    }
}
