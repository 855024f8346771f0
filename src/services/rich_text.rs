use pulldown_cmark::{html, Options, Parser};

/// Render untrusted markdown to HTML and sanitize the result. Every story
/// body a visitor or operator writes passes through here before storage;
/// readers only ever see the stored, sanitized HTML.
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(markdown, options);
    let mut raw = String::new();
    html::push_html(&mut raw, parser);
    ammonia::clean(&raw)
}

/// Estimated reading time in minutes, 200 words per minute, minimum 1.
pub fn reading_time_minutes(markdown: &str) -> u32 {
    let word_count = markdown
        .split_whitespace()
        .filter(|word| !word.starts_with('#') && !word.starts_with("```"))
        .count();

    ((word_count as f64 / 200.0).ceil() as u32).max(1)
}
