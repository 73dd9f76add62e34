use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Service for handling markdown rendering
pub struct MarkdownService {
    options: Options,
}

impl MarkdownService {
    /// Create a new markdown service
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }

    /// Convert markdown to HTML and strip anything unsafe for display.
    pub fn render(&self, raw: &str) -> String {
        let mut unsafe_html = String::with_capacity(raw.len() * 3 / 2);
        html::push_html(&mut unsafe_html, Parser::new_ext(raw, self.options));
        ammonia::clean(&unsafe_html)
    }

    /// Text of the first level-one heading, if any
    pub fn title(&self, raw: &str) -> Option<String> {
        let mut in_title = false;
        let mut buf = String::new();
        for ev in Parser::new_ext(raw, self.options) {
            match ev {
                Event::Start(Tag::Heading { level: HeadingLevel::H1, .. }) => in_title = true,
                Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                    let text = buf.trim();
                    if !text.is_empty() {
                        return Some(text.to_string());
                    }
                    in_title = false;
                    buf.clear();
                }
                Event::Text(t) | Event::Code(t) if in_title => buf.push_str(&t),
                Event::SoftBreak | Event::HardBreak if in_title => buf.push(' '),
                _ => {}
            }
        }
        None
    }
}

impl Default for MarkdownService {
    fn default() -> Self {
        Self::new()
    }
}
