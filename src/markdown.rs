use pulldown_cmark::{html, Options, Parser};

/// Markdown-to-HTML capability handed to `PostService`.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options
}

/// pulldown-cmark backed renderer.
#[derive(Debug, Default)]
pub struct CmarkRenderer;

impl CmarkRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, markdown_options());
        let mut html_out = String::new();
        html::push_html(&mut html_out, parser);
        html_out
    }
}
