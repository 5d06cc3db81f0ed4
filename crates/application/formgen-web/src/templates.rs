//! HTML templates for the generator page
//!
//! The page is server-rendered; htmx swaps the generated UI fragment and
//! the notice area in place.

use formgen_render::{escape_html, Acknowledgement};
use formgen_session::SessionState;

pub const QUERY_PLACEHOLDER: &str =
    "e.g., I want a meal logging dashboard with charts and a form to log food";

pub const SECTION_HEADING: &str = "---------- generated application -----------";

/// CSS styles. Tailwind covers the generated class names; this only
/// handles page chrome and the loading swap.
pub const STYLE_CSS: &str = r#"
body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    background: #f8fafc;
    color: #1e293b;
}

.shell {
    max-width: 48rem;
    margin: 0 auto;
    padding: 2rem 1rem;
}

.query-form textarea {
    width: 100%;
    min-height: 6rem;
    padding: 0.5rem;
    border: 1px solid #cbd5e1;
    border-radius: 0.375rem;
}

.query-form button[disabled] {
    opacity: 0.5;
    cursor: wait;
}

#notice:empty {
    display: none;
}

.notice {
    margin: 1rem 0;
    padding: 0.5rem 0.75rem;
    border-radius: 0.375rem;
    background: #fef3c7;
    color: #92400e;
}

.notice .ack {
    color: #166534;
}

.section-heading {
    margin: 2rem 0 1rem;
    font-family: 'JetBrains Mono', 'Fira Code', monospace;
    color: #64748b;
    text-align: center;
}

/* Loading indicator replaces the generated UI while a request is in flight */
.loading {
    display: none;
    padding: 2rem;
    text-align: center;
    color: #64748b;
}

#stage.htmx-request .loading {
    display: block;
}

#stage.htmx-request #generated {
    display: none;
}
"#;

/// Full page for a session
pub fn page_html(state: &SessionState) -> String {
    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
    <meta charset=\"UTF-8\">
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
    <title>formgen</title>
    <link rel=\"stylesheet\" href=\"/static/style.css\">
    <script src=\"https://cdn.tailwindcss.com\"></script>
    <script src=\"https://unpkg.com/htmx.org@1.9.10\"></script>
</head>
<body>
    <div class=\"shell\">
        <form class=\"query-form\" hx-post=\"/generate\" hx-target=\"#generated\" hx-swap=\"innerHTML\"
              hx-indicator=\"#stage\" hx-disabled-elt=\"#generate-button\">
            <textarea name=\"query\" placeholder=\"{placeholder}\"></textarea>
            <button id=\"generate-button\" type=\"submit\" class=\"bg-blue-600 text-white p-2 rounded mt-2\">Generate App</button>
        </form>
        {notice}
        <h2 class=\"section-heading\">{heading}</h2>
        <section id=\"stage\">
            <div class=\"loading\">Your app is loading</div>
            <div id=\"generated\">{generated}</div>
        </section>
    </div>
</body>
</html>",
        placeholder = escape_html(QUERY_PLACEHOLDER),
        notice = notice_html(state.error_message(), false),
        heading = SECTION_HEADING,
        generated = formgen_render::render_html(state.ui()),
    )
}

/// Notice area. With `oob` set it carries `hx-swap-oob` so it can ride
/// along with another fragment.
pub fn notice_html(message: Option<&str>, oob: bool) -> String {
    let swap = if oob { " hx-swap-oob=\"true\"" } else { "" };
    let body = message.map(escape_html).unwrap_or_default();
    format!("<div id=\"notice\" class=\"notice\"{}>{}</div>", swap, body)
}

/// Response to `/generate`: the session's UI plus the notice area
pub fn generated_fragment(state: &SessionState, notice: Option<&str>) -> String {
    let mut out = formgen_render::render_html(state.ui());
    out.push_str(&notice_html(notice, true));
    out
}

/// Swapped into the notice area after a button action ran
pub fn acknowledgement_html(ack: &Acknowledgement) -> String {
    format!(
        "<span class=\"ack\" data-action=\"{}\">{}</span>",
        ack.action,
        escape_html(&ack.message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgen_render::Action;

    #[test]
    fn page_carries_fixed_texts() {
        let html = page_html(&SessionState::initial());
        assert!(html.contains(QUERY_PLACEHOLDER));
        assert!(html.contains("Generate App"));
        assert!(html.contains("Your app is loading"));
        assert!(html.contains(SECTION_HEADING));
        assert!(html.contains("cdn.tailwindcss.com"));
        assert!(html.contains("Food Item (e.g. Banana)"));
    }

    #[test]
    fn notice_escapes_and_swaps_out_of_band() {
        let html = notice_html(Some("<b>hi</b>"), true);
        assert_eq!(
            html,
            "<div id=\"notice\" class=\"notice\" hx-swap-oob=\"true\">&lt;b&gt;hi&lt;/b&gt;</div>"
        );
        assert_eq!(notice_html(None, false), "<div id=\"notice\" class=\"notice\"></div>");
    }

    #[test]
    fn acknowledgement_names_action() {
        let ack = Action::ExportData.run(&Default::default());
        let html = acknowledgement_html(&ack);
        assert!(html.contains("data-action=\"export-data\""));
        assert!(html.contains("Data exported."));
    }
}
