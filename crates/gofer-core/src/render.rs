//! Protocol renderer
//!
//! Turns directory records into HTML whose links loop back into the gateway.
//! Dispatch is purely on the record's item type:
//! - text and directory records link to the navigation endpoint
//! - ph records link to `/ph/<host>:<port>` with a return token
//! - search records link to `/search` with a return token
//! - error and info records are inert text
//! - everything else links to the navigation endpoint as an opaque fetch

use urlencoding::encode;

use crate::config::defaults::{DEFAULT_PH_PORT, HEARTMON_INTERVAL_MS, PAGE_HEARTBEAT_INTERVAL_MS};
use crate::directory::DirectoryRecord;
use crate::item_type::ItemType;
use crate::locator::{navigation_path, NavigationContext};

const HEARTBEAT_PATH: &str = "/heartbeat";

const STYLE: &str = r#"
    :root { color-scheme: light dark; }
    body { font-family: monospace; line-height: 1.4; width: 100ch; margin: 0 auto; padding-bottom: 1ch; }
    .gopher-link { margin: 0; white-space: pre; }
    .gopher-link:last-child { margin-bottom: 1ch; }
    .gopher-error { color: red; }
    .gopher-info { color: gray; }
    .query-bar { width: 100%; margin: 1ch 0; }
    .query-bar form { display: flex; width: 100%; align-items: center; }
    .query-label { font-size: 1.5em; font-weight: bold; padding: 0 1ch 0 0; flex-shrink: 0; }
    input[type="text"] { font-family: monospace; font-size: 1.5em; font-weight: bold; flex-grow: 1; min-width: 0; outline: 0; }
    .results, .return { margin-top: 1ch; }
    pre { width: 100%; padding: 0 0 1ch 0; white-space: pre; }
"#;

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Entry point of the ph sub-client for a server
pub fn lookup_path(host: &str, port: &str, return_to: &str) -> String {
    format!(
        "/ph/{}:{}?return={}",
        encode(host),
        encode(port),
        encode(return_to)
    )
}

/// Entry point of the index-search sub-client for a search record
pub fn search_path(host: &str, port: &str, selector: &str, return_to: &str) -> String {
    format!(
        "/search?host={}&port={}&selector={}&return={}",
        encode(host),
        encode(port),
        encode(selector),
        encode(return_to)
    )
}

/// Render a listing. `embedded` drops the page shell around the records,
/// heartbeat script included; the enclosing page supplies its own.
pub fn render_listing(
    records: &[DirectoryRecord],
    context: &NavigationContext,
    embedded: bool,
) -> String {
    let mut html = String::new();

    if !embedded {
        html.push_str(&page_head(&format!(
            "gofer - {}:{}{}",
            context.host, context.port, context.selector
        )));
        html.push_str(&format!(
            r#"<div class="query-bar">
<form action="/" method="GET">
<span class="query-label">gopher://</span>
<input type="text" id="uri" name="uri" value="{}" placeholder="freeshell.org:70/">
</form>
</div>
"#,
            escape_html(&context.uri_bar_value())
        ));
    }

    for record in records {
        html.push_str(&render_record(record, context));
    }

    if !embedded {
        html.push_str(&page_tail(PAGE_HEARTBEAT_INTERVAL_MS));
    }

    html
}

/// Render one record as a paragraph
pub fn render_record(record: &DirectoryRecord, context: &NavigationContext) -> String {
    let badge = escape_html(&record.item_type.badge());
    let display = escape_html(&record.display);

    match record.item_type {
        ItemType::Error => inert("gopher-error", &badge, &display),
        ItemType::Info => inert("gopher-info", &badge, &display),
        ItemType::CsoPhonebook => {
            let port = if record.port.is_empty() {
                DEFAULT_PH_PORT
            } else {
                record.port.as_str()
            };
            let href = lookup_path(&record.host, port, &context.local_path());
            linked(&badge, &href, &display)
        }
        ItemType::Search => {
            let href = search_path(
                &record.host,
                &record.port,
                &record.selector,
                &context.local_path(),
            );
            linked(&badge, &href, &display)
        }
        ItemType::Unknown(_) => {
            let href = record_href(record);
            format!(
                "<p class=\"gopher-link\"><span class=\"gopher-error\">{badge}</span><a href=\"{}\">{display}</a></p>\n",
                escape_html(&href)
            )
        }
        _ => linked(&badge, &record_href(record), &display),
    }
}

fn record_href(record: &DirectoryRecord) -> String {
    navigation_path(record.item_type, &record.host, &record.port, &record.selector)
}

fn linked(badge: &str, href: &str, display: &str) -> String {
    format!(
        "<p class=\"gopher-link\">{badge}<a href=\"{}\">{display}</a></p>\n",
        escape_html(href)
    )
}

fn inert(class: &str, badge: &str, display: &str) -> String {
    format!("<p class=\"gopher-link\"><span class=\"{class}\">{badge}</span>{display}</p>\n")
}

/// Page of the ph sub-client: query form, reply block and exit link
pub fn render_lookup_page(host: &str, port: &str, content: &str, return_to: &str) -> String {
    let mut html = page_head(&format!("gofer PhClient - {host}:{port}"));
    html.push_str(&query_form());
    html.push_str(&format!("<pre>{}</pre>\n", escape_html(content)));
    html.push_str(&exit_link(return_to, "Exit PhClient"));
    html.push_str(&page_tail(PAGE_HEARTBEAT_INTERVAL_MS));
    html
}

/// Page of the index-search sub-client around an embedded result listing
pub fn render_search_page(host: &str, port: &str, results_html: &str, return_to: &str) -> String {
    let mut html = page_head(&format!("gofer search - {host}:{port}"));
    html.push_str(&query_form());
    html.push_str(&format!("<div class=\"results\">\n{results_html}</div>\n"));
    html.push_str(&exit_link(return_to, "Exit Search"));
    html.push_str(&page_tail(PAGE_HEARTBEAT_INTERVAL_MS));
    html
}

/// Standalone keep-alive page; closes itself once the gateway is gone
pub fn render_heartmon_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>gofer - running</title>
<style>
    body {{ font-family: monospace; text-align: center; margin-top: 2em; }}
    button {{ margin-top: 1em; font-family: monospace; cursor: pointer; }}
</style>
</head>
<body>
<p>close this tab or window to exit gofer</p>
<button onclick="popout()">pop out</button>
<script>
  function ping() {{
    fetch('{HEARTBEAT_PATH}').catch(() => {{ window.close(); }});
  }}
  function popout() {{
    const w = window.open("/heartmon", "gofer-heartmon", "width=240,height=240,resizable=yes");
    if (w) {{ window.close(); }}
  }}
  ping();
  setInterval(ping, {HEARTMON_INTERVAL_MS});
</script>
</body>
</html>
"#
    )
}

fn page_head(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        escape_html(title)
    )
}

fn page_tail(heartbeat_ms: u64) -> String {
    format!(
        r#"<script>
  setInterval(function() {{
    fetch('{HEARTBEAT_PATH}').catch(function() {{
      console.log('gofer has closed');
    }});
  }}, {heartbeat_ms});
</script>
</body>
</html>
"#
    )
}

fn query_form() -> String {
    r#"<div class="query-bar">
<form method="POST">
<span class="query-label">query</span>
<input type="text" name="query" autofocus>
</form>
</div>
"#
    .to_string()
}

fn exit_link(return_to: &str, label: &str) -> String {
    format!(
        "<div class=\"return\">\n<a href=\"{}\">{label}</a>\n</div>\n",
        escape_html(return_to)
    )
}
