//! The user-facing page: title, error banner, flight count, map and a Refresh button.
//!
//! The page is self-contained, deck.gl and maplibre come from a CDN and the map description is
//! embedded as JSON.  When there is nothing to show, both the count and the map are skipped.
//!

use tracing::trace;

use crate::template::substitute;
use crate::{MapConfig, View};

const PAGE: &str = include_str!("templates/page.html");
const MAP: &str = include_str!("templates/map.html");

/// A rendered view.
///
#[derive(Debug)]
pub struct Page<'a> {
    map: &'a MapConfig,
    view: &'a View,
}

impl<'a> Page<'a> {
    pub fn new(map: &'a MapConfig, view: &'a View) -> Self {
        Page { map, view }
    }

    /// Generate the HTML document.
    ///
    #[tracing::instrument(skip(self))]
    pub fn render(&self) -> Result<String, serde_json::Error> {
        trace!("render page");

        let error = match &self.view.error {
            Some(msg) => format!("  <p class=\"error\">{}</p>", html_escape(msg)),
            None => String::new(),
        };

        let flights = if self.view.flights.is_empty() {
            String::new()
        } else {
            let deck = self.map.deck(&self.view.flights);
            let json = script_escape(&serde_json::to_string(&deck)?);
            let count = self.view.flights.len().to_string();
            fill(MAP, &[("count", &count), ("deck", &json)])
        };

        let title = html_escape(&self.map.title);
        Ok(fill(
            PAGE,
            &[("title", &title), ("error", &error), ("flights", &flights)],
        ))
    }
}

/// Replace every `{{key}}` in one pass, values are never looked at again.
///
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    substitute(template, "{{", "}}", |key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON inside a `<script>` element.  `<`, `>` and `&` only appear inside strings, where the
/// `\uXXXX` form is equivalent, so `</script>` can never close the element early.
///
fn script_escape(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
