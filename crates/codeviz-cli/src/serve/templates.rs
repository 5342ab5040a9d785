//! HTML page served at `/`.
//!
//! A single form that posts to `/api/render` and inlines the returned SVG.

use codeviz_core::{DiagramType, Language};

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>codeviz</title>
<style>
body { font-family: sans-serif; margin: 2rem; }
textarea { width: 100%; height: 16rem; font-family: monospace; }
#out { margin-top: 1rem; }
#err { color: #b00020; }
</style>
</head>
<body>
<h1>codeviz</h1>
<form id="form">
<textarea name="code" placeholder="Paste Python or Java code"></textarea>
<p>
<select name="language">{{LANGUAGES}}</select>
<select name="diagram_type">{{DIAGRAMS}}</select>
<button type="submit">Visualize</button>
</p>
</form>
<div id="err"></div>
<div id="out"></div>
<script>
document.getElementById("form").addEventListener("submit", async (ev) => {
  ev.preventDefault();
  const data = Object.fromEntries(new FormData(ev.target));
  const res = await fetch("/api/render", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(data),
  });
  const err = document.getElementById("err");
  const out = document.getElementById("out");
  if (res.ok) {
    err.textContent = "";
    out.innerHTML = await res.text();
  } else {
    out.innerHTML = "";
    err.textContent = (await res.json()).error;
  }
});
</script>
</body>
</html>
"#;

/// Render the index page with the supported languages and diagram types.
pub fn render_index_page() -> String {
    let mut languages = option("auto", "Auto-detect");
    for language in Language::ALL {
        languages.push_str(&option(language.as_str(), language.display_name()));
    }
    let diagrams: String = DiagramType::ALL
        .iter()
        .map(|d| option(d.as_str(), d.title()))
        .collect();

    PAGE_TEMPLATE
        .replace("{{LANGUAGES}}", &languages)
        .replace("{{DIAGRAMS}}", &diagrams)
}

fn option(value: &str, label: &str) -> String {
    format!(
        r#"<option value="{}">{}</option>"#,
        html_escape(value),
        html_escape(label)
    )
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
