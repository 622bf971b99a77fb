//! Analytics event surface.
//!
//! Pages are instrumented at render time with data attributes
//! (`data-observe-section`, `data-track-click`, `data-page-event`); the
//! bootstrap script emitted into each page wires those attributes to
//! `logEvent(name, props)`, a fire-and-forget POST to the configured
//! endpoint. No return value is consumed and delivery failures are
//! ignored.

/// Fired once when a document page loads.
pub const EVENT_VIEW_POST: &str = "view_blog_post";

/// Fired when an instrumented section scrolls into view.
pub const EVENT_VIEW_SECTION: &str = "view_landing_section";

/// Fired when an instrumented inline link is clicked.
pub const EVENT_CLICK_LINK: &str = "click_inline_link";

/// The client-side event bootstrap, parameterized by the collection
/// endpoint.
pub fn bootstrap_script(endpoint: &str) -> String {
    // JSON-encode the endpoint so it lands in the script as a valid literal;
    // `<` is escaped so the value can never close the script element
    let endpoint = serde_json::to_string(endpoint)
        .unwrap_or_else(|_| "\"\"".to_owned())
        .replace('<', "\\u003c");
    format!(
        r#"<script>
(function () {{
  var endpoint = {endpoint};
  function logEvent(name, props) {{
    var payload = JSON.stringify({{ name: name, props: props }});
    if (navigator.sendBeacon) {{
      navigator.sendBeacon(endpoint, payload);
    }} else {{
      fetch(endpoint, {{ method: "POST", body: payload, keepalive: true }}).catch(function () {{}});
    }}
  }}
  var body = document.body;
  if (body.dataset.pageEvent) {{
    logEvent(body.dataset.pageEvent, {{
      slug: body.dataset.pageSlug || "",
      title: body.dataset.pageTitle || ""
    }});
  }}
  var seen = {{}};
  var observer = new IntersectionObserver(function (entries) {{
    entries.forEach(function (entry) {{
      var section = entry.target.dataset.observeSection;
      if (entry.isIntersecting && section && !seen[section]) {{
        seen[section] = true;
        logEvent("{view_section}", {{ section: section }});
      }}
    }});
  }}, {{ threshold: 0.5 }});
  document.querySelectorAll("[data-observe-section]").forEach(function (el) {{
    observer.observe(el);
  }});
  document.querySelectorAll("[data-track-click]").forEach(function (el) {{
    el.addEventListener("click", function () {{
      logEvent("{click_link}", {{ title: el.dataset.trackClick || "unknown" }});
    }});
  }});
}})();
</script>"#,
        view_section = EVENT_VIEW_SECTION,
        click_link = EVENT_CLICK_LINK,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_embeds_endpoint() {
        let script = bootstrap_script("https://stats.example.com/collect");
        assert!(script.contains("\"https://stats.example.com/collect\""));
    }

    #[test]
    fn test_bootstrap_escapes_endpoint() {
        let script = bootstrap_script("</script><script>alert(1)");
        assert!(!script.contains("</script><script>alert(1)"));
    }

    #[test]
    fn test_bootstrap_wires_event_names() {
        let script = bootstrap_script("/api/collect");
        assert!(script.contains(EVENT_VIEW_SECTION));
        assert!(script.contains(EVENT_CLICK_LINK));
    }
}
