//! Alert email rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tera::{Context, Tera};

use crate::monitoring::DownList;

const ALERT_TEMPLATE: &str = r#"<html>
<body>
<h2>Site availability report ({{ generated_at }})</h2>
<p>The following sites were unreachable or returned an error after every attempt:</p>
<ul>
{% for site in down %}<li>{{ site.target }} ({{ site.detail }})</li>
{% endfor %}</ul>
<p>Please check them as soon as possible.</p>
</body>
</html>
"#;

/// Subject and HTML body of one alert email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub html: String,
}

#[derive(Serialize)]
struct DownSite<'a> {
    target: &'a str,
    detail: &'a str,
}

impl Report {
    /// Render the alert for `down`. Returns `Ok(None)` when nothing is down.
    pub fn build(down: &DownList, generated_at: DateTime<Utc>) -> Result<Option<Self>, tera::Error> {
        if down.is_empty() {
            return Ok(None);
        }

        let count = down.len();
        let noun = if count == 1 { "site" } else { "sites" };
        let subject = format!("⚠️ Site availability warning ({count} {noun} down)");

        let sites: Vec<DownSite<'_>> = down
            .iter()
            .map(|result| DownSite { target: &result.target, detail: &result.detail })
            .collect();

        let mut context = Context::new();
        context.insert("generated_at", &generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string());
        context.insert("down", &sites);

        // Autoescape on: targets and details come from the network
        let html = Tera::one_off(ALERT_TEMPLATE, &context, true)?;

        Ok(Some(Self { subject, html }))
    }
}
