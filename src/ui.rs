use crate::app::Page;
use crate::models::{Complaint, Dashboard, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

pub fn render_submit(text: &str, notices: &[Notice]) -> String {
    let content = fill(
        SUBMIT_HTML,
        &[
            ("NOTICES", render_notices(notices).as_str()),
            ("TEXT", escape_html(text).as_str()),
        ],
    );
    render_page(Page::Submit, "Submit a New Complaint", &content)
}

pub fn render_status(id: &str, found: Option<&Complaint>, notices: &[Notice]) -> String {
    let result = found
        .map(|complaint| {
            fill(
                STATUS_RESULT_HTML,
                &[
                    ("STATUS", complaint.status.as_str()),
                    ("TEXT", escape_html(&complaint.text).as_str()),
                    ("CREATED", escape_html(&complaint.created_at).as_str()),
                ],
            )
        })
        .unwrap_or_default();
    let content = fill(
        STATUS_HTML,
        &[
            ("NOTICES", render_notices(notices).as_str()),
            ("ID", escape_html(id).as_str()),
            ("RESULT", result.as_str()),
        ],
    );
    render_page(Page::Status, "Check Complaint Status", &content)
}

pub fn render_login(notices: &[Notice]) -> String {
    let content = fill(LOGIN_HTML, &[("NOTICES", render_notices(notices).as_str())]);
    render_page(Page::Admin, "Admin Portal", &content)
}

pub fn render_dashboard(dashboard: &Dashboard, notices: &[Notice]) -> String {
    let counts = &dashboard.counts;
    let complaints = if dashboard.complaints.is_empty() {
        render_notices(&[Notice::info("No complaints submitted yet.")])
    } else {
        dashboard.complaints.iter().map(render_complaint_row).collect()
    };
    let content = fill(
        DASHBOARD_HTML,
        &[
            ("NOTICES", render_notices(notices).as_str()),
            ("TOTAL", counts.total.to_string().as_str()),
            ("PENDING", counts.pending.to_string().as_str()),
            ("IN_PROGRESS", counts.in_progress.to_string().as_str()),
            ("RESOLVED", counts.resolved.to_string().as_str()),
            ("COMPLAINTS", complaints.as_str()),
        ],
    );
    render_page(Page::Admin, "Admin Portal", &content)
}

/// Admin view for a logged-in session when the complaint table can't be
/// read: keeps the logout control and shows what went wrong.
pub fn render_admin_unavailable(notices: &[Notice]) -> String {
    let content = fill(
        ADMIN_UNAVAILABLE_HTML,
        &[("NOTICES", render_notices(notices).as_str())],
    );
    render_page(Page::Admin, "Admin Portal", &content)
}

fn render_complaint_row(complaint: &Complaint) -> String {
    let options: String = Status::ALL
        .iter()
        .map(|status| {
            let selected = if *status == complaint.status { " selected" } else { "" };
            format!("<option value=\"{status}\"{selected}>{status}</option>")
        })
        .collect();
    let action = format!("/admin/complaints/{}/status", path_segment(&complaint.id));
    fill(
        COMPLAINT_ROW_HTML,
        &[
            ("ACTION", action.as_str()),
            ("ID", escape_html(&complaint.id).as_str()),
            ("STATUS", complaint.status.as_str()),
            ("CREATED", escape_html(&complaint.created_at).as_str()),
            ("TEXT", escape_html(&complaint.text).as_str()),
            ("OPTIONS", options.as_str()),
        ],
    )
}

fn render_page(active: Page, heading: &str, content: &str) -> String {
    let nav: String = Page::ALL
        .iter()
        .map(|page| {
            let class = if *page == active { " class=\"active\"" } else { "" };
            format!("<a href=\"{}\"{class}>{}</a>", page.path(), page.label())
        })
        .collect();
    fill(
        LAYOUT_HTML,
        &[("NAV", nav.as_str()), ("HEADING", heading), ("CONTENT", content)],
    )
}

/// Substitutes `{{KEY}}` placeholders in one pass over `template`.
/// Inserted values are never scanned for placeholders themselves.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after.find("}}").and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end))
        });
        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|notice| {
            let kind = match notice.kind {
                NoticeKind::Success => "ok",
                NoticeKind::Info => "info",
                NoticeKind::Warning => "warning",
                NoticeKind::Error => "error",
            };
            format!(
                "<div class=\"status\" data-type=\"{kind}\">{}</div>",
                escape_html(&notice.message)
            )
        })
        .collect()
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
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

fn path_segment(value: &str) -> String {
    value
        .bytes()
        .map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (byte as char).to_string()
            }
            other => format!("%{other:02X}"),
        })
        .collect()
}

const SUBMIT_HTML: &str = r#"<form method="post" action="/submit">
        <label for="text">Enter your complaint</label>
        <textarea id="text" name="text">{{TEXT}}</textarea>
        <div class="actions">
          <button class="btn-primary" type="submit">Submit Complaint</button>
        </div>
      </form>
      {{NOTICES}}"#;

const STATUS_HTML: &str = r#"<form method="post" action="/status">
        <label for="id">Enter your Complaint ID</label>
        <input type="text" id="id" name="id" value="{{ID}}" autocomplete="off" />
        <div class="actions">
          <button class="btn-primary" type="submit">Check Status</button>
        </div>
      </form>
      {{NOTICES}}
      {{RESULT}}"#;

const STATUS_RESULT_HTML: &str = r#"<section class="panel">
        <div class="stat">
          <span class="label">Status</span>
          <span class="value" id="complaint-status">{{STATUS}}</span>
        </div>
        <div class="stat">
          <span class="label">Submitted</span>
          <span class="value">{{CREATED}}</span>
        </div>
      </section>
      <div class="stat">
        <span class="label">Complaint</span>
        <span class="complaint-text">{{TEXT}}</span>
      </div>"#;

const LOGIN_HTML: &str = r#"<form method="post" action="/admin/login">
        <label for="password">Enter Admin Password</label>
        <input type="password" id="password" name="password" />
        <div class="actions">
          <button class="btn-primary" type="submit">Login</button>
        </div>
      </form>
      {{NOTICES}}"#;

const DASHBOARD_HTML: &str = r#"<form method="post" action="/admin/logout" class="actions">
        <button class="btn-secondary" type="submit">Logout</button>
      </form>
      {{NOTICES}}
      <h2>Dashboard</h2>
      <section class="panel">
        <div class="stat">
          <span class="label">Total</span>
          <span class="value" id="count-total">{{TOTAL}}</span>
        </div>
        <div class="stat">
          <span class="label">Pending</span>
          <span class="value accent" id="count-pending">{{PENDING}}</span>
        </div>
        <div class="stat">
          <span class="label">In Progress</span>
          <span class="value" id="count-in-progress">{{IN_PROGRESS}}</span>
        </div>
        <div class="stat">
          <span class="label">Resolved</span>
          <span class="value" id="count-resolved">{{RESOLVED}}</span>
        </div>
      </section>
      <h2>Manage Complaints</h2>
      {{COMPLAINTS}}"#;

const COMPLAINT_ROW_HTML: &str = r#"<details>
        <summary>Complaint ID: {{ID}} | Status: {{STATUS}}</summary>
        <p>{{TEXT}}</p>
        <p class="hint">Submitted {{CREATED}}</p>
        <form method="post" action="{{ACTION}}">
          <label>Update Status
            <select name="status">{{OPTIONS}}</select>
          </label>
          <div class="actions">
            <button class="btn-primary" type="submit">Save Update</button>
          </div>
        </form>
      </details>
      "#;

const ADMIN_UNAVAILABLE_HTML: &str = r#"<form method="post" action="/admin/logout" class="actions">
        <button class="btn-secondary" type="submit">Logout</button>
      </form>
      {{NOTICES}}"#;

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Anonymous Complaint Portal</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      justify-items: center;
      align-items: start;
      padding: 32px 18px 48px;
    }

    .app {
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
      animation: rise 600ms ease;
    }

    header {
      display: flex;
      flex-direction: column;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
      font-size: 1rem;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat span {
      display: block;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat .value.accent {
      color: var(--accent);
    }

    .actions {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 14px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      transition: transform 150ms ease, box-shadow 150ms ease;
      display: inline-flex;
      align-items: center;
      justify-content: center;
      gap: 10px;
    }

    button:active {
      transform: scale(0.98);
    }

    .btn-primary {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(255, 107, 74, 0.3);
    }

    .btn-secondary {
      background: var(--accent-2);
      color: white;
      box-shadow: 0 10px 24px rgba(47, 72, 88, 0.3);
    }

    .layout {
      width: min(1080px, 100%);
      display: grid;
      grid-template-columns: 220px 1fr;
      gap: 24px;
      align-items: start;
    }

    nav.menu {
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 20px;
      display: grid;
      gap: 8px;
    }

    nav.menu .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
      margin-bottom: 6px;
    }

    nav.menu a {
      display: block;
      padding: 10px 14px;
      border-radius: 999px;
      color: var(--ink);
      text-decoration: none;
      font-weight: 600;
    }

    nav.menu a.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    form {
      display: grid;
      gap: 12px;
    }

    textarea,
    input[type="text"],
    input[type="password"],
    select {
      font: inherit;
      padding: 12px 14px;
      border-radius: 14px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      background: white;
      color: var(--ink);
    }

    textarea {
      min-height: 160px;
      resize: vertical;
    }

    details {
      background: white;
      border-radius: 18px;
      padding: 14px 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    details summary {
      cursor: pointer;
      font-weight: 600;
    }

    details p {
      white-space: pre-wrap;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      padding: 12px 16px;
      border-radius: 14px;
      background: rgba(47, 72, 88, 0.06);
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="warning"] {
      color: #9a6a00;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .complaint-text {
      white-space: pre-wrap;
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.9rem;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }

      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 760px) {
      .layout {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <div class="layout">
    <nav class="menu">
      <span class="label">Menu</span>
      {{NAV}}
    </nav>
    <main class="app">
      <header>
        <h1>Anonymous Complaint Portal</h1>
        <p class="subtitle">{{HEADING}}</p>
      </header>
      {{CONTENT}}
    </main>
  </div>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusCounts;

    fn complaint(id: &str, text: &str, status: Status) -> Complaint {
        Complaint {
            id: id.to_string(),
            text: text.to_string(),
            status,
            created_at: "2026-01-05 09:30:00".to_string(),
        }
    }

    #[test]
    fn user_text_is_escaped() {
        let html = render_submit("<script>alert('x')</script>", &[]);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn menu_has_three_entries_and_marks_active() {
        let html = render_status("", None, &[]);
        assert_eq!(html.matches("<a href=").count(), 3);
        assert!(html.contains("<a href=\"/status\" class=\"active\">Check Status</a>"));
        assert!(html.contains("<a href=\"/submit\">Submit Complaint</a>"));
        assert!(html.contains("<a href=\"/admin\">Admin Portal</a>"));
    }

    #[test]
    fn dashboard_shows_counts_and_selects_current_status() {
        let complaints = vec![
            complaint("2601051234", "Broken light", Status::InProgress),
            complaint("2601055678", "Leak", Status::Resolved),
        ];
        let dashboard = Dashboard {
            counts: StatusCounts::tally(&complaints),
            complaints,
        };
        let html = render_dashboard(&dashboard, &[]);
        assert!(html.contains("id=\"count-total\">2<"));
        assert!(html.contains("id=\"count-pending\">0<"));
        assert!(html.contains("id=\"count-in-progress\">1<"));
        assert!(html.contains("id=\"count-resolved\">1<"));
        assert!(html.contains("action=\"/admin/complaints/2601051234/status\""));
        assert!(html.contains("<option value=\"In Progress\" selected>In Progress</option>"));
        assert!(html.contains("<option value=\"Resolved\" selected>Resolved</option>"));
    }

    #[test]
    fn empty_dashboard_says_so() {
        let dashboard = Dashboard {
            counts: StatusCounts::default(),
            complaints: Vec::new(),
        };
        assert!(render_dashboard(&dashboard, &[]).contains("No complaints submitted yet."));
    }

    #[test]
    fn placeholders_inside_user_text_stay_literal() {
        let complaints = vec![complaint(
            "{{TEXT}}",
            "see {{OPTIONS}} and {{ACTION}} here",
            Status::Pending,
        )];
        let dashboard = Dashboard {
            counts: StatusCounts::tally(&complaints),
            complaints,
        };
        let html = render_dashboard(&dashboard, &[]);
        assert!(html.contains("<p>see {{OPTIONS}} and {{ACTION}} here</p>"));
        assert!(html.contains("Complaint ID: {{TEXT}} | Status: Pending"));
        assert_eq!(html.matches("<option value=\"Pending\"").count(), 1);

        let found = complaint("2601051234", "{{CREATED}} {{STATUS}}", Status::Resolved);
        let html = render_status("{{RESULT}}", Some(&found), &[]);
        assert!(html.contains("{{CREATED}} {{STATUS}}"));
        assert!(html.contains("value=\"{{RESULT}}\""));
        assert_eq!(html.matches("id=\"complaint-status\"").count(), 1);

        let html = render_submit("{{NOTICES}}", &[Notice::warning("careful")]);
        assert!(html.contains(">{{NOTICES}}</textarea>"));
        assert_eq!(html.matches("careful").count(), 1);
    }

    #[test]
    fn fill_leaves_unknown_and_unclosed_markers() {
        assert_eq!(fill("a {{X}} b {{Y}} {{", &[("X", "1")]), "a 1 b {{Y}} {{");
    }

    #[test]
    fn unavailable_admin_view_keeps_logout() {
        let html = render_admin_unavailable(&[Notice::error("store down")]);
        assert!(html.contains("action=\"/admin/logout\""));
        assert!(html.contains("store down"));
        assert!(!html.contains("Enter Admin Password"));
    }

    #[test]
    fn odd_ids_are_percent_encoded_in_paths() {
        assert_eq!(path_segment("2601051234"), "2601051234");
        assert_eq!(path_segment("a/b c"), "a%2Fb%20c");
    }
}
