//! HTML views.
//!
//! Every view is a pure function of the session data and form input it is
//! given. User-supplied text is escaped before it reaches the page.

use std::fmt::Write as _;

use tasklist_lib::{ListFilters, Priority, SortKey, Task, UserInfo};

use crate::format::{
    StatsOutput, format_percent, format_priority_icon, format_status_icon, format_task_meta,
};

const APP_TITLE: &str = "☁️ Cloud Task Manager";

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:0 auto;padding:1rem}\
nav a{margin-right:1rem}.user{float:right;text-align:right}.user img{border-radius:50%}\
.flash{padding:.5rem 1rem;border-radius:6px;margin:1rem 0}.success{background:#e6f4ea}\
.warning{background:#fff4e5}.error{background:#fdecea}.task{border-bottom:1px solid #ddd;padding:.5rem 0}\
.meta{color:#666;font-size:.85rem}.metrics{display:flex;gap:2rem}.metric strong{display:block;font-size:1.6rem}\
form.inline{display:inline}";

/// One-shot banner shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Warning(String),
}

impl Flash {
    fn class(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Warning(_) => "warning",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Warning(m) => m,
        }
    }
}

/// Escape text for use in HTML content and attribute values.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(user: Option<&UserInfo>, flash: Option<&Flash>, body: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>Cloud Task Manager</title><style>{STYLE}</style></head><body>"
    );

    if let Some(user) = user {
        let _ = write!(
            html,
            "<div class=\"user\"><img src=\"{}\" width=\"40\" height=\"40\" alt=\"\"><br>\
             <strong>{}</strong><br><small>{}</small>\
             <form method=\"post\" action=\"/logout\"><button type=\"submit\">🚪 Sign Out</button></form></div>",
            escape(&user.avatar_url),
            escape(&user.name),
            escape(&user.email),
        );
    }

    let _ = write!(html, "<h1>{APP_TITLE}</h1>");

    if user.is_some() {
        html.push_str(
            "<nav><a href=\"/tasks/new\">Add Task</a><a href=\"/tasks\">View Tasks</a>\
             <a href=\"/stats\">Task Statistics</a></nav><hr>",
        );
    }

    if let Some(flash) = flash {
        let _ = write!(
            html,
            "<div class=\"flash {}\">{}</div>",
            flash.class(),
            escape(flash.message())
        );
    }

    html.push_str(body);
    html.push_str(
        "<hr><p class=\"meta\">☁️ Tasks are saved locally and synced across sessions</p></body></html>",
    );
    html
}

fn error_banner(error: Option<&str>) -> String {
    error.map_or_else(String::new, |e| {
        format!("<div class=\"flash error\">❌ {}</div>", escape(e))
    })
}

/// Sign-in form.
#[must_use]
pub fn login_view(error: Option<&str>, name: &str, email: &str) -> String {
    let body = format!(
        "<h3>Sign in to manage your tasks</h3>\
         <p>Enter your name and email to get started with your personal task manager.</p>{}\
         <form method=\"post\" action=\"/login\">\
         <label>Your Name<br><input name=\"name\" value=\"{}\" placeholder=\"Enter your name...\"></label><br>\
         <label>Email Address<br><input name=\"email\" value=\"{}\" placeholder=\"Enter your email...\"></label><br>\
         <button type=\"submit\">🚀 Sign In</button></form>",
        error_banner(error),
        escape(name),
        escape(email),
    );
    layout(None, None, &body)
}

fn priority_options(selected: Option<Priority>, include_all: bool) -> String {
    let mut html = String::new();
    if include_all {
        let sel = if selected.is_none() { " selected" } else { "" };
        let _ = write!(html, "<option value=\"All\"{sel}>All</option>");
    }
    for priority in Priority::ALL {
        let sel = if selected == Some(priority) { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{priority}\"{sel}>{priority}</option>");
    }
    html
}

/// Add Task form.
#[must_use]
pub fn add_task_view(
    user: &UserInfo,
    flash: Option<&Flash>,
    error: Option<&str>,
    title: &str,
    description: &str,
    priority: Priority,
) -> String {
    let body = format!(
        "<h2>➕ Add New Task</h2>{}<form method=\"post\" action=\"/tasks\">\
         <label>Task Title *<br><input name=\"title\" value=\"{}\" placeholder=\"Enter task title...\"></label><br>\
         <label>Description<br><textarea name=\"description\" rows=\"4\" placeholder=\"Enter task description (optional)...\">{}</textarea></label><br>\
         <label>Priority<br><select name=\"priority\">{}</select></label><br>\
         <button type=\"submit\">Add Task</button></form>",
        error_banner(error),
        escape(title),
        escape(description),
        priority_options(Some(priority), false),
    );
    layout(Some(user), flash, &body)
}

/// Query string reproducing `filters`, used to return to the same list view.
#[must_use]
pub fn list_query(filters: &ListFilters) -> String {
    format!(
        "show_completed={}&priority={}&sort={}",
        filters.include_completed,
        filters.priority.map_or("All", Priority::as_str),
        filters.sort,
    )
}

fn action_button(task_id: u64, action: &str, label: &str, return_to: &str) -> String {
    format!(
        "<form class=\"inline\" method=\"post\" action=\"/tasks/{task_id}/{action}\">\
         <input type=\"hidden\" name=\"return_to\" value=\"{}\">\
         <button type=\"submit\">{label}</button></form>",
        escape(return_to)
    )
}

/// View Tasks list with filter controls and per-row actions.
#[must_use]
pub fn task_list_view(
    user: &UserInfo,
    flash: Option<&Flash>,
    tasks: &[&Task],
    filters: &ListFilters,
) -> String {
    let mut body = String::from("<h2>📋 View Tasks</h2><form method=\"get\" action=\"/tasks\">");

    let _ = write!(
        body,
        "<label>Completed <select name=\"show_completed\">\
         <option value=\"true\"{}>Show completed tasks</option>\
         <option value=\"false\"{}>Hide completed tasks</option></select></label> ",
        if filters.include_completed { " selected" } else { "" },
        if filters.include_completed { "" } else { " selected" },
    );
    let _ = write!(
        body,
        "<label>Filter by priority <select name=\"priority\">{}</select></label> ",
        priority_options(filters.priority, true)
    );
    body.push_str("<label>Sort by <select name=\"sort\">");
    for key in SortKey::ALL {
        let sel = if key == filters.sort { " selected" } else { "" };
        let _ = write!(body, "<option value=\"{key}\"{sel}>{}</option>", key.label());
    }
    body.push_str("</select></label> <button type=\"submit\">Apply</button></form>");

    if tasks.is_empty() {
        body.push_str("<p>📝 No tasks found. Add a new task to get started!</p>");
        return layout(Some(user), flash, &body);
    }

    let return_to = format!("/tasks?{}", list_query(filters));
    for task in tasks {
        let _ = write!(
            body,
            "<div class=\"task\"><strong>{} {}</strong> {}",
            format_status_icon(task.completed),
            escape(&task.title),
            format_priority_icon(task.priority),
        );
        if !task.description.is_empty() {
            let _ = write!(body, "<br><em>{}</em>", escape(&task.description));
        }
        let _ = write!(body, "<div class=\"meta\">{}</div>", format_task_meta(task));
        if task.completed {
            body.push_str(&action_button(task.id, "undo", "↩️ Undo", &return_to));
        } else {
            body.push_str(&action_button(task.id, "complete", "✅ Complete", &return_to));
        }
        body.push_str(&action_button(task.id, "delete", "🗑️ Delete", &return_to));
        body.push_str("</div>");
    }

    layout(Some(user), flash, &body)
}

fn metric(label: &str, value: usize, detail: &str) -> String {
    format!("<div class=\"metric\">{label}<strong>{value}</strong><small>{detail}</small></div>")
}

fn ratio(part: usize, total: usize) -> String {
    format!("{part}/{total}")
}

/// Task Statistics view.
#[must_use]
pub fn stats_view(user: &UserInfo, flash: Option<&Flash>, stats: &StatsOutput) -> String {
    let total = stats.stats.total;
    let mut body = String::from("<h2>📊 Task Statistics</h2><div class=\"metrics\">");
    body.push_str(&metric("Total Tasks", total, ""));
    body.push_str(&metric(
        "Completed Tasks",
        stats.stats.completed,
        &ratio(stats.stats.completed, total),
    ));
    body.push_str(&metric(
        "Pending Tasks",
        stats.stats.pending,
        &ratio(stats.stats.pending, total),
    ));
    body.push_str("</div>");

    let _ = write!(
        body,
        "<p><progress max=\"1\" value=\"{:.3}\"></progress> Completion Rate: {}</p>",
        stats.completion_rate,
        format_percent(stats.completion_rate),
    );

    if total > 0 {
        body.push_str("<h3>Priority Breakdown</h3><div class=\"metrics\">");
        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            body.push_str(&metric(
                &format!("{priority} Priority"),
                stats.by_priority.count(priority),
                "",
            ));
        }
        body.push_str("</div>");
    }

    layout(Some(user), flash, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tasklist_lib::{Identity, PriorityBreakdown, TaskStats, session::validate_sign_in};

    fn user() -> UserInfo {
        validate_sign_in("Ada Lovelace", "ada@example.com").unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_login_view_keeps_input_and_shows_error() {
        let html = login_view(Some("Please enter both name and email!"), "Ada", "");
        assert!(html.contains("Please enter both name and email!"));
        assert!(html.contains("value=\"Ada\""));
        assert!(!html.contains("Sign Out"));
    }

    #[test]
    fn test_task_list_escapes_titles_and_offers_actions() {
        let mut task = Task::new(
            3,
            Identity::new("ada_example_com"),
            "<script>x</script>",
            "",
            Priority::Medium,
            Utc::now(),
        );
        let filters = ListFilters::default();
        let html = task_list_view(&user(), None, &[&task], &filters);
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(html.contains("action=\"/tasks/3/complete\""));
        assert!(html.contains("action=\"/tasks/3/delete\""));

        task.complete(Utc::now());
        let html = task_list_view(&user(), None, &[&task], &filters);
        assert!(html.contains("action=\"/tasks/3/undo\""));
    }

    #[test]
    fn test_empty_list_message() {
        let html = task_list_view(&user(), None, &[], &ListFilters::default());
        assert!(html.contains("No tasks found"));
    }

    #[test]
    fn test_stats_view_zero_total() {
        let stats = StatsOutput::new(
            TaskStats {
                total: 0,
                completed: 0,
                pending: 0,
            },
            PriorityBreakdown::default(),
        );
        let html = stats_view(&user(), None, &stats);
        assert!(html.contains("Completion Rate: 0.0%"));
        assert!(html.contains("0/0"));
        assert!(!html.contains("Priority Breakdown"));
    }

    #[test]
    fn test_list_query_roundtrip_values() {
        let filters = ListFilters {
            include_completed: false,
            priority: Some(Priority::High),
            sort: SortKey::Title,
        };
        assert_eq!(
            list_query(&filters),
            "show_completed=false&priority=High&sort=title"
        );
    }
}
