/// Server-side HTML rendering
///
/// The page has three sections: the kanban board with its filter bar, the
/// task creation form, and the team directory with the add-member form.
/// Every piece of interpolated text passes through [`escape`].

use std::collections::HashMap;
use std::fmt::Write;
use taskflow_shared::models::{
    task::{Task, TaskPriority, TaskStatus},
    user::{User, UserRole},
};

/// Escapes text for use in HTML content and quoted attributes
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A message shown above the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn class(&self) -> &'static str {
        match self {
            Notice::Success(_) => "notice success",
            Notice::Warning(_) => "notice warning",
            Notice::Error(_) => "notice error",
        }
    }

    fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Warning(text) | Notice::Error(text) => text,
        }
    }
}

/// Board filters currently applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardFilters {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<i64>,
}

/// Everything the page needs
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub tasks: Vec<Task>,
    pub users: Vec<User>,
    pub filters: BoardFilters,
    pub notices: Vec<Notice>,
}

/// Column heading for a status
pub fn column_title(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "TO DO",
        TaskStatus::InProgress => "IN PROGRESS",
        TaskStatus::Done => "DONE",
    }
}

/// Renders the complete page
pub fn render_page(page: &Page) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str(concat!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
        "<meta charset=\"utf-8\">\n<title>TaskFlow Pro</title>\n",
        "<style>.board{display:flex;gap:1rem}.column{flex:1}",
        ".card{padding:.5rem;margin-bottom:.5rem;border-left:4px solid #94a3b8}",
        ".notice.error{color:#b91c1c}.notice.warning{color:#b45309}.notice.success{color:#047857}</style>\n",
        "</head>\n<body>\n<h1>TaskFlow Pro</h1>\n",
        "<p>Streamlined Task Management &amp; Team Collaboration</p>\n",
    ));

    for notice in &page.notices {
        let _ = writeln!(
            html,
            "<div class=\"{}\">{}</div>",
            notice.class(),
            escape(notice.text())
        );
    }

    render_board(&mut html, page);
    render_task_form(&mut html, &page.users);
    render_team(&mut html, &page.users);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_board(html: &mut String, page: &Page) {
    let names: HashMap<i64, &str> = page
        .users
        .iter()
        .map(|user| (user.id, user.name.as_str()))
        .collect();

    html.push_str("<section id=\"board\">\n<h2>Kanban Board</h2>\n");
    html.push_str("<form method=\"get\" action=\"/\">\n");
    render_select(
        html,
        "status",
        "Status",
        "All",
        TaskStatus::ALL.iter().map(|s| (s.as_str().to_string(), s.as_str().to_string())),
        page.filters.status.map(|s| s.as_str().to_string()),
    );
    render_select(
        html,
        "priority",
        "Priority",
        "All",
        TaskPriority::ALL.iter().map(|p| (p.as_str().to_string(), p.as_str().to_string())),
        page.filters.priority.map(|p| p.as_str().to_string()),
    );
    render_select(
        html,
        "assignee",
        "Assignee",
        "All",
        user_options(&page.users),
        page.filters.assignee.map(|id| id.to_string()),
    );
    html.push_str("<button type=\"submit\">Filter</button>\n</form>\n<div class=\"board\">\n");

    for status in TaskStatus::ALL {
        let _ = writeln!(
            html,
            "<div class=\"column {}\">\n<h3>{}</h3>",
            status.as_str(),
            column_title(status)
        );

        let mut empty = true;
        for task in page.tasks.iter().filter(|task| task.status == status) {
            empty = false;
            render_card(html, task, &names);
        }
        if empty {
            html.push_str("<p class=\"caption\">Empty</p>\n");
        }

        html.push_str("</div>\n");
    }

    html.push_str("</div>\n</section>\n");
}

fn render_card(html: &mut String, task: &Task, names: &HashMap<i64, &str>) {
    let assignee = task
        .assigned_user_id
        .and_then(|id| names.get(&id).copied())
        .unwrap_or("Unassigned");
    let description = task
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("No description provided.");

    let _ = write!(
        html,
        concat!(
            "<div class=\"card\">\n",
            "<div class=\"card-title\">{} <span class=\"priority-badge\">{}</span></div>\n",
            "<div class=\"card-meta\"><b>Assignee:</b> {}</div>\n",
            "<div class=\"card-meta\">{}</div>\n",
            "</div>\n"
        ),
        escape(&task.name),
        task.priority,
        escape(assignee),
        escape(description),
    );
}

fn render_task_form(html: &mut String, users: &[User]) {
    html.push_str(concat!(
        "<section id=\"new-task\">\n<h2>New Task</h2>\n",
        "<form method=\"post\" action=\"/tasks\">\n",
        "<label>Task Name* <input type=\"text\" name=\"name\" maxlength=\"100\"></label>\n",
    ));
    render_select(
        html,
        "priority",
        "Priority",
        "",
        TaskPriority::ALL.iter().map(|p| (p.as_str().to_string(), p.as_str().to_string())),
        Some(TaskPriority::Medium.as_str().to_string()),
    );
    render_select(
        html,
        "assignee",
        "Assign To",
        "Unassigned",
        user_options(users),
        None,
    );
    render_select(
        html,
        "status",
        "Initial Status",
        "",
        TaskStatus::ALL.iter().map(|s| (s.as_str().to_string(), s.as_str().to_string())),
        Some(TaskStatus::Todo.as_str().to_string()),
    );
    html.push_str(concat!(
        "<label>Detailed Description <textarea name=\"description\" maxlength=\"300\"></textarea></label>\n",
        "<button type=\"submit\">Deploy Task</button>\n</form>\n</section>\n",
    ));
}

fn render_team(html: &mut String, users: &[User]) {
    html.push_str("<section id=\"team\">\n<h2>Team</h2>\n<h3>Active Directory</h3>\n");
    html.push_str("<table>\n<tr><th>id</th><th>name</th><th>role</th></tr>\n");
    for user in users {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            user.id,
            escape(&user.name),
            user.role
        );
    }
    html.push_str("</table>\n<h3>Add Team Member</h3>\n");
    html.push_str(concat!(
        "<form method=\"post\" action=\"/users\">\n",
        "<label>Full Name <input type=\"text\" name=\"name\" maxlength=\"50\"></label>\n",
    ));
    render_select(
        html,
        "role",
        "Role",
        "",
        [UserRole::Member, UserRole::Manager, UserRole::Admin]
            .iter()
            .map(|r| (r.as_str().to_string(), r.as_str().to_string())),
        None,
    );
    html.push_str("<button type=\"submit\">Add Member</button>\n</form>\n</section>\n");
}

fn user_options(users: &[User]) -> impl Iterator<Item = (String, String)> + '_ {
    users
        .iter()
        .map(|user| (user.id.to_string(), format!("{} - {}", user.id, user.name)))
}

/// Renders a `<select>`; an empty `blank` label means no blank option
fn render_select(
    html: &mut String,
    name: &str,
    label: &str,
    blank: &str,
    options: impl Iterator<Item = (String, String)>,
    selected: Option<String>,
) {
    let _ = writeln!(html, "<label>{} <select name=\"{}\">", label, name);
    if !blank.is_empty() {
        let _ = writeln!(html, "<option value=\"\">{}</option>", escape(blank));
    }
    for (value, text) in options {
        let marker = if selected.as_deref() == Some(value.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            escape(&value),
            marker,
            escape(&text)
        );
    }
    html.push_str("</select></label>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, name: &str, status: TaskStatus, assignee: Option<i64>) -> Task {
        Task {
            id,
            name: name.to_string(),
            description: None,
            status,
            priority: TaskPriority::High,
            assigned_user_id: assignee,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_empty_board() {
        let html = render_page(&Page::default());

        assert_eq!(html.matches("<p class=\"caption\">Empty</p>").count(), 3);
        assert!(html.contains("TO DO"));
        assert!(html.contains("IN PROGRESS"));
        assert!(html.contains("DONE"));
    }

    #[test]
    fn test_cards_land_in_their_columns() {
        let page = Page {
            tasks: vec![
                task(1, "Fix bug", TaskStatus::Todo, Some(1)),
                task(2, "Ship", TaskStatus::Done, Some(99)),
            ],
            users: vec![User {
                id: 1,
                name: "Ada".to_string(),
                role: UserRole::Admin,
            }],
            ..Default::default()
        };

        let html = render_page(&page);

        assert_eq!(html.matches("<p class=\"caption\">Empty</p>").count(), 1);
        assert!(html.contains("<b>Assignee:</b> Ada"));
        // Unknown assignee ids render as unassigned
        assert!(html.contains("<b>Assignee:</b> Unassigned"));
        assert!(html.contains("No description provided."));
        assert!(html.contains("<span class=\"priority-badge\">high</span>"));

        let todo = html.find("TO DO").unwrap();
        let done = html.find("<h3>DONE</h3>").unwrap();
        let fix = html.find("Fix bug").unwrap();
        let ship = html.find("Ship <span").unwrap();
        assert!(todo < fix && fix < done && done < ship);
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut hostile = task(1, "<b>bold</b>", TaskStatus::Todo, None);
        hostile.description = Some("a & b".to_string());

        let html = render_page(&Page {
            tasks: vec![hostile],
            notices: vec![Notice::Error("Connection Error: <refused>".to_string())],
            ..Default::default()
        });

        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("<div class=\"notice error\">Connection Error: &lt;refused&gt;</div>"));
        assert!(!html.contains("<b>bold</b>"));
    }

    #[test]
    fn test_selected_filters_are_marked() {
        let html = render_page(&Page {
            filters: BoardFilters {
                status: Some(TaskStatus::Done),
                priority: None,
                assignee: None,
            },
            ..Default::default()
        });

        assert!(html.contains("<option value=\"done\" selected>done</option>"));
    }
}
