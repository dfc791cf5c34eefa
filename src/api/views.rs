//! Minimal HTML views for the auth pages and the admin home.

use axum::response::Html;
use std::fmt::Write;

use crate::api::resources::Resource;

/// Escape text for HTML element and attribute contexts.
pub(crate) fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape(title)
    ))
}

fn error_block(error: Option<&str>) -> String {
    error.map_or_else(String::new, |message| {
        format!("<div class=\"alert alert-danger\" role=\"alert\">{}</div>\n", escape(message))
    })
}

pub(crate) struct LoginView<'a> {
    pub action: &'a str,
    pub title: &'a str,
    pub logo_url: Option<&'a str>,
    pub username_field: &'a str,
}

pub(crate) fn login_page(view: &LoginView<'_>, error: Option<&str>) -> Html<String> {
    let logo = view.logo_url.map_or_else(String::new, |url| {
        format!("<img class=\"logo\" src=\"{}\" alt=\"\">\n", escape(url))
    });
    let body = format!(
        "{logo}<h2>{title}</h2>\n{error}\
         <form method=\"post\" action=\"{action}\">\n\
         <input type=\"text\" name=\"{field}\" placeholder=\"{field}\" autocomplete=\"username\" required>\n\
         <input type=\"password\" name=\"password\" autocomplete=\"current-password\" required>\n\
         <label><input type=\"checkbox\" name=\"remember_me\"> Remember me</label>\n\
         <button type=\"submit\">Sign in</button>\n</form>",
        title = escape(view.title),
        error = error_block(error),
        action = escape(view.action),
        field = escape(view.username_field),
    );
    layout(view.title, &body)
}

pub(crate) fn init_page(action: &str, username_field: &str, error: Option<&str>) -> Html<String> {
    let body = format!(
        "<h2>Create the first admin</h2>\n{error}\
         <form method=\"post\" action=\"{action}\">\n\
         <input type=\"text\" name=\"{field}\" placeholder=\"{field}\" required>\n\
         <input type=\"password\" name=\"password\" autocomplete=\"new-password\" required>\n\
         <input type=\"password\" name=\"confirm_password\" autocomplete=\"new-password\" required>\n\
         <button type=\"submit\">Create</button>\n</form>",
        error = error_block(error),
        action = escape(action),
        field = escape(username_field),
    );
    layout("Initialize", &body)
}

pub(crate) fn password_page(action: &str, username: &str, error: Option<&str>) -> Html<String> {
    let body = format!(
        "<h2>Change password for {username}</h2>\n{error}\
         <form method=\"post\" action=\"{action}\">\n\
         <input type=\"password\" name=\"old_password\" autocomplete=\"current-password\" required>\n\
         <input type=\"password\" name=\"new_password\" autocomplete=\"new-password\" required>\n\
         <input type=\"password\" name=\"re_new_password\" autocomplete=\"new-password\" required>\n\
         <button type=\"submit\">Update</button>\n</form>",
        username = escape(username),
        error = error_block(error),
        action = escape(action),
    );
    layout("Change password", &body)
}

fn render_resources(out: &mut String, resources: &[Resource]) {
    out.push_str("<ul>\n");
    for resource in resources {
        match resource {
            Resource::Model { label, model } => {
                let _ = writeln!(
                    out,
                    "<li data-model=\"{}\">{}</li>",
                    escape(model),
                    escape(label)
                );
            }
            Resource::Link { label, url } => {
                let _ = writeln!(
                    out,
                    "<li><a href=\"{}\">{}</a></li>",
                    escape(url),
                    escape(label)
                );
            }
            Resource::Dropdown { label, resources } => {
                let _ = writeln!(out, "<li>{}", escape(label));
                render_resources(out, resources);
                out.push_str("</li>\n");
            }
        }
    }
    out.push_str("</ul>\n");
}

pub(crate) struct HomeView<'a> {
    pub title: &'a str,
    pub username: &'a str,
    pub resources: &'a [Resource],
    pub password_url: Option<&'a str>,
    pub logout_url: Option<&'a str>,
}

pub(crate) fn home_page(view: &HomeView<'_>) -> Html<String> {
    let mut body = format!("<nav>\n<span class=\"user\">{}</span>\n", escape(view.username));
    if let Some(url) = view.password_url {
        let _ = writeln!(body, "<a href=\"{}\">Change password</a>", escape(url));
    }
    if let Some(url) = view.logout_url {
        let _ = writeln!(body, "<a href=\"{}\">Logout</a>", escape(url));
    }
    let _ = writeln!(body, "</nav>\n<h1>{}</h1>", escape(view.title));
    render_resources(&mut body, view.resources);
    layout(view.title, &body)
}
