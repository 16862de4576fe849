// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML rendering of the search page.
//!
//! The page works without JavaScript: every interaction is a plain form
//! post answered with a redirect back to `/`.

use crate::models::{ActivityRow, Pagination, SearchView};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

pub const PAGE_TITLE: &str = "Activity Search";
pub const NOT_FOUND_MESSAGE: &str = "No matching activities found.";

const COLUMNS: [&str; 7] = [
    "ID",
    "Subject",
    "Project",
    "Type",
    "Created by",
    "Created",
    "Favorite",
];

const STYLE: &str = "\
body{font-family:sans-serif;margin:1.5rem}\
h1{text-align:center}\
input[type=text]{width:100%;padding:.5rem;box-sizing:border-box}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ccc;padding:.4rem .8rem}\
thead.favorites tr{background:#fef3c7}\
thead.results tr{background:#f3f4f6}\
tr.project th{text-align:left;background:#fffbeb}\
td.center{text-align:center}\
button.toggle{background:none;border:none;font-size:1.1rem;cursor:pointer}\
nav.pages{margin-top:1.5rem;text-align:center}\
nav.pages button{margin:0 .15rem;padding:.25rem .6rem}\
nav.pages button.current{background:#3b82f6;color:#fff}";

/// Render the complete page for a session view.
pub fn render_page(view: &SearchView) -> String {
    let mut html = String::with_capacity(8 * 1024);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{PAGE_TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{PAGE_TITLE}</h1>\n"
    );

    render_search_form(&mut html, &view.keyword);

    if view.show_favorites() {
        render_favorites(&mut html, view);
    }

    html.push_str("<h2>Search results</h2>\n");
    if view.not_found {
        let _ = writeln!(html, "<p class=\"not-found\">{NOT_FOUND_MESSAGE}</p>");
    } else {
        render_results(&mut html, &view.results);
    }

    if let Some(pagination) = &view.pagination {
        render_pagination(&mut html, pagination);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_search_form(html: &mut String, keyword: &str) {
    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"/search\">\
         <input type=\"text\" name=\"keyword\" value=\"{}\" \
         placeholder=\"Search keyword\" autofocus></form>",
        encode_double_quoted_attribute(keyword)
    );
}

fn render_header(html: &mut String, class: &str) {
    let _ = write!(html, "<thead class=\"{class}\"><tr>");
    for column in COLUMNS {
        let _ = write!(html, "<th>{column}</th>");
    }
    html.push_str("</tr></thead>\n");
}

fn render_favorites(html: &mut String, view: &SearchView) {
    html.push_str("<h2>★ Favorites</h2>\n<table id=\"favorites\">\n");
    render_header(html, "favorites");
    html.push_str("<tbody>\n");
    for group in &view.favorite_groups {
        let _ = writeln!(
            html,
            "<tr class=\"project\"><th colspan=\"{}\">{}</th></tr>",
            COLUMNS.len(),
            encode_text(&group.project_name)
        );
        for row in &group.rows {
            render_row(html, row);
        }
    }
    html.push_str("</tbody>\n</table>\n");
}

fn render_results(html: &mut String, rows: &[ActivityRow]) {
    html.push_str("<table id=\"results\">\n");
    render_header(html, "results");
    html.push_str("<tbody>\n");
    for row in rows {
        render_row(html, row);
    }
    html.push_str("</tbody>\n</table>\n");
}

fn render_row(html: &mut String, row: &ActivityRow) {
    let (mark, label) = if row.favorite {
        ("☑", "Remove from favorites")
    } else {
        ("☐", "Add to favorites")
    };

    let _ = writeln!(
        html,
        "<tr data-id=\"{id}\"><td class=\"center\">{id}</td><td>{summary}</td>\
         <td>{project}</td><td class=\"center\">{kind}</td><td>{user}</td><td>{date}</td>\
         <td class=\"center\"><form method=\"post\" action=\"/favorites/{id}\">\
         <button type=\"submit\" class=\"toggle\" role=\"checkbox\" aria-checked=\"{checked}\" \
         title=\"{label}\">{mark}</button></form></td></tr>",
        id = row.id,
        summary = encode_text(&row.summary),
        project = encode_text(&row.project_name),
        kind = encode_text(&row.type_label),
        user = encode_text(&row.user_name),
        date = encode_text(&row.created_date),
        checked = row.favorite,
    );
}

fn render_pagination(html: &mut String, pagination: &Pagination) {
    html.push_str("<nav class=\"pages\"><form method=\"post\" action=\"/page\">");

    let _ = write!(
        html,
        "<button name=\"page\" value=\"{}\"{}>← Prev</button>",
        pagination.current_page.saturating_sub(1),
        disabled(!pagination.has_previous)
    );

    for page in pagination.pages() {
        let class = if page == pagination.current_page {
            " class=\"current\" aria-current=\"page\""
        } else {
            ""
        };
        let _ = write!(
            html,
            "<button name=\"page\" value=\"{page}\"{class}>{page}</button>"
        );
    }

    let _ = write!(
        html,
        "<button name=\"page\" value=\"{}\"{}>Next →</button>",
        pagination.current_page + 1,
        disabled(!pagination.has_next)
    );

    html.push_str("</form></nav>\n");
}

fn disabled(flag: bool) -> &'static str {
    if flag {
        " disabled"
    } else {
        ""
    }
}
