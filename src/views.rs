// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered HTML for the single application page.

use crate::middleware::SessionUser;
use crate::models::{RiskLabel, SubmissionForm, CHECKING_ACCOUNT_OPTIONS, SAVING_ACCOUNT_OPTIONS};
use std::fmt::Write as _;

const STYLE: &str = "body{font-family:sans-serif;max-width:32rem;margin:2rem auto;padding:0 1rem}\
label{display:block;margin:.75rem 0}\
input,select{display:block;width:100%;padding:.4rem;margin-top:.25rem}\
.auth-btn{display:inline-block;padding:.5rem 1rem;background:#4285f4;color:#fff;border:0;text-decoration:none;cursor:pointer}\
.logout{background:#777}\
.error{color:#b00020}\
.result{margin-top:1.5rem;padding:1rem;border:1px solid #ccc}";

/// What the authenticated page shows besides the form.
#[derive(Debug, Default)]
pub struct FormView {
    pub form: SubmissionForm,
    pub error: Option<String>,
    pub prediction: Option<RiskLabel>,
}

/// Escape text for use in HTML content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Risk Prediction</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n<div class=\"App\">\n<h1>Risk Prediction</h1>\n{body}</div>\n</body>\n</html>\n"
    )
}

/// Page for visitors without a session.
pub fn sign_in_page() -> String {
    layout("<a href=\"/auth/google\" class=\"auth-btn\">Sign In with Google</a>\n")
}

/// Page for a signed-in user: welcome line, sign-out, form, error and result.
pub fn form_page(user: &SessionUser, view: &FormView) -> String {
    let form = &view.form;
    let mut body = String::new();

    let _ = writeln!(body, "<p>Welcome, {}</p>", escape(&user.display_name));
    body.push_str(
        "<form method=\"post\" action=\"/auth/logout\">\
         <button type=\"submit\" class=\"auth-btn logout\">Logout</button></form>\n",
    );

    body.push_str("<form method=\"post\" action=\"/\">\n");
    body.push_str(&text_input("Name:", "text", "name", &form.name));
    body.push_str(&text_input("Email:", "email", "email", &form.email));
    body.push_str(&text_input("Age:", "number", "age", &form.age));
    body.push_str(&select(
        "Saving accounts:",
        "savingAccount",
        &SAVING_ACCOUNT_OPTIONS,
        &form.saving_account,
    ));
    body.push_str(&select(
        "Checking account:",
        "checkingAccount",
        &CHECKING_ACCOUNT_OPTIONS,
        &form.checking_account,
    ));
    body.push_str(&text_input(
        "Credit amount:",
        "number",
        "creditAmount",
        &form.credit_amount,
    ));
    body.push_str(&text_input(
        "Duration (in months):",
        "number",
        "duration",
        &form.duration,
    ));
    body.push_str("<button type=\"submit\">Predict Risk</button>\n</form>\n");

    if let Some(error) = &view.error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(error));
    }

    if let Some(label) = view.prediction {
        let _ = writeln!(
            body,
            "<div class=\"result\">\n<h3>Prediction Result:</h3>\n<p>{}</p>\n</div>",
            escape(label.as_str())
        );
    }

    layout(&body)
}

fn text_input(label: &str, kind: &str, name: &str, value: &str) -> String {
    format!(
        "<label>\n{label}\n<input type=\"{kind}\" name=\"{name}\" value=\"{}\" required>\n</label>\n",
        escape(value)
    )
}

fn select(label: &str, name: &str, options: &[&str], selected: &str) -> String {
    let mut out = format!("<label>\n{label}\n<select name=\"{name}\" required>\n");
    out.push_str("<option value=\"\">Select</option>\n");
    for option in options {
        let marker = if *option == selected { " selected" } else { "" };
        let option = escape(option);
        let _ = writeln!(out, "<option value=\"{option}\"{marker}>{option}</option>");
    }
    out.push_str("</select>\n</label>\n");
    out
}
