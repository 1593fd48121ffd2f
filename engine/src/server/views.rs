//! Server-rendered pages
//!
//! Every value that came from a user passes through [`escape`] before it is
//! interpolated.

use super::forms::RegisterForm;
use sdk::types::UserProfile;

const STYLE: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            max-width: 720px;
            margin: 50px auto;
            padding: 20px;
            background: #f5f5f5;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        h1 { color: #333; margin-top: 0; }
        label { display: block; margin-top: 12px; font-weight: bold; }
        input, textarea { width: 100%; padding: 8px; box-sizing: border-box; }
        button { margin-top: 16px; padding: 8px 16px; }
        .error {
            margin: 20px 0;
            padding: 15px;
            background: #fff3cd;
            border-left: 4px solid #ffc107;
            color: #856404;
        }
        .advice {
            margin: 20px 0;
            padding: 15px;
            background: #f8f9fa;
            border-left: 4px solid #007bff;
            white-space: pre-wrap;
        }
        .inline { display: inline; }
"#;

/// Escape text for HTML element content and quoted attribute values
pub fn escape(input: &str) -> String {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} · Compass</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>"#,
        title = escape(title),
        style = STYLE,
        body = body,
    )
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"        <div class="error">{}</div>"#, escape(e)))
        .unwrap_or_default()
}

/// Registration form, re-filled with everything except the password
pub fn register_page(error: Option<&str>, form: &RegisterForm) -> String {
    let body = format!(
        r#"        <h1>Create your account</h1>
{error}
        <form method="post" action="/register">
            <label for="name">Name</label>
            <input id="name" name="name" value="{name}" required>
            <label for="email">Email</label>
            <input id="email" name="email" type="email" value="{email}" required>
            <label for="password">Password</label>
            <input id="password" name="password" type="password" minlength="8" required>
            <label for="grade">Grade</label>
            <input id="grade" name="grade" value="{grade}">
            <label for="interests">Interests (comma separated)</label>
            <input id="interests" name="interests" value="{interests}">
            <label for="goals">Goals</label>
            <textarea id="goals" name="goals" rows="3">{goals}</textarea>
            <button type="submit">Register</button>
        </form>
        <p>Already have an account? <a href="/login">Log in</a></p>"#,
        error = error_banner(error),
        name = escape(&form.name),
        email = escape(&form.email),
        grade = escape(&form.grade),
        interests = escape(&form.interests),
        goals = escape(&form.goals),
    );
    layout("Register", &body)
}

/// Login form
pub fn login_page(error: Option<&str>, email: &str) -> String {
    let body = format!(
        r#"        <h1>Log in</h1>
{error}
        <form method="post" action="/login">
            <label for="email">Email</label>
            <input id="email" name="email" type="email" value="{email}" required>
            <label for="password">Password</label>
            <input id="password" name="password" type="password" required>
            <button type="submit">Log in</button>
        </form>
        <p>New here? <a href="/register">Create an account</a></p>"#,
        error = error_banner(error),
        email = escape(email),
    );
    layout("Log in", &body)
}

/// Dashboard with the profile summary, the advisor form and, after a
/// request, the advice itself
pub fn dashboard(profile: &UserProfile, exchange: Option<(&str, &str)>) -> String {
    let interests = profile.interests_joined();
    let (prompt, advice) = match exchange {
        Some((prompt, advice)) => (
            escape(prompt),
            format!(
                r#"        <h2>Advice</h2>
        <div class="advice">{}</div>"#,
                escape(advice)
            ),
        ),
        None => (String::new(), String::new()),
    };

    let body = format!(
        r#"        <h1>Welcome, {name}</h1>
        <ul>
            <li><strong>Email:</strong> {email}</li>
            <li><strong>Grade:</strong> {grade}</li>
            <li><strong>Interests:</strong> {interests}</li>
            <li><strong>Goals:</strong> {goals}</li>
        </ul>
        <form method="post" action="/advisor">
            <label for="prompt">Ask the advisor</label>
            <textarea id="prompt" name="prompt" rows="3" placeholder="How should I plan my career?">{prompt}</textarea>
            <button type="submit">Get advice</button>
        </form>
{advice}
        <form method="post" action="/logout" class="inline">
            <button type="submit">Log out</button>
        </form>"#,
        name = escape(&profile.name),
        email = escape(&profile.email),
        grade = escape(profile.grade().unwrap_or("—")),
        interests = escape(interests.as_deref().unwrap_or("—")),
        goals = escape(profile.goals().unwrap_or("—")),
        prompt = prompt,
        advice = advice,
    );
    layout("Dashboard", &body)
}

/// Bare page for failures that have no form to re-render
pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"        <h1>Compass</h1>
{}
        <p><a href="/dashboard">Back to your dashboard</a></p>"#,
        error_banner(Some(message)),
    );
    layout("Error", &body)
}
