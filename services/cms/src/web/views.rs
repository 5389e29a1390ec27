//! services/cms/src/web/views.rs
//!
//! HTML pages. Each page is a body fragment wrapped by `layout`, which also
//! shows the pending flash message.

const STYLE: &str = r#"<style>
body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; color: #222; }
.flash { background: #fff6d5; border: 1px solid #e8c84a; padding: .5rem 1rem; }
.documents li { margin: .25rem 0; }
.documents form { display: inline; }
textarea { width: 100%; font-family: monospace; }
.session { float: right; }
</style>"#;

/// Escapes text for use in element content and quoted attributes.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Percent-encodes a document name for use as one URL path segment.
pub fn url_segment(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn layout(title: &str, flash: Option<&str>, username: Option<&str>, body: &str) -> String {
    let mut html = String::with_capacity(body.len() + 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>");
    html.push_str(&html_escape(title));
    html.push_str("</title>\n");
    html.push_str(STYLE);
    html.push_str("\n</head>\n<body>\n");

    if let Some(username) = username {
        html.push_str(&format!(
            r#"<div class="session">Signed in as {}. <form method="post" action="/users/signout"><button type="submit">Sign Out</button></form></div>"#,
            html_escape(username)
        ));
        html.push('\n');
    }
    if let Some(message) = flash {
        html.push_str(&format!(r#"<p class="flash">{}</p>"#, html_escape(message)));
        html.push('\n');
    }

    html.push_str(body);
    html.push_str("\n</body>\n</html>\n");
    html
}

pub fn index_page(documents: &[String], username: &str, flash: Option<&str>) -> String {
    let mut body = String::from("<h1>Documents</h1>\n<ul class=\"documents\">\n");
    for name in documents {
        let href = url_segment(name);
        let label = html_escape(name);
        body.push_str(&format!(
            concat!(
                r#"<li><a href="/{href}">{label}</a> "#,
                r#"<a href="/{href}/edit">edit</a> "#,
                r#"<form method="post" action="/{href}/duplicate"><button type="submit">duplicate</button></form> "#,
                r#"<form method="post" action="/{href}/destroy"><button type="submit">delete</button></form></li>"#,
                "\n"
            ),
            href = href,
            label = label,
        ));
    }
    body.push_str("</ul>\n");
    body.push_str(r#"<p><a href="/new">New Document</a> | <a href="/img">Upload Image</a></p>"#);
    layout("Documents", flash, Some(username), &body)
}

pub fn signin_page(flash: Option<&str>, username: &str) -> String {
    let body = format!(
        concat!(
            "<h1>Sign In</h1>\n",
            r#"<form method="post" action="/users/signin">"#,
            r#"<p><label for="username">Username:</label> <input id="username" name="username" value="{username}"></p>"#,
            r#"<p><label for="password">Password:</label> <input id="password" name="password" type="password"></p>"#,
            r#"<p><button type="submit">Sign In</button></p></form>"#,
            "\n",
            r#"<p>No account yet? <a href="/users/signup">Sign up</a></p>"#
        ),
        username = html_escape(username),
    );
    layout("Sign In", flash, None, &body)
}

pub fn signup_page(flash: Option<&str>, username: &str) -> String {
    let body = format!(
        concat!(
            "<h1>Sign Up</h1>\n",
            r#"<form method="post" action="/users/signup">"#,
            r#"<p><label for="username">Username:</label> <input id="username" name="username" value="{username}"></p>"#,
            r#"<p><label for="password">Password:</label> <input id="password" name="password" type="password"></p>"#,
            r#"<p><label for="password_confirmation">Confirm password:</label> <input id="password_confirmation" name="password_confirmation" type="password"></p>"#,
            r#"<p><button type="submit">Sign Up</button></p></form>"#,
            "\n",
            r#"<p>Already registered? <a href="/users/signin">Sign in</a></p>"#
        ),
        username = html_escape(username),
    );
    layout("Sign Up", flash, None, &body)
}

pub fn new_document_page(flash: Option<&str>, typed_name: &str, username: &str) -> String {
    let body = format!(
        concat!(
            r#"<form method="post" action="/create">"#,
            r#"<p><label for="new_file">Add a new document:</label> <input id="new_file" name="new_file" value="{name}"></p>"#,
            r#"<p><button type="submit">Create</button></p></form>"#
        ),
        name = html_escape(typed_name),
    );
    layout("New Document", flash, Some(username), &body)
}

pub fn edit_page(name: &str, content: &str, flash: Option<&str>, username: &str) -> String {
    let body = format!(
        concat!(
            "<h1>Edit content of {label}:</h1>\n",
            r#"<form method="post" action="/{href}">"#,
            r#"<p><textarea name="file_contents" rows="20">{content}</textarea></p>"#,
            r#"<p><button type="submit">Save Changes</button></p></form>"#
        ),
        label = html_escape(name),
        href = url_segment(name),
        content = html_escape(content),
    );
    layout(name, flash, Some(username), &body)
}

pub fn markdown_page(name: &str, rendered: &str, flash: Option<&str>) -> String {
    layout(name, flash, None, rendered)
}

pub fn image_upload_page(flash: Option<&str>, username: &str) -> String {
    let body = concat!(
        "<h1>Upload an image</h1>\n",
        r#"<form method="post" action="/img" enctype="multipart/form-data">"#,
        r#"<p><input type="file" name="image" accept=".jpg,.png"></p>"#,
        r#"<p><button type="submit">Upload</button></p></form>"#
    );
    layout("Upload Image", flash, Some(username), body)
}
