//! Server-rendered pages. Views only format data the store already returned.

use crate::database::models::PostWithCategory;

/// Characters of content shown on a list card before truncation
const SNIPPET_CHARS: usize = 160;

/// Escape text for HTML element and attribute content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn snippet(content: &str) -> String {
    if content.chars().count() <= SNIPPET_CHARS {
        return content.to_string();
    }
    let cut: String = content.chars().take(SNIPPET_CHARS).collect();
    format!("{}…", cut.trim_end())
}

fn chip(label: &str) -> String {
    format!(r#"<span class="chip">{}</span>"#, escape(label))
}

fn status_chip(published: bool) -> String {
    chip(if published { "Published" } else { "Draft" })
}

fn navbar() -> &'static str {
    r#"<header class="navbar">
  <a href="/" class="brand">Blog Demo</a>
  <nav>
    <a href="/">Home</a>
    <a href="/api/posts" title="Raw posts API">API</a>
  </nav>
</header>"#
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <style>{style}</style>
</head>
<body>
{navbar}
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        style = STYLE,
        navbar = navbar(),
        body = body,
    )
}

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0}\
.navbar{display:flex;justify-content:space-between;align-items:center;padding:0 1.5rem;height:3.5rem;border-bottom:1px solid #0001}\
.navbar nav a{margin-left:1rem}\
main{max-width:64rem;margin:0 auto;padding:2rem 1.5rem}\
.posts{display:grid;grid-template-columns:repeat(auto-fill,minmax(18rem,1fr));gap:1rem;list-style:none;padding:0}\
.card{display:block;border:1px solid #0002;border-radius:.5rem;padding:1rem;color:inherit;text-decoration:none}\
.chip{font-size:.75rem;padding:.1rem .5rem;border:1px solid #0002;border-radius:999px;margin-right:.25rem}\
.meta{font-size:.8rem;opacity:.6}\
.error{color:#c00}";

/// List view of every post
pub fn post_list(posts: &[PostWithCategory]) -> String {
    let body = if posts.is_empty() {
        r#"<h1>Posts</h1>
<p class="meta">No posts yet.</p>"#
            .to_string()
    } else {
        let cards: String = posts.iter().map(post_card).collect();
        format!("<h1>Posts</h1>\n<ul class=\"posts\">\n{}</ul>", cards)
    };
    layout("Posts", &body)
}

fn post_card(item: &PostWithCategory) -> String {
    let post = &item.post;
    let content = post
        .content
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(snippet)
        .unwrap_or_else(|| "No content".to_string());
    let category = item.category.as_ref().map(|c| chip(&c.name)).unwrap_or_default();

    format!(
        r#"<li><a class="card" href="/posts/{id}">
  <h2>{title}</h2>{status}
  <p>{content}</p>
  <div>{category}<span class="meta">{date}</span></div>
</a></li>
"#,
        id = post.id,
        title = escape(&post.title),
        status = status_chip(post.published),
        content = escape(&content),
        category = category,
        date = post.created_at.format("%Y-%m-%d"),
    )
}

/// Error state shown when the store could not be read
pub fn load_error(title: &str, what: &str, message: &str) -> String {
    layout(
        title,
        &format!(
            "<h1>{}</h1>\n<p class=\"error\">Failed to load {}: {}</p>",
            escape(title),
            escape(what),
            escape(message)
        ),
    )
}

/// Detail view of a single post
pub fn post_detail(item: &PostWithCategory) -> String {
    let post = &item.post;
    let category = item.category.as_ref().map(|c| chip(&c.name)).unwrap_or_default();
    let content = post.content.as_deref().unwrap_or("No content");

    let body = format!(
        r#"<h1>{title}</h1>
<div>{status}{category}</div>
<p class="meta">{created}</p>
<article>{content}</article>
<p><a href="/">&larr; Back to Home</a></p>"#,
        title = escape(&post.title),
        status = status_chip(post.published),
        category = category,
        created = post.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        content = escape(content),
    );
    layout(&format!("{} • Post", post.title), &body)
}

pub fn not_found() -> String {
    layout(
        "Not found",
        r#"<h1>404</h1>
<p>This page could not be found.</p>
<p><a href="/">&larr; Back to Home</a></p>"#,
    )
}
