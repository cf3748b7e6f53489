//! HTML pages
//!
//! Templates are compiled into the binary and rendered with tera, which
//! escapes every interpolated value of a `.html` template.

use axum::response::Html;
use tera::{Context, Tera};

use crate::utils::{AppError, AppResult};

pub const INDEX: &str = "index.html";
pub const LOGIN: &str = "login.html";

/// Compile the embedded templates
pub fn load() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (INDEX, include_str!("../../templates/index.html")),
        (LOGIN, include_str!("../../templates/login.html")),
    ])?;
    Ok(tera)
}

pub fn render(tera: &Tera, name: &str, ctx: &Context) -> AppResult<Html<String>> {
    tera.render(name, ctx)
        .map(Html)
        .map_err(|e| AppError::internal(format!("Failed to render {name}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_page_escapes_values() {
        let tera = load().unwrap();
        let mut ctx = Context::new();
        ctx.insert("next", "/api/");
        ctx.insert("username", "<b>mario</b>");
        ctx.insert("error", "Bad & wrong");
        let Html(page) = render(&tera, LOGIN, &ctx).unwrap();
        assert!(page.contains("value=\"&lt;b&gt;mario&lt;&#x2F;b&gt;\""));
        assert!(page.contains("Bad &amp; wrong"));
    }

    #[test]
    fn test_index_links_follow_prefix() {
        let tera = load().unwrap();
        let mut ctx = Context::new();
        ctx.insert("prefix", "/restaurant");
        let Html(page) = render(&tera, INDEX, &ctx).unwrap();
        assert!(page.contains("href=\"/restaurant/api/menu/\""));
    }
}
