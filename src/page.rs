//! Assembly of the start page.

use askama::Template;

use crate::templates;

/// Landing page for anonymous visitors, with the only link pointing at `login_url`.
pub fn sign_in(login_url: String) -> askama::Result<String> {
    templates::SignIn { login_url }.render()
}

/// Start page of a signed-in visitor: header, welcome content and footer, in this order.
pub fn welcome(nickname: &str, logout_url: String) -> askama::Result<String> {
    let mut html = String::new();

    templates::PageBegin.render_into(&mut html)?;
    templates::Welcome {
        nickname,
        logout_url,
    }
    .render_into(&mut html)?;
    templates::PageEnd.render_into(&mut html)?;

    Ok(html)
}
