//! HTML page handlers. Every page receives the same context the original
//! templates did: the session user (if any) and a logged-in flag driving
//! the navigation bar.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{instrument, warn};

use crate::catalog::TitleSummary;
use crate::session::{MaybeUser, SessionUser};
use crate::state::AppState;

fn html_escape(raw: &str) -> String {
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

fn nav(user: Option<&SessionUser>) -> String {
    match user {
        Some(u) => format!(
            r#"<nav><a href="/">OtakuList</a> <a href="/animes">Animes</a> <a href="/minha-lista">Minha Lista</a> <a href="/perfil">{}</a> <a href="/logout">Sair</a></nav>"#,
            html_escape(&u.name)
        ),
        None => String::from(
            r#"<nav><a href="/">OtakuList</a> <a href="/animes">Animes</a> <a href="/login">Login</a> <a href="/cadastro">Cadastro</a></nav>"#,
        ),
    }
}

fn layout(title: &str, user: Option<&SessionUser>, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head><meta charset="utf-8"><title>{} - OtakuList</title></head>
<body>
{}
{}
</body>
</html>"#,
        html_escape(title),
        nav(user),
        body
    ))
}

fn titles_section(heading: &str, titles: &[TitleSummary]) -> String {
    let mut section = format!("<section><h2>{}</h2><ul>", html_escape(heading));
    for t in titles {
        section.push_str(&format!(
            r#"<li data-id="{}">{} ({}) - {}</li>"#,
            t.id,
            html_escape(&t.title),
            t.year,
            html_escape(&t.genre)
        ));
    }
    section.push_str("</ul></section>");
    section
}

/// A catalog outage degrades the page to empty listings instead of a 500.
fn fetch_or_empty(result: anyhow::Result<Vec<TitleSummary>>, which: &str) -> Vec<TitleSummary> {
    match result {
        Ok(titles) => titles,
        Err(e) => {
            warn!(error = %e, which, "catalog fetch failed");
            Vec::new()
        }
    }
}

/// GET /
#[instrument(skip(state, user))]
pub async fn homepage(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> Html<String> {
    let popular = fetch_or_empty(state.catalog.popular().await, "popular");
    let trending = fetch_or_empty(state.catalog.trending().await, "trending");
    let seasonal = fetch_or_empty(state.catalog.seasonal().await, "seasonal");

    let body = format!(
        "{}{}{}",
        titles_section("Populares", &popular),
        titles_section("Em alta", &trending),
        titles_section("Temporada", &seasonal)
    );
    layout("Home", user.as_ref(), &body)
}

/// GET /animes
#[instrument(skip(state, user))]
pub async fn all_animes(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> Html<String> {
    let titles = fetch_or_empty(state.catalog.all_titles().await, "all");
    layout("Animes", user.as_ref(), &titles_section("Todos os animes", &titles))
}

/// GET /cadastro
pub async fn cadastro_page(MaybeUser(user): MaybeUser) -> Html<String> {
    layout(
        "Cadastro",
        user.as_ref(),
        r#"<h1>Cadastro</h1>
<form method="post" action="/cadastro">
  <input name="nome" placeholder="Nome" required>
  <input name="email" type="email" placeholder="E-mail" required>
  <input name="senha" type="password" placeholder="Senha" required>
  <button type="submit">Cadastrar</button>
</form>"#,
    )
}

/// GET /login
pub async fn login_page(MaybeUser(user): MaybeUser) -> Html<String> {
    layout(
        "Login",
        user.as_ref(),
        r#"<h1>Login</h1>
<form method="post" action="/login">
  <input name="email" type="email" placeholder="E-mail" required>
  <input name="senha" type="password" placeholder="Senha" required>
  <button type="submit">Entrar</button>
</form>"#,
    )
}

/// GET /perfil (restricted)
pub async fn profile_page(MaybeUser(user): MaybeUser) -> Response {
    let Some(user) = user else {
        return Redirect::to("/login").into_response();
    };
    let body = format!(
        r#"<h1>Perfil</h1>
<p>Nome: <span id="nome">{}</span></p>
<p>E-mail: {}</p>"#,
        html_escape(&user.name),
        html_escape(&user.email)
    );
    layout("Perfil", Some(&user), &body).into_response()
}

/// GET /minha-lista (restricted). The list itself is loaded client-side
/// from /api/list/:status.
pub async fn my_list_page(MaybeUser(user): MaybeUser) -> Response {
    let Some(user) = user else {
        return Redirect::to("/login").into_response();
    };
    layout(
        "Minha Lista",
        Some(&user),
        r#"<h1>Minha Lista</h1><div id="lista" data-endpoint="/api/list"></div>"#,
    )
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_user_content() {
        assert_eq!(
            html_escape(r#"<b>"Ana" & 'Bia'</b>"#),
            "&lt;b&gt;&quot;Ana&quot; &amp; &#39;Bia&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn nav_reflects_session_state() {
        let anonymous = nav(None);
        assert!(anonymous.contains("/login"));
        assert!(anonymous.contains("/cadastro"));

        let logged = nav(Some(&SessionUser {
            user_id: 1,
            email: "ana@x.com".into(),
            name: "Ana <script>".into(),
        }));
        assert!(logged.contains("/logout"));
        assert!(logged.contains("Ana &lt;script&gt;"));
        assert!(!logged.contains("/cadastro"));
    }

    #[test]
    fn titles_section_lists_every_title() {
        let titles = vec![TitleSummary {
            id: 42,
            title: "Cowboy Bebop".into(),
            genre: "Sci-Fi".into(),
            year: 1998,
            synopsis: String::new(),
        }];
        let section = titles_section("Populares", &titles);
        assert!(section.contains("Cowboy Bebop"));
        assert!(section.contains("data-id=\"42\""));
    }
}
