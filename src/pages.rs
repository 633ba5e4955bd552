//! Server-side HTML rendering for the localized pages.
//!
//! The layout carries `lang`/`dir`, the theme attribute, hreflang
//! alternates, navigation and both switchers; each page contributes its
//! translated content.

use crate::i18n::{Locale, Translator};
use crate::preferences::Theme;
use crate::routing::RouteKey;
use crate::site::Site;
use chrono::{Datelike, Utc};
use std::fmt::Write as _;

/// Which page to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Route(RouteKey),
    NotFound,
}

impl Page {
    fn route(&self) -> Option<RouteKey> {
        match self {
            Page::Route(route) => Some(*route),
            Page::NotFound => None,
        }
    }
}

/// Request-specific inputs for rendering.
pub struct RenderContext<'a> {
    pub site: &'a Site,
    pub locale: Locale,
    pub theme: Theme,

    /// Path of the current request, passed to the switchers so they can
    /// return to the equivalent page
    pub current_path: &'a str,
}

/// Render a full HTML document.
pub fn render(ctx: &RenderContext<'_>, page: Page) -> String {
    let t = ctx.site.catalog.translator(ctx.locale);

    let (title, description) = match page {
        Page::Route(RouteKey::Home) => (t.t("HomePage.meta.title"), t.t("HomePage.meta.description")),
        Page::Route(RouteKey::About) => (t.t("AboutPage.meta.title"), t.t("AboutPage.meta.description")),
        Page::NotFound => (t.t("NotFoundPage.title"), t.t("NotFoundPage.description")),
    };

    let mut html = String::with_capacity(4096);
    let theme_attr = ctx
        .theme
        .data_attribute()
        .map(|theme| format!(" data-theme=\"{}\"", theme))
        .unwrap_or_default();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"{}\" dir=\"{}\"{}>\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n\
         <meta name=\"description\" content=\"{}\">\n",
        ctx.locale.tag(),
        ctx.locale.direction().as_str(),
        theme_attr,
        escape_html(&title),
        escape_html(&description),
    );

    if let Some(route) = page.route() {
        for locale in ctx.site.table.locales_for(route) {
            let _ = writeln!(
                html,
                "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}{}\">",
                locale.tag(),
                escape_html(&ctx.site.site_url),
                escape_html(&ctx.site.table.href(route, locale)),
            );
        }
    }

    html.push_str("</head>\n<body>\n");
    render_header(&mut html, ctx, &t);

    html.push_str("<main>\n");
    match page {
        Page::Route(RouteKey::Home) => render_home(&mut html, ctx, &t),
        Page::Route(RouteKey::About) => render_about(&mut html, &t),
        Page::NotFound => render_not_found(&mut html, ctx, &t),
    }
    html.push_str("</main>\n");
    render_footer(&mut html, &t, Utc::now().year());
    html.push_str("</body>\n</html>\n");

    html
}

fn render_header(html: &mut String, ctx: &RenderContext<'_>, t: &Translator<'_>) {
    let table = &ctx.site.table;
    let from = urlencoding::encode(ctx.current_path);

    let _ = write!(
        html,
        "<header>\n<a class=\"logo\" href=\"{}\">Logo</a>\n<nav>\n\
         <a href=\"{}\">{}</a>\n<a href=\"{}\">{}</a>\n</nav>\n",
        escape_html(&table.href(RouteKey::Home, ctx.locale)),
        escape_html(&table.href(RouteKey::Home, ctx.locale)),
        escape_html(&t.t("Header.navigation.home")),
        escape_html(&table.href(RouteKey::About, ctx.locale)),
        escape_html(&t.t("Header.navigation.about")),
    );

    let _ = writeln!(
        html,
        "<ul class=\"locale-switcher\" aria-label=\"{}\">",
        escape_html(&t.t("Header.navigation.language"))
    );
    for locale in Locale::all() {
        let current = if locale == ctx.locale {
            " aria-current=\"true\""
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<li><a href=\"/switch-locale?locale={}&amp;from={}\" hreflang=\"{}\" lang=\"{}\" title=\"{}\"{}>{} {}</a></li>",
            locale.tag(),
            from,
            locale.tag(),
            locale.tag(),
            escape_html(locale.config().name),
            current,
            locale.flag(),
            escape_html(locale.native_name()),
        );
    }
    html.push_str("</ul>\n");

    let _ = writeln!(
        html,
        "<ul class=\"theme-switcher\" aria-label=\"{}\">",
        escape_html(&t.t("Header.navigation.theme"))
    );
    for theme in Theme::ALL {
        let current = if theme == ctx.theme {
            " aria-current=\"true\""
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<li><a href=\"/switch-theme?theme={}&amp;from={}\"{}>{}</a></li>",
            theme.key(),
            from,
            current,
            escape_html(&t.t(&format!("ThemeSelector.{}", theme.key()))),
        );
    }
    html.push_str("</ul>\n</header>\n");
}

fn render_home(html: &mut String, ctx: &RenderContext<'_>, t: &Translator<'_>) {
    let _ = write!(
        html,
        "<h1>{}</h1>\n<section class=\"theme-demo\">\n<h2>{}</h2>\n",
        escape_html(&t.t("HomePage.title")),
        escape_html(&t.t("HomePage.themeDemo.title")),
    );

    for color in ["primary", "secondary", "accent"] {
        let _ = writeln!(
            html,
            "<div class=\"{}\"><h3>{}</h3><p>{}</p><button type=\"button\">{}</button></div>",
            color,
            escape_html(&t.t(&format!("HomePage.themeDemo.{}Color", color))),
            escape_html(&t.t(&format!("HomePage.themeDemo.{}Description", color))),
            escape_html(&t.t(&format!("HomePage.themeDemo.{}Button", color))),
        );
    }

    let _ = writeln!(
        html,
        "</section>\n<p><a href=\"{}\">{}</a></p>",
        escape_html(&ctx.site.table.href(RouteKey::About, ctx.locale)),
        escape_html(&t.t("HomePage.about")),
    );
}

fn render_about(html: &mut String, t: &Translator<'_>) {
    let _ = writeln!(
        html,
        "<h1>{}</h1>\n<p>{}</p>",
        escape_html(&t.t("AboutPage.title")),
        escape_html(&t.t("AboutPage.content")),
    );
}

fn render_not_found(html: &mut String, ctx: &RenderContext<'_>, t: &Translator<'_>) {
    let _ = writeln!(
        html,
        "<h1>{}</h1>\n<p>{}</p>\n<a href=\"{}\">{}</a>",
        escape_html(&t.t("NotFoundPage.title")),
        escape_html(&t.t("NotFoundPage.description")),
        escape_html(&ctx.site.table.href(RouteKey::Home, ctx.locale)),
        escape_html(&t.t("NotFoundPage.backToHome")),
    );
}

fn render_footer(html: &mut String, t: &Translator<'_>, year: i32) {
    let year = year.to_string();
    let _ = writeln!(
        html,
        "<footer><p>{}</p></footer>",
        escape_html(&t.t_with("Footer.copyright", &[("year", year.as_str())])),
    );
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
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
