//! HTTP surface: locale-prefixed pages, preference switchers, sitemap,
//! robots.txt and a health endpoint.

use crate::i18n::Locale;
use crate::pages::{self, Page, RenderContext};
use crate::preferences::{CookiePreferenceStore, PreferenceStore, Theme};
use crate::routing::{encode_path, negotiate, resolve_path, RouteKey};
use crate::site::Site;
use axum::{
    extract::{Query, State},
    http::{
        header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE, CONTENT_TYPE, SET_COOKIE, VARY},
        HeaderMap, HeaderValue, StatusCode, Uri,
    },
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub site: Arc<Site>,
}

pub fn create_router(site: Arc<Site>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/robots.txt", get(robots))
        .route("/sitemap.xml", get(sitemap_root))
        .route("/switch-locale", get(switch_locale))
        .route("/switch-theme", get(switch_theme))
        .fallback(localized_page)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { site })
}

/// Bind `port` on all interfaces and serve until the process stops.
pub async fn serve(site: Arc<Site>, port: u16) -> anyhow::Result<()> {
    let app = create_router(site);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

// ==================== Pages ====================

/// Every path not claimed by another route.
///
/// - `/` redirects to the negotiated locale's home
/// - `/{locale}/...` renders the page the path names, or a localized 404
/// - anything else is a literal path of the default locale: an alias of
///   some locale redirects to its prefixed URL, everything else is a 404
async fn localized_page(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let site = &state.site;
    let raw_path = uri.path();
    let query = uri.query();

    if let Some(name) = chunk_file_name(raw_path) {
        if let Some(xml) = site.sitemap_file(name) {
            return xml_response(xml);
        }
    }

    let prefs = CookiePreferenceStore::from_headers(&headers);
    let theme = prefs.theme();
    let resolved = resolve_path(raw_path);

    if !resolved.prefixed {
        let preferred = preferred_locale(&prefs, &headers);

        if resolved.path == "/" {
            debug!("Root request negotiated to {}", preferred);
            return vary(redirect(&site.table.href(RouteKey::Home, preferred), query));
        }

        if let Some((locale, route)) = site.table.find_any(&resolved.path, Some(preferred)) {
            debug!("Unprefixed {} matched {} in {}", resolved.path, route, locale);
            return vary(redirect(&site.table.href(route, locale), query));
        }

        return render_page(site, resolved.locale, theme, raw_path, Page::NotFound);
    }

    if !resolved.canonical {
        let target = match resolved.path.as_str() {
            "/" => format!("/{}", resolved.locale.tag()),
            path => format!("/{}{}", resolved.locale.tag(), path),
        };
        return redirect(&target, query);
    }

    match site.table.route_for(&resolved.path, resolved.locale) {
        Some(route) => render_page(site, resolved.locale, theme, raw_path, Page::Route(route)),
        None => render_page(site, resolved.locale, theme, raw_path, Page::NotFound),
    }
}

fn render_page(site: &Site, locale: Locale, theme: Theme, current_path: &str, page: Page) -> Response {
    let ctx = RenderContext {
        site,
        locale,
        theme,
        current_path,
    };
    let status = match page {
        Page::Route(_) => StatusCode::OK,
        Page::NotFound => StatusCode::NOT_FOUND,
    };

    let mut response = (status, Html(pages::render(&ctx, page))).into_response();
    response.headers_mut().insert(
        CONTENT_LANGUAGE,
        HeaderValue::from_static(locale.tag()),
    );
    response
}

fn preferred_locale(prefs: &CookiePreferenceStore, headers: &HeaderMap) -> Locale {
    let accept_language = headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());
    negotiate(prefs.locale().map(|l| l.tag()), accept_language)
}

// ==================== Preference Switchers ====================

#[derive(Debug, Deserialize)]
pub struct SwitchLocaleParams {
    pub locale: String,
    pub from: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SwitchThemeParams {
    pub theme: String,
    pub from: Option<String>,
}

/// Store the chosen locale and go to the same page under that locale.
async fn switch_locale(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SwitchLocaleParams>,
) -> Response {
    let Some(locale) = Locale::parse(&params.locale) else {
        warn!("Rejected locale switch to '{}'", params.locale);
        return (StatusCode::BAD_REQUEST, format!("Unsupported locale: {}", params.locale))
            .into_response();
    };

    let mut prefs = CookiePreferenceStore::from_headers(&headers);
    prefs.set_locale(locale);

    let target = equivalent_href(&state.site, params.from.as_deref(), Some(locale), &prefs, &headers);
    info!("Locale switched to {}", locale);
    with_cookies(Redirect::to(&encode_path(&target)).into_response(), &prefs)
}

/// Store the chosen theme and return to the page it was chosen on.
async fn switch_theme(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SwitchThemeParams>,
) -> Response {
    let theme: Theme = match params.theme.parse() {
        Ok(theme) => theme,
        Err(e) => {
            warn!("Rejected theme switch: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let mut prefs = CookiePreferenceStore::from_headers(&headers);
    prefs.set_theme(theme);

    let target = equivalent_href(&state.site, params.from.as_deref(), None, &prefs, &headers);
    with_cookies(Redirect::to(&encode_path(&target)).into_response(), &prefs)
}

/// Link to the page `from` names, under `locale` (or `from`'s own locale).
///
/// Only table routes are ever returned, so `from` cannot redirect off-site.
/// Paths naming no route fall back to the home page.
fn equivalent_href(
    site: &Site,
    from: Option<&str>,
    locale: Option<Locale>,
    prefs: &CookiePreferenceStore,
    headers: &HeaderMap,
) -> String {
    let from = from
        .map(|f| f.split(['?', '#']).next().unwrap_or(f))
        .unwrap_or("/");
    let resolved = resolve_path(from);

    let (from_locale, route) = if resolved.prefixed {
        (
            resolved.locale,
            site.table.route_for(&resolved.path, resolved.locale),
        )
    } else {
        let preferred = preferred_locale(prefs, headers);
        match site.table.find_any(&resolved.path, Some(preferred)) {
            Some((l, route)) => (l, Some(route)),
            None => (preferred, None),
        }
    };

    let locale = locale.unwrap_or(from_locale);
    site.table.href(route.unwrap_or(RouteKey::Home), locale)
}

fn with_cookies(mut response: Response, prefs: &CookiePreferenceStore) -> Response {
    for cookie in prefs.set_cookie_headers() {
        if let Ok(value) = HeaderValue::from_str(cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

// ==================== Generated Files ====================

async fn sitemap_root(State(state): State<AppState>) -> Response {
    match state.site.sitemap_file("sitemap.xml") {
        Some(xml) => xml_response(xml),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn robots(State(state): State<AppState>) -> Response {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.site.robots().to_string(),
    )
        .into_response()
}

fn xml_response(xml: &str) -> Response {
    (
        [(CONTENT_TYPE, "application/xml; charset=utf-8")],
        xml.to_string(),
    )
        .into_response()
}

/// `sitemap-{n}.xml` file name from a request path, if it is one.
fn chunk_file_name(path: &str) -> Option<&str> {
    let name = path.strip_prefix('/')?;
    let n = name.strip_prefix("sitemap-")?.strip_suffix(".xml")?;
    (!n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())).then_some(name)
}

// ==================== Health ====================

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let site = &state.site;
    Json(json!({
        "status": "ok",
        "locales": Locale::all().count(),
        "default_locale": Locale::default_locale().tag(),
        "routes": site.table.routes().count(),
        "messages": site.catalog.metrics().report(),
    }))
}

// ==================== Helpers ====================

/// 307 to a table href, percent-encoded for the `Location` header. The
/// request's query string is carried over unchanged.
fn redirect(href: &str, query: Option<&str>) -> Response {
    let target = match query {
        Some(query) if !query.is_empty() => format!("{}?{}", encode_path(href), query),
        _ => encode_path(href),
    };
    Redirect::temporary(&target).into_response()
}

/// Mark a negotiated response as depending on the preference inputs.
fn vary(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(VARY, HeaderValue::from_static("Cookie, Accept-Language"));
    response
}
