//! Validation suites against an in-process site

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect},
    routing::get,
    Router,
};
use deploy_scripts::{ValidationPlan, Validator, Verdict};

const EDITOR: &str = r#"<html><title>Monaco Editor</title>
<div id="file-explorer"></div><div class="editor-main"></div>
<div id="ai-assistant"></div><button>FTP connect</button></html>"#;

/// Homepage and static assets shared by the fake sites
fn site_shell() -> Router {
    Router::new()
        .route(
            "/",
            get(|| async { Html(r#"<h1>EzEdit.co</h1><a href="/auth/login.php">Log in</a>"#) }),
        )
        .route("/css/:file", get(|| async { "body {}" }))
        .route("/js/:file", get(|| async { "void 0;" }))
}

fn healthy_site() -> Router {
    site_shell()
        .route(
            "/auth/login.php",
            get(|| async { Html("<h2>Welcome back</h2>") })
                .post(|| async { Redirect::to("/dashboard.php") }),
        )
        .route(
            "/dashboard.php",
            get(|| async { Html(r#"<h1>Dashboard</h1><a href="editor.php">Open</a>"#) }),
        )
        .route("/editor.php", get(|| async { Html(EDITOR) }))
}

fn logged_in(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("PHPSESSID="))
        .unwrap_or(false)
}

/// Logging in sets a session cookie; with it, the dashboard and editor
/// answer differently from the anonymous pages.
fn session_site() -> Router {
    site_shell()
        .route(
            "/auth/login.php",
            get(|| async { Html("<h2>Welcome back</h2>") }).post(|| async {
                (
                    [(header::SET_COOKIE, "PHPSESSID=abc123; Path=/")],
                    Redirect::to("/dashboard.php"),
                )
            }),
        )
        .route(
            "/dashboard.php",
            get(|headers: HeaderMap| async move {
                if logged_in(&headers) {
                    (StatusCode::INTERNAL_SERVER_ERROR, "session expired").into_response()
                } else {
                    Html(r#"<h1>Dashboard</h1><a href="editor.php">Open</a>"#).into_response()
                }
            }),
        )
        .route(
            "/editor.php",
            get(|headers: HeaderMap| async move {
                if logged_in(&headers) {
                    Redirect::to("/auth/login.php").into_response()
                } else {
                    Html(EDITOR).into_response()
                }
            }),
        )
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/", addr)
}

#[tokio::test]
async fn test_healthy_site_passes() {
    let base = serve(healthy_site()).await;
    let validator = Validator::new(&base, ValidationPlan::default()).unwrap();

    let report = validator.run_all().await;

    for suite in &report.suites {
        assert!(suite.passed, "{} failed: {:?}", suite.name, suite.lines);
    }
    assert_eq!(report.verdict(), Verdict::AllPassed);
    assert!(report.render().contains("🎯 Overall Score: 6/6 (100.0%)"));
}

#[tokio::test]
async fn test_login_cookie_stays_inside_login_suite() {
    let base = serve(session_site()).await;
    let validator = Validator::new(&base, ValidationPlan::default()).unwrap();

    let report = validator.run_all().await;

    for suite in &report.suites {
        assert!(suite.passed, "{} failed: {:?}", suite.name, suite.lines);
    }
    let navigation = &report.suites[4];
    assert!(navigation.lines.contains(&"✅ Dashboard accessible".to_string()));
    let performance = &report.suites[5];
    assert!(performance.lines.iter().any(|l| l.starts_with("✅ Dashboard:")));
    assert!(performance.lines.iter().any(|l| l.starts_with("✅ Editor:")));
}

#[tokio::test]
async fn test_missing_content_and_assets() {
    let app = Router::new()
        .route("/", get(|| async { Html("<h1>Under construction</h1>") }))
        .route("/auth/login.php", get(|| async { Html("<h2>Welcome back</h2>") }))
        .route("/dashboard.php", get(|| async { Html("<h1>Dashboard</h1>") }))
        .route(
            "/editor.php",
            get(|| async { Html("<div>monaco</div><div>ftp</div>") }),
        );
    let base = serve(app).await;
    let validator = Validator::new(&base, ValidationPlan::default()).unwrap();

    let pages = validator.php_pages().await;
    assert!(!pages.passed);
    assert!(pages
        .lines
        .contains(&"   Expected content 'EzEdit.co' not found".to_string()));
    assert!(pages.lines.contains(&"📊 PHP Pages: 2/4 passed".to_string()));

    let assets = validator.assets().await;
    assert!(!assets.passed);
    assert!(assets.lines[0].starts_with("❌ CSS Main Stylesheet: Failed (HTTP 404)"));

    // 2 of 5 keywords
    let editor = validator.editor_components().await;
    assert!(!editor.passed);
    assert_eq!(editor.lines.last().unwrap(), "📊 Editor Components: 2/5 found");

    // Navigation only requires the homepage
    let navigation = validator.navigation().await;
    assert!(navigation.passed);
    assert!(navigation
        .lines
        .contains(&"⚠️ Login link not found on homepage".to_string()));

    // POST to a GET-only route
    let login = validator.login().await;
    assert!(!login.passed);
    assert_eq!(login.lines, vec!["❌ Login functionality: Failed (HTTP 405)"]);
}

#[tokio::test]
async fn test_unreachable_homepage_fails_navigation() {
    let app = Router::new().route(
        "/",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down").into_response() }),
    );
    let base = serve(app).await;
    let validator = Validator::new(&base, ValidationPlan::default()).unwrap();

    let navigation = validator.navigation().await;
    assert!(!navigation.passed);
    assert_eq!(navigation.lines, vec!["❌ Homepage not accessible"]);

    let performance = validator.performance().await;
    assert!(!performance.passed);
    assert_eq!(performance.lines[0], "❌ Homepage: HTTP 503");

    let report = validator.run_all().await;
    assert_eq!(report.verdict(), Verdict::Failed);
    assert!(!report.success());
}
