//! Post-deployment smoke checks against a live site
//!
//! Six suites run in a fixed order. Each produces a [`SuiteOutcome`] with the
//! lines it would print; [`Report`] totals them into a verdict.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const PAGE_TIMEOUT: Duration = Duration::from_secs(10);
pub const EDITOR_TIMEOUT: Duration = Duration::from_secs(15);
pub const SLOW_PAGE: Duration = Duration::from_secs(3);

#[derive(Error, Debug)]
pub enum ValidateError {
    #[error("Invalid base URL '{0}': {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("HTTP client error - {0}")]
    Client(#[from] reqwest::Error),
}

/// A page that must answer 200 and contain `expected` (case-insensitive)
#[derive(Debug, Clone)]
pub struct PageCheck {
    pub path: String,
    pub expected: Option<String>,
    pub description: String,
}

impl PageCheck {
    pub fn new(path: &str, expected: Option<&str>, description: &str) -> Self {
        Self {
            path: path.to_string(),
            expected: expected.map(str::to_string),
            description: description.to_string(),
        }
    }
}

/// What to check. `Default` describes the editor application layout.
#[derive(Debug, Clone)]
pub struct ValidationPlan {
    pub pages: Vec<PageCheck>,
    pub assets: Vec<PageCheck>,
    pub login_path: String,
    pub login_form: Vec<(String, String)>,
    pub editor_path: String,
    /// (component name, keyword searched in the editor page)
    pub editor_components: Vec<(String, String)>,
    pub dashboard_path: String,
    /// (page name, path)
    pub timed_pages: Vec<(String, String)>,
}

impl Default for ValidationPlan {
    fn default() -> Self {
        let pairs = |items: &[(&str, &str)]| -> Vec<(String, String)> {
            items
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect()
        };

        Self {
            pages: vec![
                PageCheck::new("/", Some("EzEdit.co"), "Homepage"),
                PageCheck::new("/auth/login.php", Some("Welcome back"), "Login Page"),
                PageCheck::new("/dashboard.php", Some("Dashboard"), "Dashboard Page"),
                PageCheck::new("/editor.php", Some("Monaco Editor"), "Editor Interface"),
            ],
            assets: [
                ("/css/main.css", "CSS Main Stylesheet"),
                ("/css/dashboard.css", "CSS Dashboard Styles"),
                ("/css/editor.css", "CSS Editor Styles"),
                ("/css/auth.css", "CSS Authentication Styles"),
                ("/js/main.js", "JavaScript Main Script"),
                ("/js/dashboard.js", "JavaScript Dashboard Script"),
                ("/js/editor.js", "JavaScript Editor Script"),
                ("/js/auth.js", "JavaScript Auth Script"),
            ]
            .iter()
            .map(|(path, desc)| PageCheck::new(path, None, desc))
            .collect(),
            login_path: "/auth/login.php".to_string(),
            login_form: pairs(&[("email", "test@example.com"), ("password", "password123")]),
            editor_path: "/editor.php".to_string(),
            editor_components: pairs(&[
                ("Monaco Editor", "monaco"),
                ("File Explorer", "file-explorer"),
                ("AI Assistant", "ai-assistant"),
                ("FTP Connection", "ftp"),
                ("Three-pane Layout", "editor-main"),
            ]),
            dashboard_path: "/dashboard.php".to_string(),
            timed_pages: pairs(&[
                ("Homepage", "/"),
                ("Login", "/auth/login.php"),
                ("Dashboard", "/dashboard.php"),
                ("Editor", "/editor.php"),
            ]),
        }
    }
}

/// Result of one suite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteOutcome {
    pub name: &'static str,
    pub passed: bool,
    pub lines: Vec<String>,
}

/// `passed / total >= numerator / denominator`, without floats
fn meets_ratio(passed: usize, total: usize, numerator: usize, denominator: usize) -> bool {
    passed * denominator >= total * numerator
}

pub struct Validator {
    client: Client,
    base: Url,
    plan: ValidationPlan,
}

impl Validator {
    pub fn new(base_url: &str, plan: ValidationPlan) -> Result<Self, ValidateError> {
        let base = Url::parse(base_url)
            .map_err(|e| ValidateError::InvalidUrl(base_url.to_string(), e))?;
        let client = Client::builder().timeout(PAGE_TIMEOUT).build()?;

        Ok(Self { client, base, plan })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Client with its own cookie jar, for suites that walk a session
    fn session_client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .cookie_store(true)
            .timeout(PAGE_TIMEOUT)
            .build()
    }

    fn url(&self, path: &str) -> Url {
        self.base.join(path).unwrap_or_else(|_| self.base.clone())
    }

    /// Run every suite in order
    pub async fn run_all(&self) -> Report {
        let suites = vec![
            self.php_pages().await,
            self.assets().await,
            self.login().await,
            self.editor_components().await,
            self.navigation().await,
            self.performance().await,
        ];
        Report {
            base_url: self.base.to_string(),
            suites,
        }
    }

    async fn check_page(&self, check: &PageCheck, lines: &mut Vec<String>) -> bool {
        let url = self.url(&check.path);
        debug!("GET {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                lines.push(format!("❌ {}: Error - {}", check.description, e));
                return false;
            }
        };

        let status = response.status();
        let content_ok = match &check.expected {
            Some(expected) => match response.text().await {
                Ok(body) => body.to_lowercase().contains(&expected.to_lowercase()),
                Err(_) => false,
            },
            None => true,
        };

        if status == StatusCode::OK && content_ok {
            lines.push(format!(
                "✅ {}: OK (HTTP {})",
                check.description,
                status.as_u16()
            ));
            true
        } else {
            lines.push(format!(
                "❌ {}: Failed (HTTP {})",
                check.description,
                status.as_u16()
            ));
            if let (Some(expected), false) = (&check.expected, content_ok) {
                lines.push(format!("   Expected content '{}' not found", expected));
            }
            false
        }
    }

    async fn check_all(&self, name: &'static str, label: &str, checks: &[PageCheck]) -> SuiteOutcome {
        let mut lines = Vec::new();
        let mut passed = 0;
        for check in checks {
            if self.check_page(check, &mut lines).await {
                passed += 1;
            }
        }
        lines.push(format!("📊 {}: {}/{} passed", label, passed, checks.len()));

        SuiteOutcome {
            name,
            passed: passed == checks.len(),
            lines,
        }
    }

    pub async fn php_pages(&self) -> SuiteOutcome {
        self.check_all("PHP Pages", "PHP Pages", &self.plan.pages).await
    }

    pub async fn assets(&self) -> SuiteOutcome {
        self.check_all("Assets (CSS/JS)", "Assets", &self.plan.assets)
            .await
    }

    /// GET the login page, then POST the form through one fresh cookie jar
    pub async fn login(&self) -> SuiteOutcome {
        let name = "Login Functionality";
        let url = self.url(&self.plan.login_path);

        let outcome = async {
            let client = self.session_client()?;
            let page = client.get(url.clone()).send().await?;
            if page.status() != StatusCode::OK {
                return Ok::<_, reqwest::Error>(Err("❌ Login page not accessible".to_string()));
            }

            let response = client
                .post(url)
                .form(&self.plan.login_form)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::OK
                || response.url().as_str().to_lowercase().contains("dashboard")
            {
                Ok(Ok("✅ Login functionality: OK".to_string()))
            } else {
                Ok(Err(format!(
                    "❌ Login functionality: Failed (HTTP {})",
                    status.as_u16()
                )))
            }
        }
        .await;

        let (passed, line) = match outcome {
            Ok(Ok(line)) => (true, line),
            Ok(Err(line)) => (false, line),
            Err(e) => (false, format!("❌ Login functionality: Error - {}", e)),
        };

        SuiteOutcome {
            name,
            passed,
            lines: vec![line],
        }
    }

    pub async fn editor_components(&self) -> SuiteOutcome {
        let name = "Editor Components";
        let mut lines = Vec::new();

        let response = self
            .client
            .get(self.url(&self.plan.editor_path))
            .timeout(EDITOR_TIMEOUT)
            .send()
            .await;

        let body = match response {
            Ok(r) if r.status() == StatusCode::OK => r.text().await,
            Ok(_) => {
                lines.push("❌ Editor page not accessible".to_string());
                return SuiteOutcome { name, passed: false, lines };
            }
            Err(e) => Err(e),
        };

        let content = match body {
            Ok(text) => text.to_lowercase(),
            Err(e) => {
                lines.push(format!("❌ Editor components: Error - {}", e));
                return SuiteOutcome { name, passed: false, lines };
            }
        };

        let components = &self.plan.editor_components;
        let mut found = 0;
        for (component, keyword) in components {
            if content.contains(&keyword.to_lowercase()) {
                lines.push(format!("✅ {}: Found", component));
                found += 1;
            } else {
                lines.push(format!("❌ {}: Not found", component));
            }
        }
        lines.push(format!(
            "📊 Editor Components: {}/{} found",
            found,
            components.len()
        ));

        SuiteOutcome {
            name,
            passed: meets_ratio(found, components.len(), 4, 5),
            lines,
        }
    }

    /// Only the homepage is required; link checks are informational
    pub async fn navigation(&self) -> SuiteOutcome {
        let name = "Navigation Flow";
        let mut lines = Vec::new();

        let client = match self.session_client() {
            Ok(client) => client,
            Err(e) => {
                lines.push(format!("❌ Navigation test: Error - {}", e));
                return SuiteOutcome { name, passed: false, lines };
            }
        };

        let home = match client.get(self.base.clone()).send().await {
            Ok(r) if r.status() == StatusCode::OK => r.text().await.unwrap_or_default(),
            Ok(_) => {
                lines.push("❌ Homepage not accessible".to_string());
                return SuiteOutcome { name, passed: false, lines };
            }
            Err(e) => {
                lines.push(format!("❌ Navigation test: Error - {}", e));
                return SuiteOutcome { name, passed: false, lines };
            }
        };
        lines.push("✅ Homepage accessible".to_string());

        if home.contains(&self.plan.login_path) {
            lines.push("✅ Login link found on homepage".to_string());
        } else {
            lines.push("⚠️ Login link not found on homepage".to_string());
        }

        let dashboard = match client
            .get(self.url(&self.plan.dashboard_path))
            .send()
            .await
        {
            Ok(r) if r.status() == StatusCode::OK => {
                lines.push("✅ Dashboard accessible".to_string());
                r.text().await.unwrap_or_default()
            }
            _ => {
                lines.push("❌ Dashboard not accessible".to_string());
                String::new()
            }
        };

        let editor_link = self.plan.editor_path.trim_start_matches('/');
        if dashboard.contains(editor_link) {
            lines.push("✅ Editor link found on dashboard".to_string());
        } else {
            lines.push("⚠️ Editor link not found on dashboard".to_string());
        }

        SuiteOutcome {
            name,
            passed: true,
            lines,
        }
    }

    pub async fn performance(&self) -> SuiteOutcome {
        let name = "Performance";
        let mut lines = Vec::new();
        let mut total = Duration::ZERO;
        let mut passed = 0;
        let pages = &self.plan.timed_pages;

        for (page, path) in pages {
            let start = Instant::now();
            let response = self.client.get(self.url(path)).send().await;
            let elapsed = start.elapsed();

            match response {
                Ok(r) => {
                    total += elapsed;
                    let secs = elapsed.as_secs_f64();
                    if r.status() != StatusCode::OK {
                        lines.push(format!("❌ {}: HTTP {}", page, r.status().as_u16()));
                    } else if elapsed < SLOW_PAGE {
                        lines.push(format!("✅ {}: {:.2}s", page, secs));
                        passed += 1;
                    } else {
                        lines.push(format!("⚠️ {}: {:.2}s (slow)", page, secs));
                    }
                }
                Err(e) => lines.push(format!("❌ {}: Error - {}", page, e)),
            }
        }

        let average = if pages.is_empty() {
            0.0
        } else {
            total.as_secs_f64() / pages.len() as f64
        };
        lines.push(format!("📊 Average load time: {:.2}s", average));

        SuiteOutcome {
            name,
            passed: meets_ratio(passed, pages.len(), 3, 4),
            lines,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    AllPassed,
    Mostly,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub base_url: String,
    pub suites: Vec<SuiteOutcome>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.suites.iter().filter(|s| s.passed).count()
    }

    pub fn verdict(&self) -> Verdict {
        let total = self.suites.len();
        let passed = self.passed();
        if passed == total {
            Verdict::AllPassed
        } else if meets_ratio(passed, total, 4, 5) {
            Verdict::Mostly
        } else {
            Verdict::Failed
        }
    }

    pub fn success(&self) -> bool {
        self.verdict() == Verdict::AllPassed
    }

    /// Suite details followed by the summary block
    pub fn render(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();

        for suite in &self.suites {
            let _ = writeln!(out, "\n{}", suite_heading(suite.name));
            for line in &suite.lines {
                let _ = writeln!(out, "{}", line);
            }
        }

        let total = self.suites.len();
        let passed = self.passed();
        let percent = if total == 0 {
            0.0
        } else {
            passed as f64 / total as f64 * 100.0
        };

        let _ = writeln!(out, "\n{}", rule);
        let _ = writeln!(out, "📋 DEPLOYMENT VALIDATION REPORT");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "🎯 Overall Score: {}/{} ({:.1}%)\n", passed, total, percent);

        for suite in &self.suites {
            let status = if suite.passed { "✅ PASS" } else { "❌ FAIL" };
            let _ = writeln!(out, "{} {}", status, suite.name);
        }
        let _ = writeln!(out, "\n{}", rule);

        let summary: [&str; 3] = match self.verdict() {
            Verdict::AllPassed => [
                "🎉 DEPLOYMENT SUCCESSFUL!",
                "✅ All systems operational",
                "🌐 Site is ready for users",
            ],
            Verdict::Mostly => [
                "⚠️ DEPLOYMENT MOSTLY SUCCESSFUL",
                "🔧 Minor issues detected, but core functionality works",
                "📝 Review failed tests and address issues",
            ],
            Verdict::Failed => [
                "❌ DEPLOYMENT ISSUES DETECTED",
                "🚨 Major problems found, deployment needs attention",
                "🔄 Re-run deployment process",
            ],
        };
        for line in summary {
            let _ = writeln!(out, "{}", line);
        }

        let _ = writeln!(out, "\n🌐 Test URL: {}", self.base_url);
        let _ = writeln!(out, "📊 Run this script again after making fixes");
        out
    }
}

fn suite_heading(name: &str) -> &'static str {
    match name {
        "PHP Pages" => "📄 Testing PHP Pages...",
        "Assets (CSS/JS)" => "🎨 Testing Assets...",
        "Login Functionality" => "🔐 Testing Login Functionality...",
        "Editor Components" => "⚙️ Testing Editor Components...",
        "Navigation Flow" => "🧭 Testing Navigation...",
        "Performance" => "⚡ Testing Performance...",
        _ => "🧪 Testing...",
    }
}
