use log::{debug, info};
use reqwest::Client;
use url::Url;

use super::error::{Error, Result};
use crate::models::Credentials;

// Endpoints of the grade server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    // Receives the login form. Its response lists the enrolled courses.
    pub login_url: Url,
    // Page to GET for the course list instead of reading the login response.
    pub home_url: Option<Url>,
    // Course links are relative to this.
    pub base_url: Url,
}

impl Site {
    pub const DEFAULT_BASE: &'static str = "https://grades.cs.umd.edu/classWeb/";

    // Site rooted at `base_url`, logging in through `login.cgi`.
    pub fn new(base_url: Url) -> Result<Self> {
        let login_url = base_url.join("login.cgi")?;
        Ok(Self {
            login_url,
            home_url: None,
            base_url,
        })
    }
}

impl Default for Site {
    fn default() -> Self {
        let base_url = Url::parse(Self::DEFAULT_BASE).expect("default base url should be valid");
        Self::new(base_url).expect("default login url should be valid")
    }
}

// Anything that can fetch a page body for a URL.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn get(&self, url: &Url) -> Result<String>;

    // Body of the page shown right after logging in, if one was kept.
    fn landing_page(&self) -> Option<&str> {
        None
    }
}

// An authenticated client. Cookies set at login are replayed on every later request.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    landing_page: String,
}

impl PageSource for Session {
    async fn get(&self, url: &Url) -> Result<String> {
        debug!("GET {url}");
        let response = self.client.get(url.clone()).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    fn landing_page(&self) -> Option<&str> {
        Some(&self.landing_page)
    }
}

// Logs in and returns a session carrying the server's cookies and the login response.
// Only transport failures and error statuses are reported. Wrong credentials
// still yield a session; the pages fetched with it will simply list nothing.
pub async fn authenticate(credentials: &Credentials, site: &Site) -> Result<Session> {
    let client = Client::builder()
        .cookie_store(true)
        .build()
        .map_err(Error::Auth)?;

    let login_data = [
        ("user", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
        ("submit", "Login"),
    ];

    let response = client
        .post(site.login_url.clone())
        .form(&login_data)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(Error::Auth)?;
    // The server answers the login POST with the course list page
    let landing_page = response.text().await.map_err(Error::Auth)?;

    info!("Logged in as {}", credentials.username);
    Ok(Session {
        client,
        landing_page,
    })
}
