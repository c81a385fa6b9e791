use log::info;

use super::courses::list_courses;
use super::error::Result;
use super::grades::{fetch_course, ExtractionSchema};
use super::normalize::{Html5Normalizer, Normalizer};
use super::session::{authenticate, PageSource, Site};
use crate::models::{CourseSnapshot, Credentials, Snapshot};

// Lists the courses and fetches them one after another.
// Courses are fetched strictly in list order and the first failure aborts
// the run, so a snapshot is either complete or not returned at all.
pub async fn fetch_snapshot<S, N>(
    source: &S,
    site: &Site,
    schema: &ExtractionSchema,
    normalizer: &N,
) -> Result<Snapshot>
where
    S: PageSource,
    N: Normalizer,
{
    let compiled = schema.validate()?;
    let courses = list_courses(source, site).await?;

    // One course at a time, in list order
    let mut fetched: Vec<CourseSnapshot> = Vec::with_capacity(courses.len());
    for course in &courses {
        fetched.push(fetch_course(source, course, &compiled, normalizer).await?);
    }

    let snapshot: Snapshot = fetched.into_iter().collect();
    info!("Captured {} courses", snapshot.len());
    Ok(snapshot)
}

// Logs in and captures a full snapshot with the default extraction rules.
pub async fn run(credentials: &Credentials, site: &Site) -> Result<Snapshot> {
    let session = authenticate(credentials, site).await?;
    fetch_snapshot(&session, site, &ExtractionSchema::default(), &Html5Normalizer).await
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use url::Url;

    use super::*;
    use crate::utils::error::Error;

    const MAIN_PAGE: &str = r#"<table>
        <tr><td>top</td></tr>
        <tr><td>menu</td></tr>
        <tr><td><span>Courses</span><table><tr>
            <td><a href="grades?c=1">CS101</a></td>
            <td><a href="grades?c=2">CS102</a></td>
            <td><a href="grades?c=3">CS103</a></td>
        </tr></table></td></tr>
    </table>"#;

    fn course_page(score: &str) -> String {
        format!(
            "<table><tr><td>x</table><table><tr><td>y</table>\
             <table><tr><th>h<tr><td>HW1<td>{score}<td>10<td><td></table>"
        )
    }

    // Serves canned pages and records the order of requests.
    struct FakeSite {
        landing: Option<String>,
        pages: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeSite {
        // The login response lists the courses, like the real server.
        fn new(site: &Site) -> Self {
            let mut pages = HashMap::new();
            for (c, score) in [("1", "9"), ("2", "8"), ("3", "7")] {
                let url = site.base_url.join(&format!("grades?c={c}")).unwrap();
                pages.insert(url.to_string(), course_page(score));
            }
            Self {
                landing: Some(MAIN_PAGE.to_string()),
                pages,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageSource for FakeSite {
        async fn get(&self, url: &Url) -> Result<String> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| Error::schema(format!("no page at {url}")))
        }

        fn landing_page(&self) -> Option<&str> {
            self.landing.as_deref()
        }
    }

    #[tokio::test]
    async fn fetches_every_course_in_order() {
        let site = Site::default();
        let fake = FakeSite::new(&site);
        let snapshot = fetch_snapshot(&fake, &site, &ExtractionSchema::default(), &Html5Normalizer)
            .await
            .unwrap();

        let names: Vec<&str> = snapshot.class_names().collect();
        assert_eq!(names, vec!["CS101", "CS102", "CS103"]);
        assert_eq!(snapshot.get("CS102").unwrap().grades[0].score, "8");

        // Course list came from the login response, so only course pages were requested
        let requests = fake.requests.borrow();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].ends_with("c=1"));
        assert!(requests[1].ends_with("c=2"));
        assert!(requests[2].ends_with("c=3"));
    }

    #[tokio::test]
    async fn configured_home_page_is_fetched_instead_of_login_response() {
        let mut site = Site::default();
        let home = site.base_url.join("home.cgi").unwrap();
        site.home_url = Some(home.clone());
        let mut fake = FakeSite::new(&site);
        fake.landing = Some("<p>Welcome</p>".to_string());
        fake.pages.insert(home.to_string(), MAIN_PAGE.to_string());

        let snapshot = fetch_snapshot(&fake, &site, &ExtractionSchema::default(), &Html5Normalizer)
            .await
            .unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(fake.requests.borrow()[0], home.to_string());
    }

    #[tokio::test]
    async fn missing_course_list_source_is_an_error() {
        let site = Site::default();
        let mut fake = FakeSite::new(&site);
        fake.landing = None;
        let result =
            fetch_snapshot(&fake, &site, &ExtractionSchema::default(), &Html5Normalizer).await;
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[tokio::test]
    async fn failure_aborts_remaining_courses() {
        let site = Site::default();
        let mut fake = FakeSite::new(&site);
        let second = site.base_url.join("grades?c=2").unwrap();
        fake.pages.remove(second.as_str());

        let result =
            fetch_snapshot(&fake, &site, &ExtractionSchema::default(), &Html5Normalizer).await;
        assert!(result.is_err());
        // course 1, course 2; course 3 is never requested
        assert_eq!(fake.requests.borrow().len(), 2);
    }

    #[tokio::test]
    async fn no_courses_is_an_empty_snapshot() {
        let site = Site::default();
        let mut fake = FakeSite::new(&site);
        fake.landing = Some("<p>Login failed</p>".to_string());
        let snapshot = fetch_snapshot(&fake, &site, &ExtractionSchema::default(), &Html5Normalizer)
            .await
            .unwrap();
        assert!(snapshot.is_empty());
    }
}
