use log::{info, warn};
use scraper::Html;
use url::Url;

use super::error::{Error, Result};
use super::selector::collapsed_text;
use super::session::{PageSource, Site};
use crate::models::CourseRef;
use crate::static_selector;

// Third row of the page layout, second nested table, one link per course.
static_selector!(COURSE_LINKS <- "tr:nth-child(3) table:nth-child(2) td a");

// Lists the enrolled courses in page order.
// Reads the page the login returned, unless the site names a separate home page.
pub async fn list_courses<S: PageSource>(source: &S, site: &Site) -> Result<Vec<CourseRef>> {
    let page = match &site.home_url {
        Some(home_url) => source.get(home_url).await?,
        None => source
            .landing_page()
            .ok_or_else(|| Error::schema("no login response kept and no home page configured"))?
            .to_owned(),
    };
    let courses = parse_course_list(&page, &site.base_url)?;
    info!("Found {} courses", courses.len());
    Ok(courses)
}

// Extracts course links from the main page. No matching links is an empty list.
pub fn parse_course_list(page: &str, base_url: &Url) -> Result<Vec<CourseRef>> {
    let document = Html::parse_document(page);
    let mut courses = Vec::new();
    for link in document.select(&COURSE_LINKS) {
        let name = collapsed_text(link);
        let Some(href) = link.value().attr("href") else {
            warn!("Course link {name:?} has no href, skipping");
            continue;
        };
        courses.push(CourseRef {
            name,
            url: base_url.join(href)?,
        });
    }
    Ok(courses)
}
