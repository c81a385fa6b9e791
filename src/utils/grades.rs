use log::{debug, info};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::error::{Error, Result};
use super::normalize::Normalizer;
use super::selector::collapsed_text;
use super::session::PageSource;
use crate::models::{CourseRef, CourseSnapshot, Grade};
use crate::static_selector;

static_selector!(ROW <- "tr");
static_selector!(CELL <- "td");
static_selector!(PARAGRAPH <- "p");

// Cell positions of each grade field within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRoles {
    pub title: usize,
    pub score: usize,
    pub max_score: usize,
    pub comment: usize,
}

impl ColumnRoles {
    // Number of cells a row needs for every role to be present.
    pub fn width(&self) -> usize {
        [self.title, self.score, self.max_score, self.comment]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl Default for ColumnRoles {
    // Column 3 is a spacer on the course page.
    fn default() -> Self {
        Self {
            title: 0,
            score: 1,
            max_score: 2,
            comment: 4,
        }
    }
}

// Where the grade table lives on a course page and how its rows map to grades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSchema {
    pub table_selector: String,
    // Zero-based position among the elements matching `table_selector`.
    pub table_index: usize,
    pub header_rows: usize,
    pub columns: ColumnRoles,
    // Rows with this title carry the course percentage instead of an assignment.
    pub total_title: String,
    // First capture group is the final letter grade.
    pub final_letter_pattern: String,
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self {
            table_selector: "table".to_string(),
            table_index: 2,
            header_rows: 1,
            columns: ColumnRoles::default(),
            total_title: "Total".to_string(),
            final_letter_pattern: "Your final grade in the class is a (.*)".to_string(),
        }
    }
}

impl ExtractionSchema {
    // Compiles the selector and pattern, rejecting ones that cannot be used.
    pub fn validate(&self) -> Result<CompiledSchema<'_>> {
        let table = Selector::parse(&self.table_selector).map_err(|e| {
            Error::schema(format!("bad table selector {:?}: {e:?}", self.table_selector))
        })?;
        let final_letter = Regex::new(&self.final_letter_pattern).map_err(|e| {
            Error::schema(format!("bad final grade pattern {:?}: {e}", self.final_letter_pattern))
        })?;
        if final_letter.captures_len() < 2 {
            return Err(Error::schema(format!(
                "final grade pattern {:?} has no capture group",
                self.final_letter_pattern
            )));
        }
        Ok(CompiledSchema {
            schema: self,
            table,
            final_letter,
        })
    }
}

// A validated schema, ready to run against normalized pages.
#[derive(Debug)]
pub struct CompiledSchema<'a> {
    schema: &'a ExtractionSchema,
    table: Selector,
    final_letter: Regex,
}

impl CompiledSchema<'_> {
    // Extracts one course's grades from a normalized page.
    // A page without the grade table gives an empty course. A row that has
    // cells but too few of them is an error rather than a misaligned grade.
    pub fn extract(&self, class_name: &str, document: &Html) -> Result<CourseSnapshot> {
        let mut grades = Vec::new();
        let mut final_percent = None;

        if let Some(table) = document.select(&self.table).nth(self.schema.table_index) {
            for (index, row) in table.select(&ROW).enumerate().skip(self.schema.header_rows) {
                let Some(grade) = self.grade_from_row(index, row)? else {
                    continue;
                };
                // The total row carries the course percentage, blank until posted
                if grade.title == self.schema.total_title {
                    final_percent = posted(&grade.score);
                } else {
                    grades.push(grade);
                }
            }
        } else {
            debug!("{class_name}: no grade table on page");
        }

        Ok(CourseSnapshot {
            class_name: class_name.to_string(),
            grades,
            final_letter: self.final_letter(document),
            final_percent,
        })
    }

    fn grade_from_row(&self, index: usize, row: ElementRef<'_>) -> Result<Option<Grade>> {
        let cells: Vec<String> = row.select(&CELL).map(collapsed_text).collect();
        if cells.is_empty() {
            return Ok(None);
        }
        let columns = self.schema.columns;
        if cells.len() < columns.width() {
            return Err(Error::schema(format!(
                "grade row {index} has {} cells, expected at least {}",
                cells.len(),
                columns.width()
            )));
        }
        Ok(Some(Grade {
            title: cells[columns.title].clone(),
            score: cells[columns.score].clone(),
            max_score: cells[columns.max_score].clone(),
            comment: cells[columns.comment].clone(),
        }))
    }

    // The capture of the first paragraph matching the final grade sentence, if non-blank.
    fn final_letter(&self, document: &Html) -> Option<String> {
        let letter = document.select(&PARAGRAPH).find_map(|p| {
            let text = p.text().collect::<String>();
            self.final_letter
                .captures(&text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })?;
        posted(&letter)
    }
}

// A blank value means the site has not posted it yet.
fn posted(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// Fetches a course's grade page, repairs it and extracts its grades.
pub async fn fetch_course<S, N>(
    source: &S,
    course: &CourseRef,
    schema: &CompiledSchema<'_>,
    normalizer: &N,
) -> Result<CourseSnapshot>
where
    S: PageSource,
    N: Normalizer,
{
    let page = source.get(&course.url).await?;
    let snapshot = parse_course_page(&page, &course.name, schema, normalizer)?;
    info!(
        "{}: {} grades, final letter {:?}, total {:?}",
        snapshot.class_name,
        snapshot.grades.len(),
        snapshot.final_letter,
        snapshot.final_percent
    );
    Ok(snapshot)
}

// Repairs `page` and extracts the course from the repaired tree.
pub fn parse_course_page<N: Normalizer>(
    page: &str,
    class_name: &str,
    schema: &CompiledSchema<'_>,
    normalizer: &N,
) -> Result<CourseSnapshot> {
    let document = normalizer.normalize(page)?;
    schema.extract(class_name, &document)
}
