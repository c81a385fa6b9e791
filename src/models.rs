use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

// Login identifier and secret for the grade server.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Keeps the password out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// One enrolled course as listed on the main page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRef {
    pub name: String,
    pub url: Url,
}

// One assignment row. Scores stay as text, the site does not format them consistently.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Grade {
    pub title: String,
    pub score: String,
    #[serde(rename = "maxScore")]
    pub max_score: String,
    pub comment: String,
}

impl Grade {
    // `<title> <score>/<max>`, the form used in change messages.
    pub fn summary(&self) -> String {
        format!("{} {}/{}", self.title, self.score, self.max_score)
    }
}

// One course's grades as captured in a run. Final letter and percent are only set once posted.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct CourseSnapshot {
    #[serde(rename = "className")]
    pub class_name: String,
    pub grades: Vec<Grade>,
    #[serde(rename = "finalLetter", default, skip_serializing_if = "Option::is_none")]
    pub final_letter: Option<String>,
    #[serde(rename = "finalPercent", default, skip_serializing_if = "Option::is_none")]
    pub final_percent: Option<String>,
}

// Every course captured in one run, keyed by class name.
// Built once from the fetched courses and never mutated afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Snapshot {
    courses: BTreeMap<String, CourseSnapshot>,
}

impl Snapshot {
    pub fn get(&self, class_name: &str) -> Option<&CourseSnapshot> {
        self.courses.get(class_name)
    }

    // Class names in key order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.courses.keys().map(String::as_str)
    }

    pub fn courses(&self) -> impl Iterator<Item = &CourseSnapshot> {
        self.courses.values()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

impl FromIterator<CourseSnapshot> for Snapshot {
    // A later course with the same class name replaces the earlier one.
    fn from_iter<I: IntoIterator<Item = CourseSnapshot>>(iter: I) -> Self {
        let courses = iter.into_iter().fold(BTreeMap::new(), |mut acc, course| {
            acc.insert(course.class_name.clone(), course);
            acc
        });
        Self { courses }
    }
}

// Change messages per class name, in grade row order within a course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changes(pub BTreeMap<String, Vec<String>>);

impl Changes {
    // True when no course has any message.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    pub fn get(&self, class_name: &str) -> Option<&[String]> {
        self.0.get(class_name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(name: &str, letter: Option<&str>) -> CourseSnapshot {
        CourseSnapshot {
            class_name: name.to_string(),
            final_letter: letter.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn later_duplicate_class_replaces_earlier() {
        let snapshot: Snapshot = vec![course("CS101", Some("B")), course("CS101", Some("A"))]
            .into_iter()
            .collect();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("CS101").unwrap().final_letter.as_deref(), Some("A"));
    }

    #[test]
    fn snapshot_json_uses_site_field_names() {
        let snapshot: Snapshot = vec![CourseSnapshot {
            class_name: "CS101".into(),
            grades: vec![Grade {
                title: "HW1".into(),
                score: "9".into(),
                max_score: "10".into(),
                comment: String::new(),
            }],
            final_letter: None,
            final_percent: Some("85".into()),
        }]
        .into_iter()
        .collect();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["CS101"]["grades"][0]["maxScore"], "10");
        assert_eq!(json["CS101"]["finalPercent"], "85");
        assert!(json["CS101"].get("finalLetter").is_none());
        let back: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn changes_with_only_empty_lists_are_empty() {
        let mut map = BTreeMap::new();
        map.insert("CS101".to_string(), Vec::new());
        assert!(Changes(map).is_empty());
    }
}
