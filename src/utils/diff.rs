use std::collections::BTreeMap;

use crate::models::{Changes, CourseSnapshot, Grade, Snapshot};

const MISSING: &str = "N/A";

// How grade rows of the old and new course are paired up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiffMode {
    // Row `i` is compared with old row `i`. Assumes the site never reorders
    // or inserts assignments; if it does, scores get attributed to the wrong title.
    #[default]
    Positional,
    // Rows are paired by title, each old row used at most once.
    ByTitle,
}

// Change messages for every course in `new`, comparing rows by position.
// Courses only in `old`, and old rows past the end of the new list, are not
// reported. See `removals` for those.
pub fn diff(old: &Snapshot, new: &Snapshot) -> Changes {
    diff_with(DiffMode::Positional, old, new)
}

// Change messages for every course in `new`, pairing grade rows according to `mode`.
pub fn diff_with(mode: DiffMode, old: &Snapshot, new: &Snapshot) -> Changes {
    // A course missing from `old` is compared against an empty one
    let empty = CourseSnapshot::default();
    let changes = new
        .courses()
        .map(|new_course| {
            let old_course = old.get(&new_course.class_name).unwrap_or(&empty);
            let messages = course_changes(mode, old_course, new_course);
            (new_course.class_name.clone(), messages)
        })
        .collect();
    Changes(changes)
}

// Letter and percent changes first, then one message per changed or new grade row.
fn course_changes(mode: DiffMode, old: &CourseSnapshot, new: &CourseSnapshot) -> Vec<String> {
    let mut messages = Vec::new();

    if old.final_letter != new.final_letter {
        messages.push(format!(
            "Your final grade has changed from \"{}\" to \"{}\".",
            or_missing(&old.final_letter),
            or_missing(&new.final_letter)
        ));
    }
    if old.final_percent != new.final_percent {
        messages.push(format!(
            "Your total grade has changed from {}% to {}%.",
            or_missing(&old.final_percent),
            or_missing(&new.final_percent)
        ));
    }

    let pairs = match mode {
        DiffMode::Positional => positional_pairs(&old.grades, &new.grades),
        DiffMode::ByTitle => titled_pairs(&old.grades, &new.grades),
    };
    messages.extend(pairs.into_iter().filter_map(|(old_grade, new_grade)| {
        grade_change(old_grade, new_grade)
    }));
    messages
}

// Absent values render as N/A in messages.
fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}

// Pairs new row `i` with old row `i`, if there is one.
fn positional_pairs<'a>(old: &'a [Grade], new: &'a [Grade]) -> Vec<(Option<&'a Grade>, &'a Grade)> {
    new.iter().enumerate().map(|(i, grade)| (old.get(i), grade)).collect()
}

// Pairs each new row with the first unused old row of the same title.
fn titled_pairs<'a>(old: &'a [Grade], new: &'a [Grade]) -> Vec<(Option<&'a Grade>, &'a Grade)> {
    let mut used = vec![false; old.len()];
    new.iter()
        .map(|grade| {
            let matched = old
                .iter()
                .enumerate()
                .find(|(i, o)| !used[*i] && o.title == grade.title)
                .map(|(i, o)| {
                    used[i] = true;
                    o
                });
            (matched, grade)
        })
        .collect()
}

// Message for one pair. Comments are not compared.
fn grade_change(old: Option<&Grade>, new: &Grade) -> Option<String> {
    match old {
        None => Some(format!("New: {}", new.summary())),
        Some(old)
            if old.title != new.title
                || old.score != new.score
                || old.max_score != new.max_score =>
        {
            Some(format!("{} => {}", old.summary(), new.summary()))
        }
        Some(_) => None,
    }
}

// Courses and trailing grade rows that disappeared between the snapshots.
// Kept apart from `diff`, whose output never mentions removals.
pub fn removals(old: &Snapshot, new: &Snapshot) -> Changes {
    let mut removed = BTreeMap::new();
    for old_course in old.courses() {
        let messages = match new.get(&old_course.class_name) {
            None => vec!["Course no longer listed.".to_string()],
            Some(new_course) => old_course
                .grades
                .iter()
                .skip(new_course.grades.len())
                .map(|g| format!("Removed: {}", g.summary()))
                .collect(),
        };
        if !messages.is_empty() {
            removed.insert(old_course.class_name.clone(), messages);
        }
    }
    Changes(removed)
}
