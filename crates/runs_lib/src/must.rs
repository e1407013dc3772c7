//! This module contains utility functions used to retrieve objects which must
//! exist, in the archive or in the catalog.
//!
//! "Must exist" means that if the object doesn't exist, the function returns
//! the matching [`RunsError`] instead of an `Option`.

use std::collections::BTreeMap;

use crate::catalog::{self, Course};
use crate::error::{RunsError, RunsResult};
use crate::models::Run;

/// Returns the run with the provided id from the archive.
pub fn have_run<'a>(runs: &'a [Run], run_id: &str) -> RunsResult<&'a Run> {
    runs.iter()
        .find(|run| run.id == run_id)
        .ok_or_else(|| RunsError::RunNotFound(run_id.to_owned()))
}

/// Returns the course with the provided id from the catalog.
pub fn have_course(course_id: &str) -> RunsResult<&'static Course> {
    catalog::course(course_id).ok_or_else(|| RunsError::UnknownCourse(course_id.to_owned()))
}

/// Returns the entry identity of a star that must exist in the catalog, as a
/// category id and variables pair ready for a [`Run`].
pub fn have_star(course_id: &str, star: u8) -> RunsResult<(String, BTreeMap<String, String>)> {
    let course = have_course(course_id)?;
    if star < 1 || star > course.stars {
        return Err(RunsError::UnknownStar {
            course: course_id.to_owned(),
            star,
        });
    }
    Ok((course.id.to_owned(), catalog::star_variables(star)))
}
