//! The fixed course and star catalog of the supported hack layout.
//!
//! The catalog is reference data compiled into the library. The hosted store
//! keeps its own copy; this one exists so that submissions and audits can be
//! checked without a network call, and the two are reconciled by hand when the
//! hack gets a content update.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;

/// The variable key holding the star number of a regular star run.
pub const STAR_VARIABLE: &str = "star";

/// A course of the hack, holding a fixed number of stars.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Course {
    /// The course id, used as the category id of its runs.
    pub id: &'static str,
    /// The display name of the course.
    pub name: &'static str,
    /// How many stars the course holds, numbered from 1.
    pub stars: u8,
}

const COURSES: &[Course] = &[
    Course { id: "frosted-hollow", name: "Frosted Hollow", stars: 7 },
    Course { id: "sunken-harbor", name: "Sunken Harbor", stars: 7 },
    Course { id: "cinder-peaks", name: "Cinder Peaks", stars: 7 },
    Course { id: "verdant-courtyard", name: "Verdant Courtyard", stars: 7 },
    Course { id: "gilded-mineshaft", name: "Gilded Mineshaft", stars: 7 },
    Course { id: "stormy-rooftops", name: "Stormy Rooftops", stars: 7 },
    Course { id: "hollow-observatory", name: "Hollow Observatory", stars: 7 },
    Course { id: "molten-foundry", name: "Molten Foundry", stars: 7 },
    Course { id: "cloudtop-bastion", name: "Cloudtop Bastion", stars: 8 },
    Course { id: "starlight-sanctum", name: "Starlight Sanctum", stars: 8 },
    Course { id: "castle-grounds", name: "Castle Grounds", stars: 5 },
];

static BY_ID: Lazy<HashMap<&'static str, &'static Course>> =
    Lazy::new(|| COURSES.iter().map(|course| (course.id, course)).collect());

/// Returns every course of the hack, in the order they appear in-game.
pub fn courses() -> &'static [Course] {
    COURSES
}

/// Returns the course with the provided id, if any.
pub fn course(course_id: &str) -> Option<&'static Course> {
    BY_ID.get(course_id).copied()
}

/// Builds the category variables of a regular star run.
pub fn star_variables(star: u8) -> BTreeMap<String, String> {
    BTreeMap::from([(STAR_VARIABLE.to_owned(), star.to_string())])
}

/// Whether a category and variables pair points at a star that exists in the
/// catalog.
///
/// Used by the archive audit; the store is supposed to only hold runs of
/// catalog entries, but old exports contain strays.
pub fn entry_exists(category_id: &str, variables: &BTreeMap<String, String>) -> bool {
    let Some(course) = course(category_id) else {
        return false;
    };
    if variables.len() != 1 {
        return false;
    }
    variables
        .get(STAR_VARIABLE)
        .and_then(|raw| raw.parse::<u8>().ok())
        .is_some_and(|star| star >= 1 && star <= course.stars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_lookup_matches_the_table() {
        let course = course("frosted-hollow").unwrap();
        assert_eq!(course.name, "Frosted Hollow");
        assert_eq!(course.stars, 7);
        assert!(super::course("rainbow-ride").is_none());
    }

    #[test]
    fn entry_exists_checks_the_star_range() {
        assert!(entry_exists("frosted-hollow", &star_variables(1)));
        assert!(entry_exists("frosted-hollow", &star_variables(7)));
        assert!(!entry_exists("frosted-hollow", &star_variables(8)));
        assert!(!entry_exists("frosted-hollow", &star_variables(0)));
        assert!(!entry_exists("rainbow-ride", &star_variables(1)));
        assert!(!entry_exists("frosted-hollow", &BTreeMap::new()));

        let mut extra = star_variables(3);
        extra.insert("route".to_owned(), "carpetless".to_owned());
        assert!(!entry_exists("frosted-hollow", &extra));
    }
}
