use crate::error::{PlanbookError, Result};
use crate::goal::Goal;
use std::cmp::Ordering;
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Segment parsing
// ---------------------------------------------------------------------------

/// Numeric value of the last dotted segment of a goal number.
/// "1.2.3" → 3, "7" → 7. A non-numeric trailing segment is a validation
/// failure, never coerced to 0.
pub fn last_segment(number: &str) -> Result<u64> {
    let seg = number.rsplit('.').next().unwrap_or(number);
    seg.parse()
        .map_err(|_| PlanbookError::MalformedNumber(number.to_string()))
}

// ---------------------------------------------------------------------------
// Next-number computation
// ---------------------------------------------------------------------------

/// Next top-level (objective) number: the highest existing number plus one,
/// or "1" when there are none.
pub fn next_top_number<'a, I>(existing: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut max = 0u64;
    for number in existing {
        max = max.max(last_segment(number)?);
    }
    Ok((max + 1).to_string())
}

/// Next child number under `parent_number`: "{parent}.1" when the parent has
/// no children yet, otherwise the highest sibling's last segment plus one.
pub fn next_child_number<'a, I>(parent_number: &str, siblings: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut max = 0u64;
    for number in siblings {
        max = max.max(last_segment(number)?);
    }
    Ok(format!("{parent_number}.{}", max + 1))
}

/// Compute the next goal number for a district, resolving the parent and its
/// current children from the store.
///
/// A `parent_id` that no longer resolves (deleted between the editor fetching
/// it and asking for a number) falls back to "1.1" — a preserved policy
/// default, logged loudly so stale clients are visible in traces.
pub fn next_goal_number(
    root: &Path,
    district_slug: &str,
    parent_id: Option<Uuid>,
) -> Result<String> {
    let goals = Goal::list(root, district_slug)?;

    match parent_id {
        None => {
            let tops = goals
                .iter()
                .filter(|g| g.parent_id.is_none())
                .map(|g| g.goal_number.as_str());
            next_top_number(tops)
        }
        Some(pid) => {
            let Some(parent) = goals.iter().find(|g| g.id == pid) else {
                tracing::warn!(
                    district = district_slug,
                    parent = %pid,
                    "next-number requested for missing parent, defaulting to 1.1"
                );
                return Ok("1.1".to_string());
            };
            let siblings = goals
                .iter()
                .filter(|g| g.parent_id == Some(pid))
                .map(|g| g.goal_number.as_str());
            next_child_number(&parent.goal_number, siblings)
        }
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Segment-wise numeric comparison of dotted goal numbers, so "1.10" sorts
/// after "1.9". Unparseable segments fall back to string comparison to keep
/// the ordering total.
pub fn compare_numbers(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(xn), Ok(yn)) => xn.cmp(&yn),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::district::District;
    use tempfile::TempDir;

    #[test]
    fn first_top_number_is_one() {
        assert_eq!(next_top_number([]).unwrap(), "1");
    }

    #[test]
    fn top_number_increments_highest() {
        assert_eq!(next_top_number(["1", "3", "2"]).unwrap(), "4");
    }

    #[test]
    fn first_child_appends_dot_one() {
        assert_eq!(next_child_number("1.2", []).unwrap(), "1.2.1");
    }

    #[test]
    fn child_number_increments_highest_sibling() {
        assert_eq!(
            next_child_number("2", ["2.1", "2.3", "2.2"]).unwrap(),
            "2.4"
        );
    }

    #[test]
    fn next_exceeds_every_last_segment_by_one() {
        let siblings = ["1.7", "1.9", "1.10", "1.2"];
        let next = next_child_number("1", siblings).unwrap();
        assert_eq!(next, "1.11");
        let next_seg = last_segment(&next).unwrap();
        for s in siblings {
            assert!(next_seg > last_segment(s).unwrap());
        }
    }

    #[test]
    fn malformed_trailing_segment_is_rejected() {
        assert!(matches!(
            last_segment("1.x"),
            Err(PlanbookError::MalformedNumber(_))
        ));
        assert!(matches!(
            next_top_number(["1", "two"]),
            Err(PlanbookError::MalformedNumber(_))
        ));
        assert!(matches!(
            next_child_number("1", ["1.1", "1.b"]),
            Err(PlanbookError::MalformedNumber(_))
        ));
    }

    #[test]
    fn compare_is_numeric_per_segment() {
        assert_eq!(compare_numbers("1.9", "1.10"), Ordering::Less);
        assert_eq!(compare_numbers("2", "10"), Ordering::Less);
        assert_eq!(compare_numbers("1.2", "1.2"), Ordering::Equal);
        assert_eq!(compare_numbers("1.2.1", "1.2"), Ordering::Greater);
    }

    fn setup(dir: &TempDir) {
        Config::new("test").save(dir.path()).unwrap();
        District::create(dir.path(), "springfield", "Springfield USD").unwrap();
    }

    #[test]
    fn store_level_numbering_for_top_and_child() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        assert_eq!(
            next_goal_number(dir.path(), "springfield", None).unwrap(),
            "1"
        );

        let objective =
            Goal::create(dir.path(), "springfield", None, "Student Achievement").unwrap();
        assert_eq!(
            next_goal_number(dir.path(), "springfield", None).unwrap(),
            "2"
        );
        assert_eq!(
            next_goal_number(dir.path(), "springfield", Some(objective.id)).unwrap(),
            "1.1"
        );
    }

    #[test]
    fn missing_parent_defaults_to_one_dot_one() {
        let dir = TempDir::new().unwrap();
        setup(&dir);

        let ghost = Uuid::new_v4();
        assert_eq!(
            next_goal_number(dir.path(), "springfield", Some(ghost)).unwrap(),
            "1.1"
        );
    }
}
