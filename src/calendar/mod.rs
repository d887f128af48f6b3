//! Birthday date arithmetic and upcoming-birthday ranking.

use chrono::{Datelike, NaiveDate};

/// Projection of a birth date onto its next occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayMath {
    /// Whole days from the reference date to the next occurrence (0 on the day itself)
    pub days_left: i64,
    /// Age reached on that occurrence
    pub age_turning: i32,
}

/// Compute days until the next birthday and the age turning on it.
///
/// The occurrence in the reference year counts as upcoming unless it is
/// strictly in the past; on the birthday itself `days_left` is 0 and
/// `age_turning` is the age reached that day.
pub fn birthday_math(dob: NaiveDate, today: NaiveDate) -> BirthdayMath {
    let mut next = occurrence_in_year(dob, today.year());
    if next < today {
        next = occurrence_in_year(dob, today.year() + 1);
    }

    BirthdayMath {
        days_left: (next - today).num_days(),
        age_turning: next.year() - dob.year(),
    }
}

/// Project a birth month/day into the given year.
///
/// Feb 29 births land on Mar 1 in non-leap years.
fn occurrence_in_year(dob: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, dob.month(), dob.day()).unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(year, 3, 1).expect("Mar 1 exists in every year")
    })
}

/// Sort entries ascending by days left (stable, ties keep input order) and
/// return the subset tied for the minimum alongside the sorted sequence.
pub fn rank_by_days_left<T: Clone>(
    mut entries: Vec<T>,
    days_left: impl Fn(&T) -> i64,
) -> (Vec<T>, Vec<T>) {
    entries.sort_by_key(&days_left);

    let upcoming = match entries.first().map(&days_left) {
        Some(min) => entries
            .iter()
            .filter(|e| days_left(e) == min)
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    (entries, upcoming)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_birthday_today() {
        let math = birthday_math(date(2000, 3, 1), date(2024, 3, 1));
        assert_eq!(math.days_left, 0);
        assert_eq!(math.age_turning, 24);
    }

    #[test]
    fn test_birthday_later_this_year() {
        let math = birthday_math(date(2000, 3, 1), date(2024, 2, 1));
        assert_eq!(math.days_left, 29);
        assert_eq!(math.age_turning, 24);
    }

    #[test]
    fn test_birthday_already_passed() {
        // Mar 2 birthday seen from Mar 3 rolls over to next year
        let math = birthday_math(date(2000, 3, 2), date(2024, 3, 3));
        assert_eq!(math.days_left, 364);
        assert_eq!(math.age_turning, 25);
    }

    #[test]
    fn test_days_left_always_below_366() {
        // Worst case: leap-day birth seen the day after its leap-year occurrence
        let math = birthday_math(date(2000, 2, 29), date(2024, 3, 1));
        assert_eq!(math.days_left, 365);
        assert!(math.days_left < 366);

        for offset in [0, 1, 30, 180, 364] {
            let today = date(2024, 1, 1) + chrono::Duration::days(offset);
            let math = birthday_math(date(1990, 7, 15), today);
            assert!(math.days_left >= 0);
            assert!(math.days_left < 366);
        }
    }

    #[test]
    fn test_leap_day_in_non_leap_year_maps_to_mar_1() {
        // 2023 has no Feb 29; policy is Mar 1
        let math = birthday_math(date(2000, 2, 29), date(2023, 1, 15));
        assert_eq!(math.days_left, 45);
        assert_eq!(math.age_turning, 23);
    }

    #[test]
    fn test_leap_day_in_leap_year() {
        let math = birthday_math(date(2000, 2, 29), date(2024, 2, 29));
        assert_eq!(math.days_left, 0);
        assert_eq!(math.age_turning, 24);
    }

    #[test]
    fn test_rank_sorts_and_keeps_all_ties() {
        let entries = vec![("a", 5), ("b", 0), ("c", 0), ("d", 3)];
        let (sorted, upcoming) = rank_by_days_left(entries, |e| e.1);

        let days: Vec<i64> = sorted.iter().map(|e| e.1).collect();
        assert_eq!(days, vec![0, 0, 3, 5]);
        // Stable: "b" entered before "c"
        assert_eq!(sorted[0].0, "b");
        assert_eq!(sorted[1].0, "c");

        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].0, "b");
        assert_eq!(upcoming[1].0, "c");
    }

    #[test]
    fn test_rank_empty_input() {
        let (sorted, upcoming) = rank_by_days_left(Vec::<(&str, i64)>::new(), |e| e.1);
        assert!(sorted.is_empty());
        assert!(upcoming.is_empty());
    }

    #[test]
    fn test_rank_single_entry() {
        let (sorted, upcoming) = rank_by_days_left(vec![("only", 12)], |e| e.1);
        assert_eq!(sorted.len(), 1);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].0, "only");
    }
}
