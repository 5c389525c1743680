use chrono::{Datelike, NaiveDate, Weekday};
use medimeet_core::{
    calendar::{CalendarMonth, GRID_CELLS, MonthRelation, generate_calendar_days, is_date_disabled},
    errors::MeetError,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn month(y: i32, m: u32) -> CalendarMonth {
    CalendarMonth::new(y, m).expect("valid month")
}

#[rstest]
#[case(2024, 1)]
#[case(2024, 2)]
#[case(2023, 2)]
#[case(2015, 2)] // starts on Sunday, 28 days
#[case(2024, 6)]
#[case(2020, 8)] // starts on Saturday, 31 days
#[case(2024, 12)]
#[case(2026, 10)]
fn grid_always_has_42_cells(#[case] year: i32, #[case] m: u32) {
    let days = generate_calendar_days(month(year, m), date(2000, 1, 1));
    assert_eq!(days.len(), GRID_CELLS);
    assert_eq!(days[0].date.weekday(), Weekday::Sun);
    assert!(days.windows(2).all(|w| w[1].date == w[0].date.succ_opt().expect("next day")));
}

#[rstest]
#[case(2024, 2, 29)]
#[case(2023, 2, 28)]
#[case(2024, 4, 30)]
#[case(2024, 7, 31)]
fn current_month_runs_from_one_to_month_length(
    #[case] year: i32,
    #[case] m: u32,
    #[case] length: u32,
) {
    let days = generate_calendar_days(month(year, m), date(2000, 1, 1));
    let current: Vec<u32> = days
        .iter()
        .filter(|d| d.month_relation == MonthRelation::Current)
        .map(|d| d.day_number)
        .collect();

    assert_eq!(current.first(), Some(&1));
    assert_eq!(current.last(), Some(&length));
    assert_eq!(current, (1..=length).collect::<Vec<_>>());
}

#[test]
fn february_2024_layout() {
    // 1 Feb 2024 is a Thursday: four leading January days.
    let days = generate_calendar_days(month(2024, 2), date(2024, 1, 1));

    let leading: Vec<u32> = days
        .iter()
        .take_while(|d| d.month_relation == MonthRelation::Prev)
        .map(|d| d.day_number)
        .collect();
    assert_eq!(leading, vec![28, 29, 30, 31]);

    let current = days
        .iter()
        .filter(|d| d.month_relation == MonthRelation::Current)
        .count();
    assert_eq!(current, 29);

    let trailing: Vec<u32> = days
        .iter()
        .filter(|d| d.month_relation == MonthRelation::Next)
        .map(|d| d.day_number)
        .collect();
    assert_eq!(trailing, (1..=9).collect::<Vec<_>>());
    assert_eq!(days[41].date, date(2024, 3, 9));
}

#[test]
fn month_starting_on_sunday_has_no_leading_days() {
    let days = generate_calendar_days(month(2015, 2), date(2000, 1, 1));
    assert_eq!(days[0].month_relation, MonthRelation::Current);
    assert_eq!(days[0].day_number, 1);
    assert_eq!(
        days.iter()
            .filter(|d| d.month_relation == MonthRelation::Next)
            .count(),
        14
    );
}

#[test]
fn past_days_are_never_selectable() {
    let today = date(2024, 2, 15);
    let days = generate_calendar_days(month(2024, 2), today);

    for day in &days {
        if day.date < today {
            assert!(!day.selectable, "{} should be disabled", day.date);
        }
    }

    let selectable: Vec<u32> = days
        .iter()
        .filter(|d| d.selectable)
        .map(|d| d.day_number)
        .collect();
    assert_eq!(selectable, (15..=29).collect::<Vec<_>>());
}

#[test]
fn other_month_days_are_never_selectable() {
    let days = generate_calendar_days(month(2030, 5), date(2024, 1, 1));
    for day in days {
        assert_eq!(day.selectable, day.month_relation == MonthRelation::Current);
    }
}

#[test]
fn whole_past_month_is_disabled() {
    let days = generate_calendar_days(month(2024, 1), date(2024, 3, 1));
    assert!(days.iter().all(|d| !d.selectable));
}

#[test]
fn today_itself_is_bookable() {
    let today = date(2024, 2, 15);
    assert!(!is_date_disabled(today, today));
    assert!(is_date_disabled(date(2024, 2, 14), today));
}

#[test]
fn navigation_shifts_by_one_month() {
    let feb = month(2024, 2);
    assert_eq!(feb.next().expect("next"), month(2024, 3));
    assert_eq!(feb.previous().expect("previous"), month(2024, 1));
    assert_eq!(month(2024, 1).previous().expect("previous"), month(2023, 12));
    assert_eq!(feb.title(), "February 2024");
    assert_eq!(CalendarMonth::parse("2024-02").expect("parse"), feb);
}

#[test]
fn last_representable_month_is_rejected() {
    let last_year = NaiveDate::MAX.year();

    assert!(CalendarMonth::parse(&format!("{}-12", last_year)).is_err());
    assert!(CalendarMonth::containing(NaiveDate::MAX).is_err());

    let november = month(last_year, 11);
    let days = november.grid(date(2024, 1, 1));
    assert_eq!(days.len(), GRID_CELLS);
    assert!(matches!(november.next(), Err(MeetError::Validation(_))));
}

#[test]
fn first_representable_month_is_rejected() {
    let first = NaiveDate::MIN;
    assert!(CalendarMonth::new(first.year(), first.month()).is_err());
    assert!(CalendarMonth::containing(first).is_err());
}
