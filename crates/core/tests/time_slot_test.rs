use medimeet_core::time_slot::{
    TIME_SLOTS, TimeSlot, format_slot_for_display, format_time_for_display, parse_display_time,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("00:00", "12:00 AM")]
#[case("10:00", "10:00 AM")]
#[case("11:30", "11:30 AM")]
#[case("12:00", "12:00 PM")]
#[case("12:30", "12:30 PM")]
#[case("13:30", "1:30 PM")]
#[case("18:30", "6:30 PM")]
fn formats_to_twelve_hour_clock(#[case] slot: &str, #[case] expected: &str) {
    assert_eq!(format_slot_for_display(slot).expect("valid time"), expected);
}

#[test]
fn formatter_is_total_over_the_slot_table() {
    let slots = TimeSlot::all();
    assert_eq!(slots.len(), TIME_SLOTS.len());

    for slot in slots {
        let display = slot.display();
        let parsed = parse_display_time(&display).expect("display form parses back");
        assert_eq!(parsed, slot.time());
        assert_eq!(format_time_for_display(parsed), display);
    }
}

#[test]
fn slot_table_order_matches_strings() {
    let rendered: Vec<String> = TimeSlot::all().iter().map(ToString::to_string).collect();
    assert_eq!(rendered, TIME_SLOTS.to_vec());
}

#[rstest]
#[case("10:00", true)]
#[case("18:30", true)]
#[case("09:30", false)]
#[case("19:00", false)]
#[case("13:15", false)]
#[case("1:30 PM", false)]
fn only_table_times_are_slots(#[case] input: &str, #[case] is_slot: bool) {
    assert_eq!(input.parse::<TimeSlot>().is_ok(), is_slot);
}

#[rstest]
#[case("")]
#[case("13:30")]
#[case("0:30 AM")]
#[case("13:00 PM")]
#[case("1:30 XM")]
fn rejects_malformed_display_times(#[case] input: &str) {
    assert!(parse_display_time(input).is_err());
}
