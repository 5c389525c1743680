
use medimeet_core::{
    booking::BookingForm,
    calendar::MonthRelation,
    errors::MeetError,
    gateway::MockApiGateway,
    models::{appointment::AppointmentStatus, session::Role},
    time_slot::TimeSlot,
};
use pretty_assertions::assert_eq;

use crate::test_utils::{appointment, date, signed_in, signed_out};

fn slot(value: &str) -> TimeSlot {
    value.parse().expect("valid slot")
}

fn open_form() -> BookingForm {
    BookingForm::open(3, "Sarah Johnson", date(2024, 2, 10)).expect("month in range")
}

fn pick(form: &mut BookingForm, day_number: u32) {
    let today = date(2024, 2, 10);
    let day = form
        .calendar(today)
        .into_iter()
        .find(|d| d.month_relation == MonthRelation::Current && d.day_number == day_number)
        .expect("day in grid");
    form.select_date(&day).expect("selectable day");
}

#[tokio::test]
async fn submit_without_date_is_rejected_locally() {
    let mut gateway = MockApiGateway::new();
    gateway.expect_book_appointment().times(0);
    let session = signed_in(Role::Patient);

    let mut form = open_form();
    form.select_time(slot("10:00"));

    let err = form.submit(&gateway, &session).await.expect_err("no date");
    assert!(matches!(&err, MeetError::Validation(msg) if msg == "Please select a date"));
    assert_eq!(form.error(), Some("Please select a date"));
}

#[tokio::test]
async fn submit_without_time_is_rejected_locally() {
    let mut gateway = MockApiGateway::new();
    gateway.expect_book_appointment().times(0);
    let session = signed_in(Role::Patient);

    let mut form = open_form();
    pick(&mut form, 20);

    let err = form.submit(&gateway, &session).await.expect_err("no time");
    assert!(matches!(&err, MeetError::Validation(msg) if msg == "Please select a time"));
}

#[tokio::test]
async fn submit_without_session_asks_for_login() {
    let mut gateway = MockApiGateway::new();
    gateway.expect_book_appointment().times(0);
    let session = signed_out();

    let mut form = open_form();
    pick(&mut form, 20);
    form.select_time(slot("10:00"));

    let err = form.submit(&gateway, &session).await.expect_err("signed out");
    assert!(err.requires_login());
    assert_eq!(form.error(), Some("Please log in to book an appointment"));
}

#[tokio::test]
async fn successful_submit_sends_iso_date_and_clears_the_draft() {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_book_appointment()
        .withf(|draft| {
            draft.doctor_id == 3
                && draft.date_param() == "2024-02-20"
                && draft.time_param() == "13:30"
                && draft.note == "Follow-up"
        })
        .times(1)
        .returning(|_| Ok(appointment(99, AppointmentStatus::Pending)));
    let session = signed_in(Role::Patient);

    let mut form = open_form();
    pick(&mut form, 20);
    form.select_time(slot("13:30"));
    form.set_note("Follow-up");

    let booked = form.submit(&gateway, &session).await.expect("booked");
    assert_eq!(booked.id, 99);
    assert_eq!(form.selected_date(), None);
    assert_eq!(form.selected_time(), None);
    assert_eq!(form.note(), "");
    assert_eq!(
        form.success(),
        Some("Appointment booked successfully with Dr. Sarah Johnson")
    );
}

#[tokio::test]
async fn gateway_error_is_surfaced_verbatim_and_draft_kept() {
    let mut gateway = MockApiGateway::new();
    gateway
        .expect_book_appointment()
        .times(1)
        .returning(|_| Err(MeetError::Conflict("Slot already booked".into())));
    let session = signed_in(Role::Patient);

    let mut form = open_form();
    pick(&mut form, 20);
    form.select_time(slot("10:00"));

    let err = form.submit(&gateway, &session).await.expect_err("conflict");
    assert!(matches!(err, MeetError::Conflict(_)));
    assert_eq!(form.error(), Some("Slot already booked"));
    assert_eq!(form.selected_date(), Some(date(2024, 2, 20)));
    assert_eq!(form.success(), None);
}

#[test]
fn past_and_other_month_days_cannot_be_selected() {
    let today = date(2024, 2, 10);
    let mut form = open_form();
    let grid = form.calendar(today);

    let past = grid
        .iter()
        .find(|d| d.month_relation == MonthRelation::Current && d.day_number == 9)
        .expect("9 Feb");
    assert!(form.select_date(past).is_err());

    let next_month = grid
        .iter()
        .find(|d| d.month_relation == MonthRelation::Next)
        .expect("March day");
    assert!(form.select_date(next_month).is_err());
    assert_eq!(form.selected_date(), None);
}

#[tokio::test]
async fn selecting_a_date_clears_a_previous_error() {
    let gateway = MockApiGateway::new();
    let session = signed_in(Role::Patient);
    let mut form = open_form();

    assert!(form.submit(&gateway, &session).await.is_err());
    assert!(form.error().is_some());

    pick(&mut form, 12);
    assert_eq!(form.error(), None);
    assert_eq!(form.selected_date(), Some(date(2024, 2, 12)));
}

#[test]
fn month_navigation_regenerates_the_grid() {
    let today = date(2024, 2, 10);
    let mut form = open_form();

    form.next_month().expect("next month");
    assert_eq!(form.month().month(), 3);
    assert!(form
        .calendar(today)
        .iter()
        .filter(|d| d.month_relation == MonthRelation::Current)
        .all(|d| d.selectable));

    form.previous_month().expect("previous month");
    form.previous_month().expect("previous month");
    assert_eq!(form.month().month(), 1);
    assert!(form.calendar(today).iter().all(|d| !d.selectable));
}
