use std::{
    io::{self, BufRead, Write},
    str::FromStr,
    sync::Arc,
};

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use dotenv::dotenv;
use medimeet_client::{ClientConfig, FileSessionStore, HttpGateway};
use medimeet_core::{
    booking::BookingForm,
    calendar::{CalendarMonth, MonthRelation, WEEKDAY_HEADERS},
    gateway::ApiGateway,
    models::{
        appointment::Appointment,
        doctor::{DEFAULT_SPECIALISATIONS, Doctor, related_doctors},
        profile::{DoctorProfileChanges, PatientProfileUpdate},
        session::{LoginRequest, RegisterAdminRequest, RegisterPatientRequest, Role},
        stats::AppointmentCounts,
    },
    session::SessionContext,
    time_slot::{TimeSlot, format_time_for_display, parse_display_time},
    workflow::{AppointmentAction, AppointmentBoard, BoardTab, Decision},
};
use tracing::{debug, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "medimeet")]
#[command(about = "Book and manage MediMeet doctor appointments")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MEDIMEET_PASSWORD")]
        password: String,
    },

    /// Forget the current session
    Logout,

    /// Create a patient account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "MEDIMEET_PASSWORD")]
        password: String,
        #[arg(long)]
        phone: String,
    },

    /// Create another admin account (admins)
    RegisterAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "MEDIMEET_PASSWORD")]
        password: String,
    },

    /// List doctors, optionally by specialisation
    Doctors {
        #[arg(long)]
        specialisation: Option<String>,
    },

    /// Show one doctor and others in the same specialisation
    Doctor { id: i64 },

    /// Remove a doctor account (admins)
    RemoveDoctor {
        id: i64,
        #[arg(long)]
        yes: bool,
    },

    /// List the specialisations doctors can have
    Specialisations,

    /// Show your profile
    Profile,

    /// Change your profile; fields left out stay as they are
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Doctors only
        #[arg(long)]
        specialisation: Option<String>,
        /// Doctors only
        #[arg(long)]
        about: Option<String>,
        /// Doctors only
        #[arg(long)]
        experience: Option<String>,
        #[arg(long)]
        current_password: Option<String>,
        #[arg(long)]
        new_password: Option<String>,
    },

    /// Show the booking calendar for a month (YYYY-MM)
    Calendar {
        #[arg(long)]
        month: Option<String>,
    },

    /// List bookable time slots
    Slots,

    /// Book an appointment
    Book {
        #[arg(long)]
        doctor: i64,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// "14:30" or "2:30 PM"
        #[arg(long)]
        time: String,
        #[arg(long, default_value = "")]
        note: String,
    },

    /// List your appointments
    Appointments {
        /// upcoming, rejected or all (doctors only)
        #[arg(long)]
        tab: Option<String>,
        /// Zero-based page (doctors only)
        #[arg(long)]
        page: Option<u32>,
    },

    /// Accept or reject a pending appointment (doctors)
    Decide {
        id: i64,
        decision: String,
        #[arg(long)]
        yes: bool,
    },

    /// Cancel or remove an appointment
    Cancel {
        id: i64,
        #[arg(long)]
        yes: bool,
    },

    /// Dashboard counters for the signed-in role
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let args = Args::parse();
    let config = ClientConfig::from_env()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let session = Arc::new(SessionContext::load(FileSessionStore::new(
        &config.session_file,
    ))?);
    let gateway = HttpGateway::new(&config, Arc::clone(&session))?;
    debug!(api = %config.api_base_url, "Client ready");

    let today = Local::now().date_naive();

    match args.command {
        Commands::Login { email, password } => {
            let session = gateway.login(&LoginRequest { email, password }).await?;
            println!(
                "Signed in as {} ({})",
                session.name.as_deref().unwrap_or(&session.email),
                session.role
            );
        }
        Commands::Logout => {
            gateway.logout().await?;
            println!("Signed out");
        }
        Commands::Register {
            name,
            email,
            password,
            phone,
        } => {
            gateway
                .register_patient(&RegisterPatientRequest {
                    name,
                    email,
                    password,
                    phone,
                })
                .await?;
            println!("Account created. You can now log in.");
        }
        Commands::RegisterAdmin {
            name,
            email,
            password,
        } => {
            session.require_role(Role::Admin)?;
            gateway
                .register_admin(&RegisterAdminRequest {
                    name,
                    email,
                    password,
                })
                .await?;
            println!("Admin account created");
        }
        Commands::Doctors { specialisation } => {
            let doctors = match specialisation {
                Some(wanted) => gateway.doctors_by_specialisation(&wanted).await?,
                None => gateway.list_doctors().await?,
            };
            for doctor in &doctors {
                print_doctor_row(doctor);
            }
        }
        Commands::Doctor { id } => {
            let doctor = gateway.get_doctor(id).await?;
            println!("Dr. {} ({})", doctor.name, doctor.specialisation);
            for (label, value) in [
                ("Email", &doctor.email),
                ("Phone", &doctor.phone),
                ("Experience", &doctor.experience),
                ("About", &doctor.about),
            ] {
                if let Some(value) = value {
                    println!("{:<11} {}", label, value);
                }
            }
            let doctors = gateway.list_doctors().await?;
            let related = related_doctors(&doctors, &doctor.specialisation, Some(doctor.id));
            if !related.is_empty() {
                println!("\nRelated doctors:");
                for other in related {
                    print_doctor_row(other);
                }
            }
        }
        Commands::RemoveDoctor { id, yes } => {
            session.require_role(Role::Admin)?;
            let doctor = gateway.get_doctor(id).await?;
            let message = format!("Remove Dr. {}? This cannot be undone.", doctor.name);
            if !yes && !confirm(&message)? {
                println!("Nothing changed");
                return Ok(());
            }
            gateway.delete_doctor(id).await?;
            info!(doctor_id = id, "Doctor removed");
            println!("Removed Dr. {}", doctor.name);
        }
        Commands::Specialisations => {
            let specialisations = match gateway.list_specialisations().await {
                Ok(list) => list,
                Err(err) => {
                    warn!(error = %err, "Using the built-in specialisation list");
                    DEFAULT_SPECIALISATIONS.iter().map(|s| s.to_string()).collect()
                }
            };
            for specialisation in specialisations {
                println!("{}", specialisation);
            }
        }
        Commands::Profile => {
            let current = session.require()?;
            if current.role == Role::Doctor {
                let profile = gateway.get_doctor_profile().await?;
                println!("Dr. {} ({})", profile.name, profile.specialisation);
                println!("Email       {}", profile.email);
                println!("Phone       {}", profile.phone);
                println!("Experience  {}", profile.experience);
                println!("About       {}", profile.about);
            } else {
                println!("{}", current.name.as_deref().unwrap_or("(no name)"));
                println!("Email       {}", current.email);
                println!("Role        {}", current.role);
            }
        }
        Commands::UpdateProfile {
            name,
            email,
            phone,
            specialisation,
            about,
            experience,
            current_password,
            new_password,
        } => match session.require()?.role {
            Role::Doctor => {
                let mut profile = gateway.get_doctor_profile().await?;
                profile.apply(DoctorProfileChanges {
                    name,
                    email,
                    specialisation,
                    phone,
                    about,
                    experience,
                    password: new_password,
                });
                let updated = gateway.update_doctor_profile(&profile).await?;
                println!("Profile updated for Dr. {}", updated.name);
            }
            Role::Patient => {
                let mut current = session.require()?;
                let update = PatientProfileUpdate {
                    name: name
                        .or_else(|| current.name.clone())
                        .ok_or_else(|| eyre!("--name is required"))?,
                    email: email.unwrap_or_else(|| current.email.clone()),
                    phone: phone.ok_or_else(|| eyre!("--phone is required"))?,
                    current_password,
                    new_password,
                };
                let updated = gateway.update_patient_profile(&update).await?;
                current.name = Some(updated.name.clone());
                current.email = updated.email.clone();
                session.establish(current)?;
                println!("Profile updated for {}", updated.name);
            }
            Role::Admin => return Err(eyre!("Admin accounts have no editable profile")),
        },
        Commands::Calendar { month } => {
            let month = match month {
                Some(value) => CalendarMonth::parse(&value)?,
                None => CalendarMonth::containing(today)?,
            };
            print_calendar(month, today);
        }
        Commands::Slots => {
            for slot in TimeSlot::all() {
                println!("{}  {}", slot, slot.display());
            }
        }
        Commands::Book {
            doctor,
            date,
            time,
            note,
        } => {
            let doctor = gateway.get_doctor(doctor).await?;
            let slot = parse_slot(&time)?;

            let mut form = BookingForm::open(doctor.id, &doctor.name, today)?;
            form.show_month(CalendarMonth::containing(date)?);
            let day = form
                .calendar(today)
                .into_iter()
                .find(|day| day.date == date && day.month_relation == MonthRelation::Current)
                .ok_or_else(|| eyre!("{} is not on the calendar", date))?;
            form.select_date(&day)?;
            form.select_time(slot);
            form.set_note(note);

            let appointment = form.submit(&gateway, &session).await?;
            info!(appointment_id = appointment.id, "Booked");
            if let Some(message) = form.success() {
                println!("{}", message);
            }
            print_appointment(&appointment);
        }
        Commands::Appointments { tab, page } => {
            let role = session.require()?.role;
            let mut board = AppointmentBoard::for_role(role);
            if let Some(tab) = tab {
                board.set_active_tab(BoardTab::from_str(&tab)?);
            }
            if let Some(page) = page {
                board.set_page(page);
            }
            board.refresh(&gateway).await?;

            for appointment in board.filtered() {
                print_appointment(appointment);
            }
            print_counts(&board.counts());
            if role == Role::Doctor {
                println!(
                    "Page {} of {}",
                    board.page() + 1,
                    board.total_pages().max(1)
                );
            }
        }
        Commands::Decide { id, decision, yes } => {
            session.require_role(Role::Doctor)?;
            let decision = Decision::from_str(&decision)?;
            let mut board = AppointmentBoard::for_role(Role::Doctor);
            board.set_active_tab(BoardTab::All);
            run_action(&gateway, &mut board, id, AppointmentAction::Decide(decision), yes).await?;
        }
        Commands::Cancel { id, yes } => {
            let role = session.require()?.role;
            let mut board = AppointmentBoard::for_role(role);
            board.set_active_tab(BoardTab::All);
            run_action(&gateway, &mut board, id, AppointmentAction::Cancel, yes).await?;
        }
        Commands::Stats => match session.require()?.role {
            Role::Doctor => print_counts(&gateway.doctor_appointment_counts().await?),
            Role::Admin => {
                let stats = gateway.dashboard_stats().await?;
                println!(
                    "Doctors: {}  Patients: {}  Admins: {}  Appointments: {}",
                    stats.doctors, stats.patients, stats.admins, stats.appointments
                );
                print_counts(&gateway.admin_status_counts().await?);
                for day in gateway.appointments_over_time().await? {
                    println!("{}  {}", day.date, day.count);
                }
            }
            Role::Patient => {
                let mut board = AppointmentBoard::for_role(Role::Patient);
                board.refresh(&gateway).await?;
                print_counts(&board.counts());
            }
        },
    }

    Ok(())
}

/// Doctors page through their list, so keep fetching pages until the id shows up.
async fn run_action<G: ApiGateway>(
    gateway: &G,
    board: &mut AppointmentBoard,
    id: i64,
    action: AppointmentAction,
    yes: bool,
) -> Result<()> {
    board.refresh(gateway).await?;
    let mut page = 0;
    while board.find(id).is_none() && page + 1 < board.total_pages() {
        page += 1;
        board.set_page(page);
        board.refresh(gateway).await?;
    }

    let message = board.prompt(id, action)?.message.clone();
    if !yes && !confirm(&message)? {
        board.dismiss();
        println!("Nothing changed");
        return Ok(());
    }

    board.confirm(gateway).await?;
    if let Some(notice) = board.notice() {
        println!("{}", notice);
    }
    Ok(())
}

fn confirm(message: &str) -> Result<bool> {
    print!("{} [y/N] ", message);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn parse_slot(value: &str) -> Result<TimeSlot> {
    let upper = value.to_ascii_uppercase();
    let slot = if upper.ends_with("AM") || upper.ends_with("PM") {
        TimeSlot::from_time(parse_display_time(value)?)?
    } else {
        TimeSlot::from_str(value)?
    };
    Ok(slot)
}

fn print_calendar(month: CalendarMonth, today: NaiveDate) {
    println!("{:^27}", month.title());
    println!("{}", WEEKDAY_HEADERS.map(|h| format!("{:>3}", h)).join(" "));
    for week in month.grid(today).chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|day| match (day.month_relation, day.selectable) {
                (MonthRelation::Current, true) => format!("{:>3}", day.day_number),
                (MonthRelation::Current, false) => format!("{:>2}x", day.day_number),
                _ => "  .".to_string(),
            })
            .collect();
        println!("{}", row.join(" "));
    }
}

fn print_doctor_row(doctor: &Doctor) {
    println!("{:>4}  {:<28} {}", doctor.id, doctor.name, doctor.specialisation);
}

fn print_appointment(appointment: &Appointment) {
    let who = appointment
        .doctor_name()
        .map(|name| format!("Dr. {}", name))
        .or_else(|| appointment.patient_name().map(str::to_string))
        .unwrap_or_default();
    println!(
        "#{:<5} {}  {:>8}  {:<10} {}",
        appointment.id,
        appointment.date.format("%d %b %Y"),
        format_time_for_display(appointment.time),
        appointment.status,
        who
    );
}

fn print_counts(counts: &AppointmentCounts) {
    println!(
        "Pending: {}  Accepted: {}  Rejected: {}  Cancelled: {}  Total: {}",
        counts.pending,
        counts.accepted,
        counts.rejected,
        counts.cancelled,
        counts.total()
    );
}
