//! Schedule board: month calendar, filter cascade, paged agenda and the
//! patient-assignment dialog.

use std::io;
use std::sync::Arc;

use chrono::NaiveDate;

use schedule_cell::{AgendaPage, DayOccupancy, DayTone, ScheduleBoard};
use shared_config::AppConfig;
use shared_gateway::ApiGateway;
use shared_query::QueryCache;

use crate::input;
use crate::screens::notify;

const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

pub async fn run(
    gateway: Arc<ApiGateway>,
    cache: Arc<QueryCache>,
    config: &AppConfig,
    today: NaiveDate,
) -> io::Result<()> {
    let mut board = ScheduleBoard::new(gateway, cache, config, today);

    loop {
        let days = match board.month_days().await {
            Ok(days) => days,
            Err(err) => {
                if notify(&err) {
                    return Ok(());
                }
                Vec::new()
            }
        };
        render_calendar(&board, &days);

        let page = match board.load_page().await {
            Ok(page) => Some(page),
            Err(err) => {
                if notify(&err) {
                    return Ok(());
                }
                None
            }
        };
        if let Some(page) = &page {
            render_page(page);
        }

        println!("\n1. Mes anterior      2. Mes siguiente     3. Elegir día");
        println!("4. Especialidad      5. Doctor            6. Ocupación");
        println!("7. Limpiar filtros   8. Página siguiente  9. Página anterior");
        println!("10. Asignar paciente 0. Volver");

        match input::prompt_choice("Opción")? {
            1 => board.previous_month(),
            2 => board.next_month(),
            3 => {
                let day = input::prompt_choice("Día del mes")?;
                if !board.select_day(day) {
                    println!("Ese día no existe en el mes mostrado");
                }
            }
            4 => {
                if !pick_speciality(&mut board).await? {
                    return Ok(());
                }
            }
            5 => {
                if !pick_doctor(&mut board).await? {
                    return Ok(());
                }
            }
            6 => pick_occupancy(&mut board)?,
            7 => board.clear_filters(),
            8 => {
                if !board.next_page() {
                    println!("No hay más páginas");
                }
            }
            9 => {
                if !board.previous_page() {
                    println!("Ya está en la primera página");
                }
            }
            10 => match &page {
                Some(page) => {
                    if !assign(&mut board, page).await? {
                        return Ok(());
                    }
                }
                None => println!("No hay citas cargadas"),
            },
            0 => return Ok(()),
            _ => println!("Opción inválida"),
        }
    }
}

fn render_calendar(board: &ScheduleBoard, days: &[DayOccupancy]) {
    let grid = board.month();
    println!(
        "\n      {} {}",
        MONTH_NAMES[(grid.month - 1) as usize],
        grid.year
    );
    println!("  Do  Lu  Ma  Mi  Ju  Vi  Sá");

    let mut column = 0;
    for _ in 0..grid.leading_blanks() {
        print!("    ");
        column += 1;
    }
    for day in 1..=grid.days_in_month() {
        let marker = match board.day_tone(days, day) {
            DayTone::Full => '#',
            DayTone::Available => '+',
            DayTone::Empty => '.',
            DayTone::Unknown => ' ',
        };
        print!(" {:>2}{}", day, marker);
        column += 1;
        if column == 7 {
            println!();
            column = 0;
        }
    }
    if column != 0 {
        println!();
    }
    println!("  + disponible  # ocupada  . sin citas");

    let filters = board.filters();
    println!("\nDía seleccionado: {}", board.selected_date());
    println!(
        "Filtros: especialidad={} doctor={} ocupación={}",
        filters
            .speciality_id
            .map_or_else(|| "-".to_string(), |id| id.to_string()),
        filters
            .doctor_id
            .map_or_else(|| "-".to_string(), |id| id.to_string()),
        match filters.occupied {
            Some(true) => "ocupadas",
            Some(false) => "libres",
            None => "todas",
        },
    );
}

fn render_page(page: &AgendaPage) {
    if page.rows.is_empty() {
        println!("\nNo hay citas para el día y los filtros actuales");
        return;
    }

    println!(
        "\n  {:<6}{:<14}{:<22}{:<22}{:<9}{}",
        "ID", "Horario", "Especialidad", "Doctor", "Estado", "Paciente"
    );
    for row in &page.rows {
        println!(
            "  {:<6}{:<14}{:<22}{:<22}{:<9}{}",
            row.id,
            format!("{}-{}", row.start_hour, row.end_hour),
            row.speciality.name,
            row.doctor.full_name(),
            if row.is_occuped { "Ocupada" } else { "Libre" },
            row.patient
                .as_ref()
                .map_or_else(|| "-".to_string(), |patient| patient.full_name()),
        );
    }
    println!(
        "\nPágina {}{}",
        page.page,
        if page.can_advance { " (hay más)" } else { "" }
    );
}

/// Returns false when the session died and the screen must close.
async fn pick_speciality(board: &mut ScheduleBoard) -> io::Result<bool> {
    match board.speciality_options().await {
        Ok(options) => {
            for option in &options {
                println!("  {:<5} {}", option.id, option.name);
            }
            let id = input::prompt_id("Id de especialidad (vacío para quitar)")?;
            board.set_speciality(id);
        }
        Err(err) => {
            if notify(&err) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

async fn pick_doctor(board: &mut ScheduleBoard) -> io::Result<bool> {
    match board.doctor_options().await {
        Ok(options) if options.is_empty() => {
            println!("Seleccione primero una especialidad");
        }
        Ok(options) => {
            for option in &options {
                println!("  {:<5} {}", option.id, option.full_name());
            }
            let id = input::prompt_id("Id del doctor (vacío para quitar)")?;
            if !board.set_doctor(id) {
                println!("Seleccione primero una especialidad");
            }
        }
        Err(err) => {
            if notify(&err) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

fn pick_occupancy(board: &mut ScheduleBoard) -> io::Result<()> {
    println!("1. Solo ocupadas  2. Solo libres  (vacío: todas)");
    let occupied = match input::prompt_id("Opción")? {
        Some(1) => Some(true),
        Some(2) => Some(false),
        _ => None,
    };
    board.set_occupancy(occupied);
    Ok(())
}

/// Assignment dialog for one open slot. Returns false when the session died
/// and the screen must close; otherwise the operator left the dialog.
async fn assign(board: &mut ScheduleBoard, page: &AgendaPage) -> io::Result<bool> {
    let Some(id) = input::prompt_id("Id de la cita")? else {
        return Ok(true);
    };
    let Some(appointment) = page.rows.iter().find(|row| row.id == id).cloned() else {
        println!("Esa cita no está en la página actual");
        return Ok(true);
    };

    if let Err(err) = board.open_assignment(appointment) {
        println!("{}", err.notice());
        return Ok(true);
    }

    loop {
        if let Some(draft) = board.assignment() {
            let slot = &draft.appointment;
            println!(
                "\nAsignando cita {} | {} {}-{} | {} | {}",
                slot.id,
                slot.date().map_or_else(String::new, |d| d.to_string()),
                slot.start_hour,
                slot.end_hour,
                slot.speciality.name,
                slot.doctor.full_name(),
            );
            match &draft.selected_patient {
                Some(patient) => println!("Paciente elegido: {}", patient.full_name()),
                None => println!("Paciente elegido: -"),
            }
        }
        println!("1. Buscar paciente  2. Confirmar  3. Cancelar");

        match input::prompt_choice("Opción")? {
            1 => {
                let search = input::prompt("Buscar (vacío lista los primeros)")?;
                match board.search_patients(&search).await {
                    Ok(patients) if patients.is_empty() => println!("Sin resultados"),
                    Ok(patients) => {
                        for patient in &patients {
                            println!(
                                "  {:<5} {:<28} {}",
                                patient.id,
                                patient.full_name(),
                                patient.document
                            );
                        }
                        if let Some(id) = input::prompt_id("Id del paciente (vacío para no elegir)")? {
                            match patients.into_iter().find(|patient| patient.id == id) {
                                Some(patient) => {
                                    board.select_patient(patient);
                                }
                                None => println!("Ese paciente no está en los resultados"),
                            }
                        }
                    }
                    Err(err) => {
                        if notify(&err) {
                            return Ok(false);
                        }
                    }
                }
            }
            2 => match board.submit_assignment().await {
                Ok(()) => {
                    println!("Cita asignada exitosamente");
                    return Ok(true);
                }
                Err(err) => {
                    // The draft survives a failure; the operator can retry
                    // or pick another patient.
                    if notify(&err) {
                        return Ok(false);
                    }
                }
            },
            3 => {
                board.cancel_assignment();
                return Ok(true);
            }
            _ => println!("Opción inválida"),
        }
    }
}
