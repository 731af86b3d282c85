//! Batch creation form: a date range plus one slot template, expanded by the
//! backend into an appointment per day.

use std::io;
use std::sync::Arc;

use chrono::NaiveDate;

use schedule_cell::ScheduleForm;
use shared_gateway::ApiGateway;
use shared_query::QueryCache;

use crate::input;
use crate::screens::notify;

pub async fn run(
    gateway: Arc<ApiGateway>,
    cache: Arc<QueryCache>,
    today: NaiveDate,
) -> io::Result<()> {
    let mut form = ScheduleForm::new(gateway, cache, today);

    loop {
        render(&form);
        println!("\n1. Rango de fechas   2. Especialidad   3. Doctor");
        println!("4. Hora de inicio    5. Hora de fin    6. Duración");
        println!("7. Crear agendas     0. Volver");

        match input::prompt_choice("Opción")? {
            1 => {
                let from = input::prompt_date("Desde", form.range().0)?;
                let to = input::prompt_date("Hasta", from)?;
                form.set_range(from, Some(to));
                if form.dates().is_empty() {
                    println!("El rango está invertido; no cubre ningún día");
                }
            }
            2 => match form.speciality_options().await {
                Ok(options) => {
                    for option in &options {
                        println!("  {:<5} {}", option.id, option.name);
                    }
                    form.set_speciality(input::prompt_id("Id de especialidad")?);
                }
                Err(err) => {
                    if notify(&err) {
                        return Ok(());
                    }
                }
            },
            3 => match form.doctor_options().await {
                Ok(options) if options.is_empty() => {
                    println!("Seleccione primero una especialidad");
                }
                Ok(options) => {
                    for option in &options {
                        println!("  {:<5} {}", option.id, option.full_name());
                    }
                    let id = input::prompt_id("Id del doctor")?;
                    if !form.set_doctor(id) {
                        println!("Seleccione primero una especialidad");
                    }
                }
                Err(err) => {
                    if notify(&err) {
                        return Ok(());
                    }
                }
            },
            4 => form.set_start_hour(input::prompt("Hora de inicio (HH:mm)")?),
            5 => form.set_end_hour(input::prompt("Hora de fin (HH:mm)")?),
            6 => match form.duration_options().await {
                Ok(options) => {
                    for option in &options {
                        println!("  {:<5} {}", option.id, option.label());
                    }
                    form.set_duration(input::prompt_id("Id de duración")?);
                }
                Err(err) => {
                    if notify(&err) {
                        return Ok(());
                    }
                }
            },
            7 => {
                let issues = form.validate();
                if !issues.is_empty() {
                    for issue in &issues {
                        println!("  - {}", issue.message);
                    }
                    println!("Por favor complete todos los campos requeridos");
                    continue;
                }
                match form.submit().await {
                    Ok(created) => {
                        println!("{} agenda(s) médica(s) creada(s) exitosamente", created)
                    }
                    Err(err) => {
                        if notify(&err) {
                            return Ok(());
                        }
                    }
                }
            }
            0 => return Ok(()),
            _ => println!("Opción inválida"),
        }
    }
}

fn render(form: &ScheduleForm) {
    println!("\n--- Crear agendas ---");

    let dates = form.dates();
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) if first == last => println!("Fechas: {} (1 día)", first),
        (Some(first), Some(last)) => {
            println!("Fechas: {} a {} ({} días)", first, last, dates.len())
        }
        _ => println!("Fechas: ninguna"),
    }

    println!(
        "Especialidad: {}   Doctor: {}   Duración: {}",
        unset_or(form.speciality_id()),
        unset_or(form.doctor_id()),
        unset_or(form.duration_id()),
    );
    println!(
        "Horario: {} a {}",
        dash_if_empty(form.start_hour()),
        dash_if_empty(form.end_hour()),
    );
}

fn unset_or(id: Option<i64>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

fn dash_if_empty(hour: &str) -> &str {
    if hour.is_empty() {
        "-"
    } else {
        hour
    }
}
