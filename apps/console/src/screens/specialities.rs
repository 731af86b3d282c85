//! Speciality roster: the list backing the cascade plus the doctor
//! association editor.

use std::io;
use std::sync::Arc;

use doctor_cell::DoctorService;
use shared_gateway::ApiGateway;
use shared_models::params::ListParams;
use shared_query::QueryCache;
use speciality_cell::{AttachDoctorsRequest, SpecialityService};

use crate::input;
use crate::screens::notify;

pub async fn run(gateway: Arc<ApiGateway>, cache: Arc<QueryCache>) -> io::Result<()> {
    let specialities = SpecialityService::new(gateway.clone(), cache.clone());
    let doctors = DoctorService::new(gateway, cache);

    loop {
        println!("\n--- Especialidades ---");
        match specialities.list(&ListParams::all()).await {
            Ok(rows) if rows.is_empty() => println!("No hay especialidades registradas"),
            Ok(rows) => {
                println!("  {:<5} {:<8} {:<24} {}", "ID", "Código", "Nombre", "Estado");
                for row in &rows {
                    println!(
                        "  {:<5} {:<8} {:<24} {}",
                        row.id,
                        row.code,
                        row.name,
                        if row.status { "activa" } else { "inactiva" },
                    );
                }
            }
            Err(err) => {
                if notify(&err) {
                    return Ok(());
                }
            }
        }

        println!("\n1. Asociar doctores  0. Volver");
        match input::prompt_choice("Opción")? {
            1 => {
                if !attach(&specialities, &doctors).await? {
                    return Ok(());
                }
            }
            0 => return Ok(()),
            _ => println!("Opción inválida"),
        }
    }
}

/// Re-links a speciality's doctor roster. Returns false when the session
/// died and the screen must close.
async fn attach(specialities: &SpecialityService, doctors: &DoctorService) -> io::Result<bool> {
    let Some(speciality_id) = input::prompt_id("Id de especialidad")? else {
        return Ok(true);
    };

    match specialities.doctors_by_speciality(speciality_id).await {
        Ok(roster) if roster.is_empty() => println!("Sin doctores asociados actualmente"),
        Ok(roster) => {
            println!("Doctores asociados actualmente:");
            for doctor in &roster {
                println!("  {:<5} {}", doctor.id, doctor.full_name());
            }
        }
        Err(err) => {
            if notify(&err) {
                return Ok(false);
            }
            return Ok(true);
        }
    }

    match doctors.list(&ListParams::all()).await {
        Ok(rows) => {
            println!("Doctores disponibles:");
            for doctor in &rows {
                println!(
                    "  {:<5} {:<28} {}",
                    doctor.id,
                    doctor.full_name(),
                    doctor.document
                );
            }
        }
        Err(err) => {
            if notify(&err) {
                return Ok(false);
            }
            return Ok(true);
        }
    }

    let doctor_ids = input::prompt_ids("Ids de doctores (separados por comas)")?;
    if doctor_ids.is_empty() {
        println!("Sin cambios");
        return Ok(true);
    }

    let request = AttachDoctorsRequest {
        speciality_id,
        doctor_ids,
    };
    match specialities.attach_doctors(&request).await {
        Ok(()) => println!("Doctores actualizados exitosamente"),
        Err(err) => {
            if notify(&err) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}
