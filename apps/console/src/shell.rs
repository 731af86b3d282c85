use std::io;
use std::sync::Arc;

use chrono::NaiveDate;

use session_cell::{Credentials, SessionService, SessionState};
use shared_config::AppConfig;
use shared_gateway::ApiGateway;
use shared_query::QueryCache;

use crate::input;
use crate::screens;

/// Top-level menu loop. Owns nothing but wiring: screens build their state
/// machines from the shared gateway and cache on entry, so leaving a screen
/// drops its view state while cached reads survive.
pub struct AdminShell {
    gateway: Arc<ApiGateway>,
    cache: Arc<QueryCache>,
    config: AppConfig,
    session_state: Arc<SessionState>,
    session: SessionService,
    today: NaiveDate,
}

impl AdminShell {
    pub fn new(
        gateway: Arc<ApiGateway>,
        cache: Arc<QueryCache>,
        session_state: Arc<SessionState>,
        config: AppConfig,
        today: NaiveDate,
    ) -> Self {
        let session = SessionService::new(gateway.clone(), session_state.clone());
        Self {
            gateway,
            cache,
            config,
            session_state,
            session,
            today,
        }
    }

    pub async fn run(&mut self) -> io::Result<()> {
        println!();
        println!("{}", "=".repeat(56));
        println!("        ConfirmaMed - Consola de administración");
        println!("{}", "=".repeat(56));

        loop {
            if !self.session_state.is_authenticated() && !self.login().await? {
                break;
            }
            if !self.admin_menu().await? {
                break;
            }
        }

        println!("\nHasta pronto");
        Ok(())
    }

    /// Login prompt. Returns false when the operator wants out instead.
    async fn login(&mut self) -> io::Result<bool> {
        println!("\n--- Iniciar sesión ---");
        loop {
            let user_name = input::prompt("Usuario (vacío para salir)")?;
            if user_name.is_empty() {
                return Ok(false);
            }
            let password = input::prompt("Contraseña")?;

            match self
                .session
                .login(&Credentials::new(user_name, password))
                .await
            {
                Ok(user) => {
                    println!("\n¡Bienvenido de nuevo, {}!", user.full_name);
                    return Ok(true);
                }
                Err(err) => println!("{}", err.notice()),
            }
        }
    }

    /// One round of the admin menu. Returns false to exit the console.
    async fn admin_menu(&mut self) -> io::Result<bool> {
        println!("\n--- Menú principal ---");
        println!("1. Tablero de agendas");
        println!("2. Crear agendas");
        println!("3. Especialidades");
        println!("4. Cerrar sesión");
        println!("5. Salir");

        match input::prompt_choice("Opción")? {
            1 => {
                if self.guard().await {
                    screens::board::run(
                        self.gateway.clone(),
                        self.cache.clone(),
                        &self.config,
                        self.today,
                    )
                    .await?;
                }
            }
            2 => {
                if self.guard().await {
                    screens::create::run(self.gateway.clone(), self.cache.clone(), self.today)
                        .await?;
                }
            }
            3 => {
                if self.guard().await {
                    screens::specialities::run(self.gateway.clone(), self.cache.clone()).await?;
                }
            }
            4 => {
                self.session.logout().await;
                self.cache.clear();
                println!("Sesión cerrada exitosamente");
            }
            5 => return Ok(false),
            _ => println!("Opción inválida"),
        }
        Ok(true)
    }

    /// Guarded screens re-verify the session on entry; an expired cookie
    /// bounces straight back to the login prompt.
    async fn guard(&self) -> bool {
        if self.session.probe().await {
            true
        } else {
            println!("Debes iniciar sesión para acceder a esta página");
            false
        }
    }
}
