pub mod board;
pub mod create;
pub mod specialities;

use shared_models::error::ApiError;

/// Prints the transient notice for a failed call. Returns true when the
/// session died and the screen should bounce back to the login prompt.
pub(crate) fn notify(err: &ApiError) -> bool {
    if err.is_unauthorized() {
        println!("Error de autenticación. Por favor, inicia sesión");
        true
    } else {
        println!("{}", err.notice());
        false
    }
}
