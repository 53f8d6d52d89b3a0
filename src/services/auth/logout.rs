use tracing::info;

use super::AuthService;
use crate::shell::routes::Route;

pub fn handle_logout(service: &AuthService) -> Route {
    if let Some(user) = service.session().current() {
        info!("User {} logged out", user.id);
    }
    service.session().clear()
}
