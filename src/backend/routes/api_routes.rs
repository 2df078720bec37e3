/**
 * API Routes
 *
 * - `GET /api/notifications` - notifications for the authenticated user,
 *   newest first (requires `Authorization: Bearer <token>`)
 */
use axum::{routing::get, Router};

use crate::backend::notifications::handlers::list_notifications;
use crate::backend::server::state::AppState;

pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/api/notifications", get(list_notifications))
}
