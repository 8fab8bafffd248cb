/*
 * Responsibility
 * - v1 URL layout
 * - every route sees a RequestContext; whether it needs a principal is up to
 *   the extractors each handler asks for
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{login, me, register},
    contacts::{create_contact, delete_contact, get_contact, list_contacts, update_contact},
    health::health,
    notes::{create_note, delete_note, get_note, list_notes, update_note},
    posts::{create_post, delete_post, get_post, list_posts, update_post},
    users::{delete_me, get_user, update_me},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/users/me", put(update_me).delete(delete_me))
        .route("/users/{user_id}", get(get_user))
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{note_id}",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{post_id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/{contact_id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
}
