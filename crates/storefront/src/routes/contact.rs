//! Contact form route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use spicejar_core::Email;

use crate::routes::{MessageQuery, redirect_error, redirect_success};
use crate::state::AppState;
use crate::stores::{RecordKind, StoredRecord};

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact/index.html")]
pub struct ContactTemplate {
    pub contacts: Vec<StoredRecord>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the contact page with past messages.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> ContactTemplate {
    let (contacts, scan_error) = match state.records().scan(RecordKind::Contact).await {
        Ok(contacts) => (contacts, None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load contact messages");
            (Vec::new(), Some("Could not load messages.".to_string()))
        }
    };

    ContactTemplate {
        contacts,
        error: query.error.or(scan_error),
        success: query.success,
    }
}

/// Submit a contact message.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Redirect {
    let name = form.name.trim();
    let message = form.message.trim();
    if name.is_empty() || message.is_empty() {
        return redirect_error("/contact", "Name and message are required.");
    }

    let Ok(email) = Email::parse(&form.email) else {
        return redirect_error("/contact", "Please enter a valid email address.");
    };

    let record = StoredRecord::new(format!("{name} ({email})"), message.to_string());

    match state.records().append(RecordKind::Contact, &record).await {
        Ok(()) => redirect_success("/contact", "Thank you for contacting us!"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to save contact message");
            redirect_error("/contact", "Could not save your message, please try again.")
        }
    }
}
