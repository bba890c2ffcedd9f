//! Telegram webhook endpoint. Replies are returned inline as a
//! `sendMessage` method call in the webhook response body.

use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::bot::commands::{self, Command};
use crate::roster::RosterService;

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    /// Roster name used for this chat user.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.first_name)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessage {
    pub method: String,
    pub chat_id: i64,
    pub text: String,
}

/// POST /bot/webhook
#[post("/bot/webhook")]
pub async fn webhook(update: web::Json<Update>, svc: web::Data<RosterService>) -> impl Responder {
    let Some(msg) = &update.message else {
        return HttpResponse::Ok().finish();
    };
    let Some(cmd) = msg.text.as_deref().and_then(Command::parse) else {
        return HttpResponse::Ok().finish();
    };

    let sender = msg.from.as_ref().map(User::display_name).unwrap_or_default();
    log::debug!("update {}: {cmd:?} from {sender:?}", update.update_id);

    let text = commands::execute(&svc, cmd, sender).await;
    HttpResponse::Ok().json(SendMessage {
        method: "sendMessage".into(),
        chat_id: msg.chat.id,
        text,
    })
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(webhook);
}
