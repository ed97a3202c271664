//! Landing page projection for the current session.
//!
//! The landing page is mostly static copy from [`super::catalog`]. What
//! depends on the session is the nav (display name or login button), the
//! hero call to action, and what "join" does: anonymous visitors are sent to
//! the signup form, signed-in users get a pre-filled WhatsApp link.

use serde::Serialize;

use super::auth_form::AuthMode;
use super::catalog::{
    HEADLINE_STATS, HIGHLIGHTS, HeadlineStat, Highlight, LANDING_PLATFORMS, LandingPlatform, SERVICE_CHIPS,
    ServiceChip, TESTIMONIALS, Testimonial,
};
use super::contact::ContactMessage;
use crate::services::session::SessionSnapshot;

/// What the browser should do in response to a call to action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum JoinAction {
    OpenAuth(AuthMode),
    OpenLink(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavItem {
    LoginButton { label: &'static str },
    User { display_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroCta {
    pub label: &'static str,
    pub action: JoinAction,
}

/// Fixed contact links shown regardless of session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactLinks {
    pub start_saving: String,
    pub questions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandingView {
    pub nav: NavItem,
    pub hero: HeroCta,
    pub contact: ContactLinks,
    pub platforms: &'static [LandingPlatform],
    pub testimonials: &'static [Testimonial],
    pub highlights: &'static [Highlight],
    pub services: &'static [ServiceChip],
    pub stats: &'static [HeadlineStat],
}

fn signed_in(snapshot: &SessionSnapshot) -> bool {
    snapshot.identity.is_some()
}

/// Resolve the "join" button on a landing platform card.
#[must_use]
pub fn join_service(snapshot: &SessionSnapshot, service: &str, price: &str, whatsapp_number: &str) -> JoinAction {
    if !signed_in(snapshot) {
        return JoinAction::OpenAuth(AuthMode::Signup);
    }
    let message = ContactMessage::JoinService { service: service.to_owned(), price: price.to_owned() };
    JoinAction::OpenLink(message.link(whatsapp_number))
}

#[must_use]
pub fn hero_cta(snapshot: &SessionSnapshot, whatsapp_number: &str) -> HeroCta {
    if signed_in(snapshot) {
        HeroCta {
            label: "Contactar por WhatsApp",
            action: JoinAction::OpenLink(ContactMessage::General.link(whatsapp_number)),
        }
    } else {
        HeroCta { label: "Únete Ahora", action: JoinAction::OpenAuth(AuthMode::Signup) }
    }
}

#[must_use]
pub fn nav_item(snapshot: &SessionSnapshot) -> NavItem {
    match &snapshot.identity {
        None => NavItem::LoginButton { label: "Iniciar Sesión" },
        Some(identity) => {
            let display_name = snapshot
                .profile
                .as_ref()
                .map(|p| p.display_name.clone())
                .or_else(|| identity.display_name.clone())
                .unwrap_or_default();
            NavItem::User { display_name }
        }
    }
}

impl LandingView {
    #[must_use]
    pub fn build(snapshot: &SessionSnapshot, whatsapp_number: &str) -> Self {
        Self {
            nav: nav_item(snapshot),
            hero: hero_cta(snapshot, whatsapp_number),
            contact: ContactLinks {
                start_saving: ContactMessage::StartSaving.link(whatsapp_number),
                questions: ContactMessage::Questions.link(whatsapp_number),
            },
            platforms: LANDING_PLATFORMS,
            testimonials: TESTIMONIALS,
            highlights: HIGHLIGHTS,
            services: SERVICE_CHIPS,
            stats: HEADLINE_STATS,
        }
    }
}

#[cfg(test)]
#[path = "landing_test.rs"]
mod tests;
