//! Pre-filled WhatsApp deep links.
//!
//! Outreach is a one-way link: the message text is URL-encoded into
//! `https://wa.me/<number>?text=...` and nothing is read back.

use serde::Deserialize;
use url::form_urlencoded;

pub const DEFAULT_WHATSAPP_NUMBER: &str = "+593987511899";

/// Build a WhatsApp deep link carrying `message`.
#[must_use]
pub fn whatsapp_link(number: &str, message: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("text", message)
        .finish();
    format!("https://wa.me/{}?{query}", number.trim())
}

/// Message templates used across the landing page, picker and dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContactMessage {
    General,
    StartSaving,
    Questions,
    JoinService { service: String, price: String },
    JoinPlan { platform: String, plan: String, price: String },
    Support { service: String, slot_number: u32 },
}

impl ContactMessage {
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::General => {
                "¡Hola! Me interesa conocer más sobre los servicios de VacApp. ¿Podrían ayudarme?".to_owned()
            }
            Self::StartSaving => {
                "¡Hola! Quiero empezar a ahorrar en mis servicios premium. ¿Pueden ayudarme a encontrar las mejores opciones?"
                    .to_owned()
            }
            Self::Questions => "Tengo algunas dudas sobre los servicios de VacApp. ¿Podrían resolverlas?".to_owned(),
            Self::JoinService { service, price } => {
                format!("¡Hola! Me interesa unirme al servicio de {service} por {price}/mes. ¿Hay espacios disponibles?")
            }
            Self::JoinPlan { platform, plan, price } => {
                format!("¡Hola! Me interesa unirme al plan {plan} de {platform} por {price}/mes. ¿Hay slots disponibles?")
            }
            Self::Support { service, slot_number } => {
                format!("¡Hola! Necesito ayuda con mi suscripción de {service} (Slot #{slot_number}).")
            }
        }
    }

    #[must_use]
    pub fn link(&self, number: &str) -> String {
        whatsapp_link(number, &self.text())
    }
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
