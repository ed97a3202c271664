//! Service picker modal: platform -> plan -> WhatsApp request.

use serde::{Deserialize, Serialize};

use super::catalog::{PLATFORMS, Plan, Platform, find_platform};
use super::contact::ContactMessage;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerMode {
    #[default]
    Explore,
    Add,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickerError {
    #[error("unknown platform {0}")]
    UnknownPlatform(String),
    #[error("unknown plan {0}")]
    UnknownPlan(String),
    #[error("select a platform first")]
    NoPlatform,
}

impl crate::error::ErrorCode for PickerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownPlatform(_) => "E_UNKNOWN_PLATFORM",
            Self::UnknownPlan(_) => "E_UNKNOWN_PLAN",
            Self::NoPlatform => "E_NO_PLATFORM",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ServicePicker {
    pub mode: PickerMode,
    pub open: bool,
    pub platform: Option<&'static Platform>,
    pub plan: Option<&'static Plan>,
}

impl ServicePicker {
    #[must_use]
    pub fn open(mode: PickerMode) -> Self {
        Self { mode, open: true, platform: None, plan: None }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.mode {
            PickerMode::Explore => "Explorar Servicios",
            PickerMode::Add => "Agregar Servicio",
        }
    }

    #[must_use]
    pub fn subtitle(&self) -> &'static str {
        match self.mode {
            PickerMode::Explore => "Descubre todas las plataformas disponibles",
            PickerMode::Add => "Selecciona una plataforma y plan para unirte",
        }
    }

    /// Platforms on offer; shown until one is selected.
    #[must_use]
    pub fn platforms(&self) -> &'static [Platform] {
        PLATFORMS
    }

    /// # Errors
    ///
    /// Returns [`PickerError::UnknownPlatform`] for an id not in the catalog.
    pub fn select_platform(&mut self, id: &str) -> Result<(), PickerError> {
        let platform = find_platform(id).ok_or_else(|| PickerError::UnknownPlatform(id.to_owned()))?;
        self.platform = Some(platform);
        self.plan = None;
        Ok(())
    }

    /// # Errors
    ///
    /// Fails without a selected platform or for a plan it does not offer.
    pub fn select_plan(&mut self, id: &str) -> Result<(), PickerError> {
        let platform = self.platform.ok_or(PickerError::NoPlatform)?;
        let plan = platform
            .plan(id)
            .ok_or_else(|| PickerError::UnknownPlan(id.to_owned()))?;
        self.plan = Some(plan);
        Ok(())
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub fn contact_message(&self) -> Option<ContactMessage> {
        let (platform, plan) = (self.platform?, self.plan?);
        Some(ContactMessage::JoinPlan {
            platform: platform.name.to_owned(),
            plan: plan.name.to_owned(),
            price: plan.price.to_owned(),
        })
    }

    /// WhatsApp link for the selection; closes the picker when one is produced.
    pub fn request_link(&mut self, number: &str) -> Option<String> {
        let link = self.contact_message()?.link(number);
        self.close();
        Some(link)
    }
}

#[cfg(test)]
#[path = "picker_test.rs"]
mod tests;
