//! Static content catalogs for the landing page and the service picker.
//!
//! Availability strings are display copy only; no slot accounting exists.

use serde::Serialize;

// =============================================================================
// LANDING
// =============================================================================

/// Featured platform card on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LandingPlatform {
    pub name: &'static str,
    pub description: &'static str,
    pub price: &'static str,
    pub original_price: &'static str,
    pub image: &'static str,
    pub rating: f32,
    pub features: &'static [&'static str],
    pub slots: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Testimonial {
    pub name: &'static str,
    pub role: &'static str,
    pub content: &'static str,
    pub rating: u8,
    pub avatar: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// Entry in the "available services" chip grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceChip {
    pub name: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeadlineStat {
    pub value: &'static str,
    pub label: &'static str,
}

pub const LANDING_PLATFORMS: &[LandingPlatform] = &[
    LandingPlatform {
        name: "Netflix Premium",
        description: "Streaming de películas y series en 4K",
        price: "$4.99",
        original_price: "$15.99",
        image: "https://images.pexels.com/photos/265685/pexels-photo-265685.jpeg?auto=compress&cs=tinysrgb&w=400&h=300&fit=crop",
        rating: 4.8,
        features: &["6 pantallas simultáneas", "Contenido 4K", "Sin anuncios"],
        slots: "2/6 disponibles",
    },
    LandingPlatform {
        name: "Spotify Premium",
        description: "Música sin límites y sin anuncios",
        price: "$2.99",
        original_price: "$9.99",
        image: "https://images.pexels.com/photos/1763075/pexels-photo-1763075.jpeg?auto=compress&cs=tinysrgb&w=400&h=300&fit=crop",
        rating: 4.9,
        features: &["Música sin anuncios", "Descarga offline", "Calidad alta"],
        slots: "1/6 disponibles",
    },
    LandingPlatform {
        name: "Disney+ Premium",
        description: "Todo el contenido Disney, Marvel y Star Wars",
        price: "$4.99",
        original_price: "$12.99",
        image: "https://images.pexels.com/photos/7991579/pexels-photo-7991579.jpeg?auto=compress&cs=tinysrgb&w=400&h=300&fit=crop",
        rating: 4.7,
        features: &["Contenido exclusivo", "4K disponible", "Perfiles familiares"],
        slots: "3/4 disponibles",
    },
];

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        name: "María González",
        role: "Estudiante universitaria",
        content: "Ahorro más de $40 al mes compartiendo Netflix y Spotify. El proceso es súper fácil y confiable.",
        rating: 5,
        avatar: "https://images.pexels.com/photos/774909/pexels-photo-774909.jpeg?auto=compress&cs=tinysrgb&w=100&h=100&fit=crop",
    },
    Testimonial {
        name: "Carlos Mendoza",
        role: "Freelancer",
        content: "Perfecto para mi presupuesto. Tengo acceso a todas las plataformas que necesito por una fracción del precio.",
        rating: 5,
        avatar: "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg?auto=compress&cs=tinysrgb&w=100&h=100&fit=crop",
    },
    Testimonial {
        name: "Ana Rodríguez",
        role: "Madre de familia",
        content: "Mis hijos disfrutan Disney+ y yo mis series de Netflix. Todo por menos de lo que pagaba antes por una sola.",
        rating: 5,
        avatar: "https://images.pexels.com/photos/415829/pexels-photo-415829.jpeg?auto=compress&cs=tinysrgb&w=100&h=100&fit=crop",
    },
];

pub const HIGHLIGHTS: &[Highlight] = &[
    Highlight {
        icon: "share",
        title: "Compartir es Ahorrar",
        description: "Comparte cuentas premium con otros usuarios y ahorra hasta 70% en tus suscripciones",
    },
    Highlight {
        icon: "shield",
        title: "100% Seguro",
        description: "Cuentas verificadas y seguras. Tu información personal siempre protegida",
    },
    Highlight {
        icon: "message",
        title: "Pago por WhatsApp",
        description: "Proceso de pago simple y rápido a través de WhatsApp. Sin complicaciones",
    },
    Highlight {
        icon: "crown",
        title: "Acceso Premium",
        description: "Disfruta de todas las funciones premium sin restricciones ni anuncios",
    },
];

pub const SERVICE_CHIPS: &[ServiceChip] = &[
    ServiceChip { name: "Netflix", color: "bg-red-500" },
    ServiceChip { name: "Spotify", color: "bg-green-500" },
    ServiceChip { name: "Disney+", color: "bg-blue-500" },
    ServiceChip { name: "Prime Video", color: "bg-blue-600" },
    ServiceChip { name: "HBO Max", color: "bg-purple-600" },
    ServiceChip { name: "YouTube Premium", color: "bg-red-600" },
    ServiceChip { name: "Apple Music", color: "bg-gray-800" },
    ServiceChip { name: "Paramount+", color: "bg-blue-700" },
];

pub const HEADLINE_STATS: &[HeadlineStat] = &[HeadlineStat { value: "15+", label: "Servicios" }];

// =============================================================================
// SERVICE PICKER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    pub description: &'static str,
    pub slots: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Platform {
    pub id: &'static str,
    pub name: &'static str,
    pub logo: &'static str,
    pub plans: &'static [Plan],
}

impl Platform {
    #[must_use]
    pub fn plan(&self, id: &str) -> Option<&'static Plan> {
        self.plans.iter().find(|p| p.id == id)
    }

    /// Price of the first listed plan ("desde $x/mes").
    #[must_use]
    pub fn starting_price(&self) -> Option<&'static str> {
        self.plans.first().map(|p| p.price)
    }
}

pub const PLATFORMS: &[Platform] = &[
    Platform {
        id: "netflix",
        name: "Netflix",
        logo: "📺",
        plans: &[
            Plan {
                id: "netflix-premium",
                name: "Premium",
                price: "$3.99",
                description: "Hasta 4 pantallas en UHD",
                slots: 4,
            },
            Plan {
                id: "netflix-standard",
                name: "Estándar",
                price: "$2.99",
                description: "Hasta 2 pantallas en HD",
                slots: 2,
            },
        ],
    },
    Platform {
        id: "spotify",
        name: "Spotify",
        logo: "🎵",
        plans: &[Plan {
            id: "spotify-family",
            name: "Familiar",
            price: "$2.49",
            description: "Hasta 6 cuentas premium",
            slots: 6,
        }],
    },
    Platform {
        id: "hbomax",
        name: "HBO Max",
        logo: "🎬",
        plans: &[Plan {
            id: "hbo-standard",
            name: "Estándar",
            price: "$2.99",
            description: "Hasta 3 dispositivos simultáneos",
            slots: 3,
        }],
    },
];

#[must_use]
pub fn find_platform(id: &str) -> Option<&'static Platform> {
    PLATFORMS.iter().find(|p| p.id == id)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
