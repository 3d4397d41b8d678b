//! Static shop data: services, barbers, opening hours and slot size.
//!
//! The catalog is read-only after load. It is either the built-in studio
//! catalog or a JSON document with the same shape.

use crate::error::CatalogError;
use crate::types::{Barber, BarberId, BarberSelection, Service, ServiceId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Slot size used when a catalog file omits it
pub const DEFAULT_SLOT_INTERVAL_MINUTES: u16 = 30;

fn default_slot_interval() -> u16 {
    DEFAULT_SLOT_INTERVAL_MINUTES
}

fn default_any_barber_label() -> String {
    "Any available".to_string()
}

/// Read-only shop configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Shop display name
    pub shop_name: String,
    /// Street address
    #[serde(default)]
    pub shop_address: String,
    /// Offered services, in display order
    pub services: Vec<Service>,
    /// Concrete barbers, in display and resolution order
    pub barbers: Vec<Barber>,
    /// Label shown for [`BarberSelection::AnyAvailable`]
    #[serde(default = "default_any_barber_label")]
    pub any_barber_label: String,
    /// First bookable hour (inclusive)
    pub opening_hour: u8,
    /// Closing hour (exclusive)
    pub closing_hour: u8,
    /// Slot size in minutes
    #[serde(default = "default_slot_interval")]
    pub slot_interval_minutes: u16,
}

impl Catalog {
    /// The built-in studio catalog
    #[must_use]
    pub fn studio() -> Self {
        let service = |id: &str, name: &str, duration_minutes, price: &str, description: &str| Service {
            id: ServiceId::new(id),
            name: name.to_string(),
            duration_minutes,
            price: price.to_string(),
            description: description.to_string(),
        };

        Self {
            shop_name: "StudioBarber1002".to_string(),
            shop_address: "Rua Papa Joao XXIII, 1002, Liberdade, Campina Grande - PB, 58414-300"
                .to_string(),
            services: vec![
                service("1", "Corte Social", 30, "R$ 25,00", "Classic, elegant cut for everyday and formal occasions."),
                service("2", "Corte Navalhado", 45, "R$ 25,00", "Modern fade with a precise razor finish."),
                service("3", "Corte Infantil", 30, "R$ 25,00", "Patient, kid-friendly cut adapted to the little ones' style."),
                service("4", "Barba", 30, "R$ 18,00", "Beard shaping and design with traditional techniques."),
                service("5", "Sobrancelha", 15, "R$ 10,00", "Eyebrow design and cleanup."),
                service("6", "Pezinho do Cabelo", 10, "R$ 5,00", "Neckline and sideburn touch-up between cuts."),
            ],
            barbers: vec![
                Barber {
                    id: BarberId::new("barber1"),
                    name: "Rayff".to_string(),
                    avatar_url: Some(
                        "https://storage.googleapis.com/genai-downloads/images/barber_rayff_avatar.png"
                            .to_string(),
                    ),
                },
                Barber {
                    id: BarberId::new("barber2"),
                    name: "Nicolas".to_string(),
                    avatar_url: Some(
                        "https://storage.googleapis.com/genai-downloads/images/barber_nicolas_avatar.png"
                            .to_string(),
                    ),
                },
            ],
            any_barber_label: default_any_barber_label(),
            opening_hour: 9,
            closing_hour: 19,
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
        }
    }

    /// Parses and validates a catalog from JSON
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON and
    /// [`CatalogError::Invalid`] when [`Catalog::validate`] fails.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reads a catalog file
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] when the file cannot be read, otherwise
    /// the errors of [`Catalog::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            services = catalog.services.len(),
            barbers = catalog.barbers.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Checks hours, slot size and id uniqueness
    ///
    /// An empty barber list is accepted; wildcard bookings are then never
    /// available.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.opening_hour >= self.closing_hour || self.closing_hour > 24 {
            return Err(CatalogError::Invalid(format!(
                "opening hour {} must be before closing hour {} (at most 24)",
                self.opening_hour, self.closing_hour
            )));
        }
        if self.slot_interval_minutes == 0 {
            return Err(CatalogError::Invalid(
                "slot interval must be at least one minute".to_string(),
            ));
        }

        let mut service_ids = HashSet::new();
        if let Some(dup) = self.services.iter().find(|s| !service_ids.insert(&s.id)) {
            return Err(CatalogError::Invalid(format!("duplicate service id '{}'", dup.id)));
        }
        let mut barber_ids = HashSet::new();
        if let Some(dup) = self.barbers.iter().find(|b| !barber_ids.insert(&b.id)) {
            return Err(CatalogError::Invalid(format!("duplicate barber id '{}'", dup.id)));
        }
        Ok(())
    }

    /// Looks up a service
    #[must_use]
    pub fn service(&self, id: &ServiceId) -> Option<&Service> {
        self.services.iter().find(|s| &s.id == id)
    }

    /// Looks up a concrete barber
    #[must_use]
    pub fn barber(&self, id: &BarberId) -> Option<&Barber> {
        self.barbers.iter().find(|b| &b.id == id)
    }

    /// True when `id` names a concrete barber in this catalog
    #[must_use]
    pub fn is_concrete_barber(&self, id: &BarberId) -> bool {
        self.barber(id).is_some()
    }

    /// Number of concrete barbers
    #[must_use]
    pub fn concrete_barber_count(&self) -> usize {
        self.barbers.len()
    }

    /// Every selection a client can pick: each barber, then the wildcard
    #[must_use]
    pub fn selections(&self) -> Vec<BarberSelection> {
        self.barbers
            .iter()
            .map(|b| BarberSelection::Concrete(b.id.clone()))
            .chain(std::iter::once(BarberSelection::AnyAvailable))
            .collect()
    }

    /// Display label for a selection
    #[must_use]
    pub fn selection_label(&self, selection: &BarberSelection) -> String {
        match selection {
            BarberSelection::Concrete(id) => self
                .barber(id)
                .map_or_else(|| id.to_string(), |b| b.name.clone()),
            BarberSelection::AnyAvailable => self.any_barber_label.clone(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::studio()
    }
}
