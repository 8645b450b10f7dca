//! Physics topic catalog
//!
//! A fixed set of well-known topics grouped by category, used to suggest
//! what to generate. Submitting a topic does not require it to be listed here.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of results returned by [`TopicCatalog::search`]
pub const SEARCH_LIMIT: usize = 10;

/// Broad area of physics a topic belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicCategory {
    Mechanics,
    Waves,
    Electromagnetism,
    Quantum,
    Thermodynamics,
    Optics,
    Relativity,
}

impl TopicCategory {
    pub const ALL: [TopicCategory; 7] = [
        TopicCategory::Mechanics,
        TopicCategory::Waves,
        TopicCategory::Electromagnetism,
        TopicCategory::Quantum,
        TopicCategory::Thermodynamics,
        TopicCategory::Optics,
        TopicCategory::Relativity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicCategory::Mechanics => "mechanics",
            TopicCategory::Waves => "waves",
            TopicCategory::Electromagnetism => "electromagnetism",
            TopicCategory::Quantum => "quantum",
            TopicCategory::Thermodynamics => "thermodynamics",
            TopicCategory::Optics => "optics",
            TopicCategory::Relativity => "relativity",
        }
    }
}

impl fmt::Display for TopicCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TopicCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        TopicCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| DomainError::InvalidCategory(s.to_string()))
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicsTopic {
    pub name: String,
    pub category: TopicCategory,
    pub description: String,
    pub keywords: Vec<String>,
}

impl PhysicsTopic {
    fn new(name: &str, category: TopicCategory, description: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            category,
            description: description.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Case-insensitive substring match on the name or any keyword.
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.keywords.iter().any(|k| k.to_lowercase().contains(needle))
    }
}

/// In-memory list of [`PhysicsTopic`]s
#[derive(Debug, Clone, Default)]
pub struct TopicCatalog {
    topics: Vec<PhysicsTopic>,
}

impl TopicCatalog {
    pub fn new(topics: Vec<PhysicsTopic>) -> Self {
        Self { topics }
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        use TopicCategory::*;

        let topics = vec![
            PhysicsTopic::new(
                "Newton's Laws of Motion",
                Mechanics,
                "The three fundamental laws describing the relationship between motion and forces",
                &["force", "acceleration", "inertia", "action-reaction"],
            ),
            PhysicsTopic::new(
                "Projectile Motion",
                Mechanics,
                "Motion of objects thrown or projected into the air",
                &["trajectory", "parabola", "range", "velocity"],
            ),
            PhysicsTopic::new(
                "Circular Motion",
                Mechanics,
                "Motion of objects moving in circular paths",
                &["centripetal force", "angular velocity", "radius"],
            ),
            PhysicsTopic::new(
                "Conservation of Energy",
                Mechanics,
                "Energy cannot be created or destroyed, only transformed",
                &["kinetic energy", "potential energy", "work"],
            ),
            PhysicsTopic::new(
                "Conservation of Momentum",
                Mechanics,
                "Total momentum in a closed system remains constant",
                &["collision", "impulse", "momentum"],
            ),
            PhysicsTopic::new(
                "Wave Interference",
                Waves,
                "Superposition of waves creating constructive and destructive patterns",
                &["superposition", "constructive", "destructive", "amplitude"],
            ),
            PhysicsTopic::new(
                "Standing Waves",
                Waves,
                "Waves that remain stationary in space",
                &["nodes", "antinodes", "resonance", "harmonics"],
            ),
            PhysicsTopic::new(
                "Doppler Effect",
                Waves,
                "Change in frequency due to relative motion between source and observer",
                &["frequency shift", "redshift", "blueshift"],
            ),
            PhysicsTopic::new(
                "Wave-Particle Duality",
                Waves,
                "Matter and light exhibit both wave and particle properties",
                &["photon", "electron", "de Broglie"],
            ),
            PhysicsTopic::new(
                "Coulomb's Law",
                Electromagnetism,
                "Force between two charged particles",
                &["electric force", "charge", "inverse square"],
            ),
            PhysicsTopic::new(
                "Electric Fields",
                Electromagnetism,
                "Region of space where electric forces act",
                &["field lines", "potential", "voltage"],
            ),
            PhysicsTopic::new(
                "Magnetic Fields",
                Electromagnetism,
                "Region of space where magnetic forces act",
                &["flux", "poles", "Lorentz force"],
            ),
            PhysicsTopic::new(
                "Electromagnetic Induction",
                Electromagnetism,
                "Generation of electric current from changing magnetic fields",
                &["Faraday's law", "Lenz's law", "induced current"],
            ),
            PhysicsTopic::new(
                "Maxwell's Equations",
                Electromagnetism,
                "Four fundamental equations describing electromagnetism",
                &["Gauss's law", "Ampere's law", "electromagnetic waves"],
            ),
            PhysicsTopic::new(
                "Quantum Tunneling",
                Quantum,
                "Particles passing through energy barriers",
                &["barrier penetration", "wavefunction", "probability"],
            ),
            PhysicsTopic::new(
                "Heisenberg Uncertainty Principle",
                Quantum,
                "Fundamental limit on precision of simultaneous measurements",
                &["position", "momentum", "uncertainty"],
            ),
            PhysicsTopic::new(
                "Schrödinger Equation",
                Quantum,
                "Fundamental equation describing quantum systems",
                &["wavefunction", "eigenvalue", "quantum state"],
            ),
            PhysicsTopic::new(
                "Quantum Entanglement",
                Quantum,
                "Quantum correlation between particles",
                &["Bell's theorem", "superposition", "measurement"],
            ),
            PhysicsTopic::new(
                "Laws of Thermodynamics",
                Thermodynamics,
                "Fundamental principles governing heat and energy",
                &["entropy", "heat", "work", "temperature"],
            ),
            PhysicsTopic::new(
                "Heat Transfer",
                Thermodynamics,
                "Movement of thermal energy between systems",
                &["conduction", "convection", "radiation"],
            ),
            PhysicsTopic::new(
                "Carnot Cycle",
                Thermodynamics,
                "Idealized thermodynamic cycle with maximum efficiency",
                &["heat engine", "efficiency", "reversible"],
            ),
            PhysicsTopic::new(
                "Snell's Law",
                Optics,
                "Refraction of light at interfaces",
                &["refraction", "index of refraction", "critical angle"],
            ),
            PhysicsTopic::new(
                "Diffraction",
                Optics,
                "Bending of waves around obstacles",
                &["single slit", "double slit", "interference pattern"],
            ),
            PhysicsTopic::new(
                "Lens Equation",
                Optics,
                "Relationship between object and image distances in lenses",
                &["focal length", "magnification", "image formation"],
            ),
            PhysicsTopic::new(
                "Special Relativity",
                Relativity,
                "Physics at high velocities approaching speed of light",
                &["time dilation", "length contraction", "Lorentz transformation"],
            ),
            PhysicsTopic::new(
                "General Relativity",
                Relativity,
                "Gravity as curvature of spacetime",
                &["spacetime", "gravitational waves", "black holes"],
            ),
            PhysicsTopic::new(
                "E=mc²",
                Relativity,
                "Mass-energy equivalence",
                &["energy", "mass", "speed of light"],
            ),
        ];

        Self::new(topics)
    }

    pub fn all(&self) -> &[PhysicsTopic] {
        &self.topics
    }

    pub fn by_category(&self, category: TopicCategory) -> Vec<&PhysicsTopic> {
        self.topics.iter().filter(|t| t.category == category).collect()
    }

    /// Topics whose name or keywords contain `query`, in catalog order.
    ///
    /// The query is a plain substring, so an empty query matches every
    /// topic and yields the first [`SEARCH_LIMIT`] of the catalog.
    pub fn search(&self, query: &str) -> Vec<&PhysicsTopic> {
        let needle = query.to_lowercase();
        self.topics
            .iter()
            .filter(|t| t.matches(&needle))
            .take(SEARCH_LIMIT)
            .collect()
    }
}
